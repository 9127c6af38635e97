//! Terminal output for the local commands
//!
//! Uses `cliclack` when attached to an interactive terminal and falls back
//! to plain, prefix-tagged lines otherwise (pipes, CI).

mod context;
mod output;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, section, step_info, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use theme::{init_theme, PoyaTheme};
