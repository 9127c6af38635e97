//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod coverage;
pub mod list;
pub mod serve;
pub mod status;

pub use check::{check, info};
pub use completions::execute as completions;
pub use config::execute as config;
pub use coverage::execute as coverage;
pub use list::execute as list;
pub use serve::execute as serve;
pub use status::execute as status;
