//! Poya - Holiday lookup service
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use poya::cli::{commands, Cli, Commands};
use poya::config::{Config, ConfigManager};
use poya::error::PoyaResult;
use poya::service::HolidayService;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PoyaResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load_effective().await?;
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    // The server reports its address and requests at info
    let verbose = match cli.command {
        Commands::Serve(_) => cli.verbose.max(1),
        _ => cli.verbose,
    };
    init_logging(verbose, &config);
    poya::ui::init_theme();
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
        command => {
            let service = HolidayService::from_config(&config).await;
            dispatch(command, &config, service).await
        }
    }
}

async fn dispatch(command: Commands, config: &Config, service: HolidayService) -> PoyaResult<()> {
    match command {
        Commands::Serve(args) => commands::serve(args, config, service).await,
        Commands::Check(args) => commands::check(args, &service).await,
        Commands::Info(args) => commands::info(args, &service).await,
        Commands::List(args) => commands::list(args, &service).await,
        Commands::Coverage(args) => commands::coverage(args, &service).await,
        Commands::Status(args) => commands::status(args, &service).await,
        Commands::Config(_) | Commands::Completions(_) => unreachable!("handled in run"),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, config: &Config) {
    let default_level = match verbose {
        0 => "poya=warn",
        1 => "poya=info,tower_http=info",
        _ => "poya=debug,tower_http=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
