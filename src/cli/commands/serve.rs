//! Serve command - run the HTTP API

use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::error::PoyaResult;
use crate::server;
use crate::service::HolidayService;
use std::sync::Arc;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config, service: HolidayService) -> PoyaResult<()> {
    let mut server_config = config.server.clone();
    if let Some(bind) = args.bind {
        server_config.bind = bind;
    }

    server::serve(Arc::new(service), &server_config).await
}
