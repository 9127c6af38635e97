//! Status command - report service health

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::error::PoyaResult;
use crate::service::HolidayService;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(args: StatusArgs, service: &HolidayService) -> PoyaResult<()> {
    let status = service.status();

    if args.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let ctx = UiContext::detect();
    ui::intro(&ctx, "Poya Status");

    ui::section(&ctx, "Service");
    ui::key_value(&ctx, "Version", status.api_version);
    ui::key_value(
        &ctx,
        "Years",
        &format!(
            "{}-{}",
            status.data_store_year_min, status.data_store_year_max
        ),
    );

    ui::section(&ctx, "Cache");
    ui::key_value(&ctx, "Backend", status.cache_backend.unwrap_or("none"));
    ui::key_value_status(
        &ctx,
        "State",
        if status.cache_connected {
            "connected"
        } else {
            "degraded (every lookup reads the data store)"
        },
        status.cache_connected,
    );

    ui::outro_success(&ctx, status.message);
    Ok(())
}
