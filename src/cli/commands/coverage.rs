//! Coverage command - does a year have a dataset

use crate::cli::args::{CoverageArgs, OutputFormat};
use crate::error::PoyaResult;
use crate::service::{Coverage, HolidayService};
use crate::ui::{self, UiContext};

/// Execute the coverage command
pub async fn execute(args: CoverageArgs, service: &HolidayService) -> PoyaResult<()> {
    let report = service.coverage(args.year).await?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            match report.coverage {
                Coverage::Available => {
                    ui::step_ok(&ctx, &format!("Data for {} is available", report.year))
                }
                Coverage::NotAvailable => ui::step_warn_hint(
                    &ctx,
                    &format!("Data for {} is not available", report.year),
                    &format!("Add {}.json to the data directory", report.year),
                ),
            }
        }
    }

    Ok(())
}
