//! Check and info commands - resolve a single date

use crate::cli::args::{DateArgs, OutputFormat};
use crate::error::PoyaResult;
use crate::resolver::{HolidayMatch, HolidayPayload};
use crate::service::HolidayService;
use crate::ui::{self, UiContext};
use console::style;
use serde_json::json;

/// Execute the check command
pub async fn check(args: DateArgs, service: &HolidayService) -> PoyaResult<()> {
    let (date, is_holiday) = service.check(args.year, args.month, args.day).await?;

    match args.output {
        OutputFormat::Json => {
            let body = json!({ "date": date, "response": is_holiday });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            if is_holiday {
                ui::step_ok(&ctx, &format!("{} is a holiday", date));
            } else {
                ui::step_info(&ctx, &format!("{} is not a holiday", date));
            }
        }
    }

    Ok(())
}

/// Execute the info command
pub async fn info(args: DateArgs, service: &HolidayService) -> PoyaResult<()> {
    let resolution = service.info(args.year, args.month, args.day).await?;
    let date = resolution.date.to_string();

    match args.output {
        OutputFormat::Json => {
            let body = json!({ "date": date, "response": resolution.payload });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => print_details(&date, &resolution.payload),
    }

    Ok(())
}

fn print_details(date: &str, payload: &HolidayPayload) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, date);

    let details = match payload {
        HolidayPayload::Holiday(details) => details,
        HolidayPayload::NotHoliday { .. } => {
            ui::step_info(&ctx, "Not a holiday");
            return;
        }
    };

    ui::key_value(&ctx, "Day", &details.day);
    ui::key_value(&ctx, "Week", &details.week);
    ui::key_value(&ctx, "Month", &details.month);
    println!();
    print_matches(&details.holidays);
}

fn print_matches(matches: &[HolidayMatch]) {
    println!(
        "{:<40} {:<28} {:<12} {:<12}",
        style("HOLIDAY").bold(),
        style("TYPE").bold(),
        style("START").bold(),
        style("END").bold()
    );
    println!("{}", "-".repeat(94));

    for matched in matches {
        println!(
            "{:<40} {:<28} {:<12} {:<12}",
            matched.name.as_deref().unwrap_or("-"),
            matched.categories.join(", "),
            matched.start,
            matched.end
        );
    }

    println!();
    println!("{} holiday(s)", matches.len());
}
