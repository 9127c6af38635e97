//! List command - show a year's holidays

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::PoyaResult;
use crate::listing::{HolidayListing, ListEntry};
use crate::service::HolidayService;
use crate::ui::{self, UiContext};
use chrono::NaiveDate;
use console::style;
use serde_json::json;

/// Execute the list command
pub async fn execute(args: ListArgs, service: &HolidayService) -> PoyaResult<()> {
    let listing = service
        .list(args.year, args.month, args.category.as_deref(), &args.format)
        .await?;

    if args.output == OutputFormat::Json {
        let body = json!({ "holidays": listing });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let ctx = UiContext::detect();
    if listing.is_empty() {
        ui::step_info(&ctx, &format!("No holidays match in {}", args.year));
        return Ok(());
    }

    ui::intro(&ctx, &format!("Holidays {}", args.year));
    match &listing {
        HolidayListing::Simple(dates) => print_dates(dates),
        HolidayListing::Full(entries) => print_table(entries),
    }

    println!();
    println!("{} holiday(s)", listing.len());
    Ok(())
}

fn print_dates(dates: &[NaiveDate]) {
    for date in dates {
        println!("{}", date);
    }
}

fn print_table(entries: &[ListEntry]) {
    println!(
        "{:<12} {:<40} {:<28} {:<12}",
        style("DATE").bold(),
        style("NAME").bold(),
        style("TYPE").bold(),
        style("END").bold()
    );
    println!("{}", "-".repeat(94));

    for entry in entries {
        println!(
            "{:<12} {:<40} {:<28} {:<12}",
            entry.date,
            entry.name.as_deref().unwrap_or("-"),
            entry.categories.join(", "),
            entry.end
        );
    }
}
