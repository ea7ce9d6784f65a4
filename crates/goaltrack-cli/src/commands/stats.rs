use chrono::{Datelike, Utc};
use clap::Subcommand;
use goaltrack_core::stats::monthly_statistics;
use goaltrack_core::storage::Database;
use serde_json::json;

use super::parse_month;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Monthly statistics report
    Month {
        /// Month (YYYY-MM), default current
        month: Option<String>,
    },
    /// Dump all data as a single JSON document
    Export,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Month { month } => {
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => {
                    let today = Utc::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let records = db.all_records()?;
            let timer_records = db.timer_records_by_month(year, month)?;
            let big_goals = db.big_goals(true)?;
            let small_goals = db.small_goals(true)?;
            let categories = db.categories()?;

            let stats = monthly_statistics(
                &records,
                &timer_records,
                &big_goals,
                &small_goals,
                &categories,
                year,
                month,
            );
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Export => {
            let export = json!({
                "exported_at": Utc::now().to_rfc3339(),
                "categories": db.categories()?,
                "big_goals": db.big_goals(true)?,
                "small_goals": db.small_goals(true)?,
                "records": db.all_records()?,
                "timer_records": db.all_timer_records()?,
            });
            println!("{}", serde_json::to_string_pretty(&export)?);
        }
    }
    Ok(())
}
