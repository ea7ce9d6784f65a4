pub mod category;
pub mod config;
pub mod goal;
pub mod record;
pub mod stats;
pub mod subgoal;
pub mod timer;

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD").into())
}

/// Parse a `YYYY-MM` argument into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32), Box<dyn std::error::Error>> {
    let invalid = || -> Box<dyn std::error::Error> {
        format!("invalid month '{s}', expected YYYY-MM").into()
    };
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
