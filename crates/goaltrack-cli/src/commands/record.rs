use chrono::{Datelike, Utc};
use clap::Subcommand;
use goaltrack_core::record::{DailyRecord, Energy, GoalProgressEntry, Mood};
use goaltrack_core::storage::Database;

use super::{parse_date, parse_month};

#[derive(Subcommand)]
pub enum RecordAction {
    /// Create or update today's check-in
    Add {
        /// Date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Mood score, 1 (very bad) to 5 (very good)
        #[arg(long)]
        mood: Option<u8>,
        /// Energy score, 1 (very low) to 5 (very high)
        #[arg(long)]
        energy: Option<u8>,
        /// Free-text note
        #[arg(long)]
        comment: Option<String>,
    },
    /// Log a goal progress entry against a day's check-in
    Log {
        /// Date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Small goal ID; progress is applied to the goal too
        #[arg(long)]
        goal: Option<String>,
        /// Free-text label when no goal is referenced
        #[arg(long)]
        label: Option<String>,
        /// Numeric value contributed
        #[arg(long)]
        value: f64,
        /// Unit of measurement
        #[arg(long, default_value = "")]
        unit: String,
        /// Free-text note
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show one day's check-in
    Show {
        /// Date (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
    },
    /// List a month's check-ins
    List {
        /// Month (YYYY-MM), default current
        #[arg(long)]
        month: Option<String>,
    },
    /// Delete a day's check-in
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

fn arg_date(date: Option<String>) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(s) => parse_date(&s),
        None => Ok(Utc::now().date_naive()),
    }
}

fn mood_from_arg(score: u8) -> Result<Mood, Box<dyn std::error::Error>> {
    Mood::from_score(score).ok_or_else(|| format!("invalid mood {score}, expected 1-5").into())
}

fn energy_from_arg(score: u8) -> Result<Energy, Box<dyn std::error::Error>> {
    Energy::from_score(score).ok_or_else(|| format!("invalid energy {score}, expected 1-5").into())
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        RecordAction::Add {
            date,
            mood,
            energy,
            comment,
        } => {
            let date = arg_date(date)?;
            // Upsert: at most one check-in per calendar day.
            let existing = db.record_by_date(date)?;
            let is_update = existing.is_some();
            let mut record = existing.unwrap_or_else(|| DailyRecord::new(date));
            if let Some(mood) = mood {
                record.mood = Some(mood_from_arg(mood)?);
            }
            if let Some(energy) = energy {
                record.energy = Some(energy_from_arg(energy)?);
            }
            if let Some(comment) = comment {
                record.comment = Some(comment);
            }
            if is_update {
                db.update_record(&record)?;
            } else {
                db.insert_record(&record)?;
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        RecordAction::Log {
            date,
            goal,
            label,
            value,
            unit,
            comment,
        } => {
            let date = arg_date(date)?;
            let record = match db.record_by_date(date)? {
                Some(record) => record,
                None => {
                    let record = DailyRecord::new(date);
                    db.insert_record(&record)?;
                    record
                }
            };
            let entry = GoalProgressEntry {
                small_goal_id: goal.clone(),
                label,
                value,
                unit,
                comment,
            };
            db.append_record_entry(&record.id, &entry)?;
            if let Some(goal_id) = goal {
                db.record_goal_progress(&goal_id, value)?;
            }
            let record = db.record_by_date(date)?.ok_or("record vanished")?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        RecordAction::Show { date } => {
            let date = arg_date(date)?;
            match db.record_by_date(date)? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("null"),
            }
        }
        RecordAction::List { month } => {
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => {
                    let today = Utc::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let records = db.records_by_month(year, month)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        RecordAction::Delete { date } => {
            let date = parse_date(&date)?;
            let record = db
                .record_by_date(date)?
                .ok_or_else(|| format!("no record for {date}"))?;
            db.delete_record(&record.id)?;
            println!("ok");
        }
    }
    Ok(())
}
