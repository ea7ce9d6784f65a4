//! Daily check-in records.
//!
//! A [`DailyRecord`] captures one day's mood, energy, free-text comment
//! and the goal-progress entries logged that day. There is at most one
//! record per calendar date; the storage layer enforces this with a
//! unique index.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 5-level ordinal mood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

impl Mood {
    /// Numeric score in 1..=5 used by the statistics aggregator.
    pub fn score(self) -> u8 {
        match self {
            Mood::VeryBad => 1,
            Mood::Bad => 2,
            Mood::Neutral => 3,
            Mood::Good => 4,
            Mood::VeryGood => 5,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Mood::VeryBad),
            2 => Some(Mood::Bad),
            3 => Some(Mood::Neutral),
            4 => Some(Mood::Good),
            5 => Some(Mood::VeryGood),
            _ => None,
        }
    }
}

/// 5-level ordinal energy scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Energy {
    /// Numeric score in 1..=5 used by the statistics aggregator.
    pub fn score(self) -> u8 {
        match self {
            Energy::VeryLow => 1,
            Energy::Low => 2,
            Energy::Medium => 3,
            Energy::High => 4,
            Energy::VeryHigh => 5,
        }
    }

    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Energy::VeryLow),
            2 => Some(Energy::Low),
            3 => Some(Energy::Medium),
            4 => Some(Energy::High),
            5 => Some(Energy::VeryHigh),
            _ => None,
        }
    }
}

/// One progress contribution logged against a goal (or a free-text
/// label when no formal goal was selected). Never exists outside its
/// parent [`DailyRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgressEntry {
    /// Target small goal, if one was selected.
    #[serde(default)]
    pub small_goal_id: Option<String>,
    /// Free-text label used when no goal is referenced.
    #[serde(default)]
    pub label: Option<String>,
    /// Numeric value contributed.
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A user's single daily check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub energy: Option<Energy>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Ordered list of progress entries logged on this day.
    #[serde(default)]
    pub entries: Vec<GoalProgressEntry>,
    pub created_at: DateTime<Utc>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            mood: None,
            energy: None,
            comment: None,
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Mood score, 0 when absent.
    pub fn mood_score(&self) -> u8 {
        self.mood.map(Mood::score).unwrap_or(0)
    }

    /// Energy score, 0 when absent.
    pub fn energy_score(&self) -> u8 {
        self.energy.map(Energy::score).unwrap_or(0)
    }
}
