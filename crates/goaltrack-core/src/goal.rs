//! Goal hierarchy types.
//!
//! Goals come in two tiers: a `BigGoal` is a long-term objective, and a
//! `SmallGoal` is a measurable sub-objective with a numeric target.
//! Small goals accumulate progress through [`SmallGoal::record_progress`],
//! which is the single place the completed flag is derived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a big goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    OnHold,
}

/// Informational grouping for big goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A long-term objective.
///
/// Owns zero or more [`SmallGoal`]s via their `big_goal_id` back
/// reference. Deleting a big goal cascades to its small goals; archiving
/// is a reversible soft-hide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigGoal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Reference to an uploaded image, resolved by the hosting layer.
    #[serde(default)]
    pub image: Option<String>,
    pub status: GoalStatus,
    #[serde(default)]
    pub archived: bool,
    /// Set only when the goal transitions to `Completed`.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BigGoal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            category_id: None,
            deadline: None,
            image: None,
            status: GoalStatus::Active,
            archived: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the goal completed, stamping the completion time.
    pub fn complete(&mut self) {
        self.status = GoalStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Put the goal on hold. Clears any completion stamp.
    pub fn hold(&mut self) {
        self.status = GoalStatus::OnHold;
        self.completed_at = None;
    }

    /// Return the goal to the active state.
    pub fn reactivate(&mut self) {
        self.status = GoalStatus::Active;
        self.completed_at = None;
    }
}

/// A measurable sub-goal.
///
/// `current_value` is monotonically non-decreasing under
/// [`record_progress`](Self::record_progress). The stored `completed`
/// flag is authoritative; it is derived from
/// `current_value >= target_value` only here, never re-computed by
/// readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmallGoal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Owning big goal, if any. A small goal may stand alone.
    #[serde(default)]
    pub big_goal_id: Option<String>,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    pub unit: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SmallGoal {
    pub fn new(title: impl Into<String>, target_value: f64, unit: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            big_goal_id: None,
            target_value,
            current_value: 0.0,
            unit: unit.into(),
            deadline: None,
            completed: false,
            archived: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Add `value` to the accumulated progress and re-derive the
    /// completed flag. Negative contributions are ignored so the
    /// accumulated value never decreases.
    pub fn record_progress(&mut self, value: f64) {
        if value.is_finite() && value > 0.0 {
            self.current_value += value;
        }
        let completed = self.current_value >= self.target_value;
        if completed && !self.completed {
            self.completed_at = Some(Utc::now());
        } else if !completed {
            self.completed_at = None;
        }
        self.completed = completed;
    }

    /// 0.0 .. 100.0 progress toward the target.
    pub fn progress_pct(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_value / self.target_value * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_progress_accumulates() {
        let mut goal = SmallGoal::new("Run", 30.0, "days");
        goal.record_progress(10.0);
        goal.record_progress(5.0);
        assert_eq!(goal.current_value, 15.0);
        assert!(!goal.completed);
        assert!(goal.completed_at.is_none());
    }

    #[test]
    fn record_progress_completes_at_target() {
        let mut goal = SmallGoal::new("Read", 3.0, "books");
        goal.record_progress(2.0);
        assert!(!goal.completed);
        goal.record_progress(1.0);
        assert!(goal.completed);
        assert!(goal.completed_at.is_some());
    }

    #[test]
    fn record_progress_ignores_negative() {
        let mut goal = SmallGoal::new("Save", 100.0, "dollars");
        goal.record_progress(50.0);
        goal.record_progress(-20.0);
        assert_eq!(goal.current_value, 50.0);
    }

    #[test]
    fn progress_pct_caps_at_100() {
        let mut goal = SmallGoal::new("Pages", 10.0, "pages");
        goal.record_progress(25.0);
        assert_eq!(goal.progress_pct(), 100.0);
    }

    #[test]
    fn big_goal_completion_stamps_time() {
        let mut goal = BigGoal::new("Marathon");
        assert_eq!(goal.status, GoalStatus::Active);
        goal.complete();
        assert_eq!(goal.status, GoalStatus::Completed);
        assert!(goal.completed_at.is_some());
        goal.hold();
        assert_eq!(goal.status, GoalStatus::OnHold);
        assert!(goal.completed_at.is_none());
    }
}
