use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of timer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Work/break cycling with a long break every few work sessions.
    Pomodoro,
    /// One countdown of a user-chosen duration.
    Custom,
    /// Free-running count-up with no target.
    Stopwatch,
}

/// Current phase of a pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    pub fn is_break(self) -> bool {
        matches!(self, PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak)
    }
}

/// Pomodoro durations and cycling policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default = "default_work_min")]
    pub work_min: u32,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
    /// Completed work sessions before the long break.
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    /// Start the next phase running as soon as one completes.
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

fn default_work_min() -> u32 {
    25
}
fn default_short_break_min() -> u32 {
    5
}
fn default_long_break_min() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_advance: default_true(),
        }
    }
}

impl PomodoroSettings {
    /// Duration of the given phase in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn phase_secs(&self, phase: PomodoroPhase) -> u64 {
        let minutes = match phase {
            PomodoroPhase::Work => self.work_min,
            PomodoroPhase::ShortBreak => self.short_break_min,
            PomodoroPhase::LongBreak => self.long_break_min,
        };
        (minutes as u64).saturating_mul(60)
    }
}

/// A persisted, completed timer session.
///
/// Produced by the engine on stop or countdown completion and handed to
/// the caller for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerRecord {
    pub id: String,
    pub kind: SessionKind,
    /// True when a pomodoro break phase produced this record.
    #[serde(default)]
    pub is_break: bool,
    /// Seconds actually spent.
    pub duration_secs: u64,
    #[serde(default)]
    pub small_goal_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TimerRecord {
    pub(crate) fn finalize(
        kind: SessionKind,
        is_break: bool,
        duration_secs: u64,
        small_goal_id: Option<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            is_break,
            duration_secs,
            small_goal_id,
            started_at,
            ended_at: Utc::now(),
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_classic_pomodoro() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.phase_secs(PomodoroPhase::Work), 25 * 60);
        assert_eq!(settings.phase_secs(PomodoroPhase::ShortBreak), 5 * 60);
        assert_eq!(settings.phase_secs(PomodoroPhase::LongBreak), 15 * 60);
        assert_eq!(settings.sessions_before_long_break, 4);
        assert!(settings.auto_advance);
    }

    #[test]
    fn break_phases_are_breaks() {
        assert!(!PomodoroPhase::Work.is_break());
        assert!(PomodoroPhase::ShortBreak.is_break());
        assert!(PomodoroPhase::LongBreak.is_break());
    }
}
