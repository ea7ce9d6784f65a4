use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PomodoroPhase, SessionKind, TimerState};

/// Every timer state change produces an Event.
/// The hosting layer polls for events; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerConfigured {
        kind: SessionKind,
        target_secs: Option<u64>,
        goal_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerStarted {
        kind: SessionKind,
        target_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        remaining_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_secs: u64,
        remaining_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        kind: SessionKind,
        phase: Option<PomodoroPhase>,
        elapsed_secs: u64,
        remaining_secs: Option<u64>,
        target_secs: Option<u64>,
        goal_id: Option<String>,
        at: DateTime<Utc>,
    },
}
