//! Timer engine implementation.
//!
//! The engine is a deterministic state machine driven by `tick()`: one
//! call accounts for one second of running time. It has no internal
//! thread and no wall-clock reads on the tick path -- the caller decides
//! when a second has passed, which keeps the engine fully simulatable
//! in tests and trivially persistable between CLI invocations.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Idle
//! ```
//!
//! `stop()` finalizes a [`TimerRecord`] and returns to `Idle`;
//! `reset()` returns to `Idle` discarding progress. Invalid transitions
//! are no-ops, never errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{PomodoroPhase, PomodoroSettings, SessionKind, TimerRecord};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Invoked when a session record is emitted. The hosting layer plugs in
/// its notification mechanism; the engine itself performs no
/// environment side effects.
pub trait CompletionNotifier {
    fn session_completed(&self, record: &TimerRecord);
}

/// Core timer engine.
///
/// One `tick()` call equals one elapsed second while `Running`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    kind: SessionKind,
    settings: PomodoroSettings,
    /// Current pomodoro phase (meaningful only for `Pomodoro`).
    phase: PomodoroPhase,
    /// Work phases completed in the current pomodoro cycle.
    completed_work_sessions: u32,
    /// Countdown target. `None` for stopwatch.
    target_secs: Option<u64>,
    elapsed_secs: u64,
    #[serde(default)]
    goal_id: Option<String>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
}

impl TimerEngine {
    /// Create an idle engine with the given pomodoro settings, armed
    /// for a work phase.
    pub fn new(settings: PomodoroSettings) -> Self {
        let target = settings.phase_secs(PomodoroPhase::Work);
        Self {
            state: TimerState::Idle,
            kind: SessionKind::Pomodoro,
            settings,
            phase: PomodoroPhase::Work,
            completed_work_sessions: 0,
            target_secs: Some(target),
            elapsed_secs: 0,
            goal_id: None,
            started_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn phase(&self) -> Option<PomodoroPhase> {
        match self.kind {
            SessionKind::Pomodoro => Some(self.phase),
            _ => None,
        }
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn target_secs(&self) -> Option<u64> {
        self.target_secs
    }

    /// Remaining seconds for countdown modes, `None` for stopwatch.
    pub fn remaining_secs(&self) -> Option<u64> {
        self.target_secs.map(|t| t.saturating_sub(self.elapsed_secs))
    }

    pub fn goal_id(&self) -> Option<&str> {
        self.goal_id.as_deref()
    }

    /// 0.0 .. 1.0 progress within the current countdown. Stopwatch has
    /// no target, so its progress is always 0.
    pub fn progress(&self) -> f64 {
        match self.target_secs {
            Some(0) | None => 0.0,
            Some(target) => (self.elapsed_secs as f64 / target as f64).min(1.0),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            kind: self.kind,
            phase: self.phase(),
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            target_secs: self.target_secs,
            goal_id: self.goal_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the timer mode. Valid only from `Idle`; reconfiguring a
    /// running or paused timer is rejected so in-progress time is never
    /// lost. Custom mode requires a target duration.
    pub fn configure(
        &mut self,
        kind: SessionKind,
        duration_secs: Option<u64>,
        goal_id: Option<String>,
    ) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        let target = match kind {
            SessionKind::Pomodoro => Some(self.settings.phase_secs(PomodoroPhase::Work)),
            SessionKind::Custom => Some(duration_secs?),
            SessionKind::Stopwatch => None,
        };
        self.kind = kind;
        self.phase = PomodoroPhase::Work;
        self.completed_work_sessions = 0;
        self.target_secs = target;
        self.elapsed_secs = 0;
        self.goal_id = goal_id;
        self.started_at = None;
        Some(Event::TimerConfigured {
            kind,
            target_secs: target,
            goal_id: self.goal_id.clone(),
            at: Utc::now(),
        })
    }

    /// Start from `Idle` or resume from `Paused`.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.started_at = Some(Utc::now());
                Some(Event::TimerStarted {
                    kind: self.kind,
                    target_secs: self.target_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    elapsed_secs: self.elapsed_secs,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    /// Freeze elapsed time.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Finalize the session and return its record. The engine is back
    /// to `Idle` with the configured duration restored. No-op from
    /// `Idle`.
    pub fn stop(&mut self) -> Option<TimerRecord> {
        if self.state == TimerState::Idle {
            return None;
        }
        let record = self.finalize_record();
        self.rearm();
        Some(record)
    }

    /// Discard progress without emitting a record.
    pub fn reset(&mut self) -> Option<Event> {
        self.rearm();
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Account for one second of running time.
    ///
    /// Countdown modes return the completed session record when the
    /// target is reached; pomodoro then advances to the next phase,
    /// starting it immediately when `auto_advance` is set.
    pub fn tick(&mut self) -> Option<TimerRecord> {
        if self.state != TimerState::Running {
            return None;
        }
        self.elapsed_secs += 1;
        let target = match self.target_secs {
            Some(t) => t,
            None => return None, // Stopwatch counts up without bound.
        };
        if self.elapsed_secs < target {
            return None;
        }
        let record = self.finalize_record();
        match self.kind {
            SessionKind::Pomodoro => self.advance_phase(),
            _ => self.rearm(),
        }
        Some(record)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finalize_record(&self) -> TimerRecord {
        TimerRecord::finalize(
            self.kind,
            self.kind == SessionKind::Pomodoro && self.phase.is_break(),
            self.elapsed_secs,
            self.goal_id.clone(),
            self.started_at.unwrap_or_else(Utc::now),
        )
    }

    /// Return to `Idle` with the configured duration restored.
    fn rearm(&mut self) {
        self.state = TimerState::Idle;
        self.elapsed_secs = 0;
        self.started_at = None;
        if self.kind == SessionKind::Pomodoro {
            self.phase = PomodoroPhase::Work;
            self.completed_work_sessions = 0;
            self.target_secs = Some(self.settings.phase_secs(PomodoroPhase::Work));
        }
    }

    /// Move the pomodoro cycle to its next phase.
    fn advance_phase(&mut self) {
        let next = match self.phase {
            PomodoroPhase::Work => {
                self.completed_work_sessions += 1;
                let interval = self.settings.sessions_before_long_break.max(1);
                if self.completed_work_sessions % interval == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        };
        self.phase = next;
        self.target_secs = Some(self.settings.phase_secs(next));
        self.elapsed_secs = 0;
        if self.settings.auto_advance {
            self.state = TimerState::Running;
            self.started_at = Some(Utc::now());
        } else {
            self.state = TimerState::Idle;
            self.started_at = None;
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(PomodoroSettings::default())
    }
}
