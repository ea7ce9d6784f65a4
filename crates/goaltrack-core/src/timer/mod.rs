//! Timer engine and session types.

mod engine;
mod session;

pub use engine::{CompletionNotifier, TimerEngine, TimerState};
pub use session::{PomodoroPhase, PomodoroSettings, SessionKind, TimerRecord};
