//! # Goaltrack Core Library
//!
//! This library provides the core business logic for the Goaltrack
//! personal goal tracker. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Goals**: Categories, long-term big goals, and measurable small
//!   goals with derived completion
//! - **Records**: One check-in per calendar day with mood, energy, and
//!   goal progress entries
//! - **Timer Engine**: A tick-driven state machine; the caller invokes
//!   `tick()` once per elapsed second
//! - **Statistics**: Pure monthly aggregation over records, timer
//!   sessions, and goals
//! - **Storage**: SQLite-based persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`monthly_statistics`](stats::monthly_statistics): Monthly report builder
//! - [`Database`]: Goal, record, and session persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod goal;
pub mod record;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use goal::{BigGoal, Category, GoalStatus, SmallGoal};
pub use record::{DailyRecord, Energy, GoalProgressEntry, Mood};
pub use stats::{monthly_statistics, MonthlyStatistics};
pub use storage::{data_dir, Config, Database};
pub use timer::{
    CompletionNotifier, PomodoroPhase, PomodoroSettings, SessionKind, TimerEngine, TimerRecord,
    TimerState,
};
