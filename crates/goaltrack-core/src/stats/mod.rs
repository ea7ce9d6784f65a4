//! Monthly statistics aggregation.
//!
//! Pure, synchronous computations over already-fetched record lists:
//! no storage access, no mutation of inputs, no error paths. Missing
//! optional fields degrade to zero and every ratio special-cases the
//! empty denominator.
//!
//! Months are 1-indexed throughout (1 = January), matching
//! `chrono::Datelike::month()`.

mod categories;
mod monthly;
mod productivity;
mod weekly;

pub use categories::{category_breakdown, CategoryStats, UNCATEGORIZED};
pub use monthly::{
    monthly_statistics, GoalProgressDelta, GoalStats, MonthlyStatistics, MoodEnergyPoint,
    TimerStats,
};
pub use productivity::productivity_score;
pub use weekly::{weekly_trends, WeeklyTrend};
