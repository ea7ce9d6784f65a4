//! Composite productivity score.
//!
//! A designed heuristic in 0..=100 blending mood, energy, goal progress
//! and focus-timer usage:
//!
//! ```text
//! 25 * (mood/5) + 25 * (energy/5) + 30 * (progress/100) + min(20, 20 * timer_secs/3600)
//! ```
//!
//! One hour of timer use earns the full timer component.

/// Compute the productivity score from the month's unrounded mood and
/// energy means, the rounded goal-progress score, and total timer
/// seconds. Rounded to the nearest integer.
pub fn productivity_score(
    mean_mood: f64,
    mean_energy: f64,
    goal_progress: f64,
    timer_secs: u64,
) -> u32 {
    let mood_score = (mean_mood / 5.0) * 25.0;
    let energy_score = (mean_energy / 5.0) * 25.0;
    let goal_score = (goal_progress / 100.0) * 30.0;
    let timer_score = ((timer_secs as f64 / 3600.0) * 20.0).min(20.0);

    (mood_score + energy_score + goal_score + timer_score)
        .round()
        .clamp(0.0, 100.0) as u32
}
