//! Per-category goal breakdown.

use serde::{Deserialize, Serialize};

use crate::goal::{BigGoal, Category, SmallGoal};

/// Label used when a goal has no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Goal counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub big_goals: u32,
    pub small_goals: u32,
    pub completed: u32,
}

impl CategoryStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            big_goals: 0,
            small_goals: 0,
            completed: 0,
        }
    }
}

/// Group goals by category name, in first-seen order.
///
/// A small goal belongs to its big goal's category; goals without a
/// category (or without a big goal at all) fall under
/// [`UNCATEGORIZED`].
pub fn category_breakdown(
    big_goals: &[BigGoal],
    small_goals: &[SmallGoal],
    categories: &[Category],
) -> Vec<CategoryStats> {
    let category_name = |category_id: Option<&str>| -> &str {
        category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    };

    let mut stats: Vec<CategoryStats> = Vec::new();
    let mut entry = |stats: &mut Vec<CategoryStats>, name: &str| -> usize {
        match stats.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                stats.push(CategoryStats::new(name));
                stats.len() - 1
            }
        }
    };

    for goal in big_goals {
        let name = category_name(goal.category_id.as_deref());
        let i = entry(&mut stats, name);
        stats[i].big_goals += 1;
    }

    for goal in small_goals {
        let big_goal = goal
            .big_goal_id
            .as_deref()
            .and_then(|id| big_goals.iter().find(|bg| bg.id == id));
        let name = category_name(big_goal.and_then(|bg| bg.category_id.as_deref()));
        let i = entry(&mut stats, name);
        stats[i].small_goals += 1;
        if goal.completed {
            stats[i].completed += 1;
        }
    }

    stats
}
