use clap::Subcommand;
use goaltrack_core::goal::BigGoal;
use goaltrack_core::storage::Database;

use super::parse_date;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a big goal
    Add {
        /// Goal title
        title: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Category ID
        #[arg(long)]
        category: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List big goals as JSON
    List {
        /// Include archived goals
        #[arg(long)]
        archived: bool,
    },
    /// Show one big goal
    Show {
        /// Goal ID
        id: String,
    },
    /// Edit a big goal's fields
    Edit {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Category ID; empty string clears it
        #[arg(long)]
        category: Option<String>,
        /// Deadline (YYYY-MM-DD); empty string clears it
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Mark a goal completed
    Complete {
        /// Goal ID
        id: String,
    },
    /// Put a goal on hold
    Hold {
        /// Goal ID
        id: String,
    },
    /// Return a goal to the active state
    Reactivate {
        /// Goal ID
        id: String,
    },
    /// Archive a goal (reversible soft-hide)
    Archive {
        /// Goal ID
        id: String,
    },
    /// Restore an archived goal
    Restore {
        /// Goal ID
        id: String,
    },
    /// Permanently delete a goal and its small goals
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Add {
            title,
            description,
            category,
            deadline,
        } => {
            let mut goal = BigGoal::new(title);
            if let Some(description) = description {
                goal.description = description;
            }
            goal.category_id = category;
            if let Some(deadline) = deadline {
                goal.deadline = Some(parse_date(&deadline)?);
            }
            db.insert_big_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List { archived } => {
            let goals = db.big_goals(archived)?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Show { id } => {
            let goal = db.get_big_goal(&id)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Edit {
            id,
            title,
            description,
            category,
            deadline,
        } => {
            let mut goal = db.get_big_goal(&id)?;
            if let Some(title) = title {
                goal.title = title;
            }
            if let Some(description) = description {
                goal.description = description;
            }
            if let Some(category) = category {
                goal.category_id = (!category.is_empty()).then_some(category);
            }
            if let Some(deadline) = deadline {
                goal.deadline = if deadline.is_empty() {
                    None
                } else {
                    Some(parse_date(&deadline)?)
                };
            }
            db.update_big_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Complete { id } => {
            let mut goal = db.get_big_goal(&id)?;
            goal.complete();
            db.update_big_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Hold { id } => {
            let mut goal = db.get_big_goal(&id)?;
            goal.hold();
            db.update_big_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Reactivate { id } => {
            let mut goal = db.get_big_goal(&id)?;
            goal.reactivate();
            db.update_big_goal(&goal)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Archive { id } => {
            db.set_big_goal_archived(&id, true)?;
            println!("ok");
        }
        GoalAction::Restore { id } => {
            db.set_big_goal_archived(&id, false)?;
            println!("ok");
        }
        GoalAction::Delete { id } => {
            db.delete_big_goal(&id)?;
            println!("ok");
        }
    }
    Ok(())
}
