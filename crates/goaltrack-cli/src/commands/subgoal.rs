use clap::Subcommand;
use goaltrack_core::goal::SmallGoal;
use goaltrack_core::storage::Database;

use super::parse_date;

#[derive(Subcommand)]
pub enum SubgoalAction {
    /// Create a small goal
    Add {
        /// Goal title
        title: String,
        /// Numeric target to reach
        #[arg(long)]
        target: f64,
        /// Unit of measurement (e.g. "km", "pages")
        #[arg(long, default_value = "")]
        unit: String,
        /// Owning big goal ID
        #[arg(long)]
        goal: Option<String>,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List small goals as JSON
    List {
        /// Include archived goals
        #[arg(long)]
        archived: bool,
    },
    /// Show one small goal
    Show {
        /// Goal ID
        id: String,
    },
    /// Add progress toward the target
    Progress {
        /// Goal ID
        id: String,
        /// Value to add (negative values are ignored)
        value: f64,
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
}

pub fn run(action: SubgoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SubgoalAction::Add {
            title,
            target,
            unit,
            goal,
            description,
            deadline,
        } => {
            let mut subgoal = SmallGoal::new(title, target, unit);
            subgoal.big_goal_id = goal;
            if let Some(description) = description {
                subgoal.description = description;
            }
            if let Some(deadline) = deadline {
                subgoal.deadline = Some(parse_date(&deadline)?);
            }
            db.insert_small_goal(&subgoal)?;
            println!("{}", serde_json::to_string_pretty(&subgoal)?);
        }
        SubgoalAction::List { archived } => {
            let goals = db.small_goals(archived)?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        SubgoalAction::Show { id } => {
            let goal = db.get_small_goal(&id)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        SubgoalAction::Progress { id, value } => {
            let goal = db.record_goal_progress(&id, value)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        SubgoalAction::Archive { id } => {
            db.set_small_goal_archived(&id, true)?;
            println!("ok");
        }
        SubgoalAction::Restore { id } => {
            db.set_small_goal_archived(&id, false)?;
            println!("ok");
        }
    }
    Ok(())
}
