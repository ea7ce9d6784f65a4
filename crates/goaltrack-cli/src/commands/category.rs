use clap::Subcommand;
use goaltrack_core::goal::Category;
use goaltrack_core::storage::Database;

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add {
        /// Category name
        name: String,
    },
    /// List all categories as JSON
    List,
    /// Rename a category
    Rename {
        /// Category ID
        id: String,
        /// New name
        name: String,
    },
    /// Delete a category; its goals become uncategorized
    Delete {
        /// Category ID
        id: String,
    },
}

pub fn run(action: CategoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        CategoryAction::Add { name } => {
            let category = Category::new(name);
            db.insert_category(&category)?;
            println!("{}", serde_json::to_string_pretty(&category)?);
        }
        CategoryAction::List => {
            let categories = db.categories()?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        CategoryAction::Rename { id, name } => {
            db.rename_category(&id, &name)?;
            println!("ok");
        }
        CategoryAction::Delete { id } => {
            db.delete_category(&id)?;
            println!("ok");
        }
    }
    Ok(())
}
