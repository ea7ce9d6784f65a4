pub mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns the application data directory.
///
/// `GOALTRACK_HOME` overrides the location entirely (used by tests);
/// otherwise `~/.config/goaltrack[-dev]` based on `GOALTRACK_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let dir = if let Ok(home) = std::env::var("GOALTRACK_HOME") {
        PathBuf::from(home)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("GOALTRACK_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("goaltrack-dev")
        } else {
            base_dir.join("goaltrack")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_override_wins_and_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("nested");
        std::env::set_var("GOALTRACK_HOME", &home);
        let resolved = data_dir().unwrap();
        std::env::remove_var("GOALTRACK_HOME");

        assert_eq!(resolved, home);
        assert!(resolved.is_dir());
    }
}
