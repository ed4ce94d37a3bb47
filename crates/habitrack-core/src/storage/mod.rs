mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, DisplayConfig, LoggingConfig, StorageConfig};
pub use database::HabitDb;

use std::path::PathBuf;

use crate::error::Result;
use crate::habit::{CompletionDate, Habit, HabitId};

/// Persistence collaborator for habit records.
///
/// Implementations must report a missing habit as
/// [`HabitError::NotFound`](crate::error::HabitError::NotFound), list habits
/// newest-created first, and apply [`HabitStore::toggle_completion`] as one
/// atomic read-modify-write.
pub trait HabitStore {
    fn insert(&self, habit: &Habit) -> Result<()>;
    fn load(&self, id: &HabitId) -> Result<Habit>;
    fn list(&self) -> Result<Vec<Habit>>;
    /// Persist the full record, completions included, over an existing habit.
    fn save(&self, habit: &Habit) -> Result<()>;
    fn delete(&self, id: &HabitId) -> Result<()>;
    /// Flip `day` against the latest stored completions and return the result.
    fn toggle_completion(&self, id: &HabitId, day: CompletionDate) -> Result<Habit>;
}

/// Returns the directory holding the database and config file.
///
/// `HABITRACK_DATA_DIR` wins when set. Otherwise `~/.config/habitrack`, or
/// `~/.config/habitrack-dev` with `HABITRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HABITRACK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitrack-dev")
            } else {
                base_dir.join("habitrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
