//! Habit records.
//!
//! A [`Habit`] owns its identity, metadata and the [`CompletionSet`] of days it
//! was done. Name and description are normalized and validated here, so every
//! `Habit` value satisfies its invariants regardless of which caller built it.

pub mod completions;
pub mod date;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use completions::CompletionSet;
pub use date::CompletionDate;

use crate::error::ValidationError;
use crate::streak;

/// Maximum habit name length, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum habit description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Opaque habit identifier (UUID v4 string). Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for HabitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked habit and its completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completions: CompletionSet,
}

/// Result of flipping one day's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added(CompletionDate),
    Removed(CompletionDate),
}

impl Toggled {
    pub fn day(self) -> CompletionDate {
        match self {
            Toggled::Added(day) | Toggled::Removed(day) => day,
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, Toggled::Added(_))
    }
}

impl Habit {
    /// Create a habit with a fresh id and no completions.
    ///
    /// # Errors
    /// [`ValidationError`] if the trimmed name is empty or either field is
    /// over its length bound.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        Self::new_at(name, description, Utc::now())
    }

    /// Same as [`Habit::new`] with an explicit creation timestamp.
    pub fn new_at(
        name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let (name, description) = normalize_fields(name, description.unwrap_or(""))?;
        Ok(Self {
            id: HabitId::generate(),
            name,
            description,
            created_at: now,
            updated_at: now,
            completions: CompletionSet::new(),
        })
    }

    /// Replace name and description.
    ///
    /// A `None` description keeps the current one. On error the habit is left
    /// untouched; `id`, `created_at` and `completions` never change.
    pub fn rename(&mut self, name: &str, description: Option<&str>) -> Result<(), ValidationError> {
        let description = description.unwrap_or(&self.description);
        let (name, description) = normalize_fields(name, description)?;
        self.name = name;
        self.description = description;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Check the field invariants of a habit built or edited outside
    /// [`Habit::new`] and [`Habit::rename`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (name, description) = normalize_fields(&self.name, &self.description)?;
        if name != self.name {
            return Err(ValidationError::Untrimmed { field: "name" });
        }
        if description != self.description {
            return Err(ValidationError::Untrimmed {
                field: "description",
            });
        }
        Ok(())
    }

    pub fn is_completed_on(&self, day: CompletionDate) -> bool {
        streak::is_completed_on(&self.completions, day)
    }

    pub fn current_streak(&self, today: CompletionDate) -> u32 {
        streak::current_streak(&self.completions, today)
    }

    /// Flip completion for `day` in place.
    pub fn toggle(&mut self, day: CompletionDate) -> Toggled {
        let toggled = if streak::toggle_in_place(&mut self.completions, day) {
            Toggled::Added(day)
        } else {
            Toggled::Removed(day)
        };
        self.updated_at = Utc::now();
        toggled
    }
}

/// Trim both fields and check their bounds.
pub fn normalize_fields(
    name: &str,
    description: &str,
) -> Result<(String, String), ValidationError> {
    let name = name.trim();
    let description = description.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            len,
            max: NAME_MAX_CHARS,
        });
    }
    let len = description.chars().count();
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: DESCRIPTION_MAX_CHARS,
        });
    }

    Ok((name.to_string(), description.to_string()))
}
