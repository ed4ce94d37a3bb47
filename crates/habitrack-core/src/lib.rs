//! # Habitrack Core Library
//!
//! This library provides the core logic for habitrack, a daily habit tracker.
//! The CLI binary is a thin transport layer over the same library.
//!
//! ## Architecture
//!
//! - **Habit Record**: a validated habit with its set of completion days
//! - **Streak Engine**: pure functions for membership, toggling and the
//!   current streak, always given an explicit "today"
//! - **Storage**: SQLite habit storage and TOML-based configuration
//! - **Service**: use cases that combine storage with the streak engine
//!
//! ## Key Components
//!
//! - [`Habit`]: the habit record
//! - [`CompletionDate`] / [`CompletionSet`]: canonical days and the set of them
//! - [`streak`]: `is_completed_on`, `toggle`, `current_streak`
//! - [`HabitDb`]: persistence, implementing [`HabitStore`]
//! - [`HabitService`]: create, update, delete, toggle, status

pub mod error;
pub mod habit;
pub mod service;
pub mod storage;
pub mod streak;

pub use error::{ConfigError, CoreError, DatabaseError, HabitError, ValidationError};
pub use habit::{CompletionDate, CompletionSet, Habit, HabitId, Toggled};
pub use service::{HabitService, HabitStatus};
pub use storage::{Config, HabitDb, HabitStore};
