//! Habit use-case service.
//!
//! One method per transport operation. Validation and date parsing happen
//! before the store is touched, so a rejected request never causes a partial
//! write.

use serde::Serialize;

use crate::error::Result;
use crate::habit::{CompletionDate, Habit, HabitId};
use crate::storage::HabitStore;

/// A habit together with its derived state for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub today: CompletionDate,
    pub completed_today: bool,
    pub current_streak: u32,
}

impl HabitStatus {
    /// Derive the status of `habit` as seen on `today`.
    pub fn of(habit: Habit, today: CompletionDate) -> Self {
        Self {
            completed_today: habit.is_completed_on(today),
            current_streak: habit.current_streak(today),
            habit,
            today,
        }
    }
}

/// Use-case service wrapper over a [`HabitStore`].
pub struct HabitService<S: HabitStore> {
    store: S,
}

impl<S: HabitStore> HabitService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All habits, newest first.
    pub fn list(&self) -> Result<Vec<Habit>> {
        self.store.list()
    }

    pub fn get(&self, id: &HabitId) -> Result<Habit> {
        self.store.load(id)
    }

    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Habit> {
        let habit = Habit::new(name, description)?;
        self.store.insert(&habit)?;
        tracing::info!(habit_id = %habit.id, name = %habit.name, "created habit");
        Ok(habit)
    }

    /// Rename a habit. A `None` description keeps the stored one.
    pub fn update(&self, id: &HabitId, name: &str, description: Option<&str>) -> Result<Habit> {
        let mut habit = self.store.load(id)?;
        habit.rename(name, description)?;
        self.store.save(&habit)?;
        tracing::info!(habit_id = %habit.id, "updated habit");
        Ok(habit)
    }

    pub fn delete(&self, id: &HabitId) -> Result<()> {
        self.store.delete(id)?;
        tracing::info!(habit_id = %id, "deleted habit");
        Ok(())
    }

    /// Flip completion of `date` for habit `id`.
    ///
    /// The date is parsed before the habit is loaded, so an invalid date is
    /// reported even for a missing habit and nothing is written.
    pub fn toggle(&self, id: &HabitId, date: &str) -> Result<Habit> {
        let day = CompletionDate::parse(date)?;
        let habit = self.store.toggle_completion(id, day)?;
        tracing::debug!(
            habit_id = %id,
            day = %day,
            completed = habit.is_completed_on(day),
            "toggled completion"
        );
        Ok(habit)
    }

    pub fn status(&self, id: &HabitId, today: CompletionDate) -> Result<HabitStatus> {
        Ok(HabitStatus::of(self.store.load(id)?, today))
    }

    pub fn status_all(&self, today: CompletionDate) -> Result<Vec<HabitStatus>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|habit| HabitStatus::of(habit, today))
            .collect())
    }
}
