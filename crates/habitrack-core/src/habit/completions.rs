//! The set of days on which a habit was completed.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::date::CompletionDate;
use crate::error::HabitError;

/// A finite set of completion days.
///
/// Uniqueness is structural: a day is either a member or it is not. The set
/// iterates in ascending date order, so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<CompletionDate>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from date strings, failing on the first malformed entry.
    /// Duplicate entries collapse into one.
    pub fn parse<I, S>(days: I) -> Result<Self, HabitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        days.into_iter()
            .map(|s| CompletionDate::parse(s.as_ref()))
            .collect()
    }

    pub fn contains(&self, day: CompletionDate) -> bool {
        self.0.contains(&day)
    }

    /// Add `day`; returns false if it was already present.
    pub fn insert(&mut self, day: CompletionDate) -> bool {
        self.0.insert(day)
    }

    /// Remove `day`; returns false if it was not present.
    pub fn remove(&mut self, day: CompletionDate) -> bool {
        self.0.remove(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Days in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CompletionDate> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<CompletionDate> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = CompletionDate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CompletionSet {
    type Item = CompletionDate;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, CompletionDate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl<'de> Deserialize<'de> for CompletionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<CompletionDate>::deserialize(deserializer)?;
        Ok(days.into_iter().collect())
    }
}
