//! Canonical calendar-day values.
//!
//! Every date that enters or leaves the core passes through
//! [`CompletionDate::parse`], which accepts only zero-padded `YYYY-MM-DD`
//! strings naming a real calendar day. Day arithmetic is done on
//! [`chrono::NaiveDate`], so "yesterday" is always exactly one day earlier with
//! no wall-clock or DST component.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HabitError;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// A naive calendar day, displayed and serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionDate(NaiveDate);

impl CompletionDate {
    /// Parse a canonical date string.
    ///
    /// Surrounding whitespace is ignored. Anything other than four digits,
    /// dash, two digits, dash, two digits naming a valid day is rejected with
    /// [`HabitError::InvalidDate`].
    pub fn parse(value: &str) -> Result<Self, HabitError> {
        let trimmed = value.trim();
        let invalid = || HabitError::InvalidDate {
            value: value.to_string(),
        };

        if !has_canonical_shape(trimmed) {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// The host's local calendar date.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// The previous calendar day, or `None` at the start of the representable range.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day, or `None` at the end of the representable range.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

/// Four ASCII digits, dash, two digits, dash, two digits.
fn has_canonical_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl From<NaiveDate> for CompletionDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CompletionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for CompletionDate {
    type Err = HabitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CompletionDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompletionDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
