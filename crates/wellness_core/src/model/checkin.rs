//! Check-in domain model.
//!
//! # Responsibility
//! - Define one persisted check-in entry (`CheckinRecord`).
//! - Define the caller-supplied part of an entry (`NewCheckin`).
//!
//! # Invariants
//! - Free-text fields are opaque; empty strings are valid.
//! - `goals` keeps caller order and defaults to an empty list.
//! - Timestamps carry second precision when written by this crate.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// One stored check-in entry.
///
/// Wire shape: `{timestamp, mood, energy, goals, summary}`. `timestamp` is a
/// naive local ISO-8601 string (`YYYY-MM-DDTHH:MM:SS`); fractional seconds
/// written by older tooling are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    /// Local wall-clock instant the entry was written.
    pub timestamp: NaiveDateTime,
    /// Self-reported mood in the user's own words.
    pub mood: String,
    /// Short energy description, e.g. `low`, `okay`, `high`.
    pub energy: String,
    /// Small goals or intentions for the day, in the order given.
    #[serde(default)]
    pub goals: Vec<String>,
    /// One or two sentence recap of the conversation.
    pub summary: String,
}

/// Caller-supplied content of a check-in, before the store stamps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCheckin {
    pub mood: String,
    pub energy: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub summary: String,
}

impl NewCheckin {
    /// Builds a check-in from tool arguments.
    ///
    /// `goals = None` is normalized to an empty list.
    pub fn new(
        mood: impl Into<String>,
        energy: impl Into<String>,
        goals: Option<Vec<String>>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            mood: mood.into(),
            energy: energy.into(),
            goals: goals.unwrap_or_default(),
            summary: summary.into(),
        }
    }

    /// Stamps this entry with `timestamp`, producing the stored shape.
    pub fn into_record(self, timestamp: NaiveDateTime) -> CheckinRecord {
        CheckinRecord {
            timestamp,
            mood: self.mood,
            energy: self.energy,
            goals: self.goals,
            summary: self.summary,
        }
    }
}

/// Current local time truncated to whole seconds.
pub fn checkin_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Returns the timestamp to assign after `previous`.
///
/// Never earlier than `previous`, so stored timestamps stay non-decreasing
/// even when the wall clock steps backwards.
pub fn next_timestamp(previous: Option<NaiveDateTime>, now: NaiveDateTime) -> NaiveDateTime {
    match previous {
        Some(previous) if previous > now => previous,
        _ => now,
    }
}
