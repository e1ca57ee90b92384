//! Resolved user commands and their routing descriptors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One resolved user intent driving downstream action.
///
/// The set is closed by design: adding a command means extending this enum,
/// the resolver switch, and the renderer table together, and the compiler
/// checks the matches stay exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Command {
    /// Open a new ledger entry for `date`.
    NewEntry { date: NaiveDate },
    /// No recognizable intent. A valid terminal classification, not a
    /// failure.
    Undefined,
    /// Show yesterday's entries (fixed one-day lookback).
    SeeYesterday,
    /// Show entries newer than `value` `unit`s ago.
    SeeBeforeRelative { unit: String, value: f64 },
}

/// Navigation target carried by a command. Route handling itself is an
/// external collaborator's concern; only the fields travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub date: Option<NaiveDate>,
}

/// "Entries newer than N units" query filter accepted by the ledger
/// backend's fetch-all path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub intent: &'static str,
    pub unit: String,
    pub value: f64,
}

impl Command {
    /// The routing descriptor this command implies.
    pub fn route(&self) -> RouteDescriptor {
        match self {
            Command::NewEntry { date } => RouteDescriptor {
                path: "expense/new",
                date: Some(*date),
            },
            Command::Undefined => RouteDescriptor {
                path: "undefined-intent",
                date: None,
            },
            Command::SeeYesterday => RouteDescriptor {
                path: "see-yesterday",
                date: None,
            },
            Command::SeeBeforeRelative { .. } => RouteDescriptor {
                path: "see-before-relative",
                date: None,
            },
        }
    }

    /// The backend query filter, for the commands that read the ledger.
    pub fn entry_filter(&self) -> Option<EntryFilter> {
        match self {
            Command::SeeYesterday => Some(EntryFilter {
                intent: "see-yesterday",
                unit: "day".to_string(),
                value: 1.0,
            }),
            Command::SeeBeforeRelative { unit, value } => Some(EntryFilter {
                intent: "see-before-relative",
                unit: unit.clone(),
                value: *value,
            }),
            Command::NewEntry { .. } | Command::Undefined => None,
        }
    }
}
