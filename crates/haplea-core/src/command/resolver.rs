//! Maps a classified-entity bundle to exactly one [`Command`].
//!
//! Resolution is a total, pure mapping: every bundle produces a command,
//! malformed or missing fields fall back to defaults, and nothing here
//! touches the network. The only ambient read is the local clock for the
//! entry-date default.

use chrono::{DateTime, Local, NaiveDate};

use super::entities::EntityBundle;
use super::model::Command;

/// Resolves an entity bundle into a command.
///
/// The first intent candidate is taken as authoritative regardless of its
/// confidence; the classifier is assumed to put its best guess at index 0.
pub fn resolve(bundle: &EntityBundle) -> Command {
    let Some(candidate) = bundle.top_intent() else {
        return Command::Undefined;
    };

    match candidate.value.as_str() {
        "new-entry" => Command::NewEntry {
            date: entry_date(bundle),
        },
        "see-yesterday" => Command::SeeYesterday,
        "see-before-relative" => see_before_relative(bundle),
        _ => Command::Undefined,
    }
}

/// Entry date from the first datetime entity, or today when the entity is
/// absent, malformed, or not a valid calendar date.
fn entry_date(bundle: &EntityBundle) -> NaiveDate {
    bundle
        .datetime
        .first()
        .and_then(|entity| parse_iso_date(&entity.value))
        .unwrap_or_else(|| Local::now().date_naive())
}

/// Accepts both date-only (`2024-03-05`) and full RFC 3339 datetime values.
fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

fn see_before_relative(bundle: &EntityBundle) -> Command {
    // A missing or zeroed duration degrades to the same one-day lookback
    // as see-yesterday.
    let (unit, value) = bundle
        .duration
        .first()
        .filter(|d| !d.unit.is_empty() && d.value > 0.0)
        .map(|d| (d.unit.clone(), d.value))
        .unwrap_or_else(|| ("day".to_string(), 1.0));

    Command::SeeBeforeRelative { unit, value }
}
