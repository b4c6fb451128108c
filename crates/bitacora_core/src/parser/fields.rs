//! Line classification for note blocks.
//!
//! # Responsibility
//! - Map one line to the field it populates through an ordered marker table.
//! - Normalize `d/m/y` dates and free-text client statuses.
//!
//! # Invariants
//! - Marker labels match case-insensitively on the text before the first
//!   colon; the value is everything after it, trimmed.
//! - Status rules are evaluated top to bottom, so not-done phrases win over
//!   the `realizado`/`done` substrings they contain.

use crate::model::session::ClientStatus;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})\b").expect("valid d/m/y regex")
});
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex"));

/// Field populated by a marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Date,
    Tag,
    Responsible,
    Status,
}

struct Marker {
    field: Field,
    labels: &'static [&'static str],
}

const MARKERS: &[Marker] = &[
    Marker {
        field: Field::Title,
        labels: &["título", "titulo", "title"],
    },
    Marker {
        field: Field::Date,
        labels: &["fecha", "date"],
    },
    Marker {
        field: Field::Tag,
        labels: &["etiqueta", "tag"],
    },
    Marker {
        field: Field::Responsible,
        labels: &["responsable", "responsible"],
    },
    Marker {
        field: Field::Status,
        labels: &["estado", "status"],
    },
];

const STATUS_RULES: &[(&[&str], ClientStatus)] = &[
    (
        &["no realizado", "no_realizado", "not done", "not_done"],
        ClientStatus::NotDone,
    ),
    (&["realizado", "done"], ClientStatus::Done),
    (&["postergado", "deferred"], ClientStatus::Deferred),
];

/// Classification of one non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `label: value` line with a recognized label.
    Marker { field: Field, value: &'a str },
    /// Unlabelled line carrying a `d/m/y` date.
    BareDate(NaiveDate),
    /// Anything else.
    Text,
}

/// Classifies a trimmed, non-empty line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some((field, value)) = match_marker(line) {
        return LineKind::Marker { field, value };
    }
    match extract_day_month_year(line) {
        Some(date) => LineKind::BareDate(date),
        None => LineKind::Text,
    }
}

fn match_marker(line: &str) -> Option<(Field, &str)> {
    let (label, value) = line.split_once(':')?;
    let label = label.trim().to_lowercase();
    MARKERS
        .iter()
        .find(|marker| marker.labels.contains(&label.as_str()))
        .map(|marker| (marker.field, value.trim()))
}

/// Extracts the date carried by a date marker value.
///
/// Accepts `d/m/y` (`/` or `-`, 2 or 4 digit year) and `YYYY-MM-DD`.
pub fn extract_marker_date(value: &str) -> Option<NaiveDate> {
    extract_day_month_year(value).or_else(|| extract_iso_date(value))
}

/// Extracts the first `d/m/y` date in `text`.
///
/// Two-digit years are read as `20yy`. Returns `None` for impossible
/// calendar dates such as `31/02/2025`.
pub fn extract_day_month_year(text: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR_RE.captures(text)?;
    let day = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let month = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let year_text = caps.get(3)?.as_str();
    let mut year = year_text.parse::<i32>().ok()?;
    if year_text.len() == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn extract_iso_date(text: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE_RE.captures(text)?;
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let month = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let day = caps.get(3)?.as_str().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Maps a status marker value to a client status.
///
/// Returns `None` when the value names no known status, leaving the
/// block's current status untouched.
pub fn status_from_value(value: &str) -> Option<ClientStatus> {
    let lowered = value.to_lowercase();
    STATUS_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, status)| *status)
}
