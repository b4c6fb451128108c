//! Session record model.
//!
//! # Responsibility
//! - Define the parser output (`ParsedSessionRecord`) and the persisted
//!   read model (`SessionRecord`).
//! - Own the closed `ClientStatus` vocabulary and its storage names.
//!
//! # Invariants
//! - A `ParsedSessionRecord` always has a non-empty `title`.
//! - `summary` never exceeds `SUMMARY_MAX_CHARS` characters when produced
//!   by the parser.

use crate::model::project::{ModelValidationError, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned by the session store.
pub type SessionId = Uuid;

/// Tag used when a note block carries no tag marker.
pub const DEFAULT_TAG: &str = "Sesión";
/// Maximum title length, in characters, when the title falls back to the
/// first line of a block.
pub const TITLE_FALLBACK_MAX_CHARS: usize = 100;
/// Maximum summary length, in characters.
pub const SUMMARY_MAX_CHARS: usize = 1000;
/// Minimum trimmed title length for a session entered by hand.
pub const MIN_SESSION_TITLE_CHARS: usize = 3;
/// Minimum trimmed summary length for a session entered by hand.
pub const MIN_SESSION_SUMMARY_CHARS: usize = 10;

/// Whether the client-side commitment tied to a session was fulfilled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    /// Commitment fulfilled.
    Done,
    /// Commitment postponed. Default when nothing was recorded.
    #[default]
    Deferred,
    /// Commitment not fulfilled.
    NotDone,
}

impl ClientStatus {
    /// Storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Deferred => "deferred",
            Self::NotDone => "not_done",
        }
    }

    /// Parses a storage/wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "done" => Some(Self::Done),
            "deferred" => Some(Self::Deferred),
            "not_done" => Some(Self::NotDone),
            _ => None,
        }
    }

    /// Human-readable Spanish label used by the CLI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Done => "Realizado",
            Self::Deferred => "Postergado",
            Self::NotDone => "No realizado",
        }
    }
}

/// Structured output of parsing one note block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSessionRecord {
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub tag: String,
    pub summary: String,
    /// Empty when no responsible marker was found.
    pub client_responsible: String,
    pub client_status: ClientStatus,
}

/// Persisted session row returned by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub project_id: ProjectId,
    pub title: String,
    pub date: NaiveDate,
    pub tag: String,
    pub summary: String,
    pub client_responsible: Option<String>,
    pub client_status: ClientStatus,
    /// Insert timestamp in epoch milliseconds.
    pub created_at: i64,
}

/// Session typed in directly by the consultant, outside the notes import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub title: String,
    pub date: NaiveDate,
    /// Blank means `DEFAULT_TAG`.
    pub tag: String,
    pub summary: String,
    pub client_responsible: Option<String>,
    pub client_status: ClientStatus,
}

impl SessionDraft {
    /// Checks minimum lengths on the trimmed title and summary.
    ///
    /// # Errors
    /// - `SessionTitleTooShort` below `MIN_SESSION_TITLE_CHARS`.
    /// - `SessionSummaryTooShort` below `MIN_SESSION_SUMMARY_CHARS`.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        let title_chars = self.title.trim().chars().count();
        if title_chars < MIN_SESSION_TITLE_CHARS {
            return Err(ModelValidationError::SessionTitleTooShort(title_chars));
        }
        let summary_chars = self.summary.trim().chars().count();
        if summary_chars < MIN_SESSION_SUMMARY_CHARS {
            return Err(ModelValidationError::SessionSummaryTooShort(summary_chars));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientStatus, SessionDraft};
    use crate::model::project::ModelValidationError;
    use chrono::NaiveDate;

    fn draft(title: &str, summary: &str) -> SessionDraft {
        SessionDraft {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 2, 3).expect("valid date"),
            tag: String::new(),
            summary: summary.to_string(),
            client_responsible: None,
            client_status: ClientStatus::default(),
        }
    }

    #[test]
    fn draft_lengths_are_measured_after_trimming() {
        assert_eq!(
            draft("  ab  ", "Resumen suficiente").validate(),
            Err(ModelValidationError::SessionTitleTooShort(2))
        );
        assert_eq!(
            draft("Cierre", "  corto   ").validate(),
            Err(ModelValidationError::SessionSummaryTooShort(5))
        );
        assert_eq!(draft("Ñam", "ñandú ñandú").validate(), Ok(()));
    }

    #[test]
    fn client_status_defaults_to_deferred() {
        assert_eq!(ClientStatus::default(), ClientStatus::Deferred);
    }

    #[test]
    fn client_status_storage_names_are_stable() {
        for status in [
            ClientStatus::Done,
            ClientStatus::Deferred,
            ClientStatus::NotDone,
        ] {
            assert_eq!(ClientStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ClientStatus::parse("realizado"), None);
    }

    #[test]
    fn client_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&ClientStatus::NotDone).expect("status should serialize");
        assert_eq!(json, "\"not_done\"");
    }
}
