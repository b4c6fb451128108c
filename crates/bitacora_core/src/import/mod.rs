//! Mapping from parsed records and hand-entered drafts to session store
//! insert commands.
//!
//! # Invariants
//! - Mapping is pure and preserves record order.
//! - A blank responsible maps to `None`.

use crate::model::project::ProjectId;
use crate::model::session::{ClientStatus, ParsedSessionRecord, SessionDraft, DEFAULT_TAG};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One session insert destined for the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSessionCommand {
    pub project_id: ProjectId,
    pub title: String,
    pub date: NaiveDate,
    pub tag: String,
    pub summary: String,
    pub client_responsible: Option<String>,
    pub client_status: ClientStatus,
}

impl InsertSessionCommand {
    pub fn from_record(record: &ParsedSessionRecord, project_id: ProjectId) -> Self {
        let responsible = record.client_responsible.trim();
        Self {
            project_id,
            title: record.title.clone(),
            date: record.date,
            tag: record.tag.clone(),
            summary: record.summary.clone(),
            client_responsible: (!responsible.is_empty()).then(|| responsible.to_string()),
            client_status: record.client_status,
        }
    }

    /// Trims the draft's text fields; a blank tag becomes `DEFAULT_TAG`.
    pub fn from_draft(draft: &SessionDraft, project_id: ProjectId) -> Self {
        let tag = match draft.tag.trim() {
            "" => DEFAULT_TAG,
            tag => tag,
        };
        Self {
            project_id,
            title: draft.title.trim().to_string(),
            date: draft.date,
            tag: tag.to_string(),
            summary: draft.summary.trim().to_string(),
            client_responsible: draft
                .client_responsible
                .as_deref()
                .map(str::trim)
                .filter(|responsible| !responsible.is_empty())
                .map(str::to_string),
            client_status: draft.client_status,
        }
    }
}

/// Maps parsed records to insert commands for `project_id`.
pub fn to_import_batch(
    records: &[ParsedSessionRecord],
    project_id: ProjectId,
) -> Vec<InsertSessionCommand> {
    records
        .iter()
        .map(|record| InsertSessionCommand::from_record(record, project_id))
        .collect()
}
