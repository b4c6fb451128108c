//! Notes import use-case: preview then commit.
//!
//! # Responsibility
//! - Parse pasted notes into a caller-owned preview buffer.
//! - Resolve the target project and submit the whole preview as one batch.
//!
//! # Invariants
//! - Nothing is written when the preview is empty or the project is unknown.
//! - A store failure commits nothing; there is no automatic retry.
//! - The preview stays with the caller on failure so submission can be
//!   re-triggered.

use crate::import::to_import_batch;
use crate::model::project::ProjectId;
use crate::model::session::{ParsedSessionRecord, SessionRecord};
use crate::parser::parse;
use crate::repo::project_repo::ProjectDirectory;
use crate::repo::session_repo::SessionStore;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure of a notes import submission.
#[derive(Debug)]
pub enum ImportError {
    /// Commit was requested before any record was previewed.
    EmptyPreview,
    /// Target project name does not resolve.
    ProjectNotFound(String),
    /// Project lookup itself failed.
    Directory(RepoError),
    /// Session store rejected the batch.
    Store(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPreview => write!(f, "nothing to import: preview the notes first"),
            Self::ProjectNotFound(name) => write!(f, "project not found: `{name}`"),
            Self::Directory(err) => write!(f, "project lookup failed: {err}"),
            Self::Store(err) => write!(f, "session store rejected the import: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Directory(err) | Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Parsed records awaiting confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPreview {
    records: Vec<ParsedSessionRecord>,
}

impl ImportPreview {
    /// Parses `raw_text`, defaulting undated blocks to `current_date`.
    pub fn from_text(raw_text: &str, current_date: NaiveDate) -> Self {
        let records = parse(raw_text, current_date);
        debug!(
            "event=notes_preview module=service status=ok input_chars={} records={}",
            raw_text.chars().count(),
            records.len()
        );
        Self { records }
    }

    pub fn records(&self) -> &[ParsedSessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of a committed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub project_id: ProjectId,
    /// Stored sessions in preview order, with store-assigned ids.
    pub sessions: Vec<SessionRecord>,
}

impl ImportOutcome {
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

/// Import facade over a project directory and a session store.
pub struct ImportService<P: ProjectDirectory, S: SessionStore> {
    projects: P,
    sessions: S,
}

impl<P: ProjectDirectory, S: SessionStore> ImportService<P, S> {
    pub fn new(projects: P, sessions: S) -> Self {
        Self { projects, sessions }
    }

    /// Parses pasted notes for review. Never fails.
    pub fn preview(&self, raw_text: &str, current_date: NaiveDate) -> ImportPreview {
        ImportPreview::from_text(raw_text, current_date)
    }

    /// Submits every previewed record to `project_name` as one batch.
    ///
    /// # Errors
    /// - `EmptyPreview` when `preview` holds no records.
    /// - `ProjectNotFound` when the name does not resolve; nothing is inserted.
    /// - `Directory` / `Store` with the underlying repository error.
    pub fn commit(
        &self,
        project_name: &str,
        preview: &ImportPreview,
    ) -> Result<ImportOutcome, ImportError> {
        if preview.is_empty() {
            return Err(ImportError::EmptyPreview);
        }

        let started_at = Instant::now();
        info!(
            "event=notes_import module=service status=start records={}",
            preview.len()
        );

        let project_id = match self.projects.resolve_project_id(project_name) {
            Ok(Some(project_id)) => project_id,
            Ok(None) => {
                error!(
                    "event=notes_import module=service status=error error_code=project_not_found duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Err(ImportError::ProjectNotFound(project_name.trim().to_string()));
            }
            Err(err) => {
                error!(
                    "event=notes_import module=service status=error error_code=project_lookup_failed error={err}"
                );
                return Err(ImportError::Directory(err));
            }
        };

        let batch = to_import_batch(preview.records(), project_id);
        match self.sessions.insert_sessions(&batch) {
            Ok(sessions) => {
                info!(
                    "event=notes_import module=service status=ok project_id={project_id} inserted={} duration_ms={}",
                    sessions.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ImportOutcome {
                    project_id,
                    sessions,
                })
            }
            Err(err) => {
                error!(
                    "event=notes_import module=service status=error error_code=store_rejected project_id={project_id} error={err}"
                );
                Err(ImportError::Store(err))
            }
        }
    }
}
