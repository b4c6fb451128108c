//! Session store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist batches of imported sessions and assign their identity.
//! - List a project's sessions for timelines.
//!
//! # Invariants
//! - `insert_sessions` runs in one transaction: every command is persisted
//!   or none is.
//! - Returned records keep input order.
//! - Listing order is `session_date DESC`, then insertion order.

use crate::import::InsertSessionCommand;
use crate::model::project::ProjectId;
use crate::model::session::{ClientStatus, SessionRecord};
use crate::repo::{
    date_to_db, ensure_connection_ready, parse_date, parse_uuid, RepoError, RepoResult,
};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Durable storage of session records.
pub trait SessionStore {
    /// Persists all commands atomically and returns the stored records.
    fn insert_sessions(&self, batch: &[InsertSessionCommand]) -> RepoResult<Vec<SessionRecord>>;
    fn list_sessions(&self, project_id: ProjectId) -> RepoResult<Vec<SessionRecord>>;
}

/// SQLite-backed session store.
pub struct SqliteSessionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionStore<'conn> {
    /// Constructs a store over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn insert_sessions(&self, batch: &[InsertSessionCommand]) -> RepoResult<Vec<SessionRecord>> {
        let created_at = Utc::now().timestamp_millis();
        // Rolls back on drop unless committed.
        let tx = self.conn.unchecked_transaction()?;
        let mut stored = Vec::with_capacity(batch.len());

        for command in batch {
            if command.title.trim().is_empty() {
                return Err(RepoError::InvalidData(
                    "session title cannot be blank".to_string(),
                ));
            }

            let record = SessionRecord {
                id: Uuid::new_v4(),
                project_id: command.project_id,
                title: command.title.clone(),
                date: command.date,
                tag: command.tag.clone(),
                summary: command.summary.clone(),
                client_responsible: command.client_responsible.clone(),
                client_status: command.client_status,
                created_at,
            };
            tx.execute(
                "INSERT INTO sessions (
                    uuid,
                    project_uuid,
                    title,
                    session_date,
                    tag,
                    summary,
                    client_responsible,
                    client_status,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    record.id.to_string(),
                    record.project_id.to_string(),
                    record.title.as_str(),
                    date_to_db(record.date),
                    record.tag.as_str(),
                    record.summary.as_str(),
                    record.client_responsible.as_deref(),
                    record.client_status.as_str(),
                    record.created_at,
                ],
            )?;
            stored.push(record);
        }

        tx.commit()?;
        Ok(stored)
    }

    fn list_sessions(&self, project_id: ProjectId) -> RepoResult<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                uuid,
                project_uuid,
                title,
                session_date,
                tag,
                summary,
                client_responsible,
                client_status,
                created_at
             FROM sessions
             WHERE project_uuid = ?1
             ORDER BY session_date DESC, rowid ASC;",
        )?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }
        Ok(sessions)
    }
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<SessionRecord> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;
    let date_text: String = row.get("session_date")?;
    let status_text: String = row.get("client_status")?;
    let client_status = ClientStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid client status `{status_text}` in sessions.client_status"
        ))
    })?;

    Ok(SessionRecord {
        id: parse_uuid(&uuid_text, "sessions.uuid")?,
        project_id: parse_uuid(&project_text, "sessions.project_uuid")?,
        title: row.get("title")?,
        date: parse_date(&date_text, "sessions.session_date")?,
        tag: row.get("tag")?,
        summary: row.get("summary")?,
        client_responsible: row.get("client_responsible")?,
        client_status,
        created_at: row.get("created_at")?,
    })
}
