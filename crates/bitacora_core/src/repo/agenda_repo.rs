//! Next-session agenda persistence.

use crate::model::project::{NextSession, ProjectId};
use crate::repo::{date_to_db, ensure_connection_ready, parse_date, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Storage for the agenda planned for each project's next session.
pub trait AgendaRepository {
    /// Replaces the stored agenda for `project_id`.
    fn save_next_session(&self, project_id: ProjectId, agenda: &NextSession) -> RepoResult<()>;
    fn get_next_session(&self, project_id: ProjectId) -> RepoResult<Option<NextSession>>;
}

pub struct SqliteAgendaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgendaRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AgendaRepository for SqliteAgendaRepository<'_> {
    fn save_next_session(&self, project_id: ProjectId, agenda: &NextSession) -> RepoResult<()> {
        let topic = |index: usize| agenda.topics.get(index).map(String::as_str);
        self.conn.execute(
            "INSERT INTO next_sessions (project_uuid, session_date, topic_1, topic_2, topic_3)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (project_uuid) DO UPDATE SET
                session_date = excluded.session_date,
                topic_1 = excluded.topic_1,
                topic_2 = excluded.topic_2,
                topic_3 = excluded.topic_3,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                project_id.to_string(),
                agenda.date.map(date_to_db),
                topic(0),
                topic(1),
                topic(2),
            ],
        )?;
        Ok(())
    }

    fn get_next_session(&self, project_id: ProjectId) -> RepoResult<Option<NextSession>> {
        let row = self
            .conn
            .query_row(
                "SELECT session_date, topic_1, topic_2, topic_3
                 FROM next_sessions
                 WHERE project_uuid = ?1;",
                [project_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        [
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, Option<String>>(3)?,
                        ],
                    ))
                },
            )
            .optional()?;

        let Some((date_text, topics)) = row else {
            return Ok(None);
        };
        let date = date_text
            .map(|value| parse_date(&value, "next_sessions.session_date"))
            .transpose()?;
        let agenda = NextSession::new(date, topics.iter().flatten())?;
        Ok(Some(agenda))
    }
}
