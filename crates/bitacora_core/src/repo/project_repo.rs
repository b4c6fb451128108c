//! Project directory contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve project display names to stable ids.
//! - Own project creation and the current phase column.
//!
//! # Invariants
//! - Project names are trimmed, non-blank and unique.
//! - Name resolution is exact (case-sensitive) on the trimmed name.

use crate::model::project::{ModelValidationError, Project, ProjectId, ProjectPhase};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT uuid, name, client_name, current_phase FROM projects";

/// Project name → id resolution plus project maintenance.
pub trait ProjectDirectory {
    fn create_project(&self, name: &str, client_name: &str) -> RepoResult<Project>;
    fn resolve_project_id(&self, name: &str) -> RepoResult<Option<ProjectId>>;
    fn find_project_by_name(&self, name: &str) -> RepoResult<Option<Project>>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists all projects sorted by name.
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    fn set_current_phase(&self, id: ProjectId, phase: ProjectPhase) -> RepoResult<()>;
}

/// SQLite-backed project directory.
pub struct SqliteProjectDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectDirectory<'conn> {
    /// Constructs a directory over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProjectDirectory for SqliteProjectDirectory<'_> {
    fn create_project(&self, name: &str, client_name: &str) -> RepoResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelValidationError::BlankProjectName.into());
        }
        if self.resolve_project_id(name)?.is_some() {
            return Err(RepoError::Duplicate(format!("project `{name}`")));
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            client_name: client_name.trim().to_string(),
            current_phase: ProjectPhase::default(),
        };
        self.conn.execute(
            "INSERT INTO projects (uuid, name, client_name, current_phase)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.client_name.as_str(),
                i64::from(project.current_phase.id()),
            ],
        )?;

        Ok(project)
    }

    fn resolve_project_id(&self, name: &str) -> RepoResult<Option<ProjectId>> {
        let uuid_text = self
            .conn
            .query_row(
                "SELECT uuid FROM projects WHERE name = ?1;",
                [name.trim()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        uuid_text
            .map(|value| parse_uuid(&value, "projects.uuid"))
            .transpose()
    }

    fn find_project_by_name(&self, name: &str) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name.trim()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY name ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn set_current_phase(&self, id: ProjectId, phase: ProjectPhase) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects SET current_phase = ?1 WHERE uuid = ?2;",
            params![i64::from(phase.id()), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(format!("project {id}")));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let phase_value: i64 = row.get("current_phase")?;
    let current_phase = ProjectPhase::from_id(phase_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid phase `{phase_value}` in projects.current_phase"
        ))
    })?;

    Ok(Project {
        id: parse_uuid(&uuid_text, "projects.uuid")?,
        name: row.get("name")?,
        client_name: row.get("client_name")?,
        current_phase,
    })
}
