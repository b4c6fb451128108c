//! Project use-cases: directory maintenance, hand-entered sessions, phase
//! roadmap and next-session agenda.

use crate::model::project::{
    roadmap, ModelValidationError, NextSession, Project, ProjectPhase, RoadmapStep,
};
use crate::import::InsertSessionCommand;
use crate::model::session::{SessionDraft, SessionRecord};
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::project_repo::ProjectDirectory;
use crate::repo::session_repo::SessionStore;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ProjectServiceError {
    ProjectNotFound(String),
    Validation(ModelValidationError),
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(name) => write!(f, "project not found: `{name}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ProjectNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ModelValidationError> for ProjectServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Current phase of a project with its full roadmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoadmap {
    pub project: Project,
    pub steps: Vec<RoadmapStep>,
}

/// Project facade for the consultant-side dashboard.
pub struct ProjectService<P: ProjectDirectory, S: SessionStore, A: AgendaRepository> {
    projects: P,
    sessions: S,
    agenda: A,
}

impl<P, S, A> ProjectService<P, S, A>
where
    P: ProjectDirectory,
    S: SessionStore,
    A: AgendaRepository,
{
    pub fn new(projects: P, sessions: S, agenda: A) -> Self {
        Self {
            projects,
            sessions,
            agenda,
        }
    }

    pub fn create_project(
        &self,
        name: &str,
        client_name: &str,
    ) -> Result<Project, ProjectServiceError> {
        let project = self.projects.create_project(name, client_name)?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.projects.list_projects()?)
    }

    /// Sessions of a project, newest date first.
    pub fn sessions(&self, project_name: &str) -> Result<Vec<SessionRecord>, ProjectServiceError> {
        let project = self.require_project(project_name)?;
        Ok(self.sessions.list_sessions(project.id)?)
    }

    /// Stores one session typed in by the consultant.
    ///
    /// # Errors
    /// - `Validation` when the trimmed title or summary is too short; nothing
    ///   is written and the project is not looked up.
    /// - `ProjectNotFound` when `project_name` does not resolve.
    pub fn add_session(
        &self,
        project_name: &str,
        draft: &SessionDraft,
    ) -> Result<SessionRecord, ProjectServiceError> {
        draft.validate()?;
        let project = self.require_project(project_name)?;
        let command = InsertSessionCommand::from_draft(draft, project.id);
        let session = self
            .sessions
            .insert_sessions(std::slice::from_ref(&command))?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::InvalidData("session store returned no row".to_string()))?;
        info!(
            "event=session_create module=service status=ok project_id={} session_id={}",
            project.id, session.id
        );
        Ok(session)
    }

    pub fn roadmap(&self, project_name: &str) -> Result<ProjectRoadmap, ProjectServiceError> {
        let project = self.require_project(project_name)?;
        let steps = roadmap(project.current_phase);
        Ok(ProjectRoadmap { project, steps })
    }

    /// Moves a project to phase `phase_id` (1..=4).
    pub fn set_phase(
        &self,
        project_name: &str,
        phase_id: i64,
    ) -> Result<ProjectRoadmap, ProjectServiceError> {
        let phase = ProjectPhase::from_id(phase_id)?;
        let mut project = self.require_project(project_name)?;
        self.projects.set_current_phase(project.id, phase)?;
        info!(
            "event=project_phase_set module=service status=ok project_id={} phase={}",
            project.id,
            phase.id()
        );
        project.current_phase = phase;
        let steps = roadmap(phase);
        Ok(ProjectRoadmap { project, steps })
    }

    /// Replaces the next-session agenda. Blank topics are dropped.
    pub fn save_next_session(
        &self,
        project_name: &str,
        date: Option<NaiveDate>,
        topics: &[String],
    ) -> Result<NextSession, ProjectServiceError> {
        let agenda = NextSession::new(date, topics)?;
        let project = self.require_project(project_name)?;
        self.agenda.save_next_session(project.id, &agenda)?;
        info!(
            "event=next_session_save module=service status=ok project_id={} topics={}",
            project.id,
            agenda.topics.len()
        );
        Ok(agenda)
    }

    pub fn next_session(
        &self,
        project_name: &str,
    ) -> Result<Option<NextSession>, ProjectServiceError> {
        let project = self.require_project(project_name)?;
        Ok(self.agenda.get_next_session(project.id)?)
    }

    fn require_project(&self, project_name: &str) -> Result<Project, ProjectServiceError> {
        self.projects
            .find_project_by_name(project_name)?
            .ok_or_else(|| ProjectServiceError::ProjectNotFound(project_name.trim().to_string()))
    }
}
