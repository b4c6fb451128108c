//! Client share links and the read-only client timeline.
//!
//! # Invariants
//! - A timeline is only served for an active, unexpired token.
//! - Unknown, revoked and expired tokens fail identically.

use crate::model::project::{roadmap, ClientToken, NextSession, ProjectPhase, RoadmapStep};
use crate::model::session::SessionRecord;
use crate::repo::agenda_repo::AgendaRepository;
use crate::repo::project_repo::ProjectDirectory;
use crate::repo::session_repo::SessionStore;
use crate::repo::token_repo::ClientTokenRepository;
use crate::repo::RepoError;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ShareError {
    ProjectNotFound(String),
    InvalidToken,
    Repo(RepoError),
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(name) => write!(f, "project not found: `{name}`"),
            Self::InvalidToken => write!(f, "share link is invalid or has expired"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ShareError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Read-only project view served to clients through a share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientTimeline {
    pub project_name: String,
    pub client_name: String,
    pub current_phase: ProjectPhase,
    pub roadmap: Vec<RoadmapStep>,
    /// Newest session date first.
    pub sessions: Vec<SessionRecord>,
    pub next_session: Option<NextSession>,
}

pub struct ShareService<P, S, A, T>
where
    P: ProjectDirectory,
    S: SessionStore,
    A: AgendaRepository,
    T: ClientTokenRepository,
{
    projects: P,
    sessions: S,
    agenda: A,
    tokens: T,
}

impl<P, S, A, T> ShareService<P, S, A, T>
where
    P: ProjectDirectory,
    S: SessionStore,
    A: AgendaRepository,
    T: ClientTokenRepository,
{
    pub fn new(projects: P, sessions: S, agenda: A, tokens: T) -> Self {
        Self {
            projects,
            sessions,
            agenda,
            tokens,
        }
    }

    /// Issues a share token for `project_name`, valid for seven days from `now`.
    pub fn create_link(
        &self,
        project_name: &str,
        now: DateTime<Utc>,
    ) -> Result<ClientToken, ShareError> {
        let project = self
            .projects
            .find_project_by_name(project_name)?
            .ok_or_else(|| ShareError::ProjectNotFound(project_name.trim().to_string()))?;

        let token = ClientToken::issue(project.id, project.client_name.as_str(), now);
        self.tokens.insert_token(&token)?;
        info!(
            "event=share_link_create module=service status=ok project_id={} expires_at={}",
            project.id, token.expires_at
        );
        Ok(token)
    }

    pub fn revoke(&self, token: &str) -> Result<(), ShareError> {
        match self.tokens.deactivate_token(token) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound(_)) => Err(ShareError::InvalidToken),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves `token` into the client timeline at instant `now`.
    pub fn timeline(&self, token: &str, now: DateTime<Utc>) -> Result<ClientTimeline, ShareError> {
        let Some(client_token) = self
            .tokens
            .find_valid_token(token, now.timestamp_millis())?
        else {
            warn!("event=share_link_resolve module=service status=error error_code=invalid_token");
            return Err(ShareError::InvalidToken);
        };

        let project = self
            .projects
            .get_project(client_token.project_id)?
            .ok_or(ShareError::InvalidToken)?;
        let sessions = self.sessions.list_sessions(project.id)?;
        let next_session = self
            .agenda
            .get_next_session(project.id)?
            .filter(|agenda| !agenda.is_empty());

        info!(
            "event=share_link_resolve module=service status=ok project_id={} sessions={}",
            project.id,
            sessions.len()
        );
        Ok(ClientTimeline {
            project_name: project.name,
            client_name: client_token.client_name,
            current_phase: project.current_phase,
            roadmap: roadmap(project.current_phase),
            sessions,
            next_session,
        })
    }
}
