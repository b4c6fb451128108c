//! Core domain logic for the Bitácora project log.
//! This crate is the single source of truth for business invariants: notes
//! parsing, import batches, project phases, agendas and client share links.

pub mod config;
pub mod db;
pub mod format;
pub mod import;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repo;
pub mod service;

pub use config::AppConfig;
pub use format::{auto_summary, format_session_text, FormattedSessionText, TextToken, TokenKind};
pub use import::{to_import_batch, InsertSessionCommand};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{
    roadmap, ClientToken, ModelValidationError, NextSession, PhaseStatus, Project, ProjectId,
    ProjectPhase, RoadmapStep,
};
pub use model::session::{
    ClientStatus, ParsedSessionRecord, SessionDraft, SessionId, SessionRecord,
};
pub use parser::parse;
pub use repo::agenda_repo::{AgendaRepository, SqliteAgendaRepository};
pub use repo::project_repo::{ProjectDirectory, SqliteProjectDirectory};
pub use repo::session_repo::{SessionStore, SqliteSessionStore};
pub use repo::token_repo::{ClientTokenRepository, SqliteClientTokenRepository};
pub use repo::{RepoError, RepoResult};
pub use service::import_service::{ImportError, ImportOutcome, ImportPreview, ImportService};
pub use service::project_service::{ProjectRoadmap, ProjectService, ProjectServiceError};
pub use service::share_service::{ClientTimeline, ShareError, ShareService};
