//! Project-level model: identity, phase roadmap, next-session agenda and
//! client share tokens.
//!
//! # Invariants
//! - `ProjectPhase` ids are exactly `1..=4`.
//! - A `NextSession` holds at most `MAX_AGENDA_TOPICS` non-blank topics.
//! - A `ClientToken` grants access only while `active` and before
//!   `expires_at`.

use crate::model::session::{MIN_SESSION_SUMMARY_CHARS, MIN_SESSION_TITLE_CHARS};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a client project.
pub type ProjectId = Uuid;

/// Maximum topics planned for the next session.
pub const MAX_AGENDA_TOPICS: usize = 3;
/// Lifetime of a client share link.
pub const SHARE_LINK_TTL_DAYS: i64 = 7;

/// Validation errors for project-level values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    BlankProjectName,
    PhaseOutOfRange(i64),
    TooManyTopics(usize),
    /// Trimmed title length, in characters.
    SessionTitleTooShort(usize),
    /// Trimmed summary length, in characters.
    SessionSummaryTooShort(usize),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankProjectName => write!(f, "project name cannot be blank"),
            Self::PhaseOutOfRange(value) => {
                write!(f, "phase `{value}` is out of range; expected 1..=4")
            }
            Self::TooManyTopics(count) => write!(
                f,
                "next session accepts at most {MAX_AGENDA_TOPICS} topics, got {count}"
            ),
            Self::SessionTitleTooShort(count) => write!(
                f,
                "session title needs at least {MIN_SESSION_TITLE_CHARS} characters, got {count}"
            ),
            Self::SessionSummaryTooShort(count) => write!(
                f,
                "session summary needs at least {MIN_SESSION_SUMMARY_CHARS} characters, got {count}"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Client project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Unique display name used to resolve the project.
    pub name: String,
    pub client_name: String,
    pub current_phase: ProjectPhase,
}

/// The four fixed stages of a consulting project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    #[default]
    Diagnosis,
    StrategicPlan,
    Implementation,
    FollowUp,
}

impl ProjectPhase {
    pub const ALL: [ProjectPhase; 4] = [
        Self::Diagnosis,
        Self::StrategicPlan,
        Self::Implementation,
        Self::FollowUp,
    ];

    /// 1-based phase number.
    pub fn id(self) -> u8 {
        match self {
            Self::Diagnosis => 1,
            Self::StrategicPlan => 2,
            Self::Implementation => 3,
            Self::FollowUp => 4,
        }
    }

    pub fn from_id(id: i64) -> Result<Self, ModelValidationError> {
        match id {
            1 => Ok(Self::Diagnosis),
            2 => Ok(Self::StrategicPlan),
            3 => Ok(Self::Implementation),
            4 => Ok(Self::FollowUp),
            other => Err(ModelValidationError::PhaseOutOfRange(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Diagnosis => "Diagnóstico",
            Self::StrategicPlan => "Plan estratégico",
            Self::Implementation => "Implementación",
            Self::FollowUp => "Seguimiento & control",
        }
    }

    /// Status of `self` relative to the project's current phase.
    pub fn status_relative_to(self, current: ProjectPhase) -> PhaseStatus {
        match self.cmp(&current) {
            std::cmp::Ordering::Less => PhaseStatus::Done,
            std::cmp::Ordering::Equal => PhaseStatus::Current,
            std::cmp::Ordering::Greater => PhaseStatus::Upcoming,
        }
    }
}

/// Display status of one phase on the roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Done,
    Current,
    Upcoming,
}

impl PhaseStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Done => "Completada",
            Self::Current => "En curso",
            Self::Upcoming => "Próxima fase",
        }
    }
}

/// One roadmap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub phase: ProjectPhase,
    pub status: PhaseStatus,
}

/// Builds the full four-step roadmap for a current phase.
pub fn roadmap(current: ProjectPhase) -> Vec<RoadmapStep> {
    ProjectPhase::ALL
        .iter()
        .map(|phase| RoadmapStep {
            phase: *phase,
            status: phase.status_relative_to(current),
        })
        .collect()
}

/// Agenda planned for a project's next session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextSession {
    pub date: Option<NaiveDate>,
    /// Trimmed, non-blank topics in input order.
    pub topics: Vec<String>,
}

impl NextSession {
    /// Builds an agenda, dropping blank topics.
    ///
    /// # Errors
    /// - Returns `TooManyTopics` when more than `MAX_AGENDA_TOPICS` remain.
    pub fn new<I, S>(date: Option<NaiveDate>, topics: I) -> Result<Self, ModelValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topics = topics
            .into_iter()
            .map(|topic| topic.as_ref().trim().to_string())
            .filter(|topic| !topic.is_empty())
            .collect::<Vec<_>>();
        if topics.len() > MAX_AGENDA_TOPICS {
            return Err(ModelValidationError::TooManyTopics(topics.len()));
        }
        Ok(Self { date, topics })
    }

    /// True when neither a date nor any topic is planned.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.topics.is_empty()
    }
}

/// Time-limited token granting read-only access to a project timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientToken {
    pub token: String,
    pub project_id: ProjectId,
    pub client_name: String,
    pub active: bool,
    /// Epoch milliseconds.
    pub expires_at: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl ClientToken {
    /// Issues a fresh random token valid for `SHARE_LINK_TTL_DAYS` from `now`.
    pub fn issue(project_id: ProjectId, client_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let expires = now + Duration::days(SHARE_LINK_TTL_DAYS);
        Self {
            token: Uuid::new_v4().to_string(),
            project_id,
            client_name: client_name.into(),
            active: true,
            expires_at: expires.timestamp_millis(),
            created_at: now.timestamp_millis(),
        }
    }

    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.active && now_ms < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn phase_ids_round_trip_and_reject_out_of_range() {
        for phase in ProjectPhase::ALL {
            assert_eq!(ProjectPhase::from_id(i64::from(phase.id())), Ok(phase));
        }
        assert_eq!(
            ProjectPhase::from_id(0),
            Err(ModelValidationError::PhaseOutOfRange(0))
        );
        assert_eq!(
            ProjectPhase::from_id(5),
            Err(ModelValidationError::PhaseOutOfRange(5))
        );
    }

    #[test]
    fn roadmap_marks_done_current_and_upcoming() {
        let steps = roadmap(ProjectPhase::Implementation);
        let statuses = steps.iter().map(|step| step.status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            vec![
                PhaseStatus::Done,
                PhaseStatus::Done,
                PhaseStatus::Current,
                PhaseStatus::Upcoming
            ]
        );
    }

    #[test]
    fn next_session_drops_blank_topics_and_caps_count() {
        let agenda = NextSession::new(None, ["  Pricing ", "", "   "]).expect("one topic is valid");
        assert_eq!(agenda.topics, vec!["Pricing".to_string()]);

        let err = NextSession::new(None, ["a", "b", "c", "d"]).expect_err("four topics must fail");
        assert_eq!(err, ModelValidationError::TooManyTopics(4));
    }

    #[test]
    fn issued_token_expires_after_seven_days() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let token = ClientToken::issue(Uuid::new_v4(), "Karu SA", now);
        let six_days = (now + Duration::days(6)).timestamp_millis();
        let seven_days = (now + Duration::days(7)).timestamp_millis();

        assert!(token.is_valid_at(now.timestamp_millis()));
        assert!(token.is_valid_at(six_days));
        assert!(!token.is_valid_at(seven_days));
    }
}
