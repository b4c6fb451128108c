//! Domain model for the project log.
//!
//! # Responsibility
//! - Define the records produced by the notes parser and persisted by the
//!   session store.
//! - Define project-level state: phase roadmap, next-session agenda and
//!   client share tokens.
//!
//! # Invariants
//! - Persisted projects and sessions are identified by stable UUIDs.
//! - Session dates are calendar dates without time zone.

pub mod project;
pub mod session;
