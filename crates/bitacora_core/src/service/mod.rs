//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.
//!
//! Services receive their repositories at construction; none of them reads
//! ambient global state.

pub mod import_service;
pub mod project_service;
pub mod share_service;
