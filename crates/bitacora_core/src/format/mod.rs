//! Presentation helpers for stored session summaries.
//!
//! # Responsibility
//! - Turn free text into typed display tokens (no markup strings).
//! - Derive a one-sentence summary for compact listings.

pub mod session_text;
pub mod summary;

pub use session_text::{format_session_text, FormattedSessionText, TextToken, TokenKind};
pub use summary::auto_summary;
