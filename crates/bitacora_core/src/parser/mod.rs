//! Free-text session notes parser.
//!
//! # Responsibility
//! - Segment pasted text into blocks and turn each block into one
//!   `ParsedSessionRecord`.
//! - Degrade gracefully: missing fields get defaults, never errors.
//!
//! # Invariants
//! - `parse` is pure: identical inputs yield identical outputs.
//! - Output order follows block order; output length never exceeds the
//!   number of non-empty blocks.
//! - Every emitted record has a non-empty title.

pub mod blocks;
pub mod fields;

use crate::model::session::{
    ClientStatus, ParsedSessionRecord, DEFAULT_TAG, SUMMARY_MAX_CHARS, TITLE_FALLBACK_MAX_CHARS,
};
use blocks::split_blocks;
use chrono::NaiveDate;
use fields::{classify_line, extract_marker_date, status_from_value, Field, LineKind};

/// Parses pasted notes into session records.
///
/// `current_date` is used for blocks without a detectable date.
pub fn parse(raw_text: &str, current_date: NaiveDate) -> Vec<ParsedSessionRecord> {
    split_blocks(raw_text)
        .iter()
        .filter_map(|block| parse_block(block, current_date))
        .collect()
}

#[derive(Debug, Default)]
struct BlockDraft {
    title: String,
    date: Option<NaiveDate>,
    tag: Option<String>,
    responsible: String,
    status: ClientStatus,
    content: String,
}

impl BlockDraft {
    fn apply(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => self.title = value.to_string(),
            Field::Date => {
                if let Some(date) = extract_marker_date(value) {
                    self.date = Some(date);
                }
            }
            Field::Tag => {
                self.tag = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            Field::Responsible => self.responsible = value.to_string(),
            Field::Status => {
                if let Some(status) = status_from_value(value) {
                    self.status = status;
                }
            }
        }
    }

    fn push_content(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push(' ');
    }
}

/// Parses one trimmed block. Returns `None` when no title can be derived.
fn parse_block(block: &str, current_date: NaiveDate) -> Option<ParsedSessionRecord> {
    let mut draft = BlockDraft::default();

    for (index, line) in block.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match classify_line(line) {
            LineKind::Marker { field, value } => draft.apply(field, value),
            LineKind::BareDate(date) => draft.date = Some(date),
            // First line without a colon is the implicit title, not content.
            LineKind::Text if index == 0 && !line.contains(':') => {}
            LineKind::Text => draft.push_content(line),
        }
    }

    let mut title = draft.title.trim().to_string();
    if title.is_empty() {
        let first_line = block.lines().next().unwrap_or_default().trim();
        title = truncate_chars(first_line, TITLE_FALLBACK_MAX_CHARS);
    }
    if title.is_empty() {
        return None;
    }

    let content = match draft.content.trim() {
        "" => block.trim(),
        content => content,
    };

    Some(ParsedSessionRecord {
        title,
        date: draft.date.unwrap_or(current_date),
        tag: draft.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
        summary: truncate_chars(content, SUMMARY_MAX_CHARS),
        client_responsible: draft.responsible,
        client_status: draft.status,
    })
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{parse, truncate_chars};
    use crate::model::session::{ClientStatus, DEFAULT_TAG};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse("", today()).is_empty());
        assert!(parse("   \n\n  \t", today()).is_empty());
    }

    #[test]
    fn block_without_markers_uses_defaults() {
        let records = parse("Reunión con el directorio\nHablamos de precios.", today());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "Reunión con el directorio");
        assert_eq!(record.date, today());
        assert_eq!(record.tag, DEFAULT_TAG);
        assert_eq!(record.client_status, ClientStatus::Deferred);
        assert_eq!(record.client_responsible, "");
        assert_eq!(record.summary, "Hablamos de precios.");
    }

    #[test]
    fn fallback_title_is_capped_at_100_chars() {
        let long_line = "á".repeat(150);
        let records = parse(&long_line, today());
        assert_eq!(records[0].title.chars().count(), 100);
    }

    #[test]
    fn single_line_block_uses_itself_as_summary() {
        let records = parse("Llamada rápida", today());
        assert_eq!(records[0].title, "Llamada rápida");
        assert_eq!(records[0].summary, "Llamada rápida");
    }

    #[test]
    fn first_line_with_colon_stays_in_content() {
        let records = parse("Notas: revisión de stock\nseguimos la semana próxima", today());
        assert_eq!(records[0].title, "Notas: revisión de stock");
        assert_eq!(
            records[0].summary,
            "Notas: revisión de stock seguimos la semana próxima"
        );
    }

    #[test]
    fn explicit_title_overrides_implicit_first_line() {
        let records = parse("Borrador\nTítulo: Sesión 2\ncuerpo", today());
        assert_eq!(records[0].title, "Sesión 2");
        assert_eq!(records[0].summary, "cuerpo");
    }

    #[test]
    fn empty_title_marker_falls_back_to_first_line() {
        let records = parse("Title:\nbody text", today());
        assert_eq!(records[0].title, "Title:");
    }

    #[test]
    fn empty_tag_marker_keeps_default_tag() {
        let records = parse("Título: A\nEtiqueta:\nx", today());
        assert_eq!(records[0].tag, DEFAULT_TAG);
    }

    #[test]
    fn unknown_status_leaves_deferred() {
        let records = parse("Título: A\nEstado: en revisión", today());
        assert_eq!(records[0].client_status, ClientStatus::Deferred);
    }

    #[test]
    fn bare_date_line_sets_date_and_is_not_content() {
        let records = parse("Título: A\n22/01/2025\ncuerpo", today());
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 22).expect("valid date")
        );
        assert_eq!(records[0].summary, "cuerpo");
    }

    #[test]
    fn unparseable_date_marker_defaults_to_current_date() {
        let records = parse("Título: A\nFecha: la próxima", today());
        assert_eq!(records[0].date, today());
    }

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
    }
}
