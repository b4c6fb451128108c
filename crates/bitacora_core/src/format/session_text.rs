//! Session text tokenizer.
//!
//! # Invariants
//! - Output is a flat sequence of `{kind, text}` tokens in input order.
//! - Token text is plain; escaping is the renderer's concern.
//! - `preview` never holds more than `PREVIEW_CHAR_LIMIT` characters of text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Character budget for the collapsed view.
pub const PREVIEW_CHAR_LIMIT: usize = 550;

static SECTION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(temas|hallazgos|acciones|conclusiones):\s*(.*)$")
        .expect("valid section heading regex")
});
static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s+(.+)$").expect("valid list item regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Heading,
    Paragraph,
    ListItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextToken {
    pub kind: TokenKind,
    pub text: String,
}

impl TextToken {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedSessionText {
    pub tokens: Vec<TextToken>,
    /// Tokens clipped to `PREVIEW_CHAR_LIMIT` characters.
    pub preview: Vec<TextToken>,
    /// True when `preview` is shorter than `tokens`.
    pub is_long: bool,
}

/// Tokenizes raw session text into headings, list items and paragraphs.
///
/// `Temas:`, `Hallazgos:`, `Acciones:` and `Conclusiones:` (any case) open an
/// uppercase heading; text after the colon becomes a paragraph.
pub fn format_session_text(raw: &str) -> FormattedSessionText {
    let tokens = tokenize(raw);
    let total_chars = tokens
        .iter()
        .map(|token| token.text.chars().count())
        .sum::<usize>();
    let is_long = total_chars > PREVIEW_CHAR_LIMIT;
    let preview = if is_long {
        clip_tokens(&tokens, PREVIEW_CHAR_LIMIT)
    } else {
        tokens.clone()
    };

    FormattedSessionText {
        tokens,
        preview,
        is_long,
    }
}

fn tokenize(raw: &str) -> Vec<TextToken> {
    let mut tokens = Vec::new();
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(caps) = SECTION_HEADING_RE.captures(line) {
            tokens.push(TextToken::new(TokenKind::Heading, caps[1].to_uppercase()));
            let rest = caps[2].trim();
            if !rest.is_empty() {
                tokens.push(TextToken::new(TokenKind::Paragraph, rest));
            }
        } else if let Some(caps) = LIST_ITEM_RE.captures(line) {
            tokens.push(TextToken::new(TokenKind::ListItem, caps[1].trim()));
        } else {
            tokens.push(TextToken::new(TokenKind::Paragraph, line));
        }
    }
    tokens
}

fn clip_tokens(tokens: &[TextToken], budget: usize) -> Vec<TextToken> {
    let mut remaining = budget;
    let mut clipped = Vec::new();
    for token in tokens {
        if remaining == 0 {
            break;
        }
        let length = token.text.chars().count();
        if length <= remaining {
            clipped.push(token.clone());
            remaining -= length;
        } else {
            let text = token.text.chars().take(remaining).collect::<String>();
            clipped.push(TextToken::new(token.kind, text));
            remaining = 0;
        }
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_markers_become_uppercase_headings() {
        let formatted = format_session_text("temas: precios\nHallazgos:\n- margen bajo");
        assert_eq!(
            formatted.tokens,
            vec![
                TextToken::new(TokenKind::Heading, "TEMAS"),
                TextToken::new(TokenKind::Paragraph, "precios"),
                TextToken::new(TokenKind::Heading, "HALLAZGOS"),
                TextToken::new(TokenKind::ListItem, "margen bajo"),
            ]
        );
        assert!(!formatted.is_long);
        assert_eq!(formatted.preview, formatted.tokens);
    }

    #[test]
    fn markup_is_kept_as_plain_text() {
        let formatted = format_session_text("<script>alert(1)</script>");
        assert_eq!(formatted.tokens[0].kind, TokenKind::Paragraph);
        assert_eq!(formatted.tokens[0].text, "<script>alert(1)</script>");
    }

    #[test]
    fn long_text_is_clipped_in_preview() {
        let raw = format!("{}\n{}", "a".repeat(500), "b".repeat(100));
        let formatted = format_session_text(&raw);
        assert!(formatted.is_long);
        assert_eq!(formatted.tokens.len(), 2);
        assert_eq!(formatted.preview.len(), 2);
        assert_eq!(formatted.preview[1].text.chars().count(), 50);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert_eq!(format_session_text(""), FormattedSessionText::default());
    }
}
