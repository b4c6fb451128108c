//! One-line summary of a session body.

const SENTENCE_SEARCH_LIMIT: usize = 200;
const FALLBACK_WORDS: usize = 40;

/// Returns the first sentence when it ends within the first 200 characters,
/// otherwise the first 40 words followed by `...`.
pub fn auto_summary(text: &str) -> String {
    let clean = text.replace(['\r', '\n'], " ");
    let clean = clean.trim();
    if clean.is_empty() {
        return String::new();
    }

    if let Some(dot_index) = clean.chars().position(|ch| ch == '.') {
        if dot_index < SENTENCE_SEARCH_LIMIT {
            return clean.chars().take(dot_index + 1).collect();
        }
    }

    let words = clean.split(' ').take(FALLBACK_WORDS).collect::<Vec<_>>();
    format!("{}...", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::auto_summary;

    #[test]
    fn first_sentence_is_returned() {
        assert_eq!(
            auto_summary("Cerramos precios.\nLuego vimos stock."),
            "Cerramos precios."
        );
    }

    #[test]
    fn text_without_early_period_falls_back_to_words() {
        let text = vec!["palabra"; 50].join(" ");
        let summary = auto_summary(&text);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.trim_end_matches("...").split(' ').count(), 40);
    }

    #[test]
    fn empty_text_yields_empty_summary() {
        assert_eq!(auto_summary("  \n "), "");
    }
}
