//! Block segmentation for pasted note text.
//!
//! A block ends at a line holding only `---` or `===`, or at a run of two or
//! more blank lines. Single blank lines stay inside the block.

const SEPARATOR_LINES: &[&str] = &["---", "==="];
const BLANK_RUN_SEPARATOR: usize = 2;

/// Splits raw text into trimmed, non-empty blocks in input order.
pub fn split_blocks(raw_text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;

    for line in raw_text.lines() {
        let trimmed = line.trim();

        if SEPARATOR_LINES.contains(&trimmed) {
            flush_block(&mut current, &mut blocks);
            blank_run = 0;
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == BLANK_RUN_SEPARATOR {
                flush_block(&mut current, &mut blocks);
            } else if blank_run < BLANK_RUN_SEPARATOR {
                current.push(line);
            }
            continue;
        }

        blank_run = 0;
        current.push(line);
    }
    flush_block(&mut current, &mut blocks);

    blocks
}

fn flush_block(current: &mut Vec<&str>, blocks: &mut Vec<String>) {
    let joined = current.join("\n");
    current.clear();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::split_blocks;

    #[test]
    fn empty_and_whitespace_input_yield_no_blocks() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("  \n\t\n  ").is_empty());
    }

    #[test]
    fn dash_and_equals_lines_separate_blocks() {
        let blocks = split_blocks("one\n---\ntwo\n  ===  \nthree");
        assert_eq!(blocks, vec!["one", "two", "three"]);
    }

    #[test]
    fn single_blank_line_keeps_block_together() {
        let blocks = split_blocks("Título: A\n\nbody");
        assert_eq!(blocks, vec!["Título: A\n\nbody"]);
    }

    #[test]
    fn two_or_more_blank_lines_separate_blocks() {
        let blocks = split_blocks("first\n\n\nsecond\n\n\n\n\nthird");
        assert_eq!(blocks, vec!["first", "second", "third"]);
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        let blocks = split_blocks("first\n   \n\t\nsecond");
        assert_eq!(blocks, vec!["first", "second"]);
    }

    #[test]
    fn consecutive_separators_do_not_create_empty_blocks() {
        let blocks = split_blocks("---\n\n---\nonly\n---\n===\n");
        assert_eq!(blocks, vec!["only"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let blocks = split_blocks("a\r\n---\r\nb\r\n");
        assert_eq!(blocks, vec!["a", "b"]);
    }

    #[test]
    fn dashes_inside_text_are_not_separators() {
        let blocks = split_blocks("- item one\n---- not a separator\ntext --- more");
        assert_eq!(blocks.len(), 1);
    }
}
