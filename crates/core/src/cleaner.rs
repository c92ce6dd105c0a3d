use crate::error::CleanError;
use regex::Regex;

const HYPHEN_BREAK_PATTERN: &str = r"-[ \t]*\r?\n";
const PAGE_MARKER_PATTERN: &str = r"Page \d+";

// ASCII file/group/record/unit separators count as whitespace too
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes raw PDF text before it is handed to a model.
///
/// Only ASCII survives, whitespace runs become single spaces, words hyphenated across a
/// line break lose the hyphen, and `Page N` markers are removed. Cleaning is idempotent.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    hyphen_break: Regex,
    page_marker: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self, CleanError> {
        Ok(Self {
            hyphen_break: Regex::new(HYPHEN_BREAK_PATTERN)?,
            page_marker: Regex::new(PAGE_MARKER_PATTERN)?,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let ascii: String = text.chars().filter(char::is_ascii).collect();
        let unbroken = self.hyphen_break.replace_all(&ascii, "\n");

        // form feeds are whitespace, so collapsing drops them too
        let mut current = normalize_whitespace(&unbroken);

        // removing a marker can splice a new one together, so run to a fixpoint
        loop {
            let stripped = self.page_marker.replace_all(&current, "");
            let next = normalize_whitespace(&stripped);
            if next == current {
                return current;
            }
            current = next;
        }
    }
}
