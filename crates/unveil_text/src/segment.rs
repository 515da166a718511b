//! Segmentation
//!
//! [`segment`] splits source text into the fragments a reveal animates one by
//! one. Character and word splits are lossless: joining the fragments gives
//! back the input byte for byte. Line splits drop the break sequences.

use crate::granularity::Granularity;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Layout treatment for a fragment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhiteSpace {
    /// Ordinary inline flow
    #[default]
    Normal,
    /// Whitespace-only fragment, laid out pre-formatted so it is not collapsed
    Pre,
}

impl WhiteSpace {
    /// Classify a fragment's text
    pub fn classify(text: &str) -> Self {
        if !text.is_empty() && text.chars().all(is_space) {
            WhiteSpace::Pre
        } else {
            WhiteSpace::Normal
        }
    }

    /// CSS `white-space` keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            WhiteSpace::Normal => "normal",
            WhiteSpace::Pre => "pre",
        }
    }
}

/// One segment of the source text
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    text: String,
    white_space: WhiteSpace,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let white_space = WhiteSpace::classify(&text);
        Self { text, white_space }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn white_space(&self) -> WhiteSpace {
        self.white_space
    }

    pub fn is_whitespace(&self) -> bool {
        self.white_space == WhiteSpace::Pre
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Split `text` into fragments. Empty input yields no fragments.
pub fn segment(text: &str, mode: Granularity) -> Vec<Fragment> {
    if text.is_empty() {
        return Vec::new();
    }

    let pieces = match mode {
        Granularity::Characters => text.graphemes(true).collect(),
        Granularity::Words => split_words(text),
        Granularity::Lines => split_lines(text),
    };

    pieces.into_iter().map(Fragment::new).collect()
}

/// Concatenate fragment texts
pub fn join(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::text).collect()
}

/// Alternate word / whitespace-run pieces, always starting and ending with a
/// word piece (possibly empty) so leading and trailing whitespace stays in
/// position.
fn split_words(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space = false;

    for (idx, ch) in text.char_indices() {
        if is_space(ch) != in_space {
            pieces.push(&text[start..idx]);
            start = idx;
            in_space = !in_space;
        }
    }
    pieces.push(&text[start..]);

    if in_space {
        pieces.push("");
    }
    pieces
}

/// Unicode whitespace plus U+FEFF (zero-width no-break space), which web
/// text treats as a space
fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

/// Split on `\n` and `\r\n`. A lone trailing `\r` is content, not a break.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        let raw: &str = *line;
        *line = raw.strip_suffix('\r').unwrap_or(raw);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fragments: &[Fragment]) -> Vec<&str> {
        fragments.iter().map(Fragment::text).collect()
    }

    #[test]
    fn test_chars() {
        let fragments = segment("ab", Granularity::Characters);
        assert_eq!(texts(&fragments), vec!["a", "b"]);
    }

    #[test]
    fn test_chars_keep_grapheme_clusters() {
        // e + combining acute, a flag, and a ZWJ family
        let text = "e\u{0301}\u{1F1EF}\u{1F1F5}\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let fragments = segment(text, Granularity::Characters);

        assert_eq!(fragments.len(), 3);
        assert_eq!(join(&fragments), text);
    }

    #[test]
    fn test_words() {
        let fragments = segment("Hi there", Granularity::Words);
        assert_eq!(texts(&fragments), vec!["Hi", " ", "there"]);
        assert!(fragments[1].is_whitespace());
        assert!(!fragments[0].is_whitespace());
    }

    #[test]
    fn test_words_preserve_whitespace_runs() {
        let text = "  two\t\twords \n";
        let fragments = segment(text, Granularity::Words);

        assert_eq!(texts(&fragments), vec!["", "  ", "two", "\t\t", "words", " \n", ""]);
        assert_eq!(join(&fragments), text);
    }

    #[test]
    fn test_words_treat_bom_as_space() {
        let fragments = segment("a\u{FEFF}b", Granularity::Words);
        assert_eq!(texts(&fragments), vec!["a", "\u{FEFF}", "b"]);
        assert!(fragments[1].is_whitespace());
    }

    #[test]
    fn test_lines() {
        let fragments = segment("L1\nL2", Granularity::Lines);
        assert_eq!(texts(&fragments), vec!["L1", "L2"]);

        let fragments = segment("a\r\nb\nc", Granularity::Lines);
        assert_eq!(texts(&fragments), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lines_edge_cases() {
        assert_eq!(
            texts(&segment("a\n", Granularity::Lines)),
            vec!["a", ""]
        );
        assert_eq!(
            texts(&segment("a\r", Granularity::Lines)),
            vec!["a\r"]
        );
        assert_eq!(
            texts(&segment("\n\n", Granularity::Lines)),
            vec!["", "", ""]
        );
    }

    #[test]
    fn test_line_count_matches_breaks() {
        let text = "one\ntwo\r\nthree\nfour";
        let breaks = text.matches('\n').count();
        assert_eq!(segment(text, Granularity::Lines).len(), breaks + 1);
    }

    #[test]
    fn test_empty_input() {
        for mode in [Granularity::Characters, Granularity::Words, Granularity::Lines] {
            assert!(segment("", mode).is_empty());
        }
    }

    #[test]
    fn test_segment_is_idempotent() {
        let text = "Reveal  me\nslowly ✨";
        for mode in [Granularity::Characters, Granularity::Words, Granularity::Lines] {
            assert_eq!(segment(text, mode), segment(text, mode));
        }
    }

    #[test]
    fn test_whitespace_classification() {
        assert_eq!(WhiteSpace::classify(" "), WhiteSpace::Pre);
        assert_eq!(WhiteSpace::classify("\n"), WhiteSpace::Pre);
        assert_eq!(WhiteSpace::classify("\u{00A0}"), WhiteSpace::Pre);
        assert_eq!(WhiteSpace::classify(" a "), WhiteSpace::Normal);
        assert_eq!(WhiteSpace::classify(""), WhiteSpace::Normal);
        assert_eq!(WhiteSpace::Pre.as_str(), "pre");
    }
}
