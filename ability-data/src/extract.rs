//! Brace-balanced candidate extraction from a concatenated JSON stream.
//!
//! The scanner counts `{` and `}` without tracking string literals. Ability
//! names, action tags and status identifiers in the corpus never contain
//! unescaped braces, so plain counting is enough today. A corpus with braces
//! inside free-text values would need a string-aware lexer here; the test
//! `braces_inside_strings_are_counted` pins the current behavior so such a
//! change is deliberate.

/// A top-level balanced `{...}` span, not yet parsed or validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSpan<'a> {
    /// Byte offset of the opening brace in the scanned text.
    pub offset: usize,
    pub text: &'a str,
}

/// Single-pass iterator over the top-level brace spans of a text blob.
#[derive(Debug, Clone)]
pub struct CandidateSpans<'a> {
    text: &'a str,
    cursor: usize,
    depth: usize,
    start: Option<usize>,
}

impl CandidateSpans<'_> {
    /// Byte offset of an object left open at the end of the text.
    ///
    /// Only meaningful once the iterator is exhausted; before that it is `None`.
    #[must_use]
    pub fn unterminated(&self) -> Option<usize> {
        if self.cursor < self.text.len() || self.depth == 0 {
            return None;
        }
        self.start
    }
}

/// Scan `text` for top-level balanced brace spans.
#[must_use]
pub fn candidate_spans(text: &str) -> CandidateSpans<'_> {
    CandidateSpans {
        text,
        cursor: 0,
        depth: 0,
        start: None,
    }
}

impl<'a> Iterator for CandidateSpans<'a> {
    type Item = CandidateSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.cursor < bytes.len() {
            let idx = self.cursor;
            self.cursor += 1;
            match bytes[idx] {
                b'{' => {
                    if self.depth == 0 {
                        self.start = Some(idx);
                    }
                    self.depth += 1;
                }
                b'}' => {
                    // Stray closers outside an object are noise.
                    if self.depth == 0 {
                        continue;
                    }
                    self.depth -= 1;
                    if self.depth == 0
                        && let Some(start) = self.start.take()
                    {
                        return Some(CandidateSpan {
                            offset: start,
                            text: &self.text[start..=idx],
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        candidate_spans(input).map(|span| span.text).collect()
    }

    #[test]
    fn splits_concatenated_objects() {
        let spans = texts(r#"{"a":1}{"b":{"c":2}}  noise {"d":3}"#);
        assert_eq!(spans, vec![r#"{"a":1}"#, r#"{"b":{"c":2}}"#, r#"{"d":3}"#]);
    }

    #[test]
    fn reports_offsets() {
        let offsets: Vec<usize> = candidate_spans("xx{}y{ }").map(|s| s.offset).collect();
        assert_eq!(offsets, vec![2, 5]);
    }

    #[test]
    fn drops_trailing_unterminated_span() {
        let input = r#"{"ok":true} {"broken": {"x": 1}"#;
        assert_eq!(texts(input), vec![r#"{"ok":true}"#]);

        let mut spans = candidate_spans(input);
        assert!(spans.next().is_some());
        assert_eq!(spans.unterminated(), None);
        assert!(spans.next().is_none());
        assert_eq!(spans.unterminated(), Some(12));
    }

    #[test]
    fn closed_input_has_no_unterminated_span() {
        let mut spans = candidate_spans("{} }");
        assert_eq!(spans.by_ref().count(), 1);
        assert_eq!(spans.unterminated(), None);
    }

    #[test]
    fn ignores_stray_closing_braces() {
        assert_eq!(texts("}} {\"a\":1} }"), vec!["{\"a\":1}"]);
    }

    #[test]
    fn empty_and_brace_free_input_yields_nothing() {
        assert!(texts("").is_empty());
        assert!(texts("[1, 2, 3] just text").is_empty());
    }

    #[test]
    fn braces_inside_strings_are_counted() {
        let spans = texts(r#"{"name":"a}b"} {"x":1}"#);
        assert_eq!(spans, vec![r#"{"name":"a}"#, r#"{"x":1}"#]);
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let spans = texts("é{\"name\":\"Flamme Élan\"}ü");
        assert_eq!(spans, vec!["{\"name\":\"Flamme Élan\"}"]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let input = r#"{"a":{"b":{}}}{"c":[{"d":1}]}"#;
        let first: Vec<_> = candidate_spans(input).collect();
        let second: Vec<_> = candidate_spans(input).collect();
        assert_eq!(first, second);
    }
}
