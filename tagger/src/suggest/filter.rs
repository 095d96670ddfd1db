//! Substring matching and match highlighting.

use log::warn;
use regex::{Captures, Regex, RegexBuilder};

enum Needle {
    /// Empty query: everything matches, nothing is highlighted.
    All,
    Pattern(Regex),
    /// Only reached if the escaped query exceeds the regex size limit.
    Plain { query: String, match_case: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Literal(String),
    Match,
}

/// A parsed highlight template.
///
/// Follows the substitution rules of a JavaScript string replacement: `$1`
/// and `$&` insert the matched text, `$$` is a literal `$`, and any other
/// `$` is kept as written. `${1}` is also accepted for the match.
///
/// # Example
///
/// ```
/// use tagger::suggest::HighlightTemplate;
///
/// let template = HighlightTemplate::parse("<em>$1x</em> $$");
/// assert!(template.has_match());
/// assert_eq!(template.expand("es"), "<em>esx</em> $");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightTemplate {
    parts: Vec<TemplatePart>,
}

impl HighlightTemplate {
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let (part, consumed) = if after.starts_with('1') || after.starts_with('&') {
                (Some(TemplatePart::Match), 1)
            } else if after.starts_with("{1}") {
                (Some(TemplatePart::Match), 3)
            } else if after.starts_with('$') {
                literal.push('$');
                (None, 1)
            } else {
                literal.push('$');
                (None, 0)
            };
            if let Some(part) = part {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(part);
            }
            rest = &after[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }
        Self { parts }
    }

    /// True if the template inserts the matched text somewhere.
    pub fn has_match(&self) -> bool {
        self.parts.contains(&TemplatePart::Match)
    }

    pub fn expand(&self, matched: &str) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Match => out.push_str(matched),
            }
        }
        out
    }
}

/// A compiled query, reused for every candidate of one filter pass.
pub struct QueryMatcher {
    needle: Needle,
}

impl QueryMatcher {
    pub fn new(query: &str, match_case: bool) -> Self {
        if query.is_empty() {
            return Self { needle: Needle::All };
        }
        let pattern = format!("({})", regex::escape(query));
        match RegexBuilder::new(&pattern)
            .case_insensitive(!match_case)
            .build()
        {
            Ok(regex) => Self {
                needle: Needle::Pattern(regex),
            },
            Err(e) => {
                warn!("QueryMatcher: falling back to plain search: {}", e);
                Self::plain(query, match_case)
            }
        }
    }

    fn plain(query: &str, match_case: bool) -> Self {
        let query = if match_case {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self {
            needle: Needle::Plain { query, match_case },
        }
    }

    /// True if the label contains the query.
    pub fn is_match(&self, label: &str) -> bool {
        match &self.needle {
            Needle::All => true,
            Needle::Pattern(regex) => regex.is_match(label),
            Needle::Plain {
                query,
                match_case: true,
            } => label.contains(query.as_str()),
            Needle::Plain {
                query,
                match_case: false,
            } => label.to_lowercase().contains(query.as_str()),
        }
    }

    /// Wrap each occurrence of the query with `template` (`$1` is the match).
    ///
    /// Occurrences inside an existing `<...>` markup tag are left alone. On
    /// the plain-search fallback only case-sensitive queries are
    /// highlighted; case-insensitive ones return the label unchanged.
    pub fn highlight(&self, label: &str, template: &str) -> String {
        let template = HighlightTemplate::parse(template);
        let mut out = String::with_capacity(label.len());
        for segment in MarkupSegments::new(label) {
            match segment {
                Segment::Tag(tag) => out.push_str(tag),
                Segment::Text(text) => match &self.needle {
                    Needle::Pattern(regex) => out.push_str(
                        &regex.replace_all(text, |caps: &Captures| template.expand(&caps[0])),
                    ),
                    Needle::Plain {
                        query,
                        match_case: true,
                    } => out.push_str(&text.replace(query.as_str(), &template.expand(query))),
                    _ => out.push_str(text),
                },
            }
        }
        out
    }
}

/// Indices of the labels containing `query`, in their original order.
///
/// An empty query matches every label.
///
/// # Example
///
/// ```
/// let labels = ["auto", "complete", "test"];
/// assert_eq!(tagger::suggest::filter_matches("t", &labels, false), vec![0, 1, 2]);
/// assert_eq!(tagger::suggest::filter_matches("te", &labels, false), vec![1, 2]);
/// ```
pub fn filter_matches<S: AsRef<str>>(query: &str, labels: &[S], match_case: bool) -> Vec<usize> {
    let matcher = QueryMatcher::new(query, match_case);
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| matcher.is_match(label.as_ref()))
        .map(|(index, _)| index)
        .collect()
}

/// One-shot form of [`QueryMatcher::highlight`].
pub fn highlight(label: &str, query: &str, template: &str, match_case: bool) -> String {
    QueryMatcher::new(query, match_case).highlight(label, template)
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Tag(&'a str),
    Text(&'a str),
}

/// Splits markup into `<...>` tags (no nested angle brackets) and the text
/// between them. A `<` without a closing `>` is plain text.
struct MarkupSegments<'a> {
    rest: &'a str,
}

impl<'a> MarkupSegments<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for MarkupSegments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        if let Some(len) = tag_len(self.rest) {
            let (tag, rest) = self.rest.split_at(len);
            self.rest = rest;
            return Some(Segment::Tag(tag));
        }

        // Text runs until the next '<' that opens a real tag.
        let mut end = self.rest.len();
        let mut search_from = 1;
        while let Some(pos) = self.rest[search_from..].find('<') {
            let pos = search_from + pos;
            if tag_len(&self.rest[pos..]).is_some() {
                end = pos;
                break;
            }
            search_from = pos + 1;
        }
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Segment::Text(text))
    }
}

/// Length of the tag at the start of `s`, if `s` starts with `<[^<>]*>`.
fn tag_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('<')?;
    let close = body.find(|c: char| c == '<' || c == '>')?;
    if body[close..].starts_with('>') {
        Some(close + 2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        let segments: Vec<_> = MarkupSegments::new("a<b>c</b>d").collect();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Tag("<b>"),
                Segment::Text("c"),
                Segment::Tag("</b>"),
                Segment::Text("d"),
            ]
        );
    }

    #[test]
    fn test_segments_unclosed_bracket_is_text() {
        let segments: Vec<_> = MarkupSegments::new("a < b <i>c").collect();
        assert_eq!(
            segments,
            vec![Segment::Text("a < b "), Segment::Tag("<i>"), Segment::Text("c")]
        );
    }

    #[test]
    fn test_highlight_basic() {
        assert_eq!(highlight("test", "es", "<em>$1</em>", false), "t<em>es</em>t");
    }

    #[test]
    fn test_highlight_all_occurrences_keep_case() {
        assert_eq!(
            highlight("JavaScript java", "JAVA", "<em>$1</em>", false),
            "<em>Java</em>Script <em>java</em>"
        );
    }

    #[test]
    fn test_highlight_skips_inside_tags() {
        assert_eq!(
            highlight("<span class=\"em\">em</span>", "em", "<b>$1</b>", false),
            "<span class=\"em\"><b>em</b></span>"
        );
    }

    #[test]
    fn test_highlight_respects_match_case() {
        assert_eq!(highlight("Test test", "test", "[$1]", true), "Test [test]");
    }

    #[test]
    fn test_highlight_escapes_regex_metacharacters() {
        assert_eq!(highlight("a.b axb", ".", "[$1]", false), "a[.]b axb");
        assert_eq!(highlight("c++", "+", "[$1]", false), "c[+][+]");
    }

    #[test]
    fn test_highlight_word_character_after_capture() {
        assert_eq!(highlight("test", "es", "<em>$1x</em>", false), "t<em>esx</em>t");
        assert_eq!(highlight("test", "es", "$1_", false), "tes_t");
    }

    #[test]
    fn test_highlight_template_dollar_forms() {
        assert_eq!(highlight("test", "es", "[$&|${1}]", false), "t[es|es]t");
        assert_eq!(highlight("test", "es", "$$1", false), "t$1t");
        assert_eq!(highlight("test", "es", "$2$1", false), "t$2est");
    }

    #[test]
    fn test_template_parse() {
        assert!(HighlightTemplate::parse("<em>$1</em>").has_match());
        assert!(HighlightTemplate::parse("$&").has_match());
        assert!(!HighlightTemplate::parse("$$1").has_match());
        assert!(!HighlightTemplate::parse("<em></em>").has_match());
        assert_eq!(HighlightTemplate::parse("a$").expand("x"), "a$");
    }

    #[test]
    fn test_plain_fallback_respects_match_case() {
        let sensitive = QueryMatcher::plain("Ja", true);
        assert!(sensitive.is_match("Java"));
        assert!(!sensitive.is_match("java"));
        assert_eq!(sensitive.highlight("Java <b>Ja</b>", "[$1]"), "[Ja]va <b>[Ja]</b>");

        let insensitive = QueryMatcher::plain("Ja", false);
        assert!(insensitive.is_match("java"));
        assert_eq!(insensitive.highlight("java", "[$1]"), "java");
    }

    #[test]
    fn test_empty_query_highlights_nothing() {
        assert_eq!(highlight("plain", "", "[$1]", false), "plain");
    }
}
