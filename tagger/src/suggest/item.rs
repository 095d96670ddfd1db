//! Candidate items for the suggestion dropdown.

use serde::Deserialize;

use crate::error::ConfigError;

/// One candidate: the value committed on acceptance and the label that is
/// matched, highlighted and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSuggestion")]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

impl Suggestion {
    /// A candidate whose label is its value.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// A candidate displayed under a different label.
    pub fn with_label(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Wire forms: a bare string, or a `{value, label?}` record.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Plain(String),
    Record { value: String, label: Option<String> },
}

impl From<RawSuggestion> for Suggestion {
    fn from(raw: RawSuggestion) -> Self {
        match raw {
            RawSuggestion::Plain(value) => Suggestion::new(value),
            RawSuggestion::Record { value, label } => match label {
                Some(label) => Suggestion::with_label(value, label),
                None => Suggestion::new(value),
            },
        }
    }
}

/// Parse a JSON array of candidates (strings or `{value, label}` records).
pub fn suggestions_from_json(json: &str) -> Result<Vec<Suggestion>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Trait for anything that can be offered as a suggestion.
///
/// # Example
///
/// ```
/// use tagger::SuggestionItem;
///
/// struct Language {
///     code: &'static str,
///     name: &'static str,
/// }
///
/// impl SuggestionItem for Language {
///     fn suggestion_value(&self) -> String {
///         self.code.to_string()
///     }
///
///     fn suggestion_label(&self) -> String {
///         self.name.to_string()
///     }
/// }
/// ```
pub trait SuggestionItem {
    /// Value handed out when the item is accepted.
    fn suggestion_value(&self) -> String;

    /// Text shown in the list and used for matching.
    fn suggestion_label(&self) -> String {
        self.suggestion_value()
    }

    fn to_suggestion(&self) -> Suggestion {
        Suggestion::with_label(self.suggestion_value(), self.suggestion_label())
    }
}

impl SuggestionItem for Suggestion {
    fn suggestion_value(&self) -> String {
        self.value.clone()
    }

    fn suggestion_label(&self) -> String {
        self.label.clone()
    }
}

impl SuggestionItem for String {
    fn suggestion_value(&self) -> String {
        self.clone()
    }
}

impl SuggestionItem for &str {
    fn suggestion_value(&self) -> String {
        (*self).to_string()
    }
}

// (value, label) tuples
impl<S1, S2> SuggestionItem for (S1, S2)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    fn suggestion_value(&self) -> String {
        self.0.as_ref().to_string()
    }

    fn suggestion_label(&self) -> String {
        self.1.as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_mixed_forms() {
        let items =
            suggestions_from_json(r#"["css", {"value": "js", "label": "JavaScript"}, {"value": "html"}]"#)
                .unwrap();
        assert_eq!(items[0], Suggestion::new("css"));
        assert_eq!(items[1], Suggestion::with_label("js", "JavaScript"));
        assert_eq!(items[2].label, "html");
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(suggestions_from_json(r#"{"value": "x"}"#).is_err());
        assert!(suggestions_from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_tuple_item() {
        let item = ("de", "German");
        assert_eq!(item.to_suggestion(), Suggestion::with_label("de", "German"));
    }
}
