//! Error types

/// Errors raised while building a widget from its configuration.
///
/// Widget operations themselves never fail with an error; they report
/// rejected interactions through `bool` or `Option` return values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The suggestion limit must allow at least one visible item.
    #[error("Suggestion limit must be at least 1")]
    ZeroLimit,

    /// The highlight template never inserts the matched text.
    #[error("Highlight template '{template}' does not reference the match with $1")]
    MissingHighlightCapture { template: String },

    /// A CSS class name option was left empty.
    #[error("Class name '{option}' must not be empty")]
    EmptyClass { option: &'static str },

    /// Minimum input width is larger than the maximum.
    #[error("Input width bounds inverted: min {min} > max {max}")]
    InvertedWidth { min: u16, max: u16 },

    /// The separator would be eaten by trimming or is not typeable.
    #[error("Separator {0:?} must not be whitespace or a control character")]
    InvalidSeparator(char),

    /// A JSON option bag or candidate list could not be parsed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new empty class error.
    pub fn empty_class(option: &'static str) -> Self {
        Self::EmptyClass { option }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_offending_values() {
        let err = ConfigError::InvertedWidth { min: 40, max: 10 };
        let msg = err.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("10"));

        let err = ConfigError::empty_class("list");
        assert_eq!(err.to_string(), "Class name 'list' must not be empty");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<Vec<String>, _> = serde_json::from_str("[1,");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
