//! Widget configuration.
//!
//! Both configs mirror the option bags the widgets historically accepted:
//! every field has a default, builders override individual fields, and
//! `from_json` accepts the same options as a camelCase JSON object with
//! delays given in milliseconds.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::suggest::HighlightTemplate;

/// Deserialize a millisecond count into a `Duration`.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

fn check_class(option: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::empty_class(option));
    }
    Ok(())
}

// =============================================================================
// Suggestions
// =============================================================================

/// CSS class names used when rendering the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuggestClasses {
    /// Class of the `<ul>` dropdown.
    pub list: String,
    /// Class of the active `<li>`.
    pub active: String,
    /// Class of the trailing "more results" marker.
    pub more: String,
}

impl Default for SuggestClasses {
    fn default() -> Self {
        Self {
            list: "suggestions".into(),
            active: "active".into(),
            more: "more".into(),
        }
    }
}

/// Configuration for a [`SuggestionEngine`](crate::SuggestionEngine).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tagger::SuggestConfig;
///
/// let config = SuggestConfig::default()
///     .with_limit(5)
///     .with_popup_delay(Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestConfig {
    /// Maximum number of items visible at once.
    ///
    /// Default: 10
    pub limit: usize,

    /// Mark the first item active whenever the list is (re)filled.
    ///
    /// Default: true
    pub select_first: bool,

    /// Delay before the list pops up while it is closed.
    ///
    /// Default: 400ms
    #[serde(deserialize_with = "millis::deserialize")]
    pub popup_delay: Duration,

    /// Delay before an already open list is refreshed.
    ///
    /// Default: 100ms
    #[serde(deserialize_with = "millis::deserialize")]
    pub update_delay: Duration,

    /// Match query case exactly.
    ///
    /// Default: false
    pub match_case: bool,

    /// Markup wrapped around matched text; `$1` (or `$&`) is the match and
    /// `$$` a literal dollar sign.
    ///
    /// Default: `<em>$1</em>`
    pub highlighting: String,

    /// Class names for the rendered list.
    pub classes: SuggestClasses,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            select_first: true,
            popup_delay: Duration::from_millis(400),
            update_delay: Duration::from_millis(100),
            match_case: false,
            highlighting: "<em>$1</em>".into(),
            classes: SuggestClasses::default(),
        }
    }
}

impl SuggestConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON option bag; missing options keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the maximum number of visible items.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets whether the first item is activated automatically.
    pub fn with_select_first(mut self, select_first: bool) -> Self {
        self.select_first = select_first;
        self
    }

    /// Sets the popup delay.
    pub fn with_popup_delay(mut self, delay: Duration) -> Self {
        self.popup_delay = delay;
        self
    }

    /// Sets the update delay.
    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    /// Sets case-sensitive matching.
    pub fn with_match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }

    /// Sets the highlight template.
    pub fn with_highlighting(mut self, template: impl Into<String>) -> Self {
        self.highlighting = template.into();
        self
    }

    /// Sets the rendered class names.
    pub fn with_classes(mut self, classes: SuggestClasses) -> Self {
        self.classes = classes;
        self
    }

    /// Checks the option values once, at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if !HighlightTemplate::parse(&self.highlighting).has_match() {
            return Err(ConfigError::MissingHighlightCapture {
                template: self.highlighting.clone(),
            });
        }
        check_class("list", &self.classes.list)?;
        check_class("active", &self.classes.active)?;
        check_class("more", &self.classes.more)?;
        Ok(())
    }
}

// =============================================================================
// Tags
// =============================================================================

/// CSS class names used when rendering the tag container.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TagClasses {
    /// Class of the wrapping container.
    pub container: String,
    /// Class of each tag token (and the text input).
    pub tag: String,
    /// Class added to a tag while it flashes as a duplicate.
    pub highlight: String,
    /// Class added to the tag being dragged.
    pub drag: String,
}

impl Default for TagClasses {
    fn default() -> Self {
        Self {
            container: "tag-container".into(),
            tag: "tag".into(),
            highlight: "highlight".into(),
            drag: "dragging".into(),
        }
    }
}

/// Configuration for a [`TagInput`](crate::TagInput).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagConfig {
    /// Joins tags in the form value and commits the pending text when typed.
    ///
    /// Default: `,`
    pub separator: char,

    /// How long a duplicate tag stays highlighted.
    ///
    /// Default: 2s
    #[serde(deserialize_with = "millis::deserialize")]
    pub highlight_duration: Duration,

    /// Narrowest the pending-text field may become.
    ///
    /// Default: 30
    pub input_min_width: u16,

    /// Widest the pending-text field may become; `None` uses the space the
    /// container has left.
    ///
    /// Default: 300
    pub input_max_width: Option<u16>,

    /// Form field name carried over to the hidden input.
    pub name: Option<String>,

    /// Class names for the rendered container.
    pub classes: TagClasses,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            separator: ',',
            highlight_duration: Duration::from_millis(2000),
            input_min_width: 30,
            input_max_width: Some(300),
            name: None,
            classes: TagClasses::default(),
        }
    }
}

impl TagConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON option bag; missing options keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the duplicate highlight duration.
    pub fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }

    /// Sets the input width bounds. `max: None` follows the container.
    pub fn with_input_width(mut self, min: u16, max: Option<u16>) -> Self {
        self.input_min_width = min;
        self.input_max_width = max;
        self
    }

    /// Sets the form field name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the rendered class names.
    pub fn with_classes(mut self, classes: TagClasses) -> Self {
        self.classes = classes;
        self
    }

    /// Checks the option values once, at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_whitespace() || self.separator.is_control() {
            return Err(ConfigError::InvalidSeparator(self.separator));
        }
        if let Some(max) = self.input_max_width
            && self.input_min_width > max
        {
            return Err(ConfigError::InvertedWidth {
                min: self.input_min_width,
                max,
            });
        }
        check_class("container", &self.classes.container)?;
        check_class("tag", &self.classes.tag)?;
        check_class("highlight", &self.classes.highlight)?;
        check_class("drag", &self.classes.drag)?;
        Ok(())
    }
}
