//! Tag input state.

use std::time::Instant;

use log::debug;

use crate::config::TagConfig;
use crate::error::ConfigError;
use crate::input::TextBuffer;

use super::drag::DragState;

/// Notifications queued by the tag input, drained with
/// [`TagInput::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Added(String),
    Removed(String),
    /// An add was refused because the tag exists; it is flashed instead.
    Duplicate(String),
    Reordered,
    Cleared,
    /// Tags were rebuilt from the serialized form value.
    Reloaded,
}

/// Split a serialized form value into tags.
///
/// Segments are trimmed; empty and repeated segments are dropped.
///
/// # Example
///
/// ```
/// assert_eq!(tagger::tags::split_tags("a,b,,c", ','), ["a", "b", "c"]);
/// assert_eq!(tagger::tags::split_tags(" x , x ", ','), ["x"]);
/// ```
pub fn split_tags(serialized: &str, separator: char) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for segment in serialized.split(separator) {
        let segment = segment.trim();
        if !segment.is_empty() && !tags.iter().any(|t| t == segment) {
            tags.push(segment.to_string());
        }
    }
    tags
}

#[derive(Debug, Clone)]
struct Highlight {
    tag: String,
    since: Instant,
}

/// Token editor over a single text field.
///
/// `form_value` is the submitted representation: the tags joined by the
/// configured separator, rewritten after every mutation.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use tagger::{TagConfig, TagInput};
///
/// let mut tags = TagInput::new(TagConfig::default(), "a,b,,c").unwrap();
/// assert_eq!(tags.tags(), ["a", "b", "c"]);
///
/// let now = Instant::now();
/// assert!(tags.add_tag(" d ", now));
/// assert!(!tags.add_tag("a", now));
/// assert_eq!(tags.highlighted_tag(now), Some("a"));
/// assert_eq!(tags.form_value(), "a,b,c,d");
/// ```
#[derive(Debug)]
pub struct TagInput {
    pub(super) config: TagConfig,
    pub(super) tags: Vec<String>,
    pub(super) pending: TextBuffer,
    form_value: String,
    highlight: Option<Highlight>,
    pub(super) drag: Option<DragState>,
    events: Vec<TagEvent>,
}

impl TagInput {
    /// Create a tag input from the bound field's current serialized value.
    pub fn new(config: TagConfig, initial_value: impl Into<String>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut input = Self {
            config,
            tags: Vec::new(),
            pending: TextBuffer::new(),
            form_value: initial_value.into(),
            highlight: None,
            drag: None,
            events: Vec::new(),
        };
        input.reload();
        input.events.clear();
        Ok(input)
    }

    pub fn config(&self) -> &TagConfig {
        &self.config
    }

    /// Committed tags in display order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Serialized value submitted with the form.
    pub fn form_value(&self) -> &str {
        &self.form_value
    }

    // -------------------------------------------------------------------------
    // Serialized value
    // -------------------------------------------------------------------------

    /// Rebuild the tags from the serialized form value, replacing all tags.
    pub fn reload(&mut self) {
        self.tags = split_tags(&self.form_value, self.config.separator);
        self.highlight = None;
        self.drag = None;
        self.sync_form_value();
        debug!("TagInput: reloaded {} tags", self.tags.len());
        self.events.push(TagEvent::Reloaded);
    }

    /// Replace the serialized form value programmatically and reload.
    pub fn set_form_value(&mut self, value: impl Into<String>) {
        self.form_value = value.into();
        self.reload();
    }

    fn sync_form_value(&mut self) {
        let mut separator = [0u8; 4];
        let separator = self.config.separator.encode_utf8(&mut separator);
        self.form_value = self.tags.join(separator);
    }

    // -------------------------------------------------------------------------
    // Tag list
    // -------------------------------------------------------------------------

    /// True if `name` (trimmed) exists. An empty name counts as present so
    /// that it can never be added.
    pub fn has_tag(&self, name: &str) -> bool {
        let name = name.trim();
        name.is_empty() || self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == name)
    }

    /// Append a tag. Refused (false) when empty or already present; an
    /// existing duplicate is flashed from `now`.
    pub fn add_tag(&mut self, name: &str, now: Instant) -> bool {
        if self.has_tag(name) {
            self.highlight_tag(name, now);
            return false;
        }
        let name = name.trim().to_string();
        debug!("TagInput: add {:?}", name);
        self.tags.push(name.clone());
        self.sync_form_value();
        self.events.push(TagEvent::Added(name));
        true
    }

    /// Remove a tag. False if it is not present.
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let name = name.trim();
        let Some(index) = self.position(name) else {
            return false;
        };
        debug!("TagInput: remove {:?}", name);
        let removed = self.tags.remove(index);
        if self.highlight.as_ref().is_some_and(|h| h.tag == removed) {
            self.highlight = None;
        }
        self.drag = None;
        self.sync_form_value();
        self.events.push(TagEvent::Removed(removed));
        true
    }

    /// Remove every tag.
    pub fn remove_all(&mut self) {
        self.tags.clear();
        self.highlight = None;
        self.drag = None;
        self.sync_form_value();
        self.events.push(TagEvent::Cleared);
    }

    /// Move the tag at `from` to position `to`.
    pub fn move_tag(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tags.len() || to >= self.tags.len() {
            return false;
        }
        if from != to {
            let tag = self.tags.remove(from);
            self.tags.insert(to, tag);
            self.sync_form_value();
            debug!("TagInput: moved {} -> {}", from, to);
            self.events.push(TagEvent::Reordered);
        }
        true
    }

    /// Adopt a new order given as a permutation of the current tags.
    pub fn reorder<S: AsRef<str>>(&mut self, new_order: &[S]) -> bool {
        if new_order.len() != self.tags.len() {
            return false;
        }
        let mut reordered: Vec<String> = Vec::with_capacity(new_order.len());
        for name in new_order {
            let name = name.as_ref().trim();
            if self.position(name).is_none() || reordered.iter().any(|t| t == name) {
                return false;
            }
            reordered.push(name.to_string());
        }
        self.tags = reordered;
        self.sync_form_value();
        self.events.push(TagEvent::Reordered);
        true
    }

    // -------------------------------------------------------------------------
    // Duplicate highlight
    // -------------------------------------------------------------------------

    /// Flash an existing tag for the configured duration, starting at `now`.
    pub fn highlight_tag(&mut self, name: &str, now: Instant) {
        let name = name.trim();
        if self.position(name).is_none() {
            return;
        }
        self.highlight = Some(Highlight {
            tag: name.to_string(),
            since: now,
        });
        self.events.push(TagEvent::Duplicate(name.to_string()));
    }

    /// The tag flashing at `now`: flashed no later than `now` and not yet
    /// expired.
    pub fn highlighted_tag(&self, now: Instant) -> Option<&str> {
        self.highlight
            .as_ref()
            .filter(|h| {
                now.checked_duration_since(h.since)
                    .is_some_and(|elapsed| elapsed < self.config.highlight_duration)
            })
            .map(|h| h.tag.as_str())
    }

    // -------------------------------------------------------------------------
    // Pending text
    // -------------------------------------------------------------------------

    /// Text typed but not yet committed.
    pub fn pending_text(&self) -> &str {
        self.pending.value()
    }

    pub fn pending(&self) -> &TextBuffer {
        &self.pending
    }

    pub fn set_pending_text(&mut self, text: impl Into<String>) {
        self.pending.set(text);
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Commit the pending text as a tag and clear it, even if the add is
    /// refused.
    pub fn commit_pending(&mut self, now: Instant) -> bool {
        let text = self.pending.value().to_string();
        self.pending.clear();
        self.add_tag(&text, now)
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<TagEvent> {
        std::mem::take(&mut self.events)
    }
}
