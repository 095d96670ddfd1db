//! A tag input with a suggestion dropdown attached to its text field.

use std::time::Instant;

use log::debug;

use crate::config::{SuggestConfig, TagConfig};
use crate::error::ConfigError;
use crate::input::{EventResult, Key, KeyCombo};
use crate::suggest::{SuggestEvent, SuggestionEngine, SuggestionItem, render_list};
use crate::tags::{TagEvent, TagInput, TextMeasure, UnicodeWidthMeasure, render_tags};

/// Notification from either half of a [`TagField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Tag(TagEvent),
    Suggest(SuggestEvent),
}

/// Tag input and suggestion engine sharing one text field.
///
/// Accepting a suggestion commits it as a tag; that is the only coupling
/// between the two.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use tagger::{Key, KeyCombo, SuggestConfig, TagConfig, TagField};
///
/// let mut field = TagField::new(TagConfig::default(), SuggestConfig::default(), "")
///     .unwrap()
///     .with_candidates(["rust", "ruby", "go"]);
///
/// let now = Instant::now();
/// field.focus();
/// field.handle_key(&KeyCombo::char('r'), now);
/// field.fire_due(now + field.suggestions().config().popup_delay);
/// assert!(field.suggestions().is_open());
///
/// field.handle_key(&KeyCombo::key(Key::Enter), now);
/// assert_eq!(field.tags().form_value(), "rust");
/// ```
pub struct TagField {
    tags: TagInput,
    suggestions: SuggestionEngine,
    measure: Box<dyn TextMeasure + Send>,
    container_width: Option<u16>,
    input_width: u16,
    events: Vec<FieldEvent>,
}

impl std::fmt::Debug for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagField")
            .field("tags", &self.tags)
            .field("suggestions", &self.suggestions)
            .field("container_width", &self.container_width)
            .field("input_width", &self.input_width)
            .finish_non_exhaustive()
    }
}

impl TagField {
    pub fn new(
        tag_config: TagConfig,
        suggest_config: SuggestConfig,
        initial_value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let mut field = Self {
            tags: TagInput::new(tag_config, initial_value)?,
            suggestions: SuggestionEngine::new(suggest_config)?,
            measure: Box::new(UnicodeWidthMeasure),
            container_width: None,
            input_width: 0,
            events: Vec::new(),
        };
        field.relayout();
        Ok(field)
    }

    pub fn with_candidates<I: SuggestionItem>(mut self, items: impl IntoIterator<Item = I>) -> Self {
        self.suggestions.set_candidates(items);
        self
    }

    /// Measure the pending text with `measure` instead of terminal cells.
    pub fn with_measure(mut self, measure: impl TextMeasure + Send + 'static) -> Self {
        self.measure = Box::new(measure);
        self.relayout();
        self
    }

    pub fn with_container_width(mut self, width: u16) -> Self {
        self.set_container_width(Some(width));
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn tags(&self) -> &TagInput {
        &self.tags
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    /// Current width of the pending-text field.
    pub fn input_width(&self) -> u16 {
        self.input_width
    }

    pub fn set_container_width(&mut self, width: Option<u16>) {
        self.container_width = width;
        self.relayout();
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Handle a key pressed in the text field at `now`.
    pub fn handle_key(&mut self, combo: &KeyCombo, now: Instant) -> EventResult {
        let result = self.suggestions.handle_key(combo);
        self.collect_at(now);
        if result.is_consumed() {
            self.relayout();
            return result;
        }

        let result = self.tags.handle_key(combo, now);
        match combo.key {
            Key::Tab | Key::Enter if result.is_consumed() => {
                self.suggestions.set_query(self.tags.pending_text());
            }
            _ => {
                self.suggestions
                    .on_query_changed(combo, self.tags.pending_text(), now);
            }
        }
        self.collect_at(now);
        self.relayout();
        result
    }

    // -------------------------------------------------------------------------
    // Focus and mouse
    // -------------------------------------------------------------------------

    pub fn focus(&mut self) {
        self.suggestions.focus();
        self.collect();
        self.relayout();
    }

    pub fn blur(&mut self) {
        self.suggestions.blur();
        self.collect();
        self.relayout();
    }

    pub fn click_input(&mut self) {
        self.suggestions.click_input();
        self.collect();
    }

    pub fn hover_item(&mut self, index: usize) -> bool {
        self.suggestions.hover_item(index)
    }

    /// A suggestion was clicked at `now`. True if it was committed as a tag.
    pub fn click_item(&mut self, index: usize, now: Instant) -> bool {
        let before = self.tags.tags().len();
        self.suggestions.click_item(index);
        self.collect_at(now);
        self.relayout();
        self.tags.tags().len() > before
    }

    pub fn list_mouse_down(&mut self) {
        self.suggestions.list_mouse_down();
    }

    pub fn list_mouse_up(&mut self) {
        self.suggestions.list_mouse_up();
    }

    /// A committed tag was clicked: it is removed.
    pub fn click_tag(&mut self, index: usize) -> bool {
        let Some(name) = self.tags.tags().get(index).cloned() else {
            return false;
        };
        self.remove_tag(&name)
    }

    // -------------------------------------------------------------------------
    // Programmatic changes
    // -------------------------------------------------------------------------

    pub fn set_candidates<I: SuggestionItem>(&mut self, items: impl IntoIterator<Item = I>) {
        self.suggestions.set_candidates(items);
    }

    pub fn set_form_value(&mut self, value: impl Into<String>) {
        self.tags.set_form_value(value);
        self.collect();
        self.relayout();
    }

    pub fn add_tag(&mut self, name: &str, now: Instant) -> bool {
        let added = self.tags.add_tag(name, now);
        self.collect();
        added
    }

    pub fn remove_tag(&mut self, name: &str) -> bool {
        let removed = self.tags.remove_tag(name);
        self.collect();
        removed
    }

    pub fn move_tag(&mut self, from: usize, to: usize) -> bool {
        let moved = self.tags.move_tag(from, to);
        self.collect();
        moved
    }

    // -------------------------------------------------------------------------
    // Timers
    // -------------------------------------------------------------------------

    pub fn next_deadline(&self) -> Option<Instant> {
        self.suggestions.next_deadline()
    }

    pub fn fire_due(&mut self, now: Instant) -> bool {
        let fired = self.suggestions.fire_due(now);
        if fired {
            self.collect_at(now);
        }
        fired
    }

    /// Cancel the pending timer and close the list.
    pub fn destroy(&mut self) {
        self.suggestions.destroy();
        self.collect();
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Render the tag container followed by the suggestion list.
    pub fn render(&self, now: Instant) -> String {
        let mut html = render_tags(&self.tags, now);
        html.push_str(&render_list(&self.suggestions));
        html
    }

    /// Drain queued notifications from both halves, in order.
    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        self.collect();
        std::mem::take(&mut self.events)
    }

    /// Commit accepted suggestions as tags (a duplicate flashes from `now`),
    /// then collect.
    fn collect_at(&mut self, now: Instant) {
        for event in self.suggestions.take_events() {
            if let SuggestEvent::Accepted(value) = &event {
                debug!("TagField: committing accepted suggestion {:?}", value);
                self.tags.on_suggestion_accepted(value, now);
                self.suggestions.set_query("");
            }
            self.events.push(FieldEvent::Suggest(event));
        }
        self.collect();
    }

    /// Move queued events into the field queue. Only keys and item clicks
    /// accept suggestions, and those go through `collect_at`.
    fn collect(&mut self) {
        self.events.extend(
            self.suggestions
                .take_events()
                .into_iter()
                .map(FieldEvent::Suggest),
        );
        self.events
            .extend(self.tags.take_events().into_iter().map(FieldEvent::Tag));
    }

    fn relayout(&mut self) {
        self.input_width = self
            .tags
            .input_width(self.measure.as_ref(), self.container_width);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const POPUP: Duration = Duration::from_millis(400);

    fn field(initial: &str) -> TagField {
        TagField::new(
            TagConfig::default().with_input_width(2, Some(20)),
            SuggestConfig::default(),
            initial,
        )
        .unwrap()
        .with_candidates(["rust", "ruby", "go", "python"])
    }

    fn type_text(field: &mut TagField, text: &str, now: Instant) {
        for c in text.chars() {
            field.handle_key(&KeyCombo::char(c), now);
        }
    }

    #[test]
    fn test_typing_opens_after_popup_delay() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "ru", now);
        assert!(!f.suggestions().is_open());
        assert_eq!(f.next_deadline(), Some(now + POPUP));

        assert!(!f.fire_due(now + Duration::from_millis(399)));
        assert!(f.fire_due(now + POPUP));
        let labels: Vec<_> = f
            .suggestions()
            .visible_items()
            .iter()
            .map(|i| i.label.as_str())
            .collect();
        assert_eq!(labels, ["rust", "ruby"]);
    }

    #[test]
    fn test_enter_accepts_suggestion_as_tag() {
        let mut f = field("go");
        let now = Instant::now();
        type_text(&mut f, "py", now);
        f.fire_due(now + POPUP);
        assert_eq!(
            f.handle_key(&KeyCombo::key(Key::Enter), now),
            EventResult::Consumed
        );
        assert_eq!(f.tags().form_value(), "go,python");
        assert_eq!(f.tags().pending_text(), "");
        assert_eq!(f.suggestions().query(), "");
        assert!(!f.suggestions().is_open());

        let events = f.take_events();
        assert!(events.contains(&FieldEvent::Suggest(SuggestEvent::Accepted(
            "python".into()
        ))));
        assert!(events.contains(&FieldEvent::Tag(TagEvent::Added("python".into()))));
    }

    #[test]
    fn test_enter_with_closed_list_commits_pending() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "zig", now);
        f.handle_key(&KeyCombo::key(Key::Enter), now);
        assert_eq!(f.tags().tags(), ["zig"]);
        assert_eq!(f.tags().pending_text(), "");
    }

    #[test]
    fn test_enter_with_nothing_active_closes_and_commits() {
        let mut f = TagField::new(
            TagConfig::default(),
            SuggestConfig::default().with_select_first(false),
            "",
        )
        .unwrap()
        .with_candidates(["rust", "ruby", "go"]);
        let now = Instant::now();
        type_text(&mut f, "ru", now);
        f.fire_due(now + POPUP);
        assert!(f.suggestions().is_open());
        assert_eq!(f.suggestions().active_index(), None);

        assert_eq!(
            f.handle_key(&KeyCombo::key(Key::Enter), now + POPUP),
            EventResult::Consumed
        );
        assert!(!f.suggestions().is_open());
        assert_eq!(f.tags().tags(), ["ru"]);
        assert_eq!(f.tags().pending_text(), "");
    }

    #[test]
    fn test_accepted_duplicate_flashes_from_key_time() {
        let mut f = field("go");
        let start = Instant::now();
        type_text(&mut f, "go", start);
        f.fire_due(start + POPUP);

        let pressed = start + Duration::from_secs(30);
        f.handle_key(&KeyCombo::key(Key::Enter), pressed);
        assert_eq!(f.tags().tags(), ["go"]);
        assert_eq!(f.tags().highlighted_tag(start + POPUP), None);
        assert_eq!(f.tags().highlighted_tag(pressed), Some("go"));
        assert!(
            f.take_events()
                .contains(&FieldEvent::Tag(TagEvent::Duplicate("go".into())))
        );
    }

    #[test]
    fn test_separator_commits_and_reschedules() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "zig,", now);
        assert_eq!(f.tags().tags(), ["zig"]);
        assert!(f.next_deadline().is_some());
    }

    #[test]
    fn test_click_item_commits() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "r", now);
        f.fire_due(now + POPUP);
        assert!(f.click_item(1, now));
        assert_eq!(f.tags().tags(), ["ruby"]);
    }

    #[test]
    fn test_click_tag_removes_it() {
        let mut f = field("a,b");
        assert!(f.click_tag(0));
        assert_eq!(f.tags().form_value(), "b");
        assert!(!f.click_tag(5));
    }

    #[test]
    fn test_blur_cancels_timer() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "r", now);
        f.blur();
        assert_eq!(f.next_deadline(), None);
    }

    #[test]
    fn test_input_width_follows_pending_text() {
        let mut f = field("");
        assert_eq!(f.input_width(), 2);
        type_text(&mut f, "abc", Instant::now());
        assert_eq!(f.input_width(), 5);
        f.handle_key(&KeyCombo::key(Key::Enter), Instant::now());
        assert_eq!(f.input_width(), 2);
    }

    #[test]
    fn test_render_includes_list_when_open() {
        let mut f = field("");
        let now = Instant::now();
        type_text(&mut f, "go", now);
        f.fire_due(now + POPUP);
        let html = f.render(now);
        assert!(html.starts_with("<div class=\"tag-container\">"));
        assert!(html.ends_with("<li class=\"active\" data-index=\"0\"><a><em>go</em></a></li></ul>"));
    }
}
