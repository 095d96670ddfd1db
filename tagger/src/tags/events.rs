//! Keyboard handling for the tag input.

use std::time::Instant;

use log::trace;

use crate::input::{EventResult, Key, KeyCombo};

use super::TagInput;

impl TagInput {
    /// Handle a key pressed in the tag field.
    ///
    /// The separator and Tab/Enter commit the pending text. Backspace on an
    /// empty field pulls the last tag back for editing. Other editing keys
    /// change the pending text. A duplicate commit flashes from `now`.
    pub fn handle_key(&mut self, combo: &KeyCombo, now: Instant) -> EventResult {
        if combo.modifiers.is_chord() {
            return EventResult::Ignored;
        }

        trace!("TagInput::handle_key {:?}", combo.key);
        match combo.key {
            Key::Char(c) if c == self.config.separator => {
                if !self.pending.is_empty() {
                    self.commit_pending(now);
                }
                EventResult::Consumed
            }
            Key::Tab | Key::Enter => {
                if self.pending.is_empty() {
                    EventResult::Ignored
                } else {
                    self.commit_pending(now);
                    EventResult::Consumed
                }
            }
            Key::Backspace if self.pending.is_empty() => {
                if let Some(last) = self.tags.last().cloned() {
                    self.remove_tag(&last);
                    self.pending.set(last);
                }
                EventResult::Consumed
            }
            key => {
                if self.pending.apply(key) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
        }
    }

    /// A suggestion was accepted: commit it and clear the field.
    pub fn on_suggestion_accepted(&mut self, value: &str, now: Instant) -> bool {
        self.pending.clear();
        self.add_tag(value, now)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::TagConfig;
    use crate::tags::TagEvent;

    use super::*;

    fn input(initial: &str) -> TagInput {
        TagInput::new(TagConfig::default(), initial).unwrap()
    }

    fn press(tags: &mut TagInput, combo: KeyCombo) -> EventResult {
        tags.handle_key(&combo, Instant::now())
    }

    fn type_text(tags: &mut TagInput, text: &str) {
        for c in text.chars() {
            press(tags, KeyCombo::char(c));
        }
    }

    #[test]
    fn test_enter_commits_pending() {
        let mut tags = input("");
        type_text(&mut tags, "foo");
        assert_eq!(tags.pending_text(), "foo");
        assert_eq!(press(&mut tags, KeyCombo::key(Key::Enter)), EventResult::Consumed);
        assert_eq!(tags.tags(), ["foo"]);
        assert_eq!(tags.form_value(), "foo");
        assert_eq!(tags.pending_text(), "");
    }

    #[test]
    fn test_tab_commits_pending() {
        let mut tags = input("a");
        type_text(&mut tags, "bar");
        assert_eq!(press(&mut tags, KeyCombo::key(Key::Tab)), EventResult::Consumed);
        assert_eq!(tags.tags(), ["a", "bar"]);
        assert_eq!(tags.form_value(), "a,bar");
        assert_eq!(tags.pending_text(), "");
    }

    #[test]
    fn test_enter_on_empty_is_ignored() {
        let mut tags = input("a");
        assert_eq!(press(&mut tags, KeyCombo::key(Key::Enter)), EventResult::Ignored);
        assert_eq!(press(&mut tags, KeyCombo::key(Key::Tab)), EventResult::Ignored);
        assert_eq!(tags.tags(), ["a"]);
    }

    #[test]
    fn test_separator_commits_and_is_swallowed() {
        let mut tags = input("");
        type_text(&mut tags, "a,b,");
        assert_eq!(tags.tags(), ["a", "b"]);
        assert_eq!(tags.pending_text(), "");
        assert_eq!(press(&mut tags, KeyCombo::char(',')), EventResult::Consumed);
        assert_eq!(tags.tags(), ["a", "b"]);
    }

    #[test]
    fn test_separator_on_duplicate_is_swallowed() {
        let mut tags = input("foo,bar");
        type_text(&mut tags, "foo");
        tags.take_events();

        let now = Instant::now();
        assert_eq!(
            tags.handle_key(&KeyCombo::char(','), now),
            EventResult::Consumed
        );
        assert_eq!(tags.tags(), ["foo", "bar"]);
        assert_eq!(tags.form_value(), "foo,bar");
        assert_eq!(tags.pending_text(), "");
        assert_eq!(tags.highlighted_tag(now), Some("foo"));
        assert_eq!(tags.take_events(), [TagEvent::Duplicate("foo".into())]);
    }

    #[test]
    fn test_whitespace_pending_is_discarded() {
        let mut tags = input("");
        type_text(&mut tags, "  ");
        assert_eq!(press(&mut tags, KeyCombo::key(Key::Enter)), EventResult::Consumed);
        assert!(tags.tags().is_empty());
        assert_eq!(tags.pending_text(), "");
    }

    #[test]
    fn test_backspace_on_empty_pending_edits_last_tag() {
        let mut tags = input("a,b");
        assert_eq!(
            press(&mut tags, KeyCombo::key(Key::Backspace)),
            EventResult::Consumed
        );
        assert_eq!(tags.tags(), ["a"]);
        assert_eq!(tags.pending_text(), "b");
        assert_eq!(tags.form_value(), "a");
        assert_eq!(tags.take_events(), [TagEvent::Removed("b".into())]);
    }

    #[test]
    fn test_backspace_with_no_tags() {
        let mut tags = input("");
        assert_eq!(
            press(&mut tags, KeyCombo::key(Key::Backspace)),
            EventResult::Consumed
        );
        assert!(tags.tags().is_empty());
        assert_eq!(tags.pending_text(), "");
    }

    #[test]
    fn test_backspace_edits_pending_text() {
        let mut tags = input("a");
        type_text(&mut tags, "xy");
        press(&mut tags, KeyCombo::key(Key::Backspace));
        assert_eq!(tags.pending_text(), "x");
        assert_eq!(tags.tags(), ["a"]);
    }

    #[test]
    fn test_duplicate_commit_flashes_from_key_time() {
        let mut tags = input("foo");
        type_text(&mut tags, "foo");
        let pressed = Instant::now() + Duration::from_secs(60);
        tags.handle_key(&KeyCombo::key(Key::Enter), pressed);
        assert_eq!(tags.tags(), ["foo"]);
        assert_eq!(tags.pending_text(), "");
        assert_eq!(tags.highlighted_tag(pressed), Some("foo"));
        assert_eq!(tags.highlighted_tag(pressed + Duration::from_secs(2)), None);
        assert!(tags.take_events().contains(&TagEvent::Duplicate("foo".into())));
    }

    #[test]
    fn test_chords_ignored() {
        let mut tags = input("");
        assert_eq!(
            press(&mut tags, KeyCombo::char('a').ctrl()),
            EventResult::Ignored
        );
        assert_eq!(tags.pending_text(), "");
    }

    #[test]
    fn test_suggestion_accepted_commits() {
        let mut tags = input("a");
        type_text(&mut tags, "ex");
        assert!(tags.on_suggestion_accepted("example", Instant::now()));
        assert_eq!(tags.form_value(), "a,example");
        assert_eq!(tags.pending_text(), "");
    }
}
