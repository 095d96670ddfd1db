//! Keyboard, focus and mouse handling for the suggestion engine.

use log::trace;

use crate::input::{EventResult, Key, KeyCombo};

use super::SuggestionEngine;

impl SuggestionEngine {
    /// Handle the control keys before the input applies any text edit.
    ///
    /// Tab/Enter accept the active item, Up/Down move it, Escape closes.
    /// Text-editing keys are left to the caller, who reports the new text
    /// through [`on_query_changed`](Self::on_query_changed).
    pub fn handle_key(&mut self, combo: &KeyCombo) -> EventResult {
        self.has_focus = 1;

        // Ignore keys with ctrl/alt modifiers
        if combo.modifiers.is_chord() {
            return EventResult::Ignored;
        }

        trace!("SuggestionEngine::handle_key {:?}", combo.key);
        match combo.key {
            Key::Tab | Key::Enter => {
                if self.accept_active().is_some() {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Key::Up | Key::Down => {
                self.move_active(if combo.key == Key::Up { -1 } else { 1 });
                EventResult::Consumed
            }
            Key::Escape => {
                if self.hide() {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            _ => EventResult::Ignored,
        }
    }

    /// The bound input gained focus.
    pub fn focus(&mut self) {
        self.has_focus += 1;
    }

    /// The bound input lost focus. Closes the list unless the mouse is
    /// pressed on it.
    pub fn blur(&mut self) {
        self.has_focus = 0;
        if !self.mouse_down_on_list {
            self.hide();
        }
    }

    /// The bound input was clicked.
    ///
    /// The click that focuses the input leaves the list alone; later clicks
    /// toggle it.
    pub fn click_input(&mut self) {
        let parity = self.has_focus % 2;
        self.has_focus += 1;
        if parity < 1 && !self.is_open() {
            self.show();
        } else {
            self.hide();
        }
    }

    /// The pointer moved over a list entry.
    pub fn hover_item(&mut self, index: usize) -> bool {
        self.set_active(index)
    }

    /// A list entry was clicked: same as accepting it with Enter.
    pub fn click_item(&mut self, index: usize) -> Option<String> {
        if !self.set_active(index) {
            return None;
        }
        self.accept_active()
    }

    pub fn list_mouse_down(&mut self) {
        self.mouse_down_on_list = true;
    }

    pub fn list_mouse_up(&mut self) {
        self.mouse_down_on_list = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestConfig;
    use crate::suggest::{DropdownState, SuggestEvent};

    fn engine() -> SuggestionEngine {
        SuggestionEngine::new(SuggestConfig::default().with_limit(3))
            .unwrap()
            .with_candidates(["auto", "complete", "test", "example"])
    }

    #[test]
    fn test_enter_accepts_active() {
        let mut e = engine();
        e.show();
        e.move_active(1);
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Enter)), EventResult::Consumed);
        assert!(e.take_events().contains(&SuggestEvent::Accepted("complete".into())));
    }

    #[test]
    fn test_enter_when_closed_is_ignored() {
        let mut e = engine();
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Enter)), EventResult::Ignored);
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Tab)), EventResult::Ignored);
    }

    #[test]
    fn test_arrows_always_consumed() {
        let mut e = engine();
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Down)), EventResult::Consumed);
        assert!(e.is_open());
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Up)), EventResult::Consumed);
        assert_eq!(e.active_index(), Some(2));
    }

    #[test]
    fn test_escape_consumed_only_when_open() {
        let mut e = engine();
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Escape)), EventResult::Ignored);
        e.show();
        assert_eq!(e.handle_key(&KeyCombo::key(Key::Escape)), EventResult::Consumed);
        assert_eq!(e.state(), DropdownState::Closed);
    }

    #[test]
    fn test_chords_ignored() {
        let mut e = engine();
        e.show();
        assert_eq!(
            e.handle_key(&KeyCombo::key(Key::Enter).ctrl()),
            EventResult::Ignored
        );
        assert!(e.is_open());
    }

    #[test]
    fn test_blur_hides_unless_mouse_down_on_list() {
        let mut e = engine();
        e.show();
        e.list_mouse_down();
        e.blur();
        assert!(e.is_open());
        e.list_mouse_up();
        e.blur();
        assert!(!e.is_open());
    }

    #[test]
    fn test_click_input_toggles_after_focus() {
        let mut e = engine();
        e.focus();
        e.click_input();
        assert!(!e.is_open());
        e.click_input();
        assert!(e.is_open());
        e.click_input();
        assert!(!e.is_open());
    }

    #[test]
    fn test_hover_marks_active() {
        let mut e = engine();
        e.show();
        assert!(e.hover_item(2));
        assert_eq!(e.active_index(), Some(2));
        // The "more" marker sits at index 3
        assert!(!e.hover_item(3));
        assert_eq!(e.active_index(), Some(2));
    }

    #[test]
    fn test_click_item_accepts_it() {
        let mut e = engine();
        e.show();
        assert_eq!(e.click_item(1).as_deref(), Some("complete"));
        assert!(!e.is_open());
        assert_eq!(e.click_item(0), None);
    }
}
