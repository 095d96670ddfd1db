//! Keyboard model and the editable text buffer shared by both widgets.

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Check if any modifier is active
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }

    /// Ctrl or Alt held: the key is a shortcut, not text entry.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key (including space)
    Char(char),
    /// Function keys F1-F12
    F(u8),
    /// Enter/Return
    Enter,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
    /// Tab
    Tab,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Insert
    Insert,
    /// Delete
    Delete,
}

impl Key {
    /// Moves the caret without changing the text.
    pub fn is_caret_motion(&self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Home | Key::End)
    }
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key code
    pub key: Key,
    /// Modifier keys
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a new key combo
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create an unmodified character key combo
    pub const fn char(c: char) -> Self {
        Self::key(Key::Char(c))
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add shift modifier
    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Add alt modifier
    pub const fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

impl From<Key> for KeyCombo {
    fn from(key: Key) -> Self {
        Self::key(key)
    }
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed: the key's default effect must not be applied.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// Single-line editable text with a caret (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    value: String,
    cursor: usize,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Caret position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the text, caret at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Insert a character at the caret.
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the caret (backspace).
    pub fn delete_char_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.value.remove(prev);
        self.cursor = prev;
        true
    }

    /// Delete the character at the caret (delete key).
    pub fn delete_char_at(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        self.value.remove(self.cursor);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Apply a plain editing key. Returns false for keys that are not edits.
    pub fn apply(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) => self.insert_char(c),
            Key::Backspace => {
                self.delete_char_before();
            }
            Key::Delete => {
                self.delete_char_at();
            }
            Key::Left => self.cursor_left(),
            Key::Right => self.cursor_right(),
            Key::Home => self.cursor_home(),
            Key::End => self.cursor_end(),
            _ => return false,
        }
        true
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut buf = TextBuffer::new();
        buf.insert_char('a');
        buf.insert_char('é');
        buf.insert_char('b');
        assert_eq!(buf.value(), "aéb");
        assert!(buf.delete_char_before());
        assert!(buf.delete_char_before());
        assert_eq!(buf.value(), "a");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = TextBuffer::new();
        assert!(!buf.delete_char_before());
        buf.set("ab");
        buf.cursor_home();
        assert!(!buf.delete_char_before());
        assert_eq!(buf.value(), "ab");
    }

    #[test]
    fn test_cursor_motion_multibyte() {
        let mut buf = TextBuffer::new();
        buf.set("héllo");
        buf.cursor_home();
        buf.cursor_right();
        buf.cursor_right();
        assert_eq!(buf.cursor(), 3);
        buf.cursor_left();
        assert_eq!(buf.cursor(), 1);
        assert!(buf.delete_char_at());
        assert_eq!(buf.value(), "hllo");
    }

    #[test]
    fn test_apply_rejects_non_edit_keys() {
        let mut buf = TextBuffer::new();
        assert!(!buf.apply(Key::Enter));
        assert!(!buf.apply(Key::Up));
        assert!(buf.apply(Key::Char('x')));
        assert_eq!(buf.value(), "x");
    }

    #[test]
    fn test_modifier_chords() {
        assert!(KeyCombo::char('c').ctrl().modifiers.is_chord());
        assert!(!KeyCombo::char('C').shift().modifiers.is_chord());
        assert!(KeyCombo::char('C').shift().modifiers.any());
    }
}
