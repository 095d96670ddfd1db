//! Suggestion engine state.

use std::time::Instant;

use log::{debug, trace};

use crate::config::SuggestConfig;
use crate::error::ConfigError;
use crate::input::{Key, KeyCombo};

use super::filter::QueryMatcher;
use super::item::{Suggestion, SuggestionItem};

/// Which debounced action is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    /// The list was closed when scheduled: run a full `show()`.
    Popup,
    /// The list was open when scheduled: refresh it if the query changed.
    Update,
}

#[derive(Debug, Clone, Copy)]
struct PendingFilter {
    kind: FilterKind,
    deadline: Instant,
}

/// A rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    /// Index into the candidate list.
    pub index: usize,
    /// Value handed out on acceptance.
    pub value: String,
    /// Plain label.
    pub label: String,
    /// Label with the query occurrences wrapped in highlight markup.
    pub markup: String,
}

/// Dropdown interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    /// Open, nothing highlighted.
    Open,
    /// Open with an active item.
    OpenWithActive,
}

/// Notifications queued by the engine, drained with
/// [`SuggestionEngine::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEvent {
    Opened,
    Closed,
    /// A suggestion was accepted; carries its value.
    Accepted(String),
}

/// Suggestion dropdown bound to one text input.
///
/// The engine never touches a clock itself: debounced work is recorded as a
/// deadline that the host polls with [`fire_due`](Self::fire_due), at most one
/// pending at a time.
///
/// # Example
///
/// ```
/// use tagger::{SuggestConfig, SuggestionEngine};
///
/// let mut engine = SuggestionEngine::new(SuggestConfig::default())
///     .unwrap()
///     .with_candidates(["auto", "complete", "test"]);
///
/// engine.set_query("te");
/// assert!(engine.show());
/// let labels: Vec<_> = engine.visible_items().iter().map(|i| i.label.as_str()).collect();
/// assert_eq!(labels, ["complete", "test"]);
/// assert_eq!(engine.accept_active().as_deref(), Some("complete"));
/// ```
#[derive(Debug)]
pub struct SuggestionEngine {
    config: SuggestConfig,
    candidates: Vec<Suggestion>,

    /// Current text of the bound input.
    query: String,
    /// Query of the last filter pass; `None` forces the next one.
    previous_query: Option<String>,

    visible: Vec<VisibleItem>,
    /// More matches exist than `limit` allows.
    has_more: bool,
    active: Option<usize>,
    open: bool,

    /// Focus/click parity counter for click-to-toggle.
    pub(super) has_focus: u32,
    /// Mouse button is down on the list; a blur now must not close it.
    pub(super) mouse_down_on_list: bool,

    pending: Option<PendingFilter>,
    events: Vec<SuggestEvent>,
}

impl SuggestionEngine {
    /// Create an engine with no candidates.
    pub fn new(config: SuggestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            candidates: Vec::new(),
            query: String::new(),
            previous_query: None,
            visible: Vec::new(),
            has_more: false,
            active: None,
            open: false,
            has_focus: 0,
            mouse_down_on_list: false,
            pending: None,
            events: Vec::new(),
        })
    }

    /// Builder form of [`set_candidates`](Self::set_candidates).
    pub fn with_candidates<I: SuggestionItem>(mut self, items: impl IntoIterator<Item = I>) -> Self {
        self.set_candidates(items);
        self
    }

    /// Replace the candidate universe. Takes effect on the next filter pass.
    pub fn set_candidates<I: SuggestionItem>(&mut self, items: impl IntoIterator<Item = I>) {
        self.candidates = items.into_iter().map(|i| i.to_suggestion()).collect();
        self.previous_query = None;
        debug!("SuggestionEngine: {} candidates", self.candidates.len());
    }

    pub fn candidates(&self) -> &[Suggestion] {
        &self.candidates
    }

    pub fn config(&self) -> &SuggestConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Query
    // -------------------------------------------------------------------------

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Set the query programmatically. Nothing is scheduled.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Post-edit hook for a key that may have changed the input text.
    ///
    /// Caret motion and ctrl/alt chords are ignored. Backspace/Delete force
    /// a refresh and close the list once the text is empty. Anything else
    /// schedules a debounced refresh if the text actually changed.
    pub fn on_query_changed(&mut self, combo: &KeyCombo, text: &str, now: Instant) {
        if combo.modifiers.is_chord() || combo.key.is_caret_motion() {
            return;
        }

        match combo.key {
            Key::Backspace | Key::Delete => {
                self.previous_query = None;
                self.query = text.to_string();
                if text.is_empty() {
                    self.hide();
                } else {
                    self.schedule(now);
                }
            }
            _ => {
                if text == self.query {
                    return;
                }
                self.query = text.to_string();
                self.schedule(now);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Debounce timer
    // -------------------------------------------------------------------------

    /// Replace any pending timer with a new one.
    fn schedule(&mut self, now: Instant) {
        let (kind, delay) = if self.open {
            (FilterKind::Update, self.config.update_delay)
        } else {
            (FilterKind::Popup, self.config.popup_delay)
        };
        trace!("SuggestionEngine: schedule {:?} in {:?}", kind, delay);
        self.pending = Some(PendingFilter {
            kind,
            deadline: now + delay,
        });
    }

    /// When the pending filter update is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Run the pending filter update if its deadline has passed.
    ///
    /// Returns true if a timer fired.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.deadline > now {
            return false;
        }
        self.pending = None;
        trace!("SuggestionEngine: timer fired {:?}", pending.kind);
        match pending.kind {
            FilterKind::Popup => {
                self.show();
            }
            FilterKind::Update => {
                self.update();
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Show / hide
    // -------------------------------------------------------------------------

    /// Filter against the current query and open if anything matches.
    ///
    /// Returns whether the list is open afterwards.
    pub fn show(&mut self) -> bool {
        self.previous_query = None;
        self.update()
    }

    /// Refresh the list unless the query is unchanged since the last pass.
    fn update(&mut self) -> bool {
        if self.previous_query.as_deref() == Some(self.query.as_str()) {
            return self.open;
        }
        self.previous_query = Some(self.query.clone());
        self.refilter();

        if self.visible.is_empty() {
            self.hide();
            return false;
        }

        self.active = if self.config.select_first { Some(0) } else { None };
        if !self.open {
            self.open = true;
            debug!(
                "SuggestionEngine: open query={:?} visible={} more={}",
                self.query,
                self.visible.len(),
                self.has_more
            );
            self.events.push(SuggestEvent::Opened);
        }
        true
    }

    fn refilter(&mut self) {
        let matcher = QueryMatcher::new(&self.query, self.config.match_case);
        let limit = self.config.limit;
        let highlight = !self.query.is_empty();

        let mut total = 0;
        let mut visible = Vec::new();
        for (index, candidate) in self.candidates.iter().enumerate() {
            if !matcher.is_match(&candidate.label) {
                continue;
            }
            total += 1;
            if visible.len() < limit {
                let markup = if highlight {
                    matcher.highlight(&candidate.label, &self.config.highlighting)
                } else {
                    candidate.label.clone()
                };
                visible.push(VisibleItem {
                    index,
                    value: candidate.value.clone(),
                    label: candidate.label.clone(),
                    markup,
                });
            }
        }

        self.has_more = total > limit;
        self.visible = visible;
    }

    /// Cancel the pending timer and close the list.
    ///
    /// Returns whether the list was open.
    pub fn hide(&mut self) -> bool {
        self.pending = None;
        if !self.open {
            return false;
        }
        self.open = false;
        self.active = None;
        self.visible.clear();
        self.has_more = false;
        debug!("SuggestionEngine: close");
        self.events.push(SuggestEvent::Closed);
        true
    }

    /// Tear down: cancels the timer and closes without further events.
    pub fn destroy(&mut self) {
        self.hide();
        self.events.clear();
    }

    // -------------------------------------------------------------------------
    // Active item
    // -------------------------------------------------------------------------

    /// Move the active item by `step`, wrapping at both ends.
    ///
    /// Opens the list instead when it is closed.
    pub fn move_active(&mut self, step: isize) {
        if !self.open {
            self.show();
            return;
        }

        let len = self.visible.len() as isize;
        if len < 1 {
            return;
        }

        let current = self.active.map(|i| i as isize).unwrap_or(-1);
        let mut next = current + step;
        if next < 0 {
            next = len - 1;
        } else if next >= len {
            next = 0;
        }
        self.active = Some(next as usize);
    }

    /// Mark a visible item active. The "more" marker is not addressable.
    pub fn set_active(&mut self, index: usize) -> bool {
        if !self.open || index >= self.visible.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&VisibleItem> {
        self.active.and_then(|i| self.visible.get(i))
    }

    /// Accept the active item: closes the list and queues
    /// [`SuggestEvent::Accepted`].
    ///
    /// `None` if the list is closed or nothing is active (the list still
    /// closes in the latter case).
    pub fn accept_active(&mut self) -> Option<String> {
        if !self.open {
            return None;
        }
        let selected = self.active().map(|item| item.value.clone());
        self.hide();

        let value = selected?;
        debug!("SuggestionEngine: accepted {:?}", value);
        self.query = value.clone();
        self.previous_query = Some(value.clone());
        self.events.push(SuggestEvent::Accepted(value.clone()));
        Some(value)
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> DropdownState {
        match (self.open, self.active) {
            (false, _) => DropdownState::Closed,
            (true, None) => DropdownState::Open,
            (true, Some(_)) => DropdownState::OpenWithActive,
        }
    }

    /// Items currently rendered, at most `limit`.
    pub fn visible_items(&self) -> &[VisibleItem] {
        &self.visible
    }

    /// A trailing "more results" marker follows the visible items.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<SuggestEvent> {
        std::mem::take(&mut self.events)
    }
}
