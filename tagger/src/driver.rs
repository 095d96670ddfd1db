//! Async driver for a [`TagField`].
//!
//! The field itself is synchronous and takes the current time as an
//! argument. The driver owns it on a tokio task, feeds it inputs from a
//! channel and sleeps until the next debounce deadline, publishing a
//! [`FieldSnapshot`] after every step.

use std::time::Instant;

use log::{debug, trace};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep_until;

use crate::field::TagField;
use crate::input::KeyCombo;
use crate::suggest::Suggestion;

/// Capacity of the input channel.
const INPUT_BUFFER: usize = 64;

/// Errors from talking to a running driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("tag field driver has stopped")]
    Closed,

    #[error("tag field driver input queue is full")]
    Full,
}

/// An input delivered to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Key(KeyCombo),
    Focus,
    Blur,
    ClickInput,
    HoverItem(usize),
    ClickItem(usize),
    ClickTag(usize),
    ListMouseDown,
    ListMouseUp,
    SetCandidates(Vec<Suggestion>),
    SetFormValue(String),
    RemoveTag(String),
    SetContainerWidth(Option<u16>),
}

/// What a view needs to draw the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub tags: Vec<String>,
    pub form_value: String,
    pub pending: String,
    pub input_width: u16,
    pub open: bool,
    /// Labels of the visible suggestions.
    pub suggestions: Vec<String>,
    pub has_more: bool,
    pub active: Option<usize>,
    /// Tag currently flashing as a duplicate.
    pub highlighted: Option<String>,
}

impl FieldSnapshot {
    fn capture(field: &TagField, now: Instant) -> Self {
        let tags = field.tags();
        let suggestions = field.suggestions();
        Self {
            tags: tags.tags().to_vec(),
            form_value: tags.form_value().to_string(),
            pending: tags.pending_text().to_string(),
            input_width: field.input_width(),
            open: suggestions.is_open(),
            suggestions: suggestions
                .visible_items()
                .iter()
                .map(|item| item.label.clone())
                .collect(),
            has_more: suggestions.has_more(),
            active: suggestions.active_index(),
            highlighted: tags.highlighted_tag(now).map(str::to_string),
        }
    }
}

/// Sending half: delivers inputs and exposes snapshots.
///
/// The driver stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<FieldInput>,
    snapshots: watch::Receiver<FieldSnapshot>,
}

impl DriverHandle {
    /// Queue an input, waiting for room in the channel.
    pub async fn send(&self, input: FieldInput) -> Result<(), DriverError> {
        self.tx.send(input).await.map_err(|_| DriverError::Closed)
    }

    /// Queue an input without waiting.
    pub fn try_send(&self, input: FieldInput) -> Result<(), DriverError> {
        self.tx.try_send(input).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DriverError::Full,
            mpsc::error::TrySendError::Closed(_) => DriverError::Closed,
        })
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<FieldSnapshot> {
        self.snapshots.clone()
    }
}

/// Owns a [`TagField`] and runs it until every [`DriverHandle`] is dropped.
pub struct Driver {
    field: TagField,
    rx: mpsc::Receiver<FieldInput>,
    snapshots: watch::Sender<FieldSnapshot>,
}

impl Driver {
    pub fn new(field: TagField) -> (Self, DriverHandle) {
        let (tx, rx) = mpsc::channel(INPUT_BUFFER);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(FieldSnapshot::capture(&field, now()));
        let driver = Self {
            field,
            rx,
            snapshots: snapshot_tx,
        };
        let handle = DriverHandle {
            tx,
            snapshots: snapshot_rx,
        };
        (driver, handle)
    }

    /// Run until the input channel closes, then return the field with its
    /// timer cancelled.
    pub async fn run(mut self) -> TagField {
        debug!("Driver: started");
        self.publish();

        loop {
            let deadline = self.field.next_deadline();

            tokio::select! {
                biased;

                input = self.rx.recv() => match input {
                    Some(input) => self.apply(input),
                    None => break,
                },

                _ = sleep_until_optional(deadline) => {
                    trace!("Driver: deadline reached");
                    self.field.fire_due(now());
                }
            }

            // Events are surfaced through snapshots only
            self.field.take_events();
            self.publish();
        }

        debug!("Driver: input closed, stopping");
        self.field.destroy();
        self.field.take_events();
        self.publish();
        self.field
    }

    fn apply(&mut self, input: FieldInput) {
        trace!("Driver: input {:?}", input);
        let field = &mut self.field;
        match input {
            FieldInput::Key(combo) => {
                field.handle_key(&combo, now());
            }
            FieldInput::Focus => field.focus(),
            FieldInput::Blur => field.blur(),
            FieldInput::ClickInput => field.click_input(),
            FieldInput::HoverItem(index) => {
                field.hover_item(index);
            }
            FieldInput::ClickItem(index) => {
                field.click_item(index, now());
            }
            FieldInput::ClickTag(index) => {
                field.click_tag(index);
            }
            FieldInput::ListMouseDown => field.list_mouse_down(),
            FieldInput::ListMouseUp => field.list_mouse_up(),
            FieldInput::SetCandidates(candidates) => field.set_candidates(candidates),
            FieldInput::SetFormValue(value) => field.set_form_value(value),
            FieldInput::RemoveTag(name) => {
                field.remove_tag(&name);
            }
            FieldInput::SetContainerWidth(width) => field.set_container_width(width),
        }
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(FieldSnapshot::capture(&self.field, now()));
    }
}

/// Current time on the tokio clock, so paused-time tests drive the debounce.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Sleep until a deadline, or wait forever if None.
async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}
