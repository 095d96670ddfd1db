//! Drag-and-drop reordering of committed tags.

use log::trace;

use super::TagInput;

/// An in-progress drag: the tag picked up and the slot it hovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub from: usize,
    pub over: usize,
}

impl TagInput {
    /// Pick up the tag at `index`.
    pub fn drag_start(&mut self, index: usize) -> bool {
        if index >= self.tags.len() {
            return false;
        }
        trace!("TagInput: drag start {}", index);
        self.drag = Some(DragState {
            from: index,
            over: index,
        });
        true
    }

    /// Move the dragged tag over the slot at `index`.
    pub fn drag_over(&mut self, index: usize) -> bool {
        match self.drag.as_mut() {
            Some(drag) if index < self.tags.len() => {
                drag.over = index;
                true
            }
            _ => false,
        }
    }

    /// Drop the dragged tag into the hovered slot. The form value is
    /// rewritten in the new order.
    pub fn drop_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => self.move_tag(drag.from, drag.over),
            None => false,
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TagConfig;
    use crate::tags::{TagEvent, TagInput};

    use super::*;

    fn input() -> TagInput {
        TagInput::new(TagConfig::default(), "a,b,c").unwrap()
    }

    #[test]
    fn test_drag_and_drop_reorders() {
        let mut tags = input();
        assert!(tags.drag_start(0));
        assert!(tags.drag_over(2));
        assert_eq!(tags.drag_state(), Some(DragState { from: 0, over: 2 }));
        assert!(tags.drop_drag());
        assert_eq!(tags.form_value(), "b,c,a");
        assert_eq!(tags.drag_state(), None);
        assert_eq!(tags.take_events(), [TagEvent::Reordered]);
    }

    #[test]
    fn test_drop_without_drag() {
        let mut tags = input();
        assert!(!tags.drop_drag());
        assert!(!tags.drag_over(1));
    }

    #[test]
    fn test_drag_out_of_range() {
        let mut tags = input();
        assert!(!tags.drag_start(3));
        assert!(tags.drag_start(1));
        assert!(!tags.drag_over(5));
        assert_eq!(tags.drag_state(), Some(DragState { from: 1, over: 1 }));
    }

    #[test]
    fn test_cancel_keeps_order() {
        let mut tags = input();
        tags.drag_start(0);
        tags.drag_over(2);
        tags.cancel_drag();
        assert!(!tags.drop_drag());
        assert_eq!(tags.form_value(), "a,b,c");
    }

    #[test]
    fn test_remove_during_drag_cancels_it() {
        let mut tags = input();
        tags.drag_start(2);
        tags.remove_tag("a");
        assert_eq!(tags.drag_state(), None);
    }
}
