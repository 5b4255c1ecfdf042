use crate::core::geometry::Rect;

/// Input events a snippet can receive from its host page.
///
/// Hosts either forward raw pointer coordinates (the snippet hit-tests and
/// measures itself) or report drags on elements they laid out, with the
/// element's live bounding rect on every move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at world coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/cursor moved to world coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// A touch/click ended at world coordinates (x, y).
    PointerUp { x: f32, y: f32 },
    /// The host started dragging element `target`.
    DragStart { target: u32 },
    /// The dragged element's live bounding rect.
    DragMove { target: u32, rect: Rect },
    /// The host released element `target`.
    DragEnd { target: u32 },
    /// The spin handle is dragged `offset` units along its track.
    SliderDrag { offset: f32 },
    /// The spin handle was released.
    SliderRelease,
    /// A custom event from the UI layer (buttons, wizard navigation).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; the runner hands them to one fixed step.
#[derive(Debug)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move all pending events into a new queue.
    pub fn take(&mut self) -> InputQueue {
        InputQueue { events: self.drain() }
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<InputEvent> for InputQueue {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self { events: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::DragStart { target: 1 });
        q.push(InputEvent::SliderRelease);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn take_moves_events() {
        let mut q: InputQueue = [
            InputEvent::PointerDown { x: 1.0, y: 2.0 },
            InputEvent::DragMove { target: 0, rect: Rect::new(0.0, 0.0, 4.0, 4.0) },
        ]
        .into_iter()
        .collect();
        let taken = q.take();
        assert!(q.is_empty());
        assert_eq!(taken.len(), 2);
        let second = taken.iter().nth(1);
        match second {
            Some(InputEvent::DragMove { target, rect }) => {
                assert_eq!(*target, 0);
                assert_eq!(rect.width(), 4.0);
            }
            other => panic!("Expected DragMove, got {:?}", other),
        }
    }
}
