//! Editor events and the queue that carries them.
//! Uses crossbeam channels so the host input layer can push from anywhere;
//! the session drains the queue once per UI tick, in arrival order.

use crate::core::line::Language;
use crate::core::timeline::MarkerId;
use crossbeam::channel;
use egui::{PointerButton, Pos2, Vec2};

/// Kind of the last pointer event, tracked by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Down,
    Move,
    Up,
    Wheel,
}

/// Raw pointer input, in egui screen points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2, button: PointerButton },
    Move { pos: Pos2 },
    Up { pos: Pos2, button: PointerButton },
    /// `delta.y > 0` zooms in
    Wheel { pos: Pos2, delta: Vec2 },
}

impl PointerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PointerEvent::Down { .. } => EventKind::Down,
            PointerEvent::Move { .. } => EventKind::Move,
            PointerEvent::Up { .. } => EventKind::Up,
            PointerEvent::Wheel { .. } => EventKind::Wheel,
        }
    }

    pub fn pos(&self) -> Pos2 {
        match *self {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos }
            | PointerEvent::Up { pos, .. }
            | PointerEvent::Wheel { pos, .. } => pos,
        }
    }
}

/// Toolbar and menu actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    /// Play from Stopped/Paused, pause while Playing
    TogglePlay,
    Stop,
    /// Add a marker at the selection playhead
    AddMarker,
    RemoveSelectedMarker,
    /// Context menu "Delete"
    DeleteMarker(MarkerId),
    SetLanguage(Language),
    SetZoom(f32),
    /// Pan the zoomed timeline by this many points; positive moves toward the end
    ScrollBy(f32),
    /// Scroll offset in points, e.g. from a host scrollbar
    ScrollTo(f32),
}

/// Anything the session reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    Pointer(PointerEvent),
    Command(EditorCommand),
}

impl From<PointerEvent> for EditorEvent {
    fn from(event: PointerEvent) -> Self {
        EditorEvent::Pointer(event)
    }
}

impl From<EditorCommand> for EditorEvent {
    fn from(command: EditorCommand) -> Self {
        EditorEvent::Command(command)
    }
}

/// Producer handle for the event queue
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: channel::Sender<EditorEvent>,
}

impl EventSender {
    /// Queue an event. Returns false if the session is gone.
    pub fn send(&self, event: impl Into<EditorEvent>) -> bool {
        self.tx.send(event.into()).is_ok()
    }
}

/// FIFO of pending editor events
#[derive(Debug)]
pub struct EventQueue {
    tx: channel::Sender<EditorEvent>,
    rx: channel::Receiver<EditorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    pub fn push(&self, event: impl Into<EditorEvent>) {
        // The queue owns a receiver, so the channel cannot be disconnected here
        let _ = self.tx.send(event.into());
    }

    /// Take every queued event, oldest first
    pub fn drain(&self) -> Vec<EditorEvent> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_keeps_arrival_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();

        queue.push(PointerEvent::Move { pos: Pos2::new(1.0, 0.0) });
        assert!(sender.send(EditorCommand::AddMarker));
        queue.push(PointerEvent::Move { pos: Pos2::new(2.0, 0.0) });
        assert_eq!(queue.len(), 3);

        let events = queue.drain();
        assert_eq!(
            events,
            vec![
                EditorEvent::Pointer(PointerEvent::Move { pos: Pos2::new(1.0, 0.0) }),
                EditorEvent::Command(EditorCommand::AddMarker),
                EditorEvent::Pointer(PointerEvent::Move { pos: Pos2::new(2.0, 0.0) }),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sender_outlives_queue() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.send(EditorCommand::Stop));
    }

    #[test]
    fn test_event_kind() {
        let down = PointerEvent::Down {
            pos: Pos2::new(3.0, 4.0),
            button: PointerButton::Primary,
        };
        assert_eq!(down.kind(), EventKind::Down);
        assert_eq!(down.pos(), Pos2::new(3.0, 4.0));
        let wheel = PointerEvent::Wheel {
            pos: Pos2::ZERO,
            delta: Vec2::new(0.0, 1.0),
        };
        assert_eq!(wheel.kind(), EventKind::Wheel);
    }
}
