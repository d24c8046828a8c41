//! Input handling: the event queue and the pointer state machine.

pub mod controller;
pub mod event;

pub use controller::{ContextAction, InteractionContext, InteractionController, InteractionMode, Reaction};
pub use event::{EditorCommand, EditorEvent, EventKind, EventQueue, EventSender, PointerEvent};
