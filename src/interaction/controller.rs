//! Pointer interaction state machine.
//!
//! Consumes [`PointerEvent`]s one at a time, hit-tests them against marker
//! geometry from the [`Viewport`], and mutates the [`Timeline`] and the
//! viewport directly. Anything the rest of the session needs to know about
//! (selection playhead moves, context menu requests) comes back as a
//! [`Reaction`].
//!
//! Markers are tracked by [`MarkerId`], so selection survives sorting,
//! insertion and removal of other markers.

use crate::core::sample::{self, SamplePosition};
use crate::core::timeline::{MarkerId, Timeline};
use crate::interaction::event::{EventKind, PointerEvent};
use crate::view::viewport::{TimelineLayout, Viewport};
use egui::{PointerButton, Pos2, Vec2};

/// What the pointer is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Scrubbing the selection playhead
    DraggingTimeline,
    /// Moving one marker
    DraggingMarker,
}

/// Action the host should offer after a secondary click on a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    DeleteMarker(MarkerId),
}

/// Outcome of a single pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    None,
    /// The selection playhead moved to this (fractional) sample
    SelectionMoved(f64),
    MarkerGrabbed {
        id: MarkerId,
        index: usize,
        context: Option<ContextAction>,
    },
    MarkerMoved {
        id: MarkerId,
        position: SamplePosition,
    },
    /// Drag finished; `index` is the marker's index after reordering
    MarkerDropped {
        id: MarkerId,
        index: usize,
    },
    Zoomed,
}

/// Everything the controller reads or mutates while handling an event
pub struct InteractionContext<'a> {
    pub timeline: &'a mut Timeline,
    pub viewport: &'a mut Viewport,
    pub layout: &'a TimelineLayout,
    pub marker_size: Vec2,
}

/// Interaction state for one editing session
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: InteractionMode,
    selected: Option<MarkerId>,
    drag: Option<MarkerId>,
    gesture_button: Option<PointerButton>,
    last_event: Option<EventKind>,
    pointer_pos: Option<Pos2>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selected(&self) -> Option<MarkerId> {
        self.selected
    }

    pub fn dragged(&self) -> Option<MarkerId> {
        self.drag
    }

    pub fn last_event(&self) -> Option<EventKind> {
        self.last_event
    }

    /// Last known pointer position, used for hover highlighting
    pub fn pointer_pos(&self) -> Option<Pos2> {
        self.pointer_pos
    }

    /// Index of the selected marker in `timeline`, if it still exists
    pub fn selected_index(&self, timeline: &Timeline) -> Option<usize> {
        self.selected.and_then(|id| timeline.index_of(id))
    }

    /// Index of the dragged marker in `timeline`, if it still exists
    pub fn drag_index(&self, timeline: &Timeline) -> Option<usize> {
        self.drag.and_then(|id| timeline.index_of(id))
    }

    /// Make `id` the selected marker and the target of the next drag move
    pub fn select(&mut self, id: MarkerId) {
        self.selected = Some(id);
        self.drag = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        if self.mode != InteractionMode::DraggingMarker {
            self.drag = None;
        }
    }

    /// Drop every reference to a marker that no longer exists
    pub fn forget(&mut self, id: MarkerId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag == Some(id) {
            self.drag = None;
            if self.mode == InteractionMode::DraggingMarker {
                self.set_mode(InteractionMode::Idle);
                self.gesture_button = None;
            }
        }
    }

    /// Back to a fresh session state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Handle one pointer event
    pub fn handle(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) -> Reaction {
        log::trace!("{:?} in {:?}", event, self.mode);
        self.pointer_pos = Some(event.pos());

        let reaction = match *event {
            PointerEvent::Down { pos, button } => self.pointer_down(pos, button, ctx),
            PointerEvent::Move { pos } => self.pointer_move(pos, ctx),
            PointerEvent::Up { button, .. } => self.pointer_up(button, ctx),
            PointerEvent::Wheel { pos, delta } => self.wheel(pos, delta, ctx),
        };

        self.last_event = Some(event.kind());
        reaction
    }

    /// First marker, in ascending order, whose hit region contains `pos`
    pub fn hit_test(&self, pos: Pos2, ctx: &InteractionContext<'_>) -> Option<(usize, MarkerId)> {
        ctx.timeline.iter().enumerate().find_map(|(index, item)| {
            let geometry = ctx
                .viewport
                .marker_geometry(item.sample_position(), ctx.layout, ctx.marker_size);
            geometry.hit.contains(pos).then_some((index, item.id()))
        })
    }

    fn pointer_down(&mut self, pos: Pos2, button: PointerButton, ctx: &mut InteractionContext<'_>) -> Reaction {
        if self.mode != InteractionMode::Idle {
            // A press without a matching release; close the old gesture first
            log::debug!("pointer down while {:?}, ending gesture", self.mode);
            self.finish_gesture(ctx);
        }

        if !ctx.layout.contains(pos) {
            return Reaction::None;
        }

        if let Some((index, id)) = self.hit_test(pos, ctx) {
            self.select(id);
            self.gesture_button = Some(button);
            self.set_mode(InteractionMode::DraggingMarker);
            let context = (button == PointerButton::Secondary).then_some(ContextAction::DeleteMarker(id));
            return Reaction::MarkerGrabbed { id, index, context };
        }

        if button != PointerButton::Primary {
            return Reaction::None;
        }

        self.selected = None;
        self.drag = None;
        self.gesture_button = Some(button);
        self.set_mode(InteractionMode::DraggingTimeline);
        Reaction::SelectionMoved(self.selection_sample(pos, ctx))
    }

    fn pointer_move(&mut self, pos: Pos2, ctx: &mut InteractionContext<'_>) -> Reaction {
        match self.mode {
            InteractionMode::Idle => Reaction::None,
            InteractionMode::DraggingTimeline => Reaction::SelectionMoved(self.selection_sample(pos, ctx)),
            InteractionMode::DraggingMarker => {
                // Secondary presses only select and offer the context menu
                if self.gesture_button != Some(PointerButton::Primary) {
                    return Reaction::None;
                }
                // No clip length to map the pointer onto
                if ctx.layout.total_samples == 0 {
                    return Reaction::None;
                }
                let Some((id, index)) = self.live_drag(ctx.timeline) else {
                    return Reaction::None;
                };
                let position = sample::from_fractional(ctx.viewport.sample_at(pos, ctx.layout), ctx.layout.total_samples);
                match ctx.timeline.reposition_marker(index, position) {
                    Ok(()) => Reaction::MarkerMoved { id, position },
                    Err(e) => {
                        log::debug!("drag of {} abandoned: {}", id, e);
                        self.abandon_drag();
                        Reaction::None
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self, button: PointerButton, ctx: &mut InteractionContext<'_>) -> Reaction {
        if self.mode == InteractionMode::Idle || self.gesture_button != Some(button) {
            return Reaction::None;
        }
        self.finish_gesture(ctx)
    }

    fn wheel(&mut self, pos: Pos2, delta: Vec2, ctx: &mut InteractionContext<'_>) -> Reaction {
        if !ctx.layout.contains(pos) {
            return Reaction::None;
        }
        if ctx.viewport.apply_zoom_delta(delta.y, pos, ctx.layout.rect) {
            log::trace!("zoom {:.2}, scroll {:.1}", ctx.viewport.zoom(), ctx.viewport.scroll_offset());
            Reaction::Zoomed
        } else {
            Reaction::None
        }
    }

    /// End the current gesture the way a release would
    fn finish_gesture(&mut self, ctx: &mut InteractionContext<'_>) -> Reaction {
        let reaction = match self.mode {
            InteractionMode::Idle => Reaction::None,
            InteractionMode::DraggingTimeline => Reaction::None,
            InteractionMode::DraggingMarker => self.drop_marker(ctx.timeline),
        };
        self.gesture_button = None;
        self.set_mode(InteractionMode::Idle);
        reaction
    }

    fn drop_marker(&mut self, timeline: &mut Timeline) -> Reaction {
        let Some((id, index)) = self.live_drag(timeline) else {
            return Reaction::None;
        };

        if let Err(e) = timeline.settle(index) {
            log::debug!("drop of {} abandoned: {}", id, e);
            self.abandon_drag();
            return Reaction::None;
        }
        timeline.reorder();

        match timeline.index_of(id) {
            Some(index) => {
                log::debug!("dropped {} at index {}", id, index);
                Reaction::MarkerDropped { id, index }
            }
            None => {
                self.abandon_drag();
                Reaction::None
            }
        }
    }

    /// The dragged marker and its current index, or reset to Idle if it is gone
    fn live_drag(&mut self, timeline: &Timeline) -> Option<(MarkerId, usize)> {
        let id = self.drag?;
        match timeline.index_of(id) {
            Some(index) => Some((id, index)),
            None => {
                log::debug!("dragged {} no longer exists", id);
                self.abandon_drag();
                None
            }
        }
    }

    fn abandon_drag(&mut self) {
        if let Some(id) = self.drag.take() {
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        self.gesture_button = None;
        self.set_mode(InteractionMode::Idle);
    }

    fn selection_sample(&self, pos: Pos2, ctx: &InteractionContext<'_>) -> f64 {
        let total = ctx.layout.total_samples as f64;
        let sample = ctx.viewport.sample_at(pos, ctx.layout);
        if sample.is_nan() {
            return 0.0;
        }
        sample.clamp(0.0, total)
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            log::debug!("interaction {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Rect;

    struct Fixture {
        timeline: Timeline,
        viewport: Viewport,
        layout: TimelineLayout,
        controller: InteractionController,
    }

    impl Fixture {
        /// 100pt wide body over 1000 samples: one point is ten samples
        fn new(positions: &[SamplePosition]) -> Self {
            let mut timeline = Timeline::new();
            for &p in positions {
                timeline.add_marker(p).unwrap();
            }
            Self {
                timeline,
                viewport: Viewport::default(),
                layout: TimelineLayout::new(Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0)), 1000),
                controller: InteractionController::new(),
            }
        }

        fn send(&mut self, event: PointerEvent) -> Reaction {
            let mut ctx = InteractionContext {
                timeline: &mut self.timeline,
                viewport: &mut self.viewport,
                layout: &self.layout,
                marker_size: Vec2::new(20.0, 15.0),
            };
            self.controller.handle(&event, &mut ctx)
        }

        fn down(&mut self, x: f32, button: PointerButton) -> Reaction {
            self.send(PointerEvent::Down {
                pos: Pos2::new(x, 25.0),
                button,
            })
        }

        fn drag_to(&mut self, x: f32) -> Reaction {
            self.send(PointerEvent::Move { pos: Pos2::new(x, 25.0) })
        }

        fn up(&mut self, button: PointerButton) -> Reaction {
            self.send(PointerEvent::Up {
                pos: Pos2::new(0.0, 25.0),
                button,
            })
        }

        fn positions(&self) -> Vec<SamplePosition> {
            self.timeline.iter().map(|item| item.sample_position()).collect()
        }
    }

    #[test]
    fn test_drag_marker_past_neighbour() {
        let mut fixture = Fixture::new(&[5, 15]);
        let first = fixture.timeline.id_at(0).unwrap();

        let grabbed = fixture.down(1.0, PointerButton::Primary);
        assert_eq!(
            grabbed,
            Reaction::MarkerGrabbed {
                id: first,
                index: 0,
                context: None
            }
        );
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingMarker);

        assert_eq!(fixture.drag_to(2.0), Reaction::MarkerMoved { id: first, position: 20 });
        assert_eq!(fixture.up(PointerButton::Primary), Reaction::MarkerDropped { id: first, index: 1 });

        assert_eq!(fixture.positions(), vec![15, 20]);
        assert_eq!(fixture.controller.selected_index(&fixture.timeline), Some(1));
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_order_suspended_during_drag() {
        let mut fixture = Fixture::new(&[5, 15]);
        fixture.down(1.0, PointerButton::Primary);
        fixture.drag_to(2.5);

        assert_eq!(fixture.positions(), vec![25, 15]);
        assert!(!fixture.timeline.is_sorted());
    }

    #[test]
    fn test_drop_on_occupied_position_nudges() {
        let mut fixture = Fixture::new(&[5, 15]);
        let first = fixture.timeline.id_at(0).unwrap();

        fixture.down(1.0, PointerButton::Primary);
        fixture.drag_to(1.5);
        fixture.up(PointerButton::Primary);

        assert_eq!(fixture.positions(), vec![15, 16]);
        assert_eq!(fixture.timeline.index_of(first), Some(1));
    }

    #[test]
    fn test_first_hit_wins() {
        // Both hit regions cover x=10
        let mut fixture = Fixture::new(&[5, 15]);
        let first = fixture.timeline.id_at(0).unwrap();
        let reaction = fixture.down(10.0, PointerButton::Primary);
        assert!(matches!(reaction, Reaction::MarkerGrabbed { id, index: 0, .. } if id == first));
    }

    #[test]
    fn test_drag_is_exclusive() {
        let mut fixture = Fixture::new(&[100, 500]);
        let first = fixture.timeline.id_at(0).unwrap();

        fixture.down(12.0, PointerButton::Primary);
        // Passing over the other marker does not transfer the drag
        assert_eq!(fixture.drag_to(55.0), Reaction::MarkerMoved { id: first, position: 550 });
        assert_eq!(fixture.controller.dragged(), Some(first));
    }

    #[test]
    fn test_timeline_drag_moves_selection() {
        let mut fixture = Fixture::new(&[5, 15]);
        fixture.controller.select(fixture.timeline.id_at(1).unwrap());

        assert_eq!(fixture.down(50.0, PointerButton::Primary), Reaction::SelectionMoved(500.0));
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingTimeline);
        assert_eq!(fixture.controller.selected(), None);

        assert_eq!(fixture.drag_to(75.0), Reaction::SelectionMoved(750.0));
        // Outside the body the selection clamps to the clip
        assert_eq!(fixture.drag_to(150.0), Reaction::SelectionMoved(1000.0));
        assert_eq!(fixture.drag_to(-10.0), Reaction::SelectionMoved(0.0));

        assert_eq!(fixture.up(PointerButton::Primary), Reaction::None);
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
        assert_eq!(fixture.positions(), vec![5, 15]);
    }

    #[test]
    fn test_secondary_click_offers_delete() {
        let mut fixture = Fixture::new(&[500]);
        let id = fixture.timeline.id_at(0).unwrap();

        let reaction = fixture.down(51.0, PointerButton::Secondary);
        assert_eq!(
            reaction,
            Reaction::MarkerGrabbed {
                id,
                index: 0,
                context: Some(ContextAction::DeleteMarker(id))
            }
        );
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingMarker);
        // A primary release does not end a secondary gesture
        assert_eq!(fixture.up(PointerButton::Primary), Reaction::None);
        assert_eq!(fixture.up(PointerButton::Secondary), Reaction::MarkerDropped { id, index: 0 });
    }

    #[test]
    fn test_secondary_gesture_never_moves_marker() {
        let mut fixture = Fixture::new(&[500]);
        let id = fixture.timeline.id_at(0).unwrap();

        fixture.down(51.0, PointerButton::Secondary);
        assert_eq!(fixture.drag_to(52.0), Reaction::None);
        assert_eq!(fixture.drag_to(80.0), Reaction::None);
        assert_eq!(fixture.positions(), vec![500]);

        assert_eq!(fixture.up(PointerButton::Secondary), Reaction::MarkerDropped { id, index: 0 });
        assert_eq!(fixture.positions(), vec![500]);
        assert_eq!(fixture.controller.selected(), Some(id));
    }

    #[test]
    fn test_marker_stays_put_without_clip_length() {
        let mut fixture = Fixture::new(&[5, 15]);
        fixture.layout.total_samples = 0;
        // Every marker sits at x=0 when there is nothing to scale against
        fixture.down(1.0, PointerButton::Primary);
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingMarker);

        assert_eq!(fixture.drag_to(40.0), Reaction::None);
        fixture.up(PointerButton::Primary);
        assert_eq!(fixture.positions(), vec![5, 15]);
    }

    #[test]
    fn test_drag_on_long_clip_lands_on_odd_sample() {
        let mut fixture = Fixture::new(&[0]);
        // 2^25 samples over 100pt: one point is 335544.32 samples
        fixture.layout.total_samples = 33_554_432;
        let id = fixture.timeline.id_at(0).unwrap();

        fixture.down(1.0, PointerButton::Primary);
        assert_eq!(fixture.drag_to(0.25), Reaction::MarkerMoved { id, position: 83_886 });
        assert_eq!(fixture.drag_to(50.001), Reaction::MarkerMoved { id, position: 16_777_551 });
    }

    #[test]
    fn test_secondary_click_on_body_is_ignored() {
        let mut fixture = Fixture::new(&[]);
        assert_eq!(fixture.down(40.0, PointerButton::Secondary), Reaction::None);
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_press_outside_body_is_ignored() {
        let mut fixture = Fixture::new(&[5]);
        let reaction = fixture.send(PointerEvent::Down {
            pos: Pos2::new(10.0, 80.0),
            button: PointerButton::Primary,
        });
        assert_eq!(reaction, Reaction::None);
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_marker_removed_mid_drag() {
        let mut fixture = Fixture::new(&[5, 15]);
        fixture.down(1.0, PointerButton::Primary);
        fixture.timeline.remove_marker(0).unwrap();

        assert_eq!(fixture.drag_to(30.0), Reaction::None);
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
        assert_eq!(fixture.controller.selected(), None);
        assert_eq!(fixture.positions(), vec![15]);
        assert_eq!(fixture.up(PointerButton::Primary), Reaction::None);
    }

    #[test]
    fn test_forget_ends_drag() {
        let mut fixture = Fixture::new(&[5]);
        let id = fixture.timeline.id_at(0).unwrap();
        fixture.down(1.0, PointerButton::Primary);

        fixture.controller.forget(id);
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
        assert_eq!(fixture.controller.selected(), None);
        assert_eq!(fixture.controller.dragged(), None);
    }

    #[test]
    fn test_press_without_release_ends_previous_drag() {
        let mut fixture = Fixture::new(&[5, 15]);
        fixture.down(1.0, PointerButton::Primary);
        fixture.drag_to(2.0);

        // Release was lost; the next press settles the dragged marker first
        fixture.down(80.0, PointerButton::Primary);
        assert!(fixture.timeline.is_sorted());
        assert_eq!(fixture.positions(), vec![15, 20]);
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingTimeline);
    }

    #[test]
    fn test_wheel_zooms_without_changing_mode() {
        let mut fixture = Fixture::new(&[5]);
        fixture.down(50.0, PointerButton::Primary);

        let reaction = fixture.send(PointerEvent::Wheel {
            pos: Pos2::new(40.0, 25.0),
            delta: Vec2::new(0.0, 1.0),
        });
        assert_eq!(reaction, Reaction::Zoomed);
        assert!((fixture.viewport.zoom() - 1.1).abs() < 1e-6);
        assert_eq!(fixture.controller.mode(), InteractionMode::DraggingTimeline);
        assert_eq!(fixture.controller.last_event(), Some(EventKind::Wheel));

        let outside = fixture.send(PointerEvent::Wheel {
            pos: Pos2::new(40.0, 90.0),
            delta: Vec2::new(0.0, 1.0),
        });
        assert_eq!(outside, Reaction::None);
    }

    #[test]
    fn test_hover_tracks_pointer() {
        let mut fixture = Fixture::new(&[]);
        fixture.drag_to(33.0);
        assert_eq!(fixture.controller.pointer_pos(), Some(Pos2::new(33.0, 25.0)));
        assert_eq!(fixture.controller.mode(), InteractionMode::Idle);
    }
}
