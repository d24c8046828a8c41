//! Timeline view UI component.
//!
//! Glue between an egui frame and an [`EditorSession`]: raw egui input is
//! translated into pointer events and queued, the session is ticked, and the
//! resulting [`TimelineScene`] is painted. Painting only reads the scene.

use crate::error::{Dependency, EditorError};
use crate::interaction::controller::ContextAction;
use crate::interaction::event::{EditorCommand, EditorEvent, PointerEvent};
use crate::session::EditorSession;
use crate::view::scene::{TimelineScene, LABEL_BACKGROUND};
use crate::view::waveform::WaveformRenderer;
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId, Painter, PointerButton, Pos2, Rect, Response, Sense, Ui, Vec2};

const BACKGROUND: Color32 = Color32::from_gray(28);
const LABEL_FONT_SIZE: f32 = 12.0;

/// Timeline view component
pub struct TimelineView {
    height: f32,
    context: Option<ContextAction>,
    warned_missing_waveform: bool,
}

impl TimelineView {
    pub fn new() -> Self {
        Self {
            height: 120.0,
            context: None,
            warned_missing_waveform: false,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Run one frame of the timeline: input, state update, painting
    pub fn show(
        &mut self,
        ui: &mut Ui,
        session: &mut EditorSession,
        waveform: Option<&mut dyn WaveformRenderer>,
    ) -> Response {
        let size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let (events, scroll, hover) = ui.input(|i| (i.events.clone(), i.raw_scroll_delta, i.pointer.hover_pos()));
        // Popups such as the context menu sit on their own layer above the body
        let owns_pointer = response.hovered() && !ui.memory(|m| m.any_popup_open());
        let editor_events = owned_events(translate_events(&events, scroll, hover), owns_pointer);
        if editor_events.iter().any(is_secondary_press) {
            self.context = None;
        }
        for event in editor_events {
            session.push(event);
        }
        session.tick(rect);

        if let Some(action) = session.take_context_action() {
            self.context = Some(action);
        }

        if waveform.is_none() && !self.warned_missing_waveform {
            log::warn!("{}", EditorError::MissingDependency(Dependency::WaveformRenderer));
            self.warned_missing_waveform = true;
        }

        let scene = session.scene(rect);
        paint(&ui.painter_at(rect), &scene, waveform);

        if let Some(ContextAction::DeleteMarker(id)) = self.context {
            let _ = response.clone().context_menu(|ui| {
                if ui.button("Delete").clicked() {
                    session.push(EditorCommand::DeleteMarker(id));
                    ui.close_menu();
                }
            });
        }

        response
    }
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::new()
    }
}

fn is_secondary_press(event: &EditorEvent) -> bool {
    matches!(
        event,
        EditorEvent::Pointer(PointerEvent::Down {
            button: PointerButton::Secondary,
            ..
        })
    )
}

/// Convert one frame of egui input into editor events, in order.
///
/// Vertical wheel input becomes a single zoom event at the hover position.
/// Horizontal wheel or trackpad input pans the timeline.
pub fn translate_events(events: &[egui::Event], scroll: Vec2, hover: Option<Pos2>) -> Vec<EditorEvent> {
    let mut out: Vec<EditorEvent> = events
        .iter()
        .filter_map(|event| match *event {
            egui::Event::PointerMoved(pos) => Some(PointerEvent::Move { pos }),
            egui::Event::PointerButton {
                pos, button, pressed, ..
            } => Some(if pressed {
                PointerEvent::Down { pos, button }
            } else {
                PointerEvent::Up { pos, button }
            }),
            _ => None,
        })
        .map(EditorEvent::from)
        .collect();

    if let Some(pos) = hover {
        if scroll.y != 0.0 {
            out.push(PointerEvent::Wheel { pos, delta: scroll }.into());
        }
        if scroll.x != 0.0 {
            // egui scroll deltas move content, the offset moves the other way
            out.push(EditorCommand::ScrollBy(-scroll.x).into());
        }
    }
    out
}

/// Drop input aimed at something drawn over the timeline.
///
/// Presses, wheel and scrolling only count while the timeline owns the
/// pointer. Moves and releases always pass so a gesture that started on the
/// timeline can finish.
pub fn owned_events(events: Vec<EditorEvent>, owns_pointer: bool) -> Vec<EditorEvent> {
    if owns_pointer {
        return events;
    }
    events
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                EditorEvent::Pointer(PointerEvent::Move { .. } | PointerEvent::Up { .. })
            )
        })
        .collect()
}

/// Paint a scene. Waveform first, then markers and labels, playheads on top.
pub fn paint(painter: &Painter, scene: &TimelineScene, waveform: Option<&mut dyn WaveformRenderer>) {
    painter.rect_filled(scene.view_rect, 0.0, BACKGROUND);

    if let Some(renderer) = waveform {
        renderer.draw(painter, scene.waveform_rect, scene.waveform_color);
    }

    for marker in &scene.markers {
        painter.rect_filled(marker.geometry.line, 0.0, marker.color);
        painter.rect_filled(marker.geometry.head, 0.0, marker.color);

        if marker.text.is_empty() || marker.label_rect.width() <= 0.0 {
            continue;
        }
        let label_painter = painter.with_clip_rect(marker.label_rect.intersect(scene.view_rect));
        label_painter.rect_filled(marker.label_rect, 0.0, LABEL_BACKGROUND);

        let color = marker.text_color.unwrap_or(Color32::WHITE);
        let job = LayoutJob::single_section(
            marker.text.clone(),
            TextFormat {
                font_id: FontId::proportional(LABEL_FONT_SIZE),
                color,
                italics: marker.italic,
                ..Default::default()
            },
        );
        let galley = label_painter.layout_job(job);
        let pos = label_top_left(marker.label_rect, galley.size().y);
        if marker.bold {
            // Faux bold: a second pass half a point to the right
            label_painter.galley(pos + Vec2::new(0.5, 0.0), galley.clone(), color);
        }
        label_painter.galley(pos, galley, color);
    }

    if let Some(playhead) = scene.playback_playhead {
        painter.rect_filled(playhead, 0.0, scene.playback_color);
    }
    painter.rect_filled(scene.selection_playhead, 0.0, scene.selection_color);
}

fn label_top_left(label_rect: Rect, text_height: f32) -> Pos2 {
    Pos2::new(
        label_rect.min.x + 2.0,
        label_rect.center().y - text_height / 2.0,
    )
}
