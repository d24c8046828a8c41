//! Render pass for the timeline.
//!
//! [`build_scene`] reads editor state and produces everything the painter
//! needs: marker shapes with colours and labels, playheads and the waveform
//! area. It never mutates state; the painter never reads editor state.

use crate::config::EditorConfig;
use crate::core::line::Language;
use crate::core::timeline::{MarkerId, Timeline};
use crate::view::viewport::{MarkerGeometry, TimelineLayout, Viewport};
use egui::{Color32, Pos2, Rect, Vec2};

/// Height of a marker label, in points
pub const LABEL_HEIGHT: f32 = 18.0;

/// Label inset from the marker line, in points
const LABEL_PADDING: f32 = 2.0;

const HOVER_TINT: [f32; 3] = [1.3, 1.3, 1.2];
const SELECTED_TINT: [f32; 3] = [1.5, 1.5, 1.5];

/// Label background
pub const LABEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 155);

/// One marker, ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerShape {
    pub id: MarkerId,
    pub index: usize,
    pub geometry: MarkerGeometry,
    pub color: Color32,
    pub hovered: bool,
    pub selected: bool,
    /// Line text with bold/italic markup, without colour markup
    pub label: String,
    /// Unmarked line text and its style, for painters without markup support
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Room available for the label, up to the next marker or the view edge
    pub label_rect: Rect,
    /// Set when the line has its own colour
    pub text_color: Option<Color32>,
}

/// Everything drawn in the timeline body for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    pub view_rect: Rect,
    /// Zoomed waveform area, may extend past `view_rect`
    pub waveform_rect: Rect,
    pub waveform_color: Color32,
    pub markers: Vec<MarkerShape>,
    pub selection_playhead: Rect,
    pub selection_color: Color32,
    /// Only present while the clip is playing or paused
    pub playback_playhead: Option<Rect>,
    pub playback_color: Color32,
}

/// State the render pass reads
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub timeline: &'a Timeline,
    pub viewport: &'a Viewport,
    pub layout: &'a TimelineLayout,
    pub config: &'a EditorConfig,
    pub language: Language,
    pub selected: Option<MarkerId>,
    pub pointer: Option<Pos2>,
    pub selection_sample: f64,
    pub playback_sample: Option<f32>,
}

/// Build the scene for the current state
pub fn build_scene(input: &SceneInput<'_>) -> TimelineScene {
    let SceneInput {
        timeline,
        viewport,
        layout,
        config,
        ..
    } = *input;

    let marker_size = config.marker_size();
    let geometries: Vec<MarkerGeometry> = timeline
        .iter()
        .map(|item| viewport.marker_geometry(item.sample_position(), layout, marker_size))
        .collect();

    let markers = timeline
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let geometry = geometries[index];
            let line = item.text.line(input.language);
            let hovered = input.pointer.map_or(false, |p| geometry.hit.contains(p));
            let selected = input.selected == Some(item.id());

            let base = if line.new_line {
                config.new_line_marker_color
            } else {
                config.line_marker_color
            };
            let mut color = base;
            if hovered {
                color = tint(color, HOVER_TINT);
            }
            if selected {
                color = tint(color, SELECTED_TINT);
            }

            let right = geometries
                .get(index + 1)
                .map_or(layout.rect.max.x, |next| next.line.min.x);
            let label_rect = label_rect(&geometry, right, layout);

            MarkerShape {
                id: item.id(),
                index,
                geometry,
                color,
                hovered,
                selected,
                label: line.render(false),
                text: line.text.clone(),
                bold: line.bold,
                italic: line.italic,
                label_rect,
                text_color: line.use_color.then_some(line.color),
            }
        })
        .collect();

    TimelineScene {
        view_rect: layout.rect,
        waveform_rect: viewport.content_rect(layout),
        waveform_color: config.waveform_color,
        markers,
        selection_playhead: viewport.playhead_rect(input.selection_sample, layout),
        selection_color: config.selection_playhead_color,
        playback_playhead: input.playback_sample.map(|s| viewport.playhead_rect(s as f64, layout)),
        playback_color: config.playback_playhead_color,
    }
}

/// Scale the RGB channels of `color`, saturating, fully opaque.
pub fn tint(color: Color32, factors: [f32; 3]) -> Color32 {
    let scale = |channel: u8, factor: f32| (channel as f32 * factor).round().min(255.0) as u8;
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgb(scale(r, factors[0]), scale(g, factors[1]), scale(b, factors[2]))
}

fn label_rect(geometry: &MarkerGeometry, right: f32, layout: &TimelineLayout) -> Rect {
    let left = geometry.line.min.x + LABEL_PADDING;
    let width = (right - left - LABEL_PADDING).max(0.0);
    let top = layout.rect.min.y + layout.rect.height() / 2.0;
    Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, LABEL_HEIGHT))
}
