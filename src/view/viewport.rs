//! Zoomed and scrolled window onto the sample timeline.
//!
//! Screen coordinates are egui points. The timeline body occupies
//! `TimelineLayout::rect`; its content is `rect.width() * zoom` wide and
//! shifted left by `scroll_offset_px`.

use crate::config::ZoomConfig;
use crate::core::sample::SamplePosition;
use egui::{Pos2, Rect, Vec2};

/// Width of marker lines and playheads, in points
pub const LINE_WIDTH: f32 = 2.0;

/// Where the timeline body sits on screen and how long the clip is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineLayout {
    pub rect: Rect,
    pub total_samples: u32,
}

impl TimelineLayout {
    pub fn new(rect: Rect, total_samples: u32) -> Self {
        Self { rect, total_samples }
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }

    /// X relative to the left edge of the timeline body
    pub fn local_x(&self, pos: Pos2) -> f32 {
        pos.x - self.rect.min.x
    }
}

/// Screen-space pieces of a single marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGeometry {
    /// Region that reacts to the pointer: head width, full height
    pub hit: Rect,
    /// Flag drawn at the top
    pub head: Rect,
    /// Thin line through the body
    pub line: Rect,
}

/// Zoom and scroll state of the timeline view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    scroll_offset_px: f32,
    limits: ZoomConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomConfig) -> Self {
        Self {
            zoom: limits.min,
            scroll_offset_px: 0.0,
            limits,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset_px
    }

    pub fn limits(&self) -> ZoomConfig {
        self.limits
    }

    /// Back to fully zoomed out, unscrolled
    pub fn reset(&mut self) {
        self.zoom = self.limits.min;
        self.scroll_offset_px = 0.0;
    }

    /// Width of the whole zoomed content for a body `viewport_width` wide
    pub fn zoomed_width(&self, viewport_width: f32) -> f32 {
        viewport_width * self.zoom
    }

    /// Map a sample to X relative to the body's left edge.
    /// Computed in double precision so long clips keep single-sample resolution.
    pub fn sample_to_screen_x(&self, sample: f64, viewport_width: f32, total_samples: u32) -> f32 {
        if total_samples == 0 {
            return -self.scroll_offset_px;
        }
        let zoomed = viewport_width as f64 * self.zoom as f64;
        (sample * zoomed / total_samples as f64 - self.scroll_offset_px as f64) as f32
    }

    /// Map X relative to the body's left edge back to a (fractional) sample.
    /// Inverse of [`Viewport::sample_to_screen_x`]; the result is not clamped.
    pub fn screen_x_to_sample(&self, px: f32, zoomed_width: f32, total_samples: u32) -> f64 {
        if zoomed_width <= 0.0 {
            return 0.0;
        }
        total_samples as f64 * (self.scroll_offset_px as f64 + px as f64) / zoomed_width as f64
    }

    /// Sample under an absolute screen position
    pub fn sample_at(&self, pos: Pos2, layout: &TimelineLayout) -> f64 {
        let zoomed = self.zoomed_width(layout.rect.width());
        self.screen_x_to_sample(layout.local_x(pos), zoomed, layout.total_samples)
    }

    /// Absolute screen X of a sample
    pub fn screen_x(&self, sample: f64, layout: &TimelineLayout) -> f32 {
        layout.rect.min.x + self.sample_to_screen_x(sample, layout.rect.width(), layout.total_samples)
    }

    /// Zoom one step toward the cursor.
    ///
    /// `delta > 0` zooms in, `delta < 0` zooms out; the magnitude is ignored so
    /// each wheel notch changes zoom by the configured strength. The scroll
    /// offset is adjusted so the content under the cursor stays put. If the
    /// new zoom would leave the configured range nothing changes and `false`
    /// is returned.
    pub fn apply_zoom_delta(&mut self, delta: f32, cursor: Pos2, viewport_rect: Rect) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }

        let previous = (self.zoom, self.scroll_offset_px);
        let direction = delta.signum();
        let rel_x = cursor.x - viewport_rect.min.x;

        let new_zoom = self.zoom + self.limits.strength * direction;
        self.scroll_offset_px = (self.scroll_offset_px + rel_x) * new_zoom / self.zoom - rel_x;
        self.zoom = new_zoom;

        if self.zoom < self.limits.min || self.zoom > self.limits.max {
            (self.zoom, self.scroll_offset_px) = previous;
            return false;
        }

        self.clamp_scroll(viewport_rect.width());
        true
    }

    /// Set zoom directly (toolbar slider), clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32, viewport_width: f32) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom.clamp(self.limits.min, self.limits.max);
        self.clamp_scroll(viewport_width);
    }

    /// Largest valid scroll offset
    pub fn max_scroll(&self, viewport_width: f32) -> f32 {
        (self.zoomed_width(viewport_width) - viewport_width).max(0.0)
    }

    pub fn scroll_to(&mut self, offset_px: f32, viewport_width: f32) {
        if !offset_px.is_finite() {
            return;
        }
        self.scroll_offset_px = offset_px;
        self.clamp_scroll(viewport_width);
    }

    pub fn scroll_by(&mut self, delta_px: f32, viewport_width: f32) {
        self.scroll_to(self.scroll_offset_px + delta_px, viewport_width);
    }

    fn clamp_scroll(&mut self, viewport_width: f32) {
        self.scroll_offset_px = self.scroll_offset_px.clamp(0.0, self.max_scroll(viewport_width));
    }

    /// Screen geometry of a marker at `position`
    pub fn marker_geometry(&self, position: SamplePosition, layout: &TimelineLayout, marker_size: Vec2) -> MarkerGeometry {
        let x = self.screen_x(position as f64, layout);
        let top = layout.rect.min.y;
        let height = layout.rect.height();

        MarkerGeometry {
            hit: Rect::from_min_size(Pos2::new(x, top), Vec2::new(marker_size.x, height)),
            head: Rect::from_min_size(Pos2::new(x, top), marker_size),
            line: Rect::from_min_size(Pos2::new(x, top), Vec2::new(LINE_WIDTH, height)),
        }
    }

    /// Full-height indicator at a (fractional) sample
    pub fn playhead_rect(&self, sample: f64, layout: &TimelineLayout) -> Rect {
        let x = self.screen_x(sample, layout);
        Rect::from_min_size(
            Pos2::new(x, layout.rect.min.y),
            Vec2::new(LINE_WIDTH, layout.rect.height()),
        )
    }

    /// The zoomed content area, scrolled into place
    pub fn content_rect(&self, layout: &TimelineLayout) -> Rect {
        let rect = layout.rect;
        Rect::from_min_size(
            Pos2::new(rect.min.x - self.scroll_offset_px, rect.min.y),
            Vec2::new(self.zoomed_width(rect.width()), rect.height()),
        )
    }
}
