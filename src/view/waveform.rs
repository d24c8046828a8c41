//! Waveform renderer interface.
//!
//! The host turns decoded min/max sample data into pixels. The editor only
//! decides where the waveform goes and in which colour.

use egui::{Color32, Painter, Pos2, Rect, Vec2};

/// Draws one audio channel of the loaded clip
pub trait WaveformRenderer {
    /// Number of channels the loaded clip has
    fn channels(&self) -> usize;

    /// Draw `channel` into `rect`
    fn draw_channel(&mut self, painter: &Painter, rect: Rect, channel: usize, color: Color32);

    /// Draw every channel stacked vertically inside `rect`
    fn draw(&mut self, painter: &Painter, rect: Rect, color: Color32) {
        for (channel, channel_rect) in channel_rects(rect, self.channels()).into_iter().enumerate() {
            self.draw_channel(painter, channel_rect, channel, color);
        }
    }
}

/// Split `rect` into `channels` equal-height rows, top to bottom
pub fn channel_rects(rect: Rect, channels: usize) -> Vec<Rect> {
    if channels == 0 {
        return Vec::new();
    }
    let height = rect.height() / channels as f32;
    (0..channels)
        .map(|channel| {
            Rect::from_min_size(
                Pos2::new(rect.min.x, rect.min.y + height * channel as f32),
                Vec2::new(rect.width(), height),
            )
        })
        .collect()
}
