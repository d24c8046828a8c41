//! Timeline view: viewport transform, render pass and egui glue.

pub mod scene;
pub mod timeline_view;
pub mod viewport;
pub mod waveform;

pub use scene::{build_scene, MarkerShape, SceneInput, TimelineScene};
pub use timeline_view::TimelineView;
pub use viewport::{MarkerGeometry, TimelineLayout, Viewport};
pub use waveform::WaveformRenderer;
