//! Subtitle timeline editor core.
//!
//! Dialogue markers anchored to audio sample positions, sentence
//! segmentation, a zoomable timeline view and the pointer state machine
//! that edits it. Audio output and waveform drawing are supplied by the host
//! through [`playback::AudioBackend`] and [`view::WaveformRenderer`].

pub mod audio;
pub mod config;
pub mod core;
pub mod error;
pub mod interaction;
pub mod playback;
pub mod session;
pub mod view;

pub use config::EditorConfig;
pub use error::{Dependency, EditorError};
pub use session::EditorSession;
