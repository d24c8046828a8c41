//! Core types for the subtitle editor.
//!
//! This module provides the dialogue data model: styled lines, the marker
//! timeline, sentence segmentation and sample-position helpers.
//! All positions are sample offsets (u32), not wall-clock time.

pub mod clip;
pub mod line;
pub mod sample;
pub mod sentence;
pub mod timeline;

// Re-export core data structures for easier access.
pub use clip::SubtitleClip;
pub use line::{Language, Line, LocalizedText};
pub use sample::SamplePosition;
pub use timeline::{DialogueItem, MarkerId, Timeline, TimelineError};
