//! Crate-level error type.

use crate::config::ConfigError;
use crate::core::timeline::TimelineError;
use crate::playback::backend::AudioBackendError;
use std::fmt;

/// Host collaborator the editor can run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    AudioBackend,
    WaveformRenderer,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::AudioBackend => write!(f, "audio backend"),
            Dependency::WaveformRenderer => write!(f, "waveform renderer"),
        }
    }
}

/// Error type for editor operations
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
    #[error("Audio error: {0}")]
    Audio(#[from] AudioBackendError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("No {0} available")]
    MissingDependency(Dependency),
}
