//! Audio backend interface.
//!
//! The editor never decodes or outputs audio itself; it drives whatever the
//! host provides through [`AudioBackend`]. Positions are in samples.

/// Error type for audio backends
#[derive(Debug, thiserror::Error)]
pub enum AudioBackendError {
    #[error("cpal stream error: {0}")]
    Stream(#[from] cpal::StreamError),
    #[error("cpal default config error: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("cpal build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("cpal play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("cpal pause stream error: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),
    #[error("No audio device available")]
    NoDevice,
    #[error("No clip loaded")]
    EmptyBuffer,
    #[error("Audio backend error: {0}")]
    Other(String),
}

/// Host audio playback
pub trait AudioBackend {
    /// Start playing from `position`
    fn play(&mut self, position: f32) -> Result<(), AudioBackendError>;

    fn pause(&mut self) -> Result<(), AudioBackendError>;

    /// Continue from where `pause` left off
    fn resume(&mut self) -> Result<(), AudioBackendError>;

    fn stop(&mut self) -> Result<(), AudioBackendError>;

    /// Move the play position without changing play/pause state
    fn seek(&mut self, position: f32) -> Result<(), AudioBackendError>;

    /// False once playback reaches the end of the clip or is stopped/paused
    fn is_playing(&self) -> bool;

    fn current_position_sample(&self) -> f32;

    /// Length of the loaded clip in samples (per channel)
    fn total_samples(&self) -> u32;

    fn clip_length_seconds(&self) -> f64;
}
