pub mod backend;
pub mod state;

pub use backend::{AudioBackend, AudioBackendError};
pub use state::{Playback, PlaybackState};
