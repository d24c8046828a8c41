pub mod buffer;
pub mod player;

pub use buffer::ClipBuffer;
pub use player::CpalAudioBackend;
