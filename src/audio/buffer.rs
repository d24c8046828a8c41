//! Decoded clip audio held in memory for playback.
//! Samples are interleaved PCM f32 (L, R, L, R, ...).

/// A decoded audio clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipBuffer {
    pub data: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl ClipBuffer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            data: Vec::new(),
            sample_rate,
            channels,
        }
    }

    /// Wrap already interleaved samples
    pub fn from_interleaved(data: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels as usize
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Sample of `channel` at `frame`; channels past the last repeat it
    pub fn sample(&self, frame: usize, channel: usize) -> Option<f32> {
        if self.channels == 0 {
            return None;
        }
        let channel = channel.min(self.channels as usize - 1);
        self.data.get(frame * self.channels as usize + channel).copied()
    }

    /// Append interleaved samples
    pub fn append(&mut self, samples: &[f32]) {
        self.data.extend_from_slice(samples);
    }
}
