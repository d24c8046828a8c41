//! cpal audio playback for a decoded clip.
//!
//! The output callback reads straight from the shared [`ClipBuffer`] and
//! advances a frame cursor; the editor polls that cursor for the playback
//! playhead and the `finished` flag for the natural end of the clip.

use crate::audio::buffer::ClipBuffer;
use crate::playback::backend::{AudioBackend, AudioBackendError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Fractional frame position shared with the output callback
#[derive(Debug, Default)]
struct Cursor(AtomicU64);

impl Cursor {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, frame: f64) {
        self.0.store(frame.to_bits(), Ordering::Relaxed);
    }
}

/// Audio backend playing a [`ClipBuffer`] on the default output device
pub struct CpalAudioBackend {
    _host: Host,
    device: Device,
    stream_config: StreamConfig,
    clip: Arc<ClipBuffer>,
    cursor: Arc<Cursor>,
    finished: Arc<AtomicBool>,
    stream: Option<cpal::Stream>,
    paused: bool,
}

impl CpalAudioBackend {
    /// Open the default output device for `clip`
    pub fn new(clip: ClipBuffer) -> Result<Self, AudioBackendError> {
        if clip.is_empty() || clip.sample_rate == 0 {
            return Err(AudioBackendError::EmptyBuffer);
        }

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioBackendError::NoDevice)?;
        let stream_config = StreamConfig::from(device.default_output_config()?);
        log::debug!(
            "audio output: {} Hz, {} channels; clip: {} Hz, {} channels, {} frames",
            stream_config.sample_rate.0,
            stream_config.channels,
            clip.sample_rate,
            clip.channels,
            clip.frames()
        );

        Ok(Self {
            _host: host,
            device,
            stream_config,
            clip: Arc::new(clip),
            cursor: Arc::new(Cursor::default()),
            finished: Arc::new(AtomicBool::new(false)),
            stream: None,
            paused: false,
        })
    }

    pub fn clip(&self) -> &ClipBuffer {
        &self.clip
    }

    fn build_stream(&self) -> Result<cpal::Stream, AudioBackendError> {
        let clip = Arc::clone(&self.clip);
        let cursor = Arc::clone(&self.cursor);
        let finished = Arc::clone(&self.finished);
        let out_channels = self.stream_config.channels as usize;
        let step = clip.sample_rate as f64 / self.stream_config.sample_rate.0 as f64;

        let stream = self.device.build_output_stream(
            &self.stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let (next, ended) = fill_output(&clip, data, out_channels, cursor.load(), step);
                cursor.store(next);
                if ended {
                    finished.store(true, Ordering::Relaxed);
                }
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;
        Ok(stream)
    }
}

impl AudioBackend for CpalAudioBackend {
    fn play(&mut self, position: f32) -> Result<(), AudioBackendError> {
        self.stream = None;
        self.cursor.store(position.max(0.0) as f64);
        self.finished.store(false, Ordering::Relaxed);

        let stream = self.build_stream()?;
        stream.play()?;
        self.stream = Some(stream);
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioBackendError> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.paused = true;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioBackendError> {
        match &self.stream {
            Some(stream) => {
                stream.play()?;
                self.paused = false;
                Ok(())
            }
            None => self.play(self.cursor.load() as f32),
        }
    }

    fn stop(&mut self) -> Result<(), AudioBackendError> {
        self.stream = None;
        self.paused = false;
        self.cursor.store(0.0);
        self.finished.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn seek(&mut self, position: f32) -> Result<(), AudioBackendError> {
        let frame = (position.max(0.0) as f64).min(self.clip.frames() as f64);
        self.cursor.store(frame);
        self.finished.store(frame >= self.clip.frames() as f64, Ordering::Relaxed);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.stream.is_some() && !self.paused && !self.finished.load(Ordering::Relaxed)
    }

    fn current_position_sample(&self) -> f32 {
        self.cursor.load().min(self.clip.frames() as f64) as f32
    }

    fn total_samples(&self) -> u32 {
        u32::try_from(self.clip.frames()).unwrap_or(u32::MAX)
    }

    fn clip_length_seconds(&self) -> f64 {
        self.clip.duration_seconds()
    }
}

/// Fill one interleaved output buffer from `clip`, starting at frame `cursor`
/// and advancing `step` clip frames per output frame (nearest neighbour).
///
/// Returns the cursor after the buffer and whether the end of the clip was
/// reached. Past the end the output is silence.
pub fn fill_output(clip: &ClipBuffer, out: &mut [f32], out_channels: usize, cursor: f64, step: f64) -> (f64, bool) {
    if out_channels == 0 {
        return (cursor, false);
    }

    let frames = clip.frames();
    let mut position = cursor;
    let mut ended = false;

    for out_frame in out.chunks_mut(out_channels) {
        let frame = position as usize;
        if frame >= frames {
            out_frame.fill(0.0);
            ended = true;
            continue;
        }
        for (channel, sample) in out_frame.iter_mut().enumerate() {
            *sample = clip.sample(frame, channel).unwrap_or(0.0);
        }
        position += step;
    }

    (position.min(frames as f64), ended)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> ClipBuffer {
        let data = (0..frames).flat_map(|i| [i as f32, -(i as f32)]).collect();
        ClipBuffer::from_interleaved(data, 100, 2)
    }

    #[test]
    fn test_fill_copies_frames() {
        let clip = ramp(10);
        let mut out = [9.0; 6];
        let (next, ended) = fill_output(&clip, &mut out, 2, 2.0, 1.0);

        assert_eq!(out, [2.0, -2.0, 3.0, -3.0, 4.0, -4.0]);
        assert_eq!(next, 5.0);
        assert!(!ended);
    }

    #[test]
    fn test_fill_pads_with_silence_at_end() {
        let clip = ramp(3);
        let mut out = [9.0; 8];
        let (next, ended) = fill_output(&clip, &mut out, 2, 1.0, 1.0);

        assert_eq!(out, [1.0, -1.0, 2.0, -2.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(next, 3.0);
        assert!(ended);
    }

    #[test]
    fn test_fill_resamples_by_step() {
        let clip = ramp(10);
        let mut out = [0.0; 6];
        let (next, _) = fill_output(&clip, &mut out, 2, 0.0, 2.0);
        assert_eq!(out, [0.0, 0.0, 2.0, -2.0, 4.0, -4.0]);
        assert_eq!(next, 6.0);
    }

    #[test]
    fn test_fill_mono_clip_to_stereo_output() {
        let clip = ClipBuffer::from_interleaved(vec![0.5, 0.25], 100, 1);
        let mut out = [0.0; 4];
        fill_output(&clip, &mut out, 2, 0.0, 1.0);
        assert_eq!(out, [0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn test_cursor_round_trips_fractions() {
        let cursor = Cursor::default();
        cursor.store(12.75);
        assert_eq!(cursor.load(), 12.75);
    }

    #[test]
    fn test_empty_clip_is_rejected() {
        let result = CpalAudioBackend::new(ClipBuffer::new(44_100, 2));
        assert!(matches!(result, Err(AudioBackendError::EmptyBuffer)));
    }
}
