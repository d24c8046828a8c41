//! Sample positions on the audio timeline.
//! Markers are anchored to sample offsets rather than wall-clock time.

/// Offset into the audio signal, in samples.
/// This is the core position representation throughout the editor.
pub type SamplePosition = u32;

/// Start of the clip
pub const ZERO: SamplePosition = 0;

/// Cutoff that includes every marker on a timeline
pub const END: SamplePosition = SamplePosition::MAX;

/// Convert a playback time in seconds to a sample position.
///
/// `total_samples` and `length_seconds` describe the clip; the result is
/// floored and clamped to the clip bounds. A zero-length clip maps everything to 0.
pub fn seconds_to_samples(seconds: f64, total_samples: u32, length_seconds: f64) -> SamplePosition {
    if length_seconds <= 0.0 || total_samples == 0 {
        return ZERO;
    }
    let fraction = (seconds / length_seconds).clamp(0.0, 1.0);
    (total_samples as f64 * fraction).floor() as SamplePosition
}

/// Convert a sample position to seconds
pub fn samples_to_seconds(position: SamplePosition, total_samples: u32, length_seconds: f64) -> f64 {
    if total_samples == 0 {
        return 0.0;
    }
    length_seconds * position as f64 / total_samples as f64
}

/// Snap a fractional sample coordinate (as produced by the viewport) onto the
/// clip: negative values go to 0, values past the end go to `total_samples`.
#[inline]
pub fn from_fractional(sample: f64, total_samples: u32) -> SamplePosition {
    if !sample.is_finite() || sample <= 0.0 {
        return ZERO;
    }
    sample.floor().min(total_samples as f64) as SamplePosition
}

/// Format a position as `MM:SS.mmm` given the clip's sample rate
pub fn format_position(position: SamplePosition, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return "00:00.000".to_string();
    }
    let total_millis = position as u64 * 1000 / sample_rate as u64;
    let minutes = total_millis / 60_000;
    let seconds = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;

    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_samples() {
        // 10 second clip at 44.1kHz
        assert_eq!(seconds_to_samples(5.0, 441_000, 10.0), 220_500);
        assert_eq!(seconds_to_samples(0.0, 441_000, 10.0), 0);
        assert_eq!(seconds_to_samples(10.0, 441_000, 10.0), 441_000);
    }

    #[test]
    fn test_seconds_to_samples_clamps() {
        assert_eq!(seconds_to_samples(-1.0, 1000, 1.0), 0);
        assert_eq!(seconds_to_samples(4.0, 1000, 1.0), 1000);
        assert_eq!(seconds_to_samples(0.5, 1000, 0.0), 0);
    }

    #[test]
    fn test_samples_to_seconds() {
        let seconds = samples_to_seconds(220_500, 441_000, 10.0);
        assert!((seconds - 5.0).abs() < 1e-9);
        assert_eq!(samples_to_seconds(10, 0, 10.0), 0.0);
    }

    #[test]
    fn test_from_fractional() {
        assert_eq!(from_fractional(-3.5, 100), 0);
        assert_eq!(from_fractional(12.9, 100), 12);
        assert_eq!(from_fractional(250.0, 100), 100);
        assert_eq!(from_fractional(f64::NAN, 100), 0);
    }

    #[test]
    fn test_from_fractional_keeps_odd_samples_on_long_clips() {
        // Past 2^24 samples single precision can only hold even values
        let long_clip = 30_000_000;
        assert_eq!(from_fractional(16_777_217.0, long_clip), 16_777_217);
        assert_eq!(from_fractional(25_000_001.5, long_clip), 25_000_001);
    }

    #[test]
    fn test_format_position() {
        // 61.5 seconds at 48kHz
        assert_eq!(format_position(2_952_000, 48_000), "01:01.500");
        assert_eq!(format_position(0, 0), "00:00.000");
    }
}
