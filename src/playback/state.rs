//! Playback state machine.

use crate::playback::backend::{AudioBackend, AudioBackendError};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No playback active; the next play starts at the selection playhead
    #[default]
    Stopped,
    Playing,
    /// Playback suspended; the next play resumes without seeking
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped)
    }
}

/// Playback state plus the selection playhead it starts from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    current: PlaybackState,
    previous: PlaybackState,
    selection_start_sample: f64,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.current
    }

    pub fn previous_state(&self) -> PlaybackState {
        self.previous
    }

    pub fn selection_start(&self) -> f64 {
        self.selection_start_sample
    }

    pub fn set_selection_start(&mut self, sample: f64) {
        self.selection_start_sample = sample.max(0.0);
    }

    /// Request a new state, calling the backend for the transition.
    ///
    /// Returns `Ok(false)` when nothing changed: the state was already
    /// `requested`, or a pause was requested while stopped. If the backend
    /// fails, playback falls back to `Stopped` and the error is returned.
    pub fn set_state(
        &mut self,
        requested: PlaybackState,
        backend: &mut dyn AudioBackend,
    ) -> Result<bool, AudioBackendError> {
        use PlaybackState::*;

        let result = match (self.current, requested) {
            (from, to) if from == to => return Ok(false),
            (Stopped, Paused) => {
                log::debug!("ignoring pause while stopped");
                return Ok(false);
            }
            (Stopped, Playing) => backend.play(self.selection_start_sample as f32),
            (Paused, Playing) => backend.resume(),
            (Playing, Paused) => backend.pause(),
            (_, Stopped) => backend.stop(),
            // Handled by the first arm
            (Playing, Playing) | (Paused, Paused) => return Ok(false),
        };

        match result {
            Ok(()) => {
                self.transition(requested);
                Ok(true)
            }
            Err(e) => {
                log::warn!("playback {:?} -> {:?} failed: {}", self.current, requested, e);
                if self.current != Stopped {
                    if let Err(stop_err) = backend.stop() {
                        log::warn!("failed to stop playback: {}", stop_err);
                    }
                    self.transition(Stopped);
                }
                Err(e)
            }
        }
    }

    /// Play from Stopped or Paused, pause while Playing
    pub fn toggle_play(&mut self, backend: &mut dyn AudioBackend) -> Result<bool, AudioBackendError> {
        let requested = match self.current {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Stopped | PlaybackState::Paused => PlaybackState::Playing,
        };
        self.set_state(requested, backend)
    }

    /// Poll the backend once per UI tick.
    ///
    /// Returns true if playback ended on its own and the state moved to
    /// `Stopped`.
    pub fn update(&mut self, backend: &mut dyn AudioBackend) -> bool {
        if self.current != PlaybackState::Playing || backend.is_playing() {
            return false;
        }

        log::debug!("playback reached the end of the clip");
        if let Err(e) = backend.stop() {
            log::warn!("failed to stop finished playback: {}", e);
        }
        self.transition(PlaybackState::Stopped);
        true
    }

    /// Live playback position, only while playing or paused
    pub fn playback_position(&self, backend: &dyn AudioBackend) -> Option<f32> {
        match self.current {
            PlaybackState::Stopped => None,
            PlaybackState::Playing | PlaybackState::Paused => Some(backend.current_position_sample()),
        }
    }

    /// Stopped, selection at the start of the clip
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn transition(&mut self, to: PlaybackState) {
        log::debug!("playback {:?} -> {:?}", self.current, to);
        self.previous = self.current;
        self.current = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(f32),
        Pause,
        Resume,
        Stop,
    }

    #[derive(Default)]
    struct FakeBackend {
        calls: Vec<Call>,
        playing: bool,
        fail_next: bool,
    }

    impl FakeBackend {
        fn record(&mut self, call: Call) -> Result<(), AudioBackendError> {
            self.calls.push(call);
            if std::mem::take(&mut self.fail_next) {
                return Err(AudioBackendError::NoDevice);
            }
            Ok(())
        }
    }

    impl AudioBackend for FakeBackend {
        fn play(&mut self, position: f32) -> Result<(), AudioBackendError> {
            self.record(Call::Play(position))?;
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) -> Result<(), AudioBackendError> {
            self.record(Call::Pause)?;
            self.playing = false;
            Ok(())
        }
        fn resume(&mut self) -> Result<(), AudioBackendError> {
            self.record(Call::Resume)?;
            self.playing = true;
            Ok(())
        }
        fn stop(&mut self) -> Result<(), AudioBackendError> {
            self.record(Call::Stop)?;
            self.playing = false;
            Ok(())
        }
        fn seek(&mut self, _position: f32) -> Result<(), AudioBackendError> {
            Ok(())
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
        fn current_position_sample(&self) -> f32 {
            42.0
        }
        fn total_samples(&self) -> u32 {
            1000
        }
        fn clip_length_seconds(&self) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_play_starts_at_selection() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();
        playback.set_selection_start(120.0);

        assert!(playback.set_state(PlaybackState::Playing, &mut backend).unwrap());
        assert_eq!(backend.calls, vec![Call::Play(120.0)]);
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(playback.previous_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();

        playback.toggle_play(&mut backend).unwrap();
        playback.toggle_play(&mut backend).unwrap();
        assert_eq!(playback.state(), PlaybackState::Paused);
        playback.toggle_play(&mut backend).unwrap();

        assert_eq!(backend.calls, vec![Call::Play(0.0), Call::Pause, Call::Resume]);
        assert_eq!(playback.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_stop_from_playing_and_paused() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();

        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();
        playback.set_state(PlaybackState::Stopped, &mut backend).unwrap();
        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();
        playback.set_state(PlaybackState::Paused, &mut backend).unwrap();
        playback.set_state(PlaybackState::Stopped, &mut backend).unwrap();

        assert_eq!(
            backend.calls,
            vec![Call::Play(0.0), Call::Stop, Call::Play(0.0), Call::Pause, Call::Stop]
        );
        assert!(playback.state().is_stopped());
    }

    #[test]
    fn test_self_transition_is_noop() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();

        assert!(!playback.set_state(PlaybackState::Stopped, &mut backend).unwrap());
        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();
        assert!(!playback.set_state(PlaybackState::Playing, &mut backend).unwrap());
        assert_eq!(backend.calls, vec![Call::Play(0.0)]);
    }

    #[test]
    fn test_pause_while_stopped_is_ignored() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();

        assert!(!playback.set_state(PlaybackState::Paused, &mut backend).unwrap());
        assert!(backend.calls.is_empty());
        assert!(playback.state().is_stopped());
    }

    #[test]
    fn test_natural_end_stops() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();
        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();

        assert!(!playback.update(&mut backend));
        backend.playing = false;
        assert!(playback.update(&mut backend));
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(!playback.update(&mut backend));
    }

    #[test]
    fn test_paused_is_not_ended() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();
        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();
        playback.set_state(PlaybackState::Paused, &mut backend).unwrap();

        assert!(!playback.update(&mut backend));
        assert_eq!(playback.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_backend_failure_falls_back_to_stopped() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();
        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();

        backend.fail_next = true;
        assert!(playback.set_state(PlaybackState::Paused, &mut backend).is_err());
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(backend.calls.last(), Some(&Call::Stop));

        backend.fail_next = true;
        assert!(playback.set_state(PlaybackState::Playing, &mut backend).is_err());
        assert_eq!(playback.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_playback_position_only_when_active() {
        let mut backend = FakeBackend::default();
        let mut playback = Playback::new();
        assert_eq!(playback.playback_position(&backend), None);

        playback.set_state(PlaybackState::Playing, &mut backend).unwrap();
        assert_eq!(playback.playback_position(&backend), Some(42.0));
    }

    #[test]
    fn test_selection_never_negative() {
        let mut playback = Playback::new();
        playback.set_selection_start(-5.0);
        assert_eq!(playback.selection_start(), 0.0);
    }
}
