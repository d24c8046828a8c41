//! One editing session over a subtitle clip.
//!
//! `EditorSession` owns the clip, the viewport, the interaction controller and
//! the playback state, and is the only thing the host talks to. Input arrives
//! through the event queue and is applied in [`EditorSession::tick`]; drawing
//! reads a [`TimelineScene`] built from the current state.
//!
//! Nothing here panics or aborts the UI loop: failures are logged and come
//! back as `Option`/`Result` values.

use crate::config::EditorConfig;
use crate::core::clip::SubtitleClip;
use crate::core::line::Language;
use crate::core::sample::{self, SamplePosition};
use crate::core::sentence;
use crate::core::timeline::{DialogueItem, MarkerId, Timeline};
use crate::error::{Dependency, EditorError};
use crate::interaction::controller::{ContextAction, InteractionContext, InteractionController, Reaction};
use crate::interaction::event::{EditorCommand, EditorEvent, EventQueue, EventSender, PointerEvent};
use crate::playback::backend::AudioBackend;
use crate::playback::state::{Playback, PlaybackState};
use crate::view::scene::{build_scene, SceneInput, TimelineScene};
use crate::view::viewport::{TimelineLayout, Viewport};
use egui::Rect;

/// Length of the loaded audio, as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipInfo {
    pub total_samples: u32,
    pub length_seconds: f64,
}

impl ClipInfo {
    /// Samples per second, derived from the reported length
    pub fn sample_rate(&self) -> u32 {
        if self.length_seconds <= 0.0 {
            return 0;
        }
        (self.total_samples as f64 / self.length_seconds).round() as u32
    }

    fn from_backend(backend: Option<&dyn AudioBackend>) -> Self {
        backend.map_or_else(Self::default, |b| Self {
            total_samples: b.total_samples(),
            length_seconds: b.clip_length_seconds(),
        })
    }
}

/// Editor state for one clip
pub struct EditorSession {
    config: EditorConfig,
    clip: SubtitleClip,
    info: ClipInfo,
    viewport: Viewport,
    controller: InteractionController,
    playback: Playback,
    language: Language,
    queue: EventQueue,
    backend: Option<Box<dyn AudioBackend>>,
    pending_context: Option<ContextAction>,
}

impl EditorSession {
    /// Start a session. A missing audio backend is logged; the timeline can
    /// still be edited without one.
    pub fn new(
        config: EditorConfig,
        clip: SubtitleClip,
        backend: Option<Box<dyn AudioBackend>>,
    ) -> Result<Self, EditorError> {
        config.validate()?;

        let mut session = Self {
            viewport: Viewport::new(config.zoom),
            language: config.language,
            config,
            clip: SubtitleClip::default(),
            info: ClipInfo::default(),
            controller: InteractionController::new(),
            playback: Playback::new(),
            queue: EventQueue::new(),
            backend: None,
            pending_context: None,
        };
        session.load_clip(clip, backend);
        Ok(session)
    }

    /// Replace the clip and its audio, resetting view, interaction and playback
    pub fn load_clip(&mut self, clip: SubtitleClip, backend: Option<Box<dyn AudioBackend>>) {
        if let Some(old) = self.backend.as_deref_mut() {
            if let Err(e) = old.stop() {
                log::warn!("failed to stop previous clip: {}", e);
            }
        }

        self.backend = backend;
        self.info = ClipInfo::from_backend(self.backend.as_deref());
        if self.backend.is_none() {
            log::warn!("{}", EditorError::MissingDependency(Dependency::AudioBackend));
        }

        self.clip = clip;
        self.clip.dialogue.reorder();
        self.viewport.reset();
        self.controller.reset();
        self.playback.reset();
        self.pending_context = None;
        let _ = self.queue.drain();

        log::debug!(
            "loaded clip {:?}: {} markers, {} samples ({:.2}s)",
            self.clip.clip,
            self.clip.dialogue.len(),
            self.info.total_samples,
            self.info.length_seconds
        );
    }

    /// Handle for queueing input from the host
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn push(&self, event: impl Into<EditorEvent>) {
        self.queue.push(event);
    }

    /// Apply queued events in arrival order, then poll playback.
    /// `rect` is where the timeline body is drawn this frame.
    pub fn tick(&mut self, rect: Rect) -> usize {
        let events = self.queue.drain();
        let count = events.len();
        for event in events {
            if let Err(e) = self.handle_event(event, rect) {
                log::warn!("{:?} failed: {}", event, e);
            }
        }
        self.update();
        count
    }

    /// Apply one event immediately
    pub fn handle_event(&mut self, event: EditorEvent, rect: Rect) -> Result<(), EditorError> {
        match event {
            EditorEvent::Pointer(pointer) => {
                self.handle_pointer(&pointer, rect);
                Ok(())
            }
            EditorEvent::Command(command) => self.handle_command(command, rect),
        }
    }

    /// Feed one pointer event to the interaction controller
    pub fn handle_pointer(&mut self, event: &PointerEvent, rect: Rect) -> Reaction {
        let layout = self.layout(rect);
        let mut ctx = InteractionContext {
            timeline: &mut self.clip.dialogue,
            viewport: &mut self.viewport,
            layout: &layout,
            marker_size: self.config.marker_size(),
        };
        let reaction = self.controller.handle(event, &mut ctx);

        match reaction {
            Reaction::SelectionMoved(sample) => self.set_selection(sample),
            Reaction::MarkerGrabbed {
                context: Some(action), ..
            } => self.pending_context = Some(action),
            _ => {}
        }
        reaction
    }

    pub fn handle_command(&mut self, command: EditorCommand, rect: Rect) -> Result<(), EditorError> {
        log::trace!("command {:?}", command);
        match command {
            EditorCommand::TogglePlay => {
                self.toggle_play()?;
            }
            EditorCommand::Stop => {
                self.stop()?;
            }
            EditorCommand::AddMarker => {
                self.add_marker();
            }
            EditorCommand::RemoveSelectedMarker => {
                self.remove_selected_marker();
            }
            EditorCommand::DeleteMarker(id) => {
                self.delete_marker(id);
            }
            EditorCommand::SetLanguage(language) => self.set_language(language),
            EditorCommand::SetZoom(zoom) => self.viewport.set_zoom(zoom, rect.width()),
            EditorCommand::ScrollBy(delta) => self.viewport.scroll_by(delta, rect.width()),
            EditorCommand::ScrollTo(offset) => self.viewport.scroll_to(offset, rect.width()),
        }
        Ok(())
    }

    /// Poll the backend for the natural end of playback
    pub fn update(&mut self) -> bool {
        match self.backend.as_deref_mut() {
            Some(backend) => self.playback.update(backend),
            None => false,
        }
    }

    /// Add a marker at the selection playhead and select it.
    /// Returns its index, or `None` if a marker already sits there.
    pub fn add_marker(&mut self) -> Option<usize> {
        let position = self.selection_position();
        match self.clip.dialogue.add_marker(position) {
            Ok(index) => {
                if let Some(id) = self.clip.dialogue.id_at(index) {
                    self.controller.select(id);
                }
                Some(index)
            }
            Err(e) => {
                log::debug!("marker not added: {}", e);
                None
            }
        }
    }

    /// Remove the selected marker, if any
    pub fn remove_selected_marker(&mut self) -> Option<DialogueItem> {
        let id = self.controller.selected()?;
        self.delete_marker(id)
    }

    /// Remove a marker by id; selection and drag references to it are dropped
    pub fn delete_marker(&mut self, id: MarkerId) -> Option<DialogueItem> {
        self.controller.forget(id);
        self.clip.dialogue.remove_by_id(id)
    }

    /// Move the selection playhead; the backend follows so a playing clip jumps
    pub fn set_selection(&mut self, sample: f64) {
        let sample = sample.clamp(0.0, self.info.total_samples as f64);
        self.playback.set_selection_start(sample);
        if let Some(backend) = self.backend.as_deref_mut() {
            if let Err(e) = backend.seek(sample as f32) {
                log::warn!("seek to sample {} failed: {}", sample, e);
            }
        }
    }

    /// Selection playhead in seconds into the clip
    pub fn selection_seconds(&self) -> f64 {
        sample::samples_to_seconds(self.selection_position(), self.info.total_samples, self.info.length_seconds)
    }

    /// Move the selection playhead to a time, for backends and hosts that
    /// think in seconds
    pub fn set_selection_seconds(&mut self, seconds: f64) {
        let position = sample::seconds_to_samples(seconds, self.info.total_samples, self.info.length_seconds);
        self.set_selection(position as f64);
    }

    /// `MM:SS.mmm` label for a sample position of the loaded clip
    pub fn position_label(&self, position: SamplePosition) -> String {
        sample::format_position(position, self.info.sample_rate())
    }

    pub fn toggle_play(&mut self) -> Result<bool, EditorError> {
        let backend = self.backend.as_deref_mut().ok_or_else(missing_backend)?;
        Ok(self.playback.toggle_play(backend)?)
    }

    pub fn play(&mut self) -> Result<bool, EditorError> {
        self.request(PlaybackState::Playing)
    }

    pub fn pause(&mut self) -> Result<bool, EditorError> {
        self.request(PlaybackState::Paused)
    }

    pub fn stop(&mut self) -> Result<bool, EditorError> {
        self.request(PlaybackState::Stopped)
    }

    fn request(&mut self, state: PlaybackState) -> Result<bool, EditorError> {
        let backend = self.backend.as_deref_mut().ok_or_else(missing_backend)?;
        Ok(self.playback.set_state(state, backend)?)
    }

    /// Sentence at the live playback position while playing, otherwise at
    /// the selection playhead. Empty when no marker precedes it.
    pub fn text_preview(&self) -> String {
        let position = match self.backend.as_deref() {
            Some(backend) if backend.is_playing() => backend.current_position_sample() as f64,
            _ => self.playback.selection_start(),
        };
        sentence::current_sentence(&self.clip.dialogue, self.language, to_position(position)).unwrap_or_default()
    }

    pub fn sentences(&self) -> Vec<String> {
        self.clip.sentences(self.language)
    }

    /// Sentences numbered from 1, as listed in the inspector
    pub fn numbered_sentences(&self) -> Vec<String> {
        sentence::numbered(&self.sentences())
    }

    /// Render pass input for the timeline body at `rect`
    pub fn scene(&self, rect: Rect) -> TimelineScene {
        let layout = self.layout(rect);
        let playback_sample = self
            .backend
            .as_deref()
            .and_then(|backend| self.playback.playback_position(backend));

        build_scene(&SceneInput {
            timeline: &self.clip.dialogue,
            viewport: &self.viewport,
            layout: &layout,
            config: &self.config,
            language: self.language,
            selected: self.controller.selected(),
            pointer: self.controller.pointer_pos(),
            selection_sample: self.playback.selection_start(),
            playback_sample,
        })
    }

    /// Context action requested by the last secondary click, if not yet taken
    pub fn take_context_action(&mut self) -> Option<ContextAction> {
        self.pending_context.take()
    }

    /// Stop playback and drop interaction state
    pub fn end(&mut self) {
        if let Some(backend) = self.backend.as_deref_mut() {
            if let Err(e) = self.playback.set_state(PlaybackState::Stopped, backend) {
                log::warn!("failed to stop playback: {}", e);
            }
        }
        self.controller.reset();
        self.pending_context = None;
    }

    pub fn layout(&self, rect: Rect) -> TimelineLayout {
        TimelineLayout::new(rect, self.info.total_samples)
    }

    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            log::debug!("language {} -> {}", self.language, language);
            self.language = language;
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clip(&self) -> &SubtitleClip {
        &self.clip
    }

    pub fn timeline(&self) -> &Timeline {
        &self.clip.dialogue
    }

    /// Timeline access for text editing in the inspector
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.clip.dialogue
    }

    pub fn info(&self) -> ClipInfo {
        self.info
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.controller.selected_index(&self.clip.dialogue)
    }

    pub fn selected_item(&self) -> Option<&DialogueItem> {
        self.selected_index().and_then(|index| self.clip.dialogue.get(index))
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn selection_start(&self) -> f64 {
        self.playback.selection_start()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Selection playhead as a whole sample
    fn selection_position(&self) -> SamplePosition {
        sample::from_fractional(self.playback.selection_start(), self.info.total_samples)
    }
}

fn missing_backend() -> EditorError {
    let error = EditorError::MissingDependency(Dependency::AudioBackend);
    log::warn!("{}", error);
    error
}

fn to_position(sample: f64) -> SamplePosition {
    // Float to int casts saturate; NaN becomes 0
    sample.max(0.0).floor() as SamplePosition
}
