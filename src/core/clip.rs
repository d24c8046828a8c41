//! A subtitled audio clip: a reference to the host's audio asset plus its dialogue.

use crate::core::line::Language;
use crate::core::sample::SamplePosition;
use crate::core::sentence;
use crate::core::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Subtitle data for one audio clip.
///
/// The audio itself belongs to the host; only its asset reference is kept so
/// the host can resolve it again after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubtitleClip {
    #[serde(default)]
    pub clip: Option<String>,
    #[serde(default)]
    pub dialogue: Timeline,
}

impl SubtitleClip {
    /// Create an empty clip for the audio asset `clip`
    pub fn new(clip: impl Into<String>) -> Self {
        Self {
            clip: Some(clip.into()),
            dialogue: Timeline::new(),
        }
    }

    /// Every sentence of the dialogue
    pub fn sentences(&self, language: Language) -> Vec<String> {
        sentence::all_sentences(&self.dialogue, language)
    }

    /// Sentences made of markers at or before `position`
    pub fn sentences_until(&self, language: Language, position: SamplePosition) -> Vec<String> {
        sentence::segment(&self.dialogue, language, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::line::Line;

    #[test]
    fn test_sentences_until() {
        let mut clip = SubtitleClip::new("voice_01.wav");
        for (position, text) in [(0, "One."), (500, "Two.")] {
            let index = clip.dialogue.add_marker(position).unwrap();
            let line = clip.dialogue.text_mut(index).unwrap().line_mut(Language::English);
            *line = Line::new(text).starting_sentence();
        }

        assert_eq!(clip.sentences(Language::English), vec!["One.", "Two."]);
        assert_eq!(clip.sentences_until(Language::English, 499), vec!["One."]);
    }

    #[test]
    fn test_json_layout() {
        let mut clip = SubtitleClip::new("voice_01.wav");
        clip.dialogue.add_marker(12).unwrap();

        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["Clip"], "voice_01.wav");
        assert_eq!(json["Dialogue"][0]["SamplePosition"], 12);

        let restored: SubtitleClip = serde_json::from_value(json).unwrap();
        assert_eq!(restored.dialogue.len(), 1);
        assert_eq!(restored.clip.as_deref(), Some("voice_01.wav"));
    }
}
