//! Sentence segmentation over a timeline.
//!
//! Consecutive marker texts are concatenated into one sentence until a marker
//! whose line has `new_line` set starts the next one.

use crate::core::line::{Language, Line};
use crate::core::sample::{SamplePosition, END};
use crate::core::timeline::Timeline;

/// Segment every marker with position `<= cutoff` into sentences.
///
/// Markers are visited in timeline order and iteration stops at the first
/// marker past `cutoff`. Each sentence is trimmed of surrounding whitespace.
/// The timeline is not modified; calling this twice on the same timeline
/// gives the same result.
pub fn segment(timeline: &Timeline, language: Language, cutoff: SamplePosition) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for item in timeline {
        if item.sample_position() > cutoff {
            break;
        }

        let line = item.text.line(language);
        if line.new_line && !current.is_empty() {
            flush(&mut current, &mut sentences);
        }
        append_styled(line, &mut current);
    }

    if !current.is_empty() {
        flush(&mut current, &mut sentences);
    }

    sentences
}

/// All sentences of the timeline
pub fn all_sentences(timeline: &Timeline, language: Language) -> Vec<String> {
    segment(timeline, language, END)
}

/// The sentence being spoken at `position`: the last one segmented up to it
pub fn current_sentence(timeline: &Timeline, language: Language, position: SamplePosition) -> Option<String> {
    segment(timeline, language, position).pop()
}

/// Sentences prefixed with their 1-based number, as shown in the inspector
pub fn numbered(sentences: &[String]) -> Vec<String> {
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| format!("{}. {}", i + 1, sentence))
        .collect()
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    sentences.push(current.trim().to_string());
    current.clear();
}

fn append_styled(line: &Line, current: &mut String) {
    current.push_str(&line.render(true));
}
