//! Timeline reconciliation
//!
//! Merges raw word-level transcription timings with detected silence
//! intervals into ordered, non-overlapping speech segments. Word timings
//! come from a speech-to-text pass and carry VAD imprecision at the edges;
//! silence intervals come from the audio detector and are treated as the
//! more reliable boundary signal.

use tracing::debug;

use crate::models::{SilenceInterval, SpeechSegment, WordTiming};

/// Merge word timings and silence intervals into speech segments
///
/// Walks words in order, starting a segment at the first word and closing
/// it whenever the gap to the next word falls inside a reported silence of
/// duration >= `min_silence_duration`. Segment boundaries are clamped to
/// the enclosing silence edges to absorb VAD imprecision.
///
/// Zero words is a valid state (a clip without speech) and yields zero
/// segments, not an error.
pub fn reconcile(
    words: &[WordTiming],
    silences: &[SilenceInterval],
    min_silence_duration: f64,
) -> Vec<SpeechSegment> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut seg_start = words[0].start;
    let mut seg_words: Vec<String> = vec![words[0].word.clone()];
    let mut seg_end = words[0].end;

    for pair in words.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);

        if let Some(silence) = splitting_silence(prev, next, silences, min_silence_duration) {
            // Close at the silence edges rather than the imprecise word
            // timings, never moving the end before the segment start.
            let end = silence.start.max(seg_start);
            segments.push(build_segment(seg_start, end, seg_words));

            // Open the next segment at the silence end, never past the
            // next word itself.
            seg_start = silence.end.min(next.end);
            seg_words = Vec::new();
        }

        seg_words.push(next.word.clone());
        seg_end = next.end;
    }

    segments.push(build_segment(seg_start, seg_end, seg_words));

    debug!(
        words = words.len(),
        silences = silences.len(),
        segments = segments.len(),
        "reconciled speech timeline"
    );

    segments
}

/// Find the silence, if any, that splits the gap between two words
///
/// The gap midpoint is tested rather than full containment so that a word
/// timing spilling slightly into the silence does not defeat the split.
fn splitting_silence<'a>(
    prev: &WordTiming,
    next: &WordTiming,
    silences: &'a [SilenceInterval],
    min_silence_duration: f64,
) -> Option<&'a SilenceInterval> {
    let midpoint = (prev.end + next.start) / 2.0;
    silences
        .iter()
        .find(|s| s.duration >= min_silence_duration && s.contains(midpoint))
}

fn build_segment(start: f64, end: f64, words: Vec<String>) -> SpeechSegment {
    let word_count = words.len();
    SpeechSegment {
        start,
        end,
        words,
        word_count,
    }
}
