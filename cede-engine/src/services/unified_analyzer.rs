//! Unified clip analysis
//!
//! Consumes reconciled speech segments, silence intervals, and visual
//! events for one clip and produces the anomaly list, a confidence level,
//! and a trim recommendation. Pure over its inputs: no I/O, no side
//! effects, identical inputs yield an identical `ClipAnalysis`.
//!
//! Trim bounds derive from the reconciled speech timeline only (the
//! canonical cut-point policy); visual events contribute anomalies, never
//! trim bounds.

use cede_common::{time::format_seconds, AnalyzerParams};
use tracing::debug;

use crate::models::{
    AnalysisContext, Anomaly, AnomalyKind, AnomalySeverity, ClipAnalysis, Confidence,
    SilenceInterval, SpeechSegment, TrimRecommendation, VisualEvent, VisualEventKind,
};

/// Tolerance for a visual event "touching" a clip boundary (seconds)
const BOUNDARY_TOUCH_EPSILON: f64 = 0.01;

/// Clip quality analyzer
pub struct UnifiedAnalyzer {
    params: AnalyzerParams,
}

impl UnifiedAnalyzer {
    pub fn new(params: AnalyzerParams) -> Self {
        Self { params }
    }

    /// Analyze one clip's reconciled signals
    ///
    /// `transcription_skipped` marks that the caller opted out of
    /// transcription; the analysis still completes, annotated with low
    /// confidence, and the dialogue check is skipped.
    pub fn analyze(
        &self,
        clip_duration: f64,
        speech_segments: Vec<SpeechSegment>,
        silences: Vec<SilenceInterval>,
        visual_events: Vec<VisualEvent>,
        transcription_skipped: bool,
        context: Option<&AnalysisContext>,
    ) -> ClipAnalysis {
        let trim = self.recommend_trim(clip_duration, &speech_segments);

        let mut anomalies = Vec::new();
        self.detect_silence_anomalies(&speech_segments, &silences, &mut anomalies);
        self.detect_visual_anomalies(clip_duration, &speech_segments, &visual_events, &mut anomalies);
        self.detect_dead_time(clip_duration, &speech_segments, &mut anomalies);
        if !transcription_skipped {
            if let Some(expected) = context.and_then(|c| c.expected_dialogue.as_deref()) {
                self.detect_missing_words(expected, &speech_segments, &mut anomalies);
            }
        }

        let confidence = if speech_segments.is_empty() || transcription_skipped {
            Confidence::Low
        } else {
            match anomalies.len() {
                0 => Confidence::High,
                1..=2 => Confidence::Medium,
                _ => Confidence::Low,
            }
        };

        debug!(
            clip_duration,
            segments = speech_segments.len(),
            anomalies = anomalies.len(),
            ?confidence,
            "clip analysis complete"
        );

        ClipAnalysis {
            clip_duration,
            speech_segments,
            silences,
            visual_events,
            anomalies,
            confidence,
            trim,
        }
    }

    /// Recommend trim bounds from the speech timeline
    ///
    /// A fixed outward buffer is applied to the first speech start and last
    /// speech end. The end trim is suppressed (None) when it lands within
    /// `trim_end_epsilon` of the clip end, since cutting there gains
    /// nothing. With no speech at all, no trim is recommended.
    fn recommend_trim(
        &self,
        clip_duration: f64,
        segments: &[SpeechSegment],
    ) -> TrimRecommendation {
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return TrimRecommendation {
                    trim_start: 0.0,
                    trim_end: None,
                    usable_duration: clip_duration,
                }
            }
        };

        let trim_start = (first.start - self.params.trim_buffer).max(0.0);
        let raw_end = (last.end + self.params.trim_buffer).min(clip_duration);
        let trim_end = if clip_duration - raw_end < self.params.trim_end_epsilon {
            None
        } else {
            Some(raw_end)
        };
        let usable_duration = trim_end.unwrap_or(clip_duration) - trim_start;

        TrimRecommendation {
            trim_start,
            trim_end,
            usable_duration,
        }
    }

    /// Report long silences strictly inside the speech range
    ///
    /// Leading and trailing silence is expected (the trim absorbs it); only
    /// silence between speech is a pacing signal.
    fn detect_silence_anomalies(
        &self,
        segments: &[SpeechSegment],
        silences: &[SilenceInterval],
        anomalies: &mut Vec<Anomaly>,
    ) {
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return,
        };

        for silence in silences {
            if silence.duration > self.params.internal_silence_threshold
                && silence.start > first.start
                && silence.end < last.end
            {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::InternalSilence,
                    at_seconds: silence.start,
                    description: format!(
                        "{} silence inside speech at {}",
                        format_seconds(silence.duration),
                        format_seconds(silence.start)
                    ),
                    severity: AnomalySeverity::Info,
                });
            }
        }
    }

    /// Report freeze runs and interior black runs
    ///
    /// Black frames touching either clip boundary are natural cut points,
    /// not anomalies. Scene changes are recorded in the event list but are
    /// never anomalous on their own.
    fn detect_visual_anomalies(
        &self,
        clip_duration: f64,
        segments: &[SpeechSegment],
        events: &[VisualEvent],
        anomalies: &mut Vec<Anomaly>,
    ) {
        for event in events {
            match event.kind {
                VisualEventKind::FreezeFrame => {
                    if event.duration() > self.params.freeze_warning_threshold {
                        let overlaps_speech = segments.iter().any(|s| {
                            let end = event.end.unwrap_or(event.start);
                            event.start < s.end && end > s.start
                        });
                        let description = if overlaps_speech {
                            format!(
                                "{} freeze at {} during expected speech",
                                format_seconds(event.duration()),
                                format_seconds(event.start)
                            )
                        } else {
                            format!(
                                "{} freeze at {}",
                                format_seconds(event.duration()),
                                format_seconds(event.start)
                            )
                        };
                        anomalies.push(Anomaly {
                            kind: AnomalyKind::FreezeFrame,
                            at_seconds: event.start,
                            description,
                            severity: AnomalySeverity::Warning,
                        });
                    }
                }
                VisualEventKind::BlackFrame => {
                    let touches_start = event.start <= BOUNDARY_TOUCH_EPSILON;
                    let touches_end = event
                        .end
                        .map(|e| e >= clip_duration - BOUNDARY_TOUCH_EPSILON)
                        .unwrap_or(false);
                    if !touches_start && !touches_end {
                        anomalies.push(Anomaly {
                            kind: AnomalyKind::BlackFrame,
                            at_seconds: event.start,
                            description: format!(
                                "{} black frames at {}",
                                format_seconds(event.duration()),
                                format_seconds(event.start)
                            ),
                            severity: AnomalySeverity::Warning,
                        });
                    }
                }
                VisualEventKind::SceneChange => {}
            }
        }
    }

    /// Report dead time at the clip edges
    fn detect_dead_time(
        &self,
        clip_duration: f64,
        segments: &[SpeechSegment],
        anomalies: &mut Vec<Anomaly>,
    ) {
        let (first, last) = match (segments.first(), segments.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return,
        };

        if first.start > self.params.dead_time_threshold {
            anomalies.push(Anomaly {
                kind: AnomalyKind::DeadTimeStart,
                at_seconds: 0.0,
                description: format!("{} dead time before speech", format_seconds(first.start)),
                severity: AnomalySeverity::Info,
            });
        }
        if last.end < clip_duration - self.params.dead_time_threshold {
            anomalies.push(Anomaly {
                kind: AnomalyKind::DeadTimeEnd,
                at_seconds: last.end,
                description: format!(
                    "{} dead time after speech",
                    format_seconds(clip_duration - last.end)
                ),
                severity: AnomalySeverity::Info,
            });
        }
    }

    /// Report expected dialogue tokens missing from the transcription
    fn detect_missing_words(
        &self,
        expected: &str,
        segments: &[SpeechSegment],
        anomalies: &mut Vec<Anomaly>,
    ) {
        let transcribed: Vec<String> = segments
            .iter()
            .flat_map(|s| s.words.iter())
            .flat_map(|w| normalize_tokens(w))
            .collect();

        for token in normalize_tokens(expected) {
            if !transcribed.contains(&token) {
                anomalies.push(Anomaly {
                    kind: AnomalyKind::MissingWord,
                    at_seconds: 0.0,
                    description: format!("expected word \"{}\" not transcribed", token),
                    severity: AnomalySeverity::Warning,
                });
            }
        }
    }
}

impl Default for UnifiedAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerParams::default())
    }
}

/// Normalize text for dialogue comparison: lowercase, strip punctuation,
/// tokenize on whitespace
fn normalize_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}
