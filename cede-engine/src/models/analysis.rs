//! Clip analysis types
//!
//! `ClipAnalysis` is the read-only output of a single analysis pass: a fresh
//! value is built on every call and never mutated afterwards. Inputs
//! (`SpeechSegment`, `SilenceInterval`, `VisualEvent`) are likewise immutable
//! once constructed.

use serde::{Deserialize, Serialize};

/// A contiguous run of transcribed speech
///
/// Produced by the timeline reconciler from word timings and silence
/// intervals; immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSegment {
    /// Segment start (seconds)
    pub start: f64,
    /// Segment end (seconds)
    pub end: f64,
    /// Ordered transcription tokens within the segment
    pub words: Vec<String>,
    /// Token count (cached, equals `words.len()`)
    pub word_count: usize,
}

impl SpeechSegment {
    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A detected silence interval from the audio detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceInterval {
    /// Silence start (seconds)
    pub start: f64,
    /// Silence end (seconds)
    pub end: f64,
    /// Silence duration (seconds)
    pub duration: f64,
}

impl SilenceInterval {
    /// Build an interval, deriving duration from the bounds
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            duration: end - start,
        }
    }

    /// True if the given instant falls within this interval
    pub fn contains(&self, at: f64) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Kind of visual discontinuity reported by the frame detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualEventKind {
    /// Abrupt scene content change
    SceneChange,
    /// Run of (near-)black frames
    BlackFrame,
    /// Run of identical frames
    FreezeFrame,
}

/// A visual event detected in the clip
///
/// Scene changes are instantaneous (`end` is None); black and freeze runs
/// carry their end time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualEvent {
    pub kind: VisualEventKind,
    /// Event start (seconds)
    pub start: f64,
    /// Event end (seconds), None for instantaneous events
    pub end: Option<f64>,
}

impl VisualEvent {
    /// Event duration; zero for instantaneous events
    pub fn duration(&self) -> f64 {
        self.end.map(|e| e - self.start).unwrap_or(0.0)
    }
}

/// Severity of a detected anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Info,
    Warning,
}

/// Closed set of anomaly kinds the analyzer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Long silence strictly inside the speech range
    InternalSilence,
    /// Frozen frames, possibly during expected speech
    FreezeFrame,
    /// Black frames away from the clip boundaries
    BlackFrame,
    /// Speech starts noticeably after the clip begins
    DeadTimeStart,
    /// Speech ends noticeably before the clip ends
    DeadTimeEnd,
    /// An expected dialogue token is absent from the transcription
    MissingWord,
}

/// A single detected anomaly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// Where in the clip the anomaly occurs (seconds)
    pub at_seconds: f64,
    /// Human-readable description for review UIs and logs
    pub description: String,
    pub severity: AnomalySeverity,
}

/// Overall confidence in the analysis result
///
/// Derived from the anomaly count; always `Low` when the clip had no speech
/// or transcription was skipped. Low confidence is never an error: the
/// engine still returns its best-effort analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Recommended trim bounds for a clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRecommendation {
    /// Recommended in-point (seconds from clip start)
    pub trim_start: f64,
    /// Recommended out-point; None when no meaningful end trim exists
    pub trim_end: Option<f64>,
    /// Duration of the recommended usable range (seconds)
    pub usable_duration: f64,
}

/// Optional caller-supplied context for an analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    /// Dialogue the clip was generated to contain, for mismatch detection
    pub expected_dialogue: Option<String>,
    /// Target duration the clip should trim down to (seconds)
    ///
    /// Carried through for downstream edit planning against the
    /// recommended trim; the analyzer itself does not consult it.
    pub duration_target: Option<f64>,
}

/// Complete analysis of one clip
///
/// Built fresh on every `analyze` call; identical inputs produce an
/// identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAnalysis {
    /// Probed clip duration (seconds)
    pub clip_duration: f64,
    /// Reconciled speech segments, in order
    pub speech_segments: Vec<SpeechSegment>,
    /// Detected silence intervals, in order
    pub silences: Vec<SilenceInterval>,
    /// Detected visual events, in order
    pub visual_events: Vec<VisualEvent>,
    /// Detected anomalies
    pub anomalies: Vec<Anomaly>,
    /// Overall confidence derived from the anomaly count
    pub confidence: Confidence,
    /// Recommended trim bounds
    pub trim: TrimRecommendation,
}

impl ClipAnalysis {
    /// Count anomalies at a given severity
    pub fn count_severity(&self, severity: AnomalySeverity) -> usize {
        self.anomalies
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }
}
