//! Collaborator traits and analysis options
//!
//! The engine owns decision logic only; raw media probing, detection, and
//! transcription live behind these traits. Adapters wrap the actual tools
//! (ffprobe, ffmpeg filters, a speech-to-text service) and surface failures
//! as `Error::ExternalTool`.

use cede_common::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{AnalysisContext, ProbeInfo, SilenceInterval, Transcription, VisualEvent};

/// Media inspection collaborator (ffprobe or equivalent)
#[async_trait::async_trait]
pub trait MediaProbe: Send + Sync {
    /// Probe duration, dimensions, and codec for one clip
    async fn probe(&self, path: &Path) -> Result<ProbeInfo>;
}

/// Audio silence detection collaborator
#[async_trait::async_trait]
pub trait SilenceDetector: Send + Sync {
    /// Detect silence intervals at the given noise floor
    ///
    /// Intervals shorter than `min_duration` are not reported.
    async fn detect_silence(
        &self,
        path: &Path,
        noise_db: f64,
        min_duration: f64,
    ) -> Result<Vec<SilenceInterval>>;
}

/// Visual discontinuity detection collaborator
#[async_trait::async_trait]
pub trait VisualDetector: Send + Sync {
    /// Detect scene change instants above the given difference threshold
    async fn detect_scene_changes(&self, path: &Path, threshold: f64) -> Result<Vec<VisualEvent>>;

    /// Detect runs of (near-)black frames
    async fn detect_black_frames(
        &self,
        path: &Path,
        pix_threshold: f64,
        min_duration: f64,
    ) -> Result<Vec<VisualEvent>>;

    /// Detect runs of frozen frames
    async fn detect_freeze_frames(
        &self,
        path: &Path,
        noise_db: f64,
        min_duration: f64,
    ) -> Result<Vec<VisualEvent>>;
}

/// Speech-to-text collaborator
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a clip to word-level timings
    async fn transcribe(&self, path: &Path) -> Result<Transcription>;
}

/// Options for one analysis pass
///
/// Thresholds feed the detector collaborators; `context` feeds the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    /// Scene change difference threshold
    pub scene_threshold: f64,
    /// Silence detection noise floor (dB)
    pub noise_db: f64,
    /// Minimum silence duration to report and to split segments on (seconds)
    pub min_silence_duration: f64,
    /// Black frame pixel luminance threshold
    pub black_pix_threshold: f64,
    /// Minimum black run duration to report (seconds)
    pub black_min_duration: f64,
    /// Freeze detection noise tolerance (dB)
    pub freeze_noise: f64,
    /// Minimum freeze run duration to report (seconds)
    pub freeze_min_duration: f64,
    /// Skip transcription entirely; analysis proceeds with low confidence
    pub skip_transcription: bool,
    /// Optional expected-dialogue / target-duration context
    pub context: Option<AnalysisContext>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            scene_threshold: 0.4,
            noise_db: -30.0,
            min_silence_duration: 0.5,
            black_pix_threshold: 0.98,
            black_min_duration: 0.1,
            freeze_noise: -60.0,
            freeze_min_duration: 0.5,
            skip_transcription: false,
            context: None,
        }
    }
}
