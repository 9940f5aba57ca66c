//! Assembly timeline types
//!
//! Inputs (`ShotSpec`, `AudioLayer`) are read-only to the planner; the
//! resolved `AssemblyTimeline` carries absolute shot placements, one
//! transition decision per junction, and the audio mix plan.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One shot in an assembly request
///
/// `energy` and `tension` are pre-computed [0,1] scalars from the shot's
/// mood metadata; the planner never derives them itself. `source_duration`
/// is the probed duration of the underlying file, needed because the planner
/// is pure and cannot inspect media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSpec {
    /// Path to the shot's media file
    pub video_path: PathBuf,
    /// Probed duration of the source file (seconds)
    pub source_duration: f64,
    /// Trim in-point (seconds), defaults to 0
    pub trim_start: Option<f64>,
    /// Trim out-point (seconds), defaults to the source duration
    pub trim_end: Option<f64>,
    /// Pacing energy in [0,1]
    pub energy: f64,
    /// Dramatic tension in [0,1]
    pub tension: f64,
    /// Free-form mood label
    pub mood: Option<String>,
    /// Force a zero-duration hard cut into this shot
    ///
    /// Reserved for stitching continuation takes of a single shot.
    #[serde(default)]
    pub skip_transition: bool,
}

impl ShotSpec {
    /// Trimmed duration of this shot (seconds)
    pub fn trimmed_duration(&self) -> f64 {
        let start = self.trim_start.unwrap_or(0.0);
        let end = self.trim_end.unwrap_or(self.source_duration);
        end - start
    }
}

/// Transition style between two adjacent shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    HardCut,
    Crossfade,
    BlackInsert,
}

/// The resolved transition at one junction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionDecision {
    pub kind: TransitionKind,
    /// Transition length (seconds); 0 for hard cuts
    pub duration_seconds: f64,
}

impl TransitionDecision {
    pub fn hard_cut() -> Self {
        Self {
            kind: TransitionKind::HardCut,
            duration_seconds: 0.0,
        }
    }
}

/// Kind of audio layer in the mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioLayerKind {
    Music,
    Vo,
    Sfx,
    Ambient,
}

/// One audio layer placed on the assembly timeline
///
/// File-backed layers carry a path; generated voice-over layers carry the
/// text to synthesize instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioLayer {
    pub kind: AudioLayerKind,
    /// Path to the audio file, for file-backed layers
    pub path: Option<PathBuf>,
    /// Text to synthesize, for generated layers
    pub text: Option<String>,
    /// Layer volume in [0,1]
    pub volume: f64,
    /// Placement on the timeline (seconds)
    pub start_time: f64,
    /// Known layer duration (seconds), if any
    pub duration: Option<f64>,
}

impl AudioLayer {
    /// End of this layer on the timeline; equals `start_time` when the
    /// duration is unknown
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration.unwrap_or(0.0)
    }
}

/// A shot resolved to absolute timeline coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedShot {
    /// Index into the input shot list
    pub shot_index: usize,
    /// Path of the placed shot (copied from the spec for convenience)
    pub video_path: PathBuf,
    /// Absolute start on the assembly timeline (seconds)
    pub start: f64,
    /// Absolute end on the assembly timeline (seconds)
    pub end: f64,
}

/// A fully resolved assembly plan
///
/// Pure function output: identical inputs always produce an identical
/// timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyTimeline {
    /// Shots resolved to absolute coordinates, in input order
    pub shots: Vec<PlacedShot>,
    /// One decision per adjacent shot pair (`shots.len() - 1` entries)
    pub transitions: Vec<TransitionDecision>,
    /// Audio layers as placed on the timeline
    pub audio_mix: Vec<AudioLayer>,
    /// Volume applied to the video track's own audio, in [0,1]
    pub video_volume: f64,
    /// Composite duration: max of video end and the latest audio layer end
    pub total_duration: f64,
}
