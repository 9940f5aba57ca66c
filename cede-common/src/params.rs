//! Engine tuning parameters
//!
//! All decision thresholds live here as plain structs with defaults, passed
//! explicitly into the analyzer, planner, and store. There is no global
//! parameter singleton: callers construct (or deserialize) the structs they
//! need and hand them to the engine.

use serde::{Deserialize, Serialize};

/// Tuning parameters for clip analysis
///
/// Defaults match the shipped decision policy; override individual fields
/// via the TOML config (`[analyzer]` table) when tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    /// Outward buffer applied to speech bounds when recommending a trim (seconds)
    pub trim_buffer: f64,

    /// An end trim closer than this to the clip end is suppressed (seconds)
    pub trim_end_epsilon: f64,

    /// Internal silences longer than this are reported as anomalies (seconds)
    pub internal_silence_threshold: f64,

    /// Freeze frames longer than this are reported as warnings (seconds)
    pub freeze_warning_threshold: f64,

    /// Speech starting/ending further than this from the clip edges is
    /// reported as dead time (seconds)
    pub dead_time_threshold: f64,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            trim_buffer: 0.15,
            trim_end_epsilon: 0.1,
            internal_silence_threshold: 0.5,
            freeze_warning_threshold: 0.5,
            dead_time_threshold: 0.3,
        }
    }
}

/// Tuning parameters for assembly transition decisions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    /// Tension at or above this counts as "high" (release / spike rules)
    pub tension_high: f64,

    /// Tension at or below this counts as "low"
    pub tension_low: f64,

    /// Both shots at or above this sustains intensity (forces a hard cut)
    pub tension_sustained: f64,

    /// Crossfade length for a high-to-low tension release (seconds)
    pub crossfade_duration: f64,

    /// Black insert length when building into a tension spike (seconds)
    pub black_insert_duration: f64,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            tension_high: 0.7,
            tension_low: 0.3,
            tension_sustained: 0.6,
            crossfade_duration: 1.0,
            black_insert_duration: 0.3,
        }
    }
}

/// Tuning parameters for the edit manifest store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreParams {
    /// Boundary tolerance for non-precise (nearest-keyframe) trims (seconds)
    ///
    /// A fast trim commits only to nearest-keyframe boundaries; the cut may
    /// land up to this far outside the requested bounds. Frame-exact trims
    /// (`precise = true`) have zero tolerance at re-encode cost.
    pub keyframe_tolerance: f64,
}

impl Default for StoreParams {
    fn default() -> Self {
        Self {
            keyframe_tolerance: 0.5,
        }
    }
}
