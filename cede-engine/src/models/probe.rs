//! Collaborator output shapes
//!
//! These mirror what the external media tools report at the engine boundary:
//! a probe summary and a word-level transcription. The engine never invokes
//! the tools itself; adapters implementing the collaborator traits do.

use serde::{Deserialize, Serialize};

/// Media probe summary for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Clip duration (seconds)
    pub duration: f64,
    /// Frame width (pixels)
    pub width: u32,
    /// Frame height (pixels)
    pub height: u32,
    /// Video codec name as reported by the probe
    pub codec: String,
}

/// A single transcribed word with its timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    /// Word start (seconds)
    pub start: f64,
    /// Word end (seconds)
    pub end: f64,
}

/// Word-level transcription of a clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Full transcribed text
    pub full_text: String,
    /// Ordered word timings
    pub words: Vec<WordTiming>,
}
