//! Edit manifest and variation history
//!
//! One manifest per clip, owned exclusively by the manifest store and
//! mutated only through its operations. The status lifecycle is:
//!
//! `pending → in_progress → review → approved → archived`
//!
//! `selected` is null unless the status is `review` or `approved`, and always
//! references an existing variation id.

use crate::models::analysis::ClipAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Edit lifecycle status for one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// Manifest created, no derived edits yet
    Pending,
    /// At least one variation exists
    InProgress,
    /// Awaiting approval of a candidate variation
    Review,
    /// A variation has been selected
    Approved,
    /// Retired from the active set
    Archived,
}

impl EditStatus {
    /// True if a variation may be selected in this status
    ///
    /// Selection itself advances the status to `Approved`, so this covers
    /// the states `selected` is allowed to be non-null in.
    pub fn allows_selection(&self) -> bool {
        matches!(self, EditStatus::Review | EditStatus::Approved)
    }

    /// True for the end of the lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, EditStatus::Archived)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EditStatus::Pending => "pending",
            EditStatus::InProgress => "in_progress",
            EditStatus::Review => "review",
            EditStatus::Approved => "approved",
            EditStatus::Archived => "archived",
        }
    }

    /// Parse the database string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(EditStatus::Pending),
            "in_progress" => Some(EditStatus::InProgress),
            "review" => Some(EditStatus::Review),
            "approved" => Some(EditStatus::Approved),
            "archived" => Some(EditStatus::Archived),
            _ => None,
        }
    }
}

/// The edit operations a variation applies to its source
///
/// All fields are explicitly optional typed values; a trim-only variation
/// has no speed, a speed-only variation has no trim bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOps {
    /// Trim in-point relative to the source clip (seconds)
    pub trim_start: Option<f64>,
    /// Trim out-point relative to the source clip (seconds)
    pub trim_end: Option<f64>,
    /// Playback speed multiplier relative to the source clip
    pub speed: Option<f64>,
}

/// A derived edit of a clip, versioned
///
/// Immutable after creation. Ids are zero-padded sequential ("v001",
/// "v002", ...), monotonic, and never reused, even across archival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Sequential id, e.g. "v001"
    pub id: String,
    /// Output filename for the rendered variation
    pub filename: String,
    /// The edits this variation applies
    pub edits: EditOps,
    /// Duration of the rendered variation (seconds)
    pub duration_seconds: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Free-form operator notes
    pub notes: Option<String>,
    /// Frame-exact boundaries (re-encode) vs. nearest-keyframe boundaries
    ///
    /// When false, cut points may land up to `StoreParams::keyframe_tolerance`
    /// seconds outside the requested bounds.
    pub precise: bool,
}

/// The source clip a manifest tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClip {
    /// Path to the source media file
    pub path: PathBuf,
    /// Probed source duration (seconds)
    pub duration: f64,
}

/// Production context for a clip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipContext {
    pub project_id: Option<String>,
    pub shot_id: Option<String>,
    pub take_index: Option<u32>,
    /// Dialogue the clip was generated to contain
    pub expected_dialogue: Option<String>,
}

/// Persisted edit history and status for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditManifest {
    /// Unique job identifier (one manifest per clip)
    pub job_id: String,
    /// The source clip under edit
    pub source: SourceClip,
    /// Production context
    pub context: ClipContext,
    /// Most recent analysis snapshot, if stored
    pub analysis: Option<ClipAnalysis>,
    /// Variation history, in creation order
    pub variations: Vec<Variation>,
    /// Selected variation id; null unless status is review/approved
    pub selected: Option<String>,
    /// Lifecycle status
    pub status: EditStatus,
    /// Manifest creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl EditManifest {
    /// Create a fresh manifest in `Pending` with no variations
    pub fn new(job_id: impl Into<String>, source: SourceClip, context: ClipContext) -> Self {
        let now = crate::now();
        Self {
            job_id: job_id.into(),
            source,
            context,
            analysis: None,
            variations: Vec::new(),
            selected: None,
            status: EditStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Next sequential variation id
    ///
    /// Computed from the maximum existing id rather than the variation
    /// count, so ids stay monotonic and are never reused.
    pub fn next_variation_id(&self) -> String {
        let max = self
            .variations
            .iter()
            .filter_map(|v| v.id.strip_prefix('v'))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("v{:03}", max + 1)
    }

    /// Look up a variation by id
    pub fn variation(&self, id: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// Filename for a new variation, derived from the source stem
    pub fn variation_filename(&self, id: &str) -> String {
        let stem = self
            .source
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("clip");
        let ext = self
            .source
            .path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("mp4");
        format!("{}_{}.{}", stem, id, ext)
    }

    /// Touch the mutation timestamp
    pub fn touch(&mut self) {
        self.updated_at = crate::now();
    }
}

// Convenience for tests and adapters building a source from a path
impl SourceClip {
    pub fn new(path: impl AsRef<Path>, duration: f64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            duration,
        }
    }
}
