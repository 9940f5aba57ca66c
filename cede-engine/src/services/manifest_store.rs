//! Edit manifest store
//!
//! Owns the per-clip edit manifests: versioned variation history, the
//! status lifecycle, and analysis snapshots. All mutations on one job id
//! are serialized through a keyed lock (single-writer discipline);
//! operations on distinct job ids never contend. Persistence goes through
//! the `ManifestRepository` seam.

use std::collections::HashMap;
use std::sync::Arc;

use cede_common::{Error, Result, StoreParams};
use tokio::sync::Mutex;
use tracing::info;

use crate::db::ManifestRepository;
use crate::models::{
    ClipAnalysis, ClipContext, EditManifest, EditOps, EditStatus, SourceClip, Variation,
};

/// Versioned edit history store, one manifest per clip
pub struct EditManifestStore {
    repo: Arc<dyn ManifestRepository>,
    params: StoreParams,
    /// Per-job mutation locks; variation id assignment reads the current
    /// maximum id, so writers on the same manifest must be exclusive.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EditManifestStore {
    pub fn new(repo: Arc<dyn ManifestRepository>, params: StoreParams) -> Self {
        Self {
            repo,
            params,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Boundary tolerance for non-precise trims (seconds)
    ///
    /// Fast trims commit only to nearest-keyframe boundaries; cut points
    /// may land up to this far outside the requested bounds.
    pub fn keyframe_tolerance(&self) -> f64 {
        self.params.keyframe_tolerance
    }

    /// Create a manifest for a new clip, status `Pending`
    ///
    /// Fails `AlreadyExists` when the job id already has a manifest;
    /// idempotent callers should `get` first.
    pub async fn start(
        &self,
        job_id: &str,
        source: SourceClip,
        context: Option<ClipContext>,
    ) -> Result<EditManifest> {
        if source.duration <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "source duration {} must be positive",
                source.duration
            )));
        }

        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let manifest = EditManifest::new(job_id, source, context.unwrap_or_default());
        self.repo.insert(&manifest).await?;
        info!(job_id, "edit manifest created");
        Ok(manifest)
    }

    /// Create a trim variation
    ///
    /// `precise` selects frame-exact boundaries (re-encode) over fast
    /// nearest-keyframe boundaries. Advances `Pending` to `InProgress`.
    pub async fn create_trim_variation(
        &self,
        job_id: &str,
        trim_start: f64,
        trim_end: Option<f64>,
        notes: Option<String>,
        precise: bool,
    ) -> Result<Variation> {
        if trim_start < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "trim start {} must not be negative",
                trim_start
            )));
        }
        if let Some(end) = trim_end {
            if end <= trim_start {
                return Err(Error::InvalidParameter(format!(
                    "trim end {} must exceed trim start {}",
                    end, trim_start
                )));
            }
        }

        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        if let Some(end) = trim_end {
            if end > manifest.source.duration {
                return Err(Error::InvalidParameter(format!(
                    "trim end {} exceeds source duration {}",
                    end, manifest.source.duration
                )));
            }
        }

        let duration = trim_end.unwrap_or(manifest.source.duration) - trim_start;
        let variation = self.push_variation(
            &mut manifest,
            EditOps {
                trim_start: Some(trim_start),
                trim_end,
                speed: None,
            },
            duration,
            notes,
            precise,
        );
        self.repo.save(&manifest).await?;
        info!(job_id, id = %variation.id, precise, "trim variation created");
        Ok(variation)
    }

    /// Create a speed variation over the source clip or an existing variation
    ///
    /// Stacking is allowed: speed may be layered on a prior trim, carrying
    /// the base's trim bounds forward. New duration is base duration / speed.
    pub async fn create_speed_variation(
        &self,
        job_id: &str,
        speed: f64,
        base_variation: Option<&str>,
        notes: Option<String>,
    ) -> Result<Variation> {
        if !(speed > 0.0 && speed.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "speed {} must be positive",
                speed
            )));
        }

        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        let (base_duration, base_edits) = match base_variation {
            None => (manifest.source.duration, EditOps::default()),
            Some(id) => {
                let base = manifest
                    .variation(id)
                    .ok_or_else(|| Error::NotFound(format!("variation {}", id)))?;
                (base.duration_seconds, base.edits)
            }
        };

        let edits = EditOps {
            // Speed is recorded relative to the source clip.
            speed: Some(base_edits.speed.unwrap_or(1.0) * speed),
            ..base_edits
        };
        // A speed change always re-encodes, so boundaries are frame-exact.
        let variation =
            self.push_variation(&mut manifest, edits, base_duration / speed, notes, true);
        self.repo.save(&manifest).await?;
        info!(job_id, id = %variation.id, speed, "speed variation created");
        Ok(variation)
    }

    /// Select a variation as the approved edit
    ///
    /// Unknown variation ids fail `NotFound` and leave the manifest
    /// unchanged. Reselecting the same id is a no-op beyond the status
    /// write.
    pub async fn select(&self, job_id: &str, variation_id: &str) -> Result<EditManifest> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        if manifest.variation(variation_id).is_none() {
            return Err(Error::NotFound(format!("variation {}", variation_id)));
        }

        manifest.selected = Some(variation_id.to_string());
        manifest.status = EditStatus::Approved;
        manifest.touch();
        self.repo.save(&manifest).await?;
        info!(job_id, variation_id, "variation selected");
        Ok(manifest)
    }

    /// Attach an analysis snapshot without altering status or variations
    pub async fn store_analysis(&self, job_id: &str, analysis: ClipAnalysis) -> Result<EditManifest> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        manifest.analysis = Some(analysis);
        manifest.touch();
        self.repo.save(&manifest).await?;
        Ok(manifest)
    }

    /// Move an in-progress manifest to `Review`
    pub async fn submit_for_review(&self, job_id: &str) -> Result<EditManifest> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        if manifest.status != EditStatus::InProgress {
            return Err(Error::InvalidParameter(format!(
                "cannot submit for review from status {}",
                manifest.status.as_str()
            )));
        }
        manifest.status = EditStatus::Review;
        manifest.touch();
        self.repo.save(&manifest).await?;
        Ok(manifest)
    }

    /// Archive a manifest
    ///
    /// Clears `selected` so the selection invariant holds in every state;
    /// the variation history is retained and ids are never reused.
    pub async fn archive(&self, job_id: &str) -> Result<EditManifest> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut manifest = self.load(job_id).await?;
        manifest.status = EditStatus::Archived;
        manifest.selected = None;
        manifest.touch();
        self.repo.save(&manifest).await?;
        info!(job_id, "manifest archived");
        Ok(manifest)
    }

    /// Fetch a manifest by job id
    pub async fn get(&self, job_id: &str) -> Result<EditManifest> {
        self.load(job_id).await
    }

    /// All known job ids
    pub async fn list(&self) -> Result<Vec<String>> {
        self.repo.list_ids().await
    }

    async fn load(&self, job_id: &str) -> Result<EditManifest> {
        self.repo
            .load(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("manifest for job {}", job_id)))
    }

    fn push_variation(
        &self,
        manifest: &mut EditManifest,
        edits: EditOps,
        duration_seconds: f64,
        notes: Option<String>,
        precise: bool,
    ) -> Variation {
        let id = manifest.next_variation_id();
        let variation = Variation {
            filename: manifest.variation_filename(&id),
            id,
            edits,
            duration_seconds,
            created_at: crate::now(),
            notes,
            precise,
        };
        manifest.variations.push(variation.clone());
        if manifest.status == EditStatus::Pending {
            manifest.status = EditStatus::InProgress;
        }
        manifest.touch();
        variation
    }

    async fn job_lock(&self, job_id: &str) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().await;
        map.entry(job_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
