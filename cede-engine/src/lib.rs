//! # CEDE Engine
//!
//! Multi-signal clip analysis and edit decision engine:
//! - Timeline reconciliation: word timings + silences → speech segments
//! - Unified analysis: anomalies, confidence, trim recommendation
//! - Edit manifest store: versioned variations with a status lifecycle
//! - Assembly planning: transitions and audio mix for multi-clip timelines
//!
//! Raw media work (probing, detection, transcription) lives behind the
//! collaborator traits in [`types`]; the engine itself performs no media
//! I/O.

pub mod db;
pub mod models;
pub mod services;
pub mod types;

pub use cede_common::time::now;
pub use cede_common::{Error, Result};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use cede_common::config::EngineConfig;
use db::ManifestRepository;
use models::{
    AssemblyTimeline, AudioLayer, ClipAnalysis, ClipContext, EditManifest, ShotSpec, SourceClip,
    Variation, VisualEvent,
};
use services::batch::{BatchItemReport, BatchReport};
use services::{reconcile, AssemblyPlanner, EditManifestStore, UnifiedAnalyzer};
use types::{AnalyzeOptions, MediaProbe, SilenceDetector, Transcriber, VisualDetector};

/// The external collaborators the engine consumes
///
/// Adapters wrap the actual media tools and surface their failures as
/// `Error::ExternalTool`.
pub struct Collaborators {
    pub probe: Arc<dyn MediaProbe>,
    pub silence: Arc<dyn SilenceDetector>,
    pub visual: Arc<dyn VisualDetector>,
    pub transcriber: Arc<dyn Transcriber>,
}

/// The clip edit decision engine
///
/// Holds the pure decision services plus the manifest store; construct one
/// per process and share it (`&self` methods throughout).
pub struct ClipEngine {
    collaborators: Collaborators,
    analyzer: UnifiedAnalyzer,
    planner: AssemblyPlanner,
    store: EditManifestStore,
}

impl ClipEngine {
    /// Build an engine from collaborators, a manifest repository, and
    /// configuration
    pub fn new(
        collaborators: Collaborators,
        repo: Arc<dyn ManifestRepository>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            collaborators,
            analyzer: UnifiedAnalyzer::new(config.analyzer),
            planner: AssemblyPlanner::new(config.transitions),
            store: EditManifestStore::new(repo, config.store),
        }
    }

    /// Access the underlying manifest store
    pub fn store(&self) -> &EditManifestStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    /// Analyze one clip end to end
    ///
    /// Probes the clip, runs the detectors, transcribes (unless
    /// `skip_transcription`), reconciles the speech timeline, and produces
    /// the analysis. Collaborator failures surface as `ExternalTool`
    /// errors; with transcription skipped the analysis completes at low
    /// confidence instead.
    pub async fn analyze(&self, video_path: &Path, options: &AnalyzeOptions) -> Result<ClipAnalysis> {
        let probe = self.collaborators.probe.probe(video_path).await?;

        let mut visual_events: Vec<VisualEvent> = Vec::new();
        visual_events.extend(
            self.collaborators
                .visual
                .detect_scene_changes(video_path, options.scene_threshold)
                .await?,
        );
        visual_events.extend(
            self.collaborators
                .visual
                .detect_black_frames(video_path, options.black_pix_threshold, options.black_min_duration)
                .await?,
        );
        visual_events.extend(
            self.collaborators
                .visual
                .detect_freeze_frames(video_path, options.freeze_noise, options.freeze_min_duration)
                .await?,
        );
        visual_events.sort_by(|a, b| a.start.total_cmp(&b.start));

        let silences = self
            .collaborators
            .silence
            .detect_silence(video_path, options.noise_db, options.min_silence_duration)
            .await?;

        let segments = if options.skip_transcription {
            Vec::new()
        } else {
            let transcription = self.collaborators.transcriber.transcribe(video_path).await?;
            reconcile(&transcription.words, &silences, options.min_silence_duration)
        };

        info!(
            path = %video_path.display(),
            duration = probe.duration,
            segments = segments.len(),
            "clip signals collected"
        );

        Ok(self.analyzer.analyze(
            probe.duration,
            segments,
            silences,
            visual_events,
            options.skip_transcription,
            options.context.as_ref(),
        ))
    }

    /// Analyze a clip tracked by a manifest and store the snapshot
    ///
    /// Expected dialogue from the manifest context feeds the analysis when
    /// the options carry no explicit context.
    pub async fn analyze_and_store(
        &self,
        job_id: &str,
        options: &AnalyzeOptions,
    ) -> Result<ClipAnalysis> {
        let manifest = self.store.get(job_id).await?;

        let mut options = options.clone();
        if options.context.is_none() && manifest.context.expected_dialogue.is_some() {
            options.context = Some(models::AnalysisContext {
                expected_dialogue: manifest.context.expected_dialogue.clone(),
                duration_target: None,
            });
        }

        let analysis = self.analyze(&manifest.source.path, &options).await?;
        self.store.store_analysis(job_id, analysis.clone()).await?;
        Ok(analysis)
    }

    /// Analyze many clips sequentially with an inter-item delay
    ///
    /// The delay keeps rate-limited collaborators happy; per-item failures
    /// are recorded in the report and do not abort the batch.
    pub async fn batch_analyze(
        &self,
        paths: &[PathBuf],
        options: &AnalyzeOptions,
        pacing: Duration,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (i, path) in paths.iter().enumerate() {
            if i > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            match self.analyze(path, options).await {
                Ok(analysis) => report.items.push(BatchItemReport {
                    path: path.clone(),
                    analysis: Some(analysis),
                    error: None,
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "batch item failed");
                    report.items.push(BatchItemReport {
                        path: path.clone(),
                        analysis: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        report
    }

    // ------------------------------------------------------------------
    // Edit manifest operations
    // ------------------------------------------------------------------

    /// Begin tracking edits for a clip
    pub async fn start_edit(
        &self,
        job_id: &str,
        source: SourceClip,
        context: Option<ClipContext>,
    ) -> Result<EditManifest> {
        self.store.start(job_id, source, context).await
    }

    /// Create a trim variation
    pub async fn create_trim(
        &self,
        job_id: &str,
        trim_start: f64,
        trim_end: Option<f64>,
        notes: Option<String>,
        precise: bool,
    ) -> Result<Variation> {
        self.store
            .create_trim_variation(job_id, trim_start, trim_end, notes, precise)
            .await
    }

    /// Create a speed variation
    pub async fn create_speed(
        &self,
        job_id: &str,
        speed: f64,
        base_variation: Option<&str>,
        notes: Option<String>,
    ) -> Result<Variation> {
        self.store
            .create_speed_variation(job_id, speed, base_variation, notes)
            .await
    }

    /// Select the approved variation
    pub async fn select(&self, job_id: &str, variation_id: &str) -> Result<EditManifest> {
        self.store.select(job_id, variation_id).await
    }

    /// Submit the job for review
    pub async fn submit_for_review(&self, job_id: &str) -> Result<EditManifest> {
        self.store.submit_for_review(job_id).await
    }

    /// Archive a completed or abandoned job
    pub async fn archive(&self, job_id: &str) -> Result<EditManifest> {
        self.store.archive(job_id).await
    }

    /// Fetch a manifest
    pub async fn get_manifest(&self, job_id: &str) -> Result<EditManifest> {
        self.store.get(job_id).await
    }

    /// List all tracked job ids
    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    // ------------------------------------------------------------------
    // Assembly
    // ------------------------------------------------------------------

    /// Plan a multi-clip assembly timeline
    pub fn plan_assembly(
        &self,
        shots: &[ShotSpec],
        audio_layers: &[AudioLayer],
        video_volume: f64,
    ) -> Result<AssemblyTimeline> {
        self.planner.plan_assembly(shots, audio_layers, video_volume)
    }
}
