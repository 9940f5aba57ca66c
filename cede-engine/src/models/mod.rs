//! Data model for the clip edit decision engine

pub mod analysis;
pub mod assembly;
pub mod manifest;
pub mod probe;

pub use analysis::{
    AnalysisContext, Anomaly, AnomalyKind, AnomalySeverity, ClipAnalysis, Confidence,
    SilenceInterval, SpeechSegment, TrimRecommendation, VisualEvent, VisualEventKind,
};
pub use assembly::{
    AssemblyTimeline, AudioLayer, AudioLayerKind, PlacedShot, ShotSpec, TransitionDecision,
    TransitionKind,
};
pub use manifest::{ClipContext, EditManifest, EditOps, EditStatus, SourceClip, Variation};
pub use probe::{ProbeInfo, Transcription, WordTiming};
