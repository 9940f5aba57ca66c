//! Decision services: reconciliation, analysis, editing, assembly

pub mod assembly_planner;
pub mod batch;
pub mod manifest_store;
pub mod timeline_reconciler;
pub mod unified_analyzer;

pub use assembly_planner::AssemblyPlanner;
pub use batch::{BatchItemReport, BatchReport};
pub use manifest_store::EditManifestStore;
pub use timeline_reconciler::reconcile;
pub use unified_analyzer::UnifiedAnalyzer;
