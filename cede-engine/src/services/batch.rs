//! Batch analysis reporting
//!
//! Batch runs process clips sequentially with an explicit inter-item delay
//! (rate-limited collaborators). Per-item failures are collected in the
//! report rather than aborting the batch.

use std::path::PathBuf;

use crate::models::ClipAnalysis;

/// Outcome of one batch item
#[derive(Debug, Clone)]
pub struct BatchItemReport {
    /// Clip path this item analyzed
    pub path: PathBuf,
    /// The analysis, when the item succeeded
    pub analysis: Option<ClipAnalysis>,
    /// Error message, when the item failed
    pub error: Option<String>,
}

impl BatchItemReport {
    pub fn succeeded(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Outcome of a whole batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-item outcomes, in input order
    pub items: Vec<BatchItemReport>,
}

impl BatchReport {
    /// Number of items that produced an analysis
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.succeeded()).count()
    }

    /// Number of items that failed
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            items: vec![
                BatchItemReport {
                    path: PathBuf::from("/clips/a.mp4"),
                    analysis: None,
                    error: Some("probe failed".into()),
                },
                BatchItemReport {
                    path: PathBuf::from("/clips/b.mp4"),
                    analysis: None,
                    error: Some("probe failed".into()),
                },
            ],
        };
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 2);
    }
}
