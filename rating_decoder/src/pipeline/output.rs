use super::result::AlgorithmResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Totals across every algorithm in a report
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputSummary {
    pub algorithms: usize,
    pub instructions: usize,
    pub error_leaves: usize,
    pub link_issues: usize,
}

/// Serializable decode report for a whole program
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub summary: OutputSummary,
    pub algorithms: Vec<AlgorithmResult>,
}

impl PipelineOutput {
    pub fn new(algorithms: Vec<AlgorithmResult>) -> Self {
        let summary = OutputSummary {
            algorithms: algorithms.len(),
            instructions: algorithms.iter().map(|a| a.decode_stats.instructions).sum(),
            error_leaves: algorithms.iter().map(|a| a.decode_stats.error_leaves).sum(),
            link_issues: algorithms.iter().map(|a| a.link_report.issues.len()).sum(),
        };

        Self {
            generated_at: Utc::now(),
            source: None,
            summary,
            algorithms,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
