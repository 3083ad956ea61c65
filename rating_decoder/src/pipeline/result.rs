use crate::ast::Node;
use crate::decoder::DecodeStats;
use crate::linker::LinkReport;
use serde::Serialize;
use std::time::Duration;

/// Decoded, linked and rendered form of one algorithm
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmResult {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One sentence per top-level node
    pub sentences: Vec<String>,
    pub nodes: Vec<Node>,
    pub link_report: LinkReport,
    pub decode_stats: DecodeStats,
    #[serde(skip)]
    pub processing_duration: Duration,
}

impl AlgorithmResult {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Error leaves across the linked tree, spliced copies included
    pub fn error_leaf_count(&self) -> usize {
        self.nodes.iter().map(|node| node.error_leaves().len()).sum()
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::RENDERING_COMPLETE,
            "Algorithm decoded and rendered",
            "algorithm" => &self.id,
            "sentences" => self.sentences.len(),
            "error_leaves" => self.decode_stats.error_leaves,
            "link_issues" => self.link_report.issues.len(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
