use crate::config::compile_time::{decoder, input, linker};

/// Information about pipeline capabilities and compiled-in limits
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub known_type_codes: usize,
    pub template_count: usize,
    pub max_file_size: u64,
    pub max_split_depth: usize,
    pub max_link_depth: usize,
    pub max_expanded_nodes: usize,
    pub config_source: String,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "Rating Decoder Pipeline:\n\
             - Stages: {} (load, tokenize, decode, link, render)\n\
             - Known Type Codes: {}\n\
             - Render Templates: {}\n\
             - Max File Size: {} MB\n\
             - Max Split Depth: {}\n\
             - Max Link Depth: {}\n\
             - Max Expanded Nodes: {}\n\
             - Limits: {}",
            self.pipeline_stages,
            self.known_type_codes,
            self.template_count,
            self.max_file_size / (1024 * 1024),
            self.max_split_depth,
            self.max_link_depth,
            self.max_expanded_nodes,
            self.config_source
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    let template_count = crate::classifier::table::INSTRUCTIONS
        .iter()
        .filter_map(|def| def.category.template())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    PipelineInfo {
        pipeline_stages: 5,
        known_type_codes: crate::classifier::table::INSTRUCTIONS.len(),
        template_count,
        max_file_size: input::MAX_FILE_SIZE,
        max_split_depth: decoder::MAX_SPLIT_DEPTH,
        max_link_depth: linker::MAX_LINK_DEPTH,
        max_expanded_nodes: linker::MAX_EXPANDED_NODES,
        config_source: crate::config::build_info::source_info(),
    }
}
