mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::{OutputSummary, PipelineOutput};
pub use result::AlgorithmResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::decoder::Decoder;
use crate::linker::{Linker, StepTable};
use crate::logging::{self, codes};
use crate::program::{Algorithm, InputDefinition, Program};
use crate::renderer::Renderer;
use crate::variables::LookupContext;
use std::time::Instant;

/// Decode, link and render one algorithm with preferences from the environment
pub fn decode_algorithm(
    algorithm: &Algorithm,
    inputs: Option<&[InputDefinition]>,
) -> AlgorithmResult {
    decode_algorithm_with(algorithm, inputs, &RuntimeConfig::default())
}

/// Decode, link and render one algorithm (tokenize -> decode -> link -> render)
pub fn decode_algorithm_with(
    algorithm: &Algorithm,
    inputs: Option<&[InputDefinition]>,
    config: &RuntimeConfig,
) -> AlgorithmResult {
    let start_time = Instant::now();

    logging::with_algorithm_context(&algorithm.id, || {
        crate::log_info!("Decoding algorithm",
            "algorithm" => &algorithm.id,
            "steps" => algorithm.steps.len()
        );

        let context = LookupContext::new(Some(algorithm.dependencies.as_slice()), inputs);
        let mut decoder = Decoder::with_preferences(config.decoder.clone())
            .with_lexical_preferences(config.lexical.clone());

        let mut table = StepTable::new();
        for instruction in &algorithm.steps {
            let nodes = decoder.decode_instruction(instruction, Some(&context));
            table.insert(instruction.step, nodes);
        }

        let decode_stats = decoder.stats().clone();
        crate::log_success!(codes::success::ALGORITHM_DECODED, "Algorithm decoded",
            "algorithm" => &algorithm.id,
            "instructions" => decode_stats.instructions,
            "error_leaves" => decode_stats.error_leaves,
            "unclassified" => decode_stats.unclassified
        );

        let linked = Linker::with_preferences(config.linker.clone()).link(&table);
        let sentences = Renderer::with_preferences(config.renderer.clone()).render_all(&linked.nodes);

        let result = AlgorithmResult {
            id: algorithm.id.clone(),
            name: algorithm.name.clone(),
            sentences,
            nodes: linked.nodes,
            link_report: linked.report,
            decode_stats,
            processing_duration: start_time.elapsed(),
        };
        result.log_success();
        result
    })
}

/// Decode every algorithm of a program
pub fn process_program(program: &Program) -> PipelineOutput {
    process_program_with(program, &RuntimeConfig::default())
}

pub fn process_program_with(program: &Program, config: &RuntimeConfig) -> PipelineOutput {
    let start_time = Instant::now();
    let inputs = Some(program.inputs.as_slice());

    let algorithms: Vec<AlgorithmResult> = program
        .algorithms
        .iter()
        .map(|algorithm| decode_algorithm_with(algorithm, inputs, config))
        .collect();

    let output = PipelineOutput::new(algorithms);
    crate::log_success!(codes::success::PROGRAM_PROCESSED, "Program processed",
        "algorithms" => output.summary.algorithms,
        "instructions" => output.summary.instructions,
        "error_leaves" => output.summary.error_leaves,
        "link_issues" => output.summary.link_issues,
        "duration_ms" => format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0)
    );
    output
}

/// Load a program file and decode every algorithm in it
pub fn process_file(file_path: &str) -> Result<PipelineOutput, PipelineError> {
    process_file_with(file_path, &RuntimeConfig::default())
}

pub fn process_file_with(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineOutput, PipelineError> {
    crate::log_info!("Starting program decode pipeline", "file" => file_path);

    let loaded = crate::file_processor::create_processor_from_preferences(&config.file_processor)
        .load_program(file_path)?;

    Ok(process_program_with(&loaded.program, config).with_source(file_path))
}

/// Decode a single algorithm of a program file by id
pub fn process_algorithm_in_file(
    file_path: &str,
    algorithm_id: &str,
    config: &RuntimeConfig,
) -> Result<PipelineOutput, PipelineError> {
    let loaded = crate::file_processor::create_processor_from_preferences(&config.file_processor)
        .load_program(file_path)?;

    let algorithm = loaded
        .program
        .find_algorithm(algorithm_id)
        .ok_or_else(|| PipelineError::AlgorithmNotFound {
            id: algorithm_id.to_string(),
        })?;

    let result = decode_algorithm_with(algorithm, Some(loaded.program.inputs.as_slice()), config);
    Ok(PipelineOutput::new(vec![result]).with_source(file_path))
}
