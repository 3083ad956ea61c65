// Internal modules
pub mod ast;
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod file_processor;
pub mod lexical;
pub mod linker;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod program;
pub mod renderer;
pub mod tokens;
pub mod variables;

// Re-export key types for library consumers
pub use ast::Node;
pub use decoder::{decode, DecodeError};
pub use linker::{link, LinkedAlgorithm, StepTable};
pub use pipeline::{decode_algorithm, process_file, process_program, PipelineError};
pub use program::{Algorithm, Instruction, Program};
pub use renderer::{render, render_step};

pub use pipeline::output::PipelineOutput;
