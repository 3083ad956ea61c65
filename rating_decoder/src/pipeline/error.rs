use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Algorithm not found: {id}")]
    AlgorithmNotFound { id: String },

    #[error("Output serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::AlgorithmNotFound { .. } => codes::input::INVALID_PROGRAM_FORMAT,
            PipelineError::Serialization(_) | PipelineError::Pipeline { .. } => {
                codes::system::INTERNAL_ERROR
            }
        }
    }
}
