//! Decode failure kinds
//!
//! None of these abort decoding. The decoder embeds them in error leaves and
//! the linker reports the jump-related ones as link issues.

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::variables::VariableError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which compile-time input limit was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputLimit {
    InstructionLength,
    TokenCount,
    SplitDepth,
    FragmentCount,
    ArgumentCount,
}

impl fmt::Display for InputLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InputLimit::InstructionLength => "instruction length",
            InputLimit::TokenCount => "token count",
            InputLimit::SplitDepth => "split depth",
            InputLimit::FragmentCount => "fragment count",
            InputLimit::ArgumentCount => "argument count",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed variable '{token}': {reason}")]
    MalformedVariable { token: String, reason: String },

    #[error("Unexpected token shape for {category}: expected {expected}, found {found}")]
    UnexpectedTokenShape {
        category: String,
        expected: String,
        found: usize,
    },

    #[error("Step {from} jumps to step {target}, which does not exist")]
    UnresolvedJumpTarget { from: u32, target: u32 },

    #[error("Step {from} jumps back to step {target}")]
    CyclicJump { from: u32, target: u32 },

    #[error("Input limit exceeded: {limit} ({detail})")]
    InputLimitExceeded { limit: InputLimit, detail: String },
}

impl DecodeError {
    pub fn shape(category: &str, expected: &str, found: usize) -> Self {
        DecodeError::UnexpectedTokenShape {
            category: category.to_string(),
            expected: expected.to_string(),
            found,
        }
    }

    pub fn limit(limit: InputLimit, detail: impl Into<String>) -> Self {
        DecodeError::InputLimitExceeded {
            limit,
            detail: detail.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            DecodeError::MalformedVariable { .. } => codes::variables::MALFORMED_VARIABLE,
            DecodeError::UnexpectedTokenShape { .. } => codes::decode::UNEXPECTED_TOKEN_SHAPE,
            DecodeError::UnresolvedJumpTarget { .. } => codes::linking::UNRESOLVED_JUMP_TARGET,
            DecodeError::CyclicJump { .. } => codes::linking::CYCLIC_JUMP,
            DecodeError::InputLimitExceeded { limit, .. } => match limit {
                InputLimit::InstructionLength => codes::lexical::INSTRUCTION_TOO_LONG,
                InputLimit::TokenCount => codes::lexical::TOKEN_LIMIT_EXCEEDED,
                InputLimit::SplitDepth | InputLimit::FragmentCount => {
                    codes::decode::SPLIT_LIMIT_EXCEEDED
                }
                InputLimit::ArgumentCount => codes::decode::ARGUMENT_LIMIT_EXCEEDED,
            },
        }
    }
}

impl From<VariableError> for DecodeError {
    fn from(error: VariableError) -> Self {
        match error {
            VariableError::MalformedVariable { token, reason } => {
                DecodeError::MalformedVariable { token, reason }
            }
        }
    }
}

impl From<LexerError> for DecodeError {
    fn from(error: LexerError) -> Self {
        let limit = match error {
            LexerError::InstructionTooLong { .. } => InputLimit::InstructionLength,
            LexerError::TooManyTokens { .. } => InputLimit::TokenCount,
        };
        DecodeError::limit(limit, error.to_string())
    }
}
