//! Consolidated error codes and classification system
//!
//! Single source of truth for every code the decoder emits, together with the
//! behavioural metadata (category, severity, recoverability) attached to it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Program file loading error codes
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const INVALID_PROGRAM_FORMAT: Code = Code::new("E013");
    pub const PROGRAM_LIMIT_EXCEEDED: Code = Code::new("E014");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INSTRUCTION_TOO_LONG: Code = Code::new("E020");
    pub const TOKEN_LIMIT_EXCEEDED: Code = Code::new("E021");
}

/// Variable grammar error codes
pub mod variables {
    use super::Code;

    pub const MALFORMED_VARIABLE: Code = Code::new("E030");
}

/// Instruction decoding error codes
pub mod decode {
    use super::Code;

    pub const UNEXPECTED_TOKEN_SHAPE: Code = Code::new("E040");
    pub const SPLIT_LIMIT_EXCEEDED: Code = Code::new("E041");
    pub const ARGUMENT_LIMIT_EXCEEDED: Code = Code::new("E042");
}

/// Control-flow linking codes
pub mod linking {
    use super::Code;

    pub const UNRESOLVED_JUMP_TARGET: Code = Code::new("E050");
    pub const CYCLIC_JUMP: Code = Code::new("E051");
    pub const LINK_DEPTH_EXCEEDED: Code = Code::new("E052");
    pub const EXPANSION_LIMIT_EXCEEDED: Code = Code::new("E053");
}

/// Rendering codes
pub mod rendering {
    use super::Code;

    pub const TEMPLATE_TABLE_INVALID: Code = Code::new("E060");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const PROGRAM_FILE_LOADED: Code = Code::new("I002");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I003");
    pub const ALGORITHM_DECODED: Code = Code::new("I004");
    pub const LINKING_COMPLETE: Code = Code::new("I005");
    pub const RENDERING_COMPLETE: Code = Code::new("I006");
    pub const PROGRAM_PROCESSED: Code = Code::new("I007");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Internal decoder error",
                "Report the instruction text that triggered the failure",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or configuration initialization failed",
                "Check RATING_* environment variables and the build profile",
            ),
            // Program input
            ErrorMetadata::new(
                "E005",
                "Input",
                Severity::High,
                false,
                true,
                "Program file not found",
                "Verify the path to the program JSON file",
            ),
            ErrorMetadata::new(
                "E006",
                "Input",
                Severity::Medium,
                true,
                false,
                "Program file has an unexpected extension",
                "Use a .json program export or disable the extension check",
            ),
            ErrorMetadata::new(
                "E007",
                "Input",
                Severity::High,
                false,
                true,
                "Program file exceeds the configured size limit",
                "Split the program or raise max_file_size in the build profile",
            ),
            ErrorMetadata::new(
                "E008",
                "Input",
                Severity::Medium,
                false,
                true,
                "Program file is empty",
                "Export the program again",
            ),
            ErrorMetadata::new(
                "E009",
                "Input",
                Severity::High,
                false,
                true,
                "Permission denied reading program file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "Input",
                Severity::High,
                false,
                true,
                "Program file is not valid UTF-8",
                "Re-export the program with UTF-8 encoding",
            ),
            ErrorMetadata::new(
                "E011",
                "Input",
                Severity::High,
                false,
                true,
                "I/O error while reading program file",
                "Retry and check the storage device",
            ),
            ErrorMetadata::new(
                "E012",
                "Input",
                Severity::High,
                false,
                true,
                "Invalid program file path",
                "Provide a path to a regular file",
            ),
            ErrorMetadata::new(
                "E013",
                "Input",
                Severity::High,
                false,
                true,
                "Program document does not match the expected JSON layout",
                "Check the algorithms and steps arrays of the export",
            ),
            ErrorMetadata::new(
                "E014",
                "Input",
                Severity::High,
                false,
                true,
                "Program exceeds the configured algorithm or instruction count",
                "Raise the input limits in the build profile",
            ),
            // Lexical
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Instruction text exceeds the maximum length",
                "Inspect the instruction for corrupted text",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Instruction produced more tokens than allowed",
                "Inspect the instruction for corrupted text",
            ),
            // Variables
            ErrorMetadata::new(
                "E030",
                "Variables",
                Severity::Low,
                true,
                false,
                "Variable token does not follow the PREFIX_ID[.SUB] grammar",
                "Check the variable reference in the instruction text",
            ),
            // Decode
            ErrorMetadata::new(
                "E040",
                "Decode",
                Severity::Low,
                true,
                false,
                "Instruction token shape does not match its category",
                "Review the instruction text against its type code",
            ),
            ErrorMetadata::new(
                "E041",
                "Decode",
                Severity::Medium,
                true,
                false,
                "Multi-condition split exceeded the configured limits",
                "Inspect the instruction for runaway joiner characters",
            ),
            ErrorMetadata::new(
                "E042",
                "Decode",
                Severity::Medium,
                true,
                false,
                "Instruction has more arguments than allowed",
                "Inspect the instruction for corrupted text",
            ),
            // Linking
            ErrorMetadata::new(
                "E050",
                "Linking",
                Severity::Low,
                true,
                false,
                "Branch points to a step that is not in the algorithm",
                "Check the next-step fields of the instruction",
            ),
            ErrorMetadata::new(
                "E051",
                "Linking",
                Severity::Low,
                true,
                false,
                "Branch revisits a step already on the current path",
                "Loop constructs are expected; no action required",
            ),
            ErrorMetadata::new(
                "E052",
                "Linking",
                Severity::Medium,
                true,
                false,
                "Branch nesting exceeded the maximum link depth",
                "Raise max_link_depth or review the algorithm structure",
            ),
            ErrorMetadata::new(
                "E053",
                "Linking",
                Severity::Medium,
                true,
                false,
                "Linked tree exceeded the maximum expanded node count",
                "Raise max_expanded_nodes or review shared branch targets",
            ),
            // Rendering
            ErrorMetadata::new(
                "E060",
                "Rendering",
                Severity::High,
                true,
                false,
                "Embedded template table could not be parsed",
                "Fix templates.toml; rendering falls back to descriptions",
            ),
            // Success codes
            ErrorMetadata::new(
                "I001",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "Continue",
            ),
            ErrorMetadata::new(
                "I002",
                "Input",
                Severity::Low,
                true,
                false,
                "Program file loaded",
                "Continue to decoding",
            ),
            ErrorMetadata::new(
                "I003",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Instruction tokenized",
                "Continue to decoding",
            ),
            ErrorMetadata::new(
                "I004",
                "Decode",
                Severity::Low,
                true,
                false,
                "Algorithm decoded",
                "Continue to linking",
            ),
            ErrorMetadata::new(
                "I005",
                "Linking",
                Severity::Low,
                true,
                false,
                "Algorithm control flow linked",
                "Continue to rendering",
            ),
            ErrorMetadata::new(
                "I006",
                "Rendering",
                Severity::Low,
                true,
                false,
                "Algorithm rendered",
                "Continue",
            ),
            ErrorMetadata::new(
                "I007",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Program processed",
                "Continue",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            input::FILE_NOT_FOUND,
            input::INVALID_EXTENSION,
            input::FILE_TOO_LARGE,
            input::EMPTY_FILE,
            input::PERMISSION_DENIED,
            input::INVALID_ENCODING,
            input::IO_ERROR,
            input::INVALID_PATH,
            input::INVALID_PROGRAM_FORMAT,
            input::PROGRAM_LIMIT_EXCEEDED,
            lexical::INSTRUCTION_TOO_LONG,
            lexical::TOKEN_LIMIT_EXCEEDED,
            variables::MALFORMED_VARIABLE,
            decode::UNEXPECTED_TOKEN_SHAPE,
            decode::SPLIT_LIMIT_EXCEEDED,
            decode::ARGUMENT_LIMIT_EXCEEDED,
            linking::UNRESOLVED_JUMP_TARGET,
            linking::CYCLIC_JUMP,
            linking::LINK_DEPTH_EXCEEDED,
            linking::EXPANSION_LIMIT_EXCEEDED,
            rendering::TEMPLATE_TABLE_INVALID,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::PROGRAM_FILE_LOADED,
            success::TOKENIZATION_COMPLETE,
            success::ALGORITHM_DECODED,
            success::LINKING_COMPLETE,
            success::RENDERING_COMPLETE,
            success::PROGRAM_PROCESSED,
        ];

        for code in declared {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_linking_issues_are_recoverable() {
        assert!(is_recoverable(linking::CYCLIC_JUMP.as_str()));
        assert!(!requires_halt(linking::UNRESOLVED_JUMP_TARGET.as_str()));
        assert_eq!(get_category(linking::CYCLIC_JUMP.as_str()), "Linking");
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }
}
