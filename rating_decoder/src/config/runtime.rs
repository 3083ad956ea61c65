// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to require a .json extension on program files
    pub require_json_extension: bool,

    /// Whether to log size and timing metrics after loading
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_json_extension: env_bool(env_vars::REQUIRE_JSON_EXTENSION, false),
            enable_performance_logging: env_bool(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to log a debug event per tokenized instruction
    pub log_token_statistics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_bool(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_token_statistics: env_bool(env_vars::LEXICAL_LOG_TOKEN_STATS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderPreferences {
    /// Whether variable tokens are resolved against the lookup context.
    /// When false, decoding runs in the raw-token mode.
    pub resolve_descriptions: bool,

    /// Whether to log each decoded instruction at debug level
    pub log_decode_details: bool,
}

impl Default for DecoderPreferences {
    fn default() -> Self {
        Self {
            resolve_descriptions: env_bool(env_vars::DECODER_RESOLVE_DESCRIPTIONS, true),
            log_decode_details: env_bool(env_vars::DECODER_LOG_DETAILS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkerPreferences {
    /// Whether to log each spliced branch at debug level
    pub log_link_details: bool,

    /// Whether unresolved jump targets are logged as warnings
    pub warn_on_unresolved: bool,
}

impl Default for LinkerPreferences {
    fn default() -> Self {
        Self {
            log_link_details: env_bool(env_vars::LINKER_LOG_DETAILS, false),
            warn_on_unresolved: env_bool(env_vars::LINKER_WARN_ON_UNRESOLVED, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererPreferences {
    /// Whether rendered steps are prefixed with their bold instruction label
    pub include_step_labels: bool,
}

impl Default for RendererPreferences {
    fn default() -> Self {
        Self {
            include_step_labels: env_bool(env_vars::RENDERER_STEP_LABELS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether events are annotated with the algorithm being processed
    pub include_algorithm_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_bool(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_bool(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_algorithm_context: env_bool(env_vars::LOGGING_ALGORITHM_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub decoder: DecoderPreferences,
    pub linker: LinkerPreferences,
    pub renderer: RendererPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_JSON_EXTENSION: &str = "RATING_REQUIRE_JSON_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "RATING_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "RATING_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_TOKEN_STATS: &str = "RATING_LEXICAL_LOG_TOKEN_STATS";

    // Decoder
    pub const DECODER_RESOLVE_DESCRIPTIONS: &str = "RATING_DECODER_RESOLVE_DESCRIPTIONS";
    pub const DECODER_LOG_DETAILS: &str = "RATING_DECODER_LOG_DETAILS";

    // Linker
    pub const LINKER_LOG_DETAILS: &str = "RATING_LINKER_LOG_DETAILS";
    pub const LINKER_WARN_ON_UNRESOLVED: &str = "RATING_LINKER_WARN_ON_UNRESOLVED";

    // Renderer
    pub const RENDERER_STEP_LABELS: &str = "RATING_RENDERER_STEP_LABELS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "RATING_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "RATING_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "RATING_LOGGING_MIN_LEVEL";
    pub const LOGGING_ALGORITHM_CONTEXT: &str = "RATING_LOGGING_ALGORITHM_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_env_bool_falls_back_on_garbage() {
        std::env::set_var("RATING_TEST_FLAG_GARBAGE", "not-a-bool");
        assert!(env_bool("RATING_TEST_FLAG_GARBAGE", true));
        assert!(!env_bool("RATING_TEST_FLAG_UNSET_XYZ", false));
    }

    #[test]
    fn test_runtime_config_serializes() {
        let config = RuntimeConfig::default();
        let json = serde_json::to_string(&config).expect("serialize runtime config");
        assert!(json.contains("resolve_descriptions"));
        assert!(json.contains("include_step_labels"));
    }
}
