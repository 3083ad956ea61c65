//! Global logging module for the rating decoder
//!
//! Provides a process-wide logging service, an algorithm-scoped context that
//! annotates events while one algorithm is being processed, and the macro
//! support functions behind `log_error!`, `log_success!` and friends.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Identifies the algorithm whose events are currently being logged
#[derive(Debug, Clone)]
pub struct AlgorithmContext {
    pub algorithm_id: String,
    pub events_logged: usize,
}

thread_local! {
    static ALGORITHM_CONTEXT: RefCell<Option<AlgorithmContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    if let Err(e) = config::validate_config() {
        let reason = format!("Configuration validation failed: {}", e);
        // No configured service exists yet, so the failure goes straight to stderr
        ConsoleLogger::new(LogLevel::Error).log(&initialization_failure(&reason));
        return Err(reason);
    }

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

fn initialization_failure(reason: &str) -> LogEvent {
    LogEvent::error(codes::system::INITIALIZATION_FAILURE, reason)
        .with_context("component", "logging")
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// ALGORITHM CONTEXT MANAGEMENT
// ============================================================================

pub fn set_algorithm_context(algorithm_id: &str) {
    ALGORITHM_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(AlgorithmContext {
            algorithm_id: algorithm_id.to_string(),
            events_logged: 0,
        });
    });
}

pub fn clear_algorithm_context() {
    ALGORITHM_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with algorithm context
pub fn with_algorithm_context<F, R>(algorithm_id: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_algorithm_context();
    set_algorithm_context(algorithm_id);
    let result = f();
    ALGORITHM_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_algorithm_context() -> Option<AlgorithmContext> {
    ALGORITHM_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Annotate an event with the algorithm context and hand it to the global logger.
///
/// Each algorithm may emit at most `MAX_LOG_EVENTS_PER_ALGORITHM` events; one
/// warning marks the cut-off and later events are dropped.
pub fn dispatch_event(event: LogEvent) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }

    let mut event = event;
    let mut over_limit = false;
    let mut announce_limit = false;

    if config::include_algorithm_context() {
        ALGORITHM_CONTEXT.with(|ctx| {
            if let Some(context) = ctx.borrow_mut().as_mut() {
                let limit = config::get_max_log_events_per_algorithm();
                context.events_logged += 1;
                if context.events_logged > limit {
                    over_limit = true;
                    announce_limit = context.events_logged == limit + 1;
                }
                event = event
                    .clone()
                    .with_context("algorithm", &context.algorithm_id);
            }
        });
    }

    if announce_limit {
        logger.log_event(LogEvent::warning(&format!(
            "Too many events for algorithm (limit: {})",
            config::get_max_log_events_per_algorithm()
        )));
    }
    if !over_limit {
        logger.log_event(event);
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::error(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

/// Safe error logging; falls back to stderr when logging is uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()));
    }
    if let Some(context) = get_current_algorithm_context() {
        diagnostics.push_str(&format!("Current algorithm: {}\n", context.algorithm_id));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_logging_initialization() {
        let _ = init_global_logging();
        assert!(is_initialized());
        assert!(init_global_logging().is_err());
    }

    #[test]
    fn test_initialization_failure_event() {
        let _ = init_global_logging();
        let event = initialization_failure("Configuration validation failed: bad level");
        assert!(event.is_error());
        assert_eq!(event.code, codes::system::INITIALIZATION_FAILURE);
        assert_eq!(event.context.get("component").map(String::as_str), Some("logging"));
        assert!(codes::get_error_metadata(event.code.as_str()).is_some());
    }

    #[test]
    fn test_algorithm_context_nesting() {
        assert!(get_current_algorithm_context().is_none());

        let inner_id = with_algorithm_context("outer", || {
            with_algorithm_context("inner", || {
                get_current_algorithm_context().map(|c| c.algorithm_id)
            })
        });

        assert_eq!(inner_id.as_deref(), Some("inner"));
        assert!(get_current_algorithm_context().is_none());
    }

    #[test]
    fn test_set_and_clear_context() {
        set_algorithm_context("alg-9");
        assert_eq!(
            get_current_algorithm_context().map(|c| c.algorithm_id),
            Some("alg-9".to_string())
        );
        clear_algorithm_context();
        assert!(get_current_algorithm_context().is_none());
    }

    #[test]
    fn test_safe_logging_and_diagnostics() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
    }
}
