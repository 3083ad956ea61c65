//! Configuration for the rating decoder
//!
//! Compile-time limits are generated by `build.rs` from the workspace TOML
//! profile; runtime preferences come from `RATING_*` environment variables.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("RATING_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RATING_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_usable() {
        assert!(compile_time::lexical::MAX_TOKEN_COUNT > 0);
        assert!(compile_time::linker::MAX_LINK_DEPTH > 0);
        assert!(compile_time::decoder::MAX_FRAGMENT_COUNT > 0);
        assert!(
            compile_time::logging::MAX_LOG_EVENTS_PER_ALGORITHM
                <= compile_time::logging::LOG_BUFFER_SIZE
        );
    }

    #[test]
    fn test_build_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
