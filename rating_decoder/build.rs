// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    input: InputLimits,
    lexical: LexicalLimits,
    decoder: DecoderLimits,
    linker: LinkerLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct InputLimits {
    max_file_size: u64,
    max_algorithms_per_program: usize,
    max_instructions_per_algorithm: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_instruction_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct DecoderLimits {
    max_split_depth: usize,
    max_fragment_count: usize,
    max_argument_count: usize,
}

#[derive(serde::Deserialize)]
struct LinkerLimits {
    max_link_depth: usize,
    max_expanded_nodes: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_algorithm: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RATING_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RATING_CONFIG_DIR");

    let profile = env::var("RATING_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RATING_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_LINK_DEPTH: usize = 1_024;

    if config.input.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.linker.max_link_depth == 0 || config.linker.max_link_depth > ABSOLUTE_MAX_LINK_DEPTH {
        panic!("LIMITS: max_link_depth must be between 1 and {}", ABSOLUTE_MAX_LINK_DEPTH);
    }

    if config.decoder.max_split_depth == 0 || config.decoder.max_fragment_count == 0 {
        panic!("LIMITS: decoder split limits must be non-zero");
    }

    if config.lexical.max_token_count == 0 || config.lexical.max_instruction_length == 0 {
        panic!("LIMITS: lexical limits must be non-zero");
    }

    if config.logging.max_log_events_per_algorithm > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_algorithm exceeds log_buffer_size");
    }

    if profile == "production" && config.input.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod input {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const MAX_ALGORITHMS_PER_PROGRAM: usize = {};
        pub const MAX_INSTRUCTIONS_PER_ALGORITHM: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_INSTRUCTION_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod decoder {{
        pub const MAX_SPLIT_DEPTH: usize = {};
        pub const MAX_FRAGMENT_COUNT: usize = {};
        pub const MAX_ARGUMENT_COUNT: usize = {};
    }}

    pub mod linker {{
        pub const MAX_LINK_DEPTH: usize = {};
        pub const MAX_EXPANDED_NODES: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_ALGORITHM: usize = {};
    }}
}}
"#,
        profile,
        // Input
        config.input.max_file_size,
        config.input.max_algorithms_per_program,
        config.input.max_instructions_per_algorithm,
        // Lexical
        config.lexical.max_instruction_length,
        config.lexical.max_token_count,
        // Decoder
        config.decoder.max_split_depth,
        config.decoder.max_fragment_count,
        config.decoder.max_argument_count,
        // Linker
        config.linker.max_link_depth,
        config.linker.max_expanded_nodes,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_algorithm,
    );

    fs::write(output_path, constants_code).expect("Failed to write generated constants");
}
