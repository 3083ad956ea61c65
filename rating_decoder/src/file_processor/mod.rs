//! Program file loading with compile-time limits and global logging integration

mod processor;

use crate::config::runtime::FileProcessorPreferences;
pub use processor::{
    parse_program, FileMetadata, FileProcessor, FileProcessorError, LoadedProgram,
};

/// Load a program file with preferences from the environment
pub fn load_program(file_path: &str) -> Result<LoadedProgram, FileProcessorError> {
    FileProcessor::new().load_program(file_path)
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Compile-time maximum program file size
pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_time::input::MAX_FILE_SIZE;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.json");
        fs::write(&path, r#"{"algorithms": []}"#).unwrap();

        let loaded = load_program(path.to_str().unwrap()).unwrap();
        assert!(loaded.program.algorithms.is_empty());
    }

    #[test]
    fn test_processor_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_json_extension: true,
            enable_performance_logging: false,
        };
        let processor = create_processor_from_preferences(&prefs);
        assert!(processor.require_json_extension);
        assert!(!processor.enable_performance_logging);
        assert_eq!(get_max_file_size(), MAX_FILE_SIZE);
    }
}
