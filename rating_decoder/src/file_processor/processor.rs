//! Program file loading with compile-time limits and global logging

use crate::config::compile_time::input::{
    MAX_ALGORITHMS_PER_PROGRAM, MAX_FILE_SIZE, MAX_INSTRUCTIONS_PER_ALGORITHM,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::program::Program;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Program file loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .json, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("Invalid program document: {message}")]
    InvalidProgramFormat { message: String },

    #[error("Program has {count} {what} (max: {max})")]
    ProgramLimitExceeded {
        what: &'static str,
        count: usize,
        max: usize,
    },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::input::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => codes::input::INVALID_EXTENSION,
            FileProcessorError::FileTooLarge { .. } => codes::input::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::input::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => codes::input::PERMISSION_DENIED,
            FileProcessorError::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::input::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::input::INVALID_PATH,
            FileProcessorError::InvalidProgramFormat { .. } => {
                codes::input::INVALID_PROGRAM_FORMAT
            }
            FileProcessorError::ProgramLimitExceeded { .. } => {
                codes::input::PROGRAM_LIMIT_EXCEEDED
            }
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(error: &std::io::Error, path: &Path, action: &str) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::InvalidData => FileProcessorError::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", action, path.display(), error),
            },
        }
    }
}

/// Metadata collected while loading a program file
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub is_json_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// A parsed program together with its source metadata
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    pub program: Program,
    pub metadata: FileMetadata,
    pub load_duration: Duration,
}

/// Program file loader
pub struct FileProcessor {
    pub require_json_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_json_extension: prefs.require_json_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_json_extension_required(mut self, required: bool) -> Self {
        self.require_json_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read, validate and parse a program file
    pub fn load_program(&self, file_path: &str) -> Result<LoadedProgram, FileProcessorError> {
        let start_time = Instant::now();
        log_debug!("Loading program file", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, file_path)?;
        let source = self.read_file(&path, file_path)?;
        let program = parse_program(&source, file_path)?;

        let loaded = LoadedProgram {
            program,
            metadata,
            load_duration: start_time.elapsed(),
        };
        self.log_load_success(&loaded, file_path);
        Ok(loaded)
    }

    fn log_load_success(&self, loaded: &LoadedProgram, file_path: &str) {
        let algorithms = loaded.program.algorithms.len();
        let instructions = loaded.program.instruction_count();

        if self.enable_performance_logging {
            log_success!(codes::success::PROGRAM_FILE_LOADED, "Program file loaded",
                "file" => file_path,
                "size" => loaded.metadata.human_readable_size(),
                "algorithms" => algorithms,
                "instructions" => instructions,
                "duration_ms" => format!("{:.2}", loaded.load_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(codes::success::PROGRAM_FILE_LOADED, "Program file loaded",
                "file" => file_path,
                "algorithms" => algorithms
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.trim().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);
        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "resolve path");
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "io_error" => e
            );
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read metadata for");
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let is_json_file = extension.as_deref() == Some("json");

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            is_json_file,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE
            );
            return Err(error);
        }

        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile;
            log_error!(error.error_code(), "File is empty", "file" => file_path);
            return Err(error);
        }

        if self.require_json_extension && !metadata.is_json_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .json extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }

        Ok(())
    }

    fn read_file(&self, path: &Path, file_path: &str) -> Result<String, FileProcessorError> {
        fs::read_to_string(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read file");
            log_error!(error.error_code(), "Failed to read program file",
                "file" => file_path,
                "io_error" => e
            );
            error
        })
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse program JSON and enforce the compile-time program limits
pub fn parse_program(source: &str, origin: &str) -> Result<Program, FileProcessorError> {
    if source.trim().is_empty() {
        let error = FileProcessorError::EmptyFile;
        log_error!(error.error_code(), "Program document is blank", "origin" => origin);
        return Err(error);
    }

    let program = Program::from_json(source).map_err(|e| {
        let error = FileProcessorError::InvalidProgramFormat {
            message: e.to_string(),
        };
        log_error!(error.error_code(), "Program document could not be parsed",
            "origin" => origin,
            "line" => e.line(),
            "column" => e.column()
        );
        error
    })?;

    check_limit("algorithms", program.algorithms.len(), MAX_ALGORITHMS_PER_PROGRAM, origin)?;
    for algorithm in &program.algorithms {
        check_limit(
            "instructions in one algorithm",
            algorithm.steps.len(),
            MAX_INSTRUCTIONS_PER_ALGORITHM,
            origin,
        )?;
    }

    Ok(program)
}

fn check_limit(
    what: &'static str,
    count: usize,
    max: usize,
    origin: &str,
) -> Result<(), FileProcessorError> {
    if count <= max {
        return Ok(());
    }
    let error = FileProcessorError::ProgramLimitExceeded { what, count, max };
    log_error!(error.error_code(), "Program exceeds compile-time limit",
        "origin" => origin,
        "what" => what,
        "count" => count,
        "max" => max
    );
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const PROGRAM: &str = r#"{
        "inputs": [{"key": "GC_691", "description": "Minimum Age"}],
        "algorithms": [{
            "id": "alg-1",
            "steps": [{"n": 1, "t": 0, "ins": "GI_84+GC_47!RN"}]
        }]
    }"#;

    #[test]
    fn test_load_valid_program() {
        let _ = crate::logging::init_global_logging();
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.json");
        fs::write(&path, PROGRAM).unwrap();

        let loaded = FileProcessor::new()
            .load_program(path.to_str().unwrap())
            .unwrap();
        assert_eq!(loaded.program.algorithms.len(), 1);
        assert!(loaded.metadata.is_json_file);
        assert!(loaded.metadata.size > 0);
    }

    #[test]
    fn test_missing_file() {
        let result = FileProcessor::new().load_program("/definitely/not/here.json");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_empty_path() {
        let result = FileProcessor::new().load_program("  ");
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().load_program(dir.path().to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();

        let result = FileProcessor::new().load_program(path.to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::EmptyFile));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.txt");
        fs::write(&path, PROGRAM).unwrap();

        let lenient = FileProcessor::new().with_json_extension_required(false);
        assert!(lenient.load_program(path.to_str().unwrap()).is_ok());

        let strict = FileProcessor::new().with_json_extension_required(true);
        assert_matches!(
            strict.load_program(path.to_str().unwrap()),
            Err(FileProcessorError::InvalidExtension { extension: Some(ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let result = FileProcessor::new().load_program(path.to_str().unwrap());
        assert_matches!(result, Err(FileProcessorError::InvalidEncoding { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let result = parse_program("{\"algorithms\": [", "inline");
        assert_matches!(result, Err(FileProcessorError::InvalidProgramFormat { .. }));
    }

    #[test]
    fn test_error_codes_are_registered() {
        let error = FileProcessorError::FileNotFound {
            path: "x.json".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert!(error.requires_halt());
        assert!(!error.is_recoverable());

        let error = FileProcessorError::InvalidExtension { extension: None };
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("p.json"),
            size: 2048,
            extension: Some("json".to_string()),
            is_json_file: true,
            modified: None,
        };
        assert_eq!(metadata.human_readable_size(), "2.00 KB");
    }
}
