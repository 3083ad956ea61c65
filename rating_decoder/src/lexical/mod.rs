//! Lexical analysis of raw instruction text
//!
//! Splits an instruction string into delimiter and word tokens. No semantic
//! validation happens here; the only failures are the compile-time size
//! limits on instruction length and token count.

pub mod analyzer;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::Token;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize one instruction with default preferences
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
    LexicalAnalyzer::new().tokenize(text)
}

/// Create a new lexical analyzer with default preferences
pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

/// Create analyzer with custom runtime preferences
pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::with_preferences(preferences)
}
