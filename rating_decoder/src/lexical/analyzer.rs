//! Instruction lexer
//!
//! Scans left to right. At each position the rounding markers are tried
//! first (they are the longest delimiters), then the fixed delimiter table
//! in longest-first order; anything else accumulates into a word.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Delimiter, Token, TokenKind};
use crate::{log_debug, log_error};

/// Lexical analysis errors (size limits only)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Instruction too long: {length} bytes (max {MAX_INSTRUCTION_LENGTH})")]
    InstructionTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InstructionTooLong { .. } => codes::lexical::INSTRUCTION_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOKEN_LIMIT_EXCEEDED,
        }
    }
}

/// Running token statistics across every instruction an analyzer has seen
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub instructions: usize,
    pub total_tokens: usize,
    pub operator_tokens: usize,
    pub word_tokens: usize,
    pub rounding_markers: usize,
    pub max_tokens_per_instruction: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if !preferences.collect_detailed_metrics {
            return;
        }
        match token.kind {
            TokenKind::Operator => {
                self.operator_tokens += 1;
                if token.is_delimiter(Delimiter::RoundingMarker) {
                    self.rounding_markers += 1;
                }
            }
            TokenKind::Word => self.word_tokens += 1,
        }
    }

    pub(crate) fn record_instruction(&mut self, token_count: usize) {
        self.instructions += 1;
        self.max_tokens_per_instruction = self.max_tokens_per_instruction.max(token_count);
    }
}

/// Length in bytes of a rounding marker starting at `text` (which begins
/// with `!`), or `None` when only a bare `!` is present.
fn rounding_marker_len(text: &str) -> Option<usize> {
    let body = text.get(1..)?;
    let digits_after = |offset: usize| {
        body[offset..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let body_len = if body.starts_with("RP") || body.starts_with("RM") {
        2 + digits_after(2)
    } else if body.starts_with("RN") || body.starts_with("RS") || body.starts_with("NR") {
        2
    } else if body.starts_with('R') && digits_after(1) > 0 {
        1 + digits_after(1)
    } else {
        return None;
    };

    Some(1 + body_len)
}

/// Match a delimiter at the start of `rest`, returning its byte length
fn match_delimiter(rest: &str) -> Option<usize> {
    if rest.starts_with('!') {
        if let Some(len) = rounding_marker_len(rest) {
            return Some(len);
        }
    }
    Delimiter::FIXED
        .iter()
        .map(|d| d.as_str())
        .find(|spelling| rest.starts_with(spelling))
        .map(str::len)
}

/// Instruction lexer with metrics and runtime preferences
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Tokenize a single instruction string.
    ///
    /// Empty or whitespace-only input yields no tokens. Word tokens are
    /// trimmed of surrounding whitespace and whitespace-only words dropped.
    pub fn tokenize(&mut self, text: &str) -> Result<Vec<Token>, LexerError> {
        if text.len() > MAX_INSTRUCTION_LENGTH {
            let error = LexerError::InstructionTooLong { length: text.len() };
            log_error!(error.error_code(), "Instruction exceeds maximum length",
                "length" => text.len(),
                "max" => MAX_INSTRUCTION_LENGTH
            );
            return Err(error);
        }

        let mut tokens = Vec::new();
        let mut word_start = 0;
        let mut pos = 0;

        while pos < text.len() {
            match match_delimiter(&text[pos..]) {
                Some(len) => {
                    self.push_word(&mut tokens, &text[word_start..pos])?;
                    self.push(&mut tokens, Token::operator(&text[pos..pos + len]))?;
                    pos += len;
                    word_start = pos;
                }
                None => {
                    // Advance by one whole character
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        self.push_word(&mut tokens, &text[word_start..])?;

        self.metrics.record_instruction(tokens.len());
        if self.preferences.log_token_statistics {
            log_debug!("Instruction tokenized",
                "tokens" => tokens.len(),
                "text" => text
            );
        }

        Ok(tokens)
    }

    fn push_word(&mut self, tokens: &mut Vec<Token>, fragment: &str) -> Result<(), LexerError> {
        let trimmed = fragment.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        self.push(tokens, Token::word(trimmed))
    }

    fn push(&mut self, tokens: &mut Vec<Token>, token: Token) -> Result<(), LexerError> {
        if tokens.len() >= MAX_TOKEN_COUNT {
            let error = LexerError::TooManyTokens {
                count: tokens.len() + 1,
            };
            log_error!(error.error_code(), "Instruction produced too many tokens",
                "max" => MAX_TOKEN_COUNT
            );
            return Err(error);
        }
        self.metrics.record_token(&token, &self.preferences);
        tokens.push(token);
        Ok(())
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let mut analyzer = LexicalAnalyzer::new();
        assert!(analyzer.tokenize("").unwrap().is_empty());
        assert!(analyzer.tokenize("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_conditional_text() {
        let tokens = crate::lexical::tokenize("|~GR_5369|=|[Y]|").unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["|", "~", "GR_5369", "|", "=", "|", "[", "Y", "]", "|"]
        );
        assert!(tokens[2].is_word());
        assert!(tokens[4].is_operator());
    }

    #[test]
    fn test_rounding_markers_are_single_tokens() {
        for (text, marker) in [
            ("GI_84+GC_47!RN", "!RN"),
            ("GI_84+GC_47!RS", "!RS"),
            ("GI_84+GC_47!R2", "!R2"),
            ("GI_84+GC_47!RP2", "!RP2"),
            ("GI_84+GC_47!RM1", "!RM1"),
            ("GI_84+GC_47!NR", "!NR"),
        ] {
            let tokens = crate::lexical::tokenize(text).unwrap();
            assert_eq!(tokens.len(), 4, "{}", text);
            assert_eq!(tokens[3].text, marker);
            assert!(tokens[3].is_rounding_marker());
        }
    }

    #[test]
    fn test_bare_bang_is_its_own_token() {
        let tokens = crate::lexical::tokenize("!X").unwrap();
        assert_eq!(texts(&tokens), vec!["!", "X"]);
    }

    #[test]
    fn test_longest_match_for_comparisons() {
        let tokens = crate::lexical::tokenize("A>=B<=C<>D").unwrap();
        assert_eq!(texts(&tokens), vec!["A", ">=", "B", "<=", "C", "<", ">", "D"]);
    }

    #[test]
    fn test_words_are_trimmed_not_split() {
        let tokens = crate::lexical::tokenize("GI_573| 0 |{0}").unwrap();
        assert_eq!(texts(&tokens), vec!["GI_573", "|", "0", "|", "{", "0", "}"]);

        let tokens = crate::lexical::tokenize("[John Smith]").unwrap();
        assert_eq!(texts(&tokens), vec!["[", "John Smith", "]"]);
    }

    #[test]
    fn test_multibyte_text_survives() {
        let tokens = crate::lexical::tokenize("[Café]+[Ünïcode]").unwrap();
        assert_eq!(texts(&tokens), vec!["[", "Café", "]", "+", "[", "Ünïcode", "]"]);
    }

    #[test]
    fn test_metrics_accumulate() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("GI_84+GC_47!RN").unwrap();
        analyzer.tokenize("|A|=|B|").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.instructions, 2);
        assert_eq!(metrics.total_tokens, 4 + 7);
        assert_eq!(metrics.rounding_markers, 1);
        assert_eq!(metrics.max_tokens_per_instruction, 7);
    }

    #[test]
    fn test_instruction_length_limit() {
        let text = "A".repeat(MAX_INSTRUCTION_LENGTH + 1);
        assert_matches!(
            crate::lexical::tokenize(&text),
            Err(LexerError::InstructionTooLong { .. })
        );
    }

    #[test]
    fn test_token_count_limit() {
        let text = "|".repeat((MAX_TOKEN_COUNT + 1).min(MAX_INSTRUCTION_LENGTH));
        if text.len() > MAX_TOKEN_COUNT {
            assert_matches!(
                crate::lexical::tokenize(&text),
                Err(LexerError::TooManyTokens { .. })
            );
        }
    }
}
