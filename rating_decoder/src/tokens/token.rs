use serde::{Deserialize, Serialize};
use std::fmt;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// One of the fixed delimiter spellings
    Operator,
    /// Any other run of text
    Word,
}

/// Fixed delimiter spellings recognised by the lexer.
///
/// Rounding markers (`!RN`, `!RP2`, ...) share a single variant; their exact
/// spelling stays in the token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    Pipe,
    Caret,
    Plus,
    GreaterOrEqual,
    LessOrEqual,
    Equals,
    Greater,
    Less,
    RoundingMarker,
    Bang,
    Tilde,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
}

impl Delimiter {
    /// Single-spelling delimiters, longest first so that a prefix scan
    /// performs longest-match.
    pub const FIXED: [Delimiter; 14] = [
        Delimiter::GreaterOrEqual,
        Delimiter::LessOrEqual,
        Delimiter::Pipe,
        Delimiter::Caret,
        Delimiter::Plus,
        Delimiter::Equals,
        Delimiter::Greater,
        Delimiter::Less,
        Delimiter::Bang,
        Delimiter::Tilde,
        Delimiter::OpenBrace,
        Delimiter::CloseBrace,
        Delimiter::OpenBracket,
        Delimiter::CloseBracket,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Pipe => "|",
            Delimiter::Caret => "^",
            Delimiter::Plus => "+",
            Delimiter::GreaterOrEqual => ">=",
            Delimiter::LessOrEqual => "<=",
            Delimiter::Equals => "=",
            Delimiter::Greater => ">",
            Delimiter::Less => "<",
            Delimiter::RoundingMarker => "!R",
            Delimiter::Bang => "!",
            Delimiter::Tilde => "~",
            Delimiter::OpenBrace => "{",
            Delimiter::CloseBrace => "}",
            Delimiter::OpenBracket => "[",
            Delimiter::CloseBracket => "]",
        }
    }

    /// Classify operator token text
    pub fn from_text(text: &str) -> Option<Self> {
        if text.len() > 1 && text.starts_with('!') {
            return Some(Delimiter::RoundingMarker);
        }
        Self::FIXED.iter().copied().find(|d| d.as_str() == text)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Delimiter::GreaterOrEqual
                | Delimiter::LessOrEqual
                | Delimiter::Equals
                | Delimiter::Greater
                | Delimiter::Less
        )
    }

    pub fn is_group_open(&self) -> bool {
        matches!(self, Delimiter::OpenBrace | Delimiter::OpenBracket)
    }

    pub fn is_group_close(&self) -> bool {
        matches!(self, Delimiter::CloseBrace | Delimiter::CloseBracket)
    }
}

/// A single lexical unit of an instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn operator(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Operator,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Word,
            text: text.into(),
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    pub fn delimiter(&self) -> Option<Delimiter> {
        if self.is_operator() {
            Delimiter::from_text(&self.text)
        } else {
            None
        }
    }

    pub fn is_delimiter(&self, delimiter: Delimiter) -> bool {
        self.delimiter() == Some(delimiter)
    }

    /// True for any operator token starting with the rounding-marker
    /// character, including a bare `!`.
    pub fn is_rounding_marker(&self) -> bool {
        self.is_operator() && self.text.starts_with('!')
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
