//! Token types produced by the instruction lexer
//!
//! An instruction string is split into a flat sequence of [`Token`]s, each a
//! `(kind, text)` pair. Delimiter tokens carry one of the fixed operator
//! spellings recognised by the lexer; everything else is a verbatim word
//! (variable references, literals, numbers).

pub mod token;

pub use token::{Delimiter, Token, TokenKind};
