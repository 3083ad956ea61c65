//! Operand grouping shared by the arithmetic and function rules
//!
//! Bracket and brace groups become a single operand that keeps its
//! brackets, a `~` marker attaches to the operand that follows it, and pipe
//! delimiters are dropped.

use crate::tokens::{Delimiter, Token};

/// Grouped token: an operand or a standalone operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Operand(String),
    Operator(String),
}

impl Unit {
    pub fn text(&self) -> &str {
        match self {
            Unit::Operand(text) | Unit::Operator(text) => text,
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Unit::Operand(_))
    }
}

/// Detach a trailing rounding token, ignoring trailing pipes.
///
/// Returns the remaining tokens and the rounding code without its `!`;
/// a bare `!` detaches with no code.
pub fn split_rounding(tokens: &[Token]) -> (&[Token], Option<String>) {
    let end = tokens
        .iter()
        .rposition(|t| !t.is_delimiter(Delimiter::Pipe))
        .map_or(0, |i| i + 1);

    match tokens[..end].split_last() {
        Some((last, rest)) if last.is_rounding_marker() => {
            let code = last.text[1..].to_string();
            (rest, (!code.is_empty()).then_some(code))
        }
        _ => (&tokens[..end], None),
    }
}

/// Consume a bracket or brace group starting at `start`, returning its
/// concatenated text and the index after the matching close.
fn take_group(tokens: &[Token], start: usize) -> (String, usize) {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut index = start;

    while index < tokens.len() {
        let token = &tokens[index];
        text.push_str(&token.text);
        index += 1;

        match token.delimiter() {
            Some(d) if d.is_group_open() => depth += 1,
            Some(d) if d.is_group_close() => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }

    (text, index)
}

pub fn group_units(tokens: &[Token]) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut marker: Option<String> = None;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];

        let operand = match token.delimiter() {
            Some(Delimiter::Pipe) => {
                index += 1;
                continue;
            }
            Some(Delimiter::Tilde) => {
                marker.get_or_insert_with(String::new).push('~');
                index += 1;
                continue;
            }
            Some(d) if d.is_group_open() => {
                let (text, next) = take_group(tokens, index);
                index = next;
                Some(text)
            }
            Some(_) => None,
            None => {
                index += 1;
                Some(token.text.clone())
            }
        };

        match operand {
            Some(text) => {
                let prefix = marker.take().unwrap_or_default();
                units.push(Unit::Operand(prefix + &text));
            }
            None => {
                if let Some(prefix) = marker.take() {
                    units.push(Unit::Operand(prefix));
                }
                units.push(Unit::Operator(token.text.clone()));
                index += 1;
            }
        }
    }

    if let Some(prefix) = marker {
        units.push(Unit::Operand(prefix));
    }
    units
}

/// Operand texts only; operators act as argument separators
pub fn operands(units: &[Unit]) -> Vec<String> {
    units
        .iter()
        .filter(|u| u.is_operand())
        .map(|u| u.text().to_string())
        .collect()
}

const INLINE_OPERATORS: [char; 4] = ['*', '/', '-', '%'];

/// Split `A*B` style operands the lexer leaves as a single word
pub fn split_inline_operator(word: &str) -> Option<(String, String, String)> {
    let (index, op) = word
        .char_indices()
        .find(|(i, c)| *i > 0 && INLINE_OPERATORS.contains(c))?;

    let left = word[..index].trim();
    let right = word[index + op.len_utf8()..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left.to_string(), op.to_string(), right.to_string()))
}

/// Text inside one pair of enclosing brackets or braces, if present
pub fn strip_enclosing(text: &str) -> &str {
    let trimmed = text.trim();
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    trimmed
}
