use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage class of a variable, taken from the two-letter token prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariablePrefix {
    StepResult,
    ProgramLookup,
    GlobalLookup,
    GlobalInput,
    GlobalResult,
    ProgramResult,
    ProgramCalculated,
    GlobalCalculated,
    ProgramPolicy,
    GlobalPolicy,
    InstructionGroup,
    SystemVariable,
    SystemVariableAlias,
    LocalDataSource,
    GlobalDataSource,
}

impl VariablePrefix {
    pub const ALL: [VariablePrefix; 15] = [
        VariablePrefix::StepResult,
        VariablePrefix::ProgramLookup,
        VariablePrefix::GlobalLookup,
        VariablePrefix::GlobalInput,
        VariablePrefix::GlobalResult,
        VariablePrefix::ProgramResult,
        VariablePrefix::ProgramCalculated,
        VariablePrefix::GlobalCalculated,
        VariablePrefix::ProgramPolicy,
        VariablePrefix::GlobalPolicy,
        VariablePrefix::InstructionGroup,
        VariablePrefix::SystemVariable,
        VariablePrefix::SystemVariableAlias,
        VariablePrefix::LocalDataSource,
        VariablePrefix::GlobalDataSource,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == code)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StepResult => "LS",
            Self::ProgramLookup => "PL",
            Self::GlobalLookup => "GL",
            Self::GlobalInput => "GI",
            Self::GlobalResult => "GR",
            Self::ProgramResult => "PR",
            Self::ProgramCalculated => "PC",
            Self::GlobalCalculated => "GC",
            Self::ProgramPolicy => "PP",
            Self::GlobalPolicy => "GP",
            Self::InstructionGroup => "IG",
            Self::SystemVariable => "LX",
            Self::SystemVariableAlias => "IX",
            Self::LocalDataSource => "PQ",
            Self::GlobalDataSource => "GQ",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::StepResult => "Results of Step",
            Self::ProgramLookup => "Program Lookup Variables",
            Self::GlobalLookup => "Global Lookup Variables",
            Self::GlobalInput => "Global Input Variables",
            Self::GlobalResult | Self::ProgramResult => "Global Result Variables",
            Self::ProgramCalculated => "Program Calculated Variables",
            Self::GlobalCalculated => "Global Calculated Variables",
            Self::ProgramPolicy => "Program Policy Variables",
            Self::GlobalPolicy => "Global Policy Variables",
            Self::InstructionGroup => "Instruction Groups",
            Self::SystemVariable | Self::SystemVariableAlias => "System Variables",
            Self::LocalDataSource => "Local Data Source Variables",
            Self::GlobalDataSource => "Global Data Source Variables",
        }
    }
}

impl fmt::Display for VariablePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading marker character on a variable token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableMarker {
    /// `~`
    Negation,
    /// `D`
    Delta,
}

impl VariableMarker {
    pub const fn as_char(&self) -> char {
        match self {
            Self::Negation => '~',
            Self::Delta => 'D',
        }
    }
}

/// Parsed variable token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableRef {
    pub marker: Option<VariableMarker>,
    pub prefix: VariablePrefix,
    pub id: u64,
    pub sub_id: Option<u64>,
}

impl VariableRef {
    /// Token text without the marker, e.g. `GI_84.2`
    pub fn key(&self) -> String {
        match self.sub_id {
            Some(sub) => format!("{}_{}.{}", self.prefix, self.id, sub),
            None => format!("{}_{}", self.prefix, self.id),
        }
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(marker) = self.marker {
            write!(f, "{}", marker.as_char())?;
        }
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("Malformed variable '{token}': {reason}")]
    MalformedVariable { token: String, reason: String },
}

impl VariableError {
    fn malformed(token: &str, reason: &str) -> Self {
        VariableError::MalformedVariable {
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        codes::variables::MALFORMED_VARIABLE
    }

    pub fn token(&self) -> &str {
        match self {
            VariableError::MalformedVariable { token, .. } => token,
        }
    }
}

// `D` is only a marker when a full `XX_` body follows it
fn split_marker(token: &str) -> (Option<VariableMarker>, &str) {
    if let Some(body) = token.strip_prefix('~') {
        return (Some(VariableMarker::Negation), body);
    }
    if let Some(body) = token.strip_prefix('D') {
        let bytes = body.as_bytes();
        if bytes.len() >= 3
            && bytes[0].is_ascii_uppercase()
            && bytes[1].is_ascii_uppercase()
            && bytes[2] == b'_'
        {
            return (Some(VariableMarker::Delta), body);
        }
    }
    (None, token)
}

fn parse_number(token: &str, digits: &str, what: &str) -> Result<u64, VariableError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VariableError::malformed(
            token,
            &format!("{} '{}' is not numeric", what, digits),
        ));
    }
    digits
        .parse()
        .map_err(|_| VariableError::malformed(token, &format!("{} '{}' is out of range", what, digits)))
}

/// Parse a variable token into prefix, id and optional sub-id.
///
/// One leading `~` (negation) or `D` (delta) marker is stripped first.
pub fn parse_variable(token: &str) -> Result<VariableRef, VariableError> {
    let (marker, body) = split_marker(token);

    if !body.contains('_') {
        return Err(VariableError::malformed(token, "missing underscore"));
    }
    if body.len() < 3 {
        return Err(VariableError::malformed(token, "too short"));
    }
    if body.as_bytes()[2] != b'_' {
        return Err(VariableError::malformed(
            token,
            "prefix must be two characters followed by an underscore",
        ));
    }

    let code = &body[..2];
    let prefix = VariablePrefix::from_code(code)
        .ok_or_else(|| VariableError::malformed(token, &format!("unknown prefix '{}'", code)))?;

    let rest = &body[3..];
    let (id_text, sub_text) = match rest.split_once('.') {
        Some((id, sub)) => (id, Some(sub)),
        None => (rest, None),
    };

    let id = parse_number(token, id_text, "id")?;
    let sub_id = sub_text
        .map(|sub| parse_number(token, sub, "sub-id"))
        .transpose()?;

    Ok(VariableRef {
        marker,
        prefix,
        id,
        sub_id,
    })
}

pub fn is_variable_token(token: &str) -> bool {
    parse_variable(token).is_ok()
}

/// True when a token starts like a variable (known prefix and underscore),
/// whether or not the rest of it parses.
pub fn looks_like_variable(token: &str) -> bool {
    let (_, body) = split_marker(token);
    body.len() >= 3
        && body.as_bytes()[2] == b'_'
        && VariablePrefix::from_code(&body[..2]).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_plain_variable() {
        let var = parse_variable("GI_84").unwrap();
        assert_eq!(var.prefix, VariablePrefix::GlobalInput);
        assert_eq!(var.id, 84);
        assert_eq!(var.sub_id, None);
        assert_eq!(var.marker, None);
    }

    #[test]
    fn test_sub_id() {
        let var = parse_variable("PC_456.2").unwrap();
        assert_eq!(var.prefix, VariablePrefix::ProgramCalculated);
        assert_eq!((var.id, var.sub_id), (456, Some(2)));
        assert_eq!(var.key(), "PC_456.2");
    }

    #[test]
    fn test_markers() {
        let negated = parse_variable("~GI_573").unwrap();
        assert_eq!(negated.marker, Some(VariableMarker::Negation));
        assert_eq!(negated.to_string(), "~GI_573");

        let delta = parse_variable("DGR_4740").unwrap();
        assert_eq!(delta.marker, Some(VariableMarker::Delta));
        assert_eq!(delta.prefix, VariablePrefix::GlobalResult);
        assert_eq!(delta.id, 4740);
    }

    #[test]
    fn test_every_prefix_round_trips() {
        for prefix in VariablePrefix::ALL {
            let token = format!("{}_12.3", prefix.as_str());
            let var = parse_variable(&token).unwrap();
            assert_eq!(var.prefix, prefix);
            assert_eq!(var.to_string(), token);
        }
    }

    #[test]
    fn test_malformed_tokens() {
        for token in [
            "GI84", "G_", "GI_", "GI_abc", "GI_12.x", "GI_12.", "GIX_12", "ZZ_5", "~", "", "D",
        ] {
            assert_matches!(
                parse_variable(token),
                Err(VariableError::MalformedVariable { .. }),
                "{}",
                token
            );
        }
    }

    #[test]
    fn test_error_carries_token() {
        let error = parse_variable("~GI_x1").unwrap_err();
        assert_eq!(error.token(), "~GI_x1");
        assert_eq!(error.error_code().as_str(), "E030");
    }

    #[test]
    fn test_looks_like_variable() {
        assert!(looks_like_variable("GI_abc"));
        assert!(looks_like_variable("~PC_1.x"));
        assert!(!looks_like_variable("Date_Of_Birth"));
        assert!(!looks_like_variable("[Y]"));
    }

    #[test]
    fn test_literals_are_not_variables() {
        assert!(!is_variable_token("Y"));
        assert!(!is_variable_token("100"));
        assert!(!is_variable_token("Date_Of_Birth"));
        assert!(is_variable_token("GQ_9"));
    }
}
