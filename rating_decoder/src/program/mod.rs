//! Program data model
//!
//! Serde view of a rating program document: the global input dictionary plus
//! one instruction list per algorithm. Legacy short field names (`n`, `t`,
//! `ins`, `ins_tar`, `seq_t`, `seq_f`) are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Type code given to records whose code is not an integer
pub const UNKNOWN_TYPE_CODE: i32 = -1;

/// A scalar that legacy exports write either as a JSON number or a string.
/// Anything else (floats, booleans, objects) is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// Integer value, or `None` when the text does not parse
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Other(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

fn integer_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = FieldValue::deserialize(deserializer)?;
    value
        .as_integer()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, found '{}'", value)))
}

/// Type code as an integer; anything else decodes as an unknown instruction
fn type_code_field<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = FieldValue::deserialize(deserializer)?;
    Ok(value
        .as_integer()
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(UNKNOWN_TYPE_CODE))
}

fn unknown_type_code() -> i32 {
    UNKNOWN_TYPE_CODE
}

/// One instruction record (a numbered step of an algorithm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(alias = "n", deserialize_with = "integer_field")]
    pub step: u32,

    #[serde(alias = "t", default = "unknown_type_code", deserialize_with = "type_code_field")]
    pub type_code: i32,

    #[serde(alias = "ins", default)]
    pub text: String,

    #[serde(alias = "ins_tar", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(alias = "seq_t", default, skip_serializing_if = "Option::is_none")]
    pub next_true: Option<FieldValue>,

    #[serde(alias = "seq_f", default, skip_serializing_if = "Option::is_none")]
    pub next_false: Option<FieldValue>,
}

impl Instruction {
    pub fn new(step: u32, type_code: i32, text: impl Into<String>) -> Self {
        Self {
            step,
            type_code,
            text: text.into(),
            target: None,
            next_true: None,
            next_false: None,
        }
    }

    pub fn with_next(mut self, next_true: Option<i64>, next_false: Option<i64>) -> Self {
        self.next_true = next_true.map(FieldValue::from);
        self.next_false = next_false.map(FieldValue::from);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Copy of this record with the text replaced by one fragment of it
    pub fn with_fragment(&self, fragment: &str) -> Self {
        Self {
            text: fragment.to_string(),
            ..self.clone()
        }
    }

    /// True-successor as an integer; unparseable values count as absent
    pub fn next_true_step(&self) -> Option<i64> {
        self.next_true.as_ref().and_then(FieldValue::as_integer)
    }

    pub fn next_false_step(&self) -> Option<i64> {
        self.next_false.as_ref().and_then(FieldValue::as_integer)
    }
}

/// A variable an algorithm depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<FieldValue>,
}

impl Dependency {
    pub fn new(index: i64, description: impl Into<String>) -> Self {
        Self {
            index: Some(FieldValue::Number(index)),
            custom_id: None,
            description: description.into(),
            category_id: None,
        }
    }

    pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }
}

/// Entry of the program-wide input dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub key: String,
    #[serde(default)]
    pub description: String,
}

impl InputDefinition {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// One rating computation: an instruction list plus its dependency list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(default, alias = "instructions")]
    pub steps: Vec<Instruction>,
}

impl Algorithm {
    pub fn new(id: impl Into<String>, steps: Vec<Instruction>) -> Self {
        Self {
            id: id.into(),
            name: None,
            dependencies: Vec::new(),
            steps,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A whole rating program document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,

    #[serde(default)]
    pub algorithms: Vec<Algorithm>,
}

impl Program {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn find_algorithm(&self, id: &str) -> Option<&Algorithm> {
        self.algorithms.iter().find(|a| a.id == id)
    }

    pub fn instruction_count(&self) -> usize {
        self.algorithms.iter().map(|a| a.steps.len()).sum()
    }
}
