//! Instruction classifier
//!
//! Maps a numeric type code to its display name, semantic category and
//! render-template identifier. The code table lives in [`table`]; the
//! category decides which decoding rule applies.

pub mod table;

use crate::ast::TypeCheckKind;
use serde::Serialize;
use table::INSTRUCTIONS;

/// Render-template identifiers
pub mod templates {
    pub const ARITHMETIC: &str = "ARITHMETIC";
    pub const IF_COMPARE: &str = "IF_COMPARE";
    pub const IF_DATE_COMPARE: &str = "IF_DATE_COMPARE";
    pub const MULTI_IF: &str = "MULTI_IF";
    pub const DATE_DIFF: &str = "DATE_DIFF";
    pub const DATE_ADD: &str = "DATE_ADD";
    pub const STRING_CONCAT: &str = "STRING_CONCAT";
    pub const MATH_FUNC: &str = "MATH_FUNC";
    pub const ACTION: &str = "ACTION";
    pub const DATA_SOURCE: &str = "DATA_SOURCE";
    pub const CALL: &str = "CALL";
    pub const TYPE_CHECK: &str = "TYPE_CHECK";
    pub const SORT: &str = "SORT";
    pub const MASK: &str = "MASK";
    pub const ASSIGN: &str = "ASSIGN";
}

/// Quantifier of the "if all / any / none" condition family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quantifier {
    All,
    Any,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateUnit {
    Days,
    Months,
    Years,
}

impl DateUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DateUnit::Days => "Days",
            DateUnit::Months => "Months",
            DateUnit::Years => "Years",
        }
    }
}

/// Semantic category of an instruction type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InstructionCategory {
    Arithmetic,
    Conditional,
    DateConditional,
    QuantifiedConditional(Quantifier),
    DateDifference(DateUnit),
    DateAddition,
    StringConcatenation,
    MathFunction,
    DataSource,
    Call,
    RankingFlagging,
    TypeCheck(TypeCheckKind),
    Sort,
    Mask,
    NoOp,
    Assignment,
    Unclassified,
}

impl InstructionCategory {
    pub const fn template(&self) -> Option<&'static str> {
        match self {
            Self::Arithmetic => Some(templates::ARITHMETIC),
            Self::Conditional => Some(templates::IF_COMPARE),
            Self::DateConditional => Some(templates::IF_DATE_COMPARE),
            Self::QuantifiedConditional(_) => Some(templates::MULTI_IF),
            Self::DateDifference(_) => Some(templates::DATE_DIFF),
            Self::DateAddition => Some(templates::DATE_ADD),
            Self::StringConcatenation => Some(templates::STRING_CONCAT),
            Self::MathFunction => Some(templates::MATH_FUNC),
            Self::DataSource => Some(templates::DATA_SOURCE),
            Self::Call => Some(templates::CALL),
            Self::RankingFlagging => Some(templates::ACTION),
            Self::TypeCheck(_) => Some(templates::TYPE_CHECK),
            Self::Sort => Some(templates::SORT),
            Self::Mask => Some(templates::MASK),
            Self::Assignment => Some(templates::ASSIGN),
            Self::NoOp | Self::Unclassified => None,
        }
    }

    /// Categories whose instructions carry true/false successors
    pub const fn is_branching(&self) -> bool {
        matches!(
            self,
            Self::Conditional
                | Self::DateConditional
                | Self::QuantifiedConditional(_)
                | Self::TypeCheck(_)
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Arithmetic => "Arithmetic",
            Self::Conditional => "Conditional",
            Self::DateConditional => "DateConditional",
            Self::QuantifiedConditional(_) => "QuantifiedConditional",
            Self::DateDifference(_) => "DateDifference",
            Self::DateAddition => "DateAddition",
            Self::StringConcatenation => "StringConcatenation",
            Self::MathFunction => "MathFunction",
            Self::DataSource => "DataSource",
            Self::Call => "Call",
            Self::RankingFlagging => "RankingFlagging",
            Self::TypeCheck(_) => "TypeCheck",
            Self::Sort => "Sort",
            Self::Mask => "Mask",
            Self::NoOp => "NoOp",
            Self::Assignment => "Assignment",
            Self::Unclassified => "Unclassified",
        }
    }
}

/// Result of classifying one type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub code: i32,
    pub name: &'static str,
    pub category: InstructionCategory,
    pub template: Option<&'static str>,
}

impl Classification {
    fn unclassified(code: i32) -> Self {
        Self {
            code,
            name: "Unclassified",
            category: InstructionCategory::Unclassified,
            template: None,
        }
    }
}

/// Classify a type code; unknown codes are `Unclassified` with no template
pub fn classify(code: i32) -> Classification {
    match INSTRUCTIONS.binary_search_by_key(&code, |def| def.code) {
        Ok(index) => {
            let def = &INSTRUCTIONS[index];
            Classification {
                code,
                name: def.name,
                category: def.category,
                template: def.category.template(),
            }
        }
        Err(_) => Classification::unclassified(code),
    }
}

pub fn is_known_code(code: i32) -> bool {
    INSTRUCTIONS.binary_search_by_key(&code, |def| def.code).is_ok()
}

/// Display label for a type code, used to prefix rendered steps
pub fn label(code: i32) -> String {
    if is_known_code(code) {
        classify(code).name.to_string()
    } else {
        format!("Type {}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(INSTRUCTIONS.windows(2).all(|w| w[0].code < w[1].code));
        assert!(INSTRUCTIONS.len() >= 140);
    }

    #[test]
    fn test_core_codes() {
        assert_eq!(classify(0).category, InstructionCategory::Arithmetic);
        assert_eq!(classify(0).template, Some(templates::ARITHMETIC));
        assert_eq!(classify(1).category, InstructionCategory::Conditional);
        assert_eq!(classify(56).category, InstructionCategory::DateConditional);
        assert_eq!(classify(86).category, InstructionCategory::StringConcatenation);
        assert_eq!(classify(126).category, InstructionCategory::DateAddition);
        assert_eq!(classify(200).category, InstructionCategory::DataSource);
        assert_eq!(classify(6).category, InstructionCategory::NoOp);
        assert_eq!(classify(5).category, InstructionCategory::Assignment);
    }

    #[test]
    fn test_parameterised_categories() {
        assert_matches!(
            classify(51).category,
            InstructionCategory::QuantifiedConditional(Quantifier::None)
        );
        assert_matches!(
            classify(55).category,
            InstructionCategory::QuantifiedConditional(Quantifier::Any)
        );
        assert_matches!(
            classify(58).category,
            InstructionCategory::DateDifference(DateUnit::Months)
        );
        assert_matches!(
            classify(98).category,
            InstructionCategory::TypeCheck(TypeCheckKind::Numeric)
        );
    }

    #[test]
    fn test_ranking_and_flagging_family() {
        for code in [7, 14, 20, 43, 62, 70, 93, 97, 113, 119, 194] {
            assert_eq!(
                classify(code).category,
                InstructionCategory::RankingFlagging,
                "code {}",
                code
            );
        }
        assert_eq!(classify(14).name, "Rank All Drivers Low to High");
    }

    #[test]
    fn test_math_family() {
        for code in 127..=151 {
            assert_eq!(classify(code).category, InstructionCategory::MathFunction);
        }
        assert_eq!(classify(133).name, "Square Root");
    }

    #[test]
    fn test_unknown_codes() {
        for code in [45, 46, 72, 96, 152, 999, -5] {
            let classification = classify(code);
            assert_eq!(classification.category, InstructionCategory::Unclassified);
            assert_eq!(classification.template, None);
            assert!(!is_known_code(code));
        }
        assert_eq!(label(999), "Type 999");
        assert_eq!(label(1), "If");
    }

    #[test]
    fn test_branching_categories() {
        assert!(classify(1).category.is_branching());
        assert!(classify(95).category.is_branching());
        assert!(!classify(0).category.is_branching());
    }
}
