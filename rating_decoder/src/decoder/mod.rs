//! Instruction decoder
//!
//! `decode` turns one tokenized instruction into its node list and never
//! fails: anything that goes wrong becomes an error leaf in place. The
//! multi-branch marker is split first; within each part, branching
//! instructions are then split on the AND/OR joiners at clause boundaries,
//! with AND binding tighter than OR.

pub mod arguments;
mod error;
pub(crate) mod rules;

pub use error::{DecodeError, InputLimit};

use crate::ast::{Join, Node};
use crate::classifier::{classify, InstructionCategory};
use crate::config::compile_time::decoder::{MAX_FRAGMENT_COUNT, MAX_SPLIT_DEPTH};
use crate::config::runtime::{DecoderPreferences, LexicalPreferences};
use crate::lexical::{LexicalAnalyzer, LexicalMetrics};
use crate::program::Instruction;
use crate::tokens::Token;
use crate::variables::LookupContext;
use crate::{log_debug, log_warning};
use rules::RuleInput;
use serde::Serialize;

/// Separates a primary clause from its fallback clauses
pub const MULTI_BRANCH_MARKER: char = '#';

const JOINERS: [(char, Join); 2] = [('&', Join::And), ('^', Join::Or)];

/// Decode one instruction from its tokens.
///
/// The lookup context is only read; passing `None` leaves operand values as
/// their raw tokens.
pub fn decode(
    instruction: &Instruction,
    tokens: &[Token],
    context: Option<&LookupContext<'_>>,
) -> Vec<Node> {
    decode_at_depth(instruction, tokens, context, 0)
}

fn decode_at_depth(
    instruction: &Instruction,
    tokens: &[Token],
    context: Option<&LookupContext<'_>>,
    depth: usize,
) -> Vec<Node> {
    let input = RuleInput {
        instruction,
        tokens,
        classification: classify(instruction.type_code),
        context,
    };

    if depth > MAX_SPLIT_DEPTH {
        return vec![input.error(DecodeError::limit(
            InputLimit::SplitDepth,
            format!("nested deeper than {} splits", MAX_SPLIT_DEPTH),
        ))];
    }

    if let Some((head, rest)) = instruction.text.split_once(MULTI_BRANCH_MARKER) {
        return [head, rest]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .flat_map(|part| decode_fragment(instruction, part, context, depth + 1))
            .collect();
    }

    let category = input.classification.category;
    if category.is_branching() {
        let (fragments, joins) = split_joined(&instruction.text, clause_pipes(category));
        if !joins.is_empty() {
            return vec![decode_joined(&input, &fragments, &joins, depth)];
        }
    }

    rules::apply(&input)
}

/// Decode a copy of the instruction whose text is one fragment of the original
fn decode_fragment(
    instruction: &Instruction,
    fragment: &str,
    context: Option<&LookupContext<'_>>,
    depth: usize,
) -> Vec<Node> {
    let part = instruction.with_fragment(fragment);
    match crate::lexical::tokenize(fragment) {
        Ok(tokens) => decode_at_depth(&part, &tokens, context, depth),
        Err(error) => vec![failure(&part, error.into())],
    }
}

/// Error leaf for an instruction that could not be tokenized
fn failure(instruction: &Instruction, error: DecodeError) -> Node {
    RuleInput {
        instruction,
        tokens: &[],
        classification: classify(instruction.type_code),
        context: None,
    }
    .error(error)
}

/// Pipes that close one condition clause: `|L|OP|R|` or `|X|`
fn clause_pipes(category: InstructionCategory) -> usize {
    match category {
        InstructionCategory::TypeCheck(_) => 2,
        _ => 4,
    }
}

fn joiner(c: char) -> Option<Join> {
    JOINERS
        .iter()
        .find(|(joiner, _)| *joiner == c)
        .map(|(_, join)| *join)
}

/// Split text on joiners that follow a completed clause, optionally after
/// whitespace. Returns the fragments and the joiner between each pair.
///
/// A joiner inside a clause (such as `^` used as a comparison operator in
/// `|A|^|B|`) is left alone.
fn split_joined(text: &str, clause_pipes: usize) -> (Vec<&str>, Vec<Join>) {
    let mut fragments = Vec::new();
    let mut joins = Vec::new();
    let mut start = 0;
    let mut pipes = 0;
    let mut after_clause = false;

    for (index, c) in text.char_indices() {
        if c == '|' {
            pipes += 1;
            after_clause = pipes % clause_pipes == 0;
        } else if let Some(join) = joiner(c).filter(|_| after_clause) {
            fragments.push(&text[start..index]);
            joins.push(join);
            start = index + c.len_utf8();
            pipes = 0;
            after_clause = false;
        } else if !c.is_whitespace() {
            after_clause = false;
        }
    }

    fragments.push(&text[start..]);
    (fragments, joins)
}

fn decode_joined(input: &RuleInput<'_>, fragments: &[&str], joins: &[Join], depth: usize) -> Node {
    if fragments.len() > MAX_FRAGMENT_COUNT {
        return input.error(DecodeError::limit(
            InputLimit::FragmentCount,
            format!("{} fragments (max {})", fragments.len(), MAX_FRAGMENT_COUNT),
        ));
    }

    let conditions: Vec<Node> = fragments
        .iter()
        .map(|fragment| {
            let nodes = decode_fragment(input.instruction, fragment, input.context, depth + 1);
            into_condition(input, nodes)
        })
        .collect();

    let condition = match input.classification.category {
        InstructionCategory::QuantifiedConditional(quantifier) => {
            let (join, negated) = rules::quantifier_join(quantifier);
            input.multi_condition(conditions, join, negated)
        }
        _ => group_by_precedence(input, conditions, joins),
    };

    input.conditional(condition)
}

/// `&` binds tighter than `^`: `A & B ^ C` reads as `(A and B) or C`
fn group_by_precedence(input: &RuleInput<'_>, conditions: Vec<Node>, joins: &[Join]) -> Node {
    let mut alternatives = Vec::new();
    let mut terms = Vec::new();

    for (index, condition) in conditions.into_iter().enumerate() {
        terms.push(condition);
        if joins.get(index) != Some(&Join::And) {
            alternatives.push(single_or_joined(input, std::mem::take(&mut terms), Join::And));
        }
    }

    single_or_joined(input, alternatives, Join::Or)
}

fn single_or_joined(input: &RuleInput<'_>, mut conditions: Vec<Node>, join: Join) -> Node {
    if conditions.len() == 1 {
        if let Some(condition) = conditions.pop() {
            return condition;
        }
    }
    input.multi_condition(conditions, join, false)
}

/// Reduce a decoded fragment to the condition it tests
fn into_condition(input: &RuleInput<'_>, mut nodes: Vec<Node>) -> Node {
    if nodes.len() != 1 {
        return input.error(DecodeError::shape(
            input.classification.category.as_str(),
            "one condition per fragment",
            nodes.len(),
        ));
    }

    match nodes.pop() {
        Some(Node::Conditional(conditional)) => match *conditional.condition {
            Node::MultiCondition(mut multi) if multi.conditions.len() == 1 => {
                multi.conditions.pop().map_or(Node::MultiCondition(multi), |single| single)
            }
            condition => condition,
        },
        Some(other) => other,
        None => input.error(DecodeError::shape(
            input.classification.category.as_str(),
            "one condition per fragment",
            0,
        )),
    }
}

/// Counters kept by a [`Decoder`] across instructions
#[derive(Debug, Default, Clone, Serialize)]
pub struct DecodeStats {
    pub instructions: usize,
    pub nodes: usize,
    pub error_leaves: usize,
    pub unclassified: usize,
}

/// Stateful front end: tokenizes, decodes and logs, keeping statistics
pub struct Decoder {
    preferences: DecoderPreferences,
    analyzer: LexicalAnalyzer,
    stats: DecodeStats,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_preferences(DecoderPreferences::default())
    }

    pub fn with_preferences(preferences: DecoderPreferences) -> Self {
        Self {
            preferences,
            analyzer: LexicalAnalyzer::new(),
            stats: DecodeStats::default(),
        }
    }

    pub fn with_lexical_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.analyzer = LexicalAnalyzer::with_preferences(preferences);
        self
    }

    /// Tokenize and decode one instruction
    pub fn decode_instruction(
        &mut self,
        instruction: &Instruction,
        context: Option<&LookupContext<'_>>,
    ) -> Vec<Node> {
        let context = context.filter(|_| self.preferences.resolve_descriptions);

        let nodes = match self.analyzer.tokenize(&instruction.text) {
            Ok(tokens) => decode(instruction, &tokens, context),
            Err(error) => vec![failure(instruction, error.into())],
        };

        self.record(instruction, &nodes);
        nodes
    }

    fn record(&mut self, instruction: &Instruction, nodes: &[Node]) {
        self.stats.instructions += 1;
        self.stats.nodes += nodes.iter().map(Node::size).sum::<usize>();
        if !crate::classifier::is_known_code(instruction.type_code) {
            self.stats.unclassified += 1;
        }

        for node in nodes {
            for leaf in node.error_leaves() {
                self.stats.error_leaves += 1;
                if let Some(error) = &leaf.error {
                    log_warning!(code = error.error_code(), "Instruction decoded with errors",
                        "step" => instruction.step,
                        "type" => instruction.type_code,
                        "error" => error
                    );
                }
            }
        }

        if self.preferences.log_decode_details {
            log_debug!("Instruction decoded",
                "step" => instruction.step,
                "type" => instruction.type_code,
                "nodes" => nodes.len()
            );
        }
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn lexical_metrics(&self) -> &LexicalMetrics {
        self.analyzer.metrics()
    }

    pub fn preferences(&self) -> &DecoderPreferences {
        &self.preferences
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{JumpTarget, LinkState, TypeCheckKind};
    use crate::lexical::tokenize;
    use crate::program::{Dependency, InputDefinition};
    use assert_matches::assert_matches;

    const ARITHMETIC: i32 = 0;
    const IF: i32 = 1;
    const SET_STRING: i32 = 5;
    const EMPTY: i32 = 6;
    const IF_ALL: i32 = 50;
    const IF_NONE: i32 = 51;
    const DATE_DIFF_DAYS: i32 = 57;
    const STRING_ADDITION: i32 = 86;
    const IS_NUMERIC: i32 = 98;

    fn decode_text(step: u32, type_code: i32, text: &str) -> Vec<Node> {
        let instruction = Instruction::new(step, type_code, text).with_next(Some(3), Some(5));
        decode(&instruction, &tokenize(text).unwrap(), None)
    }

    fn single(nodes: Vec<Node>) -> Node {
        assert_eq!(nodes.len(), 1, "expected one node, got {:?}", nodes);
        nodes.into_iter().next().unwrap()
    }

    #[test]
    fn test_arithmetic_with_rounding() {
        let node = single(decode_text(1, ARITHMETIC, "GI_84+GC_47!RN"));
        let Node::Arithmetic(arithmetic) = node else {
            panic!("expected arithmetic node, got {:?}", node);
        };
        assert_eq!(arithmetic.left.raw, "GI_84");
        assert_eq!(arithmetic.operator, "+");
        assert_eq!(arithmetic.right.raw, "GC_47");
        assert_eq!(arithmetic.rounding.as_deref(), Some("RN"));
        assert_eq!(arithmetic.meta.step, 1);
        assert!(arithmetic.meta.template.is_some());
    }

    #[test]
    fn test_rounding_markers_are_stripped_before_shape_check() {
        for (text, code) in [
            ("GI_1*GI_2!RN", "RN"),
            ("GI_1*GI_2!RP2", "RP2"),
            ("GI_1-GI_2!RM1", "RM1"),
        ] {
            let node = single(decode_text(1, ARITHMETIC, text));
            assert_matches!(&node, Node::Arithmetic(a) if a.rounding.as_deref() == Some(code));
        }
    }

    #[test]
    fn test_arithmetic_shape_failure_is_error_leaf() {
        let node = single(decode_text(4, ARITHMETIC, "GI_84"));
        let Node::Leaf(leaf) = &node else {
            panic!("expected error leaf, got {:?}", node);
        };
        assert_matches!(
            leaf.error,
            Some(DecodeError::UnexpectedTokenShape { found: 1, .. })
        );
        assert_eq!(leaf.raw, "GI_84");
    }

    #[test]
    fn test_conditional_comparison_and_placeholders() {
        let node = single(decode_text(2, IF, "|GI_494|<>|GC_691|"));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        let Node::Comparison(comparison) = conditional.condition.as_ref() else {
            panic!("expected comparison");
        };
        assert_eq!(comparison.left.raw, "GI_494");
        assert_eq!(comparison.operator, "<>");
        assert_eq!(comparison.right.raw, "GC_691");

        assert_eq!(conditional.true_target, JumpTarget::Step(3));
        assert_eq!(conditional.false_target, JumpTarget::Step(5));
        assert_matches!(
            conditional.true_branch.as_slice(),
            [Node::Jump(jump)] if jump.target == 3 && jump.state == LinkState::Pending
        );
        assert_matches!(conditional.false_branch.as_slice(), [Node::Jump(jump)] if jump.target == 5);
    }

    #[test]
    fn test_conditional_sentinels_leave_branches_empty() {
        let instruction = Instruction::new(7, IF, "|GI_1|=|0|").with_next(Some(-1), None);
        let node = single(decode(&instruction, &tokenize(&instruction.text).unwrap(), None));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        assert_eq!(conditional.true_target, JumpTarget::Done);
        assert_eq!(conditional.false_target, JumpTarget::NoBranch);
        assert!(conditional.true_branch.is_empty());
        assert!(conditional.false_branch.is_empty());
    }

    #[test]
    fn test_conditional_with_caret_operator_is_not_split() {
        let node = single(decode_text(2, IF, "|GI_1|^|GI_2|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(c.condition.as_ref(), Node::Comparison(cmp) if cmp.operator == "^")
        );
    }

    #[test]
    fn test_conditional_bad_shape() {
        let node = single(decode_text(2, IF, "GI_1=GI_2"));
        assert_matches!(
            &node,
            Node::Leaf(leaf) if matches!(leaf.error, Some(DecodeError::UnexpectedTokenShape { found: 1, .. }))
        );
    }

    #[test]
    fn test_joined_fragments_yield_one_condition_each() {
        for (text, count, join) in [
            ("|GI_1|=|1|&|GI_2|=|2|", 2, Join::And),
            ("|GI_1|=|1|^|GI_2|=|2|^|GI_3|>|3|", 3, Join::Or),
            ("|GI_1|=|1| & |GI_2|=|2|", 2, Join::And),
            ("|GI_1|=|1|\t^ |GI_2|=|2|", 2, Join::Or),
        ] {
            let node = single(decode_text(9, IF, text));
            let Node::Conditional(conditional) = node else {
                panic!("expected conditional for {}", text);
            };
            let Node::MultiCondition(multi) = conditional.condition.as_ref() else {
                panic!("expected multi-condition for {}", text);
            };
            assert_eq!(multi.conditions.len(), count, "{}", text);
            assert_eq!(multi.join, join);
            assert!(multi
                .conditions
                .iter()
                .all(|c| matches!(c, Node::Comparison(_))));
            assert_eq!(conditional.true_target, JumpTarget::Step(3));
        }
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let _ = crate::logging::init_global_logging();

        let node = single(decode_text(9, IF, "|GI_1|=|1|&|GI_2|=|2|^|GI_3|>|3|&|GI_4|<|4|"));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        let Node::MultiCondition(alternatives) = conditional.condition.as_ref() else {
            panic!("expected multi-condition");
        };
        assert_eq!(alternatives.join, Join::Or);
        assert_eq!(alternatives.conditions.len(), 2);
        for group in &alternatives.conditions {
            assert_matches!(
                group,
                Node::MultiCondition(m) if m.join == Join::And
                    && m.conditions.len() == 2
                    && m.conditions.iter().all(|c| matches!(c, Node::Comparison(_)))
            );
        }

        let node = single(decode_text(9, IF, "|GI_1|=|1|&|GI_2|=|2|^|GI_3|>|3|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(
                c.condition.as_ref(),
                Node::MultiCondition(m) if m.join == Join::Or
                    && matches!(m.conditions.as_slice(), [Node::MultiCondition(group), Node::Comparison(_)] if group.join == Join::And)
            )
        );
    }

    #[test]
    fn test_joiner_inside_a_clause_after_whitespace_is_not_split() {
        let node = single(decode_text(2, IF, "|GI_1| ^|GI_2|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(c.condition.as_ref(), Node::Comparison(cmp) if cmp.operator == "^")
        );
    }

    #[test]
    fn test_bad_fragment_stays_in_place() {
        let node = single(decode_text(9, IF, "|GI_1|=|1|&|GI_2|=|"));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        let Node::MultiCondition(multi) = conditional.condition.as_ref() else {
            panic!("expected multi-condition");
        };
        assert_matches!(multi.conditions.as_slice(), [Node::Comparison(_), Node::Leaf(leaf)] if leaf.is_error());
    }

    #[test]
    fn test_quantifier_decides_join() {
        let node = single(decode_text(3, IF_NONE, "|GI_1|=|1|&|GI_2|=|2|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(
                c.condition.as_ref(),
                Node::MultiCondition(m) if m.join == Join::Or && m.negated && m.conditions.len() == 2
            )
        );

        let node = single(decode_text(3, IF_ALL, "|GI_1|=|1|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(
                c.condition.as_ref(),
                Node::MultiCondition(m) if m.join == Join::And && !m.negated && m.conditions.len() == 1
            )
        );
    }

    #[test]
    fn test_multi_branch_marker_concatenates() {
        let nodes = decode_text(4, IF, "|GI_1|=|1|#|GI_2|=|2|");
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| matches!(n, Node::Conditional(_))));

        let nodes = decode_text(4, IF, "|GI_1|=|1|&|GI_5|=|5|#|GI_2|=|2|");
        assert_eq!(nodes.len(), 2);
        assert_matches!(
            &nodes[0],
            Node::Conditional(c) if matches!(c.condition.as_ref(), Node::MultiCondition(_))
        );
    }

    #[test]
    fn test_type_check() {
        let node = single(decode_text(6, IS_NUMERIC, "|~GI_573|"));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        assert_matches!(
            conditional.condition.as_ref(),
            Node::TypeCheck(check) if check.kind == TypeCheckKind::Numeric && check.operand.raw == "~GI_573"
        );
        assert_eq!(conditional.true_branch.len(), 1);
    }

    #[test]
    fn test_unclassified_keeps_raw_text() {
        let text = "some legacy text | 42";
        let node = single(decode_text(8, 4242, text));
        assert_matches!(&node, Node::Leaf(leaf) if leaf.value == text && leaf.raw == text);
        assert!(node.template().is_none());
    }

    #[test]
    fn test_string_concatenation_strips_brackets_for_display() {
        let node = single(decode_text(5, STRING_ADDITION, "[FirstName]+[LastName]"));
        let Node::Function(function) = node else {
            panic!("expected function");
        };
        let raws: Vec<&str> = function.args.iter().map(|a| a.raw.as_str()).collect();
        let values: Vec<&str> = function.args.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(raws, vec!["[FirstName]", "[LastName]"]);
        assert_eq!(values, vec!["FirstName", "LastName"]);
    }

    #[test]
    fn test_date_difference_needs_two_arguments() {
        let node = single(decode_text(5, DATE_DIFF_DAYS, "GI_1|GI_2"));
        assert_matches!(&node, Node::Function(f) if f.args.len() == 2);

        let node = single(decode_text(5, DATE_DIFF_DAYS, "GI_1"));
        assert!(node.is_error());
    }

    #[test]
    fn test_assignment() {
        let node = single(decode_text(3, SET_STRING, "GI_9|[Yes]"));
        let Node::Assignment(assignment) = node else {
            panic!("expected assignment");
        };
        assert_eq!(assignment.target.raw, "GI_9");
        assert_matches!(assignment.expr.as_ref(), Node::Leaf(leaf) if leaf.value == "Yes");

        let instruction = Instruction::new(3, SET_STRING, "[No]").with_target("GC_12");
        let node = single(decode(&instruction, &tokenize("[No]").unwrap(), None));
        assert_matches!(&node, Node::Assignment(a) if a.target.raw == "GC_12");

        let node = single(decode_text(3, SET_STRING, ""));
        assert!(node.is_error());
    }

    #[test]
    fn test_noop_is_empty() {
        assert!(decode_text(1, EMPTY, "anything").is_empty());
    }

    #[test]
    fn test_malformed_variable_becomes_error_leaf() {
        let node = single(decode_text(2, IF, "|GI_x1|=|1|"));
        assert_matches!(
            &node,
            Node::Conditional(c) if matches!(
                c.condition.as_ref(),
                Node::Comparison(cmp) if matches!(cmp.left.error, Some(DecodeError::MalformedVariable { .. }))
            )
        );
    }

    #[test]
    fn test_context_resolves_operand_values() {
        let dependencies = vec![Dependency::new(494, "Driver Age")];
        let inputs = vec![InputDefinition::new("GC_691", "Minimum Age")];
        let context = LookupContext::new(Some(&dependencies), Some(&inputs));

        let instruction = Instruction::new(2, IF, "|GI_494|<>|GC_691|");
        let node = single(decode(
            &instruction,
            &tokenize(&instruction.text).unwrap(),
            Some(&context),
        ));
        let Node::Conditional(conditional) = node else {
            panic!("expected conditional");
        };
        let Node::Comparison(comparison) = conditional.condition.as_ref() else {
            panic!("expected comparison");
        };
        assert_eq!(comparison.left.value, "Driver Age");
        assert_eq!(comparison.right.value, "Minimum Age");
        assert_eq!(comparison.left.raw, "GI_494");
    }

    #[test]
    fn test_split_depth_is_bounded() {
        let text = "|GI_1|=|1|#".repeat(MAX_SPLIT_DEPTH + 3);
        let nodes = decode_text(1, IF, &text);
        assert!(nodes.iter().any(|n| matches!(
            n,
            Node::Leaf(leaf) if matches!(
                leaf.error,
                Some(DecodeError::InputLimitExceeded { limit: InputLimit::SplitDepth, .. })
            )
        )));
    }

    #[test]
    fn test_decoder_tracks_stats() {
        let _ = crate::logging::init_global_logging();
        let mut decoder = Decoder::new();

        decoder.decode_instruction(&Instruction::new(1, ARITHMETIC, "GI_84+GC_47!RN"), None);
        decoder.decode_instruction(&Instruction::new(2, ARITHMETIC, "GI_84"), None);
        decoder.decode_instruction(&Instruction::new(3, 4242, "free text"), None);

        let stats = decoder.stats();
        assert_eq!(stats.instructions, 3);
        assert_eq!(stats.error_leaves, 1);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(decoder.lexical_metrics().instructions, 3);
    }
}
