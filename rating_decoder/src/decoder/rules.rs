//! Per-category decoding rules
//!
//! Each rule turns one instruction (or one fragment of it) into a node. A
//! rule never fails outright: shape violations come back as error leaves.

use super::arguments::{self, split_inline_operator, split_rounding, strip_enclosing, Unit};
use super::error::{DecodeError, InputLimit};
use crate::ast::{
    ArithmeticNode, AssignmentNode, ComparisonNode, ConditionalNode, FunctionNode, Join,
    JumpNode, JumpTarget, LeafNode, LinkState, MultiConditionNode, Node, NodeMeta, TypeCheckKind,
    TypeCheckNode,
};
use crate::classifier::{Classification, DateUnit, InstructionCategory, Quantifier};
use crate::config::compile_time::decoder::MAX_ARGUMENT_COUNT;
use crate::program::Instruction;
use crate::renderer::phrases::{jump_phrase, operator_phrase, rounding_phrase};
use crate::tokens::Token;
use crate::variables::{describe, is_variable_token, looks_like_variable, parse_variable, LookupContext};

/// Everything a rule may read; nothing here is mutated
pub(crate) struct RuleInput<'a> {
    pub instruction: &'a Instruction,
    pub tokens: &'a [Token],
    pub classification: Classification,
    pub context: Option<&'a LookupContext<'a>>,
}

impl<'a> RuleInput<'a> {
    /// Metadata for the top-level node of this instruction
    fn node_meta(&self) -> NodeMeta {
        self.part_meta().with_template(self.classification.template)
    }

    /// Metadata for operands and other inner nodes
    fn part_meta(&self) -> NodeMeta {
        NodeMeta::new(self.instruction.step, self.instruction.type_code)
    }

    fn category_name(&self) -> &'static str {
        self.classification.category.as_str()
    }

    fn resolve(&self, raw: &str) -> String {
        match self.context {
            Some(context) => describe(raw, context),
            None => raw.to_string(),
        }
    }

    /// Operand leaf. Tokens that start like a variable but do not parse
    /// become error leaves.
    pub fn leaf(&self, raw: &str) -> LeafNode {
        let raw = raw.trim();
        if looks_like_variable(raw) {
            if let Err(error) = parse_variable(raw) {
                return match self.inline_expression(raw) {
                    Some(value) => LeafNode::new(self.part_meta(), raw, value),
                    None => LeafNode::error(self.part_meta(), raw, error.into()),
                };
            }
        }
        LeafNode::new(self.part_meta(), raw, self.resolve(raw))
    }

    /// Display text for an operand such as `GI_1*GI_2` that the lexer kept whole
    fn inline_expression(&self, raw: &str) -> Option<String> {
        let (left, operator, right) = split_inline_operator(raw)?;
        let left = self.leaf(&left);
        let right = self.leaf(&right);
        if left.is_error() || right.is_error() {
            return None;
        }
        Some(format!(
            "{} {} {}",
            left.value,
            operator_phrase(&operator),
            right.value
        ))
    }

    /// Leaf whose display drops one pair of enclosing brackets
    fn literal_leaf(&self, raw: &str) -> LeafNode {
        let raw = raw.trim();
        if raw.starts_with('[') || raw.starts_with('{') {
            LeafNode::new(self.part_meta(), raw, strip_enclosing(raw))
        } else {
            self.leaf(raw)
        }
    }

    /// Error leaf standing in for the whole instruction
    pub fn error(&self, error: DecodeError) -> Node {
        let meta = self.part_meta().with_description(error.to_string());
        Node::Leaf(LeafNode::error(meta, self.instruction.text.as_str(), error))
    }

    fn targets(&self) -> (JumpTarget, JumpTarget) {
        (
            JumpTarget::from_raw(self.instruction.next_true_step()),
            JumpTarget::from_raw(self.instruction.next_false_step()),
        )
    }

    fn placeholder(&self, target: JumpTarget) -> Vec<Node> {
        target
            .step()
            .map(|step| {
                vec![Node::Jump(JumpNode {
                    meta: self.part_meta(),
                    target: step,
                    state: LinkState::Pending,
                })]
            })
            .unwrap_or_default()
    }

    /// Wrap a condition in a two-way branch built from the successor fields
    pub fn conditional(&self, condition: Node) -> Node {
        let (true_target, false_target) = self.targets();
        let description = format!(
            "If {}, then {}; otherwise {}",
            condition_text(&condition),
            jump_phrase(true_target),
            jump_phrase(false_target)
        );

        Node::Conditional(ConditionalNode {
            meta: self.node_meta().with_description(description),
            condition: Box::new(condition),
            true_target,
            false_target,
            true_branch: self.placeholder(true_target),
            false_branch: self.placeholder(false_target),
        })
    }

    pub fn multi_condition(&self, conditions: Vec<Node>, join: Join, negated: bool) -> Node {
        let joined = conditions
            .iter()
            .map(clause_text)
            .collect::<Vec<_>>()
            .join(&format!(" {} ", join.phrase()));
        let description = if negated {
            format!("none of ({})", joined)
        } else {
            joined
        };

        Node::MultiCondition(MultiConditionNode {
            meta: self.part_meta().with_description(description),
            conditions,
            join,
            negated,
        })
    }

    fn comparison(&self, dates: bool) -> Result<ComparisonNode, DecodeError> {
        let parts: Vec<&str> = self.instruction.text.split('|').collect();

        match parts.as_slice() {
            [head, left, operator, right, tail]
                if head.trim().is_empty() && tail.trim().is_empty() && !operator.trim().is_empty() =>
            {
                let left = self.leaf(left);
                let right = self.leaf(right);
                let operator = operator.trim();
                let mut description =
                    format!("{} {} {}", left.value, operator_phrase(operator), right.value);
                if dates {
                    description.push_str(" (as dates)");
                }

                Ok(ComparisonNode {
                    meta: self.part_meta().with_description(description),
                    left,
                    operator: operator.to_string(),
                    right,
                })
            }
            _ => Err(DecodeError::shape(
                self.category_name(),
                "|left|operator|right|",
                parts.len(),
            )),
        }
    }

    fn type_check(&self, kind: TypeCheckKind) -> Result<TypeCheckNode, DecodeError> {
        let operand = self
            .instruction
            .text
            .split('|')
            .map(str::trim)
            .find(|segment| !segment.is_empty())
            .ok_or_else(|| DecodeError::shape(self.category_name(), "an operand", 0))?;

        let operand = self.leaf(operand);
        let description = format!("{} is {}", operand.value, kind.phrase());

        Ok(TypeCheckNode {
            meta: self.part_meta().with_description(description),
            operand,
            kind,
        })
    }

    /// The bare condition of a branching instruction, or an error leaf
    pub fn condition(&self) -> Node {
        let result = match self.classification.category {
            InstructionCategory::TypeCheck(kind) => self.type_check(kind).map(Node::TypeCheck),
            InstructionCategory::DateConditional => self.comparison(true).map(Node::Comparison),
            _ => self.comparison(false).map(Node::Comparison),
        };
        result.unwrap_or_else(|error| self.error(error))
    }

    fn arguments(&self) -> Result<(Vec<String>, Option<String>), DecodeError> {
        let (tokens, rounding) = split_rounding(self.tokens);
        let args = arguments::operands(&arguments::group_units(tokens));
        if args.len() > MAX_ARGUMENT_COUNT {
            return Err(DecodeError::limit(
                InputLimit::ArgumentCount,
                format!("{} arguments (max {})", args.len(), MAX_ARGUMENT_COUNT),
            ));
        }
        Ok((args, rounding))
    }

    fn function(
        &self,
        name: &str,
        args: Vec<LeafNode>,
        rounding: Option<String>,
        description: String,
    ) -> Node {
        let description = with_rounding(description, rounding.as_deref());
        Node::Function(FunctionNode {
            meta: self.node_meta().with_description(description),
            name: name.to_string(),
            args,
            rounding,
        })
    }
}

/// Sentence fragment describing a condition node
pub(crate) fn condition_text(node: &Node) -> String {
    match node {
        Node::Leaf(leaf) => leaf.value.clone(),
        other => other
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| other.kind_name().to_string()),
    }
}

/// Condition text inside a joined list; nested groups are parenthesized
pub(crate) fn clause_text(node: &Node) -> String {
    match node {
        Node::MultiCondition(multi) if !multi.negated && multi.conditions.len() > 1 => {
            format!("({})", condition_text(node))
        }
        other => condition_text(other),
    }
}

fn with_rounding(description: String, rounding: Option<&str>) -> String {
    match rounding {
        Some(code) => format!("{}, then {}", description, rounding_phrase(code)),
        None => description,
    }
}

fn values(leaves: &[LeafNode]) -> Vec<&str> {
    leaves.iter().map(|leaf| leaf.value.as_str()).collect()
}

// === RULES ===

/// Apply the rule for the instruction's category
pub(crate) fn apply(input: &RuleInput<'_>) -> Vec<Node> {
    match input.classification.category {
        InstructionCategory::Arithmetic => vec![arithmetic(input)],
        InstructionCategory::Conditional | InstructionCategory::DateConditional => {
            vec![conditional(input, None)]
        }
        InstructionCategory::QuantifiedConditional(quantifier) => {
            vec![conditional(input, Some(quantifier))]
        }
        InstructionCategory::TypeCheck(_) => vec![conditional(input, None)],
        InstructionCategory::DateDifference(unit) => vec![date_difference(input, unit)],
        InstructionCategory::DateAddition => vec![date_addition(input)],
        InstructionCategory::StringConcatenation => vec![string_concatenation(input)],
        InstructionCategory::MathFunction => vec![math_function(input)],
        InstructionCategory::DataSource => vec![data_source(input)],
        InstructionCategory::Call => vec![call(input)],
        InstructionCategory::RankingFlagging => vec![ranking_flagging(input)],
        InstructionCategory::Sort => vec![listing(input, "Sort")],
        InstructionCategory::Mask => vec![listing(input, "Mask")],
        InstructionCategory::Assignment => vec![assignment(input)],
        InstructionCategory::NoOp => Vec::new(),
        InstructionCategory::Unclassified => vec![unclassified(input)],
    }
}

/// Join and negation implied by a quantifier
pub(crate) fn quantifier_join(quantifier: Quantifier) -> (Join, bool) {
    match quantifier {
        Quantifier::All => (Join::And, false),
        Quantifier::Any => (Join::Or, false),
        Quantifier::None => (Join::Or, true),
    }
}

fn conditional(input: &RuleInput<'_>, quantifier: Option<Quantifier>) -> Node {
    let condition = input.condition();
    if condition.is_error() {
        return condition;
    }

    let condition = match quantifier {
        Some(quantifier) => {
            let (join, negated) = quantifier_join(quantifier);
            input.multi_condition(vec![condition], join, negated)
        }
        None => condition,
    };
    input.conditional(condition)
}

fn arithmetic(input: &RuleInput<'_>) -> Node {
    let (tokens, rounding) = split_rounding(input.tokens);
    let units = arguments::group_units(tokens);

    let (left, operator, right) = match units.as_slice() {
        [left, operator, right] => (
            left.text().to_string(),
            operator.text().to_string(),
            right.text().to_string(),
        ),
        [Unit::Operand(word)] => match split_inline_operator(word) {
            Some(parts) => parts,
            None => {
                return input.error(DecodeError::shape("Arithmetic", "left operator right", 1))
            }
        },
        _ => {
            return input.error(DecodeError::shape(
                "Arithmetic",
                "left operator right",
                units.len(),
            ))
        }
    };

    let left = input.leaf(&left);
    let right = input.leaf(&right);
    let description = with_rounding(
        format!(
            "Compute {} {} {}",
            left.value,
            operator_phrase(&operator),
            right.value
        ),
        rounding.as_deref(),
    );

    Node::Arithmetic(ArithmeticNode {
        meta: input.node_meta().with_description(description),
        left,
        operator,
        right,
        rounding,
    })
}

fn math_function(input: &RuleInput<'_>) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    let name = input.classification.name;
    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.leaf(arg)).collect();

    let description = if leaves.is_empty() {
        format!("Compute {}", name)
    } else {
        format!("Compute {} of {}", name, values(&leaves).join(" and "))
    };
    input.function(name, leaves, rounding, description)
}

fn string_concatenation(input: &RuleInput<'_>) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.literal_leaf(arg)).collect();
    let description = format!("Concatenate {}", values(&leaves).join(" + "));
    input.function(input.classification.name, leaves, rounding, description)
}

fn date_difference(input: &RuleInput<'_>, unit: DateUnit) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    if args.len() != 2 {
        return input.error(DecodeError::shape(
            input.category_name(),
            "two dates",
            args.len(),
        ));
    }

    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.leaf(arg)).collect();
    let description = format!(
        "Difference in {} between {} and {}",
        unit.as_str(),
        leaves[0].value,
        leaves[1].value
    );
    input.function(input.classification.name, leaves, rounding, description)
}

fn date_addition(input: &RuleInput<'_>) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    if args.len() != 2 {
        return input.error(DecodeError::shape(
            input.category_name(),
            "a date and an offset",
            args.len(),
        ));
    }

    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.leaf(arg)).collect();
    let description = format!("Add {} to {}", leaves[1].value, leaves[0].value);
    input.function(input.classification.name, leaves, rounding, description)
}

fn data_source(input: &RuleInput<'_>) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    let name = input.classification.name;
    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.leaf(arg)).collect();

    let description = match leaves.first() {
        Some(source) => format!("{}: query {}", name, source.value),
        None => name.to_string(),
    };
    input.function(name, leaves, rounding, description)
}

fn call(input: &RuleInput<'_>) -> Node {
    let (args, rounding) = match input.arguments() {
        Ok(parsed) => parsed,
        Err(error) => return input.error(error),
    };
    let name = input.classification.name;
    let leaves: Vec<LeafNode> = args.iter().map(|arg| input.leaf(arg)).collect();

    let description = if leaves.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, values(&leaves).join(", "))
    };
    input.function(name, leaves, rounding, description)
}

fn assignment(input: &RuleInput<'_>) -> Node {
    let args = arguments::operands(&arguments::group_units(input.tokens));

    let (target, value) = match (args.as_slice(), input.instruction.target.as_deref()) {
        ([target, value, ..], _) => (target.as_str(), value.as_str()),
        ([value], Some(target)) => (target, value.as_str()),
        _ => {
            return input.error(DecodeError::shape(
                "Assignment",
                "a target and a value",
                args.len(),
            ))
        }
    };

    let target = input.leaf(target);
    let expr = input.literal_leaf(value);
    let description = format!("Set {} to {}", target.value, expr.value);

    Node::Assignment(AssignmentNode {
        meta: input.node_meta().with_description(description),
        target,
        expr: Box::new(Node::Leaf(expr)),
    })
}

fn ranking_flagging(input: &RuleInput<'_>) -> Node {
    let variables: Vec<String> = arguments::operands(&arguments::group_units(input.tokens))
        .into_iter()
        .filter(|operand| is_variable_token(operand))
        .map(|operand| input.resolve(&operand))
        .collect();

    let name = input.classification.name;
    let value = if variables.is_empty() {
        name.to_string()
    } else {
        format!("{}: {}", name, variables.join(", "))
    };

    Node::Leaf(LeafNode::new(
        input.node_meta().with_description(value.clone()),
        input.instruction.text.as_str(),
        value,
    ))
}

fn listing(input: &RuleInput<'_>, label: &str) -> Node {
    let operands = arguments::operands(&arguments::group_units(input.tokens));
    let value = if operands.is_empty() {
        label.to_string()
    } else {
        format!("{}: {}", label, operands.join(" "))
    };

    Node::Leaf(LeafNode::new(
        input.node_meta().with_description(value.clone()),
        input.instruction.text.as_str(),
        value,
    ))
}

fn unclassified(input: &RuleInput<'_>) -> Node {
    let text = input.instruction.text.as_str();
    let value = match input.context {
        Some(context) => {
            let resolved = describe(text.trim(), context);
            if resolved == text.trim() {
                text.to_string()
            } else {
                resolved
            }
        }
        None => text.to_string(),
    };

    Node::Leaf(LeafNode::new(input.node_meta(), text, value))
}
