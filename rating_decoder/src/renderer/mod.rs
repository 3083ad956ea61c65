//! Natural-language rendering of decoded nodes
//!
//! Rendering reads only the node it is given. The template table is parsed
//! once from the TOML embedded in the binary; a node whose template is
//! missing falls back to its pre-computed description, and failing that to
//! [`NO_TEMPLATE`].

pub mod phrases;

use crate::ast::{JumpNode, JumpTarget, LinkState, Node};
use crate::classifier;
use crate::config::runtime::RendererPreferences;
use crate::log_error;
use crate::logging::codes;
use phrases::{jump_phrase, operator_phrase, rounding_phrase};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const NO_TEMPLATE: &str = "[no template]";

const TEMPLATE_SOURCE: &str = include_str!("templates.toml");

#[derive(Deserialize)]
struct TemplateFile {
    templates: HashMap<String, String>,
}

static TEMPLATES: OnceLock<HashMap<String, String>> = OnceLock::new();

fn templates() -> &'static HashMap<String, String> {
    TEMPLATES.get_or_init(|| match toml::from_str::<TemplateFile>(TEMPLATE_SOURCE) {
        Ok(file) => file.templates,
        Err(error) => {
            log_error!(codes::rendering::TEMPLATE_TABLE_INVALID, "Template table could not be parsed",
                "error" => error
            );
            HashMap::new()
        }
    })
}

/// Sentence for a template id, if the table has one
pub fn template_text(id: &str) -> Option<&'static str> {
    templates().get(id).map(String::as_str)
}

/// Render one node as a sentence. Never fails.
pub fn render(node: &Node) -> String {
    if let Node::Leaf(leaf) = node {
        if let Some(error) = &leaf.error {
            return format!("[could not decode: {}]", error);
        }
    }

    let from_template = node
        .template()
        .and_then(template_text)
        .map(|template| fill(template, &slots(node)));

    match from_template {
        Some(sentence) => sentence.trim_end().to_string(),
        None => fallback(node),
    }
}

/// Render with a `**Label**: ` prefix taken from the instruction name
pub fn render_step(node: &Node) -> String {
    format!("**{}**: {}", classifier::label(node.type_code()), render(node))
}

fn fallback(node: &Node) -> String {
    if let Some(description) = node.description() {
        return description.to_string();
    }
    match node {
        Node::Leaf(leaf) => leaf.value.clone(),
        Node::Jump(jump) => jump_text(jump),
        _ => NO_TEMPLATE.to_string(),
    }
}

fn jump_text(jump: &JumpNode) -> String {
    match jump.state {
        LinkState::Pending | LinkState::DepthLimited => format!("go to Step {}", jump.target),
        LinkState::BackReference => format!("return to Step {}", jump.target),
        LinkState::Unresolved => format!("go to Step {} (missing)", jump.target),
        LinkState::Shared => format!("go to Step {} (as described earlier)", jump.target),
    }
}

/// Replace `{slot}` markers in one left-to-right pass; values are never rescanned
fn fill(template: &str, slots: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match slots.iter().find(|(slot, _)| *slot == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn round_slot(rounding: Option<&str>) -> String {
    rounding
        .map(|code| format!(", then {}", rounding_phrase(code)))
        .unwrap_or_default()
}

/// "A", "A and B", "A, B and C"
fn natural_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Phrase for a condition node
fn condition_phrase(node: &Node) -> String {
    match node {
        Node::Comparison(comparison) => format!(
            "{} {} {}",
            comparison.left.value,
            operator_phrase(&comparison.operator),
            comparison.right.value
        ),
        Node::TypeCheck(check) => format!("{} is {}", check.operand.value, check.kind.phrase()),
        Node::MultiCondition(multi) => {
            let joined = multi
                .conditions
                .iter()
                .map(|condition| match condition {
                    Node::MultiCondition(inner) if !inner.negated && inner.conditions.len() > 1 => {
                        format!("({})", condition_phrase(condition))
                    }
                    other => condition_phrase(other),
                })
                .collect::<Vec<_>>()
                .join(&format!(" {} ", multi.join.phrase()));
            if multi.negated {
                format!("none of ({})", joined)
            } else {
                joined
            }
        }
        other => render(other),
    }
}

fn branch_phrase(target: JumpTarget, branch: &[Node]) -> String {
    match branch {
        [] => jump_phrase(target),
        [Node::Jump(jump)] => jump_text(jump),
        nodes => {
            let content = nodes.iter().map(render).collect::<Vec<_>>().join("; ");
            format!("{} ({})", jump_phrase(target), content)
        }
    }
}

fn slots(node: &Node) -> Vec<(&'static str, String)> {
    let mut slots = vec![(
        "description",
        node.description().unwrap_or_default().to_string(),
    )];

    match node {
        Node::Leaf(leaf) => slots.push(("value", leaf.value.clone())),
        Node::Comparison(comparison) => slots.extend([
            ("left", comparison.left.value.clone()),
            ("op", operator_phrase(&comparison.operator)),
            ("right", comparison.right.value.clone()),
        ]),
        Node::Arithmetic(arithmetic) => slots.extend([
            ("left", arithmetic.left.value.clone()),
            ("op", operator_phrase(&arithmetic.operator)),
            ("right", arithmetic.right.value.clone()),
            ("round", round_slot(arithmetic.rounding.as_deref())),
        ]),
        Node::Function(function) => {
            let args: Vec<&str> = function.args.iter().map(|a| a.value.as_str()).collect();
            slots.extend([
                ("name", function.name.clone()),
                ("args", natural_list(&args)),
                ("round", round_slot(function.rounding.as_deref())),
            ]);
        }
        Node::Assignment(assignment) => slots.extend([
            ("target", assignment.target.value.clone()),
            ("value", render(&assignment.expr)),
        ]),
        Node::Conditional(conditional) => slots.extend([
            ("condition", condition_phrase(&conditional.condition)),
            (
                "then",
                branch_phrase(conditional.true_target, &conditional.true_branch),
            ),
            (
                "else",
                branch_phrase(conditional.false_target, &conditional.false_branch),
            ),
        ]),
        Node::Jump(jump) => slots.push(("target", jump.target.to_string())),
        Node::MultiCondition(multi) => slots.extend([
            ("conditions", condition_phrase(node)),
            ("join", multi.join.phrase().to_string()),
        ]),
        Node::TypeCheck(check) => slots.extend([
            ("operand", check.operand.value.clone()),
            ("kind", check.kind.phrase().to_string()),
        ]),
    }
    slots
}

/// Renderer carrying runtime preferences
pub struct Renderer {
    preferences: RendererPreferences,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_preferences(RendererPreferences::default())
    }

    pub fn with_preferences(preferences: RendererPreferences) -> Self {
        Self { preferences }
    }

    pub fn render_node(&self, node: &Node) -> String {
        if self.preferences.include_step_labels {
            render_step(node)
        } else {
            render(node)
        }
    }

    pub fn render_all(&self, nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(|node| self.render_node(node)).collect()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LeafNode, NodeMeta};
    use crate::decoder::{decode, DecodeError};
    use crate::lexical::tokenize;
    use crate::linker::{link, StepTable};
    use crate::program::Instruction;

    fn decoded(instruction: &Instruction) -> Vec<Node> {
        decode(instruction, &tokenize(&instruction.text).unwrap(), None)
    }

    fn render_one(instruction: Instruction) -> String {
        let nodes = decoded(&instruction);
        assert_eq!(nodes.len(), 1);
        render(&nodes[0])
    }

    #[test]
    fn test_template_table_parses() {
        assert!(template_text(classifier::templates::ARITHMETIC).is_some());
        assert!(template_text(classifier::templates::ASSIGN).is_some());
        assert!(template_text("NOT_A_TEMPLATE").is_none());
    }

    #[test]
    fn test_every_category_template_exists() {
        for def in classifier::table::INSTRUCTIONS {
            if let Some(id) = def.category.template() {
                assert!(template_text(id).is_some(), "missing template {}", id);
            }
        }
    }

    #[test]
    fn test_arithmetic_rounding_phrases() {
        assert_eq!(
            render_one(Instruction::new(1, 0, "GI_84+GC_47!RN")),
            "Compute GI_84 plus GC_47, then round to the nearest whole number"
        );
        assert_eq!(
            render_one(Instruction::new(1, 0, "GI_84*GC_47!RP2")),
            "Compute GI_84 times GC_47, then round up 2 places"
        );
        assert_eq!(
            render_one(Instruction::new(1, 0, "GI_84-GC_47!RM1")),
            "Compute GI_84 minus GC_47, then round down 1 place"
        );
    }

    #[test]
    fn test_conditional_with_sentinels() {
        let sentence = render_one(
            Instruction::new(2, 1, "|GI_494|<>|GC_691|").with_next(Some(-1), Some(-2)),
        );
        assert_eq!(
            sentence,
            "If GI_494 not equal to GC_691, then finish; otherwise exit the loop"
        );
    }

    #[test]
    fn test_linked_branches_are_rendered_inline() {
        let table: StepTable = [
            Instruction::new(2, 1, "|GI_1|=|1|").with_next(Some(3), Some(0)),
            Instruction::new(3, 0, "GI_1+GI_2"),
        ]
        .iter()
        .map(|i| (i.step, decoded(i)))
        .collect();

        let linked = link(&table);
        assert_eq!(
            render(&linked.nodes[0]),
            "If GI_1 equals 1, then go to Step 3 (Compute GI_1 plus GI_2); otherwise continue with the next step"
        );
    }

    #[test]
    fn test_joined_conditions() {
        let sentence = render_one(
            Instruction::new(2, 1, "|GI_1|=|1|&|GI_2|>|2|").with_next(Some(4), None),
        );
        assert_eq!(
            sentence,
            "If GI_1 equals 1 and GI_2 greater than 2, then go to Step 4; otherwise do nothing"
        );
    }

    #[test]
    fn test_mixed_joiners_group_and_before_or() {
        let _ = crate::logging::init_global_logging();
        let sentence = render_one(
            Instruction::new(2, 1, "|GI_1|=|1|&|GI_2|=|2|^|GI_3|>|3|").with_next(Some(4), None),
        );
        assert_eq!(
            sentence,
            "If (GI_1 equals 1 and GI_2 equals 2) or GI_3 greater than 3, then go to Step 4; otherwise do nothing"
        );
    }

    #[test]
    fn test_operand_with_inline_operator() {
        let _ = crate::logging::init_global_logging();
        let nodes = decoded(&Instruction::new(1, 0, "GI_1*GI_2+GI_3!RN"));
        assert!(nodes.iter().all(|n| n.error_leaves().is_empty()));
        assert_eq!(
            render(&nodes[0]),
            "Compute GI_1 times GI_2 plus GI_3, then round to the nearest whole number"
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            render_one(Instruction::new(5, 86, "[FirstName]+[LastName]")),
            "Concatenate FirstName and LastName"
        );
    }

    #[test]
    fn test_unclassified_renders_raw_text() {
        assert_eq!(
            render_one(Instruction::new(9, 4242, "free | text")),
            "free | text"
        );
    }

    #[test]
    fn test_unknown_template_falls_back() {
        let meta = NodeMeta::new(1, 0).with_template(Some("NOT_A_TEMPLATE"));
        let mut node = Node::Leaf(LeafNode::new(meta.clone(), "x", "x"));
        assert_eq!(render(&node), "x");

        node = Node::Jump(JumpNode {
            meta: meta.clone(),
            target: 7,
            state: LinkState::BackReference,
        });
        assert_eq!(render(&node), "return to Step 7");

        node.meta_mut().description = Some("pre-computed".to_string());
        assert_eq!(render(&node), "pre-computed");
    }

    #[test]
    fn test_shared_jump_points_back() {
        let node = Node::Jump(JumpNode {
            meta: NodeMeta::new(4, 1),
            target: 9,
            state: LinkState::Shared,
        });
        assert_eq!(render(&node), "go to Step 9 (as described earlier)");
    }

    #[test]
    fn test_node_without_anything_gets_marker() {
        let node = Node::MultiCondition(crate::ast::MultiConditionNode {
            meta: NodeMeta::new(1, 1).with_template(Some("NOT_A_TEMPLATE")),
            conditions: Vec::new(),
            join: crate::ast::Join::And,
            negated: false,
        });
        assert_eq!(render(&node), NO_TEMPLATE);
    }

    #[test]
    fn test_error_leaf_renders_explanation() {
        let error = DecodeError::shape("Arithmetic", "left operator right", 1);
        let node = Node::Leaf(LeafNode::error(NodeMeta::new(4, 0), "GI_84", error));
        assert_eq!(
            render(&node),
            "[could not decode: Unexpected token shape for Arithmetic: expected left operator right, found 1]"
        );
    }

    #[test]
    fn test_fill_leaves_unknown_slots_and_values_alone() {
        let filled = fill("{a} {missing} {b", &[("a", "{b}".to_string())]);
        assert_eq!(filled, "{b} {missing} {b");
    }

    #[test]
    fn test_step_labels() {
        let nodes = decoded(&Instruction::new(1, 0, "GI_1+GI_2"));
        assert_eq!(render_step(&nodes[0]), "**Arithmetic**: Compute GI_1 plus GI_2");

        let plain = Renderer::with_preferences(RendererPreferences {
            include_step_labels: false,
        });
        assert_eq!(plain.render_node(&nodes[0]), "Compute GI_1 plus GI_2");
    }
}
