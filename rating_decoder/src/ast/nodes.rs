//! Node definitions for decoded instructions
//!
//! Every node carries a [`NodeMeta`] with the step number and type code of
//! the instruction it came from, so nodes produced by splitting one
//! instruction, or spliced into another step's branch by the linker, still
//! report their origin. All nodes serialize with serde for the JSON report.

use crate::decoder::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

// === SHARED METADATA ===

/// Origin and render information shared by every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub step: u32,
    pub type_code: i32,
    /// Render-template identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Sentence pre-computed by the decoder, used when no template applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeMeta {
    pub fn new(step: u32, type_code: i32) -> Self {
        Self {
            step,
            type_code,
            template: None,
            description: None,
        }
    }

    pub fn with_template(mut self, template: Option<&str>) -> Self {
        self.template = template.map(str::to_string);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// === ENUMERATIONS ===

/// Boolean join of a multi-condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Join {
    And,
    Or,
}

impl Join {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Join::And => "AND",
            Join::Or => "OR",
        }
    }

    pub const fn phrase(&self) -> &'static str {
        match self {
            Join::And => "and",
            Join::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCheckKind {
    Date,
    Numeric,
    Alphabetic,
}

impl TypeCheckKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TypeCheckKind::Date => "date",
            TypeCheckKind::Numeric => "numeric",
            TypeCheckKind::Alphabetic => "alphabetic",
        }
    }

    pub const fn phrase(&self) -> &'static str {
        match self {
            TypeCheckKind::Date => "a valid date",
            TypeCheckKind::Numeric => "numeric",
            TypeCheckKind::Alphabetic => "alphabetic",
        }
    }
}

/// Decoded next-step reference of a branching instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpTarget {
    /// `-2`
    ExitLoop,
    /// `-1`
    Done,
    /// `0`: fall through to the following step
    NextStep,
    Step(u32),
    /// Absent, unparseable or any other negative value
    NoBranch,
}

impl JumpTarget {
    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(-2) => JumpTarget::ExitLoop,
            Some(-1) => JumpTarget::Done,
            Some(0) => JumpTarget::NextStep,
            Some(n) if n > 0 => u32::try_from(n).map_or(JumpTarget::NoBranch, JumpTarget::Step),
            _ => JumpTarget::NoBranch,
        }
    }

    /// Explicit step number, if this target names one
    pub fn step(&self) -> Option<u32> {
        match self {
            JumpTarget::Step(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.step().is_none()
    }
}

/// Link status of a jump placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkState {
    /// Not yet visited by the linker
    Pending,
    /// Target already on the current branch path; not expanded again
    BackReference,
    /// Target step missing from the step table
    Unresolved,
    /// Branch path reached the maximum link depth or expansion budget
    DepthLimited,
    /// Target already spliced into an earlier branch of the same algorithm
    Shared,
}

// === NODE VARIANTS ===

/// Text operand; an error leaf carries the failure that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub meta: NodeMeta,
    pub raw: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DecodeError>,
}

impl LeafNode {
    pub fn new(meta: NodeMeta, raw: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            meta,
            raw: raw.into(),
            value: value.into(),
            error: None,
        }
    }

    /// Leaf whose display value is the failure description
    pub fn error(meta: NodeMeta, raw: impl Into<String>, error: DecodeError) -> Self {
        Self {
            meta,
            raw: raw.into(),
            value: error.to_string(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonNode {
    pub meta: NodeMeta,
    pub left: LeafNode,
    pub operator: String,
    pub right: LeafNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticNode {
    pub meta: NodeMeta,
    pub left: LeafNode,
    pub operator: String,
    pub right: LeafNode,
    /// Rounding code without its `!` marker, e.g. `RN` or `RP2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub meta: NodeMeta,
    pub name: String,
    pub args: Vec<LeafNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentNode {
    pub meta: NodeMeta,
    pub target: LeafNode,
    pub expr: Box<Node>,
}

/// Two-way branch. The decoder records the raw targets and, for explicit
/// step targets, a pending jump in the branch; the linker splices content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalNode {
    pub meta: NodeMeta,
    pub condition: Box<Node>,
    pub true_target: JumpTarget,
    pub false_target: JumpTarget,
    pub true_branch: Vec<Node>,
    pub false_branch: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpNode {
    pub meta: NodeMeta,
    pub target: u32,
    pub state: LinkState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiConditionNode {
    pub meta: NodeMeta,
    pub conditions: Vec<Node>,
    pub join: Join,
    /// "None of" quantified conditions
    #[serde(default)]
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCheckNode {
    pub meta: NodeMeta,
    pub operand: LeafNode,
    pub kind: TypeCheckKind,
}

/// Syntax-tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Leaf(LeafNode),
    Comparison(ComparisonNode),
    Arithmetic(ArithmeticNode),
    Function(FunctionNode),
    Assignment(AssignmentNode),
    Conditional(ConditionalNode),
    Jump(JumpNode),
    MultiCondition(MultiConditionNode),
    TypeCheck(TypeCheckNode),
}

impl Node {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Node::Leaf(n) => &n.meta,
            Node::Comparison(n) => &n.meta,
            Node::Arithmetic(n) => &n.meta,
            Node::Function(n) => &n.meta,
            Node::Assignment(n) => &n.meta,
            Node::Conditional(n) => &n.meta,
            Node::Jump(n) => &n.meta,
            Node::MultiCondition(n) => &n.meta,
            Node::TypeCheck(n) => &n.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Node::Leaf(n) => &mut n.meta,
            Node::Comparison(n) => &mut n.meta,
            Node::Arithmetic(n) => &mut n.meta,
            Node::Function(n) => &mut n.meta,
            Node::Assignment(n) => &mut n.meta,
            Node::Conditional(n) => &mut n.meta,
            Node::Jump(n) => &mut n.meta,
            Node::MultiCondition(n) => &mut n.meta,
            Node::TypeCheck(n) => &mut n.meta,
        }
    }

    pub fn step(&self) -> u32 {
        self.meta().step
    }

    pub fn type_code(&self) -> i32 {
        self.meta().type_code
    }

    pub fn template(&self) -> Option<&str> {
        self.meta().template.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "leaf",
            Node::Comparison(_) => "comparison",
            Node::Arithmetic(_) => "arithmetic",
            Node::Function(_) => "function",
            Node::Assignment(_) => "assignment",
            Node::Conditional(_) => "conditional",
            Node::Jump(_) => "jump",
            Node::MultiCondition(_) => "multi_condition",
            Node::TypeCheck(_) => "type_check",
        }
    }

    /// True for a leaf produced by a failed decode
    pub fn is_error(&self) -> bool {
        matches!(self, Node::Leaf(leaf) if leaf.is_error())
    }

    /// Visit this node and every node beneath it, depth first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        match self {
            Node::Assignment(n) => n.expr.walk(visit),
            Node::Conditional(n) => {
                n.condition.walk(visit);
                for child in n.true_branch.iter().chain(&n.false_branch) {
                    child.walk(visit);
                }
            }
            Node::MultiCondition(n) => {
                for child in &n.conditions {
                    child.walk(visit);
                }
            }
            Node::Leaf(_)
            | Node::Comparison(_)
            | Node::Arithmetic(_)
            | Node::Function(_)
            | Node::Jump(_)
            | Node::TypeCheck(_) => {}
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Every leaf in this subtree that carries a decode error
    pub fn error_leaves(&self) -> Vec<&LeafNode> {
        let mut errors = Vec::new();
        self.walk(&mut |node| match node {
            Node::Leaf(leaf) if leaf.is_error() => errors.push(leaf),
            Node::Comparison(n) => {
                errors.extend([&n.left, &n.right].into_iter().filter(|l| l.is_error()))
            }
            Node::Arithmetic(n) => {
                errors.extend([&n.left, &n.right].into_iter().filter(|l| l.is_error()))
            }
            Node::Function(n) => errors.extend(n.args.iter().filter(|l| l.is_error())),
            Node::Assignment(n) if n.target.is_error() => errors.push(&n.target),
            Node::TypeCheck(n) if n.operand.is_error() => errors.push(&n.operand),
            _ => {}
        });
        errors
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (step {})", self.kind_name(), self.step())
    }
}

impl From<LeafNode> for Node {
    fn from(leaf: LeafNode) -> Self {
        Node::Leaf(leaf)
    }
}
