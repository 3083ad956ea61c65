//! Syntax tree produced by the decoder and completed by the linker

pub mod nodes;

pub use nodes::{
    ArithmeticNode, AssignmentNode, ComparisonNode, ConditionalNode, FunctionNode, Join,
    JumpNode, JumpTarget, LeafNode, LinkState, MultiConditionNode, Node, NodeMeta, TypeCheckKind,
    TypeCheckNode,
};
