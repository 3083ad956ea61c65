//! Control-flow linker
//!
//! Runs after every step of an algorithm has been decoded. Pending jump
//! placeholders in conditional branches are replaced by a linked copy of the
//! target step's nodes. A visited path per branch chain stops cycles.
//!
//! Each step is spliced at most once per algorithm; later jumps to it become
//! `Shared` markers, so the linked output grows with the step table rather
//! than with the number of paths through it. The link depth and a per-step
//! expansion budget bound any single top-level tree.

mod step_table;

pub use step_table::StepTable;

use crate::ast::{ConditionalNode, JumpNode, LinkState, Node};
use crate::config::compile_time::linker::{MAX_EXPANDED_NODES, MAX_LINK_DEPTH};
use crate::config::runtime::LinkerPreferences;
use crate::decoder::DecodeError;
use crate::logging::codes;
use crate::{log_debug, log_success, log_warning};
use serde::Serialize;
use std::collections::BTreeSet;

/// Link issues, returned as data
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    /// Distinct unresolved and cyclic jumps
    pub issues: Vec<DecodeError>,
    pub spliced: usize,
    pub back_references: usize,
    pub unresolved: usize,
    pub depth_limited: usize,
    /// Jumps to a step already spliced elsewhere
    pub shared: usize,
    pub expanded_nodes: usize,
}

impl LinkReport {
    fn record(&mut self, issue: DecodeError) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.depth_limited == 0
    }
}

/// Top-level nodes of every step with their branches linked
#[derive(Debug, Clone, Serialize)]
pub struct LinkedAlgorithm {
    pub nodes: Vec<Node>,
    pub report: LinkReport,
}

/// Link a decoded step table with default preferences
pub fn link(table: &StepTable) -> LinkedAlgorithm {
    Linker::new().link(table)
}

pub struct Linker {
    preferences: LinkerPreferences,
    expansion_budget: usize,
}

impl Linker {
    pub fn new() -> Self {
        Self::with_preferences(LinkerPreferences::default())
    }

    pub fn with_preferences(preferences: LinkerPreferences) -> Self {
        Self {
            preferences,
            expansion_budget: MAX_EXPANDED_NODES,
        }
    }

    /// Nodes one top-level step may splice into its branches
    pub fn with_expansion_budget(mut self, budget: usize) -> Self {
        self.expansion_budget = budget.min(MAX_EXPANDED_NODES);
        self
    }

    pub fn link(&self, table: &StepTable) -> LinkedAlgorithm {
        let mut walk = LinkWalk {
            table,
            preferences: &self.preferences,
            report: LinkReport::default(),
            expanded: BTreeSet::new(),
            budget: 0,
        };

        let mut nodes = Vec::new();
        for (step, step_nodes) in table.iter() {
            walk.budget = self.expansion_budget;
            let mut path = vec![step];
            for node in step_nodes {
                nodes.push(walk.link_node(node, &mut path));
            }
        }

        let report = walk.report;
        log_success!(codes::success::LINKING_COMPLETE, "Algorithm linked",
            "steps" => table.len(),
            "spliced" => report.spliced,
            "shared" => report.shared,
            "issues" => report.issues.len()
        );

        LinkedAlgorithm { nodes, report }
    }
}

impl Default for Linker {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one `link` call; dropped when the call returns
struct LinkWalk<'a> {
    table: &'a StepTable,
    preferences: &'a LinkerPreferences,
    report: LinkReport,
    /// Steps already spliced somewhere in this algorithm
    expanded: BTreeSet<u32>,
    /// Nodes the current top-level step may still splice
    budget: usize,
}

impl LinkWalk<'_> {
    fn link_node(&mut self, node: &Node, path: &mut Vec<u32>) -> Node {
        match node {
            Node::Conditional(conditional) => Node::Conditional(ConditionalNode {
                meta: conditional.meta.clone(),
                condition: conditional.condition.clone(),
                true_target: conditional.true_target,
                false_target: conditional.false_target,
                true_branch: self.link_branch(&conditional.true_branch, path),
                false_branch: self.link_branch(&conditional.false_branch, path),
            }),
            other => other.clone(),
        }
    }

    fn link_branch(&mut self, branch: &[Node], path: &mut Vec<u32>) -> Vec<Node> {
        let mut linked = Vec::with_capacity(branch.len());
        for node in branch {
            match node {
                Node::Jump(jump) if jump.state == LinkState::Pending => {
                    linked.extend(self.resolve(jump, path))
                }
                other => linked.push(self.link_node(other, path)),
            }
        }
        linked
    }

    fn resolve(&mut self, jump: &JumpNode, path: &mut Vec<u32>) -> Vec<Node> {
        let from = jump.meta.step;
        let target = jump.target;

        if path.contains(&target) {
            self.report.back_references += 1;
            self.report.record(DecodeError::CyclicJump { from, target });
            return vec![marker(jump, LinkState::BackReference)];
        }

        let Some(nodes) = self.table.get(target) else {
            self.report.unresolved += 1;
            self.report.record(DecodeError::UnresolvedJumpTarget { from, target });
            if self.preferences.warn_on_unresolved {
                log_warning!(code = codes::linking::UNRESOLVED_JUMP_TARGET, "Jump target does not exist",
                    "from" => from,
                    "target" => target
                );
            }
            return vec![marker(jump, LinkState::Unresolved)];
        };

        if self.expanded.contains(&target) {
            self.report.shared += 1;
            return vec![marker(jump, LinkState::Shared)];
        }

        if path.len() >= MAX_LINK_DEPTH {
            return vec![self.limited(jump, codes::linking::LINK_DEPTH_EXCEEDED)];
        }

        // Nested splices charge their own content, so the sum is the emitted size
        let size: usize = nodes.iter().map(Node::size).sum();
        if size > self.budget {
            return vec![self.limited(jump, codes::linking::EXPANSION_LIMIT_EXCEEDED)];
        }
        self.budget -= size;
        self.report.expanded_nodes += size;
        self.report.spliced += 1;
        self.expanded.insert(target);

        if self.preferences.log_link_details {
            log_debug!("Splicing branch", "from" => from, "target" => target, "depth" => path.len());
        }

        path.push(target);
        let linked = nodes.iter().map(|node| self.link_node(node, path)).collect();
        path.pop();
        linked
    }

    fn limited(&mut self, jump: &JumpNode, code: crate::logging::Code) -> Node {
        self.report.depth_limited += 1;
        // Only the first cut-off is worth a warning
        if self.report.depth_limited == 1 {
            log_warning!(code = code, "Branch expansion stopped",
                "from" => jump.meta.step,
                "target" => jump.target
            );
        }
        marker(jump, LinkState::DepthLimited)
    }
}

fn marker(jump: &JumpNode, state: LinkState) -> Node {
    Node::Jump(JumpNode {
        meta: jump.meta.clone(),
        target: jump.target,
        state,
    })
}
