use crate::ast::Node;
use std::collections::BTreeMap;

/// Decoded nodes of every step in one algorithm, ordered by step number
#[derive(Debug, Clone, Default)]
pub struct StepTable {
    steps: BTreeMap<u32, Vec<Node>>,
}

impl StepTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step's nodes. A repeated step number appends to the earlier entry.
    pub fn insert(&mut self, step: u32, nodes: Vec<Node>) {
        self.steps.entry(step).or_default().extend(nodes);
    }

    pub fn get(&self, step: u32) -> Option<&[Node]> {
        self.steps.get(&step).map(Vec::as_slice)
    }

    pub fn contains(&self, step: u32) -> bool {
        self.steps.contains_key(&step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Node])> {
        self.steps.iter().map(|(step, nodes)| (*step, nodes.as_slice()))
    }

    /// Total node count across every step
    pub fn node_count(&self) -> usize {
        self.steps.values().flatten().map(Node::size).sum()
    }
}

impl FromIterator<(u32, Vec<Node>)> for StepTable {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<Node>)>>(iter: I) -> Self {
        let mut table = StepTable::new();
        for (step, nodes) in iter {
            table.insert(step, nodes);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LeafNode, NodeMeta};

    fn leaf(step: u32, text: &str) -> Node {
        Node::Leaf(LeafNode::new(NodeMeta::new(step, 0), text, text))
    }

    #[test]
    fn test_steps_are_ordered_and_merged() {
        let table: StepTable = vec![
            (5, vec![leaf(5, "five")]),
            (1, vec![leaf(1, "one")]),
            (5, vec![leaf(5, "again")]),
        ]
        .into_iter()
        .collect();

        let order: Vec<u32> = table.iter().map(|(step, _)| step).collect();
        assert_eq!(order, vec![1, 5]);
        assert_eq!(table.get(5).map(<[Node]>::len), Some(2));
        assert!(table.contains(1));
        assert!(!table.contains(2));
        assert_eq!(table.node_count(), 3);
    }
}
