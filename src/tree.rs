//! Huffman code tree construction.
//!
//! Nodes live in an arena and refer to their children by index, so walking
//! or dropping a degenerate tree never recurses.

use crate::frequency::FrequencyTable;
use crate::ALPH_SIZE;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub type NodeId = usize;

/// Upper bound on nodes in a tree over the 257-symbol alphabet.
pub const MAX_NODES: usize = 2 * (ALPH_SIZE + 1) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u16 },
    Internal { left: NodeId, right: NodeId },
}

/// Strictly binary prefix-code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    weight: u64,
    order: usize,
    id: NodeId,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (weight, order)
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl CodeTree {
    /// Builds the minimum-weight tree for `freq`.
    ///
    /// Ties on weight go to leaves first (by symbol value), then to internal
    /// nodes in the order they were created. The first node removed from the
    /// queue becomes the left child.
    pub fn build(freq: &FrequencyTable) -> Self {
        let mut nodes = Vec::with_capacity(MAX_NODES);
        let mut heap = BinaryHeap::new();

        for (symbol, weight) in freq.active_symbols() {
            heap.push(QueueEntry {
                weight,
                order: symbol as usize,
                id: nodes.len(),
            });
            nodes.push(Node::Leaf { symbol });
        }

        // Empty input leaves only EOF_SYMBOL; pair it with an unused leaf.
        if heap.len() == 1 {
            heap.push(QueueEntry {
                weight: 0,
                order: 0,
                id: nodes.len(),
            });
            nodes.push(Node::Leaf { symbol: 0 });
        }

        let mut order = ALPH_SIZE + 1;
        loop {
            let left = match heap.pop() {
                Some(entry) => entry,
                None => break,
            };
            let right = match heap.pop() {
                Some(entry) => entry,
                None => {
                    return Self {
                        nodes,
                        root: left.id,
                    }
                }
            };
            heap.push(QueueEntry {
                weight: left.weight + right.weight,
                order,
                id: nodes.len(),
            });
            nodes.push(Node::Internal {
                left: left.id,
                right: right.id,
            });
            order += 1;
        }

        // FrequencyTable always carries EOF_SYMBOL, so the queue is never empty.
        unreachable!("frequency table without EOF_SYMBOL")
    }

    /// Assembles a tree from parts produced by the header reader.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id]
    }

    /// Total number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        deepest
    }
}
