//! Pre-order bit encoding of the code tree.
//!
//! Internal node: a `0` bit, then the left subtree, then the right subtree.
//! Leaf: a `1` bit, then the symbol in `BITS_PER_WORD + 1` bits.

use crate::bitio::{BitSink, BitSource};
use crate::error::HuffError;
use crate::tree::{CodeTree, Node, NodeId, MAX_NODES};
use crate::{BITS_PER_WORD, EOF_SYMBOL};
use std::io;

pub fn write_tree<W: BitSink>(tree: &CodeTree, out: &mut W) -> io::Result<()> {
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        match tree.node(id) {
            Node::Internal { left, right } => {
                out.write_bits(1, 0)?;
                stack.push(right);
                stack.push(left);
            }
            Node::Leaf { symbol } => {
                out.write_bits(1, 1)?;
                out.write_bits(BITS_PER_WORD + 1, u32::from(symbol))?;
            }
        }
    }
    Ok(())
}

fn attach(nodes: &mut [Node], parent: NodeId, child: NodeId, as_left: bool) {
    if let Node::Internal { left, right } = &mut nodes[parent] {
        if as_left {
            *left = child;
        } else {
            *right = child;
        }
    }
}

pub fn read_tree<R: BitSource>(input: &mut R) -> Result<CodeTree, HuffError> {
    let mut nodes: Vec<Node> = Vec::new();
    // internal nodes still waiting for children, with "left filled" flag
    let mut pending: Vec<(NodeId, bool)> = Vec::new();

    loop {
        if nodes.len() == MAX_NODES {
            return Err(HuffError::MalformedTree(format!(
                "more than {} nodes",
                MAX_NODES
            )));
        }

        let tag = input
            .read_bits(1)?
            .ok_or(HuffError::Truncated { context: "tree header" })?;

        if tag == 0 {
            pending.push((nodes.len(), false));
            nodes.push(Node::Internal { left: 0, right: 0 });
            continue;
        }

        let value = input
            .read_bits(BITS_PER_WORD + 1)?
            .ok_or(HuffError::Truncated { context: "tree header" })?;
        if value > u32::from(EOF_SYMBOL) {
            return Err(HuffError::InvalidSymbol(value));
        }
        if nodes.is_empty() {
            return Err(HuffError::MalformedTree("root is a leaf".into()));
        }

        let mut done = nodes.len();
        nodes.push(Node::Leaf {
            symbol: value as u16,
        });

        // hang the finished subtree on its parent, closing parents as they fill
        loop {
            match pending.last_mut() {
                None => return Ok(CodeTree::from_parts(nodes, done)),
                Some((parent, left_filled)) if !*left_filled => {
                    *left_filled = true;
                    let parent = *parent;
                    attach(&mut nodes, parent, done, true);
                    break;
                }
                Some((parent, _)) => {
                    let parent = *parent;
                    attach(&mut nodes, parent, done, false);
                    pending.pop();
                    done = parent;
                }
            }
        }
    }
}
