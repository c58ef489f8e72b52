use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    errors::{Error, Result},
    freq::FrequencyTable,
};

/// Index of a node in a [`CodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    /// The symbol, for leaves. Zero for internal nodes.
    value: u8,
    /// Sum of the counts of all leaves below (or at) this node.
    weight: u64,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// A binary prefix-code tree. Going left is a `0` bit, going right is a `1`.
///
/// Nodes live in an arena and refer to their children by index. A node is
/// only ever pushed after both of its children, so the root is always the
/// last node.
#[derive(Debug, Clone)]
pub struct CodeTree {
    nodes: Vec<Node>,
}

impl CodeTree {
    /// Build the tree for a frequency table.
    ///
    /// Repeatedly merges the two lightest nodes. Ties are broken by arena
    /// index: leaves are created in ascending byte order, and each merged node
    /// is created after every node that existed when it was queued. So among
    /// equal weights, lower byte values pop first and merged nodes pop last.
    /// The first node popped becomes the left child.
    ///
    /// Decompression calls this on the table read back from the header, so
    /// the rule only has to agree with itself.
    pub fn build(freq: &FrequencyTable) -> Result<Self> {
        let mut tree = CodeTree { nodes: vec![] };
        let mut queue = BinaryHeap::new();

        for (value, weight) in freq.iter() {
            let id = tree.push(Node {
                value,
                weight,
                left: None,
                right: None,
            });
            queue.push(Reverse((weight, id)));
        }

        match queue.len() {
            0 => return Err(Error::EmptyInput),
            1 => {
                // A lone leaf can't be the root: its code would be zero bits
                // long. Hang it off the left of a dummy root instead.
                let leaf = tree.root();
                let weight = tree.weight(leaf);
                tree.push(Node {
                    value: 0,
                    weight,
                    left: Some(leaf),
                    right: None,
                });
            }
            _ => {
                while queue.len() > 1 {
                    let (Some(Reverse((w1, n1))), Some(Reverse((w2, n2)))) = (queue.pop(), queue.pop())
                    else {
                        unreachable!("queue holds at least two nodes");
                    };

                    let weight = w1.saturating_add(w2);
                    let id = tree.push(Node {
                        value: 0,
                        weight,
                        left: Some(n1),
                        right: Some(n2),
                    });
                    queue.push(Reverse((weight, id)));
                }
            }
        }

        log::debug!(
            "built code tree: {} symbols, {} nodes",
            freq.distinct(),
            tree.nodes.len()
        );

        Ok(tree)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn root(&self) -> NodeId {
        NodeId(self.nodes.len() - 1)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].right
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        node.left.is_none() && node.right.is_none()
    }

    pub fn value(&self, id: NodeId) -> u8 {
        self.nodes[id.0].value
    }

    pub fn weight(&self, id: NodeId) -> u64 {
        self.nodes[id.0].weight
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Follow one bit down from `id`.
    ///
    /// A `1` goes right if there is a right child; anything else goes left if
    /// there is a left child. A leaf stays put.
    pub fn descend(&self, id: NodeId, bit: bool) -> NodeId {
        let node = &self.nodes[id.0];
        match (bit, node.right, node.left) {
            (true, Some(right), _) => right,
            (_, _, Some(left)) => left,
            _ => id,
        }
    }
}
