use bitvec::prelude::*;

use crate::{
    freq::{FrequencyTable, SYMBOLS},
    tree::{CodeTree, NodeId},
};

/// A single symbol's code, first bit first.
pub type Code = BitVec<u8, Lsb0>;

/// The code for every byte value that appears in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk the tree in preorder, recording the path to each leaf.
    pub fn build(tree: &CodeTree) -> Self {
        let mut table = Self {
            codes: vec![None; SYMBOLS],
        };
        let mut path = Code::new();
        table.visit(tree, tree.root(), &mut path);
        table
    }

    fn visit(&mut self, tree: &CodeTree, id: NodeId, path: &mut Code) {
        if tree.is_leaf(id) {
            self.codes[tree.value(id) as usize] = Some(path.clone());
        }
        if let Some(left) = tree.left(id) {
            path.push(false);
            self.visit(tree, left, path);
            path.pop();
        }
        if let Some(right) = tree.right(id) {
            path.push(true);
            self.visit(tree, right, path);
            path.pop();
        }
    }

    pub fn get(&self, byte: u8) -> Option<&BitSlice<u8, Lsb0>> {
        self.codes[byte as usize].as_deref()
    }

    /// Populated entries, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Lsb0>)> {
        (0..=u8::MAX).filter_map(|b| self.get(b).map(|code| (b, code)))
    }

    /// Exact number of bits needed to encode an input with these counts.
    ///
    /// Symbols without a code contribute nothing.
    pub fn encoded_len(&self, freq: &FrequencyTable) -> u64 {
        freq.iter()
            .filter_map(|(b, count)| self.get(b).map(|code| code.len() as u64 * count))
            .sum()
    }
}

/// Render a code as a string of `0` and `1` digits.
pub fn bits_to_string(code: &BitSlice<u8, Lsb0>) -> String {
    code.iter().map(|bit| if *bit { '1' } else { '0' }).collect()
}
