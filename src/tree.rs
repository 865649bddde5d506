//! Huffman tree construction and code assignment.
//!
//! The tree lives in a flat arena. Leaves hold an index into the
//! [`Alphabet`] that owns the symbol data; internal nodes hold only the
//! aggregate weight and the arena indices of their children. The tree is
//! only needed to derive code lengths and is dropped once codes have been
//! copied into the alphabet.

use crate::alphabet::Alphabet;
use crate::bitbuf::BitBuffer;
use crate::pqueue::MinHeap;
use crate::{try_reserve, HuffError, HuffResult};

/// Queue ordering: weight first, then rank. Leaves rank by byte value
/// (0-255); merged nodes rank above every leaf, in creation order.
type NodeKey = (u64, u32);

const MERGED_RANK_BASE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Leaf { entry: usize },
    Internal { weight: u64, left: usize, right: usize },
}

/// A Huffman tree over an alphabet.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a Huffman tree by repeatedly merging the two lightest nodes.
    ///
    /// Fails with [`HuffError::TreeConstructionFailed`] on an empty
    /// alphabet.
    pub fn build(alphabet: &Alphabet) -> HuffResult<Self> {
        let n = alphabet.len();
        if n == 0 {
            return Err(HuffError::TreeConstructionFailed);
        }

        let mut nodes: Vec<Node> = Vec::new();
        try_reserve(&mut nodes, 2 * n - 1)?;
        let mut heap: MinHeap<NodeKey, usize> = MinHeap::with_capacity(n);

        for (i, entry) in alphabet.iter().enumerate() {
            nodes.push(Node::Leaf { entry: i });
            heap.push((entry.frequency, entry.symbol as u32), i);
        }

        let mut merged = 0u32;
        while heap.len() > 1 {
            let left = heap.pop().ok_or(HuffError::TreeConstructionFailed)?;
            let right = heap.pop().ok_or(HuffError::TreeConstructionFailed)?;
            let weight = node_weight(&nodes, alphabet, left)
                .checked_add(node_weight(&nodes, alphabet, right))
                .ok_or(HuffError::TreeConstructionFailed)?;

            let idx = nodes.len();
            nodes.push(Node::Internal {
                weight,
                left,
                right,
            });
            heap.push((weight, MERGED_RANK_BASE + merged), idx);
            merged += 1;
        }

        let root = heap.pop().ok_or(HuffError::TreeConstructionFailed)?;
        Ok(HuffmanTree { nodes, root })
    }

    #[cfg(test)]
    fn weight(&self, alphabet: &Alphabet) -> u64 {
        node_weight(&self.nodes, alphabet, self.root)
    }

    #[cfg(test)]
    fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Copy each leaf's root-to-leaf path into its alphabet entry:
    /// bit 0 for a left step, bit 1 for a right step.
    ///
    /// A root that is itself a leaf gets the 1-bit code `0`, since a
    /// zero-length code cannot be described by the header.
    pub fn assign_codes(&self, alphabet: &mut Alphabet) -> HuffResult<()> {
        if let Node::Leaf { entry } = self.nodes[self.root] {
            let entry = alphabet
                .entries_mut()
                .get_mut(entry)
                .ok_or(HuffError::TreeConstructionFailed)?;
            entry.code = BitBuffer::zeros(1);
            return Ok(());
        }

        let mut path = BitBuffer::with_capacity(alphabet.len());
        self.walk(self.root, &mut path, alphabet)
    }

    fn walk(&self, idx: usize, path: &mut BitBuffer, alphabet: &mut Alphabet) -> HuffResult<()> {
        match self.nodes[idx] {
            Node::Leaf { entry } => {
                let entry = alphabet
                    .entries_mut()
                    .get_mut(entry)
                    .ok_or(HuffError::TreeConstructionFailed)?;
                entry.code = path.clone();
                log::trace!("symbol {:#04x} -> {}", entry.symbol, entry.code);
            }
            Node::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path, alphabet)?;
                path.pop();

                path.push(true);
                self.walk(right, path, alphabet)?;
                path.pop();
            }
        }
        Ok(())
    }
}

fn node_weight(nodes: &[Node], alphabet: &Alphabet, idx: usize) -> u64 {
    match nodes[idx] {
        Node::Leaf { entry } => alphabet.entries()[entry].frequency,
        Node::Internal { weight, .. } => weight,
    }
}

/// Build the tree for `alphabet`, assign every entry its Huffman code and
/// drop the tree.
pub fn generate_codes(alphabet: &mut Alphabet) -> HuffResult<()> {
    let tree = HuffmanTree::build(alphabet)?;
    tree.assign_codes(alphabet)
}
