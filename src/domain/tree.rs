//! Lean incremental Merkle tree.
//!
//! A dynamically sized binary Merkle tree holding the group's identity
//! commitments. Unlike a classic IMT there is no zero sentinel: a node
//! without a right sibling is promoted unchanged to the parent level, so
//! the tree always has `⌈log₂(size)⌉` levels above the leaves and proofs
//! skip the promoted levels entirely.

use std::collections::HashSet;
use std::marker::PhantomData;

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::mimc::MimcHash;

/// Hash binding for the tree. Implementations must be identical to the
/// in-circuit hash when the tree backs proof generation.
pub trait LeanIMTHasher {
    fn hash(inputs: &[Fr]) -> Fr;
}

/// Errors from tree operations. A failed operation leaves the tree
/// unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot insert an empty batch of leaves")]
    EmptyBatch,

    #[error("leaf index {index} is out of range for a tree of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("leaves and indices length mismatch ({leaves} != {indices})")]
    LengthMismatch { leaves: usize, indices: usize },

    #[error("duplicated leaf index {0}")]
    DuplicatedIndex(usize),

    #[error("the tree is empty")]
    EmptyTree,
}

/// Membership proof for a single leaf.
///
/// `path[i]` is 0 when the running node is a left child at level `i` and
/// 1 when it is a right child. Levels where the node was a lone last
/// child are skipped, so the proof may be shorter than the tree depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    #[serde(with = "crate::field::decimal")]
    pub node: Fr,
    #[serde(with = "crate::field::decimal")]
    pub root: Fr,
    pub path: Vec<u8>,
    #[serde(with = "crate::field::decimal_seq")]
    pub siblings: Vec<Fr>,
}

/// Lean incremental Merkle tree over BN254 field elements.
///
/// `nodes[0]` holds the leaves in insertion order; `nodes[i + 1]` holds
/// the parents of `nodes[i]`; the last level holds the single root.
#[derive(Debug, Clone, Default)]
pub struct LeanIMT<H: LeanIMTHasher = MimcHash> {
    nodes: Vec<Vec<Fr>>,
    _hasher: PhantomData<H>,
}

/// Tree depth required to hold `leaves` leaves (`⌈log₂(leaves)⌉`).
fn required_depth(leaves: usize) -> usize {
    leaves.next_power_of_two().ilog2() as usize
}

impl<H: LeanIMTHasher> LeanIMT<H> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            _hasher: PhantomData,
        }
    }

    /// Create a tree from an initial batch of leaves. An empty slice
    /// yields an empty tree.
    pub fn with_leaves(leaves: &[Fr]) -> Self {
        let mut tree = Self::new();
        if !leaves.is_empty() {
            tree.insert_many(leaves)
                .expect("a non-empty batch always inserts");
        }
        tree
    }

    /// Number of leaves in the tree.
    pub fn size(&self) -> usize {
        self.nodes.first().map_or(0, Vec::len)
    }

    /// Number of edges from the leaves to the root; 0 when `size() <= 1`.
    pub fn depth(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// The current root, or `None` if no leaf has been inserted.
    pub fn root(&self) -> Option<Fr> {
        if self.size() == 0 {
            return None;
        }
        Some(self.nodes[self.depth()][0])
    }

    /// The leaves in insertion order.
    pub fn leaves(&self) -> &[Fr] {
        self.nodes.first().map_or(&[], Vec::as_slice)
    }

    /// Index of the first leaf equal to `leaf`, if present.
    pub fn index_of(&self, leaf: &Fr) -> Option<usize> {
        self.nodes.first()?.iter().position(|node| node == leaf)
    }

    /// Append a leaf and rebuild the spine up to the root.
    pub fn insert(&mut self, leaf: Fr) {
        let size = self.size();

        // A full tree gets one more level before the climb.
        if self.nodes.is_empty() || required_depth(size + 1) > self.depth() {
            self.nodes.push(Vec::new());
        }

        let mut node = leaf;
        let mut index = size;

        for level in 0..self.depth() {
            if index >= self.nodes[level].len() {
                self.nodes[level].push(node);
            } else {
                self.nodes[level][index] = node;
            }

            // A lone left child keeps its value at the parent level; only
            // a right child hashes with its sibling.
            if index % 2 != 0 {
                let sibling = self.nodes[level][index - 1];
                node = H::hash(&[sibling, node]);
            }

            index /= 2;
        }

        let top = self.depth();
        self.nodes[top] = vec![node];
    }

    /// Append a batch of leaves, then recompute every level bottom-up.
    pub fn insert_many(&mut self, leaves: &[Fr]) -> Result<(), TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::EmptyBatch);
        }

        let target = self.size() + leaves.len();
        if self.nodes.is_empty() {
            self.nodes.push(Vec::new());
        }
        while required_depth(target) > self.depth() {
            self.nodes.push(Vec::new());
        }

        self.nodes[0].extend_from_slice(leaves);

        for level in 0..self.depth() {
            let (lower, upper) = self.nodes.split_at_mut(level + 1);
            let current = &lower[level];
            let next = &mut upper[0];

            for j in (0..current.len()).step_by(2) {
                let parent_index = j / 2;
                let value = if j == current.len() - 1 {
                    current[j]
                } else {
                    H::hash(&[current[j], current[j + 1]])
                };

                if parent_index >= next.len() {
                    next.push(value);
                } else {
                    next[parent_index] = value;
                }
            }
        }

        Ok(())
    }

    /// Overwrite the leaf at `index` and recompute its ancestor spine.
    pub fn update(&mut self, new_leaf: Fr, index: usize) -> Result<(), TreeError> {
        let size = self.size();
        if index >= size {
            return Err(TreeError::IndexOutOfRange { index, size });
        }

        let mut node = new_leaf;
        let mut index = index;

        for level in 0..self.depth() {
            self.nodes[level][index] = node;

            if index % 2 != 0 {
                let sibling = self.nodes[level][index - 1];
                node = H::hash(&[sibling, node]);
            } else if index != self.nodes[level].len() - 1 {
                let sibling = self.nodes[level][index + 1];
                node = H::hash(&[node, sibling]);
            }
            // else: lone last child, promoted unchanged

            index /= 2;
        }

        let top = self.depth();
        self.nodes[top] = vec![node];
        Ok(())
    }

    /// Overwrite a batch of leaves at pairwise-distinct indices, then
    /// recompute exactly the parents whose children changed.
    pub fn update_many(&mut self, leaves: &[Fr], indices: &[usize]) -> Result<(), TreeError> {
        if leaves.len() != indices.len() {
            return Err(TreeError::LengthMismatch {
                leaves: leaves.len(),
                indices: indices.len(),
            });
        }

        // Validate everything before the first write so a failure leaves
        // the tree untouched.
        let size = self.size();
        let mut seen = HashSet::with_capacity(indices.len());
        for &index in indices {
            if index >= size {
                return Err(TreeError::IndexOutOfRange { index, size });
            }
            if !seen.insert(index) {
                return Err(TreeError::DuplicatedIndex(index));
            }
        }

        let mut modified: HashSet<usize> = HashSet::with_capacity(indices.len());
        for (leaf, &index) in leaves.iter().zip(indices) {
            self.nodes[0][index] = *leaf;
            modified.insert(index / 2);
        }

        for level in 1..=self.depth() {
            let mut next_modified = HashSet::with_capacity(modified.len());
            let (lower, upper) = self.nodes.split_at_mut(level);
            let children = &lower[level - 1];
            let parents = &mut upper[0];

            for &parent_index in &modified {
                let j = parent_index * 2;
                parents[parent_index] = if j == children.len() - 1 {
                    children[j]
                } else {
                    H::hash(&[children[j], children[j + 1]])
                };
                next_modified.insert(parent_index / 2);
            }

            modified = next_modified;
        }

        Ok(())
    }

    /// Generate a membership proof for the leaf at `index`.
    pub fn generate_proof(&self, index: usize) -> Result<MerkleProof, TreeError> {
        let size = self.size();
        if size == 0 {
            return Err(TreeError::EmptyTree);
        }
        if index >= size {
            return Err(TreeError::IndexOutOfRange { index, size });
        }

        let node = self.nodes[0][index];
        let mut path = Vec::new();
        let mut siblings = Vec::new();
        let mut index = index;

        for level in 0..self.depth() {
            if index % 2 != 0 {
                path.push(1);
                siblings.push(self.nodes[level][index - 1]);
            } else if index != self.nodes[level].len() - 1 {
                path.push(0);
                siblings.push(self.nodes[level][index + 1]);
            }
            // a lone last child needs no proof entry at this level

            index /= 2;
        }

        Ok(MerkleProof {
            node,
            root: self.nodes[self.depth()][0],
            path,
            siblings,
        })
    }

    /// Check a membership proof against this tree's current root.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        if proof.path.len() != proof.siblings.len() {
            return false;
        }
        if self.root() != Some(proof.root) {
            return false;
        }

        let mut node = proof.node;
        for (bit, sibling) in proof.path.iter().zip(&proof.siblings) {
            node = if *bit == 1 {
                H::hash(&[*sibling, node])
            } else {
                H::hash(&[node, *sibling])
            };
        }

        node == proof.root
    }
}
