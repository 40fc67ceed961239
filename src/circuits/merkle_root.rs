//! Dynamic-depth binary Merkle root gadget.
//!
//! One fixed-capacity circuit handles every proof length `0..=MAX_DEPTH`:
//! the hash chain runs unconditionally over all levels, and the output is
//! the node selected at the declared depth. Upper levels beyond the real
//! proof hash padding siblings, but the depth selector masks their
//! contribution out. An out-of-range depth zeroes every selector, so the
//! output can never match a real tree root.
//!
//! The tree's promotion rule never reaches the circuit: callers pad a
//! suppressed level with `sibling = 0, index = 0` and the declared depth
//! masks the padding.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use super::mimc;

/// Maximum number of proof levels the circuit supports (2^10 members).
pub const MAX_DEPTH: usize = 10;

/// Recompute a Merkle root from `(leaf, depth, path bits, siblings)`.
///
/// `path` and `siblings` must both hold exactly `MAX_DEPTH` entries;
/// `depth` declares how many of them are real.
pub fn binary_merkle_root(
    leaf: &FpVar<Fr>,
    depth: &FpVar<Fr>,
    path: &[Boolean<Fr>],
    siblings: &[FpVar<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    if path.len() != MAX_DEPTH || siblings.len() != MAX_DEPTH {
        return Err(SynthesisError::Unsatisfiable);
    }

    let mut node = leaf.clone();
    let mut root = FpVar::zero();

    for i in 0..MAX_DEPTH {
        let is_depth = depth.is_eq(&FpVar::constant(Fr::from(i as u64)))?;
        root += FpVar::from(is_depth) * &node;

        // path bit 1: the running node is a right child
        let left = path[i].select(&siblings[i], &node)?;
        let right = path[i].select(&node, &siblings[i])?;
        node = mimc::hash_var(&[left, right])?;
    }

    let is_depth = depth.is_eq(&FpVar::constant(Fr::from(MAX_DEPTH as u64)))?;
    root += FpVar::from(is_depth) * &node;

    Ok(root)
}

#[cfg(test)]
mod tests {
    use ark_relations::r1cs::ConstraintSystem;

    use super::*;
    use crate::crypto::mimc::MimcHash;
    use crate::domain::tree::{LeanIMT, MerkleProof};

    fn evaluate(proof: &MerkleProof) -> Fr {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let leaf = FpVar::new_witness(cs.clone(), || Ok(proof.node)).unwrap();
        let depth =
            FpVar::new_witness(cs.clone(), || Ok(Fr::from(proof.path.len() as u64))).unwrap();

        let mut path = Vec::with_capacity(MAX_DEPTH);
        let mut siblings = Vec::with_capacity(MAX_DEPTH);
        for i in 0..MAX_DEPTH {
            let bit = proof.path.get(i).is_some_and(|b| *b == 1);
            path.push(Boolean::new_witness(cs.clone(), || Ok(bit)).unwrap());
            let sibling = proof.siblings.get(i).copied().unwrap_or_default();
            siblings.push(FpVar::new_witness(cs.clone(), || Ok(sibling)).unwrap());
        }

        let root = binary_merkle_root(&leaf, &depth, &path, &siblings).unwrap();
        assert!(cs.is_satisfied().unwrap());
        root.value().unwrap()
    }

    #[test]
    fn recomputes_the_root_for_every_leaf() {
        for n in 1..=8u64 {
            let tree: LeanIMT<MimcHash> = LeanIMT::with_leaves(
                &(0..n).map(|i| Fr::from(100 + i)).collect::<Vec<_>>(),
            );
            for index in 0..n as usize {
                let proof = tree.generate_proof(index).unwrap();
                assert_eq!(Some(evaluate(&proof)), tree.root(), "size {n} index {index}");
            }
        }
    }

    #[test]
    fn depth_zero_returns_the_leaf() {
        let proof = MerkleProof {
            node: Fr::from(42u64),
            root: Fr::from(42u64),
            path: vec![],
            siblings: vec![],
        };
        assert_eq!(evaluate(&proof), Fr::from(42u64));
    }
}
