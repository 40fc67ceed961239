//! Poseidon over the BN254 scalar field, Circom-compatible configuration.
//!
//! Secondary hash binding for off-chain tooling only: there is no
//! in-circuit counterpart here, so a group that must generate proofs
//! always binds MiMC.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

use crate::domain::tree::LeanIMTHasher;

/// Poseidon hash of up to 12 field elements.
pub fn poseidon_hash(inputs: &[Fr]) -> Fr {
    Poseidon::<Fr>::new_circom(inputs.len())
        .expect("Failed to create Poseidon hasher")
        .hash(inputs)
        .expect("Failed to compute Poseidon hash")
}

/// Poseidon hasher for the lean incremental Merkle tree.
#[derive(Debug, Default, Clone)]
pub struct PoseidonHash;

impl LeanIMTHasher for PoseidonHash {
    fn hash(inputs: &[Fr]) -> Fr {
        poseidon_hash(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_eq!(poseidon_hash(&[a, b]), poseidon_hash(&[a, b]));
    }

    #[test]
    fn hash_order_matters() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_ne!(poseidon_hash(&[a, b]), poseidon_hash(&[b, a]));
    }
}
