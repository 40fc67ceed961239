//! MiMC sponge over the BN254 scalar field.
//!
//! This is the default hash binding: the off-circuit image of the
//! in-circuit gadget in `circuits::mimc`. The construction matches the
//! gnark-crypto BN254 MiMC: 110 rounds of `x ← (x + h + c)^5` in a
//! Miyaguchi–Preneel chain, with round constants drawn from a Keccak-256
//! chain seeded by `"seed"`. Absorbing a field element is byte-equivalent
//! to absorbing its canonical 32-byte big-endian encoding.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use sha3::{Digest, Keccak256};

use crate::domain::tree::LeanIMTHasher;

/// Number of permutation rounds for BN254.
pub const ROUNDS: usize = 110;

const SEED: &[u8] = b"seed";

/// Round constants `c_i = keccak^{i+2}("seed")`, reduced mod q.
///
/// Shared with the in-circuit gadget; both sides must use the same table.
pub fn round_constants() -> &'static [Fr; ROUNDS] {
    static CONSTANTS: OnceLock<[Fr; ROUNDS]> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        let mut rnd: [u8; 32] = Keccak256::digest(SEED).into();
        let mut constants = [Fr::zero(); ROUNDS];
        for constant in constants.iter_mut() {
            rnd = Keccak256::digest(rnd).into();
            *constant = Fr::from_be_bytes_mod_order(&rnd);
        }
        constants
    })
}

/// MiMC block encryption keyed by the running sponge state.
fn encrypt(h: &Fr, block: &Fr) -> Fr {
    let mut x = *block;
    for constant in round_constants() {
        let t = x + h + constant;
        x = t.square().square() * t;
    }
    x + h
}

/// Hash a sequence of field elements: `h ← encrypt(h, m) + h + m` per block.
pub fn mimc_hash(inputs: &[Fr]) -> Fr {
    let mut h = Fr::zero();
    for block in inputs {
        let enc = encrypt(&h, block);
        h += enc + block;
    }
    h
}

/// MiMC hasher for the lean incremental Merkle tree.
#[derive(Debug, Default, Clone)]
pub struct MimcHash;

impl LeanIMTHasher for MimcHash {
    fn hash(inputs: &[Fr]) -> Fr {
        mimc_hash(inputs)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_eq!(mimc_hash(&[a, b]), mimc_hash(&[a, b]));
    }

    #[test]
    fn hash_order_matters() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_ne!(mimc_hash(&[a, b]), mimc_hash(&[b, a]));
    }

    #[test]
    fn hash_length_matters() {
        let a = Fr::from(1u64);
        assert_ne!(mimc_hash(&[a]), mimc_hash(&[a, a]));
    }

    #[test]
    fn known_pair_vector() {
        // mimc(3, 4), the level-1 node of the reference four-leaf tree.
        let expected = Fr::from_str(
            "2190690676082781141873133671079047905725045108867240828170571956736152080833",
        )
        .unwrap();
        assert_eq!(mimc_hash(&[Fr::from(3u64), Fr::from(4u64)]), expected);
    }

    #[test]
    fn constants_are_stable() {
        let first = round_constants()[0];
        assert_eq!(round_constants()[0], first);
        assert_ne!(round_constants()[0], round_constants()[1]);
    }
}
