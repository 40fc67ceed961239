//! The Semaphore constraint system.
//!
//! Proves, for a public `(message, scope, dummy_square, merkle_root,
//! nullifier)` tuple, knowledge of a secret such that:
//! - the secret lies within the prime subgroup order bound,
//! - `mimc(secret)` is a member of the tree with the claimed root,
//! - `mimc(scope, secret)` equals the claimed nullifier,
//! - `message * message` equals `dummy_square`.
//!
//! The squaring is the cheapest constraint that binds the message into
//! the proof; without it a valid proof could be replayed with any
//! message.

use std::cmp::Ordering;

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::merkle_root::{binary_merkle_root, MAX_DEPTH};
use super::mimc;
use crate::domain::identity::SECRET_UPPER_BOUND;

/// Witness assignment for one Semaphore proof.
///
/// Public inputs are allocated in the canonical verifier order
/// `[message, scope, dummy_square, merkle_root, nullifier]`; everything
/// else is private.
#[derive(Debug, Clone)]
pub struct SemaphoreCircuit {
    pub secret: Fr,
    pub proof_length: u64,
    pub path: [bool; MAX_DEPTH],
    pub siblings: [Fr; MAX_DEPTH],
    pub message: Fr,
    pub scope: Fr,
    pub dummy_square: Fr,
    pub merkle_root: Fr,
    pub nullifier: Fr,
}

impl SemaphoreCircuit {
    /// The all-zero assignment used for parameter generation. The
    /// constraint structure does not depend on the witness values.
    pub fn blank() -> Self {
        Self {
            secret: Fr::zero(),
            proof_length: 0,
            path: [false; MAX_DEPTH],
            siblings: [Fr::zero(); MAX_DEPTH],
            message: Fr::zero(),
            scope: Fr::zero(),
            dummy_square: Fr::zero(),
            merkle_root: Fr::zero(),
            nullifier: Fr::zero(),
        }
    }
}

impl ConstraintSynthesizer<Fr> for SemaphoreCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let message = FpVar::new_input(cs.clone(), || Ok(self.message))?;
        let scope = FpVar::new_input(cs.clone(), || Ok(self.scope))?;
        let dummy_square = FpVar::new_input(cs.clone(), || Ok(self.dummy_square))?;
        let merkle_root = FpVar::new_input(cs.clone(), || Ok(self.merkle_root))?;
        let nullifier = FpVar::new_input(cs.clone(), || Ok(self.nullifier))?;

        let secret = FpVar::new_witness(cs.clone(), || Ok(self.secret))?;
        let proof_length =
            FpVar::new_witness(cs.clone(), || Ok(Fr::from(self.proof_length)))?;
        let path = self
            .path
            .iter()
            .map(|bit| Boolean::new_witness(cs.clone(), || Ok(*bit)))
            .collect::<Result<Vec<_>, _>>()?;
        let siblings = self
            .siblings
            .iter()
            .map(|sibling| FpVar::new_witness(cs.clone(), || Ok(*sibling)))
            .collect::<Result<Vec<_>, _>>()?;

        secret.enforce_cmp(
            &FpVar::constant(SECRET_UPPER_BOUND),
            Ordering::Less,
            true,
        )?;

        let commitment = mimc::hash_var(&[secret.clone()])?;

        let computed_root = binary_merkle_root(&commitment, &proof_length, &path, &siblings)?;
        merkle_root.enforce_equal(&computed_root)?;

        let computed_nullifier = mimc::hash_var(&[scope.clone(), secret])?;
        nullifier.enforce_equal(&computed_nullifier)?;

        let computed_square = &message * &message;
        dummy_square.enforce_equal(&computed_square)?;

        Ok(())
    }
}
