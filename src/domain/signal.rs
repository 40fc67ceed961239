//! Signals: the public record of one anonymous group signal.

use ark_bn254::Fr;
use ark_ff::Field;
use serde::{Deserialize, Serialize};

/// Public inputs of a signal: which tree it was proved against, the
/// nullifier consuming the member's slot in the scope, and the carried
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(with = "crate::field::decimal")]
    pub merkle_root: Fr,
    #[serde(with = "crate::field::decimal")]
    pub nullifier: Fr,
    #[serde(with = "crate::field::decimal")]
    pub message: Fr,
    #[serde(with = "crate::field::decimal")]
    pub scope: Fr,
}

impl Signal {
    pub fn new(merkle_root: Fr, nullifier: Fr, message: Fr, scope: Fr) -> Self {
        Self {
            merkle_root,
            nullifier,
            message,
            scope,
        }
    }

    /// The verifier's public-input vector, in the canonical order
    /// `[message, scope, dummy_square, merkle_root, nullifier]`.
    ///
    /// The message-binding square is always recomputed here; it is never
    /// accepted from untrusted input.
    pub fn to_public_inputs(&self) -> [Fr; 5] {
        [
            self.message,
            self.scope,
            self.message.square(),
            self.merkle_root,
            self.nullifier,
        ]
    }
}

/// A signal together with its opaque Groth16 proof blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalProof {
    /// Compressed Groth16 proof bytes.
    pub proof: Vec<u8>,
    pub public_inputs: Signal,
}
