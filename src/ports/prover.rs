use ark_bn254::Fr;
use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use thiserror::Error;

use crate::domain::signal::{Signal, SignalProof};
use crate::domain::tree::MerkleProof;

/// Errors that can occur during proof generation or verification.
#[derive(Debug, Error)]
pub enum ProverError {
    #[error("secret exceeds the subgroup order bound")]
    SecretOutOfRange,

    #[error("merkle proof has {0} levels, more than the circuit capacity")]
    ProofTooDeep(usize),

    #[error("malformed merkle proof: {0}")]
    MalformedProof(&'static str),

    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("proof serialization failed: {0}")]
    Serialization(#[from] SerializationError),
}

/// Trait for generating and verifying Semaphore signal proofs.
///
/// Implementations wrap a concrete zk-SNARK backend; the group manager
/// only sees signals and opaque proof blobs.
pub trait Prover: Send + Sync {
    /// Prove that the holder of `secret` is the member behind
    /// `merkle_proof`, binding the signal's message and scope. The
    /// signal's merkle root and nullifier are the claimed public values;
    /// a mismatch with the witness surfaces as a synthesis failure.
    fn prove(
        &self,
        secret: Fr,
        merkle_proof: &MerkleProof,
        signal: &Signal,
    ) -> Result<SignalProof, ProverError>;

    /// Cryptographically verify a signal proof against its public inputs.
    fn verify(&self, proof: &SignalProof) -> Result<bool, ProverError>;
}
