//! The Semaphore group manager.
//!
//! Owns the membership tree, the registry of consumed nullifiers, and the
//! prover produced by circuit setup. Applications manage members and
//! submit signal proofs here; the manager gates each proof through the
//! message/scope predicates, the current-root check, the nullifier
//! registry, and finally cryptographic verification.

use std::collections::HashSet;

use ark_bn254::Fr;
use ark_ff::Zero;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::adapters::groth16::Groth16Prover;
use crate::crypto::mimc::MimcHash;
use crate::domain::signal::SignalProof;
use crate::domain::tree::{LeanIMT, MerkleProof, TreeError};
use crate::ports::prover::{Prover, ProverError};

/// Application-pluggable predicate over a signal's message or scope.
pub type SignalPredicate = Box<dyn Fn(&Fr) -> bool + Send + Sync>;

/// Errors from group operations and proof gating. Each rejection reason
/// is distinct; a failed verification leaves the nullifier registry
/// unchanged.
#[derive(Debug, Error)]
pub enum SemaphoreError {
    #[error("invalid message")]
    InvalidMessage,

    #[error("invalid scope")]
    InvalidScope,

    #[error("the provided identity commitment doesn't exist")]
    MemberNotFound,

    #[error("merkle root does not match the current group root")]
    StaleRoot,

    #[error("the provided nullifier is already used")]
    NullifierReused,

    #[error("invalid semaphore proof")]
    InvalidProof,

    #[error("internal invariant violated: {0}")]
    Internal(&'static str),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Prover(#[from] ProverError),
}

/// A Semaphore group: membership tree, nullifier registry, prover keys.
///
/// Single-threaded by construction; callers needing concurrency
/// serialize mutating operations (a mutex around the group suffices).
pub struct Semaphore<P: Prover = Groth16Prover> {
    tree: LeanIMT<MimcHash>,
    used_nullifiers: HashSet<Fr>,
    prover: P,
    check_message: SignalPredicate,
    check_scope: SignalPredicate,
}

impl Semaphore<Groth16Prover> {
    /// Create an empty group, running the Groth16 setup for the
    /// Semaphore circuit. Setup randomness is the caller's concern.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, ProverError> {
        Ok(Self::with_prover(Groth16Prover::setup(rng)?))
    }
}

impl<P: Prover> Semaphore<P> {
    /// Create an empty group around an already-set-up prover.
    pub fn with_prover(prover: P) -> Self {
        Self {
            tree: LeanIMT::new(),
            used_nullifiers: HashSet::new(),
            prover,
            check_message: Box::new(|_| true),
            check_scope: Box::new(|_| true),
        }
    }

    /// Replace the message predicate (e.g. ballot validation). The
    /// default accepts everything.
    pub fn set_message_check(&mut self, check: SignalPredicate) {
        self.check_message = check;
    }

    /// Replace the scope predicate. The default accepts everything.
    pub fn set_scope_check(&mut self, check: SignalPredicate) {
        self.check_scope = check;
    }

    /// Number of member slots in the group, tombstones included.
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// The current membership root, or `None` for an empty group.
    pub fn root(&self) -> Option<Fr> {
        self.tree.root()
    }

    /// The prover set up for this group.
    pub fn prover(&self) -> &P {
        &self.prover
    }

    /// Whether an identity commitment occupies a slot in the group.
    pub fn has_member(&self, commitment: &Fr) -> bool {
        self.tree.index_of(commitment).is_some()
    }

    /// Whether a nullifier has already been consumed.
    pub fn is_nullifier_used(&self, nullifier: &Fr) -> bool {
        self.used_nullifiers.contains(nullifier)
    }

    /// Insert an identity commitment as a new member.
    pub fn add_member(&mut self, commitment: Fr) {
        self.tree.insert(commitment);
        tracing::debug!(size = self.tree.size(), "member added");
    }

    /// Replace an identity commitment with a new one.
    pub fn update_member(&mut self, old: Fr, new: Fr) -> Result<(), SemaphoreError> {
        let index = self.tree.index_of(&old).ok_or(SemaphoreError::MemberNotFound)?;
        self.tree.update(new, index)?;
        tracing::debug!(index, "member updated");
        Ok(())
    }

    /// Remove a member by overwriting its slot with the zero tombstone.
    /// Nothing else distinguishes removed slots.
    pub fn remove_member(&mut self, commitment: Fr) -> Result<(), SemaphoreError> {
        self.update_member(commitment, Fr::zero())
    }

    /// Generate a membership proof for the member slot at `index`.
    pub fn generate_merkle_proof(&self, index: usize) -> Result<MerkleProof, TreeError> {
        self.tree.generate_proof(index)
    }

    /// Gate a signal proof and, on full success, consume its nullifier.
    ///
    /// Proofs must be submitted against the current root: the group
    /// retains no root history.
    pub fn verify_proof(&mut self, proof: &SignalProof) -> Result<(), SemaphoreError> {
        let signal = &proof.public_inputs;

        if !(self.check_message)(&signal.message) {
            return Err(SemaphoreError::InvalidMessage);
        }
        if !(self.check_scope)(&signal.scope) {
            return Err(SemaphoreError::InvalidScope);
        }
        if self.tree.root() != Some(signal.merkle_root) {
            tracing::warn!("rejected signal against a stale merkle root");
            return Err(SemaphoreError::StaleRoot);
        }
        if self.used_nullifiers.contains(&signal.nullifier) {
            tracing::warn!("rejected double signal");
            return Err(SemaphoreError::NullifierReused);
        }

        if !self.prover.verify(proof)? {
            return Err(SemaphoreError::InvalidProof);
        }

        // Exactly one verification may consume a given nullifier.
        if !self.used_nullifiers.insert(signal.nullifier) {
            return Err(SemaphoreError::Internal(
                "nullifier consumed during verification",
            ));
        }
        Ok(())
    }
}
