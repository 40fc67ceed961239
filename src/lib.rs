//! Semaphore anonymous signaling protocol.
//!
//! A member of a group, identified by an identity commitment stored in a
//! lean incremental Merkle tree, proves membership and emits a message
//! within a scope without revealing which member signed. A nullifier
//! derived from `(scope, secret)` prevents the same member from signaling
//! twice in the same scope.
//!
//! The membership set is a [`LeanIMT`]: a dynamically sized binary Merkle
//! tree in which an unpaired right child is promoted unchanged instead of
//! being padded with a zero sentinel. Proofs are Groth16 over BN254, with
//! MiMC as the in-circuit and off-circuit hash.

pub mod adapters;
pub mod circuits;
pub mod crypto;
pub mod domain;
pub mod field;
pub mod ports;
pub mod semaphore;

pub use adapters::groth16::Groth16Prover;
pub use domain::identity::Identity;
pub use domain::signal::{Signal, SignalProof};
pub use domain::tree::{LeanIMT, LeanIMTHasher, MerkleProof, TreeError};
pub use ports::prover::{Prover, ProverError};
pub use semaphore::{Semaphore, SemaphoreError};
