//! Groth16-over-BN254 prover adapter built on arkworks.

use ark_bn254::{Bn254, Fr};
use ark_ff::{Field, Zero};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, ProvingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};

use crate::circuits::merkle_root::MAX_DEPTH;
use crate::circuits::semaphore::SemaphoreCircuit;
use crate::domain::identity::secret_in_range;
use crate::domain::signal::{Signal, SignalProof};
use crate::domain::tree::MerkleProof;
use crate::ports::prover::{Prover, ProverError};

/// In-process Groth16 prover holding the keys produced by setup.
///
/// The keys are immutable after setup and safe to share.
pub struct Groth16Prover {
    pk: ProvingKey<Bn254>,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl Groth16Prover {
    /// Compile the Semaphore circuit and run the Groth16 setup.
    ///
    /// The randomness source (and with it the toxic waste) is the
    /// caller's concern.
    pub fn setup<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, ProverError> {
        tracing::info!("running groth16 setup for the semaphore circuit");
        let pk = Groth16::<Bn254>::generate_random_parameters_with_reduction(
            SemaphoreCircuit::blank(),
            rng,
        )?;
        let pvk = prepare_verifying_key(&pk.vk);
        Ok(Self { pk, pvk })
    }

    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.pk
    }

    pub fn prepared_verifying_key(&self) -> &PreparedVerifyingKey<Bn254> {
        &self.pvk
    }

    /// Assemble the circuit witness from a merkle proof and the claimed
    /// signal. Suppressed promotion levels are padded with zero siblings
    /// and left bits; the declared proof length masks the padding.
    fn build_circuit(
        secret: Fr,
        merkle_proof: &MerkleProof,
        signal: &Signal,
    ) -> Result<SemaphoreCircuit, ProverError> {
        if !secret_in_range(&secret) {
            return Err(ProverError::SecretOutOfRange);
        }
        if merkle_proof.path.len() != merkle_proof.siblings.len() {
            return Err(ProverError::MalformedProof(
                "path and siblings length mismatch",
            ));
        }
        if merkle_proof.siblings.len() > MAX_DEPTH {
            return Err(ProverError::ProofTooDeep(merkle_proof.siblings.len()));
        }

        let mut path = [false; MAX_DEPTH];
        let mut siblings = [Fr::zero(); MAX_DEPTH];
        for (i, (bit, sibling)) in merkle_proof
            .path
            .iter()
            .zip(&merkle_proof.siblings)
            .enumerate()
        {
            path[i] = *bit == 1;
            siblings[i] = *sibling;
        }

        Ok(SemaphoreCircuit {
            secret,
            proof_length: merkle_proof.path.len() as u64,
            path,
            siblings,
            message: signal.message,
            scope: signal.scope,
            dummy_square: signal.message.square(),
            merkle_root: signal.merkle_root,
            nullifier: signal.nullifier,
        })
    }
}

impl Prover for Groth16Prover {
    fn prove(
        &self,
        secret: Fr,
        merkle_proof: &MerkleProof,
        signal: &Signal,
    ) -> Result<SignalProof, ProverError> {
        let circuit = Self::build_circuit(secret, merkle_proof, signal)?;

        tracing::debug!(levels = merkle_proof.path.len(), "generating signal proof");
        let mut rng = rand::thread_rng();
        let proof =
            Groth16::<Bn254>::create_random_proof_with_reduction(circuit, &self.pk, &mut rng)?;

        let mut bytes = Vec::new();
        proof.serialize_compressed(&mut bytes)?;

        Ok(SignalProof {
            proof: bytes,
            public_inputs: *signal,
        })
    }

    fn verify(&self, proof: &SignalProof) -> Result<bool, ProverError> {
        let groth16_proof = Proof::<Bn254>::deserialize_compressed(proof.proof.as_slice())?;
        let inputs = proof.public_inputs.to_public_inputs();
        Ok(Groth16::<Bn254>::verify_proof(
            &self.pvk,
            &groth16_proof,
            &inputs,
        )?)
    }
}
