//! Member identities: the secret scalar and the values derived from it.

use ark_bn254::Fr;
use ark_ff::{MontFp, PrimeField};
use rand::RngCore;
use thiserror::Error;

use crate::crypto::mimc::mimc_hash;

/// Upper bound for a valid secret: the order of the prime subgroup the
/// protocol's key material lives in. Secrets satisfy `0 <= secret <= bound`.
pub const SECRET_UPPER_BOUND: Fr =
    MontFp!("2736030358979909402780800718157159386076813972158567259200215660948447373040");

/// The secret exceeds [`SECRET_UPPER_BOUND`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("secret exceeds the subgroup order bound")]
pub struct SecretOutOfRange;

/// Whether a secret is within the subgroup bound.
pub fn secret_in_range(secret: &Fr) -> bool {
    secret.into_bigint() <= SECRET_UPPER_BOUND.into_bigint()
}

/// A member's secret scalar.
///
/// The public handle of a member is the identity commitment
/// `mimc(secret)`; the per-scope nullifier is `mimc(scope, secret)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    secret: Fr,
}

impl Identity {
    /// Wrap a secret, rejecting values above the subgroup bound.
    pub fn new(secret: Fr) -> Result<Self, SecretOutOfRange> {
        if !secret_in_range(&secret) {
            return Err(SecretOutOfRange);
        }
        Ok(Self { secret })
    }

    /// Sample a random identity. Only 248 bits are filled so the secret
    /// stays under the subgroup bound.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes[1..]);
        Self {
            secret: Fr::from_be_bytes_mod_order(&bytes),
        }
    }

    /// The raw secret scalar.
    pub fn secret(&self) -> Fr {
        self.secret
    }

    /// The identity commitment `mimc(secret)`.
    pub fn commitment(&self) -> Fr {
        mimc_hash(&[self.secret])
    }

    /// The nullifier `mimc(scope, secret)` for a signaling scope.
    pub fn nullifier(&self, scope: Fr) -> Fr {
        mimc_hash(&[scope, self.secret])
    }
}
