//! In-circuit MiMC, the constraint-system counterpart of
//! [`crate::crypto::mimc`].
//!
//! Both sides share one round-constant table, so hashing `k` circuit
//! variables is equivalent to hashing `k` field elements for any witness
//! assignment.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

use crate::crypto::mimc::round_constants;

fn encrypt_var(h: &FpVar<Fr>, block: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut x = block.clone();
    for constant in round_constants() {
        let t = &x + h + FpVar::constant(*constant);
        x = t.square()?.square()? * &t;
    }
    Ok(x + h)
}

/// Hash a sequence of circuit variables with the MiMC sponge.
pub fn hash_var(inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut h = FpVar::zero();
    for block in inputs {
        let enc = encrypt_var(&h, block)?;
        h = enc + &h + block;
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use ark_relations::r1cs::ConstraintSystem;

    use super::*;
    use crate::crypto::mimc::mimc_hash;

    #[test]
    fn gadget_matches_native_hash() {
        let inputs = [Fr::from(8386u64), Fr::from(42u64)];

        for k in 1..=inputs.len() {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let vars: Vec<FpVar<Fr>> = inputs[..k]
                .iter()
                .map(|x| FpVar::new_witness(cs.clone(), || Ok(*x)).unwrap())
                .collect();

            let out = hash_var(&vars).unwrap();
            assert_eq!(out.value().unwrap(), mimc_hash(&inputs[..k]));
            assert!(cs.is_satisfied().unwrap());
        }
    }
}
