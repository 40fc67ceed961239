//! End-to-end test for the Semaphore protocol with real proof generation.
//!
//! The full flow: Groth16 setup, member registration, merkle proof
//! generation, signal proving, gating, and the double-signal and
//! stale-root rejections.

use ark_bn254::Fr;
use rand::rngs::StdRng;
use rand::SeedableRng;

use semaphore_protocol::{Identity, Prover, Semaphore, SemaphoreError, Signal};

#[test]
fn full_signal_flow() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut group = Semaphore::new(&mut rng).expect("groth16 setup");

    let identities: Vec<Identity> = (0..5).map(|_| Identity::random(&mut rng)).collect();
    for identity in &identities {
        group.add_member(identity.commitment());
    }

    // Member 2 signals message 2 in scope 8386.
    let member = &identities[2];
    let message = Fr::from(2u64);
    let scope = Fr::from(8386u64);

    let merkle_proof = group.generate_merkle_proof(2).expect("merkle proof");
    let signal = Signal::new(
        group.root().expect("non-empty group"),
        member.nullifier(scope),
        message,
        scope,
    );
    let proof = group
        .prover()
        .prove(member.secret(), &merkle_proof, &signal)
        .expect("proof generation");

    // Tampering with any public input must fail verification.
    let mut tampered = proof.clone();
    tampered.public_inputs.message = Fr::from(3u64);
    assert!(matches!(
        group.verify_proof(&tampered),
        Err(SemaphoreError::InvalidProof)
    ));

    let mut tampered = proof.clone();
    tampered.public_inputs.scope = Fr::from(1u64);
    assert!(matches!(
        group.verify_proof(&tampered),
        Err(SemaphoreError::InvalidProof)
    ));

    let mut tampered = proof.clone();
    tampered.public_inputs.nullifier = member.nullifier(Fr::from(1u64));
    assert!(matches!(
        group.verify_proof(&tampered),
        Err(SemaphoreError::InvalidProof)
    ));

    let mut tampered = proof.clone();
    tampered.public_inputs.merkle_root = Fr::from(1u64);
    assert!(matches!(
        group.verify_proof(&tampered),
        Err(SemaphoreError::StaleRoot)
    ));

    // Nothing was consumed by the rejections.
    assert!(!group.is_nullifier_used(&signal.nullifier));

    // The untampered proof verifies and consumes the nullifier.
    group.verify_proof(&proof).expect("valid proof");
    assert!(group.is_nullifier_used(&signal.nullifier));

    // Double signaling is rejected.
    assert!(matches!(
        group.verify_proof(&proof),
        Err(SemaphoreError::NullifierReused)
    ));

    // A proof generated against the current root goes stale as soon as
    // the membership set changes.
    let late_member = &identities[0];
    let late_scope = Fr::from(9999u64);
    let late_merkle_proof = group.generate_merkle_proof(0).expect("merkle proof");
    let late_signal = Signal::new(
        group.root().expect("non-empty group"),
        late_member.nullifier(late_scope),
        Fr::from(7u64),
        late_scope,
    );
    let late_proof = group
        .prover()
        .prove(late_member.secret(), &late_merkle_proof, &late_signal)
        .expect("proof generation");

    group.add_member(Identity::random(&mut rng).commitment());
    assert!(matches!(
        group.verify_proof(&late_proof),
        Err(SemaphoreError::StaleRoot)
    ));
}

#[test]
fn members_can_signal_after_updates() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut group = Semaphore::new(&mut rng).expect("groth16 setup");

    let old_identity = Identity::random(&mut rng);
    let new_identity = Identity::random(&mut rng);
    let bystander = Identity::random(&mut rng);

    group.add_member(old_identity.commitment());
    group.add_member(bystander.commitment());

    // Rotate member 0's identity, then signal with the new secret.
    group
        .update_member(old_identity.commitment(), new_identity.commitment())
        .expect("update member");

    let scope = Fr::from(123u64);
    let merkle_proof = group.generate_merkle_proof(0).expect("merkle proof");
    let signal = Signal::new(
        group.root().expect("non-empty group"),
        new_identity.nullifier(scope),
        Fr::from(1412u64),
        scope,
    );
    let proof = group
        .prover()
        .prove(new_identity.secret(), &merkle_proof, &signal)
        .expect("proof generation");
    group.verify_proof(&proof).expect("valid proof");

    // Removing the member tombstones its slot; the group root changes
    // and the removed member's proofs go stale.
    group
        .remove_member(new_identity.commitment())
        .expect("remove member");
    assert!(group.has_member(&Fr::from(0u64)));
    assert!(!group.has_member(&new_identity.commitment()));
}
