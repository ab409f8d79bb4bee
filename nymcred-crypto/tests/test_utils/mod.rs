use bls12_381::Scalar;
use ff::Field;
use nymcred_crypto::{
    credential::Credential, issuer::IssuerKeyPair, proofs::CredentialRequest, user::UserKeyPair,
    user::Trace, Rng,
};
use rand::SeedableRng;

// Seeded rng for replicable tests.
pub fn seeded_rng() -> impl Rng {
    const TEST_RNG_SEED: [u8; 32] = *b"NEVER USE THIS FOR ANYTHING REAL";
    rand::rngs::StdRng::from_seed(TEST_RNG_SEED)
}

pub const NAMES: [&str; 3] = ["A1", "A2", "A3"];

// Enroll a user and run the issuance exchange for attribute values 0, 1, 2.
#[allow(dead_code)]
pub fn enroll_and_issue(
    rng: &mut impl Rng,
    issuer: &IssuerKeyPair,
) -> (UserKeyPair, Trace, Credential) {
    let (user, trace) = UserKeyPair::new(rng, &NAMES).unwrap();
    let nonce = Scalar::random(&mut *rng);
    let request = CredentialRequest::new(rng, user.secret_key(), nonce, issuer.public_key());
    let attrs: Vec<Scalar> = (0..NAMES.len() as u64).map(Scalar::from).collect();
    let credential =
        Credential::issue(rng, issuer, &request, user.public_key(), &attrs).unwrap();
    (user, trace, credential)
}
