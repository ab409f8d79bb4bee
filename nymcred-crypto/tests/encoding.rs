mod test_utils;

use nymcred_crypto::{
    arbitration::arbitrate,
    credential::Credential,
    encoding::{decode, encode, from_base64, to_base64},
    issuer::{IssuerKeyPair, IssuerPublicKey},
    nym::{NymSignature, RevocationInformation},
    proofs::CredentialRequest,
    user::{Trace, UserKeyPair, UserPublicKey},
};
use test_utils::{enroll_and_issue, seeded_rng, NAMES};

#[test]
fn decoded_keys_still_check() {
    let mut rng = seeded_rng();
    let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
    let (user, _) = UserKeyPair::new(&mut rng, &NAMES).unwrap();

    let mut ipk: IssuerPublicKey = decode(&encode(issuer.public_key()).unwrap()).unwrap();
    assert_eq!(&ipk, issuer.public_key());
    ipk.check().unwrap();

    let mut upk: UserPublicKey = decode(&encode(user.public_key()).unwrap()).unwrap();
    assert_eq!(&upk, user.public_key());
    upk.check().unwrap();

    let restored: UserKeyPair = decode(&encode(&user).unwrap()).unwrap();
    assert_eq!(restored, user);
}

#[test]
fn decoded_request_is_accepted() {
    let mut rng = seeded_rng();
    let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
    let (user, _) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
    let nonce = bls12_381::Scalar::from(42u64);

    let request = CredentialRequest::new(&mut rng, user.secret_key(), nonce, issuer.public_key());
    let text = to_base64(&request).unwrap();
    let decoded: CredentialRequest = from_base64(&text).unwrap();
    assert_eq!(decoded, request);
    decoded.check(issuer.public_key()).unwrap();
}

#[test]
fn decoded_credential_still_verifies() {
    let mut rng = seeded_rng();
    let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
    let (user, _, credential) = enroll_and_issue(&mut rng, &issuer);

    let decoded: Credential = decode(&encode(&credential).unwrap()).unwrap();
    assert_eq!(decoded, credential);
    decoded
        .verify(user.secret_key(), issuer.public_key())
        .unwrap();
}

#[test]
fn decoded_signature_verifies_and_traces() {
    let mut rng = seeded_rng();
    let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
    let (user, trace, credential) = enroll_and_issue(&mut rng, &issuer);
    let cri = RevocationInformation {
        epoch_pk: b"epoch key".to_vec(),
        epoch_pk_sig: b"epoch key signature".to_vec(),
        epoch: 3,
    };

    let sig = NymSignature::new(
        &mut rng,
        user.secret_key(),
        &credential,
        issuer.public_key(),
        b"record",
        &[0, 1, 0],
        Some(&cri),
    )
    .unwrap();

    let decoded: NymSignature = from_base64(&to_base64(&sig).unwrap()).unwrap();
    assert_eq!(decoded, sig);
    assert_eq!(decoded.epoch(), Some(3));
    decoded
        .verify(issuer.public_key(), b"record", None, 0)
        .unwrap();

    let traces: Vec<Trace> = decode(&encode(&vec![trace]).unwrap()).unwrap();
    assert_eq!(arbitrate(&traces, &decoded).unwrap(), user.public_key());
}
