//! Nym signatures: unlinkable, selectively-disclosing signatures made with a [`Credential`].
//!
//! Each signature carries a fresh pseudonym pair `xi = g1 * u`, `eta = xi * usk`. For every
//! hidden attribute the signed pair `(a, b)` is re-randomized by `v` into
//! `sigma_1 = a * v`, `sigma_2 = b * v`, `sigma_3 = sigma_1 * usk`, and a Schnorr proof shows
//! that the same `usk` links `sigma_3` to `sigma_1` and `eta` to `xi`. The proof is bound to the
//! message and to the signature nonce through a two-stage challenge:
//!
//! ```text
//! ca = H(t1 ‖ t2 ‖ sigma_1 ‖ xi ‖ sigma_3 ‖ eta ‖ message)
//! c  = H(ca ‖ nonce)
//! ```
//!
//! Disclosed attributes travel in the clear and are not bound to the credential by
//! [`NymSignature::verify`]. Revocation fields are carried but never checked.

use crate::{
    common::*,
    credential::Credential,
    issuer::IssuerPublicKey,
    proofs::{Challenge, ChallengeBuilder},
    serde::SerializeElement,
    user::UserSecretKey,
    Error,
};
use ff::Field;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Length of the group-element prefix of a hidden-attribute transcript; the message follows it.
pub const HIDDEN_PROOF_POINTS_LEN: usize = 6 * G1_BYTES;

/// Credential revocation information attached to a signature verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationInformation {
    /// Public key for the revocation epoch.
    pub epoch_pk: Vec<u8>,
    /// Signature on the epoch public key.
    pub epoch_pk_sig: Vec<u8>,
    /// The revocation epoch.
    pub epoch: i64,
}

/// Blinded signature and proof for one hidden attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenAttribute {
    /// a * v
    #[serde(with = "SerializeElement")]
    pub(crate) sigma_1: G1Affine,
    /// b * v
    #[serde(with = "SerializeElement")]
    pub(crate) sigma_2: G1Affine,
    /// sigma_1 * usk
    #[serde(with = "SerializeElement")]
    pub(crate) sigma_3: G1Affine,
    pub(crate) proof_c: Challenge,
    #[serde(with = "SerializeElement")]
    pub(crate) proof_s: Scalar,
}

/// A nym signature over a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NymSignature {
    #[serde(with = "SerializeElement")]
    pub(crate) eta: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) xi: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) nonce: Scalar,
    pub(crate) hides: Vec<HiddenAttribute>,
    /// Disclosed attribute values, in credential order.
    #[serde(with = "SerializeElement")]
    pub(crate) attrs: Vec<Scalar>,
    pub(crate) revocation_epoch_pk: Option<Vec<u8>>,
    pub(crate) revocation_pk_sig: Option<Vec<u8>>,
    pub(crate) epoch: Option<i64>,
}

impl NymSignature {
    /// Sign `message` with `credential`.
    ///
    /// `disclosure` holds one byte per credential attribute: `0` hides the attribute, anything
    /// else discloses its value. Fails if its length differs from the credential's.
    pub fn new(
        rng: &mut impl Rng,
        usk: &UserSecretKey,
        credential: &Credential,
        ipk: &IssuerPublicKey,
        message: &[u8],
        disclosure: &[u8],
        revocation: Option<&RevocationInformation>,
    ) -> Result<Self, Error> {
        if disclosure.len() != credential.creds.len() {
            return Err(Error::AttributeCountMismatch {
                expected: credential.creds.len(),
                got: disclosure.len(),
            });
        }
        if credential.attrs.len() != credential.creds.len() {
            return Err(Error::AttributeCountMismatch {
                expected: credential.creds.len(),
                got: credential.attrs.len(),
            });
        }
        if ipk.attribute_names.len() != credential.creds.len() {
            return Err(Error::AttributeCountMismatch {
                expected: ipk.attribute_names.len(),
                got: credential.creds.len(),
            });
        }

        let u = Scalar::random(&mut *rng);
        let v = Scalar::random(&mut *rng);
        let nonce = Scalar::random(&mut *rng);

        let xi = G1Affine::from(G1Affine::generator() * u);
        let eta = G1Affine::from(xi * usk.0);

        let mut hides = Vec::new();
        let mut attrs = Vec::new();
        for ((signed, attr), &disclose) in credential
            .creds
            .iter()
            .zip(&credential.attrs)
            .zip(disclosure)
        {
            if disclose != 0 {
                attrs.push(*attr);
                continue;
            }

            let sigma_1 = G1Affine::from(signed.a * v);
            let sigma_2 = G1Affine::from(signed.b * v);
            let sigma_3 = G1Affine::from(sigma_1 * usk.0);

            let a = Scalar::random(&mut *rng);
            let t1 = G1Affine::from(sigma_1 * a);
            let t2 = G1Affine::from(xi * a);
            let proof_c =
                hidden_challenge(&t1, &t2, &sigma_1, &xi, &sigma_3, &eta, message, &nonce);

            hides.push(HiddenAttribute {
                sigma_1,
                sigma_2,
                sigma_3,
                proof_c,
                proof_s: a + proof_c.to_scalar() * usk.0,
            });
        }
        debug!(
            "created nym signature hiding {} and disclosing {} attributes",
            hides.len(),
            attrs.len()
        );

        Ok(Self {
            eta,
            xi,
            nonce,
            hides,
            attrs,
            revocation_epoch_pk: revocation.map(|cri| cri.epoch_pk.clone()),
            revocation_pk_sig: revocation.map(|cri| cri.epoch_pk_sig.clone()),
            epoch: revocation.map(|cri| cri.epoch),
        })
    }

    /// Verify the signature on `message` against the issuer public key.
    ///
    /// `revocation_pk` and `epoch` are accepted for interface compatibility and ignored.
    pub fn verify(
        &self,
        ipk: &IssuerPublicKey,
        message: &[u8],
        _revocation_pk: Option<&[u8]>,
        _epoch: i64,
    ) -> Result<(), Error> {
        self.check_pseudonym()?;

        let bar_x = G2Prepared::from(ipk.bar_x);
        let bar_y = G2Prepared::from(ipk.bar_y);
        let neg_g2 = G2Prepared::from(-G2Affine::generator());

        for hide in &self.hides {
            hide.check_blinding()?;
            let c = hide.proof_c.to_scalar();

            // t1 = sigma_1 * s - sigma_3 * c, t2 = xi * s - eta * c
            let t1 = G1Affine::from(hide.sigma_1 * hide.proof_s - hide.sigma_3 * c);
            let t2 = G1Affine::from(self.xi * hide.proof_s - self.eta * c);
            let expected = hidden_challenge(
                &t1,
                &t2,
                &hide.sigma_1,
                &self.xi,
                &hide.sigma_3,
                &self.eta,
                message,
                &self.nonce,
            );
            if expected != hide.proof_c {
                warn!("nym signature proof does not match the message");
                return Err(Error::ProofInvalid);
            }

            // e(sigma_1, bar_x) * e(sigma_3, bar_y) * e(sigma_2, -g2) == 1
            if !pairing_product_is_identity(&[
                (&hide.sigma_1, &bar_x),
                (&hide.sigma_3, &bar_y),
                (&hide.sigma_2, &neg_g2),
            ]) {
                warn!("nym signature is not consistent with the issuer public key");
                return Err(Error::PairingMismatch("hidden attribute".to_string()));
            }
        }
        Ok(())
    }

    pub(crate) fn check_pseudonym(&self) -> Result<(), Error> {
        if bool::from(self.xi.is_identity()) {
            return Err(Error::Malformed("xi"));
        }
        if bool::from(self.eta.is_identity()) {
            return Err(Error::Malformed("eta"));
        }
        Ok(())
    }

    /// The pseudonym `xi * usk`.
    pub fn eta(&self) -> G1Affine {
        self.eta
    }

    /// The pseudonym base `g1 * u`.
    pub fn xi(&self) -> G1Affine {
        self.xi
    }

    /// The signature nonce.
    pub fn nonce(&self) -> Scalar {
        self.nonce
    }

    /// Proofs for the hidden attributes, in credential order.
    pub fn hidden_attributes(&self) -> &[HiddenAttribute] {
        &self.hides
    }

    /// Disclosed attribute values, in credential order.
    pub fn disclosed_attributes(&self) -> &[Scalar] {
        &self.attrs
    }

    /// Revocation epoch public key, as supplied at signing time.
    pub fn revocation_epoch_pk(&self) -> Option<&[u8]> {
        self.revocation_epoch_pk.as_deref()
    }

    /// Signature on the revocation epoch public key, as supplied at signing time.
    pub fn revocation_pk_sig(&self) -> Option<&[u8]> {
        self.revocation_pk_sig.as_deref()
    }

    /// Revocation epoch, as supplied at signing time.
    pub fn epoch(&self) -> Option<i64> {
        self.epoch
    }
}

impl HiddenAttribute {
    /// An identity component satisfies the pairing equation for any issuer key.
    fn check_blinding(&self) -> Result<(), Error> {
        if bool::from(self.sigma_1.is_identity()) {
            return Err(Error::Malformed("sigma_1"));
        }
        if bool::from(self.sigma_2.is_identity()) {
            return Err(Error::Malformed("sigma_2"));
        }
        if bool::from(self.sigma_3.is_identity()) {
            return Err(Error::Malformed("sigma_3"));
        }
        Ok(())
    }

    /// The blinded `a` component.
    pub fn sigma_1(&self) -> G1Affine {
        self.sigma_1
    }

    /// The blinded `b` component.
    pub fn sigma_2(&self) -> G1Affine {
        self.sigma_2
    }

    /// `sigma_1 * usk`.
    pub fn sigma_3(&self) -> G1Affine {
        self.sigma_3
    }
}

#[allow(clippy::too_many_arguments)]
fn hidden_challenge(
    t1: &G1Affine,
    t2: &G1Affine,
    sigma_1: &G1Affine,
    xi: &G1Affine,
    sigma_3: &G1Affine,
    eta: &G1Affine,
    message: &[u8],
    nonce: &Scalar,
) -> Challenge {
    let builder = ChallengeBuilder::new()
        .with(t1)
        .with(t2)
        .with(sigma_1)
        .with(xi)
        .with(sigma_3)
        .with(eta);
    debug_assert_eq!(builder.absorbed(), HIDDEN_PROOF_POINTS_LEN);
    let ca = builder.with_bytes(message).finish();

    ChallengeBuilder::new().with(&ca).with(nonce).finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{issuer::IssuerKeyPair, proofs::CredentialRequest, test::rng, user::UserKeyPair};

    const NAMES: [&str; 3] = ["A1", "A2", "A3"];

    fn setup(rng: &mut impl Rng) -> (IssuerKeyPair, UserKeyPair, Credential) {
        let issuer = IssuerKeyPair::new(rng, &NAMES).unwrap();
        let (user, _) = UserKeyPair::new(rng, &NAMES).unwrap();
        let nonce = Scalar::random(&mut *rng);
        let request = CredentialRequest::new(rng, user.secret_key(), nonce, issuer.public_key());
        let attrs: Vec<Scalar> = (0..3u64).map(Scalar::from).collect();
        let cred = Credential::issue(rng, &issuer, &request, user.public_key(), &attrs).unwrap();
        (issuer, user, cred)
    }

    #[test]
    fn every_disclosure_verifies() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);

        for bits in 0..8u8 {
            let disclosure: Vec<u8> = (0..3).map(|i| (bits >> i) & 1).collect();
            let sig = NymSignature::new(
                &mut rng,
                user.secret_key(),
                &cred,
                issuer.public_key(),
                b"hello world",
                &disclosure,
                None,
            )
            .unwrap();

            let hidden = disclosure.iter().filter(|&&d| d == 0).count();
            assert_eq!(sig.hidden_attributes().len(), hidden);
            assert_eq!(sig.disclosed_attributes().len(), 3 - hidden);
            sig.verify(issuer.public_key(), b"hello world", None, 0)
                .unwrap();
        }
    }

    #[test]
    fn disclosed_values_are_in_order() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"msg",
            &[1, 0, 1],
            None,
        )
        .unwrap();
        assert_eq!(sig.disclosed_attributes(), &[Scalar::from(0u64), Scalar::from(2u64)]);
    }

    #[test]
    fn altered_message_fails() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"hello world",
            &[1, 1, 0],
            None,
        )
        .unwrap();
        assert_eq!(
            sig.verify(issuer.public_key(), b"hello world1", None, 0),
            Err(Error::ProofInvalid)
        );
    }

    #[test]
    fn fully_disclosed_signature_ignores_message() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"hello world",
            &[1, 1, 1],
            None,
        )
        .unwrap();
        assert!(sig.hidden_attributes().is_empty());
        sig.verify(issuer.public_key(), b"anything", None, 0).unwrap();
    }

    #[test]
    fn other_issuer_fails_pairing() {
        let mut rng = rng();
        let (_, user, cred) = setup(&mut rng);
        let other = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            other.public_key(),
            b"m",
            &[0, 0, 0],
            None,
        )
        .unwrap();
        assert_eq!(
            sig.verify(other.public_key(), b"m", None, 0),
            Err(Error::PairingMismatch("hidden attribute".to_string()))
        );
    }

    #[test]
    fn tampered_nonce_fails() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let mut sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[0, 1, 1],
            None,
        )
        .unwrap();
        sig.nonce += Scalar::one();
        assert_eq!(
            sig.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::ProofInvalid)
        );
    }

    #[test]
    fn revocation_fields_pass_through() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let cri = RevocationInformation {
            epoch_pk: vec![1, 2, 3],
            epoch_pk_sig: vec![4, 5],
            epoch: 7,
        };
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[0, 1, 0],
            Some(&cri),
        )
        .unwrap();
        assert_eq!(sig.revocation_epoch_pk(), Some(&[1u8, 2, 3][..]));
        assert_eq!(sig.revocation_pk_sig(), Some(&[4u8, 5][..]));
        assert_eq!(sig.epoch(), Some(7));

        // revocation inputs to verification are not checked
        sig.verify(issuer.public_key(), b"m", Some(b"unrelated"), 99)
            .unwrap();
    }

    #[test]
    fn wrong_disclosure_length_fails() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let err = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[0, 1],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::AttributeCountMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn identity_pseudonym_is_malformed() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let mut sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[0, 1, 1],
            None,
        )
        .unwrap();
        sig.xi = G1Affine::identity();
        assert_eq!(
            sig.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::Malformed("xi"))
        );
    }

    /// A signature over identity blindings, made with a secret that was never issued a
    /// credential.
    fn uncredentialed_signature(rng: &mut impl Rng, message: &[u8]) -> NymSignature {
        let usk = Scalar::random(&mut *rng);
        let xi = G1Affine::from(G1Affine::generator() * Scalar::random(&mut *rng));
        let eta = G1Affine::from(xi * usk);
        let nonce = Scalar::random(&mut *rng);
        let identity = G1Affine::identity();

        let a = Scalar::random(&mut *rng);
        let t2 = G1Affine::from(xi * a);
        let proof_c =
            hidden_challenge(&identity, &t2, &identity, &xi, &identity, &eta, message, &nonce);

        NymSignature {
            eta,
            xi,
            nonce,
            hides: vec![HiddenAttribute {
                sigma_1: identity,
                sigma_2: identity,
                sigma_3: identity,
                proof_c,
                proof_s: a + proof_c.to_scalar() * usk,
            }],
            attrs: vec![],
            revocation_epoch_pk: None,
            revocation_pk_sig: None,
            epoch: None,
        }
    }

    #[test]
    fn identity_blinding_is_rejected() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let sig = uncredentialed_signature(&mut rng, b"m");
        assert_eq!(
            sig.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::Malformed("sigma_1"))
        );
    }

    #[test]
    fn each_identity_blinding_component_is_rejected() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[0, 1, 1],
            None,
        )
        .unwrap();

        let mut tampered = sig.clone();
        tampered.hides[0].sigma_2 = G1Affine::identity();
        assert_eq!(
            tampered.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::Malformed("sigma_2"))
        );

        let mut tampered = sig;
        tampered.hides[0].sigma_3 = G1Affine::identity();
        assert_eq!(
            tampered.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::Malformed("sigma_3"))
        );
    }

    #[test]
    fn doubled_sigma_1_fails_proof() {
        let mut rng = rng();
        let (issuer, user, cred) = setup(&mut rng);
        let mut sig = NymSignature::new(
            &mut rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            b"m",
            &[1, 0, 1],
            None,
        )
        .unwrap();
        sig.hides[0].sigma_1 = G1Affine::from(sig.hides[0].sigma_1 * Scalar::from(2u64));
        assert_eq!(
            sig.verify(issuer.public_key(), b"m", None, 0),
            Err(Error::ProofInvalid)
        );
    }
}
