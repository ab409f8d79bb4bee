//! Credential request: a commitment to the user secret and a proof of knowledge of it.
//!
//! Issuance is interactive. The issuer sends a fresh nonce; the user answers with a
//! [`CredentialRequest`] committing to `usk` under the issuer base `h_sk` and proving knowledge
//! of the committed exponent; the issuer checks the request before signing.

use crate::{
    common::*,
    issuer::IssuerPublicKey,
    proofs::{Challenge, ChallengeBuilder},
    serde::SerializeElement,
    user::{UserPublicKey, UserSecretKey},
    Error,
};
use ff::Field;
use log::warn;
use serde::{Deserialize, Serialize};

/// Fully constructed credential request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// Commitment to the user secret, `h_sk * usk`.
    #[serde(with = "SerializeElement")]
    nym: G1Affine,
    /// The nonce the issuer handed out for this request.
    #[serde(with = "SerializeElement")]
    issuer_nonce: Scalar,
    proof_c: Challenge,
    #[serde(with = "SerializeElement")]
    proof_s: Scalar,
}

impl CredentialRequest {
    /// Build a request for a credential from the issuer with public key `ipk`.
    pub fn new(
        rng: &mut impl Rng,
        usk: &UserSecretKey,
        issuer_nonce: Scalar,
        ipk: &IssuerPublicKey,
    ) -> Self {
        let nym = G1Affine::from(ipk.h_sk * usk.0);

        let r = Scalar::random(&mut *rng);
        let t = G1Affine::from(ipk.h_sk * r);
        let proof_c = Self::challenge(&t, &nym, &issuer_nonce, ipk);

        Self {
            nym,
            issuer_nonce,
            proof_c,
            proof_s: r + proof_c.to_scalar() * usk.0,
        }
    }

    fn challenge(
        t: &G1Affine,
        nym: &G1Affine,
        issuer_nonce: &Scalar,
        ipk: &IssuerPublicKey,
    ) -> Challenge {
        ChallengeBuilder::new()
            .with(t)
            .with(&ipk.h_sk)
            .with(&ipk.h_rand)
            .with(nym)
            .with(issuer_nonce)
            .with(&ipk.hash)
            .finish()
    }

    /// Check the proof of knowledge of the committed user secret.
    pub fn check(&self, ipk: &IssuerPublicKey) -> Result<(), Error> {
        if bool::from(self.nym.is_identity()) {
            return Err(Error::Malformed("nym"));
        }

        // t = h_sk * s - nym * c
        let t = G1Affine::from(ipk.h_sk * self.proof_s - self.nym * self.proof_c.to_scalar());
        if Self::challenge(&t, &self.nym, &self.issuer_nonce, ipk) != self.proof_c {
            warn!("credential request proof does not verify");
            return Err(Error::RequestInvalid);
        }
        Ok(())
    }

    /// Check that the committed secret is the one behind the enrolled public key `upk`, i.e.
    /// `e(nym, g2) == e(h_sk, w)`.
    pub fn check_binding(&self, ipk: &IssuerPublicKey, upk: &UserPublicKey) -> Result<(), Error> {
        let neg_g2 = G2Prepared::from(-G2Affine::generator());
        let w = G2Prepared::from(upk.w);
        if pairing_product_is_identity(&[(&self.nym, &neg_g2), (&ipk.h_sk, &w)]) {
            Ok(())
        } else {
            warn!("credential request is not bound to the enrolled user key");
            Err(Error::RequestInvalid)
        }
    }

    /// The nonce this request answers.
    pub fn issuer_nonce(&self) -> Scalar {
        self.issuer_nonce
    }

    /// The commitment to the user secret.
    pub fn nym(&self) -> G1Affine {
        self.nym
    }
}
