//! Issuer (certifying authority) keys.
//!
//! The issuer secret key is a pair of random exponents `(x, y)`. The public key carries
//! `bar_x = g2 * x` and `bar_y = g2 * y`, which verifiers use in pairing checks, together with
//! the auxiliary G1 bases `h_sk`, `h_rand` and `bar_g1`, the values `bar_g2 = bar_g1 * x` and
//! `bar_g3 = bar_g1 * y`, and two [`KeyProof`]s showing the issuer knows `x` and `y`.
//!
//! A public key received from elsewhere must be validated with [`IssuerPublicKey::check`]
//! before it is trusted.

use crate::{
    common::*,
    proofs::{ChallengeBuilder, ChallengeDigest, KeyProof},
    serde::SerializeElement,
    Error,
};
use ff::Field;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Issuer secret key `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct IssuerSecretKey {
    #[serde(with = "SerializeElement")]
    pub x: Scalar,
    #[serde(with = "SerializeElement")]
    pub y: Scalar,
}

/// Issuer public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerPublicKey {
    /// Names of the attributes certified by this issuer, in credential order.
    pub(crate) attribute_names: Vec<String>,
    /// Base for the user secret in credential requests.
    #[serde(with = "SerializeElement")]
    pub(crate) h_sk: G1Affine,
    /// Base for randomness.
    #[serde(with = "SerializeElement")]
    pub(crate) h_rand: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) bar_g1: G1Affine,
    /// bar_g1 * x
    #[serde(with = "SerializeElement")]
    pub(crate) bar_g2: G1Affine,
    /// bar_g1 * y
    #[serde(with = "SerializeElement")]
    pub(crate) bar_g3: G1Affine,
    /// g2 * x
    #[serde(with = "SerializeElement")]
    pub(crate) bar_x: G2Affine,
    /// g2 * y
    #[serde(with = "SerializeElement")]
    pub(crate) bar_y: G2Affine,
    pub(crate) proof_x: KeyProof,
    pub(crate) proof_y: KeyProof,
    /// Digest of every other field.
    #[serde(with = "SerializeElement")]
    pub(crate) hash: Scalar,
}

/// A keypair formed from an issuer secret key and an [`IssuerPublicKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerKeyPair {
    /// Secret exponents.
    sk: IssuerSecretKey,
    /// Public key.
    pk: IssuerPublicKey,
}

#[cfg(feature = "sqlite")]
crate::impl_sqlx_for_bincode_ty!(IssuerKeyPair);

impl IssuerKeyPair {
    /// Generate a new issuer key pair certifying the given attribute names.
    ///
    /// Fails if an attribute name appears more than once.
    pub fn new<S: AsRef<str>>(rng: &mut impl Rng, attribute_names: &[S]) -> Result<Self, Error> {
        let attribute_names = distinct_attribute_names(attribute_names)?;

        let x = Scalar::random(&mut *rng);
        let y = Scalar::random(&mut *rng);

        let bar_x = G2Affine::from(G2Affine::generator() * x);
        let bar_y = G2Affine::from(G2Affine::generator() * y);

        let h_sk = random_g1_base(rng);
        let h_rand = random_g1_base(rng);
        let bar_g1 = random_g1_base(rng);
        let bar_g2 = G1Affine::from(bar_g1 * x);
        let bar_g3 = G1Affine::from(bar_g1 * y);

        let proof_x = KeyProof::prove(rng, &x, &bar_g1, &bar_x, &bar_g2);
        let proof_y = KeyProof::prove(rng, &y, &bar_g1, &bar_y, &bar_g3);

        let mut pk = IssuerPublicKey {
            attribute_names,
            h_sk,
            h_rand,
            bar_g1,
            bar_g2,
            bar_g3,
            bar_x,
            bar_y,
            proof_x,
            proof_y,
            hash: Scalar::zero(),
        };
        pk.set_hash();
        debug!(
            "generated issuer key for {} attributes",
            pk.attribute_names.len()
        );

        Ok(Self {
            sk: IssuerSecretKey { x, y },
            pk,
        })
    }

    /// Get the public portion of the `IssuerKeyPair`.
    pub fn public_key(&self) -> &IssuerPublicKey {
        &self.pk
    }

    /// Get the secret portion of the `IssuerKeyPair`.
    pub(crate) fn secret_key(&self) -> &IssuerSecretKey {
        &self.sk
    }
}

impl IssuerPublicKey {
    /// Validate this public key and normalize its hash.
    ///
    /// Fails if any base is the identity or if either proof of knowledge does not verify. On
    /// success the `hash` field is recomputed, so a key with a stale hash is corrected in place.
    pub fn check(&mut self) -> Result<(), Error> {
        let g1_bases = [
            ("h_sk", &self.h_sk),
            ("h_rand", &self.h_rand),
            ("bar_g1", &self.bar_g1),
            ("bar_g2", &self.bar_g2),
            ("bar_g3", &self.bar_g3),
        ];
        if let Some(&(name, _)) = g1_bases
            .iter()
            .find(|(_, base)| bool::from(base.is_identity()))
        {
            return Err(Error::Malformed(name));
        }
        if bool::from(self.bar_x.is_identity()) {
            return Err(Error::Malformed("bar_x"));
        }
        if bool::from(self.bar_y.is_identity()) {
            return Err(Error::Malformed("bar_y"));
        }

        let valid_x = self.proof_x.verify(&self.bar_g1, &self.bar_x, &self.bar_g2);
        let valid_y = self.proof_y.verify(&self.bar_g1, &self.bar_y, &self.bar_g3);
        if !(valid_x && valid_y) {
            warn!("issuer public key carries an invalid proof of knowledge");
            return Err(Error::ProofInvalid);
        }

        self.set_hash();
        Ok(())
    }

    /// Recompute the digest of the public key. The hash field is not part of its own preimage.
    fn set_hash(&mut self) {
        self.hash = ChallengeBuilder::new().with(self).finish().to_scalar();
    }

    /// Names of the attributes certified by this issuer.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// The base committing to a user secret in credential requests.
    pub fn h_sk(&self) -> G1Affine {
        self.h_sk
    }

    /// The base for randomness.
    pub fn h_rand(&self) -> G1Affine {
        self.h_rand
    }

    /// `g2 * x`.
    pub fn bar_x(&self) -> G2Affine {
        self.bar_x
    }

    /// `g2 * y`.
    pub fn bar_y(&self) -> G2Affine {
        self.bar_y
    }

    /// Digest of the public key, as set by key generation or the last successful check.
    pub fn hash(&self) -> Scalar {
        self.hash
    }
}

/// Every field except `hash`, in declaration order. Attribute names are length-prefixed.
impl ChallengeDigest for IssuerPublicKey {
    fn digest(&self, builder: &mut ChallengeBuilder) {
        builder.digest_bytes((self.attribute_names.len() as u64).to_le_bytes());
        for name in &self.attribute_names {
            builder.digest_bytes((name.len() as u64).to_le_bytes());
            builder.digest_bytes(name.as_bytes());
        }
        builder.digest(&self.h_sk);
        builder.digest(&self.h_rand);
        builder.digest(&self.bar_g1);
        builder.digest(&self.bar_g2);
        builder.digest(&self.bar_g3);
        builder.digest(&self.bar_x);
        builder.digest(&self.bar_y);
        builder.digest(&self.proof_x.challenge_scalar());
        builder.digest(&self.proof_x.response());
        builder.digest(&self.proof_y.challenge_scalar());
        builder.digest(&self.proof_y.response());
    }
}
