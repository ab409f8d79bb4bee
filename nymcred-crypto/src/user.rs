//! User keys and the traces the certifying authority keeps for arbitration.
//!
//! A user secret key is a single random exponent `usk`. The public key carries `upk = g1 * usk`,
//! over which credentials are issued, `w = g2 * usk`, and a [`KeyProof`] that `w` and
//! `bar_g2 = bar_g1 * usk` share the exponent.
//!
//! Key generation also produces a [`Trace`] holding `g2 * usk`. The authority appends it to its
//! trace registry; [`arbitrate`](crate::arbitration::arbitrate) later matches nym signatures
//! against it.

use crate::{
    common::*,
    proofs::{ChallengeBuilder, ChallengeDigest, KeyProof},
    serde::SerializeElement,
    Error,
};
use ff::Field;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// User secret key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSecretKey(#[serde(with = "SerializeElement")] pub(crate) Scalar);

impl UserSecretKey {
    /// Generate a new secret key uniformly at random.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self(Scalar::random(rng))
    }

    /// Convert to the inner scalar.
    ///
    /// **warning:** this exposes the secret and should only be used to persist it.
    pub fn to_scalar(&self) -> Scalar {
        self.0
    }
}

/// User public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublicKey {
    pub(crate) attribute_names: Vec<String>,
    /// g1 * usk
    #[serde(with = "SerializeElement")]
    pub(crate) upk: G1Affine,
    /// g2 * usk
    #[serde(with = "SerializeElement")]
    pub(crate) w: G2Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) h_sk: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) h_rand: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) bar_g1: G1Affine,
    /// bar_g1 * usk
    #[serde(with = "SerializeElement")]
    pub(crate) bar_g2: G1Affine,
    pub(crate) proof: KeyProof,
    #[serde(with = "SerializeElement")]
    pub(crate) hash: Scalar,
}

/// A keypair formed from a [`UserSecretKey`] and a [`UserPublicKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKeyPair {
    sk: UserSecretKey,
    pk: UserPublicKey,
}

/// The authority's tracing entry for one enrolled user: `t = g2 * usk` and the user public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(with = "SerializeElement")]
    pub(crate) t: G2Affine,
    pub(crate) upk: UserPublicKey,
}

#[cfg(feature = "sqlite")]
crate::impl_sqlx_for_bincode_ty!(UserKeyPair);
#[cfg(feature = "sqlite")]
crate::impl_sqlx_for_bincode_ty!(Trace);

impl UserKeyPair {
    /// Generate a new user key pair and the corresponding [`Trace`].
    ///
    /// Fails if an attribute name appears more than once.
    pub fn new<S: AsRef<str>>(
        rng: &mut impl Rng,
        attribute_names: &[S],
    ) -> Result<(Self, Trace), Error> {
        let attribute_names = distinct_attribute_names(attribute_names)?;
        let sk = UserSecretKey::new(&mut *rng);
        let usk = sk.0;

        let upk = G1Affine::from(G1Affine::generator() * usk);
        let w = G2Affine::from(G2Affine::generator() * usk);

        let h_sk = random_g1_base(rng);
        let h_rand = random_g1_base(rng);
        let bar_g1 = random_g1_base(rng);
        let bar_g2 = G1Affine::from(bar_g1 * usk);

        let proof = KeyProof::prove(rng, &usk, &bar_g1, &w, &bar_g2);

        let mut pk = UserPublicKey {
            attribute_names,
            upk,
            w,
            h_sk,
            h_rand,
            bar_g1,
            bar_g2,
            proof,
            hash: Scalar::zero(),
        };
        pk.set_hash();
        debug!("generated user key for {} attributes", pk.attribute_names.len());

        let trace = Trace {
            t: G2Affine::from(G2Affine::generator() * usk),
            upk: pk.clone(),
        };
        Ok((Self { sk, pk }, trace))
    }

    /// Get the public portion of the `UserKeyPair`.
    pub fn public_key(&self) -> &UserPublicKey {
        &self.pk
    }

    /// Get the secret portion of the `UserKeyPair`.
    pub fn secret_key(&self) -> &UserSecretKey {
        &self.sk
    }
}

impl UserPublicKey {
    /// Validate this public key and normalize its hash.
    ///
    /// Fails if any base is the identity or if the proof of knowledge does not verify. On
    /// success the `hash` field is recomputed.
    pub fn check(&mut self) -> Result<(), Error> {
        let g1_bases = [
            ("upk", &self.upk),
            ("h_sk", &self.h_sk),
            ("h_rand", &self.h_rand),
            ("bar_g1", &self.bar_g1),
            ("bar_g2", &self.bar_g2),
        ];
        if let Some(&(name, _)) = g1_bases
            .iter()
            .find(|(_, base)| bool::from(base.is_identity()))
        {
            return Err(Error::Malformed(name));
        }
        if bool::from(self.w.is_identity()) {
            return Err(Error::Malformed("w"));
        }

        if !self.proof.verify(&self.bar_g1, &self.w, &self.bar_g2) {
            warn!("user public key carries an invalid proof of knowledge");
            return Err(Error::ProofInvalid);
        }

        self.set_hash();
        Ok(())
    }

    fn set_hash(&mut self) {
        self.hash = ChallengeBuilder::new().with(self).finish().to_scalar();
    }

    /// Names of the attributes this user holds.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// `g1 * usk`, the value credentials are issued over.
    pub fn upk(&self) -> G1Affine {
        self.upk
    }

    /// `g2 * usk`.
    pub fn w(&self) -> G2Affine {
        self.w
    }

    /// Digest of the public key.
    pub fn hash(&self) -> Scalar {
        self.hash
    }
}

impl ChallengeDigest for UserPublicKey {
    fn digest(&self, builder: &mut ChallengeBuilder) {
        builder.digest_bytes((self.attribute_names.len() as u64).to_le_bytes());
        for name in &self.attribute_names {
            builder.digest_bytes((name.len() as u64).to_le_bytes());
            builder.digest_bytes(name.as_bytes());
        }
        builder.digest(&self.upk);
        builder.digest(&self.w);
        builder.digest(&self.h_sk);
        builder.digest(&self.h_rand);
        builder.digest(&self.bar_g1);
        builder.digest(&self.bar_g2);
        builder.digest(&self.proof.challenge_scalar());
        builder.digest(&self.proof.response());
    }
}

impl Trace {
    /// The tracing value `g2 * usk`.
    pub fn t(&self) -> G2Affine {
        self.t
    }

    /// The public key of the user this trace identifies.
    pub fn user_public_key(&self) -> &UserPublicKey {
        &self.upk
    }

    /// Whether the tracing value uses the same exponent as the public key it names.
    pub fn is_consistent(&self) -> bool {
        self.t == self.upk.w
    }
}
