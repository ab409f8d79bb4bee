//! Proof of knowledge of a key exponent shared between a G2 public value and a G1 public value.
//!
//! Issuer and user key pairs publish `target2 = g2 * k` and `target1 = bar_g1 * k` for a secret
//! exponent `k`. A [`KeyProof`] shows that the same `k` underlies both, without revealing it.

use crate::{
    common::*,
    proofs::{Challenge, ChallengeBuilder},
    serde::SerializeElement,
};
use ff::Field;
use serde::{Deserialize, Serialize};

/// Length of the key proof transcript `t1 ‖ t2 ‖ g2 ‖ bar_g1 ‖ target2 ‖ target1`.
pub const KEY_PROOF_TRANSCRIPT_LEN: usize = 3 * G2_BYTES + 3 * G1_BYTES;

/// Fully constructed proof of knowledge of a key exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyProof {
    /// Fiat-Shamir challenge.
    c: Challenge,
    /// Response scalar `s = r + c * k`.
    #[serde(with = "SerializeElement")]
    s: Scalar,
}

impl KeyProof {
    /// Prove knowledge of `secret` such that `target2 = g2 * secret` and
    /// `target1 = bar_g1 * secret`.
    pub(crate) fn prove(
        rng: &mut impl Rng,
        secret: &Scalar,
        bar_g1: &G1Affine,
        target2: &G2Affine,
        target1: &G1Affine,
    ) -> Self {
        let r = Scalar::random(&mut *rng);

        // t1 = g2 * r, t2 = bar_g1 * r
        let t1 = G2Affine::from(G2Affine::generator() * r);
        let t2 = G1Affine::from(bar_g1 * r);

        let c = Self::challenge(&t1, &t2, bar_g1, target2, target1);
        Self {
            c,
            s: r + c.to_scalar() * secret,
        }
    }

    /// Verify the proof against the public values it was built on.
    pub fn verify(&self, bar_g1: &G1Affine, target2: &G2Affine, target1: &G1Affine) -> bool {
        let c = self.c.to_scalar();

        // t1 = g2 * s - target2 * c, t2 = bar_g1 * s - target1 * c
        let t1 = G2Affine::from(G2Affine::generator() * self.s - target2 * c);
        let t2 = G1Affine::from(bar_g1 * self.s - target1 * c);

        Self::challenge(&t1, &t2, bar_g1, target2, target1) == self.c
    }

    fn challenge(
        t1: &G2Affine,
        t2: &G1Affine,
        bar_g1: &G1Affine,
        target2: &G2Affine,
        target1: &G1Affine,
    ) -> Challenge {
        let builder = ChallengeBuilder::new()
            .with(t1)
            .with(t2)
            .with(&G2Affine::generator())
            .with(bar_g1)
            .with(target2)
            .with(target1);
        debug_assert_eq!(builder.absorbed(), KEY_PROOF_TRANSCRIPT_LEN);
        builder.finish()
    }

    /// The challenge of this proof.
    pub fn challenge_scalar(&self) -> Scalar {
        self.c.to_scalar()
    }

    /// The response of this proof.
    pub fn response(&self) -> Scalar {
        self.s
    }

    #[cfg(test)]
    pub(crate) fn with_response(self, s: Scalar) -> Self {
        Self { s, ..self }
    }
}
