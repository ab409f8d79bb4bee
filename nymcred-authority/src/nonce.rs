//! Cryptographically random issuer nonces.
use crate::{types::*, Rng};
use ff::Field;
use serde::*;

/// A random nonce handed to a holder before it builds a credential request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce(#[serde(with = "SerializeElement")] pub(crate) Scalar);

impl Nonce {
    /// Generate a new cryptographically random nonce with the given random number generator.
    pub(crate) fn new(rng: &mut impl Rng) -> Self {
        Self(Scalar::random(rng))
    }

    /// Convert a nonce to its canonical `Scalar` representation.
    pub fn to_scalar(self) -> Scalar {
        self.0
    }
}
