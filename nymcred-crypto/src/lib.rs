//! This crate implements traceable anonymous credentials instantiated over the pairing-friendly
//! curve BLS12-381:
//! - Issuer and user key pairs, each carrying a Schnorr proof of knowledge of its secret
//!   exponents.
//! - Per-attribute credential signatures issued over a user's public key after a credential
//!   request proves knowledge of the user secret.
//! - Unlinkable nym signatures which selectively disclose attributes and prove possession of
//!   the hidden ones.
//! - Arbitration, which lets the certifying authority recover the signer of a nym signature from
//!   the traces it recorded at enrollment time.

#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod arbitration;
pub mod credential;
pub mod encoding;
pub mod issuer;
pub mod nym;
pub mod proofs;
pub mod user;

mod serde;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use crate::serde::SerializeElement;
pub use common::Rng;

use thiserror::*;

/// Error types that may arise from cryptographic operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An attribute name was listed more than once in the attribute names.
    #[error("attribute {0} appears multiple times in the attribute names")]
    DuplicateAttribute(String),
    /// The number of attribute values does not match the attribute names.
    #[error("expected {expected} attributes, got {got}")]
    AttributeCountMismatch {
        /// The number of attribute names.
        expected: usize,
        /// The number of attributes supplied.
        got: usize,
    },
    /// Some part of a key or signature is undefined (the identity element).
    #[error("some part of the input is undefined: {0}")]
    Malformed(&'static str),
    /// A credential holds no attributes.
    #[error("credential has no value for any attribute")]
    EmptyCredential,
    /// A credential does not hold a value or signature for the named attribute.
    #[error("credential has no value for attribute {0}")]
    MissingAttribute(String),
    /// A recomputed Fiat-Shamir challenge does not match the stored challenge.
    #[error("zero knowledge proof is invalid")]
    ProofInvalid,
    /// The credential request does not prove knowledge of the enrolled user secret.
    #[error("credential request is invalid")]
    RequestInvalid,
    /// A pairing equation does not hold.
    #[error("pairing check failed for {0}")]
    PairingMismatch(String),
    /// No trace in the registry matches the nym signature.
    #[error("no enrolled user matches the nym signature")]
    NotFound,
    /// Encoding or decoding a wire record failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed, duplicate or mismatched inputs.
    Input,
    /// A recomputed challenge did not match the stored challenge.
    ProofVerification,
    /// A bilinear equation did not hold.
    PairingMismatch,
    /// Arbitration found no matching user.
    NotFound,
    /// Encoding or decoding failed.
    Serialization,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateAttribute(_)
            | Error::AttributeCountMismatch { .. }
            | Error::Malformed(_)
            | Error::EmptyCredential
            | Error::MissingAttribute(_) => ErrorKind::Input,
            Error::ProofInvalid | Error::RequestInvalid => ErrorKind::ProofVerification,
            Error::PairingMismatch(_) => ErrorKind::PairingMismatch,
            Error::NotFound => ErrorKind::NotFound,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

mod common {
    //! Common types used internally.

    pub use bls12_381::{
        multi_miller_loop, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar,
    };
    pub use group::{Group, GroupEncoding};

    use crate::Error;
    use ff::Field;
    use std::collections::HashSet;

    /// Width of a compressed G1 element.
    pub const G1_BYTES: usize = 48;
    /// Width of a compressed G2 element.
    pub const G2_BYTES: usize = 96;
    /// Width of a canonical scalar.
    pub const SCALAR_BYTES: usize = 32;

    /// A trait synonym for a cryptographically secure random number generator. This trait is
    /// blanket-implemented for all valid types and will never need to be implemented by-hand.
    pub trait Rng: rand::CryptoRng + rand::RngCore {}
    impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}

    /// Select a non-zero scalar uniformly at random.
    pub fn random_nonzero_scalar(rng: &mut impl Rng) -> Scalar {
        loop {
            let r = Scalar::random(&mut *rng);
            if !r.is_zero() {
                return r;
            }
        }
    }

    /// Select a non-identity element of G1 as a random multiple of the generator.
    pub fn random_g1_base(rng: &mut impl Rng) -> G1Affine {
        (G1Affine::generator() * random_nonzero_scalar(rng)).into()
    }

    /// Reject attribute name lists which contain a name more than once.
    pub fn distinct_attribute_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, Error> {
        let mut seen = HashSet::with_capacity(names.len());
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if seen.insert(name) {
                    Ok(name.to_owned())
                } else {
                    Err(Error::DuplicateAttribute(name.to_owned()))
                }
            })
            .collect()
    }

    /// Check the pairing-product equation `prod e(p_i, q_i) == 1`.
    pub fn pairing_product_is_identity(terms: &[(&G1Affine, &G2Prepared)]) -> bool {
        multi_miller_loop(terms).final_exponentiation() == Gt::identity()
    }
}
