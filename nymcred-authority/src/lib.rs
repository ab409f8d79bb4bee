/*!
This crate runs the traceable nym credential protocol between a certifying authority and the
holders it enrolls, on top of the primitives in `nymcred-crypto`.

An [`Authority`] owns the issuer key pair, the [`TraceRegistry`] of enrolled users and a
[`KeyDirectory`] of their public keys. A [`Holder`] owns a user key pair and, once issued, a
credential, which it uses to sign records it publishes to a [`Ledger`]. Given a published
transaction the authority can recover the public key of the holder that signed it, or
[the identifier](Authority::identify_transaction()) it enrolled that holder under.

 ## Issuance

 1. The authority [enrolls](Authority::enroll()) a user, recording their trace.
 2. The holder answers an [issuer nonce](Authority::issuer_nonce()) with a
    [credential request](Holder::request_credential()).
 3. The authority [issues](Authority::issue()) a credential, which the holder
    [accepts](Holder::accept()) after verifying it.
*/
#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]
#![forbid(rustdoc::broken_intra_doc_links)]

pub mod authority;
pub mod config;
pub mod directory;
pub mod holder;
pub mod ledger;
pub mod registry;

pub use authority::Authority;
pub use config::Config;
pub use directory::{KeyDirectory, MemoryDirectory};
pub use holder::Holder;
pub use ledger::{Ledger, MemoryLedger, Record, TransactionId};
pub use nonce::Nonce;
pub use registry::TraceRegistry;

mod nonce;

mod types {
    pub use bls12_381::Scalar;
    pub use nymcred_crypto::SerializeElement;
}

pub use nymcred_crypto::Rng;

use thiserror::Error;

/// Error types that may arise while running the protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A cryptographic check failed.
    #[error(transparent)]
    Crypto(#[from] nymcred_crypto::Error),
    /// The key directory has no public key for the user.
    #[error("no public key is registered for user {0}")]
    UnknownUser(String),
    /// The ledger could not store or produce a transaction.
    #[error("ledger error: {0}")]
    Ledger(String),
    /// The holder has not accepted a credential yet.
    #[error("holder has no credential")]
    MissingCredential,
}
