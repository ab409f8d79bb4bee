//! Schnorr-style zero-knowledge proofs made non-interactive with the Fiat-Shamir heuristic.

mod challenge;
mod key;
mod request;

pub use self::{challenge::*, key::*, request::*};
