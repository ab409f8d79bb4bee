//! Binary and text encodings for wire records.
//!
//! Records are encoded with `bincode`; group elements and scalars inside them use the
//! fixed-width canonical forms of [`SerializeElement`](crate::SerializeElement). Records that have
//! to travel inside text (ledger entries, configuration files) are additionally wrapped in
//! standard base64.

use crate::Error;
use serde::{de::DeserializeOwned, Serialize};

/// Encode a value into its binary record form.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    bincode::serialize(value).map_err(|err| Error::Serialization(err.to_string()))
}

/// Decode a value from its binary record form.
///
/// Fails on truncated input and on any non-canonical group element or scalar.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    bincode::deserialize(bytes).map_err(|err| Error::Serialization(err.to_string()))
}

/// Encode a value as base64 text.
pub fn to_base64<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(base64::encode(encode(value)?))
}

/// Decode a value from base64 text.
pub fn from_base64<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let bytes = base64::decode(text).map_err(|err| Error::Serialization(err.to_string()))?;
    decode(&bytes)
}
