//! The public ledger holders publish signed records to.
//!
//! A [`Record`] pairs some content with the encoded nym signature over it. Ledgers store encoded
//! records and address them by [`TransactionId`], the hex SHA3-256 digest of the stored bytes.

use crate::Error;
use nymcred_crypto::{encoding, nym::NymSignature};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::{collections::HashMap, fmt};

/// Identifier of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// The identifier for a transaction carrying `bytes`.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha3_256::digest(bytes)))
    }

    /// Parse an identifier in its hex form.
    pub fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = hex::decode(text).map_err(|err| Error::Ledger(err.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::Ledger(format!(
                "transaction id has {} bytes, expected 32",
                bytes.len()
            )));
        }
        Ok(Self(text.to_ascii_lowercase()))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ledger entry: content and an encoded nym signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The encoded [`NymSignature`].
    pub nym_cred: Vec<u8>,
    /// The signed content.
    pub content: String,
}

impl Record {
    /// Build a record from the content and the signature over it.
    pub fn new(content: impl Into<String>, signature: &NymSignature) -> Result<Self, Error> {
        Ok(Self {
            nym_cred: encoding::encode(signature)?,
            content: content.into(),
        })
    }

    /// Decode the signature carried by this record.
    pub fn signature(&self) -> Result<NymSignature, Error> {
        Ok(encoding::decode(&self.nym_cred)?)
    }

    /// Encode the record for storage on a ledger.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(encoding::encode(self)?)
    }

    /// Decode a record read from a ledger.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(encoding::decode(bytes)?)
    }
}

/// Storage for published transactions.
pub trait Ledger {
    /// Store `bytes` and return the identifier of the new transaction.
    fn put(&self, bytes: Vec<u8>) -> Result<TransactionId, Error>;

    /// Read the bytes of a stored transaction.
    fn get(&self, id: &TransactionId) -> Result<Vec<u8>, Error>;
}

/// An in-memory [`Ledger`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    transactions: RwLock<HashMap<TransactionId, Vec<u8>>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ledger for MemoryLedger {
    fn put(&self, bytes: Vec<u8>) -> Result<TransactionId, Error> {
        let id = TransactionId::for_bytes(&bytes);
        let _ = self.transactions.write().insert(id.clone(), bytes);
        Ok(id)
    }

    fn get(&self, id: &TransactionId) -> Result<Vec<u8>, Error> {
        self.transactions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Ledger(format!("unknown transaction {}", id)))
    }
}
