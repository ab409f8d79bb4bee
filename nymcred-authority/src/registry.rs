//! The authority's registry of enrolled users' traces.
//!
//! Entries are appended at enrollment and never modified. Each trace is kept with the identifier
//! of the user it was enrolled for, so an arbitration can name the signer and not only return its
//! public key. Appends take the write lock; an arbitration holds the read lock for its whole scan,
//! so it sees a consistent prefix of the registry.

use log::{debug, warn};
use nymcred_crypto::{
    arbitration,
    nym::NymSignature,
    user::{Trace, UserPublicKey},
    Error,
};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Entries {
    user_ids: Vec<String>,
    traces: Vec<Trace>,
}

/// Append-only list of [`Trace`]s and the users they belong to, safe to share between threads.
#[derive(Debug, Default)]
pub struct TraceRegistry {
    entries: RwLock<Entries>,
}

impl TraceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the trace of the user `user_id`.
    ///
    /// Fails if the tracing value does not belong to the public key it names.
    pub fn append(&self, user_id: &str, trace: Trace) -> Result<(), Error> {
        if !trace.is_consistent() {
            warn!("refusing to register an inconsistent trace for {}", user_id);
            return Err(Error::Malformed("trace"));
        }
        let mut entries = self.entries.write();
        entries.user_ids.push(user_id.to_owned());
        entries.traces.push(trace);
        debug!("registered trace #{} for {}", entries.traces.len(), user_id);
        Ok(())
    }

    /// Recover the public key of the user who produced `sig`.
    pub fn arbitrate(&self, sig: &NymSignature) -> Result<UserPublicKey, Error> {
        self.identify(sig).map(|(_, upk)| upk)
    }

    /// Recover the identifier and public key of the user who produced `sig`.
    pub fn identify(&self, sig: &NymSignature) -> Result<(String, UserPublicKey), Error> {
        let entries = self.entries.read();
        let index = arbitration::find_signer(&entries.traces, sig)?;
        Ok((
            entries.user_ids[index].clone(),
            entries.traces[index].user_public_key().clone(),
        ))
    }

    /// Number of registered traces.
    pub fn len(&self) -> usize {
        self.entries.read().traces.len()
    }

    /// Whether no trace has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().traces.is_empty()
    }

    /// A copy of the registered traces, in insertion order.
    pub fn snapshot(&self) -> Vec<Trace> {
        self.entries.read().traces.clone()
    }

    /// Every enrolled user and the public key in their trace, in insertion order.
    pub fn users(&self) -> Vec<(String, UserPublicKey)> {
        let entries = self.entries.read();
        entries
            .user_ids
            .iter()
            .cloned()
            .zip(entries.traces.iter().map(|trace| trace.user_public_key().clone()))
            .collect()
    }
}
