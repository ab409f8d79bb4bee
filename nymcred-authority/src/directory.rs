//! Directory of enrolled users' public keys.

use nymcred_crypto::user::UserPublicKey;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage for user public keys, keyed by user identifier.
pub trait KeyDirectory {
    /// The public key registered for `user_id`, if any.
    fn get(&self, user_id: &str) -> Option<UserPublicKey>;

    /// Register `upk` for `user_id`, replacing any earlier key.
    fn set(&self, user_id: &str, upk: UserPublicKey);
}

/// An in-memory [`KeyDirectory`].
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    keys: RwLock<HashMap<String, UserPublicKey>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyDirectory for MemoryDirectory {
    fn get(&self, user_id: &str) -> Option<UserPublicKey> {
        self.keys.read().get(user_id).cloned()
    }

    fn set(&self, user_id: &str, upk: UserPublicKey) {
        let _ = self.keys.write().insert(user_id.to_owned(), upk);
    }
}
