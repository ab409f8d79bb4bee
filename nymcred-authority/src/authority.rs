//! The certifying authority: enrollment, credential issuance, verification and tracing.

use crate::{
    config::Config,
    directory::{KeyDirectory, MemoryDirectory},
    ledger::{Ledger, Record, TransactionId},
    nonce::Nonce,
    registry::TraceRegistry,
    types::Scalar,
    Error, Rng,
};
use log::{info, warn};
use nymcred_crypto::{
    credential::Credential,
    issuer::{IssuerKeyPair, IssuerPublicKey},
    nym::NymSignature,
    proofs::CredentialRequest,
    user::{UserKeyPair, UserPublicKey},
};

/// A certifying authority.
///
/// Holds the issuer key pair, the trace registry and the directory of enrolled users' public
/// keys. All methods take `&self`, so one authority can serve several threads.
#[derive(Debug)]
pub struct Authority<D = MemoryDirectory> {
    issuer: IssuerKeyPair,
    registry: TraceRegistry,
    directory: D,
}

impl Authority {
    /// Set up an authority with a fresh issuer key and an in-memory key directory.
    pub fn new(rng: &mut impl Rng, config: &Config) -> Result<Self, Error> {
        Self::with_directory(rng, config, MemoryDirectory::new())
    }
}

impl<D: KeyDirectory> Authority<D> {
    /// Set up an authority with a fresh issuer key, storing user public keys in `directory`.
    pub fn with_directory(rng: &mut impl Rng, config: &Config, directory: D) -> Result<Self, Error> {
        let issuer = IssuerKeyPair::new(rng, &config.attribute_names)?;
        let mut ipk = issuer.public_key().clone();
        ipk.check()?;
        info!(
            "certifying authority ready for attributes {:?}",
            config.attribute_names
        );
        Ok(Self {
            issuer,
            registry: TraceRegistry::new(),
            directory,
        })
    }

    /// Names of the certified attributes, in credential order.
    pub fn attribute_names(&self) -> &[String] {
        self.issuer.public_key().attribute_names()
    }

    /// The issuer public key holders and verifiers use.
    pub fn issuer_public_key(&self) -> &IssuerPublicKey {
        self.issuer.public_key()
    }

    /// The registry of enrolled users' traces.
    pub fn registry(&self) -> &TraceRegistry {
        &self.registry
    }

    /// Generate a key pair for a new user, register its trace and public key, and hand the key
    /// pair to the user.
    pub fn enroll<S: AsRef<str>>(
        &self,
        rng: &mut impl Rng,
        user_id: &str,
        attribute_names: &[S],
    ) -> Result<UserKeyPair, Error> {
        let (key_pair, trace) = UserKeyPair::new(rng, attribute_names)?;
        let mut upk = key_pair.public_key().clone();
        upk.check()?;

        self.registry.append(user_id, trace)?;
        self.directory.set(user_id, upk);
        info!("enrolled user {}", user_id);
        Ok(key_pair)
    }

    /// The public key registered for `user_id`.
    pub fn user_public_key(&self, user_id: &str) -> Result<UserPublicKey, Error> {
        self.directory
            .get(user_id)
            .ok_or_else(|| Error::UnknownUser(user_id.to_owned()))
    }

    /// Every enrolled user and the public key recorded in their trace, in enrollment order.
    pub fn enrolled_users(&self) -> Vec<(String, UserPublicKey)> {
        self.registry.users()
    }

    /// A fresh nonce for a credential request.
    pub fn issuer_nonce(&self, rng: &mut impl Rng) -> Nonce {
        Nonce::new(rng)
    }

    /// Issue a credential over `attrs` to the enrolled user `user_id`.
    ///
    /// Fails if the user is unknown, if the request does not prove knowledge of the user's
    /// secret, or if the attribute count is wrong.
    pub fn issue(
        &self,
        rng: &mut impl Rng,
        user_id: &str,
        request: &CredentialRequest,
        attrs: &[Scalar],
    ) -> Result<Credential, Error> {
        let upk = self.user_public_key(user_id)?;
        let credential = Credential::issue(rng, &self.issuer, request, &upk, attrs)?;
        info!("issued credential to user {}", user_id);
        Ok(credential)
    }

    /// Verify a nym signature on `message` against the issuer key.
    pub fn verify(&self, signature: &NymSignature, message: &[u8]) -> Result<(), Error> {
        signature.verify(self.issuer.public_key(), message, None, 0)?;
        Ok(())
    }

    /// Recover the public key of the enrolled user who produced `signature`.
    pub fn trace(&self, signature: &NymSignature) -> Result<UserPublicKey, Error> {
        self.registry.arbitrate(signature).map_err(|err| {
            warn!("could not trace nym signature: {}", err);
            err.into()
        })
    }

    /// Recover the identifier of the enrolled user who produced `signature`.
    pub fn identify(&self, signature: &NymSignature) -> Result<String, Error> {
        match self.registry.identify(signature) {
            Ok((user_id, _)) => {
                info!("nym signature traced to user {}", user_id);
                Ok(user_id)
            }
            Err(err) => {
                warn!("could not identify nym signature: {}", err);
                Err(err.into())
            }
        }
    }

    /// Read a published record from `ledger`, verify its signature over the record content and
    /// trace its signer.
    pub fn trace_transaction(
        &self,
        ledger: &impl Ledger,
        id: &TransactionId,
    ) -> Result<UserPublicKey, Error> {
        let signature = self.verified_signature(ledger, id)?;
        self.trace(&signature)
    }

    /// As [`trace_transaction`](Self::trace_transaction), but name the signer.
    pub fn identify_transaction(
        &self,
        ledger: &impl Ledger,
        id: &TransactionId,
    ) -> Result<String, Error> {
        let signature = self.verified_signature(ledger, id)?;
        self.identify(&signature)
    }

    fn verified_signature(
        &self,
        ledger: &impl Ledger,
        id: &TransactionId,
    ) -> Result<NymSignature, Error> {
        let record = Record::from_bytes(&ledger.get(id)?)?;
        let signature = record.signature()?;
        self.verify(&signature, record.content.as_bytes())?;
        Ok(signature)
    }
}
