//! A credential holder: requests a credential, signs with it, and publishes signed records.

use crate::{
    ledger::{Ledger, Record, TransactionId},
    nonce::Nonce,
    Error, Rng,
};
use log::debug;
use nymcred_crypto::{
    credential::Credential,
    issuer::IssuerPublicKey,
    nym::{NymSignature, RevocationInformation},
    proofs::CredentialRequest,
    user::UserKeyPair,
};

/// A user's key pair and, once accepted, their credential.
#[derive(Debug, Clone)]
pub struct Holder {
    key: UserKeyPair,
    credential: Option<Credential>,
}

impl Holder {
    /// A holder with the given key pair and no credential yet.
    pub fn new(key: UserKeyPair) -> Self {
        Self {
            key,
            credential: None,
        }
    }

    /// The holder's key pair.
    pub fn key(&self) -> &UserKeyPair {
        &self.key
    }

    /// The accepted credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Answer an issuer nonce with a credential request.
    pub fn request_credential(
        &self,
        rng: &mut impl Rng,
        ipk: &IssuerPublicKey,
        issuer_nonce: Nonce,
    ) -> CredentialRequest {
        CredentialRequest::new(rng, self.key.secret_key(), issuer_nonce.to_scalar(), ipk)
    }

    /// Verify an issued credential and keep it.
    ///
    /// A credential that does not verify against the holder's secret is discarded and any
    /// previously accepted credential is kept.
    pub fn accept(&mut self, credential: Credential, ipk: &IssuerPublicKey) -> Result<(), Error> {
        credential.verify(self.key.secret_key(), ipk)?;
        debug!("accepted credential over {} attributes", credential.len());
        self.credential = Some(credential);
        Ok(())
    }

    /// Produce a nym signature on `message`, disclosing the attributes whose `disclosure` byte
    /// is non-zero.
    pub fn sign(
        &self,
        rng: &mut impl Rng,
        ipk: &IssuerPublicKey,
        message: &[u8],
        disclosure: &[u8],
        revocation: Option<&RevocationInformation>,
    ) -> Result<NymSignature, Error> {
        let credential = self.credential.as_ref().ok_or(Error::MissingCredential)?;
        Ok(NymSignature::new(
            rng,
            self.key.secret_key(),
            credential,
            ipk,
            message,
            disclosure,
            revocation,
        )?)
    }

    /// Sign `content` and publish it to `ledger`.
    pub fn publish(
        &self,
        rng: &mut impl Rng,
        ledger: &impl Ledger,
        ipk: &IssuerPublicKey,
        content: &str,
        disclosure: &[u8],
    ) -> Result<TransactionId, Error> {
        let signature = self.sign(rng, ipk, content.as_bytes(), disclosure, None)?;
        let record = Record::new(content, &signature)?;
        let id = ledger.put(record.to_bytes()?)?;
        debug!("published record as transaction {}", id);
        Ok(id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;
    use nymcred_crypto::issuer::IssuerKeyPair;

    #[test]
    fn signing_needs_a_credential() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &["A1"]).unwrap();
        let (key, _) = UserKeyPair::new(&mut rng, &["A1"]).unwrap();
        let holder = Holder::new(key);

        assert!(holder.credential().is_none());
        assert_eq!(
            holder
                .sign(&mut rng, issuer.public_key(), b"m", &[0], None)
                .unwrap_err(),
            Error::MissingCredential
        );
    }

    #[test]
    fn credential_for_other_key_is_refused() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &["A1"]).unwrap();
        let (key, _) = UserKeyPair::new(&mut rng, &["A1"]).unwrap();
        let (other, _) = UserKeyPair::new(&mut rng, &["A1"]).unwrap();
        let mut holder = Holder::new(key);
        let other_holder = Holder::new(other.clone());

        let nonce = Nonce::new(&mut rng);
        let request = other_holder.request_credential(&mut rng, issuer.public_key(), nonce);
        let credential = Credential::issue(
            &mut rng,
            &issuer,
            &request,
            other.public_key(),
            &[bls12_381::Scalar::from(5u64)],
        )
        .unwrap();

        assert!(matches!(
            holder.accept(credential, issuer.public_key()),
            Err(Error::Crypto(nymcred_crypto::Error::PairingMismatch(_)))
        ));
        assert!(holder.credential().is_none());
    }
}
