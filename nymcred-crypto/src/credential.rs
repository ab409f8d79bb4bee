//! Credentials: one issuer signature per attribute, bound to a user's public key.
//!
//! For each attribute the issuer draws a fresh `r` and signs
//!
//! ```text
//! a = g1 * r
//! b = a * x + upk * (r * y)        // = g1 * r(x + usk * y)
//! ```
//!
//! so that `e(a, bar_y * usk + bar_x) == e(b, g2)` holds exactly for the holder of `usk`.

use crate::{
    common::*,
    issuer::{IssuerKeyPair, IssuerPublicKey},
    proofs::CredentialRequest,
    serde::SerializeElement,
    user::{UserPublicKey, UserSecretKey},
    Error,
};
use ff::Field;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Issuer signature on a single attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAttribute {
    #[serde(with = "SerializeElement")]
    pub(crate) a: G1Affine,
    #[serde(with = "SerializeElement")]
    pub(crate) b: G1Affine,
}

/// A credential: the signed attributes, the raw attribute values, and their names, all in the
/// order of the issuer's attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub(crate) creds: Vec<SignedAttribute>,
    #[serde(with = "SerializeElement")]
    pub(crate) attrs: Vec<Scalar>,
    pub(crate) attribute_names: Vec<String>,
}

#[cfg(feature = "sqlite")]
crate::impl_sqlx_for_bincode_ty!(Credential);

impl Credential {
    /// Issue a credential over `attrs` to the user with public key `upk`.
    ///
    /// **Warning**: the caller must make sure `upk` belongs to an enrolled user; this checks the
    /// request against it but does not look it up anywhere.
    ///
    /// Fails if the number of attributes does not match the user's and the issuer's attribute
    /// names, or if the request does not prove knowledge of the secret behind `upk`.
    pub fn issue(
        rng: &mut impl Rng,
        issuer: &IssuerKeyPair,
        request: &CredentialRequest,
        upk: &UserPublicKey,
        attrs: &[Scalar],
    ) -> Result<Self, Error> {
        let ipk = issuer.public_key();
        if attrs.len() != upk.attribute_names.len() {
            return Err(Error::AttributeCountMismatch {
                expected: upk.attribute_names.len(),
                got: attrs.len(),
            });
        }
        if attrs.len() != ipk.attribute_names.len() {
            return Err(Error::AttributeCountMismatch {
                expected: ipk.attribute_names.len(),
                got: attrs.len(),
            });
        }

        request.check(ipk)?;
        request.check_binding(ipk, upk)?;

        let isk = issuer.secret_key();
        let creds = attrs
            .iter()
            .map(|_| {
                let r = Scalar::random(&mut *rng);
                let a = G1Affine::generator() * r;
                let b = a * isk.x + upk.upk * (r * isk.y);
                SignedAttribute {
                    a: a.into(),
                    b: b.into(),
                }
            })
            .collect();
        debug!("issued credential over {} attributes", attrs.len());

        Ok(Self {
            creds,
            attrs: attrs.to_vec(),
            attribute_names: ipk.attribute_names.clone(),
        })
    }

    /// Verify every signed attribute against the holder's secret key and the issuer public key.
    pub fn verify(&self, usk: &UserSecretKey, ipk: &IssuerPublicKey) -> Result<(), Error> {
        if self.attrs.is_empty() {
            return Err(Error::EmptyCredential);
        }
        if let Some(name) = self.first_missing_attribute() {
            return Err(Error::MissingAttribute(name));
        }

        // e(a, bar_y * usk + bar_x) * e(b, -g2) == 1
        let bar_y_eff = G2Prepared::from(G2Affine::from(ipk.bar_y * usk.0 + ipk.bar_x));
        let neg_g2 = G2Prepared::from(-G2Affine::generator());

        for (signed, name) in self.creds.iter().zip(&self.attribute_names) {
            if !pairing_product_is_identity(&[(&signed.a, &bar_y_eff), (&signed.b, &neg_g2)]) {
                warn!("credential signature on attribute {} does not verify", name);
                return Err(Error::PairingMismatch(name.clone()));
            }
        }
        Ok(())
    }

    /// The first attribute name without a matching value or signature, if the parallel vectors
    /// disagree in length.
    fn first_missing_attribute(&self) -> Option<String> {
        let lengths = [
            self.creds.len(),
            self.attrs.len(),
            self.attribute_names.len(),
        ];
        let complete = lengths.iter().copied().min().unwrap_or(0);
        if lengths.iter().all(|&len| len == complete) {
            return None;
        }
        Some(
            self.attribute_names
                .get(complete)
                .cloned()
                .unwrap_or_else(|| format!("#{}", complete)),
        )
    }

    /// Number of attributes in the credential.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the credential holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Raw attribute values.
    pub fn attrs(&self) -> &[Scalar] {
        &self.attrs
    }

    /// Attribute names.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Signed attributes.
    pub fn signed_attributes(&self) -> &[SignedAttribute] {
        &self.creds
    }
}

impl SignedAttribute {
    /// The `a` (or `g1 * r`) component.
    pub fn a(&self) -> G1Affine {
        self.a
    }

    /// The `b` component.
    pub fn b(&self) -> G1Affine {
        self.b
    }
}
