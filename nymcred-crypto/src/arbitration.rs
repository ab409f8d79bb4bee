//! Arbitration: recover the enrolled user behind a nym signature.
//!
//! A signature's pseudonym pair satisfies `eta = xi * usk`, and the trace recorded at enrollment
//! holds `t = g2 * usk`, so the signer's trace is the one for which `e(eta, g2) == e(xi, t)`.
//! Traces are scanned in registry order and the first match wins.

use crate::{common::*, nym::NymSignature, user::Trace, user::UserPublicKey, Error};
use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Find the public key of the user who produced `sig` among `traces`.
///
/// Returns [`Error::NotFound`] if no trace matches and [`Error::Malformed`] if the signature's
/// pseudonym is the identity.
pub fn arbitrate<'a>(traces: &'a [Trace], sig: &NymSignature) -> Result<&'a UserPublicKey, Error> {
    let index = find_signer(traces, sig)?;
    Ok(&traces[index].upk)
}

/// Position in `traces` of the first trace matching the signer of `sig`.
///
/// Callers that keep per-user data alongside the traces use this to map a signature back to it.
pub fn find_signer(traces: &[Trace], sig: &NymSignature) -> Result<usize, Error> {
    sig.check_pseudonym()?;

    // e(eta, g2) * e(xi, -t) == 1
    let g2 = G2Prepared::from(G2Affine::generator());
    let neg_xi = -sig.xi;
    let matches = |trace: &Trace| {
        pairing_product_is_identity(&[(&sig.eta, &g2), (&neg_xi, &G2Prepared::from(trace.t))])
    };

    debug!("arbitrating nym signature over {} traces", traces.len());
    #[cfg(not(feature = "parallel"))]
    let found = traces.iter().position(matches);
    #[cfg(feature = "parallel")]
    let found = traces.par_iter().position_first(matches);

    match found {
        Some(index) => {
            info!("arbitration matched trace #{}", index);
            Ok(index)
        }
        None => Err(Error::NotFound),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        credential::Credential, issuer::IssuerKeyPair, proofs::CredentialRequest, test::rng,
        user::UserKeyPair,
    };
    use ff::Field;

    const NAMES: [&str; 2] = ["A1", "A2"];

    fn sign(
        rng: &mut impl Rng,
        issuer: &IssuerKeyPair,
        user: &UserKeyPair,
        message: &[u8],
    ) -> NymSignature {
        let nonce = Scalar::random(&mut *rng);
        let request = CredentialRequest::new(rng, user.secret_key(), nonce, issuer.public_key());
        let attrs = [Scalar::from(1u64), Scalar::from(2u64)];
        let cred = Credential::issue(rng, issuer, &request, user.public_key(), &attrs).unwrap();
        NymSignature::new(
            rng,
            user.secret_key(),
            &cred,
            issuer.public_key(),
            message,
            &[0, 1],
            None,
        )
        .unwrap()
    }

    #[test]
    fn signer_is_found() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();

        let mut users = Vec::new();
        let mut traces = Vec::new();
        for _ in 0..4 {
            let (user, trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
            users.push(user);
            traces.push(trace);
        }

        for user in &users {
            let sig = sign(&mut rng, &issuer, user, b"who signed this?");
            assert_eq!(arbitrate(&traces, &sig).unwrap(), user.public_key());
        }
    }

    #[test]
    fn unknown_signer_is_not_found() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let (_, trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
        let (stranger, _) = UserKeyPair::new(&mut rng, &NAMES).unwrap();

        let sig = sign(&mut rng, &issuer, &stranger, b"m");
        assert_eq!(arbitrate(&[trace], &sig), Err(Error::NotFound));
        assert_eq!(arbitrate(&[], &sig), Err(Error::NotFound));
    }

    #[test]
    fn first_matching_trace_wins() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let (user, trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
        let (other, _) = UserKeyPair::new(&mut rng, &NAMES).unwrap();

        // a second entry with the same tracing value but a different public key
        let mut forged = trace.clone();
        forged.upk = other.public_key().clone();

        let sig = sign(&mut rng, &issuer, &user, b"m");
        let traces = [forged, trace];
        assert_eq!(arbitrate(&traces, &sig).unwrap(), other.public_key());
        assert_eq!(find_signer(&traces, &sig), Ok(0));
    }

    #[test]
    fn signer_position_follows_registry_order() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let (first, first_trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
        let (second, second_trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
        let traces = [first_trace, second_trace];

        let sig = sign(&mut rng, &issuer, &second, b"m");
        assert_eq!(find_signer(&traces, &sig), Ok(1));
        let sig = sign(&mut rng, &issuer, &first, b"m");
        assert_eq!(find_signer(&traces, &sig), Ok(0));
    }

    #[test]
    fn identity_pseudonym_is_rejected() {
        let mut rng = rng();
        let issuer = IssuerKeyPair::new(&mut rng, &NAMES).unwrap();
        let (user, trace) = UserKeyPair::new(&mut rng, &NAMES).unwrap();
        let mut sig = sign(&mut rng, &issuer, &user, b"m");
        sig.eta = G1Affine::identity();
        assert_eq!(arbitrate(&[trace], &sig), Err(Error::Malformed("eta")));
    }
}
