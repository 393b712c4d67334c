//! # Signature
//!
//! The `signature` module provides the `Signer` trait used to mint compact
//! JWS tokens. Verification needs no trait: it only ever happens against a
//! resolved [`PublicKeyJwk`](crate::PublicKeyJwk).

use std::future::Future;

pub use crate::jose::jwa::Algorithm;

/// Signer is used by implementers to provide signing functionality for
/// Verifiable Credentials and the attestations that bind them to an issuer.
pub trait Signer: Send + Sync {
    /// Algorithm returns the algorithm used by the signer.
    fn algorithm(&self) -> Algorithm;

    /// The verification method the verifier should use to verify the signer's
    /// signature. This is typically a DID URL + # + verification key ID.
    fn verification_method(&self) -> String;

    /// `TrySign` signs the message, returning the raw signature bytes.
    fn try_sign(&self, msg: &[u8]) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}
