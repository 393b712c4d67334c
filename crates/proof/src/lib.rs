//! # Proof
//!
//! Cryptographic support for enveloping proofs over Verifiable Credentials.
//!
//! The crate is for internal use within the Vercre project and is not intended
//! to be used directly by end users. It provides the JOSE primitives (JWA, JWK
//! and compact JWS) needed to parse a signed credential without trusting it and
//! to later verify its signature against resolved key material.

pub mod jose;
pub mod signature;

pub use jose::jwa::Algorithm;
pub use jose::jwk::PublicKeyJwk;
pub use signature::Signer;
