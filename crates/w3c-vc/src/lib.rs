//! # Verifiable Credentials
//!
//! This library encompasses the family of W3C Recommendations for Verifiable
//! Credentials, as outlined below.
//!
//! The recommendations provide a mechanism to express credentials on the Web in a way
//! that is cryptographically secure, privacy respecting, and machine-verifiable.
//!
//! Credentials arrive as compact JWS tokens. [`decode`] parses a token into a
//! [`DecodedCredential`] without checking its signature so that verification
//! can later be attempted against whatever key material resolves.

pub mod decode;
pub mod model;

pub use decode::{decode, DecodeError, DecodedCredential, KeyMetadata};
pub use model::{
    ContentHash, CredentialStatus, CredentialSubject, Issuer, VcBuilder, VerifiableCredential,
};
