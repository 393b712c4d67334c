//! # DID Resolver
//!
//! This crate provides common utilities for the Vercre project and is not intended to be used
//! directly.
//!
//! The crate provides the DID document model, a classifier that sorts DID URLs into the
//! ledger-native scheme and everything else, and generic resolution for the `did:key`,
//! `did:jwk` and `did:web` methods.
//!
//! See [DID resolution](https://www.w3.org/TR/did-core/#did-resolution) for more.

mod document;
mod error;
mod jwk;
mod key;
pub mod ledger;
mod resolution;
mod scheme;
mod web;

use std::future::Future;

pub use document::{Document, PublicKey, PublicKeyFormat, VerificationMethod};
pub use error::Error;
pub use ledger::LedgerDid;
pub use resolution::{resolve, ContentType, Metadata, Resolved};
pub use scheme::DidScheme;

/// Returns DID-specific errors.
pub type Result<T> = std::result::Result<T, Error>;

/// `DidResolver` is used to proxy the resolution of a DID document for DID methods
/// that need a transport, such as `did:web`.
///
/// Implementers simply implement the transport protocol for the binding and return
/// the resulting DID document.
pub trait DidResolver: Send + Sync {
    /// Fetch the DID document published at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the DID document cannot be retrieved.
    fn resolve(&self, url: &str) -> impl Future<Output = anyhow::Result<Document>> + Send;
}
