//! # Credential Status
//!
//! Credentials anchored on the ledger carry a revocation-list entry in
//! `credentialStatus`. This crate finds that entry, parses the on-ledger list
//! reference it points to, and defines the [`Status`] seam through which a
//! verifier asks the revocation oracle whether the credential is revoked.

pub mod reference;
pub mod verifier;

pub use reference::StatusReference;
pub use verifier::{ledger_status, Status, REVOCATION_LIST_TYPE};
