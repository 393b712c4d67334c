//! # DID Schemes
//!
//! Key ids found in credential headers are DID URLs. Which resolution path
//! applies depends only on the DID method, so classification happens once here
//! rather than by prefix checks at each call site.

use crate::ledger::LedgerDid;

/// The DID method family of a DID URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DidScheme {
    /// A ledger-native DID, resolved in batch through the ledger.
    Ledger(LedgerDid),

    /// `did:jwk`, resolved locally.
    Jwk,

    /// `did:key`, resolved locally.
    Key,

    /// `did:web`, resolved over HTTPS.
    Web,

    /// Any other method, or a string that is not a DID. Holds the method name
    /// (empty when there is none).
    Other(String),
}

impl DidScheme {
    /// Classify a DID or DID URL by its method.
    #[must_use]
    pub fn classify(did_url: &str) -> Self {
        if let Some(ledger) = LedgerDid::parse(did_url) {
            return Self::Ledger(ledger);
        }

        let mut parts = did_url.splitn(3, ':');
        if parts.next() != Some("did") {
            return Self::Other(String::new());
        }
        match parts.next().unwrap_or_default() {
            "jwk" => Self::Jwk,
            "key" => Self::Key,
            "web" => Self::Web,
            method => Self::Other(method.to_string()),
        }
    }

    /// Returns `true` for ledger-native DIDs.
    #[must_use]
    pub const fn is_ledger(&self) -> bool {
        matches!(self, Self::Ledger(_))
    }
}
