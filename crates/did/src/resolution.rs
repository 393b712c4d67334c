//! # DID Resolution
//!
//! Generic, per-DID resolution for the methods that do not go through the
//! ledger.
//!
//! See [DID resolution](https://www.w3.org/TR/did-core/#did-resolution) for more.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::document::Document;
use crate::error::Error;
use crate::jwk::DidJwk;
use crate::key::DidKey;
use crate::scheme::DidScheme;
use crate::web::DidWeb;
use crate::DidResolver;

/// Resolve a DID to a DID document.
///
/// Any DID URL fragment or query is dropped before resolution.
///
/// Caveats:
/// - No JSON-LD Processing, however, valid JSON-LD is returned.
/// - did:key support for ed25519
/// - did:web support for .well-known and path based DIDs.
/// - ledger DIDs are not resolved here.
///
/// # Errors
///
/// Returns a [DID resolution](https://www.w3.org/TR/did-core/#did-resolution-metadata)
/// error. Unsupported methods return `Error::MethodNotSupported`.
#[instrument(level = "debug", skip(resolver))]
pub async fn resolve(did: &str, resolver: &impl DidResolver) -> crate::Result<Resolved> {
    let did = did.split(['#', '?']).next().unwrap_or_default();

    match DidScheme::classify(did) {
        DidScheme::Key => DidKey::resolve(did),
        DidScheme::Jwk => DidJwk::resolve(did),
        DidScheme::Web => DidWeb::resolve(did, resolver).await,
        DidScheme::Ledger(_) => {
            Err(Error::MethodNotSupported("ledger DIDs are resolved by the ledger".into()))
        }
        DidScheme::Other(method) => {
            Err(Error::MethodNotSupported(format!("{method} is not supported")))
        }
    }
}

/// Returned by `resolve` DID methods.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    /// The DID resolution context.
    #[serde(rename = "@context")]
    pub context: String,

    /// Resolution metadata.
    pub metadata: Metadata,

    /// The DID document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

/// DID resolution metadata.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// The Media Type of the returned resource.
    pub content_type: ContentType,

    /// The error code from the resolution process, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// A human-readable explanation of the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Additional information about the resolution process.
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<Value>,
}

/// The Media Type of the returned resource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ContentType {
    /// JSON-LD representation of a DID document.
    #[default]
    #[serde(rename = "application/did+ld+json")]
    DidLdJson,
}

#[cfg(test)]
mod test {
    use anyhow::anyhow;

    use super::*;

    struct MockResolver;
    impl DidResolver for MockResolver {
        async fn resolve(&self, _url: &str) -> anyhow::Result<Document> {
            Err(anyhow!("offline"))
        }
    }

    #[tokio::test]
    async fn resolve_key_url() {
        const DID_URL: &str = "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK#z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";

        let resolved = resolve(DID_URL, &MockResolver).await.expect("should resolve");
        let document = resolved.document.expect("should have document");
        assert!(document.public_key(DID_URL).is_ok());
    }

    #[tokio::test]
    async fn unsupported() {
        let err = resolve("did:ion:abc#key-1", &MockResolver).await.expect_err("should fail");
        assert_eq!(err.code(), "methodNotSupported");

        let err = resolve("did:velocity:v2:0xabc:1:2#key-1", &MockResolver)
            .await
            .expect_err("should fail");
        assert!(matches!(err, Error::MethodNotSupported(_)));
    }

    #[tokio::test]
    async fn web_transport_failure() {
        let err = resolve("did:web:example.com", &MockResolver).await.expect_err("should fail");
        assert!(matches!(err, Error::Other(_)));
    }
}
