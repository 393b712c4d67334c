//! # DID Web Resolver
//!
//! Builds the HTTPS location of a `did:web` document and fetches it through the
//! caller's [`DidResolver`] binding.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::DidWeb;
use crate::error::Error;
use crate::resolution::{ContentType, Metadata, Resolved};
use crate::DidResolver;

static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^did:web:(?<identifier>[a-zA-Z0-9.\\-:%]+)$").expect("should compile")
});

impl DidWeb {
    pub fn url(did: &str) -> crate::Result<String> {
        let Some(caps) = DID_REGEX.captures(did) else {
            return Err(Error::InvalidDid("DID is not a valid did:web".to_string()));
        };
        let identifier = &caps["identifier"];

        // 1. Replace ":" with "/" in the method specific identifier to obtain the fully
        //    qualified domain name and optional path.
        let domain = identifier.replace(':', "/");

        // 2. If the domain contains a port percent decode the colon.
        let domain = domain.replace("%3A", ":");

        // 3. Generate an HTTPS URL to the expected location of the DID document by
        //    prepending https://.
        let mut url = format!("https://{domain}");

        // 4. If no path has been specified in the URL, append /.well-known.
        if !identifier.contains(':') {
            url = format!("{url}/.well-known");
        }

        // 5. Append /did.json to complete the URL.
        Ok(format!("{url}/did.json"))
    }

    pub async fn resolve(did: &str, resolver: &impl DidResolver) -> crate::Result<Resolved> {
        let url = Self::url(did)?;
        let document = resolver.resolve(&url).await.map_err(Error::Other)?;
        if !document.is_identified_by(did) {
            return Err(Error::InvalidDid(format!("document at {url} is not for {did}")));
        }

        Ok(Resolved {
            context: "https://w3id.org/did-resolution/v1".into(),
            metadata: Metadata {
                content_type: ContentType::DidLdJson,
                additional: Some(json!({
                    "did": {
                        "didString": did,
                        "methodSpecificId": &did[8..],
                        "method": "web"
                    }
                })),
                ..Metadata::default()
            },
            document: Some(document),
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::document::Document;

    struct MockResolver;
    impl DidResolver for MockResolver {
        async fn resolve(&self, _url: &str) -> anyhow::Result<Document> {
            Ok(serde_json::from_value(json!({
                "id": "did:web:demo.credibil.io",
                "verificationMethod": [{
                    "id": "did:web:demo.credibil.io#key-0",
                    "type": "JsonWebKey2020",
                    "controller": "did:web:demo.credibil.io",
                    "publicKeyJwk": {
                        "kty": "OKP",
                        "crv": "Ed25519",
                        "x": "q6rjRnEH_XK_xFRv7jKvD6Ni2pWYRT-6eUAnMeUmxyo"
                    }
                }]
            }))?)
        }
    }

    #[test]
    fn url() {
        assert_eq!(
            DidWeb::url("did:web:w3c-ccg.github.io").expect("should build url"),
            "https://w3c-ccg.github.io/.well-known/did.json"
        );
        assert_eq!(
            DidWeb::url("did:web:w3c-ccg.github.io:user:alice").expect("should build url"),
            "https://w3c-ccg.github.io/user/alice/did.json"
        );
        assert_eq!(
            DidWeb::url("did:web:example.com%3A3000").expect("should build url"),
            "https://example.com:3000/.well-known/did.json"
        );
    }

    #[tokio::test]
    async fn resolve_normal() {
        const DID_URL: &str = "did:web:demo.credibil.io";

        let resolved = DidWeb::resolve(DID_URL, &MockResolver).await.expect("should resolve");
        let document = resolved.document.expect("should have document");
        assert!(document.public_key("#key-0").is_ok());
    }

    #[tokio::test]
    async fn resolve_mismatch() {
        let result = DidWeb::resolve("did:web:other.credibil.io", &MockResolver).await;
        assert!(result.is_err());
    }
}
