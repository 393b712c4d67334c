//! # DID JWK
//!
//! A `did:jwk` is a base64url-encoded public JWK. The document holds a single
//! verification method, `#0`.
//!
//! See <https://github.com/quartzjer/did-jwk/blob/main/spec.md>

use base64ct::{Base64UrlUnpadded, Encoding};
use vercre_proof::PublicKeyJwk;

use crate::document::{Document, PublicKey, PublicKeyFormat, VerificationMethod};
use crate::error::Error;
use crate::resolution::{ContentType, Metadata, Resolved};

const DID_JWK_PREFIX: &str = "did:jwk:";

#[allow(clippy::module_name_repetitions)]
pub struct DidJwk;

impl DidJwk {
    pub fn resolve(did: &str) -> crate::Result<Resolved> {
        let Some(encoded) = did.strip_prefix(DID_JWK_PREFIX) else {
            return Err(Error::InvalidDid("DID is not a valid did:jwk".into()));
        };
        let bytes = Base64UrlUnpadded::decode_vec(encoded)
            .map_err(|e| Error::InvalidDid(format!("issue decoding key: {e}")))?;
        let jwk: PublicKeyJwk = serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidPublicKey(format!("issue deserializing key: {e}")))?;

        let verification_method = VerificationMethod {
            id: format!("{did}#0"),
            type_: PublicKeyFormat::JsonWebKey2020,
            controller: did.to_string(),
            public_key: PublicKey::Jwk(jwk),
        };

        Ok(Resolved {
            context: "https://w3id.org/did-resolution/v1".into(),
            metadata: Metadata {
                content_type: ContentType::DidLdJson,
                ..Metadata::default()
            },
            document: Some(Document {
                id: did.to_string(),
                verification_method: Some(vec![verification_method]),
                ..Document::default()
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolve() {
        let jwk = json!({"kty": "OKP", "crv": "Ed25519", "x": "q6rjRnEH_XK_xFRv7jKvD6Ni2pWYRT-6eUAnMeUmxyo"});
        let encoded = Base64UrlUnpadded::encode_string(jwk.to_string().as_bytes());
        let did = format!("did:jwk:{encoded}");

        let resolved = DidJwk::resolve(&did).expect("should resolve");
        let document = resolved.document.expect("should have document");
        let key = document.public_key(&format!("{did}#0")).expect("should find key");
        assert_eq!(key.x, "q6rjRnEH_XK_xFRv7jKvD6Ni2pWYRT-6eUAnMeUmxyo");
    }

    #[test]
    fn malformed() {
        assert!(DidJwk::resolve("did:jwk:!!").is_err());
        assert!(DidJwk::resolve("did:jwk:e30").is_err());
    }
}
