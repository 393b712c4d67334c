//! # DID Key Resolver
//!
//! Only Ed25519 keys are supported. The document is expanded locally from the
//! key bytes; no transport is needed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use super::DidKey;
use crate::document::{Document, PublicKey, PublicKeyFormat, VerificationMethod};
use crate::error::Error;
use crate::resolution::{ContentType, Metadata, Resolved};

const ED25519_CODEC: [u8; 2] = [0xed, 0x01];
static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^did:key:(?<identifier>z[a-km-zA-HJ-NP-Z1-9]+)$").expect("should compile")
});

impl DidKey {
    pub fn resolve(did: &str) -> crate::Result<Resolved> {
        // check DID is valid AND extract key
        let Some(caps) = DID_REGEX.captures(did) else {
            return Err(Error::InvalidDid("DID is not a valid did:key".into()));
        };
        let multikey = &caps["identifier"];

        let (_, key_bytes) = multibase::decode(multikey)
            .map_err(|e| Error::InvalidDid(format!("issue decoding key: {e}")))?;
        if key_bytes.len() != 34 {
            return Err(Error::InvalidDid("invalid key length".into()));
        }
        if key_bytes[0..2] != ED25519_CODEC {
            return Err(Error::InvalidDid("unsupported signature".into()));
        }

        let verification_method = VerificationMethod {
            id: format!("{did}#{multikey}"),
            type_: PublicKeyFormat::Ed25519VerificationKey2020,
            controller: did.to_string(),
            public_key: PublicKey::Multibase(multikey.to_string()),
        };
        let document = Document {
            id: did.to_string(),
            verification_method: Some(vec![verification_method]),
            ..Document::default()
        };

        Ok(Resolved {
            context: "https://w3id.org/did-resolution/v1".into(),
            metadata: Metadata {
                content_type: ContentType::DidLdJson,
                additional: Some(json!({
                    "pattern": "^did:key:z[a-km-zA-HJ-NP-Z1-9]+$",
                    "did": {
                        "didString": did,
                        "methodSpecificId": multikey,
                        "method": "key"
                    }
                })),
                ..Metadata::default()
            },
            document: Some(document),
        })
    }
}
