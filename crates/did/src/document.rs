//! # DID Document
//!
//! The parts of a DID document a verifier reads: the subject's identifiers and
//! the verification methods holding its public keys. Keys may be published as
//! JWKs or as Ed25519 multikeys; both are read back as JWKs.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vercre_core::{Kind, Quota};
use vercre_proof::jose::jwk::{Curve, KeyType, PublicKeyJwk};

use crate::error::Error;

const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// A DID document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Quota<Kind<Value>>>,

    /// The DID of the document's subject.
    pub id: String,

    /// Other identifiers for the same subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,

    /// The subject's verification methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<Vec<VerificationMethod>>,

    /// Methods the subject uses to issue credentials, either embedded or
    /// referenced by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<Kind<VerificationMethod>>>,
}

impl Document {
    /// The DID subject's identifiers: the document `id` followed by any
    /// `alsoKnownAs` aliases.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        if let Some(aliases) = &self.also_known_as {
            ids.extend(aliases.iter().map(String::as_str));
        }
        ids
    }

    /// Returns `true` if `did` is one of the document's identifiers.
    #[must_use]
    pub fn is_identified_by(&self, did: &str) -> bool {
        self.identifiers().iter().any(|id| id.eq_ignore_ascii_case(did))
    }

    /// Fully-qualified ids of the document's verification methods, paired with
    /// the method. Relative ids (`#key-1`) are qualified with the document id.
    pub fn verification_methods(&self) -> impl Iterator<Item = (String, &VerificationMethod)> {
        let embedded = self.assertion_method.iter().flatten().filter_map(|m| match m {
            Kind::Object(vm) => Some(vm),
            Kind::String(_) => None,
        });
        self.verification_method
            .iter()
            .flatten()
            .chain(embedded)
            .map(|vm| (self.qualify(&vm.id), vm))
    }

    /// Find the public key for the key id (a DID URL or bare `#fragment`).
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no verification method matches, or an error if
    /// the matching key cannot be expressed as a JWK.
    pub fn public_key(&self, kid: &str) -> crate::Result<PublicKeyJwk> {
        let kid = self.qualify(kid);
        let Some((_, vm)) =
            self.verification_methods().find(|(id, _)| id.eq_ignore_ascii_case(&kid))
        else {
            return Err(Error::NotFound(format!("verification method {kid} not found")));
        };
        vm.public_key.to_jwk()
    }

    fn qualify(&self, id: &str) -> String {
        if id.starts_with('#') {
            format!("{}{id}", self.id)
        } else {
            id.to_string()
        }
    }
}

/// A DID document can express verification methods, such as cryptographic public keys,
/// which can be used to authenticate or authorize interactions with the DID subject or
/// associated parties.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// A DID URL that identifies the verification method.
    pub id: String,

    /// References a verification method type.
    #[serde(rename = "type")]
    pub type_: PublicKeyFormat,

    /// The DID of the controller of the verification method.
    #[serde(default)]
    pub controller: String,

    /// The public key material for the verification method.
    #[serde(flatten)]
    pub public_key: PublicKey,
}

/// Verification method type.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PublicKeyFormat {
    /// Key is encoded as a Multibase.
    #[default]
    Multikey,

    /// ED2559 Verification Key, 2020 version
    Ed25519VerificationKey2020,

    /// JSON Web Key, 2020 version
    JsonWebKey2020,

    /// secp256k1 verification key, 2019 version
    EcdsaSecp256k1VerificationKey2019,
}

/// Public key material.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PublicKey {
    /// Public key encoded as a Multibase.
    #[serde(rename = "publicKeyMultibase")]
    Multibase(String),

    /// Public key encoded as a JWK.
    #[serde(rename = "publicKeyJwk")]
    Jwk(PublicKeyJwk),
}

impl Default for PublicKey {
    fn default() -> Self {
        Self::Multibase(String::new())
    }
}

impl PublicKey {
    /// Express the key as a JWK. Multibase keys must be Ed25519.
    ///
    /// # Errors
    ///
    /// Returns an error if a multibase key cannot be decoded or is not Ed25519.
    pub fn to_jwk(&self) -> crate::Result<PublicKeyJwk> {
        match self {
            Self::Jwk(jwk) => Ok(jwk.clone()),
            Self::Multibase(multikey) => {
                let (_, key_bytes) = multibase::decode(multikey)
                    .map_err(|e| Error::InvalidPublicKey(format!("issue decoding key: {e}")))?;
                if key_bytes.len() != 34 {
                    return Err(Error::InvalidPublicKey("invalid key length".into()));
                }
                if key_bytes[0..2] != ED25519_CODEC {
                    return Err(Error::UnsupportedPublicKeyType("unsupported multicodec".into()));
                }
                Ok(PublicKeyJwk {
                    kty: KeyType::Okp,
                    crv: Curve::Ed25519,
                    x: Base64UrlUnpadded::encode_string(&key_bytes[2..]),
                    ..PublicKeyJwk::default()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document() -> Document {
        serde_json::from_value(json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": "did:ion:issuer",
            "alsoKnownAs": ["did:web:issuer.example.com"],
            "verificationMethod": [{
                "id": "#vc-signing-key-1",
                "type": "JsonWebKey2020",
                "controller": "did:ion:issuer",
                "publicKeyJwk": {
                    "kty": "EC",
                    "crv": "secp256k1",
                    "x": "x-coord",
                    "y": "y-coord"
                }
            }]
        }))
        .expect("should deserialize")
    }

    #[test]
    fn relative_key_id() {
        let doc = document();
        let jwk = doc.public_key("did:ion:issuer#vc-signing-key-1").expect("should find key");
        assert_eq!(jwk.x, "x-coord");

        let jwk = doc.public_key("#VC-SIGNING-KEY-1").expect("should find key ignoring case");
        assert_eq!(jwk.crv, Curve::Es256K);

        assert!(matches!(doc.public_key("#other"), Err(Error::NotFound(_))));
    }

    #[test]
    fn aliases() {
        let doc = document();
        assert_eq!(doc.identifiers(), vec!["did:ion:issuer", "did:web:issuer.example.com"]);
        assert!(doc.is_identified_by("did:web:issuer.example.com"));
        assert!(!doc.is_identified_by("did:web:other.example.com"));
    }
}
