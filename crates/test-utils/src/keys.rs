//! Deterministic signing keys.
//!
//! Each signer is derived from a one-byte seed so tests can create as many
//! distinct keys as they need and recreate the same key later.

use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::Signer as _;
use multibase::Base;
use vercre_proof::jose::jwk::{Curve, KeyType};
use vercre_proof::{Algorithm, PublicKeyJwk, Signer};

const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// An Ed25519 signer.
#[derive(Clone, Debug)]
pub struct Ed25519Signer {
    secret: [u8; 32],
    kid: String,
}

impl Ed25519Signer {
    /// A signer whose key id is its `did:key` verification method.
    #[must_use]
    pub fn new(seed: u8) -> Self {
        let mut signer = Self {
            secret: [seed; 32],
            kid: String::new(),
        };
        signer.kid = format!("{}#{}", signer.did_key(), signer.multikey());
        signer
    }

    /// Sign with a different key id.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = kid.into();
        self
    }

    /// The public key as a JWK.
    #[must_use]
    pub fn public_jwk(&self) -> PublicKeyJwk {
        PublicKeyJwk {
            kty: KeyType::Okp,
            crv: Curve::Ed25519,
            x: Base64UrlUnpadded::encode_string(self.signing_key().verifying_key().as_bytes()),
            ..PublicKeyJwk::default()
        }
    }

    /// The signer's `did:key`.
    #[must_use]
    pub fn did_key(&self) -> String {
        format!("did:key:{}", self.multikey())
    }

    fn multikey(&self) -> String {
        let mut bytes = ED25519_CODEC.to_vec();
        bytes.extend_from_slice(self.signing_key().verifying_key().as_bytes());
        multibase::encode(Base::Base58Btc, bytes)
    }

    fn signing_key(&self) -> ed25519_dalek::SigningKey {
        ed25519_dalek::SigningKey::from_bytes(&self.secret)
    }
}

impl Signer for Ed25519Signer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn verification_method(&self) -> String {
        self.kid.clone()
    }

    async fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(self.signing_key().sign(msg).to_bytes().to_vec())
    }
}

/// A secp256k1 signer.
#[derive(Clone, Debug)]
pub struct Es256kSigner {
    secret: [u8; 32],
    kid: String,
}

impl Es256kSigner {
    /// A signer whose key id is its `did:jwk` verification method.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is zero.
    #[must_use]
    pub fn new(seed: u8) -> Self {
        let mut signer = Self {
            secret: [seed; 32],
            kid: String::new(),
        };
        let jwk = serde_json::to_vec(&signer.public_jwk()).expect("should serialize");
        signer.kid = format!("did:jwk:{}#0", Base64UrlUnpadded::encode_string(&jwk));
        signer
    }

    /// Sign with a different key id.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = kid.into();
        self
    }

    /// The public key as a JWK.
    ///
    /// # Panics
    ///
    /// Panics if the secret is not a valid secp256k1 scalar.
    #[must_use]
    pub fn public_jwk(&self) -> PublicKeyJwk {
        let point = self.signing_key().verifying_key().to_encoded_point(false);
        PublicKeyJwk {
            kty: KeyType::Ec,
            crv: Curve::Es256K,
            x: Base64UrlUnpadded::encode_string(point.x().expect("should have x")),
            y: Some(Base64UrlUnpadded::encode_string(point.y().expect("should have y"))),
            ..PublicKeyJwk::default()
        }
    }

    fn signing_key(&self) -> k256::ecdsa::SigningKey {
        k256::ecdsa::SigningKey::from_slice(&self.secret).expect("should be a valid scalar")
    }
}

impl Signer for Es256kSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ES256K
    }

    fn verification_method(&self) -> String {
        self.kid.clone()
    }

    async fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
        let signature: k256::ecdsa::Signature = self.signing_key().sign(msg);
        Ok(signature.to_bytes().to_vec())
    }
}
