//! # JSON Web Key (JWK)
//!
//! A JWK ([RFC7517]) is a JSON representation of a cryptographic key.
//!
//! See [RFC7517] for more detail.
//!
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517

use serde::{Deserialize, Serialize};

use crate::jose::jwa::Algorithm;

/// Simplified JSON Web Key (JWK) key structure.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct PublicKeyJwk {
    /// Key identifier.
    /// For example, "_Qq0UL2Fq651Q0Fjd6TvnYE-faHiOpRlPVQcY_-tA4A".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Key type.
    pub kty: KeyType,

    /// Cryptographic curve type. Keys without a curve (RSA) read as
    /// [`Curve::Unsupported`].
    #[serde(default = "Curve::unsupported")]
    pub crv: Curve,

    /// X coordinate.
    #[serde(default)]
    pub x: String,

    /// Y coordinate. Not required for `EdDSA` verification keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Use of the key.
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_: Option<KeyUse>,
}

impl PublicKeyJwk {
    /// The signing algorithm implied by the key's curve.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self.crv {
            Curve::Es256K => Algorithm::ES256K,
            Curve::Ed25519 => Algorithm::EdDSA,
            Curve::Unsupported => Algorithm::Unsupported,
        }
    }
}

/// Cryptographic key type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum KeyType {
    /// Octet key pair (Edwards curve)
    #[serde(rename = "OKP")]
    Okp,

    /// Elliptic curve key pair
    #[default]
    #[serde(rename = "EC")]
    Ec,

    /// Any other key type (RSA, symmetric). Such keys decode but never verify.
    #[serde(other)]
    Unsupported,
}

/// Cryptographic curve type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum Curve {
    /// Ed25519 curve
    Ed25519,

    /// secp256k1 curve
    #[default]
    #[serde(rename = "secp256k1", alias = "ES256K")]
    Es256K,

    /// Any curve not supported for verification (P-256, X25519, ...).
    #[serde(other)]
    Unsupported,
}

impl Curve {
    const fn unsupported() -> Self {
        Self::Unsupported
    }
}

/// The intended usage of the public `KeyType`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum KeyUse {
    /// Public key is to be used for signature verification
    #[default]
    #[serde(rename = "sig")]
    Signature,

    /// Public key is to be used for encryption
    #[serde(rename = "enc")]
    Encryption,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unsupported_keys() {
        let p256: PublicKeyJwk = serde_json::from_value(json!({
            "kty": "EC", "crv": "P-256", "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
            "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
        }))
        .expect("should deserialize");
        assert_eq!(p256.kty, KeyType::Ec);
        assert_eq!(p256.crv, Curve::Unsupported);
        assert_eq!(p256.algorithm(), Algorithm::Unsupported);

        let rsa: PublicKeyJwk = serde_json::from_value(json!({
            "kty": "RSA", "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4", "e": "AQAB"
        }))
        .expect("should deserialize");
        assert_eq!(rsa.kty, KeyType::Unsupported);
        assert_eq!(rsa.crv, Curve::Unsupported);
        assert!(rsa.x.is_empty());
    }
}
