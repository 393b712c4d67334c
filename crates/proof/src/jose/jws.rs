//! # JSON Web Signature (JWS)
//!
//! JWS ([RFC7515]) represents content secured with digital signatures using
//! JSON-based data structures. Credentials are exchanged in the JWS Compact
//! Serialization: three base64url-encoded segments (header, payload and
//! signature) separated by periods.
//!
//! Decoding and verifying are deliberately separate steps. A verifier needs to
//! read a token's header and claims in order to work out which key should
//! verify it, so [`decode`] never checks the signature. [`Jws::verify`] does
//! that once key material has been resolved.
//!
//! [RFC7515]: https://www.rfc-editor.org/rfc/rfc7515

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use ecdsa::signature::Verifier as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::jose::jwa::Algorithm;
use crate::jose::jwk::{Curve, PublicKeyJwk};
use crate::signature::Signer;

/// JWS processing errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The token is not three period-separated segments.
    #[error("invalid Compact JWS format: {0}")]
    InvalidFormat(String),

    /// A header or payload segment is not base64url-encoded JSON.
    #[error("issue decoding {segment}: {message}")]
    InvalidSegment {
        /// The segment that could not be decoded.
        segment: &'static str,

        /// Decoder detail.
        message: String,
    },

    /// The algorithm is not supported for verification.
    #[error("unsupported JWS algorithm: {0}")]
    UnsupportedAlgorithm(Algorithm),

    /// The public key could not be turned into a verifying key.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// The signature does not verify against the key.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Other, unspecified errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Represents the JWS protected header.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Header {
    /// Digital signature algorithm identifier as per IANA "JSON Web Signature
    /// and Encryption Algorithms" registry.
    pub alg: Algorithm,

    /// Used to declare the media type of the JWS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Contains the key ID. If the Credential is bound to a DID, the kid refers
    /// to a DID URL which identifies a particular key in the DID Document that
    /// the Credential should be verified with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Contains the key material the Credential was signed with. Set on
    /// self-signed credentials in place of, or alongside, `kid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwk: Option<PublicKeyJwk>,
}

impl Header {
    /// Create a header for the signer's algorithm and verification method.
    #[must_use]
    pub fn for_signer(signer: &impl Signer) -> Self {
        Self {
            alg: signer.algorithm(),
            typ: Some("JWT".into()),
            kid: Some(signer.verification_method()),
            jwk: None,
        }
    }
}

/// A decoded, but not yet verified, compact JWS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jws {
    /// The protected header.
    pub header: Header,

    /// The JWS payload (claims).
    pub payload: Value,

    signing_input: String,
    signature: Vec<u8>,
}

impl Jws {
    /// The header and payload segments as signed, i.e. `<header>.<payload>`.
    #[must_use]
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    /// Raw signature bytes. Empty when the signature segment was not valid
    /// base64url.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Verify the token's signature using the provided public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is unsupported, the key is invalid,
    /// or the signature does not verify.
    pub fn verify(&self, jwk: &PublicKeyJwk) -> Result<(), Error> {
        if !self.header.alg.is_supported() {
            return Err(Error::UnsupportedAlgorithm(self.header.alg));
        }
        if self.header.alg != jwk.algorithm() {
            return Err(Error::InvalidKey(format!(
                "key curve {:?} cannot verify {} signatures",
                jwk.crv, self.header.alg
            )));
        }
        verify(jwk, &self.signing_input, &self.signature)
    }
}

impl FromStr for Jws {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        decode(token)
    }
}

/// Decode a compact JWS into its header and payload without verifying the
/// signature.
///
/// # Errors
///
/// Returns an error if the token is not three period-separated segments, or
/// the header or payload is not base64url-encoded JSON.
pub fn decode(token: &str) -> Result<Jws, Error> {
    let parts = token.split('.').collect::<Vec<&str>>();
    if parts.len() != 3 {
        return Err(Error::InvalidFormat(format!("expected 3 segments, found {}", parts.len())));
    }

    let decoded = Base64UrlUnpadded::decode_vec(parts[0]).map_err(|e| Error::InvalidSegment {
        segment: "header",
        message: e.to_string(),
    })?;
    let header: Header = serde_json::from_slice(&decoded).map_err(|e| Error::InvalidSegment {
        segment: "header",
        message: e.to_string(),
    })?;

    let decoded = Base64UrlUnpadded::decode_vec(parts[1]).map_err(|e| Error::InvalidSegment {
        segment: "payload",
        message: e.to_string(),
    })?;
    let payload: Value = serde_json::from_slice(&decoded).map_err(|e| Error::InvalidSegment {
        segment: "payload",
        message: e.to_string(),
    })?;
    if !payload.is_object() {
        return Err(Error::InvalidSegment {
            segment: "payload",
            message: "claims must be a JSON object".into(),
        });
    }

    // a malformed signature is not a structural problem: it simply won't verify
    let signature = Base64UrlUnpadded::decode_vec(parts[2]).unwrap_or_else(|e| {
        tracing::debug!("signature segment is not base64url: {e}");
        Vec::new()
    });

    Ok(Jws {
        header,
        payload,
        signing_input: format!("{}.{}", parts[0], parts[1]),
        signature,
    })
}

/// Encode the header and claims and sign, returning a JWT in compact JWS form.
///
/// # Errors
///
/// Returns an error if the header or claims cannot be serialized, or the
/// signer fails.
pub async fn encode<T>(header: &Header, claims: &T, signer: &impl Signer) -> anyhow::Result<String>
where
    T: Serialize + Send + Sync,
{
    tracing::debug!("encode");

    let header_enc = Base64UrlUnpadded::encode_string(&serde_json::to_vec(header)?);
    let claims_enc = Base64UrlUnpadded::encode_string(&serde_json::to_vec(claims)?);
    let payload = format!("{header_enc}.{claims_enc}");

    let sig = signer.try_sign(payload.as_bytes()).await?;
    let sig_enc = Base64UrlUnpadded::encode_string(&sig);

    Ok(format!("{payload}.{sig_enc}"))
}

/// Verify the signature of the provided message using the JWK.
///
/// # Errors
///
/// Will return an error if the signature is invalid, the JWK is invalid, or the
/// algorithm is unsupported.
pub fn verify(jwk: &PublicKeyJwk, msg: &str, sig: &[u8]) -> Result<(), Error> {
    match jwk.crv {
        Curve::Es256K => verify_es256k(jwk, msg, sig),
        Curve::Ed25519 => verify_eddsa(jwk, msg, sig),
        Curve::Unsupported => {
            Err(Error::InvalidKey(format!("unsupported key type {:?}", jwk.kty)))
        }
    }
}

// Verify the signature of the provided message using the ES256K algorithm.
fn verify_es256k(jwk: &PublicKeyJwk, msg: &str, sig: &[u8]) -> Result<(), Error> {
    use ecdsa::{Signature, VerifyingKey};
    use k256::Secp256k1;

    // build verifying key
    let y = jwk.y.as_ref().ok_or_else(|| Error::InvalidKey("JWK 'y' is missing".into()))?;
    let mut sec1 = vec![0x04]; // uncompressed format
    sec1.append(
        &mut Base64UrlUnpadded::decode_vec(&jwk.x)
            .map_err(|e| Error::InvalidKey(format!("issue decoding 'x': {e}")))?,
    );
    sec1.append(
        &mut Base64UrlUnpadded::decode_vec(y)
            .map_err(|e| Error::InvalidKey(format!("issue decoding 'y': {e}")))?,
    );

    let verifying_key = VerifyingKey::<Secp256k1>::from_sec1_bytes(&sec1)
        .map_err(|e| Error::InvalidKey(e.to_string()))?;
    let signature: Signature<Secp256k1> =
        Signature::from_slice(sig).map_err(|e| Error::InvalidSignature(e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);

    verifying_key
        .verify(msg.as_bytes(), &signature)
        .map_err(|e| Error::InvalidSignature(e.to_string()))
}

// Verify the signature of the provided message using the EdDSA algorithm.
fn verify_eddsa(jwk: &PublicKeyJwk, msg: &str, sig_bytes: &[u8]) -> Result<(), Error> {
    use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};

    // build verifying key
    let x_bytes = Base64UrlUnpadded::decode_vec(&jwk.x)
        .map_err(|e| Error::InvalidKey(format!("unable to base64 decode JWK 'x': {e}")))?;
    let bytes: [u8; 32] =
        x_bytes.try_into().map_err(|_| Error::InvalidKey("invalid public key length".into()))?;
    let verifying_key = VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::InvalidKey(format!("unable to build verifying key: {e}")))?;
    let signature =
        Signature::from_slice(sig_bytes).map_err(|e| Error::InvalidSignature(e.to_string()))?;

    verifying_key
        .verify(msg.as_bytes(), &signature)
        .map_err(|e| Error::InvalidSignature(e.to_string()))
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::Signer as _;
    use serde_json::json;

    use super::*;
    use crate::jose::jwk::KeyType;

    const SECRET: [u8; 32] = [7; 32];

    struct Keystore;

    impl Signer for Keystore {
        fn algorithm(&self) -> Algorithm {
            Algorithm::EdDSA
        }

        fn verification_method(&self) -> String {
            "did:example:issuer#key-1".into()
        }

        async fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&SECRET);
            Ok(signing_key.sign(msg).to_bytes().to_vec())
        }
    }

    fn public_jwk(secret: &[u8; 32]) -> PublicKeyJwk {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(secret);
        PublicKeyJwk {
            kty: KeyType::Okp,
            crv: Curve::Ed25519,
            x: Base64UrlUnpadded::encode_string(signing_key.verifying_key().as_bytes()),
            ..PublicKeyJwk::default()
        }
    }

    #[tokio::test]
    async fn encode_decode_verify() {
        let header = Header::for_signer(&Keystore);
        let token = encode(&header, &json!({"iss": "did:example:issuer"}), &Keystore)
            .await
            .expect("should encode");

        let jws = decode(&token).expect("should decode");
        assert_eq!(jws.header.kid.as_deref(), Some("did:example:issuer#key-1"));
        assert_eq!(jws.payload["iss"], "did:example:issuer");
        jws.verify(&public_jwk(&SECRET)).expect("should verify");
    }

    #[tokio::test]
    async fn wrong_key() {
        let header = Header::for_signer(&Keystore);
        let token =
            encode(&header, &json!({"sub": "alice"}), &Keystore).await.expect("should encode");

        let jws = decode(&token).expect("should decode");
        let Err(Error::InvalidSignature(_)) = jws.verify(&public_jwk(&[9; 32])) else {
            panic!("should not verify with another key");
        };
    }

    #[test]
    fn malformed_signature_still_decodes() {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"EdDSA"}"#);
        let payload = Base64UrlUnpadded::encode_string(br#"{"sub":"alice"}"#);
        let jws = decode(&format!("{header}.{payload}.!!not-base64!!")).expect("should decode");
        assert!(jws.signature().is_empty());
        assert!(jws.verify(&public_jwk(&SECRET)).is_err());
    }

    #[test]
    fn unsupported_embedded_key() {
        let header = Base64UrlUnpadded::encode_string(
            json!({
                "alg": "ES256",
                "jwk": {"kty": "EC", "crv": "P-256", "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9"}
            })
            .to_string()
            .as_bytes(),
        );
        let payload = Base64UrlUnpadded::encode_string(br#"{"sub":"alice"}"#);

        let jws = decode(&format!("{header}.{payload}.c2ln")).expect("should decode");
        let jwk = jws.header.jwk.clone().expect("should embed key");
        assert_eq!(jwk.crv, Curve::Unsupported);
        assert!(matches!(
            jws.verify(&jwk),
            Err(Error::UnsupportedAlgorithm(Algorithm::Unsupported))
        ));
        assert!(matches!(verify(&jwk, "msg", b"sig"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(decode("abc.def"), Err(Error::InvalidFormat(_))));

        let not_json = Base64UrlUnpadded::encode_string(b"not json");
        let payload = Base64UrlUnpadded::encode_string(br#"{"sub":"alice"}"#);
        assert!(matches!(
            decode(&format!("{not_json}.{payload}.sig")),
            Err(Error::InvalidSegment { segment: "header", .. })
        ));
    }
}
