//! Credential token builders.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::Value;
use vercre_proof::jose::jws::{self, Header};
use vercre_proof::{Algorithm, Signer};

use crate::keys::Ed25519Signer;

/// Sign `claims` with the signer's key id in the header.
///
/// # Panics
///
/// Panics if the claims cannot be signed.
pub async fn sign(claims: &Value, signer: &impl Signer) -> String {
    jws::encode(&Header::for_signer(signer), claims, signer).await.expect("should sign")
}

/// Sign `claims` with the public key embedded in the header and no key id.
///
/// # Panics
///
/// Panics if the claims cannot be signed.
pub async fn sign_embedded(claims: &Value, signer: &Ed25519Signer) -> String {
    let header = Header {
        alg: Algorithm::EdDSA,
        typ: Some("JWT".into()),
        kid: None,
        jwk: Some(signer.public_jwk()),
    };
    jws::encode(&header, claims, signer).await.expect("should sign")
}

/// Encode `header` and `claims` as a compact JWS with a placeholder
/// signature, for headers no signer produces.
#[must_use]
pub fn unsigned(header: &Value, claims: &Value) -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        Base64UrlUnpadded::encode_string(header.to_string().as_bytes()),
        Base64UrlUnpadded::encode_string(claims.to_string().as_bytes())
    )
}

/// Alter one character of the token's payload, keeping the original
/// signature.
///
/// # Panics
///
/// Panics if `token` is not a compact JWS with a JSON payload.
#[must_use]
pub fn tamper(token: &str) -> String {
    let parts: Vec<&str> = token.split('.').collect();
    let decoded = Base64UrlUnpadded::decode_vec(parts[1]).expect("should decode payload");
    let mut payload: Value = serde_json::from_slice(&decoded).expect("should be JSON");

    let mut pending = vec![&mut payload];
    while let Some(value) = pending.pop() {
        match value {
            Value::String(s) => {
                let last = s.pop();
                s.push(if last == Some('a') { 'b' } else { 'a' });
                break;
            }
            Value::Object(map) => pending.extend(map.values_mut()),
            Value::Array(items) => pending.extend(items.iter_mut()),
            _ => {}
        }
    }

    let payload = serde_json::to_vec(&payload).expect("should serialize");
    format!("{}.{}.{}", parts[0], Base64UrlUnpadded::encode_string(&payload), parts[2])
}
