//! # Credential Decoding
//!
//! Parses a compact JWS credential token into a [`DecodedCredential`] without
//! verifying its signature. Only structural problems (wrong segment count,
//! non-JSON segments, a payload that is not a credential) are errors; a bad
//! signature decodes and simply fails verification later.
//!
//! Payloads come in three shapes, all normalized to a [`VerifiableCredential`]:
//!
//! - a JWT carrying the credential in a `vc` claim,
//! - a JWT carrying a presentation in a `vp` claim,
//! - a bare credential object.
//!
//! Registered JWT claims fill credential properties the credential itself
//! leaves out.

use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;
use vercre_core::{Kind, Quota};
use vercre_did::DidScheme;
use vercre_proof::jose::jws::{self, Jws};
use vercre_proof::{Algorithm, PublicKeyJwk};

use crate::model::vc::lenient;
use crate::model::{CredentialSubject, VerifiableCredential};

/// Protocol version assumed when a credential does not declare one.
pub const DEFAULT_PROTOCOL_VERSION: u64 = 1;

/// Errors that prevent a token from being decoded at all.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// The token is not a well-formed compact JWS.
    #[error(transparent)]
    Jws(#[from] jws::Error),

    /// The payload does not describe a credential.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}

/// Key information taken from the token's protected header.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetadata {
    /// Key id (a DID URL) naming the signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Signing key embedded directly in the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwk: Option<PublicKeyJwk>,

    /// Signing algorithm.
    pub alg: Algorithm,
}

/// A credential token parsed but not yet verified.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::module_name_repetitions)]
pub struct DecodedCredential {
    /// Credential id, empty when the credential has none.
    pub id: String,

    /// Position of the token in the submitted batch.
    pub index: usize,

    /// The most specific credential type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,

    /// Ledger-anchored content hash, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,

    /// Issuer identifier.
    pub issuer_id: String,

    /// Signing key information from the header.
    pub key_metadata: KeyMetadata,

    /// The token as submitted.
    pub raw_token: String,

    /// The normalized credential.
    pub credential: VerifiableCredential,

    #[serde(skip)]
    jws: Jws,
}

impl DecodedCredential {
    /// A credential is self-signed when its issuer is also its subject: the
    /// header embeds the signing key, or names a key under any DID method other
    /// than the ledger's.
    #[must_use]
    pub fn is_self_signed(&self) -> bool {
        match &self.key_metadata.kid {
            Some(kid) => !DidScheme::classify(kid).is_ledger(),
            None => self.key_metadata.jwk.is_some(),
        }
    }

    /// The issuing protocol version.
    #[must_use]
    pub fn protocol_version(&self) -> u64 {
        self.credential.vnf_protocol_version.unwrap_or(DEFAULT_PROTOCOL_VERSION)
    }

    /// The credential subject's `id`, if any.
    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        self.credential.subject().and_then(|s| s.id.as_deref())
    }

    /// Verify the token's signature with `jwk`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not verify with the key.
    pub fn verify(&self, jwk: &PublicKeyJwk) -> Result<(), jws::Error> {
        self.jws.verify(jwk)
    }
}

/// Decode a credential token without verifying it.
///
/// # Errors
///
/// Returns an error if the token cannot be structurally parsed.
#[instrument(level = "debug", skip(token))]
pub fn decode(token: &str, index: usize) -> Result<DecodedCredential, DecodeError> {
    let jws = jws::decode(token)?;
    let Value::Object(payload) = &jws.payload else {
        return Err(DecodeError::InvalidCredential("payload is not an object".into()));
    };

    let mut credential = normalize(payload)?;
    fold_claims(&mut credential, payload);

    let key_metadata = KeyMetadata {
        kid: jws.header.kid.clone(),
        jwk: jws.header.jwk.clone(),
        alg: jws.header.alg,
    };
    tracing::debug!(index, kid = ?key_metadata.kid, "decoded credential");

    Ok(DecodedCredential {
        id: credential.id.clone().unwrap_or_default(),
        index,
        credential_type: credential.credential_type().map(ToString::to_string),
        content_hash: credential.content_hash.as_ref().map(|h| h.value.clone()),
        issuer_id: credential.issuer_id().to_string(),
        key_metadata,
        raw_token: token.to_string(),
        credential,
        jws,
    })
}

fn normalize(payload: &Map<String, Value>) -> Result<VerifiableCredential, DecodeError> {
    let body = match (payload.get("vc"), payload.get("vp")) {
        (Some(vc @ Value::Object(_)), _) | (None, Some(vc @ Value::Object(_))) => vc.clone(),
        (Some(_), _) | (None, Some(_)) => {
            return Err(DecodeError::InvalidCredential("vc/vp claim is not an object".into()));
        }
        (None, None) => Value::Object(payload.clone()),
    };
    serde_json::from_value(body).map_err(|e| DecodeError::InvalidCredential(e.to_string()))
}

// Registered JWT claims only fill gaps; values in the credential win.
fn fold_claims(credential: &mut VerifiableCredential, payload: &Map<String, Value>) {
    let claim = |name: &str| payload.get(name).and_then(Value::as_str).map(ToString::to_string);
    let timestamp = |name: &str| {
        payload.get(name).and_then(Value::as_i64).and_then(|secs| DateTime::from_timestamp(secs, 0))
    };

    if credential.id.is_none() {
        credential.id = claim("jti");
    }
    if credential.issuer_id().is_empty() {
        if let Some(iss) = claim("iss") {
            credential.issuer = Kind::String(iss);
        }
    }
    if credential.issuance_date.is_none() {
        credential.issuance_date = timestamp("nbf");
    }
    if credential.expiration_date.is_none() {
        credential.expiration_date = timestamp("exp");
    }
    if credential.vnf_protocol_version.is_none() {
        credential.vnf_protocol_version =
            payload.get("vnfProtocolVersion").and_then(lenient::parse_version);
    }

    if let Some(sub) = claim("sub") {
        let first = match &mut credential.credential_subject {
            Quota::One(subject) => Some(subject),
            Quota::Many(subjects) => {
                if subjects.is_empty() {
                    subjects.push(CredentialSubject::default());
                }
                subjects.first_mut()
            }
        };
        if let Some(subject) = first {
            subject.id.get_or_insert(sub);
        }
    }
}
