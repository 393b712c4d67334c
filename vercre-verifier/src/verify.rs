//! # Verify
//!
//! Verifies a batch of credential tokens. Tokens are decoded, the data the
//! checks depend on is resolved concurrently, and every credential is checked
//! against it. The response holds one entry per token, in the order submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vercre_w3c_vc::{decode, DecodedCredential};

use crate::check::{check, CredentialCheckReport, Evidence, Policy};
use crate::config::Config;
use crate::error::Error;
use crate::keys::{self, SigningMaterial};
use crate::provider::Provider;
use crate::{metadata, revocation};

/// A request to verify a batch of credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Credential tokens, in compact JWS form.
    pub credentials: Vec<String>,

    /// The DID holder-bound credentials are expected to be bound to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_holder_did: Option<String>,

    /// Key material authenticating ledger lookups.
    #[serde(default)]
    pub signing_material: SigningMaterial,

    /// Verification configuration.
    #[serde(default)]
    pub config: Config,
}

/// A credential and the results of checking it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedCredential {
    /// The decoded credential.
    pub credential: DecodedCredential,

    /// Check results.
    pub credential_checks: CredentialCheckReport,
}

/// Verify a batch of credentials.
///
/// # Errors
///
/// Returns an error if a token cannot be decoded. Every other problem is
/// reported in the credential's check results.
pub async fn verify(
    provider: impl Provider, request: VerifyRequest,
) -> Result<Vec<VerifiedCredential>, Error> {
    verify_at(provider, request, Utc::now()).await
}

/// Verify a batch of credentials, checking expiry against `now`.
///
/// # Errors
///
/// Returns an error if a token cannot be decoded.
#[instrument(level = "debug", skip(provider, request))]
pub async fn verify_at(
    provider: impl Provider, request: VerifyRequest, now: DateTime<Utc>,
) -> Result<Vec<VerifiedCredential>, Error> {
    let credentials = request
        .credentials
        .iter()
        .enumerate()
        .map(|(index, token)| {
            decode(token, index).map_err(|source| Error::Malformed { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = credentials.len(), "decoded credentials");

    let config = &request.config;
    let (keys, metadata, revocation) = futures::join!(
        keys::resolve(&credentials, &provider, config, &request.signing_material),
        metadata::resolve(&credentials, &provider),
        revocation::resolve(&credentials, &provider, config)
    );

    let evidence = Evidence {
        keys,
        metadata,
        revocation,
    };
    let policy = Policy {
        config,
        expected_holder_did: request.expected_holder_did.as_deref(),
        now,
    };

    Ok(credentials
        .into_iter()
        .map(|credential| {
            let credential_checks = check(&credential, &evidence, &policy);
            VerifiedCredential {
                credential,
                credential_checks,
            }
        })
        .collect())
}
