//! # Revocation Resolution
//!
//! Asks the revocation oracle about every credential carrying a ledger
//! revocation-list entry. Oracle calls are made concurrently, one per
//! credential; a single failed call marks the batch's revocation data as
//! unavailable.

use futures::future::join_all;
use serde::Serialize;
use tracing::instrument;
use vercre_status::{ledger_status, StatusReference};
use vercre_w3c_vc::DecodedCredential;

use crate::config::Config;
use crate::error::ResolutionError;
use crate::provider::Status;

/// What the revocation oracle said about a credential.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationStatus {
    /// The credential has no ledger revocation-list entry.
    #[default]
    NotApplicable,

    /// The credential is revoked.
    Revoked,

    /// The credential is not revoked.
    Unrevoked,

    /// The oracle could not be asked or did not answer.
    Unknown,
}

/// Revocation statuses for a batch.
#[derive(Clone, Debug)]
pub struct RevocationResolution {
    /// Status by credential index.
    pub statuses: Vec<RevocationStatus>,

    /// Batch-wide outcome.
    pub status: Result<(), ResolutionError>,
}

impl Default for RevocationResolution {
    fn default() -> Self {
        Self {
            statuses: vec![],
            status: Ok(()),
        }
    }
}

impl RevocationResolution {
    /// The revocation status of the credential at `index`.
    #[must_use]
    pub fn status_of(&self, index: usize) -> RevocationStatus {
        self.statuses.get(index).copied().unwrap_or_default()
    }
}

/// Query the revocation oracle for each credential in the batch.
#[instrument(level = "debug", skip_all)]
pub async fn resolve(
    credentials: &[DecodedCredential], provider: &impl Status, config: &Config,
) -> RevocationResolution {
    let lookups = credentials.iter().map(|credential| async move {
        let Some(entry) = ledger_status(&credential.credential, &config.revocation_list_type)
        else {
            return Ok(RevocationStatus::NotApplicable);
        };

        let reference = entry.id.parse::<StatusReference>().map_err(|e| {
            ResolutionError::Dependency(format!("credential {}: {e}", credential.index))
        })?;
        tracing::debug!(list_id = reference.list_id, index = reference.index, "revocation lookup");

        match provider.revoked(&entry.id).await {
            Ok(true) => Ok(RevocationStatus::Revoked),
            Ok(false) => Ok(RevocationStatus::Unrevoked),
            Err(e) => Err(ResolutionError::dependency(e)),
        }
    });

    let mut resolution = RevocationResolution::default();
    for result in join_all(lookups).await {
        match result {
            Ok(status) => resolution.statuses.push(status),
            Err(e) => {
                tracing::warn!("revocation lookup failed: {e}");
                resolution.statuses.push(RevocationStatus::Unknown);
                if resolution.status.is_ok() {
                    resolution.status = Err(e);
                }
            }
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use serde_json::json;
    use test_utils::keys::Ed25519Signer;
    use test_utils::tokens;
    use vercre_status::REVOCATION_LIST_TYPE;
    use vercre_w3c_vc::{decode, CredentialStatus, CredentialSubject, VerifiableCredential};

    use super::*;

    const REVOKED: &str = "ethereum:0x1/getRevokedStatus?address=0x2&listId=1&index=1";
    const VALID: &str = "ethereum:0x1/getRevokedStatus?address=0x2&listId=1&index=2";
    const BROKEN: &str = "ethereum:0x1/getRevokedStatus?address=0x2&listId=1&index=3";

    struct Oracle;

    impl Status for Oracle {
        async fn revoked(&self, status_id: &str) -> anyhow::Result<bool> {
            match status_id {
                REVOKED => Ok(true),
                VALID => Ok(false),
                _ => Err(anyhow!("oracle unavailable")),
            }
        }
    }

    async fn credential(index: usize, status_id: Option<&str>) -> DecodedCredential {
        let mut builder = VerifiableCredential::builder()
            .add_type("EmailV1.0")
            .issuer("did:ion:issuer")
            .add_subject(CredentialSubject::default());
        if let Some(id) = status_id {
            builder = builder.add_status(CredentialStatus {
                id: id.into(),
                type_: REVOCATION_LIST_TYPE.into(),
                ..CredentialStatus::default()
            });
        }
        let vc = builder.build().expect("should build");
        let token = tokens::sign(&json!({"vc": vc}), &Ed25519Signer::new(1)).await;
        decode(&token, index).expect("should decode")
    }

    #[tokio::test]
    async fn oracle_answers() {
        let credentials = vec![
            credential(0, Some(REVOKED)).await,
            credential(1, Some(VALID)).await,
            credential(2, None).await,
        ];

        let resolution = resolve(&credentials, &Oracle, &Config::default()).await;

        assert!(resolution.status.is_ok());
        assert_eq!(resolution.status_of(0), RevocationStatus::Revoked);
        assert_eq!(resolution.status_of(1), RevocationStatus::Unrevoked);
        assert_eq!(resolution.status_of(2), RevocationStatus::NotApplicable);
    }

    #[tokio::test]
    async fn one_failure_flags_batch() {
        let credentials = vec![credential(0, Some(VALID)).await, credential(1, Some(BROKEN)).await];

        let resolution = resolve(&credentials, &Oracle, &Config::default()).await;

        assert!(matches!(resolution.status, Err(ResolutionError::Dependency(_))));
        assert_eq!(resolution.status_of(0), RevocationStatus::Unrevoked);
        assert_eq!(resolution.status_of(1), RevocationStatus::Unknown);
    }

    #[tokio::test]
    async fn malformed_reference() {
        let credentials = vec![credential(0, Some("ethereum:0x1/getRevokedStatus")).await];

        let resolution = resolve(&credentials, &Oracle, &Config::default()).await;

        assert!(resolution.status.is_err());
        assert_eq!(resolution.status_of(0), RevocationStatus::Unknown);
    }
}
