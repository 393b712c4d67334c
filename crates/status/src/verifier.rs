//! # Status (Verifier)
//!
//! Traits and type for managing the verification of a credential status as a
//! verifier.

use std::future::Future;

pub use vercre_w3c_vc::model::CredentialStatus;
use vercre_w3c_vc::model::VerifiableCredential;

/// Credential status type of the ledger's revocation lists.
pub const REVOCATION_LIST_TYPE: &str = "VelocityRevocationListJan2021";

/// The `Status` trait is used to proxy the resolution of a credential status.
///
/// Given the `id` of a credential's revocation-list entry, the implementer
/// should look up the referenced list on the ledger and report whether the
/// credential's bit is set.
pub trait Status: Send + Sync {
    /// Returns `true` if the credential has been revoked, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the revocation list cannot be read.
    fn revoked(&self, status_id: &str) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

/// The credential's entry in a ledger revocation list: the first
/// `credentialStatus` whose `type` is `list_type`. `credentialStatus` may be a
/// single object or an array.
#[must_use]
pub fn ledger_status<'a>(
    credential: &'a VerifiableCredential, list_type: &str,
) -> Option<&'a CredentialStatus> {
    credential.credential_status.as_ref()?.iter().find(|status| status.type_ == list_type)
}
