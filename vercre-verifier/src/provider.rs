//! # Provider
//!
//! The verifier reads everything it needs through these traits. Implementers
//! supply the transport (HTTP, ledger RPC, key custody) and the library supplies
//! the verification logic.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use vercre_did::{DidResolver, Document};
pub use vercre_status::Status;

/// Result is used for all external errors.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Verifier Provider trait.
pub trait Provider:
    Fetcher + ContextLoader + Ledger + Status + KeyCustody + DidResolver + Clone
{
}

/// The `Fetcher` trait retrieves issuer and credential-type registry data.
pub trait Fetcher: Send + Sync {
    /// The verified organization profile of the issuer: the service categories
    /// it is accredited for.
    fn organization_profile(
        &self, issuer_id: &str,
    ) -> impl Future<Output = Result<IssuerAccreditation>> + Send;

    /// The issuer's DID document.
    fn resolve_did(&self, issuer_id: &str) -> impl Future<Output = Result<Document>> + Send;

    /// Policy metadata for each of the named credential types.
    fn credential_type_metadata(
        &self, credential_types: &[String],
    ) -> impl Future<Output = Result<Vec<CredentialTypeMetadata>>> + Send;
}

/// `ContextLoader` fetches remote JSON-LD context documents.
pub trait ContextLoader: Send + Sync {
    /// Fetch the JSON-LD document at `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// `Ledger` resolves ledger-native DIDs.
pub trait Ledger: Send + Sync {
    /// Resolve the DID document for a multi-subject ledger DID. The document
    /// carries the keys of every subject and its metadata the bound issuer
    /// attestations of the listed credentials.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VouchersExhausted` when the caller's voucher reserve
    /// cannot pay for the lookup.
    fn resolve_did_document(
        &self, request: &LedgerRequest,
    ) -> impl Future<Output = Result<LedgerResolution, LedgerError>> + Send;
}

/// `KeyCustody` exchanges a key reference for the signing key it names.
pub trait KeyCustody: Send + Sync {
    /// Return the private key held in custody under `key_id`.
    fn signing_key(&self, key_id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Ledger resolution errors.
#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    /// The relying party's voucher reserve is depleted.
    #[error("voucher reserve exhausted")]
    VouchersExhausted,

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A batched ledger DID resolution.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRequest {
    /// Multi-subject DID naming every credential in the batch.
    pub multi_did: String,

    /// The credentials being resolved.
    pub credentials: Vec<LedgerCredential>,

    /// DID the lookup is charged to.
    pub burner_did: String,

    /// DID of the credential agent operator making the request.
    pub cao_did: String,

    /// Relying-party key authenticating the request.
    #[serde(skip_serializing)]
    pub signing_key: String,
}

/// A credential named in a [`LedgerRequest`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCredential {
    /// Credential id.
    pub id: String,

    /// Ledger DID sub-identifier.
    pub sub_id: String,

    /// Content hash, when the credential declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

/// Result of a batched ledger DID resolution.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResolution {
    /// DID document holding the keys of every resolved subject.
    pub document: Document,

    /// Bound issuer attestations, one per resolved credential.
    pub bound_issuer_vcs: Vec<BoundIssuerVc>,
}

/// A ledger-issued attestation binding a credential to its issuer.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoundIssuerVc {
    /// Id of the credential the attestation is bound to.
    pub id: String,

    /// The attestation, a compact JWS.
    pub credential: String,
}

/// Service categories an organization can be accredited for.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    /// General credential issuance, subject to primary-source checks.
    Issuer,

    /// Notarized issuance of any credential type.
    NotaryIssuer,

    /// Contact (email, phone) issuance.
    ContactIssuer,

    /// Identity document issuance.
    IdDocumentIssuer,

    /// Any identity issuance.
    IdentityIssuer,

    /// A category this verifier does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// An issuer's verified organization profile.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssuerAccreditation {
    /// Issuer id.
    pub id: String,

    /// Service categories the issuer is accredited for.
    #[serde(default)]
    pub permitted_service_categories: Vec<ServiceCategory>,
}

impl IssuerAccreditation {
    /// Returns `true` if the issuer holds `category`.
    #[must_use]
    pub fn permits(&self, category: ServiceCategory) -> bool {
        self.permitted_service_categories.contains(&category)
    }

    /// Returns `true` if the issuer holds at least one of `categories`.
    #[must_use]
    pub fn permits_any(&self, categories: &[ServiceCategory]) -> bool {
        categories.iter().any(|c| self.permits(*c))
    }
}

/// The kind of issuer a credential type requires.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum IssuerCategory {
    /// Any accredited issuer.
    #[default]
    RegularIssuer,

    /// A contact issuer.
    ContactIssuer,

    /// An identity document issuer.
    IdDocumentIssuer,

    /// An identity issuer.
    IdentityIssuer,
}

impl IssuerCategory {
    /// The service categories that qualify an issuer for this category, or
    /// `None` when the issuer's general accreditation applies.
    #[must_use]
    pub const fn required_service_categories(self) -> Option<&'static [ServiceCategory]> {
        match self {
            Self::ContactIssuer => {
                Some(&[ServiceCategory::ContactIssuer, ServiceCategory::IdentityIssuer])
            }
            Self::IdDocumentIssuer => {
                Some(&[ServiceCategory::IdDocumentIssuer, ServiceCategory::IdentityIssuer])
            }
            Self::IdentityIssuer => Some(&[ServiceCategory::IdentityIssuer]),
            Self::RegularIssuer => None,
        }
    }
}

/// Policy metadata for a credential type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTypeMetadata {
    /// Credential type.
    pub credential_type: String,

    /// Kind of issuer the type requires.
    #[serde(default)]
    pub issuer_category: IssuerCategory,
}
