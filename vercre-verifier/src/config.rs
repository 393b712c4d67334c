//! # Configuration
//!
//! Verification settings. Every value has a default matching the ledger's
//! production conventions, so callers only set what differs.

use serde::{Deserialize, Serialize};
use vercre_status::REVOCATION_LIST_TYPE;

/// IRI of the "primary organization" property in the ledger's ontology.
pub const PRIMARY_ORGANIZATION_IRI: &str =
    "https://velocitynetwork.foundation/ontology#primaryOrganization";

/// IRI of the "primary source profile" property in the ledger's ontology.
pub const PRIMARY_SOURCE_PROFILE_IRI: &str =
    "https://velocitynetwork.foundation/ontology#primarySourceProfile";

/// Verification configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Lowest protocol version at which credentials are bound to a holder.
    pub holder_binding_version: u64,

    /// `credentialStatus` type of the ledger's revocation lists.
    pub revocation_list_type: String,

    /// IRI identifying a credential subject's primary organization.
    pub primary_organization_iri: String,

    /// IRI identifying a credential subject's primary source profile.
    pub primary_source_profile_iri: String,

    /// DID that ledger lookups are charged to.
    pub burner_did: String,

    /// DID of the credential agent operator.
    pub cao_did: String,

    /// Deepest nesting searched in a credential subject.
    pub max_traversal_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            holder_binding_version: 2,
            revocation_list_type: REVOCATION_LIST_TYPE.into(),
            primary_organization_iri: PRIMARY_ORGANIZATION_IRI.into(),
            primary_source_profile_iri: PRIMARY_SOURCE_PROFILE_IRI.into(),
            burner_did: String::new(),
            cao_did: String::new(),
            max_traversal_depth: 32,
        }
    }
}
