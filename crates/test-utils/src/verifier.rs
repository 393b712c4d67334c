//! A verifier [`Provider`](vercre_verifier::provider::Provider) over the in-memory stores.

use serde_json::Value;
use vercre_did::{DidResolver, Document};
use vercre_status::Status;
use vercre_verifier::provider::{
    ContextLoader, CredentialTypeMetadata, Fetcher, IssuerAccreditation, KeyCustody, Ledger,
    LedgerError, LedgerRequest, LedgerResolution, Result,
};

use crate::store::{CustodyStore, LedgerStore, RegistryStore, RevocationStore};

/// Verifier provider backed by in-memory stores.
#[derive(Default, Clone, Debug)]
pub struct Provider {
    /// Ledger keys, bound issuer attestations and voucher accounting.
    pub ledger: LedgerStore,

    /// Organization profiles, DID documents, credential types and contexts.
    pub registry: RegistryStore,

    /// Revocation lists.
    pub revocation: RevocationStore,

    /// Relying-party signing keys held in custody.
    pub custody: CustodyStore,
}

impl Provider {
    /// Create a provider with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl vercre_verifier::provider::Provider for Provider {}

impl Fetcher for Provider {
    async fn organization_profile(&self, issuer_id: &str) -> Result<IssuerAccreditation> {
        self.registry.accreditation(issuer_id)
    }

    async fn resolve_did(&self, issuer_id: &str) -> Result<Document> {
        self.registry.document(issuer_id)
    }

    async fn credential_type_metadata(
        &self, credential_types: &[String],
    ) -> Result<Vec<CredentialTypeMetadata>> {
        Ok(self.registry.credential_types(credential_types))
    }
}

impl ContextLoader for Provider {
    async fn load(&self, url: &str) -> Result<Value> {
        self.registry.context(url)
    }
}

impl Ledger for Provider {
    async fn resolve_did_document(
        &self, request: &LedgerRequest,
    ) -> Result<LedgerResolution, LedgerError> {
        self.ledger.resolve(request)
    }
}

impl Status for Provider {
    async fn revoked(&self, status_id: &str) -> anyhow::Result<bool> {
        self.revocation.revoked(status_id)
    }
}

impl KeyCustody for Provider {
    async fn signing_key(&self, key_id: &str) -> Result<String> {
        self.custody.key(key_id)
    }
}

impl DidResolver for Provider {
    async fn resolve(&self, url: &str) -> anyhow::Result<Document> {
        self.registry.did_web(url)
    }
}
