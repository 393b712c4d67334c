//! In-memory stand-ins for the services a verifier reads from.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use vercre_did::ledger::{sub_ids, LedgerDid};
use vercre_did::{Document, PublicKey, PublicKeyFormat, VerificationMethod};
use vercre_proof::PublicKeyJwk;
use vercre_status::StatusReference;
use vercre_verifier::provider::{
    BoundIssuerVc, CredentialTypeMetadata, IssuerAccreditation, LedgerError, LedgerRequest,
    LedgerResolution,
};

/// The ledger: keys published under ledger DIDs, bound issuer attestations and
/// a voucher reserve per account.
#[derive(Default, Clone, Debug)]
pub struct LedgerStore {
    keys: Arc<Mutex<Vec<VerificationMethod>>>,
    bound_issuer_vcs: Arc<Mutex<HashMap<String, String>>>,
    vouchers: Arc<Mutex<HashMap<String, u64>>>,
    lookups: Arc<Mutex<Vec<LedgerRequest>>>,
}

impl LedgerStore {
    /// Publish a key under a ledger DID URL.
    pub fn add_key(&self, kid: &str, jwk: PublicKeyJwk) {
        let controller = kid.split('#').next().unwrap_or_default().to_string();
        self.keys.lock().expect("should lock").push(VerificationMethod {
            id: kid.to_string(),
            type_: PublicKeyFormat::JsonWebKey2020,
            controller,
            public_key: PublicKey::Jwk(jwk),
        });
    }

    /// Record the attestation binding `credential_id` to its issuer.
    pub fn add_bound_issuer_vc(&self, credential_id: &str, token: &str) {
        self.bound_issuer_vcs
            .lock()
            .expect("should lock")
            .insert(credential_id.to_lowercase(), token.to_string());
    }

    /// Limit `account` to `quantity` credential lookups. Accounts without a
    /// limit are unmetered.
    pub fn set_vouchers(&self, account: &str, quantity: u64) {
        self.vouchers.lock().expect("should lock").insert(account.to_lowercase(), quantity);
    }

    /// Requests received so far.
    #[must_use]
    pub fn lookups(&self) -> Vec<LedgerRequest> {
        self.lookups.lock().expect("should lock").clone()
    }

    /// Resolve a multi-subject DID. Every credential in the request costs one
    /// voucher from the account its sub-identifier belongs to.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VouchersExhausted` if any account cannot pay for
    /// the lookup, or an error if the request is unauthenticated.
    pub fn resolve(&self, request: &LedgerRequest) -> Result<LedgerResolution, LedgerError> {
        self.lookups.lock().expect("should lock").push(request.clone());
        if request.signing_key.is_empty() {
            return Err(anyhow!("request is not signed").into());
        }

        let mut cost: HashMap<String, u64> = HashMap::new();
        for credential in &request.credentials {
            *cost.entry(account(&credential.sub_id)).or_default() += 1;
        }

        let mut vouchers = self.vouchers.lock().expect("should lock");
        for (account, needed) in &cost {
            if vouchers.get(account).is_some_and(|available| available < needed) {
                return Err(LedgerError::VouchersExhausted);
            }
        }
        for (account, needed) in cost {
            if let Some(available) = vouchers.get_mut(&account) {
                *available -= needed;
            }
        }

        let wanted: HashSet<String> =
            sub_ids(&request.multi_did).into_iter().map(str::to_lowercase).collect();
        let verification_method = self
            .keys
            .lock()
            .expect("should lock")
            .iter()
            .filter(|vm| {
                LedgerDid::parse(&vm.id)
                    .is_some_and(|did| wanted.contains(&did.sub_id.to_lowercase()))
            })
            .cloned()
            .collect::<Vec<_>>();

        let attestations = self.bound_issuer_vcs.lock().expect("should lock");
        let bound_issuer_vcs = request
            .credentials
            .iter()
            .filter_map(|credential| {
                attestations.get(&credential.id.to_lowercase()).map(|token| BoundIssuerVc {
                    id: credential.id.clone(),
                    credential: token.clone(),
                })
            })
            .collect();

        Ok(LedgerResolution {
            document: Document {
                id: request.multi_did.clone(),
                verification_method: Some(verification_method),
                ..Document::default()
            },
            bound_issuer_vcs,
        })
    }
}

// The account that pays for a sub-identifier's lookups.
fn account(sub_id: &str) -> String {
    sub_id.split(':').next().unwrap_or_default().to_lowercase()
}

/// Organization and credential type registries, JSON-LD contexts and `did:web`
/// documents.
#[derive(Default, Clone, Debug)]
pub struct RegistryStore {
    organizations: Arc<Mutex<HashMap<String, (IssuerAccreditation, Document)>>>,
    credential_types: Arc<Mutex<HashMap<String, CredentialTypeMetadata>>>,
    contexts: Arc<Mutex<HashMap<String, Value>>>,
    did_web: Arc<Mutex<HashMap<String, Document>>>,
}

impl RegistryStore {
    /// Register an issuer's organization profile and DID document.
    pub fn add_organization(&self, accreditation: IssuerAccreditation, document: Document) {
        self.organizations
            .lock()
            .expect("should lock")
            .insert(accreditation.id.clone(), (accreditation, document));
    }

    /// Register a credential type's metadata.
    pub fn add_credential_type(&self, metadata: CredentialTypeMetadata) {
        self.credential_types
            .lock()
            .expect("should lock")
            .insert(metadata.credential_type.clone(), metadata);
    }

    /// Publish a JSON-LD document at `url`.
    pub fn add_context(&self, url: &str, document: Value) {
        self.contexts.lock().expect("should lock").insert(url.to_string(), document);
    }

    /// Publish a `did:web` document at `url`.
    pub fn add_did_web(&self, url: &str, document: Document) {
        self.did_web.lock().expect("should lock").insert(url.to_string(), document);
    }

    /// An issuer's accreditation.
    ///
    /// # Errors
    ///
    /// Returns an error if the issuer is not registered.
    pub fn accreditation(&self, issuer_id: &str) -> Result<IssuerAccreditation> {
        let organizations = self.organizations.lock().expect("should lock");
        let Some((accreditation, _)) = organizations.get(issuer_id) else {
            bail!("organization {issuer_id} not found");
        };
        Ok(accreditation.clone())
    }

    /// An issuer's DID document.
    ///
    /// # Errors
    ///
    /// Returns an error if the issuer is not registered.
    pub fn document(&self, issuer_id: &str) -> Result<Document> {
        let organizations = self.organizations.lock().expect("should lock");
        let Some((_, document)) = organizations.get(issuer_id) else {
            bail!("DID {issuer_id} not found");
        };
        Ok(document.clone())
    }

    /// Metadata for the registered types among `credential_types`.
    #[must_use]
    pub fn credential_types(&self, credential_types: &[String]) -> Vec<CredentialTypeMetadata> {
        let registered = self.credential_types.lock().expect("should lock");
        credential_types.iter().filter_map(|t| registered.get(t).cloned()).collect()
    }

    /// The JSON-LD document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is published at `url`.
    pub fn context(&self, url: &str) -> Result<Value> {
        let contexts = self.contexts.lock().expect("should lock");
        contexts.get(url).cloned().ok_or_else(|| anyhow!("{url}: 404"))
    }

    /// The `did:web` document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is published at `url`.
    pub fn did_web(&self, url: &str) -> Result<Document> {
        let did_web = self.did_web.lock().expect("should lock");
        did_web.get(url).cloned().ok_or_else(|| anyhow!("{url}: 404"))
    }
}

/// Revocation lists by owning account and list id.
#[derive(Default, Clone, Debug)]
pub struct RevocationStore {
    lists: Arc<Mutex<HashMap<(String, u64), HashSet<u64>>>>,
}

impl RevocationStore {
    /// Create a revocation list with the given indexes revoked.
    pub fn add_list(&self, address: &str, list_id: u64, revoked: &[u64]) {
        self.lists
            .lock()
            .expect("should lock")
            .insert((address.to_lowercase(), list_id), revoked.iter().copied().collect());
    }

    /// Whether the entry named by `status_id` is revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is malformed or names an unknown
    /// list.
    pub fn revoked(&self, status_id: &str) -> Result<bool> {
        let reference: StatusReference = status_id.parse()?;
        let lists = self.lists.lock().expect("should lock");
        let Some(list) = lists.get(&(reference.address.to_lowercase(), reference.list_id)) else {
            bail!("revocation list {} not found", reference.list_id);
        };
        Ok(list.contains(&reference.index))
    }
}

/// Signing keys held in custody.
#[derive(Default, Clone, Debug)]
pub struct CustodyStore {
    keys: Arc<Mutex<HashMap<String, String>>>,
}

impl CustodyStore {
    /// Hold `key` under `key_id`.
    pub fn add_key(&self, key_id: &str, key: &str) {
        self.keys.lock().expect("should lock").insert(key_id.to_string(), key.to_string());
    }

    /// The key held under `key_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if no key is held under `key_id`.
    pub fn key(&self, key_id: &str) -> Result<String> {
        let keys = self.keys.lock().expect("should lock");
        keys.get(key_id).cloned().ok_or_else(|| anyhow!("no key {key_id}"))
    }
}
