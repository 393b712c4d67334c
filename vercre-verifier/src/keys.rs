//! # Key Resolution
//!
//! Finds the public keys that must verify each credential's signature.
//!
//! Credentials signed under the ledger's DID method are resolved together in a
//! single ledger call using a multi-subject DID. That call also returns the
//! bound issuer attestations used later to check issuer trust. Every other
//! credential is resolved on its own through generic DID resolution.
//!
//! The two paths fail independently. A failure is recorded against the
//! credentials it affects and the keys that did resolve are still returned.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vercre_did::ledger::{multi_did, LedgerDid};
use vercre_did::{DidScheme, Document};
use vercre_proof::PublicKeyJwk;
use vercre_w3c_vc::DecodedCredential;

use crate::config::Config;
use crate::error::ResolutionError;
use crate::provider::{
    KeyCustody, LedgerCredential, LedgerError, LedgerRequest, LedgerResolution, Provider,
};

/// Relying-party key material used to authenticate ledger lookups.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SigningMaterial {
    /// A raw private key.
    Key(String),

    /// A reference to a key held by the key custody service.
    #[serde(rename_all = "camelCase")]
    Custody {
        /// Custody key reference.
        key_id: String,
    },
}

impl Default for SigningMaterial {
    fn default() -> Self {
        Self::Key(String::new())
    }
}

/// How a credential's signing key is found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Batched ledger resolution.
    Ledger(LedgerDid),

    /// Generic resolution of the DID in the key id.
    Generic(String),

    /// The header embeds the key.
    Embedded,

    /// No key can be identified.
    Unidentified,
}

/// Choose the key resolution strategy for a credential.
#[must_use]
pub fn strategy(credential: &DecodedCredential) -> KeyStrategy {
    let embedded = credential.key_metadata.jwk.is_some();
    let Some(kid) = &credential.key_metadata.kid else {
        return if embedded { KeyStrategy::Embedded } else { KeyStrategy::Unidentified };
    };

    match DidScheme::classify(kid) {
        DidScheme::Ledger(did) => KeyStrategy::Ledger(did),
        DidScheme::Other(method) if method.is_empty() => {
            if embedded {
                KeyStrategy::Embedded
            } else {
                KeyStrategy::Unidentified
            }
        }
        _ => KeyStrategy::Generic(kid.clone()),
    }
}

/// Public keys indexed by fully-qualified key id, case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct KeyReference(HashMap<String, PublicKeyJwk>);

impl KeyReference {
    /// Add a key.
    pub fn insert(&mut self, kid: &str, jwk: PublicKeyJwk) {
        self.0.insert(kid.to_lowercase(), jwk);
    }

    /// Look up a key by id.
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&PublicKeyJwk> {
        self.0.get(&kid.to_lowercase())
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add_document(&mut self, document: &Document) {
        for (kid, vm) in document.verification_methods() {
            match vm.public_key.to_jwk() {
                Ok(jwk) => self.insert(&kid, jwk),
                Err(e) => tracing::warn!(kid = %kid, "skipping unusable verification method: {e}"),
            }
        }
    }
}

/// The outcome of key resolution for a batch.
#[derive(Clone, Debug)]
pub struct KeyResolution {
    /// Every key resolved by either path.
    pub keys: KeyReference,

    /// Bound issuer attestations by lower-cased credential id.
    pub bound_issuer_vcs: HashMap<String, String>,

    /// Outcome of the batched ledger resolution.
    pub ledger: Result<(), ResolutionError>,

    /// Generic resolution failures by credential index.
    pub generic: HashMap<usize, ResolutionError>,
}

impl Default for KeyResolution {
    fn default() -> Self {
        Self {
            keys: KeyReference::default(),
            bound_issuer_vcs: HashMap::new(),
            ledger: Ok(()),
            generic: HashMap::new(),
        }
    }
}

impl KeyResolution {
    /// The resolution failure, if any, that applies to `credential`.
    #[must_use]
    pub fn failure_for(&self, credential: &DecodedCredential) -> Option<&ResolutionError> {
        match strategy(credential) {
            KeyStrategy::Ledger(_) => self.ledger.as_ref().err(),
            KeyStrategy::Generic(_) => self.generic.get(&credential.index),
            KeyStrategy::Embedded | KeyStrategy::Unidentified => None,
        }
    }

    /// The bound issuer attestation for the credential `id`.
    #[must_use]
    pub fn bound_issuer_vc(&self, id: &str) -> Option<&str> {
        self.bound_issuer_vcs.get(&id.to_lowercase()).map(String::as_str)
    }
}

/// Resolve the signing keys of a batch of credentials.
#[instrument(level = "debug", skip_all)]
pub async fn resolve(
    credentials: &[DecodedCredential], provider: &impl Provider, config: &Config,
    signing_material: &SigningMaterial,
) -> KeyResolution {
    let mut ledger_group = vec![];
    let mut generic_group = vec![];
    for credential in credentials {
        match strategy(credential) {
            KeyStrategy::Ledger(did) => ledger_group.push((credential, did)),
            KeyStrategy::Generic(did) => generic_group.push((credential.index, did)),
            KeyStrategy::Embedded | KeyStrategy::Unidentified => {}
        }
    }
    tracing::debug!(ledger = ledger_group.len(), generic = generic_group.len(), "resolving keys");

    let (ledger, generic) = futures::join!(
        resolve_ledger(&ledger_group, provider, config, signing_material),
        resolve_generic(&generic_group, provider)
    );

    let mut resolution = KeyResolution::default();

    match ledger {
        Ok(Some(resolved)) => {
            resolution.keys.add_document(&resolved.document);
            resolution.bound_issuer_vcs = resolved
                .bound_issuer_vcs
                .into_iter()
                .map(|vc| (vc.id.to_lowercase(), vc.credential))
                .collect();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("ledger key resolution failed: {e}");
            resolution.ledger = Err(e);
        }
    }

    for (index, result) in generic {
        match result {
            Ok(document) => resolution.keys.add_document(&document),
            Err(e) => {
                tracing::warn!(index, "key resolution failed: {e}");
                resolution.generic.insert(index, e);
            }
        }
    }

    resolution
}

async fn resolve_ledger(
    group: &[(&DecodedCredential, LedgerDid)], provider: &impl Provider, config: &Config,
    signing_material: &SigningMaterial,
) -> Result<Option<LedgerResolution>, ResolutionError> {
    if group.is_empty() {
        return Ok(None);
    }

    let signing_key = match signing_material {
        SigningMaterial::Key(key) => key.clone(),
        SigningMaterial::Custody { key_id } => {
            KeyCustody::signing_key(provider, key_id).await.map_err(ResolutionError::dependency)?
        }
    };

    let mut sub_ids: Vec<&str> = vec![];
    for (_, did) in group {
        if !sub_ids.contains(&did.sub_id.as_str()) {
            sub_ids.push(&did.sub_id);
        }
    }

    let request = LedgerRequest {
        multi_did: multi_did(sub_ids),
        credentials: group
            .iter()
            .map(|(credential, did)| LedgerCredential {
                id: credential.id.clone(),
                sub_id: did.sub_id.clone(),
                content_hash: credential.content_hash.clone(),
            })
            .collect(),
        burner_did: config.burner_did.clone(),
        cao_did: config.cao_did.clone(),
        signing_key,
    };

    match provider.resolve_did_document(&request).await {
        Ok(resolved) => Ok(Some(resolved)),
        Err(LedgerError::VouchersExhausted) => Err(ResolutionError::VouchersExhausted),
        Err(LedgerError::Other(e)) => Err(ResolutionError::dependency(e)),
    }
}

async fn resolve_generic(
    group: &[(usize, String)], provider: &impl Provider,
) -> Vec<(usize, Result<Document, ResolutionError>)> {
    let lookups = group.iter().map(|(index, did)| async move {
        let result = match vercre_did::resolve(did, provider).await {
            Ok(resolved) => resolved
                .document
                .ok_or_else(|| ResolutionError::Dependency(format!("no document for {did}"))),
            Err(e) => Err(ResolutionError::Dependency(format!("{}: {}", e.code(), e.message()))),
        };
        (*index, result)
    });
    join_all(lookups).await
}
