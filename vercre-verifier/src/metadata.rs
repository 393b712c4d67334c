//! # Metadata Resolution
//!
//! Resolves what the issuer-trust check needs to know about a batch: each
//! issuer's accreditation and DID document, each credential type's policy
//! metadata, and each credential's JSON-LD context.
//!
//! Issuers and credential types are looked up once per distinct value. JSON-LD
//! contexts are resolved per credential from two placements, the credential's
//! own `@context` and the legacy `credentialSubject.@context`.
//!
//! Self-signed credentials are skipped: their issuer trust is never checked.
//!
//! Any failure marks the whole batch's metadata as unavailable.

use std::collections::HashMap;

use futures::future::join_all;
use serde_json::Value;
use tracing::instrument;
use vercre_core::{Kind, Quota};
use vercre_did::Document;
use vercre_w3c_vc::DecodedCredential;

use crate::error::ResolutionError;
use crate::jsonld::{load_context, JsonLdContext};
use crate::provider::{ContextLoader, CredentialTypeMetadata, IssuerAccreditation, Provider};

/// Metadata resolved for a batch.
#[derive(Clone, Debug)]
pub struct MetadataResolution {
    /// Issuer accreditations by issuer id.
    pub accreditations: HashMap<String, IssuerAccreditation>,

    /// Issuer DID documents by issuer id.
    pub issuer_documents: HashMap<String, Document>,

    /// Credential type metadata by credential type.
    pub credential_types: HashMap<String, CredentialTypeMetadata>,

    /// JSON-LD context by credential index.
    pub contexts: HashMap<usize, JsonLdContext>,

    /// Batch-wide outcome.
    pub status: Result<(), ResolutionError>,
}

impl Default for MetadataResolution {
    fn default() -> Self {
        Self {
            accreditations: HashMap::new(),
            issuer_documents: HashMap::new(),
            credential_types: HashMap::new(),
            contexts: HashMap::new(),
            status: Ok(()),
        }
    }
}

/// Resolve issuer, credential type and JSON-LD metadata for a batch.
#[instrument(level = "debug", skip_all)]
pub async fn resolve(
    credentials: &[DecodedCredential], provider: &impl Provider,
) -> MetadataResolution {
    let issued: Vec<&DecodedCredential> =
        credentials.iter().filter(|c| !c.is_self_signed()).collect();

    let mut issuer_ids: Vec<&str> = vec![];
    let mut credential_types: Vec<String> = vec![];
    for credential in &issued {
        if !issuer_ids.contains(&credential.issuer_id.as_str()) {
            issuer_ids.push(&credential.issuer_id);
        }
        if let Some(type_) = &credential.credential_type {
            if !credential_types.contains(type_) {
                credential_types.push(type_.clone());
            }
        }
    }
    tracing::debug!(
        issuers = issuer_ids.len(),
        types = credential_types.len(),
        "resolving metadata"
    );

    let (issuers, types, contexts) = futures::join!(
        resolve_issuers(&issuer_ids, provider),
        resolve_types(&credential_types, provider),
        resolve_contexts(&issued, provider)
    );

    let mut resolution = MetadataResolution::default();
    let mut failures = vec![];

    match issuers {
        Ok(issuers) => {
            for (id, accreditation, document) in issuers {
                resolution.accreditations.insert(id.clone(), accreditation);
                resolution.issuer_documents.insert(id, document);
            }
        }
        Err(e) => failures.push(e),
    }
    match types {
        Ok(types) => {
            resolution.credential_types =
                types.into_iter().map(|t| (t.credential_type.clone(), t)).collect();
        }
        Err(e) => failures.push(e),
    }
    match contexts {
        Ok(contexts) => resolution.contexts = contexts.into_iter().collect(),
        Err(e) => failures.push(e),
    }

    if let Some(first) = failures.into_iter().next() {
        tracing::warn!("metadata resolution failed: {first}");
        resolution.status = Err(first);
    }
    resolution
}

async fn resolve_issuers(
    issuer_ids: &[&str], provider: &impl Provider,
) -> Result<Vec<(String, IssuerAccreditation, Document)>, ResolutionError> {
    let lookups = issuer_ids.iter().map(|id| async move {
        let (accreditation, document) =
            futures::join!(provider.organization_profile(id), provider.resolve_did(id));
        let accreditation = accreditation
            .map_err(|e| ResolutionError::Dependency(format!("organization profile {id}: {e}")))?;
        let document =
            document.map_err(|e| ResolutionError::Dependency(format!("issuer DID {id}: {e}")))?;
        Ok((id.to_string(), accreditation, document))
    });
    join_all(lookups).await.into_iter().collect()
}

async fn resolve_types(
    credential_types: &[String], provider: &impl Provider,
) -> Result<Vec<CredentialTypeMetadata>, ResolutionError> {
    if credential_types.is_empty() {
        return Ok(vec![]);
    }
    provider.credential_type_metadata(credential_types).await.map_err(ResolutionError::dependency)
}

async fn resolve_contexts(
    credentials: &[&DecodedCredential], provider: &impl ContextLoader,
) -> Result<Vec<(usize, JsonLdContext)>, ResolutionError> {
    let lookups = credentials.iter().map(|credential| async move {
        resolve_context(credential, provider).await.map(|context| (credential.index, context))
    });
    join_all(lookups).await.into_iter().collect()
}

// Load the root and subject contexts and keep the one that defines the
// subject's type, preferring the root.
async fn resolve_context(
    credential: &DecodedCredential, loader: &impl ContextLoader,
) -> Result<JsonLdContext, ResolutionError> {
    let root = credential.credential.context.as_ref().map(context_value);
    let subject = credential.credential.subject().and_then(|s| s.context()).cloned();
    if root.is_none() && subject.is_none() {
        return Err(ResolutionError::Dependency(format!(
            "credential {} has no @context",
            credential.index
        )));
    }

    let load = |context: Option<Value>| async move {
        match context {
            Some(context) => load_context(&context, loader).await.map(Some),
            None => Ok(None),
        }
    };
    let (root, subject) = futures::join!(load(root), load(subject));
    let root = root.map_err(ResolutionError::dependency)?;
    let subject = subject.map_err(ResolutionError::dependency)?;

    let subject_type = credential
        .credential
        .subject()
        .and_then(|s| s.types().first().map(ToString::to_string));
    let defines = |context: &Option<JsonLdContext>| {
        context.as_ref().is_some_and(|c| subject_type.as_deref().is_some_and(|t| c.defines(t)))
    };

    let chosen = if defines(&root) || (!defines(&subject) && root.is_some()) {
        root
    } else {
        subject
    };
    Ok(chosen.unwrap_or_default())
}

fn context_value(context: &Quota<Kind<Value>>) -> Value {
    let entry = |kind: &Kind<Value>| match kind {
        Kind::String(url) => Value::String(url.clone()),
        Kind::Object(object) => object.clone(),
    };
    match context {
        Quota::One(kind) => entry(kind),
        Quota::Many(kinds) => Value::Array(kinds.iter().map(entry).collect()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_utils::keys::Ed25519Signer;
    use test_utils::tokens;
    use vercre_w3c_vc::decode;

    use super::*;
    use crate::provider::Result;

    const ROOT: &str = "https://example.com/contexts/root.json";
    const SUBJECT: &str = "https://example.com/contexts/subject.json";

    struct Contexts;

    impl ContextLoader for Contexts {
        async fn load(&self, url: &str) -> Result<Value> {
            match url {
                ROOT => Ok(json!({"@context": {"Root": "https://example.com#Root"}})),
                SUBJECT => Ok(json!({"@context": {"Person": "https://example.com#Person"}})),
                _ => Err(anyhow::anyhow!("{url}: 404")),
            }
        }
    }

    async fn credential(root: Option<&str>, subject: Option<&str>) -> DecodedCredential {
        let mut vc = json!({
            "type": ["VerifiableCredential", "PersonV1.0"],
            "issuer": "did:ion:issuer",
            "credentialSubject": {"type": "Person", "name": "Alice"}
        });
        if let Some(url) = root {
            vc["@context"] = json!(url);
        }
        if let Some(url) = subject {
            vc["credentialSubject"]["@context"] = json!(url);
        }
        let signer = Ed25519Signer::new(1).with_kid("did:velocity:v2:0xabc:1:2#key-1");
        decode(&tokens::sign(&json!({"vc": vc}), &signer).await, 0).expect("should decode")
    }

    #[tokio::test]
    async fn context_defining_subject_type() {
        let both = credential(Some(ROOT), Some(SUBJECT)).await;
        let context = resolve_context(&both, &Contexts).await.expect("should resolve");
        assert!(context.defines("Person"));

        let subject_only = credential(None, Some(SUBJECT)).await;
        let context = resolve_context(&subject_only, &Contexts).await.expect("should resolve");
        assert!(context.defines("Person"));
    }

    #[tokio::test]
    async fn root_context_preferred() {
        let root_only = credential(Some(ROOT), None).await;
        let context = resolve_context(&root_only, &Contexts).await.expect("should resolve");
        assert!(context.defines("Root"));

        let both_define = credential(Some(SUBJECT), Some(ROOT)).await;
        let context = resolve_context(&both_define, &Contexts).await.expect("should resolve");
        assert!(context.defines("Person"));
        assert!(!context.defines("Root"));
    }

    #[tokio::test]
    async fn context_failures() {
        let none = credential(None, None).await;
        assert!(resolve_context(&none, &Contexts).await.is_err());

        let missing = credential(Some("https://example.com/missing.json"), Some(SUBJECT)).await;
        assert!(resolve_context(&missing, &Contexts).await.is_err());
    }

    #[test]
    fn context_values() {
        let one = Quota::One(Kind::String(ROOT.into()));
        assert_eq!(context_value(&one), json!(ROOT));

        let many = Quota::Many(vec![Kind::String(ROOT.into()), Kind::Object(json!({"a": "b"}))]);
        assert_eq!(context_value(&many), json!([ROOT, {"a": "b"}]));
    }
}
