//! # Check Engine
//!
//! Five checks are run against every credential, in order:
//!
//! 1. `UNTAMPERED`: the signature verifies against the resolved key.
//! 2. `TRUSTED_ISSUER`: the issuer is accredited for the credential's type.
//! 3. `TRUSTED_HOLDER`: the credential is bound to the expected holder.
//! 4. `UNREVOKED`: the revocation oracle has not revoked it.
//! 5. `UNEXPIRED`: the expiration date has not passed.
//!
//! A credential whose signature does not pass is not checked further.
//!
//! Checks are synchronous and read only resolved data, so running them twice
//! over the same [`Evidence`] gives the same report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vercre_did::Document;
use vercre_w3c_vc::{decode, DecodedCredential};

use crate::config::Config;
use crate::error::ResolutionError;
use crate::jsonld::{find_identifier, JsonLdContext, Node};
use crate::keys::KeyResolution;
use crate::metadata::MetadataResolution;
use crate::provider::{IssuerAccreditation, IssuerCategory, ServiceCategory};
use crate::revocation::{RevocationResolution, RevocationStatus};

/// The outcome of a single check.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckResult {
    /// Skipped because an earlier check did not pass.
    #[default]
    NotChecked,

    /// The check passed.
    Pass,

    /// The check failed.
    Fail,

    /// The check could not be made because the data it needs is malformed or
    /// missing.
    DataIntegrityError,

    /// The check does not apply to this credential.
    NotApplicable,

    /// The credential is self-signed, so its issuer cannot be trusted.
    SelfSigned,

    /// The ledger lookup was refused because the voucher reserve is depleted.
    VoucherReserveExhausted,

    /// A dependency the check needs could not be resolved.
    DependencyResolutionError,
}

impl From<&ResolutionError> for CheckResult {
    fn from(err: &ResolutionError) -> Self {
        match err {
            ResolutionError::VouchersExhausted => Self::VoucherReserveExhausted,
            ResolutionError::Dependency(_) => Self::DependencyResolutionError,
        }
    }
}

/// The results of every check run against a credential.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(clippy::module_name_repetitions)]
pub struct CredentialCheckReport {
    untampered: CheckResult,
    trusted_issuer: CheckResult,
    trusted_holder: CheckResult,
    unrevoked: CheckResult,
    unexpired: CheckResult,
}

impl CredentialCheckReport {
    /// Assemble a report. When `untampered` is anything other than `Pass` the
    /// remaining results are discarded and reported as `NotChecked`.
    #[must_use]
    pub fn new(
        untampered: CheckResult, trusted_issuer: CheckResult, trusted_holder: CheckResult,
        unrevoked: CheckResult, unexpired: CheckResult,
    ) -> Self {
        if untampered != CheckResult::Pass {
            return Self::short_circuit(untampered);
        }
        Self {
            untampered,
            trusted_issuer,
            trusted_holder,
            unrevoked,
            unexpired,
        }
    }

    /// A report for a credential that failed signature verification.
    #[must_use]
    pub const fn short_circuit(untampered: CheckResult) -> Self {
        Self {
            untampered,
            trusted_issuer: CheckResult::NotChecked,
            trusted_holder: CheckResult::NotChecked,
            unrevoked: CheckResult::NotChecked,
            unexpired: CheckResult::NotChecked,
        }
    }

    /// `UNTAMPERED` result.
    #[must_use]
    pub const fn untampered(&self) -> CheckResult {
        self.untampered
    }

    /// `TRUSTED_ISSUER` result.
    #[must_use]
    pub const fn trusted_issuer(&self) -> CheckResult {
        self.trusted_issuer
    }

    /// `TRUSTED_HOLDER` result.
    #[must_use]
    pub const fn trusted_holder(&self) -> CheckResult {
        self.trusted_holder
    }

    /// `UNREVOKED` result.
    #[must_use]
    pub const fn unrevoked(&self) -> CheckResult {
        self.unrevoked
    }

    /// `UNEXPIRED` result.
    #[must_use]
    pub const fn unexpired(&self) -> CheckResult {
        self.unexpired
    }
}

/// Everything resolved for a batch that the checks read.
#[derive(Clone, Debug, Default)]
pub struct Evidence {
    /// Signing keys and bound issuer attestations.
    pub keys: KeyResolution,

    /// Issuer, credential type and JSON-LD metadata.
    pub metadata: MetadataResolution,

    /// Revocation statuses.
    pub revocation: RevocationResolution,
}

/// Caller-supplied expectations the checks are made against.
#[derive(Clone, Debug)]
pub struct Policy<'a> {
    /// Verification configuration.
    pub config: &'a Config,

    /// The DID every holder-bound credential must be bound to.
    pub expected_holder_did: Option<&'a str>,

    /// The time expiration is checked against.
    pub now: DateTime<Utc>,
}

/// Run every check against `credential`.
#[must_use]
pub fn check(
    credential: &DecodedCredential, evidence: &Evidence, policy: &Policy,
) -> CredentialCheckReport {
    let untampered = check_untampered(credential, &evidence.keys);
    if untampered != CheckResult::Pass {
        tracing::debug!(index = credential.index, ?untampered, "skipping remaining checks");
        return CredentialCheckReport::short_circuit(untampered);
    }

    CredentialCheckReport::new(
        untampered,
        check_trusted_issuer(credential, &evidence.keys, &evidence.metadata, policy.config),
        check_trusted_holder(credential, policy.expected_holder_did, policy.config),
        check_credential_status(credential, &evidence.revocation),
        check_unexpired(credential, policy.now),
    )
}

/// Verify the credential's signature.
///
/// The key is looked up by the header's key id; a self-signed credential falls
/// back to the key embedded in its header. Key resolution failures take
/// precedence over verification, voucher exhaustion first.
#[must_use]
pub fn check_untampered(credential: &DecodedCredential, keys: &KeyResolution) -> CheckResult {
    if let Some(failure) = keys.failure_for(credential) {
        return failure.into();
    }

    let resolved = credential.key_metadata.kid.as_deref().and_then(|kid| keys.keys.get(kid));
    let embedded = credential.key_metadata.jwk.as_ref().filter(|_| credential.is_self_signed());
    let Some(jwk) = resolved.or(embedded) else {
        tracing::debug!(index = credential.index, "no verification key");
        return CheckResult::DataIntegrityError;
    };

    match credential.verify(jwk) {
        Ok(()) => CheckResult::Pass,
        Err(e) => {
            tracing::debug!(index = credential.index, "signature verification failed: {e}");
            CheckResult::Fail
        }
    }
}

/// Check the issuer is trusted to issue the credential.
#[must_use]
pub fn check_trusted_issuer(
    credential: &DecodedCredential, keys: &KeyResolution, metadata: &MetadataResolution,
    config: &Config,
) -> CheckResult {
    if credential.is_self_signed() {
        return CheckResult::SelfSigned;
    }
    if let Err(e) = &metadata.status {
        return e.into();
    }

    let issuer_id = &credential.issuer_id;
    let bound_issuer_vc = keys.bound_issuer_vc(&credential.id);
    let accreditation = metadata.accreditations.get(issuer_id);
    let document = metadata.issuer_documents.get(issuer_id);
    let type_metadata =
        credential.credential_type.as_ref().and_then(|t| metadata.credential_types.get(t));

    let (Some(bound_issuer_vc), Some(accreditation), Some(document), Some(type_metadata)) =
        (bound_issuer_vc, accreditation, document, type_metadata)
    else {
        tracing::debug!(index = credential.index, "issuer trust data is incomplete");
        return CheckResult::Fail;
    };

    if let Err(result) = verify_bound_issuer_vc(bound_issuer_vc, document) {
        return result;
    }

    match accredited(type_metadata.issuer_category, accreditation) {
        Accredited::Yes => CheckResult::Pass,
        Accredited::No => CheckResult::Fail,
        Accredited::PrimarySource => {
            check_primary_source(credential, metadata.contexts.get(&credential.index), config)
        }
    }
}

// Check the ledger's attestation binding the credential to its issuer.
fn verify_bound_issuer_vc(token: &str, document: &Document) -> Result<(), CheckResult> {
    let attestation = decode(token, 0).map_err(|e| {
        tracing::debug!("malformed bound issuer attestation: {e}");
        CheckResult::DataIntegrityError
    })?;
    let kid = attestation.key_metadata.kid.as_deref().ok_or(CheckResult::DataIntegrityError)?;
    let jwk = document.public_key(kid).map_err(|e| {
        tracing::debug!(kid, "bound issuer attestation key: {e}");
        CheckResult::DataIntegrityError
    })?;

    attestation.verify(&jwk).map_err(|e| {
        tracing::debug!("bound issuer attestation signature: {e}");
        CheckResult::Fail
    })?;

    if !document.is_identified_by(&attestation.issuer_id) {
        tracing::debug!(issuer = attestation.issuer_id, "bound issuer is not the issuer");
        return Err(CheckResult::Fail);
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Accredited {
    Yes,
    No,
    PrimarySource,
}

// Decide whether an issuer's accreditation covers a credential type's issuer
// category.
fn accredited(category: IssuerCategory, accreditation: &IssuerAccreditation) -> Accredited {
    if let Some(required) = category.required_service_categories() {
        return if accreditation.permits_any(required) { Accredited::Yes } else { Accredited::No };
    }
    if accreditation.permits(ServiceCategory::NotaryIssuer) {
        Accredited::Yes
    } else if accreditation.permits(ServiceCategory::Issuer) {
        Accredited::PrimarySource
    } else {
        Accredited::No
    }
}

// The credential subject must name the issuer as its primary organization (or
// primary source). Missing semantic information is not held against the
// issuer.
fn check_primary_source(
    credential: &DecodedCredential, context: Option<&JsonLdContext>, config: &Config,
) -> CheckResult {
    let Some(subject) = credential.credential.subject() else {
        tracing::warn!(index = credential.index, "credential has no subject");
        return CheckResult::Pass;
    };
    let Some(type_) = subject.types().first().copied() else {
        tracing::warn!(index = credential.index, "credential subject has no type");
        return CheckResult::Pass;
    };
    let Some(context) = context.filter(|c| c.defines(type_)) else {
        tracing::warn!(index = credential.index, type_, "subject type not defined in @context");
        return CheckResult::Pass;
    };

    let iris = [&config.primary_organization_iri, &config.primary_source_profile_iri];
    let Some(property) = iris.iter().find_map(|iri| context.property_for_iri(type_, iri)) else {
        tracing::warn!(index = credential.index, type_, "no primary source property");
        return CheckResult::Pass;
    };

    match find_identifier(Node::Object(&subject.claims), property, config.max_traversal_depth) {
        Some(id) if id == credential.issuer_id => CheckResult::Pass,
        found => {
            tracing::debug!(index = credential.index, property, ?found, "primary source mismatch");
            CheckResult::Fail
        }
    }
}

/// Check the credential is bound to the expected holder.
#[must_use]
pub fn check_trusted_holder(
    credential: &DecodedCredential, expected_holder_did: Option<&str>, config: &Config,
) -> CheckResult {
    if credential.is_self_signed() || credential.protocol_version() < config.holder_binding_version
    {
        return CheckResult::NotApplicable;
    }
    match (expected_holder_did, credential.subject_id()) {
        (Some(expected), Some(holder)) if expected == holder => CheckResult::Pass,
        _ => CheckResult::Fail,
    }
}

/// Map the revocation oracle's answer to a result.
#[must_use]
pub const fn check_revocation(status: RevocationStatus) -> CheckResult {
    match status {
        RevocationStatus::NotApplicable => CheckResult::NotApplicable,
        RevocationStatus::Unrevoked => CheckResult::Pass,
        RevocationStatus::Revoked | RevocationStatus::Unknown => CheckResult::Fail,
    }
}

/// Check the credential has not been revoked. When revocation data could not
/// be retrieved for the batch, any credential carrying a revocation reference
/// fails.
#[must_use]
pub fn check_credential_status(
    credential: &DecodedCredential, revocation: &RevocationResolution,
) -> CheckResult {
    let status = revocation.status_of(credential.index);
    if revocation.status.is_err() && status != RevocationStatus::NotApplicable {
        return CheckResult::Fail;
    }
    check_revocation(status)
}

/// Check the credential has not expired.
#[must_use]
pub fn check_unexpired(credential: &DecodedCredential, now: DateTime<Utc>) -> CheckResult {
    match credential.credential.expiration_date {
        None => CheckResult::NotApplicable,
        Some(expires) if now > expires => CheckResult::Fail,
        Some(_) => CheckResult::Pass,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::{json, Value};
    use test_utils::keys::Ed25519Signer;
    use test_utils::tokens;

    use super::*;
    use crate::jsonld::load_context;
    use crate::provider::{ContextLoader, CredentialTypeMetadata, Result};

    const ISSUER: &str = "did:ion:acme";
    const CREDENTIAL_ID: &str = "did:velocity:v2:0xabc:1:2";
    const LEDGER_KID: &str = "did:velocity:v2:0xabc:1:2#key-1";
    const HOLDER: &str = "did:key:holder";

    struct NoRemote;

    impl ContextLoader for NoRemote {
        async fn load(&self, url: &str) -> Result<Value> {
            Err(anyhow::anyhow!("unexpected load of {url}"))
        }
    }

    fn report() -> CredentialCheckReport {
        CredentialCheckReport::new(
            CheckResult::Pass,
            CheckResult::SelfSigned,
            CheckResult::NotApplicable,
            CheckResult::Pass,
            CheckResult::Fail,
        )
    }

    async fn ledger_credential(signer: &Ed25519Signer, subject: Value) -> DecodedCredential {
        let claims = json!({
            "vnfProtocolVersion": 2,
            "vc": {
                "id": CREDENTIAL_ID,
                "type": ["VerifiableCredential", "EmploymentPastV1.1"],
                "issuer": ISSUER,
                "credentialSubject": subject,
                "expirationDate": "2030-01-01T00:00:00Z"
            }
        });
        let signer = signer.clone().with_kid(LEDGER_KID);
        decode(&tokens::sign(&claims, &signer).await, 0).expect("should decode")
    }

    fn issuer_document(signer: &Ed25519Signer) -> Document {
        serde_json::from_value(json!({
            "id": ISSUER,
            "alsoKnownAs": ["did:web:acme.example.com"],
            "verificationMethod": [{
                "id": format!("{ISSUER}#key-1"),
                "type": "JsonWebKey2020",
                "controller": ISSUER,
                "publicKeyJwk": signer.public_jwk()
            }]
        }))
        .expect("should deserialize")
    }

    async fn bound_issuer_vc(signer: &Ed25519Signer, kid: &str, issuer: &str) -> String {
        let claims = json!({
            "vc": {
                "type": ["VerifiableCredential", "BoundIssuerV1"],
                "issuer": issuer,
                "credentialSubject": {"id": CREDENTIAL_ID}
            }
        });
        tokens::sign(&claims, &signer.clone().with_kid(kid)).await
    }

    async fn evidence(signer: &Ed25519Signer, categories: Vec<ServiceCategory>) -> Evidence {
        let context = json!({
            "EmploymentPast": {
                "@id": "https://velocitynetwork.foundation/ontology#EmploymentPast",
                "@context": {
                    "vnf": "https://velocitynetwork.foundation/ontology#",
                    "legalEmployer": {"@id": "vnf:primaryOrganization", "@type": "@id"}
                }
            }
        });

        let mut evidence = Evidence::default();
        evidence.keys.keys.insert(LEDGER_KID, signer.public_jwk());
        evidence.keys.bound_issuer_vcs.insert(
            CREDENTIAL_ID.to_lowercase(),
            bound_issuer_vc(signer, &format!("{ISSUER}#key-1"), ISSUER).await,
        );
        evidence.metadata.accreditations.insert(
            ISSUER.into(),
            IssuerAccreditation {
                id: ISSUER.into(),
                permitted_service_categories: categories,
            },
        );
        evidence.metadata.issuer_documents.insert(ISSUER.into(), issuer_document(signer));
        evidence.metadata.credential_types.insert(
            "EmploymentPastV1.1".into(),
            CredentialTypeMetadata {
                credential_type: "EmploymentPastV1.1".into(),
                issuer_category: IssuerCategory::RegularIssuer,
            },
        );
        evidence
            .metadata
            .contexts
            .insert(0, load_context(&context, &NoRemote).await.expect("should load"));
        evidence
    }

    fn employment(employer: &str) -> Value {
        json!({
            "id": HOLDER,
            "type": "EmploymentPast",
            "legalEmployer": {"name": "ACME Corp", "identifier": employer}
        })
    }

    fn policy(config: &Config) -> Policy<'_> {
        Policy {
            config,
            expected_holder_did: Some(HOLDER),
            now: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn report_fields() {
        assert_json_snapshot!(report(), @r#"
        {
          "UNTAMPERED": "PASS",
          "TRUSTED_ISSUER": "SELF_SIGNED",
          "TRUSTED_HOLDER": "NOT_APPLICABLE",
          "UNREVOKED": "PASS",
          "UNEXPIRED": "FAIL"
        }
        "#);
    }

    #[test]
    fn report_short_circuits() {
        let report = CredentialCheckReport::new(
            CheckResult::DataIntegrityError,
            CheckResult::Pass,
            CheckResult::Pass,
            CheckResult::Pass,
            CheckResult::Pass,
        );
        assert_json_snapshot!(report, @r#"
        {
          "UNTAMPERED": "DATA_INTEGRITY_ERROR",
          "TRUSTED_ISSUER": "NOT_CHECKED",
          "TRUSTED_HOLDER": "NOT_CHECKED",
          "UNREVOKED": "NOT_CHECKED",
          "UNEXPIRED": "NOT_CHECKED"
        }
        "#);
    }

    #[rstest]
    #[case::contact(IssuerCategory::ContactIssuer, vec![ServiceCategory::ContactIssuer], Accredited::Yes)]
    #[case::contact_by_identity(IssuerCategory::ContactIssuer, vec![ServiceCategory::IdentityIssuer], Accredited::Yes)]
    #[case::contact_by_issuer(IssuerCategory::ContactIssuer, vec![ServiceCategory::Issuer], Accredited::No)]
    #[case::id_document(IssuerCategory::IdDocumentIssuer, vec![ServiceCategory::IdDocumentIssuer], Accredited::Yes)]
    #[case::id_document_by_notary(IssuerCategory::IdDocumentIssuer, vec![ServiceCategory::NotaryIssuer], Accredited::No)]
    #[case::identity(IssuerCategory::IdentityIssuer, vec![ServiceCategory::IdentityIssuer], Accredited::Yes)]
    #[case::identity_by_contact(IssuerCategory::IdentityIssuer, vec![ServiceCategory::ContactIssuer], Accredited::No)]
    #[case::notary(IssuerCategory::RegularIssuer, vec![ServiceCategory::NotaryIssuer], Accredited::Yes)]
    #[case::notary_and_issuer(IssuerCategory::RegularIssuer, vec![ServiceCategory::Issuer, ServiceCategory::NotaryIssuer], Accredited::Yes)]
    #[case::regular(IssuerCategory::RegularIssuer, vec![ServiceCategory::Issuer], Accredited::PrimarySource)]
    #[case::unaccredited(IssuerCategory::RegularIssuer, vec![ServiceCategory::Unknown], Accredited::No)]
    #[case::none(IssuerCategory::RegularIssuer, vec![], Accredited::No)]
    fn issuer_categories(
        #[case] category: IssuerCategory, #[case] permitted: Vec<ServiceCategory>,
        #[case] expected: Accredited,
    ) {
        let accreditation = IssuerAccreditation {
            id: ISSUER.into(),
            permitted_service_categories: permitted,
        };
        assert_eq!(accredited(category, &accreditation), expected);
    }

    #[tokio::test]
    async fn all_checks_pass() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let evidence = evidence(&signer, vec![ServiceCategory::Issuer]).await;
        let config = Config::default();

        assert_json_snapshot!(check(&credential, &evidence, &policy(&config)), @r#"
        {
          "UNTAMPERED": "PASS",
          "TRUSTED_ISSUER": "PASS",
          "TRUSTED_HOLDER": "PASS",
          "UNREVOKED": "NOT_APPLICABLE",
          "UNEXPIRED": "PASS"
        }
        "#);
    }

    #[tokio::test]
    async fn primary_source_mismatch() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment("did:ion:other")).await;
        let evidence = evidence(&signer, vec![ServiceCategory::Issuer]).await;

        let config = Config::default();
        let result = check_trusted_issuer(&credential, &evidence.keys, &evidence.metadata, &config);
        assert_eq!(result, CheckResult::Fail);
    }

    #[tokio::test]
    async fn undefined_subject_type_passes() {
        let signer = Ed25519Signer::new(1);
        let subject = json!({"id": HOLDER, "type": "Unlisted", "legalEmployer": "did:ion:other"});
        let credential = ledger_credential(&signer, subject).await;
        let evidence = evidence(&signer, vec![ServiceCategory::Issuer]).await;

        let config = Config::default();
        let result = check_trusted_issuer(&credential, &evidence.keys, &evidence.metadata, &config);
        assert_eq!(result, CheckResult::Pass);
    }

    #[tokio::test]
    async fn metadata_unavailable() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let mut evidence = evidence(&signer, vec![ServiceCategory::Issuer]).await;
        evidence.metadata.status = Err(ResolutionError::Dependency("registry offline".into()));

        let config = Config::default();
        let result = check_trusted_issuer(&credential, &evidence.keys, &evidence.metadata, &config);
        assert_eq!(result, CheckResult::DependencyResolutionError);
    }

    #[tokio::test]
    async fn missing_bound_issuer_vc() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let mut evidence = evidence(&signer, vec![ServiceCategory::NotaryIssuer]).await;
        evidence.keys.bound_issuer_vcs.clear();

        let config = Config::default();
        let result = check_trusted_issuer(&credential, &evidence.keys, &evidence.metadata, &config);
        assert_eq!(result, CheckResult::Fail);
    }

    #[tokio::test]
    async fn bound_issuer_vc_faults() {
        let signer = Ed25519Signer::new(1);
        let document = issuer_document(&signer);
        let kid = format!("{ISSUER}#key-1");

        let valid = bound_issuer_vc(&signer, &kid, "did:web:acme.example.com").await;
        assert_eq!(verify_bound_issuer_vc(&valid, &document), Ok(()));

        assert_eq!(
            verify_bound_issuer_vc("not.a-token", &document),
            Err(CheckResult::DataIntegrityError)
        );

        let unknown_key = bound_issuer_vc(&signer, &format!("{ISSUER}#key-9"), ISSUER).await;
        assert_eq!(
            verify_bound_issuer_vc(&unknown_key, &document),
            Err(CheckResult::DataIntegrityError)
        );

        let wrong_signer = bound_issuer_vc(&Ed25519Signer::new(2), &kid, ISSUER).await;
        assert_eq!(verify_bound_issuer_vc(&wrong_signer, &document), Err(CheckResult::Fail));

        let impostor = bound_issuer_vc(&signer, &kid, "did:ion:impostor").await;
        assert_eq!(verify_bound_issuer_vc(&impostor, &document), Err(CheckResult::Fail));
    }

    #[tokio::test]
    async fn resolution_failures_take_precedence() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let mut keys = KeyResolution::default();
        keys.keys.insert(LEDGER_KID, signer.public_jwk());
        assert_eq!(check_untampered(&credential, &keys), CheckResult::Pass);

        keys.ledger = Err(ResolutionError::Dependency("ledger offline".into()));
        assert_eq!(check_untampered(&credential, &keys), CheckResult::DependencyResolutionError);

        keys.ledger = Err(ResolutionError::VouchersExhausted);
        assert_eq!(check_untampered(&credential, &keys), CheckResult::VoucherReserveExhausted);
    }

    #[tokio::test]
    async fn wrong_key() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let mut keys = KeyResolution::default();
        keys.keys.insert(LEDGER_KID, Ed25519Signer::new(2).public_jwk());

        assert_eq!(check_untampered(&credential, &keys), CheckResult::Fail);
        assert_eq!(
            check_untampered(&credential, &KeyResolution::default()),
            CheckResult::DataIntegrityError
        );
    }

    #[tokio::test]
    async fn holder_binding() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;
        let config = Config::default();

        assert_eq!(check_trusted_holder(&credential, Some(HOLDER), &config), CheckResult::Pass);
        assert_eq!(
            check_trusted_holder(&credential, Some("did:key:other"), &config),
            CheckResult::Fail
        );
        assert_eq!(check_trusted_holder(&credential, None, &config), CheckResult::Fail);

        let config = Config {
            holder_binding_version: 3,
            ..Config::default()
        };
        assert_eq!(check_trusted_holder(&credential, None, &config), CheckResult::NotApplicable);
    }

    #[test]
    fn revocation_outcomes() {
        assert_eq!(check_revocation(RevocationStatus::NotApplicable), CheckResult::NotApplicable);
        assert_eq!(check_revocation(RevocationStatus::Revoked), CheckResult::Fail);
        assert_eq!(check_revocation(RevocationStatus::Unrevoked), CheckResult::Pass);
        assert_eq!(check_revocation(RevocationStatus::Unknown), CheckResult::Fail);
    }

    #[tokio::test]
    async fn status_retrieval_failure() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;

        let mut revocation = RevocationResolution {
            statuses: vec![RevocationStatus::Unrevoked],
            status: Ok(()),
        };
        assert_eq!(check_credential_status(&credential, &revocation), CheckResult::Pass);

        revocation.status = Err(ResolutionError::Dependency("oracle offline".into()));
        assert_eq!(check_credential_status(&credential, &revocation), CheckResult::Fail);

        revocation.statuses = vec![RevocationStatus::NotApplicable];
        assert_eq!(check_credential_status(&credential, &revocation), CheckResult::NotApplicable);
    }

    #[tokio::test]
    async fn expiry() {
        let signer = Ed25519Signer::new(1);
        let credential = ledger_credential(&signer, employment(ISSUER)).await;

        let before = Utc.with_ymd_and_hms(2029, 12, 31, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(check_unexpired(&credential, before), CheckResult::Pass);
        assert_eq!(check_unexpired(&credential, after), CheckResult::Fail);
    }
}
