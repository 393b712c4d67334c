//! # W3C Verifiable Credentials Data Model
//!
//! An implementation of W3C [Verifiable Credentials Data Model v1.1], extended
//! with the ledger's `contentHash` and `vnfProtocolVersion` properties.
//!
//! See [implementation guidelines].
//!
//! [Verifiable Credentials Data Model v1.1]: (https://www.w3.org/TR/vc-data-model)
//! [implementation guidelines]: (https://model.github.io/vc-imp-guide)

use std::collections::HashMap;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vercre_core::{Kind, Quota};

/// Base credential type, shared by every credential.
pub const BASE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Base presentation type.
pub const BASE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// `VerifiableCredential` represents a naive implementation of the W3C Verifiable
/// Credential data model v1.1.
/// See <https://www.w3.org/TR/vc-data-model>.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifiableCredential {
    #[allow(rustdoc::bare_urls)]
    /// The @context property is used to map property URIs into short-form aliases.
    /// It is an ordered set where the first item is "`https://www.w3.org/2018/credentials/v1`".
    /// Subsequent items may be composed of any combination of URLs and/or objects,
    /// each processable as a [JSON-LD Context](https://www.w3.org/TR/json-ld11/#the-context).
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Quota<Kind<Value>>>,

    #[allow(rustdoc::bare_urls)]
    /// The credential's URI. For ledger-anchored credentials this is the
    /// credential's ledger DID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The type property is used to uniquely identify the type of the credential.
    /// That is, to indicate the set of claims the credential contains.
    #[serde(rename = "type")]
    pub type_: Quota<String>,

    /// A URI or object with an id property. It is RECOMMENDED that the
    /// URI/object id, dereferences to machine-readable information about
    /// the issuer that can be used to verify credential information.
    pub issuer: Kind<Issuer>,

    /// An XMLSCHEMA11-2 (RFC3339) date-time the credential becomes valid.
    /// e.g. 2010-01-01T19:23:24Z.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::date")]
    pub issuance_date: Option<DateTime<Utc>>,

    /// A set of objects containing claims about credential subjects(s).
    pub credential_subject: Quota<CredentialSubject>,

    /// An XMLSCHEMA11-2 (RFC3339) date-time the credential ceases to be valid.
    /// e.g. 2010-06-30T19:23:24Z
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::date")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// Used to determine the status of the credential, such as whether it is
    /// suspended or revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<Quota<CredentialStatus>>,

    /// Hash of the credential content as anchored on the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<ContentHash>,

    /// Version of the issuing protocol. Holder binding applies from version 2.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::version")]
    pub vnf_protocol_version: Option<u64>,

    /// Any other credential properties (`credentialSchema`, `refreshService`,
    /// etc.).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiableCredential {
    /// Returns a new [`VcBuilder`], which can be used to build a [`VerifiableCredential`]
    #[must_use]
    pub fn builder() -> VcBuilder {
        VcBuilder::new()
    }

    /// The issuer's identifier, whether expressed as a string or an object.
    #[must_use]
    pub fn issuer_id(&self) -> &str {
        match &self.issuer {
            Kind::String(id) => id,
            Kind::Object(issuer) => &issuer.id,
        }
    }

    /// The most specific credential type: the first type other than the base
    /// credential and presentation types.
    #[must_use]
    pub fn credential_type(&self) -> Option<&str> {
        self.type_
            .iter()
            .map(String::as_str)
            .find(|t| !t.is_empty() && *t != BASE_CREDENTIAL_TYPE && *t != BASE_PRESENTATION_TYPE)
    }

    /// The first credential subject.
    #[must_use]
    pub fn subject(&self) -> Option<&CredentialSubject> {
        self.credential_subject.first()
    }
}

/// Issuer identifies the issuer of the credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Issuer {
    /// The issuer URI. If dereferenced, it should result in a machine-readable
    /// document that can be used to verify the credential.
    pub id: String,

    /// Issuer-specific fields that may be used to express additional
    /// information about the issuer.
    #[serde(flatten)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, Value>>,
}

/// `CredentialSubject` holds claims about the subject(s) referenced by the credential.
/// Or, more correctly: a set of objects containing one or more properties related to
/// a subject of the credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialSubject {
    /// A URI that uniquely identifies the subject of the claims. if set, it
    /// MUST be the identifier used by others to identify the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Claims about the subject, including any subject-level `@context` and
    /// `type`.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl CredentialSubject {
    /// The subject's own `@context`, if any.
    #[must_use]
    pub fn context(&self) -> Option<&Value> {
        self.claims.get("@context")
    }

    /// The subject's declared types. A single string is treated as one type.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        match self.claims.get("type") {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
            _ => vec![],
        }
    }
}

/// `CredentialStatus` can be used for the discovery of information about the
/// current status of a credential, such as whether it is suspended or revoked.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CredentialStatus {
    /// A URI where credential status information can be retrieved.
    pub id: String,

    /// Refers to the status method used to provide the (machine readable)
    /// status of the credential.
    #[serde(rename = "type")]
    pub type_: String,

    /// Method-specific status properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Digest of the credential content.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContentHash {
    /// Digest algorithm, e.g. `VCSHA256Hash`.
    #[serde(rename = "type")]
    pub type_: String,

    /// Hex-encoded digest.
    pub value: String,
}

/// [`VcBuilder`] is used to build a [`VerifiableCredential`]
#[derive(Clone, Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct VcBuilder {
    vc: VerifiableCredential,
}

impl VcBuilder {
    /// Returns a new [`VcBuilder`]
    #[must_use]
    pub fn new() -> Self {
        tracing::debug!("VcBuilder::new");

        Self {
            vc: VerifiableCredential {
                context: Some(Quota::Many(vec![Kind::String(
                    "https://www.w3.org/2018/credentials/v1".into(),
                )])),
                type_: Quota::Many(vec![BASE_CREDENTIAL_TYPE.into()]),
                issuance_date: Some(Utc::now()),
                credential_subject: Quota::Many(vec![]),
                ..VerifiableCredential::default()
            },
        }
    }

    /// Adds an `@context` entry
    #[must_use]
    pub fn add_context(mut self, context: Kind<Value>) -> Self {
        self.vc.context = Some(push(self.vc.context.take(), context));
        self
    }

    /// Sets the `id` property
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.vc.id = Some(id.into());
        self
    }

    /// Adds a `type` entry
    #[must_use]
    pub fn add_type(mut self, type_: impl Into<String>) -> Self {
        self.vc.type_ = push(Some(self.vc.type_), type_.into());
        self
    }

    /// Sets the `issuer` property
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.vc.issuer = Kind::String(issuer.into());
        self
    }

    /// Adds a `credential_subject`.
    #[must_use]
    pub fn add_subject(mut self, subj: CredentialSubject) -> Self {
        self.vc.credential_subject = push(Some(self.vc.credential_subject), subj);
        self
    }

    /// Sets the `issuance_date` property
    #[must_use]
    pub const fn issuance_date(mut self, date: DateTime<Utc>) -> Self {
        self.vc.issuance_date = Some(date);
        self
    }

    /// Sets the `expiration_date` property
    #[must_use]
    pub const fn expiration_date(mut self, date: DateTime<Utc>) -> Self {
        self.vc.expiration_date = Some(date);
        self
    }

    /// Adds a `credential_status` entry
    #[must_use]
    pub fn add_status(mut self, status: CredentialStatus) -> Self {
        self.vc.credential_status = Some(push(self.vc.credential_status.take(), status));
        self
    }

    /// Sets the `content_hash` property
    #[must_use]
    pub fn content_hash(mut self, value: impl Into<String>) -> Self {
        self.vc.content_hash = Some(ContentHash {
            type_: "VCSHA256Hash".into(),
            value: value.into(),
        });
        self
    }

    /// Sets the `vnf_protocol_version` property
    #[must_use]
    pub const fn protocol_version(mut self, version: u64) -> Self {
        self.vc.vnf_protocol_version = Some(version);
        self
    }

    /// Turns this builder into a [`VerifiableCredential`]
    ///
    /// # Errors
    ///
    /// Fails if any of the VC's mandatory fields are not set.
    pub fn build(self) -> anyhow::Result<VerifiableCredential> {
        tracing::debug!("VcBuilder::build");

        if self.vc.credential_type().is_none() {
            bail!("no type set");
        }
        if self.vc.issuer_id().is_empty() {
            bail!("no issuer.id set");
        }
        if self.vc.credential_subject.is_empty() {
            bail!("no credential_subject set");
        }

        Ok(self.vc)
    }
}

impl TryFrom<VcBuilder> for VerifiableCredential {
    type Error = anyhow::Error;

    fn try_from(builder: VcBuilder) -> anyhow::Result<Self, Self::Error> {
        tracing::debug!("VerifiableCredential::try_from");
        builder.build()
    }
}

/// Issuers write dates and versions in more shapes than the data model allows.
/// Readable values are normalized and anything else is dropped, so one
/// credential's quirk never makes its token undecodable.
pub(crate) mod lenient {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(parse_date))
    }

    pub fn version<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().and_then(parse_version))
    }

    /// Accepts RFC 3339 date-times, calendar dates (midnight UTC) and epoch
    /// seconds.
    pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
        let parsed = match value {
            Value::Null => return None,
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
                    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
                }),
            Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
            _ => None,
        };
        if parsed.is_none() {
            tracing::warn!(%value, "ignoring unreadable date");
        }
        parsed
    }

    /// Accepts unsigned integers and their decimal string form.
    pub fn parse_version(value: &Value) -> Option<u64> {
        let parsed = match value {
            Value::Null => return None,
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if parsed.is_none() {
            tracing::warn!(%value, "ignoring unreadable protocol version");
        }
        parsed
    }
}

fn push<T>(quota: Option<Quota<T>>, item: T) -> Quota<T> {
    match quota {
        None => Quota::One(item),
        Some(Quota::One(one)) => Quota::Many(vec![one, item]),
        Some(Quota::Many(mut set)) => {
            set.push(item);
            Quota::Many(set)
        }
    }
}
