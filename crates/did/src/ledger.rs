//! # Ledger DIDs
//!
//! Credentials anchored on the ledger are signed with keys published under the
//! ledger's own DID method. Each such DID carries a method-specific
//! sub-identifier that names the credential's on-ledger entry, e.g.
//! `did:velocity:v2:0x7d5f...:2233:17`.
//!
//! Several ledger DIDs can be resolved in one call by folding their
//! sub-identifiers into a single multi-subject DID:
//! `did:velocity:v2:multi:<sub-id>;<sub-id>`.

/// The ledger's DID method prefix.
pub const LEDGER_DID_PREFIX: &str = "did:velocity:v2:";

/// Prefix of a multi-subject ledger DID.
pub const MULTI_DID_PREFIX: &str = "did:velocity:v2:multi:";

const SUB_ID_SEPARATOR: char = ';';

/// A parsed ledger DID URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerDid {
    /// The method-specific sub-identifier (everything after the prefix and
    /// before any fragment).
    pub sub_id: String,

    /// DID URL fragment naming a key, without the leading `#`.
    pub fragment: Option<String>,
}

impl LedgerDid {
    /// Parse a ledger DID or DID URL. Returns `None` for any other DID method,
    /// for multi-subject DIDs, and for an empty sub-identifier.
    #[must_use]
    pub fn parse(did_url: &str) -> Option<Self> {
        let lower = did_url.to_ascii_lowercase();
        if !lower.starts_with(LEDGER_DID_PREFIX) || lower.starts_with(MULTI_DID_PREFIX) {
            return None;
        }

        let rest = &did_url[LEDGER_DID_PREFIX.len()..];
        let (sub_id, fragment) = match rest.split_once('#') {
            Some((sub_id, fragment)) => (sub_id, Some(fragment.to_string())),
            None => (rest, None),
        };
        if sub_id.is_empty() {
            return None;
        }

        Some(Self {
            sub_id: sub_id.to_string(),
            fragment,
        })
    }

    /// The DID without any fragment.
    #[must_use]
    pub fn did(&self) -> String {
        format!("{LEDGER_DID_PREFIX}{}", self.sub_id)
    }
}

/// Build the multi-subject DID used to resolve several ledger DIDs together.
/// Sub-identifiers are kept in the order given.
pub fn multi_did<'a>(sub_ids: impl IntoIterator<Item = &'a str>) -> String {
    let joined = sub_ids.into_iter().collect::<Vec<_>>().join(&SUB_ID_SEPARATOR.to_string());
    format!("{MULTI_DID_PREFIX}{joined}")
}

/// Split a multi-subject DID back into its sub-identifiers.
#[must_use]
pub fn sub_ids(multi_did: &str) -> Vec<&str> {
    multi_did
        .strip_prefix(MULTI_DID_PREFIX)
        .map(|ids| ids.split(SUB_ID_SEPARATOR).filter(|id| !id.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_did_url() {
        let did = LedgerDid::parse("did:velocity:v2:0xabc:12:3#key-1").expect("should parse");
        assert_eq!(did.sub_id, "0xabc:12:3");
        assert_eq!(did.fragment.as_deref(), Some("key-1"));
        assert_eq!(did.did(), "did:velocity:v2:0xabc:12:3");

        assert!(LedgerDid::parse("did:velocity:v2:").is_none());
        assert!(LedgerDid::parse("did:velocity:v2:multi:0xabc:1:2").is_none());
        assert!(LedgerDid::parse("did:web:example.com").is_none());
    }

    #[test]
    fn multi() {
        let did = multi_did(["0xabc:1:2", "0xdef:3:4"]);
        assert_eq!(did, "did:velocity:v2:multi:0xabc:1:2;0xdef:3:4");
        assert_eq!(sub_ids(&did), vec!["0xabc:1:2", "0xdef:3:4"]);
        assert!(sub_ids("did:web:example.com").is_empty());
    }
}
