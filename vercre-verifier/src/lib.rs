//! # Credential Trust Verification
//!
//! Determines, for each credential in a batch of signed credential tokens,
//! whether it is untampered, issued by a party trusted for its type, bound to
//! the expected holder, unrevoked and unexpired.
//!
//! Verification runs in three stages:
//!
//! ```text
//!                 +----------------+
//!   tokens -----> |    decode      |
//!                 +----------------+
//!                         |
//!         +---------------+----------------+
//!         |               |                |
//!   +-----------+   +-----------+   +------------+
//!   |   keys    |   | metadata  |   | revocation |   (concurrent)
//!   +-----------+   +-----------+   +------------+
//!         |               |                |
//!         +---------------+----------------+
//!                         |
//!                 +----------------+
//!                 |     check      | -----> one report per token, in order
//!                 +----------------+
//! ```
//!
//! Resolution never fails the batch. A lookup that fails is recorded and turns
//! into a result on the checks that depend on it; only a token that cannot be
//! decoded at all is returned as an error.
//!
//! # Provider
//!
//! Everything outside the library (the ledger, registries, the revocation
//! oracle, HTTP) is reached through the [`provider::Provider`] traits.
//!
//! # Example
//!
//! ```rust,ignore
//! let request = VerifyRequest {
//!     credentials: vec![token],
//!     expected_holder_did: Some("did:ion:holder".into()),
//!     signing_material: SigningMaterial::Custody { key_id: "rp-key".into() },
//!     config: Config::default(),
//! };
//!
//! for verified in verify(provider, request).await? {
//!     println!("{}: {:?}", verified.credential.id, verified.credential_checks);
//! }
//! ```

pub mod check;
mod config;
mod error;
mod jsonld;
mod keys;
mod metadata;
pub mod provider;
mod revocation;
mod verify;

pub use check::{CheckResult, CredentialCheckReport};
pub use config::{Config, PRIMARY_ORGANIZATION_IRI, PRIMARY_SOURCE_PROFILE_IRI};
pub use error::{Error, ResolutionError};
pub use jsonld::JsonLdContext;
pub use keys::{KeyReference, KeyResolution, KeyStrategy, SigningMaterial};
pub use metadata::MetadataResolution;
pub use revocation::{RevocationResolution, RevocationStatus};
pub use vercre_w3c_vc::{DecodedCredential, KeyMetadata};
pub use verify::{verify, verify_at, VerifiedCredential, VerifyRequest};
