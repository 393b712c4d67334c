//! # Errors
//!
//! [`Error`] is returned to callers of [`crate::verify`]. It is reserved for
//! tokens that cannot be parsed at all: everything else becomes a check result.
//!
//! [`ResolutionError`] records why a resolver could not produce data. Resolvers
//! never fail outright; they hand their errors to the check engine.

use vercre_w3c_vc::DecodeError;

/// Verification errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A credential token is structurally malformed.
    #[error("credential {index} is malformed: {source}")]
    Malformed {
        /// Position of the token in the batch.
        index: usize,

        /// Decoding error.
        #[source]
        source: DecodeError,
    },
}

/// Why a resolver could not produce the data a check depends on.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    /// The ledger refused the lookup because the voucher reserve is depleted.
    #[error("voucher reserve exhausted")]
    VouchersExhausted,

    /// A dependency failed or returned unusable data.
    #[error("dependency resolution failed: {0}")]
    Dependency(String),
}

impl ResolutionError {
    pub(crate) fn dependency(err: impl std::fmt::Display) -> Self {
        Self::Dependency(err.to_string())
    }
}
