//! DID resolution errors, identified by the error codes of
//! [DID Resolution](https://w3c-ccg.github.io/did-resolution/#errors).

/// A failure to resolve a DID or read a key from its document.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The DID method is not one this library resolves.
    #[error("methodNotSupported")]
    MethodNotSupported(String),

    /// The DID does not conform to its method's syntax.
    #[error("invalidDid")]
    InvalidDid(String),

    /// No DID document, or no verification method, exists for the identifier.
    #[error("notFound")]
    NotFound(String),

    /// A verification method's key material cannot be decoded.
    #[error("invalidPublicKey")]
    InvalidPublicKey(String),

    /// A verification method uses a key format this library does not read.
    #[error("unsupportedPublicKeyType")]
    UnsupportedPublicKeyType(String),

    /// The resolver binding failed (transport or parsing).
    #[error("internalError")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The DID Resolution error code.
    #[must_use]
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// What went wrong, in more detail than the code.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MethodNotSupported(msg)
            | Self::InvalidDid(msg)
            | Self::NotFound(msg)
            | Self::InvalidPublicKey(msg)
            | Self::UnsupportedPublicKeyType(msg) => msg.clone(),
            Self::Other(err) => format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn codes() {
        let err = Error::MethodNotSupported("ion is not supported".into());
        assert_eq!(err.code(), "methodNotSupported");
        assert_eq!(err.message(), "ion is not supported");

        let err = Error::from(anyhow!("connection refused").context("fetching did.json"));
        assert_eq!(err.code(), "internalError");
        assert_eq!(err.message(), "fetching did.json: connection refused");
    }
}
