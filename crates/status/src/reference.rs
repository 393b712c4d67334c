//! # Revocation List References
//!
//! A ledger revocation entry's `id` is a URI naming the list contract call,
//! for example:
//!
//! ```text
//! ethereum:0x25AEFc3c.../getRevokedStatus?address=0x0b0F...&listId=1623&index=47
//! ```
//!
//! `address` is the account that owns the list, `listId` the list and `index`
//! the credential's position in it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors parsing a revocation-list reference.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A required query parameter is absent.
    #[error("missing {0} in status reference")]
    MissingParameter(&'static str),

    /// A numeric query parameter is not a number.
    #[error("invalid {0} in status reference")]
    InvalidParameter(&'static str),
}

/// A parsed ledger revocation-list reference.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusReference {
    /// Account owning the revocation list.
    pub address: String,

    /// Revocation list id.
    pub list_id: u64,

    /// Position of the credential in the list.
    pub index: u64,
}

impl FromStr for StatusReference {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let query = id.split_once('?').map(|(_, q)| q).unwrap_or_default();
        let param = |name: &'static str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value)
                .ok_or(Error::MissingParameter(name))
        };
        let number = |name: &'static str| {
            param(name)?.parse::<u64>().map_err(|_| Error::InvalidParameter(name))
        };

        Ok(Self {
            address: param("address")?.to_string(),
            list_id: number("listId")?,
            index: number("index")?,
        })
    }
}
