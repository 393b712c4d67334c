//! # JSON Object Signing and Encryption (JOSE)
//!
//! Only the signing half of JOSE is needed to verify credentials: algorithms
//! ([RFC7518]), keys ([RFC7517]) and compact JWS ([RFC7515]).
//!
//! [RFC7515]: https://www.rfc-editor.org/rfc/rfc7515
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517
//! [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518

pub mod jwa;
pub mod jwk;
pub mod jws;
