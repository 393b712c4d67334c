//! # Verifiable Credentials Data Model
//!
//! The Verifiable Credentials [Data Model v1.1] specification defines core VC concepts
//! that all other specifications depend on. The model is defined in abstract terms,
//! and applications express their specific credentials using a serialization of the
//! data model. Credentials here use the JSON serialization carried in a JWT.
//!
//! [Data Model v1.1]: https://www.w3.org/TR/vc-data-model

pub mod vc;

pub use vc::*;
