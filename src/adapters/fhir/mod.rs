//! FHIR store adapter
//!
//! The dispatcher submits one transaction bundle per invocation and reads a
//! same-shaped response bundle back. The [`traits::FhirStore`] trait is the
//! only surface the dispatcher sees; [`http::HttpFhirStore`] is the REST
//! implementation with auth and transport-level retry.

pub mod http;
pub mod traits;

pub use http::HttpFhirStore;
pub use traits::FhirStore;
