//! FHIR store abstraction

use crate::core::map::Bundle;
use crate::domain::Result;
use async_trait::async_trait;

/// FHIR store client trait
///
/// Implementations POST a transaction bundle as a single atomic unit and
/// return the store's response bundle, which carries one reply entry per
/// request entry.
#[async_trait]
pub trait FhirStore: Send + Sync {
    /// Submit a transaction bundle
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached, authentication
    /// fails, the store rejects the whole transaction, or the response is
    /// not a bundle. Per-entry failures inside an accepted transaction are
    /// not errors; they surface as non-2xx entry statuses in the returned
    /// bundle.
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<Bundle>;
}
