//! Resource mapping and bundle assembly
//!
//! Converts intermediate records into FHIR resources and assembles them
//! into one atomic transaction bundle with conditional-create idempotency
//! directives.

pub mod bundle;
pub mod mapper;
pub mod resources;

pub use bundle::build_bundle;
pub use mapper::{map_observation, map_patient};
pub use resources::Bundle;
