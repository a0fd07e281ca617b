//! External system integrations for Concord.
//!
//! This module provides adapters for the two external collaborators of the
//! harmonization pipeline:
//!
//! - [`storage`] - Object storage (file fetch and archive-move)
//! - [`fhir`] - FHIR store (atomic transaction bundle submission)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. Both layers are trait-based:
//! the dispatcher only sees [`storage::ObjectStore`] and [`fhir::FhirStore`],
//! never the transport behind them.

pub mod fhir;
pub mod storage;
