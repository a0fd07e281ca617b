//! Harmonization dispatcher
//!
//! Decodes the inbound event, routes by source format, invokes the parsers
//! and the bundle builder, submits the result, and aggregates the reply.
//! States per invocation:
//! `Received → Classified → {Skipped | Parsed → Mapped → Submitted → Reported} | Failed`.

pub mod dispatcher;
pub mod event;
pub mod report;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use event::StorageEvent;
pub use report::IngestReport;
