//! Source-format parsers
//!
//! Two parsers produce the shared intermediate record model:
//! [`tabular`] for delimited tabular extracts (fail-fast) and [`segment`]
//! for pipe-delimited segmented messages (skip-and-continue). The
//! divergence in fault tolerance is deliberate and must be preserved:
//! segmented feeds carry far more real-world noise than batch extracts.

pub mod segment;
pub mod tabular;

pub use segment::{SegmentedOutput, SkippedSegment};
pub use tabular::TabularParser;
