//! Object storage abstraction
//!
//! The dispatcher treats download and move as primitive capabilities; the
//! transport behind them is an adapter concern.

use crate::domain::Result;
use async_trait::async_trait;

/// Object store client trait
///
/// Implementations fetch object content as UTF-8 text and move objects
/// within a bucket (used for archiving processed files).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full content of an object as text
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist, cannot be read, or
    /// is not valid UTF-8.
    async fn fetch_text(&self, bucket: &str, name: &str) -> Result<String>;

    /// Move an object to a new path within the same bucket
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be copied or the source
    /// cannot be removed.
    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<()>;
}
