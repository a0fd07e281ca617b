//! Object storage adapters
//!
//! The dispatcher needs two primitives from object storage: fetch an
//! object's content as text and move an object within its bucket. Two
//! backends implement them: [`http::HttpObjectStore`] for stores exposing a
//! REST surface and [`local::LocalObjectStore`] for development and tests.

pub mod factory;
pub mod http;
pub mod local;
pub mod traits;

pub use factory::create_object_store;
pub use http::HttpObjectStore;
pub use local::LocalObjectStore;
pub use traits::ObjectStore;
