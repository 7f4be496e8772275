//! Core domain for the remote todo client
//!
//! This crate contains the pure, synchronous parts of the client:
//! - Task model and wire schema
//! - Status cycling rules
//! - Query descriptors for the paginated, filterable list endpoint
//! - The in-memory task collection store

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
