//! Task module
//!
//! This module contains task-related types and logic.

mod collection;
mod model;
mod query;

pub use collection::TaskCollection;
pub use model::*;
pub use query::{QueryDescriptor, StatusFilter, DEFAULT_PAGE_SIZE};
