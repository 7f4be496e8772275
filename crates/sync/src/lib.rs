//! Client-side task synchronization engine
//!
//! This crate keeps an in-memory task collection consistent with a
//! paginated, filterable remote collection endpoint:
//! - `TaskApi` / `HttpTaskApi`: the remote API seam and its reqwest
//!   implementation
//! - `SyncEngine`: primary fetch with fixed-delay retry, stale-response
//!   discarding, and guarded per-task mutations
//! - `SentinelObserver`: exactly-once-per-arming infinite scrolling
//!   driven by a visibility signal

mod api;
mod config;
mod engine;
mod error;
mod guard;
mod notify;
mod observer;
mod wire;

pub use api::{HttpTaskApi, TaskApi};
pub use config::{SyncConfig, API_URL_ENV};
pub use engine::SyncEngine;
pub use error::{Result, SyncError, DEFAULT_ERROR_MESSAGE};
pub use guard::{ActionGuard, ActionPermit};
pub use notify::{ChannelNotifier, Notify, TracingNotifier};
pub use observer::SentinelObserver;
pub use wire::{ApiErrorBody, ApiErrorResponse, DataEnvelope};
