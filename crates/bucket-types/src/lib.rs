//! Common types module for the bucket order service.
//!
//! This module defines the core data types shared by every crate in the
//! workspace: the menu catalog, persisted order records, and the request and
//! response shapes of the HTTP API.

/// Persisted monetary amounts.
pub mod amount;
/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Menu catalog types.
pub mod menu;
/// Order record types, statuses, and selectors.
pub mod order;
/// Small helpers shared across crates.
pub mod utils;

// Re-export all types for convenient access
pub use amount::Amount;
pub use api::*;
pub use menu::*;
pub use order::*;
pub use utils::{current_timestamp, truncate_id};
