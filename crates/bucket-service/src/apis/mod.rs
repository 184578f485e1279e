//! HTTP API endpoint implementations.

pub mod menu;
pub mod order;
