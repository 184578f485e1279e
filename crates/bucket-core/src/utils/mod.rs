//! Utility functions for the order lifecycle.
//!
//! Contains the customer-facing message formatting.

pub mod formatting;

pub use formatting::{
	cancellation_summary, confirmation_summary, format_amount, submission_summary,
};
