//! API types for the bucket order HTTP API.
//!
//! This module defines the request and response bodies of the menu, bucket,
//! confirm, and cancel endpoints along with the structured error type that
//! maps failures onto HTTP status codes.

use crate::{MenuCatalog, OrderSelector, UserInfo};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Response body of `GET /menu`.
#[derive(Debug, Clone, Serialize)]
pub struct MenuResponse {
	pub menu: MenuCatalog,
}

/// Deserializes a field, mapping an explicit `null` to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request body of `POST /bucket`.
///
/// Missing or null fields default to empty and are rejected by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketRequest {
	/// Customer details.
	#[serde(default, deserialize_with = "null_as_default")]
	pub user_info: UserInfo,
	/// Selected item names.
	#[serde(default, deserialize_with = "null_as_default")]
	pub items: Vec<String>,
}

/// Request body of `POST /confirm` and `POST /cancel`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderActionRequest {
	/// Customer details used to locate the pending order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub user_info: UserInfo,
	/// Identifier returned by `POST /bucket`. Takes precedence over `user_info`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,
}

impl OrderActionRequest {
	/// Converts the request into the selector used to find the order.
	pub fn into_selector(self) -> OrderSelector {
		match self.order_id {
			Some(id) => OrderSelector::ById(id),
			None => OrderSelector::ByUserInfo(self.user_info),
		}
	}
}

/// Successful response carrying a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
	/// Summary or acknowledgment text.
	pub response: String,
	/// Identifier of the order created by `POST /bucket`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,
}

impl OrderResponse {
	pub fn message(response: impl Into<String>) -> Self {
		Self {
			response: response.into(),
			order_id: None,
		}
	}
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable description.
	pub error: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Missing or invalid request input (400)
	BadRequest { message: String },
	/// No matching order (404)
	NotFound { message: String },
	/// Storage or other server-side failure (500)
	InternalServerError { message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let message = match self {
			APIError::BadRequest { message }
			| APIError::NotFound { message }
			| APIError::InternalServerError { message } => message,
		};
		ErrorResponse {
			error: message.clone(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}
