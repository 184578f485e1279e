//! Bucket order API implementation.
//!
//! This module implements the order endpoints: submitting a bucket,
//! confirming or cancelling a pending order, and looking an order up by the
//! identifier returned at submission.

use bucket_core::{LifecycleError, OrderLifecycle};
use bucket_types::{APIError, BucketRequest, OrderActionRequest, OrderRecord, OrderResponse};
use tracing::{error, warn};

/// Handles POST /bucket requests.
///
/// Prices the selected items, records a pending order, and returns the
/// order summary together with the new order's identifier.
pub async fn submit_bucket(
	request: BucketRequest,
	lifecycle: &OrderLifecycle,
) -> Result<OrderResponse, APIError> {
	let submitted = lifecycle
		.submit_order(request.user_info, request.items)
		.await
		.map_err(to_api_error)?;

	Ok(OrderResponse {
		response: submitted.summary,
		order_id: submitted.order.id,
	})
}

/// Handles POST /confirm requests.
pub async fn confirm_order(
	request: OrderActionRequest,
	lifecycle: &OrderLifecycle,
) -> Result<OrderResponse, APIError> {
	let selector = request.into_selector();
	let message = lifecycle
		.confirm_order(&selector)
		.await
		.map_err(to_api_error)?;

	Ok(OrderResponse::message(message))
}

/// Handles POST /cancel requests.
pub async fn cancel_order(
	request: OrderActionRequest,
	lifecycle: &OrderLifecycle,
) -> Result<OrderResponse, APIError> {
	let selector = request.into_selector();
	let message = lifecycle
		.cancel_order(&selector)
		.await
		.map_err(to_api_error)?;

	Ok(OrderResponse::message(message))
}

/// Handles GET /orders/{id} requests.
pub async fn get_order_by_id(
	id: &str,
	lifecycle: &OrderLifecycle,
) -> Result<OrderRecord, APIError> {
	lifecycle.get_order(id).await.map_err(to_api_error)
}

/// Maps lifecycle failures onto HTTP errors.
fn to_api_error(err: LifecycleError) -> APIError {
	match err {
		LifecycleError::Validation(message) => {
			warn!("Rejected order request: {}", message);
			APIError::BadRequest { message }
		},
		LifecycleError::NotFound(message) => APIError::NotFound { message },
		LifecycleError::InvalidTransition { .. } => {
			warn!("{}", err);
			APIError::BadRequest {
				message: err.to_string(),
			}
		},
		LifecycleError::Storage(e) => {
			error!("Order store failure: {}", e);
			APIError::InternalServerError {
				message: format!("Order store unavailable: {}", e),
			}
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bucket_storage::StorageError;

	#[test]
	fn test_error_status_mapping() {
		let cases = [
			(LifecycleError::Validation("Items and user info are required.".into()), 400),
			(LifecycleError::NotFound("No pending order found.".into()), 404),
			(
				LifecycleError::Storage(StorageError::Corrupt("orders.json".into())),
				500,
			),
		];

		for (err, status) in cases {
			assert_eq!(to_api_error(err).status_code(), status);
		}
	}
}
