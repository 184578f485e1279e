//! Core order lifecycle for the bucket order service.
//!
//! This module prices submitted orders against the menu catalog, records
//! them as pending, and moves pending orders to confirmed or cancelled.
//! Every mutation is a full load-mutate-save cycle through the storage
//! service.

use bucket_storage::{StorageError, StorageService};
use bucket_types::{
	current_timestamp, truncate_id, MenuCatalog, OrderRecord, OrderSelector, OrderStatus,
	UserInfo,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod pricing;
pub mod state;
pub mod utils;

pub use pricing::{price_items, resolve_price, Pricing, GST_RATE};
use state::{OrderStateError, OrderStateMachine};

/// Message returned when a submission lacks items or customer details.
pub const MISSING_INPUT_MESSAGE: &str = "Items and user info are required.";

/// Message returned when no pending order matches a confirm or cancel request.
pub const NO_PENDING_ORDER_MESSAGE: &str = "No pending order found for the provided details.";

/// Errors that can occur during order lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
	/// Required input was missing or empty.
	#[error("{0}")]
	Validation(String),
	/// No order matched the request.
	#[error("{0}")]
	NotFound(String),
	/// The requested status change is not allowed.
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	/// The order store could not be read or written.
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl From<OrderStateError> for LifecycleError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::Storage(e) => LifecycleError::Storage(e),
			OrderStateError::InvalidTransition { from, to } => {
				LifecycleError::InvalidTransition { from, to }
			},
			OrderStateError::NoPendingOrder(_) => {
				LifecycleError::NotFound(NO_PENDING_ORDER_MESSAGE.to_string())
			},
			OrderStateError::OrderNotFound(id) => {
				LifecycleError::NotFound(format!("Order not found: {}", id))
			},
		}
	}
}

/// A newly submitted order along with its customer-facing summary.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
	pub order: OrderRecord,
	pub summary: String,
}

/// Order lifecycle service.
///
/// Holds the immutable menu catalog and the order state machine. Cheap to
/// share behind an `Arc`.
pub struct OrderLifecycle {
	/// Menu used for price resolution.
	menu: Arc<MenuCatalog>,
	/// State machine over the order store.
	state: OrderStateMachine,
}

impl OrderLifecycle {
	/// Creates a lifecycle over `storage` pricing against `menu`.
	pub fn new(menu: Arc<MenuCatalog>, storage: Arc<StorageService>) -> Self {
		Self {
			menu,
			state: OrderStateMachine::new(storage),
		}
	}

	/// The menu catalog.
	pub fn menu(&self) -> &MenuCatalog {
		&self.menu
	}

	/// Prices and records a new pending order.
	///
	/// Fails with [`LifecycleError::Validation`] if `items` or `user_info` is
	/// empty. Items not on the menu are priced at zero.
	pub async fn submit_order(
		&self,
		user_info: UserInfo,
		items: Vec<String>,
	) -> Result<SubmittedOrder, LifecycleError> {
		if items.is_empty() || user_info.is_empty() {
			return Err(LifecycleError::Validation(MISSING_INPUT_MESSAGE.to_string()));
		}

		let pricing = price_items(&self.menu, &items);
		let now = current_timestamp();
		let order = OrderRecord {
			user_info,
			items,
			item_prices: pricing.item_prices,
			total_amount: pricing.total_amount.into(),
			gst: pricing.gst.into(),
			final_total: pricing.final_total.into(),
			status: OrderStatus::Pending,
			id: Some(Uuid::new_v4().to_string()),
			created_at: Some(now),
			updated_at: Some(now),
		};

		self.state.store_order(&order).await?;

		tracing::info!(
			order_id = %truncate_id(order.id.as_deref().unwrap_or_default()),
			items = order.items.len(),
			final_total = %order.final_total,
			"Order submitted"
		);

		let summary = utils::submission_summary(&order);
		Ok(SubmittedOrder { order, summary })
	}

	/// Confirms the first pending order matched by `selector`.
	///
	/// Returns the confirmation message. Fails with
	/// [`LifecycleError::NotFound`] if no pending order matches.
	pub async fn confirm_order(&self, selector: &OrderSelector) -> Result<String, LifecycleError> {
		let order = self.transition(selector, OrderStatus::Confirmed).await?;
		Ok(utils::confirmation_summary(&order))
	}

	/// Cancels the first pending order matched by `selector`.
	///
	/// Same matching rules as [`OrderLifecycle::confirm_order`].
	pub async fn cancel_order(&self, selector: &OrderSelector) -> Result<String, LifecycleError> {
		self.transition(selector, OrderStatus::Cancelled).await?;
		Ok(utils::cancellation_summary())
	}

	/// Looks up an order by its identifier, in any status.
	pub async fn get_order(&self, order_id: &str) -> Result<OrderRecord, LifecycleError> {
		Ok(self.state.get_order(order_id).await?)
	}

	async fn transition(
		&self,
		selector: &OrderSelector,
		new_status: OrderStatus,
	) -> Result<OrderRecord, LifecycleError> {
		match self.state.transition_first_pending(selector, new_status).await {
			Ok(order) => {
				tracing::info!(
					order_id = %truncate_id(order.id.as_deref().unwrap_or("legacy")),
					status = %new_status,
					"Order transitioned"
				);
				Ok(order)
			},
			Err(OrderStateError::NoPendingOrder(selector)) => {
				tracing::warn!(%new_status, "No pending order matches {}", selector);
				Err(LifecycleError::NotFound(NO_PENDING_ORDER_MESSAGE.to_string()))
			},
			Err(e) => Err(e.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bucket_storage::implementations::file::FileStorage;
	use bucket_storage::implementations::memory::MemoryStorage;
	use rust_decimal::Decimal;
	use serde_json::json;
	use tempfile::TempDir;

	fn user(name: &str) -> UserInfo {
		json!({ "name": name, "address": "12 Hill Rd", "mobile": "5550100" })
			.as_object()
			.cloned()
			.unwrap()
	}

	fn items(names: &[&str]) -> Vec<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	fn lifecycle() -> (OrderLifecycle, Arc<StorageService>) {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let lifecycle = OrderLifecycle::new(
			Arc::new(MenuCatalog::standard()),
			Arc::clone(&storage),
		);
		(lifecycle, storage)
	}

	#[tokio::test]
	async fn test_submit_order_prices_and_persists() {
		let (lifecycle, storage) = lifecycle();

		let submitted = lifecycle
			.submit_order(user("Asha"), items(&["Fries", "Original Recipe Chicken"]))
			.await
			.unwrap();

		let order = &submitted.order;
		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.total_amount, Decimal::new(350, 2));
		assert_eq!(order.gst, Decimal::new(63, 2));
		assert_eq!(order.final_total, Decimal::new(413, 2));
		assert!(order.id.is_some());
		assert!(submitted.summary.contains("Subtotal: $3.50"));
		assert!(submitted.summary.contains("GST (18%): $0.63"));
		assert!(submitted.summary.contains("Total: $4.13."));

		let stored = storage.load().await.unwrap();
		assert_eq!(stored, vec![order.clone()]);
	}

	#[tokio::test]
	async fn test_submit_requires_items_and_user_info() {
		let (lifecycle, storage) = lifecycle();

		let result = lifecycle.submit_order(user("Asha"), Vec::new()).await;
		assert!(matches!(
			result,
			Err(LifecycleError::Validation(ref msg)) if msg == MISSING_INPUT_MESSAGE
		));

		let result = lifecycle
			.submit_order(UserInfo::new(), items(&["Fries"]))
			.await;
		assert!(matches!(result, Err(LifecycleError::Validation(_))));

		assert!(storage.load().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_confirm_order() {
		let (lifecycle, storage) = lifecycle();
		lifecycle
			.submit_order(user("Asha"), items(&["Fries", "Original Recipe Chicken"]))
			.await
			.unwrap();

		let message = lifecycle
			.confirm_order(&OrderSelector::ByUserInfo(user("Asha")))
			.await
			.unwrap();
		assert_eq!(
			message,
			"Thank you for your order! You've ordered: Fries, Original Recipe Chicken.\n\
			 Your total amount is: $4.13."
		);

		let stored = storage.load().await.unwrap();
		assert_eq!(stored[0].status, OrderStatus::Confirmed);
	}

	#[tokio::test]
	async fn test_confirm_twice_is_not_found() {
		let (lifecycle, _) = lifecycle();
		lifecycle
			.submit_order(user("Asha"), items(&["Fries"]))
			.await
			.unwrap();

		let selector = OrderSelector::ByUserInfo(user("Asha"));
		lifecycle.confirm_order(&selector).await.unwrap();

		let result = lifecycle.confirm_order(&selector).await;
		assert!(matches!(
			result,
			Err(LifecycleError::NotFound(ref msg)) if msg == NO_PENDING_ORDER_MESSAGE
		));
	}

	#[tokio::test]
	async fn test_confirm_unknown_user_is_not_found() {
		let (lifecycle, _) = lifecycle();
		lifecycle
			.submit_order(user("Asha"), items(&["Fries"]))
			.await
			.unwrap();

		let result = lifecycle
			.confirm_order(&OrderSelector::ByUserInfo(user("Ravi")))
			.await;
		assert!(matches!(result, Err(LifecycleError::NotFound(_))));
	}

	#[tokio::test]
	async fn test_confirm_transitions_earliest_match_only() {
		let (lifecycle, storage) = lifecycle();
		let first = lifecycle
			.submit_order(user("Asha"), items(&["Fries"]))
			.await
			.unwrap();
		let second = lifecycle
			.submit_order(user("Asha"), items(&["Hot Wings"]))
			.await
			.unwrap();

		lifecycle
			.confirm_order(&OrderSelector::ByUserInfo(user("Asha")))
			.await
			.unwrap();

		let stored = storage.load().await.unwrap();
		assert_eq!(stored[0].id, first.order.id);
		assert_eq!(stored[0].status, OrderStatus::Confirmed);
		assert_eq!(stored[1].id, second.order.id);
		assert_eq!(stored[1].status, OrderStatus::Pending);
	}

	#[tokio::test]
	async fn test_confirm_by_id_targets_that_order() {
		let (lifecycle, storage) = lifecycle();
		lifecycle
			.submit_order(user("Asha"), items(&["Fries"]))
			.await
			.unwrap();
		let second = lifecycle
			.submit_order(user("Asha"), items(&["Hot Wings"]))
			.await
			.unwrap();
		let second_id = second.order.id.clone().unwrap();

		let message = lifecycle
			.confirm_order(&OrderSelector::ById(second_id.clone()))
			.await
			.unwrap();
		assert!(message.contains("Hot Wings"));

		let stored = storage.load().await.unwrap();
		assert_eq!(stored[0].status, OrderStatus::Pending);
		assert_eq!(stored[1].status, OrderStatus::Confirmed);
		assert_eq!(
			lifecycle.get_order(&second_id).await.unwrap().status,
			OrderStatus::Confirmed
		);
	}

	#[tokio::test]
	async fn test_cancel_order() {
		let (lifecycle, storage) = lifecycle();
		lifecycle
			.submit_order(user("Asha"), items(&["Zinger Burger"]))
			.await
			.unwrap();

		let selector = OrderSelector::ByUserInfo(user("Asha"));
		let message = lifecycle.cancel_order(&selector).await.unwrap();
		assert_eq!(message, "Your order has been canceled.");
		assert_eq!(
			storage.load().await.unwrap()[0].status,
			OrderStatus::Cancelled
		);

		// A cancelled order can be neither confirmed nor cancelled again.
		assert!(matches!(
			lifecycle.confirm_order(&selector).await,
			Err(LifecycleError::NotFound(_))
		));
		assert!(matches!(
			lifecycle.cancel_order(&selector).await,
			Err(LifecycleError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn test_get_unknown_order() {
		let (lifecycle, _) = lifecycle();
		assert!(matches!(
			lifecycle.get_order("nope").await,
			Err(LifecycleError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn test_corrupt_store_is_reported() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("orders.json");
		std::fs::write(&path, "not json").unwrap();

		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(&path))));
		let lifecycle = OrderLifecycle::new(Arc::new(MenuCatalog::standard()), storage);

		let result = lifecycle
			.submit_order(user("Asha"), items(&["Fries"]))
			.await;
		assert!(matches!(
			result,
			Err(LifecycleError::Storage(StorageError::Corrupt(_)))
		));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
	}

	#[tokio::test]
	async fn test_transition_keeps_stored_amounts_of_legacy_orders() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("orders.json");
		std::fs::write(
			&path,
			r#"[
    {
        "user_info": {"name": "Ravi"},
        "items": ["Zinger Burger", "Hot Wings"],
        "item_prices": {"Zinger Burger": 4.5, "Hot Wings": 4.5},
        "total_amount": 9.0,
        "gst": 1.6199999999999999,
        "final_total": 10.62,
        "status": "confirmed"
    },
    {
        "user_info": {"name": "Asha"},
        "items": ["Mystery"],
        "item_prices": {"Mystery": 0},
        "total_amount": 0,
        "gst": 0.0,
        "final_total": 0.0,
        "status": "pending"
    }
]"#,
		)
		.unwrap();

		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(&path))));
		let lifecycle = OrderLifecycle::new(Arc::new(MenuCatalog::standard()), storage);
		let asha = json!({ "name": "Asha" }).as_object().cloned().unwrap();
		lifecycle
			.cancel_order(&OrderSelector::ByUserInfo(asha))
			.await
			.unwrap();

		let content = std::fs::read_to_string(&path).unwrap();
		assert!(content.contains("\"gst\": 1.6199999999999999,"));
		assert!(content.contains("\"final_total\": 10.62,"));
		assert!(content.contains("\"Mystery\": 0\n"));
		assert!(content.contains("\"total_amount\": 0,"));
		assert!(content.contains("\"status\": \"cancelled\""));
	}

	#[tokio::test]
	async fn test_file_backed_lifecycle() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("orders.json");
		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(&path))));
		let lifecycle = OrderLifecycle::new(Arc::new(MenuCatalog::standard()), storage);

		lifecycle
			.submit_order(user("Asha"), items(&["Bucket Meal", "Soft Drinks"]))
			.await
			.unwrap();
		lifecycle
			.confirm_order(&OrderSelector::ByUserInfo(user("Asha")))
			.await
			.unwrap();

		let content = std::fs::read_to_string(&path).unwrap();
		let value: serde_json::Value = serde_json::from_str(&content).unwrap();
		assert_eq!(value[0]["status"], "confirmed");
		assert_eq!(value[0]["total_amount"], json!(16.5));
		assert_eq!(value[0]["item_prices"]["Bucket Meal"], json!(15.0));
	}
}
