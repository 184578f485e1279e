//! Order state machine implementation.
//!
//! Manages order state transitions with validation, ensuring orders move
//! through valid lifecycle states: Pending -> Confirmed or Pending ->
//! Cancelled. Confirmed and cancelled orders are terminal.

use bucket_storage::{StorageError, StorageService};
use bucket_types::{current_timestamp, OrderRecord, OrderSelector, OrderStatus};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("No pending order matches {0}")]
	NoPendingOrder(String),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
}

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Appends a new order to the store.
	pub async fn store_order(&self, order: &OrderRecord) -> Result<(), OrderStateError> {
		self.storage
			.modify(|records| {
				records.push(order.clone());
				Ok::<_, OrderStateError>(())
			})
			.await
	}

	/// Transitions the first pending order matched by `selector`.
	///
	/// Records are scanned in stored order; later matches stay untouched.
	/// Returns the updated order.
	pub async fn transition_first_pending(
		&self,
		selector: &OrderSelector,
		new_status: OrderStatus,
	) -> Result<OrderRecord, OrderStateError> {
		self.storage
			.modify(|records| -> Result<OrderRecord, OrderStateError> {
				let order = records
					.iter_mut()
					.find(|order| order.matches_pending(selector))
					.ok_or_else(|| OrderStateError::NoPendingOrder(selector.to_string()))?;

				Self::apply_transition(order, new_status)?;
				Ok(order.clone())
			})
			.await
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<OrderRecord, OrderStateError> {
		self.storage
			.load()
			.await?
			.into_iter()
			.find(|order| order.id.as_deref() == Some(order_id))
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))
	}

	/// Validates and applies a status change in place, stamping `updated_at`.
	pub fn apply_transition(
		order: &mut OrderRecord,
		new_status: OrderStatus,
	) -> Result<(), OrderStateError> {
		if !Self::is_valid_transition(&order.status, &new_status) {
			return Err(OrderStateError::InvalidTransition {
				from: order.status,
				to: new_status,
			});
		}

		order.status = new_status;
		order.updated_at = Some(current_timestamp());
		Ok(())
	}

	/// Checks if a state transition is valid
	fn is_valid_transition(from: &OrderStatus, to: &OrderStatus) -> bool {
		// Static transition table - each state maps to allowed next states
		static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
			let mut m = HashMap::new();
			m.insert(
				OrderStatus::Pending,
				HashSet::from([OrderStatus::Confirmed, OrderStatus::Cancelled]),
			);
			m.insert(OrderStatus::Confirmed, HashSet::new()); // terminal
			m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
			m
		});

		TRANSITIONS.get(from).is_some_and(|set| set.contains(to))
	}
}
