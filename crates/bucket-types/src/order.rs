//! Order record types for the bucket order service.
//!
//! This module defines the persisted order record, its status, the ordered
//! item price mapping, and the selector used to locate a pending order.

use crate::Amount;
use rust_decimal::Decimal;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arbitrary customer-supplied details (name, address, mobile, ...).
///
/// Treated as an opaque equality key. Key order is preserved for
/// persistence while equality ignores it.
pub type UserInfo = serde_json::Map<String, serde_json::Value>;

/// Status of an order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Submitted and awaiting confirmation or cancellation.
	Pending,
	/// Confirmed by the customer. Terminal.
	Confirmed,
	/// Cancelled by the customer. Terminal.
	Cancelled,
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "pending"),
			OrderStatus::Confirmed => write!(f, "confirmed"),
			OrderStatus::Cancelled => write!(f, "cancelled"),
		}
	}
}

/// Unit prices resolved at order time, keyed by item name.
///
/// Keeps first-insertion order so the persisted JSON object reads in the
/// same order the items were selected. Repeated items keep a single entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPrices(Vec<(String, Amount)>);

impl ItemPrices {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `price` for `item` unless the item already has an entry.
	pub fn insert(&mut self, item: impl Into<String>, price: impl Into<Amount>) {
		let item = item.into();
		if self.get(&item).is_none() {
			self.0.push((item, price.into()));
		}
	}

	/// Returns the recorded price for `item`.
	pub fn get(&self, item: &str) -> Option<Decimal> {
		self.0
			.iter()
			.find(|(name, _)| name == item)
			.map(|(_, price)| price.value())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Amount)> {
		self.0.iter().map(|(name, price)| (name.as_str(), price))
	}
}

impl Serialize for ItemPrices {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for (name, price) in self.iter() {
			map.serialize_entry(name, price)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for ItemPrices {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct ItemPricesVisitor;

		impl<'de> Visitor<'de> for ItemPricesVisitor {
			type Value = ItemPrices;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a map of item names to prices")
			}

			fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut prices = ItemPrices::new();
				while let Some((name, price)) = access.next_entry::<String, Amount>()? {
					prices.insert(name, price);
				}
				Ok(prices)
			}
		}

		deserializer.deserialize_map(ItemPricesVisitor)
	}
}

/// A persisted order.
///
/// Field order matches the on-disk JSON layout. `id` and the timestamps are
/// optional so that stores written before orders carried identifiers still
/// load and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
	/// Customer details supplied with the order.
	pub user_info: UserInfo,
	/// Selected item names, in selection order. Duplicates allowed.
	pub items: Vec<String>,
	/// Unit price of each distinct item at order time.
	pub item_prices: ItemPrices,
	/// Sum of item prices before tax.
	pub total_amount: Amount,
	/// Goods and services tax on `total_amount`.
	pub gst: Amount,
	/// `total_amount + gst`.
	pub final_total: Amount,
	/// Current status.
	pub status: OrderStatus,
	/// Unique identifier assigned at creation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Creation time, Unix seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<u64>,
	/// Time of the last status change, Unix seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<u64>,
}

impl OrderRecord {
	pub fn is_pending(&self) -> bool {
		self.status == OrderStatus::Pending
	}

	/// Returns true if this record is pending and identified by `selector`.
	pub fn matches_pending(&self, selector: &OrderSelector) -> bool {
		self.is_pending() && selector.matches(self)
	}
}

/// Identifies the order a confirm or cancel request refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSelector {
	/// Match by the identifier assigned at creation.
	ById(String),
	/// Match by structural equality of the submitted customer details.
	ByUserInfo(UserInfo),
}

impl OrderSelector {
	pub fn matches(&self, order: &OrderRecord) -> bool {
		match self {
			OrderSelector::ById(id) => order.id.as_deref() == Some(id.as_str()),
			OrderSelector::ByUserInfo(user_info) => &order.user_info == user_info,
		}
	}
}

impl fmt::Display for OrderSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderSelector::ById(id) => write!(f, "id {}", id),
			OrderSelector::ByUserInfo(user_info) => {
				write!(f, "user info ({} fields)", user_info.len())
			},
		}
	}
}
