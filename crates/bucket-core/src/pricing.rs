//! Order pricing.
//!
//! Resolves unit prices against the menu catalog and derives the subtotal,
//! GST, and final total of an order.

use bucket_types::{ItemPrices, MenuCatalog};
use rust_decimal::Decimal;

/// Goods and services tax applied to every order subtotal (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Prices derived for a list of selected items.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
	/// Unit price of each distinct item.
	pub item_prices: ItemPrices,
	/// Sum of unit prices over every selected item.
	pub total_amount: Decimal,
	/// `total_amount * GST_RATE`.
	pub gst: Decimal,
	/// `total_amount + gst`.
	pub final_total: Decimal,
}

/// Resolves the unit price of `item`.
///
/// Categories are scanned in catalog order and the first match wins. Items
/// that are not on the menu resolve to zero; callers cannot distinguish an
/// unknown item from a free one.
pub fn resolve_price(menu: &MenuCatalog, item: &str) -> Decimal {
	menu.find_price(item).unwrap_or(Decimal::ZERO)
}

/// Prices a list of selected items.
///
/// Repeated items are counted once per occurrence in the subtotal. Stores
/// written by the earlier service summed each distinct item once instead;
/// this is intentionally not reproduced.
pub fn price_items(menu: &MenuCatalog, items: &[String]) -> Pricing {
	let mut item_prices = ItemPrices::new();
	let mut total_amount = Decimal::ZERO;

	for item in items {
		let price = match item_prices.get(item) {
			Some(price) => price,
			None => {
				if menu.find_price(item).is_none() {
					tracing::warn!(item = %item, "Item not on the menu, pricing at 0");
				}
				let price = resolve_price(menu, item);
				item_prices.insert(item.clone(), price);
				price
			},
		};
		total_amount += price;
	}

	let gst = total_amount * GST_RATE;
	Pricing {
		item_prices,
		total_amount,
		gst,
		final_total: total_amount + gst,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bucket_types::{MenuCategory, MenuItem};

	fn items(names: &[&str]) -> Vec<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_resolve_price() {
		let menu = MenuCatalog::standard();

		assert_eq!(resolve_price(&menu, "Fries"), Decimal::new(200, 2));
		assert_eq!(resolve_price(&menu, "Bucket Meal"), Decimal::new(15, 0));
		assert_eq!(resolve_price(&menu, "Fries"), resolve_price(&menu, "Fries"));
	}

	#[test]
	fn test_unknown_item_resolves_to_zero() {
		let menu = MenuCatalog::standard();
		assert_eq!(resolve_price(&menu, "Veggie Burger"), Decimal::ZERO);
		assert_eq!(resolve_price(&menu, "fries"), Decimal::ZERO);
	}

	#[test]
	fn test_fries_and_chicken_totals() {
		let pricing = price_items(
			&MenuCatalog::standard(),
			&items(&["Fries", "Original Recipe Chicken"]),
		);

		assert_eq!(pricing.total_amount, Decimal::new(350, 2));
		assert_eq!(pricing.gst, Decimal::new(63, 2));
		assert_eq!(pricing.final_total, Decimal::new(413, 2));
		assert_eq!(pricing.item_prices.iter().count(), 2);
	}

	#[test]
	fn test_final_total_is_subtotal_plus_gst() {
		let menu = MenuCatalog::standard();
		let selections = [
			vec!["Hot Wings"],
			vec!["Family Meal", "Soft Drinks", "Chocolate Cake"],
			vec!["Corn on the Cob", "Mashed Potatoes", "Coleslaw", "Bottled Water"],
			vec!["Unknown Item", "Zinger Combo"],
		];

		for selection in selections {
			let pricing = price_items(&menu, &items(&selection));
			assert_eq!(
				pricing.final_total,
				pricing.total_amount * Decimal::new(118, 2)
			);
		}
	}

	#[test]
	fn test_repeated_items_counted_each_time() {
		let pricing = price_items(&MenuCatalog::standard(), &items(&["Fries", "Fries"]));

		assert_eq!(pricing.item_prices.iter().count(), 1);
		assert_eq!(pricing.total_amount, Decimal::new(400, 2));
	}

	#[test]
	fn test_unknown_items_are_free() {
		let pricing = price_items(&MenuCatalog::standard(), &items(&["Mystery Box"]));

		assert_eq!(pricing.item_prices.get("Mystery Box"), Some(Decimal::ZERO));
		assert_eq!(pricing.final_total, Decimal::ZERO);
	}

	#[test]
	fn test_custom_menu() {
		let menu = MenuCatalog::new(vec![MenuCategory::new(
			"Drinks",
			vec![MenuItem::new("Lassi", Decimal::new(250, 2))],
		)]);
		let pricing = price_items(&menu, &items(&["Lassi", "Fries"]));

		assert_eq!(pricing.total_amount, Decimal::new(250, 2));
		assert_eq!(pricing.gst, Decimal::new(45, 2));
	}
}
