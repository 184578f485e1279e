//! Menu catalog types.
//!
//! The catalog is an ordered list of categories, each holding an ordered list
//! of priced items. Order matters: price lookups scan categories in the order
//! they were defined and the first match wins.

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// A single priced menu item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItem {
	/// Display name, also used as the lookup key in orders.
	pub name: String,
	/// Unit price.
	pub price: Decimal,
}

impl MenuItem {
	pub fn new(name: impl Into<String>, price: Decimal) -> Self {
		Self {
			name: name.into(),
			price,
		}
	}
}

/// A named group of menu items.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuCategory {
	/// Category name (e.g. "Sides").
	pub name: String,
	/// Items in display order.
	pub items: Vec<MenuItem>,
}

impl MenuCategory {
	pub fn new(name: impl Into<String>, items: Vec<MenuItem>) -> Self {
		Self {
			name: name.into(),
			items,
		}
	}
}

/// Immutable menu catalog.
///
/// Serializes as `{ category: { item: price } }` with both levels kept in
/// definition order.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuCatalog {
	categories: Vec<MenuCategory>,
}

impl MenuCatalog {
	/// Creates a catalog from categories in lookup order.
	pub fn new(categories: Vec<MenuCategory>) -> Self {
		Self { categories }
	}

	/// The standard menu served when no menu is configured.
	pub fn standard() -> Self {
		let item = |name: &str, cents: i64| MenuItem::new(name, Decimal::new(cents, 2));

		Self::new(vec![
			MenuCategory::new(
				"Chicken",
				vec![
					item("Original Recipe Chicken", 150),
					item("Hot Wings", 500),
					item("Zinger Burger", 400),
					item("Chicken Sandwich", 350),
				],
			),
			MenuCategory::new(
				"Combos",
				vec![
					item("Bucket Meal", 1500),
					item("Family Meal", 2500),
					item("Zinger Combo", 800),
				],
			),
			MenuCategory::new(
				"Sides",
				vec![
					item("Fries", 200),
					item("Coleslaw", 250),
					item("Mashed Potatoes", 250),
					item("Corn on the Cob", 200),
				],
			),
			MenuCategory::new(
				"Desserts",
				vec![item("Chocolate Cake", 300), item("Ice Cream Cone", 100)],
			),
			MenuCategory::new(
				"Beverages",
				vec![item("Soft Drinks", 150), item("Bottled Water", 100)],
			),
		])
	}

	/// Categories in lookup order.
	pub fn categories(&self) -> &[MenuCategory] {
		&self.categories
	}

	/// Finds the price of the first item named `item`, scanning categories in order.
	pub fn find_price(&self, item: &str) -> Option<Decimal> {
		self.categories
			.iter()
			.flat_map(|category| category.items.iter())
			.find(|menu_item| menu_item.name == item)
			.map(|menu_item| menu_item.price)
	}

	/// Total number of items across all categories.
	pub fn item_count(&self) -> usize {
		self.categories.iter().map(|c| c.items.len()).sum()
	}
}

impl Serialize for MenuCatalog {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		struct Items<'a>(&'a [MenuItem]);

		impl Serialize for Items<'_> {
			fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
			where
				S: Serializer,
			{
				let mut map = serializer.serialize_map(Some(self.0.len()))?;
				for item in self.0 {
					map.serialize_entry(&item.name, &item.price)?;
				}
				map.end()
			}
		}

		let mut map = serializer.serialize_map(Some(self.categories.len()))?;
		for category in &self.categories {
			map.serialize_entry(&category.name, &Items(&category.items))?;
		}
		map.end()
	}
}
