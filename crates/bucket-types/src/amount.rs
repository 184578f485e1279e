//! Monetary amounts as persisted in the order store.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary amount.
///
/// Arithmetic and comparison use the decimal value. An amount read from JSON
/// also keeps the number exactly as it was written, and serializes it back
/// verbatim, so records that were not modified keep their stored text
/// (`1.6199999999999999`, integer `0`) across a save. Amounts created in
/// this process serialize as JSON floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Amount {
	value: Decimal,
	stored: Option<StoredNumber>,
}

/// JSON number as it was read, kept only for re-serialization.
#[derive(Debug, Clone, Copy)]
enum StoredNumber {
	Unsigned(u64),
	Signed(i64),
	Float(f64),
}

impl Amount {
	pub fn value(&self) -> Decimal {
		self.value
	}
}

impl From<Decimal> for Amount {
	fn from(value: Decimal) -> Self {
		Self {
			value,
			stored: None,
		}
	}
}

impl PartialEq for Amount {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}

impl PartialEq<Decimal> for Amount {
	fn eq(&self, other: &Decimal) -> bool {
		self.value == *other
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.value.fmt(f)
	}
}

impl Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self.stored {
			Some(StoredNumber::Unsigned(n)) => serializer.serialize_u64(n),
			Some(StoredNumber::Signed(n)) => serializer.serialize_i64(n),
			Some(StoredNumber::Float(n)) => serializer.serialize_f64(n),
			None => Serialize::serialize(&self.value, serializer),
		}
	}
}

impl<'de> Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let number = serde_json::Number::deserialize(deserializer)?;
		// Shortest round-trip text of the stored number, parsed exactly.
		let text = number.to_string();
		let value = Decimal::from_str(&text)
			.or_else(|_| Decimal::from_scientific(&text))
			.map_err(|e| serde::de::Error::custom(format!("invalid amount {}: {}", text, e)))?;

		let stored = if let Some(n) = number.as_u64() {
			StoredNumber::Unsigned(n)
		} else if let Some(n) = number.as_i64() {
			StoredNumber::Signed(n)
		} else {
			let n = number
				.as_f64()
				.ok_or_else(|| serde::de::Error::custom(format!("invalid amount {}", text)))?;
			StoredNumber::Float(n)
		};

		Ok(Self {
			value,
			stored: Some(stored),
		})
	}
}
