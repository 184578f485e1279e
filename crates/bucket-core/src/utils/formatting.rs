//! Customer-facing message formatting.
//!
//! Amounts are shown with a dollar sign and two decimal places.

use bucket_types::OrderRecord;
use rust_decimal::Decimal;

/// Formats a currency amount rounded to two decimal places.
pub fn format_amount(amount: Decimal) -> String {
	format!("{:.2}", amount.round_dp(2))
}

/// Summary returned after an order is submitted.
pub fn submission_summary(order: &OrderRecord) -> String {
	let mut summary = String::from("You have selected the following items:\n");
	summary.push_str(&order.items.join("\n"));
	summary.push_str(&format!(
		"\nSubtotal: ${}\nGST (18%): ${}\nTotal: ${}.",
		format_amount(order.total_amount.value()),
		format_amount(order.gst.value()),
		format_amount(order.final_total.value())
	));
	summary.push_str("\nPlease confirm your order by sending 'confirm' along with your details.");
	summary
}

/// Summary returned after an order is confirmed.
pub fn confirmation_summary(order: &OrderRecord) -> String {
	format!(
		"Thank you for your order! You've ordered: {}.\nYour total amount is: ${}.",
		order.items.join(", "),
		format_amount(order.final_total.value())
	)
}

/// Acknowledgment returned after an order is cancelled.
pub fn cancellation_summary() -> String {
	"Your order has been canceled.".to_string()
}
