//! Menu API implementation.

use bucket_core::OrderLifecycle;
use bucket_types::MenuResponse;

/// Handles GET /menu requests.
pub fn get_menu(lifecycle: &OrderLifecycle) -> MenuResponse {
	MenuResponse {
		menu: lifecycle.menu().clone(),
	}
}
