//! Helper utilities for common operations.

/// Returns the current UNIX timestamp in seconds, or 0 if the system clock
/// is set before the epoch.
pub fn current_timestamp() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

/// Truncates an identifier for log output.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((end, _)) => format!("{}..", &id[..end]),
		None => id.to_string(),
	}
}
