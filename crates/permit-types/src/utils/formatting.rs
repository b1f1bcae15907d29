//! String formatting utilities.
//!
//! Provides hex prefix management and truncation of long hex values for log output.

/// Truncates a hex string for display purposes.
///
/// Keeps the first 10 characters (the `0x` prefix and four bytes) followed by "..".
pub fn truncate_hex(value: &str) -> String {
	match value.get(..10) {
		Some(prefix) if value.len() > 10 => format!("{}..", prefix),
		_ => value.to_string(),
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
