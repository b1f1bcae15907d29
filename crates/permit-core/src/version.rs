//! Permit version resolution.

/// Domain version used when nothing else is known.
pub const DEFAULT_PERMIT_VERSION: &str = "1";

/// Versions accepted from a token's `version()` without an explicit override.
const KNOWN_PERMIT_VERSIONS: [&str; 2] = ["1", "2"];

/// Picks the domain version for a permit.
///
/// Priority: the explicit value, then the token's on-chain `version()` if it
/// is one of the known versions, then `"1"`. An explicit value is used as
/// given.
pub fn resolve_permit_version(explicit: Option<&str>, on_chain: Option<&str>) -> String {
	if let Some(version) = explicit {
		return version.to_string();
	}

	on_chain
		.map(str::trim)
		.filter(|v| KNOWN_PERMIT_VERSIONS.contains(v))
		.unwrap_or(DEFAULT_PERMIT_VERSION)
		.to_string()
}
