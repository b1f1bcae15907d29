//! Registry trait for self-registering implementations.
//!
//! Signer and chain-state implementations each expose a `Registry` struct so
//! the binary can build them by the name used in its configuration file.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example:
	/// - "json_rpc" for signer.implementations.json_rpc
	/// - "alloy" for chain.implementations.alloy
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
