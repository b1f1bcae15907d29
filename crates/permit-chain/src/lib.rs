//! Read-only token state queries used to populate permit requests.
//!
//! A permit needs three values the caller usually does not have at hand: the
//! token's exact `name()`, the owner's current `nonces(owner)` and the domain
//! `version()`. This crate defines the interface the permit core consumes and
//! an Alloy-backed implementation.

use async_trait::async_trait;
use permit_types::{Address, ImplementationRegistry, U256};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur while reading token state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The contract answered with data that does not decode as expected.
	#[error("Invalid contract response: {0}")]
	InvalidResponse(String),
	/// Error that occurs when the reader configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the token state queries a permit needs.
///
/// A reader is bound to one network.
#[async_trait]
pub trait ContractStateReader: Send + Sync {
	/// Chain id of the network this reader queries.
	async fn chain_id(&self) -> Result<u64, ChainError>;

	/// The token's `name()`, used verbatim as the EIP-712 domain name.
	async fn name(&self, token: Address) -> Result<String, ChainError>;

	/// The owner's current permit nonce, `nonces(owner)`.
	async fn nonces(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

	/// The token's `version()`, or `None` when the token does not expose one.
	async fn version(&self, token: Address) -> Result<Option<String>, ChainError>;
}

/// Type alias for reader factory functions.
pub type ReaderFactory = fn(&toml::Value) -> Result<Box<dyn ContractStateReader>, ChainError>;

/// Registry trait for reader implementations.
pub trait ReaderRegistry: ImplementationRegistry<Factory = ReaderFactory> {}

/// Get all registered reader implementations.
pub fn get_all_implementations() -> Vec<(&'static str, ReaderFactory)> {
	use implementations::evm::alloy;

	vec![(alloy::Registry::NAME, alloy::Registry::factory())]
}
