//! Signing capability abstractions for permit requests.
//!
//! The permit core never holds keys. It hands a [`TypedDataRequest`] to a
//! [`TypedDataSigner`] (a wallet, a remote signer, a dev node with unlocked
//! accounts) and receives the raw hex signature back.

use async_trait::async_trait;
use permit_types::{Address, ImplementationRegistry, TypedDataRequest};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod json_rpc;
}

/// Errors reported by a signing capability.
///
/// These reach the caller unchanged; the core neither retries nor rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
	/// The user (or policy) declined to sign.
	#[error("Signature request rejected: {0}")]
	Rejected(String),
	/// The signer is unreachable or not connected to any chain.
	#[error("Signer disconnected: {0}")]
	Disconnected(String),
	/// The domain targets a different chain than the signer is connected to.
	#[error("Chain mismatch: signer is on chain {expected}, request targets chain {actual}")]
	ChainMismatch { expected: u64, actual: u64 },
	/// The signer answered with an error that fits no other category.
	#[error("Signer RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// Error that occurs inside the signer implementation itself.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining a typed-data signing capability.
///
/// Implementations receive the full `{ account, domain, primaryType, types,
/// message }` request and must sign with `request.account`, whichever
/// account they consider active.
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
	/// The account this signer currently has selected, if it knows one.
	fn account(&self) -> Option<Address>;

	/// Signs EIP-712 typed data and returns the signature as a 0x-prefixed hex string.
	async fn sign_typed_data(&self, request: &TypedDataRequest) -> Result<String, SignerError>;
}

/// Type alias for signer factory functions.
pub type SignerFactory = fn(&toml::Value) -> Result<Box<dyn TypedDataSigner>, SignerError>;

/// Registry trait for signer implementations.
pub trait SignerRegistry: ImplementationRegistry<Factory = SignerFactory> {}

/// Get all registered signer implementations.
///
/// Returns a vector of (name, factory) tuples for all available signer implementations.
pub fn get_all_implementations() -> Vec<(&'static str, SignerFactory)> {
	use implementations::json_rpc;

	vec![(json_rpc::Registry::NAME, json_rpc::Registry::factory())]
}
