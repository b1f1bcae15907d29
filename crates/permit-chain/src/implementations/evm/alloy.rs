//! Alloy-based token state reader.
//!
//! Issues `eth_call`s for `name()`, `nonces(address)` and `version()` against
//! the token contract over an HTTP provider.

use crate::{ChainError, ContractStateReader, ReaderFactory, ReaderRegistry};
use alloy_primitives::Bytes;
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use permit_types::{Address, ImplementationRegistry, U256};

// Read-only subset of the ERC-20 permit ABI.
sol! {
	interface IERC20Permit {
		function name() external view returns (string);
		function nonces(address owner) external view returns (uint256);
		function version() external view returns (string);
	}
}

fn decode_name(data: &[u8]) -> Result<String, ChainError> {
	IERC20Permit::nameCall::abi_decode_returns(data, true)
		.map(|ret| ret._0)
		.map_err(|e| ChainError::InvalidResponse(format!("Failed to decode name(): {}", e)))
}

fn decode_nonce(data: &[u8]) -> Result<U256, ChainError> {
	IERC20Permit::noncesCall::abi_decode_returns(data, true)
		.map(|ret| ret._0)
		.map_err(|e| ChainError::InvalidResponse(format!("Failed to decode nonces(): {}", e)))
}

/// `None` when the returned data is not an ABI string (including empty data).
fn decode_version(data: &[u8]) -> Option<String> {
	IERC20Permit::versionCall::abi_decode_returns(data, true)
		.map(|ret| ret._0)
		.ok()
}

/// Token state reader backed by an Alloy HTTP provider.
pub struct AlloyStateReader {
	provider: RootProvider<Http<reqwest::Client>>,
}

impl AlloyStateReader {
	/// Creates a reader for the network behind `rpc_url`.
	///
	/// No request is made until the first query.
	pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::Configuration(format!("Invalid RPC URL: {}", e)))?;

		Ok(Self {
			provider: RootProvider::new_http(url),
		})
	}

	async fn call(&self, token: Address, call_data: Vec<u8>) -> Result<Bytes, ChainError> {
		let request = TransactionRequest::default()
			.to(token)
			.input(call_data.into());

		self.provider
			.call(&request)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to call {}: {}", token, e)))
	}
}

#[async_trait]
impl ContractStateReader for AlloyStateReader {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn name(&self, token: Address) -> Result<String, ChainError> {
		let data = self
			.call(token, IERC20Permit::nameCall {}.abi_encode())
			.await?;
		decode_name(&data)
	}

	async fn nonces(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
		let data = self
			.call(token, IERC20Permit::noncesCall { owner }.abi_encode())
			.await?;
		decode_nonce(&data)
	}

	async fn version(&self, token: Address) -> Result<Option<String>, ChainError> {
		let request = TransactionRequest::default()
			.to(token)
			.input(IERC20Permit::versionCall {}.abi_encode().into());

		match self.provider.call(&request).await {
			Ok(data) => {
				let version = decode_version(&data);
				if version.is_none() {
					tracing::debug!(%token, "version() returned undecodable data");
				}
				Ok(version)
			},
			// The node answered with an error object: the call reverted, which is
			// what tokens without version() do.
			Err(e) if e.as_error_resp().is_some() => {
				tracing::debug!(%token, error = %e, "version() not available");
				Ok(None)
			},
			Err(e) => Err(ChainError::Network(format!(
				"Failed to call version() on {}: {}",
				token, e
			))),
		}
	}
}

/// Factory function to create an Alloy reader from configuration.
///
/// Configuration parameters:
/// - `rpc_url`: HTTP JSON-RPC endpoint of the token's network (required)
pub fn create_reader(config: &toml::Value) -> Result<Box<dyn ContractStateReader>, ChainError> {
	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| ChainError::Configuration("rpc_url is required".to_string()))?;

	Ok(Box::new(AlloyStateReader::new(rpc_url)?))
}

/// Registry for the Alloy reader implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "alloy";
	type Factory = ReaderFactory;

	fn factory() -> Self::Factory {
		create_reader
	}
}

impl ReaderRegistry for Registry {}
