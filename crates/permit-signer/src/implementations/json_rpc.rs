//! JSON-RPC typed-data signer.
//!
//! Forwards requests as `eth_signTypedData_v4` to an HTTP JSON-RPC endpoint,
//! such as a wallet bridge or a development node with unlocked accounts. Keys
//! stay on the other side of the endpoint.

use crate::{SignerError, SignerFactory, SignerRegistry, TypedDataSigner};
use alloy_provider::{Provider, RootProvider};
use alloy_transport::{RpcError, TransportError};
use alloy_transport_http::Http;
use async_trait::async_trait;
use permit_types::{truncate_hex, Address, ImplementationRegistry, TypedDataRequest};

/// JSON-RPC method used for typed-data signing.
pub const SIGN_TYPED_DATA_METHOD: &str = "eth_signTypedData_v4";

/// EIP-1193 "User Rejected Request".
const USER_REJECTED: i64 = 4001;
/// EIP-1193 "Disconnected" from all chains.
const DISCONNECTED: i64 = 4900;
/// EIP-1193 "Chain Disconnected" from the requested chain.
const CHAIN_DISCONNECTED: i64 = 4901;

/// Maps a JSON-RPC error object onto the signer error taxonomy.
fn classify_rpc_error(code: i64, message: String) -> SignerError {
	match code {
		USER_REJECTED => SignerError::Rejected(message),
		DISCONNECTED | CHAIN_DISCONNECTED => SignerError::Disconnected(message),
		_ => SignerError::Rpc { code, message },
	}
}

/// Maps a failed provider request onto the signer error taxonomy.
fn classify_transport_error(err: TransportError) -> SignerError {
	match err {
		RpcError::ErrorResp(payload) => classify_rpc_error(payload.code, payload.message.to_string()),
		RpcError::Transport(kind) => SignerError::Disconnected(kind.to_string()),
		other => SignerError::Implementation(format!(
			"{} request failed: {}",
			SIGN_TYPED_DATA_METHOD, other
		)),
	}
}

/// `eth_signTypedData_v4` params: the signing account and the typed data as
/// a JSON string.
fn sign_params(request: &TypedDataRequest) -> (Address, String) {
	(request.account, request.to_eip712_json().to_string())
}

/// Signer that delegates to a remote JSON-RPC endpoint.
pub struct JsonRpcSigner {
	provider: RootProvider<Http<reqwest::Client>>,
	/// Account reported as the connected one.
	account: Option<Address>,
	/// Chain the endpoint is connected to; requests for another chain fail early.
	chain_id: Option<u64>,
}

impl JsonRpcSigner {
	/// Creates a signer for the endpoint behind `url`.
	///
	/// No request is made until the first signature.
	pub fn new(
		url: &str,
		account: Option<Address>,
		chain_id: Option<u64>,
	) -> Result<Self, SignerError> {
		let url = url
			.parse()
			.map_err(|e| SignerError::Implementation(format!("Invalid signer URL: {}", e)))?;

		Ok(Self {
			provider: RootProvider::new_http(url),
			account,
			chain_id,
		})
	}

	fn check_chain(&self, request: &TypedDataRequest) -> Result<(), SignerError> {
		match (self.chain_id, request.domain.chain_id()) {
			(Some(expected), Some(actual)) if expected != actual => {
				Err(SignerError::ChainMismatch { expected, actual })
			},
			_ => Ok(()),
		}
	}
}

#[async_trait]
impl TypedDataSigner for JsonRpcSigner {
	fn account(&self) -> Option<Address> {
		self.account
	}

	async fn sign_typed_data(&self, request: &TypedDataRequest) -> Result<String, SignerError> {
		self.check_chain(request)?;

		tracing::debug!(account = %request.account, "Sending {}", SIGN_TYPED_DATA_METHOD);

		let signature: String = self
			.provider
			.raw_request(SIGN_TYPED_DATA_METHOD.into(), sign_params(request))
			.await
			.map_err(classify_transport_error)?;
		tracing::debug!(signature = %truncate_hex(&signature), "Received typed-data signature");

		Ok(signature)
	}
}

/// Factory function to create a JSON-RPC signer from configuration.
///
/// Configuration parameters:
/// - `url`: JSON-RPC endpoint (required)
/// - `account`: account reported as connected (optional)
/// - `chain_id`: chain the endpoint signs for (optional)
pub fn create_signer(config: &toml::Value) -> Result<Box<dyn TypedDataSigner>, SignerError> {
	let url = config
		.get("url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| SignerError::Implementation("url is required".to_string()))?;

	if url.is_empty() {
		return Err(SignerError::Implementation(
			"url cannot be empty".to_string(),
		));
	}

	let account = config
		.get("account")
		.and_then(|v| v.as_str())
		.map(|s| {
			s.parse::<Address>()
				.map_err(|e| SignerError::Implementation(format!("Invalid account: {}", e)))
		})
		.transpose()?;

	let chain_id = match config.get("chain_id") {
		Some(value) => {
			let id = value.as_integer().filter(|id| *id > 0).ok_or_else(|| {
				SignerError::Implementation("chain_id must be a positive integer".to_string())
			})?;
			Some(id as u64)
		},
		None => None,
	};

	Ok(Box::new(JsonRpcSigner::new(url, account, chain_id)?))
}

/// Registry for the JSON-RPC signer implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "json_rpc";
	type Factory = SignerFactory;

	fn factory() -> Self::Factory {
		create_signer
	}
}

impl SignerRegistry for Registry {}
