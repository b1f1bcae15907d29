//! Test doubles for the signer and token state traits.

use async_trait::async_trait;
use permit_chain::{ChainError, ContractStateReader};
use permit_signer::{SignerError, TypedDataSigner};
use permit_types::{Address, TypedDataRequest, U256};
use std::sync::Mutex;

pub const FIXTURE_SIGNATURE: &str = "0x37f4910aeebdf5f1f4afe3587424b1916ab39cb7d788e62bb5652467bdda025b692d56085b542f253389d57b86c78d3eefc7a282ecbcdb97ccfe569c9ef8e6c89bd9";

pub fn owner() -> Address {
	"0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

pub fn spender() -> Address {
	"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn token() -> Address {
	"0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse().unwrap()
}

/// Signer returning a fixed answer and recording every request.
pub struct RecordingSigner {
	account: Option<Address>,
	response: Result<String, SignerError>,
	pub requests: Mutex<Vec<TypedDataRequest>>,
}

impl RecordingSigner {
	pub fn returning(signature: &str) -> Self {
		Self {
			account: None,
			response: Ok(signature.to_string()),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn failing(error: SignerError) -> Self {
		Self {
			account: None,
			response: Err(error),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn with_account(mut self, account: Address) -> Self {
		self.account = Some(account);
		self
	}

	pub fn recorded(&self) -> Vec<TypedDataRequest> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl TypedDataSigner for RecordingSigner {
	fn account(&self) -> Option<Address> {
		self.account
	}

	async fn sign_typed_data(&self, request: &TypedDataRequest) -> Result<String, SignerError> {
		self.requests.lock().unwrap().push(request.clone());
		self.response.clone()
	}
}

/// Token state reader answering from fixed values.
pub struct StaticReader {
	pub chain_id: u64,
	pub name: Result<String, ChainError>,
	pub nonce: U256,
	pub version: Option<String>,
	pub nonce_queries: Mutex<Vec<(Address, Address)>>,
}

impl StaticReader {
	pub fn new(name: &str, nonce: u64, version: Option<&str>) -> Self {
		Self {
			chain_id: 1,
			name: Ok(name.to_string()),
			nonce: U256::from(nonce),
			version: version.map(str::to_string),
			nonce_queries: Mutex::new(Vec::new()),
		}
	}
}

#[async_trait]
impl ContractStateReader for StaticReader {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		Ok(self.chain_id)
	}

	async fn name(&self, _token: Address) -> Result<String, ChainError> {
		self.name.clone()
	}

	async fn nonces(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
		self.nonce_queries.lock().unwrap().push((token, owner));
		Ok(self.nonce)
	}

	async fn version(&self, _token: Address) -> Result<Option<String>, ChainError> {
		Ok(self.version.clone())
	}
}
