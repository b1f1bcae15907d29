//! Permit client: signing operations bound to a token, owner and signer.
//!
//! The client collects the context a permit needs (signer, chain, token,
//! spender, and the token's name, nonce and version read on-chain) and only
//! hands out signing operations once all of it is known. Callers check
//! availability with [`PermitClient::eip2612`] / [`PermitClient::dai`]
//! instead of handling a "not ready" error.

use crate::context::{gather_context, TokenState};
use crate::requester::{sign_permit_2612, sign_permit_dai};
use crate::PermitError;
use permit_chain::ContractStateReader;
use permit_signer::TypedDataSigner;
use permit_types::{Address, Eip2612Params, PermitParams, PermitSignature, U256};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Static context a client is created with. Every field may be unknown.
#[derive(Clone, Default)]
pub struct PermitClientConfig {
	pub signer: Option<Arc<dyn TypedDataSigner>>,
	pub chain_id: Option<u64>,
	pub token: Option<Address>,
	/// Token owner. Defaults to the signer's account.
	pub owner: Option<Address>,
	pub spender: Option<Address>,
	/// Domain version override. Otherwise the token's `version()` or `"1"`.
	pub permit_version: Option<String>,
}

/// Per-call replacements for values the client would otherwise supply.
#[derive(Clone, Default)]
pub struct PermitOverrides {
	pub signer: Option<Arc<dyn TypedDataSigner>>,
	pub owner: Option<Address>,
	pub spender: Option<Address>,
	pub nonce: Option<U256>,
	pub token_name: Option<String>,
	pub permit_version: Option<String>,
	pub chain_id: Option<u64>,
	pub token: Option<Address>,
}

/// Arguments of a bound EIP-2612 signing call.
#[derive(Clone)]
pub struct Eip2612Args {
	pub value: U256,
	pub deadline: U256,
	pub overrides: PermitOverrides,
}

impl Eip2612Args {
	pub fn new(value: U256, deadline: U256) -> Self {
		Self {
			value,
			deadline,
			overrides: PermitOverrides::default(),
		}
	}

	pub fn with_overrides(mut self, overrides: PermitOverrides) -> Self {
		self.overrides = overrides;
		self
	}
}

/// Arguments of a bound Dai signing call. `deadline` becomes `expiry`.
#[derive(Clone)]
pub struct DaiArgs {
	pub deadline: U256,
	pub overrides: PermitOverrides,
}

impl DaiArgs {
	pub fn new(deadline: U256) -> Self {
		Self {
			deadline,
			overrides: PermitOverrides::default(),
		}
	}

	pub fn with_overrides(mut self, overrides: PermitOverrides) -> Self {
		self.overrides = overrides;
		self
	}
}

/// Snapshot of everything required to sign.
#[derive(Clone)]
struct ReadyContext {
	signer: Arc<dyn TypedDataSigner>,
	chain_id: u64,
	token: Address,
	owner: Address,
	spender: Address,
	state: TokenState,
}

impl ReadyContext {
	/// Merges per-call overrides; returns the signer to use and the parameters.
	fn resolve(
		&self,
		deadline: U256,
		overrides: PermitOverrides,
	) -> (Arc<dyn TypedDataSigner>, PermitParams) {
		let params = PermitParams {
			token: overrides.token.unwrap_or(self.token),
			token_name: overrides
				.token_name
				.unwrap_or_else(|| self.state.name.clone()),
			owner: overrides.owner.unwrap_or(self.owner),
			spender: overrides.spender.unwrap_or(self.spender),
			chain_id: overrides.chain_id.unwrap_or(self.chain_id),
			permit_version: Some(
				overrides
					.permit_version
					.unwrap_or_else(|| self.state.version.clone()),
			),
			deadline,
			nonce: overrides.nonce.unwrap_or(self.state.nonce),
		};
		let signer = overrides.signer.unwrap_or_else(|| Arc::clone(&self.signer));
		(signer, params)
	}
}

/// Outcome of the most recent operation. Both slots change under one lock.
#[derive(Debug, Default)]
struct LastResult {
	signature: Option<PermitSignature>,
	error: Option<PermitError>,
}

/// Composition helper around the pure signing operations.
pub struct PermitClient {
	config: PermitClientConfig,
	/// Token values from the last successful refresh.
	state: RwLock<Option<TokenState>>,
	last: RwLock<LastResult>,
}

impl PermitClient {
	pub fn new(config: PermitClientConfig) -> Self {
		Self {
			config,
			state: RwLock::new(None),
			last: RwLock::new(LastResult::default()),
		}
	}

	pub fn config(&self) -> &PermitClientConfig {
		&self.config
	}

	/// The configured owner, else the signer's account.
	pub fn owner(&self) -> Option<Address> {
		self.config.owner.or_else(|| {
			self.config
				.signer
				.as_ref()
				.and_then(|signer| signer.account())
		})
	}

	/// Re-reads name, nonce and version from the token.
	///
	/// Returns `Ok(None)` without querying anything while the token or owner
	/// is unknown. Failures are also recorded as the last error.
	pub async fn refresh(
		&self,
		reader: &dyn ContractStateReader,
	) -> Result<Option<TokenState>, PermitError> {
		let (Some(token), Some(owner)) = (self.config.token, self.owner()) else {
			return Ok(None);
		};

		match gather_context(reader, token, owner, self.config.permit_version.as_deref()).await {
			Ok(state) => {
				*self.state.write().await = Some(state.clone());
				Ok(Some(state))
			},
			Err(e) => {
				self.last.write().await.error = Some(e.clone());
				Err(e)
			},
		}
	}

	/// Token values from the last successful refresh.
	pub async fn token_state(&self) -> Option<TokenState> {
		self.state.read().await.clone()
	}

	async fn ready_context(&self) -> Option<ReadyContext> {
		let state = self.state.read().await.clone()?;
		Some(ReadyContext {
			signer: self.config.signer.clone()?,
			chain_id: self.config.chain_id?,
			token: self.config.token?,
			owner: self.owner()?,
			spender: self.config.spender?,
			state,
		})
	}

	/// Whether signer, chain id, token, owner, spender, name and nonce are all known.
	pub async fn is_ready(&self) -> bool {
		self.ready_context().await.is_some()
	}

	/// The EIP-2612 signing operation, if the client is ready.
	pub async fn eip2612(&self) -> Option<BoundEip2612<'_>> {
		let context = self.ready_context().await?;
		Some(BoundEip2612 {
			client: self,
			context,
		})
	}

	/// The Dai-style signing operation, if the client is ready.
	pub async fn dai(&self) -> Option<BoundDai<'_>> {
		let context = self.ready_context().await?;
		Some(BoundDai {
			client: self,
			context,
		})
	}

	/// The most recent signature produced through this client.
	pub async fn last_signature(&self) -> Option<PermitSignature> {
		self.last.read().await.signature
	}

	/// The most recent error, cleared by the next successful signature.
	pub async fn last_error(&self) -> Option<PermitError> {
		self.last.read().await.error.clone()
	}

	async fn record(
		&self,
		result: Result<PermitSignature, PermitError>,
	) -> Result<PermitSignature, PermitError> {
		let mut last = self.last.write().await;
		match &result {
			Ok(signature) => {
				last.signature = Some(*signature);
				last.error = None;
			},
			Err(e) => {
				last.error = Some(e.clone());
			},
		}
		result
	}
}

/// EIP-2612 signing bound to a ready client.
pub struct BoundEip2612<'a> {
	client: &'a PermitClient,
	context: ReadyContext,
}

impl BoundEip2612<'_> {
	pub async fn sign(&self, args: Eip2612Args) -> Result<PermitSignature, PermitError> {
		let (signer, permit) = self.context.resolve(args.deadline, args.overrides);
		let params = Eip2612Params {
			permit,
			value: args.value,
		};
		let result = sign_permit_2612(signer.as_ref(), &params).await;
		self.client.record(result).await
	}
}

/// Dai-style signing bound to a ready client.
pub struct BoundDai<'a> {
	client: &'a PermitClient,
	context: ReadyContext,
}

impl BoundDai<'_> {
	pub async fn sign(&self, args: DaiArgs) -> Result<PermitSignature, PermitError> {
		let (signer, params) = self.context.resolve(args.deadline, args.overrides);
		let result = sign_permit_dai(signer.as_ref(), &params).await;
		self.client.record(result).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::*;
	use permit_chain::ChainError;
	use permit_signer::SignerError;
	use permit_types::{PermitMessage, TypedDataRequest};

	fn ready_config(signer: Arc<RecordingSigner>) -> PermitClientConfig {
		PermitClientConfig {
			signer: Some(signer as Arc<dyn TypedDataSigner>),
			chain_id: Some(1),
			token: Some(token()),
			owner: Some(owner()),
			spender: Some(spender()),
			permit_version: None,
		}
	}

	fn deadline() -> U256 {
		U256::from(1_700_100_000u64)
	}

	#[tokio::test]
	async fn test_not_ready_before_refresh() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let client = PermitClient::new(ready_config(signer));

		assert!(!client.is_ready().await);
		assert!(client.eip2612().await.is_none());
		assert!(client.dai().await.is_none());
	}

	#[tokio::test]
	async fn test_missing_context_withholds_operations() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let reader = StaticReader::new("Test Token", 0, None);

		let mut config = ready_config(signer.clone());
		config.spender = None;
		let client = PermitClient::new(config);
		client.refresh(&reader).await.unwrap();
		assert!(client.eip2612().await.is_none());

		let mut config = ready_config(signer.clone());
		config.chain_id = None;
		let client = PermitClient::new(config);
		client.refresh(&reader).await.unwrap();
		assert!(client.dai().await.is_none());

		let mut config = ready_config(signer);
		config.signer = None;
		let client = PermitClient::new(config);
		client.refresh(&reader).await.unwrap();
		assert!(!client.is_ready().await);
	}

	#[tokio::test]
	async fn test_refresh_without_token_queries_nothing() {
		let client = PermitClient::new(PermitClientConfig {
			owner: Some(owner()),
			..Default::default()
		});
		let reader = StaticReader::new("Test Token", 0, None);

		assert_eq!(client.refresh(&reader).await.unwrap(), None);
		assert!(reader.nonce_queries.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_end_to_end_eip2612() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let client = PermitClient::new(ready_config(signer.clone()));
		let reader = StaticReader::new("Test Token", 0, None);
		client.refresh(&reader).await.unwrap();

		let value = U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64));
		let signature = client
			.eip2612()
			.await
			.expect("client should be ready")
			.sign(Eip2612Args::new(value, deadline()))
			.await
			.unwrap();

		let request: TypedDataRequest = signer.recorded().remove(0);
		assert_eq!(request.account, owner());
		assert_eq!(
			serde_json::to_value(&request.domain).unwrap(),
			serde_json::json!({
				"name": "Test Token",
				"version": "1",
				"chainId": 1,
				"verifyingContract": "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse::<Address>().unwrap(),
			})
		);
		assert_eq!(
			request.message,
			PermitMessage::Eip2612 {
				owner: owner(),
				spender: spender(),
				value,
				nonce: U256::ZERO,
				deadline: deadline(),
			}
		);
		assert_eq!(client.last_signature().await, Some(signature));
		assert_eq!(client.last_error().await, None);
	}

	#[tokio::test]
	async fn test_owner_defaults_to_signer_account() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE).with_account(spender()));
		let mut config = ready_config(signer.clone());
		config.owner = None;
		let client = PermitClient::new(config);
		let reader = StaticReader::new("Dai Stablecoin", 3, None);

		client.refresh(&reader).await.unwrap();
		assert_eq!(
			reader.nonce_queries.lock().unwrap().as_slice(),
			&[(token(), spender())]
		);

		client
			.dai()
			.await
			.unwrap()
			.sign(DaiArgs::new(deadline()))
			.await
			.unwrap();

		let request = &signer.recorded()[0];
		assert_eq!(request.account, spender());
		assert!(matches!(
			request.message,
			PermitMessage::Dai { nonce, allowed: true, .. } if nonce == U256::from(3u64)
		));
	}

	#[tokio::test]
	async fn test_version_from_token() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let client = PermitClient::new(ready_config(signer.clone()));
		client
			.refresh(&StaticReader::new("USD Coin", 0, Some("2")))
			.await
			.unwrap();

		client
			.eip2612()
			.await
			.unwrap()
			.sign(Eip2612Args::new(U256::from(1u64), deadline()))
			.await
			.unwrap();

		assert_eq!(signer.recorded()[0].domain.version, "2");
	}

	#[tokio::test]
	async fn test_per_call_overrides() {
		let default_signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let override_signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let client = PermitClient::new(ready_config(default_signer.clone()));
		client
			.refresh(&StaticReader::new("Test Token", 0, None))
			.await
			.unwrap();

		let overrides = PermitOverrides {
			signer: Some(override_signer.clone() as Arc<dyn TypedDataSigner>),
			nonce: Some(U256::from(9u64)),
			permit_version: Some("2".to_string()),
			..Default::default()
		};
		client
			.eip2612()
			.await
			.unwrap()
			.sign(Eip2612Args::new(U256::from(1u64), deadline()).with_overrides(overrides))
			.await
			.unwrap();

		assert!(default_signer.recorded().is_empty());
		let request = &override_signer.recorded()[0];
		assert_eq!(request.domain.version, "2");
		assert!(matches!(
			request.message,
			PermitMessage::Eip2612 { nonce, .. } if nonce == U256::from(9u64)
		));
	}

	#[tokio::test]
	async fn test_signer_error_recorded_and_returned() {
		let rejection = SignerError::Rejected("User rejected the request.".to_string());
		let signer = Arc::new(RecordingSigner::failing(rejection.clone()));
		let client = PermitClient::new(ready_config(signer));
		client
			.refresh(&StaticReader::new("Test Token", 0, None))
			.await
			.unwrap();

		let err = client
			.eip2612()
			.await
			.unwrap()
			.sign(Eip2612Args::new(U256::from(1u64), deadline()))
			.await
			.unwrap_err();

		assert_eq!(err, PermitError::Signer(rejection.clone()));
		assert_eq!(client.last_error().await, Some(PermitError::Signer(rejection)));
		assert_eq!(client.last_signature().await, None);
	}

	#[tokio::test]
	async fn test_last_result_slots_move_together() {
		let rejection = SignerError::Rejected("User rejected the request.".to_string());
		let failing = Arc::new(RecordingSigner::failing(rejection.clone()));
		let client = PermitClient::new(ready_config(failing));
		client
			.refresh(&StaticReader::new("Test Token", 0, None))
			.await
			.unwrap();
		let bound = client.eip2612().await.unwrap();

		assert!(bound
			.sign(Eip2612Args::new(U256::from(1u64), deadline()))
			.await
			.is_err());
		assert!(client.last_error().await.is_some());

		// Success replaces the recorded error in the same update.
		let working = PermitOverrides {
			signer: Some(
				Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE)) as Arc<dyn TypedDataSigner>
			),
			..Default::default()
		};
		let signature = bound
			.sign(Eip2612Args::new(U256::from(1u64), deadline()).with_overrides(working))
			.await
			.unwrap();
		assert_eq!(client.last_signature().await, Some(signature));
		assert_eq!(client.last_error().await, None);

		// A later failure keeps the previous signature alongside the new error.
		assert!(bound
			.sign(Eip2612Args::new(U256::from(1u64), deadline()))
			.await
			.is_err());
		assert_eq!(client.last_signature().await, Some(signature));
		assert_eq!(client.last_error().await, Some(PermitError::Signer(rejection)));
	}

	#[tokio::test]
	async fn test_refresh_failure_recorded() {
		let signer = Arc::new(RecordingSigner::returning(FIXTURE_SIGNATURE));
		let client = PermitClient::new(ready_config(signer));
		let mut reader = StaticReader::new("", 0, None);
		reader.name = Err(ChainError::Network("timeout".to_string()));

		assert!(client.refresh(&reader).await.is_err());
		assert_eq!(
			client.last_error().await,
			Some(PermitError::State(ChainError::Network("timeout".to_string())))
		);
		assert!(!client.is_ready().await);
	}
}
