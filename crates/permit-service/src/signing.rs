//! One-shot permit signing driven by configuration.

use permit_chain::ContractStateReader;
use permit_config::PermitConfig;
use permit_core::{DaiArgs, Eip2612Args, PermitClient, PermitClientConfig};
use permit_signer::TypedDataSigner;
use permit_types::{Address, PermitDialect, PermitSignature, U256};
use serde::Serialize;
use std::sync::Arc;

/// What the CLI prints after a successful signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPermit {
	pub dialect: PermitDialect,
	pub token: Address,
	pub owner: Address,
	pub spender: Address,
	pub chain_id: u64,
	pub nonce: U256,
	pub deadline: U256,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<U256>,
	#[serde(flatten)]
	pub signature: PermitSignature,
}

/// Unix timestamp `lifetime_seconds` after `now`.
pub fn deadline_from_now(now: i64, lifetime_seconds: u64) -> U256 {
	let now = u64::try_from(now).unwrap_or_default();
	U256::from(now.saturating_add(lifetime_seconds))
}

/// Reads token state and signs the configured permit.
///
/// `value` is required for EIP-2612. `deadline` defaults to
/// `permit.deadline_seconds` from now.
pub async fn sign_configured_permit(
	permit: &PermitConfig,
	signer: Arc<dyn TypedDataSigner>,
	reader: &dyn ContractStateReader,
	value: Option<U256>,
	deadline: Option<U256>,
) -> Result<SignedPermit, Box<dyn std::error::Error>> {
	let chain_id = match permit.chain_id {
		Some(chain_id) => chain_id,
		None => reader.chain_id().await?,
	};

	let client = PermitClient::new(PermitClientConfig {
		signer: Some(signer),
		chain_id: Some(chain_id),
		token: Some(permit.token),
		owner: permit.owner,
		spender: Some(permit.spender),
		permit_version: permit.version.clone(),
	});

	let owner = client
		.owner()
		.ok_or("No owner configured and the signer reports no account")?;
	let state = client
		.refresh(reader)
		.await?
		.ok_or("Token state could not be gathered")?;
	tracing::info!(
		token = %permit.token,
		%owner,
		name = %state.name,
		nonce = %state.nonce,
		version = %state.version,
		"Loaded token state"
	);

	let deadline = deadline.unwrap_or_else(|| {
		deadline_from_now(chrono::Utc::now().timestamp(), permit.deadline_seconds)
	});

	let (signature, value) = match permit.dialect {
		PermitDialect::Eip2612 => {
			let value = value.ok_or("--value is required for eip2612 permits")?;
			let bound = client.eip2612().await.ok_or("Permit client is not ready")?;
			(bound.sign(Eip2612Args::new(value, deadline)).await?, Some(value))
		},
		PermitDialect::Dai => {
			let bound = client.dai().await.ok_or("Permit client is not ready")?;
			(bound.sign(DaiArgs::new(deadline)).await?, None)
		},
	};

	Ok(SignedPermit {
		dialect: permit.dialect,
		token: permit.token,
		owner,
		spender: permit.spender,
		chain_id,
		nonce: state.nonce,
		deadline,
		value,
		signature,
	})
}
