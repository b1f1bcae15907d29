//! Sign request types.
//!
//! A [`SignRequest`] carries everything needed to produce one permit
//! signature. It is turned into a [`TypedDataRequest`], the exact payload the
//! signing capability receives.

use crate::dialect::{PermitDialect, TypeSchema};
use crate::domain::TypedDataDomain;
use crate::message::PermitMessage;
use crate::utils::{compute_final_digest, DOMAIN_PRIMARY_TYPE};
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Parameters shared by both permit dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitParams {
	/// Address of the token to approve.
	pub token: Address,
	/// The token's on-chain `name()`. Must match byte for byte, otherwise the
	/// contract rejects the signature.
	pub token_name: String,
	/// Owner (holder) of the tokens and the account that signs.
	pub owner: Address,
	/// Address receiving the allowance.
	pub spender: Address,
	/// Chain the token is deployed on.
	pub chain_id: u64,
	/// Domain version. `None` means `"1"`.
	#[serde(default)]
	pub permit_version: Option<String>,
	/// Unix timestamp in seconds after which the permit is invalid
	/// (`deadline` for EIP-2612, `expiry` for Dai).
	pub deadline: U256,
	/// The owner's current permit nonce on the token.
	pub nonce: U256,
}

/// EIP-2612 parameters: the shared set plus the approved amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip2612Params {
	#[serde(flatten)]
	pub permit: PermitParams,
	/// Amount to approve.
	pub value: U256,
}

/// One permit to sign, in either dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignRequest {
	Eip2612(Eip2612Params),
	Dai(PermitParams),
}

impl SignRequest {
	pub fn dialect(&self) -> PermitDialect {
		match self {
			SignRequest::Eip2612(_) => PermitDialect::Eip2612,
			SignRequest::Dai(_) => PermitDialect::Dai,
		}
	}

	pub fn params(&self) -> &PermitParams {
		match self {
			SignRequest::Eip2612(params) => &params.permit,
			SignRequest::Dai(params) => params,
		}
	}
}

/// The payload handed to a signing capability:
/// `{ account, domain, primaryType, types, message }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataRequest {
	/// Account expected to produce the signature.
	pub account: Address,
	pub domain: TypedDataDomain,
	pub primary_type: String,
	pub types: TypeSchema,
	pub message: PermitMessage,
}

impl TypedDataRequest {
	/// The digest a signer ends up signing.
	pub fn signing_hash(&self) -> B256 {
		compute_final_digest(&self.domain.separator(), &self.message.struct_hash())
	}

	/// Typed data in the `eth_signTypedData_v4` JSON shape.
	///
	/// The `EIP712Domain` type entry is derived from the fields the domain
	/// actually carries.
	pub fn to_eip712_json(&self) -> serde_json::Value {
		let mut types = serde_json::Map::new();
		types.insert(
			DOMAIN_PRIMARY_TYPE.to_string(),
			serde_json::json!(self.domain.type_fields()),
		);
		types.insert(self.primary_type.clone(), serde_json::json!(self.types));

		serde_json::json!({
			"types": types,
			"primaryType": self.primary_type,
			"domain": self.domain,
			"message": self.message,
		})
	}
}
