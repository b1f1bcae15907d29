//! Permit dialects and their EIP-712 type schemas.
//!
//! Two incompatible `Permit` structs exist in the wild. Both share the primary
//! type name, so the field list is the only thing that tells them apart and
//! its order is part of the signed type hash.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `{ name, type }` member of an EIP-712 struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeField {
	pub name: &'static str,
	#[serde(rename = "type")]
	pub kind: &'static str,
}

impl TypeField {
	pub const fn new(name: &'static str, kind: &'static str) -> Self {
		Self { name, kind }
	}
}

/// EIP-2612 `Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)`.
pub const EIP2612_PERMIT_FIELDS: [TypeField; 5] = [
	TypeField::new("owner", "address"),
	TypeField::new("spender", "address"),
	TypeField::new("value", "uint256"),
	TypeField::new("nonce", "uint256"),
	TypeField::new("deadline", "uint256"),
];

/// Dai `Permit(address holder,address spender,uint256 nonce,uint256 expiry,bool allowed)`.
pub const DAI_PERMIT_FIELDS: [TypeField; 5] = [
	TypeField::new("holder", "address"),
	TypeField::new("spender", "address"),
	TypeField::new("nonce", "uint256"),
	TypeField::new("expiry", "uint256"),
	TypeField::new("allowed", "bool"),
];

/// Ordered field list of an EIP-712 struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeSchema(Vec<TypeField>);

impl TypeSchema {
	pub fn new(fields: Vec<TypeField>) -> Self {
		Self(fields)
	}

	pub fn fields(&self) -> &[TypeField] {
		&self.0
	}

	/// Field names in declaration order.
	pub fn field_names(&self) -> Vec<&'static str> {
		self.0.iter().map(|f| f.name).collect()
	}

	/// Encodes the struct type, e.g. `Permit(address owner,address spender)`.
	pub fn encode_type(&self, primary_type: &str) -> String {
		let members = self
			.0
			.iter()
			.map(|f| format!("{} {}", f.kind, f.name))
			.collect::<Vec<_>>()
			.join(",");
		format!("{}({})", primary_type, members)
	}
}

/// Permit flavour implemented by a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitDialect {
	/// EIP-2612 `permit(owner, spender, value, deadline, v, r, s)`.
	#[default]
	Eip2612,
	/// Dai-style `permit(holder, spender, nonce, expiry, allowed, v, r, s)`.
	Dai,
}

impl PermitDialect {
	/// Type schema of this dialect's `Permit` struct.
	pub fn schema(&self) -> TypeSchema {
		match self {
			PermitDialect::Eip2612 => TypeSchema::new(EIP2612_PERMIT_FIELDS.to_vec()),
			PermitDialect::Dai => TypeSchema::new(DAI_PERMIT_FIELDS.to_vec()),
		}
	}
}

impl fmt::Display for PermitDialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PermitDialect::Eip2612 => write!(f, "eip2612"),
			PermitDialect::Dai => write!(f, "dai"),
		}
	}
}
