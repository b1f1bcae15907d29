//! EIP-712 domain for permit signatures.

use crate::dialect::TypeField;
use crate::utils::{compute_type_hash, Eip712AbiEncoder, DOMAIN_PRIMARY_TYPE};
use alloy_primitives::{keccak256, Address, B256};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// How a domain is bound to a network.
///
/// Standard tokens carry `chainId`. A few bridged deployments instead sign
/// over a `salt` holding the chain id, so a domain has exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainBinding {
	ChainId(u64),
	Salt(B256),
}

/// The `EIP712Domain` a token verifies permits against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedDataDomain {
	pub name: String,
	pub version: String,
	pub verifying_contract: Address,
	pub binding: DomainBinding,
}

impl TypedDataDomain {
	pub fn chain_id(&self) -> Option<u64> {
		match self.binding {
			DomainBinding::ChainId(id) => Some(id),
			DomainBinding::Salt(_) => None,
		}
	}

	pub fn salt(&self) -> Option<B256> {
		match self.binding {
			DomainBinding::Salt(salt) => Some(salt),
			DomainBinding::ChainId(_) => None,
		}
	}

	/// Members of the `EIP712Domain` struct, in canonical order.
	pub fn type_fields(&self) -> Vec<TypeField> {
		let mut fields = vec![
			TypeField::new("name", "string"),
			TypeField::new("version", "string"),
		];
		match self.binding {
			DomainBinding::ChainId(_) => {
				fields.push(TypeField::new("chainId", "uint256"));
				fields.push(TypeField::new("verifyingContract", "address"));
			},
			DomainBinding::Salt(_) => {
				fields.push(TypeField::new("verifyingContract", "address"));
				fields.push(TypeField::new("salt", "bytes32"));
			},
		}
		fields
	}

	pub fn encode_type(&self) -> String {
		let members = self
			.type_fields()
			.iter()
			.map(|f| format!("{} {}", f.kind, f.name))
			.collect::<Vec<_>>()
			.join(",");
		format!("{}({})", DOMAIN_PRIMARY_TYPE, members)
	}

	/// Domain separator: keccak256(abi.encode(typeHash, nameHash, versionHash, ...)).
	pub fn separator(&self) -> B256 {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&compute_type_hash(&self.encode_type()));
		enc.push_str_hash(&self.name);
		enc.push_str_hash(&self.version);
		match self.binding {
			DomainBinding::ChainId(chain_id) => {
				enc.push_u64(chain_id);
				enc.push_address(&self.verifying_contract);
			},
			DomainBinding::Salt(salt) => {
				enc.push_address(&self.verifying_contract);
				enc.push_b256(&salt);
			},
		}
		keccak256(enc.finish())
	}
}

impl Serialize for TypedDataDomain {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(4))?;
		map.serialize_entry("name", &self.name)?;
		map.serialize_entry("version", &self.version)?;
		match self.binding {
			DomainBinding::ChainId(chain_id) => {
				map.serialize_entry("chainId", &chain_id)?;
				map.serialize_entry("verifyingContract", &self.verifying_contract)?;
			},
			DomainBinding::Salt(salt) => {
				map.serialize_entry("verifyingContract", &self.verifying_contract)?;
				map.serialize_entry("salt", &salt)?;
			},
		}
		map.end()
	}
}
