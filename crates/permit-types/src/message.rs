//! Permit messages for both dialects.

use crate::dialect::PermitDialect;
use crate::utils::{compute_type_hash, Eip712AbiEncoder, PERMIT_PRIMARY_TYPE};
use alloy_primitives::{keccak256, Address, B256, U256};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The `Permit` struct value that gets signed.
///
/// `uint256` members serialize as decimal strings so JSON consumers do not
/// lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermitMessage {
	Eip2612 {
		owner: Address,
		spender: Address,
		value: U256,
		nonce: U256,
		deadline: U256,
	},
	Dai {
		holder: Address,
		spender: Address,
		nonce: U256,
		expiry: U256,
		allowed: bool,
	},
}

impl PermitMessage {
	pub fn dialect(&self) -> PermitDialect {
		match self {
			PermitMessage::Eip2612 { .. } => PermitDialect::Eip2612,
			PermitMessage::Dai { .. } => PermitDialect::Dai,
		}
	}

	/// Member names in the order they are signed.
	pub fn field_names(&self) -> Vec<&'static str> {
		self.dialect().schema().field_names()
	}

	/// hashStruct(message) for the dialect's `Permit` type.
	pub fn struct_hash(&self) -> B256 {
		let encoded_type = self.dialect().schema().encode_type(PERMIT_PRIMARY_TYPE);
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&compute_type_hash(&encoded_type));
		match self {
			PermitMessage::Eip2612 {
				owner,
				spender,
				value,
				nonce,
				deadline,
			} => {
				enc.push_address(owner);
				enc.push_address(spender);
				enc.push_u256(*value);
				enc.push_u256(*nonce);
				enc.push_u256(*deadline);
			},
			PermitMessage::Dai {
				holder,
				spender,
				nonce,
				expiry,
				allowed,
			} => {
				enc.push_address(holder);
				enc.push_address(spender);
				enc.push_u256(*nonce);
				enc.push_u256(*expiry);
				enc.push_bool(*allowed);
			},
		}
		keccak256(enc.finish())
	}
}

impl Serialize for PermitMessage {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(5))?;
		match self {
			PermitMessage::Eip2612 {
				owner,
				spender,
				value,
				nonce,
				deadline,
			} => {
				map.serialize_entry("owner", owner)?;
				map.serialize_entry("spender", spender)?;
				map.serialize_entry("value", &value.to_string())?;
				map.serialize_entry("nonce", &nonce.to_string())?;
				map.serialize_entry("deadline", &deadline.to_string())?;
			},
			PermitMessage::Dai {
				holder,
				spender,
				nonce,
				expiry,
				allowed,
			} => {
				map.serialize_entry("holder", holder)?;
				map.serialize_entry("spender", spender)?;
				map.serialize_entry("nonce", &nonce.to_string())?;
				map.serialize_entry("expiry", &expiry.to_string())?;
				map.serialize_entry("allowed", allowed)?;
			},
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;
	use alloy_sol_types::SolStruct;

	mod eip2612 {
		alloy_sol_types::sol! {
			struct Permit {
				address owner;
				address spender;
				uint256 value;
				uint256 nonce;
				uint256 deadline;
			}
		}
	}

	mod dai {
		alloy_sol_types::sol! {
			struct Permit {
				address holder;
				address spender;
				uint256 nonce;
				uint256 expiry;
				bool allowed;
			}
		}
	}

	const OWNER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
	const SPENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

	#[test]
	fn test_eip2612_struct_hash_matches_alloy() {
		let message = PermitMessage::Eip2612 {
			owner: OWNER,
			spender: SPENDER,
			value: U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64)),
			nonce: U256::ZERO,
			deadline: U256::from(1_700_000_000u64),
		};
		let expected = eip2612::Permit {
			owner: OWNER,
			spender: SPENDER,
			value: U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64)),
			nonce: U256::ZERO,
			deadline: U256::from(1_700_000_000u64),
		}
		.eip712_hash_struct();

		assert_eq!(message.struct_hash(), expected);
	}

	#[test]
	fn test_dai_struct_hash_matches_alloy() {
		let message = PermitMessage::Dai {
			holder: OWNER,
			spender: SPENDER,
			nonce: U256::from(3u64),
			expiry: U256::from(1_700_000_000u64),
			allowed: true,
		};
		let expected = dai::Permit {
			holder: OWNER,
			spender: SPENDER,
			nonce: U256::from(3u64),
			expiry: U256::from(1_700_000_000u64),
			allowed: true,
		}
		.eip712_hash_struct();

		assert_eq!(message.struct_hash(), expected);
	}

	#[test]
	fn test_eip2612_serialized_keys() {
		let message = PermitMessage::Eip2612 {
			owner: OWNER,
			spender: SPENDER,
			value: U256::from(1u64),
			nonce: U256::ZERO,
			deadline: U256::from(9u64),
		};
		let json = serde_json::to_value(&message).unwrap();
		let object = json.as_object().unwrap();

		let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
		keys.sort_unstable();
		assert_eq!(keys, vec!["deadline", "nonce", "owner", "spender", "value"]);
		assert_eq!(json["owner"], serde_json::to_value(OWNER).unwrap());
		assert_eq!(json["spender"], serde_json::to_value(SPENDER).unwrap());
		assert_eq!(json["value"], "1");
		assert_eq!(json["nonce"], "0");
		assert_eq!(json["deadline"], "9");
	}

	#[test]
	fn test_serialized_keys_follow_dialect() {
		let message = PermitMessage::Dai {
			holder: OWNER,
			spender: SPENDER,
			nonce: U256::from(7u64),
			expiry: U256::from(99u64),
			allowed: true,
		};
		let json = serde_json::to_value(&message).unwrap();
		let object = json.as_object().unwrap();

		let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
		keys.sort_unstable();
		assert_eq!(keys, vec!["allowed", "expiry", "holder", "nonce", "spender"]);
		assert_eq!(json["nonce"], "7");
		assert_eq!(json["allowed"], true);
		assert_eq!(
			message.field_names(),
			vec!["holder", "spender", "nonce", "expiry", "allowed"]
		);
	}
}
