//! Utility functions for EIP-712 encoding and hex string handling.

pub mod eip712;
pub mod formatting;

pub use eip712::{
	compute_final_digest, compute_type_hash, Eip712AbiEncoder, DOMAIN_PRIMARY_TYPE,
	PERMIT_PRIMARY_TYPE,
};
pub use formatting::{truncate_hex, without_0x_prefix};
