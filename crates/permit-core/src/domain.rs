//! EIP-712 domain builder.
//!
//! Produces the domain and type schema a token checks permits against.

use crate::version::DEFAULT_PERMIT_VERSION;
use permit_types::{
	Address, DomainBinding, PermitDialect, PermitParams, TypeSchema, TypedDataDomain, B256, U256,
};

/// Polygon PoS chain id.
pub const POLYGON_CHAIN_ID: u64 = 137;
/// On-chain name of bridged USDC on Polygon PoS.
pub const POLYGON_USDC_NAME: &str = "USD Coin (PoS)";

/// Whether the token's domain carries a `salt` instead of `chainId`.
///
/// Only bridged USDC on Polygon is deployed this way. Both the chain id and
/// the exact name must match.
pub fn uses_salted_domain(chain_id: u64, token_name: &str) -> bool {
	chain_id == POLYGON_CHAIN_ID && token_name == POLYGON_USDC_NAME
}

/// The chain id as a 32-byte big-endian word.
pub fn chain_id_salt(chain_id: u64) -> B256 {
	B256::from(U256::from(chain_id).to_be_bytes::<32>())
}

/// Builds the EIP-712 domain for a token.
///
/// Dai-style permits on Polygon USDC use a salted domain; every other
/// combination binds the domain to `chainId`. A missing version means `"1"`.
pub fn build_domain(
	dialect: PermitDialect,
	token: Address,
	token_name: &str,
	chain_id: u64,
	permit_version: Option<&str>,
) -> TypedDataDomain {
	let binding = if dialect == PermitDialect::Dai && uses_salted_domain(chain_id, token_name) {
		DomainBinding::Salt(chain_id_salt(chain_id))
	} else {
		DomainBinding::ChainId(chain_id)
	};

	TypedDataDomain {
		name: token_name.to_string(),
		version: permit_version.unwrap_or(DEFAULT_PERMIT_VERSION).to_string(),
		verifying_contract: token,
		binding,
	}
}

/// Domain and `Permit` type schema for the given dialect.
pub fn build_domain_and_types(
	dialect: PermitDialect,
	params: &PermitParams,
) -> (TypedDataDomain, TypeSchema) {
	let domain = build_domain(
		dialect,
		params.token,
		&params.token_name,
		params.chain_id,
		params.permit_version.as_deref(),
	);
	(domain, dialect.schema())
}
