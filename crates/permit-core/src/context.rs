//! Gathering token state for a permit.
//!
//! Collects the on-chain values a permit depends on in one async step, so the
//! signing functions themselves stay pure.

use crate::version::resolve_permit_version;
use crate::PermitError;
use permit_chain::ContractStateReader;
use permit_types::{Address, U256};

/// Token values a permit request is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
	/// The token's `name()`.
	pub name: String,
	/// The owner's current permit nonce.
	pub nonce: U256,
	/// Resolved domain version.
	pub version: String,
}

/// Reads name, nonce and version for `owner` on `token`.
///
/// `explicit_version` takes priority over the token's `version()`. A failing
/// `version()` query falls back to the default instead of failing the whole
/// step; `name()` and `nonces()` failures are returned.
pub async fn gather_context(
	reader: &dyn ContractStateReader,
	token: Address,
	owner: Address,
	explicit_version: Option<&str>,
) -> Result<TokenState, PermitError> {
	let name = reader.name(token).await?;
	let nonce = reader.nonces(token, owner).await?;

	let on_chain_version = match explicit_version {
		Some(_) => None,
		None => reader.version(token).await.unwrap_or_else(|e| {
			tracing::warn!(%token, error = %e, "Failed to read version(), using default");
			None
		}),
	};
	let version = resolve_permit_version(explicit_version, on_chain_version.as_deref());

	tracing::debug!(%token, %owner, %name, %nonce, %version, "Gathered token state");

	Ok(TokenState {
		name,
		nonce,
		version,
	})
}
