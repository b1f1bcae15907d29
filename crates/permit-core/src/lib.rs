//! Core permit signing logic.
//!
//! This crate builds EIP-712 permit requests for the EIP-2612 and Dai
//! dialects, hands them to a [`TypedDataSigner`] and splits the result into
//! `(r, s, v)`. It owns no keys and submits nothing on-chain.
//!
//! The pure operations ([`sign_permit_2612`], [`sign_permit_dai`]) take a fully
//! populated parameter set. [`PermitClient`] composes them with
//! [`gather_context`] for callers that only know the token, spender and signer.
//!
//! [`TypedDataSigner`]: permit_signer::TypedDataSigner

use permit_chain::ChainError;
use permit_signer::SignerError;
use permit_types::SignatureError;
use thiserror::Error;

pub mod client;
pub mod context;
pub mod domain;
pub mod requester;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{
	BoundDai, BoundEip2612, DaiArgs, Eip2612Args, PermitClient, PermitClientConfig,
	PermitOverrides,
};
pub use context::{gather_context, TokenState};
pub use domain::{build_domain, build_domain_and_types, uses_salted_domain, POLYGON_CHAIN_ID};
pub use requester::{sign_permit, sign_permit_2612, sign_permit_dai, typed_data_for};
pub use version::{resolve_permit_version, DEFAULT_PERMIT_VERSION};

/// Errors that can occur while producing a permit signature.
///
/// Signer failures are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermitError {
	/// The signing capability failed or was rejected.
	#[error(transparent)]
	Signer(#[from] SignerError),
	/// The signing capability returned bytes that are not a signature.
	#[error("Malformed signature: {0}")]
	Signature(#[from] SignatureError),
	/// Reading token state failed.
	#[error("Token state unavailable: {0}")]
	State(#[from] ChainError),
}
