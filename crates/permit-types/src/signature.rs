//! Permit signature types.
//!
//! A permit is authorized by a 65-byte ECDSA signature laid out as
//! `r (32) || s (32) || v (1)`. Contracts consume the three components
//! separately, so the raw signer output is split here.

use crate::utils::without_0x_prefix;
use alloy_primitives::{hex, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length in bytes of a raw `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that can occur while decoding signer output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
	/// The signer returned something that is not hex.
	#[error("Invalid signature hex: {0}")]
	InvalidHex(String),
	/// The signer returned fewer bytes than `r || s || v` needs.
	#[error("Signature too short: expected at least 65 bytes, got {0}")]
	TooShort(usize),
}

/// A permit signature split into its three components.
///
/// `v` is the final signature byte as returned by the signer. Most signers
/// return 27 or 28; raw ECDSA signers may return the recovery id (0 or 1)
/// instead, see [`PermitSignature::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitSignature {
	pub r: B256,
	pub s: B256,
	pub v: u8,
}

impl PermitSignature {
	/// Splits a raw signature into `r` (bytes 0..32), `s` (32..64) and `v` (byte 64).
	///
	/// Bytes past the 65th are ignored.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
		if bytes.len() < SIGNATURE_LENGTH {
			return Err(SignatureError::TooShort(bytes.len()));
		}

		Ok(Self {
			r: B256::from_slice(&bytes[0..32]),
			s: B256::from_slice(&bytes[32..64]),
			v: bytes[64],
		})
	}

	/// Decodes a hex signature, with or without `0x` prefix.
	pub fn from_hex(signature: &str) -> Result<Self, SignatureError> {
		let bytes = hex::decode(without_0x_prefix(signature.trim()))
			.map_err(|e| SignatureError::InvalidHex(e.to_string()))?;
		Self::from_bytes(&bytes)
	}

	/// Returns a copy with a recovery-id style `v` (0 or 1) mapped to 27 or 28.
	///
	/// Any other `v` is left untouched.
	pub fn normalized(&self) -> Self {
		let v = match self.v {
			0 | 1 => self.v + 27,
			other => other,
		};
		Self { v, ..*self }
	}

	/// Reassembles the `r || s || v` byte layout.
	pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
		let mut out = [0u8; SIGNATURE_LENGTH];
		out[0..32].copy_from_slice(self.r.as_slice());
		out[32..64].copy_from_slice(self.s.as_slice());
		out[64] = self.v;
		out
	}
}
