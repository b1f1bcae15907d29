//! Generic EIP-712 utilities shared by the permit crates.
//!
//! These helpers provide:
//! - Type hash computation from encoded type strings
//! - Final digest computation (0x1901 || domainHash || structHash)
//! - A minimal ABI encoder for the static field types permits use

use alloy_primitives::{keccak256, Address as AlloyAddress, B256, U256};

/// Primary type name shared by both permit dialects.
pub const PERMIT_PRIMARY_TYPE: &str = "Permit";
/// Type name reserved by EIP-712 for the domain struct.
pub const DOMAIN_PRIMARY_TYPE: &str = "EIP712Domain";

/// Hash an encoded type string such as `Permit(address owner,...)`.
pub fn compute_type_hash(encoded_type: &str) -> B256 {
	keccak256(encoded_type.as_bytes())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainHash || structHash).
pub fn compute_final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &AlloyAddress) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u64(&mut self, v: u64) {
		self.push_u256(U256::from(v));
	}

	pub fn push_bool(&mut self, v: bool) {
		let mut word = [0u8; 32];
		word[31] = v as u8;
		self.buf.extend_from_slice(&word);
	}

	/// Dynamic `string` members are encoded as the hash of their UTF-8 bytes.
	pub fn push_str_hash(&mut self, s: &str) {
		self.push_b256(&keccak256(s.as_bytes()));
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}
