//! Common types for the permit signing crates.
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: permit dialects and their EIP-712 schemas, the typed-data domain,
//! permit messages, sign requests and the decoded signature.

/// Permit dialects and their type schemas.
pub mod dialect;
/// EIP-712 domain construction and hashing.
pub mod domain;
/// Permit message values.
pub mod message;
/// Implementation registry trait.
pub mod registry;
/// Sign request and typed-data payload types.
pub mod request;
/// Decoded permit signatures.
pub mod signature;
/// EIP-712 encoding and hex helpers.
pub mod utils;

pub use dialect::{PermitDialect, TypeField, TypeSchema, DAI_PERMIT_FIELDS, EIP2612_PERMIT_FIELDS};
pub use domain::{DomainBinding, TypedDataDomain};
pub use message::PermitMessage;
pub use registry::ImplementationRegistry;
pub use request::{Eip2612Params, PermitParams, SignRequest, TypedDataRequest};
pub use signature::{PermitSignature, SignatureError, SIGNATURE_LENGTH};
pub use utils::{truncate_hex, without_0x_prefix};

// Re-exported so downstream crates agree on primitive versions.
pub use alloy_primitives::{Address, B256, U256};
