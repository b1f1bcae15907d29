//! Configuration for the permit signing tool.
//!
//! Configuration is loaded from a TOML file. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; references are
//! resolved before parsing and the result is validated.

use permit_types::{Address, PermitDialect};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Default permit lifetime, in seconds from the moment of signing.
pub const DEFAULT_DEADLINE_SECONDS: u64 = 100_000;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// What to sign.
	pub permit: PermitConfig,
	/// Contract state reader used to look up name, nonce and version.
	pub chain: ImplementationsConfig,
	/// Typed-data signer.
	pub signer: ImplementationsConfig,
}

/// The permit to sign.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PermitConfig {
	/// Token contract implementing the permit extension.
	pub token: Address,
	/// Address receiving the allowance.
	pub spender: Address,
	/// Token owner. Falls back to the signer's account when unset.
	#[serde(default)]
	pub owner: Option<Address>,
	/// Chain the token lives on. Queried from the chain reader when unset.
	#[serde(default)]
	pub chain_id: Option<u64>,
	#[serde(default)]
	pub dialect: PermitDialect,
	/// Domain version override. The token's `version()` is used when unset.
	#[serde(default)]
	pub version: Option<String>,
	/// Permit lifetime in seconds.
	#[serde(default = "default_deadline_seconds")]
	pub deadline_seconds: u64,
}

fn default_deadline_seconds() -> u64 {
	DEFAULT_DEADLINE_SECONDS
}

/// A named set of implementation configs plus the one to use.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImplementationsConfig {
	/// Which implementation to instantiate.
	pub primary: String,
	/// Map of implementation names to their raw configuration.
	#[serde(default)]
	pub implementations: HashMap<String, toml::Value>,
}

impl ImplementationsConfig {
	/// Configuration of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}

	fn validate(&self, section: &str) -> Result<(), ConfigError> {
		if self.primary.is_empty() {
			return Err(ConfigError::Validation(format!(
				"{}.primary cannot be empty",
				section
			)));
		}
		if !self.implementations.contains_key(&self.primary) {
			return Err(ConfigError::Validation(format!(
				"Primary {} implementation '{}' not found in {}.implementations",
				section, self.primary, section
			)));
		}
		Ok(())
	}
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the variable's value and `${VAR_NAME:-default}`
/// with the value or the default when the variable is not set.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// Environment variables are resolved and the result is validated.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Checks that the configuration is usable.
	///
	/// - Both implementation sections name a primary that is configured
	/// - `deadline_seconds` is positive
	/// - A configured version or chain id is not empty or zero
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.chain.validate("chain")?;
		self.signer.validate("signer")?;

		if self.permit.deadline_seconds == 0 {
			return Err(ConfigError::Validation(
				"permit.deadline_seconds must be greater than 0".into(),
			));
		}

		if matches!(self.permit.version.as_deref(), Some(v) if v.trim().is_empty()) {
			return Err(ConfigError::Validation(
				"permit.version cannot be empty when set".into(),
			));
		}

		if self.permit.chain_id == Some(0) {
			return Err(ConfigError::Validation(
				"permit.chain_id must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const MINIMAL: &str = r#"
[permit]
token = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
spender = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"

[chain]
primary = "alloy"
[chain.implementations.alloy]
rpc_url = "http://localhost:8545"

[signer]
primary = "json_rpc"
[signer.implementations.json_rpc]
url = "http://localhost:8545"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("PERMIT_TEST_HOST", "localhost");
		std::env::set_var("PERMIT_TEST_PORT", "8545");

		let input = "url = \"http://${PERMIT_TEST_HOST}:${PERMIT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");

		std::env::remove_var("PERMIT_TEST_HOST");
		std::env::remove_var("PERMIT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${PERMIT_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${PERMIT_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("PERMIT_MISSING_VAR"));
	}

	#[test]
	fn test_text_without_references_is_unchanged() {
		let input = "a = \"$HOME\"\nb = \"{x}\"";
		assert_eq!(resolve_env_vars(input).unwrap(), input);
	}

	#[test]
	fn test_defaults() {
		let config: Config = MINIMAL.parse().unwrap();

		assert_eq!(config.permit.dialect, PermitDialect::Eip2612);
		assert_eq!(config.permit.deadline_seconds, DEFAULT_DEADLINE_SECONDS);
		assert_eq!(config.permit.owner, None);
		assert_eq!(config.permit.chain_id, None);
		assert_eq!(config.permit.version, None);
		assert_eq!(
			config.chain.primary_config().unwrap()["rpc_url"].as_str(),
			Some("http://localhost:8545")
		);
	}

	#[test]
	fn test_full_permit_section() {
		std::env::set_var("PERMIT_TEST_OWNER", "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

		let config_str = MINIMAL.replace(
			"[chain]",
			r#"owner = "${PERMIT_TEST_OWNER}"
chain_id = 137
dialect = "dai"
version = "2"
deadline_seconds = 600

[chain]"#,
		);
		let config: Config = config_str.parse().unwrap();

		assert_eq!(
			config.permit.owner,
			Some(
				"0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
					.parse::<Address>()
					.unwrap()
			)
		);
		assert_eq!(config.permit.chain_id, Some(137));
		assert_eq!(config.permit.dialect, PermitDialect::Dai);
		assert_eq!(config.permit.version.as_deref(), Some("2"));
		assert_eq!(config.permit.deadline_seconds, 600);

		std::env::remove_var("PERMIT_TEST_OWNER");
	}

	#[test]
	fn test_unknown_primary_fails_validation() {
		let config_str = MINIMAL.replace("primary = \"json_rpc\"", "primary = \"ledger\"");
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("ledger")));
	}

	#[test]
	fn test_zero_deadline_fails_validation() {
		let config_str = MINIMAL.replace("[chain]", "deadline_seconds = 0\n\n[chain]");
		assert!(matches!(
			config_str.parse::<Config>(),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_invalid_address_is_parse_error() {
		let config_str = MINIMAL.replace(
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
			"0x1234",
		);
		assert!(matches!(
			config_str.parse::<Config>(),
			Err(ConfigError::Parse(_))
		));
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(MINIMAL.as_bytes()).unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.signer.primary, "json_rpc");
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.toml");

		let err = Config::from_file(path.to_str().unwrap()).await.unwrap_err();
		assert!(matches!(err, ConfigError::Io(_)));
	}
}
