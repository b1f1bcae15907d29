//! Command-line entry point for permit signing.
//!
//! Loads the configuration, reads the token's name, nonce and version over
//! the configured chain reader, asks the configured signer for an EIP-712
//! permit signature and prints the result as JSON.

use clap::Parser;
use permit_config::Config;
use permit_types::U256;
use std::path::PathBuf;
use std::sync::Arc;

mod factory_registry;
mod signing;

/// Command-line arguments for the permit tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Amount to approve, decimal or 0x-prefixed hex (EIP-2612 only)
	#[arg(long, value_parser = parse_u256)]
	value: Option<U256>,

	/// Unix timestamp after which the permit expires.
	/// Defaults to `permit.deadline_seconds` from now.
	#[arg(long, value_parser = parse_u256)]
	deadline: Option<U256>,
}

fn parse_u256(s: &str) -> Result<U256, String> {
	s.parse::<U256>()
		.map_err(|e| format!("invalid uint256 '{}': {}", s, e))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Logs go to stderr so stdout carries only the signature.
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Invalid config path: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!(
		token = %config.permit.token,
		dialect = %config.permit.dialect,
		"Loaded configuration"
	);

	let registry = factory_registry::get_registry();
	let signer: Arc<dyn permit_signer::TypedDataSigner> =
		Arc::from(factory_registry::build_signer(registry, &config)?);
	let reader = factory_registry::build_reader(registry, &config)?;

	let signed = signing::sign_configured_permit(
		&config.permit,
		signer,
		reader.as_ref(),
		args.value,
		args.deadline,
	)
	.await?;

	println!("{}", serde_json::to_string_pretty(&signed)?);
	Ok(())
}
