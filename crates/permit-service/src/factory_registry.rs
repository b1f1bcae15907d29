//! Registry of signer and chain reader implementations.
//!
//! Maps the implementation names used in configuration to their factory
//! functions, so the binary can instantiate whatever `primary` names.

use permit_chain::{ContractStateReader, ReaderFactory};
use permit_config::{Config, ImplementationsConfig};
use permit_signer::{SignerFactory, TypedDataSigner};
use std::collections::HashMap;
use std::sync::OnceLock;

/// All known implementation factories, keyed by name.
pub struct FactoryRegistry {
	pub signer: HashMap<String, SignerFactory>,
	pub chain: HashMap<String, ReaderFactory>,
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self {
			signer: HashMap::new(),
			chain: HashMap::new(),
		}
	}

	pub fn register_signer(&mut self, name: impl Into<String>, factory: SignerFactory) {
		self.signer.insert(name.into(), factory);
	}

	pub fn register_chain(&mut self, name: impl Into<String>, factory: ReaderFactory) {
		self.chain.insert(name.into(), factory);
	}
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Returns the global registry, populating it on first use.
pub fn get_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in permit_signer::get_all_implementations() {
			tracing::debug!("Registering signer implementation: {}", name);
			registry.register_signer(name, factory);
		}

		for (name, factory) in permit_chain::get_all_implementations() {
			tracing::debug!("Registering chain implementation: {}", name);
			registry.register_chain(name, factory);
		}

		registry
	})
}

/// Looks up the factory for a section's primary implementation.
fn primary_factory<'a, F: Copy>(
	factories: &HashMap<String, F>,
	section: &'a ImplementationsConfig,
	kind: &str,
) -> Result<(F, &'a toml::Value), Box<dyn std::error::Error>> {
	let Some(factory) = factories.get(&section.primary) else {
		let mut available: Vec<_> = factories.keys().cloned().collect();
		available.sort();
		return Err(format!(
			"Unknown {} implementation '{}'. Available: [{}]",
			kind,
			section.primary,
			available.join(", ")
		)
		.into());
	};

	let config = section.primary_config().ok_or_else(|| {
		format!(
			"Missing configuration for {} implementation '{}'",
			kind, section.primary
		)
	})?;

	Ok((*factory, config))
}

/// Instantiates the configured signer.
pub fn build_signer(
	registry: &FactoryRegistry,
	config: &Config,
) -> Result<Box<dyn TypedDataSigner>, Box<dyn std::error::Error>> {
	let (factory, impl_config) = primary_factory(&registry.signer, &config.signer, "signer")?;
	tracing::info!(implementation = %config.signer.primary, "Creating signer");
	Ok(factory(impl_config)?)
}

/// Instantiates the configured chain reader.
pub fn build_reader(
	registry: &FactoryRegistry,
	config: &Config,
) -> Result<Box<dyn ContractStateReader>, Box<dyn std::error::Error>> {
	let (factory, impl_config) = primary_factory(&registry.chain, &config.chain, "chain")?;
	tracing::info!(implementation = %config.chain.primary, "Creating chain reader");
	Ok(factory(impl_config)?)
}
