//! Chain registry loading from TOML with environment overrides
//!
//! File layout, one table per chain id:
//!
//! ```toml
//! [chains.4242]
//! factory = "0x..."
//! init_code_hash = "0x..."
//! router = "0x..."
//!
//! [chains.4242.wrapped_native]
//! address = "0x..."
//! decimals = 18
//! symbol = "WETH"
//! name = "Wrapped Ether"
//! ```
//!
//! Any field can be overridden with `PAIRSWAP__CHAINS__<id>__<FIELD>`.

use config_crate::{Config, Environment, File, FileFormat};
use pairswap_types::{Address, ChainId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::chains::{ChainConfig, ChainRegistry};
use crate::error::{ConfigError, Result};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PAIRSWAP";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    chains: BTreeMap<String, ChainConfig>,
}

impl RegistryFile {
    fn into_registry(self) -> Result<ChainRegistry> {
        let mut registry = ChainRegistry::empty();
        for (key, config) in self.chains {
            let chain_id = key
                .trim()
                .parse::<u64>()
                .map(ChainId)
                .map_err(|_| ConfigError::InvalidEntry {
                    chain: key.clone(),
                    reason: "chain id must be an unsigned integer".to_string(),
                })?;
            validate_entry(&key, &config)?;
            debug!(chain = %chain_id, factory = %config.factory, "Registered chain");
            registry.insert(chain_id, config);
        }
        Ok(registry)
    }
}

fn validate_entry(key: &str, config: &ChainConfig) -> Result<()> {
    let zero_fields = [
        ("factory", config.factory),
        ("router", config.router),
        ("wrapped_native.address", config.wrapped_native.address),
    ];
    for (field, address) in zero_fields {
        if address == Address::ZERO {
            return Err(ConfigError::InvalidEntry {
                chain: key.to_string(),
                reason: format!("{field} is the zero address"),
            });
        }
    }
    Ok(())
}

impl ChainRegistry {
    /// Parse chain entries from TOML text, without built-ins
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: RegistryFile =
            toml::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))?;
        file.into_registry()
    }

    /// Render the registry in the file layout accepted by [`ChainRegistry::load`]
    pub fn to_toml_string(&self) -> Result<String> {
        let file = RegistryFile {
            chains: self
                .iter()
                .map(|(id, config)| (id.to_string(), config.clone()))
                .collect(),
        };
        toml::to_string(&file).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Built-in chains overlaid with a TOML file and `PAIRSWAP__` environment variables
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let file: RegistryFile = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        let loaded = file.into_registry()?;

        info!(
            path = %path.display(),
            chains = loaded.chain_ids().len(),
            "Loaded chain configuration"
        );
        Ok(ChainRegistry::builtin().merge(loaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_CHAIN: &str = r#"
        [chains.4242]
        factory = "0x1000000000000000000000000000000000000001"
        init_code_hash = "0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f"
        router = "0x2000000000000000000000000000000000000002"

        [chains.4242.wrapped_native]
        address = "0x3000000000000000000000000000000000000003"
        decimals = 18
        symbol = "WCST"
        name = "Wrapped Custom"
    "#;

    #[test]
    fn test_from_toml_str() {
        let registry = ChainRegistry::from_toml_str(CUSTOM_CHAIN).unwrap();
        assert_eq!(registry.chain_ids(), vec![ChainId(4242)]);

        let token = registry.wrapped_native(ChainId(4242)).unwrap();
        assert_eq!(token.symbol.as_deref(), Some("WCST"));
        assert_eq!(token.name.as_deref(), Some("Wrapped Custom"));
    }

    #[test]
    fn test_rejects_non_numeric_chain_key() {
        let text = CUSTOM_CHAIN.replace("4242", "mainnet");
        assert!(matches!(
            ChainRegistry::from_toml_str(&text),
            Err(ConfigError::InvalidEntry { chain, .. }) if chain == "mainnet"
        ));
    }

    #[test]
    fn test_rejects_zero_factory() {
        let text = CUSTOM_CHAIN.replace(
            "0x1000000000000000000000000000000000000001",
            "0x0000000000000000000000000000000000000000",
        );
        assert!(matches!(
            ChainRegistry::from_toml_str(&text),
            Err(ConfigError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_malformed_address_is_load_error() {
        let text = CUSTOM_CHAIN.replace("0x2000000000000000000000000000000000000002", "0x1234");
        assert!(matches!(
            ChainRegistry::from_toml_str(&text),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip_of_builtins() {
        let builtin = ChainRegistry::builtin();
        let text = builtin.to_toml_string().unwrap();
        assert_eq!(ChainRegistry::from_toml_str(&text).unwrap(), builtin);
    }
}
