//! Migration configuration.

use std::{collections::BTreeMap, path::PathBuf};

use alloy_core::primitives::Address;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DEVELOPMENT_NETWORK, Network};

/// The default name for the migration configuration file.
pub const MIGRATE_CONF_FILENAME: &str = "Migrate.toml";

/// Default JSON-RPC endpoint of the development network.
pub const DEFAULT_DEVELOPMENT_URL: &str = "http://127.0.0.1:8545/";

/// Connection and signer defaults for one named network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the network.
    pub url: Url,
    /// Default sender used when a deployment carries no explicit `from`.
    ///
    /// When unset, the first account reported by the node is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Gas limit for deployment transactions (node estimate when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price in wei (node default when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
}

impl NetworkConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            from: None,
            gas: None,
            gas_price: None,
        }
    }
}

/// Top-level configuration, usually loaded from `Migrate.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Directory holding the compiled contract artifacts.
    pub build_dir: PathBuf,
    /// Directory where deployment records are written.
    pub outdata: PathBuf,
    /// Known networks, keyed by the label passed to the runner.
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            DEVELOPMENT_NETWORK.to_string(),
            NetworkConfig::new(
                Url::parse(DEFAULT_DEVELOPMENT_URL).expect("default development URL is valid"),
            ),
        );

        Self {
            build_dir: PathBuf::from("build/contracts"),
            outdata: PathBuf::from("data"),
            networks,
        }
    }
}

impl MigrateConfig {
    /// Look up the configuration of the selected network.
    pub fn network(&self, network: &Network) -> Result<&NetworkConfig> {
        self.networks.get(network.as_str()).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown network '{}'. Configured networks: {}",
                network,
                self.networks
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}
