//! Layered loading of the migration configuration.

use std::path::Path;

use aim_migrate::MigrateConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// Prefix of the environment variables overriding configuration keys.
///
/// Nested keys are separated by `__`, e.g. `AIM_NETWORKS__ROPSTEN__URL`.
const ENV_PREFIX: &str = "AIM_";

fn figment(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(MigrateConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the configuration: built-in defaults, then the TOML file (if it exists),
/// then `AIM_*` environment variables.
pub fn load(path: &Path) -> Result<MigrateConfig> {
    let config: MigrateConfig = figment(path)
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        networks = ?config.networks.keys().collect::<Vec<_>>(),
        "Configuration loaded"
    );

    Ok(config)
}
