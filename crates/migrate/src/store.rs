//! Persistent records of confirmed deployments.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Deployment;

/// The default name of the deployment records file.
pub const DEPLOYMENTS_FILENAME: &str = "deployments.json";

/// Deployed contract addresses, grouped by network then by contract name.
///
/// Saved to `{outdata}/deployments.json` after each successful deployment so that
/// later migration steps can look up what was deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentStore {
    networks: BTreeMap<String, BTreeMap<String, Deployment>>,
}

impl DeploymentStore {
    /// Record a deployment, replacing any previous record of the same contract on the
    /// same network.
    pub fn record(&mut self, deployment: Deployment) -> Option<Deployment> {
        self.networks
            .entry(deployment.network.clone())
            .or_default()
            .insert(deployment.contract_name.clone(), deployment)
    }

    /// Get the latest deployment of a contract on a network.
    pub fn get(&self, network: &str, contract_name: &str) -> Option<&Deployment> {
        self.networks.get(network)?.get(contract_name)
    }

    /// All deployments recorded on a network, ordered by contract name.
    pub fn network(&self, network: &str) -> impl Iterator<Item = &Deployment> {
        self.networks.get(network).into_iter().flat_map(|c| c.values())
    }

    /// Save the records to a file as formatted JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create deployment records directory {}",
                parent.display()
            ))?;
        }

        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize deployment records")?;

        std::fs::write(path, json).context(format!(
            "Failed to write deployment records to {}",
            path.display()
        ))?;

        tracing::debug!(path = %path.display(), "Deployment records saved");
        Ok(())
    }

    /// Load the records from a file.
    ///
    /// Returns an error if the file doesn't exist, is malformed, or cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Deployment records file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path).context(format!(
            "Failed to read deployment records from {}",
            path.display()
        ))?;

        serde_json::from_str(&content).context(format!(
            "Failed to parse deployment records from {}",
            path.display()
        ))
    }

    /// Load the records from a file, starting empty if it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The records file inside an output data directory.
    pub fn path_in(outdata: &Path) -> PathBuf {
        outdata.join(DEPLOYMENTS_FILENAME)
    }
}
