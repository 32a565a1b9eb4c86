//! The deployer collaborator: submits contract creation transactions.

use std::{future::Future, path::PathBuf, time::Duration};

use alloy_core::primitives::{Address, B256};
use anyhow::{Context, Result};
use backon::{ConstantBuilder, Retryable};
use serde::{Deserialize, Serialize};

use crate::{
    Accounts, Artifact, DeploymentStore, Network, NetworkConfig,
    rpc::{self, CreateTransaction},
};

/// Interval between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Number of receipt polls after the first one before giving up on a pending transaction.
const RECEIPT_MAX_RETRIES: usize = 120;

/// The node has no receipt yet for a submitted transaction.
#[derive(Debug, thiserror::Error)]
#[error("transaction {0} is still pending")]
struct ReceiptPending(B256);

/// Per-deployment options passed alongside an artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Explicit sender of the deployment transaction.
    pub from: Option<Address>,
}

impl DeployConfig {
    pub fn from_sender(sender: Address) -> Self {
        Self { from: Some(sender) }
    }
}

/// A confirmed contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub contract_name: String,
    /// Network label the contract was deployed on.
    pub network: String,
    pub address: Address,
    pub transaction_hash: B256,
    /// Account that signed the creation transaction.
    pub from: Address,
    /// SHA-256 of the creation bytecode that was deployed.
    pub bytecode_hash: String,
    /// Unix timestamp of the confirmation.
    pub deployed_at: i64,
}

/// Performs on-chain deployments on behalf of migrations.
pub trait Deployer {
    /// Deploy an artifact and wait for it to be confirmed.
    ///
    /// Without a [`DeployConfig`] sender the deployer resolves its own default signer.
    fn deploy(
        &mut self,
        artifact: &Artifact,
        config: Option<DeployConfig>,
    ) -> impl Future<Output = Result<Deployment>> + Send;
}

/// Deployer talking to a node over JSON-RPC, signing with the node's unlocked accounts.
pub struct RpcDeployer {
    client: reqwest::Client,
    network: Network,
    config: NetworkConfig,
    records_path: PathBuf,
    records: DeploymentStore,
    receipt_poll_interval: Duration,
    receipt_max_retries: usize,
}

impl RpcDeployer {
    /// Create a deployer for `network`, recording deployments under `outdata`.
    pub fn new(network: Network, config: NetworkConfig, outdata: PathBuf) -> Result<Self> {
        let records_path = DeploymentStore::path_in(&outdata);
        let records = DeploymentStore::load_or_default(&records_path)?;

        Ok(Self {
            client: rpc::create_client()?,
            network,
            config,
            records_path,
            records,
            receipt_poll_interval: RECEIPT_POLL_INTERVAL,
            receipt_max_retries: RECEIPT_MAX_RETRIES,
        })
    }

    /// Set how often, and how many more times, a pending receipt is polled.
    pub fn receipt_polling(mut self, interval: Duration, max_retries: usize) -> Self {
        self.receipt_poll_interval = interval;
        self.receipt_max_retries = max_retries;
        self
    }

    /// Deployments recorded so far, including those of previous runs.
    pub fn records(&self) -> &DeploymentStore {
        &self.records
    }

    /// Fetch the accounts unlocked on the node.
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        rpc::accounts(&self.client, &self.config.url)
            .await
            .context("Failed to fetch accounts from the node")
    }

    /// Accounts handed to migrations on this deployer's network.
    ///
    /// Only the development network reads them, so no other network is asked for
    /// `eth_accounts`.
    pub async fn migration_accounts(&self) -> Result<Accounts> {
        if self.network.is_development() {
            Ok(Accounts::new(self.accounts().await?))
        } else {
            Ok(Accounts::default())
        }
    }

    /// Resolve the sender: explicit override, then the configured default, then the
    /// node's first account.
    async fn resolve_sender(&self, config: Option<DeployConfig>) -> Result<Address> {
        if let Some(from) = config.and_then(|c| c.from) {
            return Ok(from);
        }

        if let Some(from) = self.config.from {
            tracing::debug!(network = %self.network, %from, "Using configured default sender");
            return Ok(from);
        }

        let from = self.accounts().await?.first().copied().with_context(|| {
            format!(
                "No sender available for network '{}': configure `from` or unlock an account on the node",
                self.network
            )
        })?;
        tracing::debug!(network = %self.network, %from, "Using first node account as sender");
        Ok(from)
    }

    /// Poll for the receipt of a submitted transaction until it is mined.
    ///
    /// Only a missing receipt is polled again; RPC failures are returned at once.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<rpc::TransactionReceipt> {
        let client = &self.client;
        let url = &self.config.url;
        let fetch = move || async move {
            match rpc::transaction_receipt(client, url, tx_hash)
                .await
                .with_context(|| format!("Failed to fetch receipt of transaction {}", tx_hash))?
            {
                Some(receipt) => Ok::<_, anyhow::Error>(receipt),
                None => Err(anyhow::Error::new(ReceiptPending(tx_hash))),
            }
        };

        let result = fetch
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.receipt_poll_interval)
                    .with_max_times(self.receipt_max_retries),
            )
            .when(|err| err.is::<ReceiptPending>())
            .notify(|err, _| {
                tracing::trace!(error = %err, %tx_hash, "Receipt not available, retrying...");
            })
            .await;

        match result {
            Err(err) if err.is::<ReceiptPending>() => Err(err.context(format!(
                "Timeout waiting for transaction {} to be mined",
                tx_hash
            ))),
            other => other,
        }
    }
}

impl Deployer for RpcDeployer {
    async fn deploy(
        &mut self,
        artifact: &Artifact,
        config: Option<DeployConfig>,
    ) -> Result<Deployment> {
        let from = self.resolve_sender(config).await?;

        let tx = CreateTransaction {
            from,
            data: artifact.bytecode.clone(),
            gas: self.config.gas,
            gas_price: self.config.gas_price,
        };

        tracing::info!(
            contract = %artifact.contract_name,
            network = %self.network,
            %from,
            "Deploying contract..."
        );

        let tx_hash = rpc::send_transaction(&self.client, &self.config.url, &tx)
            .await
            .with_context(|| format!("Failed to deploy {}", artifact.contract_name))?;

        tracing::info!(%tx_hash, "Deployment transaction sent");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if !receipt.succeeded() {
            anyhow::bail!(
                "Deployment of {} reverted (transaction {})",
                artifact.contract_name,
                tx_hash
            );
        }

        let address = receipt.contract_address.with_context(|| {
            format!(
                "Receipt of transaction {} has no contract address",
                tx_hash
            )
        })?;

        let deployment = Deployment {
            contract_name: artifact.contract_name.clone(),
            network: self.network.to_string(),
            address,
            transaction_hash: receipt.transaction_hash,
            from,
            bytecode_hash: artifact.bytecode_hash(),
            deployed_at: chrono::Utc::now().timestamp(),
        };

        tracing::info!(
            contract = %deployment.contract_name,
            address = %deployment.address,
            "✓ Contract deployed"
        );

        self.records.record(deployment.clone());
        self.records
            .save_to_file(&self.records_path)
            .with_context(|| {
                format!(
                    "{} was deployed at {} (transaction {}) but its record was not saved",
                    deployment.contract_name, deployment.address, deployment.transaction_hash
                )
            })?;

        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_config_from() {
        let sender = Address::repeat_byte(0xaa);
        assert_eq!(DeployConfig::from_sender(sender).from, Some(sender));
        assert_eq!(DeployConfig::default().from, None);
    }

    #[tokio::test]
    async fn test_explicit_sender_wins_without_rpc() {
        let temp_dir = tempdir::TempDir::new("rpc-deployer").unwrap();
        let mut network_config =
            NetworkConfig::new("http://127.0.0.1:1/".parse().unwrap());
        network_config.from = Some(Address::repeat_byte(0xbb));

        let deployer = RpcDeployer::new(
            Network::Development,
            network_config,
            temp_dir.path().to_path_buf(),
        )
        .unwrap();

        let explicit = Address::repeat_byte(0xaa);
        assert_eq!(
            deployer
                .resolve_sender(Some(DeployConfig::from_sender(explicit)))
                .await
                .unwrap(),
            explicit
        );
        assert_eq!(
            deployer.resolve_sender(None).await.unwrap(),
            Address::repeat_byte(0xbb)
        );
    }
}
