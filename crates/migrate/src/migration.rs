//! Migration steps and the runner that executes them.

use std::future::Future;

use anyhow::Result;

use crate::{Accounts, Artifact, ArtifactRegistry, Deployer, Deployment, Network, dispatch};

/// Source path of the AIM token contract.
pub const AIM_TOKEN_SOURCE: &str = "./AIMToken.sol";

/// A single migration step, invoked by the runner with the deployer, the network
/// and the available accounts.
pub trait Migration {
    /// Step name, e.g. `deploy_aimtoken`.
    fn name(&self) -> &str;

    fn run<D>(
        &self,
        deployer: &mut D,
        network: &Network,
        accounts: &Accounts,
    ) -> impl Future<Output = Result<Deployment>> + Send
    where
        D: Deployer + Send;
}

/// Deploys the AIM token.
#[derive(Debug, Clone)]
pub struct DeployAimToken {
    artifact: Artifact,
}

impl DeployAimToken {
    /// Resolve the AIM token artifact from the registry.
    pub fn new(registry: &impl ArtifactRegistry) -> Result<Self> {
        Ok(Self {
            artifact: registry.require(AIM_TOKEN_SOURCE)?,
        })
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }
}

impl Migration for DeployAimToken {
    fn name(&self) -> &str {
        "deploy_aimtoken"
    }

    async fn run<D>(
        &self,
        deployer: &mut D,
        network: &Network,
        accounts: &Accounts,
    ) -> Result<Deployment>
    where
        D: Deployer + Send,
    {
        dispatch(deployer, &self.artifact, network, accounts).await
    }
}

/// Runs numbered migration steps in order against one network.
///
/// A failing step stops the run; its error is returned unchanged.
pub struct MigrationRunner<D> {
    deployer: D,
    network: Network,
    accounts: Accounts,
    completed: Vec<(u32, Deployment)>,
}

impl<D> MigrationRunner<D>
where
    D: Deployer + Send,
{
    pub fn new(deployer: D, network: Network, accounts: Accounts) -> Self {
        Self {
            deployer,
            network,
            accounts,
            completed: Vec::new(),
        }
    }

    /// Run migration step `id`.
    ///
    /// Steps must be run in increasing order.
    pub async fn run<M: Migration>(&mut self, id: u32, migration: &M) -> Result<&Deployment> {
        if let Some((last, _)) = self.completed.last() {
            if id <= *last {
                anyhow::bail!(
                    "Migration {}_{} must run after migration {}",
                    id,
                    migration.name(),
                    last
                );
            }
        }

        tracing::info!(
            migration = %format!("{}_{}", id, migration.name()),
            network = %self.network,
            accounts = self.accounts.len(),
            "Running migration..."
        );

        let deployment = match migration
            .run(&mut self.deployer, &self.network, &self.accounts)
            .await
        {
            Ok(deployment) => deployment,
            Err(err) => {
                tracing::error!(migration = id, error = %err, "Migration failed, halting");
                return Err(err);
            }
        };

        tracing::info!(
            migration = id,
            contract = %deployment.contract_name,
            address = %deployment.address,
            "Migration complete"
        );

        self.completed.push((id, deployment));
        Ok(&self.completed[self.completed.len() - 1].1)
    }

    /// Deployments made by the steps run so far, in order.
    pub fn completed(&self) -> impl Iterator<Item = (u32, &Deployment)> {
        self.completed.iter().map(|(id, d)| (*id, d))
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }
}
