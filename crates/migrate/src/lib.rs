//! aim-migrate - Deployment migrations for the AIM token.
//!
//! This crate provides the network-conditional deployment step of the AIM token
//! migration pipeline, along with the collaborators needed to run it against an
//! Ethereum JSON-RPC node.
//!
//! # Example
//!
//! ```no_run
//! use aim_migrate::{
//!     Accounts, BuildDirRegistry, DeployAimToken, MigrateConfig, MigrationRunner, Network,
//!     RpcDeployer,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = MigrateConfig::default();
//! let network = Network::Development;
//!
//! let deployer = RpcDeployer::new(
//!     network.clone(),
//!     config.network(&network)?.clone(),
//!     config.outdata.clone(),
//! )?;
//! let accounts = Accounts::new(deployer.accounts().await?);
//!
//! let migration = DeployAimToken::new(&BuildDirRegistry::new(&config.build_dir))?;
//! let mut runner = MigrationRunner::new(deployer, network, accounts);
//! runner.run(2, &migration).await?;
//! # Ok(())
//! # }
//! ```

mod accounts;
pub use accounts::Accounts;

mod artifact;
pub use artifact::{Artifact, ArtifactRegistry, BuildDirRegistry};

mod config;
pub use config::{DEFAULT_DEVELOPMENT_URL, MIGRATE_CONF_FILENAME, MigrateConfig, NetworkConfig};

mod deployer;
pub use deployer::{DeployConfig, Deployer, Deployment, RpcDeployer};

mod dispatcher;
pub use dispatcher::{DispatchError, dispatch, resolve_deploy_config};

mod migration;
pub use migration::{AIM_TOKEN_SOURCE, DeployAimToken, Migration, MigrationRunner};

mod network;
pub use network::{DEVELOPMENT_NETWORK, Network};

pub mod rpc;

mod store;
pub use store::{DEPLOYMENTS_FILENAME, DeploymentStore};
