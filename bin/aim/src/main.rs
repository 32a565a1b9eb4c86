//! aim runs the AIM token deployment migrations against a configured network.

mod cli;
mod config;

use std::path::{Path, PathBuf};

use aim_migrate::{
    BuildDirRegistry, DeployAimToken, Deployment, MigrationRunner, Network, RpcDeployer,
};
use anyhow::Result;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};

use cli::Cli;

/// Number of the AIM token deployment step in the migration sequence.
const DEPLOY_AIM_TOKEN_MIGRATION: u32 = 2;

/// Render the deployments made by this run.
fn summary<'a>(deployments: impl Iterator<Item = (u32, &'a Deployment)>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Migration", "Contract", "Address", "From", "Transaction"]);

    for (id, deployment) in deployments {
        table.add_row(vec![
            id.to_string(),
            deployment.contract_name.clone(),
            deployment.address.to_string(),
            deployment.from.to_string(),
            deployment.transaction_hash.to_string(),
        ]);
    }

    table
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let mut config = config::load(Path::new(&cli.config))?;

    if let Some(build_dir) = cli.build_dir {
        config.build_dir = PathBuf::from(build_dir);
    }
    if let Some(outdata) = cli.outdata {
        config.outdata = PathBuf::from(outdata);
    }

    let network = Network::from_name(&cli.network);
    let network_config = config.network(&network)?.clone();

    tracing::info!(
        network = %network,
        url = %network_config.url,
        build_dir = %config.build_dir.display(),
        outdata = %config.outdata.display(),
        "Starting migrations..."
    );

    let migration = DeployAimToken::new(&BuildDirRegistry::new(&config.build_dir))?;

    let deployer = RpcDeployer::new(network.clone(), network_config, config.outdata.clone())?;
    let accounts = deployer.migration_accounts().await?;

    let mut runner = MigrationRunner::new(deployer, network, accounts);
    runner.run(DEPLOY_AIM_TOKEN_MIGRATION, &migration).await?;

    println!("{}", summary(runner.completed()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_deployments() {
        let deployment = Deployment {
            contract_name: "AIMToken".to_string(),
            network: "development".to_string(),
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
            transaction_hash: "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
                .parse()
                .unwrap(),
            from: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap(),
            bytecode_hash: "00".repeat(32),
            deployed_at: 0,
        };

        let rendered = summary([(2, &deployment)].into_iter()).to_string();

        assert!(rendered.contains("AIMToken"));
        assert!(rendered.contains("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(!summary(std::iter::empty()).to_string().contains("AIMToken"));
    }
}
