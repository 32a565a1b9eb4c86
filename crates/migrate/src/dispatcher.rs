//! Network-conditional deployment dispatch.
//!
//! The dispatcher picks the deployment configuration for a single artifact from the
//! network it runs against, then hands the artifact to the [`Deployer`]:
//! - `development`: the first available account is the explicit sender.
//! - any other network: no configuration, the deployer resolves its default signer.

use anyhow::Result;

use crate::{Accounts, Artifact, DeployConfig, Deployer, Deployment, Network};

/// Index of the account used as sender on the development network.
const DEVELOPMENT_SENDER_INDEX: usize = 0;

/// Input-contract violations detected before anything is deployed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("account index {index} out of range: {len} account(s) available on network '{network}'")]
    AccountIndexOutOfRange {
        index: usize,
        len: usize,
        network: String,
    },
}

/// Resolve the deployment configuration for a network.
///
/// Returns `Ok(None)` when the deployer should apply its own default sender.
pub fn resolve_deploy_config(
    network: &Network,
    accounts: &Accounts,
) -> Result<Option<DeployConfig>, DispatchError> {
    match network {
        Network::Development => {
            let sender = accounts.get(DEVELOPMENT_SENDER_INDEX).copied().ok_or_else(|| {
                DispatchError::AccountIndexOutOfRange {
                    index: DEVELOPMENT_SENDER_INDEX,
                    len: accounts.len(),
                    network: network.to_string(),
                }
            })?;
            Ok(Some(DeployConfig::from_sender(sender)))
        }
        Network::Other(_) => Ok(None),
    }
}

/// Deploy `artifact` with the configuration resolved for `network`.
///
/// Makes exactly one call to [`Deployer::deploy`] and returns its result as is.
/// Nothing is deployed when the configuration cannot be resolved.
pub async fn dispatch<D>(
    deployer: &mut D,
    artifact: &Artifact,
    network: &Network,
    accounts: &Accounts,
) -> Result<Deployment>
where
    D: Deployer,
{
    let config = resolve_deploy_config(network, accounts)?;

    tracing::debug!(
        contract = %artifact.contract_name,
        %network,
        sender = ?config.and_then(|c| c.from),
        "Dispatching deployment"
    );

    deployer.deploy(artifact, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::{Address, B256, Bytes};

    /// Deployer recording every call it receives.
    #[derive(Default)]
    struct RecordingDeployer {
        calls: Vec<(String, Option<DeployConfig>)>,
        fail_with: Option<&'static str>,
    }

    impl Deployer for RecordingDeployer {
        async fn deploy(
            &mut self,
            artifact: &Artifact,
            config: Option<DeployConfig>,
        ) -> Result<Deployment> {
            self.calls.push((artifact.contract_name.clone(), config));

            if let Some(message) = self.fail_with {
                anyhow::bail!(message);
            }

            Ok(Deployment {
                contract_name: artifact.contract_name.clone(),
                network: "test".to_string(),
                address: Address::repeat_byte(0x42),
                transaction_hash: B256::ZERO,
                from: config.and_then(|c| c.from).unwrap_or_default(),
                bytecode_hash: artifact.bytecode_hash(),
                deployed_at: 0,
            })
        }
    }

    fn aim_token() -> Artifact {
        Artifact {
            contract_name: "AIMToken".to_string(),
            abi: serde_json::Value::Array(vec![]),
            bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        }
    }

    fn accounts(bytes: &[u8]) -> Accounts {
        Accounts::new(bytes.iter().map(|b| Address::repeat_byte(*b)).collect())
    }

    #[tokio::test]
    async fn test_development_uses_first_account() {
        let mut deployer = RecordingDeployer::default();
        let accounts = accounts(&[0xaa, 0xbb]);

        let deployment = dispatch(&mut deployer, &aim_token(), &Network::Development, &accounts)
            .await
            .unwrap();

        assert_eq!(
            deployer.calls,
            vec![(
                "AIMToken".to_string(),
                Some(DeployConfig::from_sender(Address::repeat_byte(0xaa)))
            )]
        );
        assert_eq!(deployment.from, Address::repeat_byte(0xaa));
    }

    #[tokio::test]
    async fn test_other_network_uses_deployer_default() {
        let mut deployer = RecordingDeployer::default();
        let network = Network::from_name("ropsten");

        dispatch(&mut deployer, &aim_token(), &network, &accounts(&[0xaa]))
            .await
            .unwrap();

        assert_eq!(deployer.calls, vec![("AIMToken".to_string(), None)]);
    }

    #[tokio::test]
    async fn test_other_network_ignores_empty_accounts() {
        let mut deployer = RecordingDeployer::default();
        let network = Network::from_name("mainnet");

        dispatch(&mut deployer, &aim_token(), &network, &Accounts::default())
            .await
            .unwrap();

        assert_eq!(deployer.calls.len(), 1);
        assert_eq!(deployer.calls[0].1, None);
    }

    #[tokio::test]
    async fn test_development_without_accounts_fails_before_deploying() {
        let mut deployer = RecordingDeployer::default();

        let err = dispatch(
            &mut deployer,
            &aim_token(),
            &Network::Development,
            &Accounts::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<DispatchError>(),
            Some(&DispatchError::AccountIndexOutOfRange {
                index: 0,
                len: 0,
                network: "development".to_string(),
            })
        );
        assert!(deployer.calls.is_empty());
    }

    #[tokio::test]
    async fn test_deployer_error_is_returned_unchanged() {
        let mut deployer = RecordingDeployer {
            fail_with: Some("insufficient funds for gas * price + value"),
            ..Default::default()
        };

        let err = dispatch(
            &mut deployer,
            &aim_token(),
            &Network::Development,
            &accounts(&[0xaa]),
        )
        .await
        .unwrap_err();

        assert_eq!(format!("{:#}", err), "insufficient funds for gas * price + value");
        assert_eq!(err.chain().count(), 1);
        assert_eq!(deployer.calls.len(), 1);
    }

    #[tokio::test]
    async fn test_one_deploy_call_per_dispatch() {
        let mut deployer = RecordingDeployer::default();
        let artifact = aim_token();
        let accounts = accounts(&[0xaa, 0xbb, 0xcc]);

        for network in [Network::Development, Network::from_name("kovan")] {
            let before = deployer.calls.len();
            dispatch(&mut deployer, &artifact, &network, &accounts)
                .await
                .unwrap();
            assert_eq!(deployer.calls.len(), before + 1);
        }
    }

    #[test]
    fn test_resolve_deploy_config() {
        let accounts = accounts(&[0x01, 0x02]);

        assert_eq!(
            resolve_deploy_config(&Network::Development, &accounts),
            Ok(Some(DeployConfig::from_sender(Address::repeat_byte(0x01))))
        );
        assert_eq!(
            resolve_deploy_config(&Network::from_name("staging"), &accounts),
            Ok(None)
        );
    }
}
