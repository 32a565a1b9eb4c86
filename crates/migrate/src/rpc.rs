//! Shared RPC utilities for interacting with Ethereum JSON-RPC endpoints.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::Context;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Make a JSON-RPC call and deserialize the result.
///
/// # Arguments
/// * `client` - The HTTP client to use
/// * `url` - The RPC endpoint URL
/// * `method` - The RPC method name
/// * `params` - The method parameters
///
/// # Returns
/// The deserialized result, or an error if the request failed or returned an error response.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &Url,
    method: &str,
    params: Vec<Value>,
) -> Result<T, anyhow::Error> {
    let response = client
        .post(url.clone())
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", method))?;

    let result: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", method))?;

    if let Some(error) = result.get("error") {
        anyhow::bail!(
            "RPC error: {}",
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        );
    }

    let result_value = result
        .get("result")
        .context("No result in response")?
        .clone();

    serde_json::from_value(result_value)
        .with_context(|| format!("Failed to deserialize {} result", method))
}

/// Fetch the accounts managed by the node (`eth_accounts`).
pub async fn accounts(
    client: &reqwest::Client,
    url: &Url,
) -> Result<Vec<Address>, anyhow::Error> {
    json_rpc_call(client, url, "eth_accounts", vec![]).await
}

/// A contract creation transaction, in the shape expected by `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub from: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_quantity")]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_quantity")]
    pub gas_price: Option<u128>,
}

/// Serialize an integer as a `0x`-prefixed hex quantity.
fn serialize_quantity<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::LowerHex,
{
    match value {
        Some(v) => serializer.serialize_str(&format!("0x{:x}", v)),
        None => serializer.serialize_none(),
    }
}

/// Submit a transaction through the node's signer (`eth_sendTransaction`).
pub async fn send_transaction(
    client: &reqwest::Client,
    url: &Url,
    tx: &CreateTransaction,
) -> Result<B256, anyhow::Error> {
    let tx = serde_json::to_value(tx).context("Failed to serialize transaction")?;
    json_rpc_call(client, url, "eth_sendTransaction", vec![tx]).await
}

/// The fields of a transaction receipt needed to confirm a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// `0x1` on success, `0x0` on revert. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}

/// Fetch a transaction receipt; `None` while the transaction is pending.
pub async fn transaction_receipt(
    client: &reqwest::Client,
    url: &Url,
    tx_hash: B256,
) -> Result<Option<TransactionReceipt>, anyhow::Error> {
    json_rpc_call(
        client,
        url,
        "eth_getTransactionReceipt",
        vec![serde_json::json!(tx_hash)],
    )
    .await
}
