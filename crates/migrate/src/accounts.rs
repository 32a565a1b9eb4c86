//! Accounts made available to a migration.

use alloy_core::primitives::Address;
use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};

/// Ordered list of signer addresses supplied by the environment.
///
/// For a JSON-RPC node this is the result of `eth_accounts`, in node order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accounts(Vec<Address>);

impl Accounts {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self(accounts)
    }

    /// Parse a list of hex addresses (`0x`-prefixed, 40 hex chars).
    pub fn parse<I, S>(addresses: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        addresses
            .into_iter()
            .map(|addr| {
                let addr = addr.as_ref();
                addr.parse::<Address>()
                    .map_err(|e| anyhow::anyhow!("Invalid account address '{}': {}", addr, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Self)
    }
}
