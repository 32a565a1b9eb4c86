//! Network identity supplied by the migration runner.

use std::fmt;

/// The label of the local development network.
pub const DEVELOPMENT_NETWORK: &str = "development";

/// The network a migration is executed against.
///
/// Only the development network is singled out; every other label shares the
/// same deployment path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    /// Local development network (`development`).
    Development,
    /// Any other named network (e.g. `ropsten`, `mainnet`).
    #[strum(default)]
    Other(String),
}

impl Network {
    /// Parse a network label. Never fails: unknown labels become [`Network::Other`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| Self::Other(name.to_string()))
    }

    /// The label this network was selected with.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => DEVELOPMENT_NETWORK,
            Self::Other(name) => name,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
