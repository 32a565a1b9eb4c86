//! Compiled contract artifacts and the registry that resolves them.

use std::path::{Path, PathBuf};

use alloy_core::primitives::Bytes;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A compiled contract, as written by the build step into `<build_dir>/<Name>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Name of the contract inside the source file.
    pub contract_name: String,
    /// Contract ABI, kept as raw JSON.
    #[serde(default)]
    pub abi: serde_json::Value,
    /// Creation bytecode sent as the data of the deployment transaction.
    #[serde(default)]
    pub bytecode: Bytes,
}

impl Artifact {
    /// SHA-256 of the creation bytecode, hex encoded.
    pub fn bytecode_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytecode);
        hex::encode(hasher.finalize())
    }
}

/// Resolves contract names to compiled artifacts.
pub trait ArtifactRegistry {
    /// Resolve a contract by name (`AIMToken`) or by source path (`./AIMToken.sol`).
    fn require(&self, name: &str) -> Result<Artifact>;
}

/// Registry backed by a directory of JSON artifacts.
#[derive(Debug, Clone)]
pub struct BuildDirRegistry {
    dir: PathBuf,
}

impl BuildDirRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Strip a source path down to the contract name: `./contracts/AIMToken.sol` -> `AIMToken`.
fn contract_name(request: &str) -> &str {
    let file = request.rsplit(['/', '\\']).next().unwrap_or(request);
    file.strip_suffix(".sol").unwrap_or(file)
}

impl ArtifactRegistry for BuildDirRegistry {
    fn require(&self, name: &str) -> Result<Artifact> {
        let contract = contract_name(name);
        if contract.is_empty() {
            anyhow::bail!("Invalid artifact name: '{}'", name);
        }

        let path = self.dir.join(format!("{}.json", contract));
        if !path.exists() {
            anyhow::bail!(
                "Could not find artifact for {} in {}",
                contract,
                self.dir.display()
            );
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        let artifact: Artifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

        if artifact.contract_name != contract {
            anyhow::bail!(
                "Artifact {} declares contract '{}', expected '{}'",
                path.display(),
                artifact.contract_name,
                contract
            );
        }

        if artifact.bytecode.is_empty() {
            anyhow::bail!(
                "{} has no bytecode: abstract contracts and interfaces cannot be deployed",
                contract
            );
        }

        tracing::debug!(
            contract = %artifact.contract_name,
            path = %path.display(),
            bytecode_hash = %artifact.bytecode_hash(),
            "Artifact loaded"
        );

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write_artifact(dir: &Path, file: &str, body: serde_json::Value) {
        std::fs::write(dir.join(file), body.to_string()).unwrap();
    }

    #[test]
    fn test_contract_name_from_source_path() {
        assert_eq!(contract_name("AIMToken"), "AIMToken");
        assert_eq!(contract_name("./AIMToken.sol"), "AIMToken");
        assert_eq!(contract_name("./contracts/token/AIMToken.sol"), "AIMToken");
    }

    #[test]
    fn test_require_by_source_path() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(
            dir.path(),
            "AIMToken.json",
            serde_json::json!({
                "contractName": "AIMToken",
                "abi": [],
                "bytecode": "0x6080604052"
            }),
        );

        let registry = BuildDirRegistry::new(dir.path());
        let artifact = registry.require("./AIMToken.sol").unwrap();

        assert_eq!(artifact.contract_name, "AIMToken");
        assert_eq!(&artifact.bytecode[..], &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(artifact, registry.require("AIMToken").unwrap());
    }

    #[test]
    fn test_require_missing_artifact() {
        let dir = TempDir::new("artifacts").unwrap();
        let registry = BuildDirRegistry::new(dir.path());

        let err = registry.require("AIMToken").unwrap_err();
        assert!(err.to_string().contains("Could not find artifact for AIMToken"));
    }

    #[test]
    fn test_require_rejects_interface() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(
            dir.path(),
            "IERC20.json",
            serde_json::json!({ "contractName": "IERC20", "abi": [], "bytecode": "0x" }),
        );

        let err = BuildDirRegistry::new(dir.path())
            .require("IERC20")
            .unwrap_err();
        assert!(err.to_string().contains("cannot be deployed"));
    }

    #[test]
    fn test_require_rejects_name_mismatch() {
        let dir = TempDir::new("artifacts").unwrap();
        write_artifact(
            dir.path(),
            "AIMToken.json",
            serde_json::json!({ "contractName": "Other", "bytecode": "0x60" }),
        );

        assert!(BuildDirRegistry::new(dir.path()).require("AIMToken").is_err());
    }

    #[test]
    fn test_bytecode_hash_is_stable() {
        let artifact = Artifact {
            contract_name: "AIMToken".to_string(),
            abi: serde_json::Value::Null,
            bytecode: Bytes::from_static(&[0x60, 0x80]),
        };

        assert_eq!(artifact.bytecode_hash(), artifact.clone().bytecode_hash());
        assert_eq!(artifact.bytecode_hash().len(), 64);
    }
}
