//! Compiled contract artifacts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::variant::ContractVariant;

/// A compiled contract: its name and creation bytecode.
///
/// This matches the JSON the contract build emits; only the fields deployment
/// needs are read, everything else in the file is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The compiled contract's name.
    pub contract_name: String,
    /// 0x-prefixed creation bytecode.
    pub bytecode: String,
}

/// A directory of contract artifacts, one `<ContractName>.json` per variant.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. The directory is not scanned up
    /// front; artifacts are read on demand.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the artifact file for `variant`.
    pub fn artifact_path(&self, variant: ContractVariant) -> PathBuf {
        self.dir.join(format!("{}.json", variant.contract_name()))
    }

    /// Load the artifact for `variant`.
    pub fn load(&self, variant: ContractVariant) -> Result<ContractArtifact, DeployError> {
        self.read_artifact(variant).map_err(DeployError::Artifact)
    }

    fn read_artifact(&self, variant: ContractVariant) -> Result<ContractArtifact> {
        let path = self.artifact_path(variant);
        if !path.exists() {
            anyhow::bail!(
                "Artifact file not found: {} (compile the contracts first)",
                path.display()
            );
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read artifact from {}", path.display()))?;
        let artifact: ContractArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact JSON at {}", path.display()))?;

        let code = artifact.bytecode.trim_start_matches("0x");
        if code.is_empty() {
            anyhow::bail!("Artifact {} has empty bytecode", path.display());
        }
        hex::decode(code)
            .with_context(|| format!("Artifact {} bytecode is not valid hex", path.display()))?;

        Ok(artifact)
    }
}
