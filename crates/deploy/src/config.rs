//! Deployment configuration files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::executor::OwnershipHandoff;
use crate::network::NetworkId;
use crate::resolver::RoleValues;
use crate::variant::{ROLE_COMMISSION_RECIPIENT, ROLE_LIQUIDITY_PROVIDER, ROLE_RELAYER};

/// Default name of the deployment configuration file.
pub const CONFIG_FILENAME: &str = "Tokensmith.toml";

/// File-backed deployment settings.
///
/// Everything here can also be supplied as CLI flags; explicit flags win
/// over file values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Target network selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkId>,
    /// RPC endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Sender account address; the node must hold its key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Directory containing compiled contract artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<PathBuf>,
    /// Confirmation deadline in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_timeout_secs: Option<u64>,
    /// Role addresses feeding constructor arguments.
    pub roles: RolesSection,
    /// Post-deployment ownership handoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership: Option<OwnershipSection>,
}

/// The `[roles]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relayer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_provider: Option<String>,
}

impl RolesSection {
    /// Collect the populated entries into a role-value map.
    pub fn to_role_values(&self) -> RoleValues {
        let mut roles = RoleValues::new();
        if let Some(relayer) = &self.relayer {
            roles.insert(ROLE_RELAYER.to_string(), relayer.clone());
        }
        if let Some(commission) = &self.commission_recipient {
            roles.insert(ROLE_COMMISSION_RECIPIENT.to_string(), commission.clone());
        }
        if let Some(liquidity) = &self.liquidity_provider {
            roles.insert(ROLE_LIQUIDITY_PROVIDER.to_string(), liquidity.clone());
        }
        roles
    }
}

/// The `[ownership]` table. Its presence requests a handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipSection {
    /// Address receiving ownership after deployment.
    pub beneficiary: String,
    /// Wait for the transfer to confirm instead of fire-and-forget.
    #[serde(default)]
    pub wait_for_confirmation: bool,
}

impl DeployConfig {
    /// Save to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployment config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load from a TOML file, or from `<dir>/Tokensmith.toml` when `path`
    /// is a directory.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file or directory not found: {}",
                path.display()
            );
        }
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;

        tracing::info!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// The configured handoff, when the `[ownership]` table is present.
    pub fn ownership_handoff(&self) -> Option<OwnershipHandoff> {
        self.ownership.as_ref().map(|section| OwnershipHandoff {
            beneficiary: section.beneficiary.clone(),
            wait_for_confirmation: section.wait_for_confirmation,
        })
    }
}
