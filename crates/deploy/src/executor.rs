//! Deployment execution: submission, confirmation, ownership handoff.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactStore;
use crate::chain::ChainClient;
use crate::encode;
use crate::error::DeployError;
use crate::resolver::{self, RoleValues};
use crate::variant::ContractVariant;

/// Default deadline for a single confirmation wait, in seconds.
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// Role label used when validating the ownership beneficiary.
const BENEFICIARY_ROLE: &str = "ownership_beneficiary";

/// Stages a deployment moves through.
///
/// `Failed` is terminal. The ownership stages only exist when a handoff was
/// requested, and a fire-and-forget handoff skips `OwnershipConfirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DeploymentStage {
    Pending,
    Submitted,
    Confirmed,
    OwnershipPending,
    OwnershipSubmitted,
    OwnershipConfirmed,
    Done,
    Failed,
}

/// Post-deployment ownership transfer policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipHandoff {
    /// Address receiving ownership of the deployed contract.
    pub beneficiary: String,
    /// Wait for the transfer to confirm (`true`) or fire it and move on
    /// (`false`). Both are legitimate; most routine deployments fire and
    /// forget.
    #[serde(default)]
    pub wait_for_confirmation: bool,
}

/// Everything needed for one deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Which contract to deploy.
    pub variant: ContractVariant,
    /// Role addresses feeding the constructor.
    pub roles: RoleValues,
    /// Optional ownership transfer to run after the deployment confirms.
    pub ownership: Option<OwnershipHandoff>,
}

/// Outcome of a deployment that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// The deployed contract variant.
    pub variant: ContractVariant,
    /// Address the contract was created at.
    pub contract_address: String,
    /// Hash of the creation transaction.
    pub creation_tx_hash: String,
    /// Always true in a returned result; failures surface as errors instead.
    pub deployment_confirmed: bool,
    /// Gas consumed by the creation transaction, when the receipt reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    /// Hash of the ownership-transfer transaction, if one was submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_tx_hash: Option<String>,
    /// Whether the ownership transfer confirmed. `None` when no handoff was
    /// requested or it was fired without waiting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_confirmed: Option<bool>,
    /// When the result was produced, RFC 3339.
    pub deployed_at: String,
}

impl DeploymentResult {
    /// Write the result as a JSON record for operator bookkeeping. These
    /// records are write-only: nothing reads them back.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize deployment result")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write deployment result to {}", path.display()))?;

        tracing::info!(path = %path.display(), "Deployment result saved");
        Ok(())
    }
}

impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deployed at {}", self.variant, self.contract_address)?;
        if let Some(tx_hash) = &self.ownership_tx_hash {
            let status = match self.ownership_confirmed {
                Some(true) => "confirmed",
                Some(false) => "failed",
                None => "submitted",
            };
            write!(f, ", ownership transfer {status} ({tx_hash})")?;
        }
        Ok(())
    }
}

/// Drives a deployment through its stages against a [`ChainClient`].
#[derive(Debug)]
pub struct DeploymentExecutor<C> {
    client: C,
    artifacts: ArtifactStore,
    confirmation_timeout: Duration,
}

impl<C: ChainClient> DeploymentExecutor<C> {
    /// Create an executor submitting through `client`, reading compiled
    /// contracts from `artifacts`.
    pub fn new(client: C, artifacts: ArtifactStore) -> Self {
        Self {
            client,
            artifacts,
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
        }
    }

    /// Override the deadline applied to each confirmation wait.
    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// The chain client this executor submits through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolve `request` and execute it in one pass.
    pub async fn execute_request(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentResult, DeployError> {
        let args = resolver::resolve(request.variant, &request.roles)?;
        self.execute(request.variant, &args, request.ownership.as_ref())
            .await
    }

    /// Execute a deployment with already-resolved constructor arguments.
    ///
    /// The run is strictly sequential: submit the creation, wait for it to
    /// confirm, then (when requested) submit and optionally await the
    /// ownership transfer. Nothing is retried. A failure after the creation
    /// confirmed reports the deployed address, so the operator can finish
    /// the remaining steps manually instead of deploying a duplicate.
    pub async fn execute(
        &self,
        variant: ContractVariant,
        ordered_args: &[String],
        handoff: Option<&OwnershipHandoff>,
    ) -> Result<DeploymentResult, DeployError> {
        // The beneficiary must be well-formed before anything is broadcast;
        // a deployment cannot be taken back once the creation is out.
        if let Some(handoff) = handoff {
            resolver::validate_address(BENEFICIARY_ROLE, &handoff.beneficiary)?;
        }

        let artifact = self.artifacts.load(variant)?;

        let mut stage = DeploymentStage::Pending;
        tracing::info!(
            %variant,
            %stage,
            constructor_args = ordered_args.len(),
            "Starting deployment"
        );

        let creation_tx_hash = match self
            .client
            .submit_contract_creation(&artifact, ordered_args)
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                stage = DeploymentStage::Failed;
                tracing::error!(%variant, %stage, error = %e, "Creation submission failed");
                return Err(e);
            }
        };
        stage = DeploymentStage::Submitted;
        tracing::info!(%stage, tx_hash = %creation_tx_hash, "Waiting for confirmation...");

        let receipt = match self
            .client
            .await_confirmation(&creation_tx_hash, self.confirmation_timeout)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                stage = DeploymentStage::Failed;
                tracing::error!(
                    %stage,
                    tx_hash = %creation_tx_hash,
                    error = %e,
                    "Deployment did not confirm"
                );
                return Err(e);
            }
        };
        let contract_address = receipt.contract_address.ok_or_else(|| {
            DeployError::Submission(anyhow::anyhow!(
                "receipt for {creation_tx_hash} carries no contract address"
            ))
        })?;
        stage = DeploymentStage::Confirmed;
        tracing::info!(
            %stage,
            contract_address = %contract_address,
            gas_used = ?receipt.gas_used,
            "Contract deployed"
        );

        let mut result = DeploymentResult {
            variant,
            contract_address,
            creation_tx_hash,
            deployment_confirmed: true,
            gas_used: receipt.gas_used,
            ownership_tx_hash: None,
            ownership_confirmed: None,
            deployed_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Some(handoff) = handoff {
            stage = DeploymentStage::OwnershipPending;
            tracing::info!(
                %stage,
                beneficiary = %handoff.beneficiary,
                "Transferring ownership..."
            );
            let calldata = encode::transfer_ownership_calldata(&handoff.beneficiary);

            let ownership_tx_hash = self
                .client
                .submit_transaction(&result.contract_address, &calldata)
                .await
                .map_err(|e| ownership_failure(&result.contract_address, e))?;
            stage = DeploymentStage::OwnershipSubmitted;
            tracing::info!(%stage, tx_hash = %ownership_tx_hash, "Ownership transfer submitted");
            result.ownership_tx_hash = Some(ownership_tx_hash.clone());

            if handoff.wait_for_confirmation {
                self.client
                    .await_confirmation(&ownership_tx_hash, self.confirmation_timeout)
                    .await
                    .map_err(|e| ownership_failure(&result.contract_address, e))?;
                stage = DeploymentStage::OwnershipConfirmed;
                result.ownership_confirmed = Some(true);
                tracing::info!(%stage, tx_hash = %ownership_tx_hash, "Ownership transfer confirmed");
            } else {
                tracing::info!("Not waiting for the ownership transfer to confirm");
            }
        }

        stage = DeploymentStage::Done;
        tracing::info!(%stage, contract_address = %result.contract_address, "Deployment complete");
        Ok(result)
    }
}

/// Wrap a post-deployment failure so the deployed address travels with it.
fn ownership_failure(contract_address: &str, source: DeployError) -> DeployError {
    tracing::error!(
        contract_address = %contract_address,
        error = %source,
        "Ownership transfer failed; the contract itself is deployed"
    );
    DeployError::OwnershipTransfer {
        contract_address: contract_address.to_string(),
        source: Box::new(source),
    }
}
