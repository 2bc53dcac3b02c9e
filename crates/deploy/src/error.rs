//! Error taxonomy for deployment resolution and execution.

use crate::variant::ContractVariant;

/// Everything that can go wrong while resolving or executing a deployment.
///
/// Failures that happen after the contract itself has confirmed carry the
/// deployed address: an on-chain deployment cannot be rolled back, so the
/// operator needs the address to finish the remaining steps by hand instead
/// of deploying a duplicate.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A supplied account address is not syntactically valid.
    #[error("invalid address for {role}: '{value}' (expected 0x followed by 40 hex characters)")]
    InvalidAddressFormat { role: String, value: String },

    /// An earlier constructor role was omitted while a later one was supplied.
    /// Positional constructor arguments cannot be skipped.
    #[error("{variant} constructor is missing role '{missing}', which is required because '{supplied}' was supplied")]
    MissingRequiredRole {
        variant: ContractVariant,
        missing: &'static str,
        supplied: &'static str,
    },

    /// The compiled contract artifact could not be loaded.
    #[error("failed to load contract artifact: {0}")]
    Artifact(#[source] anyhow::Error),

    /// A transaction was rejected at submission, or reverted on-chain.
    #[error("transaction submission failed: {0}")]
    Submission(#[source] anyhow::Error),

    /// The network did not confirm a transaction within the deadline.
    #[error("no confirmation for transaction {tx_hash} within {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: String, timeout_secs: u64 },

    /// The post-deployment ownership transfer failed after the contract
    /// itself deployed successfully.
    #[error("contract deployed at {contract_address} but the ownership transfer failed: {source}")]
    OwnershipTransfer {
        contract_address: String,
        #[source]
        source: Box<DeployError>,
    },
}

impl DeployError {
    /// The deployed contract address, when the failure happened after the
    /// deployment itself had already confirmed.
    pub fn deployed_address(&self) -> Option<&str> {
        match self {
            DeployError::OwnershipTransfer {
                contract_address, ..
            } => Some(contract_address),
            _ => None,
        }
    }
}
