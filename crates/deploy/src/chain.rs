//! The network collaborator: transaction submission and confirmation.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use crate::artifact::ContractArtifact;
use crate::encode;
use crate::error::DeployError;
use crate::rpc::{JsonRpcClient, deserialize_opt_u64_from_hex};

/// Default gas limit for contract-creation transactions.
pub const DEFAULT_CREATION_GAS_LIMIT: u64 = 6_000_000;
/// Default gas limit for calls into an already-deployed contract.
pub const DEFAULT_CALL_GAS_LIMIT: u64 = 200_000;
/// Interval between receipt polls while waiting for a confirmation.
const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A mined transaction receipt, reduced to the fields deployment cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    /// Address of the created contract (`None` for ordinary transactions).
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Gas consumed by the transaction.
    #[serde(default, deserialize_with = "deserialize_opt_u64_from_hex")]
    pub gas_used: Option<u64>,
    /// Execution status: `0x1` success, `0x0` reverted.
    #[serde(default)]
    pub status: Option<String>,
    /// Block the transaction was included in.
    #[serde(default, deserialize_with = "deserialize_opt_u64_from_hex")]
    pub block_number: Option<u64>,
}

impl TxReceipt {
    /// Whether the transaction executed successfully. Chains that predate
    /// receipt statuses omit the field; those are treated as successful.
    pub fn succeeded(&self) -> bool {
        match self.status.as_deref() {
            Some("0x1") | Some("0x01") | None => true,
            Some(_) => false,
        }
    }
}

/// Access to the target blockchain, as deployment needs it.
///
/// Implementations own the connection and the signing arrangement; the
/// executor only sequences calls. Nothing here retries: a failed submission
/// is surfaced, never re-broadcast.
pub trait ChainClient: Send + Sync {
    /// Broadcast a contract-creation transaction. Returns the transaction
    /// hash; inclusion is not awaited.
    fn submit_contract_creation(
        &self,
        artifact: &ContractArtifact,
        constructor_args: &[String],
    ) -> impl Future<Output = Result<String, DeployError>> + Send;

    /// Wait until `tx_hash` is mined, up to `deadline`. Returns the receipt.
    fn await_confirmation(
        &self,
        tx_hash: &str,
        deadline: Duration,
    ) -> impl Future<Output = Result<TxReceipt, DeployError>> + Send;

    /// Broadcast a call to an already-deployed contract. Returns the
    /// transaction hash; inclusion is not awaited.
    fn submit_transaction(
        &self,
        contract_address: &str,
        calldata: &str,
    ) -> impl Future<Output = Result<String, DeployError>> + Send;
}

/// JSON-RPC backed [`ChainClient`].
///
/// Transactions go out via `eth_sendTransaction`: the node holds the
/// sender's key and signs. Confirmation is a receipt poll bounded by an
/// absolute deadline.
#[derive(Debug, Clone)]
pub struct HttpChainClient {
    rpc: JsonRpcClient,
    sender: String,
    creation_gas_limit: u64,
    call_gas_limit: u64,
}

impl HttpChainClient {
    /// Create a client for `endpoint`, submitting from `sender`. The node
    /// behind the endpoint must hold the sender's key.
    pub fn new(endpoint: &str, sender: &str) -> anyhow::Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(endpoint)?,
            sender: sender.to_string(),
            creation_gas_limit: DEFAULT_CREATION_GAS_LIMIT,
            call_gas_limit: DEFAULT_CALL_GAS_LIMIT,
        })
    }

    /// Override the gas limit used for contract creation.
    pub fn creation_gas_limit(mut self, gas: u64) -> Self {
        self.creation_gas_limit = gas;
        self
    }

    /// Override the gas limit used for contract calls.
    pub fn call_gas_limit(mut self, gas: u64) -> Self {
        self.call_gas_limit = gas;
        self
    }

    /// The endpoint this client submits to.
    pub fn endpoint(&self) -> &str {
        self.rpc.endpoint()
    }

    async fn send_transaction(
        &self,
        to: Option<&str>,
        data: &str,
        gas: u64,
    ) -> anyhow::Result<String> {
        let mut tx = json!({
            "from": self.sender,
            "data": data,
            "gas": format!("0x{gas:x}"),
        });
        if let Some(to) = to {
            tx["to"] = json!(to);
        }

        self.rpc.call("eth_sendTransaction", vec![tx]).await
    }
}

impl ChainClient for HttpChainClient {
    fn submit_contract_creation(
        &self,
        artifact: &ContractArtifact,
        constructor_args: &[String],
    ) -> impl Future<Output = Result<String, DeployError>> + Send {
        async move {
            let data = encode::creation_data(&artifact.bytecode, constructor_args);
            let tx_hash = self
                .send_transaction(None, &data, self.creation_gas_limit)
                .await
                .with_context(|| format!("Failed to submit creation of {}", artifact.contract_name))
                .map_err(DeployError::Submission)?;

            tracing::info!(
                contract = %artifact.contract_name,
                tx_hash = %tx_hash,
                "Creation transaction submitted"
            );
            Ok(tx_hash)
        }
    }

    fn await_confirmation(
        &self,
        tx_hash: &str,
        deadline: Duration,
    ) -> impl Future<Output = Result<TxReceipt, DeployError>> + Send {
        async move {
            let started = Instant::now();
            loop {
                if started.elapsed() > deadline {
                    return Err(DeployError::ConfirmationTimeout {
                        tx_hash: tx_hash.to_string(),
                        timeout_secs: deadline.as_secs(),
                    });
                }

                match self
                    .rpc
                    .call::<Option<TxReceipt>>("eth_getTransactionReceipt", vec![json!(tx_hash)])
                    .await
                {
                    Ok(Some(receipt)) => {
                        if !receipt.succeeded() {
                            return Err(DeployError::Submission(anyhow::anyhow!(
                                "transaction {tx_hash} reverted on-chain"
                            )));
                        }
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            block_number = ?receipt.block_number,
                            "Transaction confirmed"
                        );
                        return Ok(receipt);
                    }
                    Ok(None) => {
                        tracing::trace!(tx_hash = %tx_hash, "Transaction not yet mined, polling...");
                    }
                    Err(e) => {
                        tracing::trace!(
                            error = %e,
                            tx_hash = %tx_hash,
                            "Receipt query failed, retrying..."
                        );
                    }
                }

                tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await;
            }
        }
    }

    fn submit_transaction(
        &self,
        contract_address: &str,
        calldata: &str,
    ) -> impl Future<Output = Result<String, DeployError>> + Send {
        async move {
            let tx_hash = self
                .send_transaction(Some(contract_address), calldata, self.call_gas_limit)
                .await
                .with_context(|| format!("Failed to submit transaction to {contract_address}"))
                .map_err(DeployError::Submission)?;

            tracing::info!(
                to = %contract_address,
                tx_hash = %tx_hash,
                "Transaction submitted"
            );
            Ok(tx_hash)
        }
    }
}
