//! Integration tests for tokensmith-deploy.
//!
//! These tests drive the resolver and executor together against a scripted
//! in-memory chain, covering the whole variant catalogue and both ownership
//! handoff policies. No network access is required.
//! Run with: cargo test --test deployment_flow

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use tempdir::TempDir;
use tokensmith_deploy::{
    ArtifactStore, ChainClient, ContractArtifact, ContractVariant, DeployError,
    DeploymentExecutor, DeploymentRequest, DeploymentResult, OwnershipHandoff, RoleValues,
    TxReceipt, ROLE_COMMISSION_RECIPIENT, ROLE_LIQUIDITY_PROVIDER, ROLE_RELAYER,
};
use tokio::time::timeout;

// Timeout constants
const EXECUTION_TIMEOUT_SECS: u64 = 30;
const CONFIRMATION_TIMEOUT_SECS: u64 = 5;

const RELAYER: &str = "0x1111111111111111111111111111111111111111";
const COMMISSION: &str = "0x2222222222222222222222222222222222222222";
const LIQUIDITY: &str = "0x3333333333333333333333333333333333333333";
const BENEFICIARY: &str = "0x69E08874Eaf3eF3AF428F7F4Da2156028B3EaD90";

/// Initialize tracing for tests (idempotent).
fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init()
        .ok();
}

/// What the scripted chain records about each submission.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Creation { constructor_args: Vec<String> },
    Call { to: String, calldata: String },
}

/// A deterministic stand-in for the network.
///
/// Every creation lands at the same address, confirmations resolve
/// immediately, and the failure switches let a test break any single step.
struct ScriptedChain {
    contract_address: String,
    gas_used: u64,
    fail_creation_submission: bool,
    fail_ownership_submission: bool,
    time_out_confirmations: bool,
    submissions: Mutex<Vec<Submission>>,
    confirmations: Mutex<Vec<String>>,
}

impl ScriptedChain {
    fn new() -> Self {
        Self {
            contract_address: format!("0x{:040x}", 0xc0ffeeu64),
            gas_used: 1_203_344,
            fail_creation_submission: false,
            fail_ownership_submission: false,
            time_out_confirmations: false,
            submissions: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
        }
    }

    fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn confirmation_count(&self) -> usize {
        self.confirmations.lock().unwrap().len()
    }
}

impl ChainClient for ScriptedChain {
    fn submit_contract_creation(
        &self,
        _artifact: &ContractArtifact,
        constructor_args: &[String],
    ) -> impl Future<Output = std::result::Result<String, DeployError>> + Send {
        let fail = self.fail_creation_submission;
        if !fail {
            self.submissions.lock().unwrap().push(Submission::Creation {
                constructor_args: constructor_args.to_vec(),
            });
        }
        async move {
            if fail {
                Err(DeployError::Submission(anyhow::anyhow!(
                    "insufficient funds for gas * price + value"
                )))
            } else {
                Ok(format!("0x{:064x}", 1u64))
            }
        }
    }

    fn await_confirmation(
        &self,
        tx_hash: &str,
        deadline: Duration,
    ) -> impl Future<Output = std::result::Result<TxReceipt, DeployError>> + Send {
        self.confirmations.lock().unwrap().push(tx_hash.to_string());
        let time_out = self.time_out_confirmations;
        let tx_hash = tx_hash.to_string();
        let contract_address = self.contract_address.clone();
        let gas_used = self.gas_used;
        async move {
            if time_out {
                Err(DeployError::ConfirmationTimeout {
                    tx_hash,
                    timeout_secs: deadline.as_secs(),
                })
            } else {
                Ok(TxReceipt {
                    contract_address: Some(contract_address),
                    gas_used: Some(gas_used),
                    status: Some("0x1".to_string()),
                    block_number: Some(7),
                })
            }
        }
    }

    fn submit_transaction(
        &self,
        contract_address: &str,
        calldata: &str,
    ) -> impl Future<Output = std::result::Result<String, DeployError>> + Send {
        let fail = self.fail_ownership_submission;
        if !fail {
            self.submissions.lock().unwrap().push(Submission::Call {
                to: contract_address.to_string(),
                calldata: calldata.to_string(),
            });
        }
        async move {
            if fail {
                Err(DeployError::Submission(anyhow::anyhow!(
                    "replacement transaction underpriced"
                )))
            } else {
                Ok(format!("0x{:064x}", 2u64))
            }
        }
    }
}

/// Test setup context: a temp artifact directory covering every variant.
struct TestContext {
    artifact_dir: TempDir,
}

impl TestContext {
    /// Initialize a new test context with a uniquely named artifact dir.
    fn new(test_prefix: &str) -> Result<Self> {
        let run_id: u32 = rand::rng().random_range(100000..=999999);
        let artifact_dir = TempDir::new(&format!("tokensmith-{}-{}", test_prefix, run_id))
            .context("Failed to create artifact directory")?;

        for variant in ContractVariant::ALL {
            let artifact = serde_json::json!({
                "contractName": variant.contract_name(),
                "bytecode": "0x6080604052348015600e575f5ffd5b50",
            });
            let path = artifact_dir
                .path()
                .join(format!("{}.json", variant.contract_name()));
            std::fs::write(&path, artifact.to_string())
                .with_context(|| format!("Failed to write artifact {}", path.display()))?;
        }

        Ok(Self { artifact_dir })
    }

    /// Build an executor over `chain` with a short confirmation deadline.
    fn executor(&self, chain: ScriptedChain) -> DeploymentExecutor<ScriptedChain> {
        DeploymentExecutor::new(chain, ArtifactStore::new(self.artifact_dir.path()))
            .confirmation_timeout(Duration::from_secs(CONFIRMATION_TIMEOUT_SECS))
    }

    /// Execute a request with a timeout so a wedged run fails fast.
    async fn run(
        &self,
        executor: &DeploymentExecutor<ScriptedChain>,
        request: &DeploymentRequest,
    ) -> Result<std::result::Result<DeploymentResult, DeployError>> {
        timeout(
            Duration::from_secs(EXECUTION_TIMEOUT_SECS),
            executor.execute_request(request),
        )
        .await
        .context("Deployment run timed out")
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_basic_token_deploys_and_confirms_ownership() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("basic")?;
    let executor = ctx.executor(ScriptedChain::new());

    let request = DeploymentRequest {
        variant: ContractVariant::BasicToken,
        roles: RoleValues::new(),
        ownership: Some(OwnershipHandoff {
            beneficiary: BENEFICIARY.to_string(),
            wait_for_confirmation: true,
        }),
    };

    let result = ctx.run(&executor, &request).await??;

    assert_eq!(result.variant, ContractVariant::BasicToken);
    assert!(result.deployment_confirmed);
    assert_eq!(result.gas_used, Some(1_203_344));
    assert!(result.ownership_tx_hash.is_some());
    assert_eq!(result.ownership_confirmed, Some(true));

    let submissions = executor.client().submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(
        submissions[0],
        Submission::Creation {
            constructor_args: vec![]
        }
    );
    match &submissions[1] {
        Submission::Call { to, calldata } => {
            assert_eq!(to, &result.contract_address);
            assert!(calldata.starts_with("0xf2fde38b"));
            assert!(calldata.to_lowercase().ends_with(
                &BENEFICIARY.trim_start_matches("0x").to_lowercase()
            ));
        }
        other => panic!("expected an ownership call, got {other:?}"),
    }
    // Creation and ownership transfer were both awaited.
    assert_eq!(executor.client().confirmation_count(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multichain_token_deploys_a_role_prefix_without_handoff() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("multichain")?;
    let executor = ctx.executor(ScriptedChain::new());

    let request = DeploymentRequest {
        variant: ContractVariant::MultichainToken,
        roles: RoleValues::new()
            .with(ROLE_RELAYER, RELAYER)
            .with(ROLE_COMMISSION_RECIPIENT, COMMISSION),
        ownership: None,
    };

    let result = ctx.run(&executor, &request).await??;

    assert!(result.deployment_confirmed);
    assert!(result.ownership_tx_hash.is_none());
    assert!(result.ownership_confirmed.is_none());

    let submissions = executor.client().submissions();
    assert_eq!(
        submissions,
        vec![Submission::Creation {
            constructor_args: vec![RELAYER.to_string(), COMMISSION.to_string()]
        }]
    );
    assert_eq!(executor.client().confirmation_count(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_variant_reaches_done_with_full_roles() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("catalogue")?;

    let roles = RoleValues::new()
        .with(ROLE_RELAYER, RELAYER)
        .with(ROLE_COMMISSION_RECIPIENT, COMMISSION)
        .with(ROLE_LIQUIDITY_PROVIDER, LIQUIDITY);

    for variant in ContractVariant::ALL {
        let executor = ctx.executor(ScriptedChain::new());
        let request = DeploymentRequest {
            variant,
            roles: roles.clone(),
            ownership: None,
        };

        let result = ctx.run(&executor, &request).await??;
        assert_eq!(result.variant, variant);

        let submissions = executor.client().submissions();
        match &submissions[0] {
            Submission::Creation { constructor_args } => {
                // The full role map collapses to each variant's own arity.
                assert_eq!(
                    constructor_args.len(),
                    variant.constructor_profile().len(),
                    "unexpected arity for {variant}"
                );
            }
            other => panic!("expected a creation submission, got {other:?}"),
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_submission_yields_no_address_and_no_handoff() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("subfail")?;
    let executor = ctx.executor(ScriptedChain {
        fail_creation_submission: true,
        ..ScriptedChain::new()
    });

    let request = DeploymentRequest {
        variant: ContractVariant::DataRegistry,
        roles: RoleValues::new(),
        ownership: Some(OwnershipHandoff {
            beneficiary: BENEFICIARY.to_string(),
            wait_for_confirmation: true,
        }),
    };

    let err = ctx.run(&executor, &request).await?.unwrap_err();

    assert!(matches!(err, DeployError::Submission(_)));
    assert!(err.deployed_address().is_none());
    assert!(executor.client().submissions().is_empty());
    assert_eq!(executor.client().confirmation_count(), 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ownership_submission_failure_still_reports_the_address() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("ownfail")?;
    let executor = ctx.executor(ScriptedChain {
        fail_ownership_submission: true,
        ..ScriptedChain::new()
    });

    let request = DeploymentRequest {
        variant: ContractVariant::BasicToken,
        roles: RoleValues::new(),
        ownership: Some(OwnershipHandoff {
            beneficiary: BENEFICIARY.to_string(),
            wait_for_confirmation: false,
        }),
    };

    let err = ctx.run(&executor, &request).await?.unwrap_err();

    let deployed = format!("0x{:040x}", 0xc0ffeeu64);
    assert_eq!(err.deployed_address(), Some(deployed.as_str()));
    match err {
        DeployError::OwnershipTransfer { source, .. } => {
            assert!(matches!(*source, DeployError::Submission(_)));
        }
        other => panic!("expected OwnershipTransfer, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fire_and_forget_handoff_never_waits() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("forget")?;
    let executor = ctx.executor(ScriptedChain::new());

    let request = DeploymentRequest {
        variant: ContractVariant::BatchSender,
        roles: RoleValues::new().with(ROLE_COMMISSION_RECIPIENT, COMMISSION),
        ownership: Some(OwnershipHandoff {
            beneficiary: "0x21331315ebFf1195Daf501279d2A45E37aE381Cf".to_string(),
            wait_for_confirmation: false,
        }),
    };

    let result = ctx.run(&executor, &request).await??;

    assert!(result.ownership_tx_hash.is_some());
    assert_eq!(result.ownership_confirmed, None);
    // Only the creation was awaited.
    assert_eq!(executor.client().confirmation_count(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_confirmation_timeout_is_surfaced() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("timeout")?;
    let executor = ctx.executor(ScriptedChain {
        time_out_confirmations: true,
        ..ScriptedChain::new()
    });

    let request = DeploymentRequest {
        variant: ContractVariant::BasicToken,
        roles: RoleValues::new(),
        ownership: None,
    };

    let err = ctx.run(&executor, &request).await?.unwrap_err();
    match err {
        DeployError::ConfirmationTimeout { timeout_secs, .. } => {
            assert_eq!(timeout_secs, CONFIRMATION_TIMEOUT_SECS);
        }
        other => panic!("expected ConfirmationTimeout, got {other:?}"),
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_role_holes_are_rejected_before_any_submission() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("holes")?;
    let executor = ctx.executor(ScriptedChain::new());

    // commission_recipient without the relayer ahead of it.
    let request = DeploymentRequest {
        variant: ContractVariant::MultichainToken,
        roles: RoleValues::new().with(ROLE_COMMISSION_RECIPIENT, COMMISSION),
        ownership: None,
    };

    let err = ctx.run(&executor, &request).await?.unwrap_err();
    assert!(matches!(err, DeployError::MissingRequiredRole { .. }));
    assert!(executor.client().submissions().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_malformed_role_address_is_rejected_before_any_submission() -> Result<()> {
    init_test_tracing();
    let ctx = TestContext::new("badaddr")?;
    let executor = ctx.executor(ScriptedChain::new());

    let request = DeploymentRequest {
        variant: ContractVariant::BatchSender,
        roles: RoleValues::new().with(ROLE_COMMISSION_RECIPIENT, "0xnot-an-address"),
        ownership: None,
    };

    let err = ctx.run(&executor, &request).await?.unwrap_err();
    assert!(matches!(err, DeployError::InvalidAddressFormat { .. }));
    assert!(executor.client().submissions().is_empty());
    Ok(())
}
