//! tokensmith is a CLI for deploying the token contract family to any
//! supported network.

mod cli;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use comfy_table::Table;

use cli::{Cli, Command, DEFAULT_NETWORK, DeployArgs};
use tokensmith_deploy::{
    ArtifactStore, ContractVariant, Credentials, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DeployConfig,
    DeploymentExecutor, DeploymentRequest, DeploymentResult, HttpChainClient, NetworkId,
    OwnershipHandoff,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let (variant, args) = match &cli.command {
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "tokensmith", &mut std::io::stdout());
            return Ok(());
        }
        Command::BasicToken(args) => (ContractVariant::BasicToken, args),
        Command::MultichainToken(args) => (ContractVariant::MultichainToken, args),
        Command::DataRegistry(args) => (ContractVariant::DataRegistry, args),
        Command::BatchSender(args) => (ContractVariant::BatchSender, args),
    };

    deploy(variant, args).await
}

/// Assemble the deployment request from flags and the optional config file,
/// then run it to completion.
async fn deploy(variant: ContractVariant, args: &DeployArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DeployConfig::load_from_file(path)?,
        None => DeployConfig::default(),
    };

    let network = args.network.or(config.network).unwrap_or(DEFAULT_NETWORK);
    let rpc_url = args
        .rpc_url
        .clone()
        .or_else(|| config.rpc_url.clone())
        .unwrap_or_else(|| network.rpc_url().to_string());

    let credentials = Credentials {
        sender: args.sender.clone().or_else(|| config.sender.clone()),
        private_key: args.private_key.clone(),
        mnemonic: args.mnemonic.clone(),
    };
    let sender = credentials.resolve_sender()?;

    let artifacts_dir = args
        .artifacts
        .clone()
        .or_else(|| config.artifacts.clone())
        .unwrap_or_else(|| PathBuf::from("artifacts"));
    let confirmation_timeout = args
        .confirmation_timeout
        .or(config.confirmation_timeout_secs)
        .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT_SECS);

    // An explicit --transfer-ownership-to wins over the config file wholesale;
    // --wait-for-ownership alone tightens a file-configured handoff.
    let ownership = match &args.transfer_ownership_to {
        Some(beneficiary) => Some(OwnershipHandoff {
            beneficiary: beneficiary.clone(),
            wait_for_confirmation: args.wait_for_ownership,
        }),
        None => config.ownership_handoff().map(|mut handoff| {
            handoff.wait_for_confirmation |= args.wait_for_ownership;
            handoff
        }),
    };

    let mut roles = config.roles.to_role_values();
    for (role, value) in args.role_values().iter() {
        roles.insert(role.clone(), value.clone());
    }

    tracing::info!(
        %variant,
        %network,
        testnet = network.is_testnet(),
        rpc_url = %rpc_url,
        sender = %sender,
        "Preparing deployment..."
    );

    let client = HttpChainClient::new(&rpc_url, &sender)?;
    let executor = DeploymentExecutor::new(client, ArtifactStore::new(&artifacts_dir))
        .confirmation_timeout(Duration::from_secs(confirmation_timeout));
    let request = DeploymentRequest {
        variant,
        roles,
        ownership,
    };

    match executor.execute_request(&request).await {
        Ok(result) => {
            print_summary(network, &result, args.gas_report);
            if let Some(outfile) = &args.outfile {
                result.save_to_file(outfile)?;
            }
            Ok(())
        }
        Err(e) => {
            if let Some(address) = e.deployed_address() {
                tracing::error!(
                    contract_address = %address,
                    "The contract itself is deployed; only the ownership transfer needs redoing"
                );
            }
            Err(e).context("Deployment failed")
        }
    }
}

/// Render the deployment outcome as a table on stdout.
fn print_summary(network: NetworkId, result: &DeploymentResult, gas_report: bool) {
    let mut table = Table::new();
    table.set_header(vec!["Deployment", "Value"]);
    table.add_row(vec!["Contract".to_string(), result.variant.to_string()]);
    table.add_row(vec!["Network".to_string(), network.to_string()]);
    table.add_row(vec!["Address".to_string(), result.contract_address.clone()]);
    table.add_row(vec![
        "Creation tx".to_string(),
        result.creation_tx_hash.clone(),
    ]);
    if gas_report {
        let gas = result
            .gas_used
            .map(|gas| gas.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        table.add_row(vec!["Gas used".to_string(), gas]);
    }
    if let Some(tx_hash) = &result.ownership_tx_hash {
        table.add_row(vec!["Ownership tx".to_string(), tx_hash.clone()]);
        let status = match result.ownership_confirmed {
            Some(true) => "confirmed",
            Some(false) => "failed",
            None => "submitted (not awaited)",
        };
        table.add_row(vec!["Ownership status".to_string(), status.to_string()]);
    }
    println!("{table}");

    tracing::info!("Deployed to: {}", result.contract_address);
}
