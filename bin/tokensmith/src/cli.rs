use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokensmith_deploy::{
    NetworkId, RoleValues, ROLE_COMMISSION_RECIPIENT, ROLE_LIQUIDITY_PROVIDER, ROLE_RELAYER,
};
use tracing::level_filters::LevelFilter;

/// Network used when neither the CLI nor the config file selects one.
pub const DEFAULT_NETWORK: NetworkId = NetworkId::Hardhat;

#[derive(Parser)]
#[command(name = "tokensmith")]
#[command(author, version, about = "Deploy the token contract family to any supported network")]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "TSMITH_VERBOSITY", default_value_t = LevelFilter::INFO, global = true)]
    pub verbosity: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

/// One deployment operation per contract variant, plus shell completions.
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the basic fungible token (no constructor arguments).
    BasicToken(DeployArgs),
    /// Deploy the cross-chain token (relayer, commission recipient,
    /// liquidity provider).
    MultichainToken(DeployArgs),
    /// Deploy the on-chain data registry (no constructor arguments).
    DataRegistry(DeployArgs),
    /// Deploy the batch transfer utility (commission recipient).
    BatchSender(DeployArgs),
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments shared by every deploy operation.
#[derive(Debug, Clone, Parser)]
pub struct DeployArgs {
    /// The target network [default: hardhat].
    #[arg(short, long, env = "TSMITH_NETWORK")]
    pub network: Option<NetworkId>,

    /// Override the RPC endpoint of the target network.
    #[arg(long, env = "TSMITH_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Sender account address. The node behind the RPC endpoint must hold
    /// this account's key; without it the address is derived from
    /// PRIVATE_KEY or MNEMONIC.
    #[arg(long, env = "TSMITH_SENDER")]
    pub sender: Option<String>,

    /// Hex private key used only to derive the sender address.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// BIP-39 mnemonic used only to derive the sender address (account 0).
    #[arg(long, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Directory containing the compiled contract artifacts
    /// [default: artifacts].
    #[arg(long, env = "TSMITH_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Maximum seconds to wait for a transaction confirmation
    /// [default: 120].
    #[arg(long, env = "TSMITH_CONFIRMATION_TIMEOUT")]
    pub confirmation_timeout: Option<u64>,

    /// Transfer ownership of the deployed contract to this address.
    #[arg(long, visible_alias = "owner", env = "TSMITH_TRANSFER_OWNERSHIP_TO")]
    pub transfer_ownership_to: Option<String>,

    /// Wait for the ownership transfer to confirm instead of fire-and-forget.
    #[arg(long, env = "TSMITH_WAIT_FOR_OWNERSHIP", default_value_t = false)]
    pub wait_for_ownership: bool,

    /// Relayer role address.
    #[arg(long, env = "TSMITH_RELAYER")]
    pub relayer: Option<String>,

    /// Commission recipient role address.
    #[arg(long, env = "TSMITH_COMMISSION_RECIPIENT")]
    pub commission_recipient: Option<String>,

    /// Liquidity provider role address.
    #[arg(long, env = "TSMITH_LIQUIDITY_PROVIDER")]
    pub liquidity_provider: Option<String>,

    /// Show gas usage for the creation transaction in the summary.
    #[arg(long, env = "REPORT_GAS", default_value_t = false)]
    pub gas_report: bool,

    /// Load deployment settings from a Tokensmith.toml file (or a directory
    /// containing one). Explicit flags win over file values.
    #[arg(long, env = "TSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the deployment result as JSON to this path.
    #[arg(long, env = "TSMITH_OUTFILE")]
    pub outfile: Option<PathBuf>,
}

impl DeployArgs {
    /// Collect the role addresses supplied on the command line.
    pub fn role_values(&self) -> RoleValues {
        let mut roles = RoleValues::new();
        if let Some(relayer) = &self.relayer {
            roles = roles.with(ROLE_RELAYER, relayer.clone());
        }
        if let Some(commission) = &self.commission_recipient {
            roles = roles.with(ROLE_COMMISSION_RECIPIENT, commission.clone());
        }
        if let Some(liquidity) = &self.liquidity_provider {
            roles = roles.with(ROLE_LIQUIDITY_PROVIDER, liquidity.clone());
        }
        roles
    }
}
