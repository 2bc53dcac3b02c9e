//! Target network catalogue: selectors, default endpoints, chain IDs.

use serde::{Deserialize, Serialize};

/// Networks this tool can deploy to.
///
/// Each selector carries a default public RPC endpoint; `--rpc-url`
/// overrides the endpoint without touching the catalogue.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    /// Local development node.
    Hardhat,
    /// Ethereum mainnet.
    Ethereum,
    /// Ethereum Sepolia testnet.
    Sepolia,
    /// Arbitrum One.
    Arbitrum,
    /// BNB Smart Chain mainnet.
    Binance,
    /// BNB Smart Chain testnet (Chapel).
    BinanceTestnet,
    /// Polygon PoS mainnet.
    Polygon,
    /// Base mainnet.
    Base,
    /// Base Goerli testnet.
    BaseGoerli,
}

impl NetworkId {
    /// All selectable networks, local node first.
    pub const ALL: [NetworkId; 9] = [
        NetworkId::Hardhat,
        NetworkId::Ethereum,
        NetworkId::Sepolia,
        NetworkId::Arbitrum,
        NetworkId::Binance,
        NetworkId::BinanceTestnet,
        NetworkId::Polygon,
        NetworkId::Base,
        NetworkId::BaseGoerli,
    ];

    /// Default RPC endpoint for this network.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            NetworkId::Hardhat => "http://127.0.0.1:8545",
            NetworkId::Ethereum => "https://rpc.ankr.com/eth",
            NetworkId::Sepolia => "https://rpc.ankr.com/eth_sepolia",
            NetworkId::Arbitrum => "https://arb1.arbitrum.io/rpc",
            NetworkId::Binance => "https://rpc.ankr.com/bsc",
            NetworkId::BinanceTestnet => "https://rpc.ankr.com/bsc_testnet_chapel",
            NetworkId::Polygon => "https://rpc.ankr.com/polygon",
            NetworkId::Base => "https://rpc.ankr.com/base",
            NetworkId::BaseGoerli => "https://rpc.ankr.com/base_goerli",
        }
    }

    /// Chain ID of this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            NetworkId::Hardhat => 31337,
            NetworkId::Ethereum => 1,
            NetworkId::Sepolia => 11155111,
            NetworkId::Arbitrum => 42161,
            NetworkId::Binance => 56,
            NetworkId::BinanceTestnet => 97,
            NetworkId::Polygon => 137,
            NetworkId::Base => 8453,
            NetworkId::BaseGoerli => 84531,
        }
    }

    /// Whether this network is a test network (including the local node).
    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            NetworkId::Hardhat
                | NetworkId::Sepolia
                | NetworkId::BinanceTestnet
                | NetworkId::BaseGoerli
        )
    }
}
