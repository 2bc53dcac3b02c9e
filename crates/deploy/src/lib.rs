//! Deployment orchestration for the token contract family.
//!
//! The library resolves per-variant constructor arguments from named role
//! addresses, then drives a deployment through submission, confirmation and
//! an optional ownership handoff against an Ethereum-compatible JSON-RPC
//! endpoint. Signing stays outside: the node holds the keys.

mod artifact;
mod chain;
mod config;
mod credentials;
mod encode;
mod error;
mod executor;
mod network;
mod resolver;
mod rpc;
mod variant;

pub use artifact::{ArtifactStore, ContractArtifact};
pub use chain::{
    ChainClient, DEFAULT_CALL_GAS_LIMIT, DEFAULT_CREATION_GAS_LIMIT, HttpChainClient, TxReceipt,
};
pub use config::{CONFIG_FILENAME, DeployConfig, OwnershipSection, RolesSection};
pub use credentials::Credentials;
pub use encode::{creation_data, transfer_ownership_calldata};
pub use error::DeployError;
pub use executor::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECS, DeploymentExecutor, DeploymentRequest, DeploymentResult,
    DeploymentStage, OwnershipHandoff,
};
pub use network::NetworkId;
pub use resolver::{RoleValues, resolve};
pub use variant::{
    ConstructorProfile, ContractVariant, ROLE_COMMISSION_RECIPIENT, ROLE_LIQUIDITY_PROVIDER,
    ROLE_RELAYER,
};
