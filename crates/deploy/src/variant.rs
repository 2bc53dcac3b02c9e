//! Contract variant catalogue and constructor profiles.

use serde::{Deserialize, Serialize};

/// Role name for the cross-chain relayer account.
pub const ROLE_RELAYER: &str = "relayer";
/// Role name for the commission recipient account.
pub const ROLE_COMMISSION_RECIPIENT: &str = "commission_recipient";
/// Role name for the liquidity provider account.
pub const ROLE_LIQUIDITY_PROVIDER: &str = "liquidity_provider";

/// The deployable contract shapes this tool knows about.
///
/// The set is fixed: each variant maps to exactly one compiled artifact and
/// one constructor profile. Arbitrary contracts are not supported.
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
pub enum ContractVariant {
    /// Plain fungible token; deploys with no constructor arguments.
    BasicToken,
    /// Token variant wired for cross-chain operation.
    MultichainToken,
    /// On-chain data registry.
    DataRegistry,
    /// Batch transfer utility.
    BatchSender,
}

impl ContractVariant {
    /// All known variants, in declaration order.
    pub const ALL: [ContractVariant; 4] = [
        ContractVariant::BasicToken,
        ContractVariant::MultichainToken,
        ContractVariant::DataRegistry,
        ContractVariant::BatchSender,
    ];

    /// The compiled contract's name, as it appears in artifact files.
    pub fn contract_name(&self) -> &'static str {
        match self {
            ContractVariant::BasicToken => "BasicToken",
            ContractVariant::MultichainToken => "MultichainToken",
            ContractVariant::DataRegistry => "DataRegistry",
            ContractVariant::BatchSender => "BatchSender",
        }
    }

    /// The ordered constructor profile for this variant.
    ///
    /// The token and registry contracts take no constructor arguments; the
    /// multichain token takes up to three role addresses and the batch sender
    /// takes one.
    pub fn constructor_profile(&self) -> ConstructorProfile {
        match self {
            ContractVariant::BasicToken | ContractVariant::DataRegistry => {
                ConstructorProfile::new(&[])
            }
            ContractVariant::MultichainToken => ConstructorProfile::new(&[
                ROLE_RELAYER,
                ROLE_COMMISSION_RECIPIENT,
                ROLE_LIQUIDITY_PROVIDER,
            ]),
            ContractVariant::BatchSender => {
                ConstructorProfile::new(&[ROLE_COMMISSION_RECIPIENT])
            }
        }
    }
}

/// An ordered list of role names making up a variant's constructor signature.
///
/// Every leading prefix of a profile is a deployable arity: the observed
/// deployments range from zero arguments up to the full role list, but never
/// skip a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorProfile {
    roles: &'static [&'static str],
}

impl ConstructorProfile {
    const fn new(roles: &'static [&'static str]) -> Self {
        Self { roles }
    }

    /// Role names in constructor-argument order.
    pub fn roles(&self) -> &'static [&'static str] {
        self.roles
    }

    /// Number of roles in the full profile.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the profile declares no roles at all.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
