//! Resolves a deployment intent into an ordered constructor-argument list.

use std::collections::BTreeMap;

use derive_more::{Deref, DerefMut, From};
use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::variant::ContractVariant;

/// Named role addresses supplied for a deployment.
///
/// Keys are role names (`relayer`, `commission_recipient`,
/// `liquidity_provider`); values are account addresses. Roles outside the
/// target variant's constructor profile are tolerated and ignored, so one
/// role map can drive deployments of several variants.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, DerefMut, From,
)]
pub struct RoleValues(BTreeMap<String, String>);

impl RoleValues {
    /// Create an empty role map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a role value, consuming and returning the map.
    pub fn with(mut self, role: &str, address: impl Into<String>) -> Self {
        self.0.insert(role.to_string(), address.into());
        self
    }
}

/// Resolve the ordered constructor-argument list for `variant`.
///
/// Walks the variant's constructor profile in declared order, appending the
/// supplied value for each role. The walk stops at the first absent role,
/// producing a shorter argument list: every leading prefix of a profile is a
/// deployable arity. Supplying a later role while an earlier one is absent is
/// rejected, because positional constructor arguments cannot be skipped.
///
/// This is a pure function: no network access, no side effects, and the same
/// inputs always produce the same list.
pub fn resolve(variant: ContractVariant, roles: &RoleValues) -> Result<Vec<String>, DeployError> {
    let profile = variant.constructor_profile();
    let mut args = Vec::with_capacity(profile.len());

    for (index, role) in profile.roles().iter().copied().enumerate() {
        match roles.get(role) {
            Some(value) => {
                validate_address(role, value)?;
                args.push(value.clone());
            }
            None => {
                // A supplied later role would leave a hole in the positional
                // argument list.
                if let Some(supplied) = profile.roles()[index + 1..]
                    .iter()
                    .copied()
                    .find(|later| roles.contains_key(*later))
                {
                    return Err(DeployError::MissingRequiredRole {
                        variant,
                        missing: role,
                        supplied,
                    });
                }
                break;
            }
        }
    }

    Ok(args)
}

/// Validate an account address: `0x` prefix followed by 40 hex characters.
pub(crate) fn validate_address(role: &str, value: &str) -> Result<(), DeployError> {
    let well_formed = value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit());

    if well_formed {
        Ok(())
    } else {
        Err(DeployError::InvalidAddressFormat {
            role: role.to_string(),
            value: value.to_string(),
        })
    }
}
