//! Signing credential resolution.
//!
//! The tool never signs transactions itself: a private key or mnemonic is
//! used only to derive the sender address that goes into the transaction's
//! `from` field. The node behind the RPC endpoint performs the actual
//! signing, and key material never leaves the process.

use anyhow::{Context, Result};
use alloy_core::primitives::Address;
use alloy_signer_local::coins_bip39::English;
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};

/// Sources for the deployment sender identity, in resolution order.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Explicit sender address; skips key derivation entirely.
    pub sender: Option<String>,
    /// Hex private key, with or without the 0x prefix.
    pub private_key: Option<String>,
    /// BIP-39 mnemonic phrase; the first account is used.
    pub mnemonic: Option<String>,
}

impl Credentials {
    /// Resolve the sender address.
    ///
    /// An explicit sender wins, then the private key, then the mnemonic.
    /// The returned address is EIP-55 checksummed.
    pub fn resolve_sender(&self) -> Result<String> {
        if let Some(sender) = &self.sender {
            let address: Address = sender
                .parse()
                .with_context(|| format!("Invalid sender address: {sender}"))?;
            return Ok(address.to_checksum(None));
        }

        if let Some(key) = &self.private_key {
            let signer: PrivateKeySigner = key
                .trim_start_matches("0x")
                .parse()
                .context("Invalid private key (expected 32 bytes of hex)")?;
            return Ok(signer.address().to_checksum(None));
        }

        if let Some(phrase) = &self.mnemonic {
            let signer = MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .build()
                .context("Invalid mnemonic phrase")?;
            return Ok(signer.address().to_checksum(None));
        }

        anyhow::bail!("No signing credential: provide --sender, PRIVATE_KEY, or MNEMONIC")
    }
}
