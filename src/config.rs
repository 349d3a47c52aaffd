//! Configuration management for the admin gate.
//!
//! Defines the structure for deployment settings.

use core::fmt;

use crate::primitives::{Address, AddressError};
use crate::quorum::digest::Domain;
use crate::quorum::signer_set::SIGNER_COUNT;
use crate::quorum::QuorumError;

/// Errors turning a `GateConfig` into typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Wrong number of signer entries.
    SignerCount(usize),
    /// A signer entry is not a valid address.
    SignerAddress { index: usize, error: AddressError },
    /// Signer entries parse but do not form a valid set.
    Signers(QuorumError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SignerCount(n) => {
                write!(f, "Expected {} signers, got {}", SIGNER_COUNT, n)
            }
            ConfigError::SignerAddress { index, error } => {
                write!(f, "Signer {} is invalid: {}", index, error)
            }
            ConfigError::Signers(e) => write!(f, "Invalid signer set: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<QuorumError> for ConfigError {
    fn from(e: QuorumError) -> Self {
        ConfigError::Signers(e)
    }
}

/// Main configuration structure for the gate.
///
/// Populated by the host application and passed to `AdminGate::from_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateConfig {
    /// Human-readable deployment name, bound into every digest.
    pub domain_name: String,

    /// Schema version string, bound into every digest.
    pub domain_version: String,

    /// Distinguishes deployments sharing a name (e.g. a chain id).
    pub instance_id: u64,

    /// The five initial signer addresses, hex encoded.
    pub signers: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            domain_name: String::from("QuorumAdmin"),
            domain_version: String::from("1"),
            instance_id: 1,
            signers: Vec::new(),
        }
    }
}

impl GateConfig {
    pub fn domain(&self) -> Domain {
        Domain::new(self.domain_name.clone(), self.domain_version.clone(), self.instance_id)
    }

    /// Parses the configured signers.
    pub fn signer_addresses(&self) -> Result<[Address; SIGNER_COUNT], ConfigError> {
        if self.signers.len() != SIGNER_COUNT {
            return Err(ConfigError::SignerCount(self.signers.len()));
        }
        let mut out = [Address::ZERO; SIGNER_COUNT];
        for (index, (slot, text)) in out.iter_mut().zip(&self.signers).enumerate() {
            *slot = Address::from_hex(text)
                .map_err(|error| ConfigError::SignerAddress { index, error })?;
        }
        Ok(out)
    }
}
