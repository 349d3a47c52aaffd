//! Fixed-size signer set.

use crate::primitives::Address;
use crate::quorum::QuorumError;
use std::collections::HashSet;

/// Number of registered signers.
pub const SIGNER_COUNT: usize = 5;

/// Exactly `SIGNER_COUNT` distinct, non-null signers.
///
/// The ordered array is what reconfiguration messages commit to; the hash set
/// answers membership. Both are built together and replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSet {
    ordered: [Address; SIGNER_COUNT],
    members: HashSet<Address>,
}

impl SignerSet {
    /// Validates and builds a signer set.
    pub fn new(signers: [Address; SIGNER_COUNT]) -> Result<Self, QuorumError> {
        let mut members = HashSet::with_capacity(SIGNER_COUNT);
        for signer in signers.iter() {
            if signer.is_zero() || !members.insert(*signer) {
                return Err(QuorumError::InvalidSigners);
            }
        }
        Ok(Self { ordered: signers, members })
    }

    pub fn contains(&self, identity: &Address) -> bool {
        self.members.contains(identity)
    }

    pub fn as_array(&self) -> &[Address; SIGNER_COUNT] {
        &self.ordered
    }
}
