//! Notifications emitted after an administrative action is applied.

use std::sync::Arc;

use crate::primitives::Address;
use crate::quorum::signer_set::SIGNER_COUNT;

/// What an applied action changed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdminEvent {
    Paused,
    Unpaused,
    Minted { amount: u128 },
    Burned { amount: u128 },
    ControllerChanged { previous: Address, current: Address },
    Locked { account: Address, until: u64 },
    Unlocked { account: Address },
    Pruned { removed: usize },
    BlacklistAdded { account: Address },
    BlacklistRemoved { account: Address },
    Rescued { asset: Address, recipient: Address, amount: u128 },
    SignersReconfigured { signers: [Address; SIGNER_COUNT] },
}

/// An event with the nonce that authorized it and the time it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventRecord {
    pub nonce: u64,
    pub timestamp: u64,
    pub event: AdminEvent,
}

/// Observer for applied actions. Only called on success.
pub trait AdminObserver: Send + Sync {
    fn on_event(&self, record: &EventRecord);
}

impl<T: AdminObserver + ?Sized> AdminObserver for Arc<T> {
    fn on_event(&self, record: &EventRecord) {
        (**self).on_event(record)
    }
}
