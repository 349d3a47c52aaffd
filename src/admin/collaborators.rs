//! External collaborators the gate drives once an action is authorized.
//!
//! The gate owns one of each and never calls back into itself from them.

use core::fmt;
use std::collections::HashSet;

use crate::primitives::Address;

/// Global pause switch.
pub trait PauseFlag {
    fn is_paused(&self) -> bool;
    fn set_paused(&mut self, paused: bool);
}

/// Identity blacklist.
pub trait Blacklist {
    fn is_blacklisted(&self, account: &Address) -> bool;
    fn set_blacklisted(&mut self, account: Address, listed: bool);
}

/// Errors reported by the token ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// Controller balance too low to burn.
    InsufficientBalance,
    /// Mint would overflow total supply.
    SupplyOverflow,
    /// External asset could not be transferred out.
    RescueFailed,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InsufficientBalance => write!(f, "Insufficient controller balance"),
            LedgerError::SupplyOverflow => write!(f, "Total supply overflow"),
            LedgerError::RescueFailed => write!(f, "External asset transfer failed"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Mutation surface of the token ledger. Issuance and burning act on the
/// controller account.
pub trait Ledger {
    fn controller(&self) -> Address;
    fn set_controller(&mut self, controller: Address);
    fn mint(&mut self, amount: u128) -> Result<(), LedgerError>;
    fn burn(&mut self, amount: u128) -> Result<(), LedgerError>;
    /// Sends `amount` of a foreign `asset` held by the ledger to `recipient`.
    fn rescue(
        &mut self,
        asset: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<(), LedgerError>;
}

/// In-memory pause flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseFlag for PauseSwitch {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// In-memory blacklist.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlacklist {
    listed: HashSet<Address>,
}

impl MemoryBlacklist {
    pub fn len(&self) -> usize {
        self.listed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listed.is_empty()
    }
}

impl Blacklist for MemoryBlacklist {
    fn is_blacklisted(&self, account: &Address) -> bool {
        self.listed.contains(account)
    }

    fn set_blacklisted(&mut self, account: Address, listed: bool) {
        if listed {
            self.listed.insert(account);
        } else {
            self.listed.remove(&account);
        }
    }
}
