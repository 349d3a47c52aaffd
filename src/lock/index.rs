//! Enumerable set of locked accounts.
//!
//! A dense sequence plus a reverse map from account to 1-based position.
//! Removal swaps the last element into the vacated slot, so insert and remove
//! are both O(1). Order is not preserved across removals.

use crate::primitives::Address;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LockedIndex {
    accounts: Vec<Address>,
    positions: HashMap<Address, usize>,
}

impl LockedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Address> {
        self.accounts.get(index).copied()
    }

    /// 1-based position of `account`, or 0 if absent.
    pub fn position(&self, account: &Address) -> usize {
        self.positions.get(account).copied().unwrap_or(0)
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.positions.contains_key(account)
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.accounts
    }

    /// Appends `account`. Returns false if it was already present.
    pub fn insert(&mut self, account: Address) -> bool {
        if self.contains(&account) {
            return false;
        }
        self.accounts.push(account);
        self.positions.insert(account, self.accounts.len());
        true
    }

    /// Swap-removes `account`. Returns false if it was absent.
    pub fn remove(&mut self, account: &Address) -> bool {
        let Some(position) = self.positions.remove(account) else {
            return false;
        };
        let slot = position - 1;
        self.accounts.swap_remove(slot);
        if let Some(moved) = self.accounts.get(slot) {
            self.positions.insert(*moved, position);
        }
        true
    }

    /// Forward sequence and reverse map agree, with no duplicates.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.positions.len() == self.accounts.len()
            && self
                .accounts
                .iter()
                .enumerate()
                .all(|(i, a)| self.positions.get(a) == Some(&(i + 1)))
    }
}
