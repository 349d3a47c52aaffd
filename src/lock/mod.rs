//! Time-Lock Registry.
//!
//! Tracks per-account spending locks. An account is locked while
//! `expiry != 0 && now < expiry`. Locked accounts are also kept in an
//! enumerable index; entries whose lock has lapsed stay in the index until
//! `prune` removes them, so every read re-checks liveness against `now`.

pub mod index;

use core::fmt;
use std::collections::HashMap;

use crate::primitives::Address;
use index::LockedIndex;

/// Errors for lock registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// Account is the null identity.
    NullAccount,
    /// Absolute expiry is not in the future.
    InvalidExpiry,
    /// Duration is zero or overflows the clock.
    InvalidDuration,
    /// Pagination offset is past the end of the index.
    OutOfRange,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::NullAccount => write!(f, "Account must not be the null identity"),
            LockError::InvalidExpiry => write!(f, "Lock expiry must be in the future"),
            LockError::InvalidDuration => write!(f, "Lock duration must be positive"),
            LockError::OutOfRange => write!(f, "Offset is beyond the locked-accounts index"),
        }
    }
}

impl std::error::Error for LockError {}

/// One page of live locks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedPage {
    pub accounts: Vec<Address>,
    pub expiries: Vec<u64>,
    /// Number of entries collected.
    pub count: usize,
    /// Index position to resume scanning from.
    pub next_offset: usize,
}

/// Account lock expiries plus the locked-accounts index.
#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    expiries: HashMap<Address, u64>,
    index: LockedIndex,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored expiry, 0 if the account is not locked.
    pub fn expiry_of(&self, account: &Address) -> u64 {
        self.expiries.get(account).copied().unwrap_or(0)
    }

    pub fn is_locked(&self, account: &Address, now: u64) -> bool {
        let expiry = self.expiry_of(account);
        expiry != 0 && now < expiry
    }

    /// Validates an absolute lock without applying it.
    pub fn check_lock_until(
        &self,
        account: &Address,
        until: u64,
        now: u64,
    ) -> Result<(), LockError> {
        if account.is_zero() {
            return Err(LockError::NullAccount);
        }
        if until <= now {
            return Err(LockError::InvalidExpiry);
        }
        Ok(())
    }

    /// Validates a relative lock and returns its absolute expiry.
    pub fn check_lock_for(
        &self,
        account: &Address,
        duration: u64,
        now: u64,
    ) -> Result<u64, LockError> {
        if account.is_zero() {
            return Err(LockError::NullAccount);
        }
        if duration == 0 {
            return Err(LockError::InvalidDuration);
        }
        now.checked_add(duration).ok_or(LockError::InvalidDuration)
    }

    /// Locks `account` until `until`. Re-locking an indexed account only
    /// moves its expiry.
    pub fn lock_until(&mut self, account: Address, until: u64, now: u64) -> Result<(), LockError> {
        self.check_lock_until(&account, until, now)?;
        self.expiries.insert(account, until);
        self.index.insert(account);
        Ok(())
    }

    /// Locks `account` for `duration` seconds from `now`. Returns the expiry.
    pub fn lock_for(
        &mut self,
        account: Address,
        duration: u64,
        now: u64,
    ) -> Result<u64, LockError> {
        let until = self.check_lock_for(&account, duration, now)?;
        self.lock_until(account, until, now)?;
        Ok(until)
    }

    /// Clears the lock on `account`. Unlocking an unlocked account is a no-op.
    /// Returns whether a lock entry existed.
    pub fn unlock(&mut self, account: &Address) -> bool {
        let had_expiry = self.expiries.remove(account).is_some();
        let was_indexed = self.index.remove(account);
        had_expiry || was_indexed
    }

    /// Collects up to `limit` live locks, scanning the index from `offset`.
    pub fn list_locked(
        &self,
        offset: usize,
        limit: usize,
        now: u64,
    ) -> Result<LockedPage, LockError> {
        if offset > self.index.len() {
            return Err(LockError::OutOfRange);
        }

        let mut page = LockedPage {
            next_offset: offset,
            ..LockedPage::default()
        };
        for account in &self.index.as_slice()[offset..] {
            if page.count == limit {
                break;
            }
            page.next_offset += 1;
            if self.is_locked(account, now) {
                page.accounts.push(*account);
                page.expiries.push(self.expiry_of(account));
                page.count += 1;
            }
        }
        Ok(page)
    }

    /// Removes up to `max_entries` lapsed entries, scanning from the tail.
    /// Returns the number removed.
    ///
    /// Each removal swaps the current last element into the vacated slot;
    /// that element was already inspected and found live, so the scan simply
    /// continues downward.
    pub fn prune(&mut self, max_entries: usize, now: u64) -> usize {
        let mut removed = 0;
        let mut cursor = self.index.len();
        while cursor > 0 && removed < max_entries {
            cursor -= 1;
            let Some(account) = self.index.get(cursor) else {
                break;
            };
            if self.is_locked(&account, now) {
                continue;
            }
            self.expiries.remove(&account);
            self.index.remove(&account);
            removed += 1;
        }
        if removed > 0 {
            log::debug!(
                "Locks: pruned {} lapsed entries, {} remain indexed",
                removed,
                self.index.len()
            );
        }
        removed
    }

    /// Raw index length, including lapsed entries not yet pruned.
    pub fn locked_count(&self) -> usize {
        self.index.len()
    }

    /// Indexed accounts whose lock is still live at `now`.
    pub fn live_count(&self, now: u64) -> usize {
        self.index
            .as_slice()
            .iter()
            .filter(|a| self.is_locked(a, now))
            .count()
    }

    pub fn index(&self) -> &LockedIndex {
        &self.index
    }
}
