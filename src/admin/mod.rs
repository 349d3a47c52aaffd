//! Administrative Orchestration.
//!
//! `AdminGate` composes the signature quorum, the lock registry and the
//! external collaborators (clock, pause flag, blacklist, ledger). Each action
//! builds its schema message, has the quorum verify it, applies the primitive,
//! and only then advances the nonce and notifies observers.
//!
//! # Failure model
//! Every failure is non-mutating: no primitive change, no nonce advance, no
//! event.

pub mod collaborators;
pub mod events;
pub mod gate;
pub mod schema;

use core::fmt;

use crate::lock::LockError;
use crate::quorum::QuorumError;

pub use collaborators::{Blacklist, Ledger, LedgerError, MemoryBlacklist, PauseFlag, PauseSwitch};
pub use events::{AdminEvent, AdminObserver, EventRecord};
pub use gate::AdminGate;
pub use schema::AdminAction;

/// Action-specific precondition that was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// A required identity is the null address.
    NullAccount,
    /// Target account is currently locked.
    AccountLocked,
    /// Target account is blacklisted.
    AccountBlacklisted,
}

/// Errors surfaced by administrative actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminError {
    Quorum(QuorumError),
    Lock(LockError),
    PreconditionFailed(Precondition),
    Ledger(LedgerError),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Quorum(e) => write!(f, "Authorization failed: {}", e),
            AdminError::Lock(e) => write!(f, "Lock rejected: {}", e),
            AdminError::PreconditionFailed(p) => write!(f, "Precondition failed: {:?}", p),
            AdminError::Ledger(e) => write!(f, "Ledger rejected action: {}", e),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Quorum(e) => Some(e),
            AdminError::Lock(e) => Some(e),
            AdminError::Ledger(e) => Some(e),
            AdminError::PreconditionFailed(_) => None,
        }
    }
}

impl From<QuorumError> for AdminError {
    fn from(e: QuorumError) -> Self {
        AdminError::Quorum(e)
    }
}

impl From<LockError> for AdminError {
    fn from(e: LockError) -> Self {
        match e {
            LockError::NullAccount => AdminError::PreconditionFailed(Precondition::NullAccount),
            other => AdminError::Lock(other),
        }
    }
}

impl From<LedgerError> for AdminError {
    fn from(e: LedgerError) -> Self {
        AdminError::Ledger(e)
    }
}
