//! Quorum-gated administrative control plane.
//!
//! Privileged ledger mutations (pause, mint, burn, controller changes,
//! account locks, blacklist edits, asset rescue, signer rotation) are applied
//! only when at least 3 of 5 registered signers have signed the action's
//! structured message at the current nonce.
//!
//! # Modules
//! - `quorum`: signer set, replay nonce, signature recovery and counting.
//! - `lock`: time-bounded account locks with an enumerable, prunable index.
//! - `admin`: action catalogue and the `AdminGate` orchestrator.

pub mod admin;
pub mod audit;
pub mod config;
pub mod lock;
pub mod primitives;
pub mod quorum;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::{AdminAction, AdminError, AdminEvent, AdminGate, AdminObserver};
pub use config::{ConfigError, GateConfig};
pub use lock::{LockError, LockRegistry, LockedPage};
pub use primitives::{Address, Clock};
pub use quorum::{QuorumError, SignatureQuorum, THRESHOLD};
