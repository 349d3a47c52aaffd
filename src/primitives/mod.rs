//! Shared primitives.
//!
//! - `address`: 20-byte account and signer identities.
//! - `clock`: the external time source consumed by the gate.

pub mod address;
pub mod clock;

pub use address::{Address, AddressError};
pub use clock::{Clock, ManualClock, SystemClock};
