//! Administrative action catalogue.
//!
//! One variant per action. Each variant has its own type descriptor, which is
//! hashed into the digest as the action discriminator.

use crate::primitives::Address;
use crate::quorum::digest::{Field, StructuredMessage};
use crate::quorum::signer_set::SIGNER_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Pause,
    Unpause,
    Mint { amount: u128 },
    Burn { amount: u128 },
    SetController { controller: Address },
    LockFor { account: Address, duration: u64 },
    LockUntil { account: Address, until: u64 },
    Unlock { account: Address },
    Prune { max_entries: u64 },
    BlacklistAdd { account: Address },
    BlacklistRemove { account: Address },
    Rescue { asset: Address, recipient: Address, amount: u128 },
    ReconfigureSigners { signers: [Address; SIGNER_COUNT] },
}

impl AdminAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::Pause => "Pause",
            AdminAction::Unpause => "Unpause",
            AdminAction::Mint { .. } => "Mint",
            AdminAction::Burn { .. } => "Burn",
            AdminAction::SetController { .. } => "SetController",
            AdminAction::LockFor { .. } => "LockFor",
            AdminAction::LockUntil { .. } => "LockUntil",
            AdminAction::Unlock { .. } => "Unlock",
            AdminAction::Prune { .. } => "Prune",
            AdminAction::BlacklistAdd { .. } => "BlacklistAdd",
            AdminAction::BlacklistRemove { .. } => "BlacklistRemove",
            AdminAction::Rescue { .. } => "Rescue",
            AdminAction::ReconfigureSigners { .. } => "ReconfigureSigners",
        }
    }
}

impl StructuredMessage for AdminAction {
    fn type_descriptor(&self) -> &'static str {
        match self {
            AdminAction::Pause => "Pause(uint64 nonce,uint64 deadline)",
            AdminAction::Unpause => "Unpause(uint64 nonce,uint64 deadline)",
            AdminAction::Mint { .. } => "Mint(uint128 amount,uint64 nonce,uint64 deadline)",
            AdminAction::Burn { .. } => "Burn(uint128 amount,uint64 nonce,uint64 deadline)",
            AdminAction::SetController { .. } => {
                "SetController(address controller,uint64 nonce,uint64 deadline)"
            }
            AdminAction::LockFor { .. } => {
                "LockFor(address account,uint64 duration,uint64 nonce,uint64 deadline)"
            }
            AdminAction::LockUntil { .. } => {
                "LockUntil(address account,uint64 until,uint64 nonce,uint64 deadline)"
            }
            AdminAction::Unlock { .. } => "Unlock(address account,uint64 nonce,uint64 deadline)",
            AdminAction::Prune { .. } => "Prune(uint64 maxEntries,uint64 nonce,uint64 deadline)",
            AdminAction::BlacklistAdd { .. } => {
                "BlacklistAdd(address account,uint64 nonce,uint64 deadline)"
            }
            AdminAction::BlacklistRemove { .. } => {
                "BlacklistRemove(address account,uint64 nonce,uint64 deadline)"
            }
            AdminAction::Rescue { .. } => {
                "Rescue(address asset,address recipient,uint128 amount,uint64 nonce,uint64 deadline)"
            }
            AdminAction::ReconfigureSigners { .. } => {
                "ReconfigureSigners(address signer0,address signer1,address signer2,address signer3,address signer4,uint64 nonce,uint64 deadline)"
            }
        }
    }

    fn fields(&self) -> Vec<Field> {
        match *self {
            AdminAction::Pause | AdminAction::Unpause => Vec::new(),
            AdminAction::Mint { amount } | AdminAction::Burn { amount } => {
                vec![Field::U128(amount)]
            }
            AdminAction::SetController { controller } => vec![Field::Address(controller)],
            AdminAction::LockFor { account, duration } => {
                vec![Field::Address(account), Field::U64(duration)]
            }
            AdminAction::LockUntil { account, until } => {
                vec![Field::Address(account), Field::U64(until)]
            }
            AdminAction::Unlock { account }
            | AdminAction::BlacklistAdd { account }
            | AdminAction::BlacklistRemove { account } => vec![Field::Address(account)],
            AdminAction::Prune { max_entries } => vec![Field::U64(max_entries)],
            AdminAction::Rescue { asset, recipient, amount } => vec![
                Field::Address(asset),
                Field::Address(recipient),
                Field::U128(amount),
            ],
            AdminAction::ReconfigureSigners { signers } => {
                signers.iter().copied().map(Field::Address).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::digest::{message_digest, schema_matches, type_hash, Domain};
    use crate::test_support::account;
    use std::collections::HashSet;

    fn catalogue() -> Vec<AdminAction> {
        let a = account(1);
        vec![
            AdminAction::Pause,
            AdminAction::Unpause,
            AdminAction::Mint { amount: 1 },
            AdminAction::Burn { amount: 1 },
            AdminAction::SetController { controller: a },
            AdminAction::LockFor { account: a, duration: 1 },
            AdminAction::LockUntil { account: a, until: 1 },
            AdminAction::Unlock { account: a },
            AdminAction::Prune { max_entries: 1 },
            AdminAction::BlacklistAdd { account: a },
            AdminAction::BlacklistRemove { account: a },
            AdminAction::Rescue { asset: a, recipient: a, amount: 1 },
            AdminAction::ReconfigureSigners { signers: [a; SIGNER_COUNT] },
        ]
    }

    #[test]
    fn test_every_schema_is_well_formed() {
        for action in catalogue() {
            assert!(
                schema_matches(action.type_descriptor(), &action.fields()),
                "{} descriptor does not match its fields",
                action.name()
            );
            assert!(action.type_descriptor().starts_with(action.name()));
        }
    }

    #[test]
    fn test_discriminators_are_distinct() {
        let hashes: HashSet<[u8; 32]> =
            catalogue().iter().map(|a| type_hash(a.type_descriptor())).collect();
        assert_eq!(hashes.len(), catalogue().len());
    }

    #[test]
    fn test_shared_shapes_do_not_collide() {
        let sep = Domain::new("T", "1", 1).separator();
        let a = account(3);
        let pairs = [
            (AdminAction::Pause, AdminAction::Unpause),
            (AdminAction::Mint { amount: 9 }, AdminAction::Burn { amount: 9 }),
            (
                AdminAction::LockFor { account: a, duration: 9 },
                AdminAction::LockUntil { account: a, until: 9 },
            ),
            (AdminAction::BlacklistAdd { account: a }, AdminAction::BlacklistRemove { account: a }),
            (AdminAction::Unlock { account: a }, AdminAction::SetController { controller: a }),
        ];
        for (x, y) in pairs {
            assert_ne!(message_digest(&sep, &x, 0, 1), message_digest(&sep, &y, 0, 1));
        }
    }
}
