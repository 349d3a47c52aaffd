//! Deterministic signers and collaborators shared by unit tests.

use crate::admin::{Ledger, LedgerError};
use crate::primitives::Address;
use crate::quorum::digest::Domain;
use crate::quorum::signature::LocalSigner;
use crate::quorum::signer_set::SIGNER_COUNT;
use std::collections::HashMap;
use std::ops::Range;

pub(crate) fn signers(seeds: Range<u8>) -> Vec<LocalSigner> {
    seeds
        .map(|seed| LocalSigner::from_bytes(&[seed; 32]).expect("valid test key"))
        .collect()
}

/// Signatures from `signers[i]` for each `i` in `which`.
pub(crate) fn blobs(signers: &[LocalSigner], which: &[usize], digest: &[u8; 32]) -> Vec<Vec<u8>> {
    which.iter().map(|&i| signers[i].sign(digest).to_vec()).collect()
}

pub(crate) struct Fixture {
    pub domain: Domain,
    pub signers: Vec<LocalSigner>,
    pub outsider: LocalSigner,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            domain: Domain::new("QuorumAdminTest", "1", 7),
            signers: signers(1..1 + SIGNER_COUNT as u8),
            outsider: LocalSigner::from_bytes(&[99u8; 32]).expect("valid test key"),
        }
    }

    pub fn addresses(&self) -> [Address; SIGNER_COUNT] {
        let mut out = [Address::ZERO; SIGNER_COUNT];
        for (slot, signer) in out.iter_mut().zip(&self.signers) {
            *slot = signer.address();
        }
        out
    }
}

pub(crate) fn account(byte: u8) -> Address {
    Address([byte; 20])
}

/// Balance-tracking ledger double.
#[derive(Debug, Default)]
pub(crate) struct MockLedger {
    pub controller: Address,
    pub balances: HashMap<Address, u128>,
    pub rescued: Vec<(Address, Address, u128)>,
}

impl MockLedger {
    pub fn with_controller(controller: Address) -> Self {
        Self { controller, ..Self::default() }
    }

    pub fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}

impl Ledger for MockLedger {
    fn controller(&self) -> Address {
        self.controller
    }

    fn set_controller(&mut self, controller: Address) {
        self.controller = controller;
    }

    fn mint(&mut self, amount: u128) -> Result<(), LedgerError> {
        let balance = self.balances.entry(self.controller).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::SupplyOverflow)?;
        Ok(())
    }

    fn burn(&mut self, amount: u128) -> Result<(), LedgerError> {
        let balance = self.balances.entry(self.controller).or_insert(0);
        *balance = balance.checked_sub(amount).ok_or(LedgerError::InsufficientBalance)?;
        Ok(())
    }

    fn rescue(
        &mut self,
        asset: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.rescued.push((asset, recipient, amount));
        Ok(())
    }
}
