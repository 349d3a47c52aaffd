//! Quorum-gated administrative actions.
//!
//! # Flow
//! 1. Read the clock once.
//! 2. Check the action's own preconditions (null identities, locked or
//!    blacklisted targets, lock parameters, signer set shape).
//! 3. Verify the signatures against the action's schema at the current nonce.
//! 4. Apply the primitive.
//! 5. Commit the approval (nonce + 1) and notify observers.
//!
//! A failure at any step returns before step 5, so the nonce only moves when
//! the mutation took effect.

use crate::admin::collaborators::{Blacklist, Ledger, PauseFlag};
use crate::admin::events::{AdminEvent, AdminObserver, EventRecord};
use crate::admin::schema::AdminAction;
use crate::admin::{AdminError, Precondition};
use crate::config::{ConfigError, GateConfig};
use crate::lock::{LockRegistry, LockedPage};
use crate::primitives::{Address, Clock};
use crate::quorum::digest::Domain;
use crate::quorum::signer_set::{SignerSet, SIGNER_COUNT};
use crate::quorum::SignatureQuorum;

/// The administrative control plane.
pub struct AdminGate<C, P, B, L> {
    quorum: SignatureQuorum,
    locks: LockRegistry,
    clock: C,
    pause: P,
    blacklist: B,
    ledger: L,
    observers: Vec<Box<dyn AdminObserver>>,
}

impl<C, P, B, L> AdminGate<C, P, B, L>
where
    C: Clock,
    P: PauseFlag,
    B: Blacklist,
    L: Ledger,
{
    pub fn new(
        domain: &Domain,
        signers: [Address; SIGNER_COUNT],
        clock: C,
        pause: P,
        blacklist: B,
        ledger: L,
    ) -> Result<Self, AdminError> {
        Ok(Self {
            quorum: SignatureQuorum::new(domain, signers)?,
            locks: LockRegistry::new(),
            clock,
            pause,
            blacklist,
            ledger,
            observers: Vec::new(),
        })
    }

    pub fn from_config(
        config: &GateConfig,
        clock: C,
        pause: P,
        blacklist: B,
        ledger: L,
    ) -> Result<Self, ConfigError> {
        let signers = config.signer_addresses()?;
        Ok(Self {
            quorum: SignatureQuorum::new(&config.domain(), signers)?,
            locks: LockRegistry::new(),
            clock,
            pause,
            blacklist,
            ledger,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn AdminObserver>) {
        self.observers.push(observer);
    }

    // --- Actions -----------------------------------------------------------

    pub fn pause<S: AsRef<[u8]>>(
        &mut self,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        self.execute(now, AdminAction::Pause, deadline, signatures, |gate, _| {
            gate.pause.set_paused(true);
            Ok(((), AdminEvent::Paused))
        })
    }

    pub fn unpause<S: AsRef<[u8]>>(
        &mut self,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        self.execute(now, AdminAction::Unpause, deadline, signatures, |gate, _| {
            gate.pause.set_paused(false);
            Ok(((), AdminEvent::Unpaused))
        })
    }

    /// Issues `amount` to the controller account.
    pub fn mint<S: AsRef<[u8]>>(
        &mut self,
        amount: u128,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        let action = AdminAction::Mint { amount };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.ledger.mint(amount)?;
            Ok(((), AdminEvent::Minted { amount }))
        })
    }

    /// Burns `amount` from the controller account.
    pub fn burn<S: AsRef<[u8]>>(
        &mut self,
        amount: u128,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        let action = AdminAction::Burn { amount };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.ledger.burn(amount)?;
            Ok(((), AdminEvent::Burned { amount }))
        })
    }

    /// Moves the controller role. The new controller must be non-null, not
    /// locked and not blacklisted.
    pub fn set_controller<S: AsRef<[u8]>>(
        &mut self,
        controller: Address,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        if controller.is_zero() {
            return Err(AdminError::PreconditionFailed(Precondition::NullAccount));
        }
        if self.locks.is_locked(&controller, now) {
            return Err(AdminError::PreconditionFailed(Precondition::AccountLocked));
        }
        if self.blacklist.is_blacklisted(&controller) {
            return Err(AdminError::PreconditionFailed(Precondition::AccountBlacklisted));
        }
        let action = AdminAction::SetController { controller };
        self.execute(now, action, deadline, signatures, |gate, _| {
            let previous = gate.ledger.controller();
            gate.ledger.set_controller(controller);
            Ok(((), AdminEvent::ControllerChanged { previous, current: controller }))
        })
    }

    /// Locks `account` for `duration` seconds. Returns the expiry.
    pub fn lock_for<S: AsRef<[u8]>>(
        &mut self,
        account: Address,
        duration: u64,
        deadline: u64,
        signatures: &[S],
    ) -> Result<u64, AdminError> {
        let now = self.clock.now();
        self.locks.check_lock_for(&account, duration, now)?;
        let action = AdminAction::LockFor { account, duration };
        self.execute(now, action, deadline, signatures, |gate, now| {
            let until = gate.locks.lock_for(account, duration, now)?;
            Ok((until, AdminEvent::Locked { account, until }))
        })
    }

    /// Locks `account` until the absolute time `until`.
    pub fn lock_until<S: AsRef<[u8]>>(
        &mut self,
        account: Address,
        until: u64,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        self.locks.check_lock_until(&account, until, now)?;
        let action = AdminAction::LockUntil { account, until };
        self.execute(now, action, deadline, signatures, |gate, now| {
            gate.locks.lock_until(account, until, now)?;
            Ok(((), AdminEvent::Locked { account, until }))
        })
    }

    /// Clears any lock on `account`. Succeeds even if none was set.
    pub fn unlock<S: AsRef<[u8]>>(
        &mut self,
        account: Address,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        let action = AdminAction::Unlock { account };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.locks.unlock(&account);
            Ok(((), AdminEvent::Unlocked { account }))
        })
    }

    /// Removes up to `max_entries` lapsed locks from the index. Returns the
    /// number removed.
    pub fn prune<S: AsRef<[u8]>>(
        &mut self,
        max_entries: usize,
        deadline: u64,
        signatures: &[S],
    ) -> Result<usize, AdminError> {
        let now = self.clock.now();
        let action = AdminAction::Prune { max_entries: max_entries as u64 };
        self.execute(now, action, deadline, signatures, |gate, now| {
            let removed = gate.locks.prune(max_entries, now);
            Ok((removed, AdminEvent::Pruned { removed }))
        })
    }

    pub fn blacklist_add<S: AsRef<[u8]>>(
        &mut self,
        account: Address,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        if account.is_zero() {
            return Err(AdminError::PreconditionFailed(Precondition::NullAccount));
        }
        let action = AdminAction::BlacklistAdd { account };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.blacklist.set_blacklisted(account, true);
            Ok(((), AdminEvent::BlacklistAdded { account }))
        })
    }

    pub fn blacklist_remove<S: AsRef<[u8]>>(
        &mut self,
        account: Address,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        let action = AdminAction::BlacklistRemove { account };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.blacklist.set_blacklisted(account, false);
            Ok(((), AdminEvent::BlacklistRemoved { account }))
        })
    }

    /// Sends a foreign asset held by the ledger to `recipient`.
    pub fn rescue<S: AsRef<[u8]>>(
        &mut self,
        asset: Address,
        recipient: Address,
        amount: u128,
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        if asset.is_zero() || recipient.is_zero() {
            return Err(AdminError::PreconditionFailed(Precondition::NullAccount));
        }
        let action = AdminAction::Rescue { asset, recipient, amount };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.ledger.rescue(asset, recipient, amount)?;
            Ok(((), AdminEvent::Rescued { asset, recipient, amount }))
        })
    }

    /// Replaces the signer set. Signed by the current set.
    pub fn reconfigure_signers<S: AsRef<[u8]>>(
        &mut self,
        signers: [Address; SIGNER_COUNT],
        deadline: u64,
        signatures: &[S],
    ) -> Result<(), AdminError> {
        let now = self.clock.now();
        SignerSet::new(signers)?;
        let action = AdminAction::ReconfigureSigners { signers };
        self.execute(now, action, deadline, signatures, |gate, _| {
            gate.quorum.configure(signers)?;
            Ok(((), AdminEvent::SignersReconfigured { signers }))
        })
    }

    fn execute<S, R, F>(
        &mut self,
        now: u64,
        action: AdminAction,
        deadline: u64,
        signatures: &[S],
        apply: F,
    ) -> Result<R, AdminError>
    where
        S: AsRef<[u8]>,
        F: FnOnce(&mut Self, u64) -> Result<(R, AdminEvent), AdminError>,
    {
        let approval = match self.quorum.verify(&action, deadline, signatures, now) {
            Ok(approval) => approval,
            Err(e) => {
                log::warn!(
                    "Admin: {} rejected at nonce {}: {}",
                    action.name(),
                    self.quorum.nonce(),
                    e
                );
                return Err(e.into());
            }
        };

        let (output, event) = match apply(self, now) {
            Ok(applied) => applied,
            Err(e) => {
                log::warn!("Admin: {} failed to apply: {}", action.name(), e);
                return Err(e);
            }
        };

        let nonce = self.quorum.commit(approval)?;
        log::info!("Admin: {} applied at nonce {}", action.name(), nonce);

        let record = EventRecord { nonce, timestamp: now, event };
        for observer in &self.observers {
            observer.on_event(&record);
        }
        Ok(output)
    }

    // --- Queries -----------------------------------------------------------

    pub fn is_locked(&self, account: &Address) -> bool {
        self.locks.is_locked(account, self.clock.now())
    }

    pub fn lock_expiry(&self, account: &Address) -> u64 {
        self.locks.expiry_of(account)
    }

    pub fn list_locked(&self, offset: usize, limit: usize) -> Result<LockedPage, AdminError> {
        Ok(self.locks.list_locked(offset, limit, self.clock.now())?)
    }

    pub fn locked_count(&self) -> usize {
        self.locks.locked_count()
    }

    pub fn quorum_threshold(&self) -> usize {
        self.quorum.threshold()
    }

    pub fn quorum_nonce(&self) -> u64 {
        self.quorum.nonce()
    }

    pub fn signers(&self) -> &[Address; SIGNER_COUNT] {
        self.quorum.signers()
    }

    /// Digest signers must sign to authorize `action` at the current nonce.
    pub fn digest_for(&self, action: &AdminAction, deadline: u64) -> [u8; 32] {
        self.quorum.digest_for(action, deadline)
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.blacklist.is_blacklisted(account)
    }

    pub fn controller(&self) -> Address {
        self.ledger.controller()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
