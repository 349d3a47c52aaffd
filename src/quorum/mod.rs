//! Threshold Signature Quorum.
//!
//! Authorizes administrative messages that carry signatures from at least
//! `THRESHOLD` of the `SIGNER_COUNT` registered signers.
//!
//! # Components
//! - `digest`: Versioned structured-message encoding shared by all schemas.
//! - `signature`: 65-byte recoverable signature blobs and a local signer.
//! - `signer_set`: The fixed 5-member signer set.
//!
//! # Replay protection
//! Every digest commits to the nonce that is current when verification
//! starts. The nonce advances by exactly one per successful authorization and
//! never on failure, so a signature set is usable once.

pub mod digest;
pub mod signature;
pub mod signer_set;

use core::fmt;
use secp256k1::{Secp256k1, VerifyOnly};

use crate::primitives::Address;
use digest::{Domain, StructuredMessage};
use signature::SignatureBlob;
use signer_set::{SignerSet, SIGNER_COUNT};

/// Distinct signers required to authorize an action.
pub const THRESHOLD: usize = 3;

/// Errors for quorum operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumError {
    /// Deadline has passed.
    Expired,
    /// Blob has the wrong length or encoding, or does not recover to a key.
    MalformedSignature,
    /// Fewer than `THRESHOLD` distinct registered signers.
    QuorumNotMet,
    /// Signer configuration has a null entry or a duplicate.
    InvalidSigners,
    /// Threshold invariant broken.
    InvalidThreshold,
    /// Approval was issued by another quorum or for a nonce that is no
    /// longer current.
    StaleApproval,
    /// Nonce cannot advance further.
    NonceExhausted,
    /// Secret key bytes are not a valid secp256k1 scalar.
    InvalidKey,
}

impl fmt::Display for QuorumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumError::Expired => write!(f, "Signature deadline has passed"),
            QuorumError::MalformedSignature => write!(f, "Malformed or unrecoverable signature"),
            QuorumError::QuorumNotMet => {
                write!(f, "Fewer than {} distinct authorized signers", THRESHOLD)
            }
            QuorumError::InvalidSigners => {
                write!(f, "Signer set must hold {} distinct non-null identities", SIGNER_COUNT)
            }
            QuorumError::InvalidThreshold => write!(f, "Quorum threshold invariant violated"),
            QuorumError::StaleApproval => write!(f, "Approval is stale or from another quorum"),
            QuorumError::NonceExhausted => write!(f, "Quorum nonce exhausted"),
            QuorumError::InvalidKey => write!(f, "Invalid secp256k1 secret key"),
        }
    }
}

impl std::error::Error for QuorumError {}

/// Proof that a message passed verification at a specific nonce.
///
/// Consumed by `SignatureQuorum::commit`. Dropping it leaves the nonce as is.
/// An approval is bound to the domain of the quorum that issued it.
#[derive(Debug)]
#[must_use = "an approval only takes effect once committed"]
pub struct Approval {
    nonce: u64,
    domain_separator: [u8; 32],
    approvers: Vec<Address>,
}

impl Approval {
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The distinct signers that were counted, in signature order.
    pub fn approvers(&self) -> &[Address] {
        &self.approvers
    }
}

/// Signer set, threshold and replay nonce.
pub struct SignatureQuorum {
    signers: SignerSet,
    threshold: usize,
    nonce: u64,
    domain_separator: [u8; 32],
    secp: Secp256k1<VerifyOnly>,
}

impl SignatureQuorum {
    /// Creates a quorum for `domain` with the initial signer set.
    pub fn new(domain: &Domain, signers: [Address; SIGNER_COUNT]) -> Result<Self, QuorumError> {
        Ok(Self {
            signers: SignerSet::new(signers)?,
            threshold: THRESHOLD,
            nonce: 0,
            domain_separator: domain.separator(),
            secp: Secp256k1::verification_only(),
        })
    }

    /// Replaces the signer set. The nonce is untouched.
    ///
    /// The replacement set is validated in full before anything is swapped, so
    /// a rejected configuration leaves the current set in place.
    pub fn configure(&mut self, signers: [Address; SIGNER_COUNT]) -> Result<(), QuorumError> {
        self.signers = SignerSet::new(signers)?;
        log::info!("Quorum: signer set replaced at nonce {}", self.nonce);
        Ok(())
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn signers(&self) -> &[Address; SIGNER_COUNT] {
        self.signers.as_array()
    }

    pub fn is_signer(&self, identity: &Address) -> bool {
        self.signers.contains(identity)
    }

    /// Digest signers must sign for `message` at the current nonce.
    pub fn digest_for<M: StructuredMessage + ?Sized>(
        &self,
        message: &M,
        deadline: u64,
    ) -> [u8; 32] {
        digest::message_digest(&self.domain_separator, message, self.nonce, deadline)
    }

    /// Checks `signatures` against `message` without advancing the nonce.
    ///
    /// Every blob is decoded and recovered before counting starts, so a
    /// malformed blob fails the call wherever it sits in the list.
    pub fn verify<M, S>(
        &self,
        message: &M,
        deadline: u64,
        signatures: &[S],
        now: u64,
    ) -> Result<Approval, QuorumError>
    where
        M: StructuredMessage + ?Sized,
        S: AsRef<[u8]>,
    {
        if now > deadline {
            return Err(QuorumError::Expired);
        }
        if self.threshold != THRESHOLD {
            return Err(QuorumError::InvalidThreshold);
        }
        if self.nonce == u64::MAX {
            return Err(QuorumError::NonceExhausted);
        }

        let digest = self.digest_for(message, deadline);
        let recovered = signatures
            .iter()
            .map(|blob| SignatureBlob::parse(blob.as_ref())?.recover(&self.secp, &digest))
            .collect::<Result<Vec<_>, _>>()?;

        let approvers = self.distinct_signers(&recovered);
        if approvers.len() < self.threshold {
            log::debug!(
                "Quorum: {} of {} required signers for nonce {}",
                approvers.len(),
                self.threshold,
                self.nonce
            );
            return Err(QuorumError::QuorumNotMet);
        }

        Ok(Approval {
            nonce: self.nonce,
            domain_separator: self.domain_separator,
            approvers,
        })
    }

    /// Advances the nonce for a verified approval. Returns the nonce the
    /// approval consumed.
    ///
    /// Approvals issued under another domain are rejected as stale.
    pub fn commit(&mut self, approval: Approval) -> Result<u64, QuorumError> {
        if approval.domain_separator != self.domain_separator || approval.nonce != self.nonce {
            return Err(QuorumError::StaleApproval);
        }
        self.nonce = self.nonce.checked_add(1).ok_or(QuorumError::NonceExhausted)?;
        Ok(approval.nonce)
    }

    /// Verifies and commits in one step.
    pub fn authorize<M, S>(
        &mut self,
        message: &M,
        deadline: u64,
        signatures: &[S],
        now: u64,
    ) -> Result<u64, QuorumError>
    where
        M: StructuredMessage + ?Sized,
        S: AsRef<[u8]>,
    {
        let approval = self.verify(message, deadline, signatures, now)?;
        self.commit(approval)
    }

    /// Registered identities in first-seen order, each counted once, stopping
    /// at the threshold.
    fn distinct_signers(&self, recovered: &[Address]) -> Vec<Address> {
        let mut counted: Vec<Address> = Vec::with_capacity(self.threshold);
        for identity in recovered {
            if !self.signers.contains(identity) {
                log::debug!("Quorum: skipping unregistered signer {}", identity);
                continue;
            }
            if counted.contains(identity) {
                continue;
            }
            counted.push(*identity);
            if counted.len() == self.threshold {
                break;
            }
        }
        counted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::digest::Field;
    use crate::test_support::{blobs, signers, Fixture};
    use proptest::prelude::*;

    struct Ping(u64);

    impl StructuredMessage for Ping {
        fn type_descriptor(&self) -> &'static str {
            "Ping(uint64 value,uint64 nonce,uint64 deadline)"
        }
        fn fields(&self) -> Vec<Field> {
            vec![Field::U64(self.0)]
        }
    }

    fn quorum(fx: &Fixture) -> SignatureQuorum {
        SignatureQuorum::new(&fx.domain, fx.addresses()).unwrap()
    }

    #[test]
    fn test_authorize_with_three_signers() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[0, 2, 4], &digest);

        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 50), Ok(0));
        assert_eq!(q.nonce(), 1);
    }

    #[test]
    fn test_replay_fails_after_nonce_advance() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[0, 2, 4], &digest);

        q.authorize(&Ping(1), 100, &sigs, 50).unwrap();
        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 50), Err(QuorumError::QuorumNotMet));
        assert_eq!(q.nonce(), 1);
    }

    #[test]
    fn test_two_signers_plus_outsider() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let mut sigs = blobs(&fx.signers, &[0, 1], &digest);
        sigs.push(fx.outsider.sign(&digest).to_vec());

        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 50), Err(QuorumError::QuorumNotMet));
        assert_eq!(q.nonce(), 0);
    }

    #[test]
    fn test_duplicate_signer_counts_once() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[0, 0, 1, 1], &digest);

        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 50), Err(QuorumError::QuorumNotMet));
    }

    #[test]
    fn test_raw_and_offset_recovery_ids_count_once() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let mut sigs = blobs(&fx.signers, &[0, 1], &digest);
        let mut alt = sigs[0].clone();
        alt[64] -= 27;
        sigs.push(alt);

        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 50), Err(QuorumError::QuorumNotMet));
    }

    #[test]
    fn test_deadline_boundary() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[0, 1, 2], &digest);

        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 101), Err(QuorumError::Expired));
        assert_eq!(q.authorize(&Ping(1), 100, &sigs, 100), Ok(0));
    }

    #[test]
    fn test_malformed_blob_fails_anywhere() {
        let fx = Fixture::new();
        let q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let mut sigs = blobs(&fx.signers, &[0, 1, 2], &digest);
        sigs.push(vec![0u8; 10]);

        assert_eq!(
            q.verify(&Ping(1), 100, &sigs, 50).unwrap_err(),
            QuorumError::MalformedSignature
        );
    }

    #[test]
    fn test_signature_for_other_message_rejected() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[0, 1, 2], &digest);

        assert_eq!(q.authorize(&Ping(2), 100, &sigs, 50), Err(QuorumError::QuorumNotMet));
        // Deadline is part of the digest as well.
        assert_eq!(q.authorize(&Ping(1), 101, &sigs, 50), Err(QuorumError::QuorumNotMet));
    }

    #[test]
    fn test_dropped_approval_keeps_nonce() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let digest = q.digest_for(&Ping(1), 100);
        let sigs = blobs(&fx.signers, &[1, 2, 3], &digest);

        let approval = q.verify(&Ping(1), 100, &sigs, 50).unwrap();
        assert_eq!(approval.approvers().len(), THRESHOLD);
        drop(approval);
        assert_eq!(q.nonce(), 0);

        let approval = q.verify(&Ping(1), 100, &sigs, 50).unwrap();
        assert_eq!(q.commit(approval), Ok(0));
        assert_eq!(q.nonce(), 1);
    }

    #[test]
    fn test_stale_approval_rejected() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let d0 = q.digest_for(&Ping(1), 100);
        let first = q.verify(&Ping(1), 100, &blobs(&fx.signers, &[0, 1, 2], &d0), 50).unwrap();
        let second = q.verify(&Ping(1), 100, &blobs(&fx.signers, &[2, 3, 4], &d0), 50).unwrap();

        assert_eq!(q.commit(first), Ok(0));
        assert_eq!(q.commit(second), Err(QuorumError::StaleApproval));
        assert_eq!(q.nonce(), 1);
    }

    #[test]
    fn test_foreign_approval_rejected() {
        let fx = Fixture::new();
        let issuer = quorum(&fx);
        let others = signers(30..35);
        let other_domain = Domain::new("OtherGate", "1", 8);
        let mut other = SignatureQuorum::new(
            &other_domain,
            [0, 1, 2, 3, 4].map(|i| others[i].address()),
        )
        .unwrap();

        let digest = issuer.digest_for(&Ping(1), 100);
        let approval = issuer
            .verify(&Ping(1), 100, &blobs(&fx.signers, &[0, 1, 2], &digest), 50)
            .unwrap();
        assert_eq!(approval.nonce(), other.nonce());

        assert_eq!(other.commit(approval), Err(QuorumError::StaleApproval));
        assert_eq!(other.nonce(), 0);
        assert_eq!(issuer.nonce(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_signers() {
        let fx = Fixture::new();

        let mut duplicate = fx.addresses();
        duplicate[3] = duplicate[1];
        assert!(matches!(
            SignatureQuorum::new(&fx.domain, duplicate),
            Err(QuorumError::InvalidSigners)
        ));

        let mut null = fx.addresses();
        null[0] = Address::ZERO;
        assert!(matches!(
            SignatureQuorum::new(&fx.domain, null),
            Err(QuorumError::InvalidSigners)
        ));
    }

    #[test]
    fn test_configure_replaces_membership() {
        let fx = Fixture::new();
        let mut q = quorum(&fx);
        let fresh = signers(20..25);
        let mut next = fx.addresses();
        next[0] = fresh[0].address();

        q.configure(next).unwrap();
        assert!(!q.is_signer(&fx.signers[0].address()));
        assert!(q.is_signer(&fresh[0].address()));
        assert_eq!(q.nonce(), 0);

        let mut bad = next;
        bad[1] = bad[2];
        assert_eq!(q.configure(bad), Err(QuorumError::InvalidSigners));
        assert_eq!(q.signers(), &next);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_outcome_independent_of_order(
            picks in proptest::collection::vec(0usize..7, 0..9),
            seed in any::<u64>(),
        ) {
            let fx = Fixture::new();
            let q = quorum(&fx);
            let digest = q.digest_for(&Ping(seed), 100);

            // 0..5 registered, 5 outsider, 6 registered signer over a wrong digest.
            let sigs: Vec<Vec<u8>> = picks
                .iter()
                .map(|&p| match p {
                    0..=4 => fx.signers[p].sign(&digest).to_vec(),
                    5 => fx.outsider.sign(&digest).to_vec(),
                    _ => fx.signers[0].sign(&[0xEE; 32]).to_vec(),
                })
                .collect();
            let distinct: std::collections::HashSet<usize> =
                picks.iter().copied().filter(|&p| p < 5).collect();
            let expected = distinct.len() >= THRESHOLD;

            let mut reversed = sigs.clone();
            reversed.reverse();

            prop_assert_eq!(q.verify(&Ping(seed), 100, &sigs, 10).is_ok(), expected);
            prop_assert_eq!(q.verify(&Ping(seed), 100, &reversed, 10).is_ok(), expected);
        }
    }
}
