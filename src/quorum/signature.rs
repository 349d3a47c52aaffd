//! Recoverable secp256k1 signatures.
//!
//! Wire form is a fixed 65-byte blob: `r` (32) ‖ `s` (32) ‖ `v` (1). `v` is
//! the recovery id, accepted both raw (0, 1) and with the conventional +27
//! offset (27, 28). High-`s` signatures are rejected so that a signer cannot
//! produce a second valid blob for the same digest by negating `s`.

use crate::primitives::Address;
use crate::quorum::QuorumError;
use rand_core::{CryptoRng, RngCore};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, Verification};
use zeroize::Zeroizing;

/// Total signature length.
pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1 group order divided by two, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// A decoded, structurally valid signature blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureBlob {
    compact: [u8; 64],
    recovery_id: u8,
}

impl SignatureBlob {
    /// Decodes a 65-byte blob.
    pub fn parse(blob: &[u8]) -> Result<Self, QuorumError> {
        if blob.len() != SIGNATURE_LENGTH {
            return Err(QuorumError::MalformedSignature);
        }
        let recovery_id = match blob[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            _ => return Err(QuorumError::MalformedSignature),
        };
        let mut compact = [0u8; 64];
        compact.copy_from_slice(&blob[..64]);
        if compact[32..] > HALF_ORDER[..] {
            return Err(QuorumError::MalformedSignature);
        }
        Ok(Self { compact, recovery_id })
    }

    /// Recovers the signer identity for `digest`.
    pub fn recover<C: Verification>(
        &self,
        secp: &Secp256k1<C>,
        digest: &[u8; 32],
    ) -> Result<Address, QuorumError> {
        let id = RecoveryId::from_i32(i32::from(self.recovery_id))
            .map_err(|_| QuorumError::MalformedSignature)?;
        let signature = RecoverableSignature::from_compact(&self.compact, id)
            .map_err(|_| QuorumError::MalformedSignature)?;
        let key = secp
            .recover_ecdsa(&Message::from_digest(*digest), &signature)
            .map_err(|_| QuorumError::MalformedSignature)?;
        Ok(Address::from_public_key(&key))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&self.compact);
        out[64] = self.recovery_id + 27;
        out
    }
}

/// Holds one signer's secret key and produces quorum signatures.
///
/// The key is erased on drop.
pub struct LocalSigner {
    key: SecretKey,
    address: Address,
}

impl LocalSigner {
    /// Builds a signer from a raw 32-byte secret.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, QuorumError> {
        let key = SecretKey::from_slice(secret).map_err(|_| QuorumError::InvalidKey)?;
        Ok(Self::from_key(key))
    }

    /// Builds a signer from a hex secret, with or without a `0x` prefix.
    pub fn from_hex(secret_hex: &str) -> Result<Self, QuorumError> {
        let bytes = Zeroizing::new(
            hex::decode(secret_hex.trim().trim_start_matches("0x"))
                .map_err(|_| QuorumError::InvalidKey)?,
        );
        let key = SecretKey::from_slice(&bytes).map_err(|_| QuorumError::InvalidKey)?;
        Ok(Self::from_key(key))
    }

    /// Generates a fresh signer.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut candidate = Zeroizing::new([0u8; 32]);
        loop {
            rng.fill_bytes(&mut candidate[..]);
            // Rejection only triggers for zero or values >= the group order.
            if let Ok(key) = SecretKey::from_slice(&candidate[..]) {
                return Self::from_key(key);
            }
        }
    }

    fn from_key(key: SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let address = Address::from_public_key(&PublicKey::from_secret_key(&secp, &key));
        Self { key, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs a 32-byte digest, returning the 65-byte wire blob.
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; SIGNATURE_LENGTH] {
        let secp = Secp256k1::signing_only();
        let signature = secp.sign_ecdsa_recoverable(&Message::from_digest(*digest), &self.key);
        let (id, compact) = signature.serialize_compact();
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&compact);
        out[64] = 27 + id.to_i32() as u8;
        out
    }
}

impl Drop for LocalSigner {
    fn drop(&mut self) {
        self.key.non_secure_erase();
    }
}

impl core::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .field("key", &"***SENSITIVE***")
            .finish()
    }
}
