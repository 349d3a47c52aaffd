//! Account and signer identities.
//!
//! An address is the last 20 bytes of the BLAKE3 hash of a secp256k1 public key
//! in uncompressed form (without the leading `0x04` tag byte). The all-zero
//! address is the null identity and is rejected wherever an account is required.

use core::fmt;
use core::str::FromStr;
use secp256k1::PublicKey;

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Errors when parsing an address from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// Input is not valid hex.
    InvalidHex,
    /// Decoded input has the wrong number of bytes.
    InvalidLength(usize),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidHex => write!(f, "Address is not valid hex"),
            AddressError::InvalidLength(len) => {
                write!(f, "Address must be {} bytes, got {}", ADDRESS_LENGTH, len)
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// A 20-byte account or signer identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Returns true for the null identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Derives the address of a secp256k1 public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        let uncompressed = key.serialize_uncompressed();
        let hash = blake3::hash(&uncompressed[1..]);
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(&hash.as_bytes()[32 - ADDRESS_LENGTH..]);
        Address(out)
    }

    /// Parses a hex address, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(s.trim().trim_start_matches("0x"))
            .map_err(|_| AddressError::InvalidHex)?;
        let raw: [u8; ADDRESS_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Address(raw))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(raw: [u8; ADDRESS_LENGTH]) -> Self {
        Address(raw)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_with_prefix() {
        let addr = Address([0xAB; ADDRESS_LENGTH]);
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + 2 * ADDRESS_LENGTH);
        assert_eq!(Address::from_hex(&text), Ok(addr));
        assert_eq!(text.trim_start_matches("0x").parse::<Address>(), Ok(addr));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Address::from_hex("0xzz"), Err(AddressError::InvalidHex));
        assert_eq!(Address::from_hex("0x0102"), Err(AddressError::InvalidLength(2)));
    }

    #[test]
    fn test_zero_is_null() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address([1u8; ADDRESS_LENGTH]).is_zero());
    }

    #[test]
    fn test_public_key_derivation_is_stable() {
        let secp = secp256k1::Secp256k1::signing_only();
        let sk = secp256k1::SecretKey::from_slice(&[7u8; 32]).unwrap();
        let pk = PublicKey::from_secret_key(&secp, &sk);
        let a = Address::from_public_key(&pk);
        let b = Address::from_public_key(&pk);
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }
}
