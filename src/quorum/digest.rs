//! Structured message encoding.
//!
//! Every administrative schema is hashed through this one encoder. The layout
//! is fixed-width and versioned, so no two distinct messages can share an
//! encoding:
//!
//! ```text
//! version (1) ‖ domain separator (32) ‖ type hash (32) ‖ field count (1)
//!   ‖ { tag (1) ‖ value (fixed width per tag) }*
//!   ‖ nonce (8, BE) ‖ deadline (8, BE)
//! ```
//!
//! The type hash is the hash of the schema's type descriptor, e.g.
//! `LockFor(address account,uint64 duration,uint64 nonce,uint64 deadline)`.
//! Two actions with identical parameter shapes still have different
//! descriptors, so their digests never collide.
//!
//! All hashing uses BLAKE3 in key-derivation mode with a distinct context per
//! purpose.

use crate::primitives::Address;

/// Encoding layout version, bound into every digest.
pub const ENCODING_VERSION: u8 = 1;

const MESSAGE_CONTEXT: &str = "quorum-admin 2026-01-01 structured message";
const DOMAIN_CONTEXT: &str = "quorum-admin 2026-01-01 domain separator";
const TYPE_CONTEXT: &str = "quorum-admin 2026-01-01 type descriptor";

/// Trailing parameters every descriptor must declare, in order.
const TRAILER: [&str; 2] = ["uint64 nonce", "uint64 deadline"];

/// A typed message parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address(Address),
    U64(u64),
    U128(u128),
}

impl Field {
    fn tag(&self) -> u8 {
        match self {
            Field::Address(_) => 0x01,
            Field::U64(_) => 0x02,
            Field::U128(_) => 0x03,
        }
    }

    /// Type name as it appears in a descriptor.
    pub fn type_name(&self) -> &'static str {
        match self {
            Field::Address(_) => "address",
            Field::U64(_) => "uint64",
            Field::U128(_) => "uint128",
        }
    }

    fn write(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&[self.tag()]);
        match self {
            Field::Address(a) => hasher.update(a.as_bytes()),
            Field::U64(v) => hasher.update(&v.to_be_bytes()),
            Field::U128(v) => hasher.update(&v.to_be_bytes()),
        };
    }
}

/// A message that can be signed by the quorum.
pub trait StructuredMessage {
    /// Self-describing schema, including the trailing `nonce` and `deadline`.
    fn type_descriptor(&self) -> &'static str;

    /// Action parameters in descriptor order, excluding nonce and deadline.
    fn fields(&self) -> Vec<Field>;
}

/// Identifies one deployment of the gate so that signatures never carry over
/// between instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub instance_id: u64,
}

impl Domain {
    pub fn new(name: impl Into<String>, version: impl Into<String>, instance_id: u64) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            instance_id,
        }
    }

    /// 32-byte separator committed into every message digest.
    pub fn separator(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_derive_key(DOMAIN_CONTEXT);
        hasher.update(&[ENCODING_VERSION]);
        write_str(&mut hasher, &self.name);
        write_str(&mut hasher, &self.version);
        hasher.update(&self.instance_id.to_be_bytes());
        *hasher.finalize().as_bytes()
    }
}

fn write_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

/// Hash of a type descriptor; the per-action discriminator.
pub fn type_hash(descriptor: &str) -> [u8; 32] {
    blake3::derive_key(TYPE_CONTEXT, descriptor.as_bytes())
}

/// Checks that `fields` match the parameter list declared by `descriptor`,
/// and that the descriptor ends with the nonce and deadline trailer.
pub fn schema_matches(descriptor: &str, fields: &[Field]) -> bool {
    let Some(open) = descriptor.find('(') else { return false };
    let Some(params) = descriptor[open + 1..].strip_suffix(')') else { return false };
    if open == 0 {
        return false;
    }

    let declared: Vec<&str> = params.split(',').map(str::trim).collect();
    if declared.len() != fields.len() + TRAILER.len() {
        return false;
    }
    let (head, tail) = declared.split_at(fields.len());
    if tail != TRAILER {
        return false;
    }
    head.iter().zip(fields).all(|(decl, field)| {
        let mut parts = decl.split(' ');
        matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(ty), Some(name), None) if ty == field.type_name() && !name.is_empty()
        )
    })
}

/// Digest the quorum signs for `message` at `nonce` with `deadline`.
pub fn message_digest<M: StructuredMessage + ?Sized>(
    domain_separator: &[u8; 32],
    message: &M,
    nonce: u64,
    deadline: u64,
) -> [u8; 32] {
    let descriptor = message.type_descriptor();
    let fields = message.fields();
    debug_assert!(schema_matches(descriptor, &fields), "schema mismatch: {}", descriptor);

    let mut hasher = blake3::Hasher::new_derive_key(MESSAGE_CONTEXT);
    hasher.update(&[ENCODING_VERSION]);
    hasher.update(domain_separator);
    hasher.update(&type_hash(descriptor));
    hasher.update(&[fields.len() as u8]);
    for field in &fields {
        field.write(&mut hasher);
    }
    hasher.update(&nonce.to_be_bytes());
    hasher.update(&deadline.to_be_bytes());
    *hasher.finalize().as_bytes()
}
