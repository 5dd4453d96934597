//! Deterministic hash-based identity for engine classes and methods.
//!
//! [`NameHash`] is a 64-bit key computed from a class name, or from a class
//! and member name pair. Hashes are `const`, so every generated method shim
//! carries its table key as a compile-time constant and the method table
//! resolves a bind with a single map lookup.
//!
//! # Hash Computation
//!
//! Uses XXHash64 with domain-specific mixing constants so that a class, one of
//! its methods and one of its virtual hooks never share a key, even when the
//! names collide.
//!
//! # Examples
//!
//! ```
//! use gdbind_core::NameHash;
//!
//! const SET_AMOUNT: NameHash = NameHash::of_method("CPUParticles3D", "set_amount");
//! assert_eq!(SET_AMOUNT, NameHash::of_method("CPUParticles3D", "set_amount"));
//! assert_ne!(SET_AMOUNT, NameHash::of_method("GPUParticles3D", "set_amount"));
//! ```

use std::fmt;
use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant between the owner and member components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for class hashes.
    pub const CLASS: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method-bind hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for virtual hook hashes.
    pub const VIRTUAL: u64 = 0x3e9f5d2a8c7b1403;
}

/// A deterministic 64-bit hash identifying an engine class or class member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NameHash(pub u64);

impl NameHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: NameHash = NameHash(0);

    /// Hash of an engine class name.
    #[inline]
    pub const fn of_class(name: &str) -> Self {
        NameHash(hash_constants::CLASS ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a method declared by `class`.
    ///
    /// The owner participates in the hash: `Node3D::show` and
    /// `CanvasItem::show` are different keys.
    #[inline]
    pub const fn of_method(class: &str, method: &str) -> Self {
        Self::member(hash_constants::METHOD, class, method)
    }

    /// Hash of a virtual hook declared by `class`.
    #[inline]
    pub const fn of_virtual(class: &str, hook: &str) -> Self {
        Self::member(hash_constants::VIRTUAL, class, hook)
    }

    const fn member(domain: u64, owner: &str, member: &str) -> Self {
        let owner = xxh64(owner.as_bytes(), 0);
        let member = xxh64(member.as_bytes(), 0);
        NameHash(
            (domain ^ owner)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(member),
        )
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameHash(0x{:016x})", self.0)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for NameHash {
    fn from(value: u64) -> Self {
        NameHash(value)
    }
}
