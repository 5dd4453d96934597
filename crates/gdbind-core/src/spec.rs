//! Static descriptions of engine classes and their method binds.
//!
//! Each bound class publishes one [`ClassSpec`]. The method table resolves
//! every [`MethodSpec`] against the running engine at load time, and the
//! headless engine uses the argument and return types to decode ptrcalls.

use crate::{AbiType, GodotVersion, NameHash};

/// What a method does to the object's state, as far as properties go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any other method.
    Call,
    /// Reads the named property; extra arguments are indices.
    Get(&'static str),
    /// Writes the named property; the last argument is the value.
    Set(&'static str),
}

/// One engine method bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    /// Method table key, `NameHash::of_method(class, name)`.
    pub key: NameHash,
    /// Signature hash published by the engine's API dump.
    pub hash: i64,
    /// Hashes accepted from older engines for the same method.
    pub compat_hashes: &'static [i64],
    /// First engine version that exports this method.
    pub since: GodotVersion,
    pub args: Vec<AbiType>,
    pub ret: AbiType,
    pub access: Access,
}

impl MethodSpec {
    /// Every hash that identifies this method, newest first.
    pub fn hashes(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::once(self.hash).chain(self.compat_hashes.iter().copied())
    }

    /// True when the engine accepts `hash` for this method.
    pub fn accepts_hash(&self, hash: i64) -> bool {
        self.hashes().any(|h| h == hash)
    }
}

/// One engine class and the binds gdbind uses on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub refcounted: bool,
    pub methods: Vec<MethodSpec>,
    /// Virtual hooks an extension subclass may override.
    pub virtuals: &'static [&'static str],
}

impl ClassSpec {
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_by_key(&self, key: NameHash) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.key == key)
    }
}
