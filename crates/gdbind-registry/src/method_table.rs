//! Versioned table of resolved method binds.
//!
//! The table is filled once, when the engine is loaded: every method of
//! every class in the catalog is looked up by name and signature hash. After
//! that the table is read-only and each call resolves its bind with one
//! `FxHashMap` lookup keyed by a compile-time [`NameHash`].
//!
//! # Resolution order
//!
//! 1. Methods newer than the running engine are skipped.
//! 2. The current signature hash is tried first, then each compatibility
//!    hash in order (older engines published different hashes for methods
//!    whose signature later changed).
//! 3. A method with no matching hash fails loading in strict mode and is
//!    recorded as missing in lenient mode.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use gdbind_core::{BindError, BindingConfig, ClassSpec, GodotVersion, Interface, MethodBindPtr, MethodSpec, NameHash};

/// A bind resolved against the running engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedBind {
    pub bind: MethodBindPtr,
    /// The hash the engine accepted.
    pub hash: i64,
    pub class: &'static str,
    pub method: &'static str,
}

/// Why a method has no bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingReason {
    /// No hash was accepted.
    NotExported,
    /// The method first appeared in this later engine version.
    NewerEngine(GodotVersion),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingBind {
    pub class: &'static str,
    pub method: &'static str,
    pub hash: i64,
    pub reason: MissingReason,
}

/// Method binds keyed by class and method name.
#[derive(Debug, Default)]
pub struct MethodTable {
    binds: FxHashMap<NameHash, ResolvedBind>,
    missing: FxHashMap<NameHash, MissingBind>,
}

impl MethodTable {
    /// Resolve every method of `classes` against `iface`.
    pub fn load(
        iface: &dyn Interface,
        classes: &[&'static ClassSpec],
        config: &BindingConfig,
    ) -> Result<Self, BindError> {
        let version = iface.godot_version();
        let mut table = Self::default();
        for class in classes.iter().copied() {
            for method in class.methods.iter() {
                table.resolve(iface, class.name, method, version, config)?;
            }
        }
        debug!(
            resolved = table.binds.len(),
            missing = table.missing.len(),
            %version,
            "method table loaded"
        );
        Ok(table)
    }

    fn resolve(
        &mut self,
        iface: &dyn Interface,
        class: &'static str,
        method: &'static MethodSpec,
        version: GodotVersion,
        config: &BindingConfig,
    ) -> Result<(), BindError> {
        if version < method.since {
            debug!(class, method = method.name, since = %method.since, "method newer than engine, skipped");
            self.missing.insert(
                method.key,
                MissingBind {
                    class,
                    method: method.name,
                    hash: method.hash,
                    reason: MissingReason::NewerEngine(method.since),
                },
            );
            return Ok(());
        }

        for (attempt, hash) in method.hashes().enumerate() {
            if let Some(bind) = iface.method_bind(class, method.name, hash) {
                if attempt > 0 {
                    warn!(class, method = method.name, hash, "resolved through compatibility hash");
                }
                self.binds.insert(
                    method.key,
                    ResolvedBind {
                        bind,
                        hash,
                        class,
                        method: method.name,
                    },
                );
                return Ok(());
            }
        }

        if config.is_strict() {
            return Err(BindError::MissingMethodBind {
                class,
                method: method.name,
                hash: method.hash,
            });
        }
        warn!(class, method = method.name, hash = method.hash, "method bind not found");
        self.missing.insert(
            method.key,
            MissingBind {
                class,
                method: method.name,
                hash: method.hash,
                reason: MissingReason::NotExported,
            },
        );
        Ok(())
    }

    /// Get the bind for a method key.
    #[inline]
    pub fn get(&self, key: NameHash) -> Option<MethodBindPtr> {
        self.binds.get(&key).map(|resolved| resolved.bind)
    }

    pub fn resolved(&self, key: NameHash) -> Option<&ResolvedBind> {
        self.binds.get(&key)
    }

    /// Get the bind for a method key, or the error explaining its absence.
    pub fn bind(&self, key: NameHash, class: &'static str, method: &'static str) -> Result<MethodBindPtr, BindError> {
        if let Some(bind) = self.get(key) {
            return Ok(bind);
        }
        let hash = self.missing.get(&key).map_or(0, |missing| missing.hash);
        Err(BindError::MissingMethodBind { class, method, hash })
    }

    pub fn missing(&self) -> impl Iterator<Item = &MissingBind> {
        self.missing.values()
    }

    pub fn is_missing(&self, key: NameHash) -> bool {
        self.missing.contains_key(&key)
    }

    /// Number of resolved binds.
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }
}
