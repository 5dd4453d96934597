//! Scoped ownership of engine handles.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::arena::{HandleArena, Ownership, SlotKey, Tracked};
use super::frame::CallFrame;
use super::Runtime;
use crate::sys::{MethodBindPtr, ObjectPtr};
use crate::{BindError, Interface, NameHash};

/// Scope that owns every handle created through it.
///
/// Handles borrow the lifetime, so none can outlive it. When the lifetime
/// ends, every `Owned` handle gives its engine reference back; the object is
/// destroyed when that was the last reference. Other ownership kinds are
/// forgotten without touching the engine.
pub struct Lifetime {
    runtime: Arc<dyn Runtime>,
    arena: RefCell<HandleArena>,
}

impl Lifetime {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self {
            runtime,
            arena: RefCell::new(HandleArena::new()),
        }
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    pub fn interface(&self) -> &dyn Interface {
        self.runtime.interface()
    }

    /// Start a frame for one call.
    pub fn frame(&self) -> CallFrame<'_> {
        CallFrame::new(self.interface())
    }

    /// Resolve a method bind, panicking when the engine never exported it.
    pub fn method_bind(&self, key: NameHash, class: &'static str, method: &'static str) -> MethodBindPtr {
        match self.runtime.method_bind(key, class, method) {
            Ok(bind) => bind,
            Err(err) => panic!("{err}"),
        }
    }

    /// Track a handle.
    pub fn track(&self, entry: Tracked) -> SlotKey {
        self.arena.borrow_mut().insert(entry)
    }

    /// Track an object the engine just handed over.
    ///
    /// Handles that hold no reference share one slot per instance.
    ///
    /// # Safety
    ///
    /// `object` must be live.
    pub unsafe fn track_object(&self, object: ObjectPtr, class: &'static str, ownership: Ownership) -> SlotKey {
        // SAFETY: forwarded from the caller.
        let instance_id = unsafe { self.interface().instance_id(object) };
        let entry = Tracked {
            object,
            instance_id,
            ownership,
            class,
        };
        let mut arena = self.arena.borrow_mut();
        if ownership.is_shared() {
            arena.insert_shared(entry)
        } else {
            arena.insert(entry)
        }
    }

    pub fn tracked(&self, key: SlotKey) -> Option<Tracked> {
        self.arena.borrow().get(key).copied()
    }

    /// Validate a handle before a call through it.
    ///
    /// Fails when the key is stale, or when the instance id of an object
    /// this lifetime holds no reference to no longer resolves to the same
    /// pointer.
    pub fn check(&self, key: SlotKey, class: &'static str) -> Result<ObjectPtr, BindError> {
        let entry = self.tracked(key).ok_or(BindError::StaleHandle { class })?;
        if entry.ownership.needs_liveness_check() && self.runtime.config().assert_instance_ids {
            let alive = self.interface().object_from_instance_id(entry.instance_id);
            if alive != Some(entry.object) {
                return Err(BindError::FreedObject {
                    class,
                    id: entry.instance_id.0,
                });
            }
        }
        Ok(entry.object)
    }

    /// Stop tracking a handle without releasing anything.
    pub fn untrack(&self, key: SlotKey) -> Option<Tracked> {
        self.arena.borrow_mut().remove(key)
    }

    pub fn set_ownership(&self, key: SlotKey, ownership: Ownership) -> bool {
        self.arena.borrow_mut().set_ownership(key, ownership)
    }

    /// Release one handle now instead of at the end of the lifetime.
    pub fn release(&self, key: SlotKey) -> bool {
        match self.untrack(key) {
            Some(entry) => {
                self.release_entry(entry);
                true
            }
            None => false,
        }
    }

    /// Number of handles still tracked.
    pub fn live_handles(&self) -> usize {
        self.arena.borrow().len()
    }

    pub fn owned_handles(&self) -> usize {
        self.arena.borrow().count(Ownership::Owned)
    }

    /// End the lifetime, releasing every owned reference.
    pub fn end(self) {
        drop(self);
    }

    fn release_entry(&self, entry: Tracked) {
        if entry.ownership != Ownership::Owned {
            return;
        }
        let Some(binds) = self.runtime.ref_counting() else {
            return;
        };
        trace!(class = entry.class, object = ?entry.object, "releasing owned reference");
        // SAFETY: `unreference` takes no arguments and returns a bool slot.
        let last: u8 = unsafe { self.frame().call_raw(binds.unreference, entry.object) };
        if last != 0 {
            trace!(class = entry.class, object = ?entry.object, "last reference released, destroying");
            // SAFETY: the engine reported no remaining references.
            unsafe { self.interface().destroy_object(entry.object) };
        }
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        let entries = self.arena.get_mut().drain();
        for entry in entries {
            self.release_entry(entry);
        }
    }
}

impl fmt::Debug for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifetime")
            .field("arena", &*self.arena.borrow())
            .finish_non_exhaustive()
    }
}
