//! Typed handles to engine objects.
//!
//! An [`Obj`] is a pointer plus a slot in the [`Lifetime`] that tracks it.
//! The `'lt` borrow keeps handles from outliving their lifetime; the slot's
//! generation catches handles that were transferred or freed.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use gdbind_core::{BindError, InstanceId, Lifetime, ObjectPtr, Ownership, SlotKey, Tracked};

use crate::class::{EngineClass, Inherits};

/// Handle to an engine object of class `T` (or a subclass).
///
/// Every `Obj` has the same layout whatever `T` is, which is what makes
/// upcasts free.
#[repr(C)]
pub struct Obj<'lt, T> {
    raw: ObjectPtr,
    key: SlotKey,
    lifetime: &'lt Lifetime,
    _class: PhantomData<fn() -> T>,
}

/// Expert view of a handle: one method per engine method bind, with the
/// engine's own names and types.
#[repr(transparent)]
pub struct Advanced<'lt, T>(Obj<'lt, T>);

impl<T> Clone for Obj<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Obj<'_, T> {}

impl<T> Clone for Advanced<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Advanced<'_, T> {}

impl<'lt, T: EngineClass> Obj<'lt, T> {
    /// Construct a new engine object of class `T`.
    ///
    /// Ref-counted objects start with one reference owned by `lifetime`.
    /// Other objects are `Manual`: they live until [`Obj::free`] or until
    /// the engine takes them over (for example as a child node).
    pub fn new(lifetime: &'lt Lifetime) -> Result<Self, BindError> {
        Self::construct(lifetime, T::NAME)
    }

    /// Construct an object of `class`, which must be `T` or derive from it.
    pub(crate) fn construct(lifetime: &'lt Lifetime, class: &str) -> Result<Self, BindError> {
        let object = lifetime
            .interface()
            .construct_object(class)
            .ok_or_else(|| BindError::ConstructionFailed(class.to_string()))?;

        let ownership = match lifetime.runtime().ref_counting() {
            Some(binds) if T::REFCOUNTED => {
                // SAFETY: `init_ref` takes no arguments and returns a bool slot.
                let _: u8 = unsafe { lifetime.frame().call_raw(binds.init_ref, object) };
                Ownership::Owned
            }
            _ => Ownership::Manual,
        };
        // SAFETY: the object was just constructed.
        Ok(unsafe { Self::from_raw(lifetime, object, ownership) })
    }

    /// Wrap an object pointer and track it in `lifetime`.
    ///
    /// # Safety
    ///
    /// `object` must be a live object of class `T` or a subclass, and
    /// `ownership` must describe the reference actually held.
    pub unsafe fn from_raw(lifetime: &'lt Lifetime, object: ObjectPtr, ownership: Ownership) -> Self {
        // SAFETY: forwarded from the caller.
        let key = unsafe { lifetime.track_object(object, T::NAME, ownership) };
        Self {
            raw: object,
            key,
            lifetime,
            _class: PhantomData,
        }
    }

    /// The object pointer without any validity check.
    pub fn object_ptr(&self) -> ObjectPtr {
        self.raw
    }

    pub fn key(&self) -> SlotKey {
        self.key
    }

    pub fn lifetime(&self) -> &'lt Lifetime {
        self.lifetime
    }

    fn entry(&self) -> Option<Tracked> {
        self.lifetime.tracked(self.key)
    }

    pub fn ownership(&self) -> Option<Ownership> {
        self.entry().map(|entry| entry.ownership)
    }

    /// Instance id recorded when the handle was created.
    pub fn instance_id(&self) -> InstanceId {
        self.entry().map_or(InstanceId::NONE, |entry| entry.instance_id)
    }

    /// The object pointer, or why the handle can no longer be used.
    pub fn validate(&self) -> Result<ObjectPtr, BindError> {
        self.lifetime.check(self.key, T::NAME)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The object pointer for a call; panics on a stale or freed handle.
    pub fn checked_ptr(&self) -> ObjectPtr {
        match self.validate() {
            Ok(object) => object,
            Err(err) => panic!("{err}"),
        }
    }

    /// The 1:1 method surface.
    pub fn advanced(&self) -> &Advanced<'lt, T> {
        // SAFETY: `Advanced` is a transparent wrapper around `Obj`.
        unsafe { &*(self as *const Self).cast::<Advanced<'lt, T>>() }
    }

    /// View this handle as an ancestor class.
    pub fn upcast<B: EngineClass>(self) -> Obj<'lt, B>
    where
        T: Inherits<B>,
    {
        Obj {
            raw: self.raw,
            key: self.key,
            lifetime: self.lifetime,
            _class: PhantomData,
        }
    }

    /// As [`Obj::upcast`], by reference.
    pub fn upcast_ref<B: EngineClass>(&self) -> &Obj<'lt, B>
    where
        T: Inherits<B>,
    {
        // SAFETY: `Obj` is `repr(C)` and its class parameter is a marker.
        unsafe { &*(self as *const Self).cast::<Obj<'lt, B>>() }
    }

    /// Checked downcast through the engine's class tags.
    pub fn try_cast<U: EngineClass>(self) -> Result<Obj<'lt, U>, BindError> {
        let object = self.validate()?;
        // SAFETY: `validate` confirmed the object is live.
        match unsafe { self.lifetime.interface().cast_to(object, U::NAME) } {
            Some(raw) => Ok(Obj {
                raw,
                key: self.key,
                lifetime: self.lifetime,
                _class: PhantomData,
            }),
            None => Err(BindError::CastFailed {
                actual: self.class_name(),
                target: U::NAME,
            }),
        }
    }

    /// Most derived class name, as the engine reports it.
    pub fn class_name(&self) -> String {
        let object = self.checked_ptr();
        // SAFETY: `checked_ptr` confirmed the object is live.
        let name = unsafe { self.lifetime.interface().class_name(object) };
        name.unwrap_or_else(|| T::NAME.to_string())
    }

    /// Move this handle, and whatever reference it owns, to `target`.
    ///
    /// The handle is stale in its old lifetime afterwards.
    pub fn transfer_to<'b>(self, target: &'b Lifetime) -> Obj<'b, T> {
        let Some(entry) = self.lifetime.untrack(self.key) else {
            panic!("{}", BindError::StaleHandle { class: T::NAME });
        };
        Obj {
            raw: self.raw,
            key: target.track(entry),
            lifetime: target,
            _class: PhantomData,
        }
    }

    /// Record that a borrowed handle was reached through `parent`.
    ///
    /// The handle is still checked against the engine before every call.
    /// The parent may drop or free the object at any time.
    pub fn bind_to<P: EngineClass>(self, parent: &Obj<'_, P>) -> Self {
        if self.ownership() == Some(Ownership::Borrowed) {
            self.lifetime
                .set_ownership(self.key, Ownership::BoundTo(parent.object_ptr()));
        }
        self
    }

    /// Release the object now.
    ///
    /// Owned references are given back (destroying the object if it was the
    /// last one). A ref-counted object held without a reference is only
    /// forgotten, since others keep it alive. Any other object is destroyed
    /// outright.
    pub fn free(self) {
        let object = self.checked_ptr();
        if self.ownership() == Some(Ownership::Owned) {
            self.lifetime.release(self.key);
            return;
        }
        self.lifetime.untrack(self.key);
        // SAFETY: `checked_ptr` confirmed the object is live.
        if unsafe { self.lifetime.interface().cast_to(object, "RefCounted") }.is_some() {
            debug!(class = T::NAME, "not destroying a ref-counted object held without a reference");
            return;
        }
        // SAFETY: the handle was valid and is no longer tracked.
        unsafe { self.lifetime.interface().destroy_object(object) };
    }

    /// Whether both handles point at the same engine object.
    pub fn same_object<U>(&self, other: &Obj<'_, U>) -> bool {
        self.raw == other.raw
    }
}

impl<'lt, T> Advanced<'lt, T> {
    /// The ergonomic handle behind this view.
    pub fn as_obj(&self) -> &Obj<'lt, T> {
        &self.0
    }
}

impl<'lt, T: EngineClass> Advanced<'lt, T> {
    /// As [`Obj::upcast_ref`].
    pub fn upcast_ref<B: EngineClass>(&self) -> &Advanced<'lt, B>
    where
        T: Inherits<B>,
    {
        // SAFETY: transparent over `Obj`, see `Obj::upcast_ref`.
        unsafe { &*(self as *const Self).cast::<Advanced<'lt, B>>() }
    }
}

impl<T> PartialEq for Obj<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Obj<'_, T> {}

impl<T: EngineClass> fmt::Debug for Obj<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obj<{}>({:#x})", T::NAME, self.raw.addr())
    }
}

impl<T: EngineClass> fmt::Debug for Advanced<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Advanced<{}>({:#x})", T::NAME, self.0.raw.addr())
    }
}
