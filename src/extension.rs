//! Rust subclasses of engine classes.
//!
//! A type implementing [`ExtensionClass`] (normally through
//! `#[derive(ExtensionClass)]`) is registered with [`register_class`]. The
//! engine then instantiates it like any native class: it constructs the base
//! object, asks for a Rust instance, and calls the instance's virtual hooks
//! by name.
//!
//! Instances live in a `Box<RefCell<T>>` owned by the engine object. Hooks
//! borrow the instance mutably for the duration of the call; a hook that
//! re-enters its own instance panics instead of aliasing it.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use tracing::debug;

use gdbind_core::{
    BindError, ClassFlags, ExtensionClassInfo, InstancePtr, Lifetime, ObjectPtr, Ownership, Runtime, VirtualThunk,
};
use gdbind_registry::Engine;

use crate::class::EngineClass;
use crate::obj::Obj;

/// A Rust type the engine can instantiate as a subclass of `Self::Base`.
pub trait ExtensionClass: Sized + 'static {
    /// Name the class is registered under.
    const CLASS_NAME: &'static str;

    const FLAGS: ClassFlags = ClassFlags::EXPOSED;

    /// Engine class this type extends.
    type Base: EngineClass;

    /// Build the instance for a freshly constructed base object.
    fn init(base: Base<Self::Base>) -> Self;

    /// Overridden virtual hook for `name`, if any.
    fn virtual_lookup(name: &str) -> Option<VirtualThunk>;
}

/// The engine object an extension instance is attached to.
pub struct Base<B> {
    object: ObjectPtr,
    runtime: Weak<dyn Runtime>,
    _class: PhantomData<fn() -> B>,
}

impl<B: EngineClass> Base<B> {
    pub(crate) fn new(object: ObjectPtr, runtime: Weak<dyn Runtime>) -> Self {
        Self {
            object,
            runtime,
            _class: PhantomData,
        }
    }

    pub fn object_ptr(&self) -> ObjectPtr {
        self.object
    }

    /// Open a lifetime on the engine this instance belongs to.
    ///
    /// `None` once the engine has been unloaded.
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.runtime.upgrade().map(Lifetime::new)
    }

    /// Handle to the base object, bound to its own lifetime.
    pub fn to_obj<'lt>(&self, lifetime: &'lt Lifetime) -> Obj<'lt, B> {
        // SAFETY: an instance only exists while its base object is alive.
        unsafe { Obj::from_raw(lifetime, self.object, Ownership::BoundTo(self.object)) }
    }
}

impl<B: EngineClass> fmt::Debug for Base<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Base<{}>({:#x})", B::NAME, self.object.addr())
    }
}

/// Register `T` with `engine`.
pub fn register_class<T: ExtensionClass>(engine: &Arc<Engine>) -> Result<(), BindError> {
    let runtime: Arc<dyn Runtime> = Arc::clone(engine) as Arc<dyn Runtime>;
    let weak = Arc::downgrade(&runtime);
    let info = ExtensionClassInfo {
        name: T::CLASS_NAME.to_string(),
        parent: T::Base::NAME.to_string(),
        flags: T::FLAGS,
        create: Box::new(move |object| {
            let instance = Box::new(RefCell::new(T::init(Base::new(object, weak.clone()))));
            Some(Box::into_raw(instance).cast())
        }),
        free: free_instance::<T>,
        get_virtual: T::virtual_lookup,
    };
    debug!(class = T::CLASS_NAME, base = T::Base::NAME, "registering extension class");
    engine.register_class(info)
}

unsafe fn free_instance<T: ExtensionClass>(instance: InstancePtr) {
    // SAFETY: `instance` came from `Box::into_raw` in `register_class`.
    drop(unsafe { Box::from_raw(instance.cast::<RefCell<T>>()) });
}

/// Run `f` on the instance stored at `instance`.
///
/// # Safety
///
/// `instance` must be a live instance of `T` created by [`register_class`].
pub unsafe fn with_instance<T: ExtensionClass, R>(instance: InstancePtr, f: impl FnOnce(&mut T) -> R) -> R {
    // SAFETY: forwarded from the caller.
    let cell = unsafe { &*instance.cast_const().cast::<RefCell<T>>() };
    f(&mut cell.borrow_mut())
}

/// Construct a new object of extension class `T`.
pub fn instantiate<'lt, T: ExtensionClass>(lifetime: &'lt Lifetime) -> Result<Obj<'lt, T::Base>, BindError> {
    Obj::construct(lifetime, T::CLASS_NAME)
}

/// Run `f` on the `T` instance attached to `obj`.
pub fn bind_instance<T: ExtensionClass, R>(
    obj: &Obj<'_, T::Base>,
    f: impl FnOnce(&mut T) -> R,
) -> Result<R, BindError> {
    let object = obj.validate()?;
    let actual = obj.class_name();
    if actual != T::CLASS_NAME {
        return Err(BindError::CastFailed {
            actual,
            target: T::CLASS_NAME,
        });
    }
    // SAFETY: `validate` confirmed the object is live.
    let Some(instance) = (unsafe { obj.lifetime().interface().object_instance(object) }) else {
        return Err(BindError::CastFailed {
            actual,
            target: T::CLASS_NAME,
        });
    };
    // SAFETY: the object's class is `T`, so its instance is a `T`.
    Ok(unsafe { with_instance::<T, R>(instance, f) })
}

/// Build a thunk for one hook method of a virtual trait.
///
/// ```ignore
/// hook_thunk!(INode::process(delta: f64))
/// ```
macro_rules! hook_thunk {
    ($iface:ident :: $method:ident ( $($arg:ident : $ty:ty),* )) => {{
        #[allow(unused_variables, unused_mut, unused_assignments)]
        unsafe fn thunk<T: $iface>(
            iface: &dyn $crate::gdbind_core::Interface,
            instance: $crate::gdbind_core::InstancePtr,
            args: *const $crate::gdbind_core::ConstTypePtr,
            ret: $crate::gdbind_core::TypePtr,
        ) {
            let mut index = 0usize;
            $(
                // SAFETY: the engine passes one slot per hook parameter.
                let $arg: $ty = unsafe { $crate::marshal::VirtualArg::from_arg(*args.add(index), iface) };
                index += 1;
            )*
            // SAFETY: the engine only calls hooks on instances of `T`.
            let result = unsafe { $crate::extension::with_instance::<T, _>(instance, |this| this.$method($($arg),*)) };
            // SAFETY: `ret` is the engine's return slot for this hook.
            unsafe { $crate::marshal::VirtualReturn::write_return(result, ret, iface) };
        }
        thunk::<T> as $crate::gdbind_core::VirtualThunk
    }};
}

pub(crate) use hook_thunk;
