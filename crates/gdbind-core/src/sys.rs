//! Raw pointer types crossing the GDExtension boundary.
//!
//! None of these are ever dereferenced by gdbind itself; they are addresses
//! the engine hands out and later receives back.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// Pointer to an argument or return value slot.
pub type TypePtr = *mut c_void;

/// Pointer to a read-only argument slot.
pub type ConstTypePtr = *const c_void;

/// Pointer to the Rust-side storage of an extension class instance.
pub type InstancePtr = *mut c_void;

macro_rules! engine_pointer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(NonNull<c_void>);

        impl $name {
            /// Wraps a raw pointer, returning `None` for null.
            #[inline]
            pub fn new(raw: *mut c_void) -> Option<Self> {
                NonNull::new(raw).map(Self)
            }

            /// Builds a pointer from an address handed out by an engine double.
            #[inline]
            pub fn from_addr(addr: usize) -> Option<Self> {
                Self::new(std::ptr::without_provenance_mut(addr))
            }

            #[inline]
            pub fn as_ptr(self) -> *mut c_void {
                self.0.as_ptr()
            }

            #[inline]
            pub fn addr(self) -> usize {
                self.0.as_ptr().addr()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:#x})"), self.addr())
            }
        }

        // SAFETY: the pointer is an opaque engine address. gdbind never
        // dereferences it, so moving it between threads is sound.
        unsafe impl Send for $name {}
        // SAFETY: see above.
        unsafe impl Sync for $name {}
    };
}

engine_pointer!(
    /// Opaque non-null pointer to an engine object.
    ObjectPtr
);

engine_pointer!(
    /// Opaque non-null pointer to an engine method bind.
    MethodBindPtr
);

/// Engine instance id, stable for the life of one object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct InstanceId(pub u64);

impl InstanceId {
    pub const NONE: InstanceId = InstanceId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected() {
        assert!(ObjectPtr::new(std::ptr::null_mut()).is_none());
        assert!(ObjectPtr::from_addr(0).is_none());
    }

    #[test]
    fn addr_round_trip() {
        let ptr = ObjectPtr::from_addr(0x1000).unwrap();
        assert_eq!(ptr.addr(), 0x1000);
        assert_eq!(format!("{ptr:?}"), "ObjectPtr(0x1000)");
    }
}
