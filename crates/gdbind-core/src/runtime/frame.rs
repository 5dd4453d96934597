//! Per-call argument frame.
//!
//! A [`CallFrame`] collects the pointer-encoded arguments of one ptrcall.
//! Scalars and math structs are copied into a bump arena owned by the
//! frame; strings, packed arrays, variants, arrays and callables are created as engine
//! temporaries and destroyed when the frame drops. Dropping happens exactly
//! once per call, whether the call returned normally, returned an error code
//! or unwound.

use std::ffi::c_void;
use std::fmt;

use bumpalo::Bump;
use bytemuck::Zeroable;

use crate::abi::{PackedKind, RawArray, RawCallable, RawNodePath, RawPacked, RawString, RawStringName, RawVariant};
use crate::sys::{ConstTypePtr, MethodBindPtr, ObjectPtr, TypePtr};
use crate::{Callable, Interface, Value};

/// Engine allocation owned by a frame.
#[derive(Clone, Copy)]
enum Temporary {
    String(*mut RawString),
    StringName(*mut RawStringName),
    NodePath(*mut RawNodePath),
    Packed(PackedKind, *mut RawPacked),
    Variant(*mut RawVariant),
    Array(*mut RawArray),
    Callable(*mut RawCallable),
}

/// Argument list for one ptrcall.
pub struct CallFrame<'i> {
    iface: &'i dyn Interface,
    arena: Bump,
    args: Vec<ConstTypePtr>,
    temporaries: Vec<Temporary>,
}

impl<'i> CallFrame<'i> {
    pub fn new(iface: &'i dyn Interface) -> Self {
        Self {
            iface,
            arena: Bump::new(),
            args: Vec::new(),
            temporaries: Vec::new(),
        }
    }

    pub fn interface(&self) -> &'i dyn Interface {
        self.iface
    }

    /// Number of arguments pushed so far.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Number of engine temporaries the frame will destroy.
    pub fn temporary_count(&self) -> usize {
        self.temporaries.len()
    }

    /// Push a plain value by copy.
    pub fn push_value<P: Copy>(&mut self, value: P) {
        let slot: &mut P = self.arena.alloc(value);
        self.args.push((slot as *const P).cast());
    }

    /// Push an object argument; `None` passes null.
    pub fn push_object(&mut self, object: Option<ObjectPtr>) {
        let raw: *mut c_void = object.map_or(std::ptr::null_mut(), ObjectPtr::as_ptr);
        self.push_value(raw);
    }

    pub fn push_string(&mut self, value: &str) {
        let slot = self.alloc_payload::<RawString>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.string_new(slot, value) };
        self.temporaries.push(Temporary::String(slot));
        self.args.push(slot.cast_const().cast());
    }

    pub fn push_string_name(&mut self, value: &str) {
        let slot = self.alloc_payload::<RawStringName>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.string_name_new(slot, value) };
        self.temporaries.push(Temporary::StringName(slot));
        self.args.push(slot.cast_const().cast());
    }

    pub fn push_node_path(&mut self, value: &str) {
        let slot = self.alloc_payload::<RawNodePath>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.node_path_new(slot, value) };
        self.temporaries.push(Temporary::NodePath(slot));
        self.args.push(slot.cast_const().cast());
    }

    /// Push a packed array built from tightly packed element bytes.
    pub fn push_packed(&mut self, kind: PackedKind, bytes: &[u8]) {
        debug_assert_eq!(bytes.len() % kind.element_size(), 0);
        let slot = self.alloc_payload::<RawPacked>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.packed_array_new(kind, slot, bytes) };
        self.temporaries.push(Temporary::Packed(kind, slot));
        self.args.push(slot.cast_const().cast());
    }

    pub fn push_variant(&mut self, value: &Value) {
        let slot = self.alloc_payload::<RawVariant>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.variant_new(slot, value) };
        self.temporaries.push(Temporary::Variant(slot));
        self.args.push(slot.cast_const().cast());
    }

    pub fn push_array(&mut self, items: &[Value]) {
        let slot = self.alloc_payload::<RawArray>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.array_new(slot, items) };
        self.temporaries.push(Temporary::Array(slot));
        self.args.push(slot.cast_const().cast());
    }

    pub fn push_callable(&mut self, callable: &Callable) {
        let slot = self.alloc_payload::<RawCallable>();
        // SAFETY: `slot` is fresh storage owned by this frame.
        unsafe { self.iface.callable_new(slot, callable) };
        self.temporaries.push(Temporary::Callable(slot));
        self.args.push(slot.cast_const().cast());
    }

    fn alloc_payload<P: Zeroable>(&self) -> *mut P {
        self.arena.alloc(P::zeroed())
    }

    /// Invoke `bind` on `object` and return the raw return slot.
    ///
    /// The frame is consumed; its temporaries are released before this
    /// function returns, after the return slot has been read.
    ///
    /// # Safety
    ///
    /// The pushed arguments must match the parameter list of `bind`, and `P`
    /// must be the slot type of its return value (`()` for void).
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub unsafe fn call_raw<P: Copy + Zeroable>(self, bind: MethodBindPtr, object: ObjectPtr) -> P {
        let mut ret = P::zeroed();
        let ret_ptr: TypePtr = (&mut ret as *mut P).cast();
        // SAFETY: forwarded from the caller.
        unsafe { self.iface.ptrcall(bind, object, self.args.as_ptr(), ret_ptr) };
        ret
    }

    fn release(&mut self) {
        for temp in self.temporaries.drain(..).rev() {
            // SAFETY: each temporary was initialized by `push_*` and is
            // removed from the list before being destroyed.
            unsafe {
                match temp {
                    Temporary::String(p) => self.iface.string_destroy(p),
                    Temporary::StringName(p) => self.iface.string_name_destroy(p),
                    Temporary::NodePath(p) => self.iface.node_path_destroy(p),
                    Temporary::Packed(kind, p) => self.iface.packed_array_destroy(kind, p),
                    Temporary::Variant(p) => self.iface.variant_destroy(p),
                    Temporary::Array(p) => self.iface.array_destroy(p),
                    Temporary::Callable(p) => self.iface.callable_destroy(p),
                }
            }
        }
    }
}

impl Drop for CallFrame<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CallFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFrame")
            .field("arg_count", &self.args.len())
            .field("temporaries", &self.temporaries.len())
            .field("arena_bytes", &self.arena.allocated_bytes())
            .finish()
    }
}
