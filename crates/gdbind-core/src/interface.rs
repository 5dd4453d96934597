//! The engine-facing function table.
//!
//! [`Interface`] is the seam between gdbind and whatever provides the
//! GDExtension ABI: the real engine (loaded through `get_proc_address`) or an
//! in-process double used by tests. Every primitive a generated method shim
//! needs is expressed here; nothing above this trait touches engine memory.
//!
//! Raw payload pointers (`*mut RawString` and friends) always point at
//! storage owned by the caller. `*_new` functions initialize that storage;
//! `*_destroy` functions release whatever the engine allocated for it. Each
//! initialized payload must be destroyed exactly once.

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::abi::{PackedKind, RawArray, RawCallable, RawNodePath, RawPacked, RawString, RawStringName, RawVariant};
use crate::sys::{ConstTypePtr, InstanceId, InstancePtr, MethodBindPtr, ObjectPtr, TypePtr};
use crate::{BindError, Callable, GodotVersion, Value};

/// The GDExtension function table.
pub trait Interface: Send + Sync {
    fn godot_version(&self) -> GodotVersion;

    // ------------------------------------------------------------------
    // ClassDB and objects
    // ------------------------------------------------------------------

    /// Looks up a method bind by class, method name and signature hash.
    fn method_bind(&self, class: &str, method: &str, hash: i64) -> Option<MethodBindPtr>;

    /// Constructs a new engine object of `class`.
    fn construct_object(&self, class: &str) -> Option<ObjectPtr>;

    /// Destroys an object immediately.
    ///
    /// # Safety
    ///
    /// `object` must be live and not referenced by the engine afterwards.
    unsafe fn destroy_object(&self, object: ObjectPtr);

    /// # Safety
    ///
    /// `object` must be live.
    unsafe fn instance_id(&self, object: ObjectPtr) -> InstanceId;

    /// Returns the object with this id if it is still alive.
    fn object_from_instance_id(&self, id: InstanceId) -> Option<ObjectPtr>;

    /// Checked downcast through the engine's class tags.
    ///
    /// # Safety
    ///
    /// `object` must be live.
    unsafe fn cast_to(&self, object: ObjectPtr, class: &str) -> Option<ObjectPtr>;

    /// The most derived class name of `object`.
    ///
    /// # Safety
    ///
    /// `object` must be live.
    unsafe fn class_name(&self, object: ObjectPtr) -> Option<String>;

    /// Invokes a method bind with pointer-encoded arguments.
    ///
    /// # Safety
    ///
    /// `args` must point at one valid slot per parameter of `bind`, encoded as
    /// the method's signature requires, and `ret` must point at zeroed storage
    /// large enough for its return type.
    unsafe fn ptrcall(
        &self,
        bind: MethodBindPtr,
        object: ObjectPtr,
        args: *const ConstTypePtr,
        ret: TypePtr,
    );

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// # Safety
    ///
    /// `out` must point at writable, uninitialized storage.
    unsafe fn string_new(&self, out: *mut RawString, value: &str);
    /// # Safety
    ///
    /// `value` must be initialized.
    unsafe fn string_to_utf8(&self, value: *const RawString) -> String;
    /// # Safety
    ///
    /// `value` must be initialized and is uninitialized afterwards.
    unsafe fn string_destroy(&self, value: *mut RawString);

    /// # Safety
    ///
    /// As [`Interface::string_new`].
    unsafe fn string_name_new(&self, out: *mut RawStringName, value: &str);
    /// # Safety
    ///
    /// As [`Interface::string_to_utf8`].
    unsafe fn string_name_to_utf8(&self, value: *const RawStringName) -> String;
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn string_name_destroy(&self, value: *mut RawStringName);

    /// # Safety
    ///
    /// As [`Interface::string_new`].
    unsafe fn node_path_new(&self, out: *mut RawNodePath, value: &str);
    /// # Safety
    ///
    /// As [`Interface::string_to_utf8`].
    unsafe fn node_path_to_utf8(&self, value: *const RawNodePath) -> String;
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn node_path_destroy(&self, value: *mut RawNodePath);

    // ------------------------------------------------------------------
    // Packed arrays, variants and arrays
    // ------------------------------------------------------------------

    /// Creates a packed array from tightly packed element bytes.
    ///
    /// # Safety
    ///
    /// As [`Interface::string_new`]; `bytes.len()` is a multiple of the
    /// element size of `kind`.
    unsafe fn packed_array_new(&self, kind: PackedKind, out: *mut RawPacked, bytes: &[u8]);
    /// # Safety
    ///
    /// `value` must be an initialized packed array of `kind`.
    unsafe fn packed_array_bytes(&self, kind: PackedKind, value: *const RawPacked) -> Vec<u8>;
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn packed_array_destroy(&self, kind: PackedKind, value: *mut RawPacked);

    /// # Safety
    ///
    /// As [`Interface::string_new`].
    unsafe fn variant_new(&self, out: *mut RawVariant, value: &Value);
    /// # Safety
    ///
    /// As [`Interface::string_to_utf8`].
    unsafe fn variant_to_value(&self, value: *const RawVariant) -> Value;
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn variant_destroy(&self, value: *mut RawVariant);

    /// # Safety
    ///
    /// As [`Interface::string_new`].
    unsafe fn array_new(&self, out: *mut RawArray, items: &[Value]);
    /// # Safety
    ///
    /// As [`Interface::string_to_utf8`].
    unsafe fn array_to_values(&self, value: *const RawArray) -> Vec<Value>;
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn array_destroy(&self, value: *mut RawArray);

    /// Initialize `out` with an engine callable that runs `callable`.
    ///
    /// # Safety
    ///
    /// As [`Interface::string_new`].
    unsafe fn callable_new(&self, out: *mut RawCallable, callable: &Callable);
    /// # Safety
    ///
    /// As [`Interface::string_destroy`].
    unsafe fn callable_destroy(&self, value: *mut RawCallable);

    // ------------------------------------------------------------------
    // Extension classes
    // ------------------------------------------------------------------

    /// Registers an extension class with the engine.
    fn register_extension_class(&self, info: Arc<ExtensionClassInfo>) -> Result<(), BindError>;

    fn unregister_extension_class(&self, name: &str);

    /// The extension instance attached to `object`, if any.
    ///
    /// # Safety
    ///
    /// `object` must be live.
    unsafe fn object_instance(&self, object: ObjectPtr) -> Option<InstancePtr>;
}

bitflags! {
    /// Registration flags for an extension class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u32 {
        /// Instances are created and may be overridden by scripts.
        const VIRTUAL = 1 << 0;
        /// The engine refuses to instantiate the class directly.
        const ABSTRACT = 1 << 1;
        /// Visible in the editor's class list.
        const EXPOSED = 1 << 2;
    }
}

impl Default for ClassFlags {
    fn default() -> Self {
        ClassFlags::EXPOSED
    }
}

/// Engine-called entry into an overridden virtual hook.
///
/// `args` holds one pointer per hook parameter; `ret` points at the engine's
/// return slot (ignored for hooks returning nothing).
pub type VirtualThunk =
    unsafe fn(iface: &dyn Interface, instance: InstancePtr, args: *const ConstTypePtr, ret: TypePtr);

/// Builds the Rust instance for a freshly constructed base object.
pub type CreateInstance = dyn Fn(ObjectPtr) -> Option<InstancePtr> + Send + Sync;

/// Everything the engine needs to instantiate an extension class.
pub struct ExtensionClassInfo {
    pub name: String,
    /// Engine or extension class this class derives from.
    pub parent: String,
    pub flags: ClassFlags,
    pub create: Box<CreateInstance>,
    /// Drops an instance built by `create`.
    pub free: unsafe fn(InstancePtr),
    /// Name-keyed lookup of overridden virtual hooks.
    pub get_virtual: fn(&str) -> Option<VirtualThunk>,
}

impl ExtensionClassInfo {
    /// Creates the Rust instance for `object`.
    pub fn create_instance(&self, object: ObjectPtr) -> Option<InstancePtr> {
        (self.create)(object)
    }

    /// # Safety
    ///
    /// `instance` must come from [`ExtensionClassInfo::create_instance`] on
    /// this class and must not be used afterwards.
    pub unsafe fn free_instance(&self, instance: InstancePtr) {
        unsafe { (self.free)(instance) }
    }

    pub fn virtual_hook(&self, name: &str) -> Option<VirtualThunk> {
        (self.get_virtual)(name)
    }
}

impl fmt::Debug for ExtensionClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionClassInfo")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Casts a thunk to the untyped pointer the engine stores as call data.
pub fn thunk_to_ptr(thunk: VirtualThunk) -> *mut c_void {
    thunk as *mut c_void
}

/// Recovers a thunk stored with [`thunk_to_ptr`].
///
/// # Safety
///
/// `ptr` must have been produced by [`thunk_to_ptr`].
pub unsafe fn thunk_from_ptr(ptr: *mut c_void) -> VirtualThunk {
    unsafe { std::mem::transmute::<*mut c_void, VirtualThunk>(ptr) }
}
