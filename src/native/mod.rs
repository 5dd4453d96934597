//! The real GDExtension function table.
//!
//! [`NativeInterface`] implements [`Interface`] on top of the functions the
//! engine hands out through `get_proc_address`. It is built once by the
//! library entry point (see [`crate::entry`]) and shared by everything the
//! loaded [`Engine`](crate::Engine) does.
//!
//! Extension instances are attached to their engine objects with
//! `object_set_instance`. The engine keeps a pointer to a small per-object
//! record, and the interface keeps an object to instance
//! map so [`Interface::object_instance`] can answer without a round trip.
//!
//! A [`Callable`] becomes a custom engine callable whose userdata owns a
//! clone of it; the engine frees that clone with the last engine copy.

mod sys;

use std::ffi::c_char;
use std::mem::MaybeUninit;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rustc_hash::FxHashMap;
use tracing::{debug, error, info, warn};

use gdbind_core::{
    BindError, Callable, ClassFlags, ConstTypePtr, ExtensionClassInfo, GodotVersion, InstanceId, InstancePtr, Interface,
    MethodBindPtr, ObjectPtr, PackedKind, RawArray, RawCallable, RawNodePath, RawPacked, RawString, RawStringName, RawVariant,
    TypePtr, Value, VariantType, thunk_from_ptr, thunk_to_ptr,
};

pub use sys::{GetProcAddress, Initialization, InterfaceFunction};
use sys::{
    CallError, CallableCustomInfo, ClassCreationInfo2, ConstIndexOperator, ConstRawPtr, GdInt, GdVariantType, GodotVersionRaw, IndexOperator,
    InterfaceTable, PtrBuiltinMethod, PtrConstructor, PtrDestructor, RawPtr,
};

fn tag(ty: VariantType) -> GdVariantType {
    ty.into()
}

/// Constructor, destructor and element access of `Array` or a packed array.
#[derive(Clone, Copy)]
struct ContainerOps {
    construct: PtrConstructor,
    destroy: PtrDestructor,
    size: PtrBuiltinMethod,
    resize: PtrBuiltinMethod,
    index: IndexOperator,
    index_const: ConstIndexOperator,
}

impl ContainerOps {
    /// # Safety
    ///
    /// `container` must be an initialized container of this type.
    unsafe fn len(&self, container: ConstRawPtr) -> usize {
        let mut len: GdInt = 0;
        unsafe { (self.size)(container.cast_mut(), ptr::null(), (&raw mut len).cast(), 0) };
        usize::try_from(len).unwrap_or(0)
    }

    /// # Safety
    ///
    /// As [`ContainerOps::len`].
    unsafe fn set_len(&self, container: RawPtr, len: usize) {
        let len = GdInt::try_from(len).unwrap_or(GdInt::MAX);
        let args = [(&raw const len).cast::<std::ffi::c_void>()];
        let mut status: GdInt = 0;
        unsafe { (self.resize)(container, args.as_ptr(), (&raw mut status).cast(), 1) };
    }
}

/// Builtin type helpers resolved once at load.
struct Builtins {
    string_destroy: PtrDestructor,
    string_name_destroy: PtrDestructor,
    node_path_destroy: PtrDestructor,
    callable_destroy: PtrDestructor,
    string_from_string_name: PtrConstructor,
    string_from_node_path: PtrConstructor,
    node_path_from_string: PtrConstructor,
    array: ContainerOps,
    packed: [ContainerOps; 5],
}

fn packed_slot(kind: PackedKind) -> usize {
    match kind {
        PackedKind::Byte => 0,
        PackedKind::Int32 => 1,
        PackedKind::Float32 => 2,
        PackedKind::Vector3 => 3,
        PackedKind::Color => 4,
    }
}

impl Builtins {
    unsafe fn load(table: &InterfaceTable) -> Result<Self, BindError> {
        let constructor = |ty: VariantType, index: i32, what: &'static str| {
            let found = unsafe { (table.variant_get_ptr_constructor)(tag(ty), index) };
            found.ok_or(BindError::MissingInterfaceFunction(what))
        };
        let destructor = |ty: VariantType, what: &'static str| {
            let found = unsafe { (table.variant_get_ptr_destructor)(tag(ty)) };
            found.ok_or(BindError::MissingInterfaceFunction(what))
        };

        let string_name_destroy = destructor(VariantType::StringName, "StringName destructor")?;
        let method = |ty: VariantType, name: &str, hash: GdInt, what: &'static str| {
            let mut raw = MaybeUninit::<RawStringName>::uninit();
            unsafe {
                (table.string_name_new_with_utf8_chars_and_len)(
                    raw.as_mut_ptr().cast(),
                    name.as_ptr().cast::<c_char>(),
                    name.len() as GdInt,
                );
                let found = (table.variant_get_ptr_builtin_method)(tag(ty), raw.as_ptr().cast(), hash);
                string_name_destroy(raw.as_mut_ptr().cast());
                found.ok_or(BindError::MissingInterfaceFunction(what))
            }
        };
        let container = |ty: VariantType,
                         index: IndexOperator,
                         index_const: ConstIndexOperator,
                         what: &'static str|
         -> Result<ContainerOps, BindError> {
            Ok(ContainerOps {
                construct: constructor(ty, sys::CONSTRUCT_DEFAULT, what)?,
                destroy: destructor(ty, what)?,
                size: method(ty, "size", sys::SIZE_HASH, what)?,
                resize: method(ty, "resize", sys::RESIZE_HASH, what)?,
                index,
                index_const,
            })
        };

        Ok(Self {
            string_destroy: destructor(VariantType::String, "String destructor")?,
            string_name_destroy,
            node_path_destroy: destructor(VariantType::NodePath, "NodePath destructor")?,
            callable_destroy: destructor(VariantType::Callable, "Callable destructor")?,
            string_from_string_name: constructor(
                VariantType::String,
                sys::STRING_FROM_STRING_NAME,
                "String(StringName) constructor",
            )?,
            string_from_node_path: constructor(
                VariantType::String,
                sys::STRING_FROM_NODE_PATH,
                "String(NodePath) constructor",
            )?,
            node_path_from_string: constructor(
                VariantType::NodePath,
                sys::NODE_PATH_FROM_STRING,
                "NodePath(String) constructor",
            )?,
            array: container(
                VariantType::Array,
                table.array_operator_index,
                table.array_operator_index_const,
                "Array builtins",
            )?,
            packed: [
                container(
                    VariantType::PackedByteArray,
                    table.packed_byte_array_operator_index,
                    table.packed_byte_array_operator_index_const,
                    "PackedByteArray builtins",
                )?,
                container(
                    VariantType::PackedInt32Array,
                    table.packed_int32_array_operator_index,
                    table.packed_int32_array_operator_index_const,
                    "PackedInt32Array builtins",
                )?,
                container(
                    VariantType::PackedFloat32Array,
                    table.packed_float32_array_operator_index,
                    table.packed_float32_array_operator_index_const,
                    "PackedFloat32Array builtins",
                )?,
                container(
                    VariantType::PackedVector3Array,
                    table.packed_vector3_array_operator_index,
                    table.packed_vector3_array_operator_index_const,
                    "PackedVector3Array builtins",
                )?,
                container(
                    VariantType::PackedColorArray,
                    table.packed_color_array_operator_index,
                    table.packed_color_array_operator_index_const,
                    "PackedColorArray builtins",
                )?,
            ],
        })
    }
}

/// The `GDExtensionClassLibraryPtr` the engine passed to the entry point.
#[derive(Clone, Copy)]
struct LibraryToken(RawPtr);

// SAFETY: the token is an opaque handle the engine accepts from any thread.
unsafe impl Send for LibraryToken {}
unsafe impl Sync for LibraryToken {}

/// Engine-side userdata of one registered extension class.
struct ClassRecord {
    iface: Weak<NativeInterface>,
    info: Arc<ExtensionClassInfo>,
    /// Nearest engine class; the object the engine constructs.
    base: String,
}

/// What the engine stores as the instance of an extension object.
struct NativeInstance {
    iface: Weak<NativeInterface>,
    info: Arc<ExtensionClassInfo>,
    object: ObjectPtr,
    instance: InstancePtr,
}

/// Userdata of a custom callable.
struct CallableRecord {
    iface: Weak<NativeInterface>,
    callable: Callable,
}

/// [`Interface`] over the engine's real function table.
pub struct NativeInterface {
    table: InterfaceTable,
    builtins: Builtins,
    library: LibraryToken,
    version: GodotVersion,
    classes: Mutex<FxHashMap<String, Box<ClassRecord>>>,
    /// Object address to extension instance address.
    instances: Mutex<FxHashMap<usize, usize>>,
    this: Weak<NativeInterface>,
}

impl NativeInterface {
    /// Resolve every interface function gdbind uses.
    ///
    /// # Safety
    ///
    /// `get_proc_address` and `library` must be the values the engine passed
    /// to the library entry point.
    pub unsafe fn load(get_proc_address: GetProcAddress, library: *mut std::ffi::c_void) -> Result<Arc<Self>, BindError> {
        let table = unsafe { InterfaceTable::load(get_proc_address)? };
        let builtins = unsafe { Builtins::load(&table)? };

        let mut raw = MaybeUninit::<GodotVersionRaw>::uninit();
        // SAFETY: the engine fills every field.
        let raw = unsafe {
            (table.get_godot_version)(raw.as_mut_ptr());
            raw.assume_init()
        };
        let version = GodotVersion::new(raw.major, raw.minor, raw.patch);
        info!(%version, "GDExtension interface loaded");

        Ok(Arc::new_cyclic(|this| Self {
            table,
            builtins,
            library: LibraryToken(library),
            version,
            classes: Mutex::new(FxHashMap::default()),
            instances: Mutex::new(FxHashMap::default()),
            this: this.clone(),
        }))
    }

    fn classes(&self) -> MutexGuard<'_, FxHashMap<String, Box<ClassRecord>>> {
        self.classes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn instances(&self) -> MutexGuard<'_, FxHashMap<usize, usize>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with a temporary engine `StringName` holding `text`.
    fn with_name<R>(&self, text: &str, f: impl FnOnce(ConstRawPtr) -> R) -> R {
        let mut raw = MaybeUninit::<RawStringName>::uninit();
        // SAFETY: the name is initialized here and destroyed once below.
        unsafe {
            self.string_name_new(raw.as_mut_ptr(), text);
            let result = f(raw.as_ptr().cast());
            self.string_name_destroy(raw.as_mut_ptr());
            result
        }
    }

    fn packed(&self, kind: PackedKind) -> &ContainerOps {
        &self.builtins.packed[packed_slot(kind)]
    }

    /// Copy a variant's payload into `T` through its to-type constructor.
    ///
    /// # Safety
    ///
    /// `T` must match the layout of `ty` and `variant` must hold a `ty`.
    unsafe fn read_as<T>(&self, ty: VariantType, variant: *const RawVariant) -> Option<T> {
        let convert = unsafe { (self.table.get_variant_to_type_constructor)(tag(ty)) }?;
        let mut out = MaybeUninit::<T>::uninit();
        unsafe {
            convert(out.as_mut_ptr().cast(), variant.cast_mut().cast());
            Some(out.assume_init())
        }
    }

    /// # Safety
    ///
    /// `value` must point at an initialized payload matching `ty`.
    unsafe fn write_from<T>(&self, ty: VariantType, out: *mut RawVariant, value: *mut T) {
        match unsafe { (self.table.get_variant_from_type_constructor)(tag(ty)) } {
            Some(convert) => unsafe { convert(out.cast(), value.cast()) },
            None => {
                warn!(?ty, "no variant constructor, storing nil");
                unsafe { (self.table.variant_new_nil)(out.cast()) };
            }
        }
    }

    /// Builds the engine base object and attaches a new Rust instance.
    fn instantiate(&self, record: &ClassRecord) -> Option<ObjectPtr> {
        let object = self.construct_object(&record.base)?;
        let Some(instance) = record.info.create_instance(object) else {
            error!(class = %record.info.name, "extension instance creation failed");
            // SAFETY: the object was just constructed and nothing else holds it.
            unsafe { self.destroy_object(object) };
            return None;
        };
        let wrapper = Box::into_raw(Box::new(NativeInstance {
            iface: self.this.clone(),
            info: Arc::clone(&record.info),
            object,
            instance,
        }));
        self.with_name(&record.info.name, |name| {
            // SAFETY: `object` is live; the engine keeps `wrapper` until it
            // calls `free_instance`.
            unsafe { (self.table.object_set_instance)(object.as_ptr(), name, wrapper.cast()) }
        });
        self.instances().insert(object.addr(), instance as usize);
        debug!(class = %record.info.name, object = object.addr(), "extension instance created");
        Some(object)
    }
}

impl std::fmt::Debug for NativeInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeInterface")
            .field("version", &self.version)
            .field("classes", &self.classes().len())
            .finish_non_exhaustive()
    }
}

/// Run an engine callback, turning a panic into `fallback`.
pub(crate) fn guarded<R>(what: &str, fallback: R, f: impl FnOnce() -> R) -> R {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(callback = what, "panic inside an engine callback");
        fallback
    })
}

unsafe extern "C" fn create_instance(class_userdata: RawPtr) -> RawPtr {
    guarded("create_instance", ptr::null_mut(), || {
        // SAFETY: the userdata is the boxed record registered with the class.
        let record = unsafe { &*class_userdata.cast::<ClassRecord>() };
        record
            .iface
            .upgrade()
            .and_then(|iface| iface.instantiate(record))
            .map_or(ptr::null_mut(), ObjectPtr::as_ptr)
    })
}

unsafe extern "C" fn free_instance(_class_userdata: RawPtr, instance: RawPtr) {
    guarded("free_instance", (), || {
        // SAFETY: `instance` is the wrapper boxed by `instantiate`; the engine
        // frees it exactly once.
        let wrapper = unsafe { Box::from_raw(instance.cast::<NativeInstance>()) };
        if let Some(iface) = wrapper.iface.upgrade() {
            iface.instances().remove(&wrapper.object.addr());
        }
        // SAFETY: the Rust instance was created by this class.
        unsafe { wrapper.info.free_instance(wrapper.instance) };
    });
}

unsafe extern "C" fn call_callable(
    userdata: RawPtr,
    args: *const ConstRawPtr,
    argc: GdInt,
    ret: RawPtr,
    error: *mut CallError,
) {
    guarded("call_callable", (), || {
        // SAFETY: the userdata is the record boxed by `callable_new`.
        let record = unsafe { &*userdata.cast::<CallableRecord>() };
        let Some(iface) = record.iface.upgrade() else {
            return;
        };
        let argc = usize::try_from(argc).unwrap_or(0);
        let values: Vec<Value> = (0..argc)
            // SAFETY: the engine passes `argc` initialized variants.
            .map(|index| unsafe { iface.variant_to_value((*args.add(index)).cast()) })
            .collect();
        record.callable.call(&values);
        // SAFETY: `ret` and `error` are engine-provided out parameters.
        unsafe {
            (iface.table.variant_new_nil)(ret);
            (*error).error = sys::CALL_OK;
        }
    });
}

unsafe extern "C" fn free_callable(userdata: RawPtr) {
    guarded("free_callable", (), || {
        // SAFETY: boxed by `callable_new`; the engine frees it once.
        drop(unsafe { Box::from_raw(userdata.cast::<CallableRecord>()) });
    });
}

/// # Safety
///
/// `userdata` must be a live [`CallableRecord`].
unsafe fn callable_id(userdata: RawPtr) -> usize {
    let record = unsafe { &*userdata.cast::<CallableRecord>() };
    record.callable.id()
}

unsafe extern "C" fn hash_callable(userdata: RawPtr) -> u32 {
    // SAFETY: as in `call_callable`.
    guarded("hash_callable", 0, || unsafe { callable_id(userdata) as u32 })
}

unsafe extern "C" fn callables_equal(a: RawPtr, b: RawPtr) -> u8 {
    // SAFETY: both are userdata of custom callables created here.
    guarded("callables_equal", 0, || u8::from(unsafe { callable_id(a) == callable_id(b) }))
}

unsafe extern "C" fn callable_less_than(a: RawPtr, b: RawPtr) -> u8 {
    // SAFETY: as in `callables_equal`.
    guarded("callable_less_than", 0, || u8::from(unsafe { callable_id(a) < callable_id(b) }))
}

unsafe extern "C" fn get_virtual_call_data(class_userdata: RawPtr, name: ConstRawPtr) -> RawPtr {
    guarded("get_virtual_call_data", ptr::null_mut(), || {
        // SAFETY: as in `create_instance`.
        let record = unsafe { &*class_userdata.cast::<ClassRecord>() };
        let Some(iface) = record.iface.upgrade() else {
            return ptr::null_mut();
        };
        // SAFETY: the engine passes an initialized StringName.
        let hook = unsafe { iface.string_name_to_utf8(name.cast()) };
        record.info.virtual_hook(&hook).map_or(ptr::null_mut(), thunk_to_ptr)
    })
}

unsafe extern "C" fn call_virtual_with_data(
    instance: RawPtr,
    _name: ConstRawPtr,
    call_data: RawPtr,
    args: *const ConstRawPtr,
    ret: RawPtr,
) {
    guarded("call_virtual_with_data", (), || {
        // SAFETY: as in `free_instance`, borrowed for the call.
        let wrapper = unsafe { &*instance.cast::<NativeInstance>() };
        let Some(iface) = wrapper.iface.upgrade() else {
            return;
        };
        // SAFETY: `call_data` came from `get_virtual_call_data`.
        let thunk = unsafe { thunk_from_ptr(call_data) };
        // SAFETY: the engine lays out `args` and `ret` for this hook.
        unsafe { thunk(iface.as_ref(), wrapper.instance, args, ret) };
    });
}

impl Interface for NativeInterface {
    fn godot_version(&self) -> GodotVersion {
        self.version
    }

    fn method_bind(&self, class: &str, method: &str, hash: i64) -> Option<MethodBindPtr> {
        let raw = self.with_name(class, |class| {
            self.with_name(method, |method| unsafe {
                (self.table.classdb_get_method_bind)(class, method, hash)
            })
        });
        MethodBindPtr::new(raw)
    }

    fn construct_object(&self, class: &str) -> Option<ObjectPtr> {
        let raw = self.with_name(class, |class| unsafe { (self.table.classdb_construct_object)(class) });
        ObjectPtr::new(raw)
    }

    unsafe fn destroy_object(&self, object: ObjectPtr) {
        unsafe { (self.table.object_destroy)(object.as_ptr()) }
    }

    unsafe fn instance_id(&self, object: ObjectPtr) -> InstanceId {
        InstanceId(unsafe { (self.table.object_get_instance_id)(object.as_ptr()) })
    }

    fn object_from_instance_id(&self, id: InstanceId) -> Option<ObjectPtr> {
        if id.is_none() {
            return None;
        }
        ObjectPtr::new(unsafe { (self.table.object_get_instance_from_id)(id.0) })
    }

    unsafe fn cast_to(&self, object: ObjectPtr, class: &str) -> Option<ObjectPtr> {
        let class_tag = self.with_name(class, |class| unsafe { (self.table.classdb_get_class_tag)(class) });
        if class_tag.is_null() {
            return None;
        }
        ObjectPtr::new(unsafe { (self.table.object_cast_to)(object.as_ptr(), class_tag) })
    }

    unsafe fn class_name(&self, object: ObjectPtr) -> Option<String> {
        let mut raw = MaybeUninit::<RawStringName>::uninit();
        let found = unsafe {
            (self.table.object_get_class_name)(object.as_ptr(), self.library.0, raw.as_mut_ptr().cast())
        };
        if found == 0 {
            return None;
        }
        unsafe {
            let name = self.string_name_to_utf8(raw.as_ptr());
            self.string_name_destroy(raw.as_mut_ptr());
            Some(name)
        }
    }

    unsafe fn ptrcall(&self, bind: MethodBindPtr, object: ObjectPtr, args: *const ConstTypePtr, ret: TypePtr) {
        unsafe { (self.table.object_method_bind_ptrcall)(bind.as_ptr(), object.as_ptr(), args, ret) }
    }

    unsafe fn string_new(&self, out: *mut RawString, value: &str) {
        unsafe {
            (self.table.string_new_with_utf8_chars_and_len)(
                out.cast(),
                value.as_ptr().cast(),
                value.len() as GdInt,
            )
        }
    }

    unsafe fn string_to_utf8(&self, value: *const RawString) -> String {
        let len = unsafe { (self.table.string_to_utf8_chars)(value.cast(), ptr::null_mut(), 0) };
        let mut bytes = vec![0u8; usize::try_from(len).unwrap_or(0)];
        unsafe { (self.table.string_to_utf8_chars)(value.cast(), bytes.as_mut_ptr().cast(), len) };
        String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    unsafe fn string_destroy(&self, value: *mut RawString) {
        unsafe { (self.builtins.string_destroy)(value.cast()) }
    }

    unsafe fn string_name_new(&self, out: *mut RawStringName, value: &str) {
        unsafe {
            (self.table.string_name_new_with_utf8_chars_and_len)(
                out.cast(),
                value.as_ptr().cast(),
                value.len() as GdInt,
            )
        }
    }

    unsafe fn string_name_to_utf8(&self, value: *const RawStringName) -> String {
        let mut text = MaybeUninit::<RawString>::uninit();
        let args = [value.cast::<std::ffi::c_void>()];
        unsafe {
            (self.builtins.string_from_string_name)(text.as_mut_ptr().cast(), args.as_ptr());
            let result = self.string_to_utf8(text.as_ptr());
            self.string_destroy(text.as_mut_ptr());
            result
        }
    }

    unsafe fn string_name_destroy(&self, value: *mut RawStringName) {
        unsafe { (self.builtins.string_name_destroy)(value.cast()) }
    }

    unsafe fn node_path_new(&self, out: *mut RawNodePath, value: &str) {
        let mut text = MaybeUninit::<RawString>::uninit();
        unsafe {
            self.string_new(text.as_mut_ptr(), value);
            let args = [text.as_ptr().cast::<std::ffi::c_void>()];
            (self.builtins.node_path_from_string)(out.cast(), args.as_ptr());
            self.string_destroy(text.as_mut_ptr());
        }
    }

    unsafe fn node_path_to_utf8(&self, value: *const RawNodePath) -> String {
        let mut text = MaybeUninit::<RawString>::uninit();
        let args = [value.cast::<std::ffi::c_void>()];
        unsafe {
            (self.builtins.string_from_node_path)(text.as_mut_ptr().cast(), args.as_ptr());
            let result = self.string_to_utf8(text.as_ptr());
            self.string_destroy(text.as_mut_ptr());
            result
        }
    }

    unsafe fn node_path_destroy(&self, value: *mut RawNodePath) {
        unsafe { (self.builtins.node_path_destroy)(value.cast()) }
    }

    unsafe fn packed_array_new(&self, kind: PackedKind, out: *mut RawPacked, bytes: &[u8]) {
        let ops = self.packed(kind);
        let len = bytes.len() / kind.element_size();
        unsafe {
            (ops.construct)(out.cast(), ptr::null());
            if len == 0 {
                return;
            }
            ops.set_len(out.cast(), len);
            let first = (ops.index)(out.cast(), 0);
            ptr::copy_nonoverlapping(bytes.as_ptr(), first.cast::<u8>(), len * kind.element_size());
        }
    }

    unsafe fn packed_array_bytes(&self, kind: PackedKind, value: *const RawPacked) -> Vec<u8> {
        let ops = self.packed(kind);
        let len = unsafe { ops.len(value.cast()) };
        if len == 0 {
            return Vec::new();
        }
        let size = len * kind.element_size();
        let mut bytes = vec![0u8; size];
        unsafe {
            let first = (ops.index_const)(value.cast(), 0);
            ptr::copy_nonoverlapping(first.cast::<u8>(), bytes.as_mut_ptr(), size);
        }
        bytes
    }

    unsafe fn packed_array_destroy(&self, kind: PackedKind, value: *mut RawPacked) {
        unsafe { (self.packed(kind).destroy)(value.cast()) }
    }

    unsafe fn variant_new(&self, out: *mut RawVariant, value: &Value) {
        let ty = value.variant_type();
        unsafe {
            match value {
                Value::Nil => (self.table.variant_new_nil)(out.cast()),
                Value::Bool(v) => self.write_from(ty, out, &mut u8::from(*v)),
                Value::Int(v) => self.write_from(ty, out, &mut { *v }),
                Value::Float(v) => self.write_from(ty, out, &mut { *v }),
                Value::Vector2(v) => self.write_from(ty, out, &mut { *v }),
                Value::Vector3(v) => self.write_from(ty, out, &mut { *v }),
                Value::Color(v) => self.write_from(ty, out, &mut { *v }),
                Value::Quaternion(v) => self.write_from(ty, out, &mut { *v }),
                Value::Aabb(v) => self.write_from(ty, out, &mut { *v }),
                Value::Transform3D(v) => self.write_from(ty, out, &mut { *v }),
                Value::Object(object) => self.write_from(ty, out, &mut object.as_ptr()),
                Value::String(text) => {
                    let mut raw = MaybeUninit::<RawString>::uninit();
                    self.string_new(raw.as_mut_ptr(), text);
                    self.write_from(ty, out, raw.as_mut_ptr());
                    self.string_destroy(raw.as_mut_ptr());
                }
                Value::StringName(text) => {
                    let mut raw = MaybeUninit::<RawStringName>::uninit();
                    self.string_name_new(raw.as_mut_ptr(), text);
                    self.write_from(ty, out, raw.as_mut_ptr());
                    self.string_name_destroy(raw.as_mut_ptr());
                }
            }
        }
    }

    unsafe fn variant_to_value(&self, value: *const RawVariant) -> Value {
        let raw_type = unsafe { (self.table.variant_get_type)(value.cast()) };
        let Ok(ty) = VariantType::try_from(raw_type) else {
            return Value::Nil;
        };
        unsafe {
            let value = match ty {
                VariantType::Bool => self.read_as::<u8>(ty, value).map(|v| Value::Bool(v != 0)),
                VariantType::Int => self.read_as(ty, value).map(Value::Int),
                VariantType::Float => self.read_as(ty, value).map(Value::Float),
                VariantType::Vector2 => self.read_as(ty, value).map(Value::Vector2),
                VariantType::Vector3 => self.read_as(ty, value).map(Value::Vector3),
                VariantType::Color => self.read_as(ty, value).map(Value::Color),
                VariantType::Quaternion => self.read_as(ty, value).map(Value::Quaternion),
                VariantType::Aabb => self.read_as(ty, value).map(Value::Aabb),
                VariantType::Transform3D => self.read_as(ty, value).map(Value::Transform3D),
                VariantType::Object => self
                    .read_as::<RawPtr>(ty, value)
                    .and_then(ObjectPtr::new)
                    .map(Value::Object),
                VariantType::String => self.read_as::<RawString>(ty, value).map(|mut raw| {
                    let text = self.string_to_utf8(&raw);
                    self.string_destroy(&mut raw);
                    Value::String(text)
                }),
                VariantType::StringName => self.read_as::<RawStringName>(ty, value).map(|mut raw| {
                    let text = self.string_name_to_utf8(&raw);
                    self.string_name_destroy(&mut raw);
                    Value::StringName(text)
                }),
                _ => None,
            };
            value.unwrap_or_default()
        }
    }

    unsafe fn variant_destroy(&self, value: *mut RawVariant) {
        unsafe { (self.table.variant_destroy)(value.cast()) }
    }

    unsafe fn array_new(&self, out: *mut RawArray, items: &[Value]) {
        let ops = &self.builtins.array;
        unsafe {
            (ops.construct)(out.cast(), ptr::null());
            if items.is_empty() {
                return;
            }
            ops.set_len(out.cast(), items.len());
            for (index, item) in items.iter().enumerate() {
                let slot = (ops.index)(out.cast(), index as GdInt).cast::<RawVariant>();
                self.variant_destroy(slot);
                self.variant_new(slot, item);
            }
        }
    }

    unsafe fn array_to_values(&self, value: *const RawArray) -> Vec<Value> {
        let ops = &self.builtins.array;
        let len = unsafe { ops.len(value.cast()) };
        (0..len)
            .map(|index| unsafe {
                let slot = (ops.index_const)(value.cast(), index as GdInt);
                self.variant_to_value(slot.cast())
            })
            .collect()
    }

    unsafe fn array_destroy(&self, value: *mut RawArray) {
        unsafe { (self.builtins.array.destroy)(value.cast()) }
    }

    unsafe fn callable_new(&self, out: *mut RawCallable, callable: &Callable) {
        let record = Box::into_raw(Box::new(CallableRecord {
            iface: self.this.clone(),
            callable: callable.clone(),
        }));
        let mut info = CallableCustomInfo {
            callable_userdata: record.cast(),
            token: self.library.0,
            object_id: callable.owner().0,
            call_func: Some(call_callable),
            is_valid_func: None,
            free_func: Some(free_callable),
            hash_func: Some(hash_callable),
            equal_func: Some(callables_equal),
            less_than_func: Some(callable_less_than),
            to_string_func: None,
        };
        // SAFETY: the engine copies `info` and owns `record` from here on.
        unsafe { (self.table.callable_custom_create)(out.cast(), &mut info) }
    }

    unsafe fn callable_destroy(&self, value: *mut RawCallable) {
        unsafe { (self.builtins.callable_destroy)(value.cast()) }
    }

    fn register_extension_class(&self, info: Arc<ExtensionClassInfo>) -> Result<(), BindError> {
        let mut classes = self.classes();
        if classes.contains_key(&info.name) {
            return Err(BindError::AlreadyRegistered(info.name.clone()));
        }
        let base = classes
            .get(&info.parent)
            .map_or_else(|| info.parent.clone(), |parent| parent.base.clone());
        let record = Box::new(ClassRecord {
            iface: self.this.clone(),
            info: Arc::clone(&info),
            base,
        });

        let creation = ClassCreationInfo2 {
            is_virtual: u8::from(info.flags.contains(ClassFlags::VIRTUAL)),
            is_abstract: u8::from(info.flags.contains(ClassFlags::ABSTRACT)),
            is_exposed: u8::from(info.flags.contains(ClassFlags::EXPOSED)),
            set: None,
            get: None,
            get_property_list: None,
            free_property_list: None,
            property_can_revert: None,
            property_get_revert: None,
            validate_property: None,
            notification: None,
            to_string: None,
            reference: None,
            unreference: None,
            create_instance: Some(create_instance),
            free_instance: Some(free_instance),
            recreate_instance: None,
            get_virtual: None,
            get_virtual_call_data: Some(get_virtual_call_data),
            call_virtual_with_data: Some(call_virtual_with_data),
            get_rid: None,
            class_userdata: ptr::from_ref::<ClassRecord>(&*record).cast_mut().cast(),
        };

        // The engine reports rejection only through its log; a class tag
        // exists exactly when the class made it into ClassDB.
        let registered = self.with_name(&info.name, |name| {
            self.with_name(&info.parent, |parent| unsafe {
                (self.table.classdb_register_extension_class2)(self.library.0, name, parent, &creation);
                !(self.table.classdb_get_class_tag)(name).is_null()
            })
        });
        if !registered {
            return Err(BindError::RegistrationRejected(info.name.clone()));
        }
        debug!(class = %info.name, base = %record.base, "class registered with the engine");
        classes.insert(info.name.clone(), record);
        Ok(())
    }

    fn unregister_extension_class(&self, name: &str) {
        self.with_name(name, |class| unsafe {
            (self.table.classdb_unregister_extension_class)(self.library.0, class)
        });
        self.classes().remove(name);
    }

    unsafe fn object_instance(&self, object: ObjectPtr) -> Option<InstancePtr> {
        self.instances()
            .get(&object.addr())
            .map(|instance| *instance as InstancePtr)
    }
}
