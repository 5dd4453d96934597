//! Minimal interface for registry tests: method binds, object construction
//! and class registration, nothing else.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use gdbind_core::{
    AbiType, Access, BindError, Callable, ClassSpec, ConstTypePtr, ExtensionClassInfo, GodotVersion, InstanceId,
    InstancePtr, Interface, MethodBindPtr, MethodSpec, NameHash, ObjectPtr, PackedKind, RawArray, RawCallable, RawNodePath,
    RawPacked, RawString, RawStringName, RawVariant, TypePtr, Value,
};

pub struct StubInterface {
    version: GodotVersion,
    binds: FxHashMap<(String, String, i64), usize>,
    next_object: AtomicUsize,
    rejected: Vec<String>,
    registered: Mutex<Vec<String>>,
}

impl StubInterface {
    pub fn new(version: GodotVersion) -> Self {
        Self {
            version,
            binds: FxHashMap::default(),
            next_object: AtomicUsize::new(0),
            rejected: Vec::new(),
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bind(mut self, class: &str, method: &str, hash: i64) -> Self {
        let addr = 0x100 + self.binds.len() * 8;
        self.binds.insert((class.into(), method.into(), hash), addr);
        self
    }

    /// Make the engine refuse to register `class`.
    pub fn rejecting(mut self, class: &str) -> Self {
        self.rejected.push(class.into());
        self
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }
}

impl Interface for StubInterface {
    fn godot_version(&self) -> GodotVersion {
        self.version
    }

    fn method_bind(&self, class: &str, method: &str, hash: i64) -> Option<MethodBindPtr> {
        let addr = *self.binds.get(&(class.to_string(), method.to_string(), hash))?;
        MethodBindPtr::from_addr(addr)
    }

    fn construct_object(&self, _: &str) -> Option<ObjectPtr> {
        let n = self.next_object.fetch_add(1, Ordering::Relaxed) + 1;
        ObjectPtr::from_addr(0x10_000 + n * 0x10)
    }

    unsafe fn destroy_object(&self, _: ObjectPtr) {}

    unsafe fn instance_id(&self, object: ObjectPtr) -> InstanceId {
        InstanceId(object.addr() as u64)
    }

    fn object_from_instance_id(&self, id: InstanceId) -> Option<ObjectPtr> {
        ObjectPtr::from_addr(id.0 as usize)
    }

    unsafe fn cast_to(&self, object: ObjectPtr, _: &str) -> Option<ObjectPtr> {
        Some(object)
    }

    unsafe fn class_name(&self, _: ObjectPtr) -> Option<String> {
        None
    }

    unsafe fn ptrcall(&self, _: MethodBindPtr, _: ObjectPtr, _: *const ConstTypePtr, ret: TypePtr) {
        // Refcount binds report "last reference dropped".
        unsafe { ret.cast::<u8>().write(1) };
    }

    unsafe fn string_new(&self, _: *mut RawString, _: &str) {}
    unsafe fn string_to_utf8(&self, _: *const RawString) -> String {
        String::new()
    }
    unsafe fn string_destroy(&self, _: *mut RawString) {}
    unsafe fn string_name_new(&self, _: *mut RawStringName, _: &str) {}
    unsafe fn string_name_to_utf8(&self, _: *const RawStringName) -> String {
        String::new()
    }
    unsafe fn string_name_destroy(&self, _: *mut RawStringName) {}
    unsafe fn node_path_new(&self, _: *mut RawNodePath, _: &str) {}
    unsafe fn node_path_to_utf8(&self, _: *const RawNodePath) -> String {
        String::new()
    }
    unsafe fn node_path_destroy(&self, _: *mut RawNodePath) {}
    unsafe fn packed_array_new(&self, _: PackedKind, _: *mut RawPacked, _: &[u8]) {}
    unsafe fn packed_array_bytes(&self, _: PackedKind, _: *const RawPacked) -> Vec<u8> {
        Vec::new()
    }
    unsafe fn packed_array_destroy(&self, _: PackedKind, _: *mut RawPacked) {}
    unsafe fn variant_new(&self, _: *mut RawVariant, _: &Value) {}
    unsafe fn variant_to_value(&self, _: *const RawVariant) -> Value {
        Value::Nil
    }
    unsafe fn variant_destroy(&self, _: *mut RawVariant) {}
    unsafe fn array_new(&self, _: *mut RawArray, _: &[Value]) {}
    unsafe fn array_to_values(&self, _: *const RawArray) -> Vec<Value> {
        Vec::new()
    }
    unsafe fn array_destroy(&self, _: *mut RawArray) {}
    unsafe fn callable_new(&self, _: *mut RawCallable, _: &Callable) {}
    unsafe fn callable_destroy(&self, _: *mut RawCallable) {}

    fn register_extension_class(&self, info: Arc<ExtensionClassInfo>) -> Result<(), BindError> {
        if self.rejected.contains(&info.name) {
            return Err(BindError::RegistrationRejected(info.name.clone()));
        }
        self.registered.lock().unwrap().push(info.name.clone());
        Ok(())
    }

    fn unregister_extension_class(&self, name: &str) {
        self.registered.lock().unwrap().retain(|registered| registered != name);
    }

    unsafe fn object_instance(&self, _: ObjectPtr) -> Option<InstancePtr> {
        None
    }
}

pub fn class(name: &'static str, parent: Option<&'static str>, methods: Vec<MethodSpec>) -> ClassSpec {
    ClassSpec {
        name,
        parent,
        refcounted: false,
        methods,
        virtuals: &[],
    }
}

pub fn method(
    class: &'static str,
    name: &'static str,
    hash: i64,
    compat_hashes: &'static [i64],
    since: GodotVersion,
) -> MethodSpec {
    MethodSpec {
        name,
        key: NameHash::of_method(class, name),
        hash,
        compat_hashes,
        since,
        args: vec![],
        ret: AbiType::Nil,
        access: Access::Call,
    }
}

unsafe fn free_nothing(_: InstancePtr) {}

pub fn extension_info(name: &str, parent: &str) -> ExtensionClassInfo {
    ExtensionClassInfo {
        name: name.into(),
        parent: parent.into(),
        flags: Default::default(),
        create: Box::new(|_| None),
        free: free_nothing,
        get_virtual: |_| None,
    }
}
