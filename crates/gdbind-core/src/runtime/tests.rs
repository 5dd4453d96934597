//! Frame and lifetime tests against a minimal in-memory interface.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use super::*;
use crate::abi::{PackedKind, RawArray, RawCallable, RawNodePath, RawPacked, RawString, RawStringName, RawVariant};
use crate::sys::{ConstTypePtr, InstanceId, InstancePtr, ObjectPtr, TypePtr};
use crate::{Callable, ExtensionClassInfo, GodotVersion, Value};

const INIT_REF: usize = 0x1;
const REFERENCE: usize = 0x2;
const UNREFERENCE: usize = 0x3;
const ECHO: usize = 0x4;

enum Payload {
    Text(String),
    Bytes(Vec<u8>),
    Value(Value),
    Values(Vec<Value>),
    Callable(Callable),
}

#[derive(Default)]
struct MockState {
    next_object: usize,
    next_payload: u64,
    objects: HashMap<usize, (InstanceId, u32)>,
    payloads: HashMap<u64, Payload>,
    destroyed: Vec<usize>,
    invalid_releases: usize,
}

#[derive(Default)]
struct MockInterface {
    state: Mutex<MockState>,
}

impl MockInterface {
    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn live_payloads(&self) -> usize {
        self.state().payloads.len()
    }

    fn refcount(&self, object: ObjectPtr) -> Option<u32> {
        self.state().objects.get(&object.addr()).map(|(_, rc)| *rc)
    }

    fn store(&self, payload: Payload) -> u64 {
        let mut state = self.state();
        state.next_payload += 1;
        let id = state.next_payload;
        state.payloads.insert(id, payload);
        id
    }

    fn remove(&self, id: u64) {
        let mut state = self.state();
        if state.payloads.remove(&id).is_none() {
            state.invalid_releases += 1;
        }
    }

    fn text(&self, id: u64) -> String {
        match self.state().payloads.get(&id) {
            Some(Payload::Text(s)) => s.clone(),
            _ => String::new(),
        }
    }
}

impl Interface for MockInterface {
    fn godot_version(&self) -> GodotVersion {
        GodotVersion::new(4, 3, 0)
    }

    fn method_bind(&self, _: &str, _: &str, _: i64) -> Option<MethodBindPtr> {
        None
    }

    fn construct_object(&self, _: &str) -> Option<ObjectPtr> {
        let mut state = self.state();
        state.next_object += 1;
        let addr = 0x1000 + state.next_object * 0x10;
        let id = InstanceId(state.next_object as u64);
        state.objects.insert(addr, (id, 0));
        ObjectPtr::from_addr(addr)
    }

    unsafe fn destroy_object(&self, object: ObjectPtr) {
        let mut state = self.state();
        state.objects.remove(&object.addr());
        state.destroyed.push(object.addr());
    }

    unsafe fn instance_id(&self, object: ObjectPtr) -> InstanceId {
        self.state()
            .objects
            .get(&object.addr())
            .map_or(InstanceId::NONE, |(id, _)| *id)
    }

    fn object_from_instance_id(&self, id: InstanceId) -> Option<ObjectPtr> {
        self.state()
            .objects
            .iter()
            .find(|(_, (oid, _))| *oid == id)
            .and_then(|(addr, _)| ObjectPtr::from_addr(*addr))
    }

    unsafe fn cast_to(&self, object: ObjectPtr, _: &str) -> Option<ObjectPtr> {
        Some(object)
    }

    unsafe fn class_name(&self, _: ObjectPtr) -> Option<String> {
        Some("Object".into())
    }

    unsafe fn ptrcall(&self, bind: MethodBindPtr, object: ObjectPtr, args: *const ConstTypePtr, ret: TypePtr) {
        match bind.addr() {
            ECHO => unsafe {
                let arg = (*args).cast::<RawString>();
                let text = self.text((*arg).opaque[0]);
                self.string_new(ret.cast(), &text);
            },
            addr => {
                let mut state = self.state();
                let Some((_, rc)) = state.objects.get_mut(&object.addr()) else {
                    return;
                };
                let result = match addr {
                    INIT_REF => {
                        *rc = 1;
                        true
                    }
                    REFERENCE => {
                        *rc += 1;
                        true
                    }
                    UNREFERENCE => {
                        *rc = rc.saturating_sub(1);
                        *rc == 0
                    }
                    _ => false,
                };
                unsafe { ret.cast::<u8>().write(u8::from(result)) };
            }
        }
    }

    unsafe fn string_new(&self, out: *mut RawString, value: &str) {
        let id = self.store(Payload::Text(value.into()));
        unsafe { (*out).opaque = [id] };
    }

    unsafe fn string_to_utf8(&self, value: *const RawString) -> String {
        self.text(unsafe { (*value).opaque[0] })
    }

    unsafe fn string_destroy(&self, value: *mut RawString) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn string_name_new(&self, out: *mut RawStringName, value: &str) {
        let id = self.store(Payload::Text(value.into()));
        unsafe { (*out).opaque = [id] };
    }

    unsafe fn string_name_to_utf8(&self, value: *const RawStringName) -> String {
        self.text(unsafe { (*value).opaque[0] })
    }

    unsafe fn string_name_destroy(&self, value: *mut RawStringName) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn node_path_new(&self, out: *mut RawNodePath, value: &str) {
        let id = self.store(Payload::Text(value.into()));
        unsafe { (*out).opaque = [id] };
    }

    unsafe fn node_path_to_utf8(&self, value: *const RawNodePath) -> String {
        self.text(unsafe { (*value).opaque[0] })
    }

    unsafe fn node_path_destroy(&self, value: *mut RawNodePath) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn packed_array_new(&self, _: PackedKind, out: *mut RawPacked, bytes: &[u8]) {
        let id = self.store(Payload::Bytes(bytes.to_vec()));
        unsafe { (*out).opaque = [id, bytes.len() as u64] };
    }

    unsafe fn packed_array_bytes(&self, _: PackedKind, value: *const RawPacked) -> Vec<u8> {
        match self.state().payloads.get(&unsafe { (*value).opaque[0] }) {
            Some(Payload::Bytes(b)) => b.clone(),
            _ => Vec::new(),
        }
    }

    unsafe fn packed_array_destroy(&self, _: PackedKind, value: *mut RawPacked) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn variant_new(&self, out: *mut RawVariant, value: &Value) {
        let id = self.store(Payload::Value(value.clone()));
        unsafe { (*out).opaque = [id, 0, 0] };
    }

    unsafe fn variant_to_value(&self, value: *const RawVariant) -> Value {
        match self.state().payloads.get(&unsafe { (*value).opaque[0] }) {
            Some(Payload::Value(v)) => v.clone(),
            _ => Value::Nil,
        }
    }

    unsafe fn variant_destroy(&self, value: *mut RawVariant) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn array_new(&self, out: *mut RawArray, items: &[Value]) {
        let id = self.store(Payload::Values(items.to_vec()));
        unsafe { (*out).opaque = [id] };
    }

    unsafe fn array_to_values(&self, value: *const RawArray) -> Vec<Value> {
        match self.state().payloads.get(&unsafe { (*value).opaque[0] }) {
            Some(Payload::Values(v)) => v.clone(),
            _ => Vec::new(),
        }
    }

    unsafe fn array_destroy(&self, value: *mut RawArray) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    unsafe fn callable_new(&self, out: *mut RawCallable, callable: &Callable) {
        let id = self.store(Payload::Callable(callable.clone()));
        unsafe { (*out).opaque = [id, 0] };
    }

    unsafe fn callable_destroy(&self, value: *mut RawCallable) {
        self.remove(unsafe { (*value).opaque[0] });
    }

    fn register_extension_class(&self, _: Arc<ExtensionClassInfo>) -> Result<(), BindError> {
        Ok(())
    }

    fn unregister_extension_class(&self, _: &str) {}

    unsafe fn object_instance(&self, _: ObjectPtr) -> Option<InstancePtr> {
        None
    }
}

struct MockRuntime {
    iface: MockInterface,
    config: BindingConfig,
}

impl MockRuntime {
    fn new(config: BindingConfig) -> Arc<Self> {
        Arc::new(Self {
            iface: MockInterface::default(),
            config,
        })
    }
}

fn bind(addr: usize) -> MethodBindPtr {
    MethodBindPtr::from_addr(addr).unwrap()
}

impl Runtime for MockRuntime {
    fn interface(&self) -> &dyn Interface {
        &self.iface
    }

    fn config(&self) -> &BindingConfig {
        &self.config
    }

    fn method_bind(&self, key: NameHash, class: &'static str, method: &'static str) -> Result<MethodBindPtr, BindError> {
        if key == NameHash::of_method("Test", "echo") {
            Ok(bind(ECHO))
        } else {
            Err(BindError::MissingMethodBind { class, method, hash: 0 })
        }
    }

    fn ref_counting(&self) -> Option<RefCountBinds> {
        Some(RefCountBinds {
            init_ref: bind(INIT_REF),
            reference: bind(REFERENCE),
            unreference: bind(UNREFERENCE),
        })
    }
}

fn new_refcounted(runtime: &MockRuntime) -> ObjectPtr {
    let object = runtime.iface.construct_object("RefCounted").unwrap();
    let _: u8 = unsafe { CallFrame::new(&runtime.iface).call_raw(bind(INIT_REF), object) };
    object
}

// ============================================================================
// CallFrame
// ============================================================================

#[test]
fn frame_counts_arguments_and_temporaries() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let mut frame = CallFrame::new(&runtime.iface);
    frame.push_value(42i64);
    frame.push_value(1u8);
    frame.push_string("hello");
    frame.push_packed(PackedKind::Int32, bytemuck::cast_slice(&[1i32, 2, 3]));
    frame.push_object(None);

    assert_eq!(frame.arg_count(), 5);
    assert_eq!(frame.temporary_count(), 2);
    assert_eq!(runtime.iface.live_payloads(), 2);
}

#[test]
fn frame_releases_temporaries_once_on_drop() {
    let runtime = MockRuntime::new(BindingConfig::default());
    {
        let mut frame = CallFrame::new(&runtime.iface);
        frame.push_string("a");
        frame.push_string_name("b");
        frame.push_node_path("c/d");
        frame.push_variant(&Value::Int(3));
        frame.push_array(&[Value::Bool(true)]);
        frame.push_callable(&Callable::from_fn(InstanceId::NONE, |_| {}));
        assert_eq!(runtime.iface.live_payloads(), 6);
    }
    assert_eq!(runtime.iface.live_payloads(), 0);
    assert_eq!(runtime.iface.state().invalid_releases, 0);
}

#[test]
fn frame_releases_temporaries_on_unwind() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut frame = CallFrame::new(&runtime.iface);
        frame.push_string("leaked?");
        panic!("engine call failed");
    }));
    assert!(result.is_err());
    assert_eq!(runtime.iface.live_payloads(), 0);
}

#[test]
fn frame_call_returns_slot_after_release() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = runtime.iface.construct_object("Test").unwrap();
    let mut frame = CallFrame::new(&runtime.iface);
    frame.push_string("ping");

    let mut ret: RawString = unsafe { frame.call_raw(bind(ECHO), object) };

    // Only the returned string is still alive.
    assert_eq!(runtime.iface.live_payloads(), 1);
    let text = unsafe { runtime.iface.string_to_utf8(&ret) };
    unsafe { runtime.iface.string_destroy(&mut ret) };
    assert_eq!(text, "ping");
    assert_eq!(runtime.iface.live_payloads(), 0);
}

// ============================================================================
// Lifetime
// ============================================================================

#[test]
fn owned_reference_released_when_lifetime_ends() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = new_refcounted(&runtime);
    let lifetime = Lifetime::new(runtime.clone());
    unsafe { lifetime.track_object(object, "RefCounted", Ownership::Owned) };
    assert_eq!(lifetime.owned_handles(), 1);

    lifetime.end();

    assert_eq!(runtime.iface.refcount(object), None);
    assert_eq!(runtime.iface.state().destroyed, [object.addr()]);
}

#[test]
fn shared_reference_survives_lifetime_end() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = new_refcounted(&runtime);
    let _: u8 = unsafe { CallFrame::new(&runtime.iface).call_raw(bind(REFERENCE), object) };

    let lifetime = Lifetime::new(runtime.clone());
    unsafe { lifetime.track_object(object, "RefCounted", Ownership::Owned) };
    drop(lifetime);

    assert_eq!(runtime.iface.refcount(object), Some(1));
    assert!(runtime.iface.state().destroyed.is_empty());
}

#[test]
fn borrowed_and_manual_handles_are_not_released() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let borrowed = runtime.iface.construct_object("Node").unwrap();
    let manual = runtime.iface.construct_object("Node").unwrap();
    let lifetime = Lifetime::new(runtime.clone());
    unsafe {
        lifetime.track_object(borrowed, "Node", Ownership::Borrowed);
        lifetime.track_object(manual, "Node", Ownership::Manual);
    }
    assert_eq!(lifetime.live_handles(), 2);
    lifetime.end();

    assert!(runtime.iface.state().destroyed.is_empty());
}

#[test]
fn early_release_invalidates_key() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = new_refcounted(&runtime);
    let lifetime = Lifetime::new(runtime.clone());
    let key = unsafe { lifetime.track_object(object, "RefCounted", Ownership::Owned) };

    assert!(lifetime.release(key));
    assert!(!lifetime.release(key));
    assert_eq!(
        lifetime.check(key, "RefCounted"),
        Err(BindError::StaleHandle { class: "RefCounted" })
    );
    assert_eq!(runtime.iface.state().destroyed.len(), 1);
}

#[test]
fn borrowed_handle_detects_freed_object() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = runtime.iface.construct_object("Node").unwrap();
    let lifetime = Lifetime::new(runtime.clone());
    let key = unsafe { lifetime.track_object(object, "Node", Ownership::Borrowed) };
    assert_eq!(lifetime.check(key, "Node"), Ok(object));

    unsafe { runtime.iface.destroy_object(object) };

    assert!(matches!(
        lifetime.check(key, "Node"),
        Err(BindError::FreedObject { class: "Node", .. })
    ));
}

#[test]
fn bound_and_manual_handles_detect_freed_objects() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let parent = runtime.iface.construct_object("Node").unwrap();
    let child = runtime.iface.construct_object("Node").unwrap();
    let manual = runtime.iface.construct_object("Node").unwrap();
    let lifetime = Lifetime::new(runtime.clone());
    let bound = unsafe { lifetime.track_object(child, "Node", Ownership::BoundTo(parent)) };
    let made = unsafe { lifetime.track_object(manual, "Node", Ownership::Manual) };

    unsafe {
        runtime.iface.destroy_object(child);
        runtime.iface.destroy_object(manual);
    }

    assert!(matches!(lifetime.check(bound, "Node"), Err(BindError::FreedObject { .. })));
    assert!(matches!(lifetime.check(made, "Node"), Err(BindError::FreedObject { .. })));
}

#[test]
fn repeated_borrows_share_one_slot() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let object = runtime.iface.construct_object("Node").unwrap();
    let lifetime = Lifetime::new(runtime.clone());
    let first = unsafe { lifetime.track_object(object, "Node", Ownership::Borrowed) };
    for _ in 0..100 {
        let again = unsafe { lifetime.track_object(object, "Node", Ownership::Borrowed) };
        assert_eq!(again, first);
    }
    assert_eq!(lifetime.live_handles(), 1);
}

#[test]
fn instance_id_checks_can_be_disabled() {
    let runtime = MockRuntime::new(BindingConfig::default().with_instance_id_checks(false));
    let object = runtime.iface.construct_object("Node").unwrap();
    let lifetime = Lifetime::new(runtime.clone());
    let key = unsafe { lifetime.track_object(object, "Node", Ownership::Borrowed) };
    unsafe { runtime.iface.destroy_object(object) };

    assert_eq!(lifetime.check(key, "Node"), Ok(object));
}

#[test]
fn method_bind_resolves_through_runtime() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let lifetime = Lifetime::new(runtime);
    let bind = lifetime.method_bind(NameHash::of_method("Test", "echo"), "Test", "echo");
    assert_eq!(bind.addr(), ECHO);
}

#[test]
#[should_panic(expected = "no method bind for Test::missing")]
fn unresolved_method_bind_panics() {
    let runtime = MockRuntime::new(BindingConfig::default());
    let lifetime = Lifetime::new(runtime);
    lifetime.method_bind(NameHash::of_method("Test", "missing"), "Test", "missing");
}
