//! An in-process engine.
//!
//! [`HeadlessEngine`] implements [`Interface`] without linking Godot. It
//! exports a method bind for every method of the class catalog, stores
//! property writes so the matching getter reads them back, counts
//! references, keeps a scene tree rooted at [`HeadlessEngine::root`], and
//! calls the virtual hooks of extension instances. Signal connections are
//! kept per object; the tree signals fire as nodes enter and leave, one-shot
//! particle emitters emit `finished` once their lifetime has elapsed, and
//! [`HeadlessEngine::emit_signal`] emits any other signal by hand. Other
//! engine-side simulation (lighting, physics, replication) is not modelled:
//! calls without a property or tree meaning are recorded and return zero.
//!
//! Besides the [`Interface`] itself, it exposes bookkeeping for tests:
//! live payloads, invalid releases, reference counts and call counts.
//!
//! ```ignore
//! let headless = Arc::new(HeadlessEngine::new());
//! let engine = headless.boot(BindingConfig::default())?;
//! let lifetime = engine.lifetime();
//! let node = Node3D::new(&lifetime)?;
//! headless.root(&lifetime).add_child(&node);
//! headless.tick(1.0 / 60.0);
//! ```

mod dispatch;
mod scene;
mod signals;
mod slots;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use gdbind_core::{
    BindError, BindingConfig, Callable, ClassFlags, ConstTypePtr, ExtensionClassInfo, GodotVersion, InstanceId, InstancePtr,
    Interface, Lifetime, MethodBindPtr, MethodSpec, NameHash, ObjectPtr, Ownership, PackedKind, RawArray,
    RawCallable, RawNodePath, RawPacked, RawString, RawStringName, RawVariant, TypePtr, Value, VirtualThunk,
};
use gdbind_registry::{ClassDb, Engine};

use crate::classes::{self, Node};
use crate::obj::Obj;

use self::signals::Connection;
use self::slots::{IndexKey, PayloadTable, Stored, payload_id, write_payload_id};

const BIND_BASE: usize = 0x1000;
const BIND_STRIDE: usize = 0x10;
const OBJECT_BASE: usize = 0x10_0000;
const OBJECT_STRIDE: usize = 0x40;

/// Engine classes the engine refuses to instantiate directly.
const ABSTRACT_CLASSES: &[&str] = &[
    "PacketPeer",
    "MultiplayerPeer",
    "MultiplayerAPI",
    "Mesh",
    "Material",
    "Occluder3D",
    "Light3D",
    "VisualInstance3D",
    "GeometryInstance3D",
];

/// One exported method bind.
#[derive(Clone, Copy)]
pub(crate) struct BindEntry {
    pub class: &'static str,
    pub spec: &'static MethodSpec,
}

/// A Rust instance attached to an object of an extension class.
struct Instance {
    ptr: InstancePtr,
    info: Arc<ExtensionClassInfo>,
}

// SAFETY: the instance pointer is only handed to the hooks and destructor of
// the class that created it; the headless engine never dereferences it.
unsafe impl Send for Instance {}

type PropKey = (&'static str, Option<IndexKey>);

struct HeadlessObject {
    class: String,
    id: u64,
    /// `Some` for reference-counted classes.
    refcount: Option<u32>,
    props: FxHashMap<PropKey, Stored>,
    parent: Option<usize>,
    children: Vec<usize>,
    instance: Option<Instance>,
    ready: bool,
    notifications: Vec<i64>,
    connections: Vec<Connection>,
    /// Seconds a one-shot emitter has been emitting.
    emit_elapsed: f64,
}

impl HeadlessObject {
    /// Objects this one holds a reference to through its properties.
    fn held_refs(&self) -> impl Iterator<Item = usize> + '_ {
        self.props.values().filter_map(Stored::as_object)
    }
}

struct State {
    objects: FxHashMap<usize, HeadlessObject>,
    ids: FxHashMap<u64, usize>,
    next_addr: usize,
    next_id: u64,
    next_rid: u64,
    classes: ClassDb,
    extensions: FxHashMap<String, Arc<ExtensionClassInfo>>,
    payloads: PayloadTable,
    root: usize,
    multiplayer: Option<usize>,
    queued: Vec<usize>,
    /// Handlers of deferred connections waiting for the end of the frame.
    deferred: Vec<(Callable, Vec<Value>)>,
    calls: FxHashMap<(usize, &'static str), usize>,
    destroyed: usize,
}

impl State {
    fn alloc_object(&mut self, class: &str) -> usize {
        self.next_addr += OBJECT_STRIDE;
        self.next_id += 1;
        let addr = self.next_addr;
        let refcount = self.classes.is_refcounted(class).then_some(0);
        self.objects.insert(
            addr,
            HeadlessObject {
                class: class.to_string(),
                id: self.next_id,
                refcount,
                props: FxHashMap::default(),
                parent: None,
                children: Vec::new(),
                instance: None,
                ready: false,
                notifications: Vec::new(),
                connections: Vec::new(),
                emit_elapsed: 0.0,
            },
        );
        self.ids.insert(self.next_id, addr);
        addr
    }

    fn object(&self, addr: usize) -> Option<&HeadlessObject> {
        self.objects.get(&addr)
    }

    fn object_mut(&mut self, addr: usize) -> Option<&mut HeadlessObject> {
        self.objects.get_mut(&addr)
    }

    fn inherits(&self, addr: usize, class: &str) -> bool {
        self.object(addr)
            .is_some_and(|object| self.classes.inherits(&object.class, class))
    }

    fn next_rid(&mut self) -> u64 {
        self.next_rid += 1;
        self.next_rid
    }

    fn record_call(&mut self, addr: usize, method: &'static str) {
        *self.calls.entry((addr, method)).or_default() += 1;
    }

    /// Give the caller of a ptrcall its own reference to a returned object.
    fn retain(&mut self, addr: usize) {
        if let Some(count) = self.object_mut(addr).and_then(|object| object.refcount.as_mut()) {
            *count += 1;
        }
    }
}

/// In-process implementation of the GDExtension interface.
pub struct HeadlessEngine {
    version: GodotVersion,
    legacy_hashes: bool,
    hidden: FxHashSet<NameHash>,
    rejected: FxHashSet<String>,
    binds: Vec<BindEntry>,
    bind_lookup: FxHashMap<NameHash, usize>,
    state: Mutex<State>,
}

impl HeadlessEngine {
    /// An engine reporting version 4.3.0 and exporting every catalog bind.
    pub fn new() -> Self {
        let catalog = classes::catalog();
        let mut binds = Vec::new();
        let mut bind_lookup = FxHashMap::default();
        for class in catalog.iter().copied() {
            for spec in class.methods.iter() {
                bind_lookup.insert(spec.key, binds.len());
                binds.push(BindEntry {
                    class: class.name,
                    spec,
                });
            }
        }

        let mut state = State {
            objects: FxHashMap::default(),
            ids: FxHashMap::default(),
            next_addr: OBJECT_BASE,
            next_id: 0,
            next_rid: 0,
            classes: ClassDb::from_catalog(&catalog),
            extensions: FxHashMap::default(),
            payloads: PayloadTable::default(),
            root: 0,
            multiplayer: None,
            queued: Vec::new(),
            deferred: Vec::new(),
            calls: FxHashMap::default(),
            destroyed: 0,
        };
        let root = state.alloc_object("Node");
        if let Some(object) = state.object_mut(root) {
            object.props.insert(("name", None), Stored::Text("root".into()));
            object.ready = true;
        }
        state.root = root;

        Self {
            version: GodotVersion::new(4, 3, 0),
            legacy_hashes: false,
            hidden: FxHashSet::default(),
            rejected: FxHashSet::default(),
            binds,
            bind_lookup,
            state: Mutex::new(state),
        }
    }

    /// Report `version` and stop exporting methods newer than it.
    pub fn with_version(mut self, version: GodotVersion) -> Self {
        self.version = version;
        self
    }

    /// Accept only the compatibility hashes of methods that have them, as
    /// an engine predating their current signature does.
    pub fn with_legacy_hashes(mut self) -> Self {
        self.legacy_hashes = true;
        self
    }

    /// Stop exporting one method bind.
    pub fn without_bind(mut self, class: &str, method: &str) -> Self {
        self.hidden.insert(NameHash::of_method(class, method));
        self
    }

    /// Refuse registration of the extension class `class`.
    pub fn rejecting(mut self, class: &str) -> Self {
        self.rejected.insert(class.to_string());
        self
    }

    /// Load an [`Engine`] on top of this interface with the full catalog.
    pub fn boot(self: &Arc<Self>, config: BindingConfig) -> Result<Arc<Engine>, BindError> {
        let iface: Arc<dyn Interface> = Arc::clone(self) as Arc<dyn Interface>;
        Engine::load(iface, &classes::catalog(), config)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bind_entry(&self, bind: MethodBindPtr) -> Option<BindEntry> {
        let offset = bind.addr().checked_sub(BIND_BASE)?;
        if offset % BIND_STRIDE != 0 {
            return None;
        }
        self.binds.get(offset / BIND_STRIDE).copied()
    }

    fn lookup(&self, class: &str, method: &str) -> Option<BindEntry> {
        let index = *self.bind_lookup.get(&NameHash::of_method(class, method))?;
        self.binds.get(index).copied()
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// The scene tree root, as a borrowed handle in `lifetime`.
    pub fn root<'lt>(&self, lifetime: &'lt Lifetime) -> Obj<'lt, Node> {
        let root = self.root_ptr();
        // SAFETY: the root node lives as long as the engine.
        unsafe { Obj::from_raw(lifetime, root, Ownership::Borrowed) }
    }

    pub fn root_ptr(&self) -> ObjectPtr {
        let addr = self.lock().root;
        match ObjectPtr::from_addr(addr) {
            Some(root) => root,
            None => unreachable!("root node has a non-null address"),
        }
    }

    /// Number of live objects, the tree root included.
    pub fn live_objects(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn is_alive(&self, object: ObjectPtr) -> bool {
        self.lock().objects.contains_key(&object.addr())
    }

    /// Objects destroyed so far.
    pub fn destroyed_objects(&self) -> usize {
        self.lock().destroyed
    }

    /// Reference count of a live ref-counted object.
    pub fn reference_count(&self, object: ObjectPtr) -> Option<u32> {
        self.lock().object(object.addr()).and_then(|object| object.refcount)
    }

    /// Engine strings, packed arrays, variants, arrays and callables not yet
    /// destroyed.
    pub fn live_payloads(&self) -> usize {
        self.lock().payloads.live()
    }

    /// Payloads created since the engine started.
    pub fn created_payloads(&self) -> usize {
        self.lock().payloads.created()
    }

    /// Destroy calls on payloads that were not live.
    pub fn invalid_releases(&self) -> usize {
        self.lock().payloads.invalid_releases()
    }

    /// How often `method` was dispatched on `object`. Calls forwarded to an
    /// extension hook are not counted.
    pub fn call_count(&self, object: ObjectPtr, method: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|((addr, name), _)| *addr == object.addr() && *name == method)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Notifications delivered to `object` through `Object::notification`.
    pub fn notifications(&self, object: ObjectPtr) -> Vec<i64> {
        self.lock()
            .object(object.addr())
            .map(|object| object.notifications.clone())
            .unwrap_or_default()
    }

    /// Objects waiting in the deletion queue.
    pub fn queued_for_deletion(&self) -> usize {
        self.lock().queued.len()
    }

    pub fn has_extension_class(&self, name: &str) -> bool {
        self.lock().extensions.contains_key(name)
    }

    /// Virtual hook `hook` of the extension instance attached to `addr`.
    fn hook(&self, addr: usize, hook: &str) -> Option<(VirtualThunk, InstancePtr)> {
        let info_and_ptr = {
            let state = self.lock();
            let instance = state.object(addr)?.instance.as_ref()?;
            (Arc::clone(&instance.info), instance.ptr)
        };
        let (info, ptr) = info_and_ptr;
        info.virtual_hook(hook).map(|thunk| (thunk, ptr))
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeadlessEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("HeadlessEngine")
            .field("version", &self.version)
            .field("binds", &self.binds.len())
            .field("objects", &state.objects.len())
            .field("payloads", &state.payloads.live())
            .finish_non_exhaustive()
    }
}

/// Engine hook that an engine method is routed to on extension instances.
fn forwarded_hook(method: &str) -> String {
    match method {
        "put_packet" => "_put_packet_script".to_string(),
        "get_packet" => "_get_packet_script".to_string(),
        other => format!("_{other}"),
    }
}

impl Interface for HeadlessEngine {
    fn godot_version(&self) -> GodotVersion {
        self.version
    }

    fn method_bind(&self, class: &str, method: &str, hash: i64) -> Option<MethodBindPtr> {
        let key = NameHash::of_method(class, method);
        if self.hidden.contains(&key) {
            return None;
        }
        let index = *self.bind_lookup.get(&key)?;
        let spec = self.binds[index].spec;
        if self.version < spec.since {
            return None;
        }
        let accepted = if self.legacy_hashes && !spec.compat_hashes.is_empty() {
            spec.compat_hashes.contains(&hash)
        } else {
            spec.hash == hash
        };
        if !accepted {
            return None;
        }
        MethodBindPtr::from_addr(BIND_BASE + index * BIND_STRIDE)
    }

    fn construct_object(&self, class: &str) -> Option<ObjectPtr> {
        let (addr, info) = {
            let mut state = self.lock();
            if !state.classes.contains(class) || ABSTRACT_CLASSES.contains(&class) {
                return None;
            }
            let info = state.extensions.get(class).cloned();
            if info
                .as_ref()
                .is_some_and(|info| info.flags.contains(ClassFlags::ABSTRACT))
            {
                return None;
            }
            (state.alloc_object(class), info)
        };
        let object = ObjectPtr::from_addr(addr)?;

        if let Some(info) = info {
            let Some(ptr) = info.create_instance(object) else {
                warn!(class, "extension class produced no instance");
                self.scene_destroy(addr);
                return None;
            };
            if let Some(object) = self.lock().object_mut(addr) {
                object.instance = Some(Instance { ptr, info });
            }
        }
        debug!(class, ?object, "constructed");
        Some(object)
    }

    unsafe fn destroy_object(&self, object: ObjectPtr) {
        self.scene_destroy(object.addr());
    }

    unsafe fn instance_id(&self, object: ObjectPtr) -> InstanceId {
        self.lock()
            .object(object.addr())
            .map_or(InstanceId::NONE, |object| InstanceId(object.id))
    }

    fn object_from_instance_id(&self, id: InstanceId) -> Option<ObjectPtr> {
        let addr = *self.lock().ids.get(&id.0)?;
        ObjectPtr::from_addr(addr)
    }

    unsafe fn cast_to(&self, object: ObjectPtr, class: &str) -> Option<ObjectPtr> {
        self.lock().inherits(object.addr(), class).then_some(object)
    }

    unsafe fn class_name(&self, object: ObjectPtr) -> Option<String> {
        self.lock().object(object.addr()).map(|object| object.class.clone())
    }

    unsafe fn ptrcall(&self, bind: MethodBindPtr, object: ObjectPtr, args: *const ConstTypePtr, ret: TypePtr) {
        let Some(entry) = self.bind_entry(bind) else {
            warn!(?bind, "ptrcall through an unknown method bind");
            return;
        };
        let spec = entry.spec;
        let addr = object.addr();

        if let Some((thunk, instance)) = self.hook(addr, &forwarded_hook(spec.name)) {
            // SAFETY: engine method and hook share their signature.
            unsafe { thunk(self, instance, args, ret) };
            return;
        }

        let decoded: Vec<Stored> = {
            let state = self.lock();
            spec.args
                .iter()
                .enumerate()
                // SAFETY: the caller pushed one slot per parameter.
                .map(|(index, ty)| unsafe { slots::decode(*args.add(index), *ty, &state.payloads) })
                .collect()
        };
        let result = self.dispatch(addr, entry, decoded);

        let mut state = self.lock();
        if spec.ret.is_object()
            && let Some(returned) = result.as_object()
        {
            state.retain(returned);
        }
        // SAFETY: the caller provided a return slot for `spec.ret`.
        unsafe { slots::encode(&result, spec.ret, ret, &mut state.payloads) };
    }

    unsafe fn string_new(&self, out: *mut RawString, value: &str) {
        let id = self.lock().payloads.text(value);
        unsafe { write_payload_id(out.cast(), id, 1) };
    }

    unsafe fn string_to_utf8(&self, value: *const RawString) -> String {
        self.lock().payloads.get_text(unsafe { payload_id(value.cast()) })
    }

    unsafe fn string_destroy(&self, value: *mut RawString) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn string_name_new(&self, out: *mut RawStringName, value: &str) {
        let id = self.lock().payloads.text(value);
        unsafe { write_payload_id(out.cast(), id, 1) };
    }

    unsafe fn string_name_to_utf8(&self, value: *const RawStringName) -> String {
        self.lock().payloads.get_text(unsafe { payload_id(value.cast()) })
    }

    unsafe fn string_name_destroy(&self, value: *mut RawStringName) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn node_path_new(&self, out: *mut RawNodePath, value: &str) {
        let id = self.lock().payloads.text(value);
        unsafe { write_payload_id(out.cast(), id, 1) };
    }

    unsafe fn node_path_to_utf8(&self, value: *const RawNodePath) -> String {
        self.lock().payloads.get_text(unsafe { payload_id(value.cast()) })
    }

    unsafe fn node_path_destroy(&self, value: *mut RawNodePath) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn packed_array_new(&self, kind: PackedKind, out: *mut RawPacked, bytes: &[u8]) {
        debug_assert_eq!(bytes.len() % kind.element_size(), 0);
        let id = self.lock().payloads.bytes(bytes);
        unsafe { write_payload_id(out.cast(), id, 2) };
    }

    unsafe fn packed_array_bytes(&self, _: PackedKind, value: *const RawPacked) -> Vec<u8> {
        self.lock().payloads.get_bytes(unsafe { payload_id(value.cast()) })
    }

    unsafe fn packed_array_destroy(&self, _: PackedKind, value: *mut RawPacked) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn variant_new(&self, out: *mut RawVariant, value: &Value) {
        let id = self.lock().payloads.variant(value);
        unsafe { write_payload_id(out.cast(), id, 3) };
    }

    unsafe fn variant_to_value(&self, value: *const RawVariant) -> Value {
        self.lock().payloads.get_variant(unsafe { payload_id(value.cast()) })
    }

    unsafe fn variant_destroy(&self, value: *mut RawVariant) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn array_new(&self, out: *mut RawArray, items: &[Value]) {
        let id = self.lock().payloads.array(items);
        unsafe { write_payload_id(out.cast(), id, 1) };
    }

    unsafe fn array_to_values(&self, value: *const RawArray) -> Vec<Value> {
        self.lock().payloads.get_array(unsafe { payload_id(value.cast()) })
    }

    unsafe fn array_destroy(&self, value: *mut RawArray) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    unsafe fn callable_new(&self, out: *mut RawCallable, callable: &Callable) {
        let id = self.lock().payloads.callable(callable);
        unsafe { write_payload_id(out.cast(), id, 2) };
    }

    unsafe fn callable_destroy(&self, value: *mut RawCallable) {
        self.lock().payloads.release(unsafe { payload_id(value.cast()) });
    }

    fn register_extension_class(&self, info: Arc<ExtensionClassInfo>) -> Result<(), BindError> {
        if self.rejected.contains(&info.name) {
            return Err(BindError::RegistrationRejected(info.name.clone()));
        }
        let mut state = self.lock();
        state.classes.register_extension(Arc::clone(&info))?;
        state.extensions.insert(info.name.clone(), info);
        Ok(())
    }

    fn unregister_extension_class(&self, name: &str) {
        let mut state = self.lock();
        state.classes.unregister_extension(name);
        state.extensions.remove(name);
    }

    unsafe fn object_instance(&self, object: ObjectPtr) -> Option<InstancePtr> {
        self.lock()
            .object(object.addr())
            .and_then(|object| object.instance.as_ref())
            .map(|instance| instance.ptr)
    }
}

#[cfg(test)]
mod tests;
