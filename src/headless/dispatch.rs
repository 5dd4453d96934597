//! What the headless engine does for each method bind.
//!
//! A handful of methods have behavior of their own (reference counting,
//! the scene tree, metadata, signals, multiplayer plumbing). Every other `Get`/`Set`
//! method reads or writes a stored property, and every other call is only
//! counted.

use gdbind_core::{Aabb, Access, Color, ErrorCode, Rid, Transform3D, Vector3};
use tracing::{debug, trace};

use super::slots::{SlotBuffer, Stored, decode, release};
use super::{BindEntry, HeadlessEngine, forwarded_hook};

fn error(code: ErrorCode) -> Stored {
    Stored::int(i64::from(code))
}

fn arg(args: &[Stored], index: usize) -> Stored {
    args.get(index).cloned().unwrap_or_default()
}

/// Value of a property nothing has written yet.
fn default_property(class: &str, prop: &str) -> Stored {
    match prop {
        "name" => Stored::Text(class.to_string()),
        "visible" | "emitting" | "interpolate" => Stored::bool(true),
        "scale" => Stored::pod(Vector3::ONE),
        "transform" | "global_transform" => Stored::pod(Transform3D::IDENTITY),
        "amount" => Stored::int(8),
        "lifetime" | "speed_scale" | "total_mass" => Stored::float(1.0),
        "layers" | "collision_layer" | "collision_mask" | "draw_passes" => Stored::int(1),
        "light_cull_mask" | "bake_mask" => Stored::int(0xFFFF_FFFF),
        "light_color" | "color" => Stored::pod(Color::WHITE),
        "simulation_precision" => Stored::int(5),
        "auth_timeout" => Stored::float(3.0),
        "max_sync_packet_size" => Stored::int(1350),
        "max_delta_packet_size" => Stored::int(65535),
        "transfer_mode" => Stored::int(2),
        "encode_buffer_max_size" => Stored::int(8 * 1024 * 1024),
        "fixed_fps" if class == "GPUParticles3D" => Stored::int(30),
        _ => Stored::Nil,
    }
}

impl HeadlessEngine {
    pub(super) fn dispatch(&self, addr: usize, entry: BindEntry, args: Vec<Stored>) -> Stored {
        let spec = entry.spec;
        self.lock().record_call(addr, spec.name);
        trace!(object = addr, class = entry.class, method = spec.name, "ptrcall");

        if let Some(result) = self.builtin(addr, entry, &args) {
            return result;
        }
        match spec.access {
            Access::Set(prop) => self.set_property(addr, prop, args),
            Access::Get(prop) => self.get_property(addr, prop, &args),
            Access::Call => self.call_bitflag(addr, entry, &args).unwrap_or_else(|| {
                debug!(class = entry.class, method = spec.name, "no headless behavior, returning zero");
                Stored::Nil
            }),
        }
    }

    /// Call an engine method from inside the engine.
    ///
    /// Goes through the extension hook when `addr` overrides it. Returned
    /// objects carry no extra reference.
    pub(super) fn invoke(&self, addr: usize, class: &str, method: &str, args: &[Stored]) -> Stored {
        let Some(entry) = self.lookup(class, method) else {
            debug!(class, method, "no such method bind");
            return Stored::Nil;
        };
        let spec = entry.spec;
        let Some((thunk, instance)) = self.hook(addr, &forwarded_hook(method)) else {
            return self.dispatch(addr, entry, args.to_vec());
        };

        let buffer = SlotBuffer::new(args, &spec.args, &mut self.lock().payloads);
        let pointers = buffer.pointers();
        let mut ret = [0u64; 6];
        // SAFETY: the hook shares the method's signature.
        unsafe { thunk(self, instance, pointers.as_ptr(), ret.as_mut_ptr().cast()) };

        let mut state = self.lock();
        buffer.release(&mut state.payloads);
        // SAFETY: the hook wrote a slot of the method's return type.
        unsafe {
            let result = decode(ret.as_ptr().cast(), spec.ret, &state.payloads);
            release(ret.as_ptr().cast(), spec.ret, &mut state.payloads);
            result
        }
    }

    fn builtin(&self, addr: usize, entry: BindEntry, args: &[Stored]) -> Option<Stored> {
        let result = match (entry.class, entry.spec.name) {
            ("RefCounted", method) => self.ref_counting(addr, method)?,

            ("Object", "get_class") => Stored::Text(self.lock().object(addr)?.class.clone()),
            ("Object", "is_class") => Stored::bool(self.lock().inherits(addr, arg(args, 0).as_text())),
            ("Object", "get_instance_id") => Stored::int(self.lock().object(addr)?.id as i64),
            ("Object", "get_meta") => {
                let key = ("metadata", Some(arg(args, 0).index_key()));
                let stored = self.lock().object(addr)?.props.get(&key).cloned();
                stored.unwrap_or_else(|| arg(args, 1))
            }
            ("Object", "has_meta") => {
                let key = ("metadata", Some(arg(args, 0).index_key()));
                Stored::bool(self.lock().object(addr)?.props.contains_key(&key))
            }
            ("Object", "remove_meta") => {
                let key = ("metadata", Some(arg(args, 0).index_key()));
                self.lock().object_mut(addr)?.props.remove(&key);
                Stored::Nil
            }
            ("Object", "connect") => {
                let (signal, callable) = (arg(args, 0), arg(args, 1));
                error(self.connect(addr, signal.as_text(), callable.as_callable(), arg(args, 2).as_int()))
            }
            ("Object", "disconnect") => {
                self.disconnect(addr, arg(args, 0).as_text(), arg(args, 1).as_callable());
                Stored::Nil
            }
            ("Object", "is_connected") => {
                Stored::bool(self.is_connected(addr, arg(args, 0).as_text(), arg(args, 1).as_callable()))
            }
            ("Object", "notification") => {
                self.lock().object_mut(addr)?.notifications.push(arg(args, 0).as_int());
                Stored::Nil
            }

            ("Node", method) => self.node(addr, method, args)?,

            ("Node3D", "show") => self.set_property(addr, "visible", vec![Stored::bool(true)]),
            ("Node3D", "hide") => self.set_property(addr, "visible", vec![Stored::bool(false)]),
            ("Node3D", "translate") => {
                let position = self.get_property(addr, "position", &[]).as_vector3();
                let moved = position + arg(args, 0).as_vector3();
                self.set_property(addr, "position", vec![Stored::pod(moved)])
            }
            ("Node3D", "rotate_y") => {
                let mut rotation = self.get_property(addr, "rotation", &[]).as_vector3();
                rotation.y += arg(args, 0).as_float() as f32;
                self.set_property(addr, "rotation", vec![Stored::pod(rotation)])
            }
            ("Node3D", "get_parent_node_3d") => {
                let state = self.lock();
                let parent = state.object(addr)?.parent;
                Stored::Object(parent.filter(|parent| state.inherits(*parent, "Node3D")))
            }

            ("Resource", "get_rid") | ("VisualInstance3D", "get_instance") | ("SoftBody3D", "get_physics_rid") => {
                self.lazy_rid(addr)?
            }

            ("ArrayOccluder3D", "set_arrays") => {
                self.set_property(addr, "vertices", vec![arg(args, 0)]);
                self.set_property(addr, "indices", vec![arg(args, 1)])
            }

            ("MeshInstance3D", "get_surface_override_material_count") => {
                match self.get_property(addr, "mesh", &[]).as_object() {
                    Some(mesh) => self.invoke(mesh, "Mesh", "get_surface_count", &[]),
                    None => Stored::int(0),
                }
            }
            ("MeshInstance3D", "get_active_material") => {
                let surface = arg(args, 0);
                let overridden = self.get_property(addr, "surface_material_override", std::slice::from_ref(&surface));
                if overridden.as_object().is_some() {
                    overridden
                } else {
                    match self.get_property(addr, "mesh", &[]).as_object() {
                        Some(mesh) => self.get_property(mesh, "surface_material", &[surface]),
                        None => Stored::Object(None),
                    }
                }
            }

            ("CPUParticles3D" | "GPUParticles3D", "set_emitting") => {
                self.reset_emitter(addr);
                self.set_property(addr, "emitting", args.to_vec())
            }
            ("CPUParticles3D" | "GPUParticles3D", "restart") => {
                self.reset_emitter(addr);
                self.set_property(addr, "emitting", vec![Stored::bool(true)])
            }

            ("GPUParticles3D", "capture_aabb") => match self.get_property(addr, "visibility_aabb", &[]) {
                Stored::Nil => Stored::pod(Aabb::default()),
                aabb => aabb,
            },

            ("MultiplayerPeer", "generate_unique_id") => {
                let mut state = self.lock();
                Stored::int(1 + state.next_rid() as i64)
            }

            ("MultiplayerAPI", method) => self.multiplayer_api(addr, method, args)?,
            ("SceneMultiplayer", method) => self.scene_multiplayer(addr, method, args)?,

            _ => return None,
        };
        Some(result)
    }

    fn ref_counting(&self, addr: usize, method: &str) -> Option<Stored> {
        let mut state = self.lock();
        let count = state.object_mut(addr)?.refcount.as_mut()?;
        let result = match method {
            "init_ref" => {
                *count = 1;
                Stored::bool(true)
            }
            "reference" => {
                *count += 1;
                Stored::bool(true)
            }
            "unreference" => {
                *count = count.saturating_sub(1);
                Stored::bool(*count == 0)
            }
            "get_reference_count" => Stored::int(i64::from(*count)),
            _ => return None,
        };
        Some(result)
    }

    fn node(&self, addr: usize, method: &str, args: &[Stored]) -> Option<Stored> {
        let result = match method {
            "add_child" => {
                if let Some(child) = arg(args, 0).as_object() {
                    self.scene_add_child(addr, child);
                }
                Stored::Nil
            }
            "remove_child" => {
                if let Some(child) = arg(args, 0).as_object() {
                    self.scene_remove_child(addr, child);
                }
                Stored::Nil
            }
            "get_child_count" => Stored::int(self.lock().object(addr)?.children.len() as i64),
            "get_child" => {
                let state = self.lock();
                let children = &state.object(addr)?.children;
                let index = arg(args, 0).as_int();
                let index = if index < 0 { children.len() as i64 + index } else { index };
                Stored::Object(usize::try_from(index).ok().and_then(|index| children.get(index).copied()))
            }
            "get_parent" => Stored::Object(self.lock().object(addr)?.parent),
            "get_path" => Stored::Text(self.node_path(addr)),
            "is_inside_tree" => Stored::bool(self.lock().in_tree(addr)),
            "queue_free" => {
                let mut state = self.lock();
                if !state.queued.contains(&addr) {
                    state.queued.push(addr);
                }
                Stored::Nil
            }
            "get_multiplayer" => Stored::Object(self.multiplayer(addr)),
            "set_multiplayer_authority" => {
                let id = arg(args, 0).as_int();
                let nodes = if arg(args, 1).as_bool() {
                    self.lock().pre_order(addr)
                } else {
                    vec![addr]
                };
                let mut state = self.lock();
                for node in nodes {
                    if let Some(object) = state.object_mut(node) {
                        object.props.insert(("multiplayer_authority", None), Stored::int(id));
                    }
                }
                Stored::Nil
            }
            "get_multiplayer_authority" => Stored::int(self.authority(addr)),
            "is_multiplayer_authority" => {
                let unique_id = match self.multiplayer(addr) {
                    Some(api) => self.invoke(api, "MultiplayerAPI", "get_unique_id", &[]).as_int(),
                    None => 1,
                };
                Stored::bool(self.authority(addr) == unique_id)
            }
            "is_processing" | "is_physics_processing" => {
                let flag = if method == "is_processing" { "processing" } else { "physics_processing" };
                let stored = self.lock().object(addr)?.props.get(&(flag, None)).cloned();
                match stored {
                    Some(enabled) => enabled,
                    None => {
                        let hook = if method == "is_processing" { "_process" } else { "_physics_process" };
                        Stored::bool(self.hook(addr, hook).is_some())
                    }
                }
            }
            _ => return None,
        };
        Some(result)
    }

    fn node_path(&self, addr: usize) -> String {
        let state = self.lock();
        if !state.in_tree(addr) {
            return String::new();
        }
        let mut names = Vec::new();
        let mut current = Some(addr);
        while let Some(node) = current {
            let Some(object) = state.object(node) else {
                break;
            };
            let name = match object.props.get(&("name", None)) {
                Some(name) => name.as_text().to_string(),
                None => object.class.clone(),
            };
            names.push(name);
            current = object.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    fn authority(&self, addr: usize) -> i64 {
        self.lock()
            .object(addr)
            .and_then(|object| object.props.get(&("multiplayer_authority", None)))
            .map_or(1, Stored::as_int)
    }

    /// The tree's `SceneMultiplayer`, created on first use. Only nodes in the
    /// tree have one.
    fn multiplayer(&self, addr: usize) -> Option<usize> {
        let mut state = self.lock();
        if !state.in_tree(addr) {
            return None;
        }
        if let Some(api) = state.multiplayer {
            return Some(api);
        }
        let api = state.alloc_object("SceneMultiplayer");
        if let Some(object) = state.object_mut(api) {
            object.refcount = Some(1);
        }
        state.multiplayer = Some(api);
        debug!(object = api, "created SceneMultiplayer");
        Some(api)
    }

    fn lazy_rid(&self, addr: usize) -> Option<Stored> {
        let mut state = self.lock();
        if let Some(rid) = state.object(addr)?.props.get(&("rid", None)) {
            return Some(rid.clone());
        }
        let rid = Stored::pod(Rid(state.next_rid()));
        state.object_mut(addr)?.props.insert(("rid", None), rid.clone());
        Some(rid)
    }

    fn peer(&self, api: usize) -> Option<usize> {
        self.get_property(api, "multiplayer_peer", &[]).as_object()
    }

    fn multiplayer_api(&self, addr: usize, method: &str, args: &[Stored]) -> Option<Stored> {
        let result = match method {
            "has_multiplayer_peer" => Stored::bool(self.peer(addr).is_some()),
            "get_unique_id" => match self.peer(addr) {
                Some(peer) => self.invoke(peer, "MultiplayerPeer", "get_unique_id", &[]),
                None => Stored::int(1),
            },
            "is_server" => {
                let unique_id = self.multiplayer_api(addr, "get_unique_id", &[])?;
                Stored::bool(unique_id.as_int() == 1)
            }
            "poll" => {
                if let Some(peer) = self.peer(addr) {
                    self.invoke(peer, "MultiplayerPeer", "poll", &[]);
                }
                error(ErrorCode::Ok)
            }
            "rpc" => match arg(args, 1).as_object() {
                Some(_) => error(ErrorCode::Ok),
                None => error(ErrorCode::InvalidParameter),
            },
            _ => return None,
        };
        Some(result)
    }

    fn scene_multiplayer(&self, addr: usize, method: &str, args: &[Stored]) -> Option<Stored> {
        let result = match method {
            "send_auth" | "complete_auth" => match self.peer(addr) {
                Some(_) => error(ErrorCode::Ok),
                None => error(ErrorCode::Unconfigured),
            },
            "disconnect_peer" => {
                if let Some(peer) = self.peer(addr) {
                    self.invoke(peer, "MultiplayerPeer", "disconnect_peer", &[arg(args, 0), Stored::bool(false)]);
                }
                Stored::Nil
            }
            "send_bytes" => {
                let Some(peer) = self.peer(addr) else {
                    return Some(error(ErrorCode::Unconfigured));
                };
                let bytes = arg(args, 0);
                if bytes.as_bytes().is_empty() {
                    return Some(error(ErrorCode::InvalidData));
                }
                self.invoke(peer, "MultiplayerPeer", "set_target_peer", &[arg(args, 1)]);
                self.invoke(peer, "MultiplayerPeer", "set_transfer_mode", &[arg(args, 2)]);
                self.invoke(peer, "MultiplayerPeer", "set_transfer_channel", &[arg(args, 3)]);
                self.invoke(peer, "PacketPeer", "put_packet", &[bytes])
            }
            _ => return None,
        };
        Some(result)
    }

    pub(super) fn set_property(&self, addr: usize, prop: &'static str, mut args: Vec<Stored>) -> Stored {
        let Some(value) = args.pop() else {
            return Stored::Nil;
        };
        let index = args.first().map(Stored::index_key);
        let replaced = {
            let mut state = self.lock();
            if !state.objects.contains_key(&addr) {
                return Stored::Nil;
            }
            if let Some(held) = value.as_object() {
                state.retain(held);
            }
            let Some(object) = state.object_mut(addr) else {
                return Stored::Nil;
            };
            object.props.insert((prop, index), value)
        };
        if let Some(old) = replaced.as_ref().and_then(Stored::as_object) {
            self.release_ref(old);
        }
        Stored::Nil
    }

    pub(super) fn get_property(&self, addr: usize, prop: &'static str, args: &[Stored]) -> Stored {
        let index = args.first().map(Stored::index_key);
        let state = self.lock();
        let Some(object) = state.object(addr) else {
            return Stored::Nil;
        };
        match object.props.get(&(prop, index)) {
            Some(value) => value.clone(),
            None => default_property(&object.class, prop),
        }
    }

    /// `get_*_value`/`set_*_value` over a bitmask property, with layers
    /// numbered from 1.
    fn call_bitflag(&self, addr: usize, entry: BindEntry, args: &[Stored]) -> Option<Stored> {
        let name = entry.spec.name;
        let base = name.strip_suffix("_value")?;
        let (setter, base) = match (base.strip_prefix("set_"), base.strip_prefix("get_")) {
            (Some(base), _) => (true, base),
            (None, Some(base)) => (false, base),
            (None, None) => return None,
        };
        let setter_name = format!("set_{base}");
        let Access::Set(prop) = self.lookup(entry.class, &setter_name)?.spec.access else {
            return None;
        };

        let layer = arg(args, 0).as_int();
        if !(1..=32).contains(&layer) {
            return Some(Stored::bool(false));
        }
        let bit = 1i64 << (layer - 1);
        let mask = self.get_property(addr, prop, &[]).as_int();
        if !setter {
            return Some(Stored::bool(mask & bit != 0));
        }
        let mask = if arg(args, 1).as_bool() { mask | bit } else { mask & !bit };
        Some(self.set_property(addr, prop, vec![Stored::int(mask)]))
    }
}
