use std::sync::Arc;

use super::*;
use crate::classes::{ArrayOccluder3D, CpuParticles3D, Mesh, MeshInstance3D, Node3D, Occluder3D, OccluderInstance3D};
use gdbind_core::{Transform3D, Vector3};

fn boot() -> (Arc<HeadlessEngine>, Arc<Engine>) {
    let headless = Arc::new(HeadlessEngine::new());
    let engine = headless.boot(BindingConfig::default()).expect("catalog binds resolve");
    (headless, engine)
}

#[test]
fn binds_follow_the_reported_version() {
    let old = HeadlessEngine::new().with_version(GodotVersion::new(4, 2, 1));
    let new = HeadlessEngine::new();
    assert!(old.method_bind("LightmapGI", "set_denoiser_strength", 373806689).is_none());
    assert!(new.method_bind("LightmapGI", "set_denoiser_strength", 373806689).is_some());
    assert!(old.method_bind("Node3D", "set_position", 3460891852).is_some());
}

#[test]
fn binds_check_the_signature_hash() {
    let headless = HeadlessEngine::new();
    assert!(headless.method_bind("Node3D", "look_at", 2882425029).is_some());
    assert!(headless.method_bind("Node3D", "look_at", 3123400617).is_none());
    assert!(headless.method_bind("Node3D", "look_at", 1).is_none());
    assert!(headless.method_bind("Node3D", "no_such_method", 2882425029).is_none());

    let legacy = HeadlessEngine::new().with_legacy_hashes();
    assert!(legacy.method_bind("Node3D", "look_at", 2882425029).is_none());
    assert!(legacy.method_bind("Node3D", "look_at", 3123400617).is_some());
    assert!(legacy.method_bind("Node3D", "set_position", 3460891852).is_some());
}

#[test]
fn hidden_binds_are_not_exported() {
    let headless = HeadlessEngine::new().without_bind("CPUParticles3D", "restart");
    assert!(headless.method_bind("CPUParticles3D", "restart", 3218959716).is_none());
    assert!(headless.method_bind("GPUParticles3D", "restart", 3218959716).is_some());
}

#[test]
fn abstract_and_unknown_classes_are_not_constructed() {
    let headless = HeadlessEngine::new();
    assert!(headless.construct_object("Mesh").is_none());
    assert!(headless.construct_object("Light3D").is_none());
    assert!(headless.construct_object("NoSuchClass").is_none());
    let node = headless.construct_object("OmniLight3D").expect("concrete class");
    assert_eq!(unsafe { headless.class_name(node) }.as_deref(), Some("OmniLight3D"));
    assert!(unsafe { headless.cast_to(node, "Light3D") }.is_some());
    assert!(unsafe { headless.cast_to(node, "Mesh") }.is_none());
}

#[test]
fn payloads_are_tracked_per_id() {
    let headless = HeadlessEngine::new();
    let mut raw = RawString::default();
    unsafe {
        headless.string_new(&mut raw, "hello");
        assert_eq!(headless.string_to_utf8(&raw), "hello");
        assert_eq!(headless.live_payloads(), 1);
        headless.string_destroy(&mut raw);
        headless.string_destroy(&mut raw);
    }
    assert_eq!(headless.live_payloads(), 0);
    assert_eq!(headless.invalid_releases(), 1);
}

#[test]
fn properties_read_back_and_default() {
    let (headless, engine) = boot();
    let lifetime = engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();

    assert_eq!(node.scale(), Vector3::ONE);
    assert_eq!(node.transform(), Transform3D::IDENTITY);
    assert!(node.is_visible());

    node.set_position(Vector3::new(1.0, 2.0, 3.0));
    node.translate(Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(node.position(), Vector3::new(2.0, 2.0, 3.0));

    node.hide();
    assert!(!node.is_visible());
    assert_eq!(headless.live_payloads(), 0);
    node.free();
}

#[test]
fn indexed_and_bitmask_properties() {
    let (_headless, engine) = boot();
    let lifetime = engine.lifetime();
    let occluder = Obj::<OccluderInstance3D>::new(&lifetime).unwrap();

    occluder.advanced().set_bake_mask(0);
    occluder.advanced().set_bake_mask_value(3, true);
    assert_eq!(occluder.advanced().get_bake_mask(), 0b100);
    assert!(occluder.advanced().get_bake_mask_value(3));
    assert!(!occluder.advanced().get_bake_mask_value(1));
    assert!(!occluder.advanced().get_bake_mask_value(40));
    occluder.free();
}

#[test]
fn nodes_enter_the_tree_under_root() {
    let (headless, engine) = boot();
    let lifetime = engine.lifetime();
    let root = headless.root(&lifetime);
    let parent = Obj::<Node3D>::new(&lifetime).unwrap();
    let child = Obj::<CpuParticles3D>::new(&lifetime).unwrap();
    parent.set_name("Level");
    child.set_name("Sparks");

    parent.add_child(&child);
    assert!(!child.is_inside_tree());
    assert_eq!(child.path().as_str(), "");

    root.add_child(&parent);
    assert!(child.is_inside_tree());
    assert_eq!(child.path().as_str(), "/root/Level/Sparks");
    assert_eq!(root.child_count(), 1);
    assert!(child.parent_node_3d().is_some_and(|p| p.same_object(&parent)));
    assert!(root.child(-1).is_some_and(|c| c.same_object(&parent)));
}

#[test]
fn queue_free_destroys_the_subtree_on_tick() {
    let (headless, engine) = boot();
    let lifetime = engine.lifetime();
    let parent = Obj::<Node3D>::new(&lifetime).unwrap();
    let child = Obj::<Node3D>::new(&lifetime).unwrap();
    parent.add_child(&child);
    headless.root(&lifetime).add_child(&parent);

    let before = headless.live_objects();
    parent.queue_free();
    assert_eq!(headless.queued_for_deletion(), 1);
    headless.tick(0.016);
    assert_eq!(headless.live_objects(), before - 2);
    assert!(!headless.is_alive(child.object_ptr()));
    assert_eq!(headless.destroyed_objects(), 2);
}

#[test]
fn stored_references_are_counted() {
    let (headless, engine) = boot();
    let lifetime = engine.lifetime();
    let occluder = Obj::<ArrayOccluder3D>::new(&lifetime).unwrap();
    let holder = Obj::<OccluderInstance3D>::new(&lifetime).unwrap();
    let ptr = occluder.object_ptr();

    assert_eq!(headless.reference_count(ptr), Some(1));
    holder.set_occluder(Some(occluder.upcast_ref::<Occluder3D>()));
    assert_eq!(headless.reference_count(ptr), Some(2));

    let fetched = holder.occluder().expect("occluder was set");
    assert_eq!(headless.reference_count(ptr), Some(3));
    fetched.free();
    occluder.free();
    assert_eq!(headless.reference_count(ptr), Some(1));

    holder.free();
    assert!(!headless.is_alive(ptr));
}

#[test]
fn active_material_without_mesh_is_none() {
    let (_headless, engine) = boot();
    let lifetime = engine.lifetime();
    let instance = Obj::<MeshInstance3D>::new(&lifetime).unwrap();
    assert!(instance.advanced().get_active_material(0).is_none());
    assert_eq!(instance.advanced().get_surface_override_material_count(), 0);
    assert!(Obj::<Mesh>::new(&lifetime).is_err());
    instance.free();
}

#[test]
fn multiplayer_exists_only_inside_the_tree() {
    let (headless, engine) = boot();
    let lifetime = engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    assert!(node.multiplayer().is_none());

    headless.root(&lifetime).add_child(&node);
    let api = node.multiplayer().expect("tree has a multiplayer");
    assert!(!api.has_multiplayer_peer());
    assert_eq!(api.unique_id(), 1);
    assert!(api.is_server());
    assert!(node.is_multiplayer_authority());

    node.set_multiplayer_authority(7);
    assert_eq!(node.multiplayer_authority(), 7);
    assert!(!node.is_multiplayer_authority());
}
