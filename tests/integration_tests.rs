use gdbind::classes::cpu_particles_3d::{DrawOrder, Parameter};
use gdbind::classes::light_3d::Param;
use gdbind::classes::multiplayer_peer::TransferMode;
use gdbind::headless::HeadlessEngine;
use gdbind::prelude::*;
use gdbind::{BindPolicy, Ownership};

mod test_harness;
use test_harness::TestHarness;

#[test]
fn test_particle_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let particles = Obj::<CpuParticles3D>::new(&lifetime).unwrap();

    assert_eq!(particles.amount(), 8);
    particles.set_amount(64);
    particles.set_particle_lifetime(2.5);
    particles.set_one_shot(true);
    particles.set_draw_order(DrawOrder::LIFETIME);
    particles.advanced().set_param_min(Parameter::SCALE, 0.5);

    assert_eq!(particles.amount(), 64);
    assert_eq!(particles.particle_lifetime(), 2.5);
    assert!(particles.one_shot());
    assert_eq!(particles.draw_order(), DrawOrder::LIFETIME);
    assert_eq!(particles.advanced().get_param_min(Parameter::SCALE), 0.5);
    assert_eq!(particles.advanced().get_param_min(Parameter::ANGLE), 0.0);

    particles.set_amount(0);
    assert_eq!(particles.amount(), 0, "setters forward values unchanged");
    particles.free();
}

#[test]
fn test_light_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let light = Obj::<OmniLight3D>::new(&lifetime).unwrap();

    assert_eq!(light.color(), Color::WHITE);
    light.set_color(Color::rgba(1.0, 0.5, 0.25, 1.0));
    light.set_energy(3.0);
    light.set_param(Param::RANGE, 12.0);
    light.set_shadow_enabled(true);

    assert_eq!(light.color(), Color::rgba(1.0, 0.5, 0.25, 1.0));
    assert_eq!(light.energy(), 3.0);
    assert_eq!(light.param(Param::ENERGY), 3.0);
    assert_eq!(light.param(Param::RANGE), 12.0);
    assert!(light.shadow_enabled());
    light.free();
}

#[test]
fn test_upcasts_share_the_object() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let particles = Obj::<GpuParticles3D>::new(&lifetime).unwrap();
    let ptr = particles.object_ptr();

    let node: Obj<Node> = particles.upcast();
    assert_eq!(node.object_ptr(), ptr);
    assert_eq!(particles.as_node_3d().object_ptr(), ptr);
    assert_eq!(particles.upcast_ref::<Object>().object_ptr(), ptr);
    assert!(node.is_class("GeometryInstance3D"));
    assert_eq!(node.class_name(), "GPUParticles3D");

    let back = node.try_cast::<GpuParticles3D>().unwrap();
    assert!(back.same_object(&particles));
    back.free();
}

#[test]
fn test_failed_cast_reports_both_classes() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node: Obj<Node> = Obj::<Node3D>::new(&lifetime).unwrap().upcast();

    let err = node.try_cast::<Light3D>().unwrap_err();
    assert_eq!(
        err,
        BindError::CastFailed {
            actual: "Node3D".to_string(),
            target: "Light3D",
        }
    );
}

#[test]
fn test_temporaries_are_released_once() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let occluder = Obj::<ArrayOccluder3D>::new(&lifetime).unwrap();

    node.set_name("Player");
    assert_eq!(node.name(), "Player");
    node.set_meta("score", 42i64);
    assert_eq!(node.meta("score"), Some(Value::Int(42)));
    assert_eq!(node.path().as_str(), "");
    occluder.set_arrays(&[Vector3::ZERO, Vector3::UP, Vector3::new(1.0, 0.0, 0.0)], &[0, 1, 2]);

    assert!(harness.headless.created_payloads() > 0);
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_temporaries_are_released_on_error_returns() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node>::new(&lifetime).unwrap();
    harness.headless.root(&lifetime).add_child(&node);

    let api = node.multiplayer().expect("node is in the tree");
    let scene = api.try_cast::<SceneMultiplayer>().unwrap();
    let before = harness.headless.created_payloads();
    assert_eq!(scene.send_bytes(&[1, 2, 3], 0, TransferMode::RELIABLE, 0), ErrorCode::Unconfigured);
    assert_eq!(scene.send_auth(2, b"token"), ErrorCode::Unconfigured);
    assert!(harness.headless.created_payloads() > before);
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_lifetime_end_releases_owned_references() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let occluder = Obj::<ArrayOccluder3D>::new(&lifetime).unwrap();
    let ptr = occluder.object_ptr();
    assert_eq!(occluder.ownership(), Some(Ownership::Owned));
    assert_eq!(lifetime.owned_handles(), 1);

    lifetime.end();
    assert!(!harness.headless.is_alive(ptr));
}

#[test]
fn test_manual_objects_survive_their_lifetime() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let ptr = node.object_ptr();
    assert_eq!(node.ownership(), Some(Ownership::Manual));

    lifetime.end();
    assert!(harness.headless.is_alive(ptr));
}

#[test]
fn test_transferred_handle_is_stale_in_the_source() {
    let harness = TestHarness::new();
    let source = harness.engine.lifetime();
    let target = harness.engine.lifetime();
    let occluder = Obj::<ArrayOccluder3D>::new(&source).unwrap();
    let stale = occluder;
    let ptr = occluder.object_ptr();

    let moved = occluder.transfer_to(&target);
    assert_eq!(stale.validate(), Err(BindError::StaleHandle { class: "ArrayOccluder3D" }));
    assert!(moved.is_valid());

    source.end();
    assert!(harness.headless.is_alive(ptr), "source no longer owns the reference");
    assert_eq!(harness.headless.reference_count(ptr), Some(1));
    target.end();
    assert!(!harness.headless.is_alive(ptr));
}

#[test]
#[should_panic(expected = "is stale")]
fn test_calls_through_stale_handles_panic() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let copy = node;
    node.free();
    copy.hide();
}

#[test]
fn test_borrowed_handles_detect_freed_objects() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let parent = Obj::<Node3D>::new(&lifetime).unwrap();
    let child = Obj::<Node3D>::new(&lifetime).unwrap();
    parent.add_child(&child);
    harness.headless.root(&lifetime).add_child(&parent);

    let borrowed = child.parent().expect("child has a parent");
    assert_eq!(borrowed.ownership(), Some(Ownership::Borrowed));
    assert!(borrowed.is_valid());

    parent.queue_free();
    harness.headless.tick(0.016);
    assert!(matches!(
        borrowed.validate(),
        Err(BindError::FreedObject { class: "Node", .. })
    ));
}

#[test]
fn test_bound_handles_detect_freed_objects() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let parent = Obj::<Node3D>::new(&lifetime).unwrap();
    parent.add_child(&Obj::<Node3D>::new(&lifetime).unwrap());
    harness.headless.root(&lifetime).add_child(&parent);

    let bound = parent.child(0).expect("parent has a child");
    assert_eq!(bound.ownership(), Some(Ownership::BoundTo(parent.object_ptr())));
    assert!(bound.is_valid());

    parent.queue_free();
    harness.headless.tick(0.016);
    assert!(matches!(
        bound.validate(),
        Err(BindError::FreedObject { class: "Node", .. })
    ));
}

#[test]
fn test_manual_handles_detect_freed_objects() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    harness.headless.root(&lifetime).add_child(&node);
    assert_eq!(node.ownership(), Some(Ownership::Manual));

    node.queue_free();
    harness.headless.tick(0.016);
    assert!(matches!(
        node.validate(),
        Err(BindError::FreedObject { class: "Node3D", .. })
    ));
}

#[test]
fn test_walking_children_reuses_handles() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let parent = Obj::<Node3D>::new(&lifetime).unwrap();
    for _ in 0..3 {
        parent.add_child(&Obj::<Node3D>::new(&lifetime).unwrap());
    }

    let first = parent.children();
    let tracked = lifetime.live_handles();
    for _ in 0..10 {
        let again = parent.children();
        assert_eq!(again.len(), 3);
        assert!(again.iter().zip(&first).all(|(a, b)| a.key() == b.key()));
    }
    assert_eq!(lifetime.live_handles(), tracked);
    assert!(parent.child(-1).is_some_and(|last| last.same_object(&first[2])));
    assert_eq!(lifetime.live_handles(), tracked);
}

#[test]
fn test_freeing_a_borrowed_ref_counted_object_keeps_it_alive() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let occluder = Obj::<ArrayOccluder3D>::new(&lifetime).unwrap();
    let ptr = occluder.object_ptr();

    // SAFETY: `occluder` keeps the object alive.
    let borrowed = unsafe { Obj::<Object>::from_raw(&lifetime, ptr, Ownership::Borrowed) };
    borrowed.free();
    assert!(harness.headless.is_alive(ptr));
    assert_eq!(harness.headless.reference_count(ptr), Some(1));
    assert!(occluder.is_valid());

    occluder.free();
    assert!(!harness.headless.is_alive(ptr));
}

#[test]
fn test_abstract_classes_and_empty_object_slots() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    assert_eq!(
        Obj::<Material>::new(&lifetime).err(),
        Some(BindError::ConstructionFailed("Material".to_string()))
    );

    let particles = Obj::<GpuParticles3D>::new(&lifetime).unwrap();
    let mesh_holder = Obj::<MeshInstance3D>::new(&lifetime).unwrap();
    assert!(mesh_holder.mesh().is_none());
    assert!(particles.process_material().is_none());
    assert!(particles.draw_pass_mesh(0).is_none());
    assert_eq!(particles.draw_passes(), 1);
    particles.free();
    mesh_holder.free();
}

#[test]
fn test_register_class_errors() {
    unsafe fn free_nothing(_: gdbind::gdbind_core::InstancePtr) {}
    fn info(name: &str, parent: &str) -> gdbind::gdbind_core::ExtensionClassInfo {
        gdbind::gdbind_core::ExtensionClassInfo {
            name: name.to_string(),
            parent: parent.to_string(),
            flags: ClassFlags::default(),
            create: Box::new(|_| None),
            free: free_nothing,
            get_virtual: |_| None,
        }
    }

    let harness = TestHarness::with(HeadlessEngine::new().rejecting("Refused"), BindingConfig::default());
    let engine = &harness.engine;

    engine.register_class(info("Spinner", "Node3D")).unwrap();
    assert_eq!(
        engine.register_class(info("Spinner", "Node3D")),
        Err(BindError::AlreadyRegistered("Spinner".to_string()))
    );
    assert_eq!(
        engine.register_class(info("Orphan", "NoSuchClass")),
        Err(BindError::UnknownParent {
            class: "Orphan".to_string(),
            parent: "NoSuchClass".to_string(),
        })
    );
    assert_eq!(
        engine.register_class(info("Refused", "Node")),
        Err(BindError::RegistrationRejected("Refused".to_string()))
    );
    assert!(!engine.classes().contains("Refused"));
    assert!(engine.classes().inherits("Spinner", "Node"));

    assert!(engine.unregister_class("Spinner"));
    assert!(!engine.unregister_class("Spinner"));
    assert!(!harness.headless.has_extension_class("Spinner"));
}

#[test]
fn test_strict_policy_rejects_missing_binds() {
    let headless = HeadlessEngine::new().without_bind("CPUParticles3D", "restart");
    let config = BindingConfig::default().with_bind_policy(BindPolicy::Strict);
    let err = TestHarness::try_with(headless, config).err().expect("strict load fails");
    assert_eq!(
        err,
        BindError::MissingMethodBind {
            class: "CPUParticles3D",
            method: "restart",
            hash: 3218959716,
        }
    );
}

#[test]
fn test_lenient_policy_defers_missing_binds() {
    let headless = HeadlessEngine::new().without_bind("CPUParticles3D", "restart");
    let harness = TestHarness::with(headless, BindingConfig::default());
    assert_eq!(harness.engine.methods().missing().count(), 1);

    let lifetime = harness.engine.lifetime();
    let particles = Obj::<CpuParticles3D>::new(&lifetime).unwrap();
    particles.set_emitting(false);
    assert!(!particles.is_emitting());

    let restart = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| particles.restart()));
    assert!(restart.is_err(), "calling an unresolved bind panics");
}

#[test]
fn test_compat_hashes_resolve_on_older_engines() {
    let harness = TestHarness::with(HeadlessEngine::new().with_legacy_hashes(), BindingConfig::default());
    assert_eq!(harness.engine.methods().missing().count(), 0);

    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    node.look_at(Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(harness.headless.call_count(node.object_ptr(), "look_at"), 1);
    node.free();
}

#[test]
fn test_old_engines_are_refused() {
    let headless = HeadlessEngine::new().with_version(GodotVersion::new(4, 1, 0));
    let err = TestHarness::try_with(headless, BindingConfig::default()).err().expect("version check");
    assert!(matches!(err, BindError::IncompatibleVersion { .. }));
}
