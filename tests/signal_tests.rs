use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gdbind::classes::object::ConnectFlags;
use gdbind::prelude::*;

mod test_harness;
use test_harness::TestHarness;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&count);
    (count, move || {
        sink.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_connected_handler_receives_signal_arguments() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let callable = node
        .connect("visibility_changed", move |args| sink.lock().unwrap().extend_from_slice(args))
        .unwrap();
    assert!(node.is_connected("visibility_changed", &callable));
    assert!(!node.is_connected("renamed", &callable));

    let emitted = harness
        .headless
        .emit_signal(node.object_ptr(), "visibility_changed", &[Value::Int(3), Value::from("shown")]);
    assert_eq!(emitted, 1);
    assert_eq!(*received.lock().unwrap(), vec![Value::Int(3), Value::from("shown")]);

    node.disconnect("visibility_changed", &callable);
    assert!(!node.is_connected("visibility_changed", &callable));
    assert_eq!(harness.headless.emit_signal(node.object_ptr(), "visibility_changed", &[]), 0);
    assert_eq!(received.lock().unwrap().len(), 2);

    node.free();
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_connecting_twice_is_rejected() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node>::new(&lifetime).unwrap();

    let callable = node.connect("renamed", |_| {}).unwrap();
    let again = node
        .advanced()
        .connect(&StringName::from("renamed"), &callable, ConnectFlags::NONE.ord());
    assert_eq!(again, ErrorCode::InvalidParameter);
    assert_eq!(harness.headless.connection_count(node.object_ptr(), "renamed"), 1);

    node.connect("renamed", |_| {}).unwrap();
    assert_eq!(harness.headless.connection_count(node.object_ptr(), "renamed"), 2);
    node.free();
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_tree_signals_follow_the_node() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let record = |event: &'static str| {
        let log = Arc::clone(&log);
        move || log.lock().unwrap().push(event)
    };

    node.on_tree_entered(record("entered")).unwrap();
    node.on_ready(record("ready")).unwrap();
    node.on_tree_exiting(record("exiting")).unwrap();
    node.on_tree_exited(record("exited")).unwrap();

    let root = harness.headless.root(&lifetime);
    root.add_child(&node);
    assert_eq!(*log.lock().unwrap(), ["entered", "ready"]);

    root.remove_child(&node);
    root.add_child(&node);
    assert_eq!(
        *log.lock().unwrap(),
        ["entered", "ready", "exiting", "exited", "entered"],
        "ready fires only the first time"
    );

    node.queue_free();
    harness.headless.tick(0.0);
    assert_eq!(log.lock().unwrap()[5..], ["exiting", "exited"]);
    assert!(!node.is_valid());
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_one_shot_particles_report_finished() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let particles = Obj::<CpuParticles3D>::new(&lifetime).unwrap();
    let (finished, handler) = counter();

    particles.set_one_shot(true);
    particles.set_particle_lifetime(0.5);
    particles.on_finished(handler).unwrap();
    harness.headless.root(&lifetime).add_child(&particles);

    harness.headless.tick(0.25);
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert!(particles.is_emitting());

    harness.headless.tick(0.25);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert!(!particles.is_emitting());

    harness.headless.tick(1.0);
    assert_eq!(finished.load(Ordering::SeqCst), 1, "a stopped emitter stays quiet");

    particles.restart();
    harness.headless.tick(0.5);
    assert_eq!(finished.load(Ordering::SeqCst), 2);
}

#[test]
fn test_gpu_particles_finish_faster_with_speed_scale() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let particles = Obj::<GpuParticles3D>::new(&lifetime).unwrap();
    let looping = Obj::<GpuParticles3D>::new(&lifetime).unwrap();
    let (finished, handler) = counter();
    let (looped, looping_handler) = counter();

    particles.set_one_shot(true);
    particles.set_speed_scale(2.0);
    particles.on_finished(handler).unwrap();
    looping.on_finished(looping_handler).unwrap();
    let root = harness.headless.root(&lifetime);
    root.add_child(&particles);
    root.add_child(&looping);

    harness.headless.tick(0.5);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(looped.load(Ordering::SeqCst), 0, "looping emitters never finish");
}

#[test]
fn test_one_shot_connections_fire_once() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node>::new(&lifetime).unwrap();
    let (count, handler) = counter();

    node.connect_with("renamed", ConnectFlags::ONE_SHOT, move |_| handler())
        .unwrap();
    assert_eq!(harness.headless.emit_signal(node.object_ptr(), "renamed", &[]), 1);
    assert_eq!(harness.headless.emit_signal(node.object_ptr(), "renamed", &[]), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(harness.headless.connection_count(node.object_ptr(), "renamed"), 0);
    node.free();
}

#[test]
fn test_deferred_handlers_run_at_end_of_frame() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node>::new(&lifetime).unwrap();
    let (count, handler) = counter();

    node.connect_with("renamed", ConnectFlags::DEFERRED, move |_| handler())
        .unwrap();
    assert_eq!(harness.headless.emit_signal(node.object_ptr(), "renamed", &[]), 1);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    harness.headless.tick(0.0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    node.free();
}

#[test]
fn test_peer_signals_pass_the_peer_id() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let api = harness
        .headless
        .root(&lifetime)
        .multiplayer()
        .expect("the root is in the tree");
    let peers = Arc::new(Mutex::new(Vec::new()));
    let joined = Arc::clone(&peers);
    let left = Arc::clone(&peers);

    api.on_peer_connected(move |id| joined.lock().unwrap().push(id)).unwrap();
    api.on_peer_disconnected(move |id| left.lock().unwrap().push(-id)).unwrap();
    harness
        .headless
        .emit_signal(api.object_ptr(), "peer_connected", &[Value::Int(7)]);
    harness
        .headless
        .emit_signal(api.object_ptr(), "peer_disconnected", &[Value::Int(7)]);

    assert_eq!(*peers.lock().unwrap(), [7, -7]);
}

#[test]
fn test_signals_of_freed_objects_reach_nobody() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node>::new(&lifetime).unwrap();
    let (count, handler) = counter();
    node.on_ready(handler).unwrap();
    let object = node.object_ptr();

    node.free();
    assert_eq!(harness.headless.emit_signal(object, "ready", &[]), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
