//! Per-frame costs of the bindings, measured against the headless engine.
//!
//! - `load`: resolving every method bind of the class catalog
//! - `calls`: single ptrcalls with and without string temporaries
//! - `frame`: a scene of extension nodes driven through `tick`
//!
//! ```bash
//! cargo bench --bench frame_benchmarks -- calls
//! ```

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use gdbind::headless::HeadlessEngine;
use gdbind::prelude::*;

#[derive(ExtensionClass)]
#[class(base = Node3D)]
struct Orbiter {
    base: Base<Node3D>,
    angle: f32,
}

impl INode for Orbiter {
    fn process(&mut self, delta: f64) {
        self.angle += delta as f32;
        let offset = glam::Quat::from_rotation_y(self.angle) * glam::Vec3::X * 4.0;
        if let Some(lifetime) = self.base.lifetime() {
            self.base.to_obj(&lifetime).set_position(offset.into());
        }
    }
}

fn boot() -> (Arc<HeadlessEngine>, Arc<Engine>) {
    let headless = Arc::new(HeadlessEngine::new());
    let engine = headless.boot(BindingConfig::default()).unwrap();
    (headless, engine)
}

fn load_benchmarks(c: &mut Criterion) {
    let headless = Arc::new(HeadlessEngine::new());
    let mut group = c.benchmark_group("load");

    group.bench_function("catalog", |b| {
        b.iter(|| {
            let engine = headless.boot(BindingConfig::default()).unwrap();
            black_box(engine.methods().missing().count())
        });
    });

    group.finish();
}

fn call_benchmarks(c: &mut Criterion) {
    let (_headless, engine) = boot();
    let lifetime = engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let particles = Obj::<CpuParticles3D>::new(&lifetime).unwrap();

    let mut group = c.benchmark_group("calls");

    group.bench_function("position_round_trip", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 1.0;
            node.set_position(Vector3::new(black_box(x), 0.0, 0.0));
            black_box(node.position())
        });
    });

    group.bench_function("set_name", |b| {
        b.iter(|| node.set_name(black_box("Player")));
    });

    group.bench_function("particle_amount", |b| {
        b.iter(|| {
            particles.set_amount(black_box(32));
            black_box(particles.amount())
        });
    });

    group.bench_function("checked_upcast", |b| {
        b.iter(|| black_box(particles.upcast_ref::<Node>().is_valid()));
    });

    group.finish();
    node.free();
    particles.free();
}

fn frame_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [10usize, 100, 1000] {
        let (headless, engine) = boot();
        register_class::<Orbiter>(&engine).unwrap();
        let lifetime = engine.lifetime();
        let root = headless.root(&lifetime);
        for _ in 0..count {
            root.add_child(&instantiate::<Orbiter>(&lifetime).unwrap());
        }

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("tick_{count}_orbiters"), |b| {
            b.iter(|| headless.tick(black_box(1.0 / 60.0)));
        });
    }

    group.bench_function("spawn_and_free_subtree", |b| {
        let (headless, engine) = boot();
        let lifetime = engine.lifetime();
        let root = headless.root(&lifetime);
        b.iter(|| {
            let parent = Obj::<Node3D>::new(&lifetime).unwrap();
            for _ in 0..16 {
                parent.add_child(&Obj::<Node3D>::new(&lifetime).unwrap());
            }
            root.add_child(&parent);
            parent.queue_free();
            headless.tick(0.0);
        });
    });

    group.finish();
}

criterion_group!(benches, load_benchmarks, call_benchmarks, frame_benchmarks);
criterion_main!(benches);
