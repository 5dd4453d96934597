//! Rust bindings for the Godot engine's scene classes over GDExtension.
//!
//! Every bound class is reached through a typed handle, [`Obj<'lt, T>`],
//! tracked by a [`Lifetime`]:
//!
//! ```ignore
//! use gdbind::prelude::*;
//!
//! let lifetime = engine.lifetime();
//! let particles = Obj::<CpuParticles3D>::new(&lifetime)?;
//! particles.set_amount(64);
//! particles.set_particle_lifetime(2.5);
//! // Advanced: the engine's own method, argument for argument.
//! particles.advanced().set_param_min(cpu_particles_3d::Parameter::SCALE, 0.5);
//! // Upcasts consume the handle.
//! particles.as_node_3d().set_position(Vector3::new(0.0, 1.0, 0.0));
//! ```
//!
//! Handles cannot outlive their lifetime. Ending it gives back every owned
//! reference; objects the caller constructed and never handed to the engine
//! stay alive until freed.
//!
//! ## Crate layout
//!
//! - [`classes`]: one module per engine class, with its Simple methods
//! - [`extension`]: Rust subclasses of engine classes
//! - [`entry`]: the library entry point the engine calls
//! - [`native`]: the real GDExtension function table
//! - [`headless`]: an in-process engine for tests and tools

// Lets `#[derive(ExtensionClass)]` expand to `::gdbind` paths inside this crate.
extern crate self as gdbind;

mod macros;

mod class;
pub mod classes;
pub mod entry;
pub mod extension;
pub mod headless;
pub mod marshal;
pub mod native;
mod obj;
pub mod prelude;

pub use gdbind_core;
pub use gdbind_registry;

pub use class::{EngineClass, HasVirtuals, Inherits};
pub use extension::{Base, ExtensionClass, bind_instance, instantiate, register_class};
pub use obj::{Advanced, Obj};

pub use gdbind_core::{
    Aabb, Basis, BindError, BindPolicy, BindResult, BindingConfig, Callable, ClassFlags, Color, ErrorCode, GodotVersion,
    InitLevel, InstanceId, Lifetime, NodePath, Ownership, Plane, Quaternion, Rid, StringName, Transform3D, Value,
    Vector2, Vector3, VirtualThunk,
};
pub use gdbind_macros::ExtensionClass;
pub use gdbind_registry::Engine;
