//! Core types for gdbind.
//!
//! This crate holds everything below the per-class shims:
//!
//! - [`NameHash`]: compile-time keys for classes, methods and virtual hooks
//! - [`math`]: fixed-layout value types shared with the engine
//! - [`Value`]: variants copied out of the engine
//! - [`Callable`]: Rust closures the engine can call
//! - [`AbiType`]: slot encodings, plus the opaque engine payloads
//! - [`Interface`]: the GDExtension function table
//! - [`runtime`]: call frames, handle arenas and lifetimes
//! - [`BindError`] / [`ErrorCode`]: binding errors and engine error codes

mod abi;
mod callable;
mod config;
mod error;
mod interface;
pub mod math;
mod name_hash;
pub mod runtime;
mod spec;
mod strings;
pub mod sys;
mod value;
mod version;

pub use abi::{
    AbiType, PackedElement, PackedKind, RawArray, RawCallable, RawNodePath, RawPacked, RawString,
    RawStringName, RawVariant,
};
pub use callable::{Callable, CallableFn};
pub use config::{BindPolicy, BindingConfig, InitLevel};
pub use error::{BindError, BindResult, ErrorCode};
pub use interface::{
    ClassFlags, CreateInstance, ExtensionClassInfo, Interface, VirtualThunk, thunk_from_ptr,
    thunk_to_ptr,
};
pub use math::{Aabb, Basis, Color, Plane, Quaternion, Rid, Transform3D, Vector2, Vector3};
pub use name_hash::{NameHash, hash_constants};
pub use runtime::{CallFrame, Lifetime, Ownership, RefCountBinds, Runtime, SlotKey, Tracked};
pub use spec::{Access, ClassSpec, MethodSpec};
pub use strings::{NodePath, StringName};
pub use sys::{ConstTypePtr, InstanceId, InstancePtr, MethodBindPtr, ObjectPtr, TypePtr};
pub use value::{Value, VariantType};
pub use version::GodotVersion;
