//! Everything a library needs for everyday use.

pub use crate::classes::*;
pub use crate::entry::ExtensionLibrary;
pub use crate::extension::{Base, ExtensionClass, bind_instance, instantiate, register_class};
pub use crate::{Advanced, EngineClass, Engine, Inherits, Obj};

pub use gdbind_core::{
    Aabb, Basis, BindError, BindingConfig, Callable, ClassFlags, Color, ErrorCode, GodotVersion, InitLevel, Lifetime,
    NodePath, Ownership, Plane, Quaternion, Rid, StringName, Transform3D, Value, Vector2, Vector3,
};
pub use gdbind_macros::ExtensionClass;
