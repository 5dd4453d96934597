//! Class markers and the inheritance relation between them.

use gdbind_core::{ClassSpec, VirtualThunk};

/// Zero-sized marker for an engine class.
///
/// Implemented by `engine_class!`; the associated spec lists every method
/// bind the class's shims call.
pub trait EngineClass: 'static {
    /// Engine class name.
    const NAME: &'static str;
    const PARENT: Option<&'static str>;
    /// Whether instances are reference counted (derive from `RefCounted`).
    const REFCOUNTED: bool;

    fn class_spec() -> &'static ClassSpec;
}

/// `Self` is `B` or one of its engine subclasses.
///
/// # Safety
///
/// Implementing this for an unrelated class makes upcasts hand the engine
/// objects of the wrong class.
pub unsafe trait Inherits<B: EngineClass>: EngineClass {}

/// Name-keyed lookup of the virtual hooks `T` overrides, walking from the
/// implementing class up to `Object`.
pub trait HasVirtuals<T> {
    fn virtual_by_name(name: &str) -> Option<VirtualThunk>;
}
