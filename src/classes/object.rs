use gdbind_core::{Callable, ErrorCode, StringName, Value, VirtualThunk};

use crate::macros::{engine_class, engine_enum};
use crate::{HasVirtuals, Obj};

engine_enum! {
    /// Flags for [`Obj::connect_with`]; combine with `|` on the inner value.
    pub struct ConnectFlags {
        NONE = 0,
        DEFERRED = 1,
        PERSIST = 2,
        ONE_SHOT = 4,
        REFERENCE_COUNTED = 8,
    }
}

engine_class! {
    /// Root of the engine class tree.
    pub struct Object: "Object";
    refcounted: false;
    ancestors {}
    methods<'lt> {
        get_class() -> String = 201670096;
        is_class(class: &str) -> bool = 3927539163;
        get_instance_id() -> i64 = 3905245786;
        set_meta(name: &StringName, value: &Value) => set "metadata" = 3776071444;
        get_meta(name: &StringName, default: &Value) -> Value = 3990617847;
        has_meta(name: &StringName) -> bool = 2619796661;
        remove_meta(name: &StringName) = 3304788590;
        notification(what: i64, reversed: bool) = 4023243586;
        connect(signal: &StringName, callable: &Callable, flags: i64) -> ErrorCode = 1518146271;
        disconnect(signal: &StringName, callable: &Callable) = 1874754934;
        is_connected(signal: &StringName, callable: &Callable) -> bool = 768136979;
    }
}

/// `Object` declares no hooks of its own; every lookup ends here.
impl<T> HasVirtuals<T> for Object {
    fn virtual_by_name(_name: &str) -> Option<VirtualThunk> {
        None
    }
}

impl<'lt> Obj<'lt, Object> {
    /// True when the object is `class` or inherits from it.
    pub fn is_class(&self, class: &str) -> bool {
        self.advanced().is_class(class)
    }

    pub fn set_meta(&self, name: &str, value: impl Into<Value>) {
        self.advanced().set_meta(&StringName::from(name), &value.into());
    }

    /// Metadata stored under `name`, `None` when absent.
    pub fn meta(&self, name: &str) -> Option<Value> {
        let value = self.advanced().get_meta(&StringName::from(name), &Value::Nil);
        (!value.is_nil()).then_some(value)
    }

    pub fn has_meta(&self, name: &str) -> bool {
        self.advanced().has_meta(&StringName::from(name))
    }

    pub fn remove_meta(&self, name: &str) {
        self.advanced().remove_meta(&StringName::from(name));
    }

    pub fn notify(&self, what: i64) {
        self.advanced().notification(what, false);
    }

    /// Run `handler` with the signal's arguments every time the object emits
    /// `signal`. The returned callable identifies the connection.
    pub fn connect(
        &self,
        signal: &str,
        handler: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<Callable, ErrorCode> {
        self.connect_with(signal, ConnectFlags::NONE, handler)
    }

    pub fn connect_with(
        &self,
        signal: &str,
        flags: ConnectFlags,
        handler: impl Fn(&[Value]) + Send + Sync + 'static,
    ) -> Result<Callable, ErrorCode> {
        let callable = Callable::from_fn(self.instance_id(), handler);
        self.advanced()
            .connect(&StringName::from(signal), &callable, flags.ord())
            .into_result()?;
        Ok(callable)
    }

    pub fn disconnect(&self, signal: &str, callable: &Callable) {
        self.advanced().disconnect(&StringName::from(signal), callable);
    }

    pub fn is_connected(&self, signal: &str, callable: &Callable) -> bool {
        self.advanced().is_connected(&StringName::from(signal), callable)
    }
}
