use gdbind_core::Rid;

use crate::Obj;
use crate::classes::{Object, RefCounted};
use crate::macros::engine_class;

engine_class! {
    /// Serializable data container.
    pub struct Resource: "Resource" => RefCounted;
    refcounted: true;
    ancestors { as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        set_path(path: &str) => set "resource_path" = 83702148;
        get_path() -> String => get "resource_path" = 201670096;
        set_name(name: &str) => set "resource_name" = 83702148;
        get_name() -> String => get "resource_name" = 201670096;
        get_rid() -> Rid = 2944877500;
        set_local_to_scene(enable: bool) => set "resource_local_to_scene" = 2586408642;
        is_local_to_scene() -> bool => get "resource_local_to_scene" = 36873697;
        emit_changed() = 3218959716;
    }
}

impl<'lt> Obj<'lt, Resource> {
    pub fn resource_path(&self) -> String {
        self.advanced().get_path()
    }

    pub fn set_resource_path(&self, path: &str) {
        self.advanced().set_path(path);
    }

    pub fn resource_name(&self) -> String {
        self.advanced().get_name()
    }

    pub fn set_resource_name(&self, name: &str) {
        self.advanced().set_name(name);
    }

    pub fn rid(&self) -> Rid {
        self.advanced().get_rid()
    }

    pub fn local_to_scene(&self) -> bool {
        self.advanced().is_local_to_scene()
    }

    pub fn set_local_to_scene(&self, enable: bool) {
        self.advanced().set_local_to_scene(enable);
    }

    pub fn emit_changed(&self) {
        self.advanced().emit_changed();
    }
}
