use crate::Obj;
use crate::classes::{Object, RefCounted, Resource};
use crate::macros::engine_class;

engine_class! {
    /// Base of every material resource.
    pub struct Material: "Material" => Resource;
    refcounted: true;
    ancestors { as_resource => Resource, as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        set_next_pass(next_pass: Option<&Obj<'_, Material>>) => set "next_pass" = 2757459619;
        get_next_pass() -> Option<Obj<'lt, Material>> => get "next_pass" = 5934680;
        set_render_priority(priority: i64) => set "render_priority" = 1286410249;
        get_render_priority() -> i64 => get "render_priority" = 3905245786;
    }
}

impl<'lt> Obj<'lt, Material> {
    pub fn next_pass(&self) -> Option<Obj<'lt, Material>> {
        self.advanced().get_next_pass()
    }

    pub fn set_next_pass(&self, next_pass: Option<&Obj<'_, Material>>) {
        self.advanced().set_next_pass(next_pass);
    }

    pub fn render_priority(&self) -> i64 {
        self.advanced().get_render_priority()
    }

    /// Materials with a higher priority draw later.
    pub fn set_render_priority(&self, priority: i64) {
        self.advanced().set_render_priority(priority);
    }
}
