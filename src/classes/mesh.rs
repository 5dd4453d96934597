use gdbind_core::{Aabb, Vector3, VirtualThunk};

use crate::classes::{Material, Object, RefCounted, Resource};
use crate::extension::{ExtensionClass, hook_thunk};
use crate::macros::engine_class;
use crate::{HasVirtuals, Obj};

engine_class! {
    /// Geometry resource made of surfaces.
    pub struct Mesh: "Mesh" => Resource;
    refcounted: true;
    ancestors { as_resource => Resource, as_ref_counted => RefCounted, as_object => Object }
    virtuals ["_get_surface_count", "_get_aabb"];
    methods<'lt> {
        get_surface_count() -> i64 = 3905245786;
        get_aabb() -> Aabb = 1068685055;
        surface_get_material(surf_idx: i64) -> Option<Obj<'lt, Material>> => get "surface_material" = 2897466400;
        surface_set_material(surf_idx: i64, material: Option<&Obj<'_, Material>>) => set "surface_material" = 3671737478;
        get_faces() -> Vec<Vector3> = 497664490;
    }
}

/// Hooks a Rust `Mesh` subclass can override.
pub trait IMesh: ExtensionClass {
    fn get_surface_count(&mut self) -> i64 {
        0
    }

    fn get_aabb(&mut self) -> Aabb {
        Aabb::default()
    }
}

impl<T: IMesh> HasVirtuals<T> for Mesh {
    fn virtual_by_name(name: &str) -> Option<VirtualThunk> {
        match name {
            "_get_surface_count" => Some(hook_thunk!(IMesh::get_surface_count())),
            "_get_aabb" => Some(hook_thunk!(IMesh::get_aabb())),
            _ => <Resource as HasVirtuals<T>>::virtual_by_name(name),
        }
    }
}

impl<'lt> Obj<'lt, Mesh> {
    pub fn surface_count(&self) -> i64 {
        self.advanced().get_surface_count()
    }

    pub fn aabb(&self) -> Aabb {
        self.advanced().get_aabb()
    }

    pub fn surface_material(&self, surface: i64) -> Option<Obj<'lt, Material>> {
        self.advanced().surface_get_material(surface)
    }

    pub fn set_surface_material(&self, surface: i64, material: Option<&Obj<'_, Material>>) {
        self.advanced().surface_set_material(surface, material);
    }

    /// Triangle vertices of every surface, three per face.
    pub fn faces(&self) -> Vec<Vector3> {
        self.advanced().get_faces()
    }
}
