use gdbind_core::Vector3;

use crate::Obj;
use crate::classes::{Object, RefCounted, Resource};
use crate::macros::engine_class;

engine_class! {
    /// Occlusion culling geometry used by `OccluderInstance3D`.
    pub struct Occluder3D: "Occluder3D" => Resource;
    refcounted: true;
    ancestors { as_resource => Resource, as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        get_vertices() -> Vec<Vector3> => get "vertices" = 497664490;
        get_indices() -> Vec<i32> => get "indices" = 1930428628;
    }
}

impl<'lt> Obj<'lt, Occluder3D> {
    pub fn vertices(&self) -> Vec<Vector3> {
        self.advanced().get_vertices()
    }

    pub fn indices(&self) -> Vec<i32> {
        self.advanced().get_indices()
    }

    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices().len() / 3
    }
}
