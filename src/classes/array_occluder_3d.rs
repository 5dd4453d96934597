use gdbind_core::Vector3;

use crate::Obj;
use crate::classes::{Object, Occluder3D, RefCounted, Resource};
use crate::macros::engine_class;

engine_class! {
    /// Occluder built from explicit vertex and index arrays.
    pub struct ArrayOccluder3D: "ArrayOccluder3D" => Occluder3D;
    refcounted: true;
    ancestors {
        as_occluder_3d => Occluder3D,
        as_resource => Resource,
        as_ref_counted => RefCounted,
        as_object => Object,
    }
    methods<'lt> {
        set_arrays(vertices: &[Vector3], indices: &[i32]) = 3233972621;
        set_vertices(vertices: &[Vector3]) => set "vertices" = 334873810;
        set_indices(indices: &[i32]) => set "indices" = 3614634198;
    }
}

impl<'lt> Obj<'lt, ArrayOccluder3D> {
    pub fn set_vertices(&self, vertices: &[Vector3]) {
        self.advanced().set_vertices(vertices);
    }

    pub fn set_indices(&self, indices: &[i32]) {
        self.advanced().set_indices(indices);
    }

    /// Replace both arrays at once; `indices` holds three entries per triangle.
    pub fn set_arrays(&self, vertices: &[Vector3], indices: &[i32]) {
        self.advanced().set_arrays(vertices, indices);
    }
}
