use gdbind_core::NodePath;

use crate::Obj;
use crate::classes::{GeometryInstance3D, Material, Mesh, Node, Node3D, Object, VisualInstance3D};
use crate::macros::engine_class;

engine_class! {
    /// Places a `Mesh` in the scene.
    pub struct MeshInstance3D: "MeshInstance3D" => GeometryInstance3D;
    refcounted: false;
    ancestors {
        as_geometry_instance_3d => GeometryInstance3D,
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_mesh(mesh: Option<&Obj<'_, Mesh>>) => set "mesh" = 194775623;
        get_mesh() -> Option<Obj<'lt, Mesh>> => get "mesh" = 1808005922;
        set_skeleton_path(skeleton_path: &NodePath) => set "skeleton" = 1348162250;
        get_skeleton_path() -> NodePath => get "skeleton" = 277076166;
        get_surface_override_material_count() -> i64 = 3905245786;
        set_surface_override_material(surface: i64, material: Option<&Obj<'_, Material>>)
            => set "surface_material_override" = 3671737478;
        get_surface_override_material(surface: i64) -> Option<Obj<'lt, Material>>
            => get "surface_material_override" = 2897466400;
        get_active_material(surface: i64) -> Option<Obj<'lt, Material>> = 2897466400;
        create_trimesh_collision() = 3218959716;
    }
}

impl<'lt> Obj<'lt, MeshInstance3D> {
    pub fn mesh(&self) -> Option<Obj<'lt, Mesh>> {
        self.advanced().get_mesh()
    }

    pub fn set_mesh(&self, mesh: Option<&Obj<'_, Mesh>>) {
        self.advanced().set_mesh(mesh);
    }

    pub fn skeleton_path(&self) -> NodePath {
        self.advanced().get_skeleton_path()
    }

    pub fn set_skeleton_path(&self, path: &str) {
        self.advanced().set_skeleton_path(&NodePath::from(path));
    }

    pub fn surface_override_material_count(&self) -> i64 {
        self.advanced().get_surface_override_material_count()
    }

    pub fn surface_override_material(&self, surface: i64) -> Option<Obj<'lt, Material>> {
        self.advanced().get_surface_override_material(surface)
    }

    pub fn set_surface_override_material(&self, surface: i64, material: Option<&Obj<'_, Material>>) {
        self.advanced()
            .set_surface_override_material(surface, material);
    }

    /// The material actually used for `surface`: override, then mesh
    /// material, as the engine resolves it.
    pub fn active_material(&self, surface: i64) -> Option<Obj<'lt, Material>> {
        self.advanced().get_active_material(surface)
    }

    pub fn create_trimesh_collision(&self) {
        self.advanced().create_trimesh_collision();
    }
}
