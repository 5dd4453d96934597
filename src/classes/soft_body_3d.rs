use gdbind_core::{NodePath, Rid, Vector3};

use crate::Obj;
use crate::classes::{GeometryInstance3D, MeshInstance3D, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    /// What happens to the body when its node is disabled.
    pub struct DisableMode {
        REMOVE = 0,
        KEEP_ACTIVE = 1,
    }
}

engine_class! {
    /// Deformable mesh simulated by the physics server.
    pub struct SoftBody3D: "SoftBody3D" => MeshInstance3D;
    refcounted: false;
    ancestors {
        as_mesh_instance_3d => MeshInstance3D,
        as_geometry_instance_3d => GeometryInstance3D,
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        get_physics_rid() -> Rid = 2944877500;
        set_collision_mask(collision_mask: i64) => set "collision_mask" = 1286410249;
        get_collision_mask() -> i64 => get "collision_mask" = 3905245786;
        set_collision_layer(collision_layer: i64) => set "collision_layer" = 1286410249;
        get_collision_layer() -> i64 => get "collision_layer" = 3905245786;
        set_collision_mask_value(layer_number: i64, value: bool) = 300928843;
        get_collision_mask_value(layer_number: i64) -> bool = 1116898809;
        set_collision_layer_value(layer_number: i64, value: bool) = 300928843;
        get_collision_layer_value(layer_number: i64) -> bool = 1116898809;
        set_parent_collision_ignore(parent_collision_ignore: &NodePath) => set "parent_collision_ignore" = 1348162250;
        get_parent_collision_ignore() -> NodePath => get "parent_collision_ignore" = 4075236667;
        set_disable_mode(mode: DisableMode) => set "disable_mode" = 1104158384;
        get_disable_mode() -> DisableMode => get "disable_mode" = 4135042476;
        set_simulation_precision(simulation_precision: i64) => set "simulation_precision" = 1286410249;
        get_simulation_precision() -> i64 => get "simulation_precision" = 2455072627;
        set_total_mass(mass: f64) => set "total_mass" = 373806689;
        get_total_mass() -> f64 => get "total_mass" = 191475506;
        set_linear_stiffness(linear_stiffness: f64) => set "linear_stiffness" = 373806689;
        get_linear_stiffness() -> f64 => get "linear_stiffness" = 191475506;
        set_pressure_coefficient(pressure_coefficient: f64) => set "pressure_coefficient" = 373806689;
        get_pressure_coefficient() -> f64 => get "pressure_coefficient" = 191475506;
        set_damping_coefficient(damping_coefficient: f64) => set "damping_coefficient" = 373806689;
        get_damping_coefficient() -> f64 => get "damping_coefficient" = 191475506;
        set_drag_coefficient(drag_coefficient: f64) => set "drag_coefficient" = 373806689;
        get_drag_coefficient() -> f64 => get "drag_coefficient" = 191475506;
        get_point_transform(point_index: i64) -> Vector3 = 871989493;
        set_point_pinned(point_index: i64, pinned: bool, attachment_path: &NodePath, insert_at: i64)
            = 528784402 | 3240805305;
        is_point_pinned(point_index: i64) -> bool = 1116898809;
        set_ray_pickable(ray_pickable: bool) => set "ray_pickable" = 2586408642;
        is_ray_pickable() -> bool => get "ray_pickable" = 36873697;
    }
}

impl<'lt> Obj<'lt, SoftBody3D> {
    pub fn physics_rid(&self) -> Rid {
        self.advanced().get_physics_rid()
    }

    pub fn collision_mask(&self) -> i64 {
        self.advanced().get_collision_mask()
    }

    pub fn set_collision_mask(&self, mask: i64) {
        self.advanced().set_collision_mask(mask);
    }

    pub fn collision_layer(&self) -> i64 {
        self.advanced().get_collision_layer()
    }

    pub fn set_collision_layer(&self, layer: i64) {
        self.advanced().set_collision_layer(layer);
    }

    pub fn collision_mask_value(&self, layer: i64) -> bool {
        self.advanced().get_collision_mask_value(layer)
    }

    pub fn set_collision_mask_value(&self, layer: i64, enabled: bool) {
        self.advanced().set_collision_mask_value(layer, enabled);
    }

    pub fn collision_layer_value(&self, layer: i64) -> bool {
        self.advanced().get_collision_layer_value(layer)
    }

    pub fn set_collision_layer_value(&self, layer: i64, enabled: bool) {
        self.advanced().set_collision_layer_value(layer, enabled);
    }

    pub fn parent_collision_ignore(&self) -> NodePath {
        self.advanced().get_parent_collision_ignore()
    }

    pub fn set_parent_collision_ignore(&self, path: &str) {
        self.advanced()
            .set_parent_collision_ignore(&NodePath::from(path));
    }

    pub fn disable_mode(&self) -> DisableMode {
        self.advanced().get_disable_mode()
    }

    pub fn set_disable_mode(&self, mode: DisableMode) {
        self.advanced().set_disable_mode(mode);
    }

    pub fn simulation_precision(&self) -> i64 {
        self.advanced().get_simulation_precision()
    }

    pub fn set_simulation_precision(&self, precision: i64) {
        self.advanced().set_simulation_precision(precision);
    }

    pub fn total_mass(&self) -> f64 {
        self.advanced().get_total_mass()
    }

    pub fn set_total_mass(&self, mass: f64) {
        self.advanced().set_total_mass(mass);
    }

    pub fn linear_stiffness(&self) -> f64 {
        self.advanced().get_linear_stiffness()
    }

    /// Stiffness from 0 (loose) to 1 (rigid).
    pub fn set_linear_stiffness(&self, stiffness: f64) {
        self.advanced().set_linear_stiffness(stiffness);
    }

    pub fn pressure_coefficient(&self) -> f64 {
        self.advanced().get_pressure_coefficient()
    }

    pub fn set_pressure_coefficient(&self, coefficient: f64) {
        self.advanced().set_pressure_coefficient(coefficient);
    }

    pub fn damping_coefficient(&self) -> f64 {
        self.advanced().get_damping_coefficient()
    }

    pub fn set_damping_coefficient(&self, coefficient: f64) {
        self.advanced().set_damping_coefficient(coefficient);
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.advanced().get_drag_coefficient()
    }

    pub fn set_drag_coefficient(&self, coefficient: f64) {
        self.advanced().set_drag_coefficient(coefficient);
    }

    /// Current position of simulated point `index`.
    pub fn point_transform(&self, index: i64) -> Vector3 {
        self.advanced().get_point_transform(index)
    }

    /// Pin point `index` in place, optionally attached to the node at `attachment`.
    pub fn pin_point(&self, index: i64, attachment: Option<&str>) {
        let path = NodePath::from(attachment.unwrap_or_default());
        self.advanced().set_point_pinned(index, true, &path, -1);
    }

    pub fn unpin_point(&self, index: i64) {
        self.advanced()
            .set_point_pinned(index, false, &NodePath::default(), -1);
    }

    pub fn is_point_pinned(&self, index: i64) -> bool {
        self.advanced().is_point_pinned(index)
    }

    pub fn ray_pickable(&self) -> bool {
        self.advanced().is_ray_pickable()
    }

    pub fn set_ray_pickable(&self, pickable: bool) {
        self.advanced().set_ray_pickable(pickable);
    }
}
