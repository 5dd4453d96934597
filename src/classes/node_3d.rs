use gdbind_core::{Transform3D, Vector3};

use crate::Obj;
use crate::classes::{Node, Object};
use crate::macros::engine_class;

engine_class! {
    /// Node with a 3D transform.
    pub struct Node3D: "Node3D" => Node;
    refcounted: false;
    ancestors { as_node => Node, as_object => Object }
    methods<'lt> {
        set_transform(local: Transform3D) => set "transform" = 2952846383;
        get_transform() -> Transform3D => get "transform" = 3229777777;
        set_global_transform(global: Transform3D) => set "global_transform" = 2952846383;
        get_global_transform() -> Transform3D => get "global_transform" = 3229777777;
        set_position(position: Vector3) => set "position" = 3460891852;
        get_position() -> Vector3 => get "position" = 3360562783;
        set_rotation(euler_radians: Vector3) => set "rotation" = 3460891852;
        get_rotation() -> Vector3 => get "rotation" = 3360562783;
        set_scale(scale: Vector3) => set "scale" = 3460891852;
        get_scale() -> Vector3 => get "scale" = 3360562783;
        set_visible(visible: bool) => set "visible" = 2586408642;
        is_visible() -> bool => get "visible" = 36873697;
        show() = 3218959716;
        hide() = 3218959716;
        look_at(target: Vector3, up: Vector3, use_model_front: bool) = 2882425029 | 3123400617;
        rotate_y(angle: f64) = 373806689;
        translate(offset: Vector3) = 3460891852;
        get_parent_node_3d() -> Option<Obj<'lt, Node3D>> = 151077316;
    }
}

impl<'lt> Obj<'lt, Node3D> {
    pub fn transform(&self) -> Transform3D {
        self.advanced().get_transform()
    }

    pub fn set_transform(&self, transform: Transform3D) {
        self.advanced().set_transform(transform);
    }

    pub fn global_transform(&self) -> Transform3D {
        self.advanced().get_global_transform()
    }

    pub fn set_global_transform(&self, transform: Transform3D) {
        self.advanced().set_global_transform(transform);
    }

    pub fn position(&self) -> Vector3 {
        self.advanced().get_position()
    }

    pub fn set_position(&self, position: Vector3) {
        self.advanced().set_position(position);
    }

    /// Euler angles in radians.
    pub fn rotation(&self) -> Vector3 {
        self.advanced().get_rotation()
    }

    pub fn set_rotation(&self, euler_radians: Vector3) {
        self.advanced().set_rotation(euler_radians);
    }

    pub fn scale(&self) -> Vector3 {
        self.advanced().get_scale()
    }

    pub fn set_scale(&self, scale: Vector3) {
        self.advanced().set_scale(scale);
    }

    pub fn is_visible(&self) -> bool {
        self.advanced().is_visible()
    }

    pub fn set_visible(&self, visible: bool) {
        self.advanced().set_visible(visible);
    }

    pub fn show(&self) {
        self.advanced().show();
    }

    pub fn hide(&self) {
        self.advanced().hide();
    }

    /// Rotate so the node's -Z axis points at `target`, with +Y up.
    pub fn look_at(&self, target: Vector3) {
        self.advanced().look_at(target, Vector3::UP, false);
    }

    pub fn rotate_y(&self, angle: f64) {
        self.advanced().rotate_y(angle);
    }

    pub fn translate(&self, offset: Vector3) {
        self.advanced().translate(offset);
    }

    pub fn parent_node_3d(&self) -> Option<Obj<'lt, Node3D>> {
        self.advanced().get_parent_node_3d()
    }
}
