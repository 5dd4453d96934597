use crate::Obj;
use crate::classes::{Node, Node3D, Object, Occluder3D, VisualInstance3D};
use crate::macros::engine_class;

engine_class! {
    /// Places an `Occluder3D` in the scene for occlusion culling.
    pub struct OccluderInstance3D: "OccluderInstance3D" => VisualInstance3D;
    refcounted: false;
    ancestors {
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_bake_mask(mask: i64) => set "bake_mask" = 1286410249;
        get_bake_mask() -> i64 => get "bake_mask" = 3905245786;
        set_bake_mask_value(layer_number: i64, value: bool) = 300928843;
        get_bake_mask_value(layer_number: i64) -> bool = 1116898809;
        set_bake_simplification_distance(simplification_distance: f64)
            => set "bake_simplification_distance" = 373806689;
        get_bake_simplification_distance() -> f64 => get "bake_simplification_distance" = 1740695150;
        set_occluder(occluder: Option<&Obj<'_, Occluder3D>>) => set "occluder" = 1664878165;
        get_occluder() -> Option<Obj<'lt, Occluder3D>> => get "occluder" = 1696836198;
    }
}

impl<'lt> Obj<'lt, OccluderInstance3D> {
    pub fn bake_mask(&self) -> i64 {
        self.advanced().get_bake_mask()
    }

    pub fn set_bake_mask(&self, mask: i64) {
        self.advanced().set_bake_mask(mask);
    }

    /// Whether visual layer `layer` (1 to 32) takes part in occluder baking.
    pub fn bake_layer(&self, layer: i64) -> bool {
        self.advanced().get_bake_mask_value(layer)
    }

    pub fn set_bake_layer(&self, layer: i64, enabled: bool) {
        self.advanced().set_bake_mask_value(layer, enabled);
    }

    pub fn bake_simplification_distance(&self) -> f64 {
        self.advanced().get_bake_simplification_distance()
    }

    pub fn set_bake_simplification_distance(&self, distance: f64) {
        self.advanced().set_bake_simplification_distance(distance);
    }

    pub fn occluder(&self) -> Option<Obj<'lt, Occluder3D>> {
        self.advanced().get_occluder()
    }

    pub fn set_occluder(&self, occluder: Option<&Obj<'_, Occluder3D>>) {
        self.advanced().set_occluder(occluder);
    }
}
