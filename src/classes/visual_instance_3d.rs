use gdbind_core::{Aabb, Rid};

use crate::Obj;
use crate::classes::{Node, Node3D, Object};
use crate::macros::engine_class;

engine_class! {
    /// Node that draws something through the rendering server.
    pub struct VisualInstance3D: "VisualInstance3D" => Node3D;
    refcounted: false;
    ancestors { as_node_3d => Node3D, as_node => Node, as_object => Object }
    methods<'lt> {
        set_base(base: Rid) => set "base" = 2722037293;
        get_base() -> Rid => get "base" = 2944877500;
        get_instance() -> Rid = 2944877500;
        set_layer_mask(mask: i64) => set "layers" = 1286410249;
        get_layer_mask() -> i64 => get "layers" = 3905245786;
        set_layer_mask_value(layer_number: i64, value: bool) = 300928843;
        get_layer_mask_value(layer_number: i64) -> bool = 1116898809;
        set_sorting_offset(offset: f64) => set "sorting_offset" = 373806689;
        get_sorting_offset() -> f64 => get "sorting_offset" = 1740695150;
        set_sorting_use_aabb_center(enabled: bool) => set "sorting_use_aabb_center" = 2586408642;
        is_sorting_use_aabb_center() -> bool => get "sorting_use_aabb_center" = 36873697;
        get_aabb() -> Aabb = 1068685055;
    }
}

impl<'lt> Obj<'lt, VisualInstance3D> {
    pub fn base(&self) -> Rid {
        self.advanced().get_base()
    }

    pub fn set_base(&self, base: Rid) {
        self.advanced().set_base(base);
    }

    pub fn instance(&self) -> Rid {
        self.advanced().get_instance()
    }

    /// Render layers as a bit mask, layer 1 in bit 0.
    pub fn layers(&self) -> i64 {
        self.advanced().get_layer_mask()
    }

    pub fn set_layers(&self, mask: i64) {
        self.advanced().set_layer_mask(mask);
    }

    /// Whether render layer `layer` (1 to 20) is enabled.
    pub fn layer(&self, layer: i64) -> bool {
        self.advanced().get_layer_mask_value(layer)
    }

    pub fn set_layer(&self, layer: i64, enabled: bool) {
        self.advanced().set_layer_mask_value(layer, enabled);
    }

    pub fn sorting_offset(&self) -> f64 {
        self.advanced().get_sorting_offset()
    }

    pub fn set_sorting_offset(&self, offset: f64) {
        self.advanced().set_sorting_offset(offset);
    }

    pub fn sorting_use_aabb_center(&self) -> bool {
        self.advanced().is_sorting_use_aabb_center()
    }

    pub fn set_sorting_use_aabb_center(&self, enabled: bool) {
        self.advanced().set_sorting_use_aabb_center(enabled);
    }

    pub fn aabb(&self) -> Aabb {
        self.advanced().get_aabb()
    }
}
