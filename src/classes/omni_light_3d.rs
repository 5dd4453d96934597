use crate::Obj;
use crate::classes::light_3d::Param;
use crate::classes::{Light3D, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    pub struct ShadowMode {
        DUAL_PARABOLOID = 0,
        CUBE = 1,
    }
}

engine_class! {
    /// Point light emitting in all directions.
    pub struct OmniLight3D: "OmniLight3D" => Light3D;
    refcounted: false;
    ancestors {
        as_light_3d => Light3D,
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_shadow_mode(mode: ShadowMode) => set "omni_shadow_mode" = 121862228;
        get_shadow_mode() -> ShadowMode => get "omni_shadow_mode" = 4181586331;
    }
}

impl<'lt> Obj<'lt, OmniLight3D> {
    pub fn shadow_mode(&self) -> ShadowMode {
        self.advanced().get_shadow_mode()
    }

    pub fn set_shadow_mode(&self, mode: ShadowMode) {
        self.advanced().set_shadow_mode(mode);
    }

    /// Radius of the light's reach.
    pub fn omni_range(&self) -> f64 {
        self.param(Param::RANGE)
    }

    pub fn set_omni_range(&self, range: f64) {
        self.set_param(Param::RANGE, range);
    }

    pub fn omni_attenuation(&self) -> f64 {
        self.param(Param::ATTENUATION)
    }

    pub fn set_omni_attenuation(&self, attenuation: f64) {
        self.set_param(Param::ATTENUATION, attenuation);
    }
}
