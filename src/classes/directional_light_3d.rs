use crate::Obj;
use crate::classes::light_3d::Param;
use crate::classes::{Light3D, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    /// Shadow map layout.
    pub struct ShadowMode {
        ORTHOGONAL = 0,
        PARALLEL_2_SPLITS = 1,
        PARALLEL_4_SPLITS = 2,
    }
}

engine_enum! {
    /// Whether the light affects the scene, the sky, or both.
    pub struct SkyMode {
        LIGHT_AND_SKY = 0,
        LIGHT_ONLY = 1,
        SKY_ONLY = 2,
    }
}

engine_class! {
    /// Infinitely distant light, such as the sun.
    pub struct DirectionalLight3D: "DirectionalLight3D" => Light3D;
    refcounted: false;
    ancestors {
        as_light_3d => Light3D,
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_shadow_mode(mode: ShadowMode) => set "directional_shadow_mode" = 1261211726;
        get_shadow_mode() -> ShadowMode => get "directional_shadow_mode" = 2765228544;
        set_blend_splits(enabled: bool) => set "directional_shadow_blend_splits" = 2586408642;
        is_blend_splits_enabled() -> bool => get "directional_shadow_blend_splits" = 36873697;
        set_sky_mode(mode: SkyMode) => set "sky_mode" = 2691194817;
        get_sky_mode() -> SkyMode => get "sky_mode" = 3819982774;
    }
}

impl<'lt> Obj<'lt, DirectionalLight3D> {
    pub fn shadow_mode(&self) -> ShadowMode {
        self.advanced().get_shadow_mode()
    }

    pub fn set_shadow_mode(&self, mode: ShadowMode) {
        self.advanced().set_shadow_mode(mode);
    }

    pub fn blend_splits(&self) -> bool {
        self.advanced().is_blend_splits_enabled()
    }

    pub fn set_blend_splits(&self, enabled: bool) {
        self.advanced().set_blend_splits(enabled);
    }

    pub fn sky_mode(&self) -> SkyMode {
        self.advanced().get_sky_mode()
    }

    pub fn set_sky_mode(&self, mode: SkyMode) {
        self.advanced().set_sky_mode(mode);
    }

    /// Distance beyond which no shadows are drawn.
    pub fn shadow_max_distance(&self) -> f64 {
        self.param(Param::SHADOW_MAX_DISTANCE)
    }

    pub fn set_shadow_max_distance(&self, distance: f64) {
        self.set_param(Param::SHADOW_MAX_DISTANCE, distance);
    }

    /// Split offsets for the parallel shadow modes, as fractions of the
    /// maximum distance.
    pub fn split_offsets(&self) -> [f64; 3] {
        [
            self.param(Param::SHADOW_SPLIT_1_OFFSET),
            self.param(Param::SHADOW_SPLIT_2_OFFSET),
            self.param(Param::SHADOW_SPLIT_3_OFFSET),
        ]
    }

    pub fn set_split_offsets(&self, offsets: [f64; 3]) {
        self.set_param(Param::SHADOW_SPLIT_1_OFFSET, offsets[0]);
        self.set_param(Param::SHADOW_SPLIT_2_OFFSET, offsets[1]);
        self.set_param(Param::SHADOW_SPLIT_3_OFFSET, offsets[2]);
    }
}
