use gdbind_core::Color;

use crate::Obj;
use crate::classes::{Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    /// Scalar light parameters read and written through `get_param`/`set_param`.
    pub struct Param {
        ENERGY = 0,
        INDIRECT_ENERGY = 1,
        VOLUMETRIC_FOG_ENERGY = 2,
        SPECULAR = 3,
        RANGE = 4,
        SIZE = 5,
        ATTENUATION = 6,
        SPOT_RANGE = 7,
        SPOT_ATTENUATION = 8,
        SPOT_ANGLE = 9,
        SPOT_ANGLE_ATTENUATION = 10,
        SHADOW_MAX_DISTANCE = 11,
        SHADOW_SPLIT_1_OFFSET = 12,
        SHADOW_SPLIT_2_OFFSET = 13,
        SHADOW_SPLIT_3_OFFSET = 14,
        SHADOW_FADE_START = 15,
        SHADOW_NORMAL_BIAS = 16,
        SHADOW_BIAS = 17,
        SHADOW_PANCAKE_SIZE = 18,
        SHADOW_OPACITY = 19,
        SHADOW_BLUR = 20,
        TRANSMITTANCE_BIAS = 21,
        INTENSITY = 22,
        MAX = 23,
    }
}

engine_enum! {
    /// How the light takes part in baked global illumination.
    pub struct BakeMode {
        DISABLED = 0,
        STATIC = 1,
        DYNAMIC = 2,
    }
}

engine_class! {
    /// Base of every 3D light.
    pub struct Light3D: "Light3D" => VisualInstance3D;
    refcounted: false;
    ancestors {
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_editor_only(editor_only: bool) => set "editor_only" = 2586408642;
        is_editor_only() -> bool => get "editor_only" = 36873697;
        set_param(param: Param, value: f64) => set "param" = 1722734213;
        get_param(param: Param) -> f64 => get "param" = 1844084987;
        set_shadow(enabled: bool) => set "shadow_enabled" = 2586408642;
        has_shadow() -> bool => get "shadow_enabled" = 36873697;
        set_negative(enabled: bool) => set "light_negative" = 2586408642;
        is_negative() -> bool => get "light_negative" = 36873697;
        set_cull_mask(cull_mask: i64) => set "light_cull_mask" = 1286410249;
        get_cull_mask() -> i64 => get "light_cull_mask" = 3905245786;
        set_color(color: Color) => set "light_color" = 2920490490;
        get_color() -> Color => get "light_color" = 3444240500;
        set_shadow_reverse_cull_face(enable: bool) => set "shadow_reverse_cull_face" = 2586408642;
        get_shadow_reverse_cull_face() -> bool => get "shadow_reverse_cull_face" = 36873697;
        set_bake_mode(bake_mode: BakeMode) => set "light_bake_mode" = 37739303;
        get_bake_mode() -> BakeMode => get "light_bake_mode" = 371737608;
        set_temperature(temperature: f64) => set "light_temperature" = 373806689;
        get_temperature() -> f64 => get "light_temperature" = 1740695150;
        get_correlated_color() -> Color = 3444240500;
    }
}

impl<'lt> Obj<'lt, Light3D> {
    pub fn param(&self, param: Param) -> f64 {
        self.advanced().get_param(param)
    }

    pub fn set_param(&self, param: Param, value: f64) {
        self.advanced().set_param(param, value);
    }

    pub fn energy(&self) -> f64 {
        self.param(Param::ENERGY)
    }

    pub fn set_energy(&self, energy: f64) {
        self.set_param(Param::ENERGY, energy);
    }

    pub fn indirect_energy(&self) -> f64 {
        self.param(Param::INDIRECT_ENERGY)
    }

    pub fn set_indirect_energy(&self, energy: f64) {
        self.set_param(Param::INDIRECT_ENERGY, energy);
    }

    pub fn specular(&self) -> f64 {
        self.param(Param::SPECULAR)
    }

    pub fn set_specular(&self, specular: f64) {
        self.set_param(Param::SPECULAR, specular);
    }

    pub fn editor_only(&self) -> bool {
        self.advanced().is_editor_only()
    }

    pub fn set_editor_only(&self, editor_only: bool) {
        self.advanced().set_editor_only(editor_only);
    }

    pub fn shadow_enabled(&self) -> bool {
        self.advanced().has_shadow()
    }

    pub fn set_shadow_enabled(&self, enabled: bool) {
        self.advanced().set_shadow(enabled);
    }

    pub fn negative(&self) -> bool {
        self.advanced().is_negative()
    }

    pub fn set_negative(&self, negative: bool) {
        self.advanced().set_negative(negative);
    }

    pub fn cull_mask(&self) -> i64 {
        self.advanced().get_cull_mask()
    }

    pub fn set_cull_mask(&self, mask: i64) {
        self.advanced().set_cull_mask(mask);
    }

    pub fn color(&self) -> Color {
        self.advanced().get_color()
    }

    pub fn set_color(&self, color: Color) {
        self.advanced().set_color(color);
    }

    pub fn shadow_reverse_cull_face(&self) -> bool {
        self.advanced().get_shadow_reverse_cull_face()
    }

    pub fn set_shadow_reverse_cull_face(&self, enable: bool) {
        self.advanced().set_shadow_reverse_cull_face(enable);
    }

    pub fn bake_mode(&self) -> BakeMode {
        self.advanced().get_bake_mode()
    }

    pub fn set_bake_mode(&self, mode: BakeMode) {
        self.advanced().set_bake_mode(mode);
    }

    /// Color temperature in kelvin, used when physical light units are on.
    pub fn temperature(&self) -> f64 {
        self.advanced().get_temperature()
    }

    pub fn set_temperature(&self, kelvin: f64) {
        self.advanced().set_temperature(kelvin);
    }

    pub fn correlated_color(&self) -> Color {
        self.advanced().get_correlated_color()
    }
}
