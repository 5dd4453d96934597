use gdbind_core::{Aabb, StringName, Value};

use crate::Obj;
use crate::classes::{Material, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    pub struct ShadowCastingSetting {
        OFF = 0,
        ON = 1,
        DOUBLE_SIDED = 2,
        SHADOWS_ONLY = 3,
    }
}

engine_enum! {
    /// Global illumination contribution of the instance.
    pub struct GiMode {
        DISABLED = 0,
        STATIC = 1,
        DYNAMIC = 2,
    }
}

engine_enum! {
    /// Lightmap texel density relative to the `LightmapGI` setting.
    pub struct LightmapScale {
        SCALE_1X = 0,
        SCALE_2X = 1,
        SCALE_4X = 2,
        SCALE_8X = 3,
        MAX = 4,
    }
}

engine_enum! {
    pub struct VisibilityRangeFadeMode {
        DISABLED = 0,
        SELF = 1,
        DEPENDENCIES = 2,
    }
}

engine_class! {
    /// Visual instance with geometry: material overrides, shadows, LOD and
    /// visibility ranges.
    pub struct GeometryInstance3D: "GeometryInstance3D" => VisualInstance3D;
    refcounted: false;
    ancestors {
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_material_override(material: Option<&Obj<'_, Material>>) => set "material_override" = 2757459619;
        get_material_override() -> Option<Obj<'lt, Material>> => get "material_override" = 5934680;
        set_material_overlay(material: Option<&Obj<'_, Material>>) => set "material_overlay" = 2757459619;
        get_material_overlay() -> Option<Obj<'lt, Material>> => get "material_overlay" = 5934680;
        set_cast_shadows_setting(shadow_casting_setting: ShadowCastingSetting) => set "cast_shadow" = 856677339;
        get_cast_shadows_setting() -> ShadowCastingSetting => get "cast_shadow" = 3383019359;
        set_lod_bias(bias: f64) => set "lod_bias" = 373806689;
        get_lod_bias() -> f64 => get "lod_bias" = 1740695150;
        set_transparency(transparency: f64) => set "transparency" = 373806689;
        get_transparency() -> f64 => get "transparency" = 1740695150;
        set_visibility_range_end_margin(distance: f64) => set "visibility_range_end_margin" = 373806689;
        get_visibility_range_end_margin() -> f64 => get "visibility_range_end_margin" = 1740695150;
        set_visibility_range_end(distance: f64) => set "visibility_range_end" = 373806689;
        get_visibility_range_end() -> f64 => get "visibility_range_end" = 1740695150;
        set_visibility_range_begin_margin(distance: f64) => set "visibility_range_begin_margin" = 373806689;
        get_visibility_range_begin_margin() -> f64 => get "visibility_range_begin_margin" = 1740695150;
        set_visibility_range_begin(distance: f64) => set "visibility_range_begin" = 373806689;
        get_visibility_range_begin() -> f64 => get "visibility_range_begin" = 1740695150;
        set_visibility_range_fade_mode(mode: VisibilityRangeFadeMode) => set "visibility_range_fade_mode" = 1440117808;
        get_visibility_range_fade_mode() -> VisibilityRangeFadeMode => get "visibility_range_fade_mode" = 2067221882;
        set_instance_shader_parameter(name: &StringName, value: &Value) => set "instance_shader_parameter" = 3776071444;
        get_instance_shader_parameter(name: &StringName) -> Value => get "instance_shader_parameter" = 2760726917;
        set_extra_cull_margin(margin: f64) => set "extra_cull_margin" = 373806689;
        get_extra_cull_margin() -> f64 => get "extra_cull_margin" = 1740695150;
        set_lightmap_scale(scale: LightmapScale) => set "gi_lightmap_scale" = 2462696582;
        get_lightmap_scale() -> LightmapScale => get "gi_lightmap_scale" = 798767852;
        set_gi_mode(mode: GiMode) => set "gi_mode" = 2548557163;
        get_gi_mode() -> GiMode => get "gi_mode" = 2188566509;
        set_ignore_occlusion_culling(ignore_culling: bool) => set "ignore_occlusion_culling" = 2586408642;
        is_ignoring_occlusion_culling() -> bool => get "ignore_occlusion_culling" = 2240911060;
        set_custom_aabb(aabb: Aabb) => set "custom_aabb" = 259215842;
        get_custom_aabb() -> Aabb => get "custom_aabb" = 1068685055;
    }
}

/// Visibility range in world units, with fade margins at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibilityRange {
    pub begin: f64,
    pub begin_margin: f64,
    /// 0 disables the far limit.
    pub end: f64,
    pub end_margin: f64,
    pub fade_mode: VisibilityRangeFadeMode,
}

impl<'lt> Obj<'lt, GeometryInstance3D> {
    pub fn material_override(&self) -> Option<Obj<'lt, Material>> {
        self.advanced().get_material_override()
    }

    pub fn set_material_override(&self, material: Option<&Obj<'_, Material>>) {
        self.advanced().set_material_override(material);
    }

    pub fn material_overlay(&self) -> Option<Obj<'lt, Material>> {
        self.advanced().get_material_overlay()
    }

    pub fn set_material_overlay(&self, material: Option<&Obj<'_, Material>>) {
        self.advanced().set_material_overlay(material);
    }

    pub fn cast_shadow(&self) -> ShadowCastingSetting {
        self.advanced().get_cast_shadows_setting()
    }

    pub fn set_cast_shadow(&self, setting: ShadowCastingSetting) {
        self.advanced().set_cast_shadows_setting(setting);
    }

    pub fn lod_bias(&self) -> f64 {
        self.advanced().get_lod_bias()
    }

    pub fn set_lod_bias(&self, bias: f64) {
        self.advanced().set_lod_bias(bias);
    }

    pub fn transparency(&self) -> f64 {
        self.advanced().get_transparency()
    }

    /// 0 is opaque, 1 fully transparent.
    pub fn set_transparency(&self, transparency: f64) {
        self.advanced().set_transparency(transparency);
    }

    pub fn visibility_range(&self) -> VisibilityRange {
        let advanced = self.advanced();
        VisibilityRange {
            begin: advanced.get_visibility_range_begin(),
            begin_margin: advanced.get_visibility_range_begin_margin(),
            end: advanced.get_visibility_range_end(),
            end_margin: advanced.get_visibility_range_end_margin(),
            fade_mode: advanced.get_visibility_range_fade_mode(),
        }
    }

    pub fn set_visibility_range(&self, range: VisibilityRange) {
        let advanced = self.advanced();
        advanced.set_visibility_range_begin(range.begin);
        advanced.set_visibility_range_begin_margin(range.begin_margin);
        advanced.set_visibility_range_end(range.end);
        advanced.set_visibility_range_end_margin(range.end_margin);
        advanced.set_visibility_range_fade_mode(range.fade_mode);
    }

    pub fn instance_shader_parameter(&self, name: &str) -> Value {
        self.advanced().get_instance_shader_parameter(&StringName::from(name))
    }

    pub fn set_instance_shader_parameter(&self, name: &str, value: impl Into<Value>) {
        self.advanced()
            .set_instance_shader_parameter(&StringName::from(name), &value.into());
    }

    pub fn extra_cull_margin(&self) -> f64 {
        self.advanced().get_extra_cull_margin()
    }

    pub fn set_extra_cull_margin(&self, margin: f64) {
        self.advanced().set_extra_cull_margin(margin);
    }

    pub fn lightmap_scale(&self) -> LightmapScale {
        self.advanced().get_lightmap_scale()
    }

    pub fn set_lightmap_scale(&self, scale: LightmapScale) {
        self.advanced().set_lightmap_scale(scale);
    }

    pub fn gi_mode(&self) -> GiMode {
        self.advanced().get_gi_mode()
    }

    pub fn set_gi_mode(&self, mode: GiMode) {
        self.advanced().set_gi_mode(mode);
    }

    pub fn ignores_occlusion_culling(&self) -> bool {
        self.advanced().is_ignoring_occlusion_culling()
    }

    pub fn set_ignore_occlusion_culling(&self, ignore: bool) {
        self.advanced().set_ignore_occlusion_culling(ignore);
    }

    pub fn custom_aabb(&self) -> Aabb {
        self.advanced().get_custom_aabb()
    }

    pub fn set_custom_aabb(&self, aabb: Aabb) {
        self.advanced().set_custom_aabb(aabb);
    }
}
