use crate::Obj;
use crate::classes::{LightmapGiData, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    pub struct BakeQuality {
        LOW = 0,
        MEDIUM = 1,
        HIGH = 2,
        ULTRA = 3,
    }
}

engine_enum! {
    /// Density of the automatically generated light probes.
    pub struct GenerateProbes {
        DISABLED = 0,
        SUBDIV_4 = 1,
        SUBDIV_8 = 2,
        SUBDIV_16 = 3,
        SUBDIV_32 = 4,
    }
}

engine_enum! {
    /// Result of a bake.
    pub struct BakeError {
        OK = 0,
        NO_SCENE_ROOT = 1,
        FOREIGN_DATA = 2,
        NO_LIGHTMAPPER = 3,
        NO_SAVE_PATH = 4,
        NO_MESHES = 5,
        MESHES_INVALID = 6,
        CANT_CREATE_IMAGE = 7,
        USER_ABORTED = 8,
        TEXTURE_SIZE_TOO_SMALL = 9,
    }
}

engine_enum! {
    /// Source of environment lighting during the bake.
    pub struct EnvironmentMode {
        DISABLED = 0,
        SCENE = 1,
        CUSTOM_SKY = 2,
        CUSTOM_COLOR = 3,
    }
}

engine_class! {
    /// Baked lightmap global illumination.
    pub struct LightmapGi: "LightmapGI" => VisualInstance3D;
    refcounted: false;
    ancestors {
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_light_data(data: Option<&Obj<'_, LightmapGiData>>) => set "light_data" = 1790597277;
        get_light_data() -> Option<Obj<'lt, LightmapGiData>> => get "light_data" = 290354153;
        set_bake_quality(bake_quality: BakeQuality) => set "quality" = 1192215803;
        get_bake_quality() -> BakeQuality => get "quality" = 688832735;
        set_bounces(bounces: i64) => set "bounces" = 1286410249;
        get_bounces() -> i64 => get "bounces" = 3905245786;
        set_bounce_indirect_energy(bounce_indirect_energy: f64) => set "bounce_indirect_energy" = 373806689;
        get_bounce_indirect_energy() -> f64 => get "bounce_indirect_energy" = 1740695150;
        set_generate_probes(subdivision: GenerateProbes) => set "generate_probes_subdiv" = 549981046;
        get_generate_probes() -> GenerateProbes => get "generate_probes_subdiv" = 3930596226;
        set_bias(bias: f64) => set "bias" = 373806689;
        get_bias() -> f64 => get "bias" = 1740695150;
        set_environment_mode(mode: EnvironmentMode) => set "environment_mode" = 2282650285;
        get_environment_mode() -> EnvironmentMode => get "environment_mode" = 4128646479;
        set_texel_scale(texel_scale: f64) => set "texel_scale" = 373806689;
        get_texel_scale() -> f64 => get "texel_scale" = 1740695150;
        set_max_texture_size(max_texture_size: i64) => set "max_texture_size" = 1286410249;
        get_max_texture_size() -> i64 => get "max_texture_size" = 3905245786;
        set_use_denoiser(use_denoiser: bool) => set "use_denoiser" = 2586408642;
        is_using_denoiser() -> bool => get "use_denoiser" = 36873697;
        set_denoiser_strength(denoiser_strength: f64) => set "denoiser_strength" = 373806689 since(4, 3);
        get_denoiser_strength() -> f64 => get "denoiser_strength" = 1740695150 since(4, 3);
        set_interior(enable: bool) => set "interior" = 2586408642;
        is_interior() -> bool => get "interior" = 36873697;
        set_directional(directional: bool) => set "directional" = 2586408642;
        is_directional() -> bool => get "directional" = 36873697;
    }
}

impl<'lt> Obj<'lt, LightmapGi> {
    pub fn light_data(&self) -> Option<Obj<'lt, LightmapGiData>> {
        self.advanced().get_light_data()
    }

    pub fn set_light_data(&self, data: Option<&Obj<'_, LightmapGiData>>) {
        self.advanced().set_light_data(data);
    }

    pub fn quality(&self) -> BakeQuality {
        self.advanced().get_bake_quality()
    }

    pub fn set_quality(&self, quality: BakeQuality) {
        self.advanced().set_bake_quality(quality);
    }

    pub fn bounces(&self) -> i64 {
        self.advanced().get_bounces()
    }

    pub fn set_bounces(&self, bounces: i64) {
        self.advanced().set_bounces(bounces);
    }

    pub fn bounce_indirect_energy(&self) -> f64 {
        self.advanced().get_bounce_indirect_energy()
    }

    pub fn set_bounce_indirect_energy(&self, energy: f64) {
        self.advanced().set_bounce_indirect_energy(energy);
    }

    pub fn generate_probes(&self) -> GenerateProbes {
        self.advanced().get_generate_probes()
    }

    pub fn set_generate_probes(&self, subdivision: GenerateProbes) {
        self.advanced().set_generate_probes(subdivision);
    }

    pub fn bias(&self) -> f64 {
        self.advanced().get_bias()
    }

    pub fn set_bias(&self, bias: f64) {
        self.advanced().set_bias(bias);
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.advanced().get_environment_mode()
    }

    pub fn set_environment_mode(&self, mode: EnvironmentMode) {
        self.advanced().set_environment_mode(mode);
    }

    pub fn texel_scale(&self) -> f64 {
        self.advanced().get_texel_scale()
    }

    pub fn set_texel_scale(&self, scale: f64) {
        self.advanced().set_texel_scale(scale);
    }

    pub fn max_texture_size(&self) -> i64 {
        self.advanced().get_max_texture_size()
    }

    pub fn set_max_texture_size(&self, size: i64) {
        self.advanced().set_max_texture_size(size);
    }

    pub fn use_denoiser(&self) -> bool {
        self.advanced().is_using_denoiser()
    }

    pub fn set_use_denoiser(&self, enable: bool) {
        self.advanced().set_use_denoiser(enable);
    }

    /// Requires engine 4.3; panics on older engines.
    pub fn denoiser_strength(&self) -> f64 {
        self.advanced().get_denoiser_strength()
    }

    pub fn set_denoiser_strength(&self, strength: f64) {
        self.advanced().set_denoiser_strength(strength);
    }

    pub fn interior(&self) -> bool {
        self.advanced().is_interior()
    }

    pub fn set_interior(&self, interior: bool) {
        self.advanced().set_interior(interior);
    }

    pub fn directional(&self) -> bool {
        self.advanced().is_directional()
    }

    pub fn set_directional(&self, directional: bool) {
        self.advanced().set_directional(directional);
    }
}
