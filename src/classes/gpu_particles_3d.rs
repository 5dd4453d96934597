use gdbind_core::{Aabb, Callable, Color, ErrorCode, Transform3D, Vector3};

use crate::Obj;
use crate::classes::{GeometryInstance3D, Material, Mesh, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    pub struct DrawOrder {
        INDEX = 0,
        LIFETIME = 1,
        REVERSE_LIFETIME = 2,
        VIEW_DEPTH = 3,
    }
}

engine_enum! {
    /// Bits accepted by `emit_particle`, selecting which arguments apply.
    pub struct EmitFlags {
        POSITION = 1,
        ROTATION_SCALE = 2,
        VELOCITY = 4,
        COLOR = 8,
        CUSTOM = 16,
    }
}

engine_class! {
    /// GPU-based 3D particle emitter driven by a process material.
    pub struct GpuParticles3D: "GPUParticles3D" => GeometryInstance3D;
    refcounted: false;
    ancestors {
        as_geometry_instance_3d => GeometryInstance3D,
        as_visual_instance_3d => VisualInstance3D,
        as_node_3d => Node3D,
        as_node => Node,
        as_object => Object,
    }
    methods<'lt> {
        set_emitting(emitting: bool) => set "emitting" = 2586408642;
        is_emitting() -> bool => get "emitting" = 36873697;
        set_amount(amount: i64) => set "amount" = 1286410249;
        get_amount() -> i64 => get "amount" = 3905245786;
        set_lifetime(secs: f64) => set "lifetime" = 373806689;
        get_lifetime() -> f64 => get "lifetime" = 1740695150;
        set_one_shot(enable: bool) => set "one_shot" = 2586408642;
        get_one_shot() -> bool => get "one_shot" = 36873697;
        set_pre_process_time(secs: f64) => set "preprocess" = 373806689;
        get_pre_process_time() -> f64 => get "preprocess" = 1740695150;
        set_explosiveness_ratio(ratio: f64) => set "explosiveness" = 373806689;
        get_explosiveness_ratio() -> f64 => get "explosiveness" = 1740695150;
        set_randomness_ratio(ratio: f64) => set "randomness" = 373806689;
        get_randomness_ratio() -> f64 => get "randomness" = 1740695150;
        set_visibility_aabb(aabb: Aabb) => set "visibility_aabb" = 259215842;
        get_visibility_aabb() -> Aabb => get "visibility_aabb" = 1068685055;
        set_speed_scale(scale: f64) => set "speed_scale" = 373806689;
        get_speed_scale() -> f64 => get "speed_scale" = 1740695150;
        set_fixed_fps(fps: i64) => set "fixed_fps" = 1286410249;
        get_fixed_fps() -> i64 => get "fixed_fps" = 3905245786;
        set_interpolate(enable: bool) => set "interpolate" = 2586408642;
        get_interpolate() -> bool => get "interpolate" = 36873697;
        set_process_material(material: Option<&Obj<'_, Material>>) => set "process_material" = 2757459619;
        get_process_material() -> Option<Obj<'lt, Material>> => get "process_material" = 5934680;
        set_draw_passes(passes: i64) => set "draw_passes" = 1286410249;
        get_draw_passes() -> i64 => get "draw_passes" = 3905245786;
        set_draw_pass_mesh(pass: i64, mesh: Option<&Obj<'_, Mesh>>) => set "draw_pass" = 969122797;
        get_draw_pass_mesh(pass: i64) -> Option<Obj<'lt, Mesh>> => get "draw_pass" = 1576363275;
        set_draw_order(order: DrawOrder) => set "draw_order" = 1208074815;
        get_draw_order() -> DrawOrder => get "draw_order" = 3770381780;
        set_trail_enabled(enabled: bool) => set "trail_enabled" = 2586408642;
        is_trail_enabled() -> bool => get "trail_enabled" = 36873697;
        set_trail_lifetime(secs: f64) => set "trail_lifetime" = 373806689;
        get_trail_lifetime() -> f64 => get "trail_lifetime" = 1740695150;
        restart() = 3218959716;
        capture_aabb() -> Aabb = 1068685055;
        emit_particle(xform: Transform3D, velocity: Vector3, color: Color, custom: Color, flags: i64) = 992173727;
        convert_from_particles(particles: &Obj<'_, Node>) = 1078189570;
    }
}

impl<'lt> Obj<'lt, GpuParticles3D> {
    pub fn is_emitting(&self) -> bool {
        self.advanced().is_emitting()
    }

    pub fn set_emitting(&self, emitting: bool) {
        self.advanced().set_emitting(emitting);
    }

    pub fn amount(&self) -> i64 {
        self.advanced().get_amount()
    }

    pub fn set_amount(&self, amount: i64) {
        self.advanced().set_amount(amount);
    }

    /// Seconds each particle lives.
    pub fn particle_lifetime(&self) -> f64 {
        self.advanced().get_lifetime()
    }

    pub fn set_particle_lifetime(&self, secs: f64) {
        self.advanced().set_lifetime(secs);
    }

    pub fn one_shot(&self) -> bool {
        self.advanced().get_one_shot()
    }

    pub fn set_one_shot(&self, enable: bool) {
        self.advanced().set_one_shot(enable);
    }

    pub fn pre_process_time(&self) -> f64 {
        self.advanced().get_pre_process_time()
    }

    pub fn set_pre_process_time(&self, secs: f64) {
        self.advanced().set_pre_process_time(secs);
    }

    pub fn explosiveness(&self) -> f64 {
        self.advanced().get_explosiveness_ratio()
    }

    pub fn set_explosiveness(&self, ratio: f64) {
        self.advanced().set_explosiveness_ratio(ratio);
    }

    pub fn randomness(&self) -> f64 {
        self.advanced().get_randomness_ratio()
    }

    pub fn set_randomness(&self, ratio: f64) {
        self.advanced().set_randomness_ratio(ratio);
    }

    pub fn visibility_aabb(&self) -> Aabb {
        self.advanced().get_visibility_aabb()
    }

    pub fn set_visibility_aabb(&self, aabb: Aabb) {
        self.advanced().set_visibility_aabb(aabb);
    }

    pub fn speed_scale(&self) -> f64 {
        self.advanced().get_speed_scale()
    }

    pub fn set_speed_scale(&self, scale: f64) {
        self.advanced().set_speed_scale(scale);
    }

    pub fn fixed_fps(&self) -> i64 {
        self.advanced().get_fixed_fps()
    }

    pub fn set_fixed_fps(&self, fps: i64) {
        self.advanced().set_fixed_fps(fps);
    }

    pub fn interpolate(&self) -> bool {
        self.advanced().get_interpolate()
    }

    pub fn set_interpolate(&self, enable: bool) {
        self.advanced().set_interpolate(enable);
    }

    pub fn process_material(&self) -> Option<Obj<'lt, Material>> {
        self.advanced().get_process_material()
    }

    pub fn set_process_material(&self, material: Option<&Obj<'_, Material>>) {
        self.advanced().set_process_material(material);
    }

    pub fn draw_passes(&self) -> i64 {
        self.advanced().get_draw_passes()
    }

    pub fn set_draw_passes(&self, passes: i64) {
        self.advanced().set_draw_passes(passes);
    }

    pub fn draw_pass_mesh(&self, pass: i64) -> Option<Obj<'lt, Mesh>> {
        self.advanced().get_draw_pass_mesh(pass)
    }

    pub fn set_draw_pass_mesh(&self, pass: i64, mesh: Option<&Obj<'_, Mesh>>) {
        self.advanced().set_draw_pass_mesh(pass, mesh);
    }

    pub fn draw_order(&self) -> DrawOrder {
        self.advanced().get_draw_order()
    }

    pub fn set_draw_order(&self, order: DrawOrder) {
        self.advanced().set_draw_order(order);
    }

    pub fn trail_enabled(&self) -> bool {
        self.advanced().is_trail_enabled()
    }

    pub fn set_trail_enabled(&self, enabled: bool) {
        self.advanced().set_trail_enabled(enabled);
    }

    pub fn trail_lifetime(&self) -> f64 {
        self.advanced().get_trail_lifetime()
    }

    pub fn set_trail_lifetime(&self, secs: f64) {
        self.advanced().set_trail_lifetime(secs);
    }

    pub fn restart(&self) {
        self.advanced().restart();
    }

    /// Run `handler` when a one-shot emission ends and its last particles
    /// have died.
    pub fn on_finished(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("finished", move |_| handler())
    }

    /// Bounds of the particles currently alive.
    pub fn capture_aabb(&self) -> Aabb {
        self.advanced().capture_aabb()
    }

    /// Emit one particle at `xform` moving with `velocity`.
    pub fn emit_particle(&self, xform: Transform3D, velocity: Vector3, color: Color) {
        let flags = EmitFlags::POSITION.0 | EmitFlags::VELOCITY.0 | EmitFlags::COLOR.0;
        self.advanced()
            .emit_particle(xform, velocity, color, Color::TRANSPARENT, flags);
    }

    pub fn convert_from_particles(&self, particles: &Obj<'_, Node>) {
        self.advanced().convert_from_particles(particles);
    }
}
