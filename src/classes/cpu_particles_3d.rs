//! `CPUParticles3D`: particle emitter simulated on the CPU.
//!
//! The simulation runs inside the engine; these shims only read and write
//! the emitter's configuration.

use gdbind_core::{Aabb, Callable, Color, ErrorCode, Vector3};

use crate::Obj;
use crate::classes::{GeometryInstance3D, Mesh, Node, Node3D, Object, VisualInstance3D};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    /// Order in which particles are drawn.
    pub struct DrawOrder {
        INDEX = 0,
        LIFETIME = 1,
        VIEW_DEPTH = 2,
    }
}

engine_enum! {
    /// Per-particle parameters with a min/max range and a curve.
    pub struct Parameter {
        INITIAL_LINEAR_VELOCITY = 0,
        ANGULAR_VELOCITY = 1,
        ORBIT_VELOCITY = 2,
        LINEAR_ACCEL = 3,
        RADIAL_ACCEL = 4,
        TANGENTIAL_ACCEL = 5,
        DAMPING = 6,
        ANGLE = 7,
        SCALE = 8,
        HUE_VARIATION = 9,
        ANIM_SPEED = 10,
        ANIM_OFFSET = 11,
        MAX = 12,
    }
}

engine_enum! {
    pub struct ParticleFlags {
        ALIGN_Y_TO_VELOCITY = 0,
        ROTATE_Y = 1,
        DISABLE_Z = 2,
        MAX = 3,
    }
}

engine_enum! {
    /// Shape particles are spawned in.
    pub struct EmissionShape {
        POINT = 0,
        SPHERE = 1,
        SPHERE_SURFACE = 2,
        BOX = 3,
        POINTS = 4,
        DIRECTED_POINTS = 5,
        RING = 6,
        MAX = 7,
    }
}

engine_class! {
    /// CPU-based 3D particle emitter.
    pub struct CpuParticles3D: "CPUParticles3D" => GeometryInstance3D;
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
        set_amount(amount: i64) => set "amount" = 1286410249;
        set_lifetime(secs: f64) => set "lifetime" = 373806689;
        set_one_shot(enable: bool) => set "one_shot" = 2586408642;
        set_pre_process_time(secs: f64) => set "preprocess" = 373806689;
        set_explosiveness_ratio(ratio: f64) => set "explosiveness" = 373806689;
        set_randomness_ratio(ratio: f64) => set "randomness" = 373806689;
        set_visibility_aabb(aabb: Aabb) => set "visibility_aabb" = 259215842;
        set_lifetime_randomness(random: f64) => set "lifetime_randomness" = 373806689;
        set_use_local_coordinates(enable: bool) => set "local_coords" = 2586408642;
        set_fixed_fps(fps: i64) => set "fixed_fps" = 1286410249;
        set_fractional_delta(enable: bool) => set "fract_delta" = 2586408642;
        set_speed_scale(scale: f64) => set "speed_scale" = 373806689;
        is_emitting() -> bool => get "emitting" = 36873697;
        get_amount() -> i64 => get "amount" = 3905245786;
        get_lifetime() -> f64 => get "lifetime" = 1740695150;
        get_one_shot() -> bool => get "one_shot" = 36873697;
        get_pre_process_time() -> f64 => get "preprocess" = 1740695150;
        get_explosiveness_ratio() -> f64 => get "explosiveness" = 1740695150;
        get_randomness_ratio() -> f64 => get "randomness" = 1740695150;
        get_visibility_aabb() -> Aabb => get "visibility_aabb" = 1068685055;
        get_lifetime_randomness() -> f64 => get "lifetime_randomness" = 1740695150;
        get_use_local_coordinates() -> bool => get "local_coords" = 36873697;
        get_fixed_fps() -> i64 => get "fixed_fps" = 3905245786;
        get_fractional_delta() -> bool => get "fract_delta" = 36873697;
        get_speed_scale() -> f64 => get "speed_scale" = 1740695150;
        set_draw_order(order: DrawOrder) => set "draw_order" = 1427401774;
        get_draw_order() -> DrawOrder => get "draw_order" = 1321900776;
        set_mesh(mesh: Option<&Obj<'_, Mesh>>) => set "mesh" = 194775623;
        get_mesh() -> Option<Obj<'lt, Mesh>> => get "mesh" = 1808005922;
        restart() = 3218959716;
        set_direction(direction: Vector3) => set "direction" = 3460891852;
        get_direction() -> Vector3 => get "direction" = 3360562783;
        set_spread(degrees: f64) => set "spread" = 373806689;
        get_spread() -> f64 => get "spread" = 1740695150;
        set_flatness(amount: f64) => set "flatness" = 373806689;
        get_flatness() -> f64 => get "flatness" = 1740695150;
        set_param_min(param: Parameter, value: f64) => set "param_min" = 557936109;
        get_param_min(param: Parameter) -> f64 => get "param_min" = 597646162;
        set_param_max(param: Parameter, value: f64) => set "param_max" = 557936109;
        get_param_max(param: Parameter) -> f64 => get "param_max" = 597646162;
        set_color(color: Color) => set "color" = 2920490490;
        get_color() -> Color => get "color" = 3444240500;
        set_particle_flag(particle_flag: ParticleFlags, enable: bool) => set "particle_flag" = 3515406498;
        get_particle_flag(particle_flag: ParticleFlags) -> bool => get "particle_flag" = 2845201987;
        set_emission_shape(shape: EmissionShape) => set "emission_shape" = 491823814;
        get_emission_shape() -> EmissionShape => get "emission_shape" = 2961454842;
        set_emission_sphere_radius(radius: f64) => set "emission_sphere_radius" = 373806689;
        get_emission_sphere_radius() -> f64 => get "emission_sphere_radius" = 1740695150;
        set_emission_box_extents(extents: Vector3) => set "emission_box_extents" = 3460891852;
        get_emission_box_extents() -> Vector3 => get "emission_box_extents" = 3360562783;
        set_emission_points(array: &[Vector3]) => set "emission_points" = 334873810;
        get_emission_points() -> Vec<Vector3> => get "emission_points" = 497664490;
        set_emission_normals(array: &[Vector3]) => set "emission_normals" = 334873810;
        get_emission_normals() -> Vec<Vector3> => get "emission_normals" = 497664490;
        set_emission_colors(array: &[Color]) => set "emission_colors" = 3546319833;
        get_emission_colors() -> Vec<Color> => get "emission_colors" = 1392750486;
        set_emission_ring_axis(axis: Vector3) => set "emission_ring_axis" = 3460891852;
        get_emission_ring_axis() -> Vector3 => get "emission_ring_axis" = 3360562783;
        set_emission_ring_height(height: f64) => set "emission_ring_height" = 373806689;
        get_emission_ring_height() -> f64 => get "emission_ring_height" = 1740695150;
        set_emission_ring_radius(radius: f64) => set "emission_ring_radius" = 373806689;
        get_emission_ring_radius() -> f64 => get "emission_ring_radius" = 1740695150;
        set_emission_ring_inner_radius(inner_radius: f64) => set "emission_ring_inner_radius" = 373806689;
        get_emission_ring_inner_radius() -> f64 => get "emission_ring_inner_radius" = 1740695150;
        get_gravity() -> Vector3 => get "gravity" = 3360562783;
        set_gravity(accel_vec: Vector3) => set "gravity" = 3460891852;
        get_split_scale() -> bool => get "split_scale" = 2240911060;
        set_split_scale(split_scale: bool) => set "split_scale" = 2586408642;
        convert_from_particles(particles: &Obj<'_, Node>) = 1078189570;
    }
}

/// Lower and upper bound of one randomized parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl<'lt> Obj<'lt, CpuParticles3D> {
    pub fn is_emitting(&self) -> bool {
        self.advanced().is_emitting()
    }

    pub fn set_emitting(&self, emitting: bool) {
        self.advanced().set_emitting(emitting);
    }

    pub fn amount(&self) -> i64 {
        self.advanced().get_amount()
    }

    /// Number of particles alive at once.
    pub fn set_amount(&self, amount: i64) {
        self.advanced().set_amount(amount);
    }

    /// Seconds each particle lives.
    ///
    /// Named apart from [`Obj::lifetime`], which returns the handle's scope.
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

    pub fn lifetime_randomness(&self) -> f64 {
        self.advanced().get_lifetime_randomness()
    }

    pub fn set_lifetime_randomness(&self, random: f64) {
        self.advanced().set_lifetime_randomness(random);
    }

    pub fn local_coords(&self) -> bool {
        self.advanced().get_use_local_coordinates()
    }

    pub fn set_local_coords(&self, enable: bool) {
        self.advanced().set_use_local_coordinates(enable);
    }

    pub fn fixed_fps(&self) -> i64 {
        self.advanced().get_fixed_fps()
    }

    pub fn set_fixed_fps(&self, fps: i64) {
        self.advanced().set_fixed_fps(fps);
    }

    pub fn fract_delta(&self) -> bool {
        self.advanced().get_fractional_delta()
    }

    pub fn set_fract_delta(&self, enable: bool) {
        self.advanced().set_fractional_delta(enable);
    }

    pub fn speed_scale(&self) -> f64 {
        self.advanced().get_speed_scale()
    }

    pub fn set_speed_scale(&self, scale: f64) {
        self.advanced().set_speed_scale(scale);
    }

    pub fn draw_order(&self) -> DrawOrder {
        self.advanced().get_draw_order()
    }

    pub fn set_draw_order(&self, order: DrawOrder) {
        self.advanced().set_draw_order(order);
    }

    pub fn mesh(&self) -> Option<Obj<'lt, Mesh>> {
        self.advanced().get_mesh()
    }

    pub fn set_mesh(&self, mesh: Option<&Obj<'_, Mesh>>) {
        self.advanced().set_mesh(mesh);
    }

    /// Restart emission from scratch.
    pub fn restart(&self) {
        self.advanced().restart();
    }

    /// Run `handler` when a one-shot emission ends.
    pub fn on_finished(&self, handler: impl Fn() + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("finished", move |_| handler())
    }

    pub fn direction(&self) -> Vector3 {
        self.advanced().get_direction()
    }

    pub fn set_direction(&self, direction: Vector3) {
        self.advanced().set_direction(direction);
    }

    /// Spread around `direction`, in degrees.
    pub fn spread(&self) -> f64 {
        self.advanced().get_spread()
    }

    pub fn set_spread(&self, degrees: f64) {
        self.advanced().set_spread(degrees);
    }

    pub fn flatness(&self) -> f64 {
        self.advanced().get_flatness()
    }

    pub fn set_flatness(&self, amount: f64) {
        self.advanced().set_flatness(amount);
    }

    pub fn param(&self, param: Parameter) -> ParamRange {
        let advanced = self.advanced();
        ParamRange {
            min: advanced.get_param_min(param),
            max: advanced.get_param_max(param),
        }
    }

    pub fn set_param(&self, param: Parameter, range: ParamRange) {
        let advanced = self.advanced();
        advanced.set_param_min(param, range.min);
        advanced.set_param_max(param, range.max);
    }

    pub fn color(&self) -> Color {
        self.advanced().get_color()
    }

    pub fn set_color(&self, color: Color) {
        self.advanced().set_color(color);
    }

    pub fn particle_flag(&self, flag: ParticleFlags) -> bool {
        self.advanced().get_particle_flag(flag)
    }

    pub fn set_particle_flag(&self, flag: ParticleFlags, enable: bool) {
        self.advanced().set_particle_flag(flag, enable);
    }

    pub fn emission_shape(&self) -> EmissionShape {
        self.advanced().get_emission_shape()
    }

    pub fn set_emission_shape(&self, shape: EmissionShape) {
        self.advanced().set_emission_shape(shape);
    }

    pub fn emission_sphere_radius(&self) -> f64 {
        self.advanced().get_emission_sphere_radius()
    }

    pub fn set_emission_sphere_radius(&self, radius: f64) {
        self.advanced().set_emission_sphere_radius(radius);
    }

    pub fn emission_box_extents(&self) -> Vector3 {
        self.advanced().get_emission_box_extents()
    }

    pub fn set_emission_box_extents(&self, extents: Vector3) {
        self.advanced().set_emission_box_extents(extents);
    }

    pub fn emission_points(&self) -> Vec<Vector3> {
        self.advanced().get_emission_points()
    }

    pub fn set_emission_points(&self, points: &[Vector3]) {
        self.advanced().set_emission_points(points);
    }

    pub fn emission_normals(&self) -> Vec<Vector3> {
        self.advanced().get_emission_normals()
    }

    pub fn set_emission_normals(&self, normals: &[Vector3]) {
        self.advanced().set_emission_normals(normals);
    }

    pub fn emission_colors(&self) -> Vec<Color> {
        self.advanced().get_emission_colors()
    }

    pub fn set_emission_colors(&self, colors: &[Color]) {
        self.advanced().set_emission_colors(colors);
    }

    /// Spawn particles from `points`, each with its own normal, as
    /// `EmissionShape::DIRECTED_POINTS` requires.
    ///
    /// # Panics
    ///
    /// When the two slices differ in length.
    pub fn set_directed_points(&self, points: &[Vector3], normals: &[Vector3]) {
        assert_eq!(points.len(), normals.len(), "every emission point needs a normal");
        let advanced = self.advanced();
        advanced.set_emission_shape(EmissionShape::DIRECTED_POINTS);
        advanced.set_emission_points(points);
        advanced.set_emission_normals(normals);
    }

    pub fn emission_ring_axis(&self) -> Vector3 {
        self.advanced().get_emission_ring_axis()
    }

    pub fn set_emission_ring_axis(&self, axis: Vector3) {
        self.advanced().set_emission_ring_axis(axis);
    }

    pub fn emission_ring_height(&self) -> f64 {
        self.advanced().get_emission_ring_height()
    }

    pub fn set_emission_ring_height(&self, height: f64) {
        self.advanced().set_emission_ring_height(height);
    }

    pub fn emission_ring_radius(&self) -> f64 {
        self.advanced().get_emission_ring_radius()
    }

    pub fn set_emission_ring_radius(&self, radius: f64) {
        self.advanced().set_emission_ring_radius(radius);
    }

    pub fn emission_ring_inner_radius(&self) -> f64 {
        self.advanced().get_emission_ring_inner_radius()
    }

    pub fn set_emission_ring_inner_radius(&self, inner_radius: f64) {
        self.advanced().set_emission_ring_inner_radius(inner_radius);
    }

    pub fn gravity(&self) -> Vector3 {
        self.advanced().get_gravity()
    }

    pub fn set_gravity(&self, accel: Vector3) {
        self.advanced().set_gravity(accel);
    }

    pub fn split_scale(&self) -> bool {
        self.advanced().get_split_scale()
    }

    pub fn set_split_scale(&self, split_scale: bool) {
        self.advanced().set_split_scale(split_scale);
    }

    /// Copy the configuration of a `GPUParticles3D` node.
    pub fn convert_from_particles(&self, particles: &Obj<'_, Node>) {
        self.advanced().convert_from_particles(particles);
    }
}
