use gdbind::classes::directional_light_3d::{ShadowMode, SkyMode};
use gdbind::classes::geometry_instance_3d::{
    GiMode, LightmapScale, ShadowCastingSetting, VisibilityRange, VisibilityRangeFadeMode,
};
use gdbind::classes::gpu_particles_3d::DrawOrder;
use gdbind::classes::lightmap_gi::{BakeQuality, EnvironmentMode, GenerateProbes};
use gdbind::classes::soft_body_3d::DisableMode;
use gdbind::prelude::*;

mod test_harness;
use test_harness::TestHarness;

fn aabb() -> Aabb {
    Aabb::new(Vector3::new(-1.0, -2.0, -3.0), Vector3::new(2.0, 4.0, 6.0))
}

#[test]
fn test_node_3d_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let node = Obj::<Node3D>::new(&lifetime).unwrap();
    let moved = Transform3D::new(Basis::IDENTITY, Vector3::new(1.0, 2.0, 3.0));

    assert_eq!(node.scale(), Vector3::ONE);
    node.set_transform(moved);
    node.set_global_transform(moved);
    node.set_position(Vector3::new(4.0, 0.5, -2.0));
    node.set_rotation(Vector3::new(0.0, 1.5, 0.0));
    node.set_scale(Vector3::new(2.0, 2.0, 2.0));
    node.set_visible(false);

    assert_eq!(node.transform(), moved);
    assert_eq!(node.global_transform(), moved);
    assert_eq!(node.position(), Vector3::new(4.0, 0.5, -2.0));
    assert_eq!(node.rotation(), Vector3::new(0.0, 1.5, 0.0));
    assert_eq!(node.scale(), Vector3::new(2.0, 2.0, 2.0));
    assert!(!node.is_visible());
    node.free();
}

#[test]
fn test_geometry_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let mesh = Obj::<MeshInstance3D>::new(&lifetime).unwrap();
    let range = VisibilityRange {
        begin: 1.0,
        begin_margin: 0.5,
        end: 40.0,
        end_margin: 2.0,
        fade_mode: VisibilityRangeFadeMode::SELF,
    };

    mesh.set_cast_shadow(ShadowCastingSetting::SHADOWS_ONLY);
    mesh.set_lod_bias(1.5);
    mesh.set_transparency(1.5);
    mesh.set_visibility_range(range);
    mesh.set_extra_cull_margin(-0.25);
    mesh.set_lightmap_scale(LightmapScale::SCALE_4X);
    mesh.set_gi_mode(GiMode::DYNAMIC);
    mesh.set_ignore_occlusion_culling(true);
    mesh.set_custom_aabb(aabb());
    mesh.set_layers(0b1010);
    mesh.set_sorting_offset(0.75);
    mesh.set_sorting_use_aabb_center(true);
    mesh.set_skeleton_path("../Skeleton3D");

    assert_eq!(mesh.cast_shadow(), ShadowCastingSetting::SHADOWS_ONLY);
    assert_eq!(mesh.lod_bias(), 1.5);
    assert_eq!(mesh.transparency(), 1.5, "out-of-range values reach the engine as given");
    assert_eq!(mesh.visibility_range(), range);
    assert_eq!(mesh.extra_cull_margin(), -0.25);
    assert_eq!(mesh.lightmap_scale(), LightmapScale::SCALE_4X);
    assert_eq!(mesh.gi_mode(), GiMode::DYNAMIC);
    assert!(mesh.ignores_occlusion_culling());
    assert_eq!(mesh.custom_aabb(), aabb());
    assert_eq!(mesh.layers(), 0b1010);
    assert_eq!(mesh.sorting_offset(), 0.75);
    assert!(mesh.sorting_use_aabb_center());
    assert_eq!(mesh.skeleton_path().as_str(), "../Skeleton3D");
    mesh.free();
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_gpu_particle_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let particles = Obj::<GpuParticles3D>::new(&lifetime).unwrap();

    particles.set_emitting(false);
    particles.set_amount(0);
    particles.set_particle_lifetime(3.5);
    particles.set_one_shot(true);
    particles.set_pre_process_time(0.25);
    particles.set_explosiveness(0.5);
    particles.set_randomness(0.125);
    particles.set_visibility_aabb(aabb());
    particles.set_speed_scale(2.0);
    particles.set_fixed_fps(30);
    particles.set_interpolate(false);
    particles.set_draw_passes(9);
    particles.set_draw_order(DrawOrder::VIEW_DEPTH);
    particles.set_trail_enabled(true);
    particles.set_trail_lifetime(0.5);

    assert!(!particles.is_emitting());
    assert_eq!(particles.amount(), 0);
    assert_eq!(particles.particle_lifetime(), 3.5);
    assert!(particles.one_shot());
    assert_eq!(particles.pre_process_time(), 0.25);
    assert_eq!(particles.explosiveness(), 0.5);
    assert_eq!(particles.randomness(), 0.125);
    assert_eq!(particles.visibility_aabb(), aabb());
    assert_eq!(particles.speed_scale(), 2.0);
    assert_eq!(particles.fixed_fps(), 30);
    assert!(!particles.interpolate());
    assert_eq!(particles.draw_passes(), 9);
    assert_eq!(particles.draw_order(), DrawOrder::VIEW_DEPTH);
    assert!(particles.trail_enabled());
    assert_eq!(particles.trail_lifetime(), 0.5);
    particles.free();
}

#[test]
fn test_soft_body_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let body = Obj::<SoftBody3D>::new(&lifetime).unwrap();

    body.set_collision_mask(0b110);
    body.set_collision_layer(0b1);
    body.set_parent_collision_ignore("..");
    body.set_disable_mode(DisableMode::KEEP_ACTIVE);
    body.set_simulation_precision(0);
    body.set_total_mass(0.1);
    body.set_linear_stiffness(4.0);
    body.set_pressure_coefficient(0.25);
    body.set_damping_coefficient(-1.0);
    body.set_drag_coefficient(0.5);
    body.set_ray_pickable(false);

    assert_eq!(body.collision_mask(), 0b110);
    assert_eq!(body.collision_layer(), 0b1);
    assert_eq!(body.parent_collision_ignore().as_str(), "..");
    assert_eq!(body.disable_mode(), DisableMode::KEEP_ACTIVE);
    assert_eq!(body.simulation_precision(), 0);
    assert_eq!(body.total_mass(), 0.1, "floats keep full precision");
    assert_eq!(body.linear_stiffness(), 4.0);
    assert_eq!(body.pressure_coefficient(), 0.25);
    assert_eq!(body.damping_coefficient(), -1.0);
    assert_eq!(body.drag_coefficient(), 0.5);
    assert!(!body.ray_pickable());
    body.free();
    harness.assert_no_leaked_payloads();
}

#[test]
fn test_lightmap_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let lightmap = Obj::<LightmapGi>::new(&lifetime).unwrap();
    let data = Obj::<LightmapGiData>::new(&lifetime).unwrap();

    lightmap.set_light_data(Some(&data));
    lightmap.set_quality(BakeQuality::ULTRA);
    lightmap.set_bounces(-1);
    lightmap.set_bounce_indirect_energy(1.5);
    lightmap.set_generate_probes(GenerateProbes::SUBDIV_16);
    lightmap.set_bias(0.0625);
    lightmap.set_environment_mode(EnvironmentMode::CUSTOM_COLOR);
    lightmap.set_texel_scale(0.5);
    lightmap.set_max_texture_size(4096);
    lightmap.set_use_denoiser(false);
    lightmap.set_denoiser_strength(0.25);
    lightmap.set_interior(true);
    lightmap.set_directional(true);

    assert!(lightmap.light_data().is_some_and(|held| held.same_object(&data)));
    assert_eq!(lightmap.quality(), BakeQuality::ULTRA);
    assert_eq!(lightmap.bounces(), -1);
    assert_eq!(lightmap.bounce_indirect_energy(), 1.5);
    assert_eq!(lightmap.generate_probes(), GenerateProbes::SUBDIV_16);
    assert_eq!(lightmap.bias(), 0.0625);
    assert_eq!(lightmap.environment_mode(), EnvironmentMode::CUSTOM_COLOR);
    assert_eq!(lightmap.texel_scale(), 0.5);
    assert_eq!(lightmap.max_texture_size(), 4096);
    assert!(!lightmap.use_denoiser());
    assert_eq!(lightmap.denoiser_strength(), 0.25);
    assert!(lightmap.interior());
    assert!(lightmap.directional());

    lightmap.set_light_data(None);
    assert!(lightmap.light_data().is_none());
    lightmap.free();
}

#[test]
fn test_directional_light_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let sun = Obj::<DirectionalLight3D>::new(&lifetime).unwrap();

    sun.set_shadow_mode(ShadowMode::PARALLEL_2_SPLITS);
    sun.set_blend_splits(true);
    sun.set_sky_mode(SkyMode::SKY_ONLY);
    sun.set_shadow_max_distance(200.0);
    sun.set_split_offsets([0.125, 0.25, 0.5]);
    sun.set_cull_mask(0xff);
    sun.set_negative(true);
    sun.set_editor_only(true);

    assert_eq!(sun.shadow_mode(), ShadowMode::PARALLEL_2_SPLITS);
    assert!(sun.blend_splits());
    assert_eq!(sun.sky_mode(), SkyMode::SKY_ONLY);
    assert_eq!(sun.shadow_max_distance(), 200.0);
    assert_eq!(sun.split_offsets(), [0.125, 0.25, 0.5]);
    assert_eq!(sun.cull_mask(), 0xff);
    assert!(sun.negative());
    assert!(sun.editor_only());
    sun.free();
}

#[test]
fn test_occluder_instance_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let instance = Obj::<OccluderInstance3D>::new(&lifetime).unwrap();
    let occluder = Obj::<ArrayOccluder3D>::new(&lifetime).unwrap();

    instance.set_bake_mask(0b1001);
    instance.set_bake_simplification_distance(-0.5);
    instance.set_occluder(Some(occluder.upcast_ref::<Occluder3D>()));

    assert_eq!(instance.bake_mask(), 0b1001);
    assert_eq!(instance.bake_simplification_distance(), -0.5);
    assert!(instance.occluder().is_some_and(|held| held.same_object(&occluder)));
    instance.free();
}

#[test]
fn test_scene_multiplayer_properties_round_trip() {
    let harness = TestHarness::new();
    let lifetime = harness.engine.lifetime();
    let scene = Obj::<SceneMultiplayer>::new(&lifetime).unwrap();

    scene.set_root_path("/root/World");
    scene.set_auth_timeout(-1.0);
    scene.set_refuse_new_connections(true);
    scene.set_allow_object_decoding(true);
    scene.set_server_relay(false);
    scene.set_max_sync_packet_size(2048);
    scene.set_max_delta_packet_size(128);

    assert_eq!(scene.root_path().as_str(), "/root/World");
    assert_eq!(scene.auth_timeout(), -1.0);
    assert!(scene.refuse_new_connections());
    assert!(scene.allow_object_decoding());
    assert!(!scene.server_relay());
    assert_eq!(scene.max_sync_packet_size(), 2048);
    assert_eq!(scene.max_delta_packet_size(), 128);
    scene.free();
    harness.assert_no_leaked_payloads();
}
