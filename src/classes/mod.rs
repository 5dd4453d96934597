//! Engine class shims.
//!
//! One module per engine class. Each declares its marker, its engine enums
//! and its Advanced methods through `engine_class!`, then adds the Simple
//! methods by hand. Markers are re-exported here; enums stay in their
//! class module (`cpu_particles_3d::DrawOrder`).

pub mod array_occluder_3d;
pub mod cpu_particles_3d;
pub mod directional_light_3d;
pub mod geometry_instance_3d;
pub mod gpu_particles_3d;
pub mod light_3d;
pub mod lightmap_gi;
pub mod lightmap_gi_data;
pub mod material;
pub mod mesh;
pub mod mesh_instance_3d;
pub mod multiplayer_api;
pub mod multiplayer_peer;
pub mod multiplayer_peer_extension;
pub mod node;
pub mod node_3d;
pub mod object;
pub mod occluder_3d;
pub mod occluder_instance_3d;
pub mod omni_light_3d;
pub mod packet_peer;
pub mod ref_counted;
pub mod resource;
pub mod scene_multiplayer;
pub mod soft_body_3d;
pub mod visual_instance_3d;

pub use array_occluder_3d::ArrayOccluder3D;
pub use cpu_particles_3d::CpuParticles3D;
pub use directional_light_3d::DirectionalLight3D;
pub use geometry_instance_3d::GeometryInstance3D;
pub use gpu_particles_3d::GpuParticles3D;
pub use light_3d::Light3D;
pub use lightmap_gi::LightmapGi;
pub use lightmap_gi_data::LightmapGiData;
pub use material::Material;
pub use mesh::{IMesh, Mesh};
pub use mesh_instance_3d::MeshInstance3D;
pub use multiplayer_api::MultiplayerApi;
pub use multiplayer_peer::MultiplayerPeer;
pub use multiplayer_peer_extension::{IMultiplayerPeerExtension, MultiplayerPeerExtension};
pub use node::{INode, Node};
pub use node_3d::Node3D;
pub use object::Object;
pub use occluder_3d::Occluder3D;
pub use occluder_instance_3d::OccluderInstance3D;
pub use omni_light_3d::OmniLight3D;
pub use packet_peer::PacketPeer;
pub use ref_counted::RefCounted;
pub use resource::Resource;
pub use scene_multiplayer::SceneMultiplayer;
pub use soft_body_3d::SoftBody3D;
pub use visual_instance_3d::VisualInstance3D;

use gdbind_core::ClassSpec;

use crate::class::EngineClass;

/// Every bound class, parents before children.
pub fn catalog() -> Vec<&'static ClassSpec> {
    vec![
        Object::class_spec(),
        RefCounted::class_spec(),
        Resource::class_spec(),
        Material::class_spec(),
        Mesh::class_spec(),
        Occluder3D::class_spec(),
        ArrayOccluder3D::class_spec(),
        LightmapGiData::class_spec(),
        Node::class_spec(),
        Node3D::class_spec(),
        VisualInstance3D::class_spec(),
        GeometryInstance3D::class_spec(),
        MeshInstance3D::class_spec(),
        CpuParticles3D::class_spec(),
        GpuParticles3D::class_spec(),
        Light3D::class_spec(),
        OmniLight3D::class_spec(),
        DirectionalLight3D::class_spec(),
        LightmapGi::class_spec(),
        OccluderInstance3D::class_spec(),
        SoftBody3D::class_spec(),
        PacketPeer::class_spec(),
        MultiplayerPeer::class_spec(),
        MultiplayerPeerExtension::class_spec(),
        MultiplayerApi::class_spec(),
        SceneMultiplayer::class_spec(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn catalog_lists_parents_first() {
        let mut seen = FxHashSet::default();
        for spec in catalog() {
            if let Some(parent) = spec.parent {
                assert!(seen.contains(parent), "{} listed before its parent {}", spec.name, parent);
            }
            assert!(seen.insert(spec.name), "{} listed twice", spec.name);
        }
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn method_names_are_unique_per_class() {
        for spec in catalog() {
            let mut names = FxHashSet::default();
            for method in &spec.methods {
                assert!(names.insert(method.name), "{}::{} declared twice", spec.name, method.name);
            }
        }
    }

    #[test]
    fn setters_take_their_value_last() {
        use gdbind_core::Access;
        for spec in catalog() {
            for method in &spec.methods {
                if let Access::Set(_) = method.access {
                    assert!(!method.args.is_empty(), "{}::{} has no value", spec.name, method.name);
                }
                if let Access::Get(_) = method.access {
                    assert_ne!(method.ret, gdbind_core::AbiType::Nil, "{}::{}", spec.name, method.name);
                }
            }
        }
    }
}
