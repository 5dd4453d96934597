use gdbind_core::NodePath;

use crate::Obj;
use crate::classes::{Object, RefCounted, Resource};
use crate::macros::engine_class;

engine_class! {
    /// Baked lightmap data referenced by a `LightmapGI` node.
    pub struct LightmapGiData: "LightmapGIData" => Resource;
    refcounted: true;
    ancestors { as_resource => Resource, as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        set_uses_spherical_harmonics(uses_spherical_harmonics: bool) => set "uses_spherical_harmonics" = 2586408642;
        is_using_spherical_harmonics() -> bool => get "uses_spherical_harmonics" = 36873697;
        get_user_count() -> i64 = 3905245786;
        get_user_path(user_idx: i64) -> NodePath = 408788394;
        clear_users() = 3218959716;
    }
}

impl<'lt> Obj<'lt, LightmapGiData> {
    pub fn uses_spherical_harmonics(&self) -> bool {
        self.advanced().is_using_spherical_harmonics()
    }

    pub fn set_uses_spherical_harmonics(&self, uses: bool) {
        self.advanced().set_uses_spherical_harmonics(uses);
    }

    /// Paths of the nodes whose lighting was baked into this data.
    pub fn user_paths(&self) -> Vec<NodePath> {
        let advanced = self.advanced();
        (0..advanced.get_user_count())
            .map(|index| advanced.get_user_path(index))
            .collect()
    }

    pub fn clear_users(&self) {
        self.advanced().clear_users();
    }
}
