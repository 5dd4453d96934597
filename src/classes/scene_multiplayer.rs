use gdbind_core::{ErrorCode, NodePath};

use crate::Obj;
use crate::classes::multiplayer_peer::TransferMode;
use crate::classes::{MultiplayerApi, Object, RefCounted};
use crate::macros::engine_class;

engine_class! {
    /// Default `MultiplayerAPI` implementation, with authentication and
    /// raw byte messages on top of RPCs.
    pub struct SceneMultiplayer: "SceneMultiplayer" => MultiplayerApi;
    refcounted: true;
    ancestors { as_multiplayer_api => MultiplayerApi, as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        set_root_path(path: &NodePath) => set "root_path" = 1348162250;
        get_root_path() -> NodePath => get "root_path" = 4075236667;
        clear() = 3218959716;
        disconnect_peer(id: i64) = 1286410249;
        get_authenticating_peers() -> Vec<i32> = 969006518;
        send_auth(id: i64, data: &[u8]) -> ErrorCode = 506032537;
        complete_auth(id: i64) -> ErrorCode = 844576869;
        set_auth_timeout(timeout: f64) => set "auth_timeout" = 373806689;
        get_auth_timeout() -> f64 => get "auth_timeout" = 1740695150;
        set_refuse_new_connections(refuse: bool) => set "refuse_new_connections" = 2586408642;
        is_refusing_new_connections() -> bool => get "refuse_new_connections" = 36873697;
        set_allow_object_decoding(enable: bool) => set "allow_object_decoding" = 2586408642;
        is_object_decoding_allowed() -> bool => get "allow_object_decoding" = 36873697;
        set_server_relay_enabled(enabled: bool) => set "server_relay" = 2586408642;
        is_server_relay_enabled() -> bool => get "server_relay" = 36873697;
        send_bytes(bytes: &[u8], id: i64, mode: TransferMode, channel: i64) -> ErrorCode = 1307428718;
        get_max_sync_packet_size() -> i64 => get "max_sync_packet_size" = 3905245786;
        set_max_sync_packet_size(size: i64) => set "max_sync_packet_size" = 1286410249;
        get_max_delta_packet_size() -> i64 => get "max_delta_packet_size" = 3905245786;
        set_max_delta_packet_size(size: i64) => set "max_delta_packet_size" = 1286410249;
    }
}

impl<'lt> Obj<'lt, SceneMultiplayer> {
    pub fn root_path(&self) -> NodePath {
        self.advanced().get_root_path()
    }

    /// Node that replicated paths are relative to; empty for the tree root.
    pub fn set_root_path(&self, path: &str) {
        self.advanced().set_root_path(&NodePath::from(path));
    }

    /// Drop every cached path and replication state.
    pub fn clear(&self) {
        self.advanced().clear();
    }

    pub fn disconnect_peer(&self, id: i64) {
        self.advanced().disconnect_peer(id);
    }

    /// Peers connected but not yet authenticated.
    pub fn authenticating_peers(&self) -> Vec<i32> {
        self.advanced().get_authenticating_peers()
    }

    pub fn send_auth(&self, id: i64, data: &[u8]) -> ErrorCode {
        self.advanced().send_auth(id, data)
    }

    pub fn complete_auth(&self, id: i64) -> ErrorCode {
        self.advanced().complete_auth(id)
    }

    /// Seconds a peer may spend authenticating; 0 disables the timeout.
    pub fn auth_timeout(&self) -> f64 {
        self.advanced().get_auth_timeout()
    }

    pub fn set_auth_timeout(&self, timeout: f64) {
        self.advanced().set_auth_timeout(timeout);
    }

    pub fn refuse_new_connections(&self) -> bool {
        self.advanced().is_refusing_new_connections()
    }

    pub fn set_refuse_new_connections(&self, refuse: bool) {
        self.advanced().set_refuse_new_connections(refuse);
    }

    pub fn allow_object_decoding(&self) -> bool {
        self.advanced().is_object_decoding_allowed()
    }

    pub fn set_allow_object_decoding(&self, allow: bool) {
        self.advanced().set_allow_object_decoding(allow);
    }

    pub fn server_relay(&self) -> bool {
        self.advanced().is_server_relay_enabled()
    }

    pub fn set_server_relay(&self, enabled: bool) {
        self.advanced().set_server_relay_enabled(enabled);
    }

    /// Send raw bytes outside the RPC system; `id` 0 broadcasts.
    pub fn send_bytes(&self, bytes: &[u8], id: i64, mode: TransferMode, channel: i64) -> ErrorCode {
        self.advanced()
            .send_bytes(bytes, id, mode, channel)
    }

    pub fn max_sync_packet_size(&self) -> i64 {
        self.advanced().get_max_sync_packet_size()
    }

    pub fn set_max_sync_packet_size(&self, size: i64) {
        self.advanced().set_max_sync_packet_size(size);
    }

    pub fn max_delta_packet_size(&self) -> i64 {
        self.advanced().get_max_delta_packet_size()
    }

    pub fn set_max_delta_packet_size(&self, size: i64) {
        self.advanced().set_max_delta_packet_size(size);
    }
}
