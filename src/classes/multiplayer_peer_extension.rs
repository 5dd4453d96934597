use gdbind_core::{ErrorCode, VirtualThunk};

use crate::classes::multiplayer_peer::{ConnectionStatus, TransferMode};
use crate::classes::{MultiplayerPeer, Object, PacketPeer, RefCounted};
use crate::extension::{ExtensionClass, hook_thunk};
use crate::macros::engine_class;
use crate::HasVirtuals;

engine_class! {
    /// Base for multiplayer transports written as extensions.
    ///
    /// Subclass it in Rust and implement [`IMultiplayerPeerExtension`]; the
    /// engine routes every `MultiplayerPeer` call to those hooks.
    pub struct MultiplayerPeerExtension: "MultiplayerPeerExtension" => MultiplayerPeer;
    refcounted: true;
    ancestors {
        as_multiplayer_peer => MultiplayerPeer,
        as_packet_peer => PacketPeer,
        as_ref_counted => RefCounted,
        as_object => Object,
    }
    virtuals [
        "_get_available_packet_count",
        "_get_max_packet_size",
        "_get_packet_script",
        "_put_packet_script",
        "_get_packet_channel",
        "_get_packet_mode",
        "_set_transfer_channel",
        "_get_transfer_channel",
        "_set_transfer_mode",
        "_get_transfer_mode",
        "_set_target_peer",
        "_get_packet_peer",
        "_is_server",
        "_poll",
        "_close",
        "_disconnect_peer",
        "_get_unique_id",
        "_set_refuse_new_connections",
        "_is_refusing_new_connections",
        "_is_server_relay_supported",
        "_get_connection_status",
    ];
    methods<'lt> {}
}

/// Hooks of a Rust multiplayer transport.
///
/// Defaults describe a disconnected peer with nothing to read.
pub trait IMultiplayerPeerExtension: ExtensionClass {
    fn get_available_packet_count(&mut self) -> i64 {
        0
    }

    fn get_max_packet_size(&mut self) -> i64 {
        0
    }

    /// Pop the next incoming packet.
    fn get_packet_script(&mut self) -> Vec<u8> {
        Vec::new()
    }

    /// Send `buffer` to the current target peer.
    fn put_packet_script(&mut self, _buffer: Vec<u8>) -> ErrorCode {
        ErrorCode::Unavailable
    }

    fn get_packet_channel(&mut self) -> i64 {
        0
    }

    fn get_packet_mode(&mut self) -> TransferMode {
        TransferMode::RELIABLE
    }

    fn set_transfer_channel(&mut self, _channel: i64) {}

    fn get_transfer_channel(&mut self) -> i64 {
        0
    }

    fn set_transfer_mode(&mut self, _mode: TransferMode) {}

    fn get_transfer_mode(&mut self) -> TransferMode {
        TransferMode::RELIABLE
    }

    fn set_target_peer(&mut self, _peer: i64) {}

    fn get_packet_peer(&mut self) -> i64 {
        0
    }

    fn is_server(&mut self) -> bool {
        false
    }

    fn poll(&mut self) {}

    fn close(&mut self) {}

    fn disconnect_peer(&mut self, _peer: i64, _force: bool) {}

    fn get_unique_id(&mut self) -> i64 {
        0
    }

    fn set_refuse_new_connections(&mut self, _enable: bool) {}

    fn is_refusing_new_connections(&mut self) -> bool {
        false
    }

    fn is_server_relay_supported(&mut self) -> bool {
        false
    }

    fn get_connection_status(&mut self) -> ConnectionStatus {
        ConnectionStatus::DISCONNECTED
    }
}

impl<T: IMultiplayerPeerExtension> HasVirtuals<T> for MultiplayerPeerExtension {
    fn virtual_by_name(name: &str) -> Option<VirtualThunk> {
        use IMultiplayerPeerExtension as I;

        let thunk = match name {
            "_get_available_packet_count" => hook_thunk!(I::get_available_packet_count()),
            "_get_max_packet_size" => hook_thunk!(I::get_max_packet_size()),
            "_get_packet_script" => hook_thunk!(I::get_packet_script()),
            "_put_packet_script" => hook_thunk!(I::put_packet_script(buffer: Vec<u8>)),
            "_get_packet_channel" => hook_thunk!(I::get_packet_channel()),
            "_get_packet_mode" => hook_thunk!(I::get_packet_mode()),
            "_set_transfer_channel" => hook_thunk!(I::set_transfer_channel(channel: i64)),
            "_get_transfer_channel" => hook_thunk!(I::get_transfer_channel()),
            "_set_transfer_mode" => hook_thunk!(I::set_transfer_mode(mode: TransferMode)),
            "_get_transfer_mode" => hook_thunk!(I::get_transfer_mode()),
            "_set_target_peer" => hook_thunk!(I::set_target_peer(peer: i64)),
            "_get_packet_peer" => hook_thunk!(I::get_packet_peer()),
            "_is_server" => hook_thunk!(I::is_server()),
            "_poll" => hook_thunk!(I::poll()),
            "_close" => hook_thunk!(I::close()),
            "_disconnect_peer" => hook_thunk!(I::disconnect_peer(peer: i64, force: bool)),
            "_get_unique_id" => hook_thunk!(I::get_unique_id()),
            "_set_refuse_new_connections" => hook_thunk!(I::set_refuse_new_connections(enable: bool)),
            "_is_refusing_new_connections" => hook_thunk!(I::is_refusing_new_connections()),
            "_is_server_relay_supported" => hook_thunk!(I::is_server_relay_supported()),
            "_get_connection_status" => hook_thunk!(I::get_connection_status()),
            _ => return <MultiplayerPeer as HasVirtuals<T>>::virtual_by_name(name),
        };
        Some(thunk)
    }
}
