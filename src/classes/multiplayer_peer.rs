use crate::Obj;
use crate::classes::{Object, PacketPeer, RefCounted};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    pub struct ConnectionStatus {
        DISCONNECTED = 0,
        CONNECTING = 1,
        CONNECTED = 2,
    }
}

engine_enum! {
    /// Delivery guarantee of outgoing packets.
    pub struct TransferMode {
        UNRELIABLE = 0,
        UNRELIABLE_ORDERED = 1,
        RELIABLE = 2,
    }
}

/// Target peer id addressing every connected peer.
pub const TARGET_PEER_BROADCAST: i64 = 0;
/// Target peer id of the server.
pub const TARGET_PEER_SERVER: i64 = 1;

engine_class! {
    /// Transport used by the high-level multiplayer API.
    pub struct MultiplayerPeer: "MultiplayerPeer" => PacketPeer;
    refcounted: true;
    ancestors { as_packet_peer => PacketPeer, as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        set_transfer_channel(channel: i64) => set "transfer_channel" = 1286410249;
        get_transfer_channel() -> i64 => get "transfer_channel" = 3905245786;
        set_transfer_mode(mode: TransferMode) => set "transfer_mode" = 950411049;
        get_transfer_mode() -> TransferMode => get "transfer_mode" = 3369852622;
        set_target_peer(id: i64) = 1286410249;
        get_packet_peer() -> i64 = 3905245786;
        get_packet_channel() -> i64 = 3905245786;
        get_packet_mode() -> TransferMode = 3369852622;
        poll() = 3218959716;
        close() = 3218959716;
        disconnect_peer(peer: i64, force: bool) = 4023243586;
        get_connection_status() -> ConnectionStatus = 2147374275;
        get_unique_id() -> i64 = 3905245786;
        generate_unique_id() -> i64 = 3905245786;
        set_refuse_new_connections(enable: bool) => set "refuse_new_connections" = 2586408642;
        is_refusing_new_connections() -> bool => get "refuse_new_connections" = 36873697;
        is_server_relay_supported() -> bool = 36873697;
    }
}

impl<'lt> Obj<'lt, MultiplayerPeer> {
    pub fn transfer_channel(&self) -> i64 {
        self.advanced().get_transfer_channel()
    }

    pub fn set_transfer_channel(&self, channel: i64) {
        self.advanced().set_transfer_channel(channel);
    }

    pub fn transfer_mode(&self) -> TransferMode {
        self.advanced().get_transfer_mode()
    }

    pub fn set_transfer_mode(&self, mode: TransferMode) {
        self.advanced().set_transfer_mode(mode);
    }

    /// Address subsequent packets to peer `id`, or [`TARGET_PEER_BROADCAST`].
    pub fn set_target_peer(&self, id: i64) {
        self.advanced().set_target_peer(id);
    }

    /// Sender of the next packet to be read.
    pub fn packet_peer(&self) -> i64 {
        self.advanced().get_packet_peer()
    }

    pub fn packet_channel(&self) -> i64 {
        self.advanced().get_packet_channel()
    }

    pub fn packet_mode(&self) -> TransferMode {
        self.advanced().get_packet_mode()
    }

    pub fn poll(&self) {
        self.advanced().poll();
    }

    pub fn close(&self) {
        self.advanced().close();
    }

    pub fn disconnect_peer(&self, peer: i64) {
        self.advanced().disconnect_peer(peer, false);
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.advanced().get_connection_status()
    }

    pub fn unique_id(&self) -> i64 {
        self.advanced().get_unique_id()
    }

    /// A random id suitable for a new client.
    pub fn generate_unique_id(&self) -> i64 {
        self.advanced().generate_unique_id()
    }

    pub fn refuse_new_connections(&self) -> bool {
        self.advanced().is_refusing_new_connections()
    }

    pub fn set_refuse_new_connections(&self, refuse: bool) {
        self.advanced().set_refuse_new_connections(refuse);
    }

    pub fn is_server_relay_supported(&self) -> bool {
        self.advanced().is_server_relay_supported()
    }
}
