use gdbind_core::{Callable, ErrorCode, StringName, Value};

use crate::Obj;
use crate::classes::{MultiplayerPeer, Object, RefCounted};
use crate::macros::{engine_class, engine_enum};

engine_enum! {
    /// Who may call a remote procedure.
    pub struct RpcMode {
        DISABLED = 0,
        ANY_PEER = 1,
        AUTHORITY = 2,
    }
}

engine_class! {
    /// High-level multiplayer interface of a scene tree.
    pub struct MultiplayerApi: "MultiplayerAPI" => RefCounted;
    refcounted: true;
    ancestors { as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        has_multiplayer_peer() -> bool = 2240911060;
        get_multiplayer_peer() -> Option<Obj<'lt, MultiplayerPeer>> => get "multiplayer_peer" = 3223692825;
        set_multiplayer_peer(peer: Option<&Obj<'_, MultiplayerPeer>>) => set "multiplayer_peer" = 3694835298;
        get_unique_id() -> i64 = 2455072627;
        is_server() -> bool = 2240911060;
        get_remote_sender_id() -> i64 = 2455072627;
        poll() -> ErrorCode = 166280745;
        rpc(peer: i64, object: &Obj<'_, Object>, method: &StringName, arguments: &[Value]) -> ErrorCode = 2077486355;
        object_configuration_add(object: &Obj<'_, Object>, configuration: &Value) -> ErrorCode = 1171879464;
        object_configuration_remove(object: &Obj<'_, Object>, configuration: &Value) -> ErrorCode = 1171879464;
        get_peers() -> Vec<i32> = 969006518;
    }
}

impl<'lt> Obj<'lt, MultiplayerApi> {
    pub fn has_multiplayer_peer(&self) -> bool {
        self.advanced().has_multiplayer_peer()
    }

    pub fn multiplayer_peer(&self) -> Option<Obj<'lt, MultiplayerPeer>> {
        self.advanced().get_multiplayer_peer()
    }

    /// Replace the transport; `None` disconnects.
    pub fn set_multiplayer_peer<P>(&self, peer: Option<&Obj<'_, P>>)
    where
        P: crate::Inherits<MultiplayerPeer>,
    {
        self.advanced()
            .set_multiplayer_peer(peer.map(|peer| peer.upcast_ref::<MultiplayerPeer>()));
    }

    pub fn unique_id(&self) -> i64 {
        self.advanced().get_unique_id()
    }

    pub fn is_server(&self) -> bool {
        self.advanced().is_server()
    }

    /// Sender of the RPC being processed, 0 outside of one.
    pub fn remote_sender_id(&self) -> i64 {
        self.advanced().get_remote_sender_id()
    }

    pub fn poll(&self) -> ErrorCode {
        self.advanced().poll()
    }

    /// Call `method` on `object` on peer `peer` (0 for every peer).
    pub fn rpc<T>(&self, peer: i64, object: &Obj<'_, T>, method: &str, arguments: &[Value]) -> ErrorCode
    where
        T: crate::Inherits<Object>,
    {
        self.advanced().rpc(
            peer,
            object.upcast_ref::<Object>(),
            &StringName::from(method),
            arguments,
        )
    }

    pub fn peers(&self) -> Vec<i32> {
        self.advanced().get_peers()
    }

    /// Run `handler` with the id of every peer that connects.
    pub fn on_peer_connected(&self, handler: impl Fn(i64) + Send + Sync + 'static) -> Result<Callable, ErrorCode> {
        self.connect("peer_connected", move |args| handler(peer_id(args)))
    }

    /// Run `handler` with the id of every peer that disconnects.
    pub fn on_peer_disconnected(
        &self,
        handler: impl Fn(i64) + Send + Sync + 'static,
    ) -> Result<Callable, ErrorCode> {
        self.connect("peer_disconnected", move |args| handler(peer_id(args)))
    }
}

fn peer_id(args: &[Value]) -> i64 {
    match args.first() {
        Some(Value::Int(id)) => *id,
        _ => 0,
    }
}
