use gdbind_core::{ErrorCode, Value};

use crate::Obj;
use crate::classes::{Object, RefCounted};
use crate::macros::engine_class;

engine_class! {
    /// Packet-based connection.
    pub struct PacketPeer: "PacketPeer" => RefCounted;
    refcounted: true;
    ancestors { as_ref_counted => RefCounted, as_object => Object }
    methods<'lt> {
        get_var(allow_objects: bool) -> Value = 3442865206;
        put_var(var: &Value, full_objects: bool) -> ErrorCode = 2436251611;
        get_packet() -> Vec<u8> = 2115431945;
        put_packet(buffer: &[u8]) -> ErrorCode = 680677267;
        get_packet_error() -> ErrorCode = 3185525595;
        get_available_packet_count() -> i64 = 3905245786;
        get_encode_buffer_max_size() -> i64 => get "encode_buffer_max_size" = 3905245786;
        set_encode_buffer_max_size(max_size: i64) => set "encode_buffer_max_size" = 1286410249;
    }
}

impl<'lt> Obj<'lt, PacketPeer> {
    /// Next packet decoded as a variant; objects are never decoded.
    pub fn get_var(&self) -> Value {
        self.advanced().get_var(false)
    }

    pub fn put_var(&self, value: impl Into<Value>) -> ErrorCode {
        self.advanced().put_var(&value.into(), false)
    }

    pub fn get_packet(&self) -> Vec<u8> {
        self.advanced().get_packet()
    }

    pub fn put_packet(&self, buffer: &[u8]) -> ErrorCode {
        self.advanced().put_packet(buffer)
    }

    /// Error state of the last received packet.
    pub fn packet_error(&self) -> ErrorCode {
        self.advanced().get_packet_error()
    }

    pub fn available_packet_count(&self) -> i64 {
        self.advanced().get_available_packet_count()
    }

    pub fn encode_buffer_max_size(&self) -> i64 {
        self.advanced().get_encode_buffer_max_size()
    }

    pub fn set_encode_buffer_max_size(&self, max_size: i64) {
        self.advanced().set_encode_buffer_max_size(max_size);
    }
}
