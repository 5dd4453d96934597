//! Values as the headless engine stores them, and their slot encodings.

use std::ffi::c_void;

use bytemuck::Pod;
use rustc_hash::FxHashMap;

use gdbind_core::{
    AbiType, Callable, ConstTypePtr, RawArray, RawCallable, RawNodePath, RawPacked, RawString, RawStringName,
    RawVariant, TypePtr, Value, Vector3,
};

/// A property value or decoded argument.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Stored {
    #[default]
    Nil,
    /// Bytes of a fixed-size slot (bools, numbers, math structs, RIDs).
    Plain(Vec<u8>),
    Text(String),
    Packed(Vec<u8>),
    Variant(Value),
    Array(Vec<Value>),
    /// Object address, `None` for null.
    Object(Option<usize>),
    Callable(Callable),
}

impl Stored {
    pub fn pod<P: Pod>(value: P) -> Self {
        Stored::Plain(bytemuck::bytes_of(&value).to_vec())
    }

    pub fn bool(value: bool) -> Self {
        Stored::pod(u8::from(value))
    }

    pub fn int(value: i64) -> Self {
        Stored::pod(value)
    }

    pub fn float(value: f64) -> Self {
        Stored::pod(value)
    }

    fn read<P: Pod>(&self) -> Option<P> {
        match self {
            Stored::Plain(bytes) if bytes.len() >= size_of::<P>() => {
                Some(bytemuck::pod_read_unaligned(&bytes[..size_of::<P>()]))
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        self.read::<u8>().is_some_and(|byte| byte != 0)
    }

    pub fn as_int(&self) -> i64 {
        self.read::<i64>().unwrap_or_default()
    }

    pub fn as_float(&self) -> f64 {
        self.read::<f64>().unwrap_or_default()
    }

    pub fn as_vector3(&self) -> Vector3 {
        self.read::<Vector3>().unwrap_or_default()
    }

    pub fn as_text(&self) -> &str {
        match self {
            Stored::Text(text) => text,
            _ => "",
        }
    }

    pub fn as_object(&self) -> Option<usize> {
        match self {
            Stored::Object(addr) => *addr,
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Stored::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Stored::Packed(bytes) => bytes,
            _ => &[],
        }
    }

    /// Key for indexed properties (`param_min[SCALE]`, `metadata["hp"]`).
    pub fn index_key(&self) -> IndexKey {
        match self {
            Stored::Text(text) => IndexKey::Name(text.clone()),
            Stored::Object(addr) => IndexKey::Int(addr.map_or(0, |addr| addr as i64)),
            other => IndexKey::Int(other.as_int()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum IndexKey {
    Int(i64),
    Name(String),
}

enum Payload {
    Text(String),
    Bytes(Vec<u8>),
    Variant(Value),
    Array(Vec<Value>),
    Callable(Callable),
}

/// Engine-side storage behind the opaque `Raw*` structs.
///
/// Every payload is keyed by an id written into the first word of its raw
/// struct. Destroying an unknown id counts as an invalid release.
#[derive(Default)]
pub(crate) struct PayloadTable {
    next_id: u64,
    live: FxHashMap<u64, Payload>,
    invalid_releases: usize,
    created: usize,
}

impl PayloadTable {
    fn insert(&mut self, payload: Payload) -> u64 {
        self.next_id += 1;
        self.created += 1;
        self.live.insert(self.next_id, payload);
        self.next_id
    }

    pub fn text(&mut self, text: &str) -> u64 {
        self.insert(Payload::Text(text.to_string()))
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> u64 {
        self.insert(Payload::Bytes(bytes.to_vec()))
    }

    pub fn variant(&mut self, value: &Value) -> u64 {
        self.insert(Payload::Variant(value.clone()))
    }

    pub fn array(&mut self, items: &[Value]) -> u64 {
        self.insert(Payload::Array(items.to_vec()))
    }

    pub fn callable(&mut self, callable: &Callable) -> u64 {
        self.insert(Payload::Callable(callable.clone()))
    }

    pub fn get_text(&self, id: u64) -> String {
        match self.live.get(&id) {
            Some(Payload::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    pub fn get_bytes(&self, id: u64) -> Vec<u8> {
        match self.live.get(&id) {
            Some(Payload::Bytes(bytes)) => bytes.clone(),
            _ => Vec::new(),
        }
    }

    pub fn get_variant(&self, id: u64) -> Value {
        match self.live.get(&id) {
            Some(Payload::Variant(value)) => value.clone(),
            _ => Value::Nil,
        }
    }

    pub fn get_array(&self, id: u64) -> Vec<Value> {
        match self.live.get(&id) {
            Some(Payload::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn get_callable(&self, id: u64) -> Option<Callable> {
        match self.live.get(&id) {
            Some(Payload::Callable(callable)) => Some(callable.clone()),
            _ => None,
        }
    }

    pub fn release(&mut self, id: u64) {
        if self.live.remove(&id).is_none() {
            self.invalid_releases += 1;
        }
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases
    }
}

/// Payload id stored in the first word of a raw payload struct.
///
/// # Safety
///
/// `ptr` must point at a readable raw payload.
pub(crate) unsafe fn payload_id(ptr: *const c_void) -> u64 {
    unsafe { ptr.cast::<u64>().read_unaligned() }
}

/// # Safety
///
/// `ptr` must point at a writable raw payload struct of at least `words` words.
pub(crate) unsafe fn write_payload_id(ptr: *mut c_void, id: u64, words: usize) {
    unsafe {
        let words_ptr = ptr.cast::<u64>();
        words_ptr.write_unaligned(id);
        for word in 1..words {
            words_ptr.add(word).write_unaligned(0);
        }
    }
}

fn payload_words(ty: AbiType) -> usize {
    match ty {
        AbiType::String => size_of::<RawString>() / 8,
        AbiType::StringName => size_of::<RawStringName>() / 8,
        AbiType::NodePath => size_of::<RawNodePath>() / 8,
        AbiType::Packed(_) => size_of::<RawPacked>() / 8,
        AbiType::Variant => size_of::<RawVariant>() / 8,
        AbiType::Array => size_of::<RawArray>() / 8,
        AbiType::Callable => size_of::<RawCallable>() / 8,
        _ => 0,
    }
}

/// Decode one argument slot.
///
/// # Safety
///
/// `ptr` must point at a valid slot of type `ty` whose payloads, if any,
/// live in `payloads`.
pub(crate) unsafe fn decode(ptr: ConstTypePtr, ty: AbiType, payloads: &PayloadTable) -> Stored {
    unsafe {
        match ty {
            AbiType::Nil => Stored::Nil,
            AbiType::String | AbiType::StringName | AbiType::NodePath => {
                Stored::Text(payloads.get_text(payload_id(ptr)))
            }
            AbiType::Packed(_) => Stored::Packed(payloads.get_bytes(payload_id(ptr))),
            AbiType::Variant => Stored::Variant(payloads.get_variant(payload_id(ptr))),
            AbiType::Array => Stored::Array(payloads.get_array(payload_id(ptr))),
            AbiType::Callable => payloads
                .get_callable(payload_id(ptr))
                .map_or(Stored::Nil, Stored::Callable),
            AbiType::Object(_) => {
                let raw = ptr.cast::<*mut c_void>().read_unaligned();
                Stored::Object((!raw.is_null()).then(|| raw.addr()))
            }
            plain => Stored::Plain(std::slice::from_raw_parts(ptr.cast::<u8>(), plain.size()).to_vec()),
        }
    }
}

/// Encode `value` into a return slot of type `ty`, creating payloads for
/// engine-owned types. Mismatched or missing values encode as zero.
///
/// # Safety
///
/// `ret` must point at writable storage for a slot of type `ty`.
pub(crate) unsafe fn encode(value: &Stored, ty: AbiType, ret: TypePtr, payloads: &mut PayloadTable) {
    let words = payload_words(ty);
    unsafe {
        match ty {
            AbiType::Nil => {}
            AbiType::String | AbiType::StringName | AbiType::NodePath => {
                write_payload_id(ret, payloads.text(value.as_text()), words)
            }
            AbiType::Packed(_) => write_payload_id(ret, payloads.bytes(value.as_bytes()), words),
            AbiType::Variant => {
                let value = match value {
                    Stored::Variant(value) => value.clone(),
                    _ => Value::Nil,
                };
                write_payload_id(ret, payloads.variant(&value), words)
            }
            AbiType::Array => {
                let items = match value {
                    Stored::Array(items) => items.as_slice(),
                    _ => &[],
                };
                write_payload_id(ret, payloads.array(items), words)
            }
            AbiType::Callable => match value {
                Stored::Callable(callable) => write_payload_id(ret, payloads.callable(callable), words),
                _ => write_payload_id(ret, 0, words),
            },
            AbiType::Object(_) => {
                let raw = value
                    .as_object()
                    .map_or(std::ptr::null_mut(), std::ptr::without_provenance_mut::<c_void>);
                ret.cast::<*mut c_void>().write_unaligned(raw);
            }
            plain => {
                let out = std::slice::from_raw_parts_mut(ret.cast::<u8>(), plain.size());
                out.fill(0);
                if let Stored::Plain(bytes) = value {
                    let len = bytes.len().min(out.len());
                    out[..len].copy_from_slice(&bytes[..len]);
                }
            }
        }
    }
}

/// Release the payload a decoded slot of type `ty` refers to.
///
/// # Safety
///
/// As [`decode`]; the payload must not be used afterwards.
pub(crate) unsafe fn release(ptr: ConstTypePtr, ty: AbiType, payloads: &mut PayloadTable) {
    if payload_words(ty) > 0 {
        payloads.release(unsafe { payload_id(ptr) });
    }
}

/// Owned argument slots for calls the headless engine makes itself.
pub(crate) struct SlotBuffer {
    storage: Vec<Box<[u64; 6]>>,
    owned_payloads: Vec<u64>,
}

impl SlotBuffer {
    /// Encode `args` as slots of `types`.
    pub fn new(args: &[Stored], types: &[AbiType], payloads: &mut PayloadTable) -> Self {
        let mut buffer = SlotBuffer {
            storage: Vec::with_capacity(args.len()),
            owned_payloads: Vec::new(),
        };
        for (arg, ty) in args.iter().zip(types) {
            let mut slot = Box::new([0u64; 6]);
            // SAFETY: every slot type fits in 48 bytes.
            unsafe { encode(arg, *ty, slot.as_mut_ptr().cast(), payloads) };
            if payload_words(*ty) > 0 && slot[0] != 0 {
                buffer.owned_payloads.push(slot[0]);
            }
            buffer.storage.push(slot);
        }
        buffer
    }

    pub fn pointers(&self) -> Vec<ConstTypePtr> {
        self.storage
            .iter()
            .map(|slot| slot.as_ptr().cast::<c_void>())
            .collect()
    }

    pub fn release(self, payloads: &mut PayloadTable) {
        for id in self.owned_payloads {
            payloads.release(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdbind_core::PackedKind;

    #[test]
    fn plain_values_round_trip_through_slots() {
        let mut payloads = PayloadTable::default();
        let mut slot = [0u64; 6];
        let value = Stored::pod(Vector3::new(1.0, 2.0, 3.0));
        unsafe {
            encode(&value, AbiType::Vector3, slot.as_mut_ptr().cast(), &mut payloads);
            let back = decode(slot.as_ptr().cast(), AbiType::Vector3, &payloads);
            assert_eq!(back.as_vector3(), Vector3::new(1.0, 2.0, 3.0));
        }
        assert_eq!(payloads.live(), 0);
    }

    #[test]
    fn mismatched_value_encodes_zero() {
        let mut payloads = PayloadTable::default();
        let mut slot = [u64::MAX; 6];
        unsafe { encode(&Stored::Nil, AbiType::Int, slot.as_mut_ptr().cast(), &mut payloads) };
        assert_eq!(slot[0], 0);
    }

    #[test]
    fn payload_slots_are_released_once() {
        let mut payloads = PayloadTable::default();
        let args = [Stored::Text("hello".into()), Stored::Packed(vec![1, 2, 3])];
        let buffer = SlotBuffer::new(&args, &[AbiType::String, AbiType::Packed(PackedKind::Byte)], &mut payloads);
        assert_eq!(payloads.live(), 2);

        let ptrs = buffer.pointers();
        let text = unsafe { decode(ptrs[0], AbiType::String, &payloads) };
        assert_eq!(text.as_text(), "hello");

        buffer.release(&mut payloads);
        assert_eq!(payloads.live(), 0);
        payloads.release(1);
        assert_eq!(payloads.invalid_releases(), 1);
    }

    #[test]
    fn callable_slots_decode_to_the_same_closure() {
        let mut payloads = PayloadTable::default();
        let callable = Callable::from_fn(gdbind_core::InstanceId::NONE, |_| {});
        let mut slot = [0u64; 6];
        unsafe {
            encode(&Stored::Callable(callable.clone()), AbiType::Callable, slot.as_mut_ptr().cast(), &mut payloads);
            let back = decode(slot.as_ptr().cast(), AbiType::Callable, &payloads);
            assert_eq!(back.as_callable(), Some(&callable));
            release(slot.as_ptr().cast(), AbiType::Callable, &mut payloads);
        }
        assert_eq!(payloads.live(), 0);
        assert_eq!(payloads.invalid_releases(), 0);
    }
}
