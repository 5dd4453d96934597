//! Conversions between Rust values and ptrcall slots.
//!
//! [`AbiArg`] pushes a parameter onto a [`CallFrame`]; [`AbiReturn`] decodes
//! a return slot. Both carry the [`AbiType`] the method catalog records, so
//! a shim's `ClassSpec` is derived from its Rust signature.
//!
//! [`VirtualArg`] and [`VirtualReturn`] run the other direction, for hooks
//! the engine calls on extension instances.

use std::ffi::c_void;

use bytemuck::Zeroable;

use gdbind_core::{
    AbiType, Aabb, Basis, CallFrame, Callable, Color, ConstTypePtr, ErrorCode, Interface, Lifetime, NodePath, ObjectPtr,
    Ownership, PackedElement, Plane, Quaternion, RawArray, RawNodePath, RawPacked, RawString, RawStringName,
    RawVariant, Rid, StringName, Transform3D, TypePtr, Value, Vector2, Vector3,
};

use crate::class::EngineClass;
use crate::obj::Obj;

/// A Rust value that can be passed as a method argument.
pub trait AbiArg {
    const TYPE: AbiType;

    fn push_arg(&self, frame: &mut CallFrame<'_>);
}

/// A Rust value decoded from a method's return slot.
pub trait AbiReturn<'lt>: Sized {
    const TYPE: AbiType;

    /// Slot layout written by the engine.
    type Raw: Copy + Zeroable;

    /// # Safety
    ///
    /// `raw` must have been written by a ptrcall returning [`Self::TYPE`]
    /// through `lifetime`'s interface. Engine payloads in it are consumed.
    unsafe fn from_return(raw: Self::Raw, lifetime: &'lt Lifetime) -> Self;
}

/// A hook parameter read from an engine-provided slot.
pub trait VirtualArg: Sized {
    /// # Safety
    ///
    /// `ptr` must point at a valid slot of this type.
    unsafe fn from_arg(ptr: ConstTypePtr, iface: &dyn Interface) -> Self;
}

/// A hook result written into the engine's return slot.
pub trait VirtualReturn {
    /// # Safety
    ///
    /// `ret` must point at writable storage for this type.
    unsafe fn write_return(self, ret: TypePtr, iface: &dyn Interface);
}

// ============================================================================
// Plain values
// ============================================================================

macro_rules! abi_pod {
    ($($ty:ty => $abi:expr),* $(,)?) => {$(
        impl AbiArg for $ty {
            const TYPE: AbiType = $abi;

            #[inline]
            fn push_arg(&self, frame: &mut CallFrame<'_>) {
                frame.push_value(*self);
            }
        }

        impl<'lt> AbiReturn<'lt> for $ty {
            const TYPE: AbiType = $abi;
            type Raw = $ty;

            #[inline]
            unsafe fn from_return(raw: $ty, _: &'lt Lifetime) -> Self {
                raw
            }
        }

        impl VirtualArg for $ty {
            #[inline]
            unsafe fn from_arg(ptr: ConstTypePtr, _: &dyn Interface) -> Self {
                // SAFETY: forwarded from the caller.
                unsafe { ptr.cast::<$ty>().read_unaligned() }
            }
        }

        impl VirtualReturn for $ty {
            #[inline]
            unsafe fn write_return(self, ret: TypePtr, _: &dyn Interface) {
                // SAFETY: forwarded from the caller.
                unsafe { ret.cast::<$ty>().write_unaligned(self) }
            }
        }
    )*};
}

abi_pod! {
    i64 => AbiType::Int,
    f64 => AbiType::Float,
    Vector2 => AbiType::Vector2,
    Vector3 => AbiType::Vector3,
    Color => AbiType::Color,
    Quaternion => AbiType::Quaternion,
    Plane => AbiType::Plane,
    Aabb => AbiType::Aabb,
    Basis => AbiType::Basis,
    Transform3D => AbiType::Transform3D,
    Rid => AbiType::Rid,
}

impl AbiArg for bool {
    const TYPE: AbiType = AbiType::Bool;

    #[inline]
    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_value(u8::from(*self));
    }
}

impl<'lt> AbiReturn<'lt> for bool {
    const TYPE: AbiType = AbiType::Bool;
    type Raw = u8;

    #[inline]
    unsafe fn from_return(raw: u8, _: &'lt Lifetime) -> Self {
        raw != 0
    }
}

impl VirtualArg for bool {
    unsafe fn from_arg(ptr: ConstTypePtr, _: &dyn Interface) -> Self {
        // SAFETY: forwarded from the caller.
        unsafe { ptr.cast::<u8>().read() != 0 }
    }
}

impl VirtualReturn for bool {
    unsafe fn write_return(self, ret: TypePtr, _: &dyn Interface) {
        // SAFETY: forwarded from the caller.
        unsafe { ret.cast::<u8>().write(u8::from(self)) }
    }
}

impl<'lt> AbiReturn<'lt> for () {
    const TYPE: AbiType = AbiType::Nil;
    type Raw = ();

    #[inline]
    unsafe fn from_return(_: (), _: &'lt Lifetime) -> Self {}
}

impl VirtualReturn for () {
    unsafe fn write_return(self, _: TypePtr, _: &dyn Interface) {}
}

impl AbiArg for ErrorCode {
    const TYPE: AbiType = AbiType::Int;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_value(i64::from(*self));
    }
}

impl<'lt> AbiReturn<'lt> for ErrorCode {
    const TYPE: AbiType = AbiType::Int;
    type Raw = i64;

    unsafe fn from_return(raw: i64, _: &'lt Lifetime) -> Self {
        ErrorCode::from(raw)
    }
}

impl VirtualReturn for ErrorCode {
    unsafe fn write_return(self, ret: TypePtr, _: &dyn Interface) {
        // SAFETY: forwarded from the caller.
        unsafe { ret.cast::<i64>().write_unaligned(i64::from(self)) }
    }
}

impl<T: AbiArg + ?Sized> AbiArg for &T {
    const TYPE: AbiType = T::TYPE;

    #[inline]
    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        (**self).push_arg(frame);
    }
}

// ============================================================================
// Strings
// ============================================================================

impl AbiArg for str {
    const TYPE: AbiType = AbiType::String;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_string(self);
    }
}

impl AbiArg for String {
    const TYPE: AbiType = AbiType::String;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_string(self);
    }
}

impl<'lt> AbiReturn<'lt> for String {
    const TYPE: AbiType = AbiType::String;
    type Raw = RawString;

    unsafe fn from_return(mut raw: RawString, lifetime: &'lt Lifetime) -> Self {
        let iface = lifetime.interface();
        // SAFETY: the engine initialized `raw`; it is destroyed exactly once.
        unsafe {
            let text = iface.string_to_utf8(&raw);
            iface.string_destroy(&mut raw);
            text
        }
    }
}

impl AbiArg for StringName {
    const TYPE: AbiType = AbiType::StringName;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_string_name(self.as_str());
    }
}

impl<'lt> AbiReturn<'lt> for StringName {
    const TYPE: AbiType = AbiType::StringName;
    type Raw = RawStringName;

    unsafe fn from_return(mut raw: RawStringName, lifetime: &'lt Lifetime) -> Self {
        let iface = lifetime.interface();
        // SAFETY: as for `String`.
        unsafe {
            let text = iface.string_name_to_utf8(&raw);
            iface.string_name_destroy(&mut raw);
            StringName::new(text)
        }
    }
}

impl AbiArg for NodePath {
    const TYPE: AbiType = AbiType::NodePath;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_node_path(self.as_str());
    }
}

impl<'lt> AbiReturn<'lt> for NodePath {
    const TYPE: AbiType = AbiType::NodePath;
    type Raw = RawNodePath;

    unsafe fn from_return(mut raw: RawNodePath, lifetime: &'lt Lifetime) -> Self {
        let iface = lifetime.interface();
        // SAFETY: as for `String`.
        unsafe {
            let text = iface.node_path_to_utf8(&raw);
            iface.node_path_destroy(&mut raw);
            NodePath::new(text)
        }
    }
}

// ============================================================================
// Packed arrays
// ============================================================================

macro_rules! abi_packed {
    ($($elem:ty),* $(,)?) => {$(
        impl AbiArg for [$elem] {
            const TYPE: AbiType = AbiType::Packed(<$elem as PackedElement>::KIND);

            fn push_arg(&self, frame: &mut CallFrame<'_>) {
                frame.push_packed(<$elem as PackedElement>::KIND, bytemuck::cast_slice(self));
            }
        }

        impl AbiArg for Vec<$elem> {
            const TYPE: AbiType = AbiType::Packed(<$elem as PackedElement>::KIND);

            fn push_arg(&self, frame: &mut CallFrame<'_>) {
                self.as_slice().push_arg(frame);
            }
        }

        impl<'lt> AbiReturn<'lt> for Vec<$elem> {
            const TYPE: AbiType = AbiType::Packed(<$elem as PackedElement>::KIND);
            type Raw = RawPacked;

            unsafe fn from_return(mut raw: RawPacked, lifetime: &'lt Lifetime) -> Self {
                let kind = <$elem as PackedElement>::KIND;
                let iface = lifetime.interface();
                // SAFETY: the engine initialized `raw` as a packed array of
                // `kind`; it is destroyed exactly once.
                let bytes = unsafe {
                    let bytes = iface.packed_array_bytes(kind, &raw);
                    iface.packed_array_destroy(kind, &mut raw);
                    bytes
                };
                decode_packed(&bytes)
            }
        }

        impl VirtualArg for Vec<$elem> {
            unsafe fn from_arg(ptr: ConstTypePtr, iface: &dyn Interface) -> Self {
                // SAFETY: the engine passes an initialized packed array it keeps owning.
                let bytes = unsafe { iface.packed_array_bytes(<$elem as PackedElement>::KIND, ptr.cast()) };
                decode_packed(&bytes)
            }
        }

        impl VirtualReturn for Vec<$elem> {
            unsafe fn write_return(self, ret: TypePtr, iface: &dyn Interface) {
                // SAFETY: the engine takes ownership of the array written into `ret`.
                unsafe {
                    iface.packed_array_new(<$elem as PackedElement>::KIND, ret.cast(), bytemuck::cast_slice(&self))
                }
            }
        }
    )*};
}

abi_packed!(u8, i32, f32, Vector3, Color);

fn decode_packed<T: PackedElement>(bytes: &[u8]) -> Vec<T> {
    bytes
        .chunks_exact(std::mem::size_of::<T>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

// ============================================================================
// Variants, arrays and callables
// ============================================================================

impl AbiArg for Value {
    const TYPE: AbiType = AbiType::Variant;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_variant(self);
    }
}

impl<'lt> AbiReturn<'lt> for Value {
    const TYPE: AbiType = AbiType::Variant;
    type Raw = RawVariant;

    unsafe fn from_return(mut raw: RawVariant, lifetime: &'lt Lifetime) -> Self {
        let iface = lifetime.interface();
        // SAFETY: as for `String`.
        unsafe {
            let value = iface.variant_to_value(&raw);
            iface.variant_destroy(&mut raw);
            value
        }
    }
}

impl AbiArg for [Value] {
    const TYPE: AbiType = AbiType::Array;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_array(self);
    }
}

impl AbiArg for Vec<Value> {
    const TYPE: AbiType = AbiType::Array;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_array(self);
    }
}

impl<'lt> AbiReturn<'lt> for Vec<Value> {
    const TYPE: AbiType = AbiType::Array;
    type Raw = RawArray;

    unsafe fn from_return(mut raw: RawArray, lifetime: &'lt Lifetime) -> Self {
        let iface = lifetime.interface();
        // SAFETY: as for `String`.
        unsafe {
            let items = iface.array_to_values(&raw);
            iface.array_destroy(&mut raw);
            items
        }
    }
}

impl AbiArg for Callable {
    const TYPE: AbiType = AbiType::Callable;

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_callable(self);
    }
}

// ============================================================================
// Objects
// ============================================================================

impl<T: EngineClass> AbiArg for Obj<'_, T> {
    const TYPE: AbiType = AbiType::Object(T::NAME);

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_object(Some(self.checked_ptr()));
    }
}

impl<T: EngineClass> AbiArg for Option<&Obj<'_, T>> {
    const TYPE: AbiType = AbiType::Object(T::NAME);

    fn push_arg(&self, frame: &mut CallFrame<'_>) {
        frame.push_object(self.map(Obj::checked_ptr));
    }
}

impl<'lt, T: EngineClass> AbiReturn<'lt> for Option<Obj<'lt, T>> {
    const TYPE: AbiType = AbiType::Object(T::NAME);
    type Raw = *mut c_void;

    /// Ref-counted results carry a reference for the caller and are owned;
    /// everything else stays owned by the engine.
    unsafe fn from_return(raw: *mut c_void, lifetime: &'lt Lifetime) -> Self {
        let object = ObjectPtr::new(raw)?;
        let ownership = if T::REFCOUNTED {
            Ownership::Owned
        } else {
            Ownership::Borrowed
        };
        // SAFETY: the engine just returned this live object.
        Some(unsafe { Obj::from_raw(lifetime, object, ownership) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdbind_core::PackedKind;

    #[test]
    fn abi_types_follow_rust_types() {
        assert_eq!(<i64 as AbiArg>::TYPE, AbiType::Int);
        assert_eq!(<&str as AbiArg>::TYPE, AbiType::String);
        assert_eq!(<&[Vector3] as AbiArg>::TYPE, AbiType::Packed(PackedKind::Vector3));
        assert_eq!(<Vec<Value> as AbiReturn<'static>>::TYPE, AbiType::Array);
        assert_eq!(<&Callable as AbiArg>::TYPE, AbiType::Callable);
        assert_eq!(<ErrorCode as AbiReturn<'static>>::TYPE, AbiType::Int);
        assert_eq!(<() as AbiReturn<'static>>::TYPE, AbiType::Nil);
    }

    #[test]
    fn packed_decode_reads_unaligned_bytes() {
        let colors = [Color::rgb(1.0, 0.0, 0.0), Color::WHITE];
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(bytemuck::cast_slice(&colors));
        let decoded: Vec<Color> = decode_packed(&bytes[1..]);
        assert_eq!(decoded, colors);
    }

    #[test]
    fn virtual_slots_round_trip() {
        let iface = crate::headless::HeadlessEngine::new();
        let mut slot = 0i64;
        unsafe {
            ErrorCode::Busy.write_return((&mut slot as *mut i64).cast(), &iface);
            let back = i64::from_arg((&slot as *const i64).cast(), &iface);
            assert_eq!(ErrorCode::from(back), ErrorCode::Busy);
        }
        let flag = 1u8;
        assert!(unsafe { bool::from_arg((&flag as *const u8).cast(), &iface) });
    }
}
