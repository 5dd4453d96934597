//! ABI type descriptors and opaque engine payloads.
//!
//! [`AbiType`] names how one argument or return value is laid out in a
//! ptrcall slot. The `Raw*` structs are uninterpreted storage for values the
//! engine owns (strings, packed arrays, variants, arrays, callables); gdbind only
//! creates and destroys them through the [`Interface`](crate::Interface).

use bytemuck::{Pod, Zeroable};

use crate::math::{Color, Vector3};
use crate::value::VariantType;

/// Element type of an engine packed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackedKind {
    Byte,
    Int32,
    Float32,
    Vector3,
    Color,
}

impl PackedKind {
    /// Size in bytes of one element.
    pub const fn element_size(self) -> usize {
        match self {
            PackedKind::Byte => 1,
            PackedKind::Int32 | PackedKind::Float32 => 4,
            PackedKind::Vector3 => 12,
            PackedKind::Color => 16,
        }
    }

    pub const fn variant_type(self) -> VariantType {
        match self {
            PackedKind::Byte => VariantType::PackedByteArray,
            PackedKind::Int32 => VariantType::PackedInt32Array,
            PackedKind::Float32 => VariantType::PackedFloat32Array,
            PackedKind::Vector3 => VariantType::PackedVector3Array,
            PackedKind::Color => VariantType::PackedColorArray,
        }
    }
}

/// Element types that can be copied in and out of a packed array.
pub trait PackedElement: Pod {
    const KIND: PackedKind;
}

impl PackedElement for u8 {
    const KIND: PackedKind = PackedKind::Byte;
}

impl PackedElement for i32 {
    const KIND: PackedKind = PackedKind::Int32;
}

impl PackedElement for f32 {
    const KIND: PackedKind = PackedKind::Float32;
}

impl PackedElement for Vector3 {
    const KIND: PackedKind = PackedKind::Vector3;
}

impl PackedElement for Color {
    const KIND: PackedKind = PackedKind::Color;
}

/// How a value is encoded in a ptrcall argument or return slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// No value (void return).
    Nil,
    Bool,
    Int,
    Float,
    Vector2,
    Vector3,
    Color,
    Quaternion,
    Plane,
    Aabb,
    Basis,
    Transform3D,
    Rid,
    String,
    StringName,
    NodePath,
    Packed(PackedKind),
    Variant,
    Array,
    Callable,
    /// Object pointer of the named class.
    Object(&'static str),
}

impl AbiType {
    /// Encoded size of the slot in bytes.
    pub const fn size(self) -> usize {
        match self {
            AbiType::Nil => 0,
            AbiType::Bool => 1,
            AbiType::Int | AbiType::Float | AbiType::Rid => 8,
            AbiType::Vector2 => 8,
            AbiType::Vector3 => 12,
            AbiType::Color | AbiType::Quaternion | AbiType::Plane => 16,
            AbiType::Aabb => 24,
            AbiType::Basis => 36,
            AbiType::Transform3D => 48,
            AbiType::String | AbiType::StringName | AbiType::NodePath | AbiType::Array => 8,
            AbiType::Packed(_) | AbiType::Callable => 16,
            AbiType::Variant => 24,
            AbiType::Object(_) => size_of::<usize>(),
        }
    }

    /// True when the slot holds an engine allocation that must be destroyed.
    pub const fn is_engine_owned(self) -> bool {
        matches!(
            self,
            AbiType::String
                | AbiType::StringName
                | AbiType::NodePath
                | AbiType::Packed(_)
                | AbiType::Variant
                | AbiType::Array
                | AbiType::Callable
        )
    }

    pub const fn is_object(self) -> bool {
        matches!(self, AbiType::Object(_))
    }
}

macro_rules! opaque_payload {
    ($($(#[$meta:meta])* $name:ident[$words:literal]),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
            #[repr(C)]
            pub struct $name {
                pub opaque: [u64; $words],
            }
        )*
    };
}

opaque_payload! {
    /// Storage for an engine `String`.
    RawString[1],
    /// Storage for an engine `StringName`.
    RawStringName[1],
    /// Storage for an engine `NodePath`.
    RawNodePath[1],
    /// Storage for any engine packed array.
    RawPacked[2],
    /// Storage for an engine `Variant`.
    RawVariant[3],
    /// Storage for an engine `Array`.
    RawArray[1],
    /// Storage for an engine `Callable`.
    RawCallable[2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes_match_slots() {
        assert_eq!(size_of::<RawString>(), AbiType::String.size());
        assert_eq!(size_of::<RawStringName>(), AbiType::StringName.size());
        assert_eq!(size_of::<RawPacked>(), AbiType::Packed(PackedKind::Byte).size());
        assert_eq!(size_of::<RawVariant>(), AbiType::Variant.size());
        assert_eq!(size_of::<RawArray>(), AbiType::Array.size());
        assert_eq!(size_of::<RawCallable>(), AbiType::Callable.size());
    }

    #[test]
    fn packed_element_sizes() {
        assert_eq!(PackedKind::Vector3.element_size(), size_of::<Vector3>());
        assert_eq!(PackedKind::Color.element_size(), size_of::<Color>());
        assert_eq!(<i32 as PackedElement>::KIND, PackedKind::Int32);
    }

    #[test]
    fn engine_owned_slots() {
        assert!(AbiType::String.is_engine_owned());
        assert!(AbiType::Packed(PackedKind::Color).is_engine_owned());
        assert!(!AbiType::Int.is_engine_owned());
        assert!(!AbiType::Object("Mesh").is_engine_owned());
        assert!(AbiType::Object("Mesh").is_object());
    }
}
