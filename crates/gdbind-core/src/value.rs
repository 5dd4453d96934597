//! Rust-side representation of engine variants.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::math::{Aabb, Color, Quaternion, Transform3D, Vector2, Vector3};
use crate::sys::ObjectPtr;

/// The engine's `Variant::Type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum VariantType {
    Nil = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Vector2 = 5,
    Vector2i = 6,
    Rect2 = 7,
    Rect2i = 8,
    Vector3 = 9,
    Vector3i = 10,
    Transform2D = 11,
    Vector4 = 12,
    Vector4i = 13,
    Plane = 14,
    Quaternion = 15,
    Aabb = 16,
    Basis = 17,
    Transform3D = 18,
    Projection = 19,
    Color = 20,
    StringName = 21,
    NodePath = 22,
    Rid = 23,
    Object = 24,
    Callable = 25,
    Signal = 26,
    Dictionary = 27,
    Array = 28,
    PackedByteArray = 29,
    PackedInt32Array = 30,
    PackedInt64Array = 31,
    PackedFloat32Array = 32,
    PackedFloat64Array = 33,
    PackedStringArray = 34,
    PackedVector2Array = 35,
    PackedVector3Array = 36,
    PackedColorArray = 37,
}

/// A variant value copied out of (or destined for) the engine.
///
/// Only the variant types the bound classes exchange are representable; any
/// other engine variant decodes to [`Value::Nil`].
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    StringName(String),
    Vector2(Vector2),
    Vector3(Vector3),
    Color(Color),
    Quaternion(Quaternion),
    Aabb(Aabb),
    Transform3D(Transform3D),
    /// Object pointer; the variant does not own a reference.
    Object(ObjectPtr),
}

impl Value {
    /// The engine type tag this value encodes to.
    pub fn variant_type(&self) -> VariantType {
        match self {
            Value::Nil => VariantType::Nil,
            Value::Bool(_) => VariantType::Bool,
            Value::Int(_) => VariantType::Int,
            Value::Float(_) => VariantType::Float,
            Value::String(_) => VariantType::String,
            Value::StringName(_) => VariantType::StringName,
            Value::Vector2(_) => VariantType::Vector2,
            Value::Vector3(_) => VariantType::Vector3,
            Value::Color(_) => VariantType::Color,
            Value::Quaternion(_) => VariantType::Quaternion,
            Value::Aabb(_) => VariantType::Aabb,
            Value::Transform3D(_) => VariantType::Transform3D,
            Value::Object(_) => VariantType::Object,
        }
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "String",
            Value::StringName(_) => "StringName",
            Value::Vector2(_) => "Vector2",
            Value::Vector3(_) => "Vector3",
            Value::Color(_) => "Color",
            Value::Quaternion(_) => "Quaternion",
            Value::Aabb(_) => "AABB",
            Value::Transform3D(_) => "Transform3D",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view; floats are not truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view, widening integers the way the engine does.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::StringName(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vector3> {
        match self {
            Value::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectPtr> {
        match self {
            Value::Object(o) => Some(*o),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::StringName(s) => write!(f, "StringName({s:?})"),
            Value::Vector2(v) => write!(f, "Vector2({}, {})", v.x, v.y),
            Value::Vector3(v) => write!(f, "Vector3({}, {}, {})", v.x, v.y, v.z),
            Value::Color(c) => write!(f, "Color({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            Value::Quaternion(q) => write!(f, "Quaternion({}, {}, {}, {})", q.x, q.y, q.z, q.w),
            Value::Aabb(a) => write!(f, "Aabb({:?}, {:?})", a.position, a.size),
            Value::Transform3D(t) => write!(f, "Transform3D({:?})", t),
            Value::Object(o) => write!(f, "Object({o:?})"),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => |$v:ident| $expr:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $expr
                }
            }
        )*
    };
}

impl_value_from! {
    bool => |v| Value::Bool(v),
    i64 => |v| Value::Int(v),
    i32 => |v| Value::Int(i64::from(v)),
    u32 => |v| Value::Int(i64::from(v)),
    f64 => |v| Value::Float(v),
    f32 => |v| Value::Float(f64::from(v)),
    String => |v| Value::String(v),
    &str => |v| Value::String(v.to_owned()),
    Vector2 => |v| Value::Vector2(v),
    Vector3 => |v| Value::Vector3(v),
    Color => |v| Value::Color(v),
    Quaternion => |v| Value::Quaternion(v),
    Aabb => |v| Value::Aabb(v),
    Transform3D => |v| Value::Transform3D(v),
    ObjectPtr => |v| Value::Object(v),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Nil.type_name(), "Nil");
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::Float(0.0).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "String");
    }

    #[test]
    fn variant_type_tags() {
        assert_eq!(Value::from(true).variant_type(), VariantType::Bool);
        assert_eq!(Value::from(Vector3::ZERO).variant_type(), VariantType::Vector3);
        assert_eq!(u32::from(VariantType::Color), 20);
        assert_eq!(
            VariantType::try_from(36).ok(),
            Some(VariantType::PackedVector3Array)
        );
        assert!(VariantType::try_from(99).is_err());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(3).as_int(), Some(3));
        assert_eq!(Value::from(3).as_float(), Some(3.0));
        assert_eq!(Value::from(1.5f32).as_int(), None);
        assert_eq!(Value::StringName("peer".into()).as_str(), Some("peer"));
        assert!(Value::from(None::<i64>).is_nil());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Value::Int(7)), "Int(7)");
        assert_eq!(format!("{:?}", Value::from("a")), "String(\"a\")");
    }
}
