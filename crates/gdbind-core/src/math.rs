//! Fixed-layout math structs matching the engine's single-precision build.
//!
//! Every type is `#[repr(C)]` with `f32` fields and derives bytemuck's
//! `Pod`, so a value is pushed into a call frame and read back from a return
//! slot as plain bytes. Arithmetic is delegated to `glam` through the `From`
//! conversions at the bottom of this module.

use std::ops::{Add, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);
    pub const UP: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const FORWARD: Vector3 = Vector3::new(0.0, 0.0, -1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn dot(self, other: Vector3) -> f32 {
        glam::Vec3::from(self).dot(other.into())
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        glam::Vec3::from(self).cross(other.into()).into()
    }

    pub fn length(self) -> f32 {
        glam::Vec3::from(self).length()
    }

    pub fn normalized(self) -> Vector3 {
        glam::Vec3::from(self).normalize_or_zero().into()
    }

    pub fn min(self, other: Vector3) -> Vector3 {
        glam::Vec3::from(self).min(other.into()).into()
    }

    pub fn max(self, other: Vector3) -> Vector3 {
        glam::Vec3::from(self).max(other.into()).into()
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

/// Linear RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Parses `0xRRGGBBAA`.
    pub fn from_rgba8_hex(hex: u32) -> Self {
        let [r, g, b, a] = hex.to_be_bytes();
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        glam::Quat::from_axis_angle(glam::Vec3::from(axis).normalize_or_zero(), angle).into()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Plane {
    pub normal: Vector3,
    pub d: f32,
}

impl Plane {
    pub const fn new(normal: Vector3, d: f32) -> Self {
        Self { normal, d }
    }

    pub fn distance_to(self, point: Vector3) -> f32 {
        self.normal.dot(point) - self.d
    }
}

/// Axis-aligned bounding box stored as position plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Aabb {
    pub position: Vector3,
    pub size: Vector3,
}

impl Aabb {
    pub const fn new(position: Vector3, size: Vector3) -> Self {
        Self { position, size }
    }

    /// Box centered on `center` with the given half extents.
    pub fn from_center_extents(center: Vector3, extents: Vector3) -> Self {
        Self::new(center - extents, extents * 2.0)
    }

    pub fn end(self) -> Vector3 {
        self.position + self.size
    }

    pub fn center(self) -> Vector3 {
        self.position + self.size * 0.5
    }

    pub fn volume(self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }

    pub fn contains_point(self, point: Vector3) -> bool {
        let end = self.end();
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.z >= self.position.z
            && point.x <= end.x
            && point.y <= end.y
            && point.z <= end.z
    }

    pub fn merge(self, other: Aabb) -> Aabb {
        let start = self.position.min(other.position);
        let end = self.end().max(other.end());
        Aabb::new(start, end - start)
    }
}

/// 3x3 matrix stored as rows, matching the engine's `Basis`.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Basis {
    pub rows: [Vector3; 3],
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        rows: [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
    };

    pub fn from_quaternion(q: Quaternion) -> Self {
        glam::Mat3::from_quat(q.into()).into()
    }

    pub fn xform(self, v: Vector3) -> Vector3 {
        Vector3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }
}

impl Default for Basis {
    fn default() -> Self {
        Basis::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform3D {
    pub basis: Basis,
    pub origin: Vector3,
}

impl Transform3D {
    pub const IDENTITY: Transform3D = Transform3D {
        basis: Basis::IDENTITY,
        origin: Vector3::ZERO,
    };

    pub const fn new(basis: Basis, origin: Vector3) -> Self {
        Self { basis, origin }
    }

    pub const fn from_translation(origin: Vector3) -> Self {
        Self::new(Basis::IDENTITY, origin)
    }

    pub fn xform(self, v: Vector3) -> Vector3 {
        self.basis.xform(v) + self.origin
    }
}

/// Server-side resource id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rid(pub u64);

impl Rid {
    pub const INVALID: Rid = Rid(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

// ============================================================================
// glam interop
// ============================================================================

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Vector2::new(v.x, v.y)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec4> for Color {
    fn from(v: glam::Vec4) -> Self {
        Color::rgba(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for glam::Vec4 {
    fn from(c: Color) -> Self {
        glam::Vec4::new(c.r, c.g, c.b, c.a)
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        Quaternion::new(q.x, q.y, q.z, q.w)
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<glam::Mat3> for Basis {
    fn from(m: glam::Mat3) -> Self {
        Basis {
            rows: [m.row(0).into(), m.row(1).into(), m.row(2).into()],
        }
    }
}

impl From<Basis> for glam::Mat3 {
    fn from(b: Basis) -> Self {
        glam::Mat3::from_cols(b.rows[0].into(), b.rows[1].into(), b.rows[2].into()).transpose()
    }
}
