//! # Particle-Space Math
//!
//! Value types stored in [`ParticleRecord`](crate::record::ParticleRecord)s
//! and handed to collaborators. Every type is `#[repr(C)]` + `Pod`, so a mesh
//! collaborator can copy records into vertex memory without conversion.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A point, velocity or direction in a particle system's local space.
///
/// `#[repr(C)]` with no padding: twelve bytes, `x` first.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// Right.
    pub x: f32,
    /// Up. Gravity defaults pull along `-y`.
    pub y: f32,
    /// Toward the viewer.
    pub z: f32,
}

impl Vec3 {
    /// Origin / particle at rest.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// `(1, 1, 1)`.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// `+x` axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// `+y` axis, the default emission direction of flat mesh faces.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// `+z` axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Builds a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Components in vertex order.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Sum of component products.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        let Self { x, y, z } = self;
        x * rhs.x + y * rhs.y + z * rhs.z
    }

    /// Right-handed perpendicular of `self` and `rhs`.
    #[must_use]
    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Squared magnitude; cheap speed comparisons.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Magnitude (speed, for a velocity).
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Straight-line gap between two positions.
    #[must_use]
    pub fn distance(self, to: Self) -> f32 {
        (to - self).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            self / length
        } else {
            Self::ZERO
        }
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

macro_rules! componentwise {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $sym:tt) => {
        impl std::ops::$op for Vec3 {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self { x: self.x $sym rhs.x, y: self.y $sym rhs.y, z: self.z $sym rhs.z }
            }
        }

        impl std::ops::$assign for Vec3 {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $sym rhs;
            }
        }
    };
}

componentwise!(Add, add, AddAssign, add_assign, +);
componentwise!(Sub, sub, SubAssign, sub_assign, -);

macro_rules! scalar {
    ($op:ident, $method:ident, $sym:tt) => {
        impl std::ops::$op<f32> for Vec3 {
            type Output = Self;
            #[inline]
            fn $method(self, k: f32) -> Self {
                Self { x: self.x $sym k, y: self.y $sym k, z: self.z $sym k }
            }
        }
    };
}

scalar!(Mul, mul, *);
scalar!(Div, div, /);

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

/// Particle or camera orientation, `xyz` vector part then scalar `w`.
///
/// Spin integration renormalizes after every multiply, so stored values stay
/// close to unit length.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// Vector part, `x`.
    pub x: f32,
    /// Vector part, `y`.
    pub y: f32,
    /// Vector part, `z`.
    pub z: f32,
    /// Scalar part.
    pub w: f32,
}

impl Quaternion {
    /// No rotation; freshly activated particles start here.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Raw components, not normalized.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize_or_zero();
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Rotation built from per-axis angles (radians).
    ///
    /// The X rotation is applied first, then Y, then Z.
    #[must_use]
    pub fn from_angles(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_angle(Vec3::X, x);
        let qy = Self::from_axis_angle(Vec3::Y, y);
        let qz = Self::from_axis_angle(Vec3::Z, z);
        qz * qy * qx
    }

    /// Squared norm
    #[must_use]
    pub fn norm_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Conjugate (the inverse of a unit quaternion)
    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse; identity for a zero quaternion.
    #[must_use]
    pub fn inverse(self) -> Self {
        let norm = self.norm_squared();
        if norm > 0.0 {
            let c = self.conjugate();
            Self::new(c.x / norm, c.y / norm, c.z / norm, c.w / norm)
        } else {
            Self::IDENTITY
        }
    }

    /// Renormalizes to unit length, falling back to identity.
    #[must_use]
    pub fn normalize(self) -> Self {
        let norm = self.norm_squared().sqrt();
        if norm > 0.0 && norm.is_finite() {
            Self::new(self.x / norm, self.y / norm, self.z / norm, self.w / norm)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotates a vector by this quaternion.
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let axis = Vec3::new(self.x, self.y, self.z);
        let t = axis.cross(v) * 2.0;
        v + t * self.w + axis.cross(t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

/// RGBA color, linear components in `[0, 1]`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Builds a color from linear components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Opaque yellow
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);

    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Components in vertex order, `rgba`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Placement of one space inside another: scale, then rotate, then move.
///
/// Sources and influencers use it to map positions from another space
/// (a reference mesh, a tracked target) into the system's local space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Transform {
    /// Offset applied last.
    pub translation: Vec3,
    /// Uniform scale applied first.
    pub scale: f32,
    /// Rotation applied after scaling.
    pub rotation: Quaternion,
}

impl Transform {
    /// Both spaces coincide.
    pub const IDENTITY: Self = Self::new(Vec3::ZERO, Quaternion::IDENTITY, 1.0);

    /// Builds a placement from its parts.
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quaternion, scale: f32) -> Self {
        Self { translation, scale, rotation }
    }

    /// Pure translation
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quaternion::IDENTITY, 1.0)
    }

    /// Maps a point: scale, then rotate, then translate.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.rotate(point * self.scale) + self.translation
    }

    /// Maps a direction (no translation, no scale).
    #[must_use]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.rotate(direction)
    }

    /// Inverse of [`Transform::transform_point`].
    ///
    /// A zero scale collapses everything onto the translation origin.
    #[must_use]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse().rotate(point - self.translation);
        if self.scale == 0.0 {
            Vec3::ZERO
        } else {
            unrotated / self.scale
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
