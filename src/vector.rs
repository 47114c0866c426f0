//! 2D vector helpers for the simulation.
//!
//! The simulation works in `f64` throughout on Bevy's `DVec2`. Arithmetic,
//! length, normalization and distance come from glam; this module adds the
//! polar/rotation/bearing helpers the physics and predictor need.

use std::f64::consts::{PI, TAU};

use bevy::math::DVec2;

/// Extra constructors and angle helpers for [`DVec2`].
pub trait Vector2Ext {
    /// Vector of the given length pointing along `angle` (radians from +x).
    fn from_polar(angle: f64, length: f64) -> Self;

    /// Unit vector pointing along `angle`.
    fn unit_at(angle: f64) -> Self;

    /// This vector rotated counter-clockwise by `angle` radians.
    fn rotated(self, angle: f64) -> Self;

    /// Angle of the direction from `origin` to `self`, in `(-π, π]`.
    fn bearing_from(self, origin: Self) -> f64;

    /// Angle of this vector measured from +x, in `(-π, π]`.
    fn angle(self) -> f64;
}

impl Vector2Ext for DVec2 {
    #[inline]
    fn from_polar(angle: f64, length: f64) -> Self {
        DVec2::new(angle.cos() * length, angle.sin() * length)
    }

    #[inline]
    fn unit_at(angle: f64) -> Self {
        Self::from_polar(angle, 1.0)
    }

    #[inline]
    fn rotated(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        DVec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    #[inline]
    fn bearing_from(self, origin: Self) -> f64 {
        (self - origin).angle()
    }

    #[inline]
    fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Wrap an angle difference into `(-π, π]`.
///
/// Used for signed revolution counting: the raw difference of two `atan2`
/// results jumps by 2π when the bearing crosses the ±π seam.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}
