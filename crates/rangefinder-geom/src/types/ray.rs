// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::error::GeomError;
use crate::math::{Vec3, UNIT_TOLERANCE};

/// Half-line from `origin` along `direction`.
///
/// Invariants (when built through [`Ray::new`]):
/// - `origin` and `direction` are finite.
/// - `direction` has unit length within [`UNIT_TOLERANCE`].
///
/// [`Ray::from_parts_unchecked`] skips both checks; consumers that need the
/// invariant call [`Ray::is_unit`] before relying on it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalising `direction`.
    ///
    /// # Errors
    /// - [`GeomError::NonFinite`] if any component is NaN or infinite.
    /// - [`GeomError::DegenerateDirection`] if `direction` cannot be normalised.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, GeomError> {
        if !origin.is_finite() || !direction.is_finite() {
            return Err(GeomError::NonFinite);
        }
        let unit = direction.normalize();
        if unit == Vec3::ZERO {
            return Err(GeomError::DegenerateDirection);
        }
        Ok(Self { origin, direction: unit })
    }

    /// Builds a ray from raw parts without validating or normalising.
    pub const fn from_parts_unchecked(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray origin.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Ray direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at signed distance `t` along the ray.
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// `true` if `point` is ahead of the origin: the angle between
    /// `point - origin` and the direction is at most 90°.
    pub fn is_ahead(&self, point: Vec3) -> bool {
        point.sub(&self.origin).angle_between(&self.direction) <= 90.0
    }

    /// `true` if the ray is finite and its direction is unit length.
    pub fn is_unit(&self) -> bool {
        self.origin.is_finite()
            && self.direction.is_finite()
            && (self.direction.length() - 1.0).abs() <= UNIT_TOLERANCE
    }
}
