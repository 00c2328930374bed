// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::Vec3;
use crate::types::ray::Ray;

/// Sphere in world coordinates.
///
/// Bodies are bounded by two of these: one at the lowest terrain radius and
/// one at the highest.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
}

impl Sphere {
    /// Creates a sphere.
    pub const fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Centre point.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius in metres.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// `true` if `point` lies inside or on the sphere.
    pub fn contains(&self, point: Vec3) -> bool {
        point.sub(&self.center).length_squared() <= self.radius * self.radius
    }
}

/// Signed distances at which a ray's supporting line enters and leaves a sphere.
///
/// `near <= far`. Either value is negative when that crossing lies behind the
/// ray origin; both are negative when the whole sphere is behind it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereCrossing {
    /// Entry distance along the ray.
    pub near: f64,
    /// Exit distance along the ray.
    pub far: f64,
}

impl SphereCrossing {
    /// Distance to the point on the line closest to the sphere centre.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.near + self.far)
    }

    /// First crossing distance that lies ahead of the origin.
    ///
    /// Returns `0.0` when the origin is inside the sphere and `None` when the
    /// sphere lies entirely behind the ray.
    pub fn first_forward(&self) -> Option<f64> {
        if self.far < 0.0 {
            None
        } else {
            Some(self.near.max(0.0))
        }
    }
}

/// Intersects the infinite line through `ray` with `sphere`.
///
/// The origin-to-centre vector is projected onto the (unit) ray direction to
/// get the distance to the closest approach; its perpendicular remainder is
/// the offset of the line from the centre. The line misses when that offset
/// exceeds the radius; otherwise the half-chord `sqrt(r² - offset²)` is taken
/// either side of the closest approach.
///
/// The direction must be unit length (see [`Ray::is_unit`]); distances are
/// scaled by its length otherwise.
pub fn intersect_line(ray: &Ray, sphere: &Sphere) -> Option<SphereCrossing> {
    let to_center = sphere.center.sub(&ray.origin());
    let projected = to_center.dot(&ray.direction());
    // Clamped: rounding can push the difference slightly negative on-axis.
    let offset_sq = (to_center.length_squared() - projected * projected).max(0.0);
    let radius_sq = sphere.radius * sphere.radius;
    if offset_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - offset_sq).sqrt();
    Some(SphereCrossing {
        near: projected - half_chord,
        far: projected + half_chord,
    })
}
