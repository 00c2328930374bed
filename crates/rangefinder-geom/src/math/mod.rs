// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Double-precision vector math for planetary-scale ray queries.

mod vec3;

pub use vec3::Vec3;

/// Degeneracy threshold used when normalising vectors.
pub const EPSILON: f64 = 1e-12;

/// Tolerance on `|direction| - 1` for a direction to count as unit length.
pub const UNIT_TOLERANCE: f64 = 1e-6;
