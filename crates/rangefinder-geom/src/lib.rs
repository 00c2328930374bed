// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for the rangefinder.

This crate provides:
- Double-precision vectors (`Vec3`).
- Rays with a validated unit direction (`Ray`).
- Spheres and the analytic line/sphere prefilter (`intersect_line`) used to
  bracket terrain searches between a body's minimum and maximum radius.

Design notes:
- `f64` throughout; planetary radii exceed what `f32` resolves to the metre.
- Rustdoc is treated as part of the contract; public items are documented.
"]

/// Error type for rejected geometric input.
pub mod error;
/// Vector math.
pub mod math;
/// Foundational geometric types.
pub mod types;

pub use error::GeomError;
pub use math::Vec3;
pub use types::ray::Ray;
pub use types::sphere::{intersect_line, Sphere, SphereCrossing};
