// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#[doc = "Half-lines with a unit direction."]
pub mod ray;
#[doc = "Spheres and the analytic line/sphere prefilter."]
pub mod sphere;
