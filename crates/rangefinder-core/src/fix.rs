// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Placeholder target name shown when nothing is hit.
pub const NO_TARGET: &str = "<none>";

/// A positive range reading: distance to the obstruction and its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    /// Distance from the ray origin in metres.
    pub distance: f64,
    /// Name of the obstructing body or object.
    pub target: String,
}

impl Fix {
    /// Creates a fix.
    pub fn new(distance: f64, target: impl Into<String>) -> Self {
        Self {
            distance,
            target: target.into(),
        }
    }
}
