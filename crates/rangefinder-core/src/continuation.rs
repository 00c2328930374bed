// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Search intervals and the suspended-search record carried between ticks.

use rangefinder_geom::Vec3;

/// A stretch of a ray that has not been resolved yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    start: Vec3,
    direction: Vec3,
    length: f64,
}

impl Interval {
    /// Creates an interval of `length` metres from `start` along `direction`.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite; callers derive lengths
    /// from validated bounds, so this indicates a bug.
    pub fn new(start: Vec3, direction: Vec3, length: f64) -> Self {
        assert!(
            length.is_finite() && length >= 0.0,
            "malformed search interval length: {length}"
        );
        Self {
            start,
            direction,
            length,
        }
    }

    /// World-space start point.
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Unit direction inherited from the ray.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Point `offset` metres past the start (negative offsets lie before it).
    pub fn point_at(&self, offset: f64) -> Vec3 {
        self.start + self.direction * offset
    }

    /// Sub-interval from `offset` to this interval's far end.
    ///
    /// `offset` may be negative to back up before the start.
    pub fn remainder_from(&self, offset: f64) -> Self {
        Self::new(
            self.point_at(offset),
            self.direction,
            (self.length - offset).max(0.0),
        )
    }
}

/// Where a terrain search (re)starts.
///
/// A fresh solve builds one from the prefilter bounds; a scan that runs out
/// of budget returns one describing the unresolved remainder, and the next
/// tick hands it back to the scanner unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Continuation {
    /// Name of the body being searched.
    pub body: String,
    /// Unresolved part of the ray.
    pub interval: Interval,
    /// Samples per walk of `interval`.
    pub slices: u32,
    /// A crossing was already found and is being narrowed down.
    pub honing: bool,
}

impl Continuation {
    /// A fresh search over `interval`.
    pub fn start(body: impl Into<String>, interval: Interval, slices: u32) -> Self {
        Self {
            body: body.into(),
            interval,
            slices,
            honing: false,
        }
    }
}
