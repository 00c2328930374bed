// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Celestial bodies and their analytic terrain.

use std::fmt;

use rangefinder_geom::{Sphere, Vec3};
use thiserror::Error;

/// Analytic terrain model for one body.
///
/// Implementations are external oracles: the solver only samples them and
/// never assumes continuity between samples.
pub trait HeightOracle {
    /// Terrain elevation, in metres above the body's reference radius, of the
    /// ground directly beneath `point` (world space).
    fn surface_height(&self, point: Vec3) -> f64;
}

impl<F> HeightOracle for F
where
    F: Fn(Vec3) -> f64,
{
    fn surface_height(&self, point: Vec3) -> f64 {
        self(point)
    }
}

/// Rejected body envelope.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    /// A radius was negative, NaN, or infinite.
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),
    /// The minimum terrain radius exceeds the maximum.
    #[error("terrain envelope inverted: min {min} > max {max}")]
    EnvelopeInverted {
        /// Requested minimum radius.
        min: f64,
        /// Requested maximum radius.
        max: f64,
    },
}

/// A candidate obstruction: a celestial body with an optional terrain model.
///
/// Invariants:
/// - `0 <= min_radius <= max_radius`, all finite.
/// - Every terrain point lies between `min_radius` and `max_radius` from
///   `position`; the solver's search bounds rely on it.
pub struct Body {
    name: String,
    position: Vec3,
    radius: f64,
    min_radius: f64,
    max_radius: f64,
    has_ocean: bool,
    terrain: Option<Box<dyn HeightOracle>>,
}

impl Body {
    /// A body without a solid surface (e.g. a gas giant).
    ///
    /// The envelope collapses to `radius`; the solver never samples it.
    pub fn new(name: impl Into<String>, position: Vec3, radius: f64) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            min_radius: radius,
            max_radius: radius,
            has_ocean: false,
            terrain: None,
        }
    }

    /// A body with analytic terrain over reference radius `radius`.
    ///
    /// The envelope defaults to `radius..=radius`; call
    /// [`Body::with_envelope`] when the terrain has relief.
    pub fn with_terrain(
        name: impl Into<String>,
        position: Vec3,
        radius: f64,
        terrain: impl HeightOracle + 'static,
    ) -> Self {
        Self {
            terrain: Some(Box::new(terrain)),
            ..Self::new(name, position, radius)
        }
    }

    /// Sets the terrain envelope.
    ///
    /// # Errors
    /// [`BodyError::InvalidRadius`] for negative or non-finite radii and
    /// [`BodyError::EnvelopeInverted`] when `min > max`.
    pub fn with_envelope(mut self, min_radius: f64, max_radius: f64) -> Result<Self, BodyError> {
        for r in [min_radius, max_radius] {
            if !r.is_finite() || r < 0.0 {
                return Err(BodyError::InvalidRadius(r));
            }
        }
        if min_radius > max_radius {
            return Err(BodyError::EnvelopeInverted {
                min: min_radius,
                max: max_radius,
            });
        }
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        Ok(self)
    }

    /// Marks the body as having an ocean at its reference radius.
    pub fn with_ocean(mut self, has_ocean: bool) -> Self {
        self.has_ocean = has_ocean;
        self
    }

    /// Moves the body; hosts call this every tick before solving.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Body name, also used as its identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World-space centre.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Reference (sea-level) radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Lowest terrain radius.
    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    /// Highest terrain radius.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Whether an ocean floors the surface at the reference radius.
    pub fn has_ocean(&self) -> bool {
        self.has_ocean
    }

    /// Whether the body has a terrain model to search against.
    pub fn has_surface(&self) -> bool {
        self.terrain.is_some()
    }

    /// Sphere at the highest terrain radius.
    pub fn max_sphere(&self) -> Sphere {
        Sphere::new(self.position, self.max_radius)
    }

    /// Sphere at the lowest terrain radius.
    pub fn min_sphere(&self) -> Sphere {
        Sphere::new(self.position, self.min_radius)
    }

    /// Height of `point` above the reference radius.
    pub fn altitude(&self, point: Vec3) -> f64 {
        point.distance(&self.position) - self.radius
    }

    /// `true` if `point` is at or below the terrain, or under the ocean.
    ///
    /// Always `false` for bodies without a surface.
    pub fn is_below_ground(&self, point: Vec3) -> bool {
        let Some(terrain) = &self.terrain else {
            return false;
        };
        let altitude = self.altitude(point);
        altitude <= terrain.surface_height(point) || (self.has_ocean && altitude < 0.0)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("radius", &self.radius)
            .field("min_radius", &self.min_radius)
            .field("max_radius", &self.max_radius)
            .field("has_ocean", &self.has_ocean)
            .field("has_surface", &self.has_surface())
            .finish()
    }
}
