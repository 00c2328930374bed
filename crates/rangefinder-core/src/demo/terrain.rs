// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use rangefinder_geom::Vec3;

use crate::body::{Body, BodyError, HeightOracle};

/// Name of the demo body.
pub const DEMO_BODY: &str = "Meridian";

/// Reference radius of the demo body in metres.
pub const DEMO_RADIUS: f64 = 600_000.0;

const MEAN: f64 = 200.0;
const RELIEF: f64 = 250.0;

/// Smooth analytic hills between `-300` and `+700` metres.
///
/// Heights depend only on the direction from `center`, so every point on a
/// radial line shares one elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingHills {
    center: Vec3,
}

impl RollingHills {
    /// Hills around a body centred at `center`.
    pub const fn new(center: Vec3) -> Self {
        Self { center }
    }

    /// Lowest possible elevation.
    pub const fn lowest() -> f64 {
        MEAN - 2.0 * RELIEF
    }

    /// Highest possible elevation.
    pub const fn highest() -> f64 {
        MEAN + 2.0 * RELIEF
    }
}

impl HeightOracle for RollingHills {
    fn surface_height(&self, point: Vec3) -> f64 {
        let up = (point - self.center).normalize();
        MEAN + RELIEF * (40.0 * up.x()).sin() * (40.0 * up.y()).cos() + RELIEF * (25.0 * up.z()).sin()
    }
}

/// The demo body: rolling hills over an ocean, centred at the origin.
pub fn rolling_hills_body() -> Result<Body, BodyError> {
    Ok(Body::with_terrain(DEMO_BODY, Vec3::ZERO, DEMO_RADIUS, RollingHills::new(Vec3::ZERO))
        .with_envelope(DEMO_RADIUS + RollingHills::lowest(), DEMO_RADIUS + RollingHills::highest())?
        .with_ocean(true))
}
