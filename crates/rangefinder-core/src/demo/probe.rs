// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use rangefinder_geom::{intersect_line, Ray};

use crate::body::Body;
use crate::probe::{LayerMask, ObjectId, ProbeHit, ProbeOracle};

/// Physics layer carrying planetary terrain colliders.
const TERRAIN_LAYER: u8 = 15;

/// Metres between collider samples.
const COLLIDER_STEP: f64 = 1.0;

/// A physics probe that only sees a body's terrain where colliders are
/// loaded: within `loaded_range` of the ray origin.
///
/// Stands in for engines that stream terrain colliders around the player, so
/// the probe goes blind at altitude and the analytic solver has to take over.
#[derive(Debug)]
pub struct LoadedTerrainProbe {
    body: Body,
    object: ObjectId,
    loaded_range: f64,
}

impl LoadedTerrainProbe {
    /// Probe over `body`, loaded out to `loaded_range` metres.
    pub fn new(body: Body, loaded_range: f64) -> Self {
        Self {
            body,
            object: ObjectId(1),
            loaded_range,
        }
    }

    /// The body the colliders belong to; hosts move it alongside the real one.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl ProbeOracle for LoadedTerrainProbe {
    fn probe(&mut self, ray: &Ray, max_distance: f64, mask: LayerMask) -> Vec<ProbeHit> {
        if !mask.contains(TERRAIN_LAYER) || !self.body.has_surface() {
            return Vec::new();
        }
        let reach = max_distance.min(self.loaded_range);
        let Some(mut t) = intersect_line(ray, &self.body.max_sphere()).and_then(|c| c.first_forward()) else {
            return Vec::new();
        };
        while t <= reach {
            if self.body.is_below_ground(ray.point_at(t)) {
                return vec![ProbeHit {
                    distance: t,
                    object: self.object,
                    name: self.body.name().to_owned(),
                }];
            }
            t += COLLIDER_STEP;
        }
        Vec::new()
    }
}
