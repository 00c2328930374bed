// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port to the host's fast physics raycast.

use rangefinder_geom::Ray;
use serde::{Deserialize, Serialize};

use crate::fix::Fix;

/// Opaque identity of an object the physics probe can hit.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

/// Bitmask of physics layers a probe may hit.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// `true` if `layer` (0–31) is enabled.
    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

/// One candidate obstruction reported by the physics probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    /// Distance from the ray origin in metres.
    pub distance: f64,
    /// Identity of the object hit.
    pub object: ObjectId,
    /// Display name of the object (part or body name).
    pub name: String,
}

impl From<ProbeHit> for Fix {
    fn from(hit: ProbeHit) -> Self {
        Fix::new(hit.distance, hit.name)
    }
}

/// Fast but noisy obstruction source supplied by the host.
pub trait ProbeOracle {
    /// All hits along `ray` within `max_distance` on layers in `mask`, in any order.
    fn probe(&mut self, ray: &Ray, max_distance: f64, mask: LayerMask) -> Vec<ProbeHit>;

    /// Whether `object` still exists and can be reported.
    fn resolves(&self, _object: ObjectId) -> bool {
        true
    }
}

/// A probe that never hits anything, for hosts without physics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProbe;

impl ProbeOracle for NullProbe {
    fn probe(&mut self, _ray: &Ray, _max_distance: f64, _mask: LayerMask) -> Vec<ProbeHit> {
        Vec::new()
    }
}
