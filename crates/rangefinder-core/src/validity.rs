// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Light-time hysteresis on hit/miss transitions.
//!
//! After a miss, a hit at distance `d` is only believed once `2d / c` seconds
//! have passed: long enough for a pulse to make the round trip. This hides
//! single-tick flickers right after a genuine miss, and suppresses distant
//! hits for longer than near ones.

use tracing::trace;

use crate::config::SPEED_OF_LIGHT;
use crate::fix::Fix;

/// Suppresses hits that follow a miss too closely.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityFilter {
    propagation_speed: f64,
    last_miss: Option<f64>,
}

impl Default for ValidityFilter {
    fn default() -> Self {
        Self::new(SPEED_OF_LIGHT)
    }
}

impl ValidityFilter {
    /// Creates a filter for pulses travelling at `propagation_speed` m/s.
    pub fn new(propagation_speed: f64) -> Self {
        Self {
            propagation_speed,
            last_miss: None,
        }
    }

    /// Simulation time of the most recent miss, if any.
    pub fn last_miss(&self) -> Option<f64> {
        self.last_miss
    }

    /// Forgets the last miss.
    pub fn reset(&mut self) {
        self.last_miss = None;
    }

    /// Passes `reading` through at simulation time `now` (seconds).
    ///
    /// A miss is recorded and returned as-is. A hit is returned only if more
    /// than its round-trip time has elapsed since the last miss.
    pub fn admit(&mut self, now: f64, reading: Option<Fix>) -> Option<Fix> {
        let Some(fix) = reading else {
            self.last_miss = Some(now);
            return None;
        };
        if let Some(missed_at) = self.last_miss {
            let round_trip = 2.0 * fix.distance / self.propagation_speed;
            if now - missed_at <= round_trip {
                trace!(distance = fix.distance, round_trip, "hit inside light-time window");
                return None;
            }
        }
        Some(fix)
    }
}
