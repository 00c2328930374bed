// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cross-tick smoothing of the physics probe.
//!
//! The probe can flicker between objects from one tick to the next. The
//! stabilizer keeps reporting the object it currently believes in until a
//! farther object (or nothing at all) has contradicted it for enough
//! consecutive ticks. A closer object always wins immediately.

use tracing::debug;

use crate::probe::{ObjectId, ProbeHit};

/// Belief-holding filter over raw probe hits.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStabilizer {
    threshold: u32,
    belief: Option<ProbeHit>,
    contradictions: u32,
}

impl ResultStabilizer {
    /// A stabilizer that yields after `threshold` absorbed contradictions.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            belief: None,
            contradictions: 0,
        }
    }

    /// The hit currently believed in.
    pub fn belief(&self) -> Option<&ProbeHit> {
        self.belief.as_ref()
    }

    /// Consecutive contradicted ticks absorbed so far.
    pub fn contradictions(&self) -> u32 {
        self.contradictions
    }

    /// Forgets the belief.
    pub fn reset(&mut self) {
        self.belief = None;
        self.contradictions = 0;
    }

    /// Folds this tick's raw `hits` into the belief and returns what to report.
    ///
    /// `resolves` tells whether the believed object still exists; a belief in
    /// a vanished object is dropped without resistance.
    pub fn update(
        &mut self,
        hits: impl IntoIterator<Item = ProbeHit>,
        resolves: impl Fn(ObjectId) -> bool,
    ) -> Option<ProbeHit> {
        let closest = hits
            .into_iter()
            .filter(|h| h.distance.is_finite())
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        let held = self
            .belief
            .as_ref()
            .filter(|b| resolves(b.object))
            .map(|b| (b.object, b.distance));

        let adopt = match (&closest, held) {
            (None, None) => {
                self.reset();
                return None;
            }
            (Some(_), None) => true,
            (Some(hit), Some((object, distance))) => {
                hit.object == object || hit.distance < distance || self.yields()
            }
            (None, Some(_)) => {
                if self.yields() {
                    debug!(after = self.contradictions, "probe belief dropped");
                    self.reset();
                    return None;
                }
                false
            }
        };

        if adopt {
            if let (Some(hit), Some(held)) = (&closest, &self.belief) {
                if hit.object != held.object {
                    debug!(from = %held.name, to = %hit.name, "probe belief switched");
                }
            }
            self.belief = closest;
            self.contradictions = 0;
        }
        self.belief.clone()
    }

    /// Records one contradiction, or returns `true` if the threshold was
    /// already reached.
    fn yields(&mut self) -> bool {
        if self.contradictions >= self.threshold {
            return true;
        }
        self.contradictions += 1;
        false
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn hit(object: u64, distance: f64) -> ProbeHit {
        ProbeHit {
            distance,
            object: ObjectId(object),
            name: format!("obj{object}"),
        }
    }

    fn none() -> Vec<ProbeHit> {
        Vec::new()
    }

    fn all(_: ObjectId) -> bool {
        true
    }

    fn reported(out: Option<ProbeHit>) -> Option<u64> {
        out.map(|h| h.object.0)
    }

    #[test]
    fn farther_object_must_persist_before_switching() {
        let mut s = ResultStabilizer::new(2);
        assert_eq!(reported(s.update([hit(1, 100.0)], all)), Some(1));
        assert_eq!(reported(s.update([hit(2, 500.0)], all)), Some(1));
        assert_eq!(s.contradictions(), 1);
        assert_eq!(reported(s.update([hit(2, 500.0)], all)), Some(1));
        assert_eq!(s.contradictions(), 2);
        assert_eq!(reported(s.update([hit(2, 500.0)], all)), Some(2));
        assert_eq!(s.contradictions(), 0);
    }

    #[test]
    fn closer_object_wins_at_once() {
        let mut s = ResultStabilizer::new(2);
        s.update([hit(1, 100.0)], all);
        assert_eq!(reported(s.update([hit(2, 50.0)], all)), Some(2));
        assert_eq!(s.contradictions(), 0);
    }

    #[test]
    fn same_object_refreshes_distance_and_counter() {
        let mut s = ResultStabilizer::new(2);
        s.update([hit(1, 100.0)], all);
        s.update([hit(2, 500.0)], all);
        let out = s.update([hit(1, 90.0), hit(3, 400.0)], all).unwrap();
        assert_eq!(out.object, ObjectId(1));
        assert!((out.distance - 90.0).abs() < f64::EPSILON);
        assert_eq!(s.contradictions(), 0);
    }

    #[test]
    fn empty_ticks_are_tolerated_up_to_threshold() {
        let mut s = ResultStabilizer::new(2);
        s.update([hit(1, 100.0)], all);
        assert_eq!(reported(s.update(none(), all)), Some(1));
        assert_eq!(reported(s.update(none(), all)), Some(1));
        assert_eq!(reported(s.update(none(), all)), None);
        assert!(s.belief().is_none());
    }

    #[test]
    fn unresolvable_belief_gives_way_immediately() {
        let mut s = ResultStabilizer::new(2);
        s.update([hit(1, 100.0)], all);
        let gone = |o: ObjectId| o != ObjectId(1);
        assert_eq!(reported(s.update([hit(2, 500.0)], gone)), Some(2));
        s.update([hit(1, 100.0)], all);
        assert_eq!(reported(s.update(none(), gone)), None);
    }
}
