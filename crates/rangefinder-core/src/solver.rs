// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Terrain solver: picks a body, brackets the search, and drives the scanner
//! across ticks.
//!
//! # Lifecycle
//!
//! - No pending search: the bounding-sphere prefilter selects the nearest body
//!   and a fresh [`Continuation`] is scanned.
//! - Pending search: the saved continuation is scanned again; the prefilter
//!   is skipped.
//! - A conclusive scan replaces the last-good answer and clears the pending
//!   search and the age counter.
//! - An inconclusive scan keeps the new continuation, bumps the age, and
//!   reports the last-good answer instead.
//!
//! Callers must [`TerrainSolver::reset`] whenever the ray or body set jumps
//! discontinuously; a resumed search is not re-validated against the new ray.
//! The last-good answer survives a reset and is served, stale, until the
//! restarted search concludes.

use rangefinder_geom::{intersect_line, Ray};
use tracing::debug;

use crate::body::Body;
use crate::config::SensorConfig;
use crate::continuation::{Continuation, Interval};
use crate::fix::{Fix, NO_TARGET};
use crate::scanner::{scan, ScanOutcome, ScanParams};
use crate::time::Stopwatch;

/// Answer of one [`TerrainSolver::solve`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Ground fix, or `None` for no terrain along the ray.
    pub fix: Option<Fix>,
    /// Ticks since the answer was computed; `0` means fresh.
    pub age: u32,
}

impl Solution {
    /// Whether the answer is a hit.
    pub fn hit(&self) -> bool {
        self.fix.is_some()
    }

    /// Distance to the hit, if any.
    pub fn distance(&self) -> Option<f64> {
        self.fix.as_ref().map(|f| f.distance)
    }

    /// Name of the body hit, or `"<none>"`.
    pub fn body_name(&self) -> &str {
        self.fix.as_ref().map_or(NO_TARGET, |f| f.target.as_str())
    }

    /// `true` when the answer was carried over from an earlier tick.
    pub fn is_stale(&self) -> bool {
        self.age > 0
    }
}

/// Resumable ray/terrain intersection solver; one per sensor.
#[derive(Debug, Clone)]
pub struct TerrainSolver {
    params: ScanParams,
    initial_slices: u32,
    bound_margin: f64,
    pending: Option<Continuation>,
    age: u32,
    last_good: Option<Fix>,
}

impl TerrainSolver {
    /// Builds a solver from the scan-related fields of `config`.
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            params: config.scan_params(),
            initial_slices: config.initial_slices,
            bound_margin: config.bound_margin,
            pending: None,
            age: 0,
            last_good: None,
        }
    }

    /// Ticks since the last conclusive answer.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// The suspended search, if one is waiting for the next tick.
    pub fn pending(&self) -> Option<&Continuation> {
        self.pending.as_ref()
    }

    /// Last conclusive answer.
    pub fn last_good(&self) -> Option<&Fix> {
        self.last_good.as_ref()
    }

    /// Drops any suspended search and zeroes the age. The last-good answer
    /// is kept.
    pub fn reset(&mut self) {
        if self.pending.is_some() || self.age > 0 {
            debug!(age = self.age, "terrain solver reset");
        }
        self.pending = None;
        self.age = 0;
    }

    /// Finds the first terrain crossing along `ray` among `bodies`, spending
    /// at most what `stopwatch` allows.
    ///
    /// Non-unit or non-finite rays resolve as a conclusive miss.
    pub fn solve(
        &mut self,
        ray: &Ray,
        bodies: &[Body],
        stopwatch: &mut dyn Stopwatch,
    ) -> Solution {
        if !ray.is_unit() {
            debug!("rejecting degenerate ray");
            return self.conclude(None);
        }

        let resumed = self.pending.take().and_then(|cont| {
            let body = bodies.iter().find(|b| b.name() == cont.body);
            if body.is_none() {
                debug!(body = %cont.body, "pending search body vanished; starting over");
            }
            body.map(|b| (b, cont))
        });
        let Some((body, from)) = resumed.or_else(|| self.fresh_search(ray, bodies)) else {
            return self.conclude(None);
        };

        match scan(body, &from, stopwatch, &self.params) {
            ScanOutcome::Converged { distance, hit, .. } => {
                let fix = hit
                    .then(|| from.interval.point_at(distance))
                    .filter(|point| ray.is_ahead(*point))
                    .map(|point| Fix::new(point.distance(&ray.origin()), body.name()));
                self.conclude(fix)
            }
            ScanOutcome::Suspended { next, stats } => {
                self.age = self.age.saturating_add(1);
                debug!(
                    body = body.name(),
                    age = self.age,
                    remaining = next.interval.length(),
                    honing = next.honing,
                    samples = stats.samples,
                    "terrain search suspended"
                );
                self.pending = Some(next);
                Solution {
                    fix: self.last_good.clone(),
                    age: self.age,
                }
            }
        }
    }

    fn conclude(&mut self, fix: Option<Fix>) -> Solution {
        self.pending = None;
        self.age = 0;
        self.last_good.clone_from(&fix);
        Solution { fix, age: 0 }
    }

    /// Brackets the search on the nearest body with a surface.
    ///
    /// The search starts where the ray enters the maximum-radius sphere and
    /// ends where it enters the minimum-radius sphere (the ground cannot be
    /// deeper), or where it leaves the maximum-radius sphere when it never
    /// dips that low. `bound_margin` is added past the end.
    fn fresh_search<'b>(&self, ray: &Ray, bodies: &'b [Body]) -> Option<(&'b Body, Continuation)> {
        let (body, entry, exit) = bodies
            .iter()
            .filter(|b| b.has_surface())
            .filter_map(|b| {
                let outer = intersect_line(ray, &b.max_sphere())?;
                let entry = outer.first_forward()?;
                let exit = intersect_line(ray, &b.min_sphere())
                    .map(|inner| inner.near)
                    .filter(|near| *near >= entry)
                    .unwrap_or(outer.far);
                Some((b, entry, exit))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let length = exit - entry + self.bound_margin;
        if !length.is_finite() || length < 0.0 {
            debug!(body = body.name(), length, "unusable search bounds");
            return None;
        }
        debug!(body = body.name(), entry, length, "fresh terrain search");
        let interval = Interval::new(ray.point_at(entry), ray.direction(), length);
        Some((body, Continuation::start(body.name(), interval, self.initial_slices)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::time::{Deadline, PollBudget};
    use rangefinder_geom::Vec3;

    fn flat(name: &str, position: Vec3, radius: f64) -> Body {
        Body::with_terrain(name, position, radius, |_: Vec3| 0.0)
            .with_envelope(radius, radius + 10.0)
            .unwrap()
    }

    fn down_from(height: f64) -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, height), -Vec3::UNIT_Z).unwrap()
    }

    #[test]
    fn nearest_body_wins() {
        let bodies = [
            flat("far", Vec3::new(0.0, 0.0, -5_000.0), 1_000.0),
            flat("near", Vec3::new(0.0, 0.0, 0.0), 1_000.0),
        ];
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let s = solver.solve(&down_from(3_000.0), &bodies, &mut Deadline::unlimited());
        assert_eq!(s.body_name(), "near");
        let d = s.distance().unwrap();
        assert!(d <= 2_000.0 && 2_000.0 - d <= 2.0, "got {d}");
    }

    #[test]
    fn surfaceless_bodies_are_skipped() {
        let bodies = [
            Body::new("gas", Vec3::ZERO, 1_500.0),
            flat("rock", Vec3::ZERO, 1_000.0),
        ];
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let s = solver.solve(&down_from(3_000.0), &bodies, &mut Deadline::unlimited());
        assert_eq!(s.body_name(), "rock");
    }

    #[test]
    fn pointing_away_is_a_conclusive_miss() {
        let bodies = [flat("rock", Vec3::ZERO, 1_000.0)];
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let up = Ray::new(Vec3::new(0.0, 0.0, 3_000.0), Vec3::UNIT_Z).unwrap();
        let s = solver.solve(&up, &bodies, &mut Deadline::unlimited());
        assert_eq!(s, Solution { fix: None, age: 0 });
        assert_eq!(s.body_name(), NO_TARGET);
    }

    #[test]
    fn degenerate_ray_is_rejected_as_miss() {
        let bodies = [flat("rock", Vec3::ZERO, 1_000.0)];
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let zero = Ray::from_parts_unchecked(Vec3::new(0.0, 0.0, 3_000.0), Vec3::ZERO);
        let long = Ray::from_parts_unchecked(Vec3::new(0.0, 0.0, 3_000.0), Vec3::new(0.0, 0.0, -2.0));
        assert!(!solver.solve(&zero, &bodies, &mut Deadline::unlimited()).hit());
        assert!(!solver.solve(&long, &bodies, &mut Deadline::unlimited()).hit());
    }

    #[test]
    fn vanished_body_restarts_search() {
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let a = [flat("a", Vec3::ZERO, 1_000.0)];
        let s = solver.solve(&down_from(50_000.0), &a, &mut PollBudget::new(0));
        assert_eq!(s.age, 1);
        assert_eq!(solver.pending().map(|c| c.body.as_str()), Some("a"));

        let b = [flat("b", Vec3::ZERO, 1_000.0)];
        let s = solver.solve(&down_from(50_000.0), &b, &mut Deadline::unlimited());
        assert_eq!(s.age, 0);
        assert_eq!(s.body_name(), "b");
    }

    #[test]
    fn reset_clears_pending_and_age_but_keeps_cache() {
        let bodies = [flat("rock", Vec3::ZERO, 1_000.0)];
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let fresh = solver.solve(&down_from(3_000.0), &bodies, &mut Deadline::unlimited());
        assert!(solver.last_good().is_some());
        solver.solve(&down_from(3_000.0), &bodies, &mut PollBudget::new(0));
        assert_eq!(solver.age(), 1);
        solver.reset();
        assert_eq!(solver.age(), 0);
        assert!(solver.pending().is_none());
        assert_eq!(solver.last_good(), fresh.fix.as_ref());

        // The restarted search serves the cached answer while it runs.
        let stale = solver.solve(&down_from(3_000.0), &bodies, &mut PollBudget::new(0));
        assert_eq!(stale.age, 1);
        assert_eq!(stale.fix, fresh.fix);
    }
}
