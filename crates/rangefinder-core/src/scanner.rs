// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adaptive interval scanner: budgeted search for the first ground crossing.
//!
//! The scanner walks an interval in equal slices, sampling the body's terrain
//! at each slice boundary. The interval start is known to be above ground.
//!
//! - A sample at or below ground brackets the crossing between it and the
//!   previous sample; that bracket is walked again with the same slice count
//!   until it is no longer than `epsilon`.
//! - A clean walk whose step is still longer than `epsilon` is repeated with
//!   twice the slices, since the terrain may dip below the ray between samples.
//! - When the stopwatch expires the remaining interval is returned as a
//!   [`Continuation`] instead of an answer. It resumes just behind the last
//!   clean sample, backed up by `resume_margin` but never by more than half a
//!   step, so every suspended tick makes progress.
//! - A clean walk at full resolution is a miss, unless a crossing was already
//!   bracketed (a resumed refinement); then the crossing is at the end.
//!
//! [`scan`] is a pure function of its arguments apart from the stopwatch.

use tracing::{trace, warn};

use crate::body::Body;
use crate::continuation::{Continuation, Interval};
use crate::time::Stopwatch;

/// Scanner tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    /// Intervals this short (metres) count as resolved.
    pub epsilon: f64,
    /// Distance (metres) backed up when suspending, to absorb body motion
    /// before the next tick. Capped at half the current step.
    pub resume_margin: f64,
    /// Ceiling on nested refinements and slice doublings.
    pub max_depth: u32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            epsilon: 2.0,
            resume_margin: 5.0,
            max_depth: 64,
        }
    }
}

/// Result of one [`scan`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The search finished.
    Converged {
        /// Distance from the continuation's interval start to the crossing
        /// (or to the interval end on a miss).
        distance: f64,
        /// Whether a ground crossing was found.
        hit: bool,
        /// Sampling statistics.
        stats: ScanStats,
    },
    /// The budget ran out; resume from here on the next tick.
    Suspended {
        /// Remaining search.
        next: Continuation,
        /// Sampling statistics.
        stats: ScanStats,
    },
}

impl ScanOutcome {
    /// Statistics for this call.
    pub fn stats(&self) -> ScanStats {
        match self {
            Self::Converged { stats, .. } | Self::Suspended { stats, .. } => *stats,
        }
    }
}

/// Counters gathered during one [`scan`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Terrain samples taken.
    pub samples: u64,
    /// Deepest nesting reached.
    pub depth: u32,
}

enum Walk {
    Done { distance: f64, hit: bool },
    Suspended { interval: Interval, slices: u32 },
}

struct Scanner<'a> {
    body: &'a Body,
    stopwatch: &'a mut dyn Stopwatch,
    params: &'a ScanParams,
    honing: bool,
    stats: ScanStats,
}

/// Searches `from.interval` on `body` for the first ground crossing.
///
/// Bodies without a surface resolve immediately as a miss without sampling.
/// Slice counts below 2 are raised to 2 so refinement always narrows.
pub fn scan(
    body: &Body,
    from: &Continuation,
    stopwatch: &mut dyn Stopwatch,
    params: &ScanParams,
) -> ScanOutcome {
    if !body.has_surface() {
        return ScanOutcome::Converged {
            distance: 0.0,
            hit: false,
            stats: ScanStats::default(),
        };
    }

    let mut scanner = Scanner {
        body,
        stopwatch,
        params,
        honing: from.honing,
        stats: ScanStats::default(),
    };
    let walk = scanner.walk(from.interval, from.slices.max(2), 0);
    let stats = scanner.stats;
    trace!(
        body = body.name(),
        samples = stats.samples,
        depth = stats.depth,
        "terrain scan"
    );

    match walk {
        Walk::Done { distance, hit } => ScanOutcome::Converged {
            distance,
            hit,
            stats,
        },
        Walk::Suspended { interval, slices } => ScanOutcome::Suspended {
            next: Continuation {
                body: from.body.clone(),
                interval,
                slices,
                honing: scanner.honing,
            },
            stats,
        },
    }
}

impl Scanner<'_> {
    fn walk(&mut self, interval: Interval, slices: u32, depth: u32) -> Walk {
        self.stats.depth = self.stats.depth.max(depth);
        if interval.length() <= self.params.epsilon {
            return Walk::Done {
                distance: 0.0,
                hit: self.honing,
            };
        }
        if depth >= self.params.max_depth {
            warn!(
                body = self.body.name(),
                depth,
                length = interval.length(),
                "terrain scan hit its depth ceiling"
            );
            return Walk::Done {
                distance: if self.honing { 0.0 } else { interval.length() },
                hit: self.honing,
            };
        }

        let step = interval.length() / f64::from(slices);
        for i in 1..=slices {
            let before = step * f64::from(i - 1);
            let sample = step * f64::from(i);
            self.stats.samples += 1;
            if self.body.is_below_ground(interval.point_at(sample)) {
                self.honing = true;
                let bracket = Interval::new(interval.point_at(before), interval.direction(), step);
                return match self.walk(bracket, slices, depth + 1) {
                    Walk::Done { distance, .. } => Walk::Done {
                        distance: before + distance,
                        hit: true,
                    },
                    suspended @ Walk::Suspended { .. } => suspended,
                };
            }
            if self.stopwatch.expired() {
                let back_up = self.params.resume_margin.min(0.5 * step);
                return Walk::Suspended {
                    interval: interval.remainder_from(sample - back_up),
                    slices,
                };
            }
        }

        if step > self.params.epsilon {
            return self.walk(interval, slices.saturating_mul(2), depth + 1);
        }
        Walk::Done {
            distance: interval.length(),
            hit: self.honing,
        }
    }
}
