// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-tick orchestration of both obstruction sources.
//!
//! Each tick the physics probe is consulted first and its hits are stabilized
//! and light-time filtered. A probe fix inside the near-field cutoff is
//! trusted outright. Otherwise the terrain solver runs on a slice of the host
//! tick, and the nearer of the two surviving fixes is reported.

use rangefinder_geom::Ray;
use tracing::{instrument, trace, warn};

use crate::body::Body;
use crate::config::{ConfigError, SensorConfig};
use crate::fix::{Fix, NO_TARGET};
use crate::probe::ProbeOracle;
use crate::solver::TerrainSolver;
use crate::stabilizer::ResultStabilizer;
use crate::time::{Deadline, HostClock};
use crate::validity::ValidityFilter;

/// Which obstruction source produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingSource {
    /// The host's physics probe.
    Probe,
    /// The analytic terrain solver.
    Terrain,
}

/// What the sensor reports for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Nearest believed obstruction, or `None`.
    pub fix: Option<Fix>,
    /// Source of `fix`; `None` on a miss.
    pub source: Option<ReadingSource>,
    /// Ticks the terrain answer lags behind; `0` for fresh or probe readings.
    pub age: u32,
}

impl SensorReading {
    /// A fresh miss.
    pub fn miss() -> Self {
        Self {
            fix: None,
            source: None,
            age: 0,
        }
    }

    /// Whether anything was hit.
    pub fn is_hit(&self) -> bool {
        self.fix.is_some()
    }

    /// Distance to the hit, or `-1.0` on a miss.
    pub fn distance_or_sentinel(&self) -> f64 {
        self.fix.as_ref().map_or(-1.0, |f| f.distance)
    }

    /// Name of what was hit, or `"<none>"`.
    pub fn target_name(&self) -> &str {
        self.fix.as_ref().map_or(NO_TARGET, |f| f.target.as_str())
    }
}

/// One rangefinder instance. Owns all per-sensor filter state.
#[derive(Debug, Clone)]
pub struct Sensor {
    config: SensorConfig,
    active: bool,
    solver: TerrainSolver,
    stabilizer: ResultStabilizer,
    probe_validity: ValidityFilter,
    terrain_validity: ValidityFilter,
}

impl Sensor {
    /// Builds an active sensor after validating `config`.
    pub fn new(config: SensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            solver: TerrainSolver::new(&config),
            stabilizer: ResultStabilizer::new(config.contradiction_threshold),
            probe_validity: ValidityFilter::new(config.propagation_speed),
            terrain_validity: ValidityFilter::new(config.propagation_speed),
            active: true,
            config,
        })
    }

    /// Effective configuration.
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// The terrain solver, for diagnostics.
    pub fn solver(&self) -> &TerrainSolver {
        &self.solver
    }

    /// Whether the sensor is switched on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switches the sensor on or off. A change resets all filter state.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.reset();
        }
    }

    /// Flips the sensor on or off; returns the new state.
    pub fn toggle_active(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    /// Share of each host tick the terrain solver may spend.
    pub fn time_budget_fraction(&self) -> f64 {
        self.config.time_budget_fraction
    }

    /// Sets the solver's share of the host tick, clamped to `[0, 1]`.
    ///
    /// Takes effect on the next tick.
    pub fn set_time_budget_fraction(&mut self, fraction: f64) {
        let clamped = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        if clamped.to_bits() != fraction.to_bits() {
            warn!(requested = fraction, clamped, "time budget fraction out of range");
        }
        self.config.time_budget_fraction = clamped;
    }

    /// Drops the solver's pending search and age, both light-time windows,
    /// and the probe belief. The solver's last-good answer is kept.
    ///
    /// Call whenever the ray or the set of bodies changes discontinuously.
    pub fn reset(&mut self) {
        self.solver.reset();
        self.stabilizer.reset();
        self.probe_validity.reset();
        self.terrain_validity.reset();
    }

    /// Produces this tick's reading along `ray`.
    #[instrument(level = "trace", skip_all)]
    pub fn tick<C, P>(&mut self, ray: &Ray, clock: &C, probe: &mut P, bodies: &[Body]) -> SensorReading
    where
        C: HostClock + ?Sized,
        P: ProbeOracle + ?Sized,
    {
        if !self.active {
            return SensorReading::miss();
        }
        let now = clock.now();

        let hits = probe.probe(ray, self.config.probe_max_distance, self.config.probe_mask);
        let stabilized = self.stabilizer.update(hits, |object| probe.resolves(object));
        let probe_fix = self.probe_validity.admit(now, stabilized.map(Fix::from));
        if let Some(fix) = probe_fix.as_ref().filter(|f| f.distance <= self.config.near_field_cutoff) {
            trace!(distance = fix.distance, "near-field probe fix");
            return SensorReading {
                fix: Some(fix.clone()),
                source: Some(ReadingSource::Probe),
                age: 0,
            };
        }

        let budget = clock.tick_duration().mul_f64(self.config.time_budget_fraction);
        let solution = self.solver.solve(ray, bodies, &mut Deadline::start(budget));
        let age = solution.age;
        let terrain_fix = self
            .terrain_validity
            .admit(now, solution.fix)
            .filter(|f| f.distance >= self.config.analytic_min_distance);

        match (probe_fix, terrain_fix) {
            (Some(p), Some(t)) if p.distance <= t.distance => SensorReading {
                fix: Some(p),
                source: Some(ReadingSource::Probe),
                age: 0,
            },
            (_, Some(t)) => SensorReading {
                fix: Some(t),
                source: Some(ReadingSource::Terrain),
                age,
            },
            (Some(p), None) => SensorReading {
                fix: Some(p),
                source: Some(ReadingSource::Probe),
                age: 0,
            },
            (None, None) => SensorReading {
                age,
                ..SensorReading::miss()
            },
        }
    }
}
