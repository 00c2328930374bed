// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! rangefinder-core: budgeted, resumable ray/terrain distance solver.
//!
//! A [`Sensor`] answers "how far until the ray hits something" once per host
//! tick. It blends two sources: the host's fast physics probe (stabilized by
//! [`ResultStabilizer`]) and an analytic terrain search ([`TerrainSolver`])
//! that suspends into a [`Continuation`] when its time slice runs out. Both
//! pass through a light-time [`ValidityFilter`].
//!
//! Everything here is single-threaded and tick-driven; nothing runs between
//! ticks.
#![forbid(unsafe_code)]

pub mod body;
pub mod config;
pub mod continuation;
pub mod demo;
mod fix;
pub mod probe;
pub mod scanner;
pub mod sensor;
pub mod solver;
pub mod stabilizer;
pub mod time;
pub mod validity;

pub use body::{Body, BodyError, HeightOracle};
pub use config::{
    ConfigError, ConfigService, ConfigStore, MemoryConfigStore, SensorConfig, SENSOR_CONFIG_KEY,
    SPEED_OF_LIGHT,
};
pub use continuation::{Continuation, Interval};
pub use fix::{Fix, NO_TARGET};
pub use probe::{LayerMask, NullProbe, ObjectId, ProbeHit, ProbeOracle};
pub use scanner::{scan, ScanOutcome, ScanParams, ScanStats};
pub use sensor::{ReadingSource, Sensor, SensorReading};
pub use solver::{Solution, TerrainSolver};
pub use stabilizer::ResultStabilizer;
pub use time::{Deadline, FixedStepClock, HostClock, PollBudget, Stopwatch};
pub use validity::ValidityFilter;
