// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Synthetic oracles for demos and tests.
//!
//! Nothing here is needed by a host that supplies its own terrain and
//! physics; the CLI replays its descent scenario against these.

mod probe;
mod terrain;

pub use probe::LoadedTerrainProbe;
pub use terrain::{rolling_hills_body, RollingHills, DEMO_BODY, DEMO_RADIUS};
