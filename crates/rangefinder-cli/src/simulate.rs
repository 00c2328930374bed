// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertical descent over the demo body.

use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use rangefinder_core::demo::{rolling_hills_body, LoadedTerrainProbe, DEMO_RADIUS};
use rangefinder_core::{FixedStepClock, HostClock, ReadingSource, Sensor, SensorConfig, SensorReading};
use rangefinder_geom::{Ray, Vec3};
use tracing::debug;

/// Host tick length (50 Hz physics).
const TICK: Duration = Duration::from_millis(20);

/// Distance out to which the demo probe has colliders.
const LOADED_RANGE: f64 = 2_500.0;

/// Lowest altitude the descent reaches; above the demo body's highest hill.
const FLOOR: f64 = 1_000.0;

pub struct Scenario {
    pub ticks: u32,
    pub altitude: f64,
    pub descent_rate: f64,
    pub budget_fraction: Option<f64>,
}

pub struct Row {
    pub tick: u32,
    pub time: f64,
    pub altitude: f64,
    pub reading: SensorReading,
}

impl Scenario {
    pub fn run(&self, config: SensorConfig) -> Result<Vec<Row>> {
        let mut sensor = Sensor::new(config).context("invalid sensor config")?;
        if let Some(fraction) = self.budget_fraction {
            sensor.set_time_budget_fraction(fraction);
        }
        let bodies = [rolling_hills_body()?];
        let mut probe = LoadedTerrainProbe::new(rolling_hills_body()?, LOADED_RANGE);
        let mut clock = FixedStepClock::new(0.0, TICK);

        let mut rows = Vec::new();
        for tick in 0..self.ticks {
            let altitude = (self.altitude - self.descent_rate * f64::from(tick)).max(FLOOR);
            let ray = Ray::new(Vec3::new(0.0, 0.0, DEMO_RADIUS + altitude), -Vec3::UNIT_Z)?;
            let reading = sensor.tick(&ray, &clock, &mut probe, &bodies);
            debug!(tick, altitude, distance = reading.distance_or_sentinel(), "tick");
            rows.push(Row {
                tick,
                time: clock.now(),
                altitude,
                reading,
            });
            clock.advance();
        }
        Ok(rows)
    }
}

fn source_label(source: Option<ReadingSource>) -> &'static str {
    match source {
        Some(ReadingSource::Probe) => "probe",
        Some(ReadingSource::Terrain) => "terrain",
        None => "-",
    }
}

pub fn render(rows: &[Row]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["tick", "time (s)", "altitude (m)", "source", "distance (m)", "body", "age"]);
    for row in rows {
        table.add_row([
            Cell::new(row.tick).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", row.time)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}", row.altitude)).set_alignment(CellAlignment::Right),
            Cell::new(source_label(row.reading.source)),
            Cell::new(format!("{:.1}", row.reading.distance_or_sentinel())).set_alignment(CellAlignment::Right),
            Cell::new(row.reading.target_name()),
            Cell::new(row.reading.age).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
