// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Sensor descent over the demo body: terrain solver aloft, probe near the ground.

use std::time::Duration;

use rangefinder_core::demo::{rolling_hills_body, LoadedTerrainProbe, RollingHills, DEMO_BODY, DEMO_RADIUS};
use rangefinder_core::{
    FixedStepClock, HeightOracle, NullProbe, PollBudget, ReadingSource, Sensor, SensorConfig, TerrainSolver,
};
use rangefinder_geom::{Ray, Vec3};

fn overhead(altitude: f64) -> Ray {
    Ray::new(Vec3::new(0.0, 0.0, DEMO_RADIUS + altitude), -Vec3::UNIT_Z).unwrap()
}

#[test]
fn descent_hands_over_from_terrain_to_probe() {
    let ground = RollingHills::new(Vec3::ZERO).surface_height(Vec3::UNIT_Z);
    let bodies = [rolling_hills_body().unwrap()];
    let mut probe = LoadedTerrainProbe::new(rolling_hills_body().unwrap(), 3_000.0);
    let mut clock = FixedStepClock::new(0.0, Duration::from_secs(1));
    let mut sensor = Sensor::new(SensorConfig {
        time_budget_fraction: 1.0,
        ..SensorConfig::default()
    })
    .unwrap();

    for step in 0..20 {
        let altitude = 20_000.0 - 1_000.0 * f64::from(step);
        let reading = sensor.tick(&overhead(altitude), &clock, &mut probe, &bodies);
        clock.advance();

        assert_eq!(reading.target_name(), DEMO_BODY, "altitude {altitude}");
        let expected = altitude - ground;
        assert!(
            (reading.distance_or_sentinel() - expected).abs() <= 2.0,
            "altitude {altitude}: {reading:?}"
        );
        if altitude > 3_000.0 {
            assert_eq!(reading.source, Some(ReadingSource::Terrain));
        }
        if expected <= sensor.config().near_field_cutoff {
            assert_eq!(reading.source, Some(ReadingSource::Probe));
        }
        assert_eq!(reading.age, 0);
    }
}

#[test]
fn starved_sensor_reports_stale_answers() {
    let bodies = [rolling_hills_body().unwrap()];
    let clock = FixedStepClock::new(0.0, Duration::from_secs(1));
    let mut sensor = Sensor::new(SensorConfig::default()).unwrap();
    sensor.set_time_budget_fraction(1.0);
    let first = sensor.tick(&overhead(50_000.0), &clock, &mut NullProbe, &bodies);
    assert!(first.is_hit());

    sensor.set_time_budget_fraction(0.0);
    let ray = overhead(50_000.0);
    let mut last_age = 0;
    for _ in 0..3 {
        let reading = sensor.tick(&ray, &clock, &mut NullProbe, &bodies);
        // A zero budget expires at the first poll, so each tick advances the
        // search by at most half a step.
        assert_eq!(reading.source, Some(ReadingSource::Terrain));
        assert_eq!(reading.fix, first.fix);
        assert_eq!(reading.age, last_age + 1);
        last_age = reading.age;
    }

    sensor.reset();
    assert_eq!(sensor.solver().last_good(), first.fix.as_ref());
    assert_eq!(sensor.solver().age(), 0);

    let restarted = sensor.tick(&ray, &clock, &mut NullProbe, &bodies);
    assert_eq!(restarted.fix, first.fix);
    assert_eq!(restarted.age, 1);
}

#[test]
fn solver_alone_handles_the_demo_body_on_a_poll_budget() {
    let bodies = [rolling_hills_body().unwrap()];
    let mut solver = TerrainSolver::new(&SensorConfig::default());
    let ray = overhead(80_000.0);
    let mut ticks = 0;
    let solution = loop {
        ticks += 1;
        assert!(ticks < 500);
        let s = solver.solve(&ray, &bodies, &mut PollBudget::new(40));
        if s.age == 0 {
            break s;
        }
    };
    let ground = RollingHills::new(Vec3::ZERO).surface_height(Vec3::UNIT_Z);
    assert!((solution.distance().unwrap() - (80_000.0 - ground)).abs() <= 2.0);
}
