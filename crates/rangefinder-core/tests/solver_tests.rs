// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! End-to-end terrain solver behaviour across ticks.

use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

use rangefinder_core::{Body, Deadline, PollBudget, SensorConfig, TerrainSolver};
use rangefinder_geom::{Ray, Vec3};

const MIN_R: f64 = 600_000.0;

fn flat_body(max_radius: f64, min_radius: f64) -> Body {
    Body::with_terrain("Minmus", Vec3::ZERO, MIN_R, |_: Vec3| 0.0)
        .with_envelope(min_radius, max_radius)
        .unwrap()
}

fn toward_center(distance: f64) -> Ray {
    let origin = Vec3::new(0.0, distance, 0.0);
    Ray::new(origin, -origin).unwrap()
}

#[test]
fn flat_body_from_ten_kilometres() {
    let config = SensorConfig::default();
    let bodies = [flat_body(600_010.0, 600_000.0)];
    let mut solver = TerrainSolver::new(&config);
    let s = solver.solve(&toward_center(610_000.0), &bodies, &mut Deadline::unlimited());
    assert!(s.hit());
    assert_eq!(s.age, 0);
    assert_eq!(s.body_name(), "Minmus");
    let d = s.distance().unwrap();
    assert!((d - 10_000.0).abs() <= config.epsilon, "got {d}");
}

#[test]
fn initial_slice_count_does_not_change_the_answer() {
    let bodies = [flat_body(601_000.0, 599_000.0)];
    let ray = toward_center(610_000.0);
    let mut answers = Vec::new();
    for slices in [2, 7, 50, 333] {
        let config = SensorConfig {
            initial_slices: slices,
            ..SensorConfig::default()
        };
        let mut solver = TerrainSolver::new(&config);
        let first = solver.solve(&ray, &bodies, &mut Deadline::unlimited());
        let again = solver.solve(&ray, &bodies, &mut Deadline::unlimited());
        assert_eq!(first, again, "static solve drifted for {slices} slices");
        answers.push(first.distance().unwrap());
    }
    for d in &answers {
        assert!((d - 10_000.0).abs() <= 2.0, "answers {answers:?}");
    }
}

#[test]
fn age_counts_inconclusive_ticks_then_resets() {
    let bodies = [flat_body(601_000.0, 599_000.0)];
    let ray = toward_center(610_000.0);
    let mut solver = TerrainSolver::new(&SensorConfig::default());

    let fresh = solver.solve(&ray, &bodies, &mut Deadline::unlimited());
    assert_eq!(fresh.age, 0);

    let mut expected_age = 0;
    let converged = loop {
        let s = solver.solve(&ray, &bodies, &mut PollBudget::new(10));
        if s.age == 0 {
            break s;
        }
        expected_age += 1;
        assert_eq!(s.age, expected_age);
        // Stale ticks serve the cached answer.
        assert_eq!(s.fix, fresh.fix);
        assert!(solver.pending().is_some());
        assert!(expected_age < 1_000, "search never converged");
    };
    assert!(expected_age > 1);
    assert!(solver.pending().is_none());
    assert!((converged.distance().unwrap() - 10_000.0).abs() <= 2.0);

    solver.solve(&ray, &bodies, &mut PollBudget::new(10));
    assert_eq!(solver.age(), 1);
    solver.reset();
    assert_eq!(solver.age(), 0);
}

#[test]
fn one_sample_per_tick_still_converges() {
    let bodies = [flat_body(601_000.0, 599_000.0)];
    let ray = toward_center(610_000.0);
    for polls in [0, 1, 2, 3] {
        let mut solver = TerrainSolver::new(&SensorConfig::default());
        let mut ticks = 0;
        let converged = loop {
            ticks += 1;
            assert!(ticks < 1_000, "search with {polls} polls per tick never converged");
            let s = solver.solve(&ray, &bodies, &mut PollBudget::new(polls));
            if s.age == 0 {
                break s;
            }
        };
        let d = converged.distance().unwrap();
        assert!(d <= 10_000.0 && 10_000.0 - d <= 2.0, "{polls} polls per tick got {d}");
    }
}

#[test]
fn ocean_floors_a_basin_at_sea_level() {
    let basin = |ocean: bool| {
        Body::with_terrain("Kerbin", Vec3::ZERO, MIN_R, |_: Vec3| -100.0)
            .with_envelope(599_900.0, 600_010.0)
            .unwrap()
            .with_ocean(ocean)
    };
    let ray = toward_center(610_000.0);

    let mut solver = TerrainSolver::new(&SensorConfig::default());
    let wet = solver.solve(&ray, &[basin(true)], &mut Deadline::unlimited());
    let d = wet.distance().unwrap();
    assert!(d <= 10_000.0 && 10_000.0 - d <= 2.0, "sea level got {d}");

    let mut solver = TerrainSolver::new(&SensorConfig::default());
    let dry = solver.solve(&ray, &[basin(false)], &mut Deadline::unlimited());
    let d = dry.distance().unwrap();
    assert!(d <= 10_100.0 && 10_100.0 - d <= 2.0, "basin floor got {d}");
}

#[test]
fn body_behind_the_sensor_is_ignored() {
    let bodies = [flat_body(600_010.0, 600_000.0)];
    let away = Ray::new(Vec3::new(0.0, 610_000.0, 0.0), Vec3::UNIT_Y).unwrap();
    let mut solver = TerrainSolver::new(&SensorConfig::default());
    assert!(!solver.solve(&away, &bodies, &mut Deadline::unlimited()).hit());
}

#[test]
fn proptest_seed_pinned_unlimited_solve_finds_flat_ground() {
    const SEED_BYTES: [u8; 32] = [
        0x7c, 0x13, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    let mut runner = TestRunner::new_with_rng(
        PropConfig {
            cases: 64,
            ..PropConfig::default()
        },
        rng,
    );
    let bodies = [flat_body(600_500.0, 599_500.0)];

    runner
        .run(&(600.0f64..50_000.0, 2u32..400), |(altitude, slices)| {
            let config = SensorConfig {
                initial_slices: slices,
                ..SensorConfig::default()
            };
            let mut solver = TerrainSolver::new(&config);
            let s = solver.solve(&toward_center(MIN_R + altitude), &bodies, &mut Deadline::unlimited());
            let d = s.distance().unwrap_or(f64::NAN);
            prop_assert!(d <= altitude + 1e-6 && altitude - d <= config.epsilon + 1e-6, "altitude {} got {}", altitude, d);
            Ok(())
        })
        .unwrap();
}
