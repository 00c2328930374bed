// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! The two cross-tick filters, driven tick by tick.

use std::time::Duration;

use rangefinder_core::{
    Fix, FixedStepClock, HostClock, ObjectId, ProbeHit, ResultStabilizer, ValidityFilter,
};

#[test]
fn distant_hit_after_miss_is_held_back_for_its_round_trip() {
    let mut clock = FixedStepClock::new(0.0, Duration::from_millis(500));
    let mut filter = ValidityFilter::new(300_000_000.0);
    assert_eq!(filter.admit(clock.now(), None), None);

    let mut suppressed = 0;
    let accepted_at = loop {
        clock.advance();
        match filter.admit(clock.now(), Some(Fix::new(300_000_000.0, "moon"))) {
            Some(_) => break clock.now(),
            None => suppressed += 1,
        }
        assert!(suppressed < 100);
    };
    assert!(suppressed >= 2, "only {suppressed} suppressed ticks");
    assert!(accepted_at > 2.0);
}

#[test]
fn farther_object_takes_over_on_the_third_tick() {
    let a = ProbeHit {
        distance: 40.0,
        object: ObjectId(1),
        name: "A".into(),
    };
    let b = ProbeHit {
        distance: 90.0,
        object: ObjectId(2),
        name: "B".into(),
    };
    let mut stabilizer = ResultStabilizer::new(2);
    stabilizer.update([a], |_| true);

    let reported: Vec<String> = (0..3)
        .filter_map(|_| stabilizer.update([b.clone()], |_| true))
        .map(|hit| hit.name)
        .collect();
    assert_eq!(reported, ["A", "A", "B"]);
}
