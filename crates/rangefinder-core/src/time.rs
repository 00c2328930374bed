// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Clocks: the host's simulation clock and the in-loop budget stopwatch.

use std::time::{Duration, Instant};

/// Host simulation clock, read once per tick.
pub trait HostClock {
    /// Current simulation time in seconds. Must be monotonic.
    fn now(&self) -> f64;
    /// Fixed duration of one host tick; the solver's budget is a fraction of it.
    fn tick_duration(&self) -> Duration;
}

/// Budget check polled by the scanner after every sample.
///
/// Polling is cooperative: a scan can overshoot by one sample's cost.
pub trait Stopwatch {
    /// `true` once the budget is spent.
    fn expired(&mut self) -> bool;
}

/// Wall-clock deadline measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// Starts a deadline `budget` from now.
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(budget),
        }
    }

    /// A deadline that never expires.
    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    /// Time since the deadline started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Stopwatch for Deadline {
    fn expired(&mut self) -> bool {
        self.budget.is_some_and(|budget| self.started.elapsed() > budget)
    }
}

/// Stopwatch that allows a fixed number of polls, independent of wall time.
///
/// Useful for lockstep replays where every peer must suspend at the same
/// sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    remaining: u32,
}

impl PollBudget {
    /// Allows `polls` non-expired polls; the next one expires.
    pub const fn new(polls: u32) -> Self {
        Self { remaining: polls }
    }

    /// Polls left before expiry.
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Stopwatch for PollBudget {
    fn expired(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Clock advancing by a fixed step each time [`FixedStepClock::advance`] is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    now: f64,
    step: Duration,
}

impl FixedStepClock {
    /// Starts at `start` seconds with tick length `step`.
    pub const fn new(start: f64, step: Duration) -> Self {
        Self { now: start, step }
    }

    /// Moves to the next tick.
    pub fn advance(&mut self) {
        self.now += self.step.as_secs_f64();
    }
}

impl HostClock for FixedStepClock {
    fn now(&self) -> f64 {
        self.now
    }

    fn tick_duration(&self) -> Duration {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_budget_expires_after_allowance() {
        let mut budget = PollBudget::new(2);
        assert!(!budget.expired());
        assert!(!budget.expired());
        assert!(budget.expired());
        assert!(budget.expired());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn zero_deadline_expires_and_unlimited_never_does() {
        let mut zero = Deadline::start(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(zero.expired());
        assert!(!Deadline::unlimited().expired());
    }

    #[test]
    fn fixed_step_clock_advances() {
        let mut clock = FixedStepClock::new(10.0, Duration::from_millis(500));
        clock.advance();
        clock.advance();
        assert!((clock.now() - 11.0).abs() < 1e-12);
        assert_eq!(clock.tick_duration(), Duration::from_millis(500));
    }
}
