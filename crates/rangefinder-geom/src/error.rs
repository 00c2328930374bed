// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

/// Rejected geometric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeomError {
    /// Direction vector was zero (or too short to normalise).
    #[error("ray direction is degenerate")]
    DegenerateDirection,
    /// A component was NaN or infinite.
    #[error("non-finite component in ray input")]
    NonFinite,
}
