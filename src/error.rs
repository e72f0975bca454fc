//! Error kinds surfaced by the performance-estimation core.
//!
//! Statistics overflow (counters saturate at their width) is intentionally
//! not represented here — spec-wise it is not a user-visible error.

use thiserror::Error;

/// Errors the core can surface to its host simulator.
///
/// None of these terminate the process; the host decides how to react.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerfEstError {
    /// A required trace column was missing from the connected channel.
    #[error("channel is missing required column `{column}`")]
    ChannelMismatch {
        /// Name of the missing column.
        column: String,
    },

    /// `typeId` has no registered time function.
    #[error("no time function registered for typeId {type_id}")]
    UnknownInstruction {
        /// The unrecognized instruction type id.
        type_id: i32,
    },

    /// A configuration key was missing, malformed, or internally
    /// inconsistent (e.g. `lower > upper`).
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// More cache levels were requested than the memory model allows.
    #[error("cannot register cache level `{name}`: capacity {capacity} exceeded")]
    OutOfCapacity {
        /// Name of the level that could not be registered.
        name: String,
        /// The capacity that was exceeded.
        capacity: usize,
    },
}
