//! External lifecycle a host simulator drives: `connect_channel` →
//! `apply_config` → `initialize` → `execute` (repeated) → `finalize`.
//!
//! Grounded in `PerformanceEstimator`'s plugin lifecycle hooks; the
//! channel itself stays externally owned and borrowed for read, so
//! `Backend` never stores it — every [`Backend::execute`] call takes a
//! fresh `&dyn TraceChannel` borrow instead of a stored lifetime
//! parameter.

use tracing::debug;

use crate::channel::{self, TraceChannel};
use crate::config::ConfigMap;
use crate::error::PerfEstError;
use crate::memory::histogram;
use crate::model::PerformanceModel;

/// One cache level's histogram, named for the level it came from.
#[derive(Debug, Clone)]
pub struct LevelHistogram {
    pub name: String,
    pub csv: String,
}

/// The result of [`Backend::finalize`]: total cycle count plus one
/// histogram per registered cache level.
#[derive(Debug, Clone)]
pub struct FinalizeReport {
    pub cycle_count: u64,
    pub histograms: Vec<LevelHistogram>,
}

/// Lifecycle state a host simulator must step through in order;
/// [`Backend`] rejects out-of-order calls with
/// [`PerfEstError::InvalidConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Connecting,
    Configuring,
    Running,
    Finalized,
}

/// The performance-estimation core's external entry point.
#[derive(Default)]
pub struct Backend {
    model: PerformanceModel,
    phase: Phase,
}

impl Backend {
    /// Creates a backend with the baseline RV64IM dispatch table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates that `channel` advertises every required column.
    /// May be called again later (e.g. after a channel swap); it is
    /// idempotent and does not itself advance past the configuring
    /// phase.
    ///
    /// # Errors
    ///
    /// Returns [`PerfEstError::ChannelMismatch`] if a required column
    /// is missing.
    pub fn connect_channel(&mut self, channel: &dyn TraceChannel) -> Result<(), PerfEstError> {
        channel::connect(channel)?;
        if self.phase == Phase::Connecting {
            self.phase = Phase::Configuring;
        }
        Ok(())
    }

    /// Forwards `config` to the performance model and its subcomponents.
    ///
    /// # Errors
    ///
    /// Propagates [`PerfEstError::InvalidConfiguration`] or
    /// [`PerfEstError::OutOfCapacity`] from the memory model.
    pub fn apply_config(&mut self, config: &ConfigMap) -> Result<(), PerfEstError> {
        self.model.apply_config(config)
    }

    /// One-time transition to the running phase: after this call,
    /// `execute` may be invoked. Calling `initialize` before a channel
    /// has been connected is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PerfEstError::InvalidConfiguration`] if no channel has
    /// been connected yet.
    pub fn initialize(&mut self) -> Result<(), PerfEstError> {
        if self.phase == Phase::Connecting {
            return Err(PerfEstError::InvalidConfiguration {
                reason: "initialize called before connect_channel".to_string(),
            });
        }
        self.phase = Phase::Running;
        Ok(())
    }

    /// Times the instruction the ISS wrote at `idx` of `channel`.
    /// Called once per retired instruction.
    ///
    /// # Errors
    ///
    /// Returns [`PerfEstError::InvalidConfiguration`] if called before
    /// `initialize`, or [`PerfEstError::UnknownInstruction`] if the
    /// instruction's `typeId` has no registered time function.
    pub fn execute(&mut self, channel: &dyn TraceChannel, idx: usize) -> Result<(), PerfEstError> {
        if self.phase != Phase::Running {
            return Err(PerfEstError::InvalidConfiguration {
                reason: "execute called before initialize".to_string(),
            });
        }
        let result = self.model.execute(channel, idx);
        if let Err(PerfEstError::UnknownInstruction { type_id }) = &result {
            debug!(type_id, "no time function registered, no fallback installed");
        }
        result
    }

    /// Flushes cache statistics to CSV and returns the total retired
    /// cycle count. Idempotent: calling `finalize` again after the
    /// first returns the same snapshot without re-running anything.
    pub fn finalize(&mut self) -> FinalizeReport {
        self.phase = Phase::Finalized;
        let histograms = self
            .model
            .memory
            .levels()
            .iter()
            .map(|level| LevelHistogram {
                name: level.name().to_string(),
                csv: histogram::render_csv(level),
            })
            .collect();
        FinalizeReport {
            cycle_count: self.model.cycle_count(),
            histograms,
        }
    }
}
