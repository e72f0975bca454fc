//! The central performance model: owns pipeline state, the resource
//! models, and the memory hierarchy, and times one instruction at a
//! time against a connected trace channel.

use crate::channel::{self, TraceChannel};
use crate::config::ConfigMap;
use crate::dispatch::Dispatcher;
use crate::error::PerfEstError;
use crate::memory::MemoryModel;
use crate::pipeline::{time_fn, PipelineState, StageSnapshot};
use crate::resources::{BranchPredictor, Clobber, Divider, DividerUnsigned, InstructionCache, Scoreboard};

/// Owns every piece of per-run mutable state the time functions in
/// [`crate::pipeline::time_fn`] read and write, plus the `typeId` →
/// time-function dispatch table.
pub struct PerformanceModel {
    pub(crate) pipeline: PipelineState,
    pub(crate) scoreboard: Scoreboard,
    pub(crate) clobber: Clobber,
    pub(crate) branch_predictor: BranchPredictor,
    pub(crate) divider: Divider,
    pub(crate) divider_unsigned: DividerUnsigned,
    pub(crate) icache: InstructionCache,
    pub(crate) memory: MemoryModel,
    dispatcher: Dispatcher,
    retired: u64,
    cycle_count: u64,
}

impl Default for PerformanceModel {
    fn default() -> Self {
        Self {
            pipeline: PipelineState::default(),
            scoreboard: Scoreboard::default(),
            clobber: Clobber::default(),
            branch_predictor: BranchPredictor::default(),
            divider: Divider::default(),
            divider_unsigned: DividerUnsigned::default(),
            icache: InstructionCache::default(),
            memory: MemoryModel::default(),
            dispatcher: Dispatcher::riscv(),
            retired: 0,
            cycle_count: 0,
        }
    }
}

impl PerformanceModel {
    /// Creates a model with the baseline RV64IM dispatch table and
    /// default (single-cycle, no caching) resource models.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads memory-hierarchy configuration. Other resource models have
    /// no external configuration surface of their own.
    pub fn apply_config(&mut self, config: &ConfigMap) -> Result<(), PerfEstError> {
        self.memory.apply_config(config)
    }

    /// Times one retired instruction at `idx` of `channel`, dispatching
    /// on its `typeId`, and records its retirement cycle.
    ///
    /// # Errors
    ///
    /// Returns [`PerfEstError::UnknownInstruction`] if `typeId` has no
    /// registered time function and no `_def` fallback is installed.
    pub fn execute(&mut self, channel: &dyn TraceChannel, idx: usize) -> Result<(), PerfEstError> {
        let type_id = channel.type_id(idx);
        let time_fn = self.dispatcher.resolve(type_id)?;
        time_fn(self, channel, idx);
        Ok(())
    }

    /// Times every instruction currently written into `channel`, from
    /// index 0 up to (not including) `channel.instr_index()`-equivalent
    /// `count`.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PerfEstError::UnknownInstruction`]
    /// encountered, leaving later instructions untimed.
    pub fn execute_block(&mut self, channel: &dyn TraceChannel, count: usize) -> Result<(), PerfEstError> {
        channel::connect(channel)?;
        for idx in 0..count {
            self.execute(channel, idx)?;
        }
        Ok(())
    }

    /// Number of instructions retired so far.
    #[must_use]
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// The latest committed instruction's retirement cycle, i.e. the
    /// model's notion of elapsed cycle count.
    #[must_use]
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// A read-only snapshot of each pipeline stage's last published
    /// event time, for introspection and tests.
    #[must_use]
    pub fn stage_snapshot(&self) -> StageSnapshot {
        self.pipeline.snapshot()
    }

    /// Registers a retiring instruction's commit time: called once per
    /// instruction by every `com_stage`/`com_stage_cb` in
    /// [`crate::pipeline::time_fn`].
    pub(crate) fn record_retirement(&mut self, commit_time: u64) {
        self.retired += 1;
        self.cycle_count = self.cycle_count.max(commit_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Window;

    #[test]
    fn single_addi_retires_with_positive_cycle_count() {
        let mut model = PerformanceModel::new();
        let mut window = Window::new(channel::MIN_WINDOW);
        // typeId 6 is `sltu` (ArithRs1Rs2 class) per the baseline table.
        window.write(6, 0x1000, 1, 0, 2, 0, 0);
        model.execute_block(&window, 1).unwrap();
        assert_eq!(model.retired(), 1);
        assert!(model.cycle_count() > 0);
    }

    #[test]
    fn two_independent_instructions_both_retire() {
        let mut model = PerformanceModel::new();
        let mut window = Window::new(channel::MIN_WINDOW);
        window.write(6, 0x1000, 1, 0, 2, 0, 0);
        window.advance();
        window.write(6, 0x1004, 3, 0, 4, 0, 0);
        model.execute_block(&window, 2).unwrap();
        assert_eq!(model.retired(), 2);
    }

    #[test]
    fn empty_block_retires_nothing() {
        let mut model = PerformanceModel::new();
        let window = Window::new(channel::MIN_WINDOW);
        model.execute_block(&window, 0).unwrap();
        assert_eq!(model.retired(), 0);
        assert_eq!(model.cycle_count(), 0);
    }

    #[test]
    fn unknown_type_id_surfaces_error_when_no_fallback() {
        let mut dispatcher = Dispatcher::empty();
        dispatcher
            .register(1, time_fn::arith_rs1)
            .expect("register should succeed");
        let mut model = PerformanceModel {
            dispatcher,
            ..PerformanceModel::new()
        };
        let mut window = Window::new(channel::MIN_WINDOW);
        window.write(99, 0x1000, 1, 0, 2, 0, 0);
        let err = model.execute(&window, 0).unwrap_err();
        assert!(matches!(err, PerfEstError::UnknownInstruction { type_id: 99 }));
    }
}
