//! `typeId` → time-function dispatch.
//!
//! Grounded in `InstructionModel`/`InstructionModelSet` and
//! `callInstrTimeFunc` from `TestCore_PerformanceModel.h`: every
//! instruction class registers a `typeId` against a time function once,
//! at model-construction time, and the hot path is a single table
//! lookup followed by an indirect call.

pub mod riscv;

use std::collections::BTreeMap;

use crate::channel::TraceChannel;
use crate::error::PerfEstError;
use crate::model::PerformanceModel;

/// A typeId's time function: advances pipeline/resource state for one
/// instruction at `idx` of `channel`.
pub type TimeFunc = fn(&mut PerformanceModel, &dyn TraceChannel, usize);

/// The coarse instruction-class taxonomy the baseline RV64IM set is
/// built from, mirroring the `PE_TIMEFUNC_*` macro families. Exposed so
/// a caller extending the dispatch table with a custom ISA can register
/// a `typeId` against the same class shapes instead of hand-rolling a
/// time function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionClass {
    /// No register-operand wait (`lui`, `auipc`, `csrr{w,s,c}i`).
    Arith0,
    /// Depends on `rs1` only.
    ArithRs1,
    /// Depends on `rs2` only.
    ArithRs2,
    /// Depends on both `rs1` and `rs2`.
    ArithRs1Rs2,
    /// Conditional branch.
    Branch,
    /// Unconditional immediate jump.
    Jump,
    /// Register-indirect jump.
    JumpRegister,
    /// Integer multiply.
    Mul,
    /// Signed integer divide/remainder.
    Div,
    /// Unsigned integer divide/remainder.
    Divu,
    /// Load.
    Load,
    /// Store.
    Store,
    /// Generic fallback with no operand wait and no scoreboard publish.
    Def,
}

impl InstructionClass {
    /// The time function this class composes to, per
    /// `TestCore_InstructionModels.cpp`'s `PE_TIMEFUNC_*` definitions.
    #[must_use]
    pub const fn time_fn(self) -> TimeFunc {
        use crate::pipeline::time_fn as tf;
        match self {
            Self::Arith0 => tf::arith_0,
            Self::ArithRs1 => tf::arith_rs1,
            Self::ArithRs2 => tf::arith_rs2,
            Self::ArithRs1Rs2 => tf::arith_rs1_rs2,
            Self::Branch => tf::branch,
            Self::Jump => tf::jump,
            Self::JumpRegister => tf::jumpr,
            Self::Mul => tf::mul,
            Self::Div => tf::div,
            Self::Divu => tf::divu,
            Self::Load => tf::load,
            Self::Store => tf::store,
            Self::Def => tf::def,
        }
    }
}

/// One registered instruction's name, `typeId`, and resolved class.
#[derive(Debug, Clone, Copy)]
pub struct InstructionModel {
    pub name: &'static str,
    pub type_id: i32,
    pub class: InstructionClass,
}

/// A named collection of [`InstructionModel`]s, mirroring
/// `InstructionModelSet` — used by callers building a dispatch table
/// for a custom ISA rather than the baseline RV64IM set.
#[derive(Debug, Clone, Default)]
pub struct InstructionModelSet {
    pub instructions: Vec<InstructionModel>,
}

impl InstructionModelSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, type_id: i32, class: InstructionClass) {
        self.instructions.push(InstructionModel { name, type_id, class });
    }
}

/// `typeId` → [`TimeFunc`] lookup table, with an optional `_def`
/// fallback for any unregistered id.
#[derive(Default)]
pub struct Dispatcher {
    table: BTreeMap<i32, TimeFunc>,
    fallback: Option<TimeFunc>,
}

impl Dispatcher {
    /// An empty dispatcher with no fallback: every unregistered
    /// `typeId` surfaces [`PerfEstError::UnknownInstruction`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The baseline RV64IM/Zicsr instruction set, as extracted from the
    /// upstream reference model's `initInstructionSet`.
    #[must_use]
    pub fn riscv() -> Self {
        riscv::build()
    }

    /// Registers `type_id` against `time_fn`, failing if `type_id` is
    /// already registered (each `typeId` has exactly one time function).
    pub fn register(&mut self, type_id: i32, time_fn: TimeFunc) -> Result<(), PerfEstError> {
        if self.table.insert(type_id, time_fn).is_some() {
            return Err(PerfEstError::InvalidConfiguration {
                reason: format!("typeId {type_id} registered twice"),
            });
        }
        Ok(())
    }

    /// Unconditionally inserts `type_id` against `time_fn`, overwriting
    /// any prior registration. Used by baseline instruction-set builders
    /// that already guarantee uniqueness by construction; `register` is
    /// the fallible entry point for callers extending a live dispatcher.
    pub(crate) fn insert(&mut self, type_id: i32, time_fn: TimeFunc) {
        let _ = self.table.insert(type_id, time_fn);
    }

    /// Installs the fallback invoked for any `typeId` with no dedicated
    /// registration (the `_def` entry in the baseline set).
    pub fn set_fallback(&mut self, time_fn: TimeFunc) {
        self.fallback = Some(time_fn);
    }

    /// Resolves `type_id` to its time function, falling back to the
    /// installed `_def` if present.
    ///
    /// # Errors
    ///
    /// Returns [`PerfEstError::UnknownInstruction`] if `type_id` is
    /// unregistered and no fallback is installed.
    pub fn resolve(&self, type_id: i32) -> Result<TimeFunc, PerfEstError> {
        self.table
            .get(&type_id)
            .copied()
            .or(self.fallback)
            .ok_or(PerfEstError::UnknownInstruction { type_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Window;

    #[test]
    fn unregistered_type_id_without_fallback_errors() {
        let dispatcher = Dispatcher::empty();
        assert!(matches!(
            dispatcher.resolve(7),
            Err(PerfEstError::UnknownInstruction { type_id: 7 })
        ));
    }

    #[test]
    fn fallback_resolves_unregistered_type_id() {
        let mut dispatcher = Dispatcher::empty();
        dispatcher.set_fallback(InstructionClass::Def.time_fn());
        assert!(dispatcher.resolve(999).is_ok());
    }

    #[test]
    fn duplicate_registration_errors() {
        let mut dispatcher = Dispatcher::empty();
        dispatcher.register(1, InstructionClass::ArithRs1.time_fn()).unwrap();
        assert!(matches!(
            dispatcher.register(1, InstructionClass::ArithRs1.time_fn()),
            Err(PerfEstError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn riscv_set_resolves_known_opcodes() {
        let dispatcher = Dispatcher::riscv();
        assert!(dispatcher.resolve(0).is_ok()); // add
        assert!(dispatcher.resolve(38).is_ok()); // lw
        assert!(dispatcher.resolve(43).is_ok()); // beq
    }

    #[test]
    #[allow(unused)]
    fn resolved_time_fn_is_callable() {
        let dispatcher = Dispatcher::riscv();
        let time_fn = dispatcher.resolve(10).unwrap(); // addi
        let mut model = PerformanceModel::new();
        let mut window = Window::new(crate::channel::MIN_WINDOW);
        window.write(10, 0x1000, 1, 0, 2, 0, 0);
        time_fn(&mut model, &window, 0);
        assert!(model.cycle_count() > 0);
    }
}
