//! Pipeline stages and the per-instruction time function.
//!
//! Every instruction traverses seven logical stages, PcGen → If → Iq →
//! Id → Is → Ex → Com; [`PipelineState`] holds the per-stage event-time
//! registers from `TestCore_PerformanceModel.h`, and [`time_fn`]
//! composes them following `TestCore_InstructionModels.cpp`'s macros.

pub mod stage;
pub mod time_fn;

use stage::{ExRing, RingStage, ScalarStage};

/// The If stage's three event-time registers (`leaveStage`,
/// `leaveICacheIn`, `leaveICache`).
#[derive(Debug, Clone, Copy, Default)]
pub struct IfStage {
    leave_stage: u64,
    leave_icache_in: u64,
    leave_icache: u64,
}

impl IfStage {
    #[must_use]
    pub const fn back_pressure(&self) -> u64 {
        self.leave_icache_in
    }
    #[must_use]
    pub const fn get_leave_icache(&self) -> u64 {
        self.leave_icache
    }
    pub fn set_leave_icache_in(&mut self, v: u64) {
        self.leave_icache_in = v;
    }
    pub fn set_leave_icache(&mut self, v: u64) {
        self.leave_icache = v;
    }
    #[must_use]
    pub const fn get_leave_stage(&self) -> u64 {
        self.leave_stage
    }
    pub fn set_leave_stage(&mut self, v: u64) {
        self.leave_stage = v;
    }
}

/// The Iq stage: a 7-deep ring plus the scalar `leaveInsert` register.
#[derive(Debug, Clone, Default)]
pub struct IqStage {
    ring: RingStage<7>,
    leave_insert: u64,
}

impl IqStage {
    #[must_use]
    pub const fn back_pressure(&self) -> u64 {
        self.ring.back_pressure()
    }
    pub fn set_leave_insert(&mut self, v: u64) {
        self.leave_insert = v;
    }
    #[must_use]
    pub const fn leave_insert(&self) -> u64 {
        self.leave_insert
    }
    pub fn leave(&mut self, v: u64) {
        self.ring.leave(v);
    }
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.ring.last()
    }
}

/// The Ex stage: the dual-pointer 8-deep ring plus one scalar register
/// per functional-unit sub-resource.
#[derive(Debug, Clone, Default)]
pub struct ExStage {
    ring: ExRing,
    leave_alu: u64,
    leave_mul_i: u64,
    leave_mul_o: u64,
    leave_div: u64,
    leave_lctrl: u64,
    leave_dcache: u64,
    leave_lunit: u64,
    leave_sctrl: u64,
    leave_sunit: u64,
}

impl ExStage {
    #[must_use]
    pub const fn back_pressure_arith(&self) -> u64 {
        let a = self.ring.back_pressure();
        let b = self.leave_alu;
        let c = self.leave_mul_o;
        let d = self.leave_div;
        max4(a, b, c, d)
    }
    #[must_use]
    pub const fn back_pressure_mul(&self) -> u64 {
        max3(self.ring.back_pressure(), self.leave_mul_i, self.leave_div)
    }
    #[must_use]
    pub const fn back_pressure_div(&self) -> u64 {
        if self.ring.back_pressure() > self.leave_div {
            self.ring.back_pressure()
        } else {
            self.leave_div
        }
    }
    #[must_use]
    pub const fn back_pressure_load(&self) -> u64 {
        if self.ring.back_pressure() > self.leave_lctrl {
            self.ring.back_pressure()
        } else {
            self.leave_lctrl
        }
    }
    #[must_use]
    pub const fn back_pressure_store(&self) -> u64 {
        if self.ring.back_pressure() > self.leave_sctrl {
            self.ring.back_pressure()
        } else {
            self.leave_sctrl
        }
    }
    #[must_use]
    pub const fn trans_guard(&self) -> u64 {
        self.ring.trans_guard()
    }

    pub fn set_leave_alu(&mut self, v: u64) {
        self.leave_alu = v;
    }
    pub fn set_leave_mul_i(&mut self, v: u64) {
        self.leave_mul_i = v;
    }
    pub fn set_leave_mul_o(&mut self, v: u64) {
        self.leave_mul_o = v;
    }
    pub fn set_leave_div(&mut self, v: u64) {
        self.leave_div = v;
    }
    pub fn set_leave_lctrl(&mut self, v: u64) {
        self.leave_lctrl = v;
    }
    #[must_use]
    pub const fn get_leave_dcache(&self) -> u64 {
        self.leave_dcache
    }
    pub fn set_leave_dcache(&mut self, v: u64) {
        self.leave_dcache = v;
    }
    #[must_use]
    pub const fn get_leave_lunit(&self) -> u64 {
        self.leave_lunit
    }
    pub fn set_leave_lunit(&mut self, v: u64) {
        self.leave_lunit = v;
    }
    pub fn set_leave_sctrl(&mut self, v: u64) {
        self.leave_sctrl = v;
    }
    #[must_use]
    pub const fn get_leave_sunit(&self) -> u64 {
        self.leave_sunit
    }
    pub fn set_leave_sunit(&mut self, v: u64) {
        self.leave_sunit = v;
    }

    pub fn leave(&mut self, v: u64) {
        self.ring.leave(v);
    }
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.ring.last()
    }
}

const fn max3(a: u64, b: u64, c: u64) -> u64 {
    let ab = if a > b { a } else { b };
    if ab > c { ab } else { c }
}

const fn max4(a: u64, b: u64, c: u64, d: u64) -> u64 {
    let ab = if a > b { a } else { b };
    let cd = if c > d { c } else { d };
    if ab > cd { ab } else { cd }
}

/// The seven pipeline stages' event-time state, owned by the
/// performance model.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub pcgen: ScalarStage,
    pub if_stage: IfStage,
    pub iq: IqStage,
    pub id: ScalarStage,
    pub is: ScalarStage,
    pub ex: ExStage,
    pub com: RingStage<2>,
}

/// A snapshot of each stage's most recently published `leaveStage`
/// value, for introspection without exposing mutable internals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSnapshot {
    pub pcgen: u64,
    pub if_stage: u64,
    pub iq: u64,
    pub id: u64,
    pub is: u64,
    pub ex: u64,
    pub com: u64,
}

impl PipelineState {
    #[must_use]
    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            pcgen: self.pcgen.get(),
            if_stage: self.if_stage.get_leave_stage(),
            iq: self.iq.last(),
            id: self.id.get(),
            is: self.is.get(),
            ex: self.ex.last(),
            com: self.com.last(),
        }
    }
}
