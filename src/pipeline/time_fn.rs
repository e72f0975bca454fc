//! Per-stage timestamp composition and the twelve instruction-class time
//! functions, translating `TestCore_InstructionModels.cpp`'s macros.
//!
//! Each `*_stage*` helper below corresponds to one `PE_TIMEFUNC_*_STAGE*`
//! macro; the instruction-class functions at the bottom correspond to
//! `PE_TIMEFUNC_ARITH_0`, `PE_TIMEFUNC_BRANCH`, `PE_TIMEFUNC_LOAD`, etc.,
//! and are what [`crate::dispatch`] registers against `typeId`.

use crate::channel::TraceChannel;
use crate::model::PerformanceModel;

// -- PcGen

fn pcgen_stage(model: &mut PerformanceModel) -> u64 {
    let start = model.pipeline.pcgen.get();
    let n1 = start + 1;
    let n2 = start.max(model.branch_predictor.pc_mispredict());
    let n3 = start.max(model.icache.last_fetch());
    let leave = n1.max(n2).max(n3).max(model.pipeline.if_stage.back_pressure());
    model.pipeline.pcgen.set(leave);
    leave
}

// -- If

/// Computes `n_if_6`, common to every If-stage variant, without
/// publishing to the branch predictor or advancing `leaveStage`.
fn if_stage_core(model: &mut PerformanceModel, n_pcgen_leave: u64) -> u64 {
    let n_if_1 = n_pcgen_leave + 1;
    let n_if_2 = n_pcgen_leave.max(model.branch_predictor.pc_predict());
    let n_if_3 = n_if_1.max(n_if_2).max(model.pipeline.if_stage.get_leave_icache());
    model.pipeline.if_stage.set_leave_icache_in(n_if_3);
    let n_if_4 = n_if_3 + u64::from(model.icache.get_delay().unsigned_abs());
    model.icache.set_last_fetch(n_if_4);
    model.pipeline.if_stage.set_leave_icache(n_if_4);
    let n_if_5 = n_if_4.max(model.pipeline.if_stage.get_leave_stage());
    n_if_5 + 1
}

fn if_stage_leave(model: &mut PerformanceModel, n_if_6: u64) -> u64 {
    let leave = n_if_6.max(model.pipeline.iq.back_pressure());
    model.pipeline.if_stage.set_leave_stage(leave);
    leave
}

fn if_stage(model: &mut PerformanceModel, n_pcgen_leave: u64) -> u64 {
    let n_if_6 = if_stage_core(model, n_pcgen_leave);
    if_stage_leave(model, n_if_6)
}

fn if_stage_branch(model: &mut PerformanceModel, n_pcgen_leave: u64, pc: u64, br_target: u64) -> u64 {
    let n_if_6 = if_stage_core(model, n_pcgen_leave);
    model.branch_predictor.predict_branch(pc, br_target, n_if_6);
    if_stage_leave(model, n_if_6)
}

fn if_stage_jump(model: &mut PerformanceModel, n_pcgen_leave: u64) -> u64 {
    let n_if_6 = if_stage_core(model, n_pcgen_leave);
    model.branch_predictor.predict_jump(n_if_6);
    if_stage_leave(model, n_if_6)
}

fn if_stage_jumpr(model: &mut PerformanceModel, n_pcgen_leave: u64) -> u64 {
    let n_if_6 = if_stage_core(model, n_pcgen_leave);
    model.branch_predictor.predict_jump_register(n_if_6);
    if_stage_leave(model, n_if_6)
}

// -- Iq

fn iq_stage(model: &mut PerformanceModel, n_if_leave: u64) -> u64 {
    let n_iq_1 = n_if_leave + 1;
    model.pipeline.iq.set_leave_insert(n_iq_1);
    let leave = n_iq_1.max(model.pipeline.id.get());
    model.pipeline.iq.leave(leave);
    leave
}

// -- Id

fn id_stage(model: &mut PerformanceModel, n_iq_leave: u64) -> u64 {
    let n_id_1 = n_iq_leave + 1;
    let leave = n_id_1.max(model.pipeline.is.get());
    model.pipeline.id.set(leave);
    leave
}

// -- Is

fn is_stage_alu_0(model: &mut PerformanceModel, n_id_leave: u64) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_arith());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_alu_rs1(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_arith());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_alu_rs2(model: &mut PerformanceModel, n_id_leave: u64, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xb(rs2);
    let n_is_3 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_arith());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_alu_rs1_rs2(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.scoreboard.xb(rs2);
    let n_is_4 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3).max(n_is_4);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_arith());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_branch(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.scoreboard.xb(rs2);
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_arith());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_mul(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.scoreboard.xb(rs2);
    let n_is_4 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3).max(n_is_4);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_mul());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_div(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.scoreboard.xb(rs2);
    let n_is_4 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3).max(n_is_4);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_div());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_load(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.clobber.is_time();
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_load());
    model.pipeline.is.set(leave);
    leave
}

fn is_stage_store(model: &mut PerformanceModel, n_id_leave: u64, rs1: usize, rs2: usize) -> u64 {
    let n_is_1 = n_id_leave;
    let n_is_2 = model.scoreboard.xa(rs1);
    let n_is_3 = model.scoreboard.xb(rs2);
    let n_is_done = n_is_1.max(n_is_2).max(n_is_3);
    let leave = n_is_done.max(model.pipeline.ex.back_pressure_store());
    model.pipeline.is.set(leave);
    leave
}

// -- Ex

fn ex_stage_leave(model: &mut PerformanceModel, n_ex_done: u64) -> u64 {
    let leave = n_ex_done
        .max(model.pipeline.ex.trans_guard())
        .max(model.pipeline.com.back_pressure());
    model.pipeline.ex.leave(leave);
    leave
}

fn ex_stage_def(model: &mut PerformanceModel, n_is_leave: u64) -> u64 {
    let n_ex_done = n_is_leave + 1;
    model.pipeline.ex.set_leave_alu(n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_arith(model: &mut PerformanceModel, n_is_leave: u64, rd: usize) -> u64 {
    let n_ex_done = n_is_leave + 1;
    model.pipeline.ex.set_leave_alu(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_branch(model: &mut PerformanceModel, n_is_leave: u64) -> u64 {
    let n_ex_done = n_is_leave + 1;
    model.pipeline.ex.set_leave_alu(n_ex_done);
    model.branch_predictor.correct(n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_jumpr(model: &mut PerformanceModel, n_is_leave: u64, rd: usize) -> u64 {
    let n_ex_done = n_is_leave + 1;
    model.pipeline.ex.set_leave_alu(n_ex_done);
    model.branch_predictor.correct(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_mul(model: &mut PerformanceModel, n_is_leave: u64, rd: usize) -> u64 {
    let n_ex_1 = n_is_leave + 1;
    model.pipeline.ex.set_leave_mul_i(n_ex_1);
    let n_ex_done = n_is_leave + 1;
    model.pipeline.ex.set_leave_mul_o(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_div(model: &mut PerformanceModel, n_is_leave: u64, rd: usize) -> u64 {
    let n_ex_done = n_is_leave + model.divider.get_delay() as u64;
    model.pipeline.ex.set_leave_div(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_divu(model: &mut PerformanceModel, n_is_leave: u64, rd: usize) -> u64 {
    let n_ex_done = n_is_leave + model.divider_unsigned.get_delay() as u64;
    model.pipeline.ex.set_leave_div(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_load(model: &mut PerformanceModel, n_is_leave: u64, rd: usize, addr: u64) -> u64 {
    let n_ex_1 = n_is_leave + 1;
    let n_ex_2 = n_ex_1.max(model.pipeline.ex.get_leave_dcache());
    model.pipeline.ex.set_leave_lctrl(n_ex_2);
    let n_ex_3 = n_ex_2 + u64::from(model.memory.get_delay(addr).unsigned_abs());
    let n_ex_4 = n_ex_3.max(model.pipeline.ex.get_leave_lunit());
    model.pipeline.ex.set_leave_dcache(n_ex_4);
    let n_ex_done = n_ex_4 + 1;
    model.pipeline.ex.set_leave_lunit(n_ex_done);
    model.scoreboard.set_xd(rd, n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

fn ex_stage_store(model: &mut PerformanceModel, n_is_leave: u64) -> u64 {
    let n_ex_1 = n_is_leave + 1;
    let n_ex_2 = n_ex_1.max(model.pipeline.ex.get_leave_sunit());
    model.pipeline.ex.set_leave_sctrl(n_ex_2);
    let n_ex_done = n_ex_2 + 1;
    model.pipeline.ex.set_leave_sunit(n_ex_done);
    ex_stage_leave(model, n_ex_done)
}

// -- Com

fn com_stage(model: &mut PerformanceModel, n_ex_leave: u64) -> u64 {
    let n_com_leave = n_ex_leave + 1;
    model.pipeline.com.leave(n_com_leave);
    model.record_retirement(n_com_leave);
    n_com_leave
}

fn com_stage_cb(model: &mut PerformanceModel, n_ex_leave: u64) -> u64 {
    let n_com_leave = com_stage(model, n_ex_leave);
    model.clobber.set_commit_time(n_com_leave);
    n_com_leave
}

// -- Instruction-class time functions

/// `lui`, `auipc`, `csrrwi`, `csrrsi`, `csrrci`: no register-operand wait.
pub fn arith_0(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_0(model, n_id);
    let n_ex = ex_stage_arith(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Register-immediate arithmetic: depends on `rs1` only.
pub fn arith_rs1(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_rs1(model, n_id, rs1);
    let n_ex = ex_stage_arith(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Depends on `rs2` only (not used by the baseline RV64IM set, present
/// for channels that expose `rs2`-only arithmetic forms).
pub fn arith_rs2(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs2 = channel.rs2(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_rs2(model, n_id, rs2);
    let n_ex = ex_stage_arith(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Register-register arithmetic: `add`, `sub`, `xor`, `sll`, …
pub fn arith_rs1_rs2(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_rs1_rs2(model, n_id, rs1, rs2);
    let n_ex = ex_stage_arith(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Conditional branches: `beq`, `bne`, `blt`, …
pub fn branch(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let pc = channel.pc(idx);
    let br_target = channel.br_target(idx);
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage_branch(model, n_pcgen, pc, br_target);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_branch(model, n_id, rs1, rs2);
    let n_ex = ex_stage_branch(model, n_is);
    let _ = com_stage(model, n_ex);
}

/// Unconditional immediate jump: `jal`.
pub fn jump(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage_jump(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_rs1_rs2(model, n_id, 0, 0);
    let n_ex = ex_stage_arith(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Register-indirect jump: `jalr`.
pub fn jumpr(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage_jumpr(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_rs1(model, n_id, rs1);
    let n_ex = ex_stage_jumpr(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// `mul`, `mulh`, `mulhu`, `mulhsu`, `mulw`.
pub fn mul(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_mul(model, n_id, rs1, rs2);
    let n_ex = ex_stage_mul(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Signed `div`/`rem`/`divw`/`remw`.
pub fn div(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_div(model, n_id, rs1, rs2);
    let n_ex = ex_stage_div(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// Unsigned `divu`/`remu`/`divuw`/`remuw`.
pub fn divu(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_div(model, n_id, rs1, rs2);
    let n_ex = ex_stage_divu(model, n_is, rd);
    let _ = com_stage_cb(model, n_ex);
}

/// `lw`, `lh`, `lhu`, `lb`, `lbu`, `ld`, `lwu`.
pub fn load(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rd = channel.rd(idx) as usize;
    let addr = channel.mem_addr(idx);
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_load(model, n_id, rs1);
    let n_ex = ex_stage_load(model, n_is, rd, addr);
    let _ = com_stage_cb(model, n_ex);
}

/// `sb`, `sh`, `sw`, `sd`: no destination register, no clobber publish.
pub fn store(model: &mut PerformanceModel, channel: &dyn TraceChannel, idx: usize) {
    let rs1 = channel.rs1(idx) as usize;
    let rs2 = channel.rs2(idx) as usize;
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_store(model, n_id, rs1, rs2);
    let n_ex = ex_stage_store(model, n_is);
    let _ = com_stage(model, n_ex);
}

/// Generic fallback for any `typeId` without a dedicated class: single
/// ALU-shaped pass with no operand wait and no scoreboard publish.
pub fn def(model: &mut PerformanceModel, _channel: &dyn TraceChannel, _idx: usize) {
    let n_pcgen = pcgen_stage(model);
    let n_if = if_stage(model, n_pcgen);
    let n_iq = iq_stage(model, n_if);
    let n_id = id_stage(model, n_iq);
    let n_is = is_stage_alu_0(model, n_id);
    let n_ex = ex_stage_def(model, n_is);
    let _ = com_stage(model, n_ex);
}
