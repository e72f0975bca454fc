//! Cycle-accurate trace-driven performance estimation core.
//!
//! This crate implements the cycle-timing engine of a back-end consumer for
//! an instruction-execution trace produced by an external instruction-set
//! simulator (ISS). Given a stream of retired instructions and their
//! architectural side information (PC, register indices, branch target,
//! effective memory address, …), the core assigns each instruction a
//! retirement-cycle timestamp consistent with a configurable pipelined
//! in-order super-scalar processor model:
//! 1. **Channel:** a small columnar sliding window of retired instructions
//!    shared with the ISS.
//! 2. **Dispatch:** binds each instruction's `typeId` to a time function.
//! 3. **Pipeline:** per-stage event-time registers (PcGen, If, Iq, Id, Is,
//!    Ex, Com) advanced by max-reduction over microarchitectural event
//!    times.
//! 4. **Resources:** register scoreboard, commit forwarding, branch
//!    prediction, divider latency, and a configurable multi-level
//!    set-associative D-cache.
//!
//! The crate is single-threaded and strictly sequential: exactly one
//! instruction is timed at a time, in program order.

/// External lifecycle (`connect_channel`, `initialize`, `execute`,
/// `finalize`, `apply_config`) a host simulator drives in order.
pub mod backend;
/// Columnar trace window shared with the ISS.
pub mod channel;
/// Configuration map and typed configuration tree.
pub mod config;
/// Instruction-class dispatch: `typeId` → time function.
pub mod dispatch;
/// Error kinds surfaced by the core.
pub mod error;
/// The central `PerformanceModel`: owns pipeline, resources, and memory.
pub mod model;
/// Configurable multi-level set-associative D-cache.
pub mod memory;
/// Pipeline stages and the per-instruction time function.
pub mod pipeline;
/// Scoreboard, clobber/forward, branch predictor, and divider models.
pub mod resources;

pub use crate::backend::Backend;
pub use crate::config::{Config, ConfigMap};
pub use crate::error::PerfEstError;
pub use crate::model::PerformanceModel;
