//! Resource models owned by the performance model: the register
//! scoreboard, commit forwarding, branch prediction, divider latency,
//! and the instruction-cache latency proxy. The D-cache lives in
//! [`crate::memory`] since it is large enough to be its own module.

pub mod branch_predictor;
pub mod clobber;
pub mod divider;
pub mod icache;
pub mod scoreboard;

pub use branch_predictor::BranchPredictor;
pub use clobber::Clobber;
pub use divider::{Divider, DividerUnsigned};
pub use icache::InstructionCache;
pub use scoreboard::Scoreboard;
