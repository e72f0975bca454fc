//! Trace channel: the columnar window of retired instructions shared with
//! the instruction-set simulator (ISS).
//!
//! The channel is externally owned (by the ISS) and borrowed for read by
//! the core. The upstream plugin resolves a string-keyed
//! `getTraceValueHook` once at connect time so the hot per-instruction
//! path performs no string lookup. Rust has no raw pointer-equivalent
//! column hook: instead, [`Column`] is the abstract "column handle" (an
//! enum tag, not an index into anything), resolved at [`connect`] time
//! and re-validated on every call so a caller can never read a column
//! that was not advertised as present.

use crate::error::PerfEstError;

/// The trace window is hard-coded to at least this many entries in the
/// original plugin; implementations must treat the window size as a
/// channel-provided constant, not an assumption baked into the core.
pub const MIN_WINDOW: usize = 100;

/// One trace column the core may bind to at connect time.
///
/// The column handle: an index + type tag resolved once at connect
/// time, used thereafter instead of a raw pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Instruction type identifier, dispatched on by the core.
    TypeId,
    /// Program counter of the retiring instruction.
    Pc,
    /// First source register index.
    Rs1,
    /// Second source register index.
    Rs2,
    /// Destination register index.
    Rd,
    /// Branch/jump target address.
    BrTarget,
    /// Effective memory address (loads/stores).
    MemAddr,
}

impl Column {
    /// All columns the core requires at `connect` time.
    pub const REQUIRED: [Self; 7] = [
        Self::TypeId,
        Self::Pc,
        Self::Rs1,
        Self::Rs2,
        Self::Rd,
        Self::BrTarget,
        Self::MemAddr,
    ];

    /// The name a channel advertises this column under.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeId => "typeId",
            Self::Pc => "pc",
            Self::Rs1 => "rs1",
            Self::Rs2 => "rs2",
            Self::Rd => "rd",
            Self::BrTarget => "brTarget",
            Self::MemAddr => "memAddr",
        }
    }
}

/// A columnar trace channel, implemented by every target-ISA channel
/// subclass. Printer-only columns are not part of this trait: the core
/// only needs the seven columns in [`Column::REQUIRED`].
pub trait TraceChannel {
    /// Number of entries in the sliding window. Must be `>= MIN_WINDOW`.
    fn window_len(&self) -> usize;

    /// Returns `true` if the named column is present on this channel.
    /// Used once at `connect` time; the core never performs a string
    /// lookup in the per-instruction hot path.
    fn get_trace_value_hook(&self, name: &str) -> bool;

    /// Instruction type id at `idx`, dispatched on by the core.
    fn type_id(&self, idx: usize) -> i32;
    /// Program counter at `idx`.
    fn pc(&self, idx: usize) -> u64;
    /// RS1 index at `idx`.
    fn rs1(&self, idx: usize) -> u64;
    /// RS2 index at `idx`.
    fn rs2(&self, idx: usize) -> u64;
    /// RD index at `idx`.
    fn rd(&self, idx: usize) -> u64;
    /// Branch/jump target at `idx`.
    fn br_target(&self, idx: usize) -> u64;
    /// Effective memory address at `idx`.
    fn mem_addr(&self, idx: usize) -> u64;
}

/// Verifies every required column is present, failing with
/// [`PerfEstError::ChannelMismatch`] naming the first one missing.
///
/// `connect` is idempotent: calling it twice on the same channel just
/// re-checks the same columns and returns the same result.
pub fn connect(channel: &dyn TraceChannel) -> Result<(), PerfEstError> {
    for column in Column::REQUIRED {
        if !channel.get_trace_value_hook(column.name()) {
            return Err(PerfEstError::ChannelMismatch {
                column: column.name().to_string(),
            });
        }
    }
    Ok(())
}

/// A concrete, owned columnar trace window.
///
/// This is the default `Channel` implementation: a fixed-width sliding
/// window filled by the ISS and read by the core. `instrIndex` is valid
/// for the duration between [`Window::new_trace_block`] calls; the ISS
/// produces values and the core only ever reads them.
#[derive(Debug, Clone)]
pub struct Window {
    type_id: Vec<i32>,
    pc: Vec<u64>,
    rs1: Vec<u64>,
    rs2: Vec<u64>,
    rd: Vec<u64>,
    br_target: Vec<u64>,
    mem_addr: Vec<u64>,
    instr_index: usize,
}

impl Window {
    /// Creates a new window with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < `[`MIN_WINDOW`]: the window size is a
    /// channel-provided constant the core is entitled to assert on.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity >= MIN_WINDOW,
            "trace window capacity must be >= {MIN_WINDOW}, got {capacity}"
        );
        Self {
            type_id: vec![0; capacity],
            pc: vec![0; capacity],
            rs1: vec![0; capacity],
            rs2: vec![0; capacity],
            rd: vec![0; capacity],
            br_target: vec![0; capacity],
            mem_addr: vec![0; capacity],
            instr_index: 0,
        }
    }

    /// Writes one retired instruction's record at the current
    /// `instrIndex`. Called by the ISS before the core's `execute`.
    ///
    /// # Panics
    ///
    /// Panics if `instrIndex` is out of bounds for the window.
    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &mut self,
        type_id: i32,
        pc: u64,
        rs1: u64,
        rs2: u64,
        rd: u64,
        br_target: u64,
        mem_addr: u64,
    ) {
        let i = self.instr_index;
        self.type_id[i] = type_id;
        self.pc[i] = pc;
        self.rs1[i] = rs1;
        self.rs2[i] = rs2;
        self.rd[i] = rd;
        self.br_target[i] = br_target;
        self.mem_addr[i] = mem_addr;
    }

    /// Resets `instrIndex` to zero. Called by the ISS whenever it decides
    /// to refill the window.
    pub fn new_trace_block(&mut self) {
        self.instr_index = 0;
    }

    /// Advances `instrIndex` by one. Called by the core after each
    /// retired instruction has been timed.
    pub fn advance(&mut self) {
        self.instr_index += 1;
    }

    /// The current instruction index.
    #[must_use]
    pub const fn instr_index(&self) -> usize {
        self.instr_index
    }
}

impl TraceChannel for Window {
    fn window_len(&self) -> usize {
        self.type_id.len()
    }

    fn get_trace_value_hook(&self, name: &str) -> bool {
        Column::REQUIRED.iter().any(|c| c.name() == name)
    }

    fn type_id(&self, idx: usize) -> i32 {
        self.type_id[idx]
    }

    fn pc(&self, idx: usize) -> u64 {
        self.pc[idx]
    }

    fn rs1(&self, idx: usize) -> u64 {
        self.rs1[idx]
    }

    fn rs2(&self, idx: usize) -> u64 {
        self.rs2[idx]
    }

    fn rd(&self, idx: usize) -> u64 {
        self.rd[idx]
    }

    fn br_target(&self, idx: usize) -> u64 {
        self.br_target[idx]
    }

    fn mem_addr(&self, idx: usize) -> u64 {
        self.mem_addr[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "trace window capacity")]
    fn window_below_minimum_panics() {
        let _ = Window::new(10);
    }

    #[test]
    fn connect_succeeds_for_full_window() {
        let window = Window::new(MIN_WINDOW);
        assert!(connect(&window).is_ok());
    }

    #[test]
    fn new_trace_block_resets_index() {
        let mut window = Window::new(MIN_WINDOW);
        window.advance();
        window.advance();
        assert_eq!(window.instr_index(), 2);
        window.new_trace_block();
        assert_eq!(window.instr_index(), 0);
    }

    #[test]
    fn write_and_read_round_trip() {
        let mut window = Window::new(MIN_WINDOW);
        window.write(10, 0x1000, 1, 2, 3, 0, 0);
        assert_eq!(window.type_id(0), 10);
        assert_eq!(window.pc(0), 0x1000);
        assert_eq!(window.rs1(0), 1);
        assert_eq!(window.rs2(0), 2);
        assert_eq!(window.rd(0), 3);
    }

    struct MissingRs2;

    impl TraceChannel for MissingRs2 {
        fn window_len(&self) -> usize {
            MIN_WINDOW
        }
        fn get_trace_value_hook(&self, name: &str) -> bool {
            name != "rs2"
        }
        fn type_id(&self, _: usize) -> i32 {
            0
        }
        fn pc(&self, _: usize) -> u64 {
            0
        }
        fn rs1(&self, _: usize) -> u64 {
            0
        }
        fn rs2(&self, _: usize) -> u64 {
            0
        }
        fn rd(&self, _: usize) -> u64 {
            0
        }
        fn br_target(&self, _: usize) -> u64 {
            0
        }
        fn mem_addr(&self, _: usize) -> u64 {
            0
        }
    }

    #[test]
    fn connect_fails_on_missing_column() {
        let err = connect(&MissingRs2).unwrap_err();
        assert_eq!(
            err,
            PerfEstError::ChannelMismatch {
                column: "rs2".to_string()
            }
        );
    }
}
