//! Instruction-cache latency proxy: a single event time representing
//! the last fetch's completion, plus a fixed per-fetch delay.

/// A fixed-latency instruction cache. Unlike the D-cache, this models
/// fetch latency as a single scalar "last fetch" timestamp with a fixed
/// delay rather than a full set-associative structure.
#[derive(Debug, Clone, Copy)]
pub struct InstructionCache {
    delay: i32,
    last_fetch: u64,
}

impl Default for InstructionCache {
    fn default() -> Self {
        Self {
            delay: 0,
            last_fetch: 0,
        }
    }
}

impl InstructionCache {
    /// Creates an instruction cache with the given fixed fetch delay.
    #[must_use]
    pub const fn new(delay: i32) -> Self {
        Self {
            delay,
            last_fetch: 0,
        }
    }

    /// Read by PcGen: the last fetch completion time.
    #[must_use]
    pub const fn last_fetch(&self) -> u64 {
        self.last_fetch
    }

    /// Published by If after issuing a fetch.
    pub fn set_last_fetch(&mut self, time: u64) {
        self.last_fetch = time;
    }

    /// Fixed per-fetch delay.
    #[must_use]
    pub const fn get_delay(&self) -> i32 {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_zero_cycles() {
        assert_eq!(InstructionCache::default().get_delay(), 0);
    }

    #[test]
    fn last_fetch_round_trips() {
        let mut icache = InstructionCache::default();
        icache.set_last_fetch(42);
        assert_eq!(icache.last_fetch(), 42);
    }
}
