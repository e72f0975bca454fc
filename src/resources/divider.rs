//! Divider latency models: a fixed per-division-class delay consulted
//! with no arguments, matching the upstream call sites exactly.
//!
//! `PE_TIMEFUNC_EX_STAGE_DIV`/`_DIVU` in `TestCore_InstructionModels.cpp`
//! call `divModel.getDelay()`/`divUModel.getDelay()` with zero arguments;
//! any data-dependence on the dividend/divisor lives inside that model,
//! not in the call site. The `TraceChannel` contract this crate is built
//! against (`channel/mod.rs`) exposes only architectural register
//! *indices* and addresses, never the register's runtime value, so
//! there is no real operand data available to key a lookup on — the
//! source's `CVA6_DividerModel`/`CVA6_DividerUnsignedModel` internals
//! are absent from the retrieved pack regardless. Rather than
//! manufacture a fake "operand" out of a register index, this crate
//! keeps `getDelay()` a true zero-arg call and uses a fixed,
//! disclosed worst-case delay (`DESIGN.md`).

const SIGNED_DELAY: i32 = 34;
const UNSIGNED_DELAY: i32 = 33;

/// Signed division/remainder latency (`div`, `rem`, `divw`, `remw`).
#[derive(Debug, Clone, Copy)]
pub struct Divider {
    delay: i32,
}

impl Default for Divider {
    fn default() -> Self {
        Self { delay: SIGNED_DELAY }
    }
}

impl Divider {
    /// Creates a divider with the given fixed latency.
    #[must_use]
    pub const fn new(delay: i32) -> Self {
        Self { delay }
    }

    /// Cycles to produce a signed quotient/remainder. Consults only the
    /// model's own fixed latency, not the current instruction's operands.
    #[must_use]
    pub const fn get_delay(&self) -> i32 {
        self.delay
    }
}

/// Unsigned division/remainder latency (`divu`, `remu`, `divuw`, `remuw`).
#[derive(Debug, Clone, Copy)]
pub struct DividerUnsigned {
    delay: i32,
}

impl Default for DividerUnsigned {
    fn default() -> Self {
        Self { delay: UNSIGNED_DELAY }
    }
}

impl DividerUnsigned {
    /// Creates a divider with the given fixed latency.
    #[must_use]
    pub const fn new(delay: i32) -> Self {
        Self { delay }
    }

    /// Cycles to produce an unsigned quotient/remainder. Consults only
    /// the model's own fixed latency, not the current instruction's
    /// operands.
    #[must_use]
    pub const fn get_delay(&self) -> i32 {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_signed_delay_is_positive() {
        assert!(Divider::default().get_delay() > 0);
    }

    #[test]
    fn default_unsigned_delay_is_positive() {
        assert!(DividerUnsigned::default().get_delay() > 0);
    }

    #[test]
    fn custom_delay_round_trips() {
        assert_eq!(Divider::new(5).get_delay(), 5);
        assert_eq!(DividerUnsigned::new(7).get_delay(), 7);
    }
}
