//! Commit forwarding: a single event time published by every
//! register-retiring instruction's Com stage and consumed by Is.

/// Tracks the last commit-forwarding timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clobber {
    commit_time: u64,
}

impl Clobber {
    /// The time an Is-stage dependency check must wait for, to account for
    /// in-flight commit forwarding.
    #[must_use]
    pub const fn is_time(&self) -> u64 {
        self.commit_time
    }

    /// Published by Com for every instruction that retires to a register.
    pub fn set_commit_time(&mut self, time: u64) {
        self.commit_time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_commit_time_is_visible_to_is_stage() {
        let mut clobber = Clobber::default();
        assert_eq!(clobber.is_time(), 0);
        clobber.set_commit_time(12);
        assert_eq!(clobber.is_time(), 12);
    }
}
