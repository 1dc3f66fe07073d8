use serde::{Deserialize, Serialize};

/// Guards the time-window recompute against re-entry.
///
/// Publishing a window writes the same inputs that trigger a recompute; any
/// recompute requested while one is running is discarded, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecomputeLatch {
    #[default]
    Idle,
    Recomputing,
}

impl RecomputeLatch {
    /// Moves to `Recomputing`; returns `false` when already there.
    pub fn try_enter(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Recomputing;
                true
            }
            Self::Recomputing => false,
        }
    }

    pub fn release(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_recomputing(self) -> bool {
        self == Self::Recomputing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_rejected_until_release() {
        let mut latch = RecomputeLatch::default();
        assert!(latch.try_enter());
        assert!(latch.is_recomputing());
        assert!(!latch.try_enter());
        latch.release();
        assert!(latch.try_enter());
    }
}
