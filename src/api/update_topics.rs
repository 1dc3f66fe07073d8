use serde::{Deserialize, Serialize};

/// Derived state a batch of config updates touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateTopic {
    /// Inputs tracked by the recalculation trigger.
    Time,
    /// Item spans changed, so content bounds may move.
    ItemsTime,
    Calendar,
    /// Window options the trigger does not track.
    Options,
    /// Row or item placement changed; the tree is rebuilt.
    Tree,
    /// Expanded flags or heights changed in place.
    Rows,
    /// Only the visible row slice needs recomputing.
    Visible,
}

impl UpdateTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Time => 1 << 0,
            Self::ItemsTime => 1 << 1,
            Self::Calendar => 1 << 2,
            Self::Options => 1 << 3,
            Self::Tree => 1 << 4,
            Self::Rows => 1 << 5,
            Self::Visible => 1 << 6,
        }
    }
}

/// Bitmask of update topics coalesced over one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateTopics {
    bits: u8,
}

impl UpdateTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_topic(topic: UpdateTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: UpdateTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: UpdateTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    /// Any topic that changes the flattened rows or their visible slice.
    #[must_use]
    pub const fn touches_rows(self) -> bool {
        self.contains_topic(UpdateTopic::Tree)
            || self.contains_topic(UpdateTopic::Rows)
            || self.contains_topic(UpdateTopic::Visible)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_accumulate() {
        let topics = UpdateTopics::none()
            .with_topic(UpdateTopic::Time)
            .union(UpdateTopics::from_topic(UpdateTopic::Rows));
        assert!(topics.contains_topic(UpdateTopic::Time));
        assert!(topics.touches_rows());
        assert!(!topics.contains_topic(UpdateTopic::Calendar));
        assert!(UpdateTopics::default().is_none());
    }
}
