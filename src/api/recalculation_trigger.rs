use serde::{Deserialize, Serialize};

use crate::core::Period;

use super::TimeConfig;

/// Why the time window is being recomputed.
///
/// Field variants carry the previous and current value of the first field the
/// trigger found changed. `Items`, `Calendar` and `Options` are raised by the
/// engine directly for inputs the trigger does not track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RecalculationReason {
    All,
    Zoom { old: Option<f64>, new: Option<f64> },
    Period { old: Period, new: Period },
    LeftGlobal { old: f64, new: f64 },
    CenterGlobal { old: f64, new: f64 },
    RightGlobal { old: f64, new: f64 },
    From { old: Option<f64>, new: Option<f64> },
    To { old: Option<f64>, new: Option<f64> },
    ScrollLeft { old: f64, new: f64 },
    ChartWidth { old: f64, new: f64 },
    Items,
    Calendar,
    Options,
}

impl RecalculationReason {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Zoom { .. } => "zoom",
            Self::Period { .. } => "period",
            Self::LeftGlobal { .. } => "leftGlobal",
            Self::CenterGlobal { .. } => "centerGlobal",
            Self::RightGlobal { .. } => "rightGlobal",
            Self::From { .. } => "from",
            Self::To { .. } => "to",
            Self::ScrollLeft { .. } => "scroll",
            Self::ChartWidth { .. } => "chartWidth",
            Self::Items => "items",
            Self::Calendar => "calendar",
            Self::Options => "options",
        }
    }

    /// The caller set the visible range or content range directly, so the
    /// window adopts it instead of deriving it from zoom and scroll.
    #[must_use]
    pub fn is_authoritative(self) -> bool {
        matches!(
            self,
            Self::LeftGlobal { .. }
                | Self::CenterGlobal { .. }
                | Self::RightGlobal { .. }
                | Self::From { .. }
                | Self::To { .. }
        )
    }
}

/// Values the trigger compares between checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerSnapshot {
    pub zoom: Option<f64>,
    pub period: Period,
    pub left_global: f64,
    pub center_global: f64,
    pub right_global: f64,
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub scroll_left: f64,
    pub chart_width: f64,
}

impl TriggerSnapshot {
    #[must_use]
    pub fn capture(time: &TimeConfig, scroll_left: f64, chart_width: f64) -> Self {
        Self {
            zoom: time.zoom,
            period: time.period,
            left_global: time.left_global,
            center_global: time.center_global,
            right_global: time.right_global,
            from: time.from,
            to: time.to,
            scroll_left,
            chart_width,
        }
    }

    /// First differing field in priority order.
    fn first_change_from(&self, old: &Self) -> Option<RecalculationReason> {
        if self.zoom != old.zoom {
            return Some(RecalculationReason::Zoom {
                old: old.zoom,
                new: self.zoom,
            });
        }
        if self.period != old.period {
            return Some(RecalculationReason::Period {
                old: old.period,
                new: self.period,
            });
        }
        if self.left_global != old.left_global {
            return Some(RecalculationReason::LeftGlobal {
                old: old.left_global,
                new: self.left_global,
            });
        }
        if self.center_global != old.center_global {
            return Some(RecalculationReason::CenterGlobal {
                old: old.center_global,
                new: self.center_global,
            });
        }
        if self.right_global != old.right_global {
            return Some(RecalculationReason::RightGlobal {
                old: old.right_global,
                new: self.right_global,
            });
        }
        if self.from != old.from {
            return Some(RecalculationReason::From {
                old: old.from,
                new: self.from,
            });
        }
        if self.to != old.to {
            return Some(RecalculationReason::To {
                old: old.to,
                new: self.to,
            });
        }
        if self.scroll_left != old.scroll_left {
            return Some(RecalculationReason::ScrollLeft {
                old: old.scroll_left,
                new: self.scroll_left,
            });
        }
        if self.chart_width != old.chart_width {
            return Some(RecalculationReason::ChartWidth {
                old: old.chart_width,
                new: self.chart_width,
            });
        }
        None
    }
}

/// Change detector for the time window inputs.
///
/// Every check stores the current values, so a change is reported once.
/// Only the first changed field is reported even when several changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalculationTrigger {
    last: Option<TriggerSnapshot>,
}

impl RecalculationTrigger {
    /// Returns `All` on the first check, the first changed field afterwards,
    /// or `None` when nothing changed.
    pub fn check(&mut self, current: TriggerSnapshot) -> Option<RecalculationReason> {
        match self.last.replace(current) {
            None => Some(RecalculationReason::All),
            Some(previous) => current.first_change_from(&previous),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.last.is_some()
    }

    #[must_use]
    pub fn last_snapshot(&self) -> Option<&TriggerSnapshot> {
        self.last.as_ref()
    }
}
