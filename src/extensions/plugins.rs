use serde::{Deserialize, Serialize};

use crate::core::{Period, ScrollCompensation, Viewport};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub viewport: Viewport,
    pub period: Period,
    pub zoom: f64,
    pub visible_time_range: (f64, f64),
    pub rows_len: usize,
    pub items_len: usize,
    pub visible_rows_len: usize,
    pub compensation: ScrollCompensation,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TimelineEvent {
    TimeWindowRecomputed {
        reason: &'static str,
        left_global: f64,
        right_global: f64,
        zoom: f64,
    },
    TreeRebuilt {
        rows_len: usize,
        dropped_items: usize,
    },
    VisibleRowsChanged {
        first: usize,
        len: usize,
    },
    Rendered,
    /// First stable paint; dispatched once per engine lifetime.
    Loaded,
}

/// Observer hook for timeline state changes.
///
/// Plugins read engine context without mutating engine internals.
pub trait TimelinePlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: TimelineEvent, context: PluginContext);
}
