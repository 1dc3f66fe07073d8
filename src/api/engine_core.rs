use crate::core::{
    Item, Items, RowExtent, RowTree, Rows, ScrollCompensation, TimeConversion, TimeWindow,
    VisibleRowsState,
};
use crate::extensions::TimelinePlugin;

use super::{RecalculationTrigger, RecomputeLatch, TimelineConfig};

/// Delivery state of the one-shot `Loaded` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum LoadedEventState {
    #[default]
    Pending,
    Scheduled,
    Dispatched,
}

/// Internal engine state used by the public facade (`TimelineEngine`).
pub(super) struct EngineCore {
    /// Caller inputs plus the derived values written back after a recompute.
    pub(super) config: TimelineConfig,
    pub(super) time: TimeConversion,
    pub(super) rows: Rows,
    pub(super) items: Items,
    pub(super) tree: RowTree,
    pub(super) rows_with_parents_expanded: Vec<RowExtent>,
    pub(super) rows_height: f64,
    pub(super) visible_rows: VisibleRowsState,
    pub(super) visible_items: Vec<Item>,
    pub(super) window: TimeWindow,
    pub(super) window_ready: bool,
    pub(super) compensation: ScrollCompensation,
    pub(super) trigger: RecalculationTrigger,
    pub(super) latch: RecomputeLatch,
    pub(super) loaded: LoadedEventState,
    pub(super) plugins: Vec<Box<dyn TimelinePlugin>>,
}

impl EngineCore {
    pub(super) fn new(config: TimelineConfig) -> Self {
        let time = TimeConversion::new(config.locale.clone(), config.utc_mode);
        Self {
            config,
            time,
            rows: Rows::new(),
            items: Items::new(),
            tree: RowTree::default(),
            rows_with_parents_expanded: Vec::new(),
            rows_height: 0.0,
            visible_rows: VisibleRowsState::default(),
            visible_items: Vec::new(),
            window: TimeWindow::default(),
            window_ready: false,
            compensation: ScrollCompensation::default(),
            trigger: RecalculationTrigger::default(),
            latch: RecomputeLatch::default(),
            loaded: LoadedEventState::default(),
            plugins: Vec::new(),
        }
    }
}
