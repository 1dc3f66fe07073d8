use crate::core::{
    Item, Items, RowExtent, RowTree, Rows, ScrollCompensation, TimeConversion,
    TimeWindow, Viewport, VisibleRow, cell_label,
};
use crate::error::TimelineResult;
use crate::render::Renderer;

use super::{RecomputeLatch, TimelineConfig, TimelineEngine};

impl<R: Renderer> TimelineEngine<R> {
    /// Current configuration, including the values written back by the last
    /// recompute (zoom, period, visible range, scroll left).
    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.core.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.config.viewport
    }

    #[must_use]
    pub fn time_window(&self) -> &TimeWindow {
        &self.core.window
    }

    /// Whether a recompute has produced a window yet.
    #[must_use]
    pub fn has_time_window(&self) -> bool {
        self.core.window_ready
    }

    #[must_use]
    pub fn time_conversion(&self) -> &TimeConversion {
        &self.core.time
    }

    #[must_use]
    pub fn rows(&self) -> &Rows {
        &self.core.rows
    }

    #[must_use]
    pub fn items(&self) -> &Items {
        &self.core.items
    }

    #[must_use]
    pub fn tree(&self) -> &RowTree {
        &self.core.tree
    }

    /// Pre-order rows whose ancestors are all expanded, with resolved heights.
    #[must_use]
    pub fn rows_with_parents_expanded(&self) -> &[RowExtent] {
        &self.core.rows_with_parents_expanded
    }

    #[must_use]
    pub fn rows_height(&self) -> f64 {
        self.core.rows_height
    }

    #[must_use]
    pub fn visible_rows(&self) -> &[VisibleRow] {
        self.core.visible_rows.rows()
    }

    /// Incremented each time the visible row id sequence changes.
    #[must_use]
    pub fn visible_rows_generation(&self) -> u64 {
        self.core.visible_rows.generation()
    }

    #[must_use]
    pub fn visible_items(&self) -> &[Item] {
        &self.core.visible_items
    }

    #[must_use]
    pub fn compensation(&self) -> ScrollCompensation {
        self.core.compensation
    }

    #[must_use]
    pub fn recompute_latch(&self) -> RecomputeLatch {
        self.core.latch
    }

    /// Converts a duration into a pixel length at the current zoom.
    #[must_use]
    pub fn time_to_pixel_offset(&self, duration_ms: f64) -> f64 {
        self.core.window.time_to_pixel_offset(duration_ms)
    }

    /// Pixel offset of `timestamp` from the view's left edge, optionally with
    /// the header alignment compensation applied.
    #[must_use]
    pub fn global_time_to_view_pixel_offset(&self, timestamp: f64, with_compensation: bool) -> f64 {
        let compensation = with_compensation.then_some(self.core.compensation.x);
        self.core
            .window
            .global_time_to_view_pixel_offset(timestamp, compensation)
    }

    /// Labels of the cells of calendar level `level`; cells whose format has
    /// no label pattern yield `None`.
    pub fn level_labels(&self, level: usize) -> TimelineResult<Vec<Option<String>>> {
        let window = &self.core.window;
        let (Some(cells), Some(format)) = (
            window.levels.get(level),
            self.core
                .config
                .calendar
                .levels
                .get(level)
                .and_then(|calendar_level| calendar_level.format_for_zoom(window.zoom)),
        ) else {
            return Ok(Vec::new());
        };
        cells
            .iter()
            .map(|cell| cell_label(&self.core.time, cell, format))
            .collect()
    }
}
