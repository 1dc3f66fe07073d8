use serde::{Deserialize, Serialize};

use crate::core::{Period, RowId, ScrollCompensation, Viewport};
use crate::render::Renderer;

use super::TimelineEngine;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub period: Period,
    pub period_size: u32,
    pub zoom: f64,
    pub time_per_pixel: f64,
    pub content_range: (f64, f64),
    pub visible_range: (f64, f64),
    pub center_global: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// Cell count per calendar level.
    pub level_cells: Vec<usize>,
    pub flat_rows: Vec<RowId>,
    pub visible_rows: Vec<RowId>,
    pub visible_items: usize,
    pub rows_height: f64,
    pub compensation: ScrollCompensation,
}

impl<R: Renderer> TimelineEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let core = &self.core;
        let window = &core.window;
        EngineSnapshot {
            viewport: core.config.viewport,
            period: window.period,
            period_size: window.period_size,
            zoom: window.zoom,
            time_per_pixel: window.time_per_pixel,
            content_range: (window.final_from, window.final_to),
            visible_range: (window.left_global, window.right_global),
            center_global: window.center_global,
            scroll_left: core.config.scroll.left,
            scroll_top: core.config.scroll.top,
            level_cells: window.levels.iter().map(Vec::len).collect(),
            flat_rows: core.tree.flat().to_vec(),
            visible_rows: core
                .visible_rows
                .rows()
                .iter()
                .map(|row| row.id.clone())
                .collect(),
            visible_items: core.visible_items.len(),
            rows_height: core.rows_height,
            compensation: core.compensation,
        }
    }
}
