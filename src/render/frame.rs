use serde::{Deserialize, Serialize};

use crate::core::{Item, ItemId, RowId, ScrollCompensation, TimeWindow, Viewport, VisibleRow};
use crate::error::{TimelineError, TimelineResult};

/// Horizontal placement of a visible item, in view pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBox {
    pub id: ItemId,
    pub row_id: RowId,
    pub left_px: f64,
    pub width_px: f64,
}

impl ItemBox {
    pub fn validate(&self) -> TimelineResult<()> {
        if !self.left_px.is_finite() || !self.width_px.is_finite() || self.width_px < 0.0 {
            return Err(TimelineError::InvalidData(format!(
                "item `{}` has invalid geometry",
                self.id
            )));
        }
        Ok(())
    }
}

/// Plain data one timeline draw pass consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub time_window: TimeWindow,
    pub visible_rows: Vec<VisibleRow>,
    pub visible_items: Vec<Item>,
    pub item_boxes: Vec<ItemBox>,
    pub compensation: ScrollCompensation,
    pub rows_height: f64,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, time_window: TimeWindow) -> Self {
        Self {
            viewport,
            time_window,
            visible_rows: Vec::new(),
            visible_items: Vec::new(),
            item_boxes: Vec::new(),
            compensation: ScrollCompensation::default(),
            rows_height: 0.0,
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows: Vec<VisibleRow>, rows_height: f64) -> Self {
        self.visible_rows = rows;
        self.rows_height = rows_height;
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<Item>, boxes: Vec<ItemBox>) -> Self {
        self.visible_items = items;
        self.item_boxes = boxes;
        self
    }

    #[must_use]
    pub fn with_compensation(mut self, compensation: ScrollCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if !self.viewport.is_valid() {
            return Err(TimelineError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.time_window.is_ordered() {
            return Err(TimelineError::InvalidData(
                "time window bounds are out of order".to_owned(),
            ));
        }
        for level in &self.time_window.levels {
            for pair in level.windows(2) {
                if pair[0].right_px != pair[1].left_px {
                    return Err(TimelineError::InvalidData(
                        "calendar cells must tile without gaps".to_owned(),
                    ));
                }
            }
        }
        for item in &self.item_boxes {
            item.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty() && self.time_window.levels.iter().all(Vec::is_empty)
    }
}
