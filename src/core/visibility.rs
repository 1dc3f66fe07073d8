use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::tree::{Item, RowId, RowTree};

/// A row id with its rendered height, in flattened display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowExtent {
    pub id: RowId,
    pub height: f64,
}

/// A row of the rendered slice. `top` is relative to the first visible row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleRow {
    pub id: RowId,
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibleRows {
    /// Index range into the input row list.
    pub range: Range<usize>,
    pub rows: Vec<VisibleRow>,
    /// How far the first visible row's top sits above the viewport top.
    pub compensation: f64,
    /// Scroll offset actually used, after clamping to the content height.
    pub scroll_top: f64,
}

/// Sum of all row heights.
#[must_use]
pub fn rows_height(rows: &[RowExtent]) -> f64 {
    rows.iter().map(|row| row.height.max(0.0)).sum()
}

/// Clamps a vertical scroll offset into `[0, total - viewport]`.
#[must_use]
pub fn limit_scroll_top(total_height: f64, viewport_height: f64, scroll_top: f64) -> f64 {
    if scroll_top.is_nan() {
        return 0.0;
    }
    scroll_top.clamp(0.0, (total_height - viewport_height).max(0.0))
}

/// Locates the contiguous slice of rows intersecting the viewport.
///
/// Row offsets are prefix sums searched with binary search, so the cost is
/// linear in rows only for the prefix pass.
#[must_use]
pub fn visible_rows_and_compensation(
    rows: &[RowExtent],
    scroll_top: f64,
    viewport_height: f64,
) -> VisibleRows {
    let mut offsets = Vec::with_capacity(rows.len() + 1);
    let mut total = 0.0;
    offsets.push(total);
    for row in rows {
        total += row.height.max(0.0);
        offsets.push(total);
    }
    let viewport_height = viewport_height.max(0.0);
    let scroll_top = limit_scroll_top(total, viewport_height, scroll_top);
    let view_bottom = scroll_top + viewport_height;

    // First row whose bottom edge lies below the viewport top.
    let first = offsets[1..].partition_point(|bottom| *bottom <= scroll_top);
    // Rows starting above the viewport bottom.
    let end = offsets[..rows.len()]
        .partition_point(|top| *top < view_bottom)
        .max(first);
    if first >= rows.len() || first == end {
        return VisibleRows {
            range: first..first,
            rows: Vec::new(),
            compensation: 0.0,
            scroll_top,
        };
    }

    let first_top = offsets[first];
    let visible = rows[first..end]
        .iter()
        .zip(&offsets[first..end])
        .map(|(row, offset)| VisibleRow {
            id: row.id.clone(),
            top: offset - first_top,
            height: row.height.max(0.0),
        })
        .collect();
    VisibleRows {
        range: first..end,
        rows: visible,
        compensation: scroll_top - first_top,
        scroll_top,
    }
}

/// Items owned by the visible rows, in row order.
#[must_use]
pub fn visible_items<'a>(tree: &'a RowTree, rows: &[VisibleRow]) -> Vec<&'a Item> {
    rows.iter()
        .filter_map(|row| tree.get(&row.id))
        .flat_map(|node| node.items.iter())
        .collect()
}

/// Holds the published visible-row list and only republishes it when the
/// row id sequence changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibleRowsState {
    rows: Vec<VisibleRow>,
    generation: u64,
}

impl VisibleRowsState {
    /// Stores `rows` and returns `true` when the id sequence differs from the
    /// published one. Geometry of an unchanged sequence is refreshed in place
    /// without bumping the generation.
    pub fn publish(&mut self, rows: Vec<VisibleRow>) -> bool {
        let changed = rows.len() != self.rows.len()
            || rows
                .iter()
                .zip(&self.rows)
                .any(|(next, current)| next.id != current.id);
        if changed {
            self.generation += 1;
            trace!(
                rows = rows.len(),
                generation = self.generation,
                "publishing visible rows"
            );
        }
        self.rows = rows;
        changed
    }

    #[must_use]
    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    /// Incremented on every published id change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extents(heights: &[f64]) -> Vec<RowExtent> {
        heights
            .iter()
            .enumerate()
            .map(|(index, height)| RowExtent {
                id: format!("r{index}"),
                height: *height,
            })
            .collect()
    }

    fn ids(visible: &VisibleRows) -> Vec<&str> {
        visible.rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn slice_starts_at_partially_scrolled_row() {
        let rows = extents(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let visible = visible_rows_and_compensation(&rows, 15.0, 40.0);
        assert_eq!(ids(&visible), ["r1", "r2"]);
        assert_eq!(visible.compensation, 5.0);
        assert_eq!(visible.rows[1].top, 20.0);
    }

    #[test]
    fn row_ending_at_viewport_top_is_not_visible() {
        let rows = extents(&[10.0, 10.0, 10.0]);
        let visible = visible_rows_and_compensation(&rows, 10.0, 10.0);
        assert_eq!(ids(&visible), ["r1"]);
        assert_eq!(visible.compensation, 0.0);
    }

    #[test]
    fn scroll_beyond_content_is_clamped() {
        let rows = extents(&[10.0, 10.0, 10.0]);
        let visible = visible_rows_and_compensation(&rows, 500.0, 15.0);
        assert_eq!(visible.scroll_top, 15.0);
        assert_eq!(ids(&visible), ["r1", "r2"]);
        assert_eq!(visible.compensation, 5.0);
    }

    #[test]
    fn short_content_is_fully_visible() {
        let rows = extents(&[10.0, 10.0]);
        let visible = visible_rows_and_compensation(&rows, 0.0, 100.0);
        assert_eq!(visible.range, 0..2);
        assert_eq!(rows_height(&rows), 20.0);
    }

    #[test]
    fn empty_input_yields_empty_slice() {
        let visible = visible_rows_and_compensation(&[], 0.0, 100.0);
        assert!(visible.rows.is_empty());
    }

    #[test]
    fn publish_only_reports_id_changes() {
        let mut state = VisibleRowsState::default();
        let first = visible_rows_and_compensation(&extents(&[10.0, 10.0]), 0.0, 20.0);
        assert!(state.publish(first.rows.clone()));
        assert!(!state.publish(first.rows));
        assert_eq!(state.generation(), 1);
        let taller = visible_rows_and_compensation(&extents(&[30.0, 10.0]), 0.0, 20.0);
        assert!(state.publish(taller.rows));
        assert_eq!(state.rows().len(), 1);
    }
}
