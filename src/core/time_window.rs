use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::calendar::CalendarFormat;
use crate::core::period::Period;

/// One header cell of a calendar level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateCell {
    pub period: Period,
    pub left_global: f64,
    /// Exclusive right bound, always on a period boundary.
    pub right_global: f64,
    pub left_px: f64,
    pub right_px: f64,
    pub width: f64,
    /// Time between the cell's period boundary and `left_global`.
    pub sub: f64,
    pub sub_px: f64,
}

/// Cells per calendar level, in level declaration order.
pub type LevelCells = SmallVec<[Vec<DateCell>; 3]>;

/// Authoritative horizontal window of the timeline.
///
/// All times are milliseconds since epoch; `final_from <= left_global <=
/// center_global <= right_global <= final_to` holds after every recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub period: Period,
    pub period_size: u32,
    pub round_multiplier: f64,
    pub from: f64,
    pub to: f64,
    pub final_from: f64,
    pub final_to: f64,
    pub left_global: f64,
    pub center_global: f64,
    pub right_global: f64,
    pub left_inner: f64,
    pub right_inner: f64,
    pub left_px: f64,
    pub right_px: f64,
    pub time_per_pixel: f64,
    pub zoom: f64,
    pub total_view_duration_ms: f64,
    pub total_view_duration_px: f64,
    /// Main level format active for the current zoom.
    pub format: Option<CalendarFormat>,
    /// Index of the main calendar level.
    pub level: usize,
    /// Cell lists for levels that have a format at the current zoom.
    pub levels: LevelCells,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            period: Period::Day,
            period_size: 1,
            round_multiplier: Period::Day.nominal_ms(),
            from: 0.0,
            to: 0.0,
            final_from: 0.0,
            final_to: 0.0,
            left_global: 0.0,
            center_global: 0.0,
            right_global: 0.0,
            left_inner: 0.0,
            right_inner: 0.0,
            left_px: 0.0,
            right_px: 0.0,
            time_per_pixel: 1.0,
            zoom: 0.0,
            total_view_duration_ms: 0.0,
            total_view_duration_px: 0.0,
            format: None,
            level: 0,
            levels: LevelCells::new(),
        }
    }
}

impl TimeWindow {
    /// Converts a duration into a pixel length.
    #[must_use]
    pub fn time_to_pixel_offset(&self, duration_ms: f64) -> f64 {
        duration_ms / self.safe_time_per_pixel()
    }

    /// Pixel offset of an absolute timestamp from the left edge of the view.
    ///
    /// `compensation_x` is added when the caller renders with the header
    /// alignment compensation applied.
    #[must_use]
    pub fn global_time_to_view_pixel_offset(&self, timestamp: f64, compensation_x: Option<f64>) -> f64 {
        let offset = (timestamp - self.left_global) / self.safe_time_per_pixel();
        offset + compensation_x.unwrap_or(0.0)
    }

    /// Cells of the main calendar level.
    #[must_use]
    pub fn main_cells(&self) -> &[DateCell] {
        self.levels.get(self.level).map_or(&[], Vec::as_slice)
    }

    /// Sub-period pixel offset of the first main-level cell.
    #[must_use]
    pub fn x_compensation(&self) -> f64 {
        self.main_cells().first().map_or(0.0, |cell| cell.sub_px)
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.final_from <= self.left_global
            && self.left_global <= self.center_global
            && self.center_global <= self.right_global
            && self.right_global <= self.final_to
            && self.time_per_pixel > 0.0
    }

    fn safe_time_per_pixel(&self) -> f64 {
        if self.time_per_pixel > 0.0 && self.time_per_pixel.is_finite() {
            self.time_per_pixel
        } else {
            1.0
        }
    }
}

/// Clamps a horizontal scroll offset into the scrollable content range.
#[must_use]
pub fn limit_scroll_left(total_width_px: f64, chart_width_px: f64, scroll_left: f64) -> f64 {
    let max = (total_width_px - chart_width_px).max(0.0);
    if scroll_left.is_nan() {
        return 0.0;
    }
    scroll_left.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_pixel_offset_is_zero_at_left_edge() {
        let window = TimeWindow {
            left_global: 1_000.0,
            right_global: 11_000.0,
            time_per_pixel: 10.0,
            ..TimeWindow::default()
        };
        assert_eq!(window.global_time_to_view_pixel_offset(1_000.0, None), 0.0);
        assert_eq!(window.global_time_to_view_pixel_offset(11_000.0, None), 1_000.0);
        assert_eq!(
            window.global_time_to_view_pixel_offset(1_000.0, Some(-4.0)),
            -4.0
        );
        assert_eq!(window.time_to_pixel_offset(500.0), 50.0);
    }

    #[test]
    fn scroll_left_is_limited_to_content() {
        assert_eq!(limit_scroll_left(2_000.0, 500.0, 1_800.0), 1_500.0);
        assert_eq!(limit_scroll_left(2_000.0, 500.0, -3.0), 0.0);
        assert_eq!(limit_scroll_left(300.0, 500.0, 10.0), 0.0);
    }
}
