use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Calendar, TimeConversion, TimeWindow, guess_period, limit_scroll_left, update_levels,
};
use crate::error::TimelineResult;

use super::{RecalculationReason, TimeConfig};

/// Min item start and max item end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemBounds {
    pub start: f64,
    pub end: f64,
}

impl ItemBounds {
    /// Bounds of all spans, or `None` for an empty input.
    #[must_use]
    pub fn from_spans(spans: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        spans.into_iter().fold(None, |bounds, (start, end)| {
            Some(match bounds {
                None => Self { start, end },
                Some(Self {
                    start: min,
                    end: max,
                }) => Self {
                    start: min.min(start),
                    end: max.max(end),
                },
            })
        })
    }
}

/// Immutable recompute input, captured by value from the engine state.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindowInput {
    pub time: TimeConfig,
    pub chart_width: f64,
    pub scroll_left: f64,
    pub round_scroll: bool,
    pub item_bounds: Option<ItemBounds>,
    pub reason: RecalculationReason,
}

/// Why a recompute left the previous window in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// A recompute was already running.
    Reentrant,
    /// Neither an explicit `from`/`to` nor any item bounds the timeline.
    NoBounds,
    /// Calculated zoom mode needs a measured chart width.
    AwaitingChartWidth,
    /// No tracked input changed.
    NotNeeded,
    /// Manual zoom mode without a zoom value.
    NoZoom,
    /// Content bounds collapse or invert.
    EmptyRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindowOutcome {
    pub window: TimeWindow,
    /// Horizontal scroll offset matching the new window.
    pub scroll_left: f64,
    /// Partial-period pixel offset of the first main-level cell.
    pub x_compensation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowCalculation {
    Ready(TimeWindowOutcome),
    Skipped(SkipReason),
}

/// Derives the authoritative time window from a [`TimeWindowInput`].
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowCalculator<'a> {
    calendar: &'a Calendar,
    time: &'a TimeConversion,
}

impl<'a> TimeWindowCalculator<'a> {
    #[must_use]
    pub fn new(calendar: &'a Calendar, time: &'a TimeConversion) -> Self {
        Self { calendar, time }
    }

    /// Computes the next window. `previous` is the last published window
    /// (the default window before the first recompute).
    ///
    /// A missing main calendar level is an error; every other unmet
    /// precondition is reported as [`WindowCalculation::Skipped`].
    pub fn calculate(
        &self,
        input: TimeWindowInput,
        previous: &TimeWindow,
    ) -> TimelineResult<WindowCalculation> {
        let TimeWindowInput {
            mut time,
            chart_width,
            scroll_left,
            round_scroll,
            item_bounds,
            reason,
        } = input;

        if (time.from.is_none() || time.to.is_none()) && item_bounds.is_none() {
            return Ok(WindowCalculation::Skipped(SkipReason::NoBounds));
        }
        let (_, main_level) = self.calendar.main_level()?;

        let mut window = TimeWindow {
            period: previous.period,
            period_size: previous.period_size,
            round_multiplier: previous.round_multiplier,
            left_global: time.left_global,
            center_global: time.center_global,
            right_global: time.right_global,
            ..TimeWindow::default()
        };

        if !time.calculated_zoom_mode {
            if time.period != previous.period {
                if let Some(format) = main_level.default_format_for(time.period) {
                    debug!(period = %time.period, zoom = format.zoom_to, "adopting default zoom for period");
                    time.zoom = Some(format.zoom_to);
                }
            }
            guess_period(&mut window, time.zoom, self.calendar);
        }

        let just_apply = reason.is_authoritative();
        let mut scroll_left = scroll_left;
        let mut snapped = false;

        if time.calculated_zoom_mode {
            if chart_width <= 0.0 {
                return Ok(WindowCalculation::Skipped(SkipReason::AwaitingChartWidth));
            }
            let Some((from, to)) = self.content_bounds(&time, item_bounds, &window) else {
                return Ok(WindowCalculation::Skipped(SkipReason::NoBounds));
            };
            let span = to - from;
            if span <= 0.0 {
                return Ok(WindowCalculation::Skipped(SkipReason::EmptyRange));
            }
            window.from = from;
            window.to = to;
            window.final_from = from;
            window.final_to = to;
            window.time_per_pixel = span / chart_width;
            let zoom = window.time_per_pixel.log2();
            window.zoom = zoom;
            guess_period(&mut window, Some(zoom), self.calendar);
            window.total_view_duration_ms = span;
            window.total_view_duration_px = (span / window.time_per_pixel).round();
            window.left_global = from;
            window.right_global = to;
            scroll_left = 0.0;
        } else {
            let Some(zoom) = time.zoom else {
                return Ok(WindowCalculation::Skipped(SkipReason::NoZoom));
            };
            window.zoom = zoom;
            window.time_per_pixel = zoom.exp2();
            if !(window.time_per_pixel > 0.0 && window.time_per_pixel.is_finite()) {
                return Ok(WindowCalculation::Skipped(SkipReason::NoZoom));
            }
            let Some((from, to)) = self.content_bounds(&time, item_bounds, &window) else {
                return Ok(WindowCalculation::Skipped(SkipReason::NoBounds));
            };
            window.from = from;
            window.to = to;
            self.apply_additional_space(&time, &mut window);
            if window.final_to < window.final_from {
                return Ok(WindowCalculation::Skipped(SkipReason::EmptyRange));
            }
            window.total_view_duration_ms = window.final_to - window.final_from;
            window.total_view_duration_px =
                (window.total_view_duration_ms / window.time_per_pixel).round();

            let chart_width_ms = chart_width * window.time_per_pixel;
            if just_apply {
                scroll_left = limit_scroll_left(
                    window.total_view_duration_px,
                    chart_width,
                    (window.left_global - window.final_from) / window.time_per_pixel,
                );
            } else if window.zoom != previous.zoom && previous.center_global != 0.0 {
                // Zoom or period changed: keep the previous center in place.
                window.left_global = previous.center_global - (chart_width_ms / 2.0).round();
                window.right_global = window.left_global + chart_width_ms;
                scroll_left = limit_scroll_left(
                    window.total_view_duration_px,
                    chart_width,
                    (window.left_global - window.final_from) / window.time_per_pixel,
                );
            } else {
                scroll_left =
                    limit_scroll_left(window.total_view_duration_px, chart_width, scroll_left);
                let left = scroll_left * window.time_per_pixel + window.final_from;
                window.left_global = if round_scroll && window.round_multiplier > 0.0 {
                    snapped = true;
                    (left / window.round_multiplier).round() * window.round_multiplier
                } else {
                    left
                };
                window.right_global = window.left_global + chart_width_ms;
            }
        }

        limit_global_and_set_center(&mut window);
        if snapped {
            // Published scroll must match the snapped left edge.
            scroll_left = limit_scroll_left(
                window.total_view_duration_px,
                chart_width,
                (window.left_global - window.final_from) / window.time_per_pixel,
            );
        }

        window.left_inner = window.left_global - window.final_from;
        window.right_inner = window.right_global - window.final_from;
        window.left_px = window.left_inner / window.time_per_pixel;
        window.right_px = window.right_inner / window.time_per_pixel;

        update_levels(&mut window, self.calendar, self.time)?;
        let x_compensation = window.x_compensation();

        debug!(
            reason = reason.name(),
            period = %window.period,
            zoom = window.zoom,
            left_global = window.left_global,
            right_global = window.right_global,
            scroll_left,
            "time window recomputed"
        );
        Ok(WindowCalculation::Ready(TimeWindowOutcome {
            window,
            scroll_left,
            x_compensation,
        }))
    }

    /// Explicit `from`/`to`, with unset ends derived from item bounds snapped
    /// to the active period.
    fn content_bounds(
        &self,
        time: &TimeConfig,
        item_bounds: Option<ItemBounds>,
        window: &TimeWindow,
    ) -> Option<(f64, f64)> {
        let from = match time.from {
            Some(from) => from,
            None => self
                .time
                .at(item_bounds?.start)
                .start_of(window.period)
                .value_of(),
        };
        let to = match time.to {
            Some(to) => to,
            None => self.time.at(item_bounds?.end).end_of(window.period).value_of(),
        };
        Some((from, to))
    }

    fn apply_additional_space(&self, time: &TimeConfig, window: &mut TimeWindow) {
        window.final_from = window.from;
        window.final_to = window.to;
        let Some(space) = time.additional_spaces.get(&window.period) else {
            return;
        };
        if space.before > 0 {
            window.final_from = self
                .time
                .at(window.from)
                .subtract(i64::from(space.before), space.period)
                .value_of();
        }
        if space.after > 0 {
            window.final_to = self
                .time
                .at(window.to)
                .add(i64::from(space.after), space.period)
                .value_of();
        }
    }
}

/// Clamps the visible range into the content range and re-derives the center.
fn limit_global_and_set_center(window: &mut TimeWindow) {
    window.left_global = window.left_global.clamp(window.final_from, window.final_to);
    window.right_global = window.right_global.clamp(window.left_global, window.final_to);
    let half = ((window.right_global - window.left_global) / 2.0).round();
    window.center_global = (window.left_global + half).min(window.right_global);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::core::period::{DAY_MS, HOUR_MS};
    use crate::core::{AdditionalSpaces, CalendarFormat, CalendarLevel, Locale, Period};

    fn utc() -> TimeConversion {
        TimeConversion::new(Locale::default(), true)
    }

    fn input(time: TimeConfig, chart_width: f64) -> TimeWindowInput {
        TimeWindowInput {
            time,
            chart_width,
            scroll_left: 0.0,
            round_scroll: false,
            item_bounds: None,
            reason: RecalculationReason::All,
        }
    }

    fn ready(calculation: WindowCalculation) -> TimeWindowOutcome {
        match calculation {
            WindowCalculation::Ready(outcome) => outcome,
            WindowCalculation::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
        }
    }

    #[test]
    fn calculated_mode_fits_one_day_into_chart_width() {
        let calendar = Calendar::new(vec![CalendarLevel::main(vec![CalendarFormat::new(
            30.0,
            Period::Day,
        )])]);
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(DAY_MS),
            calculated_zoom_mode: true,
            ..TimeConfig::default()
        };
        let outcome = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(input(config, 1_000.0), &TimeWindow::default())
                .expect("calculate"),
        );
        let window = outcome.window;
        assert_relative_eq!(window.time_per_pixel, 86_400.0);
        assert_relative_eq!(window.zoom, 86_400f64.log2());
        assert_eq!(window.left_global, 0.0);
        assert_eq!(window.right_global, DAY_MS);
        assert_eq!(window.period, Period::Day);
        assert_eq!(window.main_cells().len(), 1);
        assert_relative_eq!(window.main_cells()[0].width, 1_000.0);
        assert_eq!(outcome.x_compensation, 0.0);
    }

    #[test]
    fn missing_bounds_skip_without_error() {
        let calendar = Calendar::default();
        let time = utc();
        let calculation = TimeWindowCalculator::new(&calendar, &time)
            .calculate(input(TimeConfig::default(), 500.0), &TimeWindow::default())
            .expect("calculate");
        assert_eq!(calculation, WindowCalculation::Skipped(SkipReason::NoBounds));
    }

    #[test]
    fn calculated_mode_waits_for_width() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(DAY_MS),
            calculated_zoom_mode: true,
            ..TimeConfig::default()
        };
        let calculation = TimeWindowCalculator::new(&calendar, &time)
            .calculate(input(config, 0.0), &TimeWindow::default())
            .expect("calculate");
        assert_eq!(
            calculation,
            WindowCalculation::Skipped(SkipReason::AwaitingChartWidth)
        );
    }

    #[test]
    fn missing_main_level_is_an_error() {
        let calendar = Calendar::new(Vec::new());
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(DAY_MS),
            ..TimeConfig::default()
        };
        assert!(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(input(config, 100.0), &TimeWindow::default())
                .is_err()
        );
    }

    #[test]
    fn manual_mode_derives_window_from_scroll_and_clamps() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(10.0 * DAY_MS),
            zoom: Some(16.0),
            additional_spaces: AdditionalSpaces::new(),
            ..TimeConfig::default()
        };
        let mut request = input(config, 500.0);
        request.scroll_left = 1e9;
        let outcome = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(request, &TimeWindow::default())
                .expect("calculate"),
        );
        let window = outcome.window;
        assert_eq!(window.period, Period::Hour);
        assert_relative_eq!(window.time_per_pixel, 65_536.0);
        assert!(window.is_ordered());
        assert_eq!(window.right_global, 10.0 * DAY_MS);
        assert_relative_eq!(
            outcome.scroll_left,
            window.total_view_duration_px - 500.0
        );
    }

    #[test]
    fn round_scroll_snaps_left_edge_to_period() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(10.0 * DAY_MS),
            zoom: Some(16.0),
            additional_spaces: AdditionalSpaces::new(),
            ..TimeConfig::default()
        };
        let mut request = input(config, 200.0);
        request.round_scroll = true;
        request.scroll_left = 100.0;
        let outcome = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(request, &TimeWindow::default())
                .expect("calculate"),
        );
        let left = outcome.window.left_global;
        assert_eq!(left, 2.0 * HOUR_MS);
        assert_eq!(outcome.window.main_cells()[0].sub, 0.0);
        assert_relative_eq!(outcome.scroll_left, 2.0 * HOUR_MS / 65_536.0);
    }

    #[test]
    fn item_bounds_are_snapped_and_padded() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            zoom: Some(20.0),
            ..TimeConfig::default()
        };
        let mut request = input(config, 300.0);
        request.item_bounds = Some(ItemBounds {
            start: 3.0 * DAY_MS + 5.0 * HOUR_MS,
            end: 5.0 * DAY_MS + HOUR_MS,
        });
        let window = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(request, &TimeWindow::default())
                .expect("calculate"),
        )
        .window;
        assert_eq!(window.period, Period::Day);
        assert_eq!(window.from, 3.0 * DAY_MS);
        assert_eq!(window.to, 6.0 * DAY_MS - 1.0);
        // Day additional space pads by one month on each side.
        assert!(window.final_from < window.from);
        assert!(window.final_to > window.to);
        assert!(window.is_ordered());
    }

    #[test]
    fn zoom_change_keeps_previous_center() {
        let calendar = Calendar::default();
        let time = utc();
        let previous = TimeWindow {
            zoom: 20.0,
            period: Period::Day,
            center_global: 50.0 * DAY_MS,
            ..TimeWindow::default()
        };
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(100.0 * DAY_MS),
            zoom: Some(19.0),
            ..TimeConfig::default()
        };
        let mut request = input(config, 400.0);
        request.reason = RecalculationReason::Zoom {
            old: Some(20.0),
            new: Some(19.0),
        };
        let window = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(request, &previous)
                .expect("calculate"),
        )
        .window;
        assert_relative_eq!(window.center_global, 50.0 * DAY_MS, epsilon = 1.0);
    }

    #[test]
    fn authoritative_range_is_applied_verbatim() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(100.0 * DAY_MS),
            zoom: Some(20.0),
            left_global: 10.0 * DAY_MS,
            right_global: 12.0 * DAY_MS,
            additional_spaces: AdditionalSpaces::new(),
            ..TimeConfig::default()
        };
        let mut request = input(config, 400.0);
        request.reason = RecalculationReason::LeftGlobal {
            old: 0.0,
            new: 10.0 * DAY_MS,
        };
        let outcome = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(request, &TimeWindow::default())
                .expect("calculate"),
        );
        assert_eq!(outcome.window.left_global, 10.0 * DAY_MS);
        assert_eq!(outcome.window.right_global, 12.0 * DAY_MS);
        assert_eq!(outcome.window.center_global, 11.0 * DAY_MS);
        assert_relative_eq!(outcome.scroll_left, 10.0 * DAY_MS / 2f64.powi(20));
    }

    #[test]
    fn period_switch_adopts_default_format_zoom() {
        let calendar = Calendar::default();
        let time = utc();
        let config = TimeConfig {
            from: Some(0.0),
            to: Some(400.0 * DAY_MS),
            period: Period::Month,
            zoom: Some(16.0),
            ..TimeConfig::default()
        };
        let window = ready(
            TimeWindowCalculator::new(&calendar, &time)
                .calculate(input(config, 600.0), &TimeWindow::default())
                .expect("calculate"),
        )
        .window;
        assert_eq!(window.period, Period::Month);
        assert_eq!(window.zoom, 25.0);
    }
}
