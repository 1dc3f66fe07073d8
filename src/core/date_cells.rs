use tracing::warn;

use crate::core::calendar::{Calendar, CalendarFormat};
use crate::core::period::Period;
use crate::core::time::{DateHandle, TimeConversion};
use crate::core::time_window::{DateCell, TimeWindow};
use crate::error::TimelineResult;

/// Upper bound on generated cells per level.
pub const MAX_CELLS_PER_LEVEL: usize = 20_000;

/// Builds the header cells of one calendar level for the window's visible range.
///
/// Pixel offsets are anchored on the period boundary at or before
/// `window.left_global`: the first cell starts at `left_px == 0` and is
/// `sub_px` wider than its visible part. Adding `x_compensation` to view
/// offsets puts item positions in the same coordinate space.
#[must_use]
pub fn generate_period_dates(
    period: Period,
    period_size: u32,
    window: &TimeWindow,
    time: &TimeConversion,
) -> Vec<DateCell> {
    let time_per_pixel = window.time_per_pixel;
    if !(time_per_pixel > 0.0 && time_per_pixel.is_finite()) {
        return Vec::new();
    }
    let size = i64::from(period_size.max(1));
    let left_global = window.left_global;
    let aligned = aligned_start(time, time.at(left_global), period, size);

    // Right bound is exclusive; the last covered instant decides the final period.
    let last_instant = if window.right_global > left_global {
        window.right_global - 1.0
    } else {
        window.right_global
    };
    let span = time
        .at(last_instant)
        .end_of(period.truncation_period())
        .diff(aligned, period, true);
    let mut count = (span / size as f64).ceil().max(1.0) as usize;
    if count > MAX_CELLS_PER_LEVEL {
        warn!(
            %period,
            period_size,
            requested = count,
            "calendar level cell count capped"
        );
        count = MAX_CELLS_PER_LEVEL;
    }

    let mut cells = Vec::with_capacity(count);
    let mut boundary = aligned;
    let mut cell_left = left_global.max(aligned.value_of());
    let mut sub = cell_left - aligned.value_of();
    let mut left_px = 0.0;
    for _ in 0..count {
        let next = boundary.add(size, period);
        let right_global = next.value_of();
        let width = (right_global - cell_left + sub) / time_per_pixel;
        cells.push(DateCell {
            period,
            left_global: cell_left,
            right_global,
            left_px,
            right_px: left_px + width,
            width,
            sub,
            sub_px: sub / time_per_pixel,
        });
        left_px += width;
        cell_left = right_global;
        sub = 0.0;
        boundary = next;
    }
    cells
}

/// Period boundary at or before `left` that cells of `period_size` periods start from.
fn aligned_start(time: &TimeConversion, left: DateHandle, period: Period, size: i64) -> DateHandle {
    let boundary = left.start_of(period.truncation_period());
    match period {
        // Minute cells step from the hour boundary.
        Period::Minute => {
            let step = size as f64 * period.nominal_ms();
            let elapsed = left.value_of() - boundary.value_of();
            time.at(boundary.value_of() + (elapsed / step).floor() * step)
        }
        Period::Hour | Period::Day => left.start_of_block(period, size),
        _ => boundary,
    }
}

/// Regenerates the cells of every calendar level and records the main format.
///
/// `window.levels` keeps one entry per calendar level so `window.level`
/// indexes it directly; levels without a format at the current zoom get an
/// empty cell list.
pub fn update_levels(window: &mut TimeWindow, calendar: &Calendar, time: &TimeConversion) -> TimelineResult<()> {
    let (main_index, _) = calendar.main_level()?;
    let zoom = window.zoom;
    let mut levels = std::mem::take(&mut window.levels);
    levels.clear();
    for (index, level) in calendar.levels.iter().enumerate() {
        let format = level.format_for_zoom(zoom);
        if index == main_index {
            window.format = format.cloned();
            window.level = index;
        }
        let cells = format.map_or_else(Vec::new, |format| {
            generate_period_dates(format.period, format.effective_period_size(), window, time)
        });
        levels.push(cells);
    }
    window.levels = levels;
    Ok(())
}

/// Label for a cell using the format's `strftime` pattern, if it has one.
pub fn cell_label(
    time: &TimeConversion,
    cell: &DateCell,
    format: &CalendarFormat,
) -> TimelineResult<Option<String>> {
    format
        .label
        .as_deref()
        .map(|pattern| time.at(cell.left_global - cell.sub).format(pattern))
        .transpose()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{Local, NaiveTime, TimeZone, Timelike};

    use super::*;
    use crate::core::calendar::CalendarLevel;
    use crate::core::period::{DAY_MS, HOUR_MS, MINUTE_MS};
    use crate::core::time::Locale;

    fn utc() -> TimeConversion {
        TimeConversion::new(Locale::default(), true)
    }

    fn window(left: f64, right: f64, time_per_pixel: f64) -> TimeWindow {
        TimeWindow {
            left_global: left,
            right_global: right,
            time_per_pixel,
            ..TimeWindow::default()
        }
    }

    #[test]
    fn single_day_produces_one_cell() {
        let cells = generate_period_dates(Period::Day, 1, &window(0.0, DAY_MS, 86_400.0), &utc());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].left_global, 0.0);
        assert_eq!(cells[0].right_global, DAY_MS);
        assert_relative_eq!(cells[0].width, 1_000.0);
        assert_eq!(cells[0].sub, 0.0);
    }

    #[test]
    fn mid_period_start_records_partial_offset() {
        let left = 6.0 * HOUR_MS;
        let cells = generate_period_dates(
            Period::Day,
            1,
            &window(left, 2.0 * DAY_MS + HOUR_MS, HOUR_MS),
            &utc(),
        );
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].left_global, left);
        assert_eq!(cells[0].sub, left);
        assert_relative_eq!(cells[0].sub_px, 6.0);
        assert_relative_eq!(cells[0].width, 24.0);
        assert_eq!(cells[1].left_global, DAY_MS);
        assert_eq!(cells[1].sub, 0.0);
        assert_eq!(cells[2].right_global, 3.0 * DAY_MS);
    }

    #[test]
    fn cells_tile_without_gaps() {
        let cells = generate_period_dates(
            Period::Hour,
            3,
            &window(5.0 * HOUR_MS + 17.0, 40.0 * HOUR_MS, 60_000.0),
            &utc(),
        );
        assert!(!cells.is_empty());
        for pair in cells.windows(2) {
            assert_eq!(pair[0].right_px, pair[1].left_px);
            assert_eq!(pair[0].right_global, pair[1].left_global);
        }
        assert_eq!(cells[0].left_global - cells[0].sub, 3.0 * HOUR_MS);
        let last = cells.last().expect("last cell");
        assert!(last.right_global >= 40.0 * HOUR_MS);
    }

    #[test]
    fn minute_cells_step_from_hour_boundary() {
        let left = 10.0 * HOUR_MS + 22.0 * MINUTE_MS;
        let cells = generate_period_dates(
            Period::Minute,
            15,
            &window(left, left + 20.0 * MINUTE_MS, 1_000.0),
            &utc(),
        );
        assert_eq!(cells[0].left_global - cells[0].sub, 10.0 * HOUR_MS + 15.0 * MINUTE_MS);
        // Minute levels run to the end of the hour containing the right edge.
        assert_eq!(cells.last().expect("last").right_global, 11.0 * HOUR_MS);
    }

    #[test]
    fn multi_period_cells_align_to_local_boundaries() {
        let local = TimeConversion::new(Locale::default(), false);
        let at = |d: u32, h: u32, min: u32| {
            Local
                .with_ymd_and_hms(2024, 1, d, h, min, 0)
                .earliest()
                .expect("valid local time")
                .timestamp_millis() as f64
        };

        let left = at(17, 5, 17);
        let hours = generate_period_dates(
            Period::Hour,
            3,
            &window(left, at(17, 20, 0), 60_000.0),
            &local,
        );
        let first = local.at(hours[0].left_global - hours[0].sub).naive();
        assert_eq!((first.hour(), first.minute()), (3, 0));
        for cell in &hours {
            let end = local.at(cell.right_global).naive();
            assert_eq!(end.hour() % 3, 0);
            assert_eq!(end.minute(), 0);
        }

        let days = generate_period_dates(
            Period::Day,
            2,
            &window(at(17, 14, 0), at(24, 0, 0), HOUR_MS),
            &local,
        );
        assert_eq!(days[0].left_global - days[0].sub, at(16, 0, 0));
        for cell in &days {
            assert_eq!(local.at(cell.right_global).naive().time(), NaiveTime::MIN);
        }
    }

    #[test]
    fn update_levels_indexes_by_calendar_level() {
        let calendar = Calendar::new(vec![
            CalendarLevel::new(vec![CalendarFormat::new(10.0, Period::Year)]),
            CalendarLevel::main(vec![CalendarFormat::new(30.0, Period::Day).with_label("%d")]),
        ]);
        let mut window = TimeWindow {
            zoom: 16.4,
            ..window(0.0, DAY_MS, 86_400.0)
        };
        update_levels(&mut window, &calendar, &utc()).expect("levels");
        assert_eq!(window.levels.len(), 2);
        assert!(window.levels[0].is_empty());
        assert_eq!(window.level, 1);
        assert_eq!(window.main_cells().len(), 1);
        let format = window.format.clone().expect("main format");
        let label = cell_label(&utc(), &window.main_cells()[0], &format).expect("label");
        assert_eq!(label.as_deref(), Some("01"));
    }
}
