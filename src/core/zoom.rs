use serde::{Deserialize, Serialize};

use crate::core::calendar::Calendar;
use crate::core::period::Period;
use crate::core::time_window::TimeWindow;

/// Period selected for the main calendar level at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPeriod {
    pub period: Period,
    pub period_size: u32,
    /// Period length times `period_size`, used to snap scroll positions.
    pub round_multiplier: f64,
}

impl ResolvedPeriod {
    pub fn apply_to(self, window: &mut TimeWindow) {
        window.period = self.period;
        window.period_size = self.period_size;
        window.round_multiplier = self.round_multiplier;
    }
}

/// Picks the main level's active period for `zoom`.
///
/// Returns `None` when zoom is unset (or zero), when there is no main level,
/// or when no main format covers the zoom; callers keep the previous period.
#[must_use]
pub fn resolve_period(zoom: Option<f64>, calendar: &Calendar) -> Option<ResolvedPeriod> {
    let zoom = zoom.filter(|zoom| *zoom != 0.0 && zoom.is_finite())?;
    let (_, main) = calendar.main_level().ok()?;
    let format = main.format_for_zoom(zoom)?;
    let period_size = format.effective_period_size();
    Some(ResolvedPeriod {
        period: format.period,
        period_size,
        round_multiplier: format.period.nominal_ms() * f64::from(period_size),
    })
}

/// Resolves the period for `zoom` and records it on `window`.
///
/// Returns `true` when the window was updated.
pub fn guess_period(window: &mut TimeWindow, zoom: Option<f64>, calendar: &Calendar) -> bool {
    match resolve_period(zoom, calendar) {
        Some(resolved) => {
            resolved.apply_to(window);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::{CalendarFormat, CalendarLevel};

    fn calendar() -> Calendar {
        Calendar::new(vec![
            CalendarLevel::new(vec![CalendarFormat::new(100.0, Period::Year)]),
            CalendarLevel::main(vec![
                CalendarFormat::new(16.0, Period::Hour).with_period_size(2),
                CalendarFormat::new(20.0, Period::Day),
                CalendarFormat::new(100.0, Period::Month),
            ]),
        ])
    }

    #[test]
    fn resolves_main_level_period_and_round_multiplier() {
        let resolved = resolve_period(Some(15.0), &calendar()).expect("resolved");
        assert_eq!(resolved.period, Period::Hour);
        assert_eq!(resolved.period_size, 2);
        assert_eq!(resolved.round_multiplier, 2.0 * 3_600_000.0);

        let resolved = resolve_period(Some(18.5), &calendar()).expect("resolved");
        assert_eq!(resolved.period, Period::Day);
    }

    #[test]
    fn unset_zoom_keeps_previous_period() {
        let mut window = TimeWindow {
            period: Period::Week,
            ..TimeWindow::default()
        };
        assert!(!guess_period(&mut window, None, &calendar()));
        assert!(!guess_period(&mut window, Some(0.0), &calendar()));
        assert_eq!(window.period, Period::Week);
    }

    #[test]
    fn zoom_beyond_every_threshold_keeps_previous_period() {
        let mut window = TimeWindow::default();
        assert!(!guess_period(&mut window, Some(150.0), &calendar()));
        assert_eq!(window.period, Period::Day);
    }
}
