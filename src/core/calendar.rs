use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::period::Period;
use crate::error::{TimelineError, TimelineResult};

/// One zoom breakpoint of a calendar level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarFormat {
    /// Upper zoom threshold (inclusive) this format applies to.
    pub zoom_to: f64,
    pub period: Period,
    /// Number of periods one cell spans.
    #[serde(default = "default_period_size")]
    pub period_size: u32,
    /// Format adopted when the period is switched without an explicit zoom.
    #[serde(default)]
    pub default: bool,
    /// Optional chrono `strftime` pattern for cell labels.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_period_size() -> u32 {
    1
}

impl CalendarFormat {
    #[must_use]
    pub fn new(zoom_to: f64, period: Period) -> Self {
        Self {
            zoom_to,
            period,
            period_size: 1,
            default: false,
            label: None,
        }
    }

    #[must_use]
    pub fn with_period_size(mut self, period_size: u32) -> Self {
        self.period_size = period_size;
        self
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    #[must_use]
    pub fn with_label(mut self, pattern: impl Into<String>) -> Self {
        self.label = Some(pattern.into());
        self
    }

    /// `period_size` with zero normalized to one.
    #[must_use]
    pub fn effective_period_size(&self) -> u32 {
        self.period_size.max(1)
    }

    #[must_use]
    pub fn matches_zoom(&self, zoom: f64) -> bool {
        zoom <= self.zoom_to
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarLevel {
    pub formats: Vec<CalendarFormat>,
    #[serde(default)]
    pub main: bool,
}

impl CalendarLevel {
    #[must_use]
    pub fn new(formats: Vec<CalendarFormat>) -> Self {
        Self {
            formats,
            main: false,
        }
    }

    #[must_use]
    pub fn main(formats: Vec<CalendarFormat>) -> Self {
        Self {
            formats,
            main: true,
        }
    }

    /// First format, in declaration order, whose threshold the zoom satisfies.
    #[must_use]
    pub fn format_for_zoom(&self, zoom: f64) -> Option<&CalendarFormat> {
        self.formats.iter().find(|format| format.matches_zoom(zoom))
    }

    /// Format flagged `default` for `period`, if any.
    #[must_use]
    pub fn default_format_for(&self, period: Period) -> Option<&CalendarFormat> {
        self.formats
            .iter()
            .find(|format| format.period == period && format.default)
    }
}

/// Padding applied around content bounds, expressed in a period unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdditionalSpace {
    #[serde(default)]
    pub before: u32,
    #[serde(default)]
    pub after: u32,
    pub period: Period,
}

impl AdditionalSpace {
    #[must_use]
    pub fn new(before: u32, after: u32, period: Period) -> Self {
        Self {
            before,
            after,
            period,
        }
    }
}

/// Additional space keyed by the active main period.
pub type AdditionalSpaces = IndexMap<Period, AdditionalSpace>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub levels: Vec<CalendarLevel>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            levels: vec![
                CalendarLevel::new(vec![
                    CalendarFormat::new(17.0, Period::Day).with_label("%d %B %Y (%A)"),
                    CalendarFormat::new(23.0, Period::Month).with_label("%B %Y"),
                    CalendarFormat::new(100.0, Period::Year).with_label("%Y"),
                ]),
                CalendarLevel::main(vec![
                    CalendarFormat::new(16.0, Period::Hour)
                        .as_default()
                        .with_label("%H:%M"),
                    CalendarFormat::new(17.0, Period::Hour)
                        .with_period_size(3)
                        .with_label("%H:%M"),
                    CalendarFormat::new(19.0, Period::Day)
                        .as_default()
                        .with_label("%e %a"),
                    CalendarFormat::new(20.0, Period::Day).with_label("%e"),
                    CalendarFormat::new(23.0, Period::Week)
                        .as_default()
                        .with_label("%d %b"),
                    CalendarFormat::new(25.0, Period::Month)
                        .as_default()
                        .with_label("%B"),
                    CalendarFormat::new(27.0, Period::Month)
                        .with_period_size(3)
                        .with_label("%b"),
                    CalendarFormat::new(100.0, Period::Year)
                        .as_default()
                        .with_label("%Y"),
                ]),
            ],
        }
    }
}

impl Calendar {
    #[must_use]
    pub fn new(levels: Vec<CalendarLevel>) -> Self {
        Self { levels }
    }

    /// Index and level of the honored main level (first one marked `main`).
    pub fn main_level(&self) -> TimelineResult<(usize, &CalendarLevel)> {
        self.levels
            .iter()
            .enumerate()
            .find(|(_, level)| level.main)
            .ok_or(TimelineError::MissingMainLevel)
    }

    pub fn validate(&self) -> TimelineResult<()> {
        let (main_index, _) = self.main_level()?;
        let main_count = self.levels.iter().filter(|level| level.main).count();
        if main_count > 1 {
            warn!(
                main_count,
                honored_level = main_index,
                "multiple main calendar levels configured; only the first is honored"
            );
        }
        for (level_index, level) in self.levels.iter().enumerate() {
            for format in &level.formats {
                if !format.zoom_to.is_finite() {
                    return Err(TimelineError::InvalidConfig(format!(
                        "calendar level {level_index} has a non-finite zoom_to"
                    )));
                }
                if format.period_size == 0 {
                    return Err(TimelineError::InvalidConfig(format!(
                        "calendar level {level_index} has a zero period_size"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_selection_uses_declaration_order() {
        let level = CalendarLevel::main(vec![
            CalendarFormat::new(20.0, Period::Day),
            CalendarFormat::new(18.0, Period::Hour),
        ]);
        // 17 satisfies both; the earlier declaration wins even though 18 is nearer.
        assert_eq!(
            level.format_for_zoom(17.0).map(|format| format.period),
            Some(Period::Day)
        );
        assert!(level.format_for_zoom(21.0).is_none());
    }

    #[test]
    fn first_main_level_is_honored() {
        let calendar = Calendar::new(vec![
            CalendarLevel::new(vec![CalendarFormat::new(100.0, Period::Year)]),
            CalendarLevel::main(vec![CalendarFormat::new(100.0, Period::Month)]),
            CalendarLevel::main(vec![CalendarFormat::new(100.0, Period::Day)]),
        ]);
        let (index, level) = calendar.main_level().expect("main level");
        assert_eq!(index, 1);
        assert_eq!(level.formats[0].period, Period::Month);
        assert!(calendar.validate().is_ok());
    }

    #[test]
    fn missing_main_level_is_rejected() {
        let calendar = Calendar::new(vec![CalendarLevel::new(vec![CalendarFormat::new(
            100.0,
            Period::Year,
        )])]);
        assert!(matches!(
            calendar.validate(),
            Err(TimelineError::MissingMainLevel)
        ));
    }

    #[test]
    fn default_calendar_has_default_formats_per_period() {
        let calendar = Calendar::default();
        let (_, main) = calendar.main_level().expect("main level");
        for period in [Period::Hour, Period::Day, Period::Week, Period::Month, Period::Year] {
            assert!(main.default_format_for(period).is_some(), "{period}");
        }
    }
}
