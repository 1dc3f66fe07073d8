use serde::{Deserialize, Serialize};

use crate::core::{AdditionalSpace, AdditionalSpaces, Calendar, Locale, Period, Viewport};
use crate::error::{TimelineError, TimelineResult};

use super::validation::{validate_list_config, validate_scroll_config, validate_time_config};

/// Caller-owned time inputs of the timeline.
///
/// The engine writes the derived `zoom`, `period` and `*_global` values back
/// after each recompute; `from`/`to` stay as the caller set them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default = "default_zoom")]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub left_global: f64,
    #[serde(default)]
    pub center_global: f64,
    #[serde(default)]
    pub right_global: f64,
    /// Fit `[from, to]` to the chart width instead of using `zoom`.
    #[serde(default)]
    pub calculated_zoom_mode: bool,
    #[serde(default = "default_additional_spaces")]
    pub additional_spaces: AdditionalSpaces,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            period: Period::Day,
            from: None,
            to: None,
            zoom: default_zoom(),
            left_global: 0.0,
            center_global: 0.0,
            right_global: 0.0,
            calculated_zoom_mode: false,
            additional_spaces: default_additional_spaces(),
        }
    }
}

fn default_zoom() -> Option<f64> {
    Some(21.0)
}

fn default_additional_spaces() -> AdditionalSpaces {
    [
        (Period::Hour, AdditionalSpace::new(24, 24, Period::Hour)),
        (Period::Day, AdditionalSpace::new(1, 1, Period::Month)),
        (Period::Week, AdditionalSpace::new(1, 1, Period::Month)),
        (Period::Month, AdditionalSpace::new(6, 6, Period::Month)),
        (Period::Year, AdditionalSpace::new(12, 12, Period::Year)),
    ]
    .into_iter()
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    /// Snap the horizontal scroll to whole main-level cells.
    #[serde(default)]
    pub round: bool,
    /// Publish the vertical row compensation for pixel-smooth scrolling.
    #[serde(default = "default_smooth")]
    pub smooth: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            round: false,
            smooth: default_smooth(),
        }
    }
}

fn default_smooth() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Height used for rows without an explicit height.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            row_height: default_row_height(),
        }
    }
}

fn default_row_height() -> f64 {
    40.0
}

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist and reload a timeline setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub calendar: Calendar,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub utc_mode: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl TimelineConfig {
    /// Creates a config with the default calendar, manual zoom and no explicit range.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            time: TimeConfig::default(),
            calendar: Calendar::default(),
            scroll: ScrollConfig::default(),
            list: ListConfig::default(),
            locale: Locale::default(),
            utc_mode: false,
        }
    }

    /// Sets an explicit content range.
    #[must_use]
    pub fn with_time_range(mut self, from: f64, to: f64) -> Self {
        self.time.from = Some(from);
        self.time.to = Some(to);
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.time.zoom = Some(zoom);
        self
    }

    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.time.period = period;
        self
    }

    /// Switches to calculated zoom mode (content fitted to chart width).
    #[must_use]
    pub fn with_calculated_zoom_mode(mut self, enabled: bool) -> Self {
        self.time.calculated_zoom_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_additional_spaces(mut self, spaces: AdditionalSpaces) -> Self {
        self.time.additional_spaces = spaces;
        self
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    #[must_use]
    pub fn with_round_scroll(mut self, round: bool) -> Self {
        self.scroll.round = round;
        self
    }

    #[must_use]
    pub fn with_smooth_scroll(mut self, smooth: bool) -> Self {
        self.scroll.smooth = smooth;
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.list.row_height = row_height;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_utc_mode(mut self, utc_mode: bool) -> Self {
        self.utc_mode = utc_mode;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        self.calendar.validate()?;
        self.locale.validate()?;
        validate_time_config(&self.time)?;
        validate_scroll_config(self.scroll)?;
        validate_list_config(self.list)?;
        Ok(())
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::Serialization(format!("failed to parse timeline config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::Serialization(format!("failed to serialize timeline config: {e}"))
        })
    }
}
