use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

pub const MINUTE_MS: f64 = 60_000.0;
pub const HOUR_MS: f64 = 3_600_000.0;
pub const DAY_MS: f64 = 86_400_000.0;
pub const WEEK_MS: f64 = 7.0 * DAY_MS;
pub const MONTH_MS: f64 = 30.0 * DAY_MS;
pub const YEAR_MS: f64 = 365.0 * DAY_MS;

/// Calendar granularity used by the time axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Self; 6] = [
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Length of one period in milliseconds.
    ///
    /// Exact for minute/hour/day, nominal (7d/30d/365d) for the calendar periods.
    #[must_use]
    pub const fn nominal_ms(self) -> f64 {
        match self {
            Self::Minute => MINUTE_MS,
            Self::Hour => HOUR_MS,
            Self::Day => DAY_MS,
            Self::Week => WEEK_MS,
            Self::Month => MONTH_MS,
            Self::Year => YEAR_MS,
        }
    }

    /// Period whose boundaries are used to truncate cells of this period.
    ///
    /// Minute cells are laid out from hour boundaries.
    #[must_use]
    pub const fn truncation_period(self) -> Self {
        match self {
            Self::Minute => Self::Hour,
            other => other,
        }
    }

    /// Whether cells of this period can be aligned by flooring epoch
    /// milliseconds to a multiple of `period_size` periods.
    #[must_use]
    pub const fn has_fixed_length(self) -> bool {
        matches!(self, Self::Minute | Self::Hour | Self::Day)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TimelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == value)
            .ok_or_else(|| TimelineError::InvalidConfig(format!("unsupported period `{value}`")))
    }
}
