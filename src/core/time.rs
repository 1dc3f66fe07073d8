use std::fmt::Write as _;

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, Months, NaiveDate, NaiveDateTime,
    NaiveTime, TimeZone, Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::core::period::{DAY_MS, HOUR_MS, MINUTE_MS, Period, WEEK_MS};
use crate::error::{TimelineError, TimelineResult};

/// Timestamps are clamped into this range so every value maps onto a
/// representable calendar date.
const MAX_TIMESTAMP_MS: i64 = 8_000_000_000_000_000;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Locale data the time axis needs: a name for hosts and the first day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub name: String,
    /// First day of the week, `0` = Sunday .. `6` = Saturday.
    #[serde(default)]
    pub week_start: u8,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            name: "en".to_owned(),
            week_start: 0,
        }
    }
}

impl Locale {
    #[must_use]
    pub fn new(name: impl Into<String>, week_start: u8) -> Self {
        Self {
            name: name.into(),
            week_start,
        }
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if self.week_start > 6 {
            return Err(TimelineError::InvalidConfig(
                "locale week_start must be between 0 (Sunday) and 6 (Saturday)".to_owned(),
            ));
        }
        Ok(())
    }

    fn first_weekday(&self) -> Weekday {
        match self.week_start {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneMode {
    Utc,
    Local,
}

/// Period-aware date arithmetic bound to a locale and a zone mode.
///
/// The zone mode is decided once at construction; every handle produced by
/// `date` carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeConversion {
    locale: Locale,
    zone: ZoneMode,
}

impl TimeConversion {
    #[must_use]
    pub fn new(locale: Locale, utc_mode: bool) -> Self {
        Self {
            locale,
            zone: if utc_mode {
                ZoneMode::Utc
            } else {
                ZoneMode::Local
            },
        }
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn zone(&self) -> ZoneMode {
        self.zone
    }

    /// Returns a handle for `timestamp` (milliseconds since epoch), or for now.
    #[must_use]
    pub fn date(&self, timestamp: Option<f64>) -> DateHandle {
        let ms = match timestamp {
            Some(value) if value.is_finite() => value.round() as i64,
            Some(_) => 0,
            None => Utc::now().timestamp_millis(),
        };
        DateHandle {
            ms: ms.clamp(-MAX_TIMESTAMP_MS, MAX_TIMESTAMP_MS),
            zone: self.zone,
            week_start: self.locale.first_weekday(),
        }
    }

    /// Shorthand for `date(Some(timestamp))`.
    #[must_use]
    pub fn at(&self, timestamp: f64) -> DateHandle {
        self.date(Some(timestamp))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateHandle {
    ms: i64,
    zone: ZoneMode,
    week_start: Weekday,
}

impl DateHandle {
    #[must_use]
    pub fn value_of(self) -> f64 {
        self.ms as f64
    }

    #[must_use]
    pub fn timestamp_millis(self) -> i64 {
        self.ms
    }

    /// Wall-clock time of this handle in its zone.
    #[must_use]
    pub fn naive(self) -> NaiveDateTime {
        let utc = DateTime::<Utc>::from_timestamp_millis(self.ms).unwrap_or_default();
        match self.zone {
            ZoneMode::Utc => utc.naive_utc(),
            ZoneMode::Local => utc.with_timezone(&Local).naive_local(),
        }
    }

    fn with_naive(self, naive: NaiveDateTime) -> Self {
        let ms = match self.zone {
            ZoneMode::Utc => naive.and_utc().timestamp_millis(),
            ZoneMode::Local => match Local.from_local_datetime(&naive) {
                LocalResult::Single(dt) => dt.timestamp_millis(),
                LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
                // Wall-clock time skipped by a DST transition: move past the gap.
                LocalResult::None => Local
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
                    .map_or_else(|| naive.and_utc().timestamp_millis(), |dt| dt.timestamp_millis()),
            },
        };
        Self {
            ms: ms.clamp(-MAX_TIMESTAMP_MS, MAX_TIMESTAMP_MS),
            ..self
        }
    }

    fn offset_ms(self) -> i64 {
        self.naive().and_utc().timestamp_millis() - self.ms
    }

    #[must_use]
    pub fn start_of(self, period: Period) -> Self {
        let naive = self.naive();
        let date = naive.date();
        let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);
        let start = match period {
            Period::Year => midnight(NaiveDate::from_yo_opt(date.year(), 1).unwrap_or(date)),
            Period::Month => midnight(date.with_day(1).unwrap_or(date)),
            Period::Week => {
                let back = (date.weekday().num_days_from_sunday() + 7
                    - self.week_start.num_days_from_sunday())
                    % 7;
                midnight(date - Duration::days(i64::from(back)))
            }
            Period::Day => midnight(date),
            Period::Hour => midnight(date) + Duration::hours(i64::from(naive.hour())),
            Period::Minute => {
                midnight(date)
                    + Duration::hours(i64::from(naive.hour()))
                    + Duration::minutes(i64::from(naive.minute()))
            }
        };
        self.with_naive(start)
    }

    /// Start of the `size`-period block containing this handle, on the wall clock.
    ///
    /// Hour blocks count from local midnight and day blocks from
    /// 1970-01-01 local, so both line up with calendar boundaries in either
    /// zone. Other periods fall back to [`Self::start_of`].
    #[must_use]
    pub fn start_of_block(self, period: Period, size: i64) -> Self {
        let size = size.max(1);
        let naive = self.naive();
        let date = naive.date();
        match period {
            Period::Hour if size > 1 => {
                let hour = i64::from(naive.hour()) / size * size;
                self.with_naive(date.and_time(NaiveTime::MIN) + Duration::hours(hour))
            }
            Period::Day if size > 1 => {
                let days = i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE;
                let back = days.rem_euclid(size);
                self.with_naive((date - Duration::days(back)).and_time(NaiveTime::MIN))
            }
            _ => self.start_of(period),
        }
    }

    /// Last millisecond of the period containing this handle.
    #[must_use]
    pub fn end_of(self, period: Period) -> Self {
        let next = self.start_of(period).add(1, period);
        Self {
            ms: next.ms - 1,
            ..next
        }
    }

    #[must_use]
    pub fn add(self, amount: i64, period: Period) -> Self {
        match period {
            Period::Minute | Period::Hour => Self {
                ms: (self.ms + amount * period.nominal_ms() as i64)
                    .clamp(-MAX_TIMESTAMP_MS, MAX_TIMESTAMP_MS),
                ..self
            },
            Period::Day | Period::Week => {
                let days = if period == Period::Week {
                    amount * 7
                } else {
                    amount
                };
                let naive = self.naive();
                self.with_naive(
                    naive
                        .checked_add_signed(Duration::days(days))
                        .unwrap_or(naive),
                )
            }
            Period::Month | Period::Year => {
                let months = if period == Period::Year {
                    amount * 12
                } else {
                    amount
                };
                let naive = self.naive();
                let magnitude = Months::new(u32::try_from(months.unsigned_abs()).unwrap_or(u32::MAX));
                let shifted = if months >= 0 {
                    naive.checked_add_months(magnitude)
                } else {
                    naive.checked_sub_months(magnitude)
                };
                self.with_naive(shifted.unwrap_or(naive))
            }
        }
    }

    #[must_use]
    pub fn subtract(self, amount: i64, period: Period) -> Self {
        self.add(-amount, period)
    }

    /// Signed distance `self - other` measured in `period` units.
    ///
    /// With `exact == false` the result is truncated toward zero.
    #[must_use]
    pub fn diff(self, other: Self, period: Period, exact: bool) -> f64 {
        let diff = (self.ms - other.ms) as f64;
        let zone_delta = (other.offset_ms() - self.offset_ms()) as f64;
        let result = match period {
            Period::Year => month_diff(self, other) / 12.0,
            Period::Month => month_diff(self, other),
            Period::Week => (diff - zone_delta) / WEEK_MS,
            Period::Day => (diff - zone_delta) / DAY_MS,
            Period::Hour => diff / HOUR_MS,
            Period::Minute => diff / MINUTE_MS,
        };
        if exact { result } else { result.trunc() }
    }

    /// Formats the wall-clock time with a chrono `strftime` pattern.
    pub fn format(self, pattern: &str) -> TimelineResult<String> {
        let mut out = String::new();
        write!(out, "{}", self.naive().format(pattern)).map_err(|_| {
            TimelineError::InvalidConfig(format!("invalid date format pattern `{pattern}`"))
        })?;
        Ok(out)
    }
}

/// Fractional month distance `a - b`, anchored on calendar months so
/// month-length differences do not skew the result.
fn month_diff(a: DateHandle, b: DateHandle) -> f64 {
    let a_naive = a.naive();
    let b_naive = b.naive();
    if a_naive.day() < b_naive.day() {
        return -month_diff(b, a);
    }
    let wheel = i64::from(b_naive.year() - a_naive.year()) * 12
        + (i64::from(b_naive.month()) - i64::from(a_naive.month()));
    let anchor = a.add(wheel, Period::Month).ms;
    let before_anchor = b.ms - anchor < 0;
    let anchor2 = a
        .add(wheel + if before_anchor { -1 } else { 1 }, Period::Month)
        .ms;
    let span = if before_anchor {
        anchor - anchor2
    } else {
        anchor2 - anchor
    };
    if span == 0 {
        return -(wheel as f64) + 0.0;
    }
    let value = -(wheel as f64 + (b.ms - anchor) as f64 / span as f64);
    if value == 0.0 || value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> TimeConversion {
        TimeConversion::new(Locale::default(), true)
    }

    fn ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid date")
            .and_utc()
            .timestamp_millis() as f64
    }

    fn local() -> TimeConversion {
        TimeConversion::new(Locale::default(), false)
    }

    fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .expect("valid local time")
            .timestamp_millis() as f64
    }

    #[test]
    fn start_and_end_of_day_in_utc() {
        let time = utc();
        let date = time.at(ms(2024, 3, 15, 13, 45));
        assert_eq!(date.start_of(Period::Day).value_of(), ms(2024, 3, 15, 0, 0));
        assert_eq!(
            date.end_of(Period::Day).value_of(),
            ms(2024, 3, 16, 0, 0) - 1.0
        );
    }

    #[test]
    fn start_of_week_respects_locale_week_start() {
        // 2024-03-15 is a Friday.
        let sunday_first = utc().at(ms(2024, 3, 15, 10, 0));
        assert_eq!(
            sunday_first.start_of(Period::Week).value_of(),
            ms(2024, 3, 10, 0, 0)
        );

        let monday_first = TimeConversion::new(Locale::new("pl", 1), true).at(ms(2024, 3, 15, 10, 0));
        assert_eq!(
            monday_first.start_of(Period::Week).value_of(),
            ms(2024, 3, 11, 0, 0)
        );
    }

    #[test]
    fn start_of_month_year_hour_minute() {
        let date = utc().at(ms(2024, 3, 15, 13, 45) + 12_345.0);
        assert_eq!(date.start_of(Period::Month).value_of(), ms(2024, 3, 1, 0, 0));
        assert_eq!(date.start_of(Period::Year).value_of(), ms(2024, 1, 1, 0, 0));
        assert_eq!(date.start_of(Period::Hour).value_of(), ms(2024, 3, 15, 13, 0));
        assert_eq!(
            date.start_of(Period::Minute).value_of(),
            ms(2024, 3, 15, 13, 45)
        );
    }

    #[test]
    fn local_day_and_hour_follow_wall_clock() {
        let date = local().at(local_ms(2024, 1, 17, 13, 45) + 12_345.0);
        assert_eq!(date.naive().hour(), 13);
        assert_eq!(date.start_of(Period::Day).value_of(), local_ms(2024, 1, 17, 0, 0));
        assert_eq!(date.start_of(Period::Hour).value_of(), local_ms(2024, 1, 17, 13, 0));
        assert_eq!(
            date.end_of(Period::Day).value_of(),
            local_ms(2024, 1, 18, 0, 0) - 1.0
        );
    }

    #[test]
    fn local_day_add_keeps_wall_clock_time() {
        // Thirty days from early March crosses a DST switch in many zones.
        let start = local().at(local_ms(2024, 3, 5, 9, 30));
        let later = start.add(30, Period::Day);
        assert_eq!(later.value_of(), local_ms(2024, 4, 4, 9, 30));
        assert_eq!(later.naive().hour(), 9);
        assert_eq!(later.diff(start, Period::Day, true), 30.0);
    }

    #[test]
    fn block_starts_use_local_calendar_boundaries() {
        let date = local().at(local_ms(2024, 1, 17, 14, 20));
        assert_eq!(
            date.start_of_block(Period::Hour, 3).value_of(),
            local_ms(2024, 1, 17, 12, 0)
        );
        // 2024-01-17 is day 19739 after the epoch; even blocks start a day earlier.
        assert_eq!(
            date.start_of_block(Period::Day, 2).value_of(),
            local_ms(2024, 1, 16, 0, 0)
        );
        assert_eq!(
            date.start_of_block(Period::Month, 4),
            date.start_of(Period::Month)
        );
    }

    #[test]
    fn block_starts_in_utc_match_epoch_blocks() {
        let date = utc().at(ms(2024, 1, 17, 14, 20));
        assert_eq!(date.start_of_block(Period::Hour, 6).value_of(), ms(2024, 1, 17, 12, 0));
        assert_eq!(date.start_of_block(Period::Day, 2).value_of(), ms(2024, 1, 16, 0, 0));
        assert_eq!(date.start_of_block(Period::Hour, 1), date.start_of(Period::Hour));
    }

    #[test]
    fn add_month_clamps_to_month_end() {
        let date = utc().at(ms(2024, 1, 31, 0, 0));
        assert_eq!(date.add(1, Period::Month).value_of(), ms(2024, 2, 29, 0, 0));
        assert_eq!(
            date.subtract(1, Period::Year).value_of(),
            ms(2023, 1, 31, 0, 0)
        );
    }

    #[test]
    fn diff_truncates_unless_exact() {
        let time = utc();
        let a = time.at(ms(2024, 1, 3, 12, 0));
        let b = time.at(ms(2024, 1, 1, 0, 0));
        assert_eq!(a.diff(b, Period::Day, false), 2.0);
        assert!((a.diff(b, Period::Day, true) - 2.5).abs() < 1e-12);
        assert_eq!(b.diff(a, Period::Day, false), -2.0);
        assert_eq!(a.diff(b, Period::Hour, false), 60.0);
    }

    #[test]
    fn month_diff_is_calendar_anchored() {
        let time = utc();
        let a = time.at(ms(2024, 3, 1, 0, 0));
        let b = time.at(ms(2024, 1, 1, 0, 0));
        assert_eq!(a.diff(b, Period::Month, true), 2.0);
        assert_eq!(b.diff(a, Period::Month, true), -2.0);
        let mid = time.at(ms(2024, 1, 16, 12, 0));
        let diff = mid.diff(b, Period::Month, true);
        assert!((diff - 0.5).abs() < 1e-9, "diff={diff}");
        assert_eq!(time.at(ms(2026, 1, 1, 0, 0)).diff(b, Period::Year, true), 2.0);
    }

    #[test]
    fn format_rejects_invalid_pattern() {
        let date = utc().at(ms(2024, 3, 15, 0, 0));
        assert_eq!(date.format("%Y-%m-%d").expect("format"), "2024-03-15");
        assert!(date.format("%Q").is_err());
    }
}
