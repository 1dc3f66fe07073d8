use crate::core::{Item, Row};
use crate::error::{TimelineError, TimelineResult};

use super::{ListConfig, ScrollConfig, TimeConfig};

pub(super) fn validate_time_config(config: &TimeConfig) -> TimelineResult<()> {
    for (name, value) in [("from", config.from), ("to", config.to), ("zoom", config.zoom)] {
        if let Some(value) = value {
            validate_finite(name, value)?;
        }
    }
    for (name, value) in [
        ("left_global", config.left_global),
        ("center_global", config.center_global),
        ("right_global", config.right_global),
    ] {
        validate_finite(name, value)?;
    }
    if let (Some(from), Some(to)) = (config.from, config.to) {
        if from > to {
            return Err(TimelineError::InvalidConfig(
                "time `from` must not be greater than `to`".to_owned(),
            ));
        }
    }
    Ok(())
}

pub(super) fn validate_scroll_config(config: ScrollConfig) -> TimelineResult<()> {
    validate_finite("scroll.left", config.left)?;
    validate_finite("scroll.top", config.top)
}

pub(super) fn validate_list_config(config: ListConfig) -> TimelineResult<()> {
    validate_row_height(config.row_height)
}

pub(super) fn validate_row(row: &Row) -> TimelineResult<()> {
    if row.id.is_empty() {
        return Err(TimelineError::InvalidData("row id must not be empty".to_owned()));
    }
    if let Some(height) = row.height {
        validate_row_height(height)?;
    }
    Ok(())
}

pub(super) fn validate_item(item: &Item) -> TimelineResult<()> {
    if item.id.is_empty() {
        return Err(TimelineError::InvalidData("item id must not be empty".to_owned()));
    }
    validate_item_time(item.time.start, item.time.end)
}

pub(super) fn validate_item_time(start: f64, end: f64) -> TimelineResult<()> {
    if !start.is_finite() || !end.is_finite() || start > end {
        return Err(TimelineError::InvalidData(
            "item time must be finite with start <= end".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_row_height(height: f64) -> TimelineResult<()> {
    if !height.is_finite() || height <= 0.0 {
        return Err(TimelineError::InvalidData(
            "row height must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_finite(name: &str, value: f64) -> TimelineResult<()> {
    if !value.is_finite() {
        return Err(TimelineError::InvalidConfig(format!("`{name}` must be finite")));
    }
    Ok(())
}
