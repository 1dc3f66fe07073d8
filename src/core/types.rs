use serde::{Deserialize, Serialize};

/// Pixel size of the timeline's scrollable area.
///
/// `width` is the chart (time axis) width and `height` the rows viewport
/// height. Zero means "not measured yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn chart_width(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn rows_height(self) -> f64 {
        f64::from(self.height)
    }
}

/// Sub-cell offsets a renderer applies to keep headers and rows aligned.
///
/// `x` is the main-level header's partial-period offset in pixels; `y` is the
/// negated vertical compensation of the first visible row when smooth
/// scrolling is on, and zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollCompensation {
    pub x: f64,
    pub y: f64,
}
