pub mod calendar;
pub mod date_cells;
pub mod period;
pub mod time;
pub mod time_window;
pub mod tree;
pub mod types;
pub mod visibility;
pub mod zoom;

pub use calendar::{AdditionalSpace, AdditionalSpaces, Calendar, CalendarFormat, CalendarLevel};
pub use date_cells::{cell_label, generate_period_dates, update_levels};
pub use period::Period;
pub use time::{DateHandle, Locale, TimeConversion, ZoneMode};
pub use time_window::{DateCell, LevelCells, TimeWindow, limit_scroll_left};
pub use tree::{Item, ItemId, ItemTime, Items, NestedRow, Row, RowId, RowTree, Rows, TreeNode};
pub use types::{ScrollCompensation, Viewport};
pub use visibility::{
    RowExtent, VisibleRow, VisibleRows, VisibleRowsState, limit_scroll_top, rows_height,
    visible_items, visible_rows_and_compensation,
};
pub use zoom::{ResolvedPeriod, guess_period, resolve_period};
