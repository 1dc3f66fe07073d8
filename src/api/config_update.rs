use crate::core::{AdditionalSpaces, Calendar, Item, ItemId, Period, Row, RowId};
use crate::error::{TimelineError, TimelineResult};
use crate::render::Renderer;

use super::validation::{
    validate_finite, validate_item, validate_item_time, validate_row, validate_row_height,
};
use super::{RecalculationReason, RecomputeOutcome, TimelineEngine, UpdateTopic, UpdateTopics};

/// One typed change to the timeline inputs.
///
/// Updates are applied in batches through [`TimelineEngine::apply_updates`]:
/// a batch runs at most one time-window recompute and one visible-row refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    ChartWidth(u32),
    ViewportHeight(u32),
    Zoom(f64),
    Period(Period),
    TimeRange { from: Option<f64>, to: Option<f64> },
    /// Sets the visible range directly; the window adopts it verbatim.
    VisibleRange { left: f64, right: f64 },
    ScrollLeft(f64),
    ScrollTop(f64),
    RoundScroll(bool),
    SmoothScroll(bool),
    CalculatedZoomMode(bool),
    AdditionalSpaces(AdditionalSpaces),
    Calendar(Calendar),
    RowHeight(f64),
    SetRows(Vec<Row>),
    UpsertRow(Row),
    RemoveRow(RowId),
    SetRowExpanded { id: RowId, expanded: bool },
    SetRowHeight { id: RowId, height: Option<f64> },
    SetRowParent { id: RowId, parent_id: Option<RowId> },
    SetItems(Vec<Item>),
    UpsertItem(Item),
    RemoveItem(ItemId),
    SetItemTime { id: ItemId, start: f64, end: f64 },
    SetItemRow { id: ItemId, row_id: RowId },
}

impl ConfigUpdate {
    fn validate(&self) -> TimelineResult<()> {
        match self {
            Self::Zoom(zoom) => validate_finite("zoom", *zoom),
            Self::TimeRange { from, to } => {
                for value in [from, to].into_iter().flatten() {
                    validate_finite("time range", *value)?;
                }
                if let (Some(from), Some(to)) = (from, to) {
                    if from > to {
                        return Err(TimelineError::InvalidConfig(
                            "time `from` must not be greater than `to`".to_owned(),
                        ));
                    }
                }
                Ok(())
            }
            Self::VisibleRange { left, right } => {
                validate_finite("visible range", *left)?;
                validate_finite("visible range", *right)?;
                if left > right {
                    return Err(TimelineError::InvalidConfig(
                        "visible range `left` must not be greater than `right`".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::ScrollLeft(value) => validate_finite("scroll.left", *value),
            Self::ScrollTop(value) => validate_finite("scroll.top", *value),
            Self::Calendar(calendar) => calendar.validate(),
            Self::RowHeight(height) => validate_row_height(*height),
            Self::SetRows(rows) => rows.iter().try_for_each(validate_row),
            Self::UpsertRow(row) => validate_row(row),
            Self::SetRowHeight {
                height: Some(height),
                ..
            } => validate_row_height(*height),
            Self::SetItems(items) => items.iter().try_for_each(validate_item),
            Self::UpsertItem(item) => validate_item(item),
            Self::SetItemTime { start, end, .. } => validate_item_time(*start, *end),
            _ => Ok(()),
        }
    }
}

impl<R: Renderer> TimelineEngine<R> {
    /// Applies a batch of updates.
    ///
    /// Every update is validated before any is applied, so an invalid batch
    /// leaves the engine untouched. Derived state is refreshed once per batch.
    pub fn apply_updates(
        &mut self,
        updates: impl IntoIterator<Item = ConfigUpdate>,
    ) -> TimelineResult<RecomputeOutcome> {
        let updates: Vec<ConfigUpdate> = updates.into_iter().collect();
        for update in &updates {
            update.validate()?;
        }
        let topics = updates
            .into_iter()
            .fold(UpdateTopics::none(), |topics, update| {
                topics.union(self.apply_update(update))
            });
        self.refresh_after_updates(topics)
    }

    fn apply_update(&mut self, update: ConfigUpdate) -> UpdateTopics {
        let core = &mut self.core;
        let topic = match update {
            ConfigUpdate::ChartWidth(width) => {
                core.config.viewport.width = width;
                UpdateTopic::Time
            }
            ConfigUpdate::ViewportHeight(height) => {
                core.config.viewport.height = height;
                UpdateTopic::Visible
            }
            ConfigUpdate::Zoom(zoom) => {
                core.config.time.zoom = Some(zoom);
                UpdateTopic::Time
            }
            ConfigUpdate::Period(period) => {
                core.config.time.period = period;
                UpdateTopic::Time
            }
            ConfigUpdate::TimeRange { from, to } => {
                core.config.time.from = from;
                core.config.time.to = to;
                UpdateTopic::Time
            }
            ConfigUpdate::VisibleRange { left, right } => {
                let time = &mut core.config.time;
                time.left_global = left;
                time.right_global = right;
                time.center_global = left + ((right - left) / 2.0).round();
                UpdateTopic::Time
            }
            ConfigUpdate::ScrollLeft(left) => {
                core.config.scroll.left = left;
                UpdateTopic::Time
            }
            ConfigUpdate::ScrollTop(top) => {
                core.config.scroll.top = top;
                UpdateTopic::Visible
            }
            ConfigUpdate::RoundScroll(round) => {
                core.config.scroll.round = round;
                UpdateTopic::Options
            }
            ConfigUpdate::SmoothScroll(smooth) => {
                core.config.scroll.smooth = smooth;
                UpdateTopic::Visible
            }
            ConfigUpdate::CalculatedZoomMode(enabled) => {
                core.config.time.calculated_zoom_mode = enabled;
                UpdateTopic::Options
            }
            ConfigUpdate::AdditionalSpaces(spaces) => {
                core.config.time.additional_spaces = spaces;
                UpdateTopic::Options
            }
            ConfigUpdate::Calendar(calendar) => {
                core.config.calendar = calendar;
                UpdateTopic::Calendar
            }
            ConfigUpdate::RowHeight(height) => {
                core.config.list.row_height = height;
                UpdateTopic::Rows
            }
            ConfigUpdate::SetRows(rows) => {
                core.rows = rows.into_iter().map(|row| (row.id.clone(), row)).collect();
                UpdateTopic::Tree
            }
            ConfigUpdate::UpsertRow(row) => {
                let synced = core.tree.sync_row(&row);
                core.rows.insert(row.id.clone(), row);
                if synced {
                    UpdateTopic::Rows
                } else {
                    UpdateTopic::Tree
                }
            }
            ConfigUpdate::RemoveRow(id) => {
                if core.rows.shift_remove(&id).is_none() {
                    return UpdateTopics::none();
                }
                UpdateTopic::Tree
            }
            ConfigUpdate::SetRowExpanded { id, expanded } => {
                let Some(row) = core.rows.get_mut(&id) else {
                    return UpdateTopics::none();
                };
                row.expanded = Some(expanded);
                core.tree.sync_row(row);
                UpdateTopic::Rows
            }
            ConfigUpdate::SetRowHeight { id, height } => {
                let Some(row) = core.rows.get_mut(&id) else {
                    return UpdateTopics::none();
                };
                row.height = height;
                core.tree.sync_row(row);
                UpdateTopic::Rows
            }
            ConfigUpdate::SetRowParent { id, parent_id } => {
                let Some(row) = core.rows.get_mut(&id) else {
                    return UpdateTopics::none();
                };
                row.parent_id = parent_id;
                UpdateTopic::Tree
            }
            ConfigUpdate::SetItems(items) => {
                core.items = items
                    .into_iter()
                    .map(|item| (item.id.clone(), item))
                    .collect();
                return items_changed();
            }
            ConfigUpdate::UpsertItem(item) => {
                core.items.insert(item.id.clone(), item);
                return items_changed();
            }
            ConfigUpdate::RemoveItem(id) => {
                if core.items.shift_remove(&id).is_none() {
                    return UpdateTopics::none();
                }
                return items_changed();
            }
            ConfigUpdate::SetItemTime { id, start, end } => {
                let Some(item) = core.items.get_mut(&id) else {
                    return UpdateTopics::none();
                };
                item.time.start = start;
                item.time.end = end;
                return items_changed();
            }
            ConfigUpdate::SetItemRow { id, row_id } => {
                let Some(item) = core.items.get_mut(&id) else {
                    return UpdateTopics::none();
                };
                item.row_id = row_id;
                UpdateTopic::Tree
            }
        };
        UpdateTopics::from_topic(topic)
    }

    fn refresh_after_updates(&mut self, topics: UpdateTopics) -> TimelineResult<RecomputeOutcome> {
        if topics.contains_topic(UpdateTopic::Tree) {
            self.rebuild_tree();
        } else if topics.contains_topic(UpdateTopic::Rows) {
            self.refresh_rows_with_parents_expanded();
        }
        if topics.touches_rows() {
            self.refresh_visible_rows();
        }

        let outcome = self.on_time_inputs_changed()?;
        if outcome.is_recomputed() {
            return Ok(outcome);
        }
        let forced = if topics.contains_topic(UpdateTopic::Calendar) {
            Some(RecalculationReason::Calendar)
        } else if topics.contains_topic(UpdateTopic::ItemsTime) {
            Some(RecalculationReason::Items)
        } else if topics.contains_topic(UpdateTopic::Options) {
            Some(RecalculationReason::Options)
        } else {
            None
        };
        match forced {
            Some(reason) => self.recalculate_times(reason),
            None => Ok(outcome),
        }
    }

    pub fn set_chart_width(&mut self, width: u32) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::ChartWidth(width)])
    }

    pub fn set_viewport_height(&mut self, height: u32) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::ViewportHeight(height)])
    }

    pub fn set_zoom(&mut self, zoom: f64) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::Zoom(zoom)])
    }

    pub fn set_period(&mut self, period: Period) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::Period(period)])
    }

    pub fn set_time_range(
        &mut self,
        from: Option<f64>,
        to: Option<f64>,
    ) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::TimeRange { from, to }])
    }

    pub fn set_visible_range(&mut self, left: f64, right: f64) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::VisibleRange { left, right }])
    }

    pub fn set_scroll_left(&mut self, left: f64) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::ScrollLeft(left)])
    }

    pub fn set_scroll_top(&mut self, top: f64) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::ScrollTop(top)])
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::SetRows(rows)])
    }

    pub fn set_items(&mut self, items: Vec<Item>) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::SetItems(items)])
    }

    pub fn set_row_expanded(
        &mut self,
        id: impl Into<RowId>,
        expanded: bool,
    ) -> TimelineResult<RecomputeOutcome> {
        self.apply_updates([ConfigUpdate::SetRowExpanded {
            id: id.into(),
            expanded,
        }])
    }

    pub fn toggle_row_expanded(&mut self, id: &str) -> TimelineResult<RecomputeOutcome> {
        let expanded = self.core.rows.get(id).is_some_and(Row::is_expanded);
        self.set_row_expanded(id, !expanded)
    }
}

fn items_changed() -> UpdateTopics {
    UpdateTopics::from_topic(UpdateTopic::Tree).with_topic(UpdateTopic::ItemsTime)
}
