use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::{
    ItemBounds, RecalculationReason, SkipReason, TimeWindowCalculator, TimeWindowInput,
    TimelineEngine, TriggerSnapshot, WindowCalculation,
};

/// Result of a time-window recompute request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RecomputeOutcome {
    Recomputed(RecalculationReason),
    Skipped(SkipReason),
}

impl RecomputeOutcome {
    #[must_use]
    pub fn is_recomputed(self) -> bool {
        matches!(self, Self::Recomputed(_))
    }
}

impl<R: Renderer> TimelineEngine<R> {
    /// Forces a recompute regardless of the trigger state.
    pub fn recompute(&mut self) -> TimelineResult<RecomputeOutcome> {
        self.recalculate_times(RecalculationReason::All)
    }

    fn trigger_snapshot(&self) -> TriggerSnapshot {
        let config = &self.core.config;
        TriggerSnapshot::capture(
            &config.time,
            config.scroll.left,
            config.viewport.chart_width(),
        )
    }

    /// Runs the trigger and recomputes when a tracked input changed.
    pub(super) fn on_time_inputs_changed(&mut self) -> TimelineResult<RecomputeOutcome> {
        let snapshot = self.trigger_snapshot();
        match self.core.trigger.check(snapshot) {
            Some(reason) => self.recalculate_times(reason),
            None => Ok(RecomputeOutcome::Skipped(SkipReason::NotNeeded)),
        }
    }

    pub(super) fn recalculate_times(
        &mut self,
        reason: RecalculationReason,
    ) -> TimelineResult<RecomputeOutcome> {
        if !self.core.latch.try_enter() {
            debug!(reason = reason.name(), "discarding re-entrant time recompute");
            return Ok(RecomputeOutcome::Skipped(SkipReason::Reentrant));
        }
        let result = self.recalculate_times_latched(reason);
        self.core.latch.release();
        result
    }

    fn recalculate_times_latched(
        &mut self,
        reason: RecalculationReason,
    ) -> TimelineResult<RecomputeOutcome> {
        let core = &self.core;
        let input = TimeWindowInput {
            time: core.config.time.clone(),
            chart_width: core.config.viewport.chart_width(),
            scroll_left: core.config.scroll.left,
            round_scroll: core.config.scroll.round,
            item_bounds: ItemBounds::from_spans(
                core.items
                    .values()
                    .map(|item| (item.time.start, item.time.end)),
            ),
            reason,
        };
        let calculation = TimeWindowCalculator::new(&core.config.calendar, &core.time)
            .calculate(input, &core.window)?;
        let outcome = match calculation {
            WindowCalculation::Ready(outcome) => outcome,
            WindowCalculation::Skipped(skip) => {
                debug!(reason = reason.name(), ?skip, "time recompute skipped");
                return Ok(RecomputeOutcome::Skipped(skip));
            }
        };

        let window = outcome.window;
        {
            let config = &mut self.core.config;
            config.time.zoom = Some(window.zoom);
            config.time.period = window
                .format
                .as_ref()
                .map_or(window.period, |format| format.period);
            config.time.left_global = window.left_global;
            config.time.center_global = window.center_global;
            config.time.right_global = window.right_global;
            config.scroll.left = outcome.scroll_left;
        }
        self.core.compensation.x = outcome.x_compensation;
        let event = TimelineEvent::TimeWindowRecomputed {
            reason: reason.name(),
            left_global: window.left_global,
            right_global: window.right_global,
            zoom: window.zoom,
        };
        self.core.window = window;
        self.core.window_ready = true;

        // The write-back above changed tracked inputs; this refreshes the
        // trigger snapshot and the latch discards the nested recompute.
        self.on_time_inputs_changed()?;

        self.emit_plugin_event(event);
        Ok(RecomputeOutcome::Recomputed(reason))
    }
}
