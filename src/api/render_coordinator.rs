use tracing::debug;

use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelineEvent;
use crate::render::{ItemBox, RenderFrame, Renderer};

use super::TimelineEngine;
use super::engine_core::LoadedEventState;

pub(super) struct RenderCoordinator;

impl RenderCoordinator {
    pub(super) fn render<R: Renderer>(engine: &mut TimelineEngine<R>) -> TimelineResult<()> {
        let viewport = engine.core.config.viewport;
        if !viewport.is_valid() {
            return Err(TimelineError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !engine.core.window_ready {
            return Err(TimelineError::InvalidData(
                "time window is not computed yet".to_owned(),
            ));
        }
        let frame = engine.build_render_frame();
        engine.renderer.render(&frame)?;
        engine.emit_plugin_event(TimelineEvent::Rendered);
        if engine.core.loaded == LoadedEventState::Pending {
            engine.core.loaded = LoadedEventState::Scheduled;
        }
        Ok(())
    }

    pub(super) fn flush_deferred<R: Renderer>(engine: &mut TimelineEngine<R>) {
        if engine.core.loaded != LoadedEventState::Scheduled {
            return;
        }
        engine.core.loaded = LoadedEventState::Dispatched;
        debug!("timeline loaded");
        engine.emit_plugin_event(TimelineEvent::Loaded);
    }
}

impl<R: Renderer> TimelineEngine<R> {
    /// Materializes the data a renderer needs for the current state.
    #[must_use]
    pub fn build_render_frame(&self) -> RenderFrame {
        let core = &self.core;
        let window = &core.window;
        let boxes = core
            .visible_items
            .iter()
            .map(|item| {
                let left_px = window
                    .global_time_to_view_pixel_offset(item.time.start, Some(core.compensation.x));
                ItemBox {
                    id: item.id.clone(),
                    row_id: item.row_id.clone(),
                    left_px,
                    width_px: window.time_to_pixel_offset(item.time.end - item.time.start),
                }
            })
            .collect();
        RenderFrame::new(core.config.viewport, window.clone())
            .with_rows(core.visible_rows.rows().to_vec(), core.rows_height)
            .with_items(core.visible_items.clone(), boxes)
            .with_compensation(core.compensation)
    }
}
