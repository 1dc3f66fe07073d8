use crate::extensions::{PluginContext, TimelineEvent};
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    pub(super) fn plugin_context(&self) -> PluginContext {
        let core = &self.core;
        PluginContext {
            viewport: core.config.viewport,
            period: core.window.period,
            zoom: core.window.zoom,
            visible_time_range: (core.window.left_global, core.window.right_global),
            rows_len: core.rows.len(),
            items_len: core.items.len(),
            visible_rows_len: core.visible_rows.rows().len(),
            compensation: core.compensation,
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: TimelineEvent) {
        if self.core.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.core.plugins {
            plugin.on_event(event, context);
        }
    }
}
