use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelinePlugin;
use crate::render::Renderer;

use super::engine_core::EngineCore;
use super::render_coordinator::RenderCoordinator;

/// Main orchestration facade consumed by host applications.
///
/// `TimelineEngine` owns the timeline configuration, rows and items, keeps the
/// time window and the visible row slice in sync with them, and hands
/// renderers a plain `RenderFrame`.
pub struct TimelineEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> TimelineEngine<R> {
    pub fn render(&mut self) -> TimelineResult<()> {
        RenderCoordinator::render(self)
    }

    /// Runs callbacks deferred by the last render (the one-shot `Loaded` event).
    pub fn flush_deferred(&mut self) {
        RenderCoordinator::flush_deferred(self);
    }

    /// Registers a plugin; ids must be unique.
    pub fn register_plugin(&mut self, plugin: Box<dyn TimelinePlugin>) -> TimelineResult<()> {
        if self
            .core
            .plugins
            .iter()
            .any(|registered| registered.id() == plugin.id())
        {
            return Err(TimelineError::InvalidData(format!(
                "plugin `{}` is already registered",
                plugin.id()
            )));
        }
        self.core.plugins.push(plugin);
        Ok(())
    }

    /// Removes a plugin by id; returns whether one was registered.
    pub fn unregister_plugin(&mut self, id: &str) -> bool {
        let before = self.core.plugins.len();
        self.core.plugins.retain(|plugin| plugin.id() != id);
        self.core.plugins.len() != before
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.core.plugins.len()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
