use tracing::debug;

use crate::core::{Item, Row};
use crate::error::TimelineResult;
use crate::render::Renderer;

use super::{ConfigUpdate, TimelineConfig, TimelineEngine, engine_core::EngineCore};

impl<R: Renderer> TimelineEngine<R> {
    /// Creates an engine and runs the first recompute.
    ///
    /// A zero viewport width is accepted: manual zoom still produces a window,
    /// while calculated zoom mode waits until the width is set.
    pub fn new(renderer: R, config: TimelineConfig) -> TimelineResult<Self> {
        config.validate()?;
        let mut engine = Self {
            renderer,
            core: EngineCore::new(config),
        };
        engine.rebuild_tree();
        engine.refresh_visible_rows();
        let outcome = engine.on_time_inputs_changed()?;
        debug!(?outcome, "timeline engine initialized");
        Ok(engine)
    }

    /// Creates an engine already populated with rows and items.
    pub fn with_data(
        renderer: R,
        config: TimelineConfig,
        rows: Vec<Row>,
        items: Vec<Item>,
    ) -> TimelineResult<Self> {
        let mut engine = Self::new(renderer, config)?;
        engine.apply_updates([ConfigUpdate::SetRows(rows), ConfigUpdate::SetItems(items)])?;
        Ok(engine)
    }
}
