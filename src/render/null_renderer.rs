use crate::error::TimelineResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: usize,
    pub last_row_count: usize,
    pub last_item_count: usize,
    pub last_cell_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.frames += 1;
        self.last_row_count = frame.visible_rows.len();
        self.last_item_count = frame.item_boxes.len();
        self.last_cell_count = frame.time_window.levels.iter().map(Vec::len).sum();
        Ok(())
    }
}
