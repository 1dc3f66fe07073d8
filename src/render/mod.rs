mod frame;
mod null_renderer;

pub use frame::{ItemBox, RenderFrame};
pub use null_renderer::NullRenderer;

use crate::error::TimelineResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` so drawing code stays
/// isolated from window computation and tree virtualization.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()>;
}
