mod frame;
mod null_renderer;
mod primitives;

pub use frame::{MissingBar, SummaryFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{BarHeights, BarPrimitive, TickPrimitive};

use crate::error::SummaryResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `SummaryFrame`, so drawing code
/// stays isolated from binning and filtering logic.
pub trait Renderer {
    fn render(&mut self, frame: &SummaryFrame) -> SummaryResult<()>;
}
