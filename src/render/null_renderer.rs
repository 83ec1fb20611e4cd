use crate::error::SummaryResult;
use crate::render::{Renderer, SummaryFrame};

/// No-op renderer used by tests and headless dashboards.
///
/// It still validates frame content so tests catch invalid geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_bar_count: usize,
    pub last_tick_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &SummaryFrame) -> SummaryResult<()> {
        frame.validate()?;
        self.last_bar_count = frame.bars.len();
        self.last_tick_count = frame.ticks.len();
        self.frames_rendered += 1;
        Ok(())
    }
}
