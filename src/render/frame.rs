use serde::{Deserialize, Serialize};

use crate::core::{AggregateHandle, AttributeId, Viewport};
use crate::error::{SummaryError, SummaryResult};
use crate::render::{BarHeights, BarPrimitive, TickPrimitive};

/// Backend-agnostic scene for one attribute histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFrame {
    pub attribute: AttributeId,
    pub viewport: Viewport,
    pub bars: Vec<BarPrimitive>,
    pub ticks: Vec<TickPrimitive>,
    /// Bar of the missing-value aggregate; `None` when every record has a value.
    pub missing: Option<MissingBar>,
    /// Pixel span of the active range filter.
    pub filter_span: Option<(f64, f64)>,
}

/// Missing-value aggregate, drawn apart from the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingBar {
    pub aggregate: AggregateHandle,
    pub heights: BarHeights,
}

impl SummaryFrame {
    #[must_use]
    pub fn new(attribute: AttributeId, viewport: Viewport) -> Self {
        Self {
            attribute,
            viewport,
            bars: Vec::new(),
            ticks: Vec::new(),
            missing: None,
            filter_span: None,
        }
    }

    pub fn validate(&self) -> SummaryResult<()> {
        if !self.viewport.is_valid() {
            return Err(SummaryError::InvalidData(format!(
                "invalid viewport: {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        let max_height = f64::from(self.viewport.height);
        for bar in &self.bars {
            bar.validate(max_height)?;
        }
        for tick in &self.ticks {
            tick.validate()?;
        }
        if let Some(missing) = &self.missing {
            missing.heights.validate(max_height)?;
        }
        if let Some((start, end)) = self.filter_span {
            if !start.is_finite() || !end.is_finite() || start > end {
                return Err(SummaryError::InvalidData(
                    "filter span must be finite and ordered".to_owned(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty() && self.ticks.is_empty() && self.missing.is_none()
    }
}
