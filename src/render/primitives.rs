use serde::{Deserialize, Serialize};

use crate::core::{AggregateHandle, COMPARISON_SLOTS};
use crate::error::{SummaryError, SummaryResult};

/// Bar heights in pixels, one per measure group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarHeights {
    pub total: f64,
    pub active: f64,
    pub highlight: f64,
    pub compare: [f64; COMPARISON_SLOTS],
}

impl BarHeights {
    pub fn validate(&self, max_height: f64) -> SummaryResult<()> {
        let groups = [self.total, self.active, self.highlight]
            .into_iter()
            .chain(self.compare);
        for height in groups {
            if !height.is_finite() || height < 0.0 || height > max_height + 1e-9 {
                return Err(SummaryError::InvalidData(format!(
                    "bar height {height} must be finite and in [0, {max_height}]"
                )));
            }
        }
        Ok(())
    }
}

/// Draw command for one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPrimitive {
    pub aggregate: AggregateHandle,
    pub x_left: f64,
    pub x_right: f64,
    pub heights: BarHeights,
    pub label: String,
    /// Bin lies inside the active range filter.
    pub selected: bool,
}

impl BarPrimitive {
    pub fn validate(&self, max_height: f64) -> SummaryResult<()> {
        if !self.x_left.is_finite() || !self.x_right.is_finite() || self.x_left > self.x_right {
            return Err(SummaryError::InvalidData(
                "bar extent must be finite with x_left <= x_right".to_owned(),
            ));
        }
        self.heights.validate(max_height)
    }
}

/// Axis tick at a bin boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickPrimitive {
    pub x: f64,
    pub value: f64,
    pub label: String,
}

impl TickPrimitive {
    pub fn validate(&self) -> SummaryResult<()> {
        if !self.x.is_finite() || !self.value.is_finite() {
            return Err(SummaryError::InvalidData(
                "tick position must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}
