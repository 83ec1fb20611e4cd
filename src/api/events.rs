use serde::{Deserialize, Serialize};

use crate::core::{AggregateHandle, AttributeId, ComparisonSlot};

use super::binning::RebinOutcome;

/// State changes reported to hosts through [`super::Dashboard::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SummaryEvent {
    Rebinned {
        attribute: AttributeId,
        outcome: RebinOutcome,
    },
    FilterChanged {
        attribute: AttributeId,
    },
    FilterCleared {
        attribute: AttributeId,
    },
    ComparisonLocked {
        slot: ComparisonSlot,
        attribute: AttributeId,
    },
    ComparisonCleared {
        slot: ComparisonSlot,
    },
    HighlightChanged {
        aggregate: Option<AggregateHandle>,
    },
    MetricChanged,
}
