use thiserror::Error;

use crate::core::{AggregateId, AttributeId};

pub type SummaryResult<T> = Result<T, SummaryError>;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("invalid attribute width: {width_px}")]
    InvalidWidth { width_px: f64 },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(AttributeId),

    #[error("unknown aggregate: {0}")]
    UnknownAggregate(AggregateId),

    #[error("comparison slot out of range: {0}")]
    InvalidComparisonSlot(u8),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
