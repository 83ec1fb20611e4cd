pub mod aggregate;
pub mod label;
pub mod primitives;
pub mod range;
pub mod scale;
pub mod ticks;
pub mod time_ticks;
pub mod types;

pub use aggregate::{
    Aggregate, AggregateMeasures, COMPARISON_SLOTS, ComparisonSlot, MeasureGroup,
};
pub use label::{LabelContext, format_instant, range_label};
pub use range::{DomainExtent, IntervalRange, NormalizePolicy};
pub use scale::{BinTicks, ScaleType, TickPolicy, ValueScale};
pub use ticks::{NiceTicks, linear_ticks, log_ticks, tick_increment};
pub use time_ticks::{TimeInterval, TimeResolution, TimeTicks, TimeUnit, time_ticks};
pub use types::{AggregateHandle, AggregateId, AttributeId, RecordId, ValueKind, Viewport};
