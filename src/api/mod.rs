mod attribute;
mod bin_ticks;
mod binning;
mod commit_scheduler;
mod comparison;
mod config;
mod dashboard;
mod dashboard_filters;
mod dashboard_interaction;
mod dashboard_selection;
mod events;
mod filter;
mod filter_spec;
mod measures;
mod registry;
mod sanitize;
mod summary_frame_builder;

pub use attribute::{IntervalAttribute, Percentiles};
pub use binning::RebinOutcome;
pub use commit_scheduler::{CommitScheduler, PendingCommit};
pub use comparison::LockedComparison;
pub use config::{AttributeConfig, SummaryConfig};
pub use dashboard::{AttributeKind, Dashboard};
pub use dashboard_filters::CommitOutcome;
pub use events::SummaryEvent;
pub use filter::{BoundPredicate, FilterState, MissingMode, RangeFilter};
pub use filter_spec::{
    FILTER_SET_JSON_SCHEMA_V1, FilterSet, FilterSetJsonContractV1, FilterSpec, RangeSnapshot,
    SpecValue,
};
pub use registry::AggregateRegistry;
pub use sanitize::sanitize_range;
