//! interval-summary: histogram summaries of numeric and time attributes.
//!
//! Each attribute of a record table is binned into aggregates on "nice"
//! boundaries. A range filter on one attribute narrows the active records
//! measured by every other attribute.
//!
//! Start from [`Dashboard`]; gestures go through
//! [`interaction::InteractionController`] and drawing through
//! [`render::Renderer`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{AttributeConfig, Dashboard, SummaryConfig};
pub use error::{SummaryError, SummaryResult};
