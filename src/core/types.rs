use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a record in the dashboard record table.
pub type RecordId = usize;

/// Identity of one interval attribute inside a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(pub u32);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attr#{}", self.0)
    }
}

/// Dashboard-wide unique aggregate identity.
///
/// Ids are never reused, so a stale id simply fails lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregateId(pub u64);

impl fmt::Display for AggregateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aggr#{}", self.0)
    }
}

/// Stable handle to an aggregate: owning attribute plus aggregate id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateHandle {
    pub attribute: AttributeId,
    pub aggregate: AggregateId,
}

impl AggregateHandle {
    #[must_use]
    pub fn new(attribute: AttributeId, aggregate: AggregateId) -> Self {
        Self {
            attribute,
            aggregate,
        }
    }
}

/// Value domain of an interval attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Plain numbers. `integer` attributes bin on whole units.
    Numeric { integer: bool },
    /// Instants stored as Unix seconds (UTC).
    Time,
}

impl ValueKind {
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Numeric { integer: true })
    }

    #[must_use]
    pub fn is_time(self) -> bool {
        matches!(self, Self::Time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}
