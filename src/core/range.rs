use serde::{Deserialize, Serialize};

use crate::error::{SummaryError, SummaryResult};

/// Min/max of the present values of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainExtent {
    pub min: f64,
    pub max: f64,
}

impl DomainExtent {
    pub fn new(min: f64, max: f64) -> SummaryResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(SummaryError::InvalidData(
                "domain extent must be finite".to_owned(),
            ));
        }
        Ok(Self {
            min: min.min(max),
            max: min.max(max),
        })
    }

    /// Extent of the finite values yielded by `values`, `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            if !value.is_finite() {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
        }
        if min > max {
            return None;
        }
        Some(Self { min, max })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Rules applied by [`IntervalRange::normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizePolicy {
    pub integer: bool,
    pub extent: Option<DomainExtent>,
}

/// Ordered `(min, max)` pair over a scalar domain.
///
/// Bins are right-open unless `max_included` is set, which only the topmost
/// bin of a tiling carries. Every present value therefore maps to exactly one
/// bin of a contiguous tiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub max_included: bool,
}

impl IntervalRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            max_included: false,
        }
    }

    #[must_use]
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            max_included: true,
        }
    }

    #[must_use]
    pub fn with_max_included(mut self, max_included: bool) -> Self {
        self.max_included = max_included;
        self
    }

    /// Swaps reversed bounds, snaps integer ranges outward and clamps into the
    /// original extent. Applying it twice changes nothing.
    #[must_use]
    pub fn normalize(self, policy: NormalizePolicy) -> Self {
        let mut min = self.min.min(self.max);
        let mut max = self.min.max(self.max);
        if policy.integer {
            min = min.floor();
            max = max.ceil();
        }
        if let Some(extent) = policy.extent {
            min = extent.clamp(min);
            max = extent.clamp(max);
        }
        Self {
            min,
            max,
            max_included: self.max_included,
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if value == self.max {
            return self.max_included;
        }
        // NaN fails both comparisons above.
        !value.is_nan()
    }

    /// True when the lower bound sits above the original extent minimum.
    #[must_use]
    pub fn is_min_larger(&self, extent: DomainExtent) -> bool {
        self.min > extent.min
    }

    /// True when the upper bound sits below the original extent maximum.
    #[must_use]
    pub fn is_max_smaller(&self, extent: DomainExtent) -> bool {
        self.max < extent.max
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn same_bounds(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.max_included == other.max_included
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainExtent, IntervalRange, NormalizePolicy};

    #[test]
    fn contains_is_right_open_unless_max_included() {
        let open = IntervalRange::new(10.0, 20.0);
        assert!(open.contains(10.0));
        assert!(open.contains(19.999));
        assert!(!open.contains(20.0));
        assert!(!open.contains(9.0));
        assert!(!open.contains(f64::NAN));

        let closed = open.with_max_included(true);
        assert!(closed.contains(20.0));
        assert!(!closed.contains(20.5));
    }

    #[test]
    fn normalize_swaps_snaps_and_clamps() {
        let policy = NormalizePolicy {
            integer: true,
            extent: Some(DomainExtent::new(0.0, 100.0).expect("extent")),
        };
        let range = IntervalRange::new(120.4, 10.6).normalize(policy);
        assert_eq!(range.min, 10.0);
        assert_eq!(range.max, 100.0);
    }

    #[test]
    fn extent_ignores_non_finite_values() {
        let extent = DomainExtent::from_values([3.0, f64::NAN, -1.0, f64::INFINITY, 7.5])
            .expect("extent");
        assert_eq!(extent.min, -1.0);
        assert_eq!(extent.max, 7.5);
        assert!(DomainExtent::from_values([f64::NAN]).is_none());
    }
}
