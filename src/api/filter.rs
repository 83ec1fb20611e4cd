use serde::{Deserialize, Serialize};

use crate::core::{DomainExtent, IntervalRange};

/// Missing-value filter modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMode {
    /// Keep only records without a value.
    In,
    /// Keep only records with a value.
    Out,
}

/// Effective filter of one attribute. Range and missing filters exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterState {
    #[default]
    Inactive,
    Range(IntervalRange),
    Missing(MissingMode),
}

impl FilterState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

/// Range test specialized once per filter application.
///
/// Equivalent to [`IntervalRange::contains`] for values inside the extent,
/// minus the bound checks the extent already guarantees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundPredicate {
    Any,
    AtLeast { min: f64 },
    Below { max: f64, inclusive: bool },
    Between { min: f64, max: f64, inclusive: bool },
}

impl BoundPredicate {
    #[must_use]
    pub fn for_range(range: &IntervalRange, extent: Option<DomainExtent>) -> Self {
        let (min_free, max_free) = match extent {
            Some(extent) => (
                !range.is_min_larger(extent),
                !range.is_max_smaller(extent) && (range.max_included || range.max > extent.max),
            ),
            None => (false, false),
        };
        match (min_free, max_free) {
            (true, true) => Self::Any,
            (true, false) => Self::Below {
                max: range.max,
                inclusive: range.max_included,
            },
            (false, true) => Self::AtLeast { min: range.min },
            (false, false) => Self::Between {
                min: range.min,
                max: range.max,
                inclusive: range.max_included,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn test(self, value: f64) -> bool {
        match self {
            Self::Any => true,
            Self::AtLeast { min } => value >= min,
            Self::Below { max, inclusive: true } => value <= max,
            Self::Below { max, inclusive: false } => value < max,
            Self::Between {
                min,
                max,
                inclusive: true,
            } => value >= min && value <= max,
            Self::Between {
                min,
                max,
                inclusive: false,
            } => value >= min && value < max,
        }
    }
}

/// Filter of one attribute plus its cached per-record pass results.
#[derive(Debug, Clone, Default)]
pub struct RangeFilter {
    state: FilterState,
    passes: Vec<bool>,
}

impl RangeFilter {
    #[must_use]
    pub fn state(&self) -> FilterState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub fn range(&self) -> Option<IntervalRange> {
        match self.state {
            FilterState::Range(range) => Some(range),
            _ => None,
        }
    }

    #[must_use]
    pub fn missing(&self) -> Option<MissingMode> {
        match self.state {
            FilterState::Missing(mode) => Some(mode),
            _ => None,
        }
    }

    /// Cached result for `record`; every record passes an inactive filter.
    #[must_use]
    pub fn passes(&self, record: usize) -> bool {
        !self.state.is_active() || self.passes.get(record).copied().unwrap_or(false)
    }

    /// Pass results while active, `None` otherwise.
    #[must_use]
    pub fn pass_cache(&self) -> Option<&[bool]> {
        self.state.is_active().then_some(self.passes.as_slice())
    }

    /// Replaces the state and reclassifies every record.
    ///
    /// Returns the previous pass cache so callers can update combined
    /// filtering incrementally.
    pub(crate) fn apply(
        &mut self,
        state: FilterState,
        values: &[Option<f64>],
        extent: Option<DomainExtent>,
    ) -> Option<Vec<bool>> {
        let previous = if self.state.is_active() {
            Some(std::mem::take(&mut self.passes))
        } else {
            None
        };
        self.state = state;
        self.passes = classify(state, values, extent);
        previous
    }
}

fn classify(state: FilterState, values: &[Option<f64>], extent: Option<DomainExtent>) -> Vec<bool> {
    match state {
        FilterState::Inactive => Vec::new(),
        FilterState::Missing(MissingMode::In) => values.iter().map(Option::is_none).collect(),
        FilterState::Missing(MissingMode::Out) => values.iter().map(Option::is_some).collect(),
        FilterState::Range(range) => {
            let predicate = BoundPredicate::for_range(&range, extent);
            classify_range(predicate, values)
        }
    }
}

#[cfg(not(feature = "parallel-classification"))]
fn classify_range(predicate: BoundPredicate, values: &[Option<f64>]) -> Vec<bool> {
    values
        .iter()
        .map(|value| value.is_some_and(|value| predicate.test(value)))
        .collect()
}

#[cfg(feature = "parallel-classification")]
fn classify_range(predicate: BoundPredicate, values: &[Option<f64>]) -> Vec<bool> {
    use rayon::prelude::*;

    values
        .par_iter()
        .map(|value| value.is_some_and(|value| predicate.test(value)))
        .collect()
}

/// Folds one filter's old/new pass caches into per-record failure counts.
pub(crate) fn update_fail_counts(
    counts: &mut [u32],
    before: Option<&[bool]>,
    after: Option<&[bool]>,
) {
    for (record, count) in counts.iter_mut().enumerate() {
        let failed_before = before.is_some_and(|passes| !passes.get(record).copied().unwrap_or(false));
        let failed_after = after.is_some_and(|passes| !passes.get(record).copied().unwrap_or(false));
        match (failed_before, failed_after) {
            (false, true) => *count += 1,
            (true, false) => *count = count.saturating_sub(1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundPredicate, FilterState, MissingMode, RangeFilter, update_fail_counts};
    use crate::core::{DomainExtent, IntervalRange};

    fn extent() -> Option<DomainExtent> {
        DomainExtent::new(0.0, 100.0).ok()
    }

    #[test]
    fn predicate_matches_contains_for_every_shape() {
        let ranges = [
            IntervalRange::new(0.0, 100.0),
            IntervalRange::inclusive(0.0, 100.0),
            IntervalRange::new(0.0, 40.0),
            IntervalRange::inclusive(0.0, 40.0),
            IntervalRange::new(40.0, 100.0),
            IntervalRange::new(20.0, 40.0),
            IntervalRange::inclusive(20.0, 40.0),
        ];
        for range in ranges {
            let predicate = BoundPredicate::for_range(&range, extent());
            for step in 0..=200 {
                let value = f64::from(step) * 0.5;
                assert_eq!(
                    predicate.test(value),
                    range.contains(value),
                    "range {range:?} value {value}"
                );
            }
        }
    }

    #[test]
    fn touching_both_bounds_inclusively_is_any() {
        let predicate = BoundPredicate::for_range(&IntervalRange::inclusive(0.0, 100.0), extent());
        assert_eq!(predicate, BoundPredicate::Any);
    }

    #[test]
    fn missing_filter_ignores_range() {
        let values = [Some(1.0), None, Some(3.0)];
        let mut filter = RangeFilter::default();
        filter.apply(FilterState::Missing(MissingMode::In), &values, extent());
        assert!(!filter.passes(0));
        assert!(filter.passes(1));
        assert!(filter.range().is_none());

        let previous = filter.apply(FilterState::Inactive, &values, extent());
        assert_eq!(previous, Some(vec![false, true, false]));
        assert!(filter.passes(0));
    }

    #[test]
    fn fail_counts_follow_transitions() {
        let mut counts = vec![0, 0, 1];
        update_fail_counts(&mut counts, None, Some(&[true, false, false][..]));
        assert_eq!(counts, vec![0, 1, 2]);
        update_fail_counts(&mut counts, Some(&[true, false, false][..]), Some(&[false, true, false][..]));
        assert_eq!(counts, vec![1, 0, 2]);
        update_fail_counts(&mut counts, Some(&[false, true, false][..]), None);
        assert_eq!(counts, vec![0, 0, 1]);
    }
}
