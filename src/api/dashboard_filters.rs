use std::time::Instant;

use tracing::{debug, warn};

use crate::core::primitives::require_finite;
use crate::core::{AggregateHandle, AttributeId, RecordId};
use crate::error::{SummaryError, SummaryResult};

use super::Dashboard;
use super::filter::{FilterState, MissingMode, update_fail_counts};
use super::filter_spec::{FilterSet, FilterSpec};
use super::events::SummaryEvent;

/// What [`Dashboard::schedule_range_filter`] did with a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Applied right away (zero commit delay); `false` when it was a no-op.
    Applied(bool),
    /// Waiting until `due`; see [`Dashboard::poll_commits`].
    Scheduled { due: Instant },
}

impl Dashboard {
    /// Filters `id` to `min..max` after normalization.
    ///
    /// Returns `false` without touching state when the normalized range is
    /// degenerate or the attribute has no values. Supersedes any pending
    /// debounced commit of the attribute.
    pub fn set_range_filter(&mut self, id: AttributeId, min: f64, max: f64) -> SummaryResult<bool> {
        let min = require_finite(min, "range min")?;
        let max = require_finite(max, "range max")?;
        let attribute = self.attribute(id)?;
        if attribute.extent().is_none() {
            debug!(attribute = %id, "range filter ignored, attribute has no values");
            return Ok(false);
        }
        let range = attribute.normalize_range(min, max);
        if range.is_degenerate() {
            debug!(attribute = %id, min, max, "degenerate range filter ignored");
            return Ok(false);
        }

        self.scheduler.cancel(id);
        self.apply_filter_state(id, FilterState::Range(range))?;
        self.events.push(SummaryEvent::FilterChanged { attribute: id });
        Ok(true)
    }

    /// Filters to the bounds of one aggregate; the missing-value sentinel
    /// becomes a missing filter.
    pub fn set_range_filter_from_aggregate(&mut self, handle: AggregateHandle) -> SummaryResult<bool> {
        let attribute = self.attribute(handle.attribute)?;
        let aggregate = self.aggregate(handle)?;
        if aggregate.id() == attribute.missing_aggregate().id() {
            self.set_missing_filter(handle.attribute, MissingMode::In)?;
            return Ok(true);
        }
        // Inclusion depends on the bounds only; exported specs carry no flag.
        let bounds = aggregate.range();
        let range = attribute.normalize_range(bounds.min, bounds.max);
        if range.is_degenerate() {
            debug!(aggregate = %handle.aggregate, "degenerate aggregate range ignored");
            return Ok(false);
        }

        self.scheduler.cancel(handle.attribute);
        self.apply_filter_state(handle.attribute, FilterState::Range(range))?;
        self.events.push(SummaryEvent::FilterChanged {
            attribute: handle.attribute,
        });
        Ok(true)
    }

    pub fn set_missing_filter(&mut self, id: AttributeId, mode: MissingMode) -> SummaryResult<()> {
        self.attribute(id)?;
        self.scheduler.cancel(id);
        self.apply_filter_state(id, FilterState::Missing(mode))?;
        self.events.push(SummaryEvent::FilterChanged { attribute: id });
        Ok(())
    }

    /// Returns whether a filter was active.
    pub fn clear_filter(&mut self, id: AttributeId) -> SummaryResult<bool> {
        self.scheduler.cancel(id);
        self.release_filter(id)
    }

    pub fn clear_all_filters(&mut self) -> SummaryResult<usize> {
        let mut cleared = 0;
        for id in self.attribute_ids() {
            if self.clear_filter(id)? {
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    pub(super) fn release_filter(&mut self, id: AttributeId) -> SummaryResult<bool> {
        if !self.attribute(id)?.filter().is_active() {
            return Ok(false);
        }
        self.apply_filter_state(id, FilterState::Inactive)?;
        self.events.push(SummaryEvent::FilterCleared { attribute: id });
        Ok(true)
    }

    fn apply_filter_state(&mut self, id: AttributeId, state: FilterState) -> SummaryResult<()> {
        let attribute = self
            .attributes
            .get_mut(&id)
            .ok_or(SummaryError::UnknownAttribute(id))?;
        let extent = attribute.extent;
        let previous = attribute.filter.apply(state, &attribute.values, extent);
        update_fail_counts(
            &mut self.fail_counts,
            previous.as_deref(),
            attribute.filter.pass_cache(),
        );
        let zoomed = attribute.zoomed;
        debug!(
            attribute = %id,
            state = ?state,
            active = self.active_record_count(),
            "filter applied"
        );

        if zoomed {
            self.rebin_attribute(id)?;
        }
        self.refresh_measures();
        Ok(())
    }

    /// True when the record passes every active filter.
    #[must_use]
    pub fn is_record_active(&self, record: RecordId) -> bool {
        self.fail_counts.get(record).is_some_and(|&count| count == 0)
    }

    #[must_use]
    pub fn active_record_count(&self) -> usize {
        self.fail_counts.iter().filter(|&&count| count == 0).count()
    }

    /// Queues a drag-driven range; applied by [`Self::poll_commits`] once the
    /// configured delay passes without a newer range for the same attribute.
    pub fn schedule_range_filter(
        &mut self,
        id: AttributeId,
        min: f64,
        max: f64,
        now: Instant,
    ) -> SummaryResult<CommitOutcome> {
        self.attribute(id)?;
        let min = require_finite(min, "range min")?;
        let max = require_finite(max, "range max")?;
        if self.scheduler.is_immediate() {
            return self.set_range_filter(id, min, max).map(CommitOutcome::Applied);
        }
        let due = self.scheduler.schedule(id, min, max, now);
        Ok(CommitOutcome::Scheduled { due })
    }

    /// Applies every commit due at `now`; returns the attributes whose filter changed.
    pub fn poll_commits(&mut self, now: Instant) -> SummaryResult<Vec<AttributeId>> {
        let mut applied = Vec::new();
        for (id, commit) in self.scheduler.take_due(now) {
            if self.set_range_filter(id, commit.min, commit.max)? {
                applied.push(id);
            }
        }
        Ok(applied)
    }

    pub fn cancel_pending(&mut self, id: AttributeId) -> bool {
        self.scheduler.cancel(id)
    }

    #[must_use]
    pub fn next_commit_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn export_filter(&self, id: AttributeId) -> SummaryResult<Option<FilterSpec>> {
        let attribute = self.attribute(id)?;
        Ok(match attribute.filter().state() {
            FilterState::Inactive => None,
            FilterState::Range(range) => Some(FilterSpec::from_range(&range, attribute.kind())),
            FilterState::Missing(missing) => Some(FilterSpec::Missing { missing }),
        })
    }

    /// Restores a filter produced by [`Self::export_filter`].
    pub fn import_filter(&mut self, id: AttributeId, spec: &FilterSpec) -> SummaryResult<bool> {
        match *spec {
            FilterSpec::Range { min, max } => {
                self.set_range_filter(id, min.to_value(), max.to_value())
            }
            FilterSpec::Missing { missing } => {
                self.set_missing_filter(id, missing)?;
                Ok(true)
            }
        }
    }

    /// Active filters of every attribute as a versioned JSON document keyed by name.
    pub fn export_filters_json(&self) -> SummaryResult<String> {
        let mut set = FilterSet::default();
        for attribute in self.attributes.values() {
            if let Some(spec) = self.export_filter(attribute.id())? {
                set.filters.insert(attribute.name().to_owned(), spec);
            }
        }
        set.to_json_contract_v1_pretty()
    }

    /// Replaces all filters with the ones in `input`.
    ///
    /// Unknown attribute names are skipped. Returns the number of filters applied.
    pub fn import_filters_json(&mut self, input: &str) -> SummaryResult<usize> {
        let set = FilterSet::from_json_compat_str(input)?;
        self.clear_all_filters()?;

        let mut applied = 0;
        for (name, spec) in &set.filters {
            let Some(id) = self.attribute_by_name(name).map(|attribute| attribute.id()) else {
                warn!(name = %name, "filter for unknown attribute skipped");
                continue;
            };
            if self.import_filter(id, spec)? {
                applied += 1;
            }
        }
        Ok(applied)
    }
}
