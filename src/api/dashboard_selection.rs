use tracing::debug;

use crate::core::primitives::require_finite;
use crate::core::{AggregateHandle, AttributeId, ComparisonSlot, IntervalRange, RecordId};
use crate::error::{SummaryError, SummaryResult};

use super::Dashboard;
use super::comparison::LockedComparison;
use super::events::SummaryEvent;
use super::sanitize::sanitize_range;

impl Dashboard {
    /// Locks `min..max` of `id` into comparison `slot`.
    ///
    /// The range is clipped against other comparisons locked on the same
    /// attribute. Returns the locked range, or `None` when nothing is left
    /// to select, in which case the slot keeps its previous state.
    pub fn lock_comparison(
        &mut self,
        slot: u8,
        id: AttributeId,
        min: f64,
        max: f64,
    ) -> SummaryResult<Option<IntervalRange>> {
        let slot = comparison_slot(slot)?;
        let min = require_finite(min, "comparison min")?;
        let max = require_finite(max, "comparison max")?;
        let attribute = self
            .attributes
            .get(&id)
            .ok_or(SummaryError::UnknownAttribute(id))?;
        if attribute.extent().is_none() {
            return Ok(None);
        }

        let candidate = attribute.normalize_range(min, max);
        let existing = self.comparisons.ranges_on(id, slot);
        let (min, max) = sanitize_range((candidate.min, candidate.max), &existing);
        if min == max {
            debug!(attribute = %id, slot = slot.index(), "comparison range collapsed");
            return Ok(None);
        }
        let range = attribute.normalize_range(min, max);

        let values = attribute.values();
        self.comparisons.lock(
            slot,
            LockedComparison {
                attribute: id,
                range,
            },
            |record| values[record].is_some_and(|value| range.contains(value)),
        );
        self.events.push(SummaryEvent::ComparisonLocked {
            slot,
            attribute: id,
        });
        self.refresh_measures();
        Ok(Some(range))
    }

    pub fn clear_comparison(&mut self, slot: u8) -> SummaryResult<bool> {
        let slot = comparison_slot(slot)?;
        if !self.comparisons.clear(slot) {
            return Ok(false);
        }
        self.events.push(SummaryEvent::ComparisonCleared { slot });
        self.refresh_measures();
        Ok(true)
    }

    pub fn comparison_range(&self, slot: u8) -> SummaryResult<Option<LockedComparison>> {
        Ok(self.comparisons.get(comparison_slot(slot)?))
    }

    pub fn is_record_in_comparison(&self, slot: u8, record: RecordId) -> SummaryResult<bool> {
        Ok(self.comparisons.contains(comparison_slot(slot)?, record))
    }

    /// Marks the records of `handle` as the highlight group.
    pub fn on_aggregate_highlight(&mut self, handle: AggregateHandle) -> SummaryResult<()> {
        self.aggregate(handle)?;
        if self.highlight == Some(handle) {
            return Ok(());
        }

        self.highlight_members.fill(false);
        if let Some(aggregate) = self
            .attributes
            .get(&handle.attribute)
            .and_then(|attribute| attribute.aggregate(handle.aggregate))
        {
            for &record in aggregate.records() {
                self.highlight_members[record] = true;
            }
        }
        self.highlight = Some(handle);
        self.events.push(SummaryEvent::HighlightChanged {
            aggregate: Some(handle),
        });
        self.refresh_measures();
        Ok(())
    }

    pub fn on_aggregate_leave(&mut self) {
        if self.clear_highlight() {
            self.refresh_measures();
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<AggregateHandle> {
        self.highlight
    }

    /// Drops the highlight group; measures are left to the caller.
    pub(super) fn clear_highlight(&mut self) -> bool {
        if self.highlight.take().is_none() {
            return false;
        }
        self.highlight_members.fill(false);
        self.events
            .push(SummaryEvent::HighlightChanged { aggregate: None });
        true
    }

    /// Measures become sums of `metric` instead of record counts; `None` restores counts.
    ///
    /// Missing or non-finite metric values weigh zero.
    pub fn set_metric(&mut self, metric: Option<Vec<Option<f64>>>) -> SummaryResult<()> {
        if let Some(values) = &metric {
            if values.len() != self.record_count {
                return Err(SummaryError::InvalidData(format!(
                    "expected {} metric values, got {}",
                    self.record_count,
                    values.len()
                )));
            }
        }
        self.metric = metric.map(|values| {
            values
                .into_iter()
                .map(|value| value.filter(|value| value.is_finite()))
                .collect()
        });
        self.events.push(SummaryEvent::MetricChanged);
        self.refresh_measures();
        Ok(())
    }
}

fn comparison_slot(slot: u8) -> SummaryResult<ComparisonSlot> {
    ComparisonSlot::new(slot).ok_or(SummaryError::InvalidComparisonSlot(slot))
}
