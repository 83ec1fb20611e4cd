use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::primitives::datetime_to_unix_seconds;
use crate::core::{
    Aggregate, AggregateHandle, AttributeId, RecordId, ScaleType,
};
use crate::error::{SummaryError, SummaryResult};

use super::attribute::{IntervalAttribute, Percentiles};
use super::binning::RebinOutcome;
use super::commit_scheduler::CommitScheduler;
use super::comparison::ComparisonState;
use super::config::{AttributeConfig, SummaryConfig};
use super::events::SummaryEvent;
use super::filter_spec::RangeSnapshot;
use super::registry::AggregateRegistry;

/// Value domain requested by [`Dashboard::add_attribute_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Numeric,
    /// Accessor yields Unix seconds.
    Time,
}

/// Context owning every interval attribute of one record table.
///
/// Every mutation goes through this facade; cached measures are refreshed
/// before each call returns.
#[derive(Debug)]
pub struct Dashboard {
    pub(super) config: SummaryConfig,
    pub(super) record_count: usize,
    pub(super) attributes: IndexMap<AttributeId, IntervalAttribute>,
    pub(super) registry: AggregateRegistry,
    /// Number of active filters each record fails.
    pub(super) fail_counts: Vec<u32>,
    pub(super) comparisons: ComparisonState,
    pub(super) highlight: Option<AggregateHandle>,
    pub(super) highlight_members: Vec<bool>,
    pub(super) metric: Option<Vec<Option<f64>>>,
    pub(super) scheduler: CommitScheduler,
    pub(super) events: Vec<SummaryEvent>,
    next_attribute: u32,
}

impl Dashboard {
    pub fn new(config: SummaryConfig, record_count: usize) -> SummaryResult<Self> {
        let config = config.validate()?;
        debug!(record_count, "dashboard created");
        Ok(Self {
            config,
            record_count,
            attributes: IndexMap::new(),
            registry: AggregateRegistry::new(),
            fail_counts: vec![0; record_count],
            comparisons: ComparisonState::new(record_count),
            highlight: None,
            highlight_members: vec![false; record_count],
            metric: None,
            scheduler: CommitScheduler::new(Duration::from_millis(config.commit_delay_ms)),
            events: Vec::new(),
            next_attribute: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn add_numeric_attribute(
        &mut self,
        config: AttributeConfig,
        values: Vec<Option<f64>>,
    ) -> SummaryResult<AttributeId> {
        self.insert_attribute(config, false, values)
    }

    pub fn add_time_attribute(
        &mut self,
        config: AttributeConfig,
        values: Vec<Option<DateTime<Utc>>>,
    ) -> SummaryResult<AttributeId> {
        let values = values
            .into_iter()
            .map(|value| value.map(datetime_to_unix_seconds))
            .collect();
        self.insert_attribute(config, true, values)
    }

    /// Adds an attribute whose values come from `accessor`, called once per record.
    pub fn add_attribute_with(
        &mut self,
        config: AttributeConfig,
        kind: AttributeKind,
        accessor: impl Fn(RecordId) -> Option<f64>,
    ) -> SummaryResult<AttributeId> {
        let values = (0..self.record_count).map(accessor).collect();
        self.insert_attribute(config, kind == AttributeKind::Time, values)
    }

    fn insert_attribute(
        &mut self,
        config: AttributeConfig,
        time: bool,
        values: Vec<Option<f64>>,
    ) -> SummaryResult<AttributeId> {
        self.check_record_count(values.len())?;
        if let Some(width_px) = config.width_px {
            check_width(width_px)?;
        }
        if self.attribute_by_name(&config.name).is_some() {
            return Err(SummaryError::InvalidData(format!(
                "duplicate attribute name: {}",
                config.name
            )));
        }

        let id = AttributeId(self.next_attribute);
        self.next_attribute += 1;
        let attribute =
            IntervalAttribute::new(id, &config, time, values, &self.config, &mut self.registry);
        self.attributes.insert(id, attribute);
        debug!(attribute = %id, name = %config.name, "attribute added");

        self.rebin_attribute(id)?;
        self.refresh_attribute_measures(id);
        Ok(id)
    }

    /// Reloads the values of `id`; its filter, comparisons and pending commit are dropped.
    pub fn reset_attribute_values(
        &mut self,
        id: AttributeId,
        values: Vec<Option<f64>>,
    ) -> SummaryResult<()> {
        self.check_record_count(values.len())?;
        self.attribute(id)?;

        self.scheduler.cancel(id);
        self.release_filter(id)?;
        for slot in self.comparisons.slots_on(id) {
            self.comparisons.clear(slot);
            self.events.push(SummaryEvent::ComparisonCleared { slot });
        }
        if self.highlight.is_some_and(|handle| handle.attribute == id) {
            self.clear_highlight();
        }

        let attribute = self
            .attributes
            .get_mut(&id)
            .ok_or(SummaryError::UnknownAttribute(id))?;
        attribute.load_values(values, &mut self.registry);
        self.rebin_attribute(id)?;
        self.refresh_measures();
        Ok(())
    }

    pub fn set_width_px(&mut self, id: AttributeId, width_px: f64) -> SummaryResult<RebinOutcome> {
        check_width(width_px)?;
        self.attribute_mut(id)?.width_px = width_px;
        self.rebin_attribute(id)
    }

    pub fn set_scale_type(
        &mut self,
        id: AttributeId,
        scale_type: ScaleType,
    ) -> SummaryResult<RebinOutcome> {
        self.attribute_mut(id)?.set_scale_type(scale_type);
        self.rebin_attribute(id)
    }

    /// Switches the binned domain between the full extent and the filter range.
    pub fn set_zoomed(&mut self, id: AttributeId, zoomed: bool) -> SummaryResult<RebinOutcome> {
        self.attribute_mut(id)?.zoomed = zoomed;
        self.rebin_attribute(id)
    }

    pub fn rebin(&mut self, id: AttributeId) -> SummaryResult<RebinOutcome> {
        self.rebin_attribute(id)
    }

    pub(super) fn rebin_attribute(&mut self, id: AttributeId) -> SummaryResult<RebinOutcome> {
        let attribute = self
            .attributes
            .get_mut(&id)
            .ok_or(SummaryError::UnknownAttribute(id))?;
        let outcome = attribute.rebin(&mut self.registry, &self.config);
        if outcome.aborted {
            if attribute.extent().is_some() {
                warn!(attribute = %id, "binning aborted, previous bins kept");
            }
            return Ok(outcome);
        }

        let stale_highlight = self
            .highlight
            .is_some_and(|handle| !self.registry.contains(handle));
        if stale_highlight && self.clear_highlight() {
            self.refresh_measures();
        } else if outcome.created > 0 {
            self.refresh_attribute_measures(id);
        }
        self.events.push(SummaryEvent::Rebinned {
            attribute: id,
            outcome,
        });
        Ok(outcome)
    }

    #[must_use]
    pub fn attribute_ids(&self) -> Vec<AttributeId> {
        self.attributes.keys().copied().collect()
    }

    pub fn attribute(&self, id: AttributeId) -> SummaryResult<&IntervalAttribute> {
        self.attributes
            .get(&id)
            .ok_or(SummaryError::UnknownAttribute(id))
    }

    pub(super) fn attribute_mut(&mut self, id: AttributeId) -> SummaryResult<&mut IntervalAttribute> {
        self.attributes
            .get_mut(&id)
            .ok_or(SummaryError::UnknownAttribute(id))
    }

    #[must_use]
    pub fn attribute_by_name(&self, name: &str) -> Option<&IntervalAttribute> {
        self.attributes
            .values()
            .find(|attribute| attribute.name() == name)
    }

    pub fn aggregates(&self, id: AttributeId) -> SummaryResult<&[Aggregate]> {
        Ok(self.attribute(id)?.aggregates())
    }

    pub fn missing_aggregate(&self, id: AttributeId) -> SummaryResult<&Aggregate> {
        Ok(self.attribute(id)?.missing_aggregate())
    }

    /// Live aggregate behind `handle`, including missing-value sentinels.
    pub fn aggregate(&self, handle: AggregateHandle) -> SummaryResult<&Aggregate> {
        if !self.registry.contains(handle) {
            return Err(SummaryError::UnknownAggregate(handle.aggregate));
        }
        self.attribute(handle.attribute)?
            .aggregate(handle.aggregate)
            .ok_or(SummaryError::UnknownAggregate(handle.aggregate))
    }

    pub fn aggregate_label(&self, handle: AggregateHandle) -> SummaryResult<String> {
        let attribute = self.attribute(handle.attribute)?;
        let aggregate = self.aggregate(handle)?;
        if aggregate.id() == attribute.missing_aggregate().id() {
            return Ok("Missing".to_owned());
        }
        attribute.label(aggregate.range()).ok_or_else(|| {
            SummaryError::InvalidData(format!("attribute {} has no values", handle.attribute))
        })
    }

    pub fn aggregate_snapshot(&self, handle: AggregateHandle) -> SummaryResult<RangeSnapshot> {
        let attribute = self.attribute(handle.attribute)?;
        let aggregate = self.aggregate(handle)?;
        if aggregate.id() == attribute.missing_aggregate().id() {
            return Err(SummaryError::InvalidData(
                "missing-value aggregate has no range".to_owned(),
            ));
        }
        Ok(RangeSnapshot::from_range(aggregate.range(), attribute.kind()))
    }

    #[must_use]
    pub fn registry(&self) -> &AggregateRegistry {
        &self.registry
    }

    pub fn percentiles(&self, id: AttributeId) -> SummaryResult<Option<Percentiles>> {
        Ok(self
            .attribute(id)?
            .percentiles(|record| self.is_record_active(record)))
    }

    /// Takes the notifications accumulated since the previous call.
    pub fn drain_events(&mut self) -> Vec<SummaryEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_record_count(&self, len: usize) -> SummaryResult<()> {
        if len != self.record_count {
            return Err(SummaryError::InvalidData(format!(
                "expected {} values, got {len}",
                self.record_count
            )));
        }
        Ok(())
    }
}

fn check_width(width_px: f64) -> SummaryResult<()> {
    if !width_px.is_finite() || width_px <= 0.0 {
        return Err(SummaryError::InvalidWidth { width_px });
    }
    Ok(())
}
