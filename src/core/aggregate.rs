use serde::{Deserialize, Serialize};

use crate::core::range::IntervalRange;
use crate::core::types::{AggregateId, AttributeId, RecordId};

/// Number of concurrently lockable comparison groups.
pub const COMPARISON_SLOTS: usize = 5;

/// One of the lockable comparison groups, `0..COMPARISON_SLOTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComparisonSlot(u8);

impl ComparisonSlot {
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < COMPARISON_SLOTS).then_some(Self(index))
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn mask(self) -> u8 {
        1 << self.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..COMPARISON_SLOTS as u8).map(Self)
    }
}

/// Record subsets an aggregate is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureGroup {
    Total,
    Active,
    Highlight,
    Compare(ComparisonSlot),
}

/// Cached per-group measures (record count, or metric sum when a metric is set).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateMeasures {
    pub total: f64,
    pub active: f64,
    pub highlight: f64,
    pub compare: [f64; COMPARISON_SLOTS],
}

impl AggregateMeasures {
    #[must_use]
    pub fn get(&self, group: MeasureGroup) -> f64 {
        match group {
            MeasureGroup::Total => self.total,
            MeasureGroup::Active => self.active,
            MeasureGroup::Highlight => self.highlight,
            MeasureGroup::Compare(slot) => self.compare[slot.index()],
        }
    }
}

/// A bin: a range of one attribute plus the records whose value falls in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    id: AggregateId,
    owner: AttributeId,
    range: IntervalRange,
    records: Vec<RecordId>,
    measures: AggregateMeasures,
}

impl Aggregate {
    #[must_use]
    pub fn new(id: AggregateId, owner: AttributeId, range: IntervalRange) -> Self {
        Self {
            id,
            owner,
            range,
            records: Vec::new(),
            measures: AggregateMeasures::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> AggregateId {
        self.id
    }

    /// Attribute owning this aggregate. Lookup only, never ownership.
    #[must_use]
    pub fn owner(&self) -> AttributeId {
        self.owner
    }

    #[must_use]
    pub fn range(&self) -> &IntervalRange {
        &self.range
    }

    #[must_use]
    pub fn records(&self) -> &[RecordId] {
        &self.records
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn measures(&self) -> &AggregateMeasures {
        &self.measures
    }

    #[must_use]
    pub fn measure(&self, group: MeasureGroup) -> f64 {
        self.measures.get(group)
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.range.contains(value)
    }

    pub(crate) fn push_record(&mut self, record: RecordId) {
        self.records.push(record);
    }

    pub(crate) fn set_measures(&mut self, measures: AggregateMeasures) {
        self.measures = measures;
    }

    /// Drops all member records and cached measures.
    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.measures = AggregateMeasures::default();
    }
}
