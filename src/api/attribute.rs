use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::{precision_for_step, round_to_millis};
use crate::core::{
    Aggregate, AggregateId, AttributeId, BinTicks, DomainExtent, IntervalRange, LabelContext,
    NormalizePolicy, RecordId, ScaleType, TimeResolution, ValueKind, ValueScale, range_label,
};

use super::config::{AttributeConfig, SummaryConfig};
use super::filter::RangeFilter;
use super::registry::AggregateRegistry;

/// Nearest-rank percentiles of the active values of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// A numeric or time attribute summarized as a histogram of aggregates.
#[derive(Debug, Clone)]
pub struct IntervalAttribute {
    pub(super) id: AttributeId,
    pub(super) name: String,
    pub(super) kind: ValueKind,
    pub(super) requested_scale: ScaleType,
    pub(super) scale_type: ScaleType,
    pub(super) values: Vec<Option<f64>>,
    /// Records with a present value, ascending by value.
    pub(super) sorted_records: Vec<RecordId>,
    pub(super) extent: Option<DomainExtent>,
    pub(super) resolution: Option<TimeResolution>,
    pub(super) width_px: f64,
    pub(super) zoomed: bool,
    pub(super) scale: Option<ValueScale>,
    pub(super) ticks: Option<BinTicks>,
    /// Sorted by descending range minimum.
    pub(super) aggregates: Vec<Aggregate>,
    pub(super) missing: Aggregate,
    pub(super) filter: RangeFilter,
    pub(super) max_label_precision: u32,
    log_scale_auto_ratio: f64,
    integer_hint: Option<bool>,
}

impl IntervalAttribute {
    pub(super) fn new(
        id: AttributeId,
        config: &AttributeConfig,
        time: bool,
        values: Vec<Option<f64>>,
        summary: &SummaryConfig,
        registry: &mut AggregateRegistry,
    ) -> Self {
        let missing_id = registry.register(id);
        let mut attribute = Self {
            id,
            name: config.name.clone(),
            kind: if time {
                ValueKind::Time
            } else {
                ValueKind::Numeric { integer: false }
            },
            requested_scale: config.scale_type,
            scale_type: ScaleType::Linear,
            values: Vec::new(),
            sorted_records: Vec::new(),
            extent: None,
            resolution: None,
            width_px: config.width_px.unwrap_or(summary.default_width_px),
            zoomed: false,
            scale: None,
            ticks: None,
            aggregates: Vec::new(),
            missing: Aggregate::new(missing_id, id, IntervalRange::new(f64::NAN, f64::NAN)),
            filter: RangeFilter::default(),
            max_label_precision: summary.max_label_precision,
            log_scale_auto_ratio: summary.log_scale_auto_ratio,
            integer_hint: config.integer,
        };
        attribute.load_values(values, registry);
        attribute
    }

    /// Replaces every value, dropping all aggregates and the filter state.
    ///
    /// Callers must release the filter's contribution to combined filtering
    /// beforehand.
    pub(super) fn load_values(&mut self, values: Vec<Option<f64>>, registry: &mut AggregateRegistry) {
        for aggregate in self.aggregates.drain(..) {
            registry.unregister(aggregate.id());
        }
        self.missing.clear();
        self.filter = RangeFilter::default();
        self.scale = None;
        self.ticks = None;

        // Non-finite values cannot be placed on a scale; treat them as missing.
        let time = self.kind.is_time();
        self.values = values
            .into_iter()
            .map(|value| {
                value
                    .filter(|value| value.is_finite())
                    .map(|value| if time { round_to_millis(value) } else { value })
            })
            .collect();

        let mut sorted: Vec<RecordId> = Vec::with_capacity(self.values.len());
        for (record, value) in self.values.iter().enumerate() {
            if value.is_some() {
                sorted.push(record);
            } else {
                self.missing.push_record(record);
            }
        }
        sorted.sort_by_key(|&record| OrderedFloat(self.values[record].unwrap_or(f64::NAN)));
        self.sorted_records = sorted;

        self.extent = match (self.sorted_records.first(), self.sorted_records.last()) {
            (Some(&first), Some(&last)) => self.values[first]
                .zip(self.values[last])
                .and_then(|(min, max)| DomainExtent::new(min, max).ok()),
            _ => None,
        };

        if !self.kind.is_time() {
            let integer = self.integer_hint.unwrap_or_else(|| {
                self.values
                    .iter()
                    .flatten()
                    .all(|value| value.fract() == 0.0)
            });
            self.kind = ValueKind::Numeric { integer };
        }
        self.resolution = if self.kind.is_time() {
            TimeResolution::detect(self.values.iter().flatten().copied())
        } else {
            None
        };
        self.scale_type =
            self.requested_scale
                .resolve(self.kind, self.extent, self.log_scale_auto_ratio);

        debug!(
            attribute = %self.id,
            records = self.values.len(),
            missing = self.missing.record_count(),
            scale = ?self.scale_type,
            "attribute values loaded"
        );
    }

    pub(super) fn set_scale_type(&mut self, scale_type: ScaleType) {
        self.requested_scale = scale_type;
        self.scale_type = scale_type.resolve(self.kind, self.extent, self.log_scale_auto_ratio);
    }

    #[must_use]
    pub fn id(&self) -> AttributeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Resolved scale type; never `Auto`.
    #[must_use]
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, record: RecordId) -> Option<f64> {
        self.values.get(record).copied().flatten()
    }

    #[must_use]
    pub fn extent(&self) -> Option<DomainExtent> {
        self.extent
    }

    #[must_use]
    pub fn resolution(&self) -> Option<TimeResolution> {
        self.resolution
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// Scale of the last successful binning pass.
    #[must_use]
    pub fn scale(&self) -> Option<ValueScale> {
        self.scale
    }

    #[must_use]
    pub fn ticks(&self) -> Option<&BinTicks> {
        self.ticks.as_ref()
    }

    #[must_use]
    pub fn aggregates(&self) -> &[Aggregate] {
        &self.aggregates
    }

    #[must_use]
    pub fn aggregate(&self, id: AggregateId) -> Option<&Aggregate> {
        if self.missing.id() == id {
            return Some(&self.missing);
        }
        self.aggregates.iter().find(|aggregate| aggregate.id() == id)
    }

    /// Sentinel aggregate of records without a value.
    #[must_use]
    pub fn missing_aggregate(&self) -> &Aggregate {
        &self.missing
    }

    #[must_use]
    pub fn filter(&self) -> &RangeFilter {
        &self.filter
    }

    #[must_use]
    pub fn normalize_policy(&self) -> NormalizePolicy {
        NormalizePolicy {
            integer: self.kind.is_integer(),
            extent: self.extent,
        }
    }

    /// Normalizes `min..max` the way user-facing range updates are applied.
    ///
    /// The upper bound is inclusive exactly when it reaches the extent maximum.
    #[must_use]
    pub fn normalize_range(&self, min: f64, max: f64) -> IntervalRange {
        let range = IntervalRange::new(min, max).normalize(self.normalize_policy());
        let touches_max = self
            .extent
            .is_some_and(|extent| !range.is_max_smaller(extent));
        range.with_max_included(touches_max)
    }

    /// Domain binned by the next pass: the whole extent, or the active
    /// filter's range while zoomed.
    #[must_use]
    pub fn active_domain(&self) -> Option<(f64, f64)> {
        let extent = self.extent?;
        if self.zoomed {
            if let Some(range) = self.filter.range() {
                return Some((range.min, range.max));
            }
        }
        Some((extent.min, extent.max))
    }

    #[must_use]
    pub fn label_context(&self) -> Option<LabelContext> {
        let extent = self.extent?;
        match self.kind {
            ValueKind::Time => Some(LabelContext::Time {
                extent,
                resolution: self.resolution.unwrap_or(TimeResolution::Second),
            }),
            ValueKind::Numeric { integer } => {
                let step = self
                    .ticks
                    .as_ref()
                    .map_or(extent.span() / 10.0, |ticks| ticks.step);
                Some(LabelContext::Numeric {
                    extent,
                    integer,
                    precision: precision_for_step(step, self.max_label_precision),
                })
            }
        }
    }

    #[must_use]
    pub fn label(&self, range: &IntervalRange) -> Option<String> {
        self.label_context()
            .map(|context| range_label(range, context))
    }

    /// Nearest-rank percentiles over records accepted by `is_active`.
    pub fn percentiles(&self, is_active: impl Fn(RecordId) -> bool) -> Option<Percentiles> {
        let active: Vec<f64> = self
            .sorted_records
            .iter()
            .filter(|&&record| is_active(record))
            .filter_map(|&record| self.value(record))
            .collect();
        if active.is_empty() {
            return None;
        }
        let rank = |p: f64| {
            let index = (p * active.len() as f64).ceil() as usize;
            active[index.clamp(1, active.len()) - 1]
        };
        Some(Percentiles {
            p10: rank(0.10),
            p25: rank(0.25),
            p50: rank(0.50),
            p75: rank(0.75),
            p90: rank(0.90),
        })
    }
}
