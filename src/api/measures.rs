use crate::core::{Aggregate, AggregateMeasures, AttributeId, RecordId};

use super::Dashboard;
use super::attribute::IntervalAttribute;

/// Borrowed dashboard state the measure pass reads.
pub(super) struct MeasureContext<'a> {
    pub(super) fail_counts: &'a [u32],
    pub(super) membership: &'a [u8],
    pub(super) highlight: &'a [bool],
    pub(super) metric: Option<&'a [Option<f64>]>,
}

impl MeasureContext<'_> {
    fn weight(&self, record: RecordId) -> f64 {
        match self.metric {
            Some(metric) => metric.get(record).copied().flatten().unwrap_or(0.0),
            None => 1.0,
        }
    }

    /// Highlight and comparison groups only count records passing every filter.
    fn measure(&self, aggregate: &Aggregate) -> AggregateMeasures {
        let mut measures = AggregateMeasures::default();
        for &record in aggregate.records() {
            let weight = self.weight(record);
            measures.total += weight;
            if self.fail_counts.get(record).copied().unwrap_or(0) != 0 {
                continue;
            }
            measures.active += weight;
            if self.highlight.get(record).copied().unwrap_or(false) {
                measures.highlight += weight;
            }
            let bits = self.membership.get(record).copied().unwrap_or(0);
            if bits == 0 {
                continue;
            }
            for (slot, value) in measures.compare.iter_mut().enumerate() {
                if bits & (1 << slot) != 0 {
                    *value += weight;
                }
            }
        }
        measures
    }
}

impl IntervalAttribute {
    pub(super) fn refresh_measures(&mut self, context: &MeasureContext<'_>) {
        for aggregate in &mut self.aggregates {
            let measures = context.measure(aggregate);
            aggregate.set_measures(measures);
        }
        let measures = context.measure(&self.missing);
        self.missing.set_measures(measures);
    }
}

impl Dashboard {
    /// Recomputes cached measures of every aggregate of every attribute.
    pub(super) fn refresh_measures(&mut self) {
        let context = MeasureContext {
            fail_counts: &self.fail_counts,
            membership: self.comparisons.membership(),
            highlight: &self.highlight_members,
            metric: self.metric.as_deref(),
        };
        for attribute in self.attributes.values_mut() {
            attribute.refresh_measures(&context);
        }
    }

    pub(super) fn refresh_attribute_measures(&mut self, id: AttributeId) {
        let context = MeasureContext {
            fail_counts: &self.fail_counts,
            membership: self.comparisons.membership(),
            highlight: &self.highlight_members,
            metric: self.metric.as_deref(),
        };
        if let Some(attribute) = self.attributes.get_mut(&id) {
            attribute.refresh_measures(&context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MeasureContext;
    use crate::core::{Aggregate, AggregateId, AttributeId, IntervalRange};

    #[test]
    fn groups_count_only_active_records() {
        let mut aggregate = Aggregate::new(AggregateId(0), AttributeId(0), IntervalRange::new(0.0, 1.0));
        for record in 0..4 {
            aggregate.push_record(record);
        }
        let context = MeasureContext {
            fail_counts: &[0, 1, 0, 0],
            membership: &[0b01, 0b01, 0b10, 0],
            highlight: &[true, true, false, false],
            metric: None,
        };
        let measures = context.measure(&aggregate);
        assert_eq!(measures.total, 4.0);
        assert_eq!(measures.active, 3.0);
        assert_eq!(measures.highlight, 1.0);
        assert_eq!(measures.compare[0], 1.0);
        assert_eq!(measures.compare[1], 1.0);
    }

    #[test]
    fn metric_sums_replace_counts() {
        let mut aggregate = Aggregate::new(AggregateId(0), AttributeId(0), IntervalRange::new(0.0, 1.0));
        aggregate.push_record(0);
        aggregate.push_record(1);
        let metric = [Some(2.5), None];
        let context = MeasureContext {
            fail_counts: &[0, 0],
            membership: &[0, 0],
            highlight: &[false, false],
            metric: Some(&metric[..]),
        };
        assert_eq!(context.measure(&aggregate).active, 2.5);
    }
}
