use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Aggregate, IntervalRange, TickPolicy, ValueScale};

use super::attribute::IntervalAttribute;
use super::bin_ticks::{bin_interval_target, bin_tick_target_count};
use super::config::SummaryConfig;
use super::registry::AggregateRegistry;

/// Result of one binning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RebinOutcome {
    pub created: usize,
    pub kept: usize,
    pub destroyed: usize,
    /// No usable boundaries; the previous bins were left untouched.
    pub aborted: bool,
}

impl RebinOutcome {
    fn aborted() -> Self {
        Self {
            aborted: true,
            ..Self::default()
        }
    }

    /// True when the visible bin set changed.
    #[must_use]
    pub fn changed(self) -> bool {
        self.created > 0 || self.destroyed > 0
    }
}

impl IntervalAttribute {
    /// Rebuilds the aggregates from fresh tick boundaries.
    ///
    /// Bins whose bounds survive keep their id and records. Only new bins
    /// are filled, so a pass that reproduces the same boundaries touches no
    /// records. Measures are left to the caller.
    pub(super) fn rebin(
        &mut self,
        registry: &mut AggregateRegistry,
        config: &SummaryConfig,
    ) -> RebinOutcome {
        let Some(domain) = self.active_domain() else {
            trace!(attribute = %self.id, "no present values, binning skipped");
            return RebinOutcome::aborted();
        };

        let tick_count = bin_tick_target_count(
            self.width_px,
            config.bin_target_spacing_px,
            config.min_bin_ticks,
            config.max_bin_ticks,
        );
        let policy = TickPolicy {
            count: bin_interval_target(tick_count),
            integer: self.kind.is_integer(),
            resolution: self.resolution,
        };
        let niced = ValueScale::new(self.scale_type, domain, self.width_px)
            .ok()
            .and_then(|scale| scale.nice(policy));
        let Some((scale, ticks)) = niced else {
            debug!(attribute = %self.id, ?domain, "tick generation failed, keeping bins");
            return RebinOutcome::aborted();
        };
        if ticks.values.len() < 2 {
            debug!(
                attribute = %self.id,
                ticks = ticks.values.len(),
                "fewer than two ticks, keeping bins"
            );
            return RebinOutcome::aborted();
        }

        let last = ticks.values.len() - 2;
        let candidates: Vec<IntervalRange> = ticks
            .values
            .windows(2)
            .enumerate()
            .map(|(index, pair)| IntervalRange::new(pair[0], pair[1]).with_max_included(index == last))
            .collect();

        let mut matched = vec![false; candidates.len()];
        let mut kept: Vec<Aggregate> = Vec::with_capacity(candidates.len());
        let mut destroyed = 0;
        for mut aggregate in self.aggregates.drain(..) {
            match find_candidate(&candidates, aggregate.range()) {
                Some(index) if !matched[index] => {
                    matched[index] = true;
                    kept.push(aggregate);
                }
                _ => {
                    aggregate.clear();
                    registry.unregister(aggregate.id());
                    destroyed += 1;
                }
            }
        }

        let mut fresh: Vec<Aggregate> = candidates
            .iter()
            .zip(&matched)
            .filter(|(_, matched)| !**matched)
            .map(|(range, _)| Aggregate::new(registry.register(self.id), self.id, *range))
            .collect();
        if !fresh.is_empty() {
            for &record in &self.sorted_records {
                let Some(value) = self.values[record] else {
                    continue;
                };
                let slot = fresh.partition_point(|aggregate| aggregate.range().min <= value);
                if slot == 0 {
                    continue;
                }
                let aggregate = &mut fresh[slot - 1];
                if aggregate.contains(value) {
                    aggregate.push_record(record);
                }
            }
        }

        let outcome = RebinOutcome {
            created: fresh.len(),
            kept: kept.len(),
            destroyed,
            aborted: false,
        };

        kept.append(&mut fresh);
        kept.sort_by(|a, b| b.range().min.total_cmp(&a.range().min));
        self.aggregates = kept;
        self.scale = Some(scale);
        self.ticks = Some(ticks);

        debug!(
            attribute = %self.id,
            created = outcome.created,
            kept = outcome.kept,
            destroyed = outcome.destroyed,
            "attribute rebinned"
        );
        outcome
    }
}

/// Candidates are ascending by `min`, so a binary search finds the only possible match.
fn find_candidate(candidates: &[IntervalRange], range: &IntervalRange) -> Option<usize> {
    let index = candidates
        .binary_search_by(|candidate| candidate.min.total_cmp(&range.min))
        .ok()?;
    candidates[index].same_bounds(range).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::RebinOutcome;
    use crate::api::attribute::IntervalAttribute;
    use crate::api::config::{AttributeConfig, SummaryConfig};
    use crate::api::registry::AggregateRegistry;
    use crate::core::AttributeId;

    fn setup(values: Vec<Option<f64>>, width_px: f64) -> (IntervalAttribute, AggregateRegistry) {
        let mut registry = AggregateRegistry::new();
        let attribute = IntervalAttribute::new(
            AttributeId(0),
            &AttributeConfig::new("x").with_width_px(width_px),
            false,
            values,
            &SummaryConfig::default(),
            &mut registry,
        );
        (attribute, registry)
    }

    #[test]
    fn every_present_record_lands_in_exactly_one_bin() {
        let values = vec![Some(3.0), Some(97.0), Some(50.0), None, Some(10.0), Some(100.0)];
        let (mut attribute, mut registry) = setup(values, 420.0);
        let outcome = attribute.rebin(&mut registry, &SummaryConfig::default());
        assert!(!outcome.aborted);

        let mut seen: Vec<usize> = attribute
            .aggregates()
            .iter()
            .flat_map(|aggregate| aggregate.records().iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 4, 5]);
        assert_eq!(attribute.missing_aggregate().records(), &[3]);
    }

    #[test]
    fn aggregates_are_sorted_by_descending_min() {
        let values = (0..50).map(|v| Some(f64::from(v))).collect();
        let (mut attribute, mut registry) = setup(values, 300.0);
        attribute.rebin(&mut registry, &SummaryConfig::default());
        let mins: Vec<f64> = attribute.aggregates().iter().map(|a| a.range().min).collect();
        assert!(mins.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(attribute.aggregates()[0].range().max_included);
    }

    #[test]
    fn repeated_pass_keeps_every_bin() {
        let values = (0..30).map(|v| Some(f64::from(v) * 1.7)).collect();
        let (mut attribute, mut registry) = setup(values, 300.0);
        let config = SummaryConfig::default();
        let first = attribute.rebin(&mut registry, &config);
        let ids: Vec<_> = attribute.aggregates().iter().map(|a| a.id()).collect();

        let second = attribute.rebin(&mut registry, &config);
        assert_eq!(
            second,
            RebinOutcome {
                created: 0,
                kept: first.created,
                destroyed: 0,
                aborted: false,
            }
        );
        let again: Vec<_> = attribute.aggregates().iter().map(|a| a.id()).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn attribute_without_values_aborts() {
        let (mut attribute, mut registry) = setup(vec![None, None], 300.0);
        let outcome = attribute.rebin(&mut registry, &SummaryConfig::default());
        assert!(outcome.aborted);
        assert!(attribute.aggregates().is_empty());
    }
}
