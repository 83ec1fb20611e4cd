use tracing::trace;

use crate::core::primitives::{format_number, precision_for_step, unix_seconds_to_datetime};
use crate::core::{
    AggregateHandle, AggregateMeasures, AttributeId, BinTicks, TimeResolution, ValueKind,
    Viewport, format_instant,
};
use crate::error::SummaryResult;
use crate::render::{BarHeights, BarPrimitive, MissingBar, Renderer, SummaryFrame, TickPrimitive};

use super::Dashboard;
use super::attribute::IntervalAttribute;

impl Dashboard {
    /// Materializes the histogram of `id` in pixel space.
    pub fn build_frame(&self, id: AttributeId) -> SummaryResult<SummaryFrame> {
        let attribute = self.attribute(id)?;
        let height_px = self.config.chart_height_px;
        let viewport = Viewport::new(
            attribute.width_px().ceil() as u32,
            height_px.ceil() as u32,
        );
        let mut frame = SummaryFrame::new(id, viewport);

        let missing = attribute.missing_aggregate();
        let peak = attribute
            .aggregates()
            .iter()
            .chain(std::iter::once(missing))
            .map(|aggregate| aggregate.measures().total)
            .fold(0.0_f64, f64::max);
        let factor = if peak > 0.0 { height_px / peak } else { 0.0 };

        if missing.record_count() > 0 {
            frame.missing = Some(MissingBar {
                aggregate: AggregateHandle::new(id, missing.id()),
                heights: scale_heights(missing.measures(), factor, height_px),
            });
        }

        let Some(scale) = attribute.scale() else {
            return Ok(frame);
        };
        let filter = attribute.filter().range();
        for aggregate in attribute.aggregates() {
            frame.bars.push(BarPrimitive {
                aggregate: AggregateHandle::new(id, aggregate.id()),
                x_left: scale.value_to_pixel(aggregate.range().min)?,
                x_right: scale.value_to_pixel(aggregate.range().max)?,
                heights: scale_heights(aggregate.measures(), factor, height_px),
                label: attribute.label(aggregate.range()).unwrap_or_default(),
                selected: filter.is_some_and(|range| {
                    aggregate.range().min >= range.min && aggregate.range().max <= range.max
                }),
            });
        }
        if let Some(ticks) = attribute.ticks() {
            for &value in &ticks.values {
                frame.ticks.push(TickPrimitive {
                    x: scale.value_to_pixel(value)?,
                    value,
                    label: tick_label(attribute, ticks, value),
                });
            }
        }
        if let Some(range) = filter {
            let (start, end) = scale.domain();
            let min = range.min.clamp(start, end);
            let max = range.max.clamp(start, end);
            frame.filter_span = Some((scale.value_to_pixel(min)?, scale.value_to_pixel(max)?));
        }

        trace!(
            attribute = %id,
            bars = frame.bars.len(),
            ticks = frame.ticks.len(),
            "summary frame built"
        );
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, id: AttributeId, renderer: &mut R) -> SummaryResult<()> {
        let frame = self.build_frame(id)?;
        renderer.render(&frame)
    }
}

/// Negative metric sums draw as empty bars.
fn scale_heights(measures: &AggregateMeasures, factor: f64, height_px: f64) -> BarHeights {
    let scale = |value: f64| (value * factor).clamp(0.0, height_px);
    BarHeights {
        total: scale(measures.total),
        active: scale(measures.active),
        highlight: scale(measures.highlight),
        compare: measures.compare.map(scale),
    }
}

fn tick_label(attribute: &IntervalAttribute, ticks: &BinTicks, value: f64) -> String {
    match attribute.kind() {
        ValueKind::Time => {
            let resolution = ticks
                .interval
                .map(|interval| interval.unit.resolution())
                .or(attribute.resolution())
                .unwrap_or(TimeResolution::Second);
            unix_seconds_to_datetime(value)
                .map(|instant| format_instant(instant, resolution))
                .unwrap_or_default()
        }
        ValueKind::Numeric { integer } => {
            let precision = if integer {
                0
            } else {
                precision_for_step(ticks.step, attribute.max_label_precision)
            };
            format_number(value, precision)
        }
    }
}
