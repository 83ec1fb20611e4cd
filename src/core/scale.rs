use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::range::DomainExtent;
use crate::core::ticks::{linear_ticks, log_ticks};
use crate::core::time_ticks::{TimeInterval, TimeResolution, time_ticks};
use crate::core::types::ValueKind;
use crate::error::{SummaryError, SummaryResult};

/// Mapping used between attribute values and pixel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScaleType {
    /// Resolved once per attribute from its kind and extent.
    #[default]
    Auto,
    Linear,
    /// Base-10 log mapping; needs a strictly positive domain.
    Log,
    /// Calendar-aware mapping of Unix-second instants.
    Time,
}

impl ScaleType {
    /// Picks a concrete type. Time attributes always map as `Time`; `Auto`
    /// becomes `Log` for positive extents spanning at least `log_ratio`.
    #[must_use]
    pub fn resolve(self, kind: ValueKind, extent: Option<DomainExtent>, log_ratio: f64) -> Self {
        if kind.is_time() {
            return Self::Time;
        }
        match self {
            Self::Auto => match extent {
                Some(extent) if extent.min > 0.0 && extent.max / extent.min >= log_ratio => {
                    Self::Log
                }
                _ => Self::Linear,
            },
            Self::Time => Self::Linear,
            other => other,
        }
    }
}

/// Inputs shaping bin boundary generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPolicy {
    pub count: usize,
    pub integer: bool,
    pub resolution: Option<TimeResolution>,
}

/// Bin boundaries produced by [`ValueScale::nice`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinTicks {
    pub values: Vec<f64>,
    pub step: f64,
    pub interval: Option<TimeInterval>,
}

/// Monotonic value-to-pixel mapping for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    scale_type: ScaleType,
    domain_start: f64,
    domain_end: f64,
    width_px: f64,
}

impl ValueScale {
    pub fn new(scale_type: ScaleType, domain: (f64, f64), width_px: f64) -> SummaryResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(SummaryError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !width_px.is_finite() || width_px <= 0.0 {
            return Err(SummaryError::InvalidWidth { width_px });
        }
        let scale_type = match scale_type {
            ScaleType::Auto => ScaleType::Linear,
            ScaleType::Log if domain.0.min(domain.1) <= 0.0 => {
                warn!(
                    domain_start = domain.0,
                    domain_end = domain.1,
                    "log scale needs a positive domain, using linear"
                );
                ScaleType::Linear
            }
            other => other,
        };

        Ok(Self {
            scale_type,
            domain_start: domain.0.min(domain.1),
            domain_end: domain.0.max(domain.1),
            width_px,
        })
    }

    #[must_use]
    pub fn scale_type(self) -> ScaleType {
        self.scale_type
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        self.width_px
    }

    /// Rounds the domain outward to tick boundaries and returns those ticks.
    ///
    /// `None` when no pair of ticks can be produced.
    #[must_use]
    pub fn nice(self, policy: TickPolicy) -> Option<(Self, BinTicks)> {
        let (start, end) = self.domain();
        let ticks = match self.scale_type {
            ScaleType::Time => time_ticks(start, end, policy.count, policy.resolution).map(|t| {
                let step = t.interval.approx_seconds();
                BinTicks {
                    values: t.values,
                    step,
                    interval: Some(t.interval),
                }
            }),
            ScaleType::Log => log_ticks(start, end, policy.count).map(|t| BinTicks {
                values: t.values,
                step: t.step,
                interval: None,
            }),
            ScaleType::Linear | ScaleType::Auto => {
                let min_step = policy.integer.then_some(1.0);
                linear_ticks(start, end, policy.count, min_step).map(|t| BinTicks {
                    values: t.values,
                    step: t.step,
                    interval: None,
                })
            }
        }?;

        let first = *ticks.values.first()?;
        let last = *ticks.values.last()?;
        let niced = Self {
            domain_start: first,
            domain_end: last,
            ..self
        };
        Some((niced, ticks))
    }

    pub fn value_to_pixel(self, value: f64) -> SummaryResult<f64> {
        if !value.is_finite() {
            return Err(SummaryError::InvalidData("value must be finite".to_owned()));
        }
        let (start, end, value) = self.transformed(value)?;
        let span = end - start;
        if span == 0.0 {
            return Ok(0.0);
        }
        Ok((value - start) / span * self.width_px)
    }

    pub fn pixel_to_value(self, pixel: f64) -> SummaryResult<f64> {
        if !pixel.is_finite() {
            return Err(SummaryError::InvalidData("pixel must be finite".to_owned()));
        }
        let normalized = pixel / self.width_px;
        match self.scale_type {
            ScaleType::Log => {
                let start = self.domain_start.log10();
                let end = self.domain_end.log10();
                Ok(10f64.powf(start + normalized * (end - start)))
            }
            _ => Ok(self.domain_start + normalized * (self.domain_end - self.domain_start)),
        }
    }

    fn transformed(self, value: f64) -> SummaryResult<(f64, f64, f64)> {
        match self.scale_type {
            ScaleType::Log => {
                if value <= 0.0 {
                    return Err(SummaryError::InvalidData(
                        "log scale value must be > 0".to_owned(),
                    ));
                }
                Ok((
                    self.domain_start.log10(),
                    self.domain_end.log10(),
                    value.log10(),
                ))
            }
            _ => Ok((self.domain_start, self.domain_end, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScaleType, TickPolicy, ValueScale};
    use crate::core::range::DomainExtent;
    use crate::core::types::ValueKind;

    #[test]
    fn auto_resolves_to_log_for_wide_positive_extent() {
        let numeric = ValueKind::Numeric { integer: false };
        let wide = DomainExtent::new(1.0, 50_000.0).ok();
        let narrow = DomainExtent::new(1.0, 50.0).ok();
        assert_eq!(ScaleType::Auto.resolve(numeric, wide, 1000.0), ScaleType::Log);
        assert_eq!(ScaleType::Auto.resolve(numeric, narrow, 1000.0), ScaleType::Linear);
        assert_eq!(ScaleType::Linear.resolve(ValueKind::Time, wide, 1000.0), ScaleType::Time);
    }

    #[test]
    fn log_scale_on_non_positive_domain_falls_back_to_linear() {
        let scale = ValueScale::new(ScaleType::Log, (0.0, 10.0), 100.0).expect("scale");
        assert_eq!(scale.scale_type(), ScaleType::Linear);
    }

    #[test]
    fn nice_expands_domain_to_ticks() {
        let scale = ValueScale::new(ScaleType::Linear, (3.0, 97.0), 200.0).expect("scale");
        let (niced, ticks) = scale
            .nice(TickPolicy {
                count: 10,
                integer: true,
                resolution: None,
            })
            .expect("ticks");
        assert_eq!(niced.domain(), (0.0, 100.0));
        assert_eq!(ticks.values.len(), 11);
    }
}
