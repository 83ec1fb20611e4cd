use serde::{Deserialize, Serialize};

use crate::core::ScaleType;
use crate::error::{SummaryError, SummaryResult};

/// Dashboard-wide tuning, persisted with [`SummaryConfig::to_json_pretty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_bin_target_spacing_px")]
    pub bin_target_spacing_px: f64,
    #[serde(default = "default_min_bin_ticks")]
    pub min_bin_ticks: usize,
    #[serde(default = "default_max_bin_ticks")]
    pub max_bin_ticks: usize,
    #[serde(default = "default_width_px")]
    pub default_width_px: f64,
    #[serde(default = "default_chart_height_px")]
    pub chart_height_px: f64,
    /// Idle delay before a drag-driven range is applied; `0` applies immediately.
    #[serde(default = "default_commit_delay_ms")]
    pub commit_delay_ms: u64,
    #[serde(default = "default_max_label_precision")]
    pub max_label_precision: u32,
    #[serde(default = "default_log_scale_auto_ratio")]
    pub log_scale_auto_ratio: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            bin_target_spacing_px: default_bin_target_spacing_px(),
            min_bin_ticks: default_min_bin_ticks(),
            max_bin_ticks: default_max_bin_ticks(),
            default_width_px: default_width_px(),
            chart_height_px: default_chart_height_px(),
            commit_delay_ms: default_commit_delay_ms(),
            max_label_precision: default_max_label_precision(),
            log_scale_auto_ratio: default_log_scale_auto_ratio(),
        }
    }
}

impl SummaryConfig {
    #[must_use]
    pub fn with_bin_spacing(mut self, target_spacing_px: f64) -> Self {
        self.bin_target_spacing_px = target_spacing_px;
        self
    }

    #[must_use]
    pub fn with_bin_tick_bounds(mut self, min_ticks: usize, max_ticks: usize) -> Self {
        self.min_bin_ticks = min_ticks;
        self.max_bin_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_default_width_px(mut self, width_px: f64) -> Self {
        self.default_width_px = width_px;
        self
    }

    #[must_use]
    pub fn with_chart_height_px(mut self, height_px: f64) -> Self {
        self.chart_height_px = height_px;
        self
    }

    #[must_use]
    pub fn with_commit_delay_ms(mut self, delay_ms: u64) -> Self {
        self.commit_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_log_scale_auto_ratio(mut self, ratio: f64) -> Self {
        self.log_scale_auto_ratio = ratio;
        self
    }

    pub fn validate(self) -> SummaryResult<Self> {
        if !self.bin_target_spacing_px.is_finite() || self.bin_target_spacing_px <= 0.0 {
            return Err(SummaryError::InvalidData(
                "bin target spacing must be finite and > 0".to_owned(),
            ));
        }
        if self.min_bin_ticks < 2 || self.max_bin_ticks < self.min_bin_ticks {
            return Err(SummaryError::InvalidData(
                "bin tick bounds must satisfy 2 <= min <= max".to_owned(),
            ));
        }
        if !self.default_width_px.is_finite() || self.default_width_px <= 0.0 {
            return Err(SummaryError::InvalidWidth {
                width_px: self.default_width_px,
            });
        }
        if !self.chart_height_px.is_finite() || self.chart_height_px <= 0.0 {
            return Err(SummaryError::InvalidData(
                "chart height must be finite and > 0".to_owned(),
            ));
        }
        if !self.log_scale_auto_ratio.is_finite() || self.log_scale_auto_ratio <= 1.0 {
            return Err(SummaryError::InvalidData(
                "log scale auto ratio must be finite and > 1".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn to_json_pretty(&self) -> SummaryResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SummaryError::InvalidData(format!("failed to serialize summary config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> SummaryResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            SummaryError::InvalidData(format!("failed to parse summary config json: {e}"))
        })?;
        config.validate()
    }
}

/// Per-attribute setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    pub name: String,
    #[serde(default)]
    pub scale_type: ScaleType,
    /// `None` detects integer mode from the values.
    #[serde(default)]
    pub integer: Option<bool>,
    #[serde(default)]
    pub width_px: Option<f64>,
}

impl AttributeConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale_type: ScaleType::Auto,
            integer: None,
            width_px: None,
        }
    }

    #[must_use]
    pub fn with_scale_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    #[must_use]
    pub fn with_integer(mut self, integer: bool) -> Self {
        self.integer = Some(integer);
        self
    }

    #[must_use]
    pub fn with_width_px(mut self, width_px: f64) -> Self {
        self.width_px = Some(width_px);
        self
    }
}

fn default_bin_target_spacing_px() -> f64 {
    42.0
}

fn default_min_bin_ticks() -> usize {
    2
}

fn default_max_bin_ticks() -> usize {
    24
}

fn default_width_px() -> f64 {
    280.0
}

fn default_chart_height_px() -> f64 {
    120.0
}

fn default_commit_delay_ms() -> u64 {
    250
}

fn default_max_label_precision() -> u32 {
    6
}

fn default_log_scale_auto_ratio() -> f64 {
    1000.0
}
