use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::{IntervalRange, ValueKind};
use crate::error::{SummaryError, SummaryResult};

use super::filter::MissingMode;

pub const FILTER_SET_JSON_SCHEMA_V1: u32 = 1;

/// A bound as it appears in persisted filters: a plain number, or an
/// RFC 3339 instant for time attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(f64),
    Instant(DateTime<Utc>),
}

impl SpecValue {
    /// Wraps a stored value in the representation its attribute kind uses.
    #[must_use]
    pub fn from_value(value: f64, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Time => {
                unix_seconds_to_datetime(value).map_or(Self::Number(value), Self::Instant)
            }
            ValueKind::Numeric { .. } => Self::Number(value),
        }
    }

    /// Stored scalar; instants become Unix seconds.
    #[must_use]
    pub fn to_value(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Instant(instant) => datetime_to_unix_seconds(instant),
        }
    }
}

/// Serializable form of one attribute filter.
///
/// `{ "min": .., "max": .. }` for range filters, `{ "missing": "in" | "out" }`
/// for missing-value filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    Range { min: SpecValue, max: SpecValue },
    Missing { missing: MissingMode },
}

impl FilterSpec {
    #[must_use]
    pub fn from_range(range: &IntervalRange, kind: ValueKind) -> Self {
        Self::Range {
            min: SpecValue::from_value(range.min, kind),
            max: SpecValue::from_value(range.max, kind),
        }
    }
}

/// Bounds of one aggregate in the host's value representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSnapshot {
    pub min: SpecValue,
    pub max: SpecValue,
    pub max_included: bool,
}

impl RangeSnapshot {
    #[must_use]
    pub fn from_range(range: &IntervalRange, kind: ValueKind) -> Self {
        Self {
            min: SpecValue::from_value(range.min, kind),
            max: SpecValue::from_value(range.max, kind),
            max_included: range.max_included,
        }
    }
}

/// Active filters keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    pub filters: IndexMap<String, FilterSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSetJsonContractV1 {
    pub schema_version: u32,
    pub filters: FilterSet,
}

impl FilterSet {
    pub fn to_json_contract_v1_pretty(&self) -> SummaryResult<String> {
        let payload = FilterSetJsonContractV1 {
            schema_version: FILTER_SET_JSON_SCHEMA_V1,
            filters: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            SummaryError::InvalidData(format!("failed to serialize filter set contract v1: {e}"))
        })
    }

    /// Accepts either the versioned contract or a bare name-to-filter map.
    pub fn from_json_compat_str(input: &str) -> SummaryResult<Self> {
        if let Ok(payload) = serde_json::from_str::<FilterSetJsonContractV1>(input) {
            if payload.schema_version != FILTER_SET_JSON_SCHEMA_V1 {
                return Err(SummaryError::InvalidData(format!(
                    "unsupported filter set schema version: {}",
                    payload.schema_version
                )));
            }
            return Ok(payload.filters);
        }
        serde_json::from_str::<Self>(input).map_err(|e| {
            SummaryError::InvalidData(format!("failed to parse filter set json payload: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{FilterSet, FilterSpec, SpecValue};
    use crate::api::filter::MissingMode;

    #[test]
    fn specs_use_plain_json_shapes() {
        let range = FilterSpec::Range {
            min: SpecValue::Number(10.0),
            max: SpecValue::Number(20.0),
        };
        assert_eq!(
            serde_json::to_string(&range).expect("json"),
            r#"{"min":10.0,"max":20.0}"#
        );
        let missing: FilterSpec = serde_json::from_str(r#"{"missing":"out"}"#).expect("parse");
        assert_eq!(missing, FilterSpec::Missing { missing: MissingMode::Out });
    }

    #[test]
    fn instants_parse_from_rfc3339() {
        let spec: FilterSpec =
            serde_json::from_str(r#"{"min":"2020-01-01T00:00:00Z","max":"2021-01-01T00:00:00Z"}"#)
                .expect("parse");
        let expected = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        match spec {
            FilterSpec::Range { min, .. } => assert_eq!(min, SpecValue::Instant(expected)),
            FilterSpec::Missing { .. } => panic!("expected a range filter"),
        }
    }

    #[test]
    fn filter_set_accepts_contract_and_bare_map() {
        let mut set = FilterSet::default();
        set.filters.insert(
            "year".to_owned(),
            FilterSpec::Missing {
                missing: MissingMode::In,
            },
        );
        let contract = set.to_json_contract_v1_pretty().expect("serialize");
        assert_eq!(FilterSet::from_json_compat_str(&contract).expect("parse"), set);
        let bare = FilterSet::from_json_compat_str(r#"{"year":{"missing":"in"}}"#).expect("parse");
        assert_eq!(bare, set);

        let future = r#"{"schema_version":9,"filters":{}}"#;
        assert!(FilterSet::from_json_compat_str(future).is_err());
    }
}
