//! Engine configuration.
//!
//! Every tunable lives here so that provider-specific column layouts and
//! classifier thresholds can change without touching pipeline code.
//! In tests, use `EngineConfig::default()`.

use crate::error::{CdrError, CdrResult};
use serde::{Deserialize, Serialize};

// ── Parser defaults ──────────────────────────────────────────────────────────

pub const DEFAULT_HEADER_MARKER: &str = "Calling Party";
pub const DEFAULT_HEADER_LINE_INDEX: usize = 0;
pub const DEFAULT_DATA_ROW_OFFSET: usize = 2; // header + separator row
pub const DEFAULT_MIN_FIELDS: usize = 9;
pub const DEFAULT_DELIMITER: char = '\t';

// ── Aggregator defaults ──────────────────────────────────────────────────────

pub const MIN_LOCATION_LEN: usize = 3;
pub const MIN_IMEI_LEN: usize = 14;
pub const EDGE_STRENGTH_DIVISOR: f64 = 10.0;

// ── Classifier thresholds ────────────────────────────────────────────────────

pub const KINGPIN_MIN_CONTACTS: usize = 15;
pub const KINGPIN_MIN_AVG_DURATION: f64 = 90.0;
pub const KINGPIN_OUTGOING_RATIO_LOW: f64 = 0.4;
pub const KINGPIN_OUTGOING_RATIO_HIGH: f64 = 0.6;
pub const KINGPIN_BASE_RISK: f64 = 85.0;
pub const KINGPIN_RISK_BONUS_CAP: f64 = 15.0;

pub const PEDDLER_MIN_CONTACTS: usize = 8;
pub const PEDDLER_MIN_OUTGOING_RATIO: f64 = 0.7;
pub const PEDDLER_MAX_AVG_DURATION: f64 = 120.0;
pub const PEDDLER_BASE_RISK: f64 = 70.0;
pub const PEDDLER_RISK_BONUS_CAP: f64 = 15.0;

pub const MIDDLEMAN_MIN_CONTACTS: usize = 4;
pub const MIDDLEMAN_MIN_AVG_DURATION: f64 = 150.0;
pub const MIDDLEMAN_BASE_RISK: f64 = 55.0;
pub const MIDDLEMAN_RISK_PER_CONTACT: f64 = 2.0;
pub const MIDDLEMAN_RISK_BONUS_CAP: f64 = 20.0;

pub const CUSTOMER_MAX_CONTACTS: usize = 3;
pub const CUSTOMER_BASE_RISK: f64 = 25.0;
pub const CUSTOMER_DURATION_DIVISOR: f64 = 10.0;
pub const CUSTOMER_RISK_BONUS_CAP: f64 = 25.0;

pub const UNKNOWN_RISK: f64 = 20.0;

// ── Layout defaults ──────────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
pub const DEFAULT_JITTER: f64 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Literal label that identifies the header row (case-insensitive).
    pub header_marker: String,
    /// Index of the header among the non-blank, non-banner lines.
    pub header_line_index: usize,
    /// Distance from the header to the first data row.
    pub data_row_offset: usize,
    pub min_fields: usize,
    pub delimiter: char,
    /// Lines containing any of these (case-insensitive) are dropped before indexing.
    pub banner_markers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_marker:     DEFAULT_HEADER_MARKER.into(),
            header_line_index: DEFAULT_HEADER_LINE_INDEX,
            data_row_offset:   DEFAULT_DATA_ROW_OFFSET,
            min_fields:        DEFAULT_MIN_FIELDS,
            delimiter:         DEFAULT_DELIMITER,
            banner_markers: vec![
                "call detail record".into(),
                "cdr report".into(),
                "generated on".into(),
                "page ".into(),
                "end of report".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    pub min_location_len: usize,
    pub min_imei_len: usize,
    pub strength_divisor: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            min_location_len: MIN_LOCATION_LEN,
            min_imei_len:     MIN_IMEI_LEN,
            strength_divisor: EDGE_STRENGTH_DIVISOR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub kingpin_min_contacts: usize,
    pub kingpin_min_avg_duration: f64,
    pub kingpin_outgoing_ratio_low: f64,
    pub kingpin_outgoing_ratio_high: f64,
    pub kingpin_base_risk: f64,
    pub kingpin_risk_bonus_cap: f64,

    pub peddler_min_contacts: usize,
    pub peddler_min_outgoing_ratio: f64,
    pub peddler_max_avg_duration: f64,
    pub peddler_base_risk: f64,
    pub peddler_risk_bonus_cap: f64,

    pub middleman_min_contacts: usize,
    pub middleman_min_avg_duration: f64,
    pub middleman_base_risk: f64,
    pub middleman_risk_per_contact: f64,
    pub middleman_risk_bonus_cap: f64,

    pub customer_max_contacts: usize,
    pub customer_base_risk: f64,
    pub customer_duration_divisor: f64,
    pub customer_risk_bonus_cap: f64,

    pub unknown_risk: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            kingpin_min_contacts:        KINGPIN_MIN_CONTACTS,
            kingpin_min_avg_duration:    KINGPIN_MIN_AVG_DURATION,
            kingpin_outgoing_ratio_low:  KINGPIN_OUTGOING_RATIO_LOW,
            kingpin_outgoing_ratio_high: KINGPIN_OUTGOING_RATIO_HIGH,
            kingpin_base_risk:           KINGPIN_BASE_RISK,
            kingpin_risk_bonus_cap:      KINGPIN_RISK_BONUS_CAP,

            peddler_min_contacts:       PEDDLER_MIN_CONTACTS,
            peddler_min_outgoing_ratio: PEDDLER_MIN_OUTGOING_RATIO,
            peddler_max_avg_duration:   PEDDLER_MAX_AVG_DURATION,
            peddler_base_risk:          PEDDLER_BASE_RISK,
            peddler_risk_bonus_cap:     PEDDLER_RISK_BONUS_CAP,

            middleman_min_contacts:     MIDDLEMAN_MIN_CONTACTS,
            middleman_min_avg_duration: MIDDLEMAN_MIN_AVG_DURATION,
            middleman_base_risk:        MIDDLEMAN_BASE_RISK,
            middleman_risk_per_contact: MIDDLEMAN_RISK_PER_CONTACT,
            middleman_risk_bonus_cap:   MIDDLEMAN_RISK_BONUS_CAP,

            customer_max_contacts:     CUSTOMER_MAX_CONTACTS,
            customer_base_risk:        CUSTOMER_BASE_RISK,
            customer_duration_divisor: CUSTOMER_DURATION_DIVISOR,
            customer_risk_bonus_cap:   CUSTOMER_RISK_BONUS_CAP,

            unknown_risk: UNKNOWN_RISK,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    /// Maximum absolute offset applied on each axis.
    pub jitter: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width:  DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            jitter: DEFAULT_JITTER,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub parser: ParserConfig,
    pub aggregator: AggregatorConfig,
    pub classifier: ClassifierThresholds,
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Load from a JSON file. Sections or keys that are absent keep
    /// their default values.
    pub fn load(path: &str) -> CdrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content).map_err(|e| match e {
            CdrError::Config { reason, .. } => CdrError::Config { path: path.to_string(), reason },
            other => other,
        })?;
        log::info!("Loaded engine config from {path}");
        Ok(config)
    }

    pub fn from_json(content: &str) -> CdrResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CdrResult<()> {
        let invalid = |reason: &str| CdrError::Config {
            path:   "<inline>".into(),
            reason: reason.into(),
        };
        if self.parser.header_marker.trim().is_empty() {
            return Err(invalid("parser.header_marker must not be empty"));
        }
        if self.parser.min_fields < 2 {
            return Err(invalid("parser.min_fields must cover both party columns"));
        }
        if self.parser.data_row_offset == 0 {
            return Err(invalid("parser.data_row_offset must be at least 1"));
        }
        if self.aggregator.strength_divisor <= 0.0 {
            return Err(invalid("aggregator.strength_divisor must be positive"));
        }
        if self.layout.width <= 0.0 || self.layout.height <= 0.0 {
            return Err(invalid("layout canvas must have a positive size"));
        }
        if self.layout.jitter < 0.0 {
            return Err(invalid("layout.jitter must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "parser": { "header_marker": "A PARTY", "delimiter": "," },
                 "layout": { "width": 1024.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.parser.header_marker, "A PARTY");
        assert_eq!(config.parser.delimiter, ',');
        assert_eq!(config.parser.min_fields, DEFAULT_MIN_FIELDS);
        assert_eq!(config.layout.width, 1024.0);
        assert_eq!(config.layout.height, DEFAULT_CANVAS_HEIGHT);
        assert_eq!(config.classifier, ClassifierThresholds::default());
    }

    #[test]
    fn rejects_non_positive_canvas() {
        let err = EngineConfig::from_json(r#"{ "layout": { "width": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, CdrError::Config { .. }), "unexpected error: {err}");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CdrError::Serialization(_)));
    }
}
