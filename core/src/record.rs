//! The fixed-shape call record produced by the parser.
//!
//! Column order follows the 24-column export layout. The first nine are
//! required; everything after `last_cell_location` is optional and
//! defaults to an empty string when the row is short.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub calling_party:       String,
    pub called_party:        String,
    pub call_type:           String,
    pub connection_type:     String,
    pub call_date:           String,
    pub call_time:           String,
    pub duration_seconds:    u64,
    pub first_cell_location: String,
    pub last_cell_location:  String,
    pub imei:                String,
    pub imsi:                String,

    // Passthrough columns, never interpreted.
    pub roaming_network:     String,
    pub service_type:        String,
    pub smsc_number:         String,
    pub ip_address:          String,
    pub port:                String,
    pub lrn_number:          String,
    pub call_forward_number: String,
    pub first_cell_lat:      String,
    pub first_cell_long:     String,
    pub last_cell_lat:       String,
    pub last_cell_long:      String,
    pub circle:              String,
    pub operator:            String,
}

impl CallRecord {
    /// Build a record from already-split fields. Missing trailing
    /// columns become empty strings; the duration coerces to 0 when
    /// it is not a number.
    pub fn from_fields(fields: &[&str]) -> Self {
        let text = |i: usize| fields.get(i).map(|f| clean_field(f)).unwrap_or_default();
        Self {
            calling_party:       text(0),
            called_party:        text(1),
            call_type:           text(2),
            connection_type:     text(3),
            call_date:           text(4),
            call_time:           text(5),
            duration_seconds:    parse_duration(fields.get(6).copied().unwrap_or("")),
            first_cell_location: text(7),
            last_cell_location:  text(8),
            imei:                text(9),
            imsi:                text(10),
            roaming_network:     text(11),
            service_type:        text(12),
            smsc_number:         text(13),
            ip_address:          text(14),
            port:                text(15),
            lrn_number:          text(16),
            call_forward_number: text(17),
            first_cell_lat:      text(18),
            first_cell_long:     text(19),
            last_cell_lat:       text(20),
            last_cell_long:      text(21),
            circle:              text(22),
            operator:            text(23),
        }
    }

    /// At most one direction per record. A call type naming both
    /// ("Incoming/Outgoing") counts as incoming.
    pub fn direction(&self) -> Option<CallDirection> {
        if call_type_contains(&self.call_type, "incoming") {
            Some(CallDirection::Incoming)
        } else if call_type_contains(&self.call_type, "outgoing") {
            Some(CallDirection::Outgoing)
        } else {
            None
        }
    }

    pub fn is_incoming(&self) -> bool { self.direction() == Some(CallDirection::Incoming) }
    pub fn is_outgoing(&self) -> bool { self.direction() == Some(CallDirection::Outgoing) }
    pub fn is_sms(&self) -> bool      { call_type_contains(&self.call_type, "sms") }

    /// IMEI long enough to be a real handset identifier.
    pub fn has_imei(&self, min_len: usize) -> bool {
        self.imei.chars().count() >= min_len
    }

    pub fn has_first_location(&self, min_len: usize) -> bool {
        self.first_cell_location.chars().count() >= min_len
    }
}

/// Case-insensitive substring match on free-text call categories.
pub fn call_type_contains(call_type: &str, needle: &str) -> bool {
    call_type.to_ascii_lowercase().contains(needle)
}

/// Trim whitespace and one layer of surrounding quotes.
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

/// Durations are whole seconds. Anything unparsable is 0.
///
/// Exports sometimes render durations as "45.0" or with a trailing unit,
/// so the leading digit run is used.
pub fn parse_duration(raw: &str) -> u64 {
    let cleaned = clean_field(raw);
    let digits: String = cleaned.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_default_trailing_columns() {
        let record = CallRecord::from_fields(&[
            "111", "222", "Outgoing Call", "GSM", "01/02/2024", "10:00:00", "75", "CELL-A", "CELL-B",
        ]);
        assert_eq!(record.duration_seconds, 75);
        assert_eq!(record.last_cell_location, "CELL-B");
        assert!(record.imei.is_empty());
        assert!(record.operator.is_empty());
    }

    #[test]
    fn duration_coercion_never_fails() {
        assert_eq!(parse_duration("120"), 120);
        assert_eq!(parse_duration(" \"45\" "), 45);
        assert_eq!(parse_duration("30.0"), 30);
        assert_eq!(parse_duration("12s"), 12);
        assert_eq!(parse_duration("n/a"), 0);
        assert_eq!(parse_duration("-5"), 0);
        assert_eq!(parse_duration(""), 0);
    }

    #[test]
    fn call_type_predicates_ignore_case() {
        let mut record = CallRecord { call_type: "INCOMING SMS".into(), ..Default::default() };
        assert!(record.is_incoming());
        assert!(record.is_sms());
        assert!(!record.is_outgoing());

        record.call_type = "Call Forward".into();
        assert!(!record.is_incoming() && !record.is_outgoing());
    }

    #[test]
    fn mixed_call_type_has_one_direction() {
        let record = CallRecord { call_type: "Incoming/Outgoing".into(), ..Default::default() };
        assert_eq!(record.direction(), Some(CallDirection::Incoming));
        assert!(!record.is_outgoing());
    }
}
