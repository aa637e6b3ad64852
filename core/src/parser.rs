//! Record parser — raw export text to validated call records.
//!
//! The export is positional:
//!   1. Blank lines and short banner lines are dropped first. A line
//!      that splits into enough fields is always treated as a row.
//!   2. The header sits at `header_line_index` of what remains and must
//!      contain the header marker. Otherwise the whole input is rejected.
//!   3. Data rows start `data_row_offset` lines after the header.
//!
//! Row-level defects never abort parsing; they are counted in `skipped`.

use crate::{config::ParserConfig, record::CallRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an input was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatFailure {
    TooFewLines { found: usize, required: usize },
    HeaderMarkerMissing { marker: String },
}

impl fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLines { found, required } => {
                write!(f, "expected at least {required} content lines, found {found}")
            }
            Self::HeaderMarkerMissing { marker } => {
                write!(f, "header row does not contain '{marker}'")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub records: Vec<CallRecord>,
    pub skipped: usize,
    pub format_valid: bool,
    pub failure: Option<FormatFailure>,
}

impl ParseOutput {
    fn rejected(failure: FormatFailure) -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            format_valid: false,
            failure: Some(failure),
        }
    }
}

pub struct RecordParser<'a> {
    config: &'a ParserConfig,
}

impl<'a> RecordParser<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, raw: &str) -> ParseOutput {
        let lines: Vec<&str> = raw
            .lines()
            .filter(|line| !line.trim().is_empty() && !self.is_banner(line))
            .collect();

        let required = self.config.header_line_index + self.config.data_row_offset.max(1);
        if lines.len() < required {
            log::warn!("CDR input rejected: {} content lines, need {required}", lines.len());
            return ParseOutput::rejected(FormatFailure::TooFewLines {
                found: lines.len(),
                required,
            });
        }

        let header = lines[self.config.header_line_index];
        if !contains_ignore_case(header, &self.config.header_marker) {
            log::warn!("CDR input rejected: header marker '{}' not found", self.config.header_marker);
            return ParseOutput::rejected(FormatFailure::HeaderMarkerMissing {
                marker: self.config.header_marker.clone(),
            });
        }

        let mut output = ParseOutput { format_valid: true, ..Default::default() };
        for line in &lines[required..] {
            if self.is_decorative(line) && !self.has_min_fields(line) {
                continue;
            }
            match self.parse_row(line) {
                Some(record) => output.records.push(record),
                None => output.skipped += 1,
            }
        }

        log::debug!(
            "Parsed {} records, skipped {} rows",
            output.records.len(),
            output.skipped
        );
        output
    }

    /// A row becomes a record only when it is complete enough and names
    /// two different, non-empty parties.
    fn parse_row(&self, line: &str) -> Option<CallRecord> {
        let fields: Vec<&str> = line.split(self.config.delimiter).collect();
        if fields.len() < self.config.min_fields {
            return None;
        }
        let record = CallRecord::from_fields(&fields);
        if record.calling_party.is_empty()
            || record.called_party.is_empty()
            || record.calling_party == record.called_party
        {
            return None;
        }
        Some(record)
    }

    /// Boilerplate text, never a row that splits into enough fields.
    fn is_banner(&self, line: &str) -> bool {
        !self.has_min_fields(line)
            && self
                .config
                .banner_markers
                .iter()
                .any(|marker| contains_ignore_case(line, marker))
    }

    /// Separator or footer rows: mostly punctuation, few alphanumerics.
    /// The delimiter itself is not counted.
    fn is_decorative(&self, line: &str) -> bool {
        let visible: Vec<char> = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != self.config.delimiter)
            .collect();
        if visible.is_empty() {
            return true;
        }
        let alnum = visible.iter().filter(|c| c.is_alphanumeric()).count();
        alnum * 4 < visible.len()
    }

    fn has_min_fields(&self, line: &str) -> bool {
        line.split(self.config.delimiter).count() >= self.config.min_fields
    }
}

/// Convenience wrapper for one-off parsing.
pub fn parse_records(raw: &str, config: &ParserConfig) -> ParseOutput {
    RecordParser::new(config).parse(raw)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
