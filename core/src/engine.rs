//! The analysis engine — drives one CDR run end to end.
//!
//! EXECUTION ORDER (fixed):
//!   1. Parse       (per file, in parallel for batches)
//!   2. Aggregate   (single-threaded, caller's file order)
//!   3. Classify
//!   4. Layout
//!   5. Project
//!
//! RULES:
//!   - Every stage consumes its whole input before the next begins.
//!   - Workers never share mutable state; only the merge builds the graph.
//!   - A run either yields a full report or a failure status, never a
//!     partially built graph.

use crate::{
    aggregator::aggregate_batches,
    analytics::AnalyticsBundle,
    classifier::classify,
    config::EngineConfig,
    graph::NetworkGraph,
    layout::layout,
    parser::{FormatFailure, ParseOutput, RecordParser},
    record::CallRecord,
    rng::JitterSource,
    types::RunId,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id:      RunId,
    pub analyzed_at: DateTime<Utc>,
    pub files:       usize,
    pub graph:       NetworkGraph,
    /// Parsed records, kept for the record-level slices.
    pub records:     Vec<CallRecord>,
    pub analytics:   AnalyticsBundle,
}

impl AnalysisReport {
    pub fn incoming_records(&self) -> Vec<&CallRecord> {
        AnalyticsBundle::resolve(&self.analytics.incoming, &self.records)
    }

    pub fn outgoing_records(&self) -> Vec<&CallRecord> {
        AnalyticsBundle::resolve(&self.analytics.outgoing, &self.records)
    }

    pub fn imei_records(&self) -> Vec<&CallRecord> {
        AnalyticsBundle::resolve(&self.analytics.imei, &self.records)
    }

    pub fn location_records(&self) -> Vec<&CallRecord> {
        AnalyticsBundle::resolve(&self.analytics.location, &self.records)
    }

    pub fn sms_records(&self) -> Vec<&CallRecord> {
        AnalyticsBundle::resolve(&self.analytics.sms, &self.records)
    }
}

/// How a run ended. All three failure kinds resolve to a value.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Complete(Box<AnalysisReport>),
    /// The file layout was not recognized. `file_index` is the position
    /// of the offending input in the batch.
    InvalidFormat { file_index: usize, reason: FormatFailure },
    /// Every file matched the layout, but no row survived validation.
    NoValidRecords { skipped: usize },
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Complete(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            Self::Complete(report) => Some(*report),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Message suitable for showing to the person who uploaded the data.
    pub fn user_message(&self) -> String {
        match self {
            Self::Complete(report) => format!(
                "Analyzed {} records: {} phones, {} connections",
                report.graph.total_records,
                report.graph.node_count(),
                report.graph.edge_count()
            ),
            Self::InvalidFormat { file_index, reason } => format!(
                "File {} has an unrecognized CDR layout ({reason})",
                file_index + 1
            ),
            Self::NoValidRecords { skipped } => format!(
                "File matched the expected layout but contained no usable rows ({skipped} rejected)"
            ),
        }
    }
}

pub struct CdrEngine {
    config: EngineConfig,
}

impl CdrEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a single export.
    pub fn analyze(&self, raw: &str, jitter: &mut dyn JitterSource) -> AnalysisOutcome {
        self.analyze_batch(&[raw], jitter)
    }

    /// Analyze several exports as one network. Files are parsed in
    /// parallel and merged in the order given.
    pub fn analyze_batch<S>(&self, raws: &[S], jitter: &mut dyn JitterSource) -> AnalysisOutcome
    where
        S: AsRef<str> + Sync,
    {
        let parser = RecordParser::new(&self.config.parser);
        let parsed: Vec<ParseOutput> = raws
            .par_iter()
            .map(|raw| parser.parse(raw.as_ref()))
            .collect();

        if let Some((file_index, output)) = parsed.iter().enumerate().find(|(_, p)| !p.format_valid) {
            let reason = output.failure.clone().unwrap_or(FormatFailure::HeaderMarkerMissing {
                marker: self.config.parser.header_marker.clone(),
            });
            log::warn!("Batch rejected: file {file_index} has invalid format: {reason}");
            return AnalysisOutcome::InvalidFormat { file_index, reason };
        }

        let graph = aggregate_batches(
            parsed.iter().map(|p| (p.records.as_slice(), p.skipped)),
            &self.config.aggregator,
        );
        if !graph.has_data {
            log::info!("No valid records across {} file(s)", raws.len());
            return AnalysisOutcome::NoValidRecords { skipped: graph.skipped_lines };
        }

        let graph = classify(&graph, &self.config.classifier);
        let graph = layout(&graph, &self.config.layout, jitter);

        let records: Vec<CallRecord> = parsed.into_iter().flat_map(|p| p.records).collect();
        let analytics = AnalyticsBundle::project(&graph, &records, &self.config.aggregator);

        let report = AnalysisReport {
            run_id:      uuid::Uuid::new_v4().to_string(),
            analyzed_at: Utc::now(),
            files:       raws.len(),
            graph,
            records,
            analytics,
        };
        log::info!(
            "Run {} complete: {} records, {} skipped, {} nodes, {} edges",
            report.run_id,
            report.graph.total_records,
            report.graph.skipped_lines,
            report.graph.node_count(),
            report.graph.edge_count()
        );
        AnalysisOutcome::Complete(Box::new(report))
    }
}

impl Default for CdrEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
