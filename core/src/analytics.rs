//! Analytics projector — read-only views over a finished analysis.
//!
//! Summary rows come from the aggregated graph; slices come from the
//! parsed records. Nothing here re-parses or re-aggregates.

use crate::{
    config::AggregatorConfig,
    graph::{ConnectionEdge, NetworkGraph, PhoneNode, Role},
    record::CallRecord,
    types::PhoneId,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneSummary {
    pub phone:           PhoneId,
    pub contacts:        usize,
    pub incoming:        u64,
    pub outgoing:        u64,
    pub total_calls:     u64,
    pub sms_count:       u64,
    pub total_duration:  u64,
    pub first_seen_date: String,
    pub imei_count:      usize,
    pub location_count:  usize,
    pub role:            Role,
    pub risk_score:      f64,
}

impl From<&PhoneNode> for PhoneSummary {
    fn from(node: &PhoneNode) -> Self {
        Self {
            phone:           node.id.clone(),
            contacts:        node.connections(),
            incoming:        node.incoming,
            outgoing:        node.outgoing,
            total_calls:     node.total_calls,
            sms_count:       node.sms_count,
            total_duration:  node.total_duration,
            first_seen_date: node.first_seen_date.clone(),
            imei_count:      node.imeis.len(),
            location_count:  node.locations.len(),
            role:            node.role,
            risk_score:      node.risk_score,
        }
    }
}

/// One summary row per phone, in first-seen order.
pub fn phone_summaries(graph: &NetworkGraph) -> Vec<PhoneSummary> {
    graph.nodes().iter().map(PhoneSummary::from).collect()
}

// ── Record slices ────────────────────────────────────────────────────────────

pub fn incoming_records(records: &[CallRecord]) -> Vec<&CallRecord> {
    records.iter().filter(|r| r.is_incoming()).collect()
}

pub fn outgoing_records(records: &[CallRecord]) -> Vec<&CallRecord> {
    records.iter().filter(|r| r.is_outgoing()).collect()
}

pub fn sms_records(records: &[CallRecord]) -> Vec<&CallRecord> {
    records.iter().filter(|r| r.is_sms()).collect()
}

pub fn imei_records<'r>(records: &'r [CallRecord], config: &AggregatorConfig) -> Vec<&'r CallRecord> {
    records.iter().filter(|r| r.has_imei(config.min_imei_len)).collect()
}

pub fn location_records<'r>(records: &'r [CallRecord], config: &AggregatorConfig) -> Vec<&'r CallRecord> {
    records
        .iter()
        .filter(|r| r.has_first_location(config.min_location_len))
        .collect()
}

// ── Graph-level views ────────────────────────────────────────────────────────

/// Node count per role, every role present (zero when unused).
pub fn role_breakdown(graph: &NetworkGraph) -> BTreeMap<Role, usize> {
    let mut counts: BTreeMap<Role, usize> = Role::ALL.iter().map(|&r| (r, 0)).collect();
    for node in graph.nodes() {
        *counts.entry(node.role).or_default() += 1;
    }
    counts
}

/// Highest-risk nodes first; ties keep first-seen order.
pub fn top_risk(graph: &NetworkGraph, limit: usize) -> Vec<&PhoneNode> {
    let mut nodes: Vec<&PhoneNode> = graph.nodes().iter().collect();
    nodes.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    nodes.truncate(limit);
    nodes
}

/// Busiest edges first; ties broken by total duration, then first-seen order.
pub fn strongest_edges(graph: &NetworkGraph, limit: usize) -> Vec<&ConnectionEdge> {
    let mut edges: Vec<&ConnectionEdge> = graph.edges().iter().collect();
    edges.sort_by(|a, b| {
        b.call_count
            .cmp(&a.call_count)
            .then(b.total_duration.cmp(&a.total_duration))
    });
    edges.truncate(limit);
    edges
}

/// Phones that both `a` and `b` have been in contact with.
pub fn common_contacts(graph: &NetworkGraph, a: &str, b: &str) -> Vec<PhoneId> {
    match (graph.node(a), graph.node(b)) {
        (Some(na), Some(nb)) => na.contacts.intersection(&nb.contacts).cloned().collect(),
        _ => Vec::new(),
    }
}

/// All projections bundled for callers that want everything at once.
///
/// Record slices are positions into the record list the bundle was
/// projected from; `resolve` turns them back into records.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsBundle {
    pub summaries:      Vec<PhoneSummary>,
    pub role_breakdown: BTreeMap<Role, usize>,
    pub incoming:       Vec<usize>,
    pub outgoing:       Vec<usize>,
    pub imei:           Vec<usize>,
    pub location:       Vec<usize>,
    pub sms:            Vec<usize>,
}

impl AnalyticsBundle {
    pub fn project(graph: &NetworkGraph, records: &[CallRecord], config: &AggregatorConfig) -> Self {
        let positions = |keep: &dyn Fn(&CallRecord) -> bool| -> Vec<usize> {
            records
                .iter()
                .enumerate()
                .filter(|(_, r)| keep(r))
                .map(|(i, _)| i)
                .collect()
        };
        Self {
            summaries:      phone_summaries(graph),
            role_breakdown: role_breakdown(graph),
            incoming:       positions(&|r| r.is_incoming()),
            outgoing:       positions(&|r| r.is_outgoing()),
            imei:           positions(&|r| r.has_imei(config.min_imei_len)),
            location:       positions(&|r| r.has_first_location(config.min_location_len)),
            sms:            positions(&|r| r.is_sms()),
        }
    }

    /// Borrow the records a slice points at. Out-of-range positions are ignored.
    pub fn resolve<'r>(slice: &[usize], records: &'r [CallRecord]) -> Vec<&'r CallRecord> {
        slice.iter().filter_map(|&i| records.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;

    fn rec(from: &str, to: &str, call_type: &str, imei: &str, loc: &str) -> CallRecord {
        CallRecord {
            calling_party: from.into(),
            called_party: to.into(),
            call_type: call_type.into(),
            imei: imei.into(),
            first_cell_location: loc.into(),
            duration_seconds: 10,
            ..Default::default()
        }
    }

    fn sample() -> Vec<CallRecord> {
        vec![
            rec("A", "B", "Outgoing Call", "356938035643809", "TOWER-1"),
            rec("A", "C", "Incoming Call", "", ""),
            rec("B", "C", "Outgoing SMS", "12", "T9"),
            rec("C", "A", "Call Forward", "", "TOWER-7"),
        ]
    }

    #[test]
    fn slices_filter_parsed_records() {
        let records = sample();
        let config = AggregatorConfig::default();
        assert_eq!(incoming_records(&records).len(), 1);
        assert_eq!(outgoing_records(&records).len(), 2);
        assert_eq!(sms_records(&records).len(), 1);
        assert_eq!(imei_records(&records, &config).len(), 1);
        assert_eq!(location_records(&records, &config).len(), 2);
    }

    #[test]
    fn summary_row_mirrors_node() {
        let graph = aggregate(&sample(), 0, &AggregatorConfig::default());
        let rows = phone_summaries(&graph);
        assert_eq!(rows.len(), 3);
        let a = &rows[0];
        assert_eq!(a.phone, "A");
        assert_eq!(a.contacts, 2);
        assert_eq!(a.total_calls, 3);
        assert_eq!((a.incoming, a.outgoing), (1, 1));
        assert_eq!(a.imei_count, 1);
        assert_eq!(a.location_count, 2);
    }

    #[test]
    fn common_contacts_and_rankings() {
        let graph = aggregate(&sample(), 0, &AggregatorConfig::default());
        assert_eq!(common_contacts(&graph, "A", "B"), vec!["C".to_string()]);
        assert!(common_contacts(&graph, "A", "Z").is_empty());

        let top = strongest_edges(&graph, 1);
        assert_eq!(top[0].key.to_string(), "A-C");
        assert_eq!(top[0].call_count, 2);

        let breakdown = role_breakdown(&graph);
        assert_eq!(breakdown.len(), Role::ALL.len());
        assert_eq!(breakdown[&Role::Unknown], 3, "unclassified graph");
    }

    #[test]
    fn bundle_slices_point_into_records() {
        let records = sample();
        let config = AggregatorConfig::default();
        let graph = aggregate(&records, 0, &config);
        let bundle = AnalyticsBundle::project(&graph, &records, &config);

        assert_eq!(bundle.incoming, vec![1]);
        assert_eq!(bundle.outgoing, vec![0, 2]);
        assert_eq!(bundle.location, vec![0, 3]);
        assert_eq!(
            AnalyticsBundle::resolve(&bundle.outgoing, &records),
            outgoing_records(&records)
        );
        assert!(std::ptr::eq(AnalyticsBundle::resolve(&bundle.sms, &records)[0], &records[2]));
    }
}
