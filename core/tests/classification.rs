//! Classifier boundaries and guards, driven through the public API.

use cdr_core::{
    classifier::{classify, classify_node},
    config::ClassifierThresholds,
    NetworkGraph, PhoneNode, Role,
};
use std::collections::BTreeSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn node_with(contacts: usize, total_calls: u64, outgoing: u64, avg_duration: u64) -> PhoneNode {
    PhoneNode {
        id: "target".into(),
        total_calls,
        outgoing,
        incoming: total_calls - outgoing,
        total_duration: total_calls * avg_duration,
        contacts: (0..contacts).map(|i| format!("peer-{i}")).collect::<BTreeSet<_>>(),
        ..Default::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 15 contacts, average 91s, balanced direction → Kingpin at base risk.
#[test]
fn kingpin_boundary() {
    let node = node_with(15, 30, 15, 91);
    assert_eq!(
        classify_node(&node, &ClassifierThresholds::default()),
        (Role::Kingpin, 85.0)
    );
}

/// One contact short of the Kingpin band is never a Kingpin.
#[test]
fn fourteen_contacts_is_not_kingpin() {
    let node = node_with(14, 30, 15, 91);
    let (role, risk) = classify_node(&node, &ClassifierThresholds::default());
    assert_ne!(role, Role::Kingpin);
    // 91s is too long for a Peddler and too short for a Middleman.
    assert_eq!((role, risk), (Role::Unknown, 20.0));
}

/// Ratio bounds are strict: exactly 0.6 outgoing is not balanced.
#[test]
fn kingpin_ratio_bounds_are_exclusive() {
    let node = node_with(20, 10, 6, 100);
    let (role, _) = classify_node(&node, &ClassifierThresholds::default());
    assert_ne!(role, Role::Kingpin);
}

/// A node with zero calls resolves to Unknown/20 without dividing by zero.
#[test]
fn zero_call_node_is_unknown() {
    let mut node = PhoneNode::new("silent");
    node.contacts.insert("someone".into());
    assert_eq!(
        classify_node(&node, &ClassifierThresholds::default()),
        (Role::Unknown, 20.0)
    );
}

/// Thresholds are configuration, not hidden constants.
#[test]
fn thresholds_can_be_tuned() {
    let relaxed = ClassifierThresholds { kingpin_min_contacts: 10, ..Default::default() };
    let node = node_with(12, 30, 15, 100);
    assert_eq!(classify_node(&node, &relaxed), (Role::Kingpin, 87.0));
}

/// Every risk score lands in [0, 100] and classification does not touch counts.
#[test]
fn classify_preserves_aggregates() {
    let graph = cdr_core::aggregator::aggregate(
        &(0..20)
            .map(|i| cdr_core::CallRecord {
                calling_party: "hub".into(),
                called_party: format!("spoke-{i}"),
                call_type: (if i % 2 == 0 { "Outgoing Call" } else { "Incoming Call" }).into(),
                duration_seconds: 120,
                ..Default::default()
            })
            .collect::<Vec<_>>(),
        0,
        &Default::default(),
    );
    let classified: NetworkGraph = classify(&graph, &ClassifierThresholds::default());

    let hub = classified.node("hub").unwrap();
    assert_eq!(hub.role, Role::Kingpin);
    assert_eq!(hub.risk_score, 90.0);
    assert_eq!(classified.node("spoke-3").unwrap().role, Role::Customer);
    for node in classified.nodes() {
        assert!((0.0..=100.0).contains(&node.risk_score));
        assert_eq!(node.total_calls, graph.node(&node.id).unwrap().total_calls);
    }
}
