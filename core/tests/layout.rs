//! Layout reproducibility and tier placement.

use cdr_core::{
    aggregator::aggregate,
    classifier::classify,
    config::{ClassifierThresholds, LayoutConfig},
    layout::{layout, tier_radius},
    CallRecord, NetworkGraph, NoJitter, Role, SeededJitter,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn star_graph() -> NetworkGraph {
    let records: Vec<CallRecord> = (0..18)
        .map(|i| CallRecord {
            calling_party: "hub".into(),
            called_party: format!("leaf-{i}"),
            call_type: (if i % 2 == 0 { "Outgoing" } else { "Incoming" }).into(),
            duration_seconds: 100,
            ..Default::default()
        })
        .collect();
    classify(&aggregate(&records, 0, &Default::default()), &ClassifierThresholds::default())
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Same seed, same coordinates.
#[test]
fn seeded_layout_is_reproducible() {
    let graph = star_graph();
    let config = LayoutConfig::default();
    let a = layout(&graph, &config, &mut SeededJitter::new(1234));
    let b = layout(&graph, &config, &mut SeededJitter::new(1234));
    assert_eq!(a, b);

    let c = layout(&graph, &config, &mut SeededJitter::new(4321));
    assert_ne!(a, c, "a different seed should move at least one node");
}

/// Without jitter, every node sits exactly on its role's ring.
#[test]
fn nodes_sit_on_their_tier() {
    let config = LayoutConfig::default();
    let placed = layout(&star_graph(), &config, &mut NoJitter);
    let (cx, cy) = (config.width / 2.0, config.height / 2.0);

    assert_eq!(placed.node("hub").unwrap().role, Role::Kingpin);
    for node in placed.nodes() {
        let distance = ((node.x - cx).powi(2) + (node.y - cy).powi(2)).sqrt();
        assert!(
            (distance - tier_radius(node.role, &config)).abs() < 1e-6,
            "{} at distance {distance}",
            node.id
        );
    }
}

/// Angles come from the overall first-seen index.
#[test]
fn angle_follows_global_index() {
    let config = LayoutConfig { width: 200.0, height: 200.0, jitter: 0.0 };
    let placed = layout(&star_graph(), &config, &mut NoJitter);
    let total = placed.node_count() as f64;

    let leaf = placed.node("leaf-4").unwrap();
    let index = placed.position_of("leaf-4").unwrap() as f64;
    let expected = 2.0 * std::f64::consts::PI * index / total;
    let actual = (leaf.y - 100.0).atan2(leaf.x - 100.0).rem_euclid(2.0 * std::f64::consts::PI);
    assert!((actual - expected).abs() < 1e-9);
}

/// Jitter stays within the configured bound on each axis.
#[test]
fn jitter_is_bounded() {
    let config = LayoutConfig { jitter: 5.0, ..Default::default() };
    let graph = star_graph();
    let exact = layout(&graph, &config, &mut NoJitter);
    let jittered = layout(&graph, &config, &mut SeededJitter::new(99));
    for (e, j) in exact.nodes().iter().zip(jittered.nodes()) {
        assert!((e.x - j.x).abs() <= 5.0 && (e.y - j.y).abs() <= 5.0);
    }
}
