//! Layout engine — tiered radial coordinates for rendering.
//!
//! Each role gets a ring; the most senior roles sit closest to the
//! center. A node's angle comes from its first-seen index over the
//! whole graph, not its index within the ring, so the same input
//! always yields the same base position.

use crate::{
    config::LayoutConfig,
    graph::{NetworkGraph, Role},
    rng::JitterSource,
};
use std::f64::consts::PI;

/// Ring radius as a fraction of half the smaller canvas side.
pub fn tier_fraction(role: Role) -> f64 {
    match role {
        Role::Kingpin   => 0.15,
        Role::Middleman => 0.40,
        Role::Peddler   => 0.65,
        Role::Customer | Role::Unknown => 0.90,
    }
}

pub fn tier_radius(role: Role, config: &LayoutConfig) -> f64 {
    tier_fraction(role) * config.width.min(config.height) / 2.0
}

/// Return a copy of `graph` with every node positioned.
pub fn layout(
    graph: &NetworkGraph,
    config: &LayoutConfig,
    jitter: &mut dyn JitterSource,
) -> NetworkGraph {
    let mut placed = graph.clone();
    let (cx, cy) = (config.width / 2.0, config.height / 2.0);
    let total = placed.node_count().max(1) as f64;

    for (index, node) in placed.nodes_mut().iter_mut().enumerate() {
        let angle = 2.0 * PI * index as f64 / total;
        let radius = tier_radius(node.role, config);
        node.x = cx + radius * angle.cos() + jitter.offset(config.jitter);
        node.y = cy + radius * angle.sin() + jitter.offset(config.jitter);
    }
    placed
}
