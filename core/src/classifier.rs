//! Role classifier — assigns a role and risk score to every node.
//!
//! RULE: rules are evaluated in list order and the first match wins.
//! The bands overlap, so the order is part of the heuristic. New roles
//! are appended or inserted as new entries; existing thresholds never
//! need to move.

use crate::{
    config::ClassifierThresholds,
    graph::{NetworkGraph, PhoneNode, Role},
};

/// Aggregated figures a rule looks at. Only built for nodes with calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStats {
    pub contacts:       usize,
    pub avg_duration:   f64,
    pub outgoing_ratio: f64,
}

impl NodeStats {
    /// `None` for a node without calls; such nodes skip every rule.
    pub fn of(node: &PhoneNode) -> Option<Self> {
        Some(Self {
            contacts:       node.connections(),
            avg_duration:   node.avg_duration()?,
            outgoing_ratio: node.outgoing_ratio()?,
        })
    }
}

pub struct RoleRule {
    pub role:    Role,
    pub matches: fn(&NodeStats, &ClassifierThresholds) -> bool,
    pub risk:    fn(&NodeStats, &ClassifierThresholds) -> f64,
}

/// Priority-ordered rules. Anything that matches none is `Role::Unknown`.
pub const RULES: [RoleRule; 4] = [
    RoleRule {
        role: Role::Kingpin,
        matches: |s, t| {
            s.contacts >= t.kingpin_min_contacts
                && s.avg_duration > t.kingpin_min_avg_duration
                && s.outgoing_ratio > t.kingpin_outgoing_ratio_low
                && s.outgoing_ratio < t.kingpin_outgoing_ratio_high
        },
        risk: |s, t| {
            let extra = s.contacts.saturating_sub(t.kingpin_min_contacts) as f64;
            t.kingpin_base_risk + extra.min(t.kingpin_risk_bonus_cap)
        },
    },
    RoleRule {
        role: Role::Peddler,
        matches: |s, t| {
            s.contacts >= t.peddler_min_contacts
                && s.outgoing_ratio > t.peddler_min_outgoing_ratio
                && s.avg_duration < t.peddler_max_avg_duration
        },
        risk: |s, t| {
            let extra = s.contacts.saturating_sub(t.peddler_min_contacts) as f64;
            t.peddler_base_risk + extra.min(t.peddler_risk_bonus_cap)
        },
    },
    RoleRule {
        role: Role::Middleman,
        matches: |s, t| {
            s.contacts >= t.middleman_min_contacts && s.avg_duration > t.middleman_min_avg_duration
        },
        risk: |s, t| {
            let bonus = s.contacts as f64 * t.middleman_risk_per_contact;
            t.middleman_base_risk + bonus.min(t.middleman_risk_bonus_cap)
        },
    },
    RoleRule {
        role: Role::Customer,
        matches: |s, t| s.contacts <= t.customer_max_contacts,
        risk: |s, t| {
            let bonus = s.avg_duration / t.customer_duration_divisor;
            t.customer_base_risk + bonus.min(t.customer_risk_bonus_cap)
        },
    },
];

/// Classify one node without modifying it.
pub fn classify_node(node: &PhoneNode, thresholds: &ClassifierThresholds) -> (Role, f64) {
    let Some(stats) = NodeStats::of(node) else {
        return (Role::Unknown, clamp_risk(thresholds.unknown_risk));
    };
    RULES
        .iter()
        .find(|rule| (rule.matches)(&stats, thresholds))
        .map(|rule| (rule.role, clamp_risk((rule.risk)(&stats, thresholds))))
        .unwrap_or((Role::Unknown, clamp_risk(thresholds.unknown_risk)))
}

/// Return a copy of `graph` with role and risk assigned to every node.
pub fn classify(graph: &NetworkGraph, thresholds: &ClassifierThresholds) -> NetworkGraph {
    let mut classified = graph.clone();
    for node in classified.nodes_mut() {
        let (role, risk) = classify_node(node, thresholds);
        node.role = role;
        node.risk_score = risk;
    }
    log::debug!("Classified {} nodes", classified.node_count());
    classified
}

fn clamp_risk(risk: f64) -> f64 {
    risk.clamp(0.0, 100.0)
}
