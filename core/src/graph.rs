//! Contact graph data model — nodes, edges, and the run-level result.

use crate::types::{PairKey, PhoneId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Unknown,
    Kingpin,
    Middleman,
    Peddler,
    Customer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Kingpin,
        Role::Middleman,
        Role::Peddler,
        Role::Customer,
        Role::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown   => "unknown",
            Self::Kingpin   => "kingpin",
            Self::Middleman => "middleman",
            Self::Peddler   => "peddler",
            Self::Customer  => "customer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNode {
    pub id:              PhoneId,
    pub total_calls:     u64,
    pub incoming:        u64,
    pub outgoing:        u64,
    pub sms_count:       u64,
    pub total_duration:  u64,
    pub contacts:        BTreeSet<PhoneId>,
    pub locations:       BTreeSet<String>,
    pub imeis:           BTreeSet<String>,
    /// Call date of the first record that mentioned this phone.
    pub first_seen_date: String,
    pub role:            Role,
    pub risk_score:      f64,
    pub x:               f64,
    pub y:               f64,
}

impl PhoneNode {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), ..Default::default() }
    }

    pub fn connections(&self) -> usize {
        self.contacts.len()
    }

    /// Average call duration in seconds, `None` when there are no calls.
    pub fn avg_duration(&self) -> Option<f64> {
        (self.total_calls > 0).then(|| self.total_duration as f64 / self.total_calls as f64)
    }

    pub fn outgoing_ratio(&self) -> Option<f64> {
        (self.total_calls > 0).then(|| self.outgoing as f64 / self.total_calls as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub key:            PairKey,
    pub call_count:     u64,
    pub total_duration: u64,
    pub call_types:     BTreeSet<String>,
    /// Normalized call count in [0, 1]. Layout emphasis only.
    pub strength:       f64,
}

impl ConnectionEdge {
    pub fn new(key: PairKey) -> Self {
        Self {
            key,
            call_count: 0,
            total_duration: 0,
            call_types: BTreeSet::new(),
            strength: 0.0,
        }
    }

    pub fn source(&self) -> &str { self.key.low()  }
    pub fn target(&self) -> &str { self.key.high() }
}

/// The full result of one analysis run.
///
/// Nodes and edges keep first-seen order; lookups go through index maps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkGraph {
    nodes: Vec<PhoneNode>,
    edges: Vec<ConnectionEdge>,
    #[serde(skip)]
    node_index: HashMap<PhoneId, usize>,
    #[serde(skip)]
    edge_index: HashMap<PairKey, usize>,
    pub total_records: usize,
    pub skipped_lines: usize,
    /// True once at least one valid record has been folded in.
    pub has_data: bool,
}

impl PartialEq for NetworkGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.edges == other.edges
            && self.total_records == other.total_records
            && self.skipped_lines == other.skipped_lines
            && self.has_data == other.has_data
    }
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[PhoneNode] { &self.nodes }
    pub fn edges(&self) -> &[ConnectionEdge] { &self.edges }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn node(&self, id: &str) -> Option<&PhoneNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Edge between two phones, in either argument order.
    pub fn edge(&self, a: &str, b: &str) -> Option<&ConnectionEdge> {
        self.edge_index.get(&PairKey::new(a, b)).map(|&i| &self.edges[i])
    }

    /// Position of a node in first-seen order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn node_entry(&mut self, id: &str) -> &mut PhoneNode {
        let index = match self.node_index.get(id) {
            Some(&i) => i,
            None => {
                self.nodes.push(PhoneNode::new(id));
                self.node_index.insert(id.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[index]
    }

    pub(crate) fn edge_entry(&mut self, key: PairKey) -> &mut ConnectionEdge {
        let index = match self.edge_index.get(&key) {
            Some(&i) => i,
            None => {
                self.edges.push(ConnectionEdge::new(key.clone()));
                self.edge_index.insert(key, self.edges.len() - 1);
                self.edges.len() - 1
            }
        };
        &mut self.edges[index]
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [PhoneNode] {
        &mut self.nodes
    }
}
