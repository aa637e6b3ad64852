//! Graph aggregator — folds call records into a `NetworkGraph`.
//!
//! Counts and sums are independent of record order. Only first-seen
//! order of nodes and edges follows the input sequence.

use crate::{
    config::AggregatorConfig,
    graph::NetworkGraph,
    record::{CallDirection, CallRecord},
    types::PairKey,
};

pub struct GraphAggregator<'a> {
    config: &'a AggregatorConfig,
    graph:  NetworkGraph,
}

impl<'a> GraphAggregator<'a> {
    pub fn new(config: &'a AggregatorConfig) -> Self {
        Self { config, graph: NetworkGraph::new() }
    }

    /// Fold one batch of records. Batches are applied in call order.
    pub fn fold(&mut self, records: &[CallRecord], skipped: usize) {
        for record in records {
            self.add_record(record);
        }
        self.graph.total_records += records.len();
        self.graph.skipped_lines += skipped;
        self.graph.has_data = self.graph.total_records > 0;
    }

    pub fn finish(self) -> NetworkGraph {
        log::debug!(
            "Aggregated {} records into {} nodes / {} edges",
            self.graph.total_records,
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.graph
    }

    fn add_record(&mut self, record: &CallRecord) {
        let direction = record.direction();
        let sms = record.is_sms();
        let imei = record.has_imei(self.config.min_imei_len).then_some(record.imei.as_str());

        let endpoints = [
            (&record.calling_party, &record.called_party),
            (&record.called_party, &record.calling_party),
        ];
        for (phone, peer) in endpoints {
            let node = self.graph.node_entry(phone);
            if node.total_calls == 0 {
                node.first_seen_date = record.call_date.clone();
            }
            node.total_calls += 1;
            node.total_duration += record.duration_seconds;
            node.contacts.insert(peer.clone());

            for location in [&record.first_cell_location, &record.last_cell_location] {
                if location.chars().count() >= self.config.min_location_len {
                    node.locations.insert(location.clone());
                }
            }
            if let Some(imei) = imei {
                node.imeis.insert(imei.to_string());
            }

            // Types matching neither keyword count toward neither side.
            match direction {
                Some(CallDirection::Incoming) => node.incoming += 1,
                Some(CallDirection::Outgoing) => node.outgoing += 1,
                None => {}
            }
            if sms {
                node.sms_count += 1;
            }
        }

        let divisor = self.config.strength_divisor;
        let edge = self
            .graph
            .edge_entry(PairKey::new(&record.calling_party, &record.called_party));
        edge.call_count += 1;
        edge.total_duration += record.duration_seconds;
        if !edge.call_types.contains(&record.call_type) {
            edge.call_types.insert(record.call_type.clone());
        }
        edge.strength = (edge.call_count as f64 / divisor).min(1.0);
    }
}

/// Aggregate a single record list.
pub fn aggregate(records: &[CallRecord], skipped: usize, config: &AggregatorConfig) -> NetworkGraph {
    let mut aggregator = GraphAggregator::new(config);
    aggregator.fold(records, skipped);
    aggregator.finish()
}

/// Merge several per-file record lists in the given order.
pub fn aggregate_batches<'r, I>(batches: I, config: &AggregatorConfig) -> NetworkGraph
where
    I: IntoIterator<Item = (&'r [CallRecord], usize)>,
{
    let mut aggregator = GraphAggregator::new(config);
    for (records, skipped) in batches {
        aggregator.fold(records, skipped);
    }
    aggregator.finish()
}
