//! Call Detail Record network analysis.
//!
//! Pipeline: raw export text → `parser` → `aggregator` → `classifier`
//! → `layout` → `analytics`. `engine::CdrEngine` runs all of it.

pub mod aggregator;
pub mod analytics;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod record;
pub mod rng;
pub mod types;

pub use config::EngineConfig;
pub use engine::{AnalysisOutcome, AnalysisReport, CdrEngine};
pub use error::{CdrError, CdrResult};
pub use graph::{ConnectionEdge, NetworkGraph, PhoneNode, Role};
pub use record::CallRecord;
pub use rng::{JitterSource, NoJitter, SeededJitter};
