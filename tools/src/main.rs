//! cdr-runner: headless CDR network analysis.
//!
//! Usage:
//!   cdr-runner --input a.txt --input b.txt
//!   cdr-runner --input a.txt --config engine.json --seed 7 --json
//!   cdr-runner --input a.txt --top 5 --width 1200 --height 900

use anyhow::{bail, Context, Result};
use cdr_core::{
    analytics::{strongest_edges, top_risk},
    AnalysisOutcome, AnalysisReport, CdrEngine, EngineConfig, SeededJitter,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let inputs: Vec<&str> = args
        .windows(2)
        .filter(|w| w[0] == "--input")
        .map(|w| w[1].as_str())
        .collect();
    if inputs.is_empty() {
        bail!("at least one --input <file> is required");
    }
    let json = args.iter().any(|a| a == "--json");
    let top = parse_arg(&args, "--top", 10usize);

    let mut config = match find_arg(&args, "--config") {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => EngineConfig::default(),
    };
    config.layout.width = parse_arg(&args, "--width", config.layout.width);
    config.layout.height = parse_arg(&args, "--height", config.layout.height);
    config.validate()?;

    let mut jitter = match find_arg(&args, "--seed").and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => SeededJitter::new(seed),
        None => SeededJitter::from_clock(),
    };

    let contents = inputs
        .iter()
        .map(|path| std::fs::read_to_string(path).with_context(|| format!("reading {path}")))
        .collect::<Result<Vec<String>>>()?;

    if !json {
        println!("CDR network analysis — cdr-runner");
        println!("  files:  {}", inputs.len());
        println!("  seed:   {}", jitter.seed());
        println!("  canvas: {}x{}", config.layout.width, config.layout.height);
        println!();
    }

    let engine = CdrEngine::new(config);
    let outcome = engine.analyze_batch(&contents, &mut jitter);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match &outcome {
        AnalysisOutcome::Complete(report) => print_summary(report, top),
        AnalysisOutcome::InvalidFormat { file_index, .. } => {
            let path = inputs.get(*file_index).copied().unwrap_or("?");
            log::error!("{path}: {}", outcome.user_message());
            println!("{}", outcome.user_message());
        }
        AnalysisOutcome::NoValidRecords { .. } => println!("{}", outcome.user_message()),
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport, top: usize) {
    let graph = &report.graph;
    println!("=== RUN SUMMARY ===");
    println!("  run_id:    {}", report.run_id);
    println!("  analyzed:  {}", report.analyzed_at.to_rfc3339());
    println!("  records:   {}", graph.total_records);
    println!("  skipped:   {}", graph.skipped_lines);
    println!("  phones:    {}", graph.node_count());
    println!("  links:     {}", graph.edge_count());

    println!();
    println!("=== ROLES ===");
    for (role, count) in &report.analytics.role_breakdown {
        println!("  {:<10} {count}", role.label());
    }

    println!();
    println!("=== HIGHEST RISK (top {top}) ===");
    for node in top_risk(graph, top) {
        println!(
            "  {:<16} {:<10} risk {:>5.1} | contacts {:>3} | calls {:>4} | avg {:>6.1}s",
            node.id,
            node.role.label(),
            node.risk_score,
            node.connections(),
            node.total_calls,
            node.avg_duration().unwrap_or(0.0)
        );
    }

    println!();
    println!("=== STRONGEST LINKS (top {top}) ===");
    for edge in strongest_edges(graph, top) {
        println!(
            "  {:<16} <-> {:<16} calls {:>4} | {:>6}s | strength {:.1}",
            edge.source(),
            edge.target(),
            edge.call_count,
            edge.total_duration,
            edge.strength
        );
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
