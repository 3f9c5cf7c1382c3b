//! exact-match - demo binary
//!
//! Runs a handful of matches and prints what the engine reports.
//! Set `RUST_LOG=exact_match=debug` (or `trace`) to watch the reducer
//! and the solver at work.

use std::error::Error;

use exact_match::{match_items, MatchError, Pattern, Value};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("===========================================");
    println!("  exact-match - order-independent matching");
    println!("===========================================");
    println!();

    demo("surplus duplicate", vec![Pattern::literal(1), Pattern::literal(5)], vec![1.into(), 1.into(), 5.into()])?;
    demo("missing duplicate", vec![Pattern::literal(1), Pattern::literal(1), Pattern::literal(5)], vec![1.into(), 5.into()])?;

    let overlapping = vec![Pattern::regex("fool")?, Pattern::regex("foo")?];
    demo("overlapping regexes", overlapping, vec!["food".into(), "fool".into()])?;

    let duplicates: Vec<Pattern> = (0..25).map(|n| Pattern::literal(n % 3)).collect();
    let items: Vec<Value> = (0..24).map(|n| Value::from((n + 1) % 3)).collect();
    demo("25 patterns, 3 distinct values", duplicates, items)?;

    Ok(())
}

fn demo(title: &str, patterns: Vec<Pattern>, items: Vec<Value>) -> Result<(), MatchError> {
    let result = match_items(&patterns, &items)?;

    println!("{}:", title);
    println!("  success:    {}", result.success);
    if !result.missing.is_empty() {
        let missing: Vec<String> = result.missing_for_display().iter().map(|p| p.to_string()).collect();
        println!("  missing:    [{}]", missing.join(", "));
    }
    if !result.extra.is_empty() {
        let extra: Vec<String> = result.extra_for_display().iter().map(|v| v.to_string()).collect();
        println!("  extra:      [{}]", extra.join(", "));
    }
    println!(
        "  forced:     {} pairs, residual {} nodes, {} search nodes",
        result.stats.forced_pairs, result.stats.residual_size, result.stats.search_nodes
    );
    println!();

    Ok(())
}
