//! Shared helpers for integration tests.
//!
//! The oracle below computes a maximum matching with plain augmenting
//! paths (Kuhn's algorithm). It is slow but obviously correct, which is
//! all the tests need from it.

#![allow(dead_code)]

use exact_match::{CandidateGraph, Matches, Pattern, Value};

/// Size of a maximum matching in `graph`
pub fn max_matching(graph: &CandidateGraph) -> usize {
    let mut owner: Vec<Option<usize>> = vec![None; graph.item_count()];
    let mut size = 0;

    for p in 0..graph.pattern_count() {
        let mut visited = vec![false; graph.item_count()];
        if augment(graph, p, &mut visited, &mut owner) {
            size += 1;
        }
    }
    size
}

fn augment(graph: &CandidateGraph, p: usize, visited: &mut [bool], owner: &mut [Option<usize>]) -> bool {
    for &i in graph.candidates_for_pattern(p) {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let free = match owner[i] {
            None => true,
            Some(q) => augment(graph, q, visited, owner),
        };
        if free {
            owner[i] = Some(p);
            return true;
        }
    }
    false
}

/// Minimal missing + extra for built-in patterns, via the oracle
pub fn oracle_unmatched(patterns: &[Pattern], items: &[Value]) -> usize {
    let graph = CandidateGraph::build(patterns, items, |p, i| p.matches(i)).expect("infallible patterns");
    patterns.len() + items.len() - 2 * max_matching(&graph)
}

pub fn literals(values: &[i64]) -> Vec<Pattern> {
    values.iter().map(|&v| Pattern::literal(v)).collect()
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::from(v)).collect()
}
