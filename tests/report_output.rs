//! Reporting collaborator: file formats and serialization round-trips.

use std::fs;

use influence_oracle::output::{format_summary, ReportWriter};
use influence_oracle::{
    AdjacencyGraph, InfluenceMaximizer, Outcome, ReverseIcCascade, Strategy,
};

fn chain() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(5, (0..4).map(|i| (i, i + 1, 1.0))).unwrap()
}

fn completed_outcome() -> Outcome {
    let graph = chain();
    let oracle = ReverseIcCascade::new(&graph, 9);
    InfluenceMaximizer::new()
        .seed_budget(2)
        .run(&graph, &oracle, Strategy::Fixed { num_samples: 300 })
        .unwrap()
}

#[test]
fn seed_file_has_one_line_per_seed() {
    let outcome = completed_outcome();
    let dir = std::env::temp_dir().join("influence_oracle_report_test");
    fs::create_dir_all(&dir).unwrap();

    let writer = ReportWriter::for_strategy(&dir, Strategy::Fixed { num_samples: 300 });
    writer.write(&outcome).unwrap();

    let seeds_text = fs::read_to_string(writer.seeds_path()).unwrap();
    let lines: Vec<&str> = seeds_text.lines().collect();
    assert_eq!(lines.len(), outcome.len());
    for line in &lines {
        let mut fields = line.split_whitespace();
        let node: u32 = fields.next().unwrap().parse().unwrap();
        let spread: f64 = fields.next().unwrap().parse().unwrap();
        assert!(node < 5);
        assert!(spread > 0.0);
        assert!(fields.next().is_none());
    }

    let timing_text = fs::read_to_string(writer.timing_path()).unwrap();
    assert!(timing_text.contains("runtime_secs"));
    assert!(timing_text.contains("rr_sets 300"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn timed_seed_file_has_three_columns() {
    let graph = chain();
    let oracle = ReverseIcCascade::new(&graph, 10);
    let outcome = InfluenceMaximizer::new()
        .seed_budget(2)
        .epsilon(0.3)
        .horizon(2)
        .run(&graph, &oracle, Strategy::TimeIndexed)
        .unwrap();

    let mut buf = Vec::new();
    influence_oracle::output::write_entries(&mut buf, &outcome).unwrap();
    let text = String::from_utf8(buf).unwrap();
    for line in text.lines() {
        assert_eq!(line.split_whitespace().count(), 3);
    }
}

#[test]
fn outcome_serializes_round_trip() {
    let outcome = completed_outcome();
    let json = serde_json::to_string(&outcome).unwrap();
    let back: Outcome = serde_json::from_str(&json).unwrap();
    assert_eq!(outcome, back);
}

#[test]
fn summary_is_renderable_for_every_variant() {
    let graph = chain();

    let strategies = [
        Strategy::Fixed { num_samples: 200 },
        Strategy::ValueAccumulation,
        Strategy::ContinuousBudget,
    ];
    for (i, &strategy) in strategies.iter().enumerate() {
        let oracle = ReverseIcCascade::new(&graph, 20 + i as u64);
        let outcome = InfluenceMaximizer::new()
            .seed_budget(1)
            .epsilon(0.3)
            .budget(1.0)
            .step(0.5)
            .run(&graph, &oracle, strategy)
            .unwrap();
        let summary = format_summary(&outcome);
        assert!(summary.contains("spread estimate"));
    }
}
