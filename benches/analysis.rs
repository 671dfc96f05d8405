//! Benchmarks for the code analyzers
//!
//! Run with: cargo bench --bench analysis

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use warroom::behaviors::{CodeReviewBehavior, OptimizationBehavior, SecurityBehavior};
use warroom::decision::SeededDecisions;
use warroom::{AgentRegistry, Capability};

const SNIPPET: &str = r#"function loadUser(id) {
  var query = "SELECT * FROM users WHERE id = '" + id + "'";
  const apiKey = "sk_live_0123456789abcdef";
  for (let i = 0; i < rows.length; i++) {
    for (let j = 0; j < rows.length; j++) {
      if (rows[i] == rows[j]) total += 1;
    }
  }
  return rows.map(r => r.name).filter(Boolean);
}
"#;

fn source(repeat: usize) -> String {
    SNIPPET.repeat(repeat)
}

fn bench_analyzers(c: &mut Criterion) {
    let registry = AgentRegistry::in_memory();
    let decisions = Arc::new(SeededDecisions::new(11));
    let reviewer = CodeReviewBehavior::new(decisions.clone());
    let scanner = SecurityBehavior::new(decisions);
    let optimizer = OptimizationBehavior::new();

    let agent = registry.create_agent(
        SecurityBehavior::default_profile("Bench Agent", "all passes").with_experience(1000),
    );
    for module in agent.modules() {
        registry.set_module_active(agent.id(), &module.id, true);
    }
    let agent = registry.get_agent(agent.id()).unwrap_or(agent);
    assert!(agent.has_active_capability(Capability::SecurityAnalysis, 3));

    let mut group = c.benchmark_group("analyzers");
    for repeat in [1usize, 10, 100] {
        let code = source(repeat);
        group.bench_with_input(BenchmarkId::new("code_review", repeat), &code, |b, code| {
            b.iter(|| reviewer.review(black_box(&agent), black_box(code), "javascript", "bench.js"));
        });
        group.bench_with_input(BenchmarkId::new("security", repeat), &code, |b, code| {
            b.iter(|| scanner.scan(black_box(&agent), black_box(code), "javascript", "bench.js"));
        });
        group.bench_with_input(BenchmarkId::new("optimization", repeat), &code, |b, code| {
            b.iter(|| optimizer.analyze(black_box(&agent), black_box(code), "javascript", "bench.js"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyzers);
criterion_main!(benches);
