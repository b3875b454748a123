use std::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use finrisk::MonteCarloConfig;
use finrisk::MonteCarloSimulator;

fn bench_simulation(c: &mut Criterion) {
  let mut group = c.benchmark_group("MonteCarlo");

  for &num_simulations in &[100, 1_000, 10_000] {
    for parallel in [false, true] {
      let label = if parallel { "parallel" } else { "sequential" };
      let sim = MonteCarloSimulator::new(MonteCarloConfig {
        horizon_days: 252,
        num_simulations,
        seed: Some(42),
        parallel,
      });

      group.bench_with_input(
        BenchmarkId::new(label, num_simulations),
        &num_simulations,
        |b, _| b.iter(|| black_box(sim.simulate(100.0, 0.0004, 0.012).unwrap())),
      );
    }
  }

  group.finish();
}

criterion_group!(benches, bench_simulation);
criterion_main!(benches);
