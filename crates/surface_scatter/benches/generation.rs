mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::{
    ClusterSettings, CountRange, FloatRange, PrimitiveWorld, ScatterConfig, Scatterer,
    StabilitySettings,
};

fn bench_run(
    c: &mut Criterion,
    group_name: &str,
    world: &PrimitiveWorld,
    configs: &[(usize, ScatterConfig)],
) {
    let mut group = c.benchmark_group(group_name);

    for (population, config) in configs {
        // Preview a run to set meaningful throughput in "placements per iteration".
        let mut preview = Scatterer::new(config.clone(), StdRng::seed_from_u64(0xD3ADB33F));
        let expected = preview
            .run_to_completion(world, &mut (), &mut ())
            .map(|s| s.placed)
            .unwrap_or(0);
        group.throughput(common::elements_throughput(expected));

        group.bench_with_input(BenchmarkId::from_parameter(population), config, |b, config| {
            b.iter_batched(
                || Scatterer::new(config.clone(), StdRng::seed_from_u64(12345)),
                |mut scatterer| {
                    let summary = scatterer.run_to_completion(world, &mut (), &mut ());
                    black_box(summary.map(|s| s.placed).unwrap_or(0));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

pub fn generation_benches(c: &mut Criterion) {
    let world = common::boulder_field(256.0, 16.0);

    let uniform: Vec<_> = [100usize, 500, 2000]
        .into_iter()
        .map(|n| (n, common::field_config(256.0, n)))
        .collect();
    bench_run(c, "generation/uniform", &world, &uniform);

    let stable: Vec<_> = [100usize, 500]
        .into_iter()
        .map(|n| {
            let config = common::field_config(256.0, n).with_stability(StabilitySettings {
                radius: 1.0,
                ..Default::default()
            });
            (n, config)
        })
        .collect();
    bench_run(c, "generation/stability", &world, &stable);

    let clustered: Vec<_> = [100usize, 500]
        .into_iter()
        .map(|n| {
            let config = common::field_config(256.0, n).with_clustering(ClusterSettings {
                count: n / 10,
                radius: FloatRange::new(5.0, 12.0),
                objects_per_cluster: CountRange::new(8, 14),
                min_distance: 15.0,
            });
            (n, config)
        })
        .collect();
    bench_run(c, "generation/clustered", &world, &clustered);
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = generation_benches
}
criterion_main!(benches);
