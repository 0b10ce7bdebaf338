use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

use cisrank_graph::graph::{DependencyGraph, IndexedGraph, resolve_cycles, topological_sort};
use cisrank_graph::metrics::betweenness::compute_betweenness;
use cisrank_graph::metrics::pagerank::{PageRankConfig, compute_pagerank};
use cisrank_graph::score::{MetricsConfig, compute_metrics};

const SIZES: [usize; 3] = [500, 2_000, 10_000];

/// Synthetic repository graph: mostly forward dependencies (callers to
/// helpers with higher index), plus a sprinkling of back edges for cycles.
fn synthetic_graph(nodes: usize, seed: u64) -> DependencyGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<String> = (0..nodes).map(|i| format!("pkg{:03}.fn{i:06}", i % 97)).collect();
    let mut graph: DependencyGraph = ids
        .iter()
        .map(|id| (id.clone(), Default::default()))
        .collect();

    for (i, id) in ids.iter().enumerate() {
        let fan_out = rng.gen_range(0..6);
        for _ in 0..fan_out {
            let target = if rng.gen_bool(0.03) {
                rng.gen_range(0..nodes)
            } else {
                rng.gen_range(i..nodes)
            };
            if let Some(deps) = graph.get_mut(id) {
                deps.insert(ids[target].clone());
            }
        }
    }

    graph
}

fn bench_betweenness(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality.betweenness");
    group.sample_size(10);

    for nodes in SIZES {
        let ig = IndexedGraph::from_dependency_graph(&synthetic_graph(nodes, 0xC15));
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::new("sampled_200", nodes), &ig, |b, ig| {
            b.iter(|| black_box(compute_betweenness(ig, 200, 0).len()));
        });
    }

    group.finish();
}

fn bench_pagerank(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality.pagerank");

    for nodes in SIZES {
        let ig = IndexedGraph::from_dependency_graph(&synthetic_graph(nodes, 0xC15));
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &ig, |b, ig| {
            b.iter(|| black_box(compute_pagerank(ig, &PageRankConfig::default()).iterations));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    for nodes in SIZES {
        let graph = synthetic_graph(nodes, 0xC15);
        group.bench_with_input(BenchmarkId::new("metrics", nodes), &graph, |b, g| {
            b.iter(|| black_box(compute_metrics(g, &MetricsConfig::default()).metrics.len()));
        });
        group.bench_with_input(BenchmarkId::new("resolve", nodes), &graph, |b, g| {
            b.iter(|| black_box(resolve_cycles(g).len()));
        });
        group.bench_with_input(BenchmarkId::new("topological_sort", nodes), &graph, |b, g| {
            b.iter(|| black_box(topological_sort(g).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_betweenness, bench_pagerank, bench_pipeline);
criterion_main!(benches);
