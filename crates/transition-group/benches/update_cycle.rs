use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use transition_group::{TransitionChild, TransitionGroup, TransitionGroupConfig};

const GROUP_SIZES: &[usize] = &[2, 8, 32, 128];

#[derive(Clone)]
struct Tile(u32);

impl TransitionChild<u32> for Tile {}

fn group(size: usize) -> TransitionGroup<u32, Tile> {
    TransitionGroup::new(TransitionGroupConfig::default().with_size(size)).expect("group")
}

fn window(start: u32, len: usize) -> Vec<(u32, Tile)> {
    (start..start + len as u32).map(|key| (key, Tile(key))).collect()
}

fn bench_unchanged_updates(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("unchanged_update");
    for &size in GROUP_SIZES {
        let transitions = group(size);
        transitions.update_desired_children(window(0, size)).expect("mount");
        bench_group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                transitions
                    .update_desired_children(window(0, size))
                    .expect("update");
                black_box(transitions.len())
            });
        });
    }
    bench_group.finish();
}

fn bench_sliding_window(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("sliding_window");
    for &size in GROUP_SIZES {
        let transitions = group(size);
        transitions.update_desired_children(window(0, size)).expect("mount");
        let mut start = 0u32;
        bench_group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                start = start.wrapping_add(1);
                transitions
                    .update_desired_children(window(start, size))
                    .expect("update");
                black_box(transitions.render().len())
            });
        });
    }
    bench_group.finish();
}

criterion_group!(benches, bench_unchanged_updates, bench_sliding_window);
criterion_main!(benches);
