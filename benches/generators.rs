use criterion::{criterion_group, criterion_main, Criterion};
use mazes::{
    generators,
    grid::Grid,
    units::{Height, Width},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_32", |b| {
        b.iter(|| generators::generate(Width(32), Height(32), 42))
    });
}

fn bench_recursive_backtracker_maze_350(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_350", |b| {
        let mut rng = XorShiftRng::seed_from_u64(42);
        b.iter(|| {
            let mut g = Grid::new(Width(350), Height(350)).unwrap();
            generators::recursive_backtracker(&mut g, &mut rng);
            g
        })
    });
}

fn bench_block_random_passages(c: &mut Criterion) {
    let carved = generators::generate(Width(100), Height(100), 42).unwrap();
    c.bench_function("block_random_passages_100", move |b| {
        let mut rng = XorShiftRng::seed_from_u64(7);
        b.iter(|| {
            let mut g = carved.clone();
            generators::block_random_passages(&mut g, 10, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_350,
    bench_block_random_passages
);
criterion_main!(benches);
