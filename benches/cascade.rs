use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use match3::core::coord::{Coord, Direction};
use match3::game::board::Board;
use match3::game::config::BoardConfig;
use match3::game::sink::NullSink;

fn bench_setup(c: &mut Criterion) {
    let mut seed = 0u64;

    c.bench_function("setup_8x8", |b| {
        b.iter(|| {
            seed += 1;
            let config = BoardConfig::default().with_seed(seed);
            black_box(Board::setup(config, NullSink).unwrap());
        })
    });
}

fn bench_all_matches(c: &mut Criterion) {
    let board = Board::setup(BoardConfig::default().with_seed(7), NullSink).unwrap();

    c.bench_function("all_matches_8x8", |b| {
        b.iter(|| black_box(board.all_matches()))
    });
}

fn bench_random_swap(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(12345);

    c.bench_function("random_swap", |b| {
        b.iter_batched(
            || {
                let config = BoardConfig::default().with_seed(rng.gen());
                let board = Board::setup(config, NullSink).unwrap();
                let from = Coord::new(rng.gen_range(0..7), rng.gen_range(0..7));
                let dir = if rng.gen_bool(0.5) { Direction::Right } else { Direction::Up };
                (board, from, from.step(dir, 1))
            },
            |(mut board, from, to)| black_box(board.request_swap(from, to).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_found_swap(c: &mut Criterion) {
    c.bench_function("cascade_from_found_swap", |b| {
        b.iter_batched(
            || Board::setup(BoardConfig::default().with_seed(99), NullSink).unwrap(),
            |mut board| {
                if let Some(request) = board.find_swap() {
                    black_box(board.request_swap(request.from, request.to).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_setup,
    bench_all_matches,
    bench_random_swap,
    bench_found_swap
);
criterion_main!(benches);
