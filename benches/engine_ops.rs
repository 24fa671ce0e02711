use criterion::{black_box, criterion_group, criterion_main, Criterion};
use twenty48::core::engine::{apply_move, compact_and_merge_line, has_legal_move, spawn_tile, valid_moves};
use twenty48::core::{Board, SimpleRng};
use twenty48::env::{Environment, ShapedReward};
use twenty48::types::Direction;

fn midgame_board() -> Board {
    Board::from_grid(
        [
            [2, 4, 8, 16],
            [0, 2, 2, 32],
            [4, 0, 4, 64],
            [0, 0, 2, 128],
        ],
        1024,
    )
    .unwrap()
}

fn bench_compact_line(c: &mut Criterion) {
    c.bench_function("compact_and_merge_line", |b| {
        b.iter(|| compact_and_merge_line(black_box([2, 2, 4, 4])))
    });
}

fn bench_apply_move(c: &mut Criterion) {
    let board = midgame_board();
    let mut group = c.benchmark_group("apply_move");
    for dir in Direction::ALL {
        group.bench_function(dir.as_str(), |b| b.iter(|| apply_move(black_box(&board), dir)));
    }
    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    let board = midgame_board();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("spawn_tile", |b| {
        b.iter(|| {
            let mut board = board;
            spawn_tile(black_box(&mut board), &mut rng)
        })
    });
}

fn bench_legality(c: &mut Criterion) {
    let board = midgame_board();

    c.bench_function("valid_moves", |b| b.iter(|| valid_moves(black_box(&board))));
    c.bench_function("has_legal_move", |b| b.iter(|| has_legal_move(black_box(&board))));
}

fn bench_env_step(c: &mut Criterion) {
    let mut env = Environment::new(12345, ShapedReward);
    env.reset();

    c.bench_function("env_step_shaped", |b| {
        b.iter(|| {
            let valid = env.valid_actions();
            match valid.first() {
                Some(&dir) => {
                    black_box(env.step_direction(dir));
                }
                None => {
                    env.reset();
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_compact_line,
    bench_apply_move,
    bench_spawn,
    bench_legality,
    bench_env_step
);
criterion_main!(benches);
