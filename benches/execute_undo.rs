use std::hint::black_box;
use std::sync::Arc;

use boardcore::board::{Board, ExecuteMode};
use boardcore::core::{GameInit, GameRng};
use boardcore::games::capture::CaptureRules;
use boardcore::moves::Move;
use criterion::{criterion_group, criterion_main, Criterion};

/// A mid-game position reached by a fixed random walk.
fn midgame(init: &str, plies: usize) -> Board<CaptureRules> {
    let init: GameInit = init.parse().unwrap();
    let rules = Arc::new(CaptureRules::new(&init).unwrap());
    let mut board = Board::new(rules, init).unwrap();
    let mut rng = GameRng::new(42);
    for _ in 0..plies {
        let moves = board.generate_moves(board.whose_turn());
        let Some(mv) = rng.choose(&moves).cloned() else { break };
        board.execute(&mv, ExecuteMode::Live).unwrap();
    }
    board
}

fn bench_execute_undo(c: &mut Criterion) {
    let mut board = midgame("capture-7 2 1 1", 30);
    let moves: Vec<Move> = board.generate_moves(board.whose_turn());

    c.bench_function("robot_execute+unexecute/all_moves", |b| {
        b.iter(|| {
            for mv in &moves {
                board.robot_execute(mv).unwrap();
                board.unexecute(mv).unwrap();
            }
        })
    });
}

fn bench_digest(c: &mut Criterion) {
    let board = midgame("capture-7 2 1 1", 30);
    c.bench_function("digest/capture-7", |b| b.iter(|| black_box(board.digest())));
}

fn bench_generate(c: &mut Criterion) {
    let board = midgame("capture-7 2 1 1", 30);
    c.bench_function("generate_moves/capture-7", |b| {
        b.iter(|| black_box(board.generate_moves(board.whose_turn())))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let board = midgame("capture-7 4 1 1", 40);
    c.bench_function("snapshot/capture-7", |b| b.iter(|| black_box(board.snapshot())));
}

criterion_group!(benches, bench_execute_undo, bench_digest, bench_generate, bench_snapshot);
criterion_main!(benches);
