//! Chess Engine Benchmarks
//!
//! Performance benchmarks for critical engine functions using Criterion.

use std::sync::Arc;

use chess_engine::evaluation::evaluate;
use chess_engine::move_gen::generate_legal_moves;
use chess_engine::search::order_moves;
use chess_engine::{EvaluationComplexity, ManualClock, MoveSelector, Position};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 1 5";

fn position(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid bench FEN")
}

fn bench_move_generation_starting(c: &mut Criterion) {
    let start = Position::startpos();

    c.bench_function("generate_legal_moves_starting_position", |b| {
        b.iter(|| black_box(generate_legal_moves(black_box(&start))))
    });
}

fn bench_move_generation_kiwipete(c: &mut Criterion) {
    let kiwipete = position(KIWIPETE);

    c.bench_function("generate_legal_moves_kiwipete", |b| {
        b.iter(|| black_box(generate_legal_moves(black_box(&kiwipete))))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let middlegame = position(MIDDLEGAME);

    c.bench_function("evaluate_lite", |b| {
        b.iter(|| black_box(evaluate(black_box(&middlegame), EvaluationComplexity::Lite)))
    });
    c.bench_function("evaluate_full", |b| {
        b.iter(|| black_box(evaluate(black_box(&middlegame), EvaluationComplexity::Full)))
    });
}

fn bench_order_moves(c: &mut Criterion) {
    let kiwipete = position(KIWIPETE);
    let moves = generate_legal_moves(&kiwipete);

    c.bench_function("order_moves_kiwipete", |b| {
        b.iter(|| black_box(order_moves(&kiwipete, moves.clone())))
    });
}

fn bench_select_move(c: &mut Criterion) {
    let middlegame = position(MIDDLEGAME);
    // Frozen clock: every iteration searches to the hard cap
    let selector = MoveSelector::default().with_clock(Arc::new(ManualClock::new()));

    let mut group = c.benchmark_group("select_move_middlegame");
    group.sample_size(10);
    for level in [1, 3, 5] {
        group.bench_function(format!("level_{level}"), |b| {
            b.iter(|| black_box(selector.select_move(&middlegame, level, 20)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_move_generation_starting,
    bench_move_generation_kiwipete,
    bench_evaluate,
    bench_order_moves,
    bench_select_move,
);
criterion_main!(benches);
