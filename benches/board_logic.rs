use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cubetris::core::{
    BoardConfig, BoardController, BoardDims, BoardGrid, BoardSnapshot, Cube, LineClearEngine,
    SafeLandingAnalyzer, SimpleRng,
};

fn bench_frame_update(c: &mut Criterion) {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    board.start();

    c.bench_function("board_update_16ms", |b| {
        b.iter(|| {
            board.update(black_box(16));
            if board.is_topped_out() {
                board = BoardController::new(BoardConfig::default()).unwrap();
                board.start();
            }
            board.take_events()
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let dims = BoardDims::new(7, 18).unwrap();
    let engine = LineClearEngine::default();
    let mut rng = SimpleRng::new(1);

    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut grid = BoardGrid::new(dims);
            for y in 0..4 {
                for x in 0..dims.board_width() {
                    grid.place(x, y, Cube::new(0));
                }
            }
            engine.run(&mut grid, &mut rng)
        })
    });
}

fn bench_flood_fill(c: &mut Criterion) {
    let dims = BoardDims::new(7, 18).unwrap();
    let mut grid = BoardGrid::new(dims);
    // A lid over the bottom rows with one gap at the far side of the board.
    for x in 0..dims.board_width() - 1 {
        grid.place(x, 3, Cube::new(0));
    }
    let mut analyzer = SafeLandingAnalyzer::new();

    c.bench_function("safe_landing_open_pocket", |b| {
        b.iter(|| {
            let cells = grid.read();
            analyzer.has_safe_landing(&cells, black_box(0), black_box(0))
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut board = BoardController::new(BoardConfig::default()).unwrap();
    board.start();
    let mut snap = BoardSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            board.snapshot_into(&mut snap);
            black_box(snap.occupied_count())
        })
    });
}

criterion_group!(
    benches,
    bench_frame_update,
    bench_line_clear,
    bench_flood_fill,
    bench_snapshot
);
criterion_main!(benches);
