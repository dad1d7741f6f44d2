use criterion::{black_box, criterion_group, criterion_main, Criterion};

use c4_bench::midgame_position;

fn bench_movegen(c: &mut Criterion) {
    let pos = midgame_position();

    c.bench_function("legal_moves", |b| {
        b.iter(|| black_box(black_box(&pos).legal_moves()))
    });

    c.bench_function("play_undo_outcome", |b| {
        b.iter(|| {
            let mut p = black_box(pos);
            p.play(2);
            let r = p.outcome();
            p.undo();
            black_box(r)
        })
    });
}

criterion_group!(benches, bench_movegen);
criterion_main!(benches);
