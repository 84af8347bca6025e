//! # Line Detection Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use tracker_lib::{
    line_det::{self, LineDet},
    sim::KinematicSimulator,
};
use util::module::State;

fn line_det_benchmark(c: &mut Criterion) {
    // ---- Render a view of the track from the start pose ----

    let sim = KinematicSimulator::default();
    let frame = sim.get_frame();
    let params = line_det::Params::default();

    c.bench_function("line_det::detect", |b| {
        b.iter(|| line_det::detect(Some(&frame), &params))
    });

    let mut line_det = LineDet::from_params(params);
    c.bench_function("LineDet::proc", |b| {
        b.iter(|| line_det.proc(Some(frame.clone())))
    });

    c.bench_function("KinematicSimulator::get_frame", |b| b.iter(|| sim.get_frame()));
}

criterion_group!(benches, line_det_benchmark);
criterion_main!(benches);
