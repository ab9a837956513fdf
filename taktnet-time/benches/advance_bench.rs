#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use taktnet_core::NetBuilder;
use taktnet_time::{FiringWindow, TimedNet};

/// Benchmark the clock-advance loop over a wide net of running timers.
fn benchmark_advance_loop(c: &mut Criterion) {
    let transitions = 1_000;

    let mut builder = NetBuilder::new();
    let mut windows = Vec::with_capacity(transitions);
    for i in 0..transitions {
        let p = builder.place(&format!("p{i}"), 1).unwrap();
        let t = builder.transition(&format!("t{i}")).unwrap();
        builder.input_arc(p, t, 1).unwrap();
        let min = (i % 10) as f64;
        windows.push((t, FiringWindow::bounded(min, min + 5.0).unwrap()));
    }
    let net = TimedNet::with_windows(builder.build(), windows).unwrap();

    c.bench_function("advance_loop", |b| {
        b.iter(|| {
            let mut net = net.clone();
            net.resync();
            for _ in 0..100 {
                black_box(net.advance().unwrap());
            }
        })
    });
}

criterion_group!(benches, benchmark_advance_loop);
criterion_main!(benches);
