use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meshgraph::data::decorate_snapshot;
use meshgraph::{
    BoxKind, DisplaySettings, GraphSession, NodeType, Protocol, RateAnimationCalibrator,
    TopologySnapshot, TrafficKind,
};

/// A graph of `apps` boxed apps, two versions each, chained by http and tcp edges.
fn build_snapshot(apps: usize) -> TopologySnapshot {
    let mut builder = TopologySnapshot::builder().timestamp_ms(1703160000000);

    for i in 0..apps {
        let app = format!("app-{}", i);
        let box_id = format!("box-{}", i);
        builder = builder.node(box_id.clone(), NodeType::Box, |n| {
            n.boxed_as(BoxKind::App).app(app.clone()).namespace("bench")
        });

        for version in ["v1", "v2"] {
            let id = format!("{}-{}", app, version);
            builder = builder.node(id, NodeType::App, |n| {
                n.app(app.clone())
                    .version(version)
                    .namespace("bench")
                    .parent(box_id.clone())
                    .virtual_service([format!("{}.bench.svc", app)])
                    .traffic_shifting()
            });
        }

        if i > 0 {
            let source = format!("app-{}-v1", i - 1);
            let target = format!("app-{}-v1", i);
            builder = builder
                .edge(format!("{}-http", i), source.clone(), target.clone(), Protocol::Http, i as f64)
                .edge(format!("{}-tcp", i), source, target, Protocol::Tcp, (i * 1024) as f64);
        }
    }

    builder.build()
}

/// Benchmark decorating every node with varying graph sizes
fn bench_decorate_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorate_snapshot");
    let settings = DisplaySettings::default();

    for apps in [10, 100, 500].iter() {
        let snapshot = build_snapshot(*apps);

        group.bench_with_input(BenchmarkId::from_parameter(apps), apps, |b, _| {
            b.iter(|| {
                black_box(decorate_snapshot(&snapshot, &settings));
            });
        });
    }
    group.finish();
}

/// Benchmark a full refresh through the session
fn bench_session_update(c: &mut Criterion) {
    let snapshot = build_snapshot(100);
    let mut session = GraphSession::new(DisplaySettings::default());

    c.bench_function("session_update_100_apps", |b| {
        b.iter(|| {
            black_box(session.update(snapshot.clone()));
        });
    });
}

/// Benchmark delay computation across a range of rates
fn bench_compute_delay(c: &mut Criterion) {
    let mut calibrator = RateAnimationCalibrator::new(TrafficKind::Requests);
    calibrator.calibrate(5000.0);

    c.bench_function("compute_delay", |b| {
        b.iter(|| {
            for rate in [0.0, 0.5, 1.0, 10.0, 100.0, 1000.0, f64::NAN] {
                black_box(calibrator.compute_delay(black_box(rate)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_decorate_snapshot,
    bench_session_update,
    bench_compute_delay,
);

criterion_main!(benches);
