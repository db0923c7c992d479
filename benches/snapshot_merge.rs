//! Benchmark for inbound frame parsing and snapshot merging

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finkube::channel::InboundMessage;
use finkube::snapshot::{FinOpsOverview, IncrementalUpdate, ViewSnapshot};

const BACKGROUND_UPDATE: &str = r#"{
    "type": "background_update",
    "cluster_health": {
        "status": "healthy", "score": 93.5,
        "nodes": {"total": 5, "ready": 5},
        "pods": {"total": 120, "running": 117, "pending": 2, "failed": 1}
    },
    "cost_summary": {
        "monthly_cost": 48210.75, "potential_savings": 7231.6,
        "resource_count": 87, "data_source": "azure_api_real"
    },
    "timestamp": "2024-05-01T10:00:00.123456",
    "clients_connected": 4
}"#;

fn loaded_snapshot() -> ViewSnapshot {
    let mut overview = FinOpsOverview::default();
    for i in 0..40 {
        overview
            .cost_data
            .cost_by_service
            .insert(format!("service-{}", i), i as f64 * 10.0);
    }
    let mut snapshot = ViewSnapshot::new();
    snapshot.replace_cost(overview);
    snapshot
}

fn bench_parse_frame(c: &mut Criterion) {
    c.bench_function("parse_background_update", |b| {
        b.iter(|| InboundMessage::parse(black_box(BACKGROUND_UPDATE)))
    });
}

fn bench_apply_update(c: &mut Criterion) {
    let update: IncrementalUpdate = match InboundMessage::parse(BACKGROUND_UPDATE) {
        Ok(message) => message.as_update().cloned().unwrap_or_default(),
        Err(e) => panic!("benchmark frame must parse: {}", e),
    };
    let mut snapshot = loaded_snapshot();

    c.bench_function("apply_incremental_update", |b| {
        b.iter(|| snapshot.apply_update(black_box(&update)))
    });
}

fn bench_parse_and_merge(c: &mut Criterion) {
    let mut snapshot = loaded_snapshot();

    c.bench_function("parse_and_merge", |b| {
        b.iter(|| {
            if let Ok(message) = InboundMessage::parse(black_box(BACKGROUND_UPDATE)) {
                if let Some(update) = message.as_update() {
                    snapshot.apply_update(update);
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_parse_frame,
    bench_apply_update,
    bench_parse_and_merge
);
criterion_main!(benches);
