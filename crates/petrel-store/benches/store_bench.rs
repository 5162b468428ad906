use criterion::{criterion_group, criterion_main, Criterion};

use petrel_core::models::GraphEdge;
use petrel_core::traits::IEvidenceStore;
use petrel_store::StoreEngine;

/// Build a store with ~1K edges over 100 source entities and 500 embedded chunks.
fn build_populated_store() -> StoreEngine {
    let engine = StoreEngine::open_in_memory().unwrap();
    for src in 0..100 {
        for tgt in 0..10 {
            engine
                .insert_edge(&GraphEdge {
                    source: format!("enzyme-{src}"),
                    relation: "degrades".to_string(),
                    target: format!("substrate-{tgt}"),
                    paper: format!("paper-{src}.pdf"),
                    sentence: format!("enzyme-{src} degrades substrate-{tgt}."),
                    confidence: 0.6,
                })
                .unwrap();
        }
    }
    for i in 0..500 {
        let id = format!("chunk-{i}");
        engine
            .insert_chunk(&id, &format!("chunk text {i}"), &serde_json::Map::new())
            .unwrap();
        let embedding: Vec<f32> = (0..64).map(|d| ((i * 31 + d) % 97) as f32 / 97.0).collect();
        engine.store_embedding(&id, &embedding).unwrap();
    }
    engine
}

fn bench_neighbors(c: &mut Criterion) {
    let engine = build_populated_store();
    c.bench_function("neighbors_1k_edges", |b| {
        b.iter(|| {
            engine.neighbors("enzyme-50", 10).unwrap();
        });
    });
}

fn bench_vector_search(c: &mut Criterion) {
    let engine = build_populated_store();
    let query: Vec<f32> = (0..64).map(|d| (d % 7) as f32 / 7.0).collect();
    c.bench_function("vector_search_500_chunks", |b| {
        b.iter(|| {
            engine.search_vector(&query, 5).unwrap();
        });
    });
}

criterion_group!(benches, bench_neighbors, bench_vector_search);
criterion_main!(benches);
