//! Property tests: edge insert/fetch roundtrip, search bounds.

use proptest::prelude::*;

use petrel_core::models::GraphEdge;
use petrel_core::traits::IEvidenceStore;
use petrel_store::StoreEngine;

fn make_edge(target: &str, paper: &str) -> GraphEdge {
    GraphEdge {
        source: "FAST-PETase".to_string(),
        relation: "degrades".to_string(),
        target: target.to_string(),
        paper: paper.to_string(),
        sentence: format!("FAST-PETase degrades {target}."),
        confidence: 0.6,
    }
}

proptest! {
    #[test]
    fn prop_insert_neighbors_roundtrip(
        target in "[a-zA-Z0-9-]{1,40}"
    ) {
        let engine = StoreEngine::open_in_memory().unwrap();
        engine.insert_edge(&make_edge(&target, "p.pdf")).unwrap();

        let edges = engine.neighbors("FAST-PETase", 10).unwrap();
        prop_assert_eq!(edges.len(), 1);
        prop_assert_eq!(&edges[0].target, &target);
        prop_assert_eq!(&edges[0].sentence, &format!("FAST-PETase degrades {target}."));
    }

    #[test]
    fn prop_neighbors_never_exceeds_limit(
        count in 1usize..30,
        limit in 1usize..30
    ) {
        let engine = StoreEngine::open_in_memory().unwrap();
        for i in 0..count {
            engine.insert_edge(&make_edge(&format!("t-{i}"), "p.pdf")).unwrap();
        }

        let edges = engine.neighbors("FAST-PETase", limit).unwrap();
        prop_assert_eq!(edges.len(), count.min(limit));
    }

    #[test]
    fn prop_search_vector_respects_top_k(
        count in 0usize..20,
        top_k in 0usize..10
    ) {
        let engine = StoreEngine::open_in_memory().unwrap();
        for i in 0..count {
            let id = format!("chunk-{i}");
            engine.insert_chunk(&id, &format!("text {i}"), &serde_json::Map::new()).unwrap();
            engine.store_embedding(&id, &[i as f32 + 1.0, 1.0]).unwrap();
        }

        let hits = engine.search_vector(&[1.0, 0.5], top_k).unwrap();
        prop_assert_eq!(hits.len(), count.min(top_k));
        // Descending score order
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
