//! Search behavior over small corpora.

use super::fixtures::{Workspace, GUIDE};
use crate::error::KnowledgeError;
use crate::retriever::Retriever;

#[test]
fn test_guide_scenario() {
    let mut ws = Workspace::new(&[("guide.txt", GUIDE)]);
    ws.config.retrieval.k = 2;
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    let retrieval = retriever
        .search("What should I do when I feel an urge?")
        .unwrap();

    assert!(!retrieval.is_empty());
    assert!(retrieval.chunks.len() <= 2);
    assert!(retrieval.used_mmr);
    assert!(retrieval.chunks.iter().any(|hit| {
        let text = hit.chunk.text.to_lowercase();
        text.contains("urge surfing") || text.contains("wait 10 minutes")
    }));
    assert!(retrieval.chunks.iter().all(|hit| hit.chunk.source == "guide.txt"));
    assert_eq!(retrieval.sources(), vec!["guide.txt"]);
}

#[test]
fn test_guide_scenario_with_small_chunks() {
    let mut ws = Workspace::new(&[("guide.txt", GUIDE)]);
    ws.config.retrieval.k = 2;
    ws.config.chunking.chunk_size = 300;
    ws.config.chunking.chunk_overlap = 60;
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    for use_mmr in [true, false] {
        let retrieval = retriever
            .search_with("What should I do when I feel an urge?", 2, use_mmr)
            .unwrap();

        assert_eq!(retrieval.chunks.len(), 2);
        assert_eq!(retrieval.used_mmr, use_mmr);
        assert!(retrieval.chunks.iter().any(|hit| {
            hit.chunk.text.to_lowercase().contains("urge surfing")
                || hit.chunk.text.contains("wait 10 minutes")
        }));
    }
}

#[test]
fn test_mmr_surfaces_distinct_chunk() {
    let duplicate = "urge surfing urge surfing breathe";
    let mut ws = Workspace::new(&[
        ("a.txt", duplicate),
        ("b.txt", duplicate),
        ("c.txt", duplicate),
        ("d.txt", "urge surfing call a friend"),
    ]);
    ws.config.retrieval.k = 2;
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    let plain = retriever.search_with("urge surfing", 2, false).unwrap();
    assert_eq!(plain.sources(), vec!["a.txt", "b.txt"]);

    let mmr = retriever.search_with("urge surfing", 2, true).unwrap();
    assert_eq!(mmr.chunks[0].chunk.source, "a.txt");
    assert!(mmr.sources().contains(&"d.txt".to_string()));
}

#[test]
fn test_repeated_searches_return_same_order() {
    let duplicate = "urge surfing urge surfing breathe";
    let ws = Workspace::new(&[
        ("a.txt", duplicate),
        ("b.txt", duplicate),
        ("c.txt", duplicate),
        ("d.txt", "urge surfing call a friend"),
        ("guide.txt", GUIDE),
    ]);
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    for use_mmr in [true, false] {
        let first = retriever.search_with("urge surfing", 3, use_mmr).unwrap();
        let second = retriever.search_with("urge surfing", 3, use_mmr).unwrap();
        assert_eq!(first, second);
    }

    let plain = retriever.search_with("urge surfing", 3, false).unwrap();
    let mmr = retriever.search_with("urge surfing", 3, true).unwrap();
    assert_ne!(plain.chunks, mmr.chunks);

    // A second retriever serves the same results from the stored index
    let mut reloaded = Retriever::from_config(&ws.config).unwrap();
    assert_eq!(reloaded.search_with("urge surfing", 3, true).unwrap(), mmr);
    assert_eq!(reloaded.search_with("urge surfing", 3, false).unwrap(), plain);
}

#[test]
fn test_results_are_ordered_and_bounded() {
    let ws = Workspace::new(&[
        ("guide.txt", GUIDE),
        ("friends.txt", "Message a friend when the evening gets long."),
        ("water.txt", "Drink a glass of water and stretch."),
    ]);
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    let retrieval = retriever.search_with("glass of water", 3, false).unwrap();
    assert_eq!(retrieval.chunks.len(), 3);
    assert_eq!(retrieval.chunks[0].chunk.source, "water.txt");
    for pair in retrieval.chunks.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_empty_corpus_returns_empty_result() {
    let ws = Workspace::new(&[]);
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    let retrieval = retriever.search("urge").unwrap();
    assert!(retrieval.is_empty());
}

#[test]
fn test_blank_documents_are_skipped() {
    let ws = Workspace::new(&[("blank.txt", "  \n\n "), ("guide.txt", GUIDE)]);
    let mut retriever = Retriever::from_config(&ws.config).unwrap();
    retriever.ensure_ready().unwrap();

    let snapshot = retriever.snapshot().unwrap();
    assert!(snapshot
        .indexed_chunks
        .iter()
        .all(|c| c.chunk.source == "guide.txt"));
}

#[test]
fn test_missing_corpus_fails_instead_of_returning_empty() {
    let ws = Workspace::new(&[]);
    std::fs::remove_dir(ws.dir.path().join("data")).unwrap();
    let mut retriever = Retriever::from_config(&ws.config).unwrap();

    assert!(matches!(
        retriever.search("urge"),
        Err(KnowledgeError::CorpusUnavailable { .. })
    ));
}
