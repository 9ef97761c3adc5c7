use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use docchat_lib::chunk::FixedSizeChunker;
use docchat_lib::embed::HashingEmbedder;
use docchat_lib::engine::{EngineState, IngestOutcome, RetrievalEngine};
use docchat_lib::loader::DirectoryLoader;
use tempfile::TempDir;

fn engine(dir: &Path, chunk_size: usize, overlap: usize) -> RetrievalEngine<HashingEmbedder> {
    RetrievalEngine::new(
        HashingEmbedder::default(),
        Box::new(FixedSizeChunker::new(chunk_size, overlap).unwrap()),
        DirectoryLoader::default(),
        dir,
    )
}

fn write_corpus(dir: &Path) {
    fs::create_dir_all(dir.join("java")).unwrap();
    fs::create_dir_all(dir.join("ops/notes")).unwrap();
    fs::write(
        dir.join("java/spring.txt"),
        "Spring Boot is a Java framework for building microservices.",
    )
    .unwrap();
    fs::write(
        dir.join("ops/kafka.txt"),
        "Apache Kafka is a distributed event streaming platform used for pipelines.",
    )
    .unwrap();
    fs::write(
        dir.join("ops/notes/docker.txt"),
        "Docker packages applications into containers that run anywhere.",
    )
    .unwrap();
    fs::write(dir.join("ops/notes/readme.md"), "Not part of the corpus.").unwrap();
}

#[test]
fn spring_boot_scenario() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("spring.txt"),
        "Spring Boot is a Java framework for building microservices.",
    )
    .unwrap();

    let engine = engine(tmp.path(), 1000, 200);
    assert_eq!(engine.state(), EngineState::Ready);

    let context = engine.get_context("What is Spring Boot?", 1);
    assert!(context.contains("Spring Boot is a Java framework"));
}

#[test]
fn ready_corpus_answers_queries_from_its_own_text() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());

    let engine = engine(tmp.path(), 1000, 200);

    assert_eq!(engine.state(), EngineState::Ready);
    assert_eq!(engine.len(), 3);
    let context = engine.get_context("distributed event streaming platform", 1);
    assert!(context.starts_with("Apache Kafka"));
}

#[test]
fn empty_corpus_gives_empty_context() {
    let tmp = TempDir::new().unwrap();

    let engine = engine(tmp.path(), 1000, 200);
    assert_eq!(engine.ingest(), IngestOutcome::Empty);
    assert_eq!(engine.state(), EngineState::Empty);
    assert_eq!(engine.get_context("anything at all", 3), "");
}

#[test]
fn missing_corpus_gives_empty_context() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("data");

    let engine = engine(&dir, 1000, 200);
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.get_context("anything at all", 3), "");

    assert_eq!(engine.ingest(), IngestOutcome::Empty);
    assert_eq!(engine.state(), EngineState::Empty);
    assert_eq!(engine.get_context("anything at all", 3), "");
}

#[test]
fn new_files_are_picked_up_on_reload() {
    let tmp = TempDir::new().unwrap();
    let engine = engine(tmp.path(), 1000, 200);
    assert_eq!(engine.state(), EngineState::Empty);

    fs::write(
        tmp.path().join("rust.txt"),
        "Rust guarantees memory safety without a garbage collector.",
    )
    .unwrap();
    let outcome = engine.reload();

    assert_eq!(outcome, IngestOutcome::Ready { documents: 1, chunks: 1 });
    assert!(engine.get_context("memory safety", 3).contains("garbage collector"));
}

#[test]
fn context_joins_chunks_with_blank_line_in_similarity_order() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    let engine = engine(tmp.path(), 1000, 200);

    let results = engine.search("Docker containers", 3).unwrap();
    let expected = results
        .iter()
        .map(|r| r.chunk.content.clone())
        .collect::<Vec<_>>()
        .join("\n\n");

    assert!(results[0].chunk.content.starts_with("Docker"));
    assert_eq!(engine.get_context("Docker containers", 3), expected);
}

#[test]
fn top_k_larger_than_index_returns_everything() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    let engine = engine(tmp.path(), 1000, 200);

    let results = engine.search("Spring Boot microservices", 50).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(results[0].chunk.content.starts_with("Spring Boot"));
}

#[test]
fn chunks_respect_configured_bounds() {
    let tmp = TempDir::new().unwrap();
    let long = "Gradle builds Java projects and resolves dependencies. ".repeat(40);
    fs::write(tmp.path().join("gradle.txt"), &long).unwrap();
    let engine = engine(tmp.path(), 120, 30);

    let results = engine.search("Gradle dependencies", 1000).unwrap();

    assert!(results.len() > 1);
    assert!(results.iter().all(|r| r.chunk.content.chars().count() <= 120));
    assert!(results
        .iter()
        .all(|r| r.chunk.metadata.source_id.as_deref().is_some_and(|s| s.ends_with("gradle.txt"))));
}

#[test]
fn reload_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write_corpus(tmp.path());
    let engine = engine(tmp.path(), 40, 10);

    let first = engine.reload();
    let answer_one = engine.get_context("Java framework microservices", 5);
    let second = engine.reload();
    let answer_two = engine.get_context("Java framework microservices", 5);

    assert_eq!(first, second);
    assert!(!answer_one.is_empty());
    assert_eq!(answer_one, answer_two);
}

#[test]
fn queries_during_reload_see_whole_snapshots() {
    let query = "event streaming platform for pipelines";

    let old_dir = TempDir::new().unwrap();
    fs::write(
        old_dir.path().join("kafka.txt"),
        "Apache Kafka is a distributed event streaming platform used for pipelines.",
    )
    .unwrap();

    let new_dir = TempDir::new().unwrap();
    let new_text = "Apache Pulsar is a cloud native event streaming platform for pipelines. \
                    It separates compute from storage.";
    fs::write(new_dir.path().join("pulsar.txt"), new_text).unwrap();

    let expected_old = engine(old_dir.path(), 60, 15).get_context(query, 3);
    let expected_new = engine(new_dir.path(), 60, 15).get_context(query, 3);
    assert_ne!(expected_old, expected_new);

    let live = Arc::new(engine(old_dir.path(), 60, 15));
    assert_eq!(live.get_context(query, 3), expected_old);

    // switch the corpus contents, then race readers against reloads
    fs::remove_file(old_dir.path().join("kafka.txt")).unwrap();
    fs::write(old_dir.path().join("pulsar.txt"), new_text).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let live = Arc::clone(&live);
            let (old, new) = (expected_old.clone(), expected_new.clone());
            thread::spawn(move || {
                for _ in 0..200 {
                    let context = live.get_context(query, 3);
                    assert!(context == old || context == new, "mixed snapshot: {context:?}");
                }
            })
        })
        .collect();

    let writer = {
        let live = Arc::clone(&live);
        thread::spawn(move || {
            for _ in 0..20 {
                assert!(matches!(live.reload(), IngestOutcome::Ready { .. }));
            }
        })
    };

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(live.get_context(query, 3), expected_new);
}
