//! Integration tests for store backends and configuration loading.

use std::io::Write;
use std::path::{Path, PathBuf};

use hucit_kb::{Backend, KbConfig, KbError, KbStore, KnowledgeBase};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("kb-rs/tests/data/kb_sample.ttl")
}

/// Test: a knowledge base opens from a YAML configuration file
#[test]
fn test_open_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "store:\n  backend: memory\n  sources:\n    - {}\n  format: turtle",
        fixture_path().display()
    )
    .unwrap();

    let kb = KnowledgeBase::from_config_file(file.path()).unwrap();
    assert!(kb.size().unwrap() > 0);
    assert_eq!(kb.config().store.backend, Backend::Memory);
}

/// Test: a missing configuration file is reported as such
#[test]
fn test_missing_config_file() {
    let result = KnowledgeBase::from_config_file("/nonexistent/kb.yaml");
    assert!(matches!(result, Err(KbError::FileNotFound(_))));
}

/// Test: a missing RDF source fails at open time
#[test]
fn test_missing_source_file() {
    let config = KbConfig::in_memory(vec!["/nonexistent/kb.ttl"], "turtle");
    let result = KnowledgeBase::new(config);
    assert!(matches!(result, Err(KbError::FileNotFound(_))));
}

/// Test: an unsupported RDF format is rejected with a configuration error
#[test]
fn test_unsupported_format() {
    let config = KbConfig::in_memory(vec![fixture_path()], "csv");
    let result = KnowledgeBase::new(config);
    assert!(matches!(result, Err(KbError::Config(_))));
}

/// Test: a syntactically broken source is reported as a store error
#[test]
fn test_broken_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not turtle at all .").unwrap();

    let config = KbConfig::in_memory(vec![file.path().to_path_buf()], "turtle");
    let result = KnowledgeBase::new(config);
    assert!(matches!(result, Err(KbError::Store(_))));
}

/// Test: the default configuration points at a read-only remote endpoint
/// whose updates are rejected locally, before any network traffic
#[test]
fn test_default_remote_is_read_only() {
    let config = KbConfig::default();
    assert!(config.store.read_only);

    let store = KbStore::open(&config.store).unwrap();
    let result =
        store.update("INSERT DATA { <http://e.org/s> <http://e.org/p> <http://e.org/o> }");
    assert!(matches!(result, Err(KbError::ReadOnlyStore(_))));
}

/// Test: reloading the same source doubles nothing (triples are a set)
#[test]
fn test_reloading_is_idempotent() {
    let config = KbConfig::in_memory(vec![fixture_path()], "turtle");
    let kb = KnowledgeBase::new(config).unwrap();
    let size = kb.size().unwrap();

    let twice = KbConfig::in_memory(vec![fixture_path(), fixture_path()], "turtle");
    let kb_twice = KnowledgeBase::new(twice).unwrap();
    assert_eq!(kb_twice.size().unwrap(), size);
}
