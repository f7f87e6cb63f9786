//! Integration tests for the knowledge-base facade over an in-memory store
//! loaded from the sample Turtle graph.

use std::path::{Path, PathBuf};

use hucit_kb::{KbConfig, KbError, KnowledgeBase};

const HOMER_URN: &str = "urn:cts:greekLit:tlg0012";
const ILIAD_URN: &str = "urn:cts:greekLit:tlg0012.tlg001";
const HESIOD_URN: &str = "urn:cts:greekLit:tlg0020";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("kb-rs/tests/data/kb_sample.ttl")
}

fn open_kb() -> KnowledgeBase {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    KnowledgeBase::new(KbConfig::in_memory(vec![fixture_path()], "turtle"))
        .expect("sample graph should load")
}

/// Test: the sample graph loads with a plausible triple count
#[test]
fn test_fixture_loads() {
    let kb = open_kb();
    assert!(kb.size().unwrap() > 50);
}

/// Test: URN shape decides between author, work and text element
#[test]
fn test_resource_by_urn_shapes() {
    let kb = open_kb();

    let author = kb.resource_by_urn(HOMER_URN).unwrap();
    assert!(author.as_author().is_some());

    let work = kb.resource_by_urn(ILIAD_URN).unwrap();
    assert!(work.as_work().is_some());

    let element = kb
        .resource_by_urn("urn:cts:greekLit:tlg0012.tlg001:1.1")
        .unwrap();
    assert!(element.as_text_element().is_some());
}

/// Test: unknown URNs fail fast with ResourceNotFound
#[test]
fn test_resource_by_urn_not_found() {
    let kb = open_kb();
    let result = kb.resource_by_urn("urn:cts:greekLit:tlg9999");
    assert!(matches!(result, Err(KbError::ResourceNotFound(_))));
}

/// Test: display labels follow the en > untagged > la cascade
#[test]
fn test_label_cascade() {
    let kb = open_kb();

    assert_eq!(kb.author_label(HOMER_URN).unwrap(), Some("Homer".to_string()));
    assert_eq!(kb.work_label(ILIAD_URN).unwrap(), Some("Iliad".to_string()));

    // a work URN asked for as an author label yields nothing
    assert_eq!(kb.author_label(ILIAD_URN).unwrap(), None);
    assert_eq!(kb.author_label("urn:cts:greekLit:tlg9999").unwrap(), None);
}

/// Test: the cascade falls back once English labels are removed
#[test]
fn test_label_cascade_fallback() {
    let kb = open_kb();
    let resource = kb.resource_by_urn(HOMER_URN).unwrap();
    let author = resource.as_author().unwrap();

    assert_eq!(author.display_label().unwrap(), Some("Homer".to_string()));

    author.remove_name("Homer").unwrap();
    assert_eq!(author.display_label().unwrap(), Some("Homeros".to_string()));

    author.remove_name("Homeros").unwrap();
    assert_eq!(author.display_label().unwrap(), Some("Homerus".to_string()));
}

/// Test: authorship links work in both directions
#[test]
fn test_authorship() {
    let kb = open_kb();
    let resource = kb.resource_by_urn(HOMER_URN).unwrap();
    let author = resource.as_author().unwrap();

    let works = author.works().unwrap();
    assert_eq!(works.len(), 2);

    let back = works[0].author().unwrap().unwrap();
    assert_eq!(back.subject(), author.subject());
}

/// Test: search resolves titles and abbreviations to their owners
#[test]
fn test_search() {
    let kb = open_kb();

    let results = kb.search("odys").unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].1.as_work().is_some());

    // abbreviation match walks back to the author
    let results = kb.search("hom.").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, "Hom.");
    let author = results[0].1.as_author().unwrap();
    assert_eq!(author.display_label().unwrap(), Some("Homer".to_string()));

    assert!(kb.search("no such text anywhere").unwrap().is_empty());
}

/// Test: statistics over the sample graph
#[test]
fn test_statistics() {
    let kb = open_kb();
    let stats = kb.statistics().unwrap();

    assert_eq!(stats.authors, 2);
    assert_eq!(stats.author_names, 4);
    assert_eq!(stats.author_abbreviations, 1);
    assert_eq!(stats.works, 3);
    assert_eq!(stats.work_titles, 5);
    assert_eq!(stats.title_abbreviations, 1);
    assert_eq!(stats.opus_maximum, 1);
}

/// Test: the flagged work wins among several, the only work wins by default
#[test]
fn test_opus_maximum() {
    let kb = open_kb();

    let opmax = kb.opus_maximum_of(HOMER_URN).unwrap().unwrap();
    assert_eq!(
        opmax.display_label().unwrap(),
        Some("Iliad".to_string())
    );

    let opmax = kb.opus_maximum_of(HESIOD_URN).unwrap().unwrap();
    assert_eq!(
        opmax.display_label().unwrap(),
        Some("Theogony".to_string())
    );
}

/// Test: keyed maps use the `{urn}$$n{index}` convention
#[test]
fn test_keyed_maps() {
    let kb = open_kb();

    let names = kb.author_names().unwrap();
    assert_eq!(
        names.get("urn:cts:greekLit:tlg0020$$n0"),
        Some(&"Hesiod".to_string())
    );

    let abbreviations = kb.author_abbreviations().unwrap();
    assert_eq!(
        abbreviations.get("urn:cts:greekLit:tlg0012$$n0"),
        Some(&"Hom.".to_string())
    );

    // work abbreviations are combined with the author's
    let work_abbreviations = kb.work_abbreviations().unwrap();
    assert_eq!(
        work_abbreviations.get("urn:cts:greekLit:tlg0012.tlg001$$n0"),
        Some(&"Hom. Il.".to_string())
    );
}

/// Test: full JSON export carries statistics and all authors
#[test]
fn test_to_json() {
    let kb = open_kb();
    let json: serde_json::Value = serde_json::from_str(&kb.to_json().unwrap()).unwrap();

    assert_eq!(json["statistics"]["number_authors"], 2);
    let authors = json["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 2);
    assert!(authors.iter().any(|a| a["urn"] == HOMER_URN));
}

/// Test: author mutations are visible through subsequent reads
#[test]
fn test_author_mutation_round_trip() {
    let kb = open_kb();
    let resource = kb.resource_by_urn(HESIOD_URN).unwrap();
    let author = resource.as_author().unwrap();

    assert!(author.add_name("Hesiodus", Some("la")).unwrap());
    assert!(author.add_abbreviation("Hes.").unwrap());

    let names = author.names().unwrap();
    assert!(names.contains(&(Some("la".to_string()), "Hesiodus".to_string())));
    assert_eq!(author.abbreviations().unwrap(), vec!["Hes.".to_string()]);

    let stats = kb.statistics().unwrap();
    assert_eq!(stats.author_names, 5);
    assert_eq!(stats.author_abbreviations, 2);
}
