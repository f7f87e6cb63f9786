//! Integration tests for citation structures: traversal of the sample
//! graph's Iliad structure and authoring of new text elements.

use std::path::{Path, PathBuf};

use hucit_kb::{CtsUrn, KbConfig, KnowledgeBase, Work};

const ILIAD_URN: &str = "urn:cts:greekLit:tlg0012.tlg001";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("kb-rs/tests/data/kb_sample.ttl")
}

fn open_kb() -> KnowledgeBase {
    KnowledgeBase::new(KbConfig::in_memory(vec![fixture_path()], "turtle"))
        .expect("sample graph should load")
}

fn iliad(kb: &KnowledgeBase) -> Work {
    kb.resource_by_urn(ILIAD_URN)
        .unwrap()
        .as_work()
        .unwrap()
        .clone()
}

/// Test: structure and work reference each other
#[test]
fn test_structure_round_trip() {
    let kb = open_kb();
    let work = iliad(&kb);

    assert!(work.has_text_structure().unwrap());
    let structure = work.structure().unwrap().unwrap();
    assert_eq!(
        structure.work().unwrap().unwrap().subject(),
        work.subject()
    );
}

/// Test: only top-level elements hang off the structure
#[test]
fn test_structure_elements() {
    let kb = open_kb();
    let structure = iliad(&kb).structure().unwrap().unwrap();

    let elements = structure.elements().unwrap();
    assert_eq!(elements.len(), 1);

    let book = &elements[0];
    assert_eq!(
        book.urn().unwrap().to_string(),
        "urn:cts:greekLit:tlg0012.tlg001:1"
    );
    assert_eq!(
        book.element_type().unwrap().unwrap().label().unwrap(),
        Some("Book".to_string())
    );
}

/// Test: parent, children and sibling traversal
#[test]
fn test_traversal() {
    let kb = open_kb();
    let resource = kb
        .resource_by_urn("urn:cts:greekLit:tlg0012.tlg001:1.1")
        .unwrap();
    let line1 = resource.as_text_element().unwrap();

    let parent = line1.parent().unwrap().unwrap();
    assert_eq!(
        parent.urn().unwrap().to_string(),
        "urn:cts:greekLit:tlg0012.tlg001:1"
    );
    assert_eq!(parent.children().unwrap().len(), 2);

    let line2 = line1.next().unwrap().unwrap();
    assert_eq!(
        line2.urn().unwrap().to_string(),
        "urn:cts:greekLit:tlg0012.tlg001:1.2"
    );
    assert_eq!(
        line2.previous().unwrap().unwrap().subject(),
        line1.subject()
    );

    assert!(line1.is_first().unwrap());
    assert!(!line1.is_last().unwrap());
    assert!(line2.is_last().unwrap());
}

/// Test: authoring a new element extends the citation graph
#[test]
fn test_create_text_element() {
    let kb = open_kb();
    let work = iliad(&kb);

    let line_type = kb.text_element_type("Line").unwrap().unwrap();
    let urn = CtsUrn::parse("urn:cts:greekLit:tlg0012.tlg001:1.3").unwrap();
    let line3 = kb
        .create_text_element(
            &work,
            &urn,
            &line_type,
            Some("http://example.org/texts/iliad/1.3"),
        )
        .unwrap();

    assert_eq!(line3.label().unwrap(), Some("Iliad Line 1.3".to_string()));
    assert_eq!(line3.urn().unwrap(), urn);

    // link it after line 1.2, under book 1
    let resource = kb
        .resource_by_urn("urn:cts:greekLit:tlg0012.tlg001:1.2")
        .unwrap();
    let line2 = resource.as_text_element().unwrap();
    let book = line2.parent().unwrap().unwrap();
    line3
        .add_relations(Some(&book), Some(line2), None)
        .unwrap();

    assert_eq!(line2.next().unwrap().unwrap().subject(), line3.subject());
    assert!(!line2.is_last().unwrap());
    assert!(line3.is_last().unwrap());
    assert_eq!(book.children().unwrap().len(), 3);

    // resolvable by URN afterwards
    let resolved = kb
        .resource_by_urn("urn:cts:greekLit:tlg0012.tlg001:1.3")
        .unwrap();
    assert!(resolved.as_text_element().is_some());
}

/// Test: creating the same identifier twice is skipped, not duplicated
#[test]
fn test_create_text_element_urn_is_idempotent() {
    let kb = open_kb();
    let work = iliad(&kb);
    let line_type = kb.text_element_type("line").unwrap().unwrap();
    let urn = CtsUrn::parse("urn:cts:greekLit:tlg0012.tlg001:1.4").unwrap();

    kb.create_text_element(&work, &urn, &line_type, None).unwrap();
    let size_after_first = kb.size().unwrap();

    assert!(!kb
        .create_cts_urn(&format!("{}/1.4", work.subject()), &urn)
        .unwrap());
    assert_eq!(kb.size().unwrap(), size_after_first);
}

/// Test: declaring a structure on a bare work, then removing it
#[test]
fn test_add_and_remove_structure() {
    let kb = open_kb();
    let resource = kb.resource_by_urn("urn:cts:greekLit:tlg0020.tlg001").unwrap();
    let theogony = resource.as_work().unwrap();

    assert!(!theogony.has_text_structure().unwrap());

    let structure = theogony.add_text_structure("Line", Some("en")).unwrap();
    assert!(theogony.has_text_structure().unwrap());

    let line_type = kb.add_text_element_type("Line", "en").unwrap();
    let urn = CtsUrn::parse("urn:cts:greekLit:tlg0020.tlg001:1").unwrap();
    let line = kb
        .create_text_element(theogony, &urn, &line_type, None)
        .unwrap();
    structure.add_element(&line, true).unwrap();
    assert_eq!(structure.elements().unwrap().len(), 1);

    theogony.remove_text_structure().unwrap();
    assert!(!theogony.has_text_structure().unwrap());
}
