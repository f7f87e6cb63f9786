//! RDF namespaces used by the HuCit knowledge base

/// Erlangen CRM (CIDOC-CRM implementation)
pub const ECRM: &str = "http://erlangen-crm.org/current/";

/// Erlangen FRBRoo
pub const EFRBROO: &str = "http://erlangen-crm.org/efrbroo/";

/// HuCit citation ontology
pub const HUCIT: &str = "http://purl.org/net/hucit#";

/// Knowledge-base entity base URI
pub const KB: &str = "http://purl.org/hucit/kb/";

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

// CIDOC-CRM / FRBRoo classes
pub const E35_TITLE: &str = "http://erlangen-crm.org/efrbroo/E35_Title";
pub const E41_APPELLATION: &str = "http://erlangen-crm.org/current/E41_Appellation";
pub const E42_IDENTIFIER: &str = "http://erlangen-crm.org/current/E42_Identifier";
pub const E55_TYPE: &str = "http://erlangen-crm.org/current/E55_Type";
pub const F1_WORK: &str = "http://erlangen-crm.org/efrbroo/F1_Work";
pub const F10_PERSON: &str = "http://erlangen-crm.org/efrbroo/F10_Person";
pub const F12_NAME: &str = "http://erlangen-crm.org/efrbroo/F12_Name";
pub const F27_WORK_CONCEPTION: &str = "http://erlangen-crm.org/efrbroo/F27_Work_Conception";

// CIDOC-CRM / FRBRoo properties
pub const P1_IS_IDENTIFIED_BY: &str = "http://erlangen-crm.org/current/P1_is_identified_by";
pub const P2_HAS_TYPE: &str = "http://erlangen-crm.org/current/P2_has_type";
pub const P102_HAS_TITLE: &str = "http://erlangen-crm.org/efrbroo/P102_has_title";
pub const P139_HAS_ALTERNATIVE_FORM: &str =
    "http://erlangen-crm.org/current/P139_has_alternative_form";
pub const P14I_PERFORMED: &str = "http://erlangen-crm.org/efrbroo/P14i_performed";
pub const R16_INITIATED: &str = "http://erlangen-crm.org/efrbroo/R16_initiated";

// HuCit citation ontology
pub const TEXT_STRUCTURE: &str = "http://purl.org/net/hucit#TextStructure";
pub const TEXT_ELEMENT: &str = "http://purl.org/net/hucit#TextElement";
pub const HAS_STRUCTURE: &str = "http://purl.org/net/hucit#has_structure";
pub const HAS_ELEMENT: &str = "http://purl.org/net/hucit#has_element";
pub const HAS_PART: &str = "http://purl.org/net/hucit#has_part";
pub const IS_PART_OF: &str = "http://purl.org/net/hucit#is_part_of";
pub const PRECEDES: &str = "http://purl.org/net/hucit#precedes";
pub const FOLLOWS: &str = "http://purl.org/net/hucit#follows";
pub const RESOLVES_TO: &str = "http://purl.org/net/hucit#resolves_to";

pub fn ecrm(local: &str) -> String {
    format!("{}{}", ECRM, local)
}

pub fn efrbroo(local: &str) -> String {
    format!("{}{}", EFRBROO, local)
}

pub fn hucit(local: &str) -> String {
    format!("{}{}", HUCIT, local)
}

/// URI of an E55_Type marker resource, minted from a type label.
///
/// e.g. `kb_type("abbreviation")` → `http://purl.org/hucit/kb/types/abbreviation`
pub fn kb_type(label: &str) -> String {
    format!("{}types/{}", KB, label)
}

/// Marker type distinguishing abbreviations from full names/titles
pub fn type_abbreviation() -> String {
    kb_type("abbreviation")
}

/// Marker type of CTS URN identifiers
pub fn type_cts_urn() -> String {
    kb_type("CTS_URN")
}

/// Marker type flagging a work as its author's opus maximum
pub fn type_opus_maximum() -> String {
    kb_type("opmax")
}

/// Common PREFIX header shared by all knowledge-base queries
pub const PREFIXES: &str = r#"PREFIX ecrm: <http://erlangen-crm.org/current/>
PREFIX efrbroo: <http://erlangen-crm.org/efrbroo/>
PREFIX hucit: <http://purl.org/net/hucit#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
"#;
