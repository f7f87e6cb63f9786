/**
 * query.rs
 * Query types and builders for SPARQL
 */

use crate::store::ns;

/// Escape a string for use inside a SPARQL string literal
pub fn escape_literal(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Format an IRI term
pub fn iri(value: &str) -> String {
    format!("<{}>", value)
}

/// Format a literal term with an optional language tag
pub fn literal(value: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!("\"{}\"@{}", escape_literal(value), lang),
        None => format!("\"{}\"", escape_literal(value)),
    }
}

pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Find the resource identified by a CTS URN
    ///
    /// The URN string is stored as the rdfs:label of an E42_Identifier
    /// attached to the resource.
    pub fn resource_by_urn(urn: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?resource
            WHERE {{
                ?resource ecrm:P1_is_identified_by ?urn .
                ?urn a ecrm:E42_Identifier ;
                     rdfs:label {urn} .
            }}
            "#,
            prefixes = ns::PREFIXES,
            urn = literal(urn, None),
        ))
    }

    /// Case-insensitive substring search over rdfs:label values
    pub fn label_search(text: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?s ?label ?type
            WHERE {{
                ?s a ?type ;
                   rdfs:label ?label .
                FILTER(CONTAINS(LCASE(STR(?label)), LCASE({text})))
            }}
            "#,
            prefixes = ns::PREFIXES,
            text = literal(text, None),
        ))
    }

    /// Language-tagged name variants of an author (F12_Name labels)
    pub fn names_of(author: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?label
            WHERE {{
                {author} ecrm:P1_is_identified_by ?name .
                ?name a efrbroo:F12_Name ;
                      rdfs:label ?label .
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = iri(author),
        ))
    }

    /// F12_Name nodes of an author
    pub fn name_nodes_of(author: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?name
            WHERE {{
                {author} ecrm:P1_is_identified_by ?name .
                ?name a efrbroo:F12_Name .
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = iri(author),
        ))
    }

    /// Language-tagged title variants of a work (E35_Title labels)
    pub fn titles_of(work: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?label
            WHERE {{
                {work} efrbroo:P102_has_title ?title .
                ?title a efrbroo:E35_Title ;
                       rdfs:label ?label .
            }}
            "#,
            prefixes = ns::PREFIXES,
            work = iri(work),
        ))
    }

    /// E35_Title nodes of a work
    pub fn title_nodes_of(work: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?title
            WHERE {{
                {work} efrbroo:P102_has_title ?title .
                ?title a efrbroo:E35_Title .
            }}
            "#,
            prefixes = ns::PREFIXES,
            work = iri(work),
        ))
    }

    /// Abbreviation labels attached to an author's names
    ///
    /// Abbreviations are E41_Appellation alternative forms carrying the
    /// `abbreviation` marker type.
    pub fn author_abbreviations(author: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?label
            WHERE {{
                {author} ecrm:P1_is_identified_by ?name .
                ?name a efrbroo:F12_Name ;
                      ecrm:P139_has_alternative_form ?abbr .
                ?abbr ecrm:P2_has_type {abbr_type} ;
                      rdfs:label ?label .
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = iri(author),
            abbr_type = iri(&ns::type_abbreviation()),
        ))
    }

    /// E41_Appellation abbreviation nodes attached to an author's names
    pub fn author_abbreviation_nodes(author: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?abbr
            WHERE {{
                {author} ecrm:P1_is_identified_by ?name .
                ?name a efrbroo:F12_Name ;
                      ecrm:P139_has_alternative_form ?abbr .
                ?abbr ecrm:P2_has_type {abbr_type} .
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = iri(author),
            abbr_type = iri(&ns::type_abbreviation()),
        ))
    }

    /// Abbreviation labels attached to a work's titles
    pub fn work_abbreviations(work: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?label
            WHERE {{
                {work} efrbroo:P102_has_title ?title .
                ?title a efrbroo:E35_Title ;
                       ecrm:P139_has_alternative_form ?abbr .
                ?abbr ecrm:P2_has_type {abbr_type} ;
                      rdfs:label ?label .
            }}
            "#,
            prefixes = ns::PREFIXES,
            work = iri(work),
            abbr_type = iri(&ns::type_abbreviation()),
        ))
    }

    /// E41_Appellation abbreviation nodes attached to a work's titles
    pub fn work_abbreviation_nodes(work: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?abbr
            WHERE {{
                {work} efrbroo:P102_has_title ?title .
                ?title a efrbroo:E35_Title ;
                       ecrm:P139_has_alternative_form ?abbr .
                ?abbr ecrm:P2_has_type {abbr_type} .
            }}
            "#,
            prefixes = ns::PREFIXES,
            work = iri(work),
            abbr_type = iri(&ns::type_abbreviation()),
        ))
    }

    /// CTS URN string of a resource (label of its typed E42_Identifier)
    pub fn cts_urn_of(subject: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?label
            WHERE {{
                {subject} ecrm:P1_is_identified_by ?id .
                ?id a ecrm:E42_Identifier ;
                    ecrm:P2_has_type {urn_type} ;
                    rdfs:label ?label .
            }}
            "#,
            prefixes = ns::PREFIXES,
            subject = iri(subject),
            urn_type = iri(&ns::type_cts_urn()),
        ))
    }

    /// Works attributed to an author, via the work-conception event
    pub fn works_of(author: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?work
            WHERE {{
                {author} efrbroo:P14i_performed ?creation .
                ?creation efrbroo:R16_initiated ?work .
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = iri(author),
        ))
    }

    /// The author a work is attributed to
    pub fn author_of(work: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?author
            WHERE {{
                ?creation efrbroo:R16_initiated {work} .
                ?author efrbroo:P14i_performed ?creation .
            }}
            "#,
            prefixes = ns::PREFIXES,
            work = iri(work),
        ))
    }

    /// Objects linked from a subject through a predicate
    pub fn objects_of(subject: &str, predicate: &str) -> Self {
        Self::new(format!(
            r#"
            SELECT ?o
            WHERE {{
                {subject} {predicate} ?o .
            }}
            "#,
            subject = iri(subject),
            predicate = iri(predicate),
        ))
    }

    /// Subjects linking to an object through a predicate
    pub fn subjects_of(predicate: &str, object: &str) -> Self {
        Self::new(format!(
            r#"
            SELECT ?s
            WHERE {{
                ?s {predicate} {object} .
            }}
            "#,
            predicate = iri(predicate),
            object = iri(object),
        ))
    }

    /// All subjects of a given rdf:type
    pub fn subjects_by_type(class: &str) -> Self {
        Self::new(format!(
            r#"{prefixes}
            SELECT ?s
            WHERE {{
                ?s a {class} .
            }}
            "#,
            prefixes = ns::PREFIXES,
            class = iri(class),
        ))
    }

    /// Whether any statement exists about the subject
    pub fn subject_exists(subject: &str) -> Self {
        Self::new(format!(
            "ASK {{ {subject} ?p ?o . }}",
            subject = iri(subject)
        ))
    }

    // =========================================================================
    // SPARQL Update templates
    // =========================================================================

    /// INSERT DATA from preformatted triple patterns
    pub fn insert_data(triples: &[String]) -> Self {
        Self::new(format!("INSERT DATA {{\n{}\n}}", triples.join("\n")))
    }

    /// DELETE DATA for a single preformatted triple
    pub fn delete_data(triple: &str) -> Self {
        Self::new(format!("DELETE DATA {{\n{}\n}}", triple))
    }

    /// Delete all rdfs:label statements of a subject
    pub fn delete_labels_of(subject: &str) -> Self {
        Self::new(format!(
            "{prefixes}DELETE WHERE {{ {subject} rdfs:label ?label . }}",
            prefixes = ns::PREFIXES,
            subject = iri(subject),
        ))
    }

    /// Delete all statements about a subject and all links pointing to it
    pub fn delete_resource(subject: &str) -> Self {
        Self::new(format!(
            "DELETE WHERE {{ {subject} ?p ?o . }} ;\nDELETE WHERE {{ ?s ?p {subject} . }}",
            subject = iri(subject),
        ))
    }
}

/// Format a triple pattern with an IRI object
pub fn triple_iri(subject: &str, predicate: &str, object: &str) -> String {
    format!("    {} {} {} .", iri(subject), iri(predicate), iri(object))
}

/// Format a triple pattern with a literal object
pub fn triple_literal(subject: &str, predicate: &str, value: &str, lang: Option<&str>) -> String {
    format!(
        "    {} {} {} .",
        iri(subject),
        iri(predicate),
        literal(value, lang)
    )
}
