/**
 * author.rs
 * Mapper for F10_Person resources (authors of classical texts)
 */

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::store::ns;
use crate::store::query::{self, SparqlQuery};
use crate::store::KbStore;
use crate::urn::CtsUrn;

use super::{iris_from_rows, labels_from_rows, pick_label, Work};

/// An author in the knowledge base
#[derive(Debug, Clone)]
pub struct Author {
    store: Arc<KbStore>,
    subject: String,
}

impl Author {
    pub(crate) fn new(store: Arc<KbStore>, subject: String) -> Self {
        Self { store, subject }
    }

    /// The IRI identifying this author in the store
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// All name variants as `(language, value)` pairs
    pub fn names(&self) -> Result<Vec<(Option<String>, String)>> {
        let rows = self
            .store
            .select(SparqlQuery::names_of(&self.subject).as_str())?;
        Ok(labels_from_rows(&rows, "label"))
    }

    /// A single display label, picked by language preference
    pub fn display_label(&self) -> Result<Option<String>> {
        Ok(pick_label(&self.names()?))
    }

    /// Add a name variant.
    ///
    /// Returns `false` without touching the store when the exact
    /// `(language, value)` pair already exists. The F12_Name node is created
    /// on first use.
    pub fn add_name(&self, name: &str, lang: Option<&str>) -> Result<bool> {
        let existing = self.names()?;
        if existing
            .iter()
            .any(|(l, v)| l.as_deref() == lang && v == name)
        {
            warn!(author = %self.subject, name, "name already exists, not adding");
            return Ok(false);
        }

        let name_node = match self.name_node()? {
            Some(node) => node,
            None => {
                let node = format!("{}/name", self.subject);
                self.store.update(
                    SparqlQuery::insert_data(&[
                        query::triple_iri(&node, ns::RDF_TYPE, ns::F12_NAME),
                        query::triple_iri(&self.subject, ns::P1_IS_IDENTIFIED_BY, &node),
                    ])
                    .as_str(),
                )?;
                node
            }
        };

        self.store.update(
            SparqlQuery::insert_data(&[query::triple_literal(
                &name_node,
                ns::RDFS_LABEL,
                name,
                lang,
            )])
            .as_str(),
        )?;
        Ok(true)
    }

    /// Remove a name variant in any language.
    ///
    /// Returns `false` when no name with that value exists.
    pub fn remove_name(&self, name: &str) -> Result<bool> {
        if !self.names()?.iter().any(|(_, v)| v == name) {
            return Ok(false);
        }

        let update = format!(
            r#"{prefixes}
            DELETE {{ ?name rdfs:label ?label . }}
            WHERE {{
                {author} ecrm:P1_is_identified_by ?name .
                ?name a efrbroo:F12_Name ;
                      rdfs:label ?label .
                FILTER(STR(?label) = {name})
            }}
            "#,
            prefixes = ns::PREFIXES,
            author = query::iri(&self.subject),
            name = query::literal(name, None),
        );
        self.store.update(&update)?;
        Ok(true)
    }

    /// Abbreviated name forms, e.g. "Hom." for Homer
    pub fn abbreviations(&self) -> Result<Vec<String>> {
        let rows = self
            .store
            .select(SparqlQuery::author_abbreviations(&self.subject).as_str())?;
        Ok(labels_from_rows(&rows, "label")
            .into_iter()
            .map(|(_, v)| v)
            .collect())
    }

    /// Add an abbreviated name form.
    ///
    /// The abbreviation hangs off a name node as an E41_Appellation carrying
    /// the abbreviation marker type. Requires at least one existing name.
    /// Returns `false` when the abbreviation is already recorded.
    pub fn add_abbreviation(&self, abbreviation: &str) -> Result<bool> {
        if self.abbreviations()?.iter().any(|a| a == abbreviation) {
            warn!(author = %self.subject, abbreviation, "abbreviation already exists, not adding");
            return Ok(false);
        }

        let rows = self
            .store
            .select(SparqlQuery::author_abbreviation_nodes(&self.subject).as_str())?;
        let abbr_node = match iris_from_rows(&rows, "abbr").into_iter().next() {
            Some(node) => node,
            None => {
                let name_node = self.name_node()?.ok_or_else(|| {
                    crate::errors::KbError::Store(format!(
                        "Cannot attach abbreviation to {}: author has no name",
                        self.subject
                    ))
                })?;
                let node = format!("{}/abbr", self.subject);
                self.store.update(
                    SparqlQuery::insert_data(&[
                        query::triple_iri(&node, ns::RDF_TYPE, ns::E41_APPELLATION),
                        query::triple_iri(&node, ns::P2_HAS_TYPE, &ns::type_abbreviation()),
                        query::triple_iri(&name_node, ns::P139_HAS_ALTERNATIVE_FORM, &node),
                    ])
                    .as_str(),
                )?;
                node
            }
        };

        self.store.update(
            SparqlQuery::insert_data(&[query::triple_literal(
                &abbr_node,
                ns::RDFS_LABEL,
                abbreviation,
                None,
            )])
            .as_str(),
        )?;
        Ok(true)
    }

    /// The author's CTS URN, when one is recorded and parseable
    pub fn urn(&self) -> Result<Option<CtsUrn>> {
        let rows = self
            .store
            .select(SparqlQuery::cts_urn_of(&self.subject).as_str())?;
        match labels_from_rows(&rows, "label").into_iter().next() {
            Some((_, value)) => match CtsUrn::parse(&value) {
                Ok(urn) => Ok(Some(urn)),
                Err(e) => {
                    debug!(author = %self.subject, urn = %value, error = %e, "unparseable CTS URN");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Set or replace the author's CTS URN
    pub fn set_urn(&self, urn: &CtsUrn) -> Result<()> {
        set_urn_of(&self.store, &self.subject, urn)
    }

    /// Works attributed to this author
    pub fn works(&self) -> Result<Vec<Work>> {
        let rows = self
            .store
            .select(SparqlQuery::works_of(&self.subject).as_str())?;
        Ok(iris_from_rows(&rows, "work")
            .into_iter()
            .map(|iri| Work::new(Arc::clone(&self.store), iri))
            .collect())
    }

    /// JSON rendition of the author with names, abbreviations and works
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        let names: Vec<serde_json::Value> = self
            .names()?
            .into_iter()
            .map(|(lang, label)| json!({"language": lang, "label": label}))
            .collect();
        let works = self
            .works()?
            .iter()
            .map(Work::to_json_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(json!({
            "uri": self.subject,
            "urn": self.urn()?.map(|urn| urn.to_string()),
            "names": names,
            "name_abbreviations": self.abbreviations()?,
            "works": works,
        }))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value()?)?)
    }

    /// First F12_Name node of this author, if any
    fn name_node(&self) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::name_nodes_of(&self.subject).as_str())?;
        Ok(iris_from_rows(&rows, "name").into_iter().next())
    }
}

/// Shared identifier handling: mint `{subject}/cts_urn` on first use, replace
/// the label on subsequent calls.
pub(crate) fn set_urn_of(store: &KbStore, subject: &str, urn: &CtsUrn) -> Result<()> {
    let id_node = format!("{}/cts_urn", subject);

    if store.ask(SparqlQuery::subject_exists(&id_node).as_str())? {
        store.update(SparqlQuery::delete_labels_of(&id_node).as_str())?;
        store.update(
            SparqlQuery::insert_data(&[query::triple_literal(
                &id_node,
                ns::RDFS_LABEL,
                &urn.to_string(),
                None,
            )])
            .as_str(),
        )?;
    } else {
        store.update(
            SparqlQuery::insert_data(&[
                query::triple_iri(&id_node, ns::RDF_TYPE, ns::E42_IDENTIFIER),
                query::triple_iri(&id_node, ns::P2_HAS_TYPE, &ns::type_cts_urn()),
                query::triple_iri(subject, ns::P1_IS_IDENTIFIED_BY, &id_node),
                query::triple_literal(&id_node, ns::RDFS_LABEL, &urn.to_string(), None),
            ])
            .as_str(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::store::Store;

    const HOMER: &str = "http://purl.org/hucit/kb/authors/927";

    fn empty_store() -> Arc<KbStore> {
        Arc::new(KbStore::Memory(Store::new().unwrap()))
    }

    fn homer_store() -> Arc<KbStore> {
        let store = empty_store();
        let name = format!("{}/name", HOMER);
        let triples = vec![
            query::triple_iri(HOMER, ns::RDF_TYPE, ns::F10_PERSON),
            query::triple_iri(HOMER, ns::P1_IS_IDENTIFIED_BY, &name),
            query::triple_iri(&name, ns::RDF_TYPE, ns::F12_NAME),
            query::triple_literal(&name, ns::RDFS_LABEL, "Homer", Some("en")),
            query::triple_literal(&name, ns::RDFS_LABEL, "Homerus", Some("la")),
        ];
        store
            .update(SparqlQuery::insert_data(&triples).as_str())
            .unwrap();
        store
    }

    fn homer(store: &Arc<KbStore>) -> Author {
        Author::new(Arc::clone(store), HOMER.to_string())
    }

    /// Test: names returns all language variants
    #[test]
    fn test_names() {
        let store = homer_store();
        let mut names = homer(&store).names().unwrap();
        names.sort();

        assert_eq!(
            names,
            vec![
                (Some("en".to_string()), "Homer".to_string()),
                (Some("la".to_string()), "Homerus".to_string()),
            ]
        );
    }

    /// Test: display label prefers English
    #[test]
    fn test_display_label() {
        let store = homer_store();
        assert_eq!(
            homer(&store).display_label().unwrap(),
            Some("Homer".to_string())
        );
    }

    /// Test: add_name inserts a new variant and rejects duplicates
    #[test]
    fn test_add_name() {
        let store = homer_store();
        let author = homer(&store);

        assert!(author.add_name("Omero", Some("it")).unwrap());
        assert!(author
            .names()
            .unwrap()
            .contains(&(Some("it".to_string()), "Omero".to_string())));

        // exact duplicate is a no-op
        assert!(!author.add_name("Omero", Some("it")).unwrap());
    }

    /// Test: add_name creates the name node for a bare author
    #[test]
    fn test_add_name_creates_name_node() {
        let store = empty_store();
        let author = homer(&store);

        assert!(author.add_name("Homer", Some("en")).unwrap());
        assert_eq!(
            author.names().unwrap(),
            vec![(Some("en".to_string()), "Homer".to_string())]
        );
    }

    /// Test: remove_name drops the variant in every language
    #[test]
    fn test_remove_name() {
        let store = homer_store();
        let author = homer(&store);

        assert!(author.remove_name("Homerus").unwrap());
        assert_eq!(
            author.names().unwrap(),
            vec![(Some("en".to_string()), "Homer".to_string())]
        );

        assert!(!author.remove_name("Homerus").unwrap());
    }

    /// Test: abbreviation round trip
    #[test]
    fn test_abbreviations() {
        let store = homer_store();
        let author = homer(&store);

        assert!(author.abbreviations().unwrap().is_empty());
        assert!(author.add_abbreviation("Hom.").unwrap());
        assert_eq!(author.abbreviations().unwrap(), vec!["Hom.".to_string()]);

        assert!(!author.add_abbreviation("Hom.").unwrap());
    }

    /// Test: abbreviation on a nameless author fails
    #[test]
    fn test_add_abbreviation_requires_name() {
        let store = empty_store();
        let author = homer(&store);
        assert!(author.add_abbreviation("Hom.").is_err());
    }

    /// Test: set_urn then urn round trip, including replacement
    #[test]
    fn test_urn_round_trip() {
        let store = homer_store();
        let author = homer(&store);

        assert!(author.urn().unwrap().is_none());

        let urn = CtsUrn::parse("urn:cts:greekLit:tlg0012").unwrap();
        author.set_urn(&urn).unwrap();
        assert_eq!(author.urn().unwrap(), Some(urn));

        let replacement = CtsUrn::parse("urn:cts:greekLit:tlg9999").unwrap();
        author.set_urn(&replacement).unwrap();
        assert_eq!(author.urn().unwrap(), Some(replacement));
    }

    /// Test: unparseable stored URN yields None instead of an error
    #[test]
    fn test_malformed_urn_is_none() {
        let store = homer_store();
        let id = format!("{}/cts_urn", HOMER);
        store
            .update(
                SparqlQuery::insert_data(&[
                    query::triple_iri(&id, ns::RDF_TYPE, ns::E42_IDENTIFIER),
                    query::triple_iri(&id, ns::P2_HAS_TYPE, &ns::type_cts_urn()),
                    query::triple_iri(HOMER, ns::P1_IS_IDENTIFIED_BY, &id),
                    query::triple_literal(&id, ns::RDFS_LABEL, "not-a-urn", None),
                ])
                .as_str(),
            )
            .unwrap();

        assert!(homer(&store).urn().unwrap().is_none());
    }

    /// Test: to_json_value carries names and abbreviations
    #[test]
    fn test_to_json_value() {
        let store = homer_store();
        let author = homer(&store);
        author.add_abbreviation("Hom.").unwrap();

        let value = author.to_json_value().unwrap();
        assert_eq!(value["uri"], HOMER);
        assert_eq!(value["names"].as_array().unwrap().len(), 2);
        assert_eq!(value["name_abbreviations"][0], "Hom.");
        assert!(value["works"].as_array().unwrap().is_empty());
    }
}
