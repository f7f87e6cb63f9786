/**
 * work.rs
 * Mapper for F1_Work resources (conceptual works such as the Iliad)
 */

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::errors::{KbError, Result};
use crate::store::ns;
use crate::store::query::{self, SparqlQuery};
use crate::store::KbStore;
use crate::urn::CtsUrn;

use super::author::set_urn_of;
use super::{iris_from_rows, labels_from_rows, pick_label, Author, TextStructure};

/// A conceptual work in the knowledge base
#[derive(Debug, Clone)]
pub struct Work {
    store: Arc<KbStore>,
    subject: String,
}

impl Work {
    pub(crate) fn new(store: Arc<KbStore>, subject: String) -> Self {
        Self { store, subject }
    }

    /// The IRI identifying this work in the store
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// All title variants as `(language, value)` pairs
    pub fn titles(&self) -> Result<Vec<(Option<String>, String)>> {
        let rows = self
            .store
            .select(SparqlQuery::titles_of(&self.subject).as_str())?;
        Ok(labels_from_rows(&rows, "label"))
    }

    /// A single display title, picked by language preference
    pub fn display_label(&self) -> Result<Option<String>> {
        Ok(pick_label(&self.titles()?))
    }

    /// Add a title variant.
    ///
    /// Returns `false` without touching the store when the exact
    /// `(language, value)` pair already exists. The E35_Title node is created
    /// on first use.
    pub fn add_title(&self, title: &str, lang: Option<&str>) -> Result<bool> {
        let existing = self.titles()?;
        if existing
            .iter()
            .any(|(l, v)| l.as_deref() == lang && v == title)
        {
            warn!(work = %self.subject, title, "title already exists, not adding");
            return Ok(false);
        }

        let title_node = match self.title_node()? {
            Some(node) => node,
            None => {
                let node = format!("{}/title", self.subject);
                self.store.update(
                    SparqlQuery::insert_data(&[
                        query::triple_iri(&node, ns::RDF_TYPE, ns::E35_TITLE),
                        query::triple_iri(&self.subject, ns::P102_HAS_TITLE, &node),
                    ])
                    .as_str(),
                )?;
                node
            }
        };

        self.store.update(
            SparqlQuery::insert_data(&[query::triple_literal(
                &title_node,
                ns::RDFS_LABEL,
                title,
                lang,
            )])
            .as_str(),
        )?;
        Ok(true)
    }

    /// Abbreviated title forms, e.g. "Il." for the Iliad.
    ///
    /// With `combine` set, and when both the author and the work carry
    /// abbreviations, every author abbreviation is prefixed to every work
    /// abbreviation ("Hom. Il.").
    pub fn abbreviations(&self, combine: bool) -> Result<Vec<String>> {
        let rows = self
            .store
            .select(SparqlQuery::work_abbreviations(&self.subject).as_str())?;
        let own: Vec<String> = labels_from_rows(&rows, "label")
            .into_iter()
            .map(|(_, v)| v)
            .collect();

        if combine && !own.is_empty() {
            if let Some(author) = self.author()? {
                let author_abbrevs = author.abbreviations()?;
                if !author_abbrevs.is_empty() {
                    return Ok(author_abbrevs
                        .iter()
                        .flat_map(|a| own.iter().map(move |w| format!("{} {}", a, w)))
                        .collect());
                }
            }
        }
        Ok(own)
    }

    /// Add an abbreviated title form.
    ///
    /// Requires at least one existing title to hang the appellation off.
    /// Returns `false` when the abbreviation is already recorded.
    pub fn add_abbreviation(&self, abbreviation: &str) -> Result<bool> {
        if self.abbreviations(false)?.iter().any(|a| a == abbreviation) {
            warn!(work = %self.subject, abbreviation, "abbreviation already exists, not adding");
            return Ok(false);
        }

        let rows = self
            .store
            .select(SparqlQuery::work_abbreviation_nodes(&self.subject).as_str())?;
        let abbr_node = match iris_from_rows(&rows, "abbr").into_iter().next() {
            Some(node) => node,
            None => {
                let title_node = self.title_node()?.ok_or_else(|| {
                    KbError::Store(format!(
                        "Cannot attach abbreviation to {}: work has no title",
                        self.subject
                    ))
                })?;
                let node = format!("{}/abbr", self.subject);
                self.store.update(
                    SparqlQuery::insert_data(&[
                        query::triple_iri(&node, ns::RDF_TYPE, ns::E41_APPELLATION),
                        query::triple_iri(&node, ns::P2_HAS_TYPE, &ns::type_abbreviation()),
                        query::triple_iri(&title_node, ns::P139_HAS_ALTERNATIVE_FORM, &node),
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

    /// The work's CTS URN, when one is recorded and parseable
    pub fn urn(&self) -> Result<Option<CtsUrn>> {
        let rows = self
            .store
            .select(SparqlQuery::cts_urn_of(&self.subject).as_str())?;
        match labels_from_rows(&rows, "label").into_iter().next() {
            Some((_, value)) => match CtsUrn::parse(&value) {
                Ok(urn) => Ok(Some(urn)),
                Err(e) => {
                    debug!(work = %self.subject, urn = %value, error = %e, "unparseable CTS URN");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Set or replace the work's CTS URN
    pub fn set_urn(&self, urn: &CtsUrn) -> Result<()> {
        set_urn_of(&self.store, &self.subject, urn)
    }

    /// The author this work is attributed to
    pub fn author(&self) -> Result<Option<Author>> {
        let rows = self
            .store
            .select(SparqlQuery::author_of(&self.subject).as_str())?;
        Ok(iris_from_rows(&rows, "author")
            .into_iter()
            .next()
            .map(|iri| Author::new(Arc::clone(&self.store), iri)))
    }

    /// The work's citable text structure, when one has been declared
    pub fn structure(&self) -> Result<Option<TextStructure>> {
        let rows = self.store.select(
            SparqlQuery::objects_of(&self.subject, ns::HAS_STRUCTURE).as_str(),
        )?;
        Ok(iris_from_rows(&rows, "o")
            .into_iter()
            .next()
            .map(|iri| TextStructure::new(Arc::clone(&self.store), iri)))
    }

    pub fn has_text_structure(&self) -> Result<bool> {
        Ok(self.structure()?.is_some())
    }

    /// Declare the work's citation structure ("Book > Line" etc.)
    ///
    /// Returns the existing structure unchanged when one is already declared.
    pub fn add_text_structure(&self, label: &str, lang: Option<&str>) -> Result<TextStructure> {
        if let Some(structure) = self.structure()? {
            debug!(work = %self.subject, "text structure already declared");
            return Ok(structure);
        }

        let node = format!("{}/text_structure", self.subject);
        self.store.update(
            SparqlQuery::insert_data(&[
                query::triple_iri(&node, ns::RDF_TYPE, ns::TEXT_STRUCTURE),
                query::triple_literal(&node, ns::RDFS_LABEL, label, lang),
                query::triple_iri(&self.subject, ns::HAS_STRUCTURE, &node),
            ])
            .as_str(),
        )?;
        Ok(TextStructure::new(Arc::clone(&self.store), node))
    }

    /// Remove the work's text structure and all statements about it
    pub fn remove_text_structure(&self) -> Result<()> {
        if let Some(structure) = self.structure()? {
            self.store
                .update(SparqlQuery::delete_resource(structure.subject()).as_str())?;
        }
        Ok(())
    }

    /// The work's direct rdfs:label, when present.
    ///
    /// Most works only carry titles; the direct label is the denormalized
    /// "Title :: Author" form found on some resources.
    pub fn rdfs_label(&self) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::RDFS_LABEL).as_str())?;
        Ok(labels_from_rows(&rows, "o")
            .into_iter()
            .next()
            .map(|(_, v)| v))
    }

    /// Whether this is its author's principal work.
    ///
    /// A work qualifies either by carrying the opus-maximum marker type or by
    /// being the author's only work. Read-only: never mutates the store.
    pub fn is_opus_maximum(&self) -> Result<bool> {
        if self.has_opus_maximum_type()? {
            return Ok(true);
        }
        match self.author()? {
            Some(author) => Ok(author.works()?.len() == 1),
            None => Ok(false),
        }
    }

    /// Flag this work as its author's principal work.
    ///
    /// Returns `false` when the marker type is already present. The shared
    /// opus-maximum E55_Type resource is created on first use.
    pub fn set_as_opus_maximum(&self) -> Result<bool> {
        if self.has_opus_maximum_type()? {
            return Ok(false);
        }

        let opmax = ns::type_opus_maximum();
        if !self.store.ask(SparqlQuery::subject_exists(&opmax).as_str())? {
            self.store.update(
                SparqlQuery::insert_data(&[
                    query::triple_iri(&opmax, ns::RDF_TYPE, ns::E55_TYPE),
                    query::triple_literal(&opmax, ns::RDFS_LABEL, "opus maximum", Some("en")),
                ])
                .as_str(),
            )?;
        }

        self.store.update(
            SparqlQuery::insert_data(&[query::triple_iri(&self.subject, ns::P2_HAS_TYPE, &opmax)])
                .as_str(),
        )?;
        Ok(true)
    }

    /// JSON rendition of the work with titles and abbreviations
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        let titles: Vec<serde_json::Value> = self
            .titles()?
            .into_iter()
            .map(|(lang, label)| json!({"language": lang, "label": label}))
            .collect();

        Ok(json!({
            "uri": self.subject,
            "urn": self.urn()?.map(|urn| urn.to_string()),
            "titles": titles,
            "title_abbreviations": self.abbreviations(false)?,
        }))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value()?)?)
    }

    fn has_opus_maximum_type(&self) -> Result<bool> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::P2_HAS_TYPE).as_str())?;
        Ok(iris_from_rows(&rows, "o")
            .iter()
            .any(|t| t == &ns::type_opus_maximum()))
    }

    /// First E35_Title node of this work, if any
    fn title_node(&self) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::title_nodes_of(&self.subject).as_str())?;
        Ok(iris_from_rows(&rows, "title").into_iter().next())
    }
}
