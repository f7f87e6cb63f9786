/**
 * kb.rs
 * The knowledge-base facade: URN-based lookup, search, enumeration and
 * authoring of text elements over the underlying triple store.
 */

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::KbConfig;
use crate::errors::{KbError, Result};
use crate::mappers::{set_urn_of, Author, ElementType, TextElement, Work};
use crate::store::ns;
use crate::store::query::{self, SparqlQuery};
use crate::store::{with_retry, KbStore};
use crate::urn::CtsUrn;

/// A resource resolved from a CTS URN.
///
/// The URN's shape decides the variant: a passage component means a text
/// element, a work component a work, a bare textgroup an author.
#[derive(Debug, Clone)]
pub enum KbResource {
    Author(Author),
    Work(Work),
    TextElement(TextElement),
}

impl KbResource {
    pub fn subject(&self) -> &str {
        match self {
            KbResource::Author(author) => author.subject(),
            KbResource::Work(work) => work.subject(),
            KbResource::TextElement(element) => element.subject(),
        }
    }

    pub fn as_author(&self) -> Option<&Author> {
        match self {
            KbResource::Author(author) => Some(author),
            _ => None,
        }
    }

    pub fn as_work(&self) -> Option<&Work> {
        match self {
            KbResource::Work(work) => Some(work),
            _ => None,
        }
    }

    pub fn as_text_element(&self) -> Option<&TextElement> {
        match self {
            KbResource::TextElement(element) => Some(element),
            _ => None,
        }
    }
}

/// Aggregate counts over the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    #[serde(rename = "number_authors")]
    pub authors: usize,
    #[serde(rename = "number_author_names")]
    pub author_names: usize,
    #[serde(rename = "number_author_abbreviations")]
    pub author_abbreviations: usize,
    #[serde(rename = "number_works")]
    pub works: usize,
    #[serde(rename = "number_work_titles")]
    pub work_titles: usize,
    #[serde(rename = "number_title_abbreviations")]
    pub title_abbreviations: usize,
    #[serde(rename = "number_opus_maximum")]
    pub opus_maximum: usize,
}

/// Entry point to the HuCit knowledge base
#[derive(Debug)]
pub struct KnowledgeBase {
    store: Arc<KbStore>,
    config: KbConfig,
}

impl KnowledgeBase {
    /// Open the knowledge base described by a configuration
    pub fn new(config: KbConfig) -> Result<Self> {
        let store = KbStore::open(&config.store)?;
        if let KbStore::Memory(_) = store {
            info!(triples = store.size()?, "loaded in-memory knowledge base");
        } else {
            info!(store = ?store, "connected to remote knowledge base");
        }
        Ok(Self {
            store: Arc::new(store),
            config,
        })
    }

    /// Open the knowledge base from a YAML configuration file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(KbConfig::load(path)?)
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    /// Number of triples in the store
    pub fn size(&self) -> Result<usize> {
        self.store.size()
    }

    /// Resolve a CTS URN to the resource it identifies.
    ///
    /// Retried on transient store failures; a URN with no matching resource
    /// fails immediately with [`KbError::ResourceNotFound`].
    pub fn resource_by_urn(&self, urn: &str) -> Result<KbResource> {
        let parsed = CtsUrn::parse(urn)?;
        let query = SparqlQuery::resource_by_urn(urn);

        let subject = with_retry(|| {
            let rows = self.store.select(query.as_str())?;
            rows.iter()
                .filter_map(|row| row.get("resource"))
                .find(|term| term.is_iri())
                .map(|term| term.value().to_string())
                .ok_or_else(|| KbError::ResourceNotFound(urn.to_string()))
        })?;

        debug!(urn, subject, "resolved URN");
        Ok(self.resource_for(parsed, subject))
    }

    /// Case-insensitive substring search over all labels.
    ///
    /// Matches on names, titles and abbreviations resolve to the author or
    /// work that owns them; direct matches on author and work labels resolve
    /// to the resource itself. Returns `(matched_label, resource)` pairs,
    /// deduplicated by resource.
    pub fn search(&self, text: &str) -> Result<Vec<(String, KbResource)>> {
        let rows = self.store.select(SparqlQuery::label_search(text).as_str())?;

        let mut seen: Vec<String> = Vec::new();
        let mut results = Vec::new();
        for row in &rows {
            let (subject, label, type_iri) = match (row.get("s"), row.get("label"), row.get("type"))
            {
                (Some(s), Some(label), Some(t)) if s.is_iri() && t.is_iri() => {
                    (s.value().to_string(), label.value().to_string(), t.value())
                }
                _ => continue,
            };

            let resource = match type_iri {
                ns::F10_PERSON => Some(KbResource::Author(self.author(subject))),
                ns::F1_WORK => Some(KbResource::Work(self.work(subject))),
                ns::F12_NAME => self
                    .subject_of(ns::P1_IS_IDENTIFIED_BY, &subject)?
                    .map(|owner| KbResource::Author(self.author(owner))),
                ns::E35_TITLE => self
                    .subject_of(ns::P102_HAS_TITLE, &subject)?
                    .map(|owner| KbResource::Work(self.work(owner))),
                ns::E41_APPELLATION => self.appellation_owner(&subject)?,
                _ => None,
            };

            if let Some(resource) = resource {
                if !seen.contains(&resource.subject().to_string()) {
                    seen.push(resource.subject().to_string());
                    results.push((label, resource));
                }
            }
        }
        Ok(results)
    }

    /// All authors in the knowledge base
    pub fn authors(&self) -> Result<Vec<Author>> {
        let rows = self
            .store
            .select(SparqlQuery::subjects_by_type(ns::F10_PERSON).as_str())?;
        Ok(self
            .iris(&rows, "s")
            .into_iter()
            .map(|iri| self.author(iri))
            .collect())
    }

    /// All works in the knowledge base
    pub fn works(&self) -> Result<Vec<Work>> {
        let rows = self
            .store
            .select(SparqlQuery::subjects_by_type(ns::F1_WORK).as_str())?;
        Ok(self
            .iris(&rows, "s")
            .into_iter()
            .map(|iri| self.work(iri))
            .collect())
    }

    /// Display label of the author identified by a URN, if found
    pub fn author_label(&self, urn: &str) -> Result<Option<String>> {
        match self.resource_by_urn(urn) {
            Ok(KbResource::Author(author)) => author.display_label(),
            Ok(_) => Ok(None),
            Err(KbError::ResourceNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Display title of the work identified by a URN, if found
    pub fn work_label(&self, urn: &str) -> Result<Option<String>> {
        match self.resource_by_urn(urn) {
            Ok(KbResource::Work(work)) => work.display_label(),
            Ok(_) => Ok(None),
            Err(KbError::ResourceNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The principal work of the author identified by a URN.
    ///
    /// An author with a single work has that work as opus maximum; with
    /// several works the first one carrying the marker type wins.
    pub fn opus_maximum_of(&self, author_urn: &str) -> Result<Option<Work>> {
        let author = match self.resource_by_urn(author_urn) {
            Ok(KbResource::Author(author)) => author,
            Ok(_) => return Ok(None),
            Err(KbError::ResourceNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let works = author.works()?;
        if works.len() == 1 {
            return Ok(works.into_iter().next());
        }
        for work in works {
            if work.is_opus_maximum()? {
                return Ok(Some(work));
            }
        }
        Ok(None)
    }

    /// Aggregate counts over authors, works and their labels
    pub fn statistics(&self) -> Result<Statistics> {
        let mut stats = Statistics {
            authors: 0,
            author_names: 0,
            author_abbreviations: 0,
            works: 0,
            work_titles: 0,
            title_abbreviations: 0,
            opus_maximum: 0,
        };

        for author in self.authors()? {
            stats.authors += 1;
            stats.author_names += author.names()?.len();
            stats.author_abbreviations += author.abbreviations()?.len();
        }
        for work in self.works()? {
            stats.works += 1;
            stats.work_titles += work.titles()?.len();
            stats.title_abbreviations += work.abbreviations(false)?.len();
        }

        let opmax_rows = self.store.select(
            SparqlQuery::subjects_of(ns::P2_HAS_TYPE, &ns::type_opus_maximum()).as_str(),
        )?;
        stats.opus_maximum = self.iris(&opmax_rows, "s").len();

        Ok(stats)
    }

    /// All text-element type markers (book, line, poem, ...)
    ///
    /// The reserved markers used internally for abbreviations, URNs and the
    /// opus maximum are excluded.
    pub fn text_element_types(&self) -> Result<Vec<ElementType>> {
        let rows = self
            .store
            .select(SparqlQuery::subjects_by_type(ns::E55_TYPE).as_str())?;
        let reserved = [
            ns::type_abbreviation(),
            ns::type_cts_urn(),
            ns::type_opus_maximum(),
        ];
        Ok(self
            .iris(&rows, "s")
            .into_iter()
            .filter(|iri| iri.starts_with(&ns::kb_type("")) && !reserved.contains(iri))
            .map(|iri| ElementType::new(Arc::clone(&self.store), iri))
            .collect())
    }

    /// Look up a text-element type marker by label
    pub fn text_element_type(&self, label: &str) -> Result<Option<ElementType>> {
        let subject = ns::kb_type(&label.to_lowercase());
        if self.store.ask(SparqlQuery::subject_exists(&subject).as_str())? {
            Ok(Some(ElementType::new(Arc::clone(&self.store), subject)))
        } else {
            Ok(None)
        }
    }

    /// Create a text-element type marker, or return the existing one
    pub fn add_text_element_type(&self, label: &str, lang: &str) -> Result<ElementType> {
        if let Some(existing) = self.text_element_type(label)? {
            debug!(label, "text element type already exists");
            return Ok(existing);
        }

        let subject = ns::kb_type(&label.to_lowercase());
        self.store.update(
            SparqlQuery::insert_data(&[
                query::triple_iri(&subject, ns::RDF_TYPE, ns::E55_TYPE),
                query::triple_literal(&subject, ns::RDFS_LABEL, label, Some(lang)),
            ])
            .as_str(),
        )?;
        Ok(ElementType::new(Arc::clone(&self.store), subject))
    }

    /// Create several text-element type markers at once
    pub fn add_text_element_types(&self, labels: &[&str], lang: &str) -> Result<Vec<ElementType>> {
        labels
            .iter()
            .map(|label| self.add_text_element_type(label, lang))
            .collect()
    }

    /// Attach a CTS URN identifier to a resource.
    ///
    /// Returns `false` without writing when the resource already carries an
    /// identifier node.
    pub fn create_cts_urn(&self, subject: &str, urn: &CtsUrn) -> Result<bool> {
        let id_node = format!("{}/cts_urn", subject);
        if self.store.ask(SparqlQuery::subject_exists(&id_node).as_str())? {
            info!(subject, "CTS URN identifier already exists, skipping");
            return Ok(false);
        }
        set_urn_of(&self.store, subject, urn)?;
        Ok(true)
    }

    /// Create a citable text element of a work.
    ///
    /// The element is minted at `{work}/{passage}`, labeled
    /// "{work label} {type label} {passage}", typed with the given marker and
    /// identified by the URN. `source_uri` optionally links the element to an
    /// external text resource. Retried on transient store failures.
    pub fn create_text_element(
        &self,
        work: &Work,
        urn: &CtsUrn,
        element_type: &ElementType,
        source_uri: Option<&str>,
    ) -> Result<TextElement> {
        let passage = urn.passage_component().ok_or_else(|| {
            KbError::InvalidUrnFormat(format!("{} has no passage component", urn))
        })?;

        let work_label = match work.rdfs_label()? {
            // denormalized "Title :: Author" labels keep only the title part
            Some(label) => label.split(" :: ").next().unwrap_or(&label).to_string(),
            None => work
                .display_label()?
                .unwrap_or_else(|| work.subject().to_string()),
        };
        let type_label = element_type
            .label()?
            .unwrap_or_else(|| element_type.subject().to_string());

        let subject = format!("{}/{}", work.subject(), passage);
        let label = format!("{} {} {}", work_label, type_label, passage);

        let mut triples = vec![
            query::triple_iri(&subject, ns::RDF_TYPE, ns::TEXT_ELEMENT),
            query::triple_literal(&subject, ns::RDFS_LABEL, &label, Some("en")),
            query::triple_iri(&subject, ns::P2_HAS_TYPE, element_type.subject()),
        ];
        if let Some(source) = source_uri {
            triples.push(query::triple_iri(&subject, ns::RESOLVES_TO, source));
        }

        let update = SparqlQuery::insert_data(&triples);
        with_retry(|| self.store.update(update.as_str()))?;
        self.create_cts_urn(&subject, urn)?;

        Ok(TextElement::new(Arc::clone(&self.store), subject))
    }

    /// All author names keyed by `"{urn}$$n{index}"`.
    ///
    /// Authors without a URN are skipped.
    pub fn author_names(&self) -> Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        for author in self.authors()? {
            if let Some(urn) = author.urn()? {
                for (i, (_, name)) in author.names()?.into_iter().enumerate() {
                    map.insert(format!("{}$$n{}", urn, i), name);
                }
            }
        }
        Ok(map)
    }

    /// All author abbreviations keyed by `"{urn}$$n{index}"`
    pub fn author_abbreviations(&self) -> Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        for author in self.authors()? {
            if let Some(urn) = author.urn()? {
                for (i, abbreviation) in author.abbreviations()?.into_iter().enumerate() {
                    map.insert(format!("{}$$n{}", urn, i), abbreviation);
                }
            }
        }
        Ok(map)
    }

    /// All work titles keyed by `"{urn}$$n{index}"`
    pub fn work_titles(&self) -> Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        for work in self.works()? {
            if let Some(urn) = work.urn()? {
                for (i, (_, title)) in work.titles()?.into_iter().enumerate() {
                    map.insert(format!("{}$$n{}", urn, i), title);
                }
            }
        }
        Ok(map)
    }

    /// All work abbreviations, author-combined, keyed by `"{urn}$$n{index}"`
    pub fn work_abbreviations(&self) -> Result<HashMap<String, String>> {
        let mut map = HashMap::new();
        for work in self.works()? {
            if let Some(urn) = work.urn()? {
                for (i, abbreviation) in work.abbreviations(true)?.into_iter().enumerate() {
                    map.insert(format!("{}$$n{}", urn, i), abbreviation);
                }
            }
        }
        Ok(map)
    }

    /// JSON rendition of the whole knowledge base: statistics plus all
    /// authors with their works
    pub fn to_json(&self) -> Result<String> {
        let authors = self
            .authors()?
            .iter()
            .map(Author::to_json_value)
            .collect::<Result<Vec<_>>>()?;
        let value = json!({
            "statistics": self.statistics()?,
            "authors": authors,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn resource_for(&self, urn: CtsUrn, subject: String) -> KbResource {
        if urn.passage_component().is_some() {
            KbResource::TextElement(TextElement::new(Arc::clone(&self.store), subject))
        } else if urn.work().is_some() {
            KbResource::Work(self.work(subject))
        } else {
            KbResource::Author(self.author(subject))
        }
    }

    fn author(&self, subject: String) -> Author {
        Author::new(Arc::clone(&self.store), subject)
    }

    fn work(&self, subject: String) -> Work {
        Work::new(Arc::clone(&self.store), subject)
    }

    /// Owner of an abbreviation appellation: walk back to the name or title
    /// node, then to the author or work holding it.
    fn appellation_owner(&self, appellation: &str) -> Result<Option<KbResource>> {
        if let Some(name_or_title) =
            self.subject_of(ns::P139_HAS_ALTERNATIVE_FORM, appellation)?
        {
            if let Some(author) = self.subject_of(ns::P1_IS_IDENTIFIED_BY, &name_or_title)? {
                return Ok(Some(KbResource::Author(self.author(author))));
            }
            if let Some(work) = self.subject_of(ns::P102_HAS_TITLE, &name_or_title)? {
                return Ok(Some(KbResource::Work(self.work(work))));
            }
        }
        Ok(None)
    }

    fn subject_of(&self, predicate: &str, object: &str) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::subjects_of(predicate, object).as_str())?;
        Ok(self.iris(&rows, "s").into_iter().next())
    }

    fn iris(&self, rows: &[crate::store::Row], var: &str) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.get(var))
            .filter(|term| term.is_iri())
            .map(|term| term.value().to_string())
            .collect()
    }
}
