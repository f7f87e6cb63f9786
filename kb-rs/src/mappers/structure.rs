/**
 * structure.rs
 * Mappers for citation structures and their citable text elements
 */

use std::sync::Arc;

use tracing::debug;

use crate::errors::{KbError, Result};
use crate::store::ns;
use crate::store::query::{self, SparqlQuery};
use crate::store::{with_retry, KbStore};
use crate::urn::CtsUrn;

use super::{iris_from_rows, labels_from_rows, ElementType, Work};

/// The citation structure of a work ("Book > Line" etc.)
#[derive(Debug, Clone)]
pub struct TextStructure {
    store: Arc<KbStore>,
    subject: String,
}

impl TextStructure {
    pub(crate) fn new(store: Arc<KbStore>, subject: String) -> Self {
        Self { store, subject }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The work this structure belongs to
    pub fn work(&self) -> Result<Option<Work>> {
        let rows = self
            .store
            .select(SparqlQuery::subjects_of(ns::HAS_STRUCTURE, &self.subject).as_str())?;
        Ok(iris_from_rows(&rows, "s")
            .into_iter()
            .next()
            .map(|iri| Work::new(Arc::clone(&self.store), iri)))
    }

    /// Register a text element with this structure.
    ///
    /// Only top-level elements (books, poems) are linked directly; nested
    /// elements are reachable through their parents.
    pub fn add_element(&self, element: &TextElement, top_level: bool) -> Result<()> {
        if !top_level {
            debug!(element = %element.subject(), "nested element, not linking to structure");
            return Ok(());
        }
        self.store.update(
            SparqlQuery::insert_data(&[query::triple_iri(
                &self.subject,
                ns::HAS_ELEMENT,
                element.subject(),
            )])
            .as_str(),
        )
    }

    /// The top-level elements registered with this structure
    pub fn elements(&self) -> Result<Vec<TextElement>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::HAS_ELEMENT).as_str())?;
        Ok(iris_from_rows(&rows, "o")
            .into_iter()
            .map(|iri| TextElement::new(Arc::clone(&self.store), iri))
            .collect())
    }
}

/// One citable element of a text (a book, a line, a poem)
#[derive(Debug, Clone)]
pub struct TextElement {
    store: Arc<KbStore>,
    subject: String,
}

impl TextElement {
    pub(crate) fn new(store: Arc<KbStore>, subject: String) -> Self {
        Self { store, subject }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The element's CTS URN.
    ///
    /// Unlike authors and works, a text element without a URN is broken data,
    /// so the missing case is an error.
    pub fn urn(&self) -> Result<CtsUrn> {
        let rows = self
            .store
            .select(SparqlQuery::cts_urn_of(&self.subject).as_str())?;
        let label = labels_from_rows(&rows, "label")
            .into_iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| {
                KbError::Store(format!("Text element {} has no CTS URN", self.subject))
            })?;
        CtsUrn::parse(&label)
    }

    /// The element's type marker (book, line, ...)
    pub fn element_type(&self) -> Result<Option<ElementType>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::P2_HAS_TYPE).as_str())?;
        Ok(iris_from_rows(&rows, "o")
            .into_iter()
            .next()
            .map(|iri| ElementType::new(Arc::clone(&self.store), iri)))
    }

    /// The element's direct rdfs:label
    pub fn label(&self) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::RDFS_LABEL).as_str())?;
        Ok(labels_from_rows(&rows, "o")
            .into_iter()
            .next()
            .map(|(_, v)| v))
    }

    /// The following sibling in citation order
    pub fn next(&self) -> Result<Option<TextElement>> {
        self.linked_element(ns::PRECEDES)
    }

    /// The preceding sibling in citation order
    pub fn previous(&self) -> Result<Option<TextElement>> {
        self.linked_element(ns::FOLLOWS)
    }

    /// The containing element (the book a line belongs to)
    pub fn parent(&self) -> Result<Option<TextElement>> {
        self.linked_element(ns::IS_PART_OF)
    }

    /// Directly contained elements
    pub fn children(&self) -> Result<Vec<TextElement>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, ns::HAS_PART).as_str())?;
        Ok(iris_from_rows(&rows, "o")
            .into_iter()
            .map(|iri| TextElement::new(Arc::clone(&self.store), iri))
            .collect())
    }

    /// Whether this element opens its sequence
    pub fn is_first(&self) -> Result<bool> {
        Ok(self.previous()?.is_none())
    }

    /// Whether this element closes its sequence
    pub fn is_last(&self) -> Result<bool> {
        Ok(self.next()?.is_none())
    }

    /// Link this element into the citation graph.
    ///
    /// Each relation is written in both directions, so traversal never needs
    /// inverse queries. Retried on transient store failures.
    pub fn add_relations(
        &self,
        parent: Option<&TextElement>,
        previous: Option<&TextElement>,
        next: Option<&TextElement>,
    ) -> Result<()> {
        let mut triples = Vec::new();
        if let Some(parent) = parent {
            triples.push(query::triple_iri(&self.subject, ns::IS_PART_OF, parent.subject()));
            triples.push(query::triple_iri(parent.subject(), ns::HAS_PART, &self.subject));
        }
        if let Some(previous) = previous {
            triples.push(query::triple_iri(&self.subject, ns::FOLLOWS, previous.subject()));
            triples.push(query::triple_iri(previous.subject(), ns::PRECEDES, &self.subject));
        }
        if let Some(next) = next {
            triples.push(query::triple_iri(&self.subject, ns::PRECEDES, next.subject()));
            triples.push(query::triple_iri(next.subject(), ns::FOLLOWS, &self.subject));
        }
        if triples.is_empty() {
            return Ok(());
        }

        let update = SparqlQuery::insert_data(&triples);
        with_retry(|| self.store.update(update.as_str()))
    }

    fn linked_element(&self, predicate: &str) -> Result<Option<TextElement>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, predicate).as_str())?;
        Ok(iris_from_rows(&rows, "o")
            .into_iter()
            .next()
            .map(|iri| TextElement::new(Arc::clone(&self.store), iri)))
    }
}
