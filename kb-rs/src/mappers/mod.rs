//! Entity object mappings
//!
//! Each mapper wraps a store handle plus the subject IRI of one RDF resource
//! and exposes method-based access to the predicate links around it. Nothing
//! is cached: every accessor goes back to the store, so concurrent writers
//! are always visible.

mod author;
mod structure;
mod work;

pub use author::Author;
pub(crate) use author::set_urn_of;
pub use structure::{TextElement, TextStructure};
pub use work::Work;

use std::sync::Arc;

use crate::errors::Result;
use crate::store::query::SparqlQuery;
use crate::store::{KbStore, Row, Term};

/// Language preference cascade for label selection: English first, then
/// untagged, then Latin. Within a language the shortest label wins.
pub(crate) fn pick_label(labels: &[(Option<String>, String)]) -> Option<String> {
    for lang in [Some("en"), None, Some("la")] {
        let mut candidates: Vec<&str> = labels
            .iter()
            .filter(|(l, _)| l.as_deref() == lang)
            .map(|(_, v)| v.as_str())
            .collect();
        if !candidates.is_empty() {
            candidates.sort_by_key(|v| v.len());
            return Some(candidates[0].to_string());
        }
    }
    None
}

/// Collect `(lang, value)` pairs from the literal bindings of a variable
pub(crate) fn labels_from_rows(rows: &[Row], var: &str) -> Vec<(Option<String>, String)> {
    rows.iter()
        .filter_map(|row| row.get(var))
        .filter_map(|term| match term {
            Term::Literal { value, lang, .. } => {
                Some((lang.clone(), value.clone()))
            }
            _ => None,
        })
        .collect()
}

/// Collect the IRI bindings of a variable
pub(crate) fn iris_from_rows(rows: &[Row], var: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get(var))
        .filter_map(|term| match term {
            Term::Iri(iri) => Some(iri.clone()),
            _ => None,
        })
        .collect()
}

/// An E55_Type marker resource (text element types such as "book" or "line")
#[derive(Debug, Clone)]
pub struct ElementType {
    store: Arc<KbStore>,
    subject: String,
}

impl ElementType {
    pub(crate) fn new(store: Arc<KbStore>, subject: String) -> Self {
        Self { store, subject }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The type's first rdfs:label, if any
    pub fn label(&self) -> Result<Option<String>> {
        let rows = self
            .store
            .select(SparqlQuery::objects_of(&self.subject, crate::store::ns::RDFS_LABEL).as_str())?;
        Ok(labels_from_rows(&rows, "o").into_iter().next().map(|(_, v)| v))
    }
}
