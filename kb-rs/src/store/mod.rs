//! RDF store adapter
//!
//! Executes SPARQL against either an in-memory oxigraph store (loaded from
//! RDF source files) or a remote SPARQL-over-HTTP endpoint. Both backends
//! answer the same three operations (`select`, `ask`, `update`), so the
//! entity mappers never know which one they are talking to.

pub mod ns;
pub mod query;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::config::StoreConfig;
use crate::errors::{KbError, Result};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// An RDF term in a query solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Iri(String),
    Literal {
        value: String,
        lang: Option<String>,
        datatype: Option<String>,
    },
    Blank(String),
}

impl Term {
    /// The lexical value of the term (IRI string, literal value, or blank id)
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(v) => v,
            Term::Literal { value, .. } => value,
            Term::Blank(v) => v,
        }
    }

    /// The language tag, for tagged literals
    pub fn lang(&self) -> Option<&str> {
        match self {
            Term::Literal { lang, .. } => lang.as_deref(),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

impl From<&oxigraph::model::Term> for Term {
    fn from(term: &oxigraph::model::Term) -> Self {
        use oxigraph::model::Term as OxTerm;
        match term {
            OxTerm::NamedNode(node) => Term::Iri(node.as_str().to_string()),
            OxTerm::BlankNode(node) => Term::Blank(node.as_str().to_string()),
            OxTerm::Literal(lit) => Term::Literal {
                value: lit.value().to_string(),
                lang: lit.language().map(|l| l.to_string()),
                datatype: if lit.language().is_some() {
                    None
                } else {
                    Some(lit.datatype().as_str().to_string())
                },
            },
            OxTerm::Triple(t) => Term::Blank(t.to_string()),
        }
    }
}

/// One row of a SELECT solution, keyed by variable name
pub type Row = HashMap<String, Term>;

/// The knowledge base's triple store
pub enum KbStore {
    Memory(Store),
    Remote(RemoteStore),
}

impl std::fmt::Debug for KbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KbStore::Memory(_) => write!(f, "KbStore::Memory"),
            KbStore::Remote(remote) => write!(f, "KbStore::Remote({})", remote.endpoint),
        }
    }
}

impl KbStore {
    /// Open the store described by a [`StoreConfig`]
    pub fn open(config: &StoreConfig) -> Result<Self> {
        match config.backend {
            crate::config::Backend::Memory => {
                let store = Store::new().map_err(|e| KbError::Store(e.to_string()))?;
                let kb_store = KbStore::Memory(store);
                kb_store.load_sources(&config.sources, &config.format)?;
                Ok(kb_store)
            }
            crate::config::Backend::Remote => {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    KbError::Config("remote backend requires an endpoint".to_string())
                })?;
                Ok(KbStore::Remote(RemoteStore::new(
                    endpoint,
                    config.update_endpoint.clone(),
                    config.read_only,
                )))
            }
        }
    }

    /// Load RDF source files into the in-memory backend
    pub fn load_sources<P: AsRef<Path>>(&self, sources: &[P], format: &str) -> Result<()> {
        let store = match self {
            KbStore::Memory(store) => store,
            KbStore::Remote(remote) => {
                return Err(KbError::Store(format!(
                    "Cannot load local sources into remote store: {}",
                    remote.endpoint
                )));
            }
        };

        let rdf_format = parse_rdf_format(format)?;
        for source in sources {
            let path = source.as_ref();
            if !path.exists() {
                return Err(KbError::FileNotFound(path.display().to_string()));
            }
            let content = fs::read_to_string(path)?;
            store
                .load_from_reader(rdf_format, content.as_bytes())
                .map_err(|e| {
                    KbError::Store(format!("Failed to parse {}: {}", path.display(), e))
                })?;
            debug!(source = %path.display(), "loaded RDF source");
        }
        Ok(())
    }

    /// Execute a SELECT query and collect its solutions
    pub fn select(&self, query: &str) -> Result<Vec<Row>> {
        match self {
            KbStore::Memory(store) => {
                let results = store
                    .query(query)
                    .map_err(|e| KbError::Query(e.to_string()))?;

                match results {
                    QueryResults::Solutions(solutions) => {
                        let mut rows = Vec::new();
                        for solution in solutions {
                            let solution =
                                solution.map_err(|e| KbError::Query(e.to_string()))?;
                            let mut row = Row::new();
                            for (var, term) in solution.iter() {
                                row.insert(var.as_str().to_string(), Term::from(term));
                            }
                            rows.push(row);
                        }
                        Ok(rows)
                    }
                    _ => Err(KbError::Query(
                        "Expected SELECT solutions, got a different result form".to_string(),
                    )),
                }
            }
            KbStore::Remote(remote) => remote.select(query),
        }
    }

    /// Execute an ASK query
    pub fn ask(&self, query: &str) -> Result<bool> {
        match self {
            KbStore::Memory(store) => {
                let results = store
                    .query(query)
                    .map_err(|e| KbError::Query(e.to_string()))?;
                match results {
                    QueryResults::Boolean(answer) => Ok(answer),
                    _ => Err(KbError::Query(
                        "Expected a boolean result from ASK".to_string(),
                    )),
                }
            }
            KbStore::Remote(remote) => remote.ask(query),
        }
    }

    /// Execute a SPARQL Update
    ///
    /// Fails with [`KbError::ReadOnlyStore`] on read-only remote endpoints.
    pub fn update(&self, update: &str) -> Result<()> {
        match self {
            KbStore::Memory(store) => store
                .update(update)
                .map_err(|e| KbError::Query(e.to_string())),
            KbStore::Remote(remote) => remote.update(update),
        }
    }

    /// Number of triples in the store
    pub fn size(&self) -> Result<usize> {
        match self {
            KbStore::Memory(store) => store.len().map_err(|e| KbError::Store(e.to_string())),
            KbStore::Remote(remote) => remote.size(),
        }
    }
}

/// A remote SPARQL 1.1 protocol endpoint (e.g. Virtuoso, Druid)
pub struct RemoteStore {
    client: Client,
    endpoint: String,
    update_endpoint: Option<String>,
    read_only: bool,
}

impl RemoteStore {
    pub fn new(endpoint: String, update_endpoint: Option<String>, read_only: bool) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            update_endpoint,
            read_only,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn query_json(&self, query: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    pub fn select(&self, query: &str) -> Result<Vec<Row>> {
        let body = self.query_json(query)?;
        let bindings = body
            .get("results")
            .and_then(|r| r.get("bindings"))
            .and_then(|b| b.as_array())
            .ok_or_else(|| {
                KbError::Query("Malformed SPARQL JSON results: missing bindings".to_string())
            })?;

        bindings
            .iter()
            .map(|binding| {
                let object = binding.as_object().ok_or_else(|| {
                    KbError::Query("Malformed SPARQL JSON binding".to_string())
                })?;
                let mut row = Row::new();
                for (var, value) in object {
                    row.insert(var.clone(), term_from_json(value)?);
                }
                Ok(row)
            })
            .collect()
    }

    pub fn ask(&self, query: &str) -> Result<bool> {
        let body = self.query_json(query)?;
        body.get("boolean").and_then(|b| b.as_bool()).ok_or_else(|| {
            KbError::Query("Malformed SPARQL JSON results: missing boolean".to_string())
        })
    }

    pub fn update(&self, update: &str) -> Result<()> {
        if self.read_only {
            return Err(KbError::ReadOnlyStore(self.endpoint.clone()));
        }
        let endpoint = self.update_endpoint.as_deref().unwrap_or(&self.endpoint);
        self.client
            .post(endpoint)
            .form(&[("update", update)])
            .send()?
            .error_for_status()?;
        Ok(())
    }

    pub fn size(&self) -> Result<usize> {
        let rows = self.select("SELECT (COUNT(*) AS ?count) WHERE { ?s ?p ?o }")?;
        rows.first()
            .and_then(|row| row.get("count"))
            .and_then(|term| term.value().parse::<usize>().ok())
            .ok_or_else(|| KbError::Query("Count query returned no usable value".to_string()))
    }
}

/// Parse one term of the SPARQL 1.1 JSON results format
fn term_from_json(value: &serde_json::Value) -> Result<Term> {
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| KbError::Query("Binding term has no type".to_string()))?;
    let lexical = value
        .get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| KbError::Query("Binding term has no value".to_string()))?
        .to_string();

    match kind {
        "uri" => Ok(Term::Iri(lexical)),
        "literal" | "typed-literal" => Ok(Term::Literal {
            value: lexical,
            lang: value
                .get("xml:lang")
                .and_then(|l| l.as_str())
                .map(|l| l.to_string()),
            datatype: value
                .get("datatype")
                .and_then(|d| d.as_str())
                .map(|d| d.to_string()),
        }),
        "bnode" => Ok(Term::Blank(lexical)),
        other => Err(KbError::Query(format!("Unknown binding term type: {}", other))),
    }
}

/// Retry a store round trip with a fixed 5 s delay, 5 attempts in total.
///
/// `ResourceNotFound` is a definitive answer, not a transient failure, so it
/// is never retried.
pub(crate) fn with_retry<T, F>(op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    use backon::{BlockingRetryable, ConstantBuilder};
    use std::time::Duration;

    op.retry(
        ConstantBuilder::default()
            .with_delay(Duration::from_secs(5))
            .with_max_times(4),
    )
    .when(|e| !matches!(e, KbError::ResourceNotFound(_)))
    .call()
}

fn parse_rdf_format(format: &str) -> Result<RdfFormat> {
    match format.to_lowercase().as_str() {
        "turtle" | "ttl" => Ok(RdfFormat::Turtle),
        "ntriples" | "nt" => Ok(RdfFormat::NTriples),
        "nquads" | "nq" => Ok(RdfFormat::NQuads),
        "trig" => Ok(RdfFormat::TriG),
        "rdfxml" | "xml" => Ok(RdfFormat::RdfXml),
        other => Err(KbError::Config(format!(
            "Unsupported RDF source format: {} (expected turtle, ntriples, nquads, trig or rdfxml)",
            other
        ))),
    }
}
