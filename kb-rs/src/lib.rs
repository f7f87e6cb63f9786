//! # HuCit Knowledge Base
//!
//! A thin object layer over an RDF triple store describing classical texts:
//! authors, works and their citation structures, all identified by CTS URNs.
//!
//! The store can be an in-memory graph loaded from RDF files or a remote
//! SPARQL endpoint; the [`KnowledgeBase`] facade and the entity mappers work
//! the same against either.
//!
//! ## Example
//!
//! ```no_run
//! use hucit_kb::{KbConfig, KnowledgeBase};
//!
//! # fn main() -> hucit_kb::Result<()> {
//! let kb = KnowledgeBase::new(KbConfig::in_memory(vec!["data/kb.ttl"], "turtle"))?;
//!
//! let resource = kb.resource_by_urn("urn:cts:greekLit:tlg0012.tlg001")?;
//! if let Some(work) = resource.as_work() {
//!     println!("{:?} by {:?}", work.display_label()?, work.author()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod kb;
pub mod mappers;
pub mod store;
pub mod urn;

pub use config::{Backend, KbConfig, StoreConfig};
pub use errors::{KbError, Result};
pub use kb::{KbResource, KnowledgeBase, Statistics};
pub use mappers::{Author, ElementType, TextElement, TextStructure, Work};
pub use store::{KbStore, Row, Term};
pub use urn::{CtsUrn, UrnLevel, UrnValidator, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
