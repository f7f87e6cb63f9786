//! CTS URN parsing and validation
//!
//! Canonical Text Services URNs address classical texts hierarchically:
//!
//! ```text
//! urn:cts:greekLit:tlg0012                      (textgroup: Homer)
//! urn:cts:greekLit:tlg0012.tlg001               (work: Iliad)
//! urn:cts:greekLit:tlg0012.tlg001.perseus-grc1  (version/edition)
//! urn:cts:greekLit:tlg0012.tlg001:1.1           (passage: book 1, line 1)
//! urn:cts:greekLit:tlg0012.tlg001:1.1-1.10      (passage range)
//! ```
//!
//! The URN shape decides which knowledge-base entity it identifies: a
//! passage component points at a text element, a work component with a work
//! level points at a work, and a bare textgroup points at an author.

mod parser;
mod validator;

pub use parser::{CtsUrn, UrnLevel};
pub use validator::{UrnValidator, ValidationResult};
