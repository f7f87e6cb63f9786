//! CTS URN parser
//!
//! Parses Canonical Text Services URNs into their hierarchical components.

use crate::errors::{KbError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

// urn:cts:{namespace}:{work_component}[:{passage_component}]
static URN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^urn:cts:([A-Za-z0-9]+):([A-Za-z0-9_+\-]+(?:\.[A-Za-z0-9_+\-]+)*)(?::(.+))?$")
        .expect("CTS URN regex is valid")
});

/// One level of a URN's work-component hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrnLevel {
    Textgroup,
    Work,
    Version,
    Exemplar,
}

/// A parsed CTS URN.
///
/// The work component is split on `.` into up to four hierarchical levels
/// (textgroup, work, version, exemplar). The passage component, when present,
/// is kept verbatim, including ranges (`1.1-1.10`) and subreferences
/// (`1.1@wrath[1]`).
///
/// # Examples
///
/// ```
/// use hucit_kb::CtsUrn;
///
/// let urn: CtsUrn = "urn:cts:greekLit:tlg0012.tlg001:1.1".parse().unwrap();
/// assert_eq!(urn.textgroup(), "tlg0012");
/// assert_eq!(urn.work(), Some("tlg001"));
/// assert_eq!(urn.passage_component(), Some("1.1"));
/// assert!(!urn.is_range());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CtsUrn {
    cts_namespace: String,
    textgroup: String,
    work: Option<String>,
    version: Option<String>,
    exemplar: Option<String>,
    passage_component: Option<String>,
}

impl CtsUrn {
    /// Parse a CTS URN string into its components.
    pub fn parse(urn: &str) -> Result<Self> {
        if urn.is_empty() {
            return Err(KbError::UrnParse("URN must be a non-empty string".to_string()));
        }

        let caps = URN_RE
            .captures(urn)
            .ok_or_else(|| KbError::InvalidUrnFormat(urn.to_string()))?;

        let work_component = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let mut levels = work_component.split('.');

        let textgroup = levels
            .next()
            .ok_or_else(|| KbError::UrnParse(format!("Missing textgroup in: {}", urn)))?
            .to_string();
        let work = levels.next().map(|s| s.to_string());
        let version = levels.next().map(|s| s.to_string());
        let exemplar = levels.next().map(|s| s.to_string());

        if levels.next().is_some() {
            return Err(KbError::UrnParse(format!(
                "Work component has more than four levels: {}",
                urn
            )));
        }

        Ok(CtsUrn {
            cts_namespace: caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string(),
            textgroup,
            work,
            version,
            exemplar,
            passage_component: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// The CTS namespace (e.g. `greekLit`, `latinLit`).
    pub fn cts_namespace(&self) -> &str {
        &self.cts_namespace
    }

    /// The textgroup identifier (e.g. `tlg0012` for Homer).
    pub fn textgroup(&self) -> &str {
        &self.textgroup
    }

    /// The work identifier within the textgroup (e.g. `tlg001` for the Iliad).
    pub fn work(&self) -> Option<&str> {
        self.work.as_deref()
    }

    /// The version (edition or translation) identifier.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The exemplar identifier.
    pub fn exemplar(&self) -> Option<&str> {
        self.exemplar.as_deref()
    }

    /// The passage component, verbatim (e.g. `1.1`, `1.1-1.10`).
    pub fn passage_component(&self) -> Option<&str> {
        self.passage_component.as_deref()
    }

    /// The dot-joined work component (textgroup through exemplar).
    pub fn work_component(&self) -> String {
        let mut component = self.textgroup.clone();
        for level in [&self.work, &self.version, &self.exemplar].into_iter().flatten() {
            component.push('.');
            component.push_str(level);
        }
        component
    }

    /// Whether the passage component addresses a range (e.g. `1.1-1.10`).
    pub fn is_range(&self) -> bool {
        self.passage_component
            .as_deref()
            .map(|p| p.contains('-'))
            .unwrap_or(false)
    }

    /// A copy of this URN with the passage component removed.
    pub fn without_passage(&self) -> CtsUrn {
        CtsUrn {
            passage_component: None,
            ..self.clone()
        }
    }

    /// A copy of this URN truncated to the given work-component level.
    ///
    /// Levels the URN does not carry are simply absent from the result; the
    /// passage component is always dropped.
    ///
    /// ```
    /// use hucit_kb::{CtsUrn, UrnLevel};
    ///
    /// let urn = CtsUrn::parse("urn:cts:greekLit:tlg0012.tlg001.perseus-grc1:1.1").unwrap();
    /// assert_eq!(urn.up_to(UrnLevel::Work).to_string(), "urn:cts:greekLit:tlg0012.tlg001");
    /// ```
    pub fn up_to(&self, level: UrnLevel) -> CtsUrn {
        CtsUrn {
            cts_namespace: self.cts_namespace.clone(),
            textgroup: self.textgroup.clone(),
            work: (level >= UrnLevel::Work).then(|| self.work.clone()).flatten(),
            version: (level >= UrnLevel::Version)
                .then(|| self.version.clone())
                .flatten(),
            exemplar: (level >= UrnLevel::Exemplar)
                .then(|| self.exemplar.clone())
                .flatten(),
            passage_component: None,
        }
    }
}

impl fmt::Display for CtsUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urn:cts:{}:{}", self.cts_namespace, self.work_component())?;
        if let Some(ref passage) = self.passage_component {
            write!(f, ":{}", passage)?;
        }
        Ok(())
    }
}

impl FromStr for CtsUrn {
    type Err = KbError;

    fn from_str(s: &str) -> Result<Self> {
        CtsUrn::parse(s)
    }
}
