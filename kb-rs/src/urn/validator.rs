//! CTS URN validation

use crate::errors::{KbError, Result};
use crate::urn::parser::CtsUrn;
use once_cell::sync::Lazy;
use regex::Regex;

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("namespace regex is valid"));

static WORK_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_+\-]+$").expect("work level regex is valid"));

/// Validation result containing errors if invalid
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn with_error(error: String) -> Self {
        Self {
            valid: false,
            errors: vec![error],
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.valid = false;
        self.errors.push(error);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for CTS URN strings
pub struct UrnValidator;

impl UrnValidator {
    /// Validate a CTS URN
    ///
    /// # Examples
    ///
    /// ```
    /// use hucit_kb::UrnValidator;
    ///
    /// let result = UrnValidator::validate("urn:cts:greekLit:tlg0012.tlg001:1.1");
    /// assert!(result.valid);
    /// assert!(result.errors.is_empty());
    ///
    /// let result = UrnValidator::validate("not-a-urn");
    /// assert!(!result.valid);
    /// assert!(!result.errors.is_empty());
    /// ```
    pub fn validate(urn: &str) -> ValidationResult {
        let mut result = ValidationResult::new();

        if urn.is_empty() {
            return ValidationResult::with_error("URN must be a non-empty string".to_string());
        }

        if !urn.starts_with("urn:cts:") {
            return ValidationResult::with_error(format!(
                "Invalid scheme. URN must start with 'urn:cts:', got: {}",
                urn
            ));
        }

        let parsed = match CtsUrn::parse(urn) {
            Ok(parsed) => parsed,
            Err(e) => {
                return ValidationResult::with_error(e.to_string());
            }
        };

        if !Self::is_valid_namespace(parsed.cts_namespace()) {
            result.add_error(format!(
                "Invalid CTS namespace: {}",
                parsed.cts_namespace()
            ));
        }

        for level in [
            Some(parsed.textgroup()),
            parsed.work(),
            parsed.version(),
            parsed.exemplar(),
        ]
        .into_iter()
        .flatten()
        {
            if !Self::is_valid_work_level(level) {
                result.add_error(format!("Invalid work component level: {}", level));
            }
        }

        if let Some(passage) = parsed.passage_component() {
            if !Self::is_valid_passage(passage) {
                result.add_error(format!("Invalid passage component: {}", passage));
            }
        }

        result
    }

    /// Check a CTS namespace identifier (e.g. `greekLit`)
    pub fn is_valid_namespace(namespace: &str) -> bool {
        NAMESPACE_RE.is_match(namespace)
    }

    /// Check a single work component level (e.g. `tlg0012`, `perseus-grc1`)
    pub fn is_valid_work_level(level: &str) -> bool {
        WORK_LEVEL_RE.is_match(level)
    }

    /// Check a passage component (citation, range, or subreference)
    pub fn is_valid_passage(passage: &str) -> bool {
        !passage.is_empty() && !passage.contains(char::is_whitespace)
    }

    /// Validate and return an error on failure
    pub fn assert_valid(urn: &str) -> Result<()> {
        let result = Self::validate(urn);
        if result.valid {
            Ok(())
        } else {
            Err(KbError::UrnValidation(result.errors.join("; ")))
        }
    }
}
