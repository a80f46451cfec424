//! Structural and semantic checks over a message body.
//!
//! Issues come out in a fixed order: the unmatched-brace error first, then
//! one warning per unknown placeholder occurrence in body order, then the
//! length warning. An empty list means the body passed every check.

use crate::encoding::{Repertoire, classify_with};
use crate::parser::parse_tokens;
use crate::registry::KeySet;
use crate::segment::SegmentReport;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

pub const UNMATCHED_BRACES: &str = "Unmatched curly braces found.";
pub const LENGTH_WARNING: &str =
    "Message is longer than the single-segment limit and may be split into multiple messages.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

/// Validates bodies against one key set and repertoire.
#[derive(Debug)]
pub struct Validator<'k, K: ?Sized> {
    known_keys: &'k K,
    repertoire: Repertoire,
}

impl<'k, K: KeySet + ?Sized> Validator<'k, K> {
    pub fn new(known_keys: &'k K) -> Self {
        Self {
            known_keys,
            repertoire: Repertoire::default(),
        }
    }

    pub fn with_repertoire(mut self, repertoire: Repertoire) -> Self {
        self.repertoire = repertoire;
        self
    }

    pub fn validate(&self, body: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let parsed = parse_tokens(body);
        if parsed.brace_balance_error {
            issues.push(ValidationIssue::error(UNMATCHED_BRACES));
        }

        for token in &parsed.tokens {
            if !self.known_keys.contains_key(token.key) {
                issues.push(ValidationIssue::warning(format!(
                    "Unknown variable: {}",
                    token.raw
                )));
            }
        }

        let length = body.chars().count();
        let report = SegmentReport::from_length(length, classify_with(body, self.repertoire));
        if report.single_segment_exceeded(length) {
            issues.push(ValidationIssue::warning(LENGTH_WARNING));
        }

        issues
    }
}

impl<K: KeySet + Sync + ?Sized> Validator<'_, K> {
    /// Lint many bodies in parallel. Results follow the input order.
    pub fn validate_many<S>(&self, bodies: &[S]) -> Vec<Vec<ValidationIssue>>
    where
        S: AsRef<str> + Sync,
    {
        tracing::trace!(count = bodies.len(), "validating template batch");
        bodies
            .par_iter()
            .map(|body| self.validate(body.as_ref()))
            .collect()
    }
}

/// Validate `body` using the default repertoire.
pub fn validate<K: KeySet + ?Sized>(body: &str, known_keys: &K) -> Vec<ValidationIssue> {
    Validator::new(known_keys).validate(body)
}

pub fn validate_many<S, K>(bodies: &[S], known_keys: &K) -> Vec<Vec<ValidationIssue>>
where
    S: AsRef<str> + Sync,
    K: KeySet + Sync + ?Sized,
{
    Validator::new(known_keys).validate_many(bodies)
}
