//! Purpose: Structured, serializable error details returned to HTTP clients.
//! Exports: `Detail`, `ErrorState`.
//! Role: Wire shape of every request-decoding failure (`{"errors": [...]}`).
//! Invariants: Field names are stable: `domain`, `type`, `location`, `reason`, `message`.
//! Invariants: `reason` is machine-oriented; `message` is safe to show to end users.
use std::fmt;

use serde::{Deserialize, Serialize};

/// One failure, located in a protocol layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub domain: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub reason: String,
    pub message: String,
}

impl Detail {
    pub fn new(
        domain: impl Into<String>,
        kind: impl Into<String>,
        location: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            kind: kind.into(),
            location: location.into(),
            reason: reason.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {}",
            self.domain, self.kind, self.location, self.reason
        )
    }
}

/// Ordered collection of details; usually a single entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub errors: Vec<Detail>,
}

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(detail: Detail) -> Self {
        Self {
            errors: vec![detail],
        }
    }

    pub fn add(&mut self, detail: Detail) {
        self.errors.push(detail);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detail> {
        self.errors.iter()
    }
}

impl FromIterator<Detail> for ErrorState {
    fn from_iter<I: IntoIterator<Item = Detail>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, detail) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorState {}
