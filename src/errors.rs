//! Error types for genesis migration.
//!
//! Every failure the library can raise is a [`MigrationError`]. Variants are
//! grouped by category, and each carries a stable [`ErrorCode`] so scripts
//! driving the CLI can branch on the failure class without parsing messages.
//!
//! # Error Codes
//!
//! - E001-E009: document shape errors
//! - E010-E019: referential integrity errors
//! - E020-E029: aggregate errors
//! - E030-E039: configuration errors
//! - E040-E049: input/output errors
//!
//! # Example
//!
//! ```rust
//! use genesis_migrate::errors::{ErrorCode, MigrationError};
//!
//! let err = MigrationError::missing_section("trustaking");
//! assert_eq!(err.code(), ErrorCode::MISSING_SECTION);
//! assert_eq!(err.to_string(), "missing section `trustaking`");
//! ```

use std::fmt;
use std::path::PathBuf;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Shape error - section or root key absent
    pub const MISSING_SECTION: ErrorCode = ErrorCode("E001");
    /// Shape error - record or parameter field absent
    pub const MISSING_FIELD: ErrorCode = ErrorCode("E002");
    /// Shape error - value has the wrong JSON type
    pub const SHAPE_MISMATCH: ErrorCode = ErrorCode("E003");

    /// Reference error - no record matches the identifier
    pub const REFERENCE_NOT_FOUND: ErrorCode = ErrorCode("E010");

    /// Aggregate error - recomputed value is below the stored one
    pub const AGGREGATE_REGRESSION: ErrorCode = ErrorCode("E020");
    /// Aggregate error - derived value is impossible
    pub const INCONSISTENT_AGGREGATE: ErrorCode = ErrorCode("E021");
    /// Aggregate error - amount is not a canonical non-negative integer
    pub const INVALID_AMOUNT: ErrorCode = ErrorCode("E022");

    /// Config error - invalid parameter or pipeline definition
    pub const CONFIGURATION: ErrorCode = ErrorCode("E030");

    /// Input error - document is not valid JSON
    pub const PARSE: ErrorCode = ErrorCode("E040");
    /// Input/output error - file read or write failed
    pub const IO: ErrorCode = ErrorCode("E041");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Errors raised while loading, migrating or writing a genesis document.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A section (or top-level key) the step expects is absent.
    #[error("missing section `{section}`")]
    MissingSection { section: String },

    /// A field the step expects is absent from a record or parameter map.
    #[error("missing field `{field}` in {location}")]
    MissingField { location: String, field: String },

    /// A value exists but is not the JSON type the step expects.
    #[error("expected {expected} at {location}")]
    ShapeMismatch {
        location: String,
        expected: &'static str,
    },

    /// A reference field points at a record that does not exist.
    #[error("no record in `{section}` with {field} = {key}")]
    ReferenceNotFound {
        section: String,
        field: String,
        key: String,
    },

    /// A recomputed aggregate came out lower than the value already stored.
    #[error("{aggregate} of {entity} decreased from {stored} to {recomputed}")]
    AggregateRegression {
        entity: String,
        aggregate: String,
        stored: String,
        recomputed: String,
    },

    /// A derived value cannot exist given its inputs.
    #[error("inconsistent aggregate for {entity}: {message}")]
    InconsistentAggregate { entity: String, message: String },

    #[error("invalid amount `{value}` at {location}")]
    InvalidAmount { location: String, value: String },

    #[error("configuration error: {message}")]
    Configuration {
        field: Option<String>,
        message: String,
    },

    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wraps the first error raised by a migration step.
    #[error("step `{step}` failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<MigrationError>,
    },
}

impl MigrationError {
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    pub fn missing_field(location: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            location: location.into(),
            field: field.into(),
        }
    }

    pub fn shape(location: impl Into<String>, expected: &'static str) -> Self {
        Self::ShapeMismatch {
            location: location.into(),
            expected,
        }
    }

    pub fn reference_not_found(
        section: impl Into<String>,
        field: impl Into<String>,
        key: impl fmt::Display,
    ) -> Self {
        Self::ReferenceNotFound {
            section: section.into(),
            field: field.into(),
            key: key.to_string(),
        }
    }

    pub fn regression(
        entity: impl Into<String>,
        aggregate: impl Into<String>,
        stored: impl fmt::Display,
        recomputed: impl fmt::Display,
    ) -> Self {
        Self::AggregateRegression {
            entity: entity.into(),
            aggregate: aggregate.into(),
            stored: stored.to_string(),
            recomputed: recomputed.to_string(),
        }
    }

    pub fn inconsistent(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InconsistentAggregate {
            entity: entity.into(),
            message: message.into(),
        }
    }

    pub fn invalid_amount(location: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidAmount {
            location: location.into(),
            value: value.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            field: None,
            message: message.into(),
        }
    }

    pub fn config_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attribute this error to the named migration step.
    pub fn in_step(self, step: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every step wrapper removed.
    pub fn root_cause(&self) -> &MigrationError {
        match self {
            Self::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Name of the step that raised this error, if any.
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }

    /// Get the error code of the underlying failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingSection { .. } => ErrorCode::MISSING_SECTION,
            Self::MissingField { .. } => ErrorCode::MISSING_FIELD,
            Self::ShapeMismatch { .. } => ErrorCode::SHAPE_MISMATCH,
            Self::ReferenceNotFound { .. } => ErrorCode::REFERENCE_NOT_FOUND,
            Self::AggregateRegression { .. } => ErrorCode::AGGREGATE_REGRESSION,
            Self::InconsistentAggregate { .. } => ErrorCode::INCONSISTENT_AGGREGATE,
            Self::InvalidAmount { .. } => ErrorCode::INVALID_AMOUNT,
            Self::Configuration { .. } => ErrorCode::CONFIGURATION,
            Self::Parse(_) => ErrorCode::PARSE,
            Self::Io { .. } => ErrorCode::IO,
            Self::Step { source, .. } => source.code(),
        }
    }

    /// Whether the operator can fix this by correcting inputs or flags.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Configuration { .. } | Self::Parse(_) | Self::Io { .. }
        )
    }
}

pub type Result<T, E = MigrationError> = std::result::Result<T, E>;
