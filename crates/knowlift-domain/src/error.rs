//! Domain error types

use thiserror::Error;

/// Errors raised by catalog lookups and statistics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Level index outside the catalog
    #[error("Game level {index} is out of range (catalog has {tier_count} levels)")]
    LevelOutOfRange {
        /// Requested index
        index: usize,
        /// Number of tiers in the catalog
        tier_count: usize,
    },

    /// Statistics requested before any answer was recorded
    #[error("No answers recorded, statistics are undefined")]
    NoAnswers,

    /// The level table itself is malformed
    #[error("Invalid level catalog: {0}")]
    InvalidCatalog(String),
}

/// Reasons an interval payload is rejected by the evaluator
///
/// All of these collapse to "no result" for the web layer. The variants
/// exist so that logs and tests can tell the failure categories apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// A required field is absent from the payload
    #[error("{0} not found in form data.")]
    MissingField(&'static str),

    /// A glyph outside the permitted set for its side
    #[error("unexpected glyph {0}")]
    UnexpectedGlyph(String),

    /// The display string does not match the internal value
    #[error("inconsistency among numbers: {field} internal value {internal} != representation {representation:?}")]
    InconsistentRepresentation {
        /// Which bound disagreed
        field: &'static str,
        /// Internal integer value
        internal: i64,
        /// Display string received
        representation: String,
    },

    /// Bounds are equal or reversed
    #[error("inconsistency among numbers: stop {stop} must be greater than start {start}")]
    InvalidOrdering {
        /// Lower bound received
        start: i64,
        /// Upper bound received
        stop: i64,
    },

    /// The answer is not a strict integer
    #[error("answer {0:?} is not an integer")]
    InvalidAnswer(String),

    /// The count does not fit in the integer range
    #[error("interval ({start}, {stop}) is too wide to count")]
    CountOverflow {
        /// Lower bound received
        start: i64,
        /// Upper bound received
        stop: i64,
    },
}

impl EvaluationError {
    /// Short, stable name of the failure category (used as a log field)
    pub fn category(&self) -> &'static str {
        match self {
            EvaluationError::MissingField(_) => "missing_field",
            EvaluationError::UnexpectedGlyph(_) => "unexpected_glyph",
            EvaluationError::InconsistentRepresentation { .. } => "inconsistent_representation",
            EvaluationError::InvalidOrdering { .. } => "invalid_ordering",
            EvaluationError::InvalidAnswer(_) => "invalid_answer",
            EvaluationError::CountOverflow { .. } => "count_overflow",
        }
    }
}
