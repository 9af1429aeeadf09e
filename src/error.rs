//! Engine error types
//!
//! Every computation inside the engine is total over well-typed input, so
//! errors only arise at the boundary: input validation, rule-set
//! construction, and fixture I/O.

use thiserror::Error;

/// Errors surfaced by the covenant/provisioning engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed input rejected before evaluation (negative balance,
    /// negative delinquency days, non-ISO date, non-finite number).
    #[error("invalid {field}: {message}")]
    Validation {
        /// Wire-format name of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A provisioning policy must contain at least one rule.
    #[error("rule set is empty")]
    EmptyRuleSet,

    /// A rule's delinquency range is negative or inverted.
    #[error("rule '{bucket}' has invalid dpd range {dpd_min}..={dpd_max}")]
    InvalidRuleRange {
        /// Bucket label of the offending rule
        bucket: String,
        /// Lower inclusive bound
        dpd_min: i64,
        /// Upper inclusive bound
        dpd_max: i64,
    },

    /// Two rules claim overlapping delinquency ranges; classification
    /// would depend on list order, so construction refuses the set.
    #[error("rules '{first}' and '{second}' have overlapping dpd ranges")]
    OverlappingRules {
        /// Bucket label of the earlier-starting rule
        first: String,
        /// Bucket label of the rule that overlaps it
        second: String,
    },

    /// The unclassified bucket is synthesized during aggregation and may
    /// not be named by a rule.
    #[error("bucket 'unclassified' is reserved for aggregation output")]
    ReservedBucket,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Boundary validation failure for a named wire field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = EngineError::validation("currentBalance", "must be non-negative");
        assert_eq!(
            format!("{}", err),
            "invalid currentBalance: must be non-negative"
        );
    }

    #[test]
    fn test_overlap_display() {
        let err = EngineError::OverlappingRules {
            first: "Normal".to_string(),
            second: "Watch".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "rules 'Normal' and 'Watch' have overlapping dpd ranges"
        );
    }
}
