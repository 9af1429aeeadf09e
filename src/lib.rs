//! Covenant Engine - deterministic compliance and provisioning analytics
//!
//! This library provides:
//! - Covenant compliance assessment: status pass-through, trends, headroom
//! - Loan-book classification into provisioning buckets under validated
//!   rule sets, with dual-policy aggregation
//! - Portfolio analytics: delinquency distribution, expected loss, ECL,
//!   cure rate, financial summary
//! - Forward views: actual/projection series merging, what-if scenario
//!   impact, and roll-rate projections
//!
//! Apart from the tape loader, everything here is a pure function over
//! caller-supplied data. The engine reads no clock and keeps no hidden
//! state; identical input always produces identical output.

pub mod alerts;
pub mod covenant;
pub mod error;
pub mod loanbook;
pub mod projection;
pub mod provisioning;

// Re-export commonly used types
pub use covenant::{
    CovenantAssessment, CovenantDefinition, CovenantReading, Operator, ReadingIndex,
};
pub use error::EngineError;
pub use loanbook::LoanLevelRow;
pub use provisioning::{Bucket, PortfolioSummary, ProvisioningRule, RuleSet};
