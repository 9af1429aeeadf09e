//! Provisioning rule sets, loan classification, and bucket aggregation

mod aggregator;
mod classifier;
mod rules;

pub use aggregator::{
    aggregate, compare_policies, BucketSummary, PolicyComparison, PortfolioSummary,
};
pub use classifier::classify_loan;
pub use rules::{Bucket, ProvisioningRule, RuleSet};
