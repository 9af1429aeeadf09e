//! Loan-level records, tape ingestion, and portfolio analytics

mod analytics;
mod data;
pub mod loader;

pub use analytics::{
    cure_rate, dpd_distribution, estimate_loss, expected_credit_loss, financial_summary, CureRate,
    DpdDistributionRow, EclEstimate, FinancialSummary, LossEstimate,
};
pub use data::{validate_loans, DpdBucket, LoanLevelRow, DPD_BUCKETS};
pub use loader::{demo_loan_book, load_loans, load_loans_from_reader};
