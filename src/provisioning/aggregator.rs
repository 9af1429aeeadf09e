//! Bucket aggregation over a classified loan book
//!
//! Rolls per-loan classification up into per-bucket positions and
//! portfolio totals. Loans no rule covers land in the synthetic
//! unclassified bucket rather than disappearing, so the bucket rows
//! always reconcile with the input population.

use rayon::prelude::*;
use serde::Serialize;

use crate::loanbook::LoanLevelRow;

use super::rules::{Bucket, RuleSet};

/// Aggregate position of one provisioning bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub bucket: Bucket,
    pub loan_count: usize,
    /// Sum of current balances classified into this bucket
    pub balance: f64,
    /// Reserve percentage copied from the matching rule; 0 for the
    /// unclassified bucket, which carries no rule
    pub provision_percent: f64,
    /// balance x percent / 100, rounded half-up to the whole currency unit
    pub provision_amount: f64,
    /// Share of total portfolio balance in percent; 0 for an empty book
    pub portfolio_pct: f64,
}

/// Whole-portfolio provisioning view: bucket rows in policy order with the
/// unclassified bucket last, plus reconciling totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub buckets: Vec<BucketSummary>,
    pub total_loans: usize,
    pub total_balance: f64,
    /// Sum of the rounded per-bucket provision amounts
    pub total_provision: f64,
}

/// The same loan population evaluated independently under two policies,
/// typically the originator's book view against the lender's overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyComparison {
    pub originator: PortfolioSummary,
    pub lender: PortfolioSummary,
}

/// Reserve amount for a bucket balance. Inputs are non-negative, so
/// `round()` is round-half-up to the whole currency unit.
fn provision_amount(balance: f64, percent: f64) -> f64 {
    (balance * percent / 100.0).round()
}

/// Share of total balance in percent. An empty portfolio yields 0 rather
/// than a division error.
fn portfolio_pct(balance: f64, total_balance: f64) -> f64 {
    if total_balance > 0.0 {
        balance / total_balance * 100.0
    } else {
        0.0
    }
}

/// Aggregate a loan book under one provisioning policy.
pub fn aggregate(loans: &[LoanLevelRow], policy: &RuleSet) -> PortfolioSummary {
    let rules = policy.rules();
    let unclassified_slot = rules.len();

    // Per-loan classification parallelizes cleanly; the balance fold stays
    // sequential in input order so float sums are reproducible.
    let slots: Vec<usize> = loans
        .par_iter()
        .map(|loan| {
            policy
                .slot_for(loan.dpd_as_of_reporting_date)
                .unwrap_or(unclassified_slot)
        })
        .collect();

    let mut counts = vec![0usize; rules.len() + 1];
    let mut balances = vec![0.0f64; rules.len() + 1];
    for (loan, &slot) in loans.iter().zip(&slots) {
        counts[slot] += 1;
        balances[slot] += loan.current_balance;
    }

    let total_balance: f64 = balances.iter().sum();
    let mut buckets = Vec::with_capacity(rules.len() + 1);
    let mut total_provision = 0.0;
    for (slot, rule) in rules.iter().enumerate() {
        let amount = provision_amount(balances[slot], rule.provision_percent);
        total_provision += amount;
        buckets.push(BucketSummary {
            bucket: rule.bucket,
            loan_count: counts[slot],
            balance: balances[slot],
            provision_percent: rule.provision_percent,
            provision_amount: amount,
            portfolio_pct: portfolio_pct(balances[slot], total_balance),
        });
    }
    buckets.push(BucketSummary {
        bucket: Bucket::Unclassified,
        loan_count: counts[unclassified_slot],
        balance: balances[unclassified_slot],
        provision_percent: 0.0,
        provision_amount: 0.0,
        portfolio_pct: portfolio_pct(balances[unclassified_slot], total_balance),
    });

    PortfolioSummary {
        buckets,
        total_loans: loans.len(),
        total_balance,
        total_provision,
    }
}

/// Evaluate one population under both policies.
pub fn compare_policies(
    loans: &[LoanLevelRow],
    originator: &RuleSet,
    lender: &RuleSet,
) -> PolicyComparison {
    PolicyComparison {
        originator: aggregate(loans, originator),
        lender: aggregate(loans, lender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioning::rules::ProvisioningRule;
    use approx::assert_relative_eq;

    fn loan(id: &str, balance: f64, dpd: i64) -> LoanLevelRow {
        LoanLevelRow {
            loan_id: id.to_string(),
            current_balance: balance,
            dpd_as_of_reporting_date: dpd,
            total_overdue_amount: 0.0,
            interest_rate: 0.0,
            loan_written_off: false,
            recovery_after_writeoff: 0.0,
        }
    }

    fn tight_policy() -> RuleSet {
        RuleSet::new(vec![
            ProvisioningRule::new(Bucket::Normal, 0, 0, 0.0),
            ProvisioningRule::new(Bucket::Watch, 1, 30, 1.0),
            ProvisioningRule::new(Bucket::Substandard, 31, 60, 25.0),
            ProvisioningRule::new(Bucket::Doubtful, 61, 90, 50.0),
            ProvisioningRule::new(Bucket::Loss, 91, 9999, 100.0),
        ])
        .unwrap()
    }

    fn bucket_row<'s>(summary: &'s PortfolioSummary, bucket: Bucket) -> &'s BucketSummary {
        summary
            .buckets
            .iter()
            .find(|row| row.bucket == bucket)
            .unwrap()
    }

    #[test]
    fn test_two_loan_book_aggregation() {
        let loans = vec![loan("L-1", 100_000.0, 0), loan("L-2", 50_000.0, 95)];
        let summary = aggregate(&loans, &tight_policy());

        let normal = bucket_row(&summary, Bucket::Normal);
        assert_eq!(normal.loan_count, 1);
        assert_relative_eq!(normal.balance, 100_000.0);
        assert_relative_eq!(normal.provision_amount, 0.0);

        let loss = bucket_row(&summary, Bucket::Loss);
        assert_eq!(loss.loan_count, 1);
        assert_relative_eq!(loss.balance, 50_000.0);
        assert_relative_eq!(loss.provision_amount, 50_000.0);

        assert_eq!(summary.total_loans, 2);
        assert_relative_eq!(summary.total_balance, 150_000.0);
        assert_relative_eq!(summary.total_provision, 50_000.0);
    }

    #[test]
    fn test_bucket_rows_follow_policy_order() {
        let summary = aggregate(&[], &tight_policy());
        let order: Vec<Bucket> = summary.buckets.iter().map(|row| row.bucket).collect();
        assert_eq!(
            order,
            vec![
                Bucket::Normal,
                Bucket::Watch,
                Bucket::Substandard,
                Bucket::Doubtful,
                Bucket::Loss,
                Bucket::Unclassified,
            ]
        );
    }

    #[test]
    fn test_counts_and_balances_reconcile() {
        let loans = vec![
            loan("L-1", 120_000.0, 0),
            loan("L-2", 80_000.0, 12),
            loan("L-3", 60_000.0, 45),
            loan("L-4", 40_000.0, 75),
            loan("L-5", 20_000.0, 200),
        ];
        let summary = aggregate(&loans, &tight_policy());

        let count_sum: usize = summary.buckets.iter().map(|row| row.loan_count).sum();
        let balance_sum: f64 = summary.buckets.iter().map(|row| row.balance).sum();
        assert_eq!(count_sum, loans.len());
        assert_relative_eq!(balance_sum, summary.total_balance);

        let pct_sum: f64 = summary.buckets.iter().map(|row| row.portfolio_pct).sum();
        assert_relative_eq!(pct_sum, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gap_loans_land_in_unclassified() {
        let policy = RuleSet::new(vec![
            ProvisioningRule::new(Bucket::Normal, 0, 30, 1.0),
            ProvisioningRule::new(Bucket::Doubtful, 91, 9999, 50.0),
        ])
        .unwrap();
        let loans = vec![loan("L-1", 100_000.0, 10), loan("L-2", 70_000.0, 45)];
        let summary = aggregate(&loans, &policy);

        let orphan = bucket_row(&summary, Bucket::Unclassified);
        assert_eq!(orphan.loan_count, 1);
        assert_relative_eq!(orphan.balance, 70_000.0);
        assert_relative_eq!(orphan.provision_amount, 0.0);

        // Reconciliation still holds with the gap population included.
        let count_sum: usize = summary.buckets.iter().map(|row| row.loan_count).sum();
        assert_eq!(count_sum, 2);
        assert_relative_eq!(summary.total_balance, 170_000.0);
    }

    #[test]
    fn test_empty_book() {
        let summary = aggregate(&[], &tight_policy());
        assert_eq!(summary.total_loans, 0);
        assert_relative_eq!(summary.total_balance, 0.0);
        assert_relative_eq!(summary.total_provision, 0.0);
        for row in &summary.buckets {
            assert_relative_eq!(row.portfolio_pct, 0.0);
        }
    }

    #[test]
    fn test_provision_rounds_half_up() {
        // 50,000 x 25% = 12,500 exactly; 333 x 25% = 83.25 rounds down;
        // 50 x 25% = 12.5 rounds up.
        let policy = RuleSet::new(vec![ProvisioningRule::new(Bucket::Substandard, 0, 99, 25.0)])
            .unwrap();

        let summary = aggregate(&[loan("L-1", 333.0, 10)], &policy);
        assert_relative_eq!(bucket_row(&summary, Bucket::Substandard).provision_amount, 83.0);

        let summary = aggregate(&[loan("L-1", 50.0, 10)], &policy);
        assert_relative_eq!(bucket_row(&summary, Bucket::Substandard).provision_amount, 13.0);
    }

    #[test]
    fn test_policy_comparison_diverges() {
        let loans = vec![loan("L-1", 100_000.0, 45), loan("L-2", 100_000.0, 150)];
        let comparison = compare_policies(
            &loans,
            &RuleSet::default_originator(),
            &RuleSet::default_lender(),
        );

        // 45 dpd: watch under both views, but 5% vs 10% reserve.
        assert_relative_eq!(
            bucket_row(&comparison.originator, Bucket::Watch).provision_amount,
            5_000.0
        );
        assert_relative_eq!(
            bucket_row(&comparison.lender, Bucket::Watch).provision_amount,
            10_000.0
        );

        // 150 dpd: doubtful at 50% for the originator, loss at 100% for
        // the lender.
        assert_relative_eq!(
            bucket_row(&comparison.originator, Bucket::Doubtful).provision_amount,
            50_000.0
        );
        assert_relative_eq!(
            bucket_row(&comparison.lender, Bucket::Loss).provision_amount,
            100_000.0
        );
    }
}
