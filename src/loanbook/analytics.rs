//! Portfolio analytics over the loan book
//!
//! Deterministic summaries derived purely from the tape: delinquency
//! distribution, expected-loss and ECL estimates, cure rate, and the
//! financial summary. Reserve requirements are not computed here; those
//! come from the provisioning aggregator under a specific policy.

use serde::Serialize;

use super::data::{DpdBucket, LoanLevelRow, DPD_BUCKETS};

// ============================================================================
// Loss Assumptions
// ============================================================================
// Expected-loss rate per display bucket, calibrated on secured retail
// NBFI books. Deep delinquency is written down in full.

const LOSS_RATES: [f64; 6] = [0.0, 0.01, 0.05, 0.20, 0.50, 1.0];

/// Loss-given-default applied in the 12-month ECL view. Early-stage
/// delinquency assumes better collateral recovery than late-stage.
const LGD_EARLY: f64 = 0.45;
const LGD_LATE: f64 = 0.65;

fn loss_rate(bucket: DpdBucket) -> f64 {
    LOSS_RATES[bucket.index()]
}

fn loss_given_default(bucket: DpdBucket) -> f64 {
    match bucket {
        DpdBucket::Current | DpdBucket::From1To30 => LGD_EARLY,
        _ => LGD_LATE,
    }
}

/// Per display-bucket position of the loan book.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DpdDistributionRow {
    pub bucket: DpdBucket,
    pub loan_count: usize,
    pub balance: f64,
    /// Share of total book balance in percent; 0 for an empty book
    pub portfolio_pct: f64,
}

/// Distribution of the book across all six display buckets, in ascending
/// delinquency order. Empty buckets are reported with zeros rather than
/// omitted.
pub fn dpd_distribution(loans: &[LoanLevelRow]) -> Vec<DpdDistributionRow> {
    let mut counts = [0usize; 6];
    let mut balances = [0.0f64; 6];
    for loan in loans {
        let slot = DpdBucket::for_dpd(loan.dpd_as_of_reporting_date).index();
        counts[slot] += 1;
        balances[slot] += loan.current_balance;
    }
    let total_balance: f64 = balances.iter().sum();

    DPD_BUCKETS
        .iter()
        .map(|&bucket| {
            let slot = bucket.index();
            DpdDistributionRow {
                bucket,
                loan_count: counts[slot],
                balance: balances[slot],
                portfolio_pct: if total_balance > 0.0 {
                    balances[slot] / total_balance * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Point-in-time expected loss under the bucket loss-rate assumptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LossEstimate {
    pub total_loss: f64,
    /// Expected loss as a percentage of book balance
    pub loss_rate_pct: f64,
}

pub fn estimate_loss(loans: &[LoanLevelRow]) -> LossEstimate {
    let mut total_loss = 0.0;
    let mut total_balance = 0.0;
    for loan in loans {
        let bucket = DpdBucket::for_dpd(loan.dpd_as_of_reporting_date);
        total_loss += loan.current_balance * loss_rate(bucket);
        total_balance += loan.current_balance;
    }
    LossEstimate {
        total_loss,
        loss_rate_pct: if total_balance > 0.0 {
            total_loss / total_balance * 100.0
        } else {
            0.0
        },
    }
}

/// Expected credit loss under the two-stage view: a 12-month estimate
/// with bucket-dependent LGD, and a lifetime estimate at the full bucket
/// loss rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EclEstimate {
    pub ecl_12m: f64,
    pub ecl_lifetime: f64,
    /// 12-month ECL as a percentage of book balance
    pub coverage_12m_pct: f64,
}

pub fn expected_credit_loss(loans: &[LoanLevelRow]) -> EclEstimate {
    let mut ecl_12m = 0.0;
    let mut ecl_lifetime = 0.0;
    let mut total_balance = 0.0;
    for loan in loans {
        let bucket = DpdBucket::for_dpd(loan.dpd_as_of_reporting_date);
        let pd_12m = loss_rate(bucket).min(1.0);
        ecl_12m += loan.current_balance * pd_12m * loss_given_default(bucket);
        ecl_lifetime += loan.current_balance * loss_rate(bucket);
        total_balance += loan.current_balance;
    }
    EclEstimate {
        ecl_12m,
        ecl_lifetime,
        coverage_12m_pct: if total_balance > 0.0 {
            ecl_12m / total_balance * 100.0
        } else {
            0.0
        },
    }
}

/// Share of the delinquent balance still early enough to cure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CureRate {
    /// Early-delinquent balance as a percentage of all delinquent balance
    pub cure_rate_pct: f64,
    /// Balance in the 1-30 band
    pub cured_balance: f64,
    /// Balance with any positive delinquency
    pub delinquent_balance: f64,
}

pub fn cure_rate(loans: &[LoanLevelRow]) -> CureRate {
    let mut cured_balance = 0.0;
    let mut delinquent_balance = 0.0;
    for loan in loans {
        let dpd = loan.dpd_as_of_reporting_date;
        if dpd > 0 {
            delinquent_balance += loan.current_balance;
            if dpd <= 30 {
                cured_balance += loan.current_balance;
            }
        }
    }
    CureRate {
        cure_rate_pct: if delinquent_balance > 0.0 {
            cured_balance / delinquent_balance * 100.0
        } else {
            0.0
        },
        cured_balance,
        delinquent_balance,
    }
}

/// Book-level financial summary straight off the tape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_balance: f64,
    pub total_overdue: f64,
    /// Balance written off
    pub gross_loss: f64,
    /// Cash recovered after write-off
    pub recoveries: f64,
    /// Gross loss net of recoveries
    pub net_loss: f64,
    pub write_off_count: usize,
    /// Written-off loans as a percentage of loan count
    pub write_off_rate_pct: f64,
    /// Recoveries as a percentage of gross loss
    pub recovery_rate_pct: f64,
    /// Overdue amount as a percentage of book balance
    pub overdue_ratio_pct: f64,
    /// Balance-weighted average contractual rate
    pub avg_interest_rate: f64,
}

pub fn financial_summary(loans: &[LoanLevelRow]) -> FinancialSummary {
    let mut total_balance = 0.0;
    let mut total_overdue = 0.0;
    let mut gross_loss = 0.0;
    let mut recoveries = 0.0;
    let mut weighted_rate = 0.0;
    let mut write_off_count = 0usize;
    for loan in loans {
        total_balance += loan.current_balance;
        total_overdue += loan.total_overdue_amount;
        recoveries += loan.recovery_after_writeoff;
        weighted_rate += loan.interest_rate * loan.current_balance;
        if loan.loan_written_off {
            gross_loss += loan.current_balance;
            write_off_count += 1;
        }
    }

    FinancialSummary {
        total_balance,
        total_overdue,
        gross_loss,
        recoveries,
        net_loss: gross_loss - recoveries,
        write_off_count,
        write_off_rate_pct: if loans.is_empty() {
            0.0
        } else {
            write_off_count as f64 / loans.len() as f64 * 100.0
        },
        recovery_rate_pct: if gross_loss > 0.0 {
            recoveries / gross_loss * 100.0
        } else {
            0.0
        },
        overdue_ratio_pct: if total_balance > 0.0 {
            total_overdue / total_balance * 100.0
        } else {
            0.0
        },
        avg_interest_rate: if total_balance > 0.0 {
            weighted_rate / total_balance
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loan(balance: f64, dpd: i64) -> LoanLevelRow {
        LoanLevelRow {
            loan_id: format!("L-{}", dpd),
            current_balance: balance,
            dpd_as_of_reporting_date: dpd,
            total_overdue_amount: 0.0,
            interest_rate: 0.0,
            loan_written_off: false,
            recovery_after_writeoff: 0.0,
        }
    }

    fn spread_book() -> Vec<LoanLevelRow> {
        vec![
            loan(100_000.0, 0),
            loan(50_000.0, 20),
            loan(40_000.0, 45),
            loan(10_000.0, 200),
        ]
    }

    #[test]
    fn test_distribution_covers_all_buckets() {
        let rows = dpd_distribution(&spread_book());
        assert_eq!(rows.len(), 6);

        assert_eq!(rows[0].bucket, DpdBucket::Current);
        assert_relative_eq!(rows[0].balance, 100_000.0);
        assert_relative_eq!(rows[0].portfolio_pct, 50.0);

        // Empty bands stay present with zeros.
        assert_eq!(rows[3].loan_count, 0);
        assert_relative_eq!(rows[3].balance, 0.0);

        assert_relative_eq!(rows[5].portfolio_pct, 5.0, epsilon = 1e-9);

        let pct_sum: f64 = rows.iter().map(|row| row.portfolio_pct).sum();
        assert_relative_eq!(pct_sum, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_loss_estimate() {
        // 0 + 50,000x1% + 40,000x5% + 10,000x100% = 12,500 on 200,000.
        let estimate = estimate_loss(&spread_book());
        assert_relative_eq!(estimate.total_loss, 12_500.0, epsilon = 1e-9);
        assert_relative_eq!(estimate.loss_rate_pct, 6.25, epsilon = 1e-9);
    }

    #[test]
    fn test_expected_credit_loss() {
        // 12m: 50,000x0.01x0.45 + 40,000x0.05x0.65 + 10,000x1.0x0.65
        //    = 225 + 1,300 + 6,500 = 8,025.
        let ecl = expected_credit_loss(&spread_book());
        assert_relative_eq!(ecl.ecl_12m, 8_025.0, epsilon = 1e-9);
        assert_relative_eq!(ecl.ecl_lifetime, 12_500.0, epsilon = 1e-9);
        assert_relative_eq!(ecl.coverage_12m_pct, 4.0125, epsilon = 1e-9);
    }

    #[test]
    fn test_cure_rate() {
        let cure = cure_rate(&spread_book());
        assert_relative_eq!(cure.delinquent_balance, 100_000.0);
        assert_relative_eq!(cure.cured_balance, 50_000.0);
        assert_relative_eq!(cure.cure_rate_pct, 50.0);
    }

    #[test]
    fn test_cure_rate_with_no_delinquency() {
        let cure = cure_rate(&[loan(100_000.0, 0)]);
        assert_relative_eq!(cure.cure_rate_pct, 0.0);
    }

    #[test]
    fn test_financial_summary() {
        let mut performing = loan(100_000.0, 0);
        performing.interest_rate = 12.0;
        performing.total_overdue_amount = 5_000.0;

        let mut written_off = loan(50_000.0, 400);
        written_off.interest_rate = 18.0;
        written_off.total_overdue_amount = 20_000.0;
        written_off.loan_written_off = true;
        written_off.recovery_after_writeoff = 8_000.0;

        let summary = financial_summary(&[performing, written_off]);
        assert_relative_eq!(summary.total_balance, 150_000.0);
        assert_relative_eq!(summary.total_overdue, 25_000.0);
        assert_relative_eq!(summary.gross_loss, 50_000.0);
        assert_relative_eq!(summary.recoveries, 8_000.0);
        assert_relative_eq!(summary.net_loss, 42_000.0);
        assert_eq!(summary.write_off_count, 1);
        assert_relative_eq!(summary.write_off_rate_pct, 50.0);
        assert_relative_eq!(summary.recovery_rate_pct, 16.0, epsilon = 1e-9);
        assert_relative_eq!(summary.overdue_ratio_pct, 25_000.0 / 150_000.0 * 100.0);
        assert_relative_eq!(summary.avg_interest_rate, 14.0);
    }

    #[test]
    fn test_empty_book_yields_zeros() {
        let estimate = estimate_loss(&[]);
        assert_relative_eq!(estimate.loss_rate_pct, 0.0);

        let summary = financial_summary(&[]);
        assert_relative_eq!(summary.write_off_rate_pct, 0.0);
        assert_relative_eq!(summary.avg_interest_rate, 0.0);

        let ecl = expected_credit_loss(&[]);
        assert_relative_eq!(ecl.coverage_12m_pct, 0.0);
    }
}
