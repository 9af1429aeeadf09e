//! Loan-level records and display delinquency buckets

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One loan as reported on the tape, a snapshot as of the reporting date.
///
/// The engine reads these records and never mutates them. Only the
/// identifier, balance, and delinquency days are mandatory on the wire;
/// the remaining columns default to zero/false when a tape omits them,
/// which limits the analytics but never the classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanLevelRow {
    pub loan_id: String,
    /// Outstanding principal balance in currency units
    pub current_balance: f64,
    /// Days past due as of the reporting date; 0 means current
    pub dpd_as_of_reporting_date: i64,
    /// Overdue installments outstanding
    #[serde(default)]
    pub total_overdue_amount: f64,
    /// Contractual annual rate, percent
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub loan_written_off: bool,
    /// Cash recovered post write-off
    #[serde(default)]
    pub recovery_after_writeoff: f64,
}

impl LoanLevelRow {
    /// Boundary validation. Negative balances and negative delinquency
    /// days are reporting errors; rejecting them here keeps every
    /// downstream aggregate well-defined.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.loan_id.is_empty() {
            return Err(EngineError::validation("loanId", "must not be empty"));
        }
        if !self.current_balance.is_finite() || self.current_balance < 0.0 {
            return Err(EngineError::validation(
                "currentBalance",
                format!(
                    "loan '{}': must be a non-negative number, got {}",
                    self.loan_id, self.current_balance
                ),
            ));
        }
        if self.dpd_as_of_reporting_date < 0 {
            return Err(EngineError::validation(
                "dpdAsOfReportingDate",
                format!(
                    "loan '{}': must be non-negative, got {}",
                    self.loan_id, self.dpd_as_of_reporting_date
                ),
            ));
        }
        if !self.total_overdue_amount.is_finite() || self.total_overdue_amount < 0.0 {
            return Err(EngineError::validation(
                "totalOverdueAmount",
                format!("loan '{}': must be a non-negative number", self.loan_id),
            ));
        }
        Ok(())
    }
}

/// Validate a whole loan book before it enters the engine. First failure
/// wins.
pub fn validate_loans(loans: &[LoanLevelRow]) -> Result<(), EngineError> {
    for loan in loans {
        loan.validate()?;
    }
    Ok(())
}

/// Display delinquency bucket at reporting granularity.
///
/// Distinct from the provisioning buckets a policy defines: these bands
/// are fixed, exhaustive over non-negative dpd, and exist for portfolio
/// reporting and roll-rate projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpdBucket {
    Current,
    #[serde(rename = "1-30")]
    From1To30,
    #[serde(rename = "31-60")]
    From31To60,
    #[serde(rename = "61-90")]
    From61To90,
    #[serde(rename = "91-180")]
    From91To180,
    #[serde(rename = "180+")]
    Over180,
}

/// All display buckets in ascending delinquency order.
pub const DPD_BUCKETS: [DpdBucket; 6] = [
    DpdBucket::Current,
    DpdBucket::From1To30,
    DpdBucket::From31To60,
    DpdBucket::From61To90,
    DpdBucket::From91To180,
    DpdBucket::Over180,
];

impl DpdBucket {
    /// Band containing `dpd`. Non-positive values count as current.
    pub fn for_dpd(dpd: i64) -> Self {
        if dpd <= 0 {
            DpdBucket::Current
        } else if dpd <= 30 {
            DpdBucket::From1To30
        } else if dpd <= 60 {
            DpdBucket::From31To60
        } else if dpd <= 90 {
            DpdBucket::From61To90
        } else if dpd <= 180 {
            DpdBucket::From91To180
        } else {
            DpdBucket::Over180
        }
    }

    /// Position in `DPD_BUCKETS`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            DpdBucket::Current => "Current",
            DpdBucket::From1To30 => "1-30",
            DpdBucket::From31To60 => "31-60",
            DpdBucket::From61To90 => "61-90",
            DpdBucket::From91To180 => "91-180",
            DpdBucket::Over180 => "180+",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_valid_loan_passes() {
        assert!(loan("L-1", 100_000.0, 0).validate().is_ok());
    }

    #[test]
    fn test_negative_balance_rejected() {
        assert!(loan("L-1", -1.0, 0).validate().is_err());
    }

    #[test]
    fn test_negative_dpd_rejected() {
        assert!(loan("L-1", 100.0, -3).validate().is_err());
    }

    #[test]
    fn test_nan_balance_rejected() {
        assert!(loan("L-1", f64::NAN, 0).validate().is_err());
    }

    #[test]
    fn test_validate_loans_reports_first_failure() {
        let loans = vec![loan("L-1", 100.0, 0), loan("L-2", 50.0, -1)];
        let err = validate_loans(&loans).unwrap_err();
        assert!(format!("{}", err).contains("L-2"));
    }

    #[test]
    fn test_dpd_bucket_boundaries() {
        assert_eq!(DpdBucket::for_dpd(0), DpdBucket::Current);
        assert_eq!(DpdBucket::for_dpd(1), DpdBucket::From1To30);
        assert_eq!(DpdBucket::for_dpd(30), DpdBucket::From1To30);
        assert_eq!(DpdBucket::for_dpd(31), DpdBucket::From31To60);
        assert_eq!(DpdBucket::for_dpd(90), DpdBucket::From61To90);
        assert_eq!(DpdBucket::for_dpd(91), DpdBucket::From91To180);
        assert_eq!(DpdBucket::for_dpd(180), DpdBucket::From91To180);
        assert_eq!(DpdBucket::for_dpd(181), DpdBucket::Over180);
        assert_eq!(DpdBucket::for_dpd(400), DpdBucket::Over180);
    }

    #[test]
    fn test_bucket_index_matches_order() {
        for (i, bucket) in DPD_BUCKETS.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
    }
}
