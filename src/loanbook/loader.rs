//! Loan book ingestion
//!
//! Loan tapes arrive as CSV with camelCase headers matching the wire
//! names on `LoanLevelRow`. Every row passes boundary validation before
//! the book is handed to the engine, so downstream code never sees a
//! negative balance or delinquency.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::EngineError;

use super::data::{validate_loans, LoanLevelRow};

/// Load a loan book from a CSV file.
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanLevelRow>, EngineError> {
    let file = File::open(path.as_ref())?;
    let loans = load_loans_from_reader(file)?;
    debug!(
        "loaded {} loans from {}",
        loans.len(),
        path.as_ref().display()
    );
    Ok(loans)
}

/// Load a loan book from any reader producing CSV with a header row.
pub fn load_loans_from_reader<R: Read>(reader: R) -> Result<Vec<LoanLevelRow>, EngineError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut loans = Vec::new();
    for record in csv_reader.deserialize() {
        let loan: LoanLevelRow = record?;
        loans.push(loan);
    }
    validate_loans(&loans)?;
    Ok(loans)
}

/// Built-in demonstration tape: twelve loans spread across every
/// delinquency band, including one written-off account with a partial
/// recovery. Used by the review binary when no tape is supplied.
pub fn demo_loan_book() -> Vec<LoanLevelRow> {
    let rows: [(&str, f64, i64, f64, f64, bool, f64); 12] = [
        ("L-1001", 1_250_000.0, 0, 0.0, 14.5, false, 0.0),
        ("L-1002", 875_000.0, 0, 0.0, 15.0, false, 0.0),
        ("L-1003", 640_000.0, 12, 21_500.0, 16.25, false, 0.0),
        ("L-1004", 1_480_000.0, 25, 49_000.0, 13.75, false, 0.0),
        ("L-1005", 390_000.0, 38, 26_400.0, 18.0, false, 0.0),
        ("L-1006", 720_000.0, 52, 61_000.0, 17.5, false, 0.0),
        ("L-1007", 510_000.0, 68, 88_200.0, 19.0, false, 0.0),
        ("L-1008", 295_000.0, 84, 74_500.0, 18.5, false, 0.0),
        ("L-1009", 450_000.0, 102, 132_000.0, 20.0, false, 0.0),
        ("L-1010", 180_000.0, 160, 96_000.0, 21.5, false, 0.0),
        ("L-1011", 95_000.0, 210, 95_000.0, 22.0, false, 0.0),
        ("L-1012", 60_000.0, 365, 60_000.0, 24.0, true, 12_500.0),
    ];

    rows.iter()
        .map(
            |&(loan_id, balance, dpd, overdue, rate, written_off, recovery)| LoanLevelRow {
                loan_id: loan_id.to_string(),
                current_balance: balance,
                dpd_as_of_reporting_date: dpd,
                total_overdue_amount: overdue,
                interest_rate: rate,
                loan_written_off: written_off,
                recovery_after_writeoff: recovery,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_tape() {
        let csv_data = "\
loanId,currentBalance,dpdAsOfReportingDate,totalOverdueAmount,interestRate,loanWrittenOff,recoveryAfterWriteoff
L-1,100000,0,0,14.5,false,0
L-2,50000,95,32000,18.0,false,0
L-3,25000,400,25000,21.0,true,4000
";
        let loans = load_loans_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(loans.len(), 3);
        assert_eq!(loans[1].dpd_as_of_reporting_date, 95);
        assert!(loans[2].loan_written_off);
        assert_eq!(loans[2].recovery_after_writeoff, 4000.0);
    }

    #[test]
    fn test_missing_optional_columns_default() {
        // A minimal tape carries only the mandatory columns.
        let csv_data = "\
loanId,currentBalance,dpdAsOfReportingDate
L-1,100000,0
L-2,50000,95
";
        let loans = load_loans_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].total_overdue_amount, 0.0);
        assert_eq!(loans[0].interest_rate, 0.0);
        assert!(!loans[1].loan_written_off);
    }

    #[test]
    fn test_invalid_row_rejected() {
        let csv_data = "\
loanId,currentBalance,dpdAsOfReportingDate
L-1,100000,-5
";
        assert!(load_loans_from_reader(csv_data.as_bytes()).is_err());
    }

    #[test]
    fn test_demo_book_is_valid_and_spread() {
        let loans = demo_loan_book();
        assert_eq!(loans.len(), 12);
        assert!(validate_loans(&loans).is_ok());
        assert!(loans.iter().any(|loan| loan.dpd_as_of_reporting_date == 0));
        assert!(loans.iter().any(|loan| loan.dpd_as_of_reporting_date > 180));
        assert!(loans.iter().any(|loan| loan.loan_written_off));
    }
}
