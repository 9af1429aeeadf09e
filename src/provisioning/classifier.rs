//! Loan classification against provisioning rules

use crate::loanbook::LoanLevelRow;

use super::rules::{ProvisioningRule, RuleSet};

/// First rule in list order whose inclusive dpd range contains the loan's
/// delinquency days, or `None` when no rule covers it.
///
/// List order matters for raw, unvalidated rule lists with overlapping
/// ranges: the earlier rule wins. A `RuleSet` rejects overlaps at
/// construction, which makes its lookups order-independent; this scan
/// exists for callers that work with rule lists directly.
pub fn classify_loan<'r>(
    loan: &LoanLevelRow,
    rules: &'r [ProvisioningRule],
) -> Option<&'r ProvisioningRule> {
    let dpd = loan.dpd_as_of_reporting_date;
    rules.iter().find(|rule| rule.contains(dpd))
}

impl RuleSet {
    /// Classify one loan under this policy.
    pub fn classify(&self, loan: &LoanLevelRow) -> Option<&ProvisioningRule> {
        self.rule_for(loan.dpd_as_of_reporting_date)
    }
}
