//! Provisioning buckets and validated rule sets
//!
//! A provisioning policy maps days-past-due ranges to buckets, each with a
//! reserve percentage. Policies arrive as ordered rule lists; `RuleSet`
//! validates them once at construction so classification downstream never
//! has to re-check ranges.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Provisioning bucket in fixed severity order.
///
/// `Unclassified` is synthetic: aggregation routes loans no rule covers
/// into it so portfolio totals always reconcile. Rule sets may not name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Normal,
    Watch,
    Substandard,
    Doubtful,
    Loss,
    Unclassified,
}

impl Bucket {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Normal => "Normal",
            Bucket::Watch => "Watch",
            Bucket::Substandard => "Substandard",
            Bucket::Doubtful => "Doubtful",
            Bucket::Loss => "Loss",
            Bucket::Unclassified => "Unclassified",
        }
    }
}

/// One provisioning rule: an inclusive days-past-due range mapped to a
/// bucket and the reserve percentage applied to balances in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRule {
    pub bucket: Bucket,
    /// Lower inclusive bound in days past due
    pub dpd_min: i64,
    /// Upper inclusive bound in days past due
    pub dpd_max: i64,
    /// Reserve percentage, 0-100 scale
    pub provision_percent: f64,
}

impl ProvisioningRule {
    pub fn new(bucket: Bucket, dpd_min: i64, dpd_max: i64, provision_percent: f64) -> Self {
        ProvisioningRule {
            bucket,
            dpd_min,
            dpd_max,
            provision_percent,
        }
    }

    /// Whether `dpd` falls inside this rule's inclusive range.
    pub fn contains(&self, dpd: i64) -> bool {
        dpd >= self.dpd_min && dpd <= self.dpd_max
    }
}

/// A validated provisioning policy.
///
/// Construction rejects empty lists, inverted or negative ranges, and
/// overlapping ranges. Overlaps would make classification depend on list
/// order, so they are an error rather than a warning. Coverage gaps are
/// tolerated: the gap is logged once here, and loans falling into one are
/// reported under the unclassified bucket by the aggregator.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Rules in the order the policy author listed them; aggregation
    /// output follows this order.
    rules: Vec<ProvisioningRule>,
    /// Indices into `rules` sorted by `dpd_min`, for interval lookups.
    by_range: Vec<usize>,
}

impl RuleSet {
    /// Validate and index an ordered rule list.
    pub fn new(rules: Vec<ProvisioningRule>) -> Result<Self, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::EmptyRuleSet);
        }
        for rule in &rules {
            if rule.bucket == Bucket::Unclassified {
                return Err(EngineError::ReservedBucket);
            }
            if rule.dpd_min < 0 || rule.dpd_max < rule.dpd_min {
                return Err(EngineError::InvalidRuleRange {
                    bucket: rule.bucket.label().to_string(),
                    dpd_min: rule.dpd_min,
                    dpd_max: rule.dpd_max,
                });
            }
            if !rule.provision_percent.is_finite() || rule.provision_percent < 0.0 {
                return Err(EngineError::validation(
                    "provisionPercent",
                    format!(
                        "rule '{}': must be a non-negative number, got {}",
                        rule.bucket.label(),
                        rule.provision_percent
                    ),
                ));
            }
        }

        let mut by_range: Vec<usize> = (0..rules.len()).collect();
        by_range.sort_by_key(|&i| (rules[i].dpd_min, rules[i].dpd_max));
        for pair in by_range.windows(2) {
            let earlier = &rules[pair[0]];
            let later = &rules[pair[1]];
            if later.dpd_min <= earlier.dpd_max {
                return Err(EngineError::OverlappingRules {
                    first: earlier.bucket.label().to_string(),
                    second: later.bucket.label().to_string(),
                });
            }
            if later.dpd_min > earlier.dpd_max + 1 {
                warn!(
                    "provisioning policy leaves dpd {}..={} uncovered between '{}' and '{}'",
                    earlier.dpd_max + 1,
                    later.dpd_min - 1,
                    earlier.bucket.label(),
                    later.bucket.label()
                );
            }
        }

        Ok(RuleSet { rules, by_range })
    }

    /// Rules in author order.
    pub fn rules(&self) -> &[ProvisioningRule] {
        &self.rules
    }

    /// Index (author order) of the rule covering `dpd`, if any. Binary
    /// search over the sorted, pairwise-disjoint ranges.
    pub fn slot_for(&self, dpd: i64) -> Option<usize> {
        let pos = self
            .by_range
            .partition_point(|&i| self.rules[i].dpd_min <= dpd);
        if pos == 0 {
            return None;
        }
        let idx = self.by_range[pos - 1];
        self.rules[idx].contains(dpd).then_some(idx)
    }

    /// Rule covering `dpd`, if any.
    pub fn rule_for(&self, dpd: i64) -> Option<&ProvisioningRule> {
        self.slot_for(dpd).map(|i| &self.rules[i])
    }

    /// RBI-style originator policy: contiguous cover from current to
    /// deep-delinquent with graduated reserves.
    pub fn default_originator() -> Self {
        // Literal table is contiguous, sorted, and non-overlapping.
        let rules = vec![
            ProvisioningRule::new(Bucket::Normal, 0, 30, 1.0),
            ProvisioningRule::new(Bucket::Watch, 31, 60, 5.0),
            ProvisioningRule::new(Bucket::Substandard, 61, 90, 25.0),
            ProvisioningRule::new(Bucket::Doubtful, 91, 180, 50.0),
            ProvisioningRule::new(Bucket::Loss, 181, 9999, 100.0),
        ];
        let by_range = (0..rules.len()).collect();
        RuleSet { rules, by_range }
    }

    /// Lender overlay policy: same bucket boundaries through substandard,
    /// then steeper reserves and an earlier loss cliff.
    pub fn default_lender() -> Self {
        let rules = vec![
            ProvisioningRule::new(Bucket::Normal, 0, 30, 1.0),
            ProvisioningRule::new(Bucket::Watch, 31, 60, 10.0),
            ProvisioningRule::new(Bucket::Substandard, 61, 90, 50.0),
            ProvisioningRule::new(Bucket::Doubtful, 91, 120, 75.0),
            ProvisioningRule::new(Bucket::Loss, 121, 9999, 100.0),
        ];
        let by_range = (0..rules.len()).collect();
        RuleSet { rules, by_range }
    }
}
