//! What-if scenario impact
//!
//! Projects two covenant metrics, PAR-30 and CRAR, off a hypothetical
//! collection-efficiency level through fixed linear sensitivities. The
//! projection is pure arithmetic over its inputs, so a slider sweeping
//! the efficiency control re-runs it cheaply and reproducibly.

use serde::{Deserialize, Serialize};

use crate::covenant::Operator;

/// A metric limit with covenant operator semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub operator: Operator,
    pub value: f64,
}

impl Limit {
    /// Whether a projected value satisfies the limit.
    pub fn admits(&self, actual: f64) -> bool {
        self.operator.holds(actual, self.value)
    }
}

/// Compliance label for a projected value. Projections carry no upstream
/// status to pass through, so the label is derived from the limit, and
/// there is no watch stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Compliant,
    Breached,
}

impl ScenarioStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioStatus::Compliant => "Compliant",
            ScenarioStatus::Breached => "Breached",
        }
    }
}

/// Baseline levels and sensitivities for the what-if projection.
///
/// PAR-30 moves against collection efficiency at twice the rate and is
/// floored at zero; CRAR moves with it at half the rate, unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAssumptions {
    /// Collection efficiency the baselines were observed at
    pub base_efficiency: f64,
    pub base_par30: f64,
    /// PAR-30 points per efficiency point, applied against the delta
    pub par30_sensitivity: f64,
    pub par30_limit: Limit,
    pub base_crar: f64,
    /// CRAR points per efficiency point, applied with the delta
    pub crar_sensitivity: f64,
    pub crar_limit: Limit,
}

impl Default for ScenarioAssumptions {
    fn default() -> Self {
        ScenarioAssumptions {
            base_efficiency: 98.2,
            base_par30: 5.2,
            par30_sensitivity: 2.0,
            par30_limit: Limit {
                operator: Operator::LessOrEqual,
                value: 5.0,
            },
            base_crar: 14.7,
            crar_sensitivity: 0.5,
            crar_limit: Limit {
                operator: Operator::GreaterOrEqual,
                value: 15.0,
            },
        }
    }
}

/// Projected metric levels and their compliance labels for one control
/// value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioImpact {
    /// The efficiency level that was tested
    pub efficiency: f64,
    pub projected_par30: f64,
    pub projected_crar: f64,
    pub par30_status: ScenarioStatus,
    pub crar_status: ScenarioStatus,
}

impl ScenarioAssumptions {
    /// Project both metrics at a hypothetical collection efficiency.
    ///
    /// Status labels compare the raw projected values against the limits;
    /// any rounding for display happens after, in the caller.
    pub fn project(&self, efficiency: f64) -> ScenarioImpact {
        let delta = efficiency - self.base_efficiency;
        let projected_par30 = (self.base_par30 - delta * self.par30_sensitivity).max(0.0);
        let projected_crar = self.base_crar + delta * self.crar_sensitivity;

        ScenarioImpact {
            efficiency,
            projected_par30,
            projected_crar,
            par30_status: status_for(&self.par30_limit, projected_par30),
            crar_status: status_for(&self.crar_limit, projected_crar),
        }
    }
}

fn status_for(limit: &Limit, actual: f64) -> ScenarioStatus {
    if limit.admits(actual) {
        ScenarioStatus::Compliant
    } else {
        ScenarioStatus::Breached
    }
}
