//! Covenant compliance assessment
//!
//! Combines a covenant definition with its indexed readings into one
//! display-ready assessment: the upstream status passed through, the
//! trend between the two most recent observations, and the signed
//! headroom between the actual value and the threshold.

use serde::{Deserialize, Serialize};

use super::data::{ComplianceStatus, CovenantDefinition};
use super::index::ReadingIndex;

/// Direction of a metric between its two most recent distinct dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    /// Equal values, or fewer than two observations
    Stable,
}

/// Assessment of one covenant against its reported readings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CovenantAssessment {
    pub covenant_id: String,
    pub metric: String,
    /// Status carried over from the latest reading. `None` means no
    /// reading exists, which is "no data", not compliant and not breached.
    pub status: Option<ComplianceStatus>,
    /// Date of the latest reading backing this assessment
    pub as_of: Option<String>,
    pub trend: Trend,
    /// Whether the trend moves the metric away from its breach side
    pub trend_favourable: bool,
    /// Latest reported value
    pub actual: Option<f64>,
    /// Signed distance to the threshold; positive means inside terms
    pub headroom: Option<f64>,
    /// One-decimal display label with an explicit sign
    pub headroom_label: Option<String>,
}

/// Signed margin between an actual value and the covenant threshold.
///
/// Floor covenants (`>=`, `>`) measure `actual - threshold`; ceiling
/// covenants (`<=`, `<`) measure `threshold - actual`. Either way a
/// positive headroom means the covenant holds with room to spare, and the
/// magnitude is the distance to the boundary in metric units.
pub fn headroom(definition: &CovenantDefinition, actual: Option<f64>) -> Option<f64> {
    let actual = actual?;
    let margin = if definition.operator.is_lower_bound() {
        actual - definition.threshold
    } else {
        definition.threshold - actual
    };
    Some(margin)
}

/// One-decimal headroom label with an explicit sign: "+2.0", "-0.3".
/// Zero renders as "+0.0", on the boundary but not past it.
pub fn headroom_label(headroom: f64) -> String {
    if headroom >= 0.0 {
        format!("+{:.1}", headroom)
    } else {
        format!("{:.1}", headroom)
    }
}

/// Assess a single covenant against the reading index.
pub fn assess(definition: &CovenantDefinition, index: &ReadingIndex) -> CovenantAssessment {
    let latest = index.latest(&definition.id);
    let previous = index.previous(&definition.id);

    let trend = match (latest, previous) {
        (Some(last), Some(prior)) if last.value > prior.value => Trend::Up,
        (Some(last), Some(prior)) if last.value < prior.value => Trend::Down,
        _ => Trend::Stable,
    };
    let trend_favourable = if definition.operator.is_lower_bound() {
        trend == Trend::Up
    } else {
        trend == Trend::Down
    };

    let actual = latest.map(|reading| reading.value);
    let margin = headroom(definition, actual);

    CovenantAssessment {
        covenant_id: definition.id.clone(),
        metric: definition.metric.clone(),
        status: latest.map(|reading| reading.status),
        as_of: latest.map(|reading| reading.date.clone()),
        trend,
        trend_favourable,
        actual,
        headroom: margin,
        headroom_label: margin.map(headroom_label),
    }
}

/// Assess every covenant in the package against the same index, in
/// definition order.
pub fn assess_all(
    definitions: &[CovenantDefinition],
    index: &ReadingIndex,
) -> Vec<CovenantAssessment> {
    definitions
        .iter()
        .map(|definition| assess(definition, index))
        .collect()
}

/// Assessments currently in breach, in package order.
pub fn breaches(assessments: &[CovenantAssessment]) -> Vec<&CovenantAssessment> {
    assessments
        .iter()
        .filter(|assessment| assessment.status == Some(ComplianceStatus::Breached))
        .collect()
}
