//! Actual/projection series stitching
//!
//! Charting a metric needs its history and its forward projection as one
//! sequence, with the two segments visually continuous. The merge keeps
//! the roles in separate optional slots and duplicates the final observed
//! value into the projected slot at the join, so the projected line
//! starts exactly where the actual line ends.

use serde::{Deserialize, Serialize};

/// One observed or projected point of a metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// ISO `YYYY-MM-DD` observation date
    pub date: String,
    pub value: f64,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        TrendPoint {
            date: date.into(),
            value,
        }
    }
}

/// A metric's history and forward projection, with the covenant threshold
/// carried alongside for the renderer's reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub actuals: Vec<TrendPoint>,
    pub projections: Vec<TrendPoint>,
    pub threshold: f64,
}

impl TrendSeries {
    /// Chart-ready merged sequence.
    pub fn merged(&self) -> Vec<ChartPoint> {
        merge_series(&self.actuals, &self.projections)
    }
}

/// One entry of the merged sequence. A `None` slot means "no value in
/// this role here"; renderers must not coerce it to zero or the chart
/// grows a phantom drop to the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Year-month display period (`YYYY-MM`)
    pub period: String,
    pub actual: Option<f64>,
    pub projected: Option<f64>,
}

/// Year-month period key of an ISO date. Dates shorter than seven
/// characters pass through unchanged.
fn period_key(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

/// Merge an actual series with its projection into one ordered sequence.
///
/// Input order is preserved and entries are never coalesced by period:
/// two readings in the same month stay two entries. When projections
/// exist, the last actual entry also carries the projected role with the
/// same value, forming the join point. With no projections the actuals
/// pass through untouched; with no actuals the projection stands alone
/// and no join is fabricated.
pub fn merge_series(actuals: &[TrendPoint], projections: &[TrendPoint]) -> Vec<ChartPoint> {
    let mut merged = Vec::with_capacity(actuals.len() + projections.len());

    for (i, point) in actuals.iter().enumerate() {
        let at_join = i + 1 == actuals.len() && !projections.is_empty();
        merged.push(ChartPoint {
            period: period_key(&point.date).to_string(),
            actual: Some(point.value),
            projected: at_join.then_some(point.value),
        });
    }
    for point in projections {
        merged.push(ChartPoint {
            period: period_key(&point.date).to_string(),
            actual: None,
            projected: Some(point.value),
        });
    }

    merged
}
