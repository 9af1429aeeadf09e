//! Forward-looking views: trend merging, scenario impact, roll-rates

mod merge;
mod rollrate;
mod scenario;

pub use merge::{merge_series, ChartPoint, TrendPoint, TrendSeries};
pub use rollrate::{roll_rate_projection, RollRatePeriod, RollRateScenario};
pub use scenario::{Limit, ScenarioAssumptions, ScenarioImpact, ScenarioStatus};

// ============================================================================
// Scenario Control Bounds
// ============================================================================
// The what-if control is a collection-efficiency percentage. Values
// outside this band have no operational meaning for a monitored book.

/// Lowest collection efficiency the what-if control accepts (95%)
pub const MIN_EFFICIENCY: f64 = 95.0;

/// Highest collection efficiency the what-if control accepts (100%)
pub const MAX_EFFICIENCY: f64 = 100.0;
