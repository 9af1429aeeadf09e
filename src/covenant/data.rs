//! Covenant definitions and reported readings
//!
//! A covenant binds a named financial metric to a threshold through a
//! comparison operator. Readings arrive from upstream reporting already
//! carrying a compliance status; the engine treats that status as
//! authoritative and never recomputes it, so lender-approved overrides
//! (waivers, cure periods) survive the passage through this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Comparison operator a covenant applies to its metric.
///
/// Serialized with the symbolic spellings used by reporting templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Metric must stay at or above the threshold (e.g. capital ratios)
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Metric must stay strictly above the threshold
    #[serde(rename = ">")]
    Greater,
    /// Metric must stay at or below the threshold (e.g. NPA ratios)
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Metric must stay strictly below the threshold
    #[serde(rename = "<")]
    Less,
}

impl Operator {
    /// True when the covenant keeps the metric above a floor. Floor-style
    /// covenants treat rising values as favourable; ceiling-style
    /// covenants treat falling values as favourable.
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Operator::GreaterOrEqual | Operator::Greater)
    }

    /// Whether `actual` satisfies this operator against `threshold`.
    ///
    /// Used for projected values in scenario analysis. Reported covenant
    /// readings are never re-tested; their status field is authoritative.
    pub fn holds(&self, actual: f64, threshold: f64) -> bool {
        match self {
            Operator::GreaterOrEqual => actual >= threshold,
            Operator::Greater => actual > threshold,
            Operator::LessOrEqual => actual <= threshold,
            Operator::Less => actual < threshold,
        }
    }

    /// Symbolic spelling for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::GreaterOrEqual => ">=",
            Operator::Greater => ">",
            Operator::LessOrEqual => "<=",
            Operator::Less => "<",
        }
    }
}

/// Display format of a covenant metric's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Percentage points, rendered with a `%` suffix
    Percent,
    /// Multiples, rendered with an `x` suffix
    Ratio,
    /// Plain number, no suffix
    Number,
}

impl ValueFormat {
    /// Display suffix for values in this format.
    pub fn suffix(&self) -> &'static str {
        match self {
            ValueFormat::Percent => "%",
            ValueFormat::Ratio => "x",
            ValueFormat::Number => "",
        }
    }

    /// Render a value with this format's suffix.
    pub fn format_value(&self, value: f64) -> String {
        format!("{}{}", value, self.suffix())
    }
}

/// How often the metric is reported. Descriptive only; the engine never
/// derives schedule expectations from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingFrequency {
    Monthly,
    Quarterly,
    Annually,
}

/// Compliance status of a reported reading, assigned upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Compliant,
    /// Within terms but close enough to the threshold to flag
    Watch,
    Breached,
}

impl ComplianceStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::Watch => "Watch",
            ComplianceStatus::Breached => "Breached",
        }
    }
}

/// One covenant attached to a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovenantDefinition {
    /// Stable identifier readings refer back to
    pub id: String,
    /// Metric name as it appears in reporting (e.g. "CRAR", "PAR 30")
    pub metric: String,
    pub operator: Operator,
    pub threshold: f64,
    pub frequency: ReportingFrequency,
    pub format: ValueFormat,
}

impl CovenantDefinition {
    /// Boundary validation: the threshold must be a real number.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.is_empty() {
            return Err(EngineError::validation("id", "must not be empty"));
        }
        if !self.threshold.is_finite() {
            return Err(EngineError::validation(
                "threshold",
                format!("must be finite, got {}", self.threshold),
            ));
        }
        Ok(())
    }

    /// The covenant package attached to a typical secured NBFI facility,
    /// spanning capital strength and portfolio quality.
    pub fn standard_set() -> Vec<CovenantDefinition> {
        vec![
            CovenantDefinition {
                id: "cov-1".to_string(),
                metric: "CRAR".to_string(),
                operator: Operator::GreaterOrEqual,
                threshold: 15.0,
                frequency: ReportingFrequency::Quarterly,
                format: ValueFormat::Percent,
            },
            CovenantDefinition {
                id: "cov-2".to_string(),
                metric: "Net NPA Ratio".to_string(),
                operator: Operator::LessOrEqual,
                threshold: 3.0,
                frequency: ReportingFrequency::Quarterly,
                format: ValueFormat::Percent,
            },
            CovenantDefinition {
                id: "cov-3".to_string(),
                metric: "Collection Efficiency".to_string(),
                operator: Operator::GreaterOrEqual,
                threshold: 98.0,
                frequency: ReportingFrequency::Monthly,
                format: ValueFormat::Percent,
            },
            CovenantDefinition {
                id: "cov-4".to_string(),
                metric: "PAR 30".to_string(),
                operator: Operator::LessOrEqual,
                threshold: 5.0,
                frequency: ReportingFrequency::Monthly,
                format: ValueFormat::Percent,
            },
            CovenantDefinition {
                id: "cov-5".to_string(),
                metric: "Debt-to-Equity Ratio".to_string(),
                operator: Operator::LessOrEqual,
                threshold: 4.0,
                frequency: ReportingFrequency::Quarterly,
                format: ValueFormat::Ratio,
            },
        ]
    }
}

/// One reported observation of a covenant metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CovenantReading {
    /// Identifier of the covenant this observation belongs to
    pub covenant_id: String,
    /// Reporting date, ISO `YYYY-MM-DD`. Validated on entry; thereafter
    /// lexicographic order on the string is chronological order.
    pub date: String,
    pub value: f64,
    /// Upstream-assigned status, passed through unchanged
    pub status: ComplianceStatus,
}

impl CovenantReading {
    /// Boundary validation: a well-formed calendar date and a finite value.
    pub fn validate(&self) -> Result<(), EngineError> {
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(EngineError::validation(
                "date",
                format!("'{}' is not an ISO YYYY-MM-DD date", self.date),
            ));
        }
        if !self.value.is_finite() {
            return Err(EngineError::validation(
                "value",
                format!("must be finite, got {}", self.value),
            ));
        }
        Ok(())
    }
}

/// Validate a full covenant package before it enters the engine. First
/// failure wins; the caller decides whether to repair or reject the batch.
pub fn validate_inputs(
    definitions: &[CovenantDefinition],
    readings: &[CovenantReading],
) -> Result<(), EngineError> {
    for definition in definitions {
        definition.validate()?;
    }
    for reading in readings {
        reading.validate()?;
    }
    Ok(())
}
