//! Early-warning alerts
//!
//! Alerts are produced by upstream monitoring and pass through the engine
//! unmodified; this module carries their wire types and a severity
//! ordering for display. Alert trend uses its own vocabulary because it
//! describes risk direction, not raw metric direction: a falling NPA
//! ratio is "improving", even though the metric trend is "down".

use serde::{Deserialize, Serialize};

/// Alert severity, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }
}

/// Risk direction of the metric behind an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTrend {
    Improving,
    Stable,
    Deteriorating,
}

impl AlertTrend {
    pub fn label(&self) -> &'static str {
        match self {
            AlertTrend::Improving => "Improving",
            AlertTrend::Stable => "Stable",
            AlertTrend::Deteriorating => "Deteriorating",
        }
    }
}

/// One upstream-produced alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyWarningAlert {
    pub id: String,
    /// Metric the alert concerns, free-form
    pub metric: String,
    pub severity: Severity,
    pub trend: AlertTrend,
    pub message: String,
    /// Forecast breach date when the producer modelled one, ISO date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_breach_date: Option<String>,
}

/// Alerts ordered most severe first. The sort is stable, so producer
/// order survives within each severity; the alerts themselves are
/// borrowed, never altered.
pub fn order_by_severity(alerts: &[EarlyWarningAlert]) -> Vec<&EarlyWarningAlert> {
    let mut ordered: Vec<&EarlyWarningAlert> = alerts.iter().collect();
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str, severity: Severity) -> EarlyWarningAlert {
        EarlyWarningAlert {
            id: id.to_string(),
            metric: "PAR 30".to_string(),
            severity,
            trend: AlertTrend::Deteriorating,
            message: "PAR 30 approaching covenant limit".to_string(),
            predicted_breach_date: None,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_most_severe_first_and_stable_within() {
        let alerts = vec![
            alert("a-1", Severity::Info),
            alert("a-2", Severity::Critical),
            alert("a-3", Severity::Warning),
            alert("a-4", Severity::Critical),
        ];
        let ordered = order_by_severity(&alerts);
        let ids: Vec<&str> = ordered.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a-2", "a-4", "a-3", "a-1"]);
    }

    #[test]
    fn test_alert_json_round_trip() {
        let json = r#"{
            "id": "a-1",
            "metric": "Collection Efficiency",
            "severity": "warning",
            "trend": "deteriorating",
            "message": "Collection efficiency declining for 3 consecutive months",
            "predictedBreachDate": "2025-06-30"
        }"#;
        let parsed: EarlyWarningAlert = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.severity, Severity::Warning);
        assert_eq!(parsed.trend, AlertTrend::Deteriorating);
        assert_eq!(parsed.predicted_breach_date.as_deref(), Some("2025-06-30"));

        // The optional forecast date may be absent entirely.
        let bare = r#"{
            "id": "a-2",
            "metric": "CRAR",
            "severity": "critical",
            "trend": "stable",
            "message": "CRAR below internal trigger"
        }"#;
        let parsed: EarlyWarningAlert = serde_json::from_str(bare).unwrap();
        assert_eq!(parsed.predicted_breach_date, None);
    }
}
