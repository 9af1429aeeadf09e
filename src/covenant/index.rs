//! Latest/previous reading lookups
//!
//! Reporting feeds deliver readings in whatever order the upstream batch
//! produced them. The index reduces that unordered series to the two
//! observations the compliance view needs per covenant: the most recent
//! reading and the most recent strictly-earlier one.

use std::collections::HashMap;

use super::data::CovenantReading;

/// Temporal lookup table over a reading series.
///
/// Building the index never mutates the input. Date ties keep the
/// first-seen reading, so rebuilding from the same slice always yields
/// the same table.
#[derive(Debug, Clone, Default)]
pub struct ReadingIndex {
    latest: HashMap<String, CovenantReading>,
    previous: HashMap<String, CovenantReading>,
}

impl ReadingIndex {
    /// Build the index from readings in any order.
    pub fn build(readings: &[CovenantReading]) -> Self {
        let mut by_covenant: HashMap<&str, Vec<&CovenantReading>> = HashMap::new();
        for reading in readings {
            by_covenant
                .entry(reading.covenant_id.as_str())
                .or_default()
                .push(reading);
        }

        let mut latest = HashMap::new();
        let mut previous = HashMap::new();
        for (covenant_id, series) in by_covenant {
            let newest = match most_recent(&series, None) {
                Some(reading) => reading,
                None => continue,
            };
            // Strictly earlier than the latest date: a same-date duplicate
            // of the newest reading is not a prior observation.
            if let Some(prior) = most_recent(&series, Some(&newest.date)) {
                previous.insert(covenant_id.to_string(), prior.clone());
            }
            latest.insert(covenant_id.to_string(), newest.clone());
        }

        ReadingIndex { latest, previous }
    }

    /// Most recent reading for a covenant, if any was ever reported.
    pub fn latest(&self, covenant_id: &str) -> Option<&CovenantReading> {
        self.latest.get(covenant_id)
    }

    /// Most recent reading strictly before the latest one.
    pub fn previous(&self, covenant_id: &str) -> Option<&CovenantReading> {
        self.previous.get(covenant_id)
    }

    /// Number of covenants with at least one reading.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// Maximum-date reading in `series`, restricted to dates strictly below
/// `before` when given. ISO dates order lexicographically, so plain string
/// comparison is chronological. First-seen wins ties.
fn most_recent<'a>(
    series: &[&'a CovenantReading],
    before: Option<&str>,
) -> Option<&'a CovenantReading> {
    let mut best: Option<&'a CovenantReading> = None;
    for &reading in series {
        if let Some(limit) = before {
            if reading.date.as_str() >= limit {
                continue;
            }
        }
        let newer = match best {
            Some(current) => reading.date > current.date,
            None => true,
        };
        if newer {
            best = Some(reading);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covenant::data::ComplianceStatus;

    fn reading(covenant_id: &str, date: &str, value: f64) -> CovenantReading {
        CovenantReading {
            covenant_id: covenant_id.to_string(),
            date: date.to_string(),
            value,
            status: ComplianceStatus::Compliant,
        }
    }

    #[test]
    fn test_latest_and_previous_from_unordered_input() {
        let readings = vec![
            reading("cov-1", "2025-02-28", 15.2),
            reading("cov-1", "2025-03-31", 14.7),
            reading("cov-1", "2025-01-31", 15.8),
        ];
        let index = ReadingIndex::build(&readings);

        assert_eq!(index.latest("cov-1").unwrap().date, "2025-03-31");
        assert_eq!(index.previous("cov-1").unwrap().date, "2025-02-28");
    }

    #[test]
    fn test_single_reading_has_no_previous() {
        let readings = vec![reading("cov-1", "2025-03-31", 14.7)];
        let index = ReadingIndex::build(&readings);

        assert!(index.latest("cov-1").is_some());
        assert!(index.previous("cov-1").is_none());
    }

    #[test]
    fn test_unknown_covenant_has_no_entries() {
        let readings = vec![reading("cov-1", "2025-03-31", 14.7)];
        let index = ReadingIndex::build(&readings);

        assert!(index.latest("cov-9").is_none());
        assert!(index.previous("cov-9").is_none());
    }

    #[test]
    fn test_duplicate_latest_date_keeps_first_seen() {
        let readings = vec![
            reading("cov-1", "2025-03-31", 14.7),
            reading("cov-1", "2025-03-31", 14.9),
            reading("cov-1", "2025-02-28", 15.2),
        ];
        let index = ReadingIndex::build(&readings);

        // First occurrence of the tied date wins; the duplicate is not
        // promoted to "previous" because it is not strictly earlier.
        assert_eq!(index.latest("cov-1").unwrap().value, 14.7);
        assert_eq!(index.previous("cov-1").unwrap().date, "2025-02-28");
    }

    #[test]
    fn test_empty_input_builds_empty_index() {
        let index = ReadingIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_covenants_indexed_independently() {
        let readings = vec![
            reading("cov-1", "2025-03-31", 14.7),
            reading("cov-2", "2025-01-31", 2.1),
            reading("cov-2", "2025-02-28", 2.6),
        ];
        let index = ReadingIndex::build(&readings);

        assert_eq!(index.len(), 2);
        assert!(index.previous("cov-1").is_none());
        assert_eq!(index.previous("cov-2").unwrap().value, 2.1);
    }
}
