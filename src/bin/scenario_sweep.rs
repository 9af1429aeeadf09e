//! Sweep the what-if collection-efficiency control across its band
//!
//! Prints projected PAR-30 and CRAR with compliance labels at each step,
//! spot-checks the linear sensitivities against known reference points,
//! and demonstrates the merged actual/projection trend series.

use covenant_engine::projection::{
    merge_series, ScenarioAssumptions, TrendPoint, MAX_EFFICIENCY, MIN_EFFICIENCY,
};

const SWEEP_STEP: f64 = 0.5;

/// Reference points for the linear sensitivities:
/// (efficiency, expected PAR-30, expected CRAR).
const REFERENCE_POINTS: [(f64, f64, f64); 3] = [
    (99.2, 3.2, 15.2),
    (98.2, 5.2, 14.7),
    (97.2, 7.2, 14.2),
];

fn main() {
    let assumptions = ScenarioAssumptions::default();

    println!("Scenario sweep, collection efficiency {:.0}%-{:.0}%:", MIN_EFFICIENCY, MAX_EFFICIENCY);
    println!(
        "{:>10} | {:>8} {:<9} | {:>8} {:<9}",
        "Efficiency", "PAR-30", "Status", "CRAR", "Status"
    );

    let steps = ((MAX_EFFICIENCY - MIN_EFFICIENCY) / SWEEP_STEP).round() as usize;
    for step in 0..=steps {
        let efficiency = MIN_EFFICIENCY + step as f64 * SWEEP_STEP;
        let impact = assumptions.project(efficiency);
        println!(
            "{:>9.1}% | {:>7.1}% {:<9} | {:>7.1}% {:<9}",
            impact.efficiency,
            impact.projected_par30,
            impact.par30_status.label(),
            impact.projected_crar,
            impact.crar_status.label(),
        );
    }

    // Spot-check the sensitivities
    println!("\nReference check:");
    let mut all_pass = true;
    for &(efficiency, expected_par30, expected_crar) in &REFERENCE_POINTS {
        let impact = assumptions.project(efficiency);
        let par30_diff = (impact.projected_par30 - expected_par30).abs();
        let crar_diff = (impact.projected_crar - expected_crar).abs();
        let pass = par30_diff < 1e-9 && crar_diff < 1e-9;
        all_pass &= pass;
        println!(
            "  efficiency {:.1}%: PAR-30 {:.4} (expected {:.1}, diff {:.2e}), \
             CRAR {:.4} (expected {:.1}, diff {:.2e}) ... {}",
            efficiency,
            impact.projected_par30,
            expected_par30,
            par30_diff,
            impact.projected_crar,
            expected_crar,
            crar_diff,
            if pass { "PASS" } else { "FAIL" },
        );
    }
    println!(
        "Reference check: {}",
        if all_pass { "ALL PASS" } else { "FAILURES PRESENT" }
    );

    // Merged trend demonstration: observed CRAR with a projected tail
    let actuals = vec![
        TrendPoint::new("2025-01-31", 15.8),
        TrendPoint::new("2025-02-28", 15.2),
        TrendPoint::new("2025-03-31", 14.7),
    ];
    let projections = vec![
        TrendPoint::new("2025-04-30", 14.5),
        TrendPoint::new("2025-05-31", 14.3),
        TrendPoint::new("2025-06-30", 14.1),
    ];

    println!("\nMerged CRAR trend (threshold 15.0):");
    println!("{:>9} | {:>8} | {:>9}", "Period", "Actual", "Projected");
    for point in merge_series(&actuals, &projections) {
        let actual = point
            .actual
            .map(|value| format!("{:.1}", value))
            .unwrap_or_else(|| "-".to_string());
        let projected = point
            .projected
            .map(|value| format!("{:.1}", value))
            .unwrap_or_else(|| "-".to_string());
        println!("{:>9} | {:>8} | {:>9}", point.period, actual, projected);
    }
}
