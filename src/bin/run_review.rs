//! Run a full facility review over a loan tape and covenant package
//!
//! Outputs the covenant board, breach list, dual-policy provisioning
//! tables, portfolio analytics, alerts, and a roll-rate projection, and
//! writes the provisioning tables to CSV.

use clap::Parser;
use covenant_engine::alerts::{order_by_severity, AlertTrend, EarlyWarningAlert, Severity};
use covenant_engine::covenant::{
    assess_all, breaches, validate_inputs, ComplianceStatus, CovenantDefinition, CovenantReading,
    ReadingIndex, Trend,
};
use covenant_engine::loanbook::{
    cure_rate, demo_loan_book, dpd_distribution, estimate_loss, expected_credit_loss,
    financial_summary, load_loans,
};
use covenant_engine::projection::{roll_rate_projection, RollRateScenario, ScenarioAssumptions};
use covenant_engine::provisioning::{compare_policies, PortfolioSummary, RuleSet};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Run a facility review over a loan tape and covenant package")]
struct Args {
    /// Loan tape CSV; uses the built-in demonstration tape when omitted
    #[arg(long)]
    loans: Option<String>,

    /// Covenant package JSON (definitions, readings, alerts); uses the
    /// built-in demonstration package when omitted
    #[arg(long)]
    covenants: Option<String>,

    /// Roll-rate stress level
    #[arg(long, value_enum, default_value = "base")]
    scenario: RollRateScenario,

    /// Roll-rate horizon in months
    #[arg(long, default_value_t = 3)]
    months: usize,

    /// Output CSV for the provisioning tables
    #[arg(long, default_value = "provisioning_summary.csv")]
    output: String,
}

/// Covenant package as delivered by the reporting pipeline
#[derive(Debug, Deserialize)]
struct CovenantPackage {
    definitions: Vec<CovenantDefinition>,
    readings: Vec<CovenantReading>,
    #[serde(default)]
    alerts: Vec<EarlyWarningAlert>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();

    let loans = match &args.loans {
        Some(path) => {
            println!("Loading loan tape from {}...", path);
            load_loans(path).expect("Failed to load loan tape")
        }
        None => {
            println!("No loan tape supplied, using demonstration book");
            demo_loan_book()
        }
    };
    println!("Loaded {} loans in {:?}", loans.len(), start.elapsed());

    let package = match &args.covenants {
        Some(path) => {
            println!("Loading covenant package from {}...", path);
            let file = File::open(path).expect("Failed to open covenant package");
            serde_json::from_reader(file).expect("Failed to parse covenant package")
        }
        None => demo_package(),
    };
    validate_inputs(&package.definitions, &package.readings)
        .expect("Covenant package failed validation");

    // Covenant board
    let index = ReadingIndex::build(&package.readings);
    let assessments = assess_all(&package.definitions, &index);

    println!("\nCovenant board:");
    println!(
        "  {:<24} {:<12} {:>10} {:<9} {:<17} {:>8}",
        "Metric", "Required", "Actual", "Status", "Trend", "Headroom"
    );
    for (definition, assessment) in package.definitions.iter().zip(&assessments) {
        let required = format!(
            "{} {}",
            definition.operator.symbol(),
            definition.format.format_value(definition.threshold)
        );
        let actual = match assessment.actual {
            Some(value) => definition.format.format_value(value),
            None => "-".to_string(),
        };
        let status = match assessment.status {
            Some(status) => status.label(),
            None => "No data",
        };
        let trend = match assessment.trend {
            Trend::Stable => "stable".to_string(),
            direction => {
                let arrow = if direction == Trend::Up { "up" } else { "down" };
                let reading = if assessment.trend_favourable {
                    "favourable"
                } else {
                    "adverse"
                };
                format!("{} ({})", arrow, reading)
            }
        };
        println!(
            "  {:<24} {:<12} {:>10} {:<9} {:<17} {:>8}",
            assessment.metric,
            required,
            actual,
            status,
            trend,
            assessment.headroom_label.as_deref().unwrap_or("-"),
        );
    }

    let breached = breaches(&assessments);
    if breached.is_empty() {
        println!("\nNo covenant breaches.");
    } else {
        println!("\nCovenant breaches ({}):", breached.len());
        for assessment in &breached {
            println!(
                "  - {} breached as of {}",
                assessment.metric,
                assessment.as_of.as_deref().unwrap_or("unknown date"),
            );
        }
    }

    // What-if at the reported collection efficiency
    let efficiency_covenant = package
        .definitions
        .iter()
        .find(|definition| definition.metric == "Collection Efficiency");
    if let Some(reading) = efficiency_covenant.and_then(|def| index.latest(&def.id)) {
        let impact = ScenarioAssumptions::default().project(reading.value);
        println!(
            "\nAt reported collection efficiency {:.1}%: PAR-30 {:.1}% ({}), CRAR {:.1}% ({})",
            impact.efficiency,
            impact.projected_par30,
            impact.par30_status.label(),
            impact.projected_crar,
            impact.crar_status.label(),
        );
    }

    // Dual-policy provisioning
    println!("\nRunning provisioning under both policies...");
    let provisioning_start = Instant::now();
    let originator = RuleSet::default_originator();
    let lender = RuleSet::default_lender();
    let comparison = compare_policies(&loans, &originator, &lender);
    println!("Provisioning complete in {:?}", provisioning_start.elapsed());

    print_policy_table("Originator policy", &comparison.originator, &originator);
    print_policy_table("Lender policy", &comparison.lender, &lender);
    println!(
        "\nProvision gap (lender - originator): {:.0}",
        comparison.lender.total_provision - comparison.originator.total_provision
    );

    // Portfolio analytics
    let summary = financial_summary(&loans);
    println!("\nPortfolio summary:");
    println!("  Balance:        {:>14.2}", summary.total_balance);
    println!(
        "  Overdue:        {:>14.2} ({:.2}% of book)",
        summary.total_overdue, summary.overdue_ratio_pct
    );
    println!(
        "  Write-offs:     {:>14.2} gross, {:.2} net of recoveries",
        summary.gross_loss, summary.net_loss
    );
    println!(
        "  Recovery rate:  {:>13.2}%  Write-off rate: {:.2}%",
        summary.recovery_rate_pct, summary.write_off_rate_pct
    );
    println!("  Avg rate:       {:>13.2}%", summary.avg_interest_rate);

    let loss = estimate_loss(&loans);
    let ecl = expected_credit_loss(&loans);
    let cure = cure_rate(&loans);
    println!(
        "  Expected loss:  {:>14.2} ({:.2}% of book)",
        loss.total_loss, loss.loss_rate_pct
    );
    println!(
        "  ECL:            {:>14.2} 12m / {:.2} lifetime ({:.2}% coverage)",
        ecl.ecl_12m, ecl.ecl_lifetime, ecl.coverage_12m_pct
    );
    println!(
        "  Cure rate:      {:>13.2}% of delinquent balance",
        cure.cure_rate_pct
    );

    println!("\nDelinquency distribution:");
    println!("  {:<8} {:>6} {:>14} {:>8}", "Bucket", "Loans", "Balance", "% Book");
    for row in dpd_distribution(&loans) {
        println!(
            "  {:<8} {:>6} {:>14.2} {:>8.1}",
            row.bucket.label(),
            row.loan_count,
            row.balance,
            row.portfolio_pct
        );
    }

    // Roll-rate projection
    println!(
        "\nRoll-rate projection, {} scenario, {} months:",
        args.scenario.label(),
        args.months
    );
    println!(
        "  {:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Period", "Current", "1-30", "31-60", "61-90", "91-180", "180+"
    );
    for row in roll_rate_projection(&loans, args.months, args.scenario) {
        println!(
            "  {:<10} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0}",
            row.period,
            row.balances[0],
            row.balances[1],
            row.balances[2],
            row.balances[3],
            row.balances[4],
            row.balances[5],
        );
    }

    // Alerts
    if package.alerts.is_empty() {
        println!("\nNo early-warning alerts.");
    } else {
        println!("\nEarly-warning alerts:");
        for alert in order_by_severity(&package.alerts) {
            let forecast = match &alert.predicted_breach_date {
                Some(date) => format!(" (breach forecast {})", date),
                None => String::new(),
            };
            println!(
                "  [{:<8}] {} - {}: {}{}",
                alert.severity.label(),
                alert.metric,
                alert.trend.label(),
                alert.message,
                forecast
            );
        }
    }

    // Write provisioning tables
    let mut file = File::create(&args.output).expect("Failed to create output file");
    writeln!(
        file,
        "Policy,Bucket,DpdMin,DpdMax,LoanCount,Balance,ProvisionPercent,ProvisionAmount,PortfolioPct"
    )
    .unwrap();
    write_summary(&mut file, "originator", &comparison.originator, &originator);
    write_summary(&mut file, "lender", &comparison.lender, &lender);
    println!("\nProvisioning tables written to {}", args.output);

    println!("Total time: {:?}", start.elapsed());
}

fn print_policy_table(title: &str, summary: &PortfolioSummary, policy: &RuleSet) {
    println!("\n{}:", title);
    println!(
        "  {:<13} {:>9} {:>6} {:>14} {:>7} {:>14} {:>7}",
        "Bucket", "DPD", "Loans", "Balance", "Prov %", "Provision", "% Book"
    );
    for (slot, row) in summary.buckets.iter().enumerate() {
        // The sentinel bucket carries no rule, so no range.
        let range = match policy.rules().get(slot) {
            Some(rule) => format!("{}-{}", rule.dpd_min, rule.dpd_max),
            None => "-".to_string(),
        };
        println!(
            "  {:<13} {:>9} {:>6} {:>14.2} {:>7.1} {:>14.0} {:>7.1}",
            row.bucket.label(),
            range,
            row.loan_count,
            row.balance,
            row.provision_percent,
            row.provision_amount,
            row.portfolio_pct,
        );
    }
    println!(
        "  Total: {} loans, balance {:.2}, provision {:.0}",
        summary.total_loans, summary.total_balance, summary.total_provision
    );
}

fn write_summary(file: &mut File, policy_name: &str, summary: &PortfolioSummary, policy: &RuleSet) {
    for (slot, row) in summary.buckets.iter().enumerate() {
        let (dpd_min, dpd_max) = match policy.rules().get(slot) {
            Some(rule) => (rule.dpd_min.to_string(), rule.dpd_max.to_string()),
            None => (String::new(), String::new()),
        };
        writeln!(
            file,
            "{},{},{},{},{},{:.2},{:.2},{:.2},{:.4}",
            policy_name,
            row.bucket.label(),
            dpd_min,
            dpd_max,
            row.loan_count,
            row.balance,
            row.provision_percent,
            row.provision_amount,
            row.portfolio_pct,
        )
        .unwrap();
    }
}

/// Built-in demonstration package: the standard covenant set with three
/// months of readings and a handful of alerts, mirroring a facility
/// drifting toward breach.
fn demo_package() -> CovenantPackage {
    let readings: [(&str, &str, f64, ComplianceStatus); 15] = [
        ("cov-1", "2025-01-31", 15.8, ComplianceStatus::Compliant),
        ("cov-1", "2025-02-28", 15.2, ComplianceStatus::Watch),
        ("cov-1", "2025-03-31", 14.7, ComplianceStatus::Breached),
        ("cov-2", "2025-01-31", 2.1, ComplianceStatus::Compliant),
        ("cov-2", "2025-02-28", 2.6, ComplianceStatus::Compliant),
        ("cov-2", "2025-03-31", 3.4, ComplianceStatus::Breached),
        ("cov-3", "2025-01-31", 98.6, ComplianceStatus::Compliant),
        ("cov-3", "2025-02-28", 98.3, ComplianceStatus::Compliant),
        ("cov-3", "2025-03-31", 98.2, ComplianceStatus::Compliant),
        ("cov-4", "2025-01-31", 4.1, ComplianceStatus::Compliant),
        ("cov-4", "2025-02-28", 4.6, ComplianceStatus::Watch),
        ("cov-4", "2025-03-31", 5.2, ComplianceStatus::Breached),
        ("cov-5", "2025-01-31", 3.6, ComplianceStatus::Compliant),
        ("cov-5", "2025-02-28", 3.7, ComplianceStatus::Compliant),
        ("cov-5", "2025-03-31", 3.7, ComplianceStatus::Compliant),
    ];

    CovenantPackage {
        definitions: CovenantDefinition::standard_set(),
        readings: readings
            .iter()
            .map(|&(covenant_id, date, value, status)| CovenantReading {
                covenant_id: covenant_id.to_string(),
                date: date.to_string(),
                value,
                status,
            })
            .collect(),
        alerts: vec![
            EarlyWarningAlert {
                id: "a-1".to_string(),
                metric: "CRAR".to_string(),
                severity: Severity::Critical,
                trend: AlertTrend::Deteriorating,
                message: "CRAR fell below the 15% covenant floor".to_string(),
                predicted_breach_date: None,
            },
            EarlyWarningAlert {
                id: "a-2".to_string(),
                metric: "Collection Efficiency".to_string(),
                severity: Severity::Warning,
                trend: AlertTrend::Deteriorating,
                message: "Collection efficiency declining for three consecutive months"
                    .to_string(),
                predicted_breach_date: Some("2025-06-30".to_string()),
            },
            EarlyWarningAlert {
                id: "a-3".to_string(),
                metric: "PAR 30".to_string(),
                severity: Severity::Critical,
                trend: AlertTrend::Deteriorating,
                message: "PAR 30 above the 5% covenant limit".to_string(),
                predicted_breach_date: None,
            },
            EarlyWarningAlert {
                id: "a-4".to_string(),
                metric: "Debt-to-Equity Ratio".to_string(),
                severity: Severity::Info,
                trend: AlertTrend::Stable,
                message: "Leverage holding steady within terms".to_string(),
                predicted_breach_date: None,
            },
        ],
    }
}
