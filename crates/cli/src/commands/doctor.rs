use serde::Serialize;
use shelfscope_core::{config::AppConfig, dashboard::DataState, snapshot::SnapshotSummary};

use crate::commands::{CommandContext, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
    snapshot: Option<SnapshotSummary>,
}

/// Exit code is non-zero unless every check passed or only warned.
pub fn run(context: &CommandContext, json_output: bool) -> CommandResult {
    let report = build_report(context);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(context: &CommandContext) -> DoctorReport {
    let mut checks = Vec::new();
    let mut snapshot = None;

    match AppConfig::load(context.options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let dashboard = shelfscope_data::open_dashboard(&config.data, config.analytics);
            match dashboard.state() {
                DataState::Ready(loaded) => {
                    let summary = loaded.summary();
                    checks.push(DoctorCheck {
                        name: "data_load",
                        status: CheckStatus::Pass,
                        details: format!(
                            "loaded {} products and {} order lines from `{}`",
                            summary.products,
                            summary.order_lines,
                            config.data.dir.display()
                        ),
                    });
                    checks.push(check_unmatched_lines(&summary));
                    snapshot = Some(summary);
                }
                DataState::Unavailable { reason } => {
                    checks.push(DoctorCheck {
                        name: "data_load",
                        status: CheckStatus::Fail,
                        details: reason.clone(),
                    });
                    checks.push(skipped("catalog_coverage", "data did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("data_load", "configuration did not load"));
            checks.push(skipped("catalog_coverage", "configuration did not load"));
        }
    }

    let any_fail = checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Fail | CheckStatus::Skipped));
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks, snapshot }
}

fn check_unmatched_lines(summary: &SnapshotSummary) -> DoctorCheck {
    if summary.unmatched_order_lines == 0 {
        DoctorCheck {
            name: "catalog_coverage",
            status: CheckStatus::Pass,
            details: "every order line references a catalog product".to_string(),
        }
    } else {
        DoctorCheck {
            name: "catalog_coverage",
            status: CheckStatus::Warn,
            details: format!(
                "{} of {} order lines reference products missing from the catalog",
                summary.unmatched_order_lines, summary.order_lines
            ),
        }
    }
}

fn skipped(name: &'static str, because: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {because}"),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    if let Some(snapshot) = &report.snapshot {
        lines.push(format!(
            "tables: orders={} order_lines={} products={} aisles={} departments={}",
            snapshot.orders,
            snapshot.order_lines,
            snapshot.products,
            snapshot.aisles,
            snapshot.departments
        ));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use shelfscope_core::snapshot::SnapshotSummary;

    use super::{check_unmatched_lines, CheckStatus};

    #[test]
    fn unmatched_lines_downgrade_coverage_to_warning() {
        let summary = SnapshotSummary {
            orders: 1,
            order_lines: 10,
            products: 2,
            aisles: 1,
            departments: 1,
            unmatched_order_lines: 3,
        };

        let check = check_unmatched_lines(&summary);
        assert_eq!(check.status, CheckStatus::Warn);
        assert_eq!(check.details, "3 of 10 order lines reference products missing from the catalog");
    }
}
