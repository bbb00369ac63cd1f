use serde::Serialize;
use speakmark_core::config::{AppConfig, LoadOptions};
use speakmark_core::{Catalog, ResponseComposer};

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
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
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
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

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            details: format!(
                "configuration loaded; webhook at `{}{}`",
                config.listen_address(),
                config.webhook.path
            ),
        }),
        Err(error) => checks.push(DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            details: error.to_string(),
        }),
    }

    match Catalog::standard() {
        Ok(catalog) => {
            checks.push(DoctorCheck {
                name: "catalog_build",
                status: CheckStatus::Pass,
                details: format!("{} example topics rendered", catalog.len()),
            });
            checks.push(check_documents(&catalog));
            checks.push(check_topic_list(&catalog));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "catalog_build",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_documents", "topic_list"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because the catalog did not build".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_documents(catalog: &Catalog) -> DoctorCheck {
    let malformed = catalog
        .topics()
        .filter(|topic| {
            catalog.lookup(topic).map_or(true, |document| {
                !document.starts_with("<speak>") || !document.ends_with("</speak>")
            })
        })
        .collect::<Vec<_>>();

    if malformed.is_empty() {
        DoctorCheck {
            name: "catalog_documents",
            status: CheckStatus::Pass,
            details: "every document is wrapped in <speak>".to_string(),
        }
    } else {
        DoctorCheck {
            name: "catalog_documents",
            status: CheckStatus::Fail,
            details: format!("documents without a <speak> root: {}", malformed.join(", ")),
        }
    }
}

fn check_topic_list(catalog: &Catalog) -> DoctorCheck {
    let composer = ResponseComposer::new(catalog);
    let missing = catalog
        .topics()
        .filter(|topic| !composer.topic_list().contains(topic))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        DoctorCheck {
            name: "topic_list",
            status: CheckStatus::Pass,
            details: composer.topic_list().to_string(),
        }
    } else {
        DoctorCheck {
            name: "topic_list",
            status: CheckStatus::Fail,
            details: format!("topic list omits: {}", missing.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
