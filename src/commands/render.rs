use crate::commands::OutputMode;
use crate::commands::check::FileReport;
use crate::rules::{RuleId, RuleLevel};
use colored::*;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub fixed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            checked: reports.len(),
            ..Self::default()
        };
        for report in reports {
            summary.fixed += report.fixed;
            if report.error.is_some() {
                summary.failed += 1;
            }
            for v in &report.violations {
                match v.level {
                    RuleLevel::Error => summary.errors += 1,
                    RuleLevel::Warning => summary.warnings += 1,
                    RuleLevel::Info => summary.infos += 1,
                }
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0 && self.infos == 0
    }
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    file: &'a str,
    rule: RuleId,
    severity: RuleLevel,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    specifier: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    replacement: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    file: &'a str,
    error: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    summary: Summary,
    issues: Vec<JsonIssue<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<JsonFailure<'a>>,
}

pub fn render_json(reports: &[FileReport]) -> String {
    let issues = reports
        .iter()
        .flat_map(|r| {
            r.violations.iter().map(move |v| JsonIssue {
                file: &r.file,
                rule: v.rule,
                severity: v.level,
                message: &v.message,
                line: v.line,
                specifier: &v.specifier,
                replacement: v.replacement.as_deref(),
            })
        })
        .collect();
    let failures = reports
        .iter()
        .filter_map(|r| {
            r.error.as_deref().map(|error| JsonFailure {
                file: &r.file,
                error,
            })
        })
        .collect();

    let out = JsonOutput {
        summary: Summary::from_reports(reports),
        issues,
        failures,
    };
    serde_json::to_string_pretty(&out).unwrap_or_default()
}

/// Genera un documento SARIF 2.1.0. El driver lista todas las reglas, también
/// en ejecuciones sin resultados.
pub fn render_sarif(reports: &[FileReport]) -> String {
    let rules_json: Vec<serde_json::Value> = RuleId::ALL
        .iter()
        .map(|rule| {
            serde_json::json!({
                "id": rule.as_str(),
                "shortDescription": { "text": rule.description() }
            })
        })
        .collect();

    let results_json: Vec<serde_json::Value> = reports
        .iter()
        .flat_map(|r| r.violations.iter().map(move |v| (r, v)))
        .map(|(r, v)| {
            let level = match v.level {
                RuleLevel::Error => "error",
                RuleLevel::Warning => "warning",
                RuleLevel::Info => "note",
            };
            serde_json::json!({
                "ruleId": v.rule.as_str(),
                "level": level,
                "message": { "text": format!("{} ('{}')", v.message, v.specifier) },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": r.file,
                            "uriBaseId": "%SRCROOT%"
                        },
                        "region": { "startLine": v.line.unwrap_or(1) }
                    }
                }]
            })
        })
        .collect();

    let sarif = serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "fsd-lint",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules_json
                }
            },
            "results": results_json
        }]
    });

    serde_json::to_string_pretty(&sarif).unwrap_or_default()
}

/// Salida de consola agrupada por archivo.
pub fn render_text(reports: &[FileReport], output_mode: OutputMode) {
    for report in reports {
        if let Some(ref error) = report.error {
            eprintln!("\n📄 {}", report.file.bold().cyan());
            eprintln!("   {} {}", "💥 FAILED".red(), error);
            continue;
        }

        let visible: Vec<_> = report
            .violations
            .iter()
            .filter(|v| output_mode != OutputMode::Quiet || v.level == RuleLevel::Error)
            .collect();

        if visible.is_empty() {
            if output_mode == OutputMode::Verbose {
                let fixed = if report.fixed > 0 {
                    format!(" ({} fixed)", report.fixed)
                } else {
                    String::new()
                };
                println!("   {} {}{}", "✔".green(), report.file.dimmed(), fixed.green());
            }
            continue;
        }

        println!("\n📄 {}", report.file.bold().cyan());
        if report.fixed > 0 {
            println!("   {} {} import(s) reescritos", "🔧".green(), report.fixed);
        }
        for v in visible {
            let icon = match v.level {
                RuleLevel::Error => "❌ ERROR".red(),
                RuleLevel::Warning => "⚠️  WARN ".yellow(),
                RuleLevel::Info => "ℹ️  INFO ".blue(),
            };
            let line_info = v.line.map(|l| format!(":{}", l)).unwrap_or_default();
            println!(
                "   {} [{}{}]: {} '{}'",
                icon,
                v.rule.as_str().yellow(),
                line_info,
                v.message,
                v.specifier
            );
            if let Some(ref replacement) = v.replacement {
                println!("      {} fixable: '{}'", "👉".dimmed(), replacement.dimmed());
            }
        }
    }
}

pub fn render_summary(summary: &Summary, output_mode: OutputMode) {
    if output_mode == OutputMode::Quiet && summary.errors == 0 && summary.failed == 0 {
        return;
    }
    if summary.fixed > 0 {
        println!("\n🔧 {} import(s) corregidos.", summary.fixed.to_string().green().bold());
    }
    if summary.failed > 0 {
        println!("💥 {} archivo(s) no se pudieron revisar.", summary.failed.to_string().red());
    }
    if summary.is_clean() {
        println!("\n✅ Sin problemas detectados en {} archivo(s).", summary.checked);
    } else {
        println!(
            "\n🚩 {} error(s)  ⚠️  {} warning(s)  ℹ️  {} info(s)",
            summary.errors.to_string().red().bold(),
            summary.warnings.to_string().yellow(),
            summary.infos.to_string().blue()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleViolation, ViolationKind};

    fn report() -> FileReport {
        FileReport {
            file: "src/features/auth/index.ts".to_string(),
            violations: vec![
                RuleViolation {
                    rule: RuleId::LayerImports,
                    kind: ViolationKind::LayerOrder,
                    message: ViolationKind::LayerOrder.message().to_string(),
                    level: RuleLevel::Error,
                    line: Some(3),
                    specifier: "@/widgets/header".to_string(),
                    replacement: None,
                    span: None,
                },
                RuleViolation {
                    rule: RuleId::AbsolutePublicApiImports,
                    kind: ViolationKind::PublicApiBoundary,
                    message: ViolationKind::PublicApiBoundary.message().to_string(),
                    level: RuleLevel::Warning,
                    line: Some(1),
                    specifier: "@/shared/ui/button/Button".to_string(),
                    replacement: Some("@/shared/ui/button".to_string()),
                    span: None,
                },
            ],
            fixed: 1,
            error: None,
        }
    }

    #[test]
    fn test_summary_counts_levels() {
        let failed = FileReport {
            file: "src/app/broken.ts".to_string(),
            error: Some("unreadable".to_string()),
            ..FileReport::default()
        };
        let summary = Summary::from_reports(&[report(), failed]);
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.fixed, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_render_json_structure() {
        let json = render_json(&[report()]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["checked"], 1);
        assert_eq!(parsed["errors"], 1);
        assert_eq!(parsed["issues"][0]["rule"], "layer-imports");
        assert_eq!(parsed["issues"][1]["severity"], "warning");
        assert_eq!(parsed["issues"][1]["replacement"], "@/shared/ui/button");
        assert!(parsed["issues"][0].get("replacement").is_none());
        assert!(parsed.get("failures").is_none());
    }

    #[test]
    fn test_render_sarif_produces_valid_structure() {
        let sarif = render_sarif(&[report()]);
        let parsed: serde_json::Value = serde_json::from_str(&sarif).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "fsd-lint");
        assert_eq!(
            parsed["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap().len(),
            RuleId::ALL.len()
        );
        let result = &parsed["runs"][0]["results"][1];
        assert_eq!(result["ruleId"], "absolute-public-api-imports");
        assert_eq!(result["level"], "warning");
        assert_eq!(result["locations"][0]["physicalLocation"]["region"]["startLine"], 1);
    }

    #[test]
    fn test_render_sarif_empty_run() {
        let parsed: serde_json::Value = serde_json::from_str(&render_sarif(&[])).unwrap();
        assert!(parsed["runs"][0]["results"].as_array().unwrap().is_empty());
    }
}
